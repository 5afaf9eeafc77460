/// Sélection dans le panneau de mapping.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MappingPanelState {
    pub selected: usize, // index into SymbolMap::entries()
}

impl MappingPanelState {
    pub fn select_next(&mut self, len: usize) {
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Keeps the selection valid after a removal.
    pub fn clamp(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_stays_in_bounds() {
        let mut panel = MappingPanelState::default();
        panel.select_prev();
        assert_eq!(panel.selected, 0);
        panel.select_next(3);
        panel.select_next(3);
        panel.select_next(3);
        assert_eq!(panel.selected, 2);
        panel.clamp(2);
        assert_eq!(panel.selected, 1);
        panel.clamp(0);
        assert_eq!(panel.selected, 0);
    }
}

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::grid::GridBuffer;

/// Action appliquée à une cellule touchée par le pointeur.
///
/// # Example
/// ```
/// use ts_core::paint::PaintMode;
/// assert_eq!(PaintMode::parse("Erase"), Some(PaintMode::Erase));
/// assert_eq!(PaintMode::parse("smudge"), None);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaintMode {
    /// Cell takes the active color.
    #[default]
    Paint,
    /// Cell goes back to `#ffffff`.
    Erase,
    /// Active color takes the cell color; grid untouched.
    Sample,
}

impl PaintMode {
    /// Nom de mode insensible à la casse. `None` si inconnu.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "paint" => Some(Self::Paint),
            "erase" => Some(Self::Erase),
            "sample" => Some(Self::Sample),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Paint => "Paint",
            Self::Erase => "Erase",
            Self::Sample => "Sample",
        }
    }
}

/// État du glisser.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging,
}

/// Machine à deux états traduisant les événements pointeur en mutations de grille.
///
/// Un relâchement ou une sortie, où qu'ils surviennent, ramènent toujours à `Idle`.
///
/// # Example
/// ```
/// use ts_core::{GridBuffer, PaintController, Color};
/// let mut grid = GridBuffer::new(4).unwrap();
/// let mut ctl = PaintController::new(Color::BLACK);
/// ctl.pointer_down(&mut grid, 0, 0);
/// ctl.pointer_enter(&mut grid, 0, 1);
/// ctl.pointer_release();
/// ctl.pointer_enter(&mut grid, 0, 2);
/// assert_eq!(grid.get(0, 1), Some(Color::BLACK));
/// assert_eq!(grid.get(0, 2), Some(Color::WHITE));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaintController {
    mode: PaintMode,
    active_color: Color,
    state: DragState,
}

impl PaintController {
    #[must_use]
    pub fn new(active_color: impl Into<Color>) -> Self {
        Self {
            mode: PaintMode::Paint,
            active_color: active_color.into(),
            state: DragState::Idle,
        }
    }

    #[must_use]
    pub fn mode(&self) -> PaintMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: PaintMode) {
        self.mode = mode;
    }

    /// Change de mode par nom. Nom inconnu : mode courant conservé, retourne `false`.
    pub fn set_mode_by_name(&mut self, name: &str) -> bool {
        match PaintMode::parse(name) {
            Some(mode) => {
                self.mode = mode;
                true
            }
            None => {
                log::warn!("Mode de peinture inconnu '{name}', ignoré.");
                false
            }
        }
    }

    #[must_use]
    pub fn active_color(&self) -> Color {
        self.active_color
    }

    pub fn set_active_color(&mut self, color: impl Into<Color>) {
        self.active_color = color.into();
    }

    #[must_use]
    pub fn state(&self) -> DragState {
        self.state
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.state == DragState::Dragging
    }

    /// Idle → Dragging, puis action immédiate sur `(row, col)`.
    pub fn pointer_down(&mut self, grid: &mut GridBuffer, row: usize, col: usize) {
        self.state = DragState::Dragging;
        self.apply(grid, row, col);
    }

    /// Ré-applique l'action pendant un glisser ; no-op hors glisser.
    pub fn pointer_enter(&mut self, grid: &mut GridBuffer, row: usize, col: usize) {
        if self.state == DragState::Dragging {
            self.apply(grid, row, col);
        }
    }

    /// Fin de glisser (bouton relâché n'importe où). Idempotent.
    pub fn pointer_release(&mut self) {
        self.state = DragState::Idle;
    }

    /// Fin de glisser (pointeur sorti de la zone peignable). Idempotent.
    pub fn pointer_leave(&mut self) {
        self.state = DragState::Idle;
    }

    fn apply(&mut self, grid: &mut GridBuffer, row: usize, col: usize) {
        match self.mode {
            PaintMode::Paint => {
                grid.set(row, col, self.active_color);
            }
            PaintMode::Erase => {
                grid.set(row, col, Color::WHITE);
            }
            PaintMode::Sample => {
                if let Some(color) = grid.get(row, col) {
                    self.active_color = color;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> Color {
        Color::from_rgb(0xef, 0x44, 0x44)
    }

    #[test]
    fn release_ends_the_drag() {
        let mut grid = GridBuffer::new(5).unwrap();
        let mut ctl = PaintController::new(red());
        ctl.pointer_down(&mut grid, 0, 0);
        ctl.pointer_enter(&mut grid, 0, 1);
        ctl.pointer_enter(&mut grid, 0, 2);
        ctl.pointer_release();
        ctl.pointer_enter(&mut grid, 0, 3);

        for col in 0..3 {
            assert_eq!(grid.get(0, col), Some(red()), "col {col}");
        }
        assert_eq!(grid.get(0, 3), Some(Color::WHITE));
        assert_eq!(ctl.state(), DragState::Idle);
    }

    #[test]
    fn leave_ends_the_drag() {
        let mut grid = GridBuffer::new(3).unwrap();
        let mut ctl = PaintController::new(red());
        ctl.pointer_down(&mut grid, 1, 1);
        assert!(ctl.is_dragging());
        ctl.pointer_leave();
        ctl.pointer_enter(&mut grid, 2, 2);
        assert_eq!(grid.get(2, 2), Some(Color::WHITE));
    }

    #[test]
    fn enter_while_idle_is_noop() {
        let mut grid = GridBuffer::new(3).unwrap();
        let mut ctl = PaintController::new(red());
        ctl.pointer_enter(&mut grid, 0, 0);
        assert_eq!(grid.get(0, 0), Some(Color::WHITE));
        assert_eq!(ctl.state(), DragState::Idle);
    }

    #[test]
    fn release_and_leave_are_idempotent() {
        let mut ctl = PaintController::new(red());
        ctl.pointer_release();
        ctl.pointer_leave();
        ctl.pointer_release();
        assert_eq!(ctl.state(), DragState::Idle);
    }

    #[test]
    fn erase_restores_background() {
        let mut grid = GridBuffer::new(3).unwrap();
        grid.fill("#000");
        let mut ctl = PaintController::new(red());
        ctl.set_mode(PaintMode::Erase);
        ctl.pointer_down(&mut grid, 0, 0);
        ctl.pointer_enter(&mut grid, 1, 0);
        ctl.pointer_release();
        assert_eq!(grid.get(0, 0), Some(Color::WHITE));
        assert_eq!(grid.get(1, 0), Some(Color::WHITE));
        assert_eq!(grid.get(2, 0), Some(Color::BLACK));
        assert_eq!(ctl.active_color(), red());
    }

    #[test]
    fn sample_picks_color_without_touching_grid() {
        let mut grid = GridBuffer::new(3).unwrap();
        grid.set(2, 1, "#22c55e");
        let before = grid.clone();
        let mut ctl = PaintController::new(red());
        ctl.set_mode(PaintMode::Sample);
        ctl.pointer_down(&mut grid, 2, 1);
        assert_eq!(ctl.active_color(), Color::from_rgb(0x22, 0xc5, 0x5e));
        assert_eq!(grid, before);

        // Sampling outside the grid keeps the current color.
        ctl.pointer_enter(&mut grid, 9, 9);
        assert_eq!(ctl.active_color(), Color::from_rgb(0x22, 0xc5, 0x5e));
    }

    #[test]
    fn sampled_color_is_then_painted() {
        let mut grid = GridBuffer::new(2).unwrap();
        grid.set(0, 0, "#000");
        let mut ctl = PaintController::new(red());
        ctl.set_mode(PaintMode::Sample);
        ctl.pointer_down(&mut grid, 0, 0);
        ctl.pointer_release();
        ctl.set_mode(PaintMode::Paint);
        ctl.pointer_down(&mut grid, 1, 1);
        assert_eq!(grid.get(1, 1), Some(Color::BLACK));
    }

    #[test]
    fn unknown_mode_name_keeps_current_mode() {
        let mut ctl = PaintController::new(red());
        ctl.set_mode(PaintMode::Erase);
        assert!(!ctl.set_mode_by_name("blur"));
        assert_eq!(ctl.mode(), PaintMode::Erase);
        assert!(ctl.set_mode_by_name(" SAMPLE "));
        assert_eq!(ctl.mode(), PaintMode::Sample);
    }
}

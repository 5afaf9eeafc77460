use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::Block;

/// Largeur fixe de la barre latérale.
pub const SIDEBAR_WIDTH: u16 = 30;

/// Colonnes terminal par cellule de grille (cellules à peu près carrées).
pub const CELL_WIDTH: u16 = 2;

/// Découpage de l'écran, partagé entre le dessin et le hit-testing souris.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenLayout {
    /// Canvas block including its border.
    pub canvas: Rect,
    /// Zone intérieure où les cellules sont dessinées.
    pub grid: Rect,
    /// Text preview pane, absent when hidden.
    pub preview: Option<Rect>,
    pub sidebar: Rect,
}

/// Calcule la disposition pour un écran `area`.
///
/// # Example
/// ```
/// use ratatui::layout::Rect;
/// use ts_render::layout::{compute_layout, SIDEBAR_WIDTH};
/// let layout = compute_layout(Rect::new(0, 0, 120, 40), 16, true);
/// assert_eq!(layout.sidebar.width, SIDEBAR_WIDTH);
/// assert_eq!(layout.preview.map(|p| p.width), Some(18));
/// ```
#[must_use]
pub fn compute_layout(area: Rect, grid_size: usize, show_preview: bool) -> ScreenLayout {
    let preview_width = if show_preview {
        u16::try_from(grid_size).unwrap_or(u16::MAX).saturating_add(2)
    } else {
        0
    };
    let [canvas, preview, sidebar] = Layout::horizontal([
        Constraint::Min(10),
        Constraint::Length(preview_width),
        Constraint::Length(SIDEBAR_WIDTH),
    ])
    .areas(area);

    ScreenLayout {
        canvas,
        grid: Block::bordered().inner(canvas),
        preview: (show_preview && preview.width > 0).then_some(preview),
        sidebar,
    }
}

/// Cellule `(row, col)` sous la position terminal `(column, row)`.
///
/// `None` hors de la zone grille, hors de la grille, ou si la cellule est
/// rognée par une fenêtre trop petite.
///
/// # Example
/// ```
/// use ratatui::layout::Rect;
/// use ts_render::layout::cell_at;
/// let area = Rect::new(1, 1, 20, 10);
/// assert_eq!(cell_at(area, 8, 1, 1), Some((0, 0)));
/// assert_eq!(cell_at(area, 8, 4, 3), Some((2, 1)));
/// assert_eq!(cell_at(area, 8, 0, 0), None);
/// ```
#[must_use]
pub fn cell_at(grid_area: Rect, grid_size: usize, column: u16, row: u16) -> Option<(usize, usize)> {
    if column < grid_area.x || row < grid_area.y {
        return None;
    }
    let dx = column - grid_area.x;
    let dy = row - grid_area.y;
    if dx >= grid_area.width || dy >= grid_area.height {
        return None;
    }
    let col = usize::from(dx / CELL_WIDTH);
    let row = usize::from(dy);
    let visible_cols = usize::from(grid_area.width / CELL_WIDTH);
    (row < grid_size && col < grid_size && col < visible_cols).then_some((row, col))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_is_inside_canvas_border() {
        let layout = compute_layout(Rect::new(0, 0, 100, 30), 16, false);
        assert_eq!(layout.preview, None);
        assert_eq!(layout.canvas.width, 100 - SIDEBAR_WIDTH);
        assert_eq!(layout.grid.x, layout.canvas.x + 1);
        assert_eq!(layout.grid.y, layout.canvas.y + 1);
        assert_eq!(layout.grid.height, 28);
    }

    #[test]
    fn hit_test_uses_double_width_cells() {
        let area = Rect::new(10, 5, 40, 20);
        assert_eq!(cell_at(area, 16, 10, 5), Some((0, 0)));
        assert_eq!(cell_at(area, 16, 11, 5), Some((0, 0)));
        assert_eq!(cell_at(area, 16, 12, 5), Some((0, 1)));
        assert_eq!(cell_at(area, 16, 41, 20), Some((15, 15)));
    }

    #[test]
    fn hit_test_rejects_outside_and_beyond_grid() {
        let area = Rect::new(10, 5, 40, 20);
        assert_eq!(cell_at(area, 16, 9, 5), None);
        assert_eq!(cell_at(area, 16, 10, 4), None);
        assert_eq!(cell_at(area, 16, 50, 5), None);
        // Inside the area but past the last column / row of an 8×8 grid.
        assert_eq!(cell_at(area, 8, 26, 5), None);
        assert_eq!(cell_at(area, 8, 10, 13), None);
    }

    #[test]
    fn hit_test_ignores_clipped_half_cell() {
        let area = Rect::new(0, 0, 5, 5);
        assert_eq!(cell_at(area, 16, 3, 0), Some((0, 1)));
        assert_eq!(cell_at(area, 16, 4, 0), None);
    }
}

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color as TermColor;
use ts_core::color::Color;
use ts_core::grid::GridBuffer;
use ts_core::symbol_map::SymbolLookup;

use crate::layout::CELL_WIDTH;

#[inline]
pub fn term_color(color: Color) -> TermColor {
    let (r, g, b) = color.rgb();
    TermColor::Rgb(r, g, b)
}

/// Couleur de texte lisible sur un fond `bg`.
#[inline]
fn contrast_fg(bg: Color) -> TermColor {
    if bg.luminance() > 140 {
        TermColor::Black
    } else {
        TermColor::White
    }
}

/// Écrit directement une `GridBuffer` dans un `ratatui::Buffer`.
///
/// Chaque cellule occupe `CELL_WIDTH` colonnes, fond = couleur de la cellule,
/// symbole exporté dans la première colonne. Les cellules qui ne tiennent pas
/// dans `area` sont rognées.
pub fn render_grid(buf: &mut Buffer, area: Rect, grid: &GridBuffer, lookup: &SymbolLookup) {
    let visible_cols = area.width / CELL_WIDTH;
    for (cy, row) in grid.rows().enumerate().take(usize::from(area.height)) {
        for (cx, &color) in row.iter().enumerate().take(usize::from(visible_cols)) {
            let bg = term_color(color);
            let fg = contrast_fg(color);
            let symbol = lookup.resolve(color);
            let buf_x = area.x + cx as u16 * CELL_WIDTH;
            let buf_y = area.y + cy as u16;
            for dx in 0..CELL_WIDTH {
                if let Some(cell) = buf.cell_mut((buf_x + dx, buf_y)) {
                    let ch = if dx == 0 { symbol } else { ' ' };
                    cell.set_char(ch).set_fg(fg).set_bg(bg);
                }
            }
        }
    }
}

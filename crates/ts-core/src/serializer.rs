use std::fmt::Write as _;

use crate::color::Color;
use crate::error::CoreError;
use crate::grid::{GridBuffer, MAX_GRID_SIZE};
use crate::symbol_map::{BLANK_SYMBOL, SymbolMap};

const SIZE_PREFIX: &str = "# Grid Size: ";
/// Second header line, fixed.
pub const FORMAT_LINE: &str = "# Format: rows of symbols based on color mapping";
const LEGEND_PREFIX: &str = "# Legend: ";

/// Options de sérialisation. Le défaut produit le format de base, sans légende.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Insère une ligne `# Legend: '<sym>' = #rrggbb` par couleur mappée après l'en-tête.
    pub include_legend: bool,
}

/// Sérialise la grille : en-tête de deux lignes puis `size` lignes de `size` symboles.
///
/// Fonction pure et déterministe. Pas de saut de ligne final.
///
/// # Example
/// ```
/// use ts_core::{GridBuffer, SymbolMap, serialize};
/// let mut grid = GridBuffer::new(2).unwrap();
/// grid.set(0, 1, "#000");
/// let text = serialize(&grid, &SymbolMap::seeded());
/// assert_eq!(
///     text,
///     "# Grid Size: 2x2\n# Format: rows of symbols based on color mapping\n +\n  "
/// );
/// ```
#[must_use]
pub fn serialize(grid: &GridBuffer, map: &SymbolMap) -> String {
    serialize_with(grid, map, SerializeOptions::default())
}

/// Comme [`serialize`], avec options.
#[must_use]
pub fn serialize_with(grid: &GridBuffer, map: &SymbolMap, options: SerializeOptions) -> String {
    let size = grid.size();
    let lookup = map.build_lookup();
    let mut out = String::with_capacity(128 + size * (size + 1));

    let _ = write!(out, "{SIZE_PREFIX}{size}x{size}\n{FORMAT_LINE}");
    if options.include_legend {
        for line in legend(map) {
            out.push('\n');
            out.push_str(&line);
        }
    }
    for row in grid.rows() {
        out.push('\n');
        out.extend(row.iter().map(|&color| lookup.resolve(color)));
    }
    out
}

/// Lignes de légende, triées par couleur.
///
/// # Example
/// ```
/// use ts_core::SymbolMap;
/// use ts_core::serializer::legend;
/// let lines = legend(&SymbolMap::seeded());
/// assert_eq!(lines[0], "# Legend: '+' = #000000");
/// ```
#[must_use]
pub fn legend(map: &SymbolMap) -> Vec<String> {
    map.build_lookup()
        .sorted()
        .into_iter()
        .map(|(color, symbol)| format!("{LEGEND_PREFIX}'{symbol}' = {color}"))
        .collect()
}

fn malformed(line: usize, reason: impl Into<String>) -> CoreError {
    CoreError::MalformedMap {
        line,
        reason: reason.into(),
    }
}

fn parse_size(header: &str) -> Option<usize> {
    let dims = header.strip_prefix(SIZE_PREFIX)?.trim();
    let (w, h) = dims.split_once('x')?;
    let w: usize = w.parse().ok()?;
    let h: usize = h.parse().ok()?;
    (w == h && w > 0).then_some(w)
}

/// Relit une carte texte produite par [`serialize_with`].
///
/// Chaque symbole est reconverti via la table inverse de `map` ; un symbole
/// inconnu donne `#ffffff`. Les lignes trop courtes sont complétées par des
/// blancs (espaces finaux retirés par un éditeur).
///
/// # Errors
/// Returns `CoreError::MalformedMap` if the header is missing or invalid, if a
/// row is longer than the grid, or if the row count does not match.
///
/// # Example
/// ```
/// use ts_core::{GridBuffer, SymbolMap, serialize};
/// use ts_core::serializer::parse_map;
/// let mut grid = GridBuffer::new(3).unwrap();
/// grid.set(2, 2, "#ef4444");
/// let map = SymbolMap::seeded();
/// let back = parse_map(&serialize(&grid, &map), &map).unwrap();
/// assert_eq!(back, grid);
/// ```
pub fn parse_map(text: &str, map: &SymbolMap) -> Result<GridBuffer, CoreError> {
    let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l)).peekable();

    let (_, header) = lines.next().ok_or_else(|| malformed(1, "texte vide"))?;
    let size = parse_size(header)
        .ok_or_else(|| malformed(1, format!("en-tête de taille attendu, lu {header:?}")))?;
    if size > MAX_GRID_SIZE {
        return Err(malformed(
            1,
            format!("taille {size} au-delà du maximum {MAX_GRID_SIZE}"),
        ));
    }

    match lines.next() {
        Some((_, line)) if line == FORMAT_LINE => {}
        Some((n, line)) => return Err(malformed(n, format!("ligne de format attendue, lu {line:?}"))),
        None => return Err(malformed(2, "ligne de format manquante")),
    }
    while lines.next_if(|(_, l)| l.starts_with(LEGEND_PREFIX)).is_some() {}

    let reverse = map.build_reverse_lookup();
    let mut grid = GridBuffer::new(size)?;
    let mut row = 0;
    for (n, line) in lines {
        if row == size {
            if line.trim().is_empty() {
                continue;
            }
            return Err(malformed(n, format!("plus de {size} lignes")));
        }
        let count = line.chars().count();
        if count > size {
            return Err(malformed(
                n,
                format!("{count} symboles pour une grille de {size}"),
            ));
        }
        let symbols = line
            .chars()
            .chain(std::iter::repeat(BLANK_SYMBOL))
            .take(size);
        for (col, symbol) in symbols.enumerate() {
            let color = reverse.get(&symbol).copied().unwrap_or(Color::WHITE);
            grid.set(row, col, color);
        }
        row += 1;
    }
    if row < size {
        return Err(malformed(
            text.lines().count(),
            format!("{row} lignes sur {size}"),
        ));
    }
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol_map::SymbolEntry;

    fn body(text: &str) -> Vec<&str> {
        text.lines().skip(2).collect()
    }

    #[test]
    fn fresh_grid_is_all_blank() {
        let grid = GridBuffer::new(5).unwrap();
        let text = serialize(&grid, &SymbolMap::seeded());
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("# Grid Size: 5x5"));
        assert_eq!(lines.next(), Some(FORMAT_LINE));
        let rows: Vec<&str> = lines.collect();
        assert_eq!(rows, vec!["     "; 5]);
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn painted_cell_resolves_through_mapping() {
        let mut grid = GridBuffer::new(4).unwrap();
        grid.set(1, 2, "#ef4444");
        let text = serialize(&grid, &SymbolMap::seeded());
        assert_eq!(body(&text), vec!["    ", "  0 ", "    ", "    "]);
    }

    #[test]
    fn fill_gives_identical_rows() {
        let mut grid = GridBuffer::new(3).unwrap();
        grid.fill("#22c55e");
        let text = serialize(&grid, &SymbolMap::seeded());
        assert_eq!(body(&text), vec!["111"; 3]);
    }

    #[test]
    fn unmapped_colors_are_blank() {
        let mut grid = GridBuffer::new(2).unwrap();
        grid.fill("#3b82f6");
        let text = serialize(&grid, &SymbolMap::seeded());
        assert_eq!(body(&text), vec!["  "; 2]);
    }

    #[test]
    fn serialize_is_pure_and_deterministic() {
        let mut grid = GridBuffer::new(6).unwrap();
        grid.set(0, 0, "#000");
        grid.set(5, 5, "#ef4444");
        let map = SymbolMap::seeded();
        let (grid_before, map_before) = (grid.clone(), map.clone());
        let a = serialize(&grid, &map);
        let b = serialize(&grid, &map);
        assert_eq!(a, b);
        assert_eq!(grid, grid_before);
        assert_eq!(map, map_before);
    }

    #[test]
    fn legend_is_opt_in() {
        let grid = GridBuffer::new(1).unwrap();
        let map = SymbolMap::seeded();
        let plain = serialize(&grid, &map);
        assert!(!plain.contains("Legend"));

        let text = serialize_with(&grid, &map, SerializeOptions { include_legend: true });
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "# Grid Size: 1x1",
                FORMAT_LINE,
                "# Legend: '+' = #000000",
                "# Legend: '1' = #22c55e",
                "# Legend: '0' = #ef4444",
                "# Legend: ' ' = #ffffff",
                " ",
            ]
        );
    }

    #[test]
    fn parse_round_trips_mapped_colors() {
        let map = SymbolMap::seeded();
        let mut grid = GridBuffer::new(4).unwrap();
        grid.set(0, 0, "#000");
        grid.set(1, 3, "#ef4444");
        grid.set(3, 2, "#22c55e");
        let text = serialize_with(&grid, &map, SerializeOptions { include_legend: true });
        assert_eq!(parse_map(&text, &map).unwrap(), grid);
    }

    #[test]
    fn parse_maps_unknown_symbols_to_white() {
        let map = SymbolMap::seeded();
        let text = format!("# Grid Size: 2x2\n{FORMAT_LINE}\n+?\n?0");
        let grid = parse_map(&text, &map).unwrap();
        assert_eq!(grid.get(0, 0), Some(Color::BLACK));
        assert_eq!(grid.get(0, 1), Some(Color::WHITE));
        assert_eq!(grid.get(1, 1), Some(Color::from_rgb(0xef, 0x44, 0x44)));
    }

    #[test]
    fn parse_pads_stripped_rows_and_accepts_crlf() {
        let map = SymbolMap::seeded();
        let text = format!("# Grid Size: 3x3\r\n{FORMAT_LINE}\r\n+\r\n\r\n  1\r\n");
        let grid = parse_map(&text, &map).unwrap();
        assert_eq!(grid.get(0, 0), Some(Color::BLACK));
        assert_eq!(grid.get(0, 2), Some(Color::WHITE));
        assert_eq!(grid.get(2, 2), Some(Color::from_rgb(0x22, 0xc5, 0x5e)));
    }

    #[test]
    fn parse_uses_custom_entries() {
        let mut map = SymbolMap::default();
        map.add(SymbolEntry::new("#3b82f6", "~"));
        let text = format!("# Grid Size: 1x1\n{FORMAT_LINE}\n~");
        let grid = parse_map(&text, &map).unwrap();
        assert_eq!(grid.get(0, 0), Some(Color::from_rgb(0x3b, 0x82, 0xf6)));
    }

    #[test]
    fn parse_rejects_malformed_maps() {
        let map = SymbolMap::seeded();
        let cases = [
            (String::new(), 1),
            ("hello".to_string(), 1),
            ("# Grid Size: 2x3".to_string(), 1),
            ("# Grid Size: 0x0".to_string(), 1),
            (format!("# Grid Size: 4294967296x4294967296\n{FORMAT_LINE}\n+"), 1),
            (format!("# Grid Size: 1000000x1000000\n{FORMAT_LINE}\n+"), 1),
            (format!("# Grid Size: 257x257\n{FORMAT_LINE}\n+"), 1),
            ("# Grid Size: 2x2\n# Format: other".to_string(), 2),
            (format!("# Grid Size: 2x2\n{FORMAT_LINE}\n   \n  "), 3),
            (format!("# Grid Size: 2x2\n{FORMAT_LINE}\n  \n  \n+"), 5),
            (format!("# Grid Size: 2x2\n{FORMAT_LINE}\n  "), 3),
        ];
        for (text, expected_line) in cases {
            match parse_map(&text, &map) {
                Err(CoreError::MalformedMap { line, .. }) => {
                    assert_eq!(line, expected_line, "text {text:?}");
                }
                other => panic!("expected MalformedMap for {text:?}, got {other:?}"),
            }
        }
    }
}

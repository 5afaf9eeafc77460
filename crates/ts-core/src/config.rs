use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::CoreError;
use crate::paint::PaintMode;
use crate::symbol_map::{SymbolEntry, SymbolMap};

/// Tailles de grille autorisées (côté, en cellules).
pub const GRID_SIZES: &[usize] = &[8, 12, 16, 24, 32, 48, 64];

/// Taille par défaut.
pub const DEFAULT_GRID_SIZE: usize = 16;

/// Nombre maximal de pastilles de palette (touches 1 à 9).
pub const MAX_PALETTE: usize = 9;

/// Palette par défaut.
pub const DEFAULT_PALETTE: &[&str] = &[
    "#000000", "#ffffff", "#ef4444", "#22c55e", "#3b82f6", "#eab308", "#a855f7", "#f97316",
];

/// Configuration complète de l'éditeur.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use ts_core::config::SketchConfig;
/// let config = SketchConfig::default();
/// assert_eq!(config.grid_size, 16);
/// assert_eq!(config.mappings.len(), 4);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SketchConfig {
    // === Grille ===
    /// Côté de la grille, l'une des valeurs de `GRID_SIZES`.
    pub grid_size: usize,
    /// Couleur active initiale.
    pub active_color: Color,
    /// Mode de peinture initial.
    pub initial_mode: PaintMode,
    /// Pastilles sélectionnables par les touches 1 à 9.
    pub palette: Vec<Color>,

    // === Mapping ===
    /// Table couleur → symbole initiale.
    pub mappings: SymbolMap,

    // === Export ===
    /// Dossier où le sink fichier dépose les cartes.
    pub export_dir: PathBuf,
    /// Ajoute la légende après l'en-tête.
    pub include_legend: bool,

    // === UI ===
    /// Afficher l'aperçu texte à côté du canevas.
    pub show_preview: bool,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            active_color: Color::BLACK,
            initial_mode: PaintMode::Paint,
            palette: DEFAULT_PALETTE.iter().map(|&c| Color::from(c)).collect(),
            mappings: SymbolMap::seeded(),
            export_dir: PathBuf::from("exports"),
            include_legend: false,
            show_preview: true,
        }
    }
}

/// Ramène `size` à la taille autorisée la plus proche (la plus petite en cas d'égalité).
///
/// # Example
/// ```
/// use ts_core::config::snap_grid_size;
/// assert_eq!(snap_grid_size(16), 16);
/// assert_eq!(snap_grid_size(20), 16);
/// assert_eq!(snap_grid_size(1000), 64);
/// ```
#[must_use]
pub fn snap_grid_size(size: usize) -> usize {
    GRID_SIZES
        .iter()
        .copied()
        .min_by_key(|&s| s.abs_diff(size))
        .unwrap_or(DEFAULT_GRID_SIZE)
}

/// Taille suivante (ou précédente) dans `GRID_SIZES`, bornée aux extrémités.
#[must_use]
pub fn step_grid_size(current: usize, forward: bool) -> usize {
    let idx = GRID_SIZES
        .iter()
        .position(|&s| s == snap_grid_size(current))
        .unwrap_or(0);
    let next = if forward {
        (idx + 1).min(GRID_SIZES.len() - 1)
    } else {
        idx.saturating_sub(1)
    };
    GRID_SIZES[next]
}

impl SketchConfig {
    /// Ramène chaque champ dans son domaine valide.
    /// Appelé après désérialisation TOML et après les overrides CLI.
    pub fn sanitize(&mut self) {
        let snapped = snap_grid_size(self.grid_size);
        if snapped != self.grid_size {
            log::warn!(
                "Taille de grille {} non supportée, utilisation de {snapped}. Tailles : {GRID_SIZES:?}",
                self.grid_size
            );
            self.grid_size = snapped;
        }
        if self.palette.is_empty() {
            self.palette = Self::default().palette;
        }
        if self.palette.len() > MAX_PALETTE {
            log::warn!(
                "Palette de {} couleurs tronquée à {MAX_PALETTE}",
                self.palette.len()
            );
            self.palette.truncate(MAX_PALETTE);
        }
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    grid: Option<GridSection>,
    mappings: Option<Vec<SymbolEntry>>,
    export: Option<ExportSection>,
    ui: Option<UiSection>,
}

/// Grid section of the TOML config, all fields optional for partial override.
#[derive(Deserialize)]
struct GridSection {
    size: Option<usize>,
    active_color: Option<Color>,
    mode: Option<String>,
    palette: Option<Vec<Color>>,
}

#[derive(Deserialize)]
struct ExportSection {
    directory: Option<PathBuf>,
    include_legend: Option<bool>,
}

#[derive(Deserialize)]
struct UiSection {
    show_preview: Option<bool>,
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use ts_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<SketchConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Erreur de parsing TOML dans {}", path.display()))
}

/// Comme [`load_config`], depuis une chaîne.
///
/// # Errors
/// Returns an error if `content` is not valid TOML for this schema.
pub fn parse_config(content: &str) -> Result<SketchConfig> {
    let file: ConfigFile =
        toml::from_str(content).map_err(|e| CoreError::Config(e.to_string()))?;
    let mut config = SketchConfig::default();

    if let Some(g) = file.grid {
        if let Some(v) = g.size {
            config.grid_size = v;
        }
        if let Some(v) = g.active_color {
            config.active_color = v;
        }
        if let Some(v) = g.mode {
            match PaintMode::parse(&v) {
                Some(mode) => config.initial_mode = mode,
                None => log::warn!("Mode inconnu '{v}', utilisation du défaut."),
            }
        }
        if let Some(v) = g.palette {
            config.palette = v;
        }
    }
    if let Some(v) = file.mappings {
        config.mappings = SymbolMap::new(v);
    }
    if let Some(e) = file.export {
        if let Some(v) = e.directory {
            config.export_dir = v;
        }
        if let Some(v) = e.include_legend {
            config.include_legend = v;
        }
    }
    if let Some(u) = file.ui
        && let Some(v) = u.show_preview
    {
        config.show_preview = v;
    }

    config.sanitize();
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(parse_config("").unwrap(), SketchConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = parse_config(
            r##"
            [grid]
            size = 32
            active_color = "rgb(239, 68, 68)"
            mode = "erase"

            [export]
            include_legend = true
            "##,
        )
        .unwrap();
        assert_eq!(config.grid_size, 32);
        assert_eq!(config.active_color.to_string(), "#ef4444");
        assert_eq!(config.initial_mode, PaintMode::Erase);
        assert!(config.include_legend);
        assert_eq!(config.export_dir, PathBuf::from("exports"));
        assert_eq!(config.mappings, SymbolMap::seeded());
        assert!(config.show_preview);
    }

    #[test]
    fn mappings_replace_the_seed() {
        let config = parse_config(
            r##"
            [[mappings]]
            color = "#FFF"
            symbol = "."

            [[mappings]]
            color = "#000"
            symbol = "#"
            "##,
        )
        .unwrap();
        assert_eq!(config.mappings.len(), 2);
        assert_eq!(config.mappings.resolve("#ffffff"), '.');
        assert_eq!(config.mappings.resolve("#ef4444"), ' ');
    }

    #[test]
    fn invalid_values_are_sanitized() {
        let config = parse_config(
            r##"
            [grid]
            size = 0
            mode = "smudge"
            palette = []
            "##,
        )
        .unwrap();
        assert_eq!(config.grid_size, 8);
        assert_eq!(config.initial_mode, PaintMode::Paint);
        assert_eq!(config.palette.len(), DEFAULT_PALETTE.len());

        let many: Vec<String> = (0..12).map(|i| format!("\"#0000{i:02x}\"")).collect();
        let config = parse_config(&format!("[grid]\npalette = [{}]", many.join(", "))).unwrap();
        assert_eq!(config.palette.len(), MAX_PALETTE);
    }

    #[test]
    fn bad_colors_fall_back_to_black() {
        let config = parse_config("[grid]\nactive_color = \"chartreuse\"").unwrap();
        assert_eq!(config.active_color, Color::BLACK);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(parse_config("[grid\nsize = 8").is_err());
        let err = parse_config("[grid]\nsize = \"big\"").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CoreError>(),
            Some(CoreError::Config(_))
        ));
    }

    #[test]
    fn grid_size_steps_are_bounded() {
        assert_eq!(step_grid_size(16, true), 24);
        assert_eq!(step_grid_size(16, false), 12);
        assert_eq!(step_grid_size(64, true), 64);
        assert_eq!(step_grid_size(8, false), 8);
        assert_eq!(snap_grid_size(10), 8);
        assert_eq!(snap_grid_size(14), 12);
    }

    #[test]
    fn load_config_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[grid]\nsize = 48\n\n[ui]\nshow_preview = false").unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.grid_size, 48);
        assert!(!config.show_preview);
    }

    #[test]
    fn load_config_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }
}

use std::path::PathBuf;

use clap::Parser;

/// tileSketch: terminal grid painter exporting text maps.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Côté de la grille : 8, 12, 16, 24, 32, 48 ou 64.
    #[arg(long)]
    pub size: Option<usize>,

    /// Couleur active initiale (#rgb, #rrggbb ou rgb(r, g, b)).
    #[arg(long)]
    pub color: Option<String>,

    /// Mode initial : paint, erase, sample.
    #[arg(long)]
    pub mode: Option<String>,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Écrire les logs dans ce fichier (stderr sinon).
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

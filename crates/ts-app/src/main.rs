use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture};
use ts_core::config::{SketchConfig, load_config};
use ts_core::paint::PaintMode;

pub mod app;
pub mod cli;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging (fichier si demandé : le TUI occupe le terminal)
    let mut logger = env_logger::Builder::new();
    logger.filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn));
    if let Some(ref path) = cli.log_file {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Impossible de créer le log {}", path.display()))?;
        logger.target(env_logger::Target::Pipe(Box::new(file)));
    }
    logger.init();

    // 3. Charger la config
    let mut config = resolve_config(&cli)?;

    // 3b. Appliquer les overrides CLI
    if let Some(size) = cli.size {
        config.grid_size = size;
    }
    if let Some(ref color) = cli.color {
        config.active_color = ts_core::normalize(color);
    }
    if let Some(ref mode) = cli.mode {
        match PaintMode::parse(mode) {
            Some(parsed) => config.initial_mode = parsed,
            None => log::warn!("Mode inconnu '{mode}', utilisation du défaut."),
        }
    }
    config.sanitize();

    // 4. Construire l'App
    let mut app_instance = app::App::new(config)?;

    // 5. Initialiser le terminal ratatui + souris
    let terminal = ratatui::init();
    let result = crossterm::execute!(std::io::stdout(), EnableMouseCapture, EnableFocusChange)
        .context("Capture souris indisponible")
        .and_then(|()| app_instance.run(terminal));

    // 6. Restaurer le terminal (TOUJOURS, même en cas d'erreur)
    crossterm::execute!(std::io::stdout(), DisableFocusChange, DisableMouseCapture).ok();
    ratatui::restore();

    result
}

/// Config file if present, defaults otherwise.
fn resolve_config(cli: &cli::Cli) -> Result<SketchConfig> {
    if cli.config.exists() {
        let config = load_config(&cli.config)?;
        log::info!("Config chargée : {}", cli.config.display());
        Ok(config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(SketchConfig::default())
    }
}

use std::path::PathBuf;

use ts_core::export::{ExportOutcome, ExportSink};

use crate::write_map;

const SAVE_TITLE: &str = "Save Map · tileSketch";

/// Dialog natif « Enregistrer sous » (via `rfd`).
///
/// Le TUI doit être suspendu par l'appelant pendant `send` (le dialog est bloquant).
pub struct DialogSink {
    start_dir: PathBuf,
}

impl DialogSink {
    #[must_use]
    pub fn new(start_dir: PathBuf) -> Self {
        Self { start_dir }
    }
}

/// `false` sous Linux/BSD sans serveur graphique : le dialog ne pourrait pas s'ouvrir.
#[must_use]
pub fn graphical_session_available() -> bool {
    if cfg!(any(target_os = "windows", target_os = "macos")) {
        return true;
    }
    ["DISPLAY", "WAYLAND_DISPLAY"]
        .iter()
        .any(|var| std::env::var_os(var).is_some_and(|v| !v.is_empty()))
}

impl ExportSink for DialogSink {
    fn name(&self) -> &'static str {
        "dialog"
    }

    fn send(&mut self, text: &str, suggested_filename: &str) -> ExportOutcome {
        if !graphical_session_available() {
            return ExportOutcome::Failed("pas de session graphique pour le dialog".to_string());
        }

        let mut dialog = rfd::FileDialog::new()
            .set_title(SAVE_TITLE)
            .set_file_name(suggested_filename)
            .add_filter("Text map", &["txt"]);
        if self.start_dir.is_dir() {
            dialog = dialog.set_directory(&self.start_dir);
        }

        let Some(path) = dialog.save_file() else {
            log::info!("Dialog d'enregistrement fermé sans choix");
            return ExportOutcome::Cancelled;
        };
        match write_map(&path, text) {
            Ok(()) => ExportOutcome::Saved(path),
            Err(e) => ExportOutcome::Failed(format!("{e:#}")),
        }
    }
}

//! Concrete export sinks for tileSketch.
//!
//! Each sink implements `ts_core::ExportSink`; `default_chain` wires them in
//! the order native dialog → export directory → clipboard.

pub mod clipboard;
pub mod dialog;
pub mod directory;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ts_core::export::{ExportSink, FallbackChain};

pub use clipboard::ClipboardSink;
pub use dialog::DialogSink;
pub use directory::DirectorySink;

/// Écrit `text` tel quel dans `path`, en créant le dossier parent.
///
/// # Errors
/// Returns an error if the parent directory cannot be created or the file
/// cannot be written.
pub fn write_map(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer {}", parent.display()))?;
    }
    std::fs::write(path, text)
        .with_context(|| format!("Impossible d'écrire {}", path.display()))?;
    log::debug!("Carte écrite : {} ({} octets)", path.display(), text.len());
    Ok(())
}

/// Chaîne par défaut : dialog natif, puis dossier d'export, puis presse-papiers.
#[must_use]
pub fn default_chain(export_dir: PathBuf) -> FallbackChain {
    let sinks: Vec<Box<dyn ExportSink>> = vec![
        Box::new(DialogSink::new(export_dir.clone())),
        Box::new(DirectorySink::new(export_dir)),
        Box::new(ClipboardSink),
    ];
    FallbackChain::new(sinks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_map_creates_parent_and_keeps_text_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/map.txt");
        write_map(&path, "# Grid Size: 1x1\nx").unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "# Grid Size: 1x1\nx");
    }

    #[test]
    fn write_map_reports_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "").unwrap();
        let err = write_map(&blocker.join("map.txt"), "x").unwrap_err();
        assert!(err.to_string().contains("file"), "{err}");
    }

    #[test]
    fn chain_falls_through_to_next_directory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, "").unwrap();
        let good = dir.path().join("exports");

        let sinks: Vec<Box<dyn ExportSink>> = vec![
            Box::new(DirectorySink::new(blocker)),
            Box::new(DirectorySink::new(good.clone())),
        ];
        let outcome = FallbackChain::new(sinks).send("+", "map_20240101_000000.txt");
        assert_eq!(
            outcome,
            ts_core::ExportOutcome::Downloaded(good.join("map_20240101_000000.txt"))
        );
    }
}

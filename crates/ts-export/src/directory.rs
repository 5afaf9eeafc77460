use std::path::PathBuf;

use ts_core::export::{ExportOutcome, ExportSink};

use crate::write_map;

/// Dépose la carte dans un dossier fixe, sans interaction.
///
/// # Example
/// ```no_run
/// use ts_core::export::ExportSink;
/// use ts_export::DirectorySink;
/// let mut sink = DirectorySink::new("exports".into());
/// let outcome = sink.send("# Grid Size: 1x1", "map_20240101_000000.txt");
/// ```
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    #[must_use]
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl ExportSink for DirectorySink {
    fn name(&self) -> &'static str {
        "directory"
    }

    fn send(&mut self, text: &str, suggested_filename: &str) -> ExportOutcome {
        let path = self.dir.join(suggested_filename);
        match write_map(&path, text) {
            Ok(()) => ExportOutcome::Downloaded(path),
            Err(e) => ExportOutcome::Failed(format!("{e:#}")),
        }
    }
}

use ts_core::export::{ExportOutcome, ExportSink};

/// Copie la carte dans le presse-papiers système (via `arboard`).
pub struct ClipboardSink;

impl ExportSink for ClipboardSink {
    fn name(&self) -> &'static str {
        "clipboard"
    }

    fn send(&mut self, text: &str, _suggested_filename: &str) -> ExportOutcome {
        let result = arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text));
        match result {
            Ok(()) => ExportOutcome::Copied,
            Err(e) => ExportOutcome::Failed(format!("presse-papiers indisponible : {e}")),
        }
    }
}

use std::path::PathBuf;

use chrono::{Local, NaiveDateTime};

/// Résultat d'une livraison de texte exporté.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Written where the user chose (native dialog).
    Saved(PathBuf),
    /// Dropped into the export directory without asking.
    Downloaded(PathBuf),
    /// Placed on the system clipboard.
    Copied,
    /// User dismissed the sink; nothing else should be tried.
    Cancelled,
    /// Delivery failed; the reason is shown to the user.
    Failed(String),
}

impl ExportOutcome {
    /// Message de statut affiché dans la barre latérale.
    ///
    /// # Example
    /// ```
    /// use ts_core::ExportOutcome;
    /// assert_eq!(ExportOutcome::Copied.status_message(), "Copié dans le presse-papiers");
    /// ```
    #[must_use]
    pub fn status_message(&self) -> String {
        match self {
            Self::Saved(path) => format!("Enregistré : {}", path.display()),
            Self::Downloaded(path) => format!("Exporté : {}", path.display()),
            Self::Copied => "Copié dans le presse-papiers".to_string(),
            Self::Cancelled => "Export annulé".to_string(),
            Self::Failed(reason) => format!("Échec de l'export : {reason}"),
        }
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Capacité externe qui livre le texte exporté à l'utilisateur.
///
/// Implémenté par : `DialogSink`, `DirectorySink`, `ClipboardSink`, `FallbackChain`.
///
/// # Example
/// ```
/// use ts_core::export::{ExportOutcome, ExportSink};
///
/// struct Discard;
/// impl ExportSink for Discard {
///     fn name(&self) -> &'static str { "discard" }
///     fn send(&mut self, _text: &str, _name: &str) -> ExportOutcome { ExportOutcome::Copied }
/// }
/// assert_eq!(Discard.send("x", "map.txt"), ExportOutcome::Copied);
/// ```
pub trait ExportSink {
    /// Nom lisible pour les logs.
    fn name(&self) -> &'static str;

    /// Livre `text`. Ne panique jamais : toute erreur devient `Failed`.
    fn send(&mut self, text: &str, suggested_filename: &str) -> ExportOutcome;
}

/// Essaie chaque sink dans l'ordre jusqu'au premier résultat autre que `Failed`.
///
/// Retourne le dernier échec si tous échouent.
pub struct FallbackChain {
    sinks: Vec<Box<dyn ExportSink>>,
}

impl FallbackChain {
    #[must_use]
    pub fn new(sinks: Vec<Box<dyn ExportSink>>) -> Self {
        Self { sinks }
    }
}

impl ExportSink for FallbackChain {
    fn name(&self) -> &'static str {
        "fallback-chain"
    }

    fn send(&mut self, text: &str, suggested_filename: &str) -> ExportOutcome {
        let mut last = ExportOutcome::Failed("aucun mode d'export disponible".to_string());
        for sink in &mut self.sinks {
            let outcome = sink.send(text, suggested_filename);
            if let ExportOutcome::Failed(ref reason) = outcome {
                log::warn!("Export via {} impossible : {reason}", sink.name());
                last = outcome;
                continue;
            }
            log::info!("Export via {} : {outcome:?}", sink.name());
            return outcome;
        }
        last
    }
}

/// Nom de fichier suggéré `map_YYYYMMDD_HHMMSS.txt` pour un horodatage donné.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use ts_core::export::suggested_filename;
/// let ts = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap().and_hms_opt(7, 5, 42).unwrap();
/// assert_eq!(suggested_filename(&ts), "map_20240309_070542.txt");
/// ```
#[must_use]
pub fn suggested_filename(timestamp: &NaiveDateTime) -> String {
    timestamp.format("map_%Y%m%d_%H%M%S.txt").to_string()
}

/// [`suggested_filename`] à l'heure locale courante.
#[must_use]
pub fn suggested_filename_now() -> String {
    suggested_filename(&Local::now().naive_local())
}

use thiserror::Error;

/// Errors originating from the core module.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoreError {
    /// Grid side length is not strictly positive.
    #[error("Taille de grille invalide : {size}")]
    InvalidGridSize {
        /// Rejected side length.
        size: usize,
    },

    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),

    /// Text map that does not follow the export format.
    #[error("Carte malformée (ligne {line}) : {reason}")]
    MalformedMap {
        /// 1-based line number in the input text.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },
}

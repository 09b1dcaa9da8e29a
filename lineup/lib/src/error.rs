use std::path::PathBuf;

use thiserror::Error;

/// Errors emitted by code block enhancement, selection, and copy operations.
///
/// Every variant is local to one block or one gesture: the enhancement pass
/// records block-level errors and moves on to the next candidate.
#[derive(Debug, Error)]
pub enum LineupError {
    #[error("Structural mismatch in {shape} block: expected `{expected}`")]
    StructuralMismatch {
        shape: &'static str,
        expected: &'static str,
    },

    #[error("Code block has no extractable lines")]
    EmptyContent,

    #[error("Selection node `{id}` not found")]
    MissingSelectionNode { id: String },

    #[error("Enhanced block has no `id` attribute")]
    MissingBlockId,

    #[error("Invalid CSS selector: {0}")]
    InvalidSelector(String),

    #[error("Clipboard write failed: {0}")]
    Clipboard(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Failed to read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type used across the library.
pub type LineupResult<T> = Result<T, LineupError>;

//! Error types for the word-audio pipeline.

use thiserror::Error;

/// Errors produced while resolving configuration or generating audio
#[derive(Debug, Error)]
pub enum WordAudioError {
    /// Invalid CLI/environment combination; aborts the run before any work
    #[error("Configuration error: {0}")]
    Config(String),

    /// A corpus file whose content is not a well-formed array of word entries
    #[error("Invalid corpus file {file}: {message}")]
    Parse { file: String, message: String },

    /// An explicitly requested file is missing
    #[error("Not found: {0}")]
    NotFound(String),

    /// The provider answered with a non-success status
    #[error("Synthesis failed (status {status}): {body}")]
    Synthesis { status: u16, body: String },

    /// Network-level failure (timeout, DNS, connection reset)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Ошибка сериализации/десериализации JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Ошибка ввода-вывода
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Crate-wide Result type
pub type Result<T> = std::result::Result<T, WordAudioError>;

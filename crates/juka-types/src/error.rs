//! Error types for the Juka player.

use std::io;

/// Errors produced by the Juka player.
#[derive(Debug, thiserror::Error)]
pub enum JukaError {
    #[error("backend error: {0}")]
    Backend(String),

    #[error("document error: {0}")]
    Document(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("process error: {0}")]
    Process(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, JukaError>;

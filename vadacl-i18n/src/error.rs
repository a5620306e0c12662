//! Error types for message table loading

use thiserror::Error;

/// Errors raised while building or loading a message table.
///
/// Resolving a message never fails; only loading can.
#[derive(Debug, Error)]
pub enum I18nError {
    /// The table document has an unexpected shape
    #[error("Invalid message table: {0}")]
    InvalidTable(String),

    /// The file could not be loaded or parsed
    #[error("Configuration error: {0}")]
    Config(#[from] vadacl_config::ConfigError),

    /// JSON parse error
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

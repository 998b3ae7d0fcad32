//! CLI error types.

use thiserror::Error;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid command-line argument.
    #[error("invalid argument: {0}")]
    Argument(String),

    /// The API call failed.
    #[error(transparent)]
    Api(#[from] bbbapi::BbbError),

    /// Output could not be rendered.
    #[error("output error: {0}")]
    Output(#[from] serde_json::Error),
}

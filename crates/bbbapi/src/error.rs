//! Error types for API calls.
//!
//! Every façade call either returns a normalized response or fails with a
//! [`BbbError`]. Nothing is retried; failures surface exactly once.

use std::fmt;
use thiserror::Error;

/// The category of a [`BbbError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Connection, DNS or stream failure.
    Transport,
    /// The server reported a failure.
    Api,
    /// The response could not be understood.
    MalformedResponse,
    /// The client configuration is unusable.
    Config,
    /// A request body could not be serialized.
    Encode,
}

impl ErrorKind {
    /// Returns a stable name for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Api => "api",
            Self::MalformedResponse => "malformed_response",
            Self::Config => "config",
            Self::Encode => "encode",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A failure reported by the server, either in the XML body or through the
/// redirect channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Human-readable message.
    pub message: String,
    /// Machine-readable key, e.g. `idNotUnique`.
    pub message_key: String,
    /// The `returncode` value, `FAILED` for redirect-encoded failures.
    pub return_code: String,
}

impl ApiError {
    /// Return code forced on failures decoded from a redirect.
    pub const FAILED: &'static str = "FAILED";

    /// Creates a new API error.
    pub fn new(
        message: impl Into<String>,
        message_key: impl Into<String>,
        return_code: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            message_key: message_key.into(),
            return_code: return_code.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.return_code)?;
        if !self.message_key.is_empty() {
            write!(f, " [{}]", self.message_key)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Errors returned by client operations.
#[derive(Debug, Error)]
pub enum BbbError {
    /// The request could not be delivered or the response not received.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// The server answered with a failure.
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    /// The response body or redirect payload could not be parsed.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The client configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// A request body could not be serialized.
    #[error("encode error: {0}")]
    Encode(String),
}

impl BbbError {
    /// Creates a transport error without an underlying cause.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a transport error wrapping a reqwest failure.
    pub fn transport_with(message: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Creates a malformed response error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport { .. } => ErrorKind::Transport,
            Self::Api(_) => ErrorKind::Api,
            Self::MalformedResponse(_) => ErrorKind::MalformedResponse,
            Self::Config(_) => ErrorKind::Config,
            Self::Encode(_) => ErrorKind::Encode,
        }
    }

    /// Returns the server failure, if this is an API error.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }

    /// Returns the server message key, if this is an API error.
    pub fn message_key(&self) -> Option<&str> {
        self.api_error().map(|e| e.message_key.as_str())
    }
}

/// A specialized Result type for client operations.
pub type BbbResult<T> = Result<T, BbbError>;

//! Client configuration.
//!
//! A [`ClientConfig`] is built once and then owned by a single
//! [`BbbApi`](crate::BbbApi). It is never mutated after the client is
//! constructed, so several clients pointing at different servers can live
//! side by side.

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::error::{BbbError, BbbResult};

/// URL scheme used to reach the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scheme {
    /// Plain HTTP.
    Http,
    /// HTTP over TLS (default).
    #[default]
    Https,
}

impl Scheme {
    /// Returns the scheme name as it appears in a URL.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }

    /// Returns the port used when no override is configured.
    pub fn default_port(&self) -> u16 {
        match self {
            Self::Http => 80,
            Self::Https => 443,
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Scheme {
    type Err = BbbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            other => Err(BbbError::Config(format!("unsupported scheme: {}", other))),
        }
    }
}

/// Connection settings and shared secret for one API server.
#[derive(Clone)]
pub struct ClientConfig {
    /// Server host name, without scheme or path.
    pub host: String,

    /// Shared secret used to compute request checksums.
    pub secret: String,

    /// API path prefix, including leading and trailing slash.
    pub api_path: String,

    /// URL scheme.
    pub scheme: Scheme,

    /// Port override. When unset the scheme's default port is used.
    pub port: Option<u16>,

    /// Optional request timeout. Requests never time out when unset.
    pub timeout: Option<Duration>,

    /// User agent string.
    pub user_agent: String,
}

impl ClientConfig {
    /// Default API path of a BigBlueButton installation.
    pub const DEFAULT_API_PATH: &'static str = "/bigbluebutton/api/";

    /// Creates a configuration with default path, scheme and port.
    pub fn new(host: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            secret: secret.into(),
            api_path: Self::DEFAULT_API_PATH.to_string(),
            scheme: Scheme::default(),
            port: None,
            timeout: None,
            user_agent: format!("bbbapi/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Sets the API path prefix.
    pub fn with_api_path(mut self, api_path: impl Into<String>) -> Self {
        self.api_path = api_path.into();
        self
    }

    /// Sets the URL scheme.
    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Sets a port override.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets a request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Returns the port requests are sent to.
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.scheme.default_port())
    }

    /// Returns `host`, or `host:port` when a port override is set.
    pub fn authority(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{}", self.host, port),
            None => self.host.clone(),
        }
    }

    /// Returns the URL every call name is appended to.
    pub fn base_url(&self) -> String {
        format!("{}://{}{}", self.scheme, self.authority(), self.api_path)
    }

    /// Checks that the configuration can produce valid, authenticated URLs.
    ///
    /// # Errors
    ///
    /// Returns [`BbbError::Config`] for an empty host or secret, or when
    /// the assembled base URL does not parse.
    pub fn validate(&self) -> BbbResult<()> {
        if self.host.trim().is_empty() {
            return Err(BbbError::Config("host must not be empty".to_string()));
        }
        if self.secret.is_empty() {
            return Err(BbbError::Config("secret must not be empty".to_string()));
        }
        if !self.api_path.starts_with('/') || !self.api_path.ends_with('/') {
            return Err(BbbError::Config(format!(
                "api path must start and end with '/': {}",
                self.api_path
            )));
        }
        Url::parse(&self.base_url())
            .map_err(|e| BbbError::Config(format!("invalid server address: {}", e)))?;
        Ok(())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("secret", &"<redacted>")
            .field("api_path", &self.api_path)
            .field("scheme", &self.scheme)
            .field("port", &self.port)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

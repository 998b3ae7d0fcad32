//! CLI configuration.
//!
//! Server settings can live in `~/.config/bbbapi/config.toml`:
//!
//! ```toml
//! [server]
//! host = "bbb.example.com"
//! secret = "pass::bbb/secret"
//! scheme = "https"
//! ```
//!
//! Command-line flags and the `BBB_HOSTNAME` / `BBB_SECRET` environment
//! variables take precedence over the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use bbbapi::{ClientConfig, Scheme};

use crate::cli::Cli;
use crate::error::{CliError, CliResult};
use crate::secret;

/// Contents of `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Server settings.
    pub server: ServerSettings,
}

/// Server settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server host name.
    pub host: Option<String>,
    /// Shared secret (supports `env::` and `pass::` references).
    pub secret: Option<String>,
    /// API path prefix.
    pub api_path: Option<String>,
    /// `http` or `https`.
    pub scheme: Option<String>,
    /// Port override.
    pub port: Option<u16>,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Loads the default file, or an empty config if it does not exist.
    pub fn load() -> CliResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content).map_err(|e| {
            CliError::Config(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("bbbapi")
            .join("config.toml")
    }
}

/// Merges flags, environment and file settings into a client config.
pub fn client_config(cli: &Cli, file: &FileConfig) -> CliResult<ClientConfig> {
    let server = &file.server;

    let host = cli
        .host
        .clone()
        .or_else(|| server.host.clone())
        .ok_or_else(|| CliError::Config("no host: use --host or BBB_HOSTNAME".to_string()))?;

    let secret_ref = cli
        .secret
        .clone()
        .or_else(|| server.secret.clone())
        .ok_or_else(|| CliError::Config("no secret: use --secret or BBB_SECRET".to_string()))?;
    let secret = secret::resolve(&secret_ref)?;

    let mut config = ClientConfig::new(host, secret);

    if let Some(api_path) = cli.api_path.clone().or_else(|| server.api_path.clone()) {
        config = config.with_api_path(api_path);
    }
    if let Some(scheme) = cli.scheme.as_deref().or(server.scheme.as_deref()) {
        config = config.with_scheme(scheme.parse::<Scheme>()?);
    }
    if let Some(port) = cli.port.or(server.port) {
        config = config.with_port(port);
    }
    if let Some(secs) = server.timeout_secs {
        config = config.with_timeout(std::time::Duration::from_secs(secs));
    }

    Ok(config)
}

//! Secret reference resolver.
//!
//! The shared secret should not have to sit in a config file in clear
//! text. Any secret value may instead name where to fetch it:
//!
//! - `env::VAR_NAME` reads `$VAR_NAME`
//! - `pass::path/in/store` runs `pass show path/in/store` and keeps the first line
//! - anything else is the secret itself

use std::process::Command;

use crate::error::{CliError, CliResult};

/// Resolves a value that may be a secret reference.
pub fn resolve(value: &str) -> CliResult<String> {
    if let Some(var) = value.strip_prefix("env::") {
        from_env(var)
    } else if let Some(path) = value.strip_prefix("pass::") {
        from_pass(path)
    } else {
        Ok(value.to_string())
    }
}

fn from_env(var: &str) -> CliResult<String> {
    std::env::var(var)
        .map_err(|_| CliError::Config(format!("environment variable `{}` is not set", var)))
}

fn from_pass(path: &str) -> CliResult<String> {
    let output = Command::new("pass")
        .arg("show")
        .arg(path)
        .output()
        .map_err(|e| CliError::Config(format!("failed to run `pass show {}`: {}", path, e)))?;

    if !output.status.success() {
        return Err(CliError::Config(format!(
            "`pass show {}` failed ({}): {}",
            path,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(str::to_string)
        .filter(|line| !line.is_empty())
        .ok_or_else(|| CliError::Config(format!("`pass show {}` produced no secret", path)))
}

//! Command-line driver for the BigBlueButton API client.
//!
//! This crate provides the `bbbctl` binary. It resolves credentials, builds
//! a [`bbbapi::BbbApi`] and maps each subcommand onto one façade call.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod secret;

pub use cli::Cli;
pub use error::{CliError, CliResult};

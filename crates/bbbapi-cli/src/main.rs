//! bbbctl entry point.

use std::process::ExitCode;

use clap::Parser;

use bbbapi::BbbApi;
use bbbapi::logging::{LoggingConfig, init_logging};
use bbbapi_cli::cli::Cli;
use bbbapi_cli::commands::{self, Output};
use bbbapi_cli::config::{FileConfig, client_config};
use bbbapi_cli::error::CliResult;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let logging = if cli.debug {
        LoggingConfig::debug()
    } else {
        LoggingConfig::default()
    };
    if let Err(e) = init_logging(logging) {
        eprintln!("warning: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let file = match cli.config {
        Some(ref path) => FileConfig::load_from(path)?,
        None => FileConfig::load()?,
    };
    let api = BbbApi::new(client_config(&cli, &file)?)?;

    let output = if cli.json { Output::Json } else { Output::Text };
    let mut stdout = std::io::stdout().lock();
    commands::run(&api, &cli.command, output, &mut stdout).await
}

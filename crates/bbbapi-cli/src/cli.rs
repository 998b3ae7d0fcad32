//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use bbbapi::{Params, Slide};

use crate::error::{CliError, CliResult};

/// bbbctl - drive a BigBlueButton server from the shell
#[derive(Debug, Parser)]
#[command(name = "bbbctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "BBBCTL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Server host name
    #[arg(long, env = "BBB_HOSTNAME")]
    pub host: Option<String>,

    /// Shared secret, or an `env::`/`pass::` reference to it
    #[arg(long, env = "BBB_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    /// `http` or `https`
    #[arg(long)]
    pub scheme: Option<String>,

    /// Port override
    #[arg(long)]
    pub port: Option<u16>,

    /// API path prefix
    #[arg(long)]
    pub api_path: Option<String>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Print raw payloads as JSON
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List all meetings on the server
    Meetings,

    /// Show details of one meeting
    Info {
        #[arg(long)]
        meeting_id: String,
    },

    /// Check whether a meeting is running
    Running {
        #[arg(long)]
        meeting_id: String,
    },

    /// Create a meeting
    Create(CreateArgs),

    /// Join a meeting
    Join(JoinArgs),

    /// End a meeting
    End {
        #[arg(long)]
        meeting_id: String,

        /// Moderator password
        #[arg(long)]
        password: String,
    },

    /// Create the meeting if needed, then join it
    Room {
        #[command(flatten)]
        create: CreateArgs,

        /// Display name of the participant
        #[arg(long)]
        full_name: String,

        /// Password to join with (defaults to the attendee password)
        #[arg(long)]
        password: Option<String>,

        /// Print the signed join URL instead of calling join
        #[arg(long)]
        url_only: bool,
    },
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Meeting display name
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub meeting_id: String,

    #[arg(long)]
    pub attendee_pw: Option<String>,

    #[arg(long)]
    pub moderator_pw: Option<String>,

    /// Preloaded slide as URL=FILENAME (can be repeated)
    #[arg(long = "slide", value_parser = parse_slide, action = clap::ArgAction::Append)]
    pub slides: Vec<Slide>,

    /// Extra create parameter as KEY=VALUE (can be repeated)
    #[arg(long = "param", value_parser = parse_pair, action = clap::ArgAction::Append)]
    pub params: Vec<(String, String)>,
}

impl CreateArgs {
    /// Builds the `create` parameters in command-line order.
    pub fn to_params(&self) -> Params {
        let mut params = Params::new()
            .with("name", &self.name)
            .with("meetingID", &self.meeting_id);
        if let Some(pw) = &self.attendee_pw {
            params.push("attendeePW", pw);
        }
        if let Some(pw) = &self.moderator_pw {
            params.push("moderatorPW", pw);
        }
        for (key, value) in &self.params {
            params.push(key.as_str(), value);
        }
        params
    }
}

#[derive(Debug, Args)]
pub struct JoinArgs {
    #[arg(long)]
    pub meeting_id: String,

    /// Display name of the participant
    #[arg(long)]
    pub full_name: String,

    /// Attendee or moderator password
    #[arg(long)]
    pub password: String,

    /// Print the signed join URL instead of calling join
    #[arg(long)]
    pub url_only: bool,

    /// Extra join parameter as KEY=VALUE (can be repeated)
    #[arg(long = "param", value_parser = parse_pair, action = clap::ArgAction::Append)]
    pub params: Vec<(String, String)>,
}

impl JoinArgs {
    /// Builds the `join` parameters.
    ///
    /// `redirect=false` is added unless given explicitly, so the server
    /// answers with XML instead of a redirect.
    pub fn to_params(&self) -> Params {
        join_params(&self.meeting_id, &self.full_name, &self.password, &self.params)
    }
}

pub(crate) fn join_params(
    meeting_id: &str,
    full_name: &str,
    password: &str,
    extra: &[(String, String)],
) -> Params {
    let mut params = Params::new()
        .with("meetingID", meeting_id)
        .with("fullName", full_name)
        .with("password", password);
    for (key, value) in extra {
        params.push(key.as_str(), value);
    }
    if params.get("redirect").is_none() {
        params.push("redirect", false);
    }
    params
}

/// Parses `KEY=VALUE`. The value may itself contain `=`.
pub fn parse_pair(raw: &str) -> Result<(String, String), String> {
    split_pair(raw).map_err(|e| e.to_string())
}

/// Parses `URL=FILENAME`. The split happens at the last `=`, so query
/// strings in the URL survive.
pub fn parse_slide(raw: &str) -> Result<Slide, String> {
    let (url, filename) = raw
        .rsplit_once('=')
        .filter(|(url, filename)| !url.is_empty() && !filename.is_empty())
        .ok_or_else(|| format!("expected URL=FILENAME, got `{}`", raw))?;
    Ok(Slide::new(url, filename))
}

fn split_pair(raw: &str) -> CliResult<(String, String)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(CliError::Argument(format!("expected KEY=VALUE, got `{}`", raw))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn pair_parsing() {
        assert_eq!(
            parse_pair("welcome=Hello=World").unwrap(),
            ("welcome".to_string(), "Hello=World".to_string())
        );
        assert_eq!(parse_pair("record=").unwrap().1, "");
        assert!(parse_pair("=value").is_err());
        assert!(parse_pair("novalue").is_err());
    }

    #[test]
    fn slide_parsing_splits_at_last_equals() {
        let slide = parse_slide("https://example.com/get?id=7=deck.pdf").unwrap();
        assert_eq!(slide.url, "https://example.com/get?id=7");
        assert_eq!(slide.filename, "deck.pdf");

        assert!(parse_slide("https://example.com/a.pdf").is_err());
        assert!(parse_slide("https://example.com/a.pdf=").is_err());
    }

    #[test]
    fn create_params_keep_order() {
        let cli = Cli::parse_from([
            "bbbctl",
            "create",
            "--name",
            "Club",
            "--meeting-id",
            "club",
            "--attendee-pw",
            "oneone",
            "--param",
            "record=true",
            "--slide",
            "https://example.com/a.pdf=a.pdf",
        ]);
        let Command::Create(args) = cli.command else {
            panic!("expected create");
        };
        let keys: Vec<_> = args.to_params().iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, ["name", "meetingID", "attendeePW", "record"]);
        assert_eq!(args.slides.len(), 1);
    }

    #[test]
    fn join_params_default_to_no_redirect() {
        let params = join_params("club", "Ada", "oneone", &[]);
        assert_eq!(params.get("redirect"), Some("false"));

        let explicit = join_params("club", "Ada", "oneone", &[("redirect".into(), "true".into())]);
        assert_eq!(explicit.get("redirect"), Some("true"));
        assert_eq!(explicit.iter().filter(|(k, _)| *k == "redirect").count(), 1);
    }
}

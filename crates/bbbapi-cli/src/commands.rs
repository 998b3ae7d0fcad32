//! Subcommand handlers.
//!
//! Each handler performs one façade call and renders the result either as
//! plain text or, with `--json`, as the decoded payload.

use std::io::Write;

use serde_json::{Value, json};
use tracing::debug;

use bbbapi::{ApiResponse, BbbApi, Meeting, Params, Transport};

use crate::cli::{Command, CreateArgs, JoinArgs, join_params};
use crate::error::CliResult;

/// Output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Text,
    Json,
}

/// Runs one subcommand, writing its result to `out`.
pub async fn run<T: Transport>(
    api: &BbbApi<T>,
    command: &Command,
    output: Output,
    out: &mut impl Write,
) -> CliResult<()> {
    debug!(?command, "Running command");
    match command {
        Command::Meetings => meetings(api, output, out).await,
        Command::Info { meeting_id } => info(api, meeting_id, output, out).await,
        Command::Running { meeting_id } => running(api, meeting_id, output, out).await,
        Command::Create(args) => create(api, args, output, out).await,
        Command::Join(args) => join(api, args, output, out).await,
        Command::End {
            meeting_id,
            password,
        } => {
            let params = Params::new()
                .with("meetingID", meeting_id)
                .with("password", password);
            let response = api.end(&params).await?;
            render_status(&response, output, out)
        }
        Command::Room {
            create,
            full_name,
            password,
            url_only,
        } => room(api, create, full_name, password.as_deref(), *url_only, output, out).await,
    }
}

async fn meetings<T: Transport>(
    api: &BbbApi<T>,
    output: Output,
    out: &mut impl Write,
) -> CliResult<()> {
    let result = api.get_meetings().await?;
    match output {
        Output::Json => write_json(out, &serde_json::to_value(&result.meetings)?),
        Output::Text => {
            if result.meetings.is_empty() {
                writeln!(out, "No meetings").map_err(io_err)?;
            }
            for meeting in &result.meetings {
                writeln!(out, "{}", meeting_line(meeting)).map_err(io_err)?;
            }
            Ok(())
        }
    }
}

async fn info<T: Transport>(
    api: &BbbApi<T>,
    meeting_id: &str,
    output: Output,
    out: &mut impl Write,
) -> CliResult<()> {
    let params = Params::new().with("meetingID", meeting_id);
    let result = api.get_meeting_info(&params).await?;
    match output {
        Output::Json => write_json(out, &serde_json::to_value(&result.meeting)?),
        Output::Text => {
            writeln!(out, "{}", meeting_line(&result.meeting)).map_err(io_err)?;
            for attendee in &result.meeting.attendees {
                let role = if attendee.is_moderator() {
                    "moderator"
                } else {
                    "viewer"
                };
                writeln!(
                    out,
                    "  {} ({})",
                    attendee.full_name.as_deref().unwrap_or("?"),
                    role
                )
                .map_err(io_err)?;
            }
            Ok(())
        }
    }
}

async fn running<T: Transport>(
    api: &BbbApi<T>,
    meeting_id: &str,
    output: Output,
    out: &mut impl Write,
) -> CliResult<()> {
    let params = Params::new().with("meetingID", meeting_id);
    let result = api.is_meeting_running(&params).await?;
    match output {
        Output::Json => write_json(out, &json!({ "running": result.running })),
        Output::Text => writeln!(out, "{}", result.running).map_err(io_err),
    }
}

async fn create<T: Transport>(
    api: &BbbApi<T>,
    args: &CreateArgs,
    output: Output,
    out: &mut impl Write,
) -> CliResult<()> {
    let response = api
        .create_with_optional_slides(&args.to_params(), &args.slides)
        .await?;
    render_status(&response, output, out)
}

async fn join<T: Transport>(
    api: &BbbApi<T>,
    args: &JoinArgs,
    output: Output,
    out: &mut impl Write,
) -> CliResult<()> {
    let params = args.to_params();
    if args.url_only {
        return write_url(&api.join_url(&params).url, output, out);
    }
    let result = api.join(&params).await?;
    match output {
        Output::Json => write_json(
            out,
            &json!({
                "url": result.join.url,
                "cookies": result.join.cookies,
                "response": result.response.xml,
            }),
        ),
        Output::Text => match &result.join.url {
            Some(url) => writeln!(out, "{}", url).map_err(io_err),
            None => render_status(&result.response, output, out),
        },
    }
}

async fn room<T: Transport>(
    api: &BbbApi<T>,
    create: &CreateArgs,
    full_name: &str,
    password: Option<&str>,
    url_only: bool,
    output: Output,
    out: &mut impl Write,
) -> CliResult<()> {
    let create_params = create.to_params();
    let password = password
        .or(create.attendee_pw.as_deref())
        .unwrap_or_default();
    let join = join_params(&create.meeting_id, full_name, password, &[]);

    if url_only {
        let signed = api
            .join_persistent_room_url(&join, &create_params, &create.slides)
            .await?;
        return write_url(&signed.url, output, out);
    }

    let result = api
        .join_persistent_room(&join, &create_params, &create.slides)
        .await?;
    match (output, &result.join.url) {
        (Output::Text, Some(url)) => writeln!(out, "{}", url).map_err(io_err),
        _ => render_status(&result.response, output, out),
    }
}

fn render_status(response: &ApiResponse, output: Output, out: &mut impl Write) -> CliResult<()> {
    match output {
        Output::Json => write_json(out, &response.xml),
        Output::Text => {
            let code = response.return_code().unwrap_or("SUCCESS");
            match (response.message_key(), response.message()) {
                (Some(key), Some(message)) => writeln!(out, "{} [{}]: {}", code, key, message),
                (Some(key), None) => writeln!(out, "{} [{}]", code, key),
                _ => writeln!(out, "{}", code),
            }
            .map_err(io_err)
        }
    }
}

fn write_url(url: &str, output: Output, out: &mut impl Write) -> CliResult<()> {
    match output {
        Output::Json => write_json(out, &json!({ "url": url })),
        Output::Text => writeln!(out, "{}", url).map_err(io_err),
    }
}

fn write_json(out: &mut impl Write, value: &Value) -> CliResult<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out).map_err(io_err)
}

fn meeting_line(meeting: &Meeting) -> String {
    format!(
        "{}  {}  {}  {} participant(s)",
        meeting.meeting_id.as_deref().unwrap_or("?"),
        meeting.meeting_name.as_deref().unwrap_or("?"),
        if meeting.is_running() {
            "running"
        } else {
            "idle"
        },
        meeting.participant_count().unwrap_or(0)
    )
}

fn io_err(err: std::io::Error) -> crate::error::CliError {
    crate::error::CliError::Output(serde_json::Error::io(err))
}

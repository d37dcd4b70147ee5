//! Slack CLI - Channel Janitor
//!
//! Checks a Slack token and lists channels matching simple filters, then
//! optionally archives or deletes every match, one call at a time with a pause
//! between calls to respect Slack's rate limits.
//!
//! # Usage
//!
//! ```bash
//! # Who does this token belong to?
//! slack --token xoxb-... auth-test
//!
//! # List active channels whose name starts with "temp"
//! slack channels --starts-with temp --exclude-archived
//!
//! # Preview, then archive them with a 2 second pause between calls
//! slack channels -s temp -r --archive --dry-run
//! slack channels -s temp -r --archive --sleep 2000
//! ```
//!
//! The token is read from `SLACK_API_TOKEN` when `--token` is omitted.

mod commands;
mod console;
mod error;
mod filter;
mod runner;
#[cfg(test)]
mod testing;

use std::{io::IsTerminal, process::ExitCode};

use anyhow::Context;
use clap::{Parser, Subcommand};
use secrecy::SecretString;
use slack_common::{DEFAULT_API_URL, SlackClient};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::{
    commands::{ChannelsArgs, RunStatus},
    console::Terminal,
    error::ConfigError,
};

/// Slack workspace housekeeping.
#[derive(Parser, Debug)]
#[command(name = "slack")]
#[command(about = "Lists, archives and deletes Slack channels")]
struct Cli {
    /// Slack API token.
    #[arg(short = 'a', long, env = "SLACK_API_TOKEN", hide_env_values = true)]
    token: String,

    /// Enable debug logging.
    #[arg(long, global = true)]
    debug: bool,

    /// Base URL of the Slack Web API.
    #[arg(long, env = "SLACK_API_URL", default_value = DEFAULT_API_URL, hide = true)]
    api_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the token and show the team and user behind it.
    AuthTest,
    /// List channels, optionally archiving or deleting the matches.
    Channels(ChannelsArgs),
}

/// Filter directives: a non-blank `RUST_LOG` wins, otherwise `--debug` decides.
fn log_directives(rust_log: Option<&str>, debug: bool) -> String {
    match rust_log.map(str::trim) {
        Some(directives) if !directives.is_empty() => directives.to_string(),
        _ if debug => "slack=debug,slack_common=debug".to_string(),
        _ => "warn".to_string(),
    }
}

fn init_tracing(debug: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = EnvFilter::new(log_directives(rust_log.as_deref(), debug));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(console::wants_color(std::io::stderr().is_terminal()))
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<RunStatus> {
    let client = SlackClient::with_base_url(SecretString::from(cli.token), &cli.api_url)
        .context("failed to create Slack client")?;
    let mut console = Terminal::new();

    match cli.command {
        Command::AuthTest => Ok(commands::auth_test(&client, &mut console).await),
        Command::Channels(args) => commands::channels(&client, &mut console, &args).await,
    }
}

/// Exit code for an error that stopped a command; 2 for unusable flags.
fn exit_code_for(err: &anyhow::Error) -> u8 {
    if err.is::<ConfigError>() { 2 } else { 1 }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match run(cli).await {
        Ok(status) => status.into(),
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(exit_code_for(&err))
        }
    }
}

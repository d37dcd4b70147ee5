//! `auth-test` and `channels` subcommands.

use std::{process::ExitCode, time::Duration};

use anyhow::Context;
use clap::Args;
use slack_common::SlackApi;
use tracing::info;

use crate::{
    console::{self, Console},
    error::ConfigError,
    filter::{ArchivedFilter, ChannelFilter},
    runner::{self, Action, DEFAULT_SLEEP_MS, RunOptions, Summary},
};

/// How a command finished when it did not error out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Everything requested was done.
    Success,
    /// The user declined the confirmation prompt.
    Aborted,
    /// The command ran to completion but something failed along the way.
    Failed,
}

impl From<RunStatus> for ExitCode {
    fn from(status: RunStatus) -> Self {
        match status {
            RunStatus::Success | RunStatus::Aborted => Self::SUCCESS,
            RunStatus::Failed => Self::FAILURE,
        }
    }
}

/// Flags for the `channels` subcommand.
#[derive(Args, Debug, Clone)]
pub struct ChannelsArgs {
    /// Match channel ID.
    #[arg(short, long)]
    pub id: Option<String>,

    /// Match only active channels.
    #[arg(short = 'r', long)]
    pub exclude_archived: bool,

    /// Match only archived channels.
    #[arg(short = 'R', long)]
    pub only_archived: bool,

    /// Match channels starting with given string.
    #[arg(short, long)]
    pub starts_with: Option<String>,

    /// Match channels containing given string in name.
    #[arg(short, long)]
    pub contains: Option<String>,

    /// Match channels with name matching given string.
    #[arg(short, long)]
    pub name: Option<String>,

    /// Delete matched channels.
    #[arg(long)]
    pub delete: bool,

    /// Archive matched channels.
    #[arg(long)]
    pub archive: bool,

    /// Dry-run; do not actually archive or delete channels.
    #[arg(long)]
    pub dry_run: bool,

    /// Sleep time for Slack Rate API - in Milliseconds.
    #[arg(long, default_value_t = DEFAULT_SLEEP_MS)]
    pub sleep: u64,

    /// Skip the confirmation prompt for --delete and --archive.
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// A validated `channels` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelsRequest {
    pub filter: ChannelFilter,
    pub action: Action,
    pub options: RunOptions,
    pub assume_yes: bool,
}

impl TryFrom<&ChannelsArgs> for ChannelsRequest {
    type Error = ConfigError;

    fn try_from(args: &ChannelsArgs) -> Result<Self, Self::Error> {
        let action = Action::from_flags(args.delete, args.archive)?;
        let archived = ArchivedFilter::from_flags(args.exclude_archived, args.only_archived)?;

        Ok(Self {
            filter: ChannelFilter {
                id: args.id.clone(),
                name: args.name.clone(),
                starts_with: args.starts_with.clone(),
                contains: args.contains.clone(),
                archived,
            },
            action,
            options: RunOptions {
                dry_run: args.dry_run,
                sleep: Duration::from_millis(args.sleep),
            },
            assume_yes: args.yes,
        })
    }
}

/// Prints who the token belongs to, or why Slack refused it.
pub async fn auth_test(api: &dyn SlackApi, console: &mut dyn Console) -> RunStatus {
    let style = console.style();

    match api.auth_test().await {
        Ok(auth) => {
            for line in console::render_auth(style, &auth) {
                console.print(&line);
            }
            if auth.ok {
                RunStatus::Success
            } else {
                RunStatus::Failed
            }
        }
        Err(err) => {
            console.print(&console::render_auth_failure(style, &err.reason()));
            RunStatus::Failed
        }
    }
}

/// Lists matching channels and optionally archives or deletes them.
pub async fn channels(
    api: &dyn SlackApi,
    console: &mut dyn Console,
    args: &ChannelsArgs,
) -> anyhow::Result<RunStatus> {
    let request = ChannelsRequest::try_from(args)?;

    if request.action.is_destructive() && !request.assume_yes {
        let prompt = format!(
            "Are you sure you want to {} these channels?",
            request.action.verb()
        );
        if !console
            .confirm(&prompt)
            .context("failed to read confirmation")?
        {
            console.print("Aborted.");
            return Ok(RunStatus::Aborted);
        }
    }

    let fetched = api
        .list_channels(&request.filter.list_params())
        .await
        .context("failed to list channels")?;
    let fetched_count = fetched.len();
    let matched = request.filter.apply(fetched);
    info!(
        fetched = fetched_count,
        matched = matched.len(),
        action = request.action.verb(),
        dry_run = request.options.dry_run,
        "channels selected"
    );

    let results = runner::execute(api, &matched, request.action, request.options, console).await;

    let summary = Summary::from_results(&results);
    let line = console::render_summary(console.style(), request.action, &summary);
    console.print(&line);
    info!(
        succeeded = summary.succeeded,
        skipped = summary.skipped,
        failed = summary.failed,
        "run finished"
    );

    Ok(if summary.failed > 0 {
        RunStatus::Failed
    } else {
        RunStatus::Success
    })
}

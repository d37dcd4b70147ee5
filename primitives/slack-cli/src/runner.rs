//! Sequential batch actions over matched channels.
//!
//! Channels are processed one at a time in input order. A failed call is
//! recorded and the run moves on, so the result list always has one entry per
//! input channel. After every mutating call the runner sleeps for the
//! configured delay, the last call included, to stay under Slack's rate limits.

use std::time::Duration;

use slack_common::{Channel, SlackApi};
use tracing::{debug, warn};

use crate::{
    console::{Console, render_result},
    error::ConfigError,
};

/// Default pause between mutating calls.
pub const DEFAULT_SLEEP_MS: u64 = 1000;

/// What to do with each matched channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Action {
    #[default]
    List,
    Archive,
    Delete,
}

impl Action {
    /// Builds the action from the two mutually exclusive CLI flags.
    pub fn from_flags(delete: bool, archive: bool) -> Result<Self, ConfigError> {
        match (delete, archive) {
            (true, true) => Err(ConfigError::DeleteAndArchive),
            (true, false) => Ok(Self::Delete),
            (false, true) => Ok(Self::Archive),
            (false, false) => Ok(Self::List),
        }
    }

    /// Whether the action changes workspace state.
    pub fn is_destructive(self) -> bool {
        !matches!(self, Self::List)
    }

    pub fn verb(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Archive => "archive",
            Self::Delete => "delete",
        }
    }

    pub fn past_tense(self) -> &'static str {
        match self {
            Self::List => "listed",
            Self::Archive => "archived",
            Self::Delete => "deleted",
        }
    }
}

/// Knobs for a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Report what would happen without calling Slack.
    pub dry_run: bool,
    /// Pause after each mutating call.
    pub sleep: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            sleep: Duration::from_millis(DEFAULT_SLEEP_MS),
        }
    }
}

/// What happened to one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Listed,
    Archived,
    Deleted,
    /// Dry run; the action was not sent.
    DryRun(Action),
    /// Slack rejected the call or it never reached Slack.
    Failed(String),
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Listed => "listed",
            Self::Archived => "archived",
            Self::Deleted => "deleted",
            Self::DryRun(_) => "dry-run",
            Self::Failed(_) => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub channel: Channel,
    pub outcome: Outcome,
}

/// Per-outcome counts for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl Summary {
    pub fn from_results(results: &[ExecutionResult]) -> Self {
        results.iter().fold(
            Self {
                total: results.len(),
                ..Self::default()
            },
            |mut summary, result| {
                match result.outcome {
                    Outcome::DryRun(_) => summary.skipped += 1,
                    Outcome::Failed(_) => summary.failed += 1,
                    Outcome::Listed | Outcome::Archived | Outcome::Deleted => {
                        summary.succeeded += 1;
                    }
                }
                summary
            },
        )
    }
}

/// Applies `action` to every channel, reporting each result as it lands.
pub async fn execute(
    api: &dyn SlackApi,
    channels: &[Channel],
    action: Action,
    options: RunOptions,
    console: &mut dyn Console,
) -> Vec<ExecutionResult> {
    let mut results = Vec::with_capacity(channels.len());

    for channel in channels {
        let outcome = match action {
            Action::List => Outcome::Listed,
            _ if options.dry_run => Outcome::DryRun(action),
            Action::Archive | Action::Delete => {
                let outcome = apply(api, channel, action).await;
                tokio::time::sleep(options.sleep).await;
                outcome
            }
        };

        let result = ExecutionResult {
            channel: channel.clone(),
            outcome,
        };
        let line = render_result(console.style(), &result);
        console.print(&line);
        results.push(result);
    }

    results
}

async fn apply(api: &dyn SlackApi, channel: &Channel, action: Action) -> Outcome {
    debug!(channel = %channel.id, name = %channel.name, action = action.verb(), "applying action");

    let result = match action {
        Action::Archive => api
            .archive_channel(&channel.id)
            .await
            .map(|()| Outcome::Archived),
        Action::Delete => api
            .delete_channel(&channel.id)
            .await
            .map(|()| Outcome::Deleted),
        Action::List => Ok(Outcome::Listed),
    };

    result.unwrap_or_else(|err| {
        warn!(channel = %channel.id, action = action.verb(), error = %err, "action failed");
        Outcome::Failed(err.reason())
    })
}

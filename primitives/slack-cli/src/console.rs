//! Terminal interaction: confirmation prompts and styled report lines.
//!
//! Commands write through the [`Console`] trait so they can run against a
//! recording console in tests.

use std::{
    ffi::OsStr,
    io::{self, BufRead, IsTerminal, Write},
};

use slack_common::AuthTest;

use crate::runner::{Action, ExecutionResult, Outcome, Summary};

// ── ANSI helpers ────────────────────────────────────────────────────────────

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Whether report lines carry ANSI colour codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    color: bool,
}

impl Style {
    /// No escape codes at all.
    pub const fn plain() -> Self {
        Self { color: false }
    }

    /// Colour when stdout is a terminal and `NO_COLOR` is unset.
    pub fn detect() -> Self {
        Self {
            color: wants_color(io::stdout().is_terminal()),
        }
    }

    fn paint(self, codes: &str, text: &str) -> String {
        if self.color {
            format!("{codes}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

/// Colour is used only on a terminal and only while `NO_COLOR` is unset.
pub fn wants_color(is_terminal: bool) -> bool {
    color_allowed(is_terminal, std::env::var_os("NO_COLOR").as_deref())
}

fn color_allowed(is_terminal: bool, no_color: Option<&OsStr>) -> bool {
    is_terminal && no_color.is_none()
}

/// True only for an explicit yes; a blank line or EOF means no.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Where commands send their output and ask for confirmation.
pub trait Console {
    /// Asks a yes/no question; anything but an explicit yes is a no.
    fn confirm(&mut self, prompt: &str) -> io::Result<bool>;

    /// Writes one line of report output.
    fn print(&mut self, line: &str);

    /// Styling to apply to report lines.
    fn style(&self) -> Style {
        Style::plain()
    }
}

/// Console backed by stdin/stdout.
#[derive(Debug)]
pub struct Terminal {
    style: Style,
}

impl Terminal {
    pub fn new() -> Self {
        Self {
            style: Style::detect(),
        }
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for Terminal {
    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{prompt} [y/N]: ")?;
        stdout.flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;

        Ok(is_affirmative(&answer))
    }

    fn print(&mut self, line: &str) {
        println!("{line}");
    }

    fn style(&self) -> Style {
        self.style
    }
}

// ── Rendering ───────────────────────────────────────────────────────────────

fn describe(result: &ExecutionResult) -> String {
    format!("{} {}", result.channel.id, result.channel.name)
}

/// One report line for a processed channel.
pub fn render_result(style: Style, result: &ExecutionResult) -> String {
    match &result.outcome {
        Outcome::Listed => {
            let line = format!("{:<12} {}", result.channel.id, result.channel.name);
            if result.channel.is_archived {
                format!("{line} {}", style.paint(DIM, "(archived)"))
            } else {
                line
            }
        }
        Outcome::Archived | Outcome::Deleted => {
            let tag = format!("[{}]", result.outcome.label());
            format!("{} {}", style.paint(GREEN, &tag), describe(result))
        }
        Outcome::DryRun(action) => format!(
            "{} would {} {}",
            style.paint(YELLOW, "[dry-run]"),
            action.verb(),
            describe(result)
        ),
        Outcome::Failed(reason) => format!(
            "{} {} -- {reason}",
            style.paint(RED, "[failed]"),
            describe(result)
        ),
    }
}

/// Closing line after a batch.
pub fn render_summary(style: Style, action: Action, summary: &Summary) -> String {
    let noun = if summary.total == 1 {
        "channel"
    } else {
        "channels"
    };

    if action == Action::List {
        return style.paint(BOLD, &format!("{} {noun} matched", summary.total));
    }

    let mut parts = vec![format!("{} {}", summary.succeeded, action.past_tense())];
    if summary.skipped > 0 {
        parts.push(format!("{} skipped (dry run)", summary.skipped));
    }
    if summary.failed > 0 {
        parts.push(style.paint(RED, &format!("{} failed", summary.failed)));
    }

    format!(
        "{}: {}",
        style.paint(BOLD, &format!("{} {noun}", summary.total)),
        parts.join(", ")
    )
}

fn label(style: Style, label: &str, value: &str) -> String {
    let padded = format!("{label:<10}: ");
    format!("{}{value}", style.paint(&format!("{BLUE}{BOLD}"), &padded))
}

/// Report lines for an `auth.test` answer.
pub fn render_auth(style: Style, auth: &AuthTest) -> Vec<String> {
    if !auth.ok {
        let error = auth.error.as_deref().unwrap_or("unknown_error");
        return vec![render_auth_failure(style, error)];
    }

    let field = |value: &Option<String>| value.clone().unwrap_or_default();
    vec![
        style.paint(GREEN, "... OK ..."),
        label(
            style,
            "Team",
            &format!("{} - ({})", field(&auth.team), field(&auth.team_id)),
        ),
        label(style, "URL", &field(&auth.url)),
        label(
            style,
            "User",
            &format!("{} - ({})", field(&auth.user), field(&auth.user_id)),
        ),
    ]
}

/// `FAILED -- <reason>` line for an unsuccessful identity check.
pub fn render_auth_failure(style: Style, reason: &str) -> String {
    format!("{} -- {reason}", style.paint(&format!("{RED}{BOLD}"), "FAILED"))
}

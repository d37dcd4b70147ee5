//! Scripted collaborators for command and runner tests.

use std::{
    collections::{HashMap, VecDeque},
    io,
    sync::Mutex,
};

use async_trait::async_trait;
use clap::Parser;
use slack_common::{AuthTest, Channel, ListChannelsParams, SlackApi, SlackError};

use crate::{commands::ChannelsArgs, console::Console};

/// A call made against [`FakeSlack`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    AuthTest,
    List { exclude_archived: bool },
    Archive(String),
    Delete(String),
}

/// In-memory Slack workspace that records every call.
#[derive(Debug, Default)]
pub struct FakeSlack {
    channels: Vec<Channel>,
    failures: HashMap<String, String>,
    auth: Option<AuthTest>,
    list_error: Option<String>,
    calls: Mutex<Vec<Call>>,
}

impl FakeSlack {
    pub fn with_channels(channels: Vec<Channel>) -> Self {
        Self {
            channels,
            ..Self::default()
        }
    }

    /// Makes archive/delete of `id` fail with Slack error `error`.
    pub fn failing_on(mut self, id: &str, error: &str) -> Self {
        self.failures.insert(id.to_string(), error.to_string());
        self
    }

    pub fn with_auth(mut self, auth: AuthTest) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn failing_list(mut self, error: &str) -> Self {
        self.list_error = Some(error.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn mutating_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Archive(_) | Call::Delete(_)))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }

    fn mutate(&self, method: &str, id: &str) -> Result<(), SlackError> {
        match self.failures.get(id) {
            Some(error) => Err(SlackError::Api {
                method: method.to_string(),
                error: error.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SlackApi for FakeSlack {
    async fn auth_test(&self) -> Result<AuthTest, SlackError> {
        self.record(Call::AuthTest);
        self.auth
            .clone()
            .ok_or(SlackError::RateLimited {
                retry_after: Some(30),
            })
    }

    async fn list_channels(&self, params: &ListChannelsParams) -> Result<Vec<Channel>, SlackError> {
        self.record(Call::List {
            exclude_archived: params.exclude_archived,
        });
        if let Some(ref error) = self.list_error {
            return Err(SlackError::Api {
                method: "conversations.list".to_string(),
                error: error.clone(),
            });
        }
        Ok(self
            .channels
            .iter()
            .filter(|c| !(params.exclude_archived && c.is_archived))
            .cloned()
            .collect())
    }

    async fn archive_channel(&self, id: &str) -> Result<(), SlackError> {
        self.record(Call::Archive(id.to_string()));
        self.mutate("conversations.archive", id)
    }

    async fn delete_channel(&self, id: &str) -> Result<(), SlackError> {
        self.record(Call::Delete(id.to_string()));
        self.mutate("admin.conversations.delete", id)
    }
}

/// Console that answers prompts from a script and keeps printed lines.
#[derive(Debug, Default)]
pub struct RecordingConsole {
    pub answers: VecDeque<bool>,
    pub prompts: Vec<String>,
    pub lines: Vec<String>,
}

impl RecordingConsole {
    pub fn answering(answers: &[bool]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            ..Self::default()
        }
    }
}

impl Console for RecordingConsole {
    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        self.prompts.push(prompt.to_string());
        Ok(self.answers.pop_front().unwrap_or(false))
    }

    fn print(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

#[derive(Debug, Parser)]
struct ChannelsHarness {
    #[command(flatten)]
    args: ChannelsArgs,
}

/// Parses `channels` flags exactly as the real command line would.
pub fn channels_args(flags: &[&str]) -> ChannelsArgs {
    let argv = std::iter::once("channels").chain(flags.iter().copied());
    match ChannelsHarness::try_parse_from(argv) {
        Ok(harness) => harness.args,
        Err(err) => panic!("invalid test flags {flags:?}: {err}"),
    }
}

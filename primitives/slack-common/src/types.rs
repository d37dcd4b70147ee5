//! Wire types for the subset of the Slack Web API used by the CLI.

use serde::{Deserialize, Serialize};

/// A Slack conversation as returned by `conversations.list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_member: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_members: Option<u64>,
}

impl Channel {
    /// Builds a channel with no membership metadata.
    pub fn new(id: impl Into<String>, name: impl Into<String>, is_archived: bool) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_archived,
            is_member: None,
            num_members: None,
        }
    }
}

/// Server-side options for `conversations.list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListChannelsParams {
    /// Drop archived channels on the Slack side.
    pub exclude_archived: bool,
    /// Comma-separated conversation types.
    pub types: String,
    /// Page size; Slack caps this at 1000.
    pub limit: u32,
}

impl Default for ListChannelsParams {
    fn default() -> Self {
        Self {
            exclude_archived: false,
            types: "public_channel".to_string(),
            limit: 1000,
        }
    }
}

/// Body of an `auth.test` response.
///
/// Unlike the other calls, an `"ok": false` answer is returned as-is so the
/// caller can show Slack's error string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AuthTest {
    pub ok: bool,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// One page of `conversations.list`.
#[derive(Debug, Deserialize)]
pub(crate) struct ChannelsPage {
    #[serde(default)]
    pub channels: Vec<Channel>,
    #[serde(default)]
    pub response_metadata: Option<ResponseMetadata>,
}

impl ChannelsPage {
    /// Cursor for the next page, if Slack returned a non-empty one.
    pub fn next_cursor(&self) -> Option<&str> {
        self.response_metadata
            .as_ref()
            .map(|meta| meta.next_cursor.as_str())
            .filter(|cursor| !cursor.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseMetadata {
    #[serde(default)]
    pub next_cursor: String,
}

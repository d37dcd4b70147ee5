//! Client-side channel matching.
//!
//! Slack only filters `conversations.list` by archived state, so every
//! predicate is re-applied locally over the full listing.

use slack_common::{Channel, ListChannelsParams};

use crate::error::ConfigError;

/// Which archived state a channel must be in to match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArchivedFilter {
    #[default]
    Any,
    ExcludeArchived,
    OnlyArchived,
}

impl ArchivedFilter {
    /// Builds the selector from the two mutually exclusive CLI flags.
    pub fn from_flags(exclude_archived: bool, only_archived: bool) -> Result<Self, ConfigError> {
        match (exclude_archived, only_archived) {
            (true, true) => Err(ConfigError::ExcludeAndOnlyArchived),
            (true, false) => Ok(Self::ExcludeArchived),
            (false, true) => Ok(Self::OnlyArchived),
            (false, false) => Ok(Self::Any),
        }
    }

    fn matches(self, is_archived: bool) -> bool {
        match self {
            Self::Any => true,
            Self::ExcludeArchived => !is_archived,
            Self::OnlyArchived => is_archived,
        }
    }
}

/// Predicates a channel must satisfy. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelFilter {
    pub id: Option<String>,
    pub name: Option<String>,
    pub starts_with: Option<String>,
    pub contains: Option<String>,
    pub archived: ArchivedFilter,
}

impl ChannelFilter {
    /// True when `channel` satisfies every active predicate.
    pub fn matches(&self, channel: &Channel) -> bool {
        self.id.as_ref().is_none_or(|id| channel.id == *id)
            && self.name.as_ref().is_none_or(|name| channel.name == *name)
            && self
                .starts_with
                .as_ref()
                .is_none_or(|prefix| channel.name.starts_with(prefix.as_str()))
            && self
                .contains
                .as_ref()
                .is_none_or(|needle| channel.name.contains(needle.as_str()))
            && self.archived.matches(channel.is_archived)
    }

    /// Keeps the matching channels in their original order.
    pub fn apply(&self, channels: Vec<Channel>) -> Vec<Channel> {
        channels
            .into_iter()
            .filter(|channel| self.matches(channel))
            .collect()
    }

    /// The part of the filter Slack can evaluate itself.
    pub fn list_params(&self) -> ListChannelsParams {
        ListChannelsParams {
            exclude_archived: self.archived == ArchivedFilter::ExcludeArchived,
            ..ListChannelsParams::default()
        }
    }
}

//! Slack Common - Slack Web API client
//!
//! The small slice of the Slack Web API needed to audit and clean up
//! channels: `auth.test`, `conversations.list`, `conversations.archive` and
//! `admin.conversations.delete`.
//!
//! Callers depend on the [`SlackApi`] trait so the HTTP client can be swapped
//! for a scripted fake in tests.
//!
//! # Usage
//!
//! ```no_run
//! use secrecy::SecretString;
//! use slack_common::{ListChannelsParams, SlackApi, SlackClient};
//!
//! # async fn example() -> Result<(), slack_common::SlackError> {
//! let client = SlackClient::new(SecretString::from("xoxb-...".to_string()))?;
//! let channels = client.list_channels(&ListChannelsParams::default()).await?;
//! for channel in channels {
//!     println!("{} {}", channel.id, channel.name);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod types;

pub use client::{DEFAULT_API_URL, SlackApi, SlackClient};
pub use error::SlackError;
pub use types::{AuthTest, Channel, ListChannelsParams};

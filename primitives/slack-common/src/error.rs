//! Errors returned by the Slack Web API client.

use reqwest::StatusCode;

/// Failure talking to the Slack Web API.
#[derive(Debug, thiserror::Error)]
pub enum SlackError {
    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),

    /// Slack answered with a non-success status other than 429.
    #[error("Slack returned HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// Slack throttled the request.
    #[error("rate limited by Slack{}", retry_hint(.retry_after))]
    RateLimited { retry_after: Option<u64> },

    /// The response body carried `"ok": false`.
    #[error("{method} failed: {error}")]
    Api { method: String, error: String },

    /// The response body could not be decoded.
    #[error("unexpected {method} response")]
    Decode {
        method: String,
        #[source]
        source: serde_json::Error,
    },
}

impl SlackError {
    /// Short error string suitable for a per-channel report line.
    ///
    /// API errors are reduced to Slack's error code (`not_in_channel`,
    /// `already_archived`, ...), everything else is the message followed by
    /// its whole source chain, so the root cause (`Connection refused`, ...)
    /// reaches the user.
    #[must_use]
    pub fn reason(&self) -> String {
        if let Self::Api { error, .. } = self {
            return error.clone();
        }

        let mut parts = vec![self.to_string()];
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            parts.push(err.to_string());
            source = err.source();
        }
        parts.join(": ")
    }
}

fn retry_hint(retry_after: &Option<u64>) -> String {
    retry_after
        .map(|secs| format!(" (retry after {secs}s)"))
        .unwrap_or_default()
}

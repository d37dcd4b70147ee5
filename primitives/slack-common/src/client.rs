//! HTTP client for the Slack Web API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header::RETRY_AFTER};
use secrecy::{ExposeSecret, SecretString};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde_json::Value;
use tracing::debug;

use crate::{
    error::SlackError,
    types::{AuthTest, Channel, ChannelsPage, ListChannelsParams},
};

/// Base URL of the public Slack Web API.
pub const DEFAULT_API_URL: &str = "https://slack.com/api";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Slack operations the CLI depends on.
#[async_trait]
pub trait SlackApi: Send + Sync {
    /// Checks the token and returns the identity behind it.
    async fn auth_test(&self) -> Result<AuthTest, SlackError>;

    /// Lists every channel visible to the token, following pagination cursors.
    async fn list_channels(&self, params: &ListChannelsParams) -> Result<Vec<Channel>, SlackError>;

    /// Archives a single channel.
    async fn archive_channel(&self, id: &str) -> Result<(), SlackError>;

    /// Permanently deletes a single channel.
    async fn delete_channel(&self, id: &str) -> Result<(), SlackError>;
}

/// [`SlackApi`] backed by `reqwest`.
#[derive(Debug)]
pub struct SlackClient {
    http: Client,
    base_url: String,
    token: SecretString,
}

impl SlackClient {
    /// Creates a client for the public Slack API.
    pub fn new(token: SecretString) -> Result<Self, SlackError> {
        Self::with_base_url(token, DEFAULT_API_URL)
    }

    /// Creates a client that sends requests to `base_url` instead.
    pub fn with_base_url(token: SecretString, base_url: &str) -> Result<Self, SlackError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// POSTs a form to `method` and returns the decoded JSON body.
    async fn post(&self, method: &str, form: &[(&str, String)]) -> Result<Value, SlackError> {
        let url = format!("{}/{method}", self.base_url);
        debug!(method, "calling Slack API");

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.token.expose_secret())
            .form(form)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse().ok());
            return Err(SlackError::RateLimited { retry_after });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SlackError::Status { status, body });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| SlackError::Decode {
            method: method.to_string(),
            source,
        })
    }

    /// Like [`post`](Self::post) but turns `"ok": false` into [`SlackError::Api`].
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        form: &[(&str, String)],
    ) -> Result<T, SlackError> {
        let body = self.post(method, form).await?;

        if !body.get("ok").and_then(Value::as_bool).unwrap_or(false) {
            let error = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown_error")
                .to_string();
            return Err(SlackError::Api {
                method: method.to_string(),
                error,
            });
        }

        serde_json::from_value(body).map_err(|source| SlackError::Decode {
            method: method.to_string(),
            source,
        })
    }
}

#[async_trait]
impl SlackApi for SlackClient {
    async fn auth_test(&self) -> Result<AuthTest, SlackError> {
        let body = self.post("auth.test", &[]).await?;
        serde_json::from_value(body).map_err(|source| SlackError::Decode {
            method: "auth.test".to_string(),
            source,
        })
    }

    async fn list_channels(&self, params: &ListChannelsParams) -> Result<Vec<Channel>, SlackError> {
        let mut channels = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut form = vec![
                ("types", params.types.clone()),
                ("limit", params.limit.to_string()),
                ("exclude_archived", params.exclude_archived.to_string()),
                ("exclude_members", "true".to_string()),
            ];
            if let Some(ref cursor) = cursor {
                form.push(("cursor", cursor.clone()));
            }

            let page: ChannelsPage = self.call("conversations.list", &form).await?;
            let next = page.next_cursor().map(str::to_string);
            debug!(
                fetched = page.channels.len(),
                more = next.is_some(),
                "received channel page"
            );
            channels.extend(page.channels);

            match next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        Ok(channels)
    }

    async fn archive_channel(&self, id: &str) -> Result<(), SlackError> {
        let _: IgnoredAny = self
            .call("conversations.archive", &[("channel", id.to_string())])
            .await?;
        Ok(())
    }

    async fn delete_channel(&self, id: &str) -> Result<(), SlackError> {
        let _: IgnoredAny = self
            .call("admin.conversations.delete", &[("channel_id", id.to_string())])
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::*;

    fn client_for(server: &mockito::Server) -> SlackClient {
        SlackClient::with_base_url(SecretString::from("xoxb-test".to_string()), &server.url())
            .unwrap()
    }

    #[tokio::test]
    async fn auth_test_returns_identity() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/auth.test")
            .match_header("authorization", "Bearer xoxb-test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "ok": true,
                    "url": "https://acme.slack.com/",
                    "team": "Acme",
                    "team_id": "T1",
                    "user": "janitor",
                    "user_id": "U1"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let auth = client_for(&server).auth_test().await.unwrap();

        assert!(auth.ok);
        assert_eq!(auth.team.as_deref(), Some("Acme"));
        assert_eq!(auth.user_id.as_deref(), Some("U1"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn auth_test_passes_through_slack_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/auth.test")
            .with_status(200)
            .with_body(json!({"ok": false, "error": "invalid_auth"}).to_string())
            .create_async()
            .await;

        let auth = client_for(&server).auth_test().await.unwrap();

        assert!(!auth.ok);
        assert_eq!(auth.error.as_deref(), Some("invalid_auth"));
    }

    #[tokio::test]
    async fn list_channels_follows_cursor() {
        let mut server = mockito::Server::new_async().await;
        let second = server
            .mock("POST", "/conversations.list")
            .match_body(Matcher::UrlEncoded("cursor".into(), "page-2".into()))
            .with_status(200)
            .with_body(
                json!({
                    "ok": true,
                    "channels": [{"id": "C3", "name": "temp-bar", "is_archived": true}],
                    "response_metadata": {"next_cursor": ""}
                })
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;
        let first = server
            .mock("POST", "/conversations.list")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("types".into(), "public_channel".into()),
                Matcher::UrlEncoded("exclude_archived".into(), "true".into()),
                Matcher::UrlEncoded("exclude_members".into(), "true".into()),
                Matcher::UrlEncoded("limit".into(), "1000".into()),
            ]))
            .with_status(200)
            .with_body(
                json!({
                    "ok": true,
                    "channels": [
                        {"id": "C1", "name": "general", "is_archived": false},
                        {"id": "C2", "name": "temp-foo", "is_archived": false, "num_members": 3}
                    ],
                    "response_metadata": {"next_cursor": "page-2"}
                })
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let params = ListChannelsParams {
            exclude_archived: true,
            ..ListChannelsParams::default()
        };
        let channels = client_for(&server).list_channels(&params).await.unwrap();

        let ids: Vec<&str> = channels.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["C1", "C2", "C3"]);
        assert_eq!(channels[1].num_members, Some(3));
        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    async fn archive_sends_channel_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/conversations.archive")
            .match_body(Matcher::UrlEncoded("channel".into(), "C42".into()))
            .with_status(200)
            .with_body(json!({"ok": true}).to_string())
            .create_async()
            .await;

        client_for(&server).archive_channel("C42").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn delete_reports_api_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/admin.conversations.delete")
            .match_body(Matcher::UrlEncoded("channel_id".into(), "C42".into()))
            .with_status(200)
            .with_body(json!({"ok": false, "error": "not_allowed_token_type"}).to_string())
            .create_async()
            .await;

        let err = client_for(&server).delete_channel("C42").await.unwrap_err();

        assert!(matches!(err, SlackError::Api { .. }));
        assert_eq!(err.reason(), "not_allowed_token_type");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn too_many_requests_is_rate_limited() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/conversations.archive")
            .with_status(429)
            .with_header("retry-after", "12")
            .create_async()
            .await;

        let err = client_for(&server).archive_channel("C1").await.unwrap_err();

        assert!(matches!(
            err,
            SlackError::RateLimited {
                retry_after: Some(12)
            }
        ));
    }

    #[tokio::test]
    async fn server_error_keeps_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/auth.test")
            .with_status(503)
            .with_body("upstream unavailable")
            .create_async()
            .await;

        let err = client_for(&server).auth_test().await.unwrap_err();

        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("upstream unavailable"));
    }

    #[tokio::test]
    async fn unreachable_host_reason_keeps_root_cause() {
        let client = SlackClient::with_base_url(
            SecretString::from("xoxb-test".to_string()),
            "http://127.0.0.1:9",
        )
        .unwrap();

        let err = client.archive_channel("C1").await.unwrap_err();
        let reason = err.reason();

        assert!(matches!(err, SlackError::Http(_)));
        assert!(reason.starts_with("HTTP request failed: "), "{reason}");
        assert!(reason.to_lowercase().contains("refused"), "{reason}");
        assert_eq!(reason.matches("error sending request").count(), 1, "{reason}");
    }
}

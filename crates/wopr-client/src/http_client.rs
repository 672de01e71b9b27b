//! `reqwest`-backed client for the WOPR service.
//!
//! One POST per forwarded message, API key in the `X-API-Key` header. The
//! status code decides the outcome: 200 is a reply, anything else is a
//! service error whose `detail` is surfaced to the user.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, error};

use wopr_core::config::Config;
use wopr_core::types::{ErrorBody, GameRequest, GameReply, WoprResponse};

use crate::traits::GameTransport;

/// Shown when a non-200 body decodes but carries no `detail` field.
const MISSING_DETAIL_FALLBACK: &str = "An error occurred.";
/// Shown when a non-200 body is not valid JSON at all.
const UNPARSEABLE_BODY_FALLBACK: &str = "An unknown error occurred.";

/// Transport-level failures. Both variants end the run with a failure
/// status; a reachable service returning an error status is not a
/// `ClientError`.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The service could not be reached (connection refused, timeout, DNS).
    #[error("Error communicating with WOPR API: {0}")]
    Transport(#[source] reqwest::Error),
    /// The service answered 200 with a body that is not a game reply.
    #[error("Error decoding WOPR reply: {0}")]
    Decode(#[source] reqwest::Error),
}

/// HTTP client for the WOPR conversational service.
pub struct WoprClient {
    /// HTTP client (built once, connection-pooled).
    client: reqwest::Client,
    /// Full endpoint URL each message is POSTed to.
    api_url: String,
    /// Value of the `X-API-Key` header.
    api_key: String,
}

impl std::fmt::Debug for WoprClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WoprClient")
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl WoprClient {
    /// Create a client from the loaded configuration.
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to build HTTP client");

        WoprClient {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl GameTransport for WoprClient {
    async fn send(
        &self,
        message: &str,
        session_id: Option<&str>,
    ) -> Result<WoprResponse, ClientError> {
        let body = GameRequest::new(message, session_id.map(String::from));

        debug!(
            url = %self.api_url,
            has_session = session_id.is_some(),
            "sending message"
        );

        let result = self
            .client
            .post(&self.api_url)
            .header("X-API-Key", &self.api_key)
            .json(&body)
            .send()
            .await;

        let response = match result {
            Ok(resp) => resp,
            Err(e) => {
                error!(error = %e, "HTTP request failed");
                return Err(ClientError::Transport(e));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let detail = match response.json::<ErrorBody>().await {
                Ok(ErrorBody { detail: Some(detail) }) => detail,
                Ok(ErrorBody { detail: None }) => MISSING_DETAIL_FALLBACK.to_string(),
                Err(_) => UNPARSEABLE_BODY_FALLBACK.to_string(),
            };
            debug!(%status, detail = %detail, "service refused the request");
            return Ok(WoprResponse::ServiceError { detail });
        }

        match response.json::<GameReply>().await {
            Ok(reply) => {
                debug!(
                    new_session = reply.session_id.is_some(),
                    "reply received"
                );
                Ok(WoprResponse::Reply(reply))
            }
            Err(e) => {
                error!(error = %e, "Failed to parse WOPR reply");
                Err(ClientError::Decode(e))
            }
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

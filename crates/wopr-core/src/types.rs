//! Wire types for the WOPR service — the request/reply shapes shared by the
//! transport and the dispatcher.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Request
// ─────────────────────────────────────────────

/// POST body sent to the service for each forwarded line.
///
/// `session_id` is serialized as `null` on the first exchange; afterwards it
/// carries the identifier the service handed back most recently.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GameRequest {
    pub message: String,
    pub session_id: Option<String>,
}

impl GameRequest {
    /// Build the body for one forwarded message.
    pub fn new(message: impl Into<String>, session_id: Option<String>) -> Self {
        GameRequest {
            message: message.into(),
            session_id,
        }
    }
}

// ─────────────────────────────────────────────
// Replies
// ─────────────────────────────────────────────

/// Success body (status 200).
///
/// Both fields are optional on the wire; a missing `message` decodes as the
/// empty string.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GameReply {
    /// Reply text, `\n`-delimited when the service answers in several lines.
    #[serde(default)]
    pub message: String,
    /// Replacement conversation identifier. When present it supersedes
    /// whatever is stored locally.
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Error body (non-200). Only `detail` is consumed.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}

/// Decoded outcome of one exchange with the service.
///
/// Transport-level failures are *not* represented here; they surface as an
/// error from the transport and end the run. A reachable service that
/// refuses the request is a `ServiceError`, shown to the user while the
/// session continues.
#[derive(Clone, Debug, PartialEq)]
pub enum WoprResponse {
    /// The service answered.
    Reply(GameReply),
    /// The service refused; `detail` is printed as an error line.
    ServiceError { detail: String },
}

impl WoprResponse {
    /// Create a success reply.
    pub fn reply(message: impl Into<String>, session_id: Option<String>) -> Self {
        WoprResponse::Reply(GameReply {
            message: message.into(),
            session_id,
        })
    }

    /// Create a service-error outcome.
    pub fn service_error(detail: impl Into<String>) -> Self {
        WoprResponse::ServiceError {
            detail: detail.into(),
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

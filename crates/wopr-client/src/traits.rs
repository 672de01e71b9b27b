//! Transport trait — the abstraction between the dispatcher and the wire.

use async_trait::async_trait;

use wopr_core::types::WoprResponse;

use crate::http_client::ClientError;

/// One request/response exchange with the WOPR service.
///
/// `Err` means the service could not be reached at all, which is fatal for
/// this client. A reachable service that refuses the request is an `Ok`
/// carrying [`WoprResponse::ServiceError`], which the caller shows and
/// recovers from.
#[async_trait]
pub trait GameTransport: Send + Sync {
    /// Send one message, with the currently stored conversation identifier
    /// if there is one.
    ///
    /// An identifier in the returned reply is authoritative; the caller
    /// persists it before printing anything.
    async fn send(
        &self,
        message: &str,
        session_id: Option<&str>,
    ) -> Result<WoprResponse, ClientError>;
}

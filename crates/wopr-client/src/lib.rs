//! HTTP transport layer for the WOPR conversational service.
//!
//! # Architecture
//!
//! - [`traits::GameTransport`] — the seam the dispatcher talks through
//! - [`http_client::WoprClient`] — `reqwest`-backed implementation

pub mod http_client;
pub mod traits;

pub use http_client::{ClientError, WoprClient};
pub use traits::GameTransport;

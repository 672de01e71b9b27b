//! Session identity persistence.
//!
//! # Disk format
//!
//! A single JSON object `{"session_id": "..."}` in the file the store was
//! created with, by default `wopr_session.json` in the working directory.
//! One identifier at most; saving always rewrites the whole file.

pub mod store;

pub use store::{SessionStore, StoreError, SESSION_FILE};

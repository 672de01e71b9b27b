//! Shared core for the WOPR terminal client — wire types, the session
//! store, and configuration.

pub mod config;
pub mod session;
pub mod types;

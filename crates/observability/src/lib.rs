//! Tracing and logging setup shared by programs embedding the client.
//!
//! The client crates only emit `tracing` events; installing a subscriber is
//! left to the host process, through one of these functions.

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use tracing::{LogConfig, LogFormat, init, init_test, init_with};

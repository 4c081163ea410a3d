//! HTTP API module.
//!
//! - Server: axum router and handlers
//! - Types: response payloads
//! - Logs: SSE log broadcasting

pub mod logs;
pub mod server;
pub mod types;

//! HTTP surface modules.

/// Problem response helpers and error types.
pub mod errors;
/// Deploy and health handlers.
pub mod handlers;
/// Router construction and server host.
pub mod router;

#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! HTTP surface for the deployment pipeline.
//!
//! Layout: `http/` (errors, handlers, router), `state.rs` (shared handler
//! state).

pub mod http;
mod state;

pub use http::router::ApiServer;
pub use state::ApiState;

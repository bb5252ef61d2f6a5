//! HTTP API subsystem.
//!
//! # Data Flow
//! ```text
//! startup
//!     → ConfigLoader::load_local_config
//!     → HttpServer::new (safe view + service index, shared via Arc)
//!
//! request
//!     → server.rs (request id, tracing, timeout)
//!     → handler reads the shared view, or the persisted snapshot
//!     → JSON
//! ```
//!
//! Secrets never leave the process through this API.

pub mod server;

pub use server::{AppState, HttpServer};

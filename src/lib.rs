//! Dashboard configuration pipeline.
//!
//! Turns an untrusted YAML document into a validated, normalized,
//! default-populated [`CompleteConfig`], and derives the views the rest of the
//! application needs from it.

pub mod config;
pub mod http;
pub mod observability;
pub mod storage;

pub use config::schema::CompleteConfig;
pub use config::ConfigLoader;
pub use http::HttpServer;

//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! config loader produces:
//!     → logging.rs (structured log events)
//!     → metrics.rs (load outcomes, service counts)
//!     → reporter.rs (failed loads, via an injected ErrorReporter)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → /metrics endpoint (Prometheus scrape) when serving
//! ```
//!
//! # Design Decisions
//! - Structured logging through `tracing`; format chosen at startup
//! - Metrics are no-ops until a recorder is installed
//! - Load failures go through a reporter trait so tests can observe them

pub mod logging;
pub mod metrics;
pub mod reporter;

pub use logging::{init_logging, LogFormat};
pub use reporter::{ErrorReporter, TracingReporter};

//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! http + analytics produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Metrics endpoint (Prometheus scrape), when enabled
//! ```
//!
//! # Design Decisions
//! - Request ID is attached to the request span by the trace layer
//! - Metrics are cheap (atomic increments) and off by default

pub mod logging;
pub mod metrics;

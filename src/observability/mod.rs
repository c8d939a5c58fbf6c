//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! request handling produces:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout log stream
//!     → Prometheus scrape endpoint
//! ```

pub mod logging;
pub mod metrics;

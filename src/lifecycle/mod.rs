//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Ctrl-C or explicit trigger
//!     → shutdown.rs (broadcast to subscribers)
//!     → server drains in-flight requests → exit
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;

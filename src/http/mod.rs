//! HTTP surface of the relay.
//!
//! # Data Flow
//! ```text
//! inbound GET /api/{*target}
//!     → server.rs (Axum setup, request ID, tracing)
//!     → relay pipeline (resolve → fetch → decompress → rewrite)
//!     → 200 text/html with permissive CORS, or a structured JSON error
//! ```

pub mod server;

pub use server::HttpServer;

//! The fetch → decompress → rewrite pipeline.
//!
//! # Data Flow
//! ```text
//! captured path segments
//!     → target.rs (join, percent-decode once)
//!     → fetch.rs (single upstream GET, fixed header profile, full buffer)
//!     → decompress.rs (simple frame first, streaming fallback)
//!     → rewrite.rs (lossy UTF-8, origin substitution, <base> injection)
//!     → rewritten document
//! ```
//!
//! # Design Decisions
//! - Every stage is request-scoped; nothing survives a request or is
//!   shared between concurrent ones
//! - The decompression strategies are probed in a fixed order; the second
//!   runs only after the first has failed
//! - Errors carry enough context to render the structured JSON body

pub mod decompress;
pub mod fetch;
pub mod rewrite;
pub mod target;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

pub use rewrite::Rewriter;

/// Errors that can occur while relaying a document.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The inbound path carried no target URL.
    #[error("No URL provided")]
    MissingTarget,

    /// The upstream answered with a non-success status.
    #[error("Failed to fetch the target URL")]
    UpstreamFetchFailed { status: StatusCode },

    /// Neither decompression strategy accepted the body.
    #[error("Decompression failed")]
    DecompressionFailed { simple: String, stream: String },

    /// Percent-decoding the target produced invalid UTF-8.
    #[error("Malformed target URL encoding")]
    TargetDecode(#[from] std::string::FromUtf8Error),

    /// The upstream request failed below the HTTP layer.
    #[error("Upstream request failed")]
    Transport(#[from] reqwest::Error),
}

impl RelayError {
    /// Status code of the relay's own response for this error.
    ///
    /// Deliberately independent of the upstream's actual status: any
    /// upstream non-success maps to a 400 toward the caller.
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MissingTarget => StatusCode::BAD_REQUEST,
            RelayError::UpstreamFetchFailed { .. } => StatusCode::BAD_REQUEST,
            RelayError::DecompressionFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::TargetDecode(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label for logs and metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            RelayError::MissingTarget => "missing_target",
            RelayError::UpstreamFetchFailed { .. } => "upstream_status",
            RelayError::DecompressionFailed { .. } => "decompression",
            RelayError::TargetDecode(_) => "target_decode",
            RelayError::Transport(_) => "transport",
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            RelayError::MissingTarget => None,
            RelayError::UpstreamFetchFailed { status } => {
                Some(format!("upstream returned {}", status))
            }
            RelayError::DecompressionFailed { simple, stream } => Some(format!(
                "Simple decompression error: {simple}; Stream decompression error: {stream}"
            )),
            RelayError::TargetDecode(e) => Some(e.to_string()),
            RelayError::Transport(e) => Some(e.to_string()),
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self.details() {
            Some(details) => serde_json::json!({
                "error": self.to_string(),
                "details": details,
            }),
            None => serde_json::json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

/// Run the whole pipeline for one request.
///
/// `segments` are the path segments captured by the route, in order. An
/// empty capture is rejected by the resolver before any upstream contact.
pub async fn relay(
    client: &reqwest::Client,
    rewriter: &Rewriter,
    segments: &[&str],
) -> Result<String, RelayError> {
    let target_url = target::resolve(segments)?;
    let payload = fetch::fetch_compressed(client, &target_url).await?;
    let document = decompress::decompress(&payload)?;
    Ok(rewriter.rewrite(&document))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_segments_never_reach_the_network() {
        let client = reqwest::Client::new();
        let rewriter = Rewriter::new("https://a.example", "https://b.example/");

        // A connection attempt would surface as Transport, not MissingTarget.
        let err = relay(&client, &rewriter, &[]).await.unwrap_err();
        assert!(matches!(err, RelayError::MissingTarget));
    }
}

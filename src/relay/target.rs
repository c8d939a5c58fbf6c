//! Target URL resolution.
//!
//! The inbound path suffix carries the upstream address as URL-encoded
//! segments. Joining them restores the slashes the router split on;
//! decoding once restores the URL the caller encoded.

use crate::relay::RelayError;

/// Reconstruct the target URL from the captured path segments.
///
/// Joins the segments with `/` and percent-decodes the result exactly
/// once. Fails with [`RelayError::MissingTarget`] when nothing usable was
/// captured, before any upstream contact.
pub fn resolve(segments: &[&str]) -> Result<String, RelayError> {
    if segments.is_empty() {
        return Err(RelayError::MissingTarget);
    }

    let joined = segments.join("/");
    if joined.is_empty() {
        return Err(RelayError::MissingTarget);
    }

    let decoded = urlencoding::decode(&joined)?;
    Ok(decoded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joins_segments_with_slashes() {
        let url = resolve(&["https:", "", "example.com", "watch"]).unwrap();
        assert_eq!(url, "https://example.com/watch");
    }

    #[test]
    fn test_encode_then_resolve_round_trips() {
        let original = "https://example.com/watch?v=a b&list=1";
        let encoded = urlencoding::encode(original).into_owned();
        let url = resolve(&[encoded.as_str()]).unwrap();
        assert_eq!(url, original);
    }

    #[test]
    fn test_empty_segment_set_is_rejected() {
        assert!(matches!(resolve(&[]), Err(RelayError::MissingTarget)));
        assert!(matches!(resolve(&[""]), Err(RelayError::MissingTarget)));
    }

    #[test]
    fn test_decodes_exactly_once() {
        // %252F decodes to %2F, not to a slash
        let url = resolve(&["https%3A%2F%2Fexample.com%2Fa%252Fb"]).unwrap();
        assert_eq!(url, "https://example.com/a%2Fb");
    }
}

//! Dual-strategy Zstandard decompression.
//!
//! Upstreams emit either a single size-annotated frame or a stream of
//! frames without a declared total size, depending on server
//! configuration and content size. The two framings cannot be told apart
//! without decoding, so the simple strategy is probed first and the
//! streaming strategy runs only after it has failed. A body that neither
//! strategy accepts is a hard failure; the relay never passes bytes
//! through undecoded.

use std::io;

use crate::relay::RelayError;

/// Decompress a fully buffered payload.
///
/// On success exactly one strategy produced the output; on failure both
/// failure reasons are carried for diagnostics.
pub fn decompress(payload: &[u8]) -> Result<Vec<u8>, RelayError> {
    match decompress_simple(payload) {
        Ok(bytes) => Ok(bytes),
        Err(simple_err) => match decompress_stream(payload) {
            Ok(bytes) => Ok(bytes),
            Err(stream_err) => Err(RelayError::DecompressionFailed {
                simple: simple_err.to_string(),
                stream: stream_err.to_string(),
            }),
        },
    }
}

/// Decode the payload as one self-contained frame.
///
/// Requires the frame header to declare its decompressed size. Frames
/// produced by streaming encoders carry no such declaration and fall
/// through to [`decompress_stream`].
fn decompress_simple(payload: &[u8]) -> io::Result<Vec<u8>> {
    let content_size = zstd::zstd_safe::get_frame_content_size(payload)
        .map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                "not a valid Zstandard frame header",
            )
        })?
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                "frame does not declare a content size",
            )
        })?;
    let capacity = usize::try_from(content_size).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            "declared content size does not fit in memory",
        )
    })?;

    zstd::bulk::decompress(payload, capacity)
}

/// Decode the payload as a sequence of frames of unknown total size.
fn decompress_stream(payload: &[u8]) -> io::Result<Vec<u8>> {
    zstd::stream::decode_all(payload)
}

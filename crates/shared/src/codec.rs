//! Blob codec for persisted reports.
//!
//! Values are serialized to JSON and then compressed with zstd. Decoding
//! reverses both steps and must reproduce the original value exactly.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// zstd level used for stored blobs.
pub const COMPRESSION_LEVEL: i32 = 3;

/// Errors raised while encoding or decoding a blob.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Compression error: {0}")]
    Compression(#[from] std::io::Error),
}

/// Serialize `value` to JSON and compress it.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
    let json = serde_json::to_vec(value)?;
    let compressed = zstd::stream::encode_all(json.as_slice(), COMPRESSION_LEVEL)?;
    Ok(compressed)
}

/// Decompress `bytes` and parse the JSON payload.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    let json = zstd::stream::decode_all(bytes)?;
    let value = serde_json::from_slice(&json)?;
    Ok(value)
}

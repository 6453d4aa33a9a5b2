//! Payload compression identifiers and codecs.
//!
//! The publisher compresses every sample payload with the algorithm selected
//! on the command line; the subscriber reads the identifier back from each
//! received sample and reverses it. `NONE` is a pass-through so the rest of
//! the pipeline never special-cases uncompressed payloads.

use std::io::Write;

use bincode::{Decode, Encode};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::error::LinecastError;
use crate::result::Result;

/// Supported payload compression algorithms.
///
/// Accepted on the command line as NONE, LZ4, ZLIB, or BZIP2 (case does not
/// matter). LZ4 is the default.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Encode,
    Decode,
    ValueEnum,
    Display,
    EnumString,
)]
#[clap(rename_all = "UPPER")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum CompressionId {
    /// No compression; payloads travel as-is.
    None,
    /// LZ4 block compression with a length prefix.
    Lz4,
    /// DEFLATE with a zlib header.
    Zlib,
    /// Burrows-Wheeler bzip2 compression.
    Bzip2,
}

impl Default for CompressionId {
    fn default() -> Self {
        CompressionId::Lz4
    }
}

/// Compress `payload` with the algorithm identified by `id`.
pub fn compress(id: CompressionId, payload: &[u8]) -> Result<Vec<u8>> {
    match id {
        CompressionId::None => Ok(payload.to_vec()),
        CompressionId::Lz4 => Ok(lz4_flex::compress_prepend_size(payload)),
        CompressionId::Zlib => {
            let mut encoder =
                flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
            encoder.write_all(payload)?;
            Ok(encoder.finish()?)
        }
        CompressionId::Bzip2 => {
            let mut encoder =
                bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
            encoder.write_all(payload)?;
            Ok(encoder.finish()?)
        }
    }
}

/// Reverse [`compress`] for a payload stamped with `id`.
pub fn decompress(id: CompressionId, payload: &[u8]) -> Result<Vec<u8>> {
    match id {
        CompressionId::None => Ok(payload.to_vec()),
        CompressionId::Lz4 => lz4_flex::decompress_size_prepended(payload)
            .map_err(|e| LinecastError::Compression(e.to_string())),
        CompressionId::Zlib => {
            let mut decoder = flate2::write::ZlibDecoder::new(Vec::new());
            decoder.write_all(payload)?;
            Ok(decoder.finish()?)
        }
        CompressionId::Bzip2 => {
            let mut decoder = bzip2::write::BzDecoder::new(Vec::new());
            decoder.write_all(payload)?;
            Ok(decoder.finish()?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn none_is_a_pass_through() {
        let payload = b"a line that is not compressed".to_vec();
        assert_eq!(compress(CompressionId::None, &payload).unwrap(), payload);
        assert_eq!(decompress(CompressionId::None, &payload).unwrap(), payload);
    }

    #[test]
    fn every_codec_round_trips_a_compressible_payload() {
        // Zero-filled, like the synthetic payload the publisher falls back to.
        let payload = vec![0u8; 1024];
        for id in [CompressionId::Lz4, CompressionId::Zlib, CompressionId::Bzip2] {
            let compressed = compress(id, &payload).unwrap();
            assert!(
                compressed.len() < payload.len(),
                "{id} did not shrink a zero-filled payload"
            );
            assert_eq!(decompress(id, &compressed).unwrap(), payload);
        }
    }

    #[test]
    fn identifiers_parse_case_insensitively() {
        assert_eq!(
            <CompressionId as FromStr>::from_str("LZ4").unwrap(),
            CompressionId::Lz4
        );
        assert_eq!(
            <CompressionId as FromStr>::from_str("zlib").unwrap(),
            CompressionId::Zlib
        );
        assert_eq!(
            <CompressionId as FromStr>::from_str("Bzip2").unwrap(),
            CompressionId::Bzip2
        );
        assert_eq!(
            <CompressionId as FromStr>::from_str("none").unwrap(),
            CompressionId::None
        );
        assert!(<CompressionId as FromStr>::from_str("SNAPPY").is_err());
    }

    #[test]
    fn identifiers_display_in_their_wire_spelling() {
        assert_eq!(CompressionId::None.to_string(), "NONE");
        assert_eq!(CompressionId::Lz4.to_string(), "LZ4");
        assert_eq!(CompressionId::Zlib.to_string(), "ZLIB");
        assert_eq!(CompressionId::Bzip2.to_string(), "BZIP2");
    }

    #[test]
    fn corrupted_lz4_input_is_reported() {
        let err = decompress(CompressionId::Lz4, b"not an lz4 block").unwrap_err();
        assert!(matches!(err, LinecastError::Compression(_)));
    }
}

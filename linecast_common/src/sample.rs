//! Wire sample type streamed from publisher to subscribers.
//!
//! One `Sample` is sent per UDP datagram, encoded with `bincode`. The payload
//! is one line of the input file (or the synthetic zero-filled payload) after
//! compression; the stamped [`CompressionId`] tells the subscriber how to
//! reverse it.

use bincode::{Decode, Encode};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::compression::CompressionId;
use crate::result::Result;

/// Size of the zero-filled payload published when no input file is given.
pub const SYNTHETIC_PAYLOAD_LEN: usize = 1024;

/// A single published sample.
#[derive(Debug, Clone, Encode, Decode, Serialize, Deserialize)]
pub struct Sample {
    /// Monotonic sequence number assigned by the publisher, starting at 0.
    pub sequence: u64,
    /// Algorithm the payload was compressed with.
    pub compression: CompressionId,
    /// Compressed payload bytes.
    pub payload: Vec<u8>,
    /// UTC publish timestamp in milliseconds since Unix epoch.
    pub timestamp: u64,
}

impl Sample {
    /// Create a sample stamped with the current UTC time.
    pub fn new(sequence: u64, compression: CompressionId, payload: Vec<u8>) -> Self {
        Sample {
            sequence,
            compression,
            payload,
            timestamp: Utc::now().timestamp_millis() as u64,
        }
    }

    /// Encode the sample for the UDP data path.
    pub fn to_wire_bytes(&self) -> Result<Vec<u8>> {
        let bytes = bincode::encode_to_vec(self, bincode::config::standard())?;
        Ok(bytes)
    }

    /// Decode a sample received from the UDP data path.
    pub fn from_wire_bytes(bytes: &[u8]) -> Result<Self> {
        let (sample, _) = bincode::decode_from_slice(bytes, bincode::config::standard())?;
        Ok(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_survive_a_wire_round_trip() {
        let sample = Sample::new(42, CompressionId::Zlib, vec![1, 2, 3, 4]);
        let decoded = Sample::from_wire_bytes(&sample.to_wire_bytes().unwrap()).unwrap();
        assert_eq!(decoded.sequence, 42);
        assert_eq!(decoded.compression, CompressionId::Zlib);
        assert_eq!(decoded.payload, vec![1, 2, 3, 4]);
        assert_eq!(decoded.timestamp, sample.timestamp);
    }

    #[test]
    fn truncated_datagrams_are_rejected() {
        let bytes = Sample::new(7, CompressionId::Lz4, vec![9; 64])
            .to_wire_bytes()
            .unwrap();
        assert!(Sample::from_wire_bytes(&bytes[..bytes.len() / 2]).is_err());
    }
}

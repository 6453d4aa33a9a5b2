//! Payload source for the sample feed.
//!
//! With an input file, every line becomes one sample payload, truncated to
//! the configured maximum length; the source wraps around at end of file so
//! late subscribers still receive data. Without a file, a zero-filled
//! payload of [`SYNTHETIC_PAYLOAD_LEN`] bytes is published instead.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use linecast_common::LinecastError;
use linecast_common::Result;
use linecast_common::sample::SYNTHETIC_PAYLOAD_LEN;

/// Produces one payload per published sample.
pub enum SampleSource {
    /// Lines of the input file, visited in order and cycling at the end.
    Lines {
        /// Line payloads, already truncated to the maximum length.
        lines: Vec<Vec<u8>>,
        /// Index of the next line to publish.
        next: usize,
    },
    /// Zero-filled payload repeated forever.
    Synthetic,
}

impl SampleSource {
    /// Build a source from the optional input file path.
    pub fn open(input_file: Option<&Path>, max_string_length: usize) -> Result<Self> {
        match input_file {
            Some(path) => Self::from_file(path, max_string_length),
            None => Ok(SampleSource::Synthetic),
        }
    }

    fn from_file(path: &Path, max_string_length: usize) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let mut lines = Vec::new();
        for line in reader.lines() {
            let mut bytes = line?.into_bytes();
            bytes.truncate(max_string_length);
            lines.push(bytes);
        }
        if lines.is_empty() {
            return Err(LinecastError::Format(format!(
                "input file has no lines to publish: {}",
                path.display()
            )));
        }
        Ok(SampleSource::Lines { lines, next: 0 })
    }

    /// The next payload to publish.
    pub fn next_payload(&mut self) -> Vec<u8> {
        match self {
            SampleSource::Lines { lines, next } => {
                let payload = lines[*next].clone();
                *next = (*next + 1) % lines.len();
                payload
            }
            SampleSource::Synthetic => vec![0u8; SYNTHETIC_PAYLOAD_LEN],
        }
    }
}

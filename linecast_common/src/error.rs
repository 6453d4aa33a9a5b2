//! Error types shared between the publisher and subscriber.
//!
//! The `LinecastError` enum unifies common failure cases for I/O,
//! serialization, compression, channel communication, and session setup,
//! allowing crates to propagate a single error type.
use std::io;
use std::string::FromUtf8Error;
use std::sync::PoisonError;

use thiserror::Error;

use crate::net::MAX_DOMAIN_ID;

/// Unified error type shared by publisher and subscriber.
#[derive(Error, Debug)]
pub enum LinecastError {
    /// I/O error originating from the standard library or sockets/files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic formatting/validation error with a human-readable message.
    #[error("Format error: {0}")]
    Format(String),

    /// UTF-8 conversion error when handling text content.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] FromUtf8Error),

    /// Failure while decoding a wire sample with `bincode`.
    #[error("Bincode serialization/deserialization error: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    /// Failure while encoding a wire sample with `bincode`.
    #[error("Bincode serialization/deserialization error: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// Compressing or decompressing a sample payload failed.
    #[error("Compression error: {0}")]
    Compression(String),

    /// Domain id cannot be mapped into the TCP/UDP port range.
    #[error("Domain id {0} is out of range (max {max})", max = MAX_DOMAIN_ID)]
    DomainOutOfRange(u32),

    /// Crossbeam/channel send failed (e.g., receiver dropped); contains a short context string.
    #[error("Channel send failed: {0}")]
    ChannelSend(String),

    /// Crossbeam/channel receive failed (e.g., sender closed); contains a short context string.
    #[error("Channel receive failed: {0}")]
    ChannelRecv(String),

    /// Error indicating a poisoned mutex/lock was encountered.
    #[error("Mutex Lock Poisoned: {0}")]
    MutexLock(String),

    /// Registering the interrupt/termination signal handler failed.
    #[error("Signal handler error: {0}")]
    Signal(#[from] ctrlc::Error),
}

impl<T> From<PoisonError<T>> for LinecastError {
    fn from(err: PoisonError<T>) -> Self {
        LinecastError::MutexLock(err.to_string())
    }
}

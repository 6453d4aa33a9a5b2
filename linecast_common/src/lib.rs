//!
//! Common types and utilities shared by the linecast publisher and subscriber.
//!
//! This crate aggregates:
//! - `error` — unified error type `LinecastError` used across the workspace.
//! - `result` — handy `Result<T, LinecastError>` alias.
//! - `args` — command-line parsing into the shared application configuration.
//! - `verbosity` — ordinal debug verbosity levels and their log filter mapping.
//! - `signal` — process-wide shutdown flag and POSIX signal wiring.
//! - `compression` — payload compression identifiers and codecs.
//! - `sample` — the wire sample type streamed over UDP.
//! - `command` — control commands exchanged between subscriber and publisher.
//! - `net` — domain-to-port mapping and small address helpers.
#![warn(missing_docs)]
pub mod args;
pub mod command;
pub mod compression;
pub mod error;
pub mod net;
pub mod result;
pub mod sample;
pub mod signal;
pub mod verbosity;

pub use args::{AppArgs, ParseOutcome, parse_arguments};
pub use error::LinecastError;
pub use result::Result;
pub use signal::ShutdownFlag;

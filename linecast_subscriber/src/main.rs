//! Linecast subscriber — a UDP client that subscribes to the line sample
//! stream published in its domain and logs each received sample. It binds an
//! ephemeral UDP socket, sends a `SUBSCRIBE` command to the publisher's TCP
//! command port, keeps the subscription alive with periodic `PING`s, and
//! receives samples until the configured sample count is reached or a
//! termination signal arrives.
//!
//! Usage example (CLI):
//! ```bash
//! linecast_subscriber --domain 3 --sample-count 100 -v 3
//! ```
//!
//! The publisher for the same domain is expected on the local host; domain
//! ids map to port pairs in `linecast_common::net`. Payloads are decompressed
//! with the algorithm stamped on each sample, so publisher and subscriber do
//! not need to agree on `--compression-id` up front.
#![warn(missing_docs)]
mod sender;

use crate::sender::SubscriptionSender;
use linecast_common::command::Command;
use linecast_common::compression;
use linecast_common::net;
use linecast_common::sample::{SYNTHETIC_PAYLOAD_LEN, Sample};
use linecast_common::signal::install_shutdown_handler;
use linecast_common::verbosity::Verbosity;
use linecast_common::{AppArgs, LinecastError, ParseOutcome, Result, ShutdownFlag, parse_arguments};
use log::{debug, error, info};
use std::env;
use std::io::ErrorKind;
use std::net::{TcpStream, UdpSocket};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

/// Receive timeout, so the shutdown flag is polled even on an idle stream.
const RECV_TIMEOUT: Duration = Duration::from_millis(500);
/// Extra room on top of the configured line length for compression expansion
/// and the sample envelope.
const RECV_BUFFER_SLACK: usize = 1024;

fn main() -> ExitCode {
    // Signal handlers first, argument parsing second; everything after that
    // is the middleware-facing session.
    let shutdown = ShutdownFlag::new();
    if let Err(e) = install_shutdown_handler(&shutdown) {
        eprintln!("Failed to install signal handlers: {e}");
        return ExitCode::FAILURE;
    }

    let args = match parse_arguments(env::args()) {
        ParseOutcome::Run(args) => args,
        ParseOutcome::Failure => return ExitCode::FAILURE,
        ParseOutcome::Exit => return ExitCode::SUCCESS,
    };
    init_logger(args.verbosity);

    match run(args, shutdown) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Subscriber failed: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Subscriber session: subscribe over TCP, then receive samples over UDP
/// until the sample count is reached or shutdown is requested.
fn run(args: AppArgs, shutdown: ShutdownFlag) -> Result<()> {
    let command_addr = net::addr(net::LOOPBACK, net::command_port(args.domain_id)?);
    let data_addr = net::addr(net::LOOPBACK, net::data_port(args.domain_id)?);

    let socket = Arc::new(UdpSocket::bind("0.0.0.0:0")?);
    socket.set_read_timeout(Some(RECV_TIMEOUT))?;
    let local_addr = socket.local_addr()?;
    info!("UDP subscriber listening on: {local_addr}");

    info!("Connecting to publisher command channel at {command_addr}");
    let mut tcp_stream = TcpStream::connect(&command_addr).map_err(|e| {
        LinecastError::Format(format!("Failed to connect to publisher at {command_addr}: {e}"))
    })?;

    let subscribe = Command::new_subscribe(&local_addr.ip().to_string(), local_addr.port());
    SubscriptionSender::send_command(&mut tcp_stream, &subscribe)?;

    let ping = Command::new_ping(&local_addr.ip().to_string(), local_addr.port());
    SubscriptionSender::start_ping_thread(Arc::clone(&socket), data_addr, ping, shutdown.clone());

    info!("Subscriber is running. Press Ctrl+C to exit.");
    receive_samples(&socket, &args, &shutdown)
}

/// Blocking loop that receives `Sample` datagrams, decompresses their
/// payloads, and logs them, until the sample count is reached or the
/// shutdown flag trips.
fn receive_samples(socket: &UdpSocket, args: &AppArgs, shutdown: &ShutdownFlag) -> Result<()> {
    let buffer_len = args.max_string_length.max(SYNTHETIC_PAYLOAD_LEN) + RECV_BUFFER_SLACK;
    let mut buf = vec![0u8; buffer_len];
    let mut received: u64 = 0;

    while !shutdown.is_shutdown_requested() {
        if args.sample_count.is_some_and(|limit| received >= limit) {
            info!("Received {received} samples, shutting down cleanly");
            break;
        }

        match socket.recv(&mut buf) {
            Ok(size) => match Sample::from_wire_bytes(&buf[..size]) {
                Ok(sample) => match compression::decompress(sample.compression, &sample.payload) {
                    Ok(payload) => {
                        received += 1;
                        info!(
                            "SAMPLE #{} [{}] {} bytes: {}",
                            sample.sequence,
                            sample.compression,
                            payload.len(),
                            payload_preview(&payload)
                        );
                    }
                    Err(e) => error!("Failed to decompress sample #{}: {e}", sample.sequence),
                },
                Err(e) => debug!("Received undecodable datagram ({size} bytes): {e}"),
            },
            Err(e) if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::TimedOut => {
                continue;
            }
            Err(e) => {
                error!("Receive data error: {e}");
                return Err(e.into());
            }
        }
    }
    info!("Receiver loop stopping...");
    Ok(())
}

/// Short printable preview of a payload for the status log.
fn payload_preview(payload: &[u8]) -> String {
    const PREVIEW_LEN: usize = 64;
    let text = String::from_utf8_lossy(payload);
    let trimmed = text.trim_end_matches(['\0', '\r', '\n']);
    let mut preview: String = trimmed.chars().take(PREVIEW_LEN).collect();
    if trimmed.chars().count() > PREVIEW_LEN {
        preview.push_str("...");
    }
    preview
}

fn init_logger(verbosity: Verbosity) {
    env_logger::Builder::new()
        .filter_level(verbosity.level_filter())
        .init();
}

#[cfg(test)]
mod tests {
    use super::payload_preview;

    #[test]
    fn preview_trims_padding_and_truncates() {
        assert_eq!(payload_preview(b"a short line\n"), "a short line");
        assert_eq!(payload_preview(&[0u8; 1024]), "");

        let long = "x".repeat(200);
        let preview = payload_preview(long.as_bytes());
        assert_eq!(preview.len(), 67);
        assert!(preview.ends_with("..."));
    }
}

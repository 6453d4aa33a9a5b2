//! Linecast publisher.
//!
//! This binary streams line samples over UDP to every subscriber that
//! registers over TCP. Internally it wires together four building blocks:
//!
//! - `SampleSource` — payloads to publish: the input file read line by line,
//!   or a synthetic zero-filled payload when no file is given.
//! - `SampleFeed` — produces compressed `Sample`s on a fixed cadence and
//!   broadcasts them to all registered streams via `crossbeam_channel`
//!   senders; it also enforces the sample-count limit.
//! - `SubscriptionReceiver` — listens for incoming TCP connections carrying
//!   `SUBSCRIBE` commands and reports them, along with the UDP address the
//!   subscriber wants samples sent to.
//! - Per-subscriber stream task — a lightweight thread created for each
//!   subscriber that forwards sample events to that subscriber's address.
//!
//! Concurrency and shutdown:
//! - Signal handlers are installed before anything else; interrupt and
//!   termination signals only trip the shared `ShutdownFlag`.
//! - The main loop multiplexes subscriptions and timeouts with crossbeam
//!   `select!` and a bounded tick, so the shutdown flag is polled regularly.
//! - Subscribers that stop sending keep-alive `PING`s time out via the
//!   `SubscriberMonitor` and their streams are closed individually.
//! - On shutdown every stream receives a final event and the process exits;
//!   worker threads are not joined, they end with the process.
//!
//! The command-line contract (flags, defaults, tri-state parse outcome) lives
//! in `linecast_common::args` and is shared with the subscriber binary.
#![warn(missing_docs)]
use crate::model::sample_feed::{SampleEvent, SampleFeed};
use crate::model::source::SampleSource;
use crate::model::subscriber_monitor::SubscriberMonitor;
use crate::receiver::SubscriptionReceiver;
use crate::udp_listener::UdpPingListener;
use crossbeam_channel::{Receiver, Sender, select, unbounded};
use linecast_common::command::Command;
use linecast_common::net;
use linecast_common::signal::install_shutdown_handler;
use linecast_common::verbosity::Verbosity;
use linecast_common::{AppArgs, ParseOutcome, Result, ShutdownFlag, parse_arguments};
use log::{error, info};
use std::collections::HashMap;
use std::env;
use std::net::{SocketAddr, UdpSocket};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

pub mod model;
mod receiver;
mod udp_listener;

/// A subscriber is dropped after this long without a keep-alive ping.
const PING_TIMEOUT: Duration = Duration::from_secs(5);
/// Upper bound on how long the main loop goes without polling the shutdown flag.
const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Stream task for a single subscriber.
///
/// Listens for sample events on `data_rx` and forwards each encoded sample to
/// the subscriber's `target_addr` via the provided UDP `socket`. The task
/// terminates when either:
/// - a stop signal for this subscriber is received on `stop_rx`, or
/// - a `SampleEvent::Shutdown` is received from the feed, or
/// - a send/encode error occurs.
fn handle_subscriber_stream(
    socket: Arc<UdpSocket>,
    target_addr: SocketAddr,
    data_rx: Receiver<SampleEvent>,
    stop_rx: Receiver<()>,
) -> Result<()> {
    loop {
        select! {
            recv(stop_rx) -> _ => break,
            recv(data_rx) -> msg => match msg {
                Ok(SampleEvent::Sample(sample)) => {
                    match sample.to_wire_bytes() {
                        Ok(data) => {
                            if let Err(e) = socket.send_to(&data, target_addr) {
                                error!("Failed to send UDP packet to {target_addr}: {e}");
                                break;
                            }
                        }
                        Err(e) => {
                            error!("Failed to encode sample for {target_addr}: {e}");
                            break;
                        }
                    }
                }
                Ok(SampleEvent::Shutdown) => break,
                Err(e) => {
                    error!("Sample stream channel closed: {e}");
                    break;
                }
            }
        }
    }
    Ok(())
}

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
            error!("Publisher failed: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Publisher session: bind the domain's ports, start the worker threads, and
/// serve subscriptions until the shutdown flag trips.
fn run(args: AppArgs, shutdown: ShutdownFlag) -> Result<()> {
    let command_port = net::command_port(args.domain_id)?;
    let data_port = net::data_port(args.domain_id)?;

    let udp_socket = Arc::new(UdpSocket::bind(net::addr("0.0.0.0", data_port))?);
    info!("UDP data socket created on: {}", udp_socket.local_addr()?);

    let monitor = Arc::new(Mutex::new(SubscriberMonitor::new(PING_TIMEOUT)));
    UdpPingListener::start(Arc::clone(&udp_socket), Arc::clone(&monitor));

    let (stop_tx, stop_rx) = unbounded::<SocketAddr>();
    start_timeout_checker(Arc::clone(&monitor), stop_tx);

    let (cmd_tx, cmd_rx) = unbounded::<(Command, SocketAddr)>();
    let receiver = SubscriptionReceiver::bind(&net::addr("0.0.0.0", command_port))?;
    thread::spawn(move || {
        if let Err(e) = receiver.receive_loop(cmd_tx) {
            error!("Subscription receiver failed: {e}");
        }
    });

    let source = SampleSource::open(args.input_file.as_deref(), args.max_string_length)?;
    let subscription_tx =
        SampleFeed::start(source, args.compression_id, args.sample_count, shutdown.clone());

    let mut active_streams: HashMap<SocketAddr, Sender<()>> = HashMap::new();
    info!(
        "Publisher running on domain {} (command port {command_port}, data port {data_port}). \
         Press Ctrl+C to exit.",
        args.domain_id
    );

    while !shutdown.is_shutdown_requested() {
        select! {
            recv(cmd_rx) -> msg => if let Ok((_command, target_udp_addr)) = msg {
                let (stop_stream_tx, stop_stream_rx) = unbounded::<()>();
                let (stream_data_tx, stream_data_rx) = unbounded::<SampleEvent>();

                if let Err(e) = subscription_tx.send(stream_data_tx) {
                    error!("Failed to register subscriber stream: {e}");
                    continue;
                }
                active_streams.insert(target_udp_addr, stop_stream_tx);
                // The subscription itself counts as the first sign of life.
                monitor.lock()?.record_ping(target_udp_addr);

                let socket_clone = Arc::clone(&udp_socket);
                thread::spawn(move || {
                    if let Err(e) = handle_subscriber_stream(
                        socket_clone,
                        target_udp_addr,
                        stream_data_rx,
                        stop_stream_rx,
                    ) {
                        error!("Subscriber stream error: {e}");
                    }
                });
                info!("A stream has been created for the subscriber on {target_udp_addr}");
            },

            recv(stop_rx) -> addr => if let Ok(subscriber_addr) = addr {
                if let Some(stop_stream_tx) = active_streams.remove(&subscriber_addr) {
                    let _ = stop_stream_tx.send(());
                    info!("Stream for {subscriber_addr} closed: ping timeout");
                }
            },

            default(SHUTDOWN_POLL_INTERVAL) => {}
        }
    }

    for (subscriber_addr, stop_stream_tx) in active_streams {
        let _ = stop_stream_tx.send(());
        info!("Stream for {subscriber_addr} closed: publisher shutting down");
    }
    info!("Publisher stopped");
    Ok(())
}

/// Periodically scan the monitor and report timed-out subscribers to the main
/// loop.
fn start_timeout_checker(monitor: Arc<Mutex<SubscriberMonitor>>, stop_tx: Sender<SocketAddr>) {
    thread::spawn(move || {
        let check_interval = Duration::from_secs(1);
        loop {
            thread::sleep(check_interval);
            let timed_out = match monitor.lock() {
                Ok(mut monitor) => monitor.check_timeouts(),
                Err(_) => return,
            };
            for subscriber_addr in timed_out {
                if stop_tx.send(subscriber_addr).is_err() {
                    return;
                }
            }
        }
    });
}

fn init_logger(verbosity: Verbosity) {
    env_logger::Builder::new()
        .filter_level(verbosity.level_filter())
        .init();
}

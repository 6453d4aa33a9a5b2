//! Sending control commands to the publisher.
//!
//! This module provides a small helper for encoding and sending `Command`
//! messages and for running a background `PING` loop that keeps the
//! subscription alive until shutdown.
use linecast_common::Result;
use linecast_common::ShutdownFlag;
use linecast_common::command::Command;
use log::{debug, error, info};
use std::io::{ErrorKind, Write};
use std::net::{TcpStream, UdpSocket};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Pause between keep-alive pings sent by the background thread.
const PING_INTERVAL: Duration = Duration::from_millis(2000);

/// Helper type for sending commands to the publisher.
pub struct SubscriptionSender;

impl SubscriptionSender {
    /// Encode `command` as JSON and write it to the publisher's command
    /// channel.
    pub fn send_command(stream: &mut TcpStream, command: &Command) -> Result<()> {
        let encoded = serde_json::to_vec(command)?;
        info!(
            "Sending {} command for udp://{}:{}",
            command.header, command.address, command.port
        );
        stream.write_all(&encoded)?;
        Ok(())
    }

    /// Spawn the keep-alive thread.
    ///
    /// Sends `ping_command` to `target_addr` every [`PING_INTERVAL`] until
    /// the shutdown flag trips. Transient connection-reset errors are
    /// tolerated; the publisher simply sees a missed ping.
    pub fn start_ping_thread(
        socket: Arc<UdpSocket>,
        target_addr: String,
        ping_command: Command,
        shutdown: ShutdownFlag,
    ) {
        info!("Ping thread started. Target: {target_addr}");
        thread::spawn(move || {
            let encoded = match serde_json::to_vec(&ping_command) {
                Ok(encoded) => encoded,
                Err(e) => {
                    error!("Failed to encode ping command: {e}");
                    return;
                }
            };

            while !shutdown.is_shutdown_requested() {
                thread::sleep(PING_INTERVAL);
                if shutdown.is_shutdown_requested() {
                    break;
                }
                match socket.send_to(&encoded, &target_addr) {
                    Ok(_) => debug!("PING sent to {target_addr}"),
                    Err(ref e) if e.kind() == ErrorKind::ConnectionReset => continue,
                    Err(e) => error!("Failed to send PING: {e}"),
                }
            }
            info!("Ping thread stopping...");
        });
    }
}

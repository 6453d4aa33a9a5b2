use crate::model::subscriber_monitor::SubscriberMonitor;
use linecast_common::command::Command;
use log::debug;
use std::net::UdpSocket;
use std::sync::{Arc, Mutex};
use std::thread;

/// Lightweight UDP listener that receives `PING` commands from subscribers
/// and refreshes the in-memory `SubscriberMonitor` for the sender.
pub struct UdpPingListener;

impl UdpPingListener {
    /// Spawn a background thread that reads UDP packets from `socket` and,
    /// when a `PING` command is observed, updates `monitor` for the sender.
    /// Anything else arriving on the data socket is ignored.
    pub fn start(socket: Arc<UdpSocket>, monitor: Arc<Mutex<SubscriberMonitor>>) {
        thread::spawn(move || {
            let mut buf = [0u8; 512];
            loop {
                if let Ok((size, addr)) = socket.recv_from(&mut buf) {
                    match serde_json::from_slice::<Command>(&buf[..size]) {
                        Ok(command) if command.is_ping() => {
                            debug!("Received ping from {addr}");
                            if let Ok(mut monitor) = monitor.lock() {
                                monitor.record_ping(addr);
                            }
                        }
                        Ok(command) => {
                            debug!("Ignoring {} command on the data socket", command.header);
                        }
                        Err(_) => {
                            debug!("Ignoring non-command datagram from {addr} ({size} bytes)");
                        }
                    }
                }
            }
        });
    }
}

use crossbeam_channel::Sender;
use linecast_common::LinecastError;
use linecast_common::Result;
use linecast_common::command::Command;
use log::{debug, error, info};
use std::io::Read;
use std::net::{SocketAddr, TcpListener, TcpStream};

/// TCP receiver that accepts subscription requests from subscribers.
///
/// Creates a listening socket and parses incoming `Command` messages. For
/// each successfully decoded `SUBSCRIBE`, the receiver emits the command
/// together with the subscriber's UDP target `SocketAddr` into a provided
/// channel. A malformed or unexpected command only drops that connection;
/// the accept loop keeps serving other subscribers.
pub struct SubscriptionReceiver {
    listener: TcpListener,
}

impl SubscriptionReceiver {
    /// Bind a new receiver to the provided `bind_addr` (e.g., `0.0.0.0:7400`).
    pub fn bind(bind_addr: &str) -> Result<Self> {
        let listener = TcpListener::bind(bind_addr)?;
        Ok(Self { listener })
    }

    /// Blocking loop that accepts TCP connections, reads a single `Command`
    /// per connection, and forwards it to `tx` with the UDP address samples
    /// should be sent to.
    pub fn receive_loop(self, tx: Sender<(Command, SocketAddr)>) -> Result<()> {
        info!(
            "Subscription TCP listener started on {}",
            self.listener.local_addr()?
        );

        for stream in self.listener.incoming() {
            match stream {
                Ok(mut stream) => {
                    if let Err(e) = Self::handle_connection(&mut stream, &tx) {
                        error!("Dropping subscription attempt: {e}");
                    }
                }
                Err(e) => error!("TCP connection error: {e}"),
            }
        }
        Ok(())
    }

    /// Read and validate one command from a freshly accepted connection.
    fn handle_connection(stream: &mut TcpStream, tx: &Sender<(Command, SocketAddr)>) -> Result<()> {
        let peer_addr = stream.peer_addr()?;
        debug!("Subscriber connected from {peer_addr}");

        let mut buf = [0u8; 1024];
        let size = stream.read(&mut buf)?;
        let command: Command = serde_json::from_slice(&buf[..size])?;

        if !command.is_subscribe() {
            return Err(LinecastError::Format(format!(
                "unexpected command header on the subscription channel: {}",
                command.header
            )));
        }

        // Samples go to the address the connection came from, at the UDP port
        // the subscriber announced.
        let target_udp_addr = SocketAddr::new(peer_addr.ip(), command.port);
        info!("Received subscription for {target_udp_addr}");
        tx.send((command, target_udp_addr))
            .map_err(|e| LinecastError::ChannelSend(e.to_string()))?;
        Ok(())
    }
}

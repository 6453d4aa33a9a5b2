//! Shared control command type used by subscriber and publisher.
//!
//! A `Command` is either a subscription request (`SUBSCRIBE`) announcing the
//! UDP port the subscriber listens on, or a keep-alive `PING`. Values are
//! serialized as JSON on the control path.
use serde::{Deserialize, Serialize};

/// Header value for subscription commands.
pub const SUBSCRIBE: &str = "SUBSCRIBE";
/// Header value for keep-alive pings.
pub const PING: &str = "PING";
/// Transport kind of the data path (currently UDP).
pub const CONNECTION: &str = "udp";

/// Control command sent from subscriber to publisher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Command {
    /// Command kind. Either `SUBSCRIBE` or `PING`.
    pub header: String,
    /// Transport protocol name of the data path (e.g., `udp`).
    pub connection: String,
    /// Subscriber IP address, as observed locally.
    pub address: String,
    /// UDP port the subscriber receives samples on.
    pub port: u16,
}

impl Command {
    /// Creates a new subscription (`SUBSCRIBE`) command.
    pub fn new_subscribe(address: &str, port: u16) -> Self {
        Command {
            header: String::from(SUBSCRIBE),
            connection: String::from(CONNECTION),
            address: String::from(address),
            port,
        }
    }

    /// Creates a new keep-alive `PING` command.
    pub fn new_ping(address: &str, port: u16) -> Self {
        Command {
            header: String::from(PING),
            connection: String::from(CONNECTION),
            address: String::from(address),
            port,
        }
    }

    /// Whether this command is a subscription request.
    pub fn is_subscribe(&self) -> bool {
        self.header == SUBSCRIBE
    }

    /// Whether this command is a keep-alive ping.
    pub fn is_ping(&self) -> bool {
        self.header == PING
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribe_and_ping_carry_their_headers() {
        let subscribe = Command::new_subscribe("192.168.0.10", 55555);
        assert!(subscribe.is_subscribe());
        assert!(!subscribe.is_ping());
        assert_eq!(subscribe.port, 55555);

        let ping = Command::new_ping("192.168.0.10", 55555);
        assert!(ping.is_ping());
        assert_eq!(ping.connection, CONNECTION);
    }

    #[test]
    fn commands_round_trip_through_json() {
        let command = Command::new_subscribe("10.0.0.2", 40001);
        let bytes = serde_json::to_vec(&command).unwrap();
        let decoded: Command = serde_json::from_slice(&bytes).unwrap();
        assert!(decoded.is_subscribe());
        assert_eq!(decoded.address, "10.0.0.2");
        assert_eq!(decoded.port, 40001);
    }
}

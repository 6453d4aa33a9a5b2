//! Domain-to-port mapping and small address helpers.
//!
//! Each domain id owns a consecutive pair of ports above a fixed base: a TCP
//! port for subscription commands and a UDP port for the sample stream and
//! keep-alive pings. Publisher and subscriber derive the same pair from the
//! domain id alone, so no endpoint configuration is exchanged out of band.

use crate::error::LinecastError;
use crate::result::Result;

/// First port of domain 0.
pub const DOMAIN_PORT_BASE: u16 = 7400;
/// Ports consumed per domain (command + data).
pub const PORTS_PER_DOMAIN: u16 = 2;
/// Largest domain id whose port pair still fits in the 16-bit port range.
pub const MAX_DOMAIN_ID: u32 = ((u16::MAX - DOMAIN_PORT_BASE) / PORTS_PER_DOMAIN) as u32 - 1;
/// Host the subscriber contacts for its publisher.
pub const LOOPBACK: &str = "127.0.0.1";

/// TCP port for a command channel (subscriber -> publisher) in `domain_id`.
pub fn command_port(domain_id: u32) -> Result<u16> {
    if domain_id > MAX_DOMAIN_ID {
        return Err(LinecastError::DomainOutOfRange(domain_id));
    }
    Ok(DOMAIN_PORT_BASE + domain_id as u16 * PORTS_PER_DOMAIN)
}

/// UDP port for data streaming and pings (publisher <-> subscriber) in `domain_id`.
pub fn data_port(domain_id: u32) -> Result<u16> {
    Ok(command_port(domain_id)? + 1)
}

/// Helper to format an IP address with a port like "ip:port".
pub fn addr(ip: &str, port: u16) -> String {
    format!("{}:{}", ip, port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_zero_uses_the_base_ports() {
        assert_eq!(command_port(0).unwrap(), DOMAIN_PORT_BASE);
        assert_eq!(data_port(0).unwrap(), DOMAIN_PORT_BASE + 1);
    }

    #[test]
    fn domains_own_disjoint_port_pairs() {
        assert_eq!(command_port(1).unwrap(), DOMAIN_PORT_BASE + 2);
        assert_eq!(data_port(1).unwrap(), DOMAIN_PORT_BASE + 3);
        assert_eq!(command_port(10).unwrap(), DOMAIN_PORT_BASE + 20);
    }

    #[test]
    fn largest_domain_still_fits_in_the_port_range() {
        assert_eq!(command_port(MAX_DOMAIN_ID).unwrap(), 65532);
        assert_eq!(data_port(MAX_DOMAIN_ID).unwrap(), 65533);
    }

    #[test]
    fn out_of_range_domain_is_rejected() {
        let err = command_port(MAX_DOMAIN_ID + 1).unwrap_err();
        assert!(matches!(
            err,
            crate::LinecastError::DomainOutOfRange(id) if id == MAX_DOMAIN_ID + 1
        ));
    }

    #[test]
    fn addr_formats_ip_and_port() {
        assert_eq!(addr(LOOPBACK, 7400), "127.0.0.1:7400");
    }
}

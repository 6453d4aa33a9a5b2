//! Keep-alive state tracker for UDP subscribers.
//!
//! Tracks the last time each subscriber (identified by its sample-stream
//! `SocketAddr`) sent a `PING`. Subscribers whose last ping is older than the
//! timeout are removed and returned by [`SubscriberMonitor::check_timeouts`],
//! so the main loop can close their streams.
//!
//! Time is measured with `std::time::Instant`, which is monotonic and immune
//! to system clock changes. The monitor itself is not synchronized; the
//! publisher wraps it in a `Mutex` because the ping listener thread and the
//! timeout checker both touch it.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// Tracks subscriber keep-alive pings and determines inactivity.
pub struct SubscriberMonitor {
    last_ping: HashMap<SocketAddr, Instant>,
    timeout: Duration,
}

impl SubscriberMonitor {
    /// Create a monitor that considers a subscriber dead after `timeout`
    /// without a ping.
    pub fn new(timeout: Duration) -> Self {
        Self {
            last_ping: HashMap::new(),
            timeout,
        }
    }

    /// Record a fresh ping from `addr`.
    pub fn record_ping(&mut self, addr: SocketAddr) {
        self.last_ping.insert(addr, Instant::now());
    }

    /// Remove and return every subscriber whose last ping is older than the
    /// timeout. A timed-out subscriber is reported exactly once; it reappears
    /// only after a new ping.
    pub fn check_timeouts(&mut self) -> Vec<SocketAddr> {
        let now = Instant::now();
        let timeout = self.timeout;
        let mut timed_out = Vec::new();

        self.last_ping.retain(|addr, last| {
            if now.duration_since(*last) > timeout {
                timed_out.push(*addr);
                false
            } else {
                true
            }
        });
        timed_out
    }

    /// Whether `addr` is currently considered alive.
    pub fn is_alive(&self, addr: &SocketAddr) -> bool {
        self.last_ping.contains_key(addr)
    }
}

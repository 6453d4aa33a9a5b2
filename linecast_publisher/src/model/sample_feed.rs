//! Sample production and event broadcasting.
//!
//! The `SampleFeed` runs a background thread that pulls payloads from a
//! [`SampleSource`], compresses them, and broadcasts the resulting `Sample`s
//! to all subscribed streams using `crossbeam_channel`. New streams register
//! by sending a `Sender<SampleEvent>` to the subscription channel returned by
//! [`SampleFeed::start`].
//!
//! Event model:
//! - `SampleEvent::Sample(Sample)` — one published sample.
//! - `SampleEvent::Shutdown` — signal for consumers to terminate gracefully.
//!
//! The feed owns the sample limit: once the configured sample count has been
//! published it trips the shared shutdown flag, so the whole process winds
//! down cleanly. Broadcast is best-effort; a stream whose channel is gone is
//! dropped from the list.

use crossbeam_channel::Sender;
use linecast_common::ShutdownFlag;
use linecast_common::compression::{self, CompressionId};
use linecast_common::sample::Sample;
use log::{debug, error, info};
use std::thread;
use std::time::Duration;

use crate::model::source::SampleSource;

/// Pause between consecutive samples.
pub const PUBLISH_INTERVAL: Duration = Duration::from_millis(500);

/// Message sent by the feed to its subscriber streams.
#[derive(Clone)]
pub enum SampleEvent {
    /// New sample to forward to the subscriber.
    Sample(Sample),
    /// Global shutdown notification for all consumers.
    Shutdown,
}

/// Background sample producer that broadcasts to subscriber streams.
pub struct SampleFeed;

impl SampleFeed {
    /// Start the feed thread and return a channel for registering streams.
    ///
    /// The returned `Sender<Sender<SampleEvent>>` accepts a per-stream
    /// channel; the feed pushes every event to all registered channels.
    /// Publishing stops when `sample_count` is reached (the feed then trips
    /// `shutdown` itself) or when `shutdown` is tripped elsewhere; either way
    /// every registered stream receives a final `Shutdown` event.
    pub fn start(
        mut source: SampleSource,
        compression_id: CompressionId,
        sample_count: Option<u64>,
        shutdown: ShutdownFlag,
    ) -> Sender<Sender<SampleEvent>> {
        let (subscribe_tx, subscribe_rx) = crossbeam_channel::unbounded::<Sender<SampleEvent>>();

        thread::spawn(move || {
            let mut streams: Vec<Sender<SampleEvent>> = Vec::new();
            let mut sequence: u64 = 0;
            info!("Sample feed started ({compression_id} compression)");

            while !shutdown.is_shutdown_requested() {
                while let Ok(new_stream_tx) = subscribe_rx.try_recv() {
                    streams.push(new_stream_tx);
                    info!("Feed: new subscriber stream. Total streams: {}", streams.len());
                }

                if sample_count.is_some_and(|limit| sequence >= limit) {
                    info!("Published {sequence} samples, requesting clean shutdown");
                    shutdown.request_shutdown();
                    break;
                }

                let payload = source.next_payload();
                match compression::compress(compression_id, &payload) {
                    Ok(compressed) => {
                        debug!(
                            "Publishing sample #{sequence}: {} -> {} bytes",
                            payload.len(),
                            compressed.len()
                        );
                        let sample = Sample::new(sequence, compression_id, compressed);
                        let event = SampleEvent::Sample(sample);
                        streams.retain(|stream_tx| stream_tx.send(event.clone()).is_ok());
                        sequence += 1;
                    }
                    Err(e) => {
                        error!("Compressing sample payload failed: {e}");
                        shutdown.request_shutdown();
                        break;
                    }
                }

                thread::sleep(PUBLISH_INTERVAL);
            }

            // Streams that registered after the last loop pass still get told
            // to stop.
            while let Ok(new_stream_tx) = subscribe_rx.try_recv() {
                streams.push(new_stream_tx);
            }
            for stream_tx in &streams {
                let _ = stream_tx.send(SampleEvent::Shutdown);
            }
            info!("Sample feed stopped after {sequence} samples");
        });
        subscribe_tx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use std::time::Duration;

    #[test]
    fn feed_publishes_the_requested_count_then_requests_shutdown() {
        let shutdown = ShutdownFlag::new();
        let subscribe_tx = SampleFeed::start(
            SampleSource::Synthetic,
            CompressionId::None,
            Some(2),
            shutdown.clone(),
        );

        let (stream_tx, stream_rx) = unbounded();
        subscribe_tx.send(stream_tx).unwrap();

        // The stream may register after the first publish, so only the upper
        // bound and the ordering are deterministic here.
        let mut sequences = Vec::new();
        loop {
            match stream_rx.recv_timeout(Duration::from_secs(10)).unwrap() {
                SampleEvent::Sample(sample) => sequences.push(sample.sequence),
                SampleEvent::Shutdown => break,
            }
        }
        assert!(sequences.len() <= 2);
        assert!(sequences.iter().all(|s| *s < 2));
        assert!(sequences.windows(2).all(|w| w[0] < w[1]));
        assert!(shutdown.is_shutdown_requested());
    }

    #[test]
    fn tripping_the_flag_stops_the_feed() {
        let shutdown = ShutdownFlag::new();
        let subscribe_tx = SampleFeed::start(
            SampleSource::Synthetic,
            CompressionId::Lz4,
            None,
            shutdown.clone(),
        );
        let (stream_tx, stream_rx) = unbounded();
        subscribe_tx.send(stream_tx).unwrap();

        shutdown.request_shutdown();
        // Drain until the final shutdown event arrives.
        loop {
            match stream_rx.recv_timeout(Duration::from_secs(5)).unwrap() {
                SampleEvent::Sample(_) => continue,
                SampleEvent::Shutdown => break,
            }
        }
    }
}

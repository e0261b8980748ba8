//! Producer stage: adapts an incoming frame stream to the hand-off queue.
//!
//! Real-time video favors freshness over completeness: when the queue is
//! full the incoming frame is dropped — never block, never evict the
//! queued frame, never retry — so a stalled consumer cannot grow memory or
//! end-to-end latency.

use crate::defaults;
use crate::pipeline::cancel::CancelSignal;
use crate::pipeline::handoff::{HandoffSender, Offer};
use crate::pipeline::stats::PipelineStats;
use crate::pipeline::types::FrameEvent;
use crate::room::source::FrameSource;
use std::sync::Arc;

/// How the producer stage finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProducerExit {
    /// The source reported a clean end of stream.
    EndOfStream,
    /// The source failed mid-stream. Same teardown as a clean end.
    SourceError,
    /// The consuming side of the queue is gone.
    QueueClosed,
    /// Cancelled by the supervisor (disconnect path).
    Cancelled,
}

/// Pulls frames from a source and offers them to the queue.
pub struct Producer {
    source: Box<dyn FrameSource>,
    queue: HandoffSender<FrameEvent>,
    stats: Arc<PipelineStats>,
    cancel: CancelSignal,
}

impl Producer {
    pub fn new(
        source: Box<dyn FrameSource>,
        queue: HandoffSender<FrameEvent>,
        stats: Arc<PipelineStats>,
        cancel: CancelSignal,
    ) -> Self {
        Self {
            source,
            queue,
            stats,
            cancel,
        }
    }

    /// Runs the stage to completion, consuming it.
    ///
    /// On a clean end or a mid-stream source error the end marker is
    /// enqueued exactly once. The cancelled and queue-closed paths skip
    /// the marker: dropping the sender signals the consumer just as well,
    /// and teardown is already underway elsewhere.
    pub fn run(self) -> ProducerExit {
        let Producer {
            mut source,
            queue,
            stats,
            cancel,
        } = self;

        log::info!("producer start ({})", source.name());
        let exit = loop {
            if cancel.is_cancelled() {
                break ProducerExit::Cancelled;
            }
            match source.next_frame() {
                Ok(Some(event)) => {
                    let produced = stats.record_produced();
                    match queue.offer(event) {
                        Offer::Enqueued => {}
                        Offer::Full => {
                            let dropped = stats.record_dropped();
                            if dropped % defaults::DROP_LOG_EVERY == 0 {
                                log::warn!(
                                    "queue full: {:.1}% of {} frames dropped",
                                    dropped as f64 * 100.0 / produced as f64,
                                    produced
                                );
                            }
                        }
                        Offer::Closed => break ProducerExit::QueueClosed,
                    }
                }
                Ok(None) => break ProducerExit::EndOfStream,
                Err(e) => {
                    log::error!("producer stream error: {}", e);
                    break ProducerExit::SourceError;
                }
            }
        };

        match exit {
            ProducerExit::EndOfStream | ProducerExit::SourceError => queue.finish(),
            ProducerExit::QueueClosed | ProducerExit::Cancelled => drop(queue),
        }
        log::info!("producer end ({:?})", exit);
        exit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::cancel::cancel_pair;
    use crate::pipeline::handoff::{Entry, handoff};
    use crate::room::source::MockFrameSource;
    use std::thread;
    use std::time::Duration;

    fn spawn_producer(
        source: MockFrameSource,
        capacity: usize,
    ) -> (
        crate::pipeline::handoff::HandoffReceiver<FrameEvent>,
        Arc<PipelineStats>,
        thread::JoinHandle<ProducerExit>,
    ) {
        let (tx, rx) = handoff(capacity);
        let stats = Arc::new(PipelineStats::default());
        let (_cancel_handle, cancel_signal) = cancel_pair();
        let producer = Producer::new(Box::new(source), tx, stats.clone(), cancel_signal);
        let handle = thread::spawn(move || producer.run());
        (rx, stats, handle)
    }

    #[test]
    fn test_producer_forwards_all_frames_when_queue_keeps_up() {
        let source = MockFrameSource::new().with_sequenced_frames(5);
        // Capacity above the burst size: nothing is dropped.
        let (rx, stats, handle) = spawn_producer(source, 8);

        let mut sequences = Vec::new();
        loop {
            match rx.take() {
                Entry::Item(event) => sequences.push(event.sequence),
                Entry::End => break,
            }
        }

        assert_eq!(handle.join().unwrap(), ProducerExit::EndOfStream);
        assert_eq!(sequences, vec![0, 1, 2, 3, 4]);
        assert_eq!(stats.produced(), 5);
        assert_eq!(stats.dropped(), 0);
    }

    #[test]
    fn test_producer_drops_on_full_queue_without_blocking() {
        // 100 frames offered back-to-back against capacity 1 with nothing
        // consuming: exactly one is admitted, the rest are dropped. The
        // offers never block; only the trailing end marker waits for room.
        let source = MockFrameSource::new().with_sequenced_frames(100);
        let (rx, stats, handle) = spawn_producer(source, 1);

        // All 100 offers complete while the queue sits full.
        while stats.produced() < 100 {
            thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(stats.dropped(), 99);

        // The admitted frame is the earliest one; the marker follows it.
        match rx.take() {
            Entry::Item(event) => assert_eq!(event.sequence, 0),
            Entry::End => panic!("expected the admitted frame before the marker"),
        }
        assert!(matches!(rx.take(), Entry::End));
        assert_eq!(handle.join().unwrap(), ProducerExit::EndOfStream);
        assert_eq!(
            stats.produced() - stats.dropped(),
            1,
            "drop count must equal offered minus admitted"
        );
    }

    #[test]
    fn test_producer_emits_marker_after_mid_stream_error() {
        let source = MockFrameSource::new()
            .with_sequenced_frames(5)
            .with_error_after(2);
        let (rx, stats, handle) = spawn_producer(source, 8);

        let mut delivered = 0;
        loop {
            match rx.take() {
                Entry::Item(_) => delivered += 1,
                Entry::End => break,
            }
        }

        // A mid-stream error tears down exactly like a clean end.
        assert_eq!(handle.join().unwrap(), ProducerExit::SourceError);
        assert_eq!(delivered, 2);
        assert_eq!(stats.produced(), 2);
    }

    #[test]
    fn test_producer_stops_when_queue_closed() {
        let source = MockFrameSource::new()
            .with_sequenced_frames(50)
            .with_frame_delay(Duration::from_millis(1));
        let (tx, rx) = handoff(1);
        let stats = Arc::new(PipelineStats::default());
        let (_cancel_handle, cancel_signal) = cancel_pair();
        let producer = Producer::new(Box::new(source), tx, stats, cancel_signal);
        let handle = thread::spawn(move || producer.run());

        // Simulate the consumer disappearing mid-stream.
        thread::sleep(Duration::from_millis(10));
        drop(rx);

        assert_eq!(handle.join().unwrap(), ProducerExit::QueueClosed);
    }

    #[test]
    fn test_producer_cancel_stops_ingestion_without_marker() {
        let source = MockFrameSource::new()
            .with_sequenced_frames(10_000)
            .with_frame_delay(Duration::from_millis(1));
        let (tx, rx) = handoff(1);
        let stats = Arc::new(PipelineStats::default());
        let (cancel_handle, cancel_signal) = cancel_pair();
        let producer = Producer::new(Box::new(source), tx, stats.clone(), cancel_signal);
        let handle = thread::spawn(move || producer.run());

        thread::sleep(Duration::from_millis(10));
        cancel_handle.cancel();
        // Keep the queue drained so the producer is never parked on offer.
        let drainer = thread::spawn(move || {
            loop {
                match rx.take() {
                    Entry::Item(_) => {}
                    Entry::End => break,
                }
            }
        });

        assert_eq!(handle.join().unwrap(), ProducerExit::Cancelled);
        // Dropping the sender ends the drainer via the disconnect path.
        drainer.join().unwrap();
        assert!(stats.produced() < 10_000, "cancel must stop ingestion early");
    }
}

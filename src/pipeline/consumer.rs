//! Consumer stage: drains the queue, runs the transform, publishes the
//! result.
//!
//! Each iteration is strictly sequential — no new frame is taken until the
//! current transform and publish are both done — which bounds concurrent
//! transform invocations to exactly one. Transforms may hold exclusive
//! hardware resources and rely on that bound.

use crate::defaults;
use crate::pipeline::cancel::CancelSignal;
use crate::pipeline::handoff::{Entry, HandoffReceiver};
use crate::pipeline::report::{ErrorReporter, StageError};
use crate::pipeline::stats::{PipelineStats, TimingTracker};
use crate::pipeline::transform::FrameTransform;
use crate::pipeline::types::FrameEvent;
use crate::room::sink::FrameSink;
use crossbeam_channel::select;
use std::sync::Arc;
use std::time::Instant;

/// How the consumer stage finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumerExit {
    /// The end marker was taken from the queue.
    Completed,
    /// Cancelled by the supervisor. A clean stop, not a failure.
    Cancelled,
}

/// Takes frames from the queue and drives the transform + publish step.
pub struct Consumer {
    queue: HandoffReceiver<FrameEvent>,
    transform: Box<dyn FrameTransform>,
    sink: Box<dyn FrameSink>,
    stats: Arc<PipelineStats>,
    cancel: CancelSignal,
    reporter: Arc<dyn ErrorReporter>,
}

impl Consumer {
    pub fn new(
        queue: HandoffReceiver<FrameEvent>,
        transform: Box<dyn FrameTransform>,
        sink: Box<dyn FrameSink>,
        stats: Arc<PipelineStats>,
        cancel: CancelSignal,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self {
            queue,
            transform,
            sink,
            stats,
            cancel,
            reporter,
        }
    }

    /// Runs the stage to completion, consuming it.
    ///
    /// A failed transform or publish skips that frame and continues the
    /// loop; a single bad frame never terminates the pipeline.
    pub fn run(self) -> ConsumerExit {
        let Consumer {
            queue,
            mut transform,
            mut sink,
            stats,
            cancel,
            reporter,
        } = self;
        let mut timings = TimingTracker::new();

        log::info!("consumer start ({})", transform.name());
        let exit = loop {
            let entry = select! {
                recv(queue.channel()) -> msg => msg.unwrap_or(Entry::End),
                recv(cancel.channel()) -> _ => break ConsumerExit::Cancelled,
            };
            let event = match entry {
                Entry::Item(event) => event,
                Entry::End => break ConsumerExit::Completed,
            };

            let started = Instant::now();
            let result = transform.apply(&event.frame);
            let elapsed = started.elapsed();

            // Cancellation may land while the transform is running; once it
            // has, nothing more is published.
            if cancel.is_cancelled() {
                break ConsumerExit::Cancelled;
            }

            match result {
                Ok(frame) => match sink.publish(frame) {
                    Ok(()) => {
                        timings.record(elapsed);
                        let delivered = stats.record_delivered();
                        if delivered % defaults::TIMING_LOG_EVERY == 0 {
                            log::info!(
                                "frame {} handled in {:?} (avg {:?} over last {})",
                                event.sequence,
                                elapsed,
                                timings.average(),
                                defaults::TIMING_WINDOW.min(delivered as usize)
                            );
                        }
                    }
                    Err(e) => {
                        stats.record_failed();
                        reporter.report(
                            "consumer",
                            &StageError::Recoverable(format!(
                                "publish failed for frame {}: {}",
                                event.sequence, e
                            )),
                        );
                    }
                },
                Err(e) => {
                    stats.record_failed();
                    reporter.report(
                        "consumer",
                        &StageError::Recoverable(format!(
                            "transform failed for frame {}: {}",
                            event.sequence, e
                        )),
                    );
                }
            }
        };
        log::info!("consumer end ({:?})", exit);
        exit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::cancel::{CancelHandle, cancel_pair};
    use crate::pipeline::handoff::{HandoffSender, handoff};
    use crate::pipeline::report::CollectingReporter;
    use crate::pipeline::transform::{MockTransform, Passthrough};
    use crate::room::sink::{CollectorSink, FailingSink};
    use crate::room::source::MockFrameSource;
    use std::thread;
    use std::time::{Duration, Instant as StdInstant};

    fn event(sequence: u64) -> FrameEvent {
        FrameEvent::new(
            MockFrameSource::tagged_frame(sequence),
            StdInstant::now(),
            sequence,
        )
    }

    struct Harness {
        tx: HandoffSender<FrameEvent>,
        cancel: CancelHandle,
        sink: CollectorSink,
        stats: Arc<PipelineStats>,
        reporter: CollectingReporter,
        handle: thread::JoinHandle<ConsumerExit>,
    }

    fn spawn_consumer(transform: Box<dyn FrameTransform>, capacity: usize) -> Harness {
        let (tx, rx) = handoff(capacity);
        let (cancel, cancel_signal) = cancel_pair();
        let sink = CollectorSink::new();
        let stats = Arc::new(PipelineStats::default());
        let reporter = CollectingReporter::new();
        let consumer = Consumer::new(
            rx,
            transform,
            Box::new(sink.clone()),
            stats.clone(),
            cancel_signal,
            Arc::new(reporter.clone()),
        );
        let handle = thread::spawn(move || consumer.run());
        Harness {
            tx,
            cancel,
            sink,
            stats,
            reporter,
            handle,
        }
    }

    #[test]
    fn test_consumer_publishes_in_order_and_exits_on_marker() {
        let h = spawn_consumer(Box::new(Passthrough), 8);

        for seq in 0..5u64 {
            assert_eq!(
                h.tx.offer(event(seq)),
                crate::pipeline::handoff::Offer::Enqueued
            );
        }
        h.tx.finish();

        assert_eq!(h.handle.join().unwrap(), ConsumerExit::Completed);
        let tags: Vec<u64> = h
            .sink
            .collected()
            .iter()
            .filter_map(MockFrameSource::frame_tag)
            .collect();
        assert_eq!(tags, vec![0, 1, 2, 3, 4]);
        assert_eq!(h.stats.delivered(), 5);
        assert_eq!(h.stats.failed(), 0);
    }

    #[test]
    fn test_consumer_takes_one_frame_then_marker() {
        let h = spawn_consumer(Box::new(Passthrough), 1);

        assert_eq!(
            h.tx.offer(event(0)),
            crate::pipeline::handoff::Offer::Enqueued
        );
        h.tx.finish();

        assert_eq!(h.handle.join().unwrap(), ConsumerExit::Completed);
        assert_eq!(h.sink.len(), 1);
        assert!(h.reporter.collected().is_empty());
    }

    #[test]
    fn test_consumer_cancel_while_blocked_on_take() {
        // Nothing enqueued: the consumer is parked on take(). Cancel must
        // wake it promptly and nothing may be published afterwards.
        let h = spawn_consumer(Box::new(Passthrough), 1);

        thread::sleep(Duration::from_millis(20));
        let started = StdInstant::now();
        h.cancel.cancel();

        assert_eq!(h.handle.join().unwrap(), ConsumerExit::Cancelled);
        assert!(started.elapsed() < Duration::from_millis(500));
        assert!(h.sink.is_empty());
        assert_eq!(h.stats.delivered(), 0);
    }

    #[test]
    fn test_consumer_skips_failed_transform_and_continues() {
        // Transform fails on the third invocation only: frames 0, 1, 3, 4
        // are still published, in order, and the pipeline keeps running.
        let h = spawn_consumer(Box::new(MockTransform::new().with_failure_on(3)), 8);

        for seq in 0..5u64 {
            assert_eq!(
                h.tx.offer(event(seq)),
                crate::pipeline::handoff::Offer::Enqueued
            );
        }
        h.tx.finish();

        assert_eq!(h.handle.join().unwrap(), ConsumerExit::Completed);
        let tags: Vec<u64> = h
            .sink
            .collected()
            .iter()
            .filter_map(MockFrameSource::frame_tag)
            .collect();
        assert_eq!(tags, vec![0, 1, 3, 4]);
        assert_eq!(h.stats.delivered(), 4);
        assert_eq!(h.stats.failed(), 1);

        let reported = h.reporter.collected();
        assert_eq!(reported.len(), 1);
        assert_eq!(reported[0].0, "consumer");
        assert!(reported[0].1.contains("transform failed for frame 2"));
    }

    #[test]
    fn test_consumer_survives_publish_failures() {
        let (tx, rx) = handoff(8);
        let (_cancel, cancel_signal) = cancel_pair();
        let stats = Arc::new(PipelineStats::default());
        let reporter = CollectingReporter::new();
        let consumer = Consumer::new(
            rx,
            Box::new(Passthrough),
            Box::new(FailingSink::new("track closed")),
            stats.clone(),
            cancel_signal,
            Arc::new(reporter.clone()),
        );
        let handle = thread::spawn(move || consumer.run());

        for seq in 0..3u64 {
            tx.offer(event(seq));
        }
        tx.finish();

        assert_eq!(handle.join().unwrap(), ConsumerExit::Completed);
        assert_eq!(stats.failed(), 3);
        assert_eq!(stats.delivered(), 0);
        assert_eq!(reporter.collected().len(), 3);
    }

    #[test]
    fn test_consumer_exits_when_producer_vanishes() {
        // Dropped sender without a marker (direct teardown path) reads as a
        // clean end.
        let h = spawn_consumer(Box::new(Passthrough), 1);
        drop(h.tx);
        assert_eq!(h.handle.join().unwrap(), ConsumerExit::Completed);
    }
}

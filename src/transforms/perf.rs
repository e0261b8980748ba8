//! Timing wrapper for transforms.

use crate::defaults;
use crate::error::Result;
use crate::pipeline::stats::TimingTracker;
use crate::pipeline::transform::FrameTransform;
use crate::pipeline::types::VideoFrame;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Wraps any transform and measures each invocation, keeping a rolling
/// window of recent durations.
///
/// The consumer stage already records per-frame handling time for its own
/// logs; this wrapper is for isolating one block when a pipeline composes
/// several, or for reading timings from outside the pipeline through
/// [`TimingHandle`].
pub struct TimedTransform {
    inner: Box<dyn FrameTransform>,
    timings: Arc<Mutex<TimingTracker>>,
}

impl TimedTransform {
    /// Wraps `inner`.
    pub fn new(inner: Box<dyn FrameTransform>) -> Self {
        Self {
            inner,
            timings: Arc::new(Mutex::new(TimingTracker::new())),
        }
    }

    /// Shared view of the timing window, valid after the wrapper moves
    /// into the pipeline.
    pub fn handle(&self) -> TimingHandle {
        TimingHandle {
            timings: self.timings.clone(),
        }
    }
}

impl FrameTransform for TimedTransform {
    fn apply(&mut self, frame: &VideoFrame) -> Result<VideoFrame> {
        let started = Instant::now();
        let result = self.inner.apply(frame);
        let elapsed = started.elapsed();

        let count = match self.timings.lock() {
            Ok(mut guard) => {
                guard.record(elapsed);
                guard.count()
            }
            Err(poisoned) => {
                let mut guard = poisoned.into_inner();
                guard.record(elapsed);
                guard.count()
            }
        };
        if count % defaults::TIMING_WINDOW as u64 == 0 {
            log::debug!(
                "{}: {} invocations, last {:?}",
                self.inner.name(),
                count,
                elapsed
            );
        }
        result
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

/// Read-only view of a [`TimedTransform`]'s measurements.
#[derive(Clone)]
pub struct TimingHandle {
    timings: Arc<Mutex<TimingTracker>>,
}

impl TimingHandle {
    fn read<T>(&self, f: impl FnOnce(&TimingTracker) -> T) -> T {
        match self.timings.lock() {
            Ok(guard) => f(&guard),
            Err(poisoned) => f(&poisoned.into_inner()),
        }
    }

    /// Total invocations measured.
    pub fn count(&self) -> u64 {
        self.read(|t| t.count())
    }

    /// Most recent invocation duration.
    pub fn last(&self) -> Duration {
        self.read(|t| t.last())
    }

    /// Average over the rolling window.
    pub fn average(&self) -> Duration {
        self.read(|t| t.average())
    }
}

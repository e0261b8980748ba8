//! Counters and timing for pipeline observability.
//!
//! Each counter has exactly one writing stage; readers only observe, so no
//! cross-stage synchronization beyond the atomics themselves is needed.

use crate::defaults;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Shared counters for one supervised session.
#[derive(Debug, Default)]
pub struct PipelineStats {
    /// Frames read from the source. Written by the producer.
    produced: AtomicU64,
    /// Frames dropped on a full queue. Written by the producer.
    dropped: AtomicU64,
    /// Frames published to the sink. Written by the consumer.
    delivered: AtomicU64,
    /// Frames skipped after a transform or publish failure. Written by the
    /// consumer.
    failed: AtomicU64,
    /// Pipeline sessions created. Written by the supervisor.
    sessions: AtomicU64,
}

impl PipelineStats {
    /// Records one frame read from the source; returns the new total.
    pub fn record_produced(&self) -> u64 {
        self.produced.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Records one dropped frame; returns the new total.
    pub fn record_dropped(&self) -> u64 {
        self.dropped.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Records one published frame; returns the new total.
    pub fn record_delivered(&self) -> u64 {
        self.delivered.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Records one skipped frame.
    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Records one created pipeline session.
    pub fn record_session(&self) {
        self.sessions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn produced(&self) -> u64 {
        self.produced.load(Ordering::Relaxed)
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    pub fn sessions(&self) -> u64 {
        self.sessions.load(Ordering::Relaxed)
    }

    /// Point-in-time copy of all counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            produced: self.produced(),
            dropped: self.dropped(),
            delivered: self.delivered(),
            failed: self.failed(),
            sessions: self.sessions(),
        }
    }
}

/// Plain copy of the session counters, e.g. for the shutdown summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub produced: u64,
    pub dropped: u64,
    pub delivered: u64,
    pub failed: u64,
    pub sessions: u64,
}

impl StatsSnapshot {
    /// Fraction of produced frames that were dropped, 0.0 when nothing was
    /// produced.
    pub fn drop_ratio(&self) -> f64 {
        if self.produced == 0 {
            0.0
        } else {
            self.dropped as f64 / self.produced as f64
        }
    }
}

/// Rolling record of transform invocation durations.
///
/// Keeps the most recent window of measurements plus lifetime count and
/// maximum. Owned by whichever component does the measuring.
#[derive(Debug)]
pub struct TimingTracker {
    window: VecDeque<Duration>,
    capacity: usize,
    count: u64,
    last: Duration,
    max: Duration,
}

impl TimingTracker {
    /// Creates a tracker with the default window size.
    pub fn new() -> Self {
        Self::with_window(defaults::TIMING_WINDOW)
    }

    /// Creates a tracker keeping the most recent `capacity` measurements.
    pub fn with_window(capacity: usize) -> Self {
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
            count: 0,
            last: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    /// Records one measurement.
    pub fn record(&mut self, duration: Duration) {
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(duration);
        self.count += 1;
        self.last = duration;
        if duration > self.max {
            self.max = duration;
        }
    }

    /// Total number of measurements recorded.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Most recent measurement.
    pub fn last(&self) -> Duration {
        self.last
    }

    /// Largest measurement seen.
    pub fn max(&self) -> Duration {
        self.max
    }

    /// Average over the current window, zero when empty.
    pub fn average(&self) -> Duration {
        if self.window.is_empty() {
            return Duration::ZERO;
        }
        let total: Duration = self.window.iter().sum();
        total / self.window.len() as u32
    }
}

impl Default for TimingTracker {
    fn default() -> Self {
        Self::new()
    }
}

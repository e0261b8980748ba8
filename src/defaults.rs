//! Default configuration constants for framegate.
//!
//! Shared constants used across configuration types to keep the pipeline,
//! the demo binary, and the tests in agreement.

use std::time::Duration;

/// Default hand-off queue capacity.
///
/// A capacity of 1 means the consumer always works on the newest admitted
/// frame rather than a growing backlog: under load the pipeline drops
/// frames instead of accumulating end-to-end latency.
pub const QUEUE_CAPACITY: usize = 1;

/// Default output frame width in pixels.
pub const OUTPUT_WIDTH: u32 = 1024;

/// Default output frame height in pixels.
pub const OUTPUT_HEIGHT: u32 = 768;

/// Drop-ratio log cadence: one message per this many dropped frames.
pub const DROP_LOG_EVERY: u64 = 100;

/// Handling-time log cadence: one message per this many delivered frames.
pub const TIMING_LOG_EVERY: u64 = 60;

/// Window size for rolling transform-duration statistics.
pub const TIMING_WINDOW: usize = 120;

/// Default synthetic source frame rate for the demo binary.
pub const DEMO_FPS: u32 = 30;

/// Default demo run duration in seconds.
pub const DEMO_DURATION_SECS: u64 = 10;

/// Track sid used for the demo binary's synthetic video track.
pub const DEMO_TRACK_SID: &str = "TR_synthetic";

/// Default transform for the demo binary.
pub const DEMO_TRANSFORM: &str = "color-cycle";

/// Full color-cycle oscillation period.
///
/// The hue follows a sine of elapsed time divided by this value, slowing
/// the cycle enough to be visible as a gradual wash rather than a strobe.
pub const COLOR_CYCLE_PERIOD_SECS: f32 = 5.0;

/// Overlay opacity for the color-cycle transform (0.0 = invisible).
pub const COLOR_CYCLE_ALPHA: f32 = 0.5;

/// Buffer size for the supervisor's room-event channel.
///
/// Room callbacks must never block; events beyond this backlog are dropped
/// with a warning. Real sessions produce a handful of events in total.
pub const EVENT_BUFFER: usize = 64;

/// How long shutdown waits for stage threads before detaching them.
pub const SHUTDOWN_JOIN_DEADLINE: Duration = Duration::from_secs(1);

/// Poll interval while waiting for stage threads to finish.
pub const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(50);

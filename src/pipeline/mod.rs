//! Frame pipeline: bounded hand-off between a producing and a consuming
//! stage, supervised per session.
//!
//! The producer reads a subscribed track's frames and offers each to a
//! bounded queue, dropping on overflow. The consumer drains the queue
//! through a single sequential transform and publishes to a sink. The
//! supervisor creates the pair exactly once per session, gated to the
//! first qualifying track, and tears both down together.

pub mod cancel;
pub mod consumer;
pub mod handoff;
pub mod producer;
pub mod report;
pub mod stats;
pub mod supervisor;
pub mod transform;
pub mod types;

pub use cancel::{CancelHandle, CancelSignal, cancel_pair};
pub use consumer::{Consumer, ConsumerExit};
pub use handoff::{Entry, HandoffReceiver, HandoffSender, Offer, handoff};
pub use producer::{Producer, ProducerExit};
pub use report::{CollectingReporter, ErrorReporter, LogReporter, StageError};
pub use stats::{PipelineStats, StatsSnapshot, TimingTracker};
pub use supervisor::{Supervisor, SupervisorConfig, SupervisorHandle, SupervisorState};
pub use transform::{FrameTransform, MockTransform, Passthrough};
pub use types::{FrameEvent, PixelFormat, VideoFrame};

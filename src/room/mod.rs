//! Room-facing collaborator boundaries: track events, frame sources and
//! sinks, and the synthetic source used by the demo binary.
//!
//! Connecting to an actual media room is intentionally outside this crate;
//! an adapter forwards the room SDK's callbacks as [`events::RoomEvent`]
//! messages and implements [`source::TrackStreams`] over its video streams.

pub mod events;
pub mod sink;
pub mod source;
pub mod synthetic;

pub use events::{RoomEvent, TrackKind};
pub use sink::{CollectorSink, FailingSink, FrameSink, NullSink};
pub use source::{FrameSource, MockFrameSource, StaticTrackStreams, TrackStreams};
pub use synthetic::{SyntheticConfig, SyntheticSource};

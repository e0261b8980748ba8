//! Input stream collaborators: frame sources and the track-to-stream
//! boundary.

use crate::error::{FramegateError, Result};
use crate::pipeline::types::{FrameEvent, PixelFormat, VideoFrame};
use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

/// Pull interface over a subscribed track's decoded frames.
///
/// This trait allows swapping implementations (real room stream vs mock).
/// `next_frame` blocks until the next frame is available; `Ok(None)` means
/// the stream has ended and no more frames will arrive. The sequence is
/// lazy and possibly infinite — a live track ends only when the remote
/// side stops publishing or the connection closes.
pub trait FrameSource: Send + 'static {
    /// Returns the next frame, or `None` at end of stream.
    fn next_frame(&mut self) -> Result<Option<FrameEvent>>;

    /// Name for logging.
    fn name(&self) -> &'static str {
        "source"
    }
}

/// Opens the decoded frame stream for a subscribed track.
///
/// The room SDK boundary: given the sid from a track-subscribed event,
/// produce the `FrameSource` the producer stage will read. Injected into
/// the supervisor so tests and demos can substitute scripted streams.
pub trait TrackStreams: Send + 'static {
    /// Opens the stream for `sid`.
    fn open(&mut self, sid: &str) -> Result<Box<dyn FrameSource>>;
}

/// Hands out pre-registered sources keyed by track sid.
///
/// Each registered source can be opened once; opening an unknown sid is an
/// error. Used by the demo binary and by tests.
#[derive(Default)]
pub struct StaticTrackStreams {
    sources: HashMap<String, Box<dyn FrameSource>>,
}

impl StaticTrackStreams {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `source` under `sid`, replacing any previous entry.
    pub fn register(&mut self, sid: impl Into<String>, source: Box<dyn FrameSource>) {
        self.sources.insert(sid.into(), source);
    }
}

impl TrackStreams for StaticTrackStreams {
    fn open(&mut self, sid: &str) -> Result<Box<dyn FrameSource>> {
        self.sources
            .remove(sid)
            .ok_or_else(|| FramegateError::StreamOpen {
                sid: sid.to_string(),
                message: "no source registered".to_string(),
            })
    }
}

/// Mock frame source for testing: yields a scripted list of frames, then
/// ends.
pub struct MockFrameSource {
    events: VecDeque<FrameEvent>,
    frame_delay: Option<Duration>,
    fail_after: Option<usize>,
    yielded: usize,
    error_message: String,
}

impl MockFrameSource {
    /// Creates a source with no frames (immediate end of stream).
    pub fn new() -> Self {
        Self {
            events: VecDeque::new(),
            frame_delay: None,
            fail_after: None,
            yielded: 0,
            error_message: "mock source error".to_string(),
        }
    }

    /// Configure the source to yield the given events in order.
    pub fn with_events(mut self, events: Vec<FrameEvent>) -> Self {
        self.events = events.into();
        self
    }

    /// Configure the source to yield `count` tagged 2x2 frames with
    /// sequence numbers `0..count`.
    pub fn with_sequenced_frames(mut self, count: u64) -> Self {
        self.events = (0..count)
            .map(|seq| FrameEvent::new(Self::tagged_frame(seq), Instant::now(), seq))
            .collect();
        self
    }

    /// Configure a pause before each yielded frame (paces the producer).
    pub fn with_frame_delay(mut self, delay: Duration) -> Self {
        self.frame_delay = Some(delay);
        self
    }

    /// Configure the source to fail after yielding `count` frames,
    /// simulating a mid-stream error.
    pub fn with_error_after(mut self, count: usize) -> Self {
        self.fail_after = Some(count);
        self
    }

    /// Configure the error message for failures.
    pub fn with_error_message(mut self, message: &str) -> Self {
        self.error_message = message.to_string();
        self
    }

    /// Builds a 2x2 RGB frame whose first bytes carry `sequence`, so
    /// ordering can be asserted on frames a passthrough-style transform has
    /// handled.
    pub fn tagged_frame(sequence: u64) -> VideoFrame {
        let mut data = vec![0u8; 12];
        data[..8].copy_from_slice(&sequence.to_be_bytes());
        VideoFrame::new(data, 2, 2, PixelFormat::Rgb24)
    }

    /// Reads the sequence tag from a frame built by `tagged_frame`.
    pub fn frame_tag(frame: &VideoFrame) -> Option<u64> {
        let bytes: [u8; 8] = frame.data.get(..8)?.try_into().ok()?;
        Some(u64::from_be_bytes(bytes))
    }
}

impl Default for MockFrameSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSource for MockFrameSource {
    fn next_frame(&mut self) -> Result<Option<FrameEvent>> {
        if self.fail_after == Some(self.yielded) {
            return Err(FramegateError::SourceRead {
                message: self.error_message.clone(),
            });
        }
        if let Some(delay) = self.frame_delay {
            std::thread::sleep(delay);
        }
        match self.events.pop_front() {
            Some(event) => {
                self.yielded += 1;
                Ok(Some(event))
            }
            None => Ok(None),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

//! Output sink collaborators for transformed frames.

use crate::error::{FramegateError, Result};
use crate::pipeline::types::VideoFrame;
use std::sync::{Arc, Mutex};

/// Pluggable output for the consumer stage.
///
/// Pairs with `FrameSource` for input: one finished frame per call,
/// invoked only by the consumer. Implementations are expected to keep
/// their own publish latency bounded (a real room track applies its own
/// internal backpressure).
pub trait FrameSink: Send + 'static {
    /// Publishes one finished frame.
    fn publish(&mut self, frame: VideoFrame) -> Result<()>;

    /// Name for logging.
    fn name(&self) -> &'static str {
        "sink"
    }
}

/// Discards every frame. Stands in for a real output track in demos where
/// only the counters matter.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl NullSink {
    pub fn new() -> Self {
        Self
    }
}

impl FrameSink for NullSink {
    fn publish(&mut self, _frame: VideoFrame) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "null"
    }
}

/// Collects published frames for inspection; used by tests.
///
/// Clones share storage, so a handle kept outside the pipeline observes
/// what the moved-in copy received.
#[derive(Clone, Default)]
pub struct CollectorSink {
    frames: Arc<Mutex<Vec<VideoFrame>>>,
}

impl CollectorSink {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the frames published so far, in publish order.
    pub fn collected(&self) -> Vec<VideoFrame> {
        match self.frames.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Number of frames published so far.
    pub fn len(&self) -> usize {
        match self.frames.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// True when nothing has been published.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FrameSink for CollectorSink {
    fn publish(&mut self, frame: VideoFrame) -> Result<()> {
        match self.frames.lock() {
            Ok(mut guard) => guard.push(frame),
            Err(poisoned) => poisoned.into_inner().push(frame),
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "collector"
    }
}

/// Sink that fails every publish; used by tests.
#[derive(Debug, Clone)]
pub struct FailingSink {
    error_message: String,
}

impl FailingSink {
    pub fn new(message: &str) -> Self {
        Self {
            error_message: message.to_string(),
        }
    }
}

impl FrameSink for FailingSink {
    fn publish(&mut self, _frame: VideoFrame) -> Result<()> {
        Err(FramegateError::Publish {
            message: self.error_message.clone(),
        })
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

//! Frame transform trait and test doubles.

use crate::error::{FramegateError, Result};
use crate::pipeline::types::VideoFrame;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// A frame-to-frame processing capability.
///
/// This trait is the slot the demos plug their work into: color overlays,
/// marker drawing, background removal, object detection. Implementations
/// may be slow and variable-latency (ML inference, accelerator hand-off);
/// the consumer stage guarantees at most one invocation is in flight at a
/// time, so a transform may hold an exclusive hardware context.
///
/// Implementations must produce a new frame rather than mutate their input
/// and must not retain a reference to the input buffer beyond the call.
pub trait FrameTransform: Send + 'static {
    /// Produces a new frame from `frame`. The output may have different
    /// dimensions than the input.
    fn apply(&mut self, frame: &VideoFrame) -> Result<VideoFrame>;

    /// Name for logging and the transform listing.
    fn name(&self) -> &'static str {
        "transform"
    }
}

/// Returns the input unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl FrameTransform for Passthrough {
    fn apply(&mut self, frame: &VideoFrame) -> Result<VideoFrame> {
        Ok(frame.clone())
    }

    fn name(&self) -> &'static str {
        "passthrough"
    }
}

/// Mock transform for testing.
///
/// Counts invocations through a shared handle and can be configured to
/// fail on one specific invocation (1-based) or on every invocation.
pub struct MockTransform {
    applied: Arc<AtomicU64>,
    fail_on: Option<u64>,
    fail_always: bool,
    output_size: Option<(u32, u32)>,
}

impl MockTransform {
    /// Creates a passthrough-like mock.
    pub fn new() -> Self {
        Self {
            applied: Arc::new(AtomicU64::new(0)),
            fail_on: None,
            fail_always: false,
            output_size: None,
        }
    }

    /// Configure the mock to fail on the `n`-th invocation only (1-based).
    pub fn with_failure_on(mut self, n: u64) -> Self {
        self.fail_on = Some(n);
        self
    }

    /// Configure the mock to fail on every invocation.
    pub fn with_failure(mut self) -> Self {
        self.fail_always = true;
        self
    }

    /// Configure the mock to resize its output, filling with zero bytes.
    pub fn with_output_size(mut self, width: u32, height: u32) -> Self {
        self.output_size = Some((width, height));
        self
    }

    /// Shared invocation counter, valid after the mock moves into the
    /// pipeline.
    pub fn counter(&self) -> Arc<AtomicU64> {
        self.applied.clone()
    }
}

impl Default for MockTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTransform for MockTransform {
    fn apply(&mut self, frame: &VideoFrame) -> Result<VideoFrame> {
        let n = self.applied.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_always || self.fail_on == Some(n) {
            return Err(FramegateError::Transform {
                message: format!("mock transform failure on invocation {}", n),
            });
        }
        match self.output_size {
            Some((width, height)) => {
                let len =
                    width as usize * height as usize * frame.format.bytes_per_pixel();
                Ok(VideoFrame::new(vec![0u8; len], width, height, frame.format))
            }
            None => Ok(frame.clone()),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

//! Red-dot transform: draws a solid marker in the top-left corner.
//!
//! Useful as a minimal "is my transform actually running" indicator when
//! wiring a new pipeline.

use crate::error::Result;
use crate::pipeline::transform::FrameTransform;
use crate::pipeline::types::VideoFrame;

const CENTER: (i64, i64) = (10, 10);
const RADIUS: i64 = 5;
const COLOR: [u8; 3] = [255, 0, 0];

/// Draws a solid red dot at a fixed position near the top-left corner.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedDot;

impl RedDot {
    pub fn new() -> Self {
        Self
    }
}

impl FrameTransform for RedDot {
    fn apply(&mut self, frame: &VideoFrame) -> Result<VideoFrame> {
        frame.validate()?;
        let bpp = frame.format.bytes_per_pixel();
        let width = frame.width as i64;
        let height = frame.height as i64;
        let mut data = frame.data.clone();

        let (cx, cy) = CENTER;
        for y in (cy - RADIUS).max(0)..=(cy + RADIUS).min(height - 1) {
            for x in (cx - RADIUS).max(0)..=(cx + RADIUS).min(width - 1) {
                let (dx, dy) = (x - cx, y - cy);
                if dx * dx + dy * dy <= RADIUS * RADIUS {
                    let i = (y * width + x) as usize * bpp;
                    data[i..i + 3].copy_from_slice(&COLOR);
                }
            }
        }
        Ok(VideoFrame::new(data, frame.width, frame.height, frame.format))
    }

    fn name(&self) -> &'static str {
        "red-dot"
    }
}

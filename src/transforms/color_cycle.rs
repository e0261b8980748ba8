//! Color-cycle transform: blends a slowly oscillating hue over the frame.

use crate::defaults;
use crate::error::Result;
use crate::pipeline::transform::FrameTransform;
use crate::pipeline::types::VideoFrame;
use std::time::Instant;

/// Washes every frame with a color whose hue follows a sine of elapsed
/// time, alpha-blended so the underlying video stays visible.
pub struct ColorCycle {
    epoch: Instant,
    period_secs: f32,
    alpha: f32,
}

impl ColorCycle {
    /// Creates a cycler with the default period and opacity.
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
            period_secs: defaults::COLOR_CYCLE_PERIOD_SECS,
            alpha: defaults::COLOR_CYCLE_ALPHA,
        }
    }

    /// Sets the full oscillation period in seconds.
    pub fn with_period_secs(mut self, period_secs: f32) -> Self {
        self.period_secs = period_secs;
        self
    }

    /// Sets the overlay opacity (0.0 = invisible, 1.0 = solid fill).
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }
}

impl Default for ColorCycle {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTransform for ColorCycle {
    fn apply(&mut self, frame: &VideoFrame) -> Result<VideoFrame> {
        frame.validate()?;
        let hue = hue_at(self.epoch.elapsed().as_secs_f32(), self.period_secs);
        let overlay = hsv_to_rgb(hue, 1.0, 1.0);

        let bpp = frame.format.bytes_per_pixel();
        let mut data = frame.data.clone();
        for pixel in data.chunks_mut(bpp) {
            for channel in 0..3 {
                pixel[channel] = blend(pixel[channel], overlay[channel], self.alpha);
            }
        }
        Ok(VideoFrame::new(data, frame.width, frame.height, frame.format))
    }

    fn name(&self) -> &'static str {
        "color-cycle"
    }
}

/// Hue in [0, 1] oscillating as a sine of elapsed seconds.
fn hue_at(elapsed_secs: f32, period_secs: f32) -> f32 {
    ((elapsed_secs / period_secs).sin() + 1.0) / 2.0
}

/// Converts an HSV color (all components in [0, 1]) to 8-bit RGB.
fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [u8; 3] {
    let h = ((h % 1.0) + 1.0) % 1.0;
    let i = (h * 6.0).floor();
    let f = h * 6.0 - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);
    let (r, g, b) = match (i as u32) % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    [to_byte(r), to_byte(g), to_byte(b)]
}

fn to_byte(component: f32) -> u8 {
    (component * 255.0).round().clamp(0.0, 255.0) as u8
}

fn blend(under: u8, over: u8, alpha: f32) -> u8 {
    (over as f32 * alpha + under as f32 * (1.0 - alpha))
        .round()
        .clamp(0.0, 255.0) as u8
}

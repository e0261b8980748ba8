//! Synthetic frame source for the demo binary.
//!
//! Generates a finite sequence of timestamped gradient frames at a fixed
//! rate, standing in for a webcam or a subscribed room track so the full
//! pipeline can run without any network connection.

use crate::defaults;
use crate::error::Result;
use crate::pipeline::types::{FrameEvent, PixelFormat, VideoFrame};
use crate::room::source::FrameSource;
use std::time::{Duration, Instant};

/// Configuration for the synthetic source.
#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    pub width: u32,
    pub height: u32,
    /// Frames per second the source paces itself to.
    pub fps: u32,
    /// Total frames before end of stream.
    pub frame_count: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            width: defaults::OUTPUT_WIDTH,
            height: defaults::OUTPUT_HEIGHT,
            fps: defaults::DEMO_FPS,
            frame_count: defaults::DEMO_FPS as u64 * defaults::DEMO_DURATION_SECS,
        }
    }
}

/// Paced generator of moving-gradient RGB frames.
pub struct SyntheticSource {
    config: SyntheticConfig,
    interval: Duration,
    sequence: u64,
}

impl SyntheticSource {
    /// Creates a source from the given configuration.
    ///
    /// An fps of 0 is treated as unpaced (no sleep between frames).
    pub fn new(config: SyntheticConfig) -> Self {
        let interval = if config.fps == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs(1) / config.fps
        };
        Self {
            config,
            interval,
            sequence: 0,
        }
    }

    /// Renders one gradient frame. The phase shifts with the sequence
    /// number so consecutive frames differ visibly.
    fn render(&self, sequence: u64) -> VideoFrame {
        let width = self.config.width as usize;
        let height = self.config.height as usize;
        let mut data = vec![0u8; width * height * 3];
        let phase = (sequence % 256) as u8;

        for y in 0..height {
            let row = (y * 255 / height.max(1)) as u8;
            for x in 0..width {
                let col = (x * 255 / width.max(1)) as u8;
                let i = (y * width + x) * 3;
                data[i] = col.wrapping_add(phase);
                data[i + 1] = row;
                data[i + 2] = phase;
            }
        }
        VideoFrame::new(data, self.config.width, self.config.height, PixelFormat::Rgb24)
    }
}

impl FrameSource for SyntheticSource {
    fn next_frame(&mut self) -> Result<Option<FrameEvent>> {
        if self.sequence >= self.config.frame_count {
            return Ok(None);
        }
        if !self.interval.is_zero() {
            std::thread::sleep(self.interval);
        }
        let sequence = self.sequence;
        self.sequence += 1;
        Ok(Some(FrameEvent::new(
            self.render(sequence),
            Instant::now(),
            sequence,
        )))
    }

    fn name(&self) -> &'static str {
        "synthetic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unpaced(frame_count: u64) -> SyntheticSource {
        SyntheticSource::new(SyntheticConfig {
            width: 8,
            height: 4,
            fps: 0,
            frame_count,
        })
    }

    #[test]
    fn test_yields_configured_count_then_ends() {
        let mut source = unpaced(3);
        for expected in 0..3u64 {
            let event = source.next_frame().unwrap().unwrap();
            assert_eq!(event.sequence, expected);
        }
        assert!(source.next_frame().unwrap().is_none());
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_frames_have_valid_geometry() {
        let mut source = unpaced(1);
        let event = source.next_frame().unwrap().unwrap();

        assert_eq!(event.frame.width, 8);
        assert_eq!(event.frame.height, 4);
        assert_eq!(event.frame.format, PixelFormat::Rgb24);
        assert!(event.frame.validate().is_ok());
    }

    #[test]
    fn test_consecutive_frames_differ() {
        let mut source = unpaced(2);
        let first = source.next_frame().unwrap().unwrap();
        let second = source.next_frame().unwrap().unwrap();
        assert_ne!(first.frame.data, second.frame.data);
    }

    #[test]
    fn test_default_config_matches_defaults() {
        let config = SyntheticConfig::default();
        assert_eq!(config.width, defaults::OUTPUT_WIDTH);
        assert_eq!(config.height, defaults::OUTPUT_HEIGHT);
        assert_eq!(config.fps, defaults::DEMO_FPS);
        assert_eq!(
            config.frame_count,
            defaults::DEMO_FPS as u64 * defaults::DEMO_DURATION_SECS
        );
    }

    #[test]
    fn test_pacing_sleeps_between_frames() {
        let mut source = SyntheticSource::new(SyntheticConfig {
            width: 2,
            height: 2,
            fps: 100,
            frame_count: 3,
        });
        let started = Instant::now();
        while source.next_frame().unwrap().is_some() {}
        // 3 frames at 100fps needs at least ~30ms of pacing.
        assert!(started.elapsed() >= Duration::from_millis(25));
    }
}

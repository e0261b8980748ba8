//! Data types for the frame pipeline.

use crate::error::{FramegateError, Result};
use std::time::Instant;

/// Pixel layout of a frame buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// Packed 8-bit RGB, 3 bytes per pixel.
    Rgb24,
    /// Packed 8-bit RGBA, 4 bytes per pixel.
    Rgba,
}

impl PixelFormat {
    /// Bytes per pixel for this format.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgb24 => 3,
            PixelFormat::Rgba => 4,
        }
    }

    /// Short lowercase name for logs and error messages.
    pub fn name(self) -> &'static str {
        match self {
            PixelFormat::Rgb24 => "rgb24",
            PixelFormat::Rgba => "rgba",
        }
    }
}

/// One decoded video frame.
///
/// Frames are never mutated once built; transforms allocate a new frame
/// rather than writing into their input, so no two pipeline stages ever
/// race on the same buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFrame {
    /// Packed pixel data, row-major.
    pub data: Vec<u8>,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Pixel layout of `data`.
    pub format: PixelFormat,
}

impl VideoFrame {
    /// Creates a new frame.
    pub fn new(data: Vec<u8>, width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            data,
            width,
            height,
            format,
        }
    }

    /// Expected buffer length for the frame's dimensions and format.
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * self.format.bytes_per_pixel()
    }

    /// Checks that the buffer length matches the declared geometry.
    pub fn validate(&self) -> Result<()> {
        let expected = self.expected_len();
        if self.data.len() != expected {
            return Err(FramegateError::FrameGeometry {
                width: self.width,
                height: self.height,
                format: self.format.name(),
                expected,
                actual: self.data.len(),
            });
        }
        Ok(())
    }
}

/// A frame with capture timing and stream ordering metadata.
///
/// Owned by the producer until handed to the queue; ownership transfers to
/// whichever stage dequeues it.
#[derive(Debug, Clone)]
pub struct FrameEvent {
    /// The decoded frame.
    pub frame: VideoFrame,
    /// Timestamp when this frame was captured.
    pub timestamp: Instant,
    /// Sequence number for ordering and gap detection.
    pub sequence: u64,
}

impl FrameEvent {
    /// Creates a new frame event.
    pub fn new(frame: VideoFrame, timestamp: Instant, sequence: u64) -> Self {
        Self {
            frame,
            timestamp,
            sequence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_format_bytes_per_pixel() {
        assert_eq!(PixelFormat::Rgb24.bytes_per_pixel(), 3);
        assert_eq!(PixelFormat::Rgba.bytes_per_pixel(), 4);
    }

    #[test]
    fn test_video_frame_creation() {
        let data = vec![0u8; 2 * 2 * 3];
        let frame = VideoFrame::new(data.clone(), 2, 2, PixelFormat::Rgb24);

        assert_eq!(frame.data, data);
        assert_eq!(frame.width, 2);
        assert_eq!(frame.height, 2);
        assert_eq!(frame.format, PixelFormat::Rgb24);
    }

    #[test]
    fn test_video_frame_validate_ok() {
        let frame = VideoFrame::new(vec![0u8; 4 * 2 * 4], 4, 2, PixelFormat::Rgba);
        assert!(frame.validate().is_ok());
    }

    #[test]
    fn test_video_frame_validate_mismatch() {
        let frame = VideoFrame::new(vec![0u8; 10], 4, 2, PixelFormat::Rgb24);
        let result = frame.validate();

        assert!(result.is_err());
        match result {
            Err(FramegateError::FrameGeometry {
                expected, actual, ..
            }) => {
                assert_eq!(expected, 24);
                assert_eq!(actual, 10);
            }
            _ => panic!("Expected FrameGeometry error"),
        }
    }

    #[test]
    fn test_frame_event_creation() {
        let frame = VideoFrame::new(vec![0u8; 12], 2, 2, PixelFormat::Rgb24);
        let timestamp = Instant::now();

        let event = FrameEvent::new(frame.clone(), timestamp, 42);

        assert_eq!(event.frame, frame);
        assert_eq!(event.timestamp, timestamp);
        assert_eq!(event.sequence, 42);
    }

    #[test]
    fn test_frame_event_clone_is_independent() {
        let frame = VideoFrame::new(vec![1u8; 12], 2, 2, PixelFormat::Rgb24);
        let event = FrameEvent::new(frame, Instant::now(), 0);

        let copy = event.clone();
        assert_eq!(copy.frame.data, event.frame.data);
        assert_eq!(copy.sequence, event.sequence);
    }
}

//! framegate - queued frame processing for real-time media room tracks
//!
//! Attaches a frame transform to the first qualifying video track of a
//! media room session: subscribed frames flow through a bounded hand-off
//! queue into a single sequential transform, and the result is published
//! to an output sink. Overflow is resolved by dropping frames, never by
//! blocking the producer.

// Enforce error handling discipline in non-test code
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod app;
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod room;
pub mod transforms;

// Core traits (source → transform → sink)
pub use pipeline::transform::FrameTransform;
pub use room::sink::{CollectorSink, FrameSink, NullSink};
pub use room::source::{FrameSource, StaticTrackStreams, TrackStreams};

// Pipeline
pub use pipeline::supervisor::{Supervisor, SupervisorConfig, SupervisorHandle, SupervisorState};
pub use pipeline::types::{FrameEvent, PixelFormat, VideoFrame};

// Error handling
pub use error::{FramegateError, Result};
pub use pipeline::report::{ErrorReporter, StageError};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_starts_with_cargo_version() {
        let ver = version_string();
        assert!(
            ver.starts_with(env!("CARGO_PKG_VERSION")),
            "version_string should start with CARGO_PKG_VERSION, got: {}",
            ver
        );
    }

    #[test]
    fn version_string_contains_plus_when_git_hash_present() {
        let ver = version_string();
        if option_env!("GIT_HASH").is_some_and(|h| !h.is_empty()) {
            assert!(
                ver.contains('+'),
                "With GIT_HASH set, version should contain '+', got: {}",
                ver
            );
        } else {
            assert_eq!(ver, env!("CARGO_PKG_VERSION"));
        }
    }
}

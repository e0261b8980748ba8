//! Demo entry points: wire config and CLI overrides into a supervised
//! pipeline.
//!
//! The demo drives the pipeline through the same boundary a real room
//! adapter would use: a `TrackStreams` implementation plus `RoomEvent`
//! messages. Connecting to an actual room stays outside this crate.

use crate::config::Config;
use crate::defaults;
use crate::error::{FramegateError, Result};
use crate::output::render_summary;
use crate::pipeline::supervisor::{Supervisor, SupervisorConfig};
use crate::room::events::{RoomEvent, TrackKind};
use crate::room::sink::NullSink;
use crate::room::source::StaticTrackStreams;
use crate::room::synthetic::{SyntheticConfig, SyntheticSource};
use crate::transforms;
use std::time::Duration;

/// Per-run options layered over the configuration file.
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub transform: Option<String>,
    pub duration_secs: Option<u64>,
    pub fps: Option<u32>,
    pub queue_capacity: Option<usize>,
    pub size: Option<(u32, u32)>,
}

/// Run the demo: synthetic track → queue → transform → sink.
pub fn run_demo_command(mut config: Config, overrides: RunOverrides, quiet: bool) -> Result<()> {
    if let Some(transform) = overrides.transform {
        config.demo.transform = transform;
    }
    if let Some(duration_secs) = overrides.duration_secs {
        config.demo.duration_secs = duration_secs;
    }
    if let Some(fps) = overrides.fps {
        config.demo.fps = fps;
    }
    if let Some(queue_capacity) = overrides.queue_capacity {
        config.pipeline.queue_capacity = queue_capacity;
    }
    if let Some((width, height)) = overrides.size {
        config.output.width = width;
        config.output.height = height;
    }
    if config.pipeline.queue_capacity == 0 {
        return Err(FramegateError::ConfigInvalidValue {
            key: "pipeline.queue_capacity".to_string(),
            message: "must be at least 1".to_string(),
        });
    }

    let transform = transforms::by_name(&config.demo.transform).ok_or_else(|| {
        FramegateError::ConfigInvalidValue {
            key: "demo.transform".to_string(),
            message: format!(
                "unknown transform '{}' (try `framegate transforms`)",
                config.demo.transform
            ),
        }
    })?;

    let source = SyntheticSource::new(SyntheticConfig {
        width: config.output.width,
        height: config.output.height,
        fps: config.demo.fps,
        frame_count: config.demo.fps as u64 * config.demo.duration_secs,
    });
    let mut streams = StaticTrackStreams::new();
    streams.register(defaults::DEMO_TRACK_SID, Box::new(source));

    log::info!(
        "running '{}' for {}s at {} fps ({}x{}, queue capacity {})",
        config.demo.transform,
        config.demo.duration_secs,
        config.demo.fps,
        config.output.width,
        config.output.height,
        config.pipeline.queue_capacity
    );

    let handle = Supervisor::new(SupervisorConfig {
        track_kind: TrackKind::Video,
        queue_capacity: config.pipeline.queue_capacity,
    })
    .start(Box::new(streams), transform, Box::new(NullSink::new()));

    handle.deliver(RoomEvent::TrackSubscribed {
        sid: defaults::DEMO_TRACK_SID.to_string(),
        kind: TrackKind::Video,
    });

    // The synthetic source is finite; give it its paced duration plus
    // margin before forcing a disconnect.
    let deadline = Duration::from_secs(config.demo.duration_secs + 5);
    if !handle.wait_closed(deadline) {
        log::warn!("demo still running after {:?}; disconnecting", deadline);
    }
    let snapshot = handle.shutdown();

    if !quiet {
        render_summary(&snapshot);
    }
    Ok(())
}

/// List the built-in transforms.
pub fn list_transforms_command() {
    for (name, description) in transforms::available() {
        println!("{:<14} {}", name, description);
    }
}

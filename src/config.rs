//! Configuration loading for the demo binary.

use crate::defaults;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub pipeline: PipelineConfigSection,
    pub output: OutputConfig,
    pub demo: DemoConfig,
}

/// Frame pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfigSection {
    /// Hand-off queue capacity between producer and consumer.
    pub queue_capacity: usize,
}

/// Output frame geometry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub width: u32,
    pub height: u32,
}

/// Synthetic demo source configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DemoConfig {
    /// Transform applied to every frame.
    pub transform: String,
    /// Source frame rate.
    pub fps: u32,
    /// Run duration in seconds.
    pub duration_secs: u64,
}

impl Default for PipelineConfigSection {
    fn default() -> Self {
        Self {
            queue_capacity: defaults::QUEUE_CAPACITY,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            width: defaults::OUTPUT_WIDTH,
            height: defaults::OUTPUT_HEIGHT,
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            transform: defaults::DEMO_TRANSFORM.to_string(),
            fps: defaults::DEMO_FPS,
            duration_secs: defaults::DEMO_DURATION_SECS,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't
    /// exist
    ///
    /// Only returns defaults if the file is missing.
    /// Returns errors for invalid TOML.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(e) => {
                if e.downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false)
                {
                    Ok(Self::default())
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - FRAMEGATE_TRANSFORM → demo.transform
    /// - FRAMEGATE_QUEUE_CAPACITY → pipeline.queue_capacity
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(transform) = std::env::var("FRAMEGATE_TRANSFORM")
            && !transform.is_empty()
        {
            self.demo.transform = transform;
        }

        if let Ok(capacity) = std::env::var("FRAMEGATE_QUEUE_CAPACITY")
            && !capacity.is_empty()
        {
            match capacity.parse::<usize>() {
                Ok(value) if value >= 1 => self.pipeline.queue_capacity = value,
                _ => log::warn!(
                    "ignoring FRAMEGATE_QUEUE_CAPACITY={}: not a positive integer",
                    capacity
                ),
            }
        }

        self
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/framegate/config.toml on Linux
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("framegate").join("config.toml"))
    }
}

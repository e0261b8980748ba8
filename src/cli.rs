//! Command-line interface for framegate
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Queued frame processing demos for media room tracks
#[derive(Parser, Debug)]
#[command(
    name = "framegate",
    version,
    about = "Queued frame processing demos for media room tracks"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress the summary output (quiet mode)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: stage lifecycle, -vv: per-frame diagnostics)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a transform demo against a synthetic video track
    Run {
        /// Transform to apply (see `framegate transforms`)
        #[arg(long, value_name = "NAME")]
        transform: Option<String>,

        /// Run duration. Examples: 30s, 5m, 1h30m
        #[arg(long, value_name = "DURATION", value_parser = parse_duration_secs)]
        duration: Option<u64>,

        /// Source frame rate
        #[arg(long, value_name = "FPS")]
        fps: Option<u32>,

        /// Hand-off queue capacity between producer and consumer
        #[arg(long, value_name = "N")]
        queue_capacity: Option<usize>,

        /// Frame size as WIDTHxHEIGHT (e.g. 1024x768)
        #[arg(long, value_name = "WxH", value_parser = parse_size)]
        size: Option<(u32, u32)>,
    },

    /// List available transforms
    Transforms,
}

/// Parse a duration string into seconds.
///
/// Supports any duration format accepted by `humantime`: bare numbers
/// (seconds), single-unit (`30s`, `5m`, `2h`), and compound (`1h30m`).
fn parse_duration_secs(s: &str) -> Result<u64, String> {
    let s = s.trim();
    // Bare number → seconds
    if let Ok(secs) = s.parse::<u64>() {
        return Ok(secs);
    }
    humantime::parse_duration(s)
        .map(|d| d.as_secs())
        .map_err(|e| e.to_string())
}

/// Parse a "WIDTHxHEIGHT" frame size.
fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
    let width = w.trim().parse::<u32>().map_err(|e| e.to_string())?;
    let height = h.trim().parse::<u32>().map_err(|e| e.to_string())?;
    if width == 0 || height == 0 {
        return Err("frame size must be non-zero".to_string());
    }
    Ok((width, height))
}

//! Ready-made frame transforms for the demos.
//!
//! Each of these is a pure pixel operation. ML-bound transforms
//! (background removal, object detection, face landmarks) plug into the
//! same [`FrameTransform`](crate::pipeline::transform::FrameTransform)
//! slot but live with their model runtimes, outside this crate.

pub mod color_cycle;
pub mod perf;
pub mod red_dot;

pub use color_cycle::ColorCycle;
pub use perf::{TimedTransform, TimingHandle};
pub use red_dot::RedDot;

use crate::pipeline::transform::{FrameTransform, Passthrough};

/// Name and one-line description of every built-in transform.
pub fn available() -> &'static [(&'static str, &'static str)] {
    &[
        ("passthrough", "republish input frames unchanged"),
        ("color-cycle", "blend a slowly cycling hue over every frame"),
        ("red-dot", "draw a solid red marker near the top-left corner"),
    ]
}

/// Builds a built-in transform by name.
pub fn by_name(name: &str) -> Option<Box<dyn FrameTransform>> {
    match name {
        "passthrough" => Some(Box::new(Passthrough)),
        "color-cycle" => Some(Box::new(ColorCycle::new())),
        "red-dot" => Some(Box::new(RedDot::new())),
        _ => None,
    }
}

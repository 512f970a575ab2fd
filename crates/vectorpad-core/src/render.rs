//! Render backend capability interface.
//!
//! The visual canvas is a derived projection of the scene. Two backend
//! styles exist behind this one trait: a flat backend that replays the
//! whole shape list every frame, and a retained backend that keeps live
//! per-shape objects and mutates them incrementally. The model and the
//! engines never depend on which one is active.

use crate::shapes::{Shape, ShapeId};
use kurbo::BezPath;

/// A single draw command emitted by [`RenderBackend::present`].
#[derive(Debug, Clone)]
pub enum DrawOp {
    /// Erase the whole canvas.
    Clear,
    /// Stroke a path.
    Stroke {
        path: BezPath,
        color: String,
        width: f64,
    },
}

impl DrawOp {
    /// Build the stroke op for a shape.
    pub fn stroke(shape: &Shape) -> Self {
        DrawOp::Stroke {
            path: shape.to_path(),
            color: shape.style().stroke_color.clone(),
            width: shape.style().stroke_width,
        }
    }
}

/// Display sink for the scene.
pub trait RenderBackend {
    /// Mirror a newly committed shape.
    fn add(&mut self, shape: &Shape);

    /// Mirror a geometry or transform change to an existing shape.
    fn update(&mut self, shape: &Shape);

    /// Drop a deleted shape.
    fn remove(&mut self, id: ShapeId);

    /// Mirror a style change.
    fn set_style(&mut self, id: ShapeId, color: &str, width: f64);

    /// Drop everything.
    fn clear(&mut self);

    /// Replace the transient overlay (provisional draw shape, placement
    /// preview). An empty slice removes it.
    fn set_overlay(&mut self, shapes: &[Shape]);

    /// Produce the draw commands for the current frame.
    fn present(&mut self) -> Vec<DrawOp>;
}

//! Flat render backend: full clear and redraw on every frame.

use vectorpad_core::render::{DrawOp, RenderBackend};
use vectorpad_core::shapes::{Shape, ShapeId};

/// A display sink that mirrors the committed shape list and replays it in
/// full on every present: one clear, then one stroke per shape in z-order,
/// with the transient overlay drawn last. There is no per-frame diffing;
/// immediate full redraw is the point.
#[derive(Debug, Default)]
pub struct FlatBackend {
    shapes: Vec<Shape>,
    overlay: Vec<Shape>,
    frames: u64,
}

impl FlatBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames presented so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Number of mirrored shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Check if the backend mirrors no shapes.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl RenderBackend for FlatBackend {
    fn add(&mut self, shape: &Shape) {
        self.shapes.push(shape.clone());
    }

    fn update(&mut self, shape: &Shape) {
        if let Some(existing) = self.shapes.iter_mut().find(|s| s.id() == shape.id()) {
            *existing = shape.clone();
        }
    }

    fn remove(&mut self, id: ShapeId) {
        self.shapes.retain(|s| s.id() != id);
    }

    fn set_style(&mut self, id: ShapeId, color: &str, width: f64) {
        if let Some(shape) = self.shapes.iter_mut().find(|s| s.id() == id) {
            shape.style_mut().stroke_color = color.to_string();
            shape.style_mut().stroke_width = width;
        }
    }

    fn clear(&mut self) {
        self.shapes.clear();
    }

    fn set_overlay(&mut self, shapes: &[Shape]) {
        self.overlay = shapes.to_vec();
    }

    fn present(&mut self) -> Vec<DrawOp> {
        self.frames += 1;
        let mut ops = Vec::with_capacity(1 + self.shapes.len() + self.overlay.len());
        ops.push(DrawOp::Clear);
        for shape in &self.shapes {
            ops.push(DrawOp::stroke(shape));
        }
        for shape in &self.overlay {
            ops.push(DrawOp::stroke(shape));
        }
        log::trace!("flat frame {} with {} ops", self.frames, ops.len());
        ops
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Point, Shape as KurboShape};
    use vectorpad_core::shapes::Line;

    fn line() -> Shape {
        Shape::Line(Line::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0)))
    }

    #[test]
    fn test_present_replays_everything() {
        let mut backend = FlatBackend::new();
        backend.add(&line());
        backend.add(&line());

        let ops = backend.present();
        assert_eq!(ops.len(), 3);
        assert!(matches!(ops[0], DrawOp::Clear));
        assert!(matches!(ops[1], DrawOp::Stroke { .. }));
    }

    #[test]
    fn test_overlay_drawn_last() {
        let mut backend = FlatBackend::new();
        backend.add(&line());
        let mut preview = line();
        preview.style_mut().stroke_color = "#ff0000".to_string();
        backend.set_overlay(std::slice::from_ref(&preview));

        let ops = backend.present();
        assert_eq!(ops.len(), 3);
        let DrawOp::Stroke { color, .. } = &ops[2] else {
            panic!("expected stroke last");
        };
        assert_eq!(color, "#ff0000");

        backend.set_overlay(&[]);
        assert_eq!(backend.present().len(), 2);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut backend = FlatBackend::new();
        let shape = line();
        let id = shape.id();
        backend.add(&shape);
        backend.add(&line());

        backend.remove(id);
        assert_eq!(backend.len(), 1);

        backend.clear();
        assert!(backend.is_empty());
        assert_eq!(backend.present().len(), 1);
    }

    #[test]
    fn test_set_style() {
        let mut backend = FlatBackend::new();
        let shape = line();
        let id = shape.id();
        backend.add(&shape);

        backend.set_style(id, "#0000ff", 8.0);
        let ops = backend.present();
        let DrawOp::Stroke { color, width, .. } = &ops[1] else {
            panic!("expected stroke");
        };
        assert_eq!(color, "#0000ff");
        assert!((width - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_update_replaces_geometry() {
        let mut backend = FlatBackend::new();
        let mut shape = line();
        backend.add(&shape);

        let Shape::Line(inner) = &mut shape else {
            unreachable!();
        };
        inner.end = Point::new(40.0, 40.0);
        backend.update(&shape);

        assert_eq!(backend.len(), 1);
        let ops = backend.present();
        let DrawOp::Stroke { path, .. } = &ops[1] else {
            panic!("expected stroke");
        };
        assert!((path.bounding_box().x1 - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_frame_counter() {
        let mut backend = FlatBackend::new();
        backend.present();
        backend.present();
        assert_eq!(backend.frames(), 2);
    }
}

//! Shape definitions for the drawing surface.

mod circle;
mod group;
mod line;
mod rectangle;

pub use circle::Circle;
pub use group::Group;
pub use line::Line;
pub use rectangle::Rect;

use kurbo::{Affine, BezPath, Point, Rect as KurboRect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default stroke color token.
pub const DEFAULT_STROKE_COLOR: &str = "#000000";
/// Default stroke width.
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;
/// Minimum stroke width accepted from pickers or imports.
pub const MIN_STROKE_WIDTH: f64 = 1.0;
/// Maximum stroke width accepted from pickers or imports.
pub const MAX_STROKE_WIDTH: f64 = 50.0;

/// Clamp a stroke width to the supported range.
pub fn clamp_stroke_width(width: f64) -> f64 {
    width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH)
}

/// Style properties for shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Stroke color token (hex or named).
    pub stroke_color: String,
    /// Stroke width, kept within [`MIN_STROKE_WIDTH`, `MAX_STROKE_WIDTH`].
    pub stroke_width: f64,
}

impl ShapeStyle {
    /// Create a style, clamping the width.
    pub fn new(stroke_color: impl Into<String>, stroke_width: f64) -> Self {
        Self {
            stroke_color: stroke_color.into(),
            stroke_width: clamp_stroke_width(stroke_width),
        }
    }

    /// Set the stroke width, clamping to the supported range.
    pub fn set_stroke_width(&mut self, width: f64) {
        self.stroke_width = clamp_stroke_width(width);
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke_color: DEFAULT_STROKE_COLOR.to_string(),
            stroke_width: DEFAULT_STROKE_WIDTH,
        }
    }
}

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = kurbo::Vec2::new(b.x - a.x, b.y - a.y);
    let pv = kurbo::Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    ((point.x - proj.x).powi(2) + (point.y - proj.y).powi(2)).sqrt()
}

/// Common trait for all shapes.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Get the bounding box in canvas coordinates.
    fn bounds(&self) -> KurboRect;

    /// Check if a point (in canvas coordinates) hits this shape.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Get the path representation for rendering.
    fn to_path(&self) -> BezPath;

    /// Get the style.
    fn style(&self) -> &ShapeStyle;

    /// Get mutable style.
    fn style_mut(&mut self) -> &mut ShapeStyle;

    /// Apply a transform to this shape.
    fn transform(&mut self, affine: Affine);
}

/// Enum wrapper over the three primitive kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Shape {
    Line(Line),
    Rect(Rect),
    Circle(Circle),
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        match self {
            Shape::Line(s) => s.id(),
            Shape::Rect(s) => s.id(),
            Shape::Circle(s) => s.id(),
        }
    }

    pub fn bounds(&self) -> KurboRect {
        match self {
            Shape::Line(s) => s.bounds(),
            Shape::Rect(s) => s.bounds(),
            Shape::Circle(s) => s.bounds(),
        }
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match self {
            Shape::Line(s) => s.hit_test(point, tolerance),
            Shape::Rect(s) => s.hit_test(point, tolerance),
            Shape::Circle(s) => s.hit_test(point, tolerance),
        }
    }

    pub fn to_path(&self) -> BezPath {
        match self {
            Shape::Line(s) => s.to_path(),
            Shape::Rect(s) => s.to_path(),
            Shape::Circle(s) => s.to_path(),
        }
    }

    pub fn style(&self) -> &ShapeStyle {
        match self {
            Shape::Line(s) => s.style(),
            Shape::Rect(s) => s.style(),
            Shape::Circle(s) => s.style(),
        }
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        match self {
            Shape::Line(s) => s.style_mut(),
            Shape::Rect(s) => s.style_mut(),
            Shape::Circle(s) => s.style_mut(),
        }
    }

    pub fn transform(&mut self, affine: Affine) {
        match self {
            Shape::Line(s) => s.transform(affine),
            Shape::Rect(s) => s.transform(affine),
            Shape::Circle(s) => s.transform(affine),
        }
    }

    /// Regenerate the shape's ID with a new unique identifier.
    /// Used when baking placement copies so every committed shape is addressable.
    pub fn regenerate_id(&mut self) {
        let new_id = Uuid::new_v4();
        match self {
            Shape::Line(s) => s.id = new_id,
            Shape::Rect(s) => s.id = new_id,
            Shape::Circle(s) => s.id = new_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_style() {
        let style = ShapeStyle::default();
        assert_eq!(style.stroke_color, "#000000");
        assert!((style.stroke_width - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stroke_width_clamped() {
        let mut style = ShapeStyle::new("#ff0000", 120.0);
        assert!((style.stroke_width - 50.0).abs() < f64::EPSILON);

        style.set_stroke_width(0.2);
        assert!((style.stroke_width - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_point_to_segment_dist() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!((point_to_segment_dist(Point::new(5.0, 3.0), a, b) - 3.0).abs() < f64::EPSILON);
        assert!((point_to_segment_dist(Point::new(-4.0, 0.0), a, b) - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_regenerate_id() {
        let mut shape = Shape::Line(Line::new(Point::ZERO, Point::new(10.0, 0.0)));
        let original = shape.id();
        shape.regenerate_id();
        assert_ne!(shape.id(), original);
    }
}

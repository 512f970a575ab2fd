//! Rectangle shape.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{Affine, BezPath, Point, Rect as KurboRect, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A rectangle shape.
///
/// Width and height may be negative for rectangles loaded from a document
/// that was authored backwards; the sign is resolved through [`Rect::normalized`]
/// at render and export time, never rewritten in the stored shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rect {
    pub(crate) id: ShapeId,
    /// Anchor corner position (top-left when extent is non-negative).
    pub position: Point,
    /// Width of the rectangle (may be negative).
    pub width: f64,
    /// Height of the rectangle (may be negative).
    pub height: f64,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Rect {
    /// Create a new rectangle.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width,
            height,
            style: ShapeStyle::default(),
        }
    }

    /// Create a rectangle from two corner points (always non-negative extent).
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        let min_x = p1.x.min(p2.x);
        let min_y = p1.y.min(p2.y);
        let width = (p2.x - p1.x).abs();
        let height = (p2.y - p1.y).abs();

        Self::new(Point::new(min_x, min_y), width, height)
    }

    /// Resolve the stored extent into a kurbo rect with true min/max corners.
    pub fn normalized(&self) -> KurboRect {
        let x1 = self.position.x + self.width;
        let y1 = self.position.y + self.height;
        KurboRect::new(
            self.position.x.min(x1),
            self.position.y.min(y1),
            self.position.x.max(x1),
            self.position.y.max(y1),
        )
    }
}

impl ShapeTrait for Rect {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> KurboRect {
        self.normalized()
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        // Outline only: hit on the border.
        let rect = self.normalized();
        let reach = tolerance + self.style.stroke_width / 2.0;
        let outer = rect.inflate(reach, reach);
        let inner = rect.inflate(-reach, -reach);
        outer.contains(point) && !inner.contains(point)
    }

    fn to_path(&self) -> BezPath {
        self.normalized().to_path(0.1)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn transform(&mut self, affine: Affine) {
        self.position = affine * self.position;
        // Translation plus axis-aligned scale; extent sign is preserved.
        let coeffs = affine.as_coeffs();
        self.width *= coeffs[0].abs();
        self.height *= coeffs[3].abs();
    }
}

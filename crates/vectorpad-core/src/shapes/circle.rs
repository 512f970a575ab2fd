//! Circle shape.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{Affine, BezPath, Circle as KurboCircle, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A circle shape. The radius is never negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circle {
    pub(crate) id: ShapeId,
    /// Center point.
    pub center: Point,
    /// Radius (>= 0).
    pub radius: f64,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Circle {
    /// Create a new circle.
    pub fn new(center: Point, radius: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            center,
            radius: radius.max(0.0),
            style: ShapeStyle::default(),
        }
    }

    /// Create a circle whose diameter spans the two given points.
    pub fn from_diameter(p1: Point, p2: Point) -> Self {
        let center = Point::new((p1.x + p2.x) / 2.0, (p1.y + p2.y) / 2.0);
        let radius = ((p2.x - p1.x).powi(2) + (p2.y - p1.y).powi(2)).sqrt() / 2.0;
        Self::new(center, radius)
    }

    /// Get as a kurbo Circle.
    pub fn as_kurbo(&self) -> KurboCircle {
        KurboCircle::new(self.center, self.radius)
    }
}

impl ShapeTrait for Circle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::new(
            self.center.x - self.radius,
            self.center.y - self.radius,
            self.center.x + self.radius,
            self.center.y + self.radius,
        )
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        // Outline only: hit within a ring around the circumference.
        let dx = point.x - self.center.x;
        let dy = point.y - self.center.y;
        let dist = (dx * dx + dy * dy).sqrt();
        let reach = tolerance + self.style.stroke_width / 2.0;
        (dist - self.radius).abs() <= reach
    }

    fn to_path(&self) -> BezPath {
        self.as_kurbo().to_path(0.1)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn transform(&mut self, affine: Affine) {
        self.center = affine * self.center;
        let coeffs = affine.as_coeffs();
        self.radius *= coeffs[0].abs();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_creation() {
        let circle = Circle::new(Point::new(50.0, 50.0), 25.0);
        assert!((circle.radius - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_negative_radius_floored() {
        let circle = Circle::new(Point::ZERO, -5.0);
        assert!(circle.radius.abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_diameter() {
        let circle = Circle::from_diameter(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        assert!((circle.center.x - 5.0).abs() < f64::EPSILON);
        assert!((circle.center.y).abs() < f64::EPSILON);
        assert!((circle.radius - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test_on_circumference() {
        let circle = Circle::new(Point::new(0.0, 0.0), 10.0);
        assert!(circle.hit_test(Point::new(10.0, 0.0), 1.0));
        assert!(!circle.hit_test(Point::new(0.0, 0.0), 1.0));
        assert!(!circle.hit_test(Point::new(20.0, 0.0), 1.0));
    }

    #[test]
    fn test_bounds() {
        let circle = Circle::new(Point::new(50.0, 50.0), 20.0);
        let bounds = circle.bounds();
        assert!((bounds.x0 - 30.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_transform_scales_radius() {
        let mut circle = Circle::new(Point::new(10.0, 10.0), 5.0);
        circle.transform(Affine::scale(3.0));
        assert!((circle.radius - 15.0).abs() < f64::EPSILON);
        assert!((circle.center.x - 30.0).abs() < f64::EPSILON);
    }
}

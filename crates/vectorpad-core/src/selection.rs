//! Selection and manipulation handles for live objects.

use crate::shapes::{Group, Shape, ShapeId};
use kurbo::{Affine, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Handle size in screen pixels.
pub const HANDLE_SIZE: f64 = 16.0;
/// Handle hit tolerance in screen pixels.
pub const HANDLE_HIT_TOLERANCE: f64 = 24.0;
/// Distance from the top edge to the rotation handle.
pub const ROTATE_HANDLE_OFFSET: f64 = 25.0;

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// The corner's position on a bounding rectangle.
    pub fn position(self, bounds: Rect) -> Point {
        match self {
            Corner::TopLeft => Point::new(bounds.x0, bounds.y0),
            Corner::TopRight => Point::new(bounds.x1, bounds.y0),
            Corner::BottomLeft => Point::new(bounds.x0, bounds.y1),
            Corner::BottomRight => Point::new(bounds.x1, bounds.y1),
        }
    }

    /// The diagonally opposite corner.
    pub fn opposite(self) -> Corner {
        match self {
            Corner::TopLeft => Corner::BottomRight,
            Corner::TopRight => Corner::BottomLeft,
            Corner::BottomLeft => Corner::TopRight,
            Corner::BottomRight => Corner::TopLeft,
        }
    }
}

/// Type of manipulation handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    /// Corner handle for uniform resizing.
    Corner(Corner),
    /// Rotation handle (positioned above the top edge).
    Rotate,
}

/// A manipulation handle with its position and type.
#[derive(Debug, Clone, Copy)]
pub struct Handle {
    /// Position in canvas coordinates.
    pub position: Point,
    /// Handle type.
    pub kind: HandleKind,
}

impl Handle {
    /// Create a new handle.
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a point (in canvas coordinates) hits this handle.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        dx * dx + dy * dy <= tolerance * tolerance
    }
}

/// Corner handles for a bounding rectangle.
pub fn corner_handles(bounds: Rect) -> Vec<Handle> {
    [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ]
    .into_iter()
    .map(|corner| Handle::new(corner.position(bounds), HandleKind::Corner(corner)))
    .collect()
}

/// Corner handles plus the rotation handle, for a live group.
pub fn group_handles(bounds: Rect) -> Vec<Handle> {
    let mut handles = corner_handles(bounds);
    handles.push(Handle::new(
        Point::new(bounds.center().x, bounds.y0 - ROTATE_HANDLE_OFFSET),
        HandleKind::Rotate,
    ));
    handles
}

/// Find which handle (if any) is hit at the given point.
pub fn hit_test_handles(handles: &[Handle], point: Point, tolerance: f64) -> Option<HandleKind> {
    handles
        .iter()
        .find(|h| h.hit_test(point, tolerance))
        .map(|h| h.kind)
}

/// Uniformly scale a group by dragging one of its corners. The opposite
/// corner stays fixed; the dominant axis of the drag wins.
pub fn apply_corner_scale(group: &mut Group, corner: Corner, delta: Vec2) {
    let bounds = group.bounds();
    if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
        return;
    }

    let dragged = corner.position(bounds);
    let fixed = corner.opposite().position(bounds);
    let target = dragged + delta;

    let scale_x = (target.x - fixed.x).abs() / bounds.width();
    let scale_y = (target.y - fixed.y).abs() / bounds.height();
    let scale = scale_x.max(scale_y).max(0.05);

    let affine = Affine::translate(fixed.to_vec2())
        * Affine::scale(scale)
        * Affine::translate(-fixed.to_vec2());
    group.transform(affine);
}

/// Rotate a group's children about its center by the given angle.
///
/// Line endpoints and circle centers rotate exactly; a rectangle's center
/// rotates while its extent stays axis-aligned.
pub fn apply_rotation(group: &mut Group, degrees: f64) {
    let center = group.bounds().center();
    let radians = degrees.to_radians();
    for child in group.children_mut() {
        rotate_shape_about(child, center, radians);
    }
}

fn rotate_point_about(point: Point, center: Point, radians: f64) -> Point {
    let (sin, cos) = radians.sin_cos();
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    Point::new(
        center.x + dx * cos - dy * sin,
        center.y + dx * sin + dy * cos,
    )
}

fn rotate_shape_about(shape: &mut Shape, center: Point, radians: f64) {
    match shape {
        Shape::Line(line) => {
            line.start = rotate_point_about(line.start, center, radians);
            line.end = rotate_point_about(line.end, center, radians);
        }
        Shape::Circle(circle) => {
            circle.center = rotate_point_about(circle.center, center, radians);
        }
        Shape::Rect(rect) => {
            let rect_center = rect.normalized().center();
            let moved = rotate_point_about(rect_center, center, radians);
            rect.position.x += moved.x - rect_center.x;
            rect.position.y += moved.y - rect_center.y;
        }
    }
}

/// The set of currently selected shapes, in selection order.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    ids: Vec<ShapeId>,
}

impl Selection {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a single shape (clears the previous selection).
    pub fn select(&mut self, id: ShapeId) {
        self.ids.clear();
        self.ids.push(id);
    }

    /// Add a shape to the selection.
    pub fn add(&mut self, id: ShapeId) {
        if !self.ids.contains(&id) {
            self.ids.push(id);
        }
    }

    /// Remove a shape from the selection.
    pub fn remove(&mut self, id: ShapeId) {
        self.ids.retain(|&i| i != id);
    }

    /// Clear the selection.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Check if a shape is selected.
    pub fn contains(&self, id: ShapeId) -> bool {
        self.ids.contains(&id)
    }

    /// Get the selected shape IDs.
    pub fn ids(&self) -> &[ShapeId] {
        &self.ids
    }

    /// Check if the selection is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Circle, Line, Rect as RectShape};

    #[test]
    fn test_corner_handles() {
        let handles = corner_handles(Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(handles.len(), 4);
        assert!(matches!(handles[0].kind, HandleKind::Corner(Corner::TopLeft)));
        assert!((handles[3].position.x - 100.0).abs() < f64::EPSILON);
        assert!((handles[3].position.y - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_group_handles_include_rotate() {
        let handles = group_handles(Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(handles.len(), 5);
        let rotate = handles.last().unwrap();
        assert!(matches!(rotate.kind, HandleKind::Rotate));
        assert!((rotate.position.y + ROTATE_HANDLE_OFFSET).abs() < f64::EPSILON);
    }

    #[test]
    fn test_handle_hit_test() {
        let handle = Handle::new(Point::new(50.0, 50.0), HandleKind::Rotate);
        assert!(handle.hit_test(Point::new(55.0, 55.0), 10.0));
        assert!(!handle.hit_test(Point::new(70.0, 70.0), 10.0));

        let handles = vec![handle];
        assert_eq!(
            hit_test_handles(&handles, Point::new(50.0, 50.0), 5.0),
            Some(HandleKind::Rotate)
        );
        assert_eq!(hit_test_handles(&handles, Point::new(0.0, 0.0), 5.0), None);
    }

    #[test]
    fn test_corner_scale_uniform() {
        let rect = RectShape::new(Point::new(0.0, 0.0), 100.0, 100.0);
        let mut group = Group::new(vec![Shape::Rect(rect)]);

        apply_corner_scale(&mut group, Corner::BottomRight, Vec2::new(100.0, 20.0));
        let bounds = group.bounds();
        // Dominant axis doubles the extent; the top-left corner stays put.
        assert!((bounds.width() - 200.0).abs() < 1e-9);
        assert!((bounds.height() - 200.0).abs() < 1e-9);
        assert!(bounds.x0.abs() < 1e-9);
        assert!(bounds.y0.abs() < 1e-9);
    }

    #[test]
    fn test_corner_scale_from_top_left() {
        let rect = RectShape::new(Point::new(0.0, 0.0), 100.0, 100.0);
        let mut group = Group::new(vec![Shape::Rect(rect)]);

        apply_corner_scale(&mut group, Corner::TopLeft, Vec2::new(-100.0, 0.0));
        let bounds = group.bounds();
        // Bottom-right corner is the fixed point.
        assert!((bounds.x1 - 100.0).abs() < 1e-9);
        assert!((bounds.y1 - 100.0).abs() < 1e-9);
        assert!((bounds.width() - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotation_line_exact() {
        let line = Line::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let mut group = Group::new(vec![Shape::Line(line)]);

        apply_rotation(&mut group, 90.0);
        let Shape::Line(rotated) = &group.children()[0] else {
            panic!("expected line");
        };
        // Rotated about (50, 0): the segment now runs vertically.
        assert!((rotated.start.x - 50.0).abs() < 1e-9);
        assert!((rotated.start.y + 50.0).abs() < 1e-9);
        assert!((rotated.end.x - 50.0).abs() < 1e-9);
        assert!((rotated.end.y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotation_rect_keeps_extent() {
        let rect = RectShape::new(Point::new(0.0, 0.0), 40.0, 20.0);
        let circle = Circle::new(Point::new(100.0, 10.0), 10.0);
        let mut group = Group::new(vec![Shape::Rect(rect), Shape::Circle(circle)]);

        apply_rotation(&mut group, 180.0);
        let Shape::Rect(rotated) = &group.children()[0] else {
            panic!("expected rect");
        };
        assert!((rotated.width - 40.0).abs() < 1e-9);
        assert!((rotated.height - 20.0).abs() < 1e-9);

        let Shape::Circle(moved) = &group.children()[1] else {
            panic!("expected circle");
        };
        // Group bounds span x 0..110, y -10..30; center (55, 10).
        assert!((moved.center.x - 10.0).abs() < 1e-9);
        assert!((moved.center.y - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_selection_ops() {
        let mut selection = Selection::new();
        let a = uuid::Uuid::new_v4();
        let b = uuid::Uuid::new_v4();

        selection.select(a);
        selection.add(b);
        selection.add(b);
        assert_eq!(selection.ids().len(), 2);
        assert!(selection.contains(a));

        selection.remove(a);
        assert!(!selection.contains(a));
        assert!(selection.contains(b));

        selection.select(a);
        assert_eq!(selection.ids(), &[a]);
    }
}

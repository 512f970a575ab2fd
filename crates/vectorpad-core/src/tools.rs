//! Draw engine: turns a pointer drag into one committed shape.

use crate::shapes::{Circle, Line, Rect, Shape, ShapeStyle};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Tool {
    Select,
    #[default]
    Line,
    Rect,
    Circle,
}

/// State of a draw interaction.
#[derive(Debug, Clone, Copy, Default)]
pub enum DrawState {
    /// Waiting for a drag to start.
    #[default]
    Idle,
    /// A drag is in progress.
    Dragging {
        /// Anchor point recorded at pointer-down (already snapped).
        start: Point,
        /// Current pointer position (already snapped).
        current: Point,
    },
}

/// Drag-based drawing state machine.
///
/// Callers snap pointer coordinates before handing them in; the engine
/// never re-snaps. One completed drag produces at most one shape; drags
/// too small to be visible are silently discarded.
#[derive(Debug, Clone, Default)]
pub struct DrawEngine {
    /// Currently selected tool.
    pub tool: Tool,
    /// Current state of the drag.
    state: DrawState,
    /// Style applied to new shapes.
    pub current_style: ShapeStyle,
}

impl DrawEngine {
    /// Create a new draw engine with the default tool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current tool, abandoning any drag in progress.
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
        self.state = DrawState::Idle;
    }

    /// Begin a drag at the given (snapped) point.
    pub fn begin(&mut self, point: Point) {
        self.state = DrawState::Dragging {
            start: point,
            current: point,
        };
    }

    /// Update the drag with the current (snapped) pointer position.
    pub fn update(&mut self, point: Point) {
        if let DrawState::Dragging { current, .. } = &mut self.state {
            *current = point;
        }
    }

    /// End the drag, returning the committed shape unless it is degenerate.
    pub fn end(&mut self, point: Point) -> Option<Shape> {
        let DrawState::Dragging { start, .. } = self.state else {
            return None;
        };
        self.state = DrawState::Idle;

        let shape = self.make_shape(start, point)?;
        if self.is_degenerate(&shape) {
            log::debug!("discarding degenerate {} drag", self.tool_name());
            return None;
        }
        Some(shape)
    }

    /// Abandon the current drag.
    pub fn cancel(&mut self) {
        self.state = DrawState::Idle;
    }

    /// Check if a drag is in progress.
    pub fn is_active(&self) -> bool {
        matches!(self.state, DrawState::Dragging { .. })
    }

    /// Get the provisional shape for the drag in progress.
    pub fn preview_shape(&self) -> Option<Shape> {
        if let DrawState::Dragging { start, current } = self.state {
            self.make_shape(start, current)
        } else {
            None
        }
    }

    fn tool_name(&self) -> &'static str {
        match self.tool {
            Tool::Select => "select",
            Tool::Line => "line",
            Tool::Rect => "rect",
            Tool::Circle => "circle",
        }
    }

    /// Build a shape of the current tool kind from the anchor and the
    /// current point. The circle drag spans a diameter: the committed
    /// circle's center is the midpoint, its radius half the distance.
    fn make_shape(&self, start: Point, end: Point) -> Option<Shape> {
        let mut shape = match self.tool {
            Tool::Line => Shape::Line(Line::new(start, end)),
            Tool::Rect => Shape::Rect(Rect::from_corners(start, end)),
            Tool::Circle => Shape::Circle(Circle::from_diameter(start, end)),
            Tool::Select => return None,
        };
        *shape.style_mut() = self.current_style.clone();
        Some(shape)
    }

    /// Filter for accidental clicks that would produce invisible shapes.
    fn is_degenerate(&self, shape: &Shape) -> bool {
        match shape {
            Shape::Circle(c) => c.radius < c.style.stroke_width / 2.0 + 1.0,
            Shape::Rect(r) => r.width.abs() < 2.0 || r.height.abs() < 2.0,
            Shape::Line(l) => {
                (l.end.x - l.start.x).abs() < 2.0 && (l.end.y - l.start.y).abs() < 2.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tool_is_line() {
        let engine = DrawEngine::new();
        assert_eq!(engine.tool, Tool::Line);
    }

    #[test]
    fn test_drag_produces_line() {
        let mut engine = DrawEngine::new();
        engine.begin(Point::new(0.0, 0.0));
        engine.update(Point::new(50.0, 50.0));
        assert!(engine.is_active());
        assert!(engine.preview_shape().is_some());

        let shape = engine.end(Point::new(100.0, 100.0)).unwrap();
        assert!(!engine.is_active());
        let Shape::Line(line) = shape else {
            panic!("expected line");
        };
        assert!((line.end.x - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rect_drag_normalizes_corners() {
        let mut engine = DrawEngine::new();
        engine.set_tool(Tool::Rect);
        engine.begin(Point::new(100.0, 100.0));
        let shape = engine.end(Point::new(40.0, 60.0)).unwrap();

        let Shape::Rect(rect) = shape else {
            panic!("expected rect");
        };
        assert!((rect.position.x - 40.0).abs() < f64::EPSILON);
        assert!((rect.position.y - 60.0).abs() < f64::EPSILON);
        assert!((rect.width - 60.0).abs() < f64::EPSILON);
        assert!((rect.height - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_circle_diameter_drag() {
        let mut engine = DrawEngine::new();
        engine.set_tool(Tool::Circle);
        engine.begin(Point::new(0.0, 0.0));
        let shape = engine.end(Point::new(0.0, 40.0)).unwrap();

        let Shape::Circle(circle) = shape else {
            panic!("expected circle");
        };
        assert!((circle.center.y - 20.0).abs() < f64::EPSILON);
        assert!((circle.radius - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tiny_circle_discarded() {
        let mut engine = DrawEngine::new();
        engine.set_tool(Tool::Circle);
        // Stroke width 2 means radius must reach 2.0 to survive.
        engine.begin(Point::new(0.0, 0.0));
        assert!(engine.end(Point::new(0.0, 0.5)).is_none());
        assert!(!engine.is_active());
    }

    #[test]
    fn test_tiny_rect_discarded() {
        let mut engine = DrawEngine::new();
        engine.set_tool(Tool::Rect);
        engine.begin(Point::new(0.0, 0.0));
        assert!(engine.end(Point::new(1.0, 100.0)).is_none());
    }

    #[test]
    fn test_tiny_line_discarded() {
        let mut engine = DrawEngine::new();
        engine.begin(Point::new(0.0, 0.0));
        assert!(engine.end(Point::new(1.0, 1.0)).is_none());

        // A short-but-visible axis-aligned line survives.
        engine.begin(Point::new(0.0, 0.0));
        assert!(engine.end(Point::new(0.0, 5.0)).is_some());
    }

    #[test]
    fn test_select_tool_produces_nothing() {
        let mut engine = DrawEngine::new();
        engine.set_tool(Tool::Select);
        engine.begin(Point::new(0.0, 0.0));
        assert!(engine.end(Point::new(100.0, 100.0)).is_none());
    }

    #[test]
    fn test_cancel() {
        let mut engine = DrawEngine::new();
        engine.begin(Point::new(0.0, 0.0));
        engine.cancel();
        assert!(!engine.is_active());
        assert!(engine.preview_shape().is_none());
    }

    #[test]
    fn test_style_applied_to_new_shapes() {
        let mut engine = DrawEngine::new();
        engine.current_style = ShapeStyle::new("#ff0000", 4.0);
        engine.begin(Point::new(0.0, 0.0));
        let shape = engine.end(Point::new(100.0, 0.0)).unwrap();
        assert_eq!(shape.style().stroke_color, "#ff0000");
        assert!((shape.style().stroke_width - 4.0).abs() < f64::EPSILON);
    }
}

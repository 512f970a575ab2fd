//! Placement engine: drag-to-size-and-position for imported geometry.
//!
//! A second drag state machine, separate from drawing: armed by a
//! successful import, it previews the imported shapes scaled to the drag
//! rectangle and bakes permanent copies into the scene on release.

use crate::import::ImportedGeometry;
use crate::shapes::{Group, Shape};
use kurbo::{Affine, Point, Size, Vec2};

/// Floor for the placement scale, so a degenerate drag can never produce
/// a zero or negative scale.
pub const MIN_SCALE: f64 = 1e-3;

/// Fraction of the canvas the default placement occupies.
pub const DEFAULT_PLACEMENT_FRACTION: f64 = 0.3;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
enum PlacementState {
    /// No geometry pending.
    #[default]
    Inactive,
    /// Geometry held, waiting for the sizing drag.
    Armed,
    /// Sizing drag in progress.
    Dragging { anchor: Point },
}

/// Resolved placement transform: a uniform scale and the placed top-left.
#[derive(Debug, Clone, Copy)]
pub struct PlacementTransform {
    pub scale: f64,
    pub origin: Point,
}

/// Drag-based placement state machine.
#[derive(Debug, Clone, Default)]
pub struct PlacementEngine {
    state: PlacementState,
    geometry: Option<ImportedGeometry>,
    /// Keyboard fine-tuning offset, applied to the placed origin.
    nudge: Vec2,
}

impl PlacementEngine {
    /// Create a new, inactive engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold imported geometry and wait for the sizing drag.
    /// Any previous session is discarded.
    pub fn arm(&mut self, geometry: ImportedGeometry) {
        self.geometry = Some(geometry);
        self.state = PlacementState::Armed;
        self.nudge = Vec2::ZERO;
    }

    /// Check if a session is active (armed or dragging).
    pub fn is_active(&self) -> bool {
        self.state != PlacementState::Inactive
    }

    /// Check if the sizing drag is in progress.
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, PlacementState::Dragging { .. })
    }

    /// The geometry pending placement, if any.
    pub fn geometry(&self) -> Option<&ImportedGeometry> {
        self.geometry.as_ref()
    }

    /// Start the sizing drag.
    pub fn on_pointer_down(&mut self, pos: Point) {
        if self.state == PlacementState::Armed {
            self.state = PlacementState::Dragging { anchor: pos };
        }
    }

    /// Update the drag, returning the preview shapes at the current size.
    pub fn on_pointer_move(&mut self, pos: Point) -> Option<Vec<Shape>> {
        self.preview(pos)
    }

    /// The preview shapes for a drag at the given pointer position.
    pub fn preview(&self, pos: Point) -> Option<Vec<Shape>> {
        let PlacementState::Dragging { anchor } = self.state else {
            return None;
        };
        let geometry = self.geometry.as_ref()?;
        let transform = self.drag_transform(geometry, anchor, pos);
        Some(transformed_shapes(geometry, transform))
    }

    /// Finish the drag, baking permanent copies of every imported shape.
    /// Shapes come back in the geometry's original order, ready to be
    /// appended after all pre-existing scene shapes.
    pub fn on_pointer_up(&mut self, pos: Point) -> Option<Vec<Shape>> {
        let PlacementState::Dragging { anchor } = self.state else {
            return None;
        };
        let geometry = self.geometry.take()?;
        self.state = PlacementState::Inactive;

        let transform = self.drag_transform(&geometry, anchor, pos);
        Some(bake_shapes(&geometry, transform))
    }

    /// Explicit confirm without a sizing drag: place at the default
    /// canvas-relative size, centered.
    pub fn commit_default(&mut self, canvas: Size) -> Option<Vec<Shape>> {
        if !self.is_active() {
            return None;
        }
        let geometry = self.geometry.take()?;
        self.state = PlacementState::Inactive;

        let mut transform = default_transform(&geometry, canvas);
        transform.origin += self.nudge;
        Some(bake_shapes(&geometry, transform))
    }

    /// Shift the placed origin by a keyboard nudge.
    pub fn nudge(&mut self, dx: f64, dy: f64) {
        if self.is_active() {
            self.nudge += Vec2::new(dx, dy);
        }
    }

    /// Abandon the session without committing anything.
    pub fn cancel(&mut self) {
        self.state = PlacementState::Inactive;
        self.geometry = None;
        self.nudge = Vec2::ZERO;
    }

    /// Scale and placed origin for a drag from `anchor` to `pos`.
    ///
    /// The scale tracks the horizontal drag distance against the geometry
    /// width. The placed top-left is pulled back by the scaled extent on
    /// any axis where the drag went negative, so the geometry's far corner
    /// tracks the anchor when dragging up or left.
    fn drag_transform(
        &self,
        geometry: &ImportedGeometry,
        anchor: Point,
        pos: Point,
    ) -> PlacementTransform {
        let scale = if geometry.width > 0.0 {
            (pos.x - anchor.x).abs() / geometry.width
        } else if geometry.height > 0.0 {
            (pos.y - anchor.y).abs() / geometry.height
        } else {
            1.0
        };
        let scale = scale.max(MIN_SCALE);

        let scaled_w = geometry.width * scale;
        let scaled_h = geometry.height * scale;
        let origin = Point::new(
            if pos.x >= anchor.x { anchor.x } else { anchor.x - scaled_w },
            if pos.y >= anchor.y { anchor.y } else { anchor.y - scaled_h },
        ) + self.nudge;

        PlacementTransform { scale, origin }
    }
}

/// Default placement transform: a canvas-relative, aspect-preserving
/// scale, centered on the canvas.
pub fn default_transform(geometry: &ImportedGeometry, canvas: Size) -> PlacementTransform {
    let scale = (canvas.width * DEFAULT_PLACEMENT_FRACTION / geometry.width)
        .min(canvas.height * DEFAULT_PLACEMENT_FRACTION / geometry.height)
        .max(MIN_SCALE);
    let origin = Point::new(
        canvas.width / 2.0 - geometry.width * scale / 2.0,
        canvas.height / 2.0 - geometry.height * scale / 2.0,
    );
    PlacementTransform { scale, origin }
}

/// Spawn the imported geometry as one live group at the default placement,
/// for hosts that manipulate it with selection handles instead of a sizing
/// drag.
pub fn place_as_group(geometry: &ImportedGeometry, canvas: Size) -> Group {
    let transform = default_transform(geometry, canvas);
    Group::new(bake_shapes(geometry, transform))
}

/// Apply a placement transform to every geometry shape, producing fresh
/// permanent copies.
fn bake_shapes(geometry: &ImportedGeometry, transform: PlacementTransform) -> Vec<Shape> {
    let mut shapes = transformed_shapes(geometry, transform);
    for shape in &mut shapes {
        shape.regenerate_id();
    }
    shapes
}

fn transformed_shapes(geometry: &ImportedGeometry, transform: PlacementTransform) -> Vec<Shape> {
    let PlacementTransform { scale, origin } = transform;
    let translate = Vec2::new(
        origin.x - geometry.origin.x * scale,
        origin.y - geometry.origin.y * scale,
    );
    let affine = Affine::translate(translate) * Affine::scale(scale);

    geometry
        .shapes
        .iter()
        .map(|shape| {
            let mut shape = shape.clone();
            shape.transform(affine);
            let style = shape.style_mut();
            style.set_stroke_width((style.stroke_width * scale).max(1.0));
            shape
        })
        .collect()
}

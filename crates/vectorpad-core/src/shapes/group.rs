//! Group carrier for manipulating multiple shapes as a single unit.
//!
//! Groups are not scene members: the scene stores only primitive shapes.
//! A group exists transiently, as the live object of an in-progress
//! placement, and dissolves into its children when the placement is
//! finalized.

use super::{Shape, ShapeId};
use kurbo::{Affine, Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A transient group of shapes manipulated as one unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub(crate) id: ShapeId,
    /// Child shapes in this group, in z-order.
    children: Vec<Shape>,
}

impl Group {
    /// Create a new group from a list of shapes.
    pub fn new(children: Vec<Shape>) -> Self {
        Self {
            id: Uuid::new_v4(),
            children,
        }
    }

    /// Get the unique identifier.
    pub fn id(&self) -> ShapeId {
        self.id
    }

    /// Get the children of this group.
    pub fn children(&self) -> &[Shape] {
        &self.children
    }

    /// Get mutable access to children.
    pub fn children_mut(&mut self) -> &mut Vec<Shape> {
        &mut self.children
    }

    /// Dissolve this group and return its children.
    pub fn ungroup(self) -> Vec<Shape> {
        self.children
    }

    /// Get the union bounding box of all children.
    pub fn bounds(&self) -> Rect {
        let mut iter = self.children.iter();
        let Some(first) = iter.next() else {
            return Rect::ZERO;
        };
        iter.fold(first.bounds(), |acc, child| acc.union(child.bounds()))
    }

    /// Check if a point hits any child.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.children.iter().any(|c| c.hit_test(point, tolerance))
    }

    /// Apply a transform to every child.
    pub fn transform(&mut self, affine: Affine) {
        for child in &mut self.children {
            child.transform(affine);
        }
    }

    /// Set the stroke color on every child.
    pub fn set_stroke_color(&mut self, color: &str) {
        for child in &mut self.children {
            child.style_mut().stroke_color = color.to_string();
        }
    }

    /// Set the stroke width on every child (clamped).
    pub fn set_stroke_width(&mut self, width: f64) {
        for child in &mut self.children {
            child.style_mut().set_stroke_width(width);
        }
    }
}

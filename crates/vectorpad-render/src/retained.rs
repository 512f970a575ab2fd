//! Retained render backend: live per-shape nodes, mutated incrementally.

use std::collections::HashMap;
use vectorpad_core::render::{DrawOp, RenderBackend};
use vectorpad_core::shapes::{Shape, ShapeId};

/// A display sink that keeps one live node per committed shape. Adds,
/// removals, transforms and style changes touch only the affected node;
/// present walks the nodes in z-order. The mutation log is observable so
/// hosts can verify the scene stayed in sync.
#[derive(Debug, Default)]
pub struct RetainedBackend {
    nodes: HashMap<ShapeId, Shape>,
    z_order: Vec<ShapeId>,
    overlay: Vec<Shape>,
    mutations: u64,
}

impl RetainedBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of node mutations applied so far.
    pub fn mutations(&self) -> u64 {
        self.mutations
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the backend holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the live node for a shape, if any.
    pub fn node(&self, id: ShapeId) -> Option<&Shape> {
        self.nodes.get(&id)
    }
}

impl RenderBackend for RetainedBackend {
    fn add(&mut self, shape: &Shape) {
        self.mutations += 1;
        self.z_order.push(shape.id());
        self.nodes.insert(shape.id(), shape.clone());
    }

    fn update(&mut self, shape: &Shape) {
        if let Some(node) = self.nodes.get_mut(&shape.id()) {
            self.mutations += 1;
            *node = shape.clone();
        } else {
            log::warn!("update for unknown node {}", shape.id());
        }
    }

    fn remove(&mut self, id: ShapeId) {
        self.mutations += 1;
        self.z_order.retain(|&i| i != id);
        self.nodes.remove(&id);
    }

    fn set_style(&mut self, id: ShapeId, color: &str, width: f64) {
        if let Some(node) = self.nodes.get_mut(&id) {
            self.mutations += 1;
            node.style_mut().stroke_color = color.to_string();
            node.style_mut().stroke_width = width;
        }
    }

    fn clear(&mut self) {
        self.mutations += 1;
        self.nodes.clear();
        self.z_order.clear();
    }

    fn set_overlay(&mut self, shapes: &[Shape]) {
        self.overlay = shapes.to_vec();
    }

    fn present(&mut self) -> Vec<DrawOp> {
        let mut ops = Vec::with_capacity(1 + self.z_order.len() + self.overlay.len());
        ops.push(DrawOp::Clear);
        for id in &self.z_order {
            if let Some(node) = self.nodes.get(id) {
                ops.push(DrawOp::stroke(node));
            }
        }
        for shape in &self.overlay {
            ops.push(DrawOp::stroke(shape));
        }
        ops
    }
}

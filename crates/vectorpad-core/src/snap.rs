//! Grid snapping for pointer coordinates.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Default grid size (matches the visual grid).
pub const GRID_SIZE: f64 = 20.0;

/// Grid snapping configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapSettings {
    /// Whether snapping is enabled.
    pub enabled: bool,
    /// Grid cell size.
    pub grid_size: f64,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            grid_size: GRID_SIZE,
        }
    }
}

impl SnapSettings {
    /// Toggle snapping on or off.
    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    /// Snap a point per the current settings.
    pub fn snap_point(&self, point: Point) -> Point {
        Point::new(
            snap(point.x, self.grid_size, self.enabled),
            snap(point.y, self.grid_size, self.enabled),
        )
    }
}

/// Quantize a coordinate to the nearest grid line when enabled.
///
/// Applied per axis, at the moment a coordinate is read from the pointer;
/// committed shapes are never re-snapped.
pub fn snap(value: f64, grid_size: f64, enabled: bool) -> f64 {
    if !enabled {
        return value;
    }
    (value / grid_size).round() * grid_size
}

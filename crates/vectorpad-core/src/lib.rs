//! VectorPad Core Library
//!
//! Platform-agnostic shape model and interaction logic for the VectorPad
//! drawing surface.

pub mod editor;
pub mod export;
pub mod import;
pub mod input;
pub mod place;
pub mod render;
pub mod scene;
pub mod selection;
pub mod shapes;
pub mod snap;
pub mod tools;

pub use editor::{Editor, PlacementStyle};
pub use import::{ImportError, ImportedGeometry};
pub use input::{InputState, KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use place::PlacementEngine;
pub use render::{DrawOp, RenderBackend};
pub use scene::Scene;
pub use selection::Selection;
pub use snap::{GRID_SIZE, SnapSettings, snap};
pub use tools::{DrawEngine, Tool};

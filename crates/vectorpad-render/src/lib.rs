//! Render backends for the VectorPad drawing surface.
//!
//! Two interchangeable implementations of the core's backend capability:
//! a flat backend that replays the whole shape list every frame, and a
//! retained backend that keeps live per-shape nodes and mutates them
//! incrementally. Hosts pick one; the core never knows the difference.

mod flat;
mod retained;

pub use flat::FlatBackend;
pub use retained::RetainedBackend;

//! Scene: the graph a renderer draws, plus the building blocks placed into it.
//!
//! # Invariants
//! - The graph is append-only. Nodes are never removed or reordered.
//! - A mesh is always built from its geometry and material; it has no state of its own.
//! - Room surfaces are plain nodes once inserted; nothing keeps a handle to them.

mod camera;
mod geometry;
mod graph;
mod light;
mod material;
pub mod room;
mod shape;

pub use camera::PerspectiveCamera;
pub use geometry::{BufferGeometry, Geometry, Triangles};
pub use graph::{Node, NodeKind, Scene};
pub use light::{Light, PointLight};
pub use material::{Material, Mesh, Shading, Side};
pub use room::{RoomDimensions, WallPlacement};
pub use shape::Shape;

/// Errors from building scene content.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneError {
    #[error("{name} must be a positive finite number, got {value}")]
    InvalidDimension { name: &'static str, value: f32 },
}

/// Reject zero, negative, NaN and infinite extents.
pub(crate) fn positive(name: &'static str, value: f32) -> Result<f32, SceneError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SceneError::InvalidDimension { name, value })
    }
}

pub fn crate_info() -> &'static str {
    "roomscene-scene v0.1.0"
}

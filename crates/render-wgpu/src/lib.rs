//! wgpu render backend for room scenes.
//!
//! Draws every mesh in the scene with flat or Lambert shading under the
//! scene's point lights, into a window laid out as header plus content.
//!
//! # Invariants
//! - Renderer never mutates the scene.
//! - Single-sided surfaces are invisible from behind.

mod gpu;
mod host;
mod mesh;
mod shaders;

pub use gpu::WgpuRenderer;
pub use host::WindowHost;
pub use mesh::{MAX_LIGHTS, Uniforms, Vertex, scene_vertices};

//! World Kernel: the scene, its camera and renderer, and the loop that draws them.
//!
//! # Invariants
//! - One scene per world for the world's whole lifetime.
//! - At most one active camera and one active renderer; configuring again replaces.
//! - Frames render only after both camera and renderer are configured.
//! - Model loads complete on the render thread: finished subtrees are inserted at
//!   the start of a frame, so a load is visible from the first frame after it lands.

mod bootstrap;
mod config;
mod scheduler;
pub mod world;

pub use bootstrap::compose;
pub use config::{CameraConfig, ConfigError, LightConfig, SceneConfig, WallConfig};
pub use scheduler::{FixedFrames, FrameSource, LoopHandle, LoopState, Paced, RenderLoop};
pub use world::{LoadReport, World};

use roomscene_render::RenderError;
use roomscene_scene::SceneError;

/// Errors from configuring or running a world.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error("container {0:?} not found on the host page")]
    ContainerNotFound(String),
    #[error("viewport for {selector:?} is empty ({width}x{height})")]
    EmptyViewport {
        selector: String,
        width: u32,
        height: u32,
    },
    #[error("no camera configured; call add_camera first")]
    CameraNotConfigured,
    #[error("no renderer configured; call add_renderer first")]
    RendererNotConfigured,
    #[error("render loop already started for this world")]
    LoopAlreadyStarted,
    #[error("render loop driven with a world other than the one that started it")]
    ForeignWorld,
    #[error("no shape at index {0}")]
    ShapeNotFound(usize),
    #[error("invalid scene content: {0}")]
    Scene(#[from] SceneError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

pub fn crate_info() -> &'static str {
    "roomscene-kernel v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("kernel"));
    }
}

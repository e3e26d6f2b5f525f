//! Rendering Adapter: renderer-agnostic interface and the host it draws into.
//!
//! # Invariants
//! - Renderers never mutate the scene; they read it once per frame.
//! - A renderer's viewport changes only through `set_size`.
//!
//! A [`Host`] plays the part of the page: it answers layout queries and attaches
//! renderer output surfaces to a container. [`HeadlessHost`] with
//! [`DebugTextRenderer`] stands in for a GPU backend in tests and the CLI.

mod headless;
mod host;
mod renderer;

pub use headless::{FrameLog, FrameRecord, HeadlessHost};
pub use host::{CONTAINER_SELECTOR, HEADER_SELECTOR, Host, LAYOUT_MARGIN, Viewport};
pub use renderer::{DebugTextRenderer, Renderer};

/// Errors raised by a rendering backend.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("no element matches selector {0:?}")]
    ContainerNotFound(String),
    #[error("no compatible graphics adapter found")]
    NoAdapter,
    #[error("graphics device request failed: {0}")]
    Device(String),
    #[error("surface error: {0}")]
    Surface(String),
    #[error("render failed: {0}")]
    Frame(String),
}

pub fn crate_info() -> &'static str {
    "roomscene-render v0.1.0"
}

//! Asset pipeline: model files in, scene subtrees out.
//!
//! A model file holds one object tree in the JSON object-scene format
//! (`metadata.type == "Object"`). Loading runs off the render thread; the
//! caller polls a [`LoadTask`] for progress and exactly one terminal outcome.
//!
//! # Invariants
//! - A load yields at most one `Loaded` or `Failed` event, never both.
//! - The loader keeps no reference to a subtree once it has been handed over.

mod format;
mod loader;

pub use format::parse_model;
pub use loader::{LoadEvent, LoadProgress, LoadTask, ModelLoader};

use roomscene_scene::SceneError;

/// Errors from model import.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed model: {0}")]
    Format(String),
    #[error("unsupported geometry type {0:?}")]
    UnsupportedGeometry(String),
    #[error("{kind} {uuid:?} is referenced but not defined")]
    MissingReference { kind: &'static str, uuid: String },
    #[error("invalid geometry: {0}")]
    InvalidGeometry(#[from] SceneError),
    #[error("load cancelled")]
    Cancelled,
    #[error("loader stopped before reporting an outcome")]
    Interrupted,
}

pub fn crate_info() -> &'static str {
    "roomscene-assets v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("assets"));
    }
}

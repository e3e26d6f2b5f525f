//! Scene description loaded from YAML.
//!
//! Every field is optional; a missing field takes the value the default
//! scene uses.
//!
//! ```yaml
//! container: .content
//! room: { width: 12, depth: 10, height: 8 }
//! camera: { fov: 72, near: 1, far: 200, position: [0, 48, 120] }
//! light: { color: 16776960, position: [10, 0, 25] }
//! model: demos/models/chair.json
//! wall_placement: legacy
//! walls:
//!   - { width: 12, height: 8, position: [0, 48, -5] }
//! ```

use std::path::{Path, PathBuf};

use glam::Vec3;
use roomscene_common::Color;
use roomscene_render::CONTAINER_SELECTOR;
use roomscene_scene::room::ROOM_UNIT;
use roomscene_scene::{RoomDimensions, SceneError, WallPlacement};
use serde::{Deserialize, Serialize};

/// Errors from reading a scene description.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid scene description: {0}")]
    Invalid(#[from] SceneError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Selector of the element the scene is drawn into.
    pub container: String,
    pub room: RoomDimensions,
    pub camera: CameraConfig,
    pub light: LightConfig,
    /// Model loaded in the background while the room is built.
    pub model: Option<PathBuf>,
    pub wall_placement: WallPlacement,
    pub walls: Vec<WallConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Scene units. Defaults to eye height, back from the room's centre.
    pub position: Option<[f32; 3]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub color: Color,
    pub position: [f32; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallConfig {
    pub width: f32,
    pub height: f32,
    pub position: [f32; 3],
    #[serde(default)]
    pub rotation: [f32; 3],
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            container: CONTAINER_SELECTOR.to_string(),
            room: RoomDimensions {
                width: 12.0,
                depth: 10.0,
                height: 8.0,
            },
            camera: CameraConfig::default(),
            light: LightConfig::default(),
            model: Some(PathBuf::from("demos/models/chair.json")),
            wall_placement: WallPlacement::default(),
            walls: Vec::new(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 72.0,
            near: 1.0,
            far: 200.0,
            position: None,
        }
    }
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            color: Color(0xffff00),
            position: [10.0, 0.0, 25.0],
        }
    }
}

impl SceneConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&text)?;
        tracing::debug!(path = %path.display(), "scene description loaded");
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.room.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Configured camera position, or eye height at the back of the room.
    pub fn camera_position(&self) -> Vec3 {
        match self.camera.position {
            Some(p) => Vec3::from_array(p),
            None => Vec3::new(
                0.0,
                self.room.height * ROOM_UNIT / 2.0,
                self.room.depth * ROOM_UNIT,
            ),
        }
    }
}

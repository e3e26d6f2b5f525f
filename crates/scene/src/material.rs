use roomscene_common::Color;
use serde::{Deserialize, Serialize};

use crate::Geometry;

/// How a surface responds to light.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shading {
    /// Flat color, unaffected by lights.
    Basic,
    /// Diffuse-only lighting.
    #[default]
    Lambert,
}

/// Which faces of a surface are drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Front,
    Double,
}

/// Surface appearance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    #[serde(default)]
    pub shading: Shading,
    #[serde(default = "white")]
    pub color: Color,
    #[serde(default)]
    pub side: Side,
}

fn white() -> Color {
    Color::WHITE
}

impl Default for Material {
    fn default() -> Self {
        Self::lambert(Color::WHITE)
    }
}

impl Material {
    pub fn lambert(color: Color) -> Self {
        Self {
            shading: Shading::Lambert,
            color,
            side: Side::Front,
        }
    }

    pub fn basic(color: Color) -> Self {
        Self {
            shading: Shading::Basic,
            color,
            side: Side::Front,
        }
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }
}

/// Renderable pairing of geometry and material.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub geometry: Geometry,
    pub material: Material,
}

impl Mesh {
    pub fn new(geometry: Geometry, material: Material) -> Self {
        Self { geometry, material }
    }
}

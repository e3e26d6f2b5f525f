use glam::Vec3;
use roomscene_common::{Color, Transform};

use crate::{Node, NodeKind};

/// Omnidirectional light emitted from a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub color: Color,
    pub intensity: f32,
    /// Cutoff range; zero means unlimited.
    pub distance: f32,
}

impl PointLight {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            intensity: 1.0,
            distance: 0.0,
        }
    }
}

/// A point light with a fixed color and position, ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    color: Color,
    position: Vec3,
    light: PointLight,
}

impl Light {
    pub fn new(color: Color, position: Vec3) -> Self {
        Self {
            color,
            position,
            light: PointLight::new(color),
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn light(&self) -> &PointLight {
        &self.light
    }

    /// A fresh scene node for this light. Each call yields a new node id.
    pub fn node(&self) -> Node {
        Node::new(NodeKind::PointLight(self.light))
            .with_name("point light")
            .with_transform(Transform::from_position(self.position))
    }
}

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a node in the scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, for log lines and debug output.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Spatial transform: position, Euler rotation (radians, XYZ order), scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Decompose an affine matrix. Shear is lost.
    pub fn from_matrix(matrix: Mat4) -> Self {
        let (scale, rotation, position) = matrix.to_scale_rotation_translation();
        let (x, y, z) = rotation.to_euler(EulerRot::XYZ);
        Self {
            position,
            rotation: Vec3::new(x, y, z),
            scale,
        }
    }

    pub fn quat(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    /// Local-to-parent matrix.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quat(), self.position)
    }
}

/// 24-bit RGB color stored as `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Self = Self(0xffffff);

    /// Channels normalized to `0.0..=1.0`.
    pub fn rgb(self) -> [f32; 3] {
        [
            ((self.0 >> 16) & 0xff) as f32 / 255.0,
            ((self.0 >> 8) & 0xff) as f32 / 255.0,
            (self.0 & 0xff) as f32 / 255.0,
        ]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0 & 0xff_ffff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_uniqueness() {
        let a = NodeId::new();
        let b = NodeId::new();
        assert_ne!(a, b);
        assert_eq!(a.short().len(), 8);
    }

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Vec3::ZERO);
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn transform_matrix_decomposes_back() {
        let t = Transform {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Vec3::new(0.3, -0.2, 0.1),
            scale: Vec3::new(2.0, 2.0, 2.0),
        };
        let back = Transform::from_matrix(t.matrix());
        assert!(back.position.abs_diff_eq(t.position, 1e-5));
        assert!(back.rotation.abs_diff_eq(t.rotation, 1e-5));
        assert!(back.scale.abs_diff_eq(t.scale, 1e-5));
    }

    #[test]
    fn color_channels() {
        assert_eq!(Color(0xffff00).rgb(), [1.0, 1.0, 0.0]);
        assert_eq!(Color(0x000000).rgb(), [0.0, 0.0, 0.0]);
        assert_eq!(Color(0xfd59d7).to_string(), "#fd59d7");
    }
}

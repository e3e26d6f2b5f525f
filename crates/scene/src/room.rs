//! Procedural room surfaces: floor, ceiling, walls.
//!
//! Room dimensions are given in room units; scene coordinates are
//! [`ROOM_UNIT`] times larger.

use glam::Vec3;
use roomscene_common::{Color, Transform};
use serde::{Deserialize, Serialize};

use crate::{Geometry, Material, Mesh, Node, SceneError, Side, positive};

/// Scene units per room unit.
pub const ROOM_UNIT: f32 = 12.0;

/// Pitch applied to floor and ceiling planes. Must stay 1.517, not `FRAC_PI_2`.
pub const SURFACE_PITCH: f32 = 1.517;

/// Room extents in room units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomDimensions {
    pub width: f32,
    pub depth: f32,
    pub height: f32,
}

impl RoomDimensions {
    pub fn new(width: f32, depth: f32, height: f32) -> Result<Self, SceneError> {
        Ok(Self {
            width: positive("room width", width)?,
            depth: positive("room depth", depth)?,
            height: positive("room height", height)?,
        })
    }

    /// Same validation for values that arrived without going through `new`.
    pub fn validate(&self) -> Result<(), SceneError> {
        Self::new(self.width, self.depth, self.height).map(|_| ())
    }
}

/// How `wall` interprets its position and rotation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallPlacement {
    /// x and y are scene units, z is room units; rotation is ignored.
    #[default]
    Legacy,
    /// Every coordinate is in room units and the rotation is applied.
    Scaled,
}

fn surface(width: f32, depth: f32, material: Material) -> Result<Mesh, SceneError> {
    let geometry = Geometry::plane(
        positive("surface width", width)? * ROOM_UNIT,
        positive("surface depth", depth)? * ROOM_UNIT,
    )?;
    Ok(Mesh::new(geometry, material))
}

fn horizontal(name: &str, width: f32, depth: f32, y: f32) -> Result<Node, SceneError> {
    let mesh = surface(width, depth, Material::lambert(Color::WHITE).with_side(Side::Double))?;
    Ok(Node::mesh(mesh).with_name(name).with_transform(Transform {
        position: Vec3::new(0.0, y, 0.0),
        rotation: Vec3::new(SURFACE_PITCH, 0.0, 0.0),
        ..Transform::default()
    }))
}

/// Floor plane at the origin.
pub fn floor(width: f32, depth: f32) -> Result<Node, SceneError> {
    horizontal("floor", width, depth, 0.0)
}

/// Ceiling plane `height` room units above the floor.
pub fn ceiling(width: f32, depth: f32, height: f32) -> Result<Node, SceneError> {
    horizontal("ceiling", width, depth, positive("ceiling height", height)? * ROOM_UNIT)
}

/// Single-sided, unlit wall plane.
pub fn wall(
    width: f32,
    height: f32,
    position: Vec3,
    rotation: Vec3,
    placement: WallPlacement,
) -> Result<Node, SceneError> {
    let mesh = surface(width, height, Material::basic(Color::WHITE))?;
    let transform = match placement {
        WallPlacement::Legacy => Transform {
            position: Vec3::new(position.x, position.y, position.z * ROOM_UNIT),
            rotation: Vec3::ZERO,
            ..Transform::default()
        },
        WallPlacement::Scaled => Transform {
            position: position * ROOM_UNIT,
            rotation,
            ..Transform::default()
        },
    };
    Ok(Node::mesh(mesh).with_name("wall").with_transform(transform))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Shading;

    fn plane_size(node: &Node) -> (f32, f32) {
        match node.as_mesh().map(|m| &m.geometry) {
            Some(Geometry::Plane { width, height }) => (*width, *height),
            other => panic!("expected plane, got {other:?}"),
        }
    }

    #[test]
    fn floor_and_ceiling_placement() {
        let (w, d, h) = (12.0, 10.0, 8.0);
        let floor = floor(w, d).unwrap();
        let ceiling = ceiling(w, d, h).unwrap();

        assert_eq!(floor.transform.position, Vec3::ZERO);
        assert_eq!(ceiling.transform.position, Vec3::new(0.0, 96.0, 0.0));
        assert_eq!(plane_size(&floor), (144.0, 120.0));
        assert_eq!(plane_size(&ceiling), (144.0, 120.0));
        for node in [&floor, &ceiling] {
            assert_eq!(node.transform.rotation, Vec3::new(1.517, 0.0, 0.0));
            let material = node.as_mesh().unwrap().material;
            assert_eq!(material.side, Side::Double);
            assert_eq!(material.shading, Shading::Lambert);
        }
    }

    #[test]
    fn placement_holds_for_varied_rooms() {
        for (w, d, h) in [(1.0, 1.0, 1.0), (3.5, 20.0, 2.25), (100.0, 0.5, 9.0)] {
            let floor = floor(w, d).unwrap();
            let ceiling = ceiling(w, d, h).unwrap();
            assert_eq!(floor.transform.position.y, 0.0);
            assert_eq!(ceiling.transform.position.y, h * 12.0);
            assert_eq!(plane_size(&floor), (w * 12.0, d * 12.0));
            assert_eq!(plane_size(&ceiling), (w * 12.0, d * 12.0));
        }
    }

    #[test]
    fn legacy_wall_scales_only_z_and_drops_rotation() {
        let wall = wall(
            12.0,
            8.0,
            Vec3::new(-6.0, 0.0, -10.0),
            Vec3::new(0.0, 1.517, 0.0),
            WallPlacement::Legacy,
        )
        .unwrap();
        assert_eq!(wall.transform.position, Vec3::new(-6.0, 0.0, -120.0));
        assert_eq!(wall.transform.rotation, Vec3::ZERO);
        assert_eq!(plane_size(&wall), (144.0, 96.0));
        let material = wall.as_mesh().unwrap().material;
        assert_eq!(material.side, Side::Front);
        assert_eq!(material.shading, Shading::Basic);
    }

    #[test]
    fn scaled_wall_scales_everything_and_rotates() {
        let wall = wall(
            10.0,
            8.0,
            Vec3::new(-6.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.517),
            WallPlacement::Scaled,
        )
        .unwrap();
        assert_eq!(wall.transform.position, Vec3::new(-72.0, 0.0, 0.0));
        assert_eq!(wall.transform.rotation, Vec3::new(0.0, 0.0, 1.517));
    }

    #[test]
    fn rejects_non_positive_dimensions() {
        assert!(floor(0.0, 10.0).is_err());
        assert!(ceiling(12.0, 10.0, -1.0).is_err());
        assert!(RoomDimensions::new(12.0, f32::NAN, 8.0).is_err());
        assert!(RoomDimensions::new(12.0, 10.0, 8.0).is_ok());
    }
}

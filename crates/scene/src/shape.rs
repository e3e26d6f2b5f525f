use glam::Vec3;
use roomscene_common::Transform;

use crate::{Geometry, Material, Mesh, Node, SceneError};

/// A solid box with its own material.
///
/// The mesh is derived from geometry and material when the shape is built and
/// cannot be edited on its own. Only the transform is meant to change, e.g. to
/// spin or slide the shape from frame to frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    geometry: Geometry,
    material: Material,
    mesh: Mesh,
    pub transform: Transform,
}

impl Shape {
    pub fn new(width: f32, height: f32, depth: f32, material: Material) -> Result<Self, SceneError> {
        let geometry = Geometry::cuboid(width, height, depth)?;
        let mesh = Mesh::new(geometry.clone(), material);
        Ok(Self {
            geometry,
            material,
            mesh,
            transform: Transform::default(),
        })
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Add to the Euler angles (radians).
    pub fn rotate(&mut self, delta: Vec3) {
        self.transform.rotation += delta;
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.transform.position += delta;
    }

    /// A fresh scene node showing the shape at its current transform.
    pub fn node(&self) -> Node {
        Node::mesh(self.mesh.clone())
            .with_name("shape")
            .with_transform(self.transform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomscene_common::Color;

    #[test]
    fn mesh_is_built_from_sources() {
        let shape = Shape::new(40.0, 15.0, 20.0, Material::lambert(Color(0xfd59d7))).unwrap();
        assert_eq!(shape.mesh().geometry, *shape.geometry());
        assert_eq!(shape.mesh().material, *shape.material());
        assert_eq!(shape.geometry().size(), Vec3::new(40.0, 15.0, 20.0));
    }

    #[test]
    fn rejects_flat_box() {
        assert!(Shape::new(40.0, 0.0, 20.0, Material::default()).is_err());
    }

    #[test]
    fn motion_accumulates_on_transform() {
        let mut shape = Shape::new(1.0, 1.0, 1.0, Material::default()).unwrap();
        shape.rotate(Vec3::new(-0.01, 0.01, 0.0));
        shape.rotate(Vec3::new(-0.01, 0.01, 0.0));
        shape.translate(Vec3::new(0.0, 0.0, 0.1));
        assert!(shape.transform.rotation.abs_diff_eq(Vec3::new(-0.02, 0.02, 0.0), 1e-6));
        assert_eq!(shape.node().transform, shape.transform);
    }
}

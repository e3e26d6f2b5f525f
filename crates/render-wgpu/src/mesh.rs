//! CPU side of a frame: the scene flattened into world-space triangles and
//! the uniform block the shader reads.

use bytemuck::{Pod, Zeroable};
use glam::Mat3;
use roomscene_scene::{NodeKind, PerspectiveCamera, Scene, Shading, Side};

/// Point lights beyond this count are ignored.
pub const MAX_LIGHTS: usize = 8;

const FLAG_LIT: u32 = 1;
const FLAG_DOUBLE_SIDED: u32 = 2;

/// Soft white fill so unlit corners are not pure black.
const AMBIENT: [f32; 4] = [1.0, 1.0, 1.0, 0.25];

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
    pub flags: u32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct GpuPointLight {
    position: [f32; 4],
    color: [f32; 4],
    range: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct Uniforms {
    view_proj: [[f32; 4]; 4],
    ambient: [f32; 4],
    light_count: [u32; 4],
    lights: [GpuPointLight; MAX_LIGHTS],
}

impl Uniforms {
    pub fn new(scene: &Scene, camera: &PerspectiveCamera) -> Self {
        let mut uniforms = Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            ambient: AMBIENT,
            light_count: [0; 4],
            lights: [GpuPointLight::zeroed(); MAX_LIGHTS],
        };

        let lights = scene.point_lights();
        if lights.len() > MAX_LIGHTS {
            tracing::warn!(
                lights = lights.len(),
                max = MAX_LIGHTS,
                "too many point lights; extra lights ignored"
            );
        }
        for (slot, (position, light)) in uniforms.lights.iter_mut().zip(&lights) {
            let [r, g, b] = light.color.rgb();
            *slot = GpuPointLight {
                position: position.extend(1.0).to_array(),
                color: [r, g, b, light.intensity],
                range: [light.distance, 0.0, 0.0, 0.0],
            };
        }
        uniforms.light_count[0] = lights.len().min(MAX_LIGHTS) as u32;
        uniforms
    }

    pub fn light_count(&self) -> u32 {
        self.light_count[0]
    }
}

/// Every mesh in the scene as a flat, non-indexed triangle list in world space.
pub fn scene_vertices(scene: &Scene) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    scene.walk(|node, world| {
        let NodeKind::Mesh(mesh) = &node.kind else {
            return;
        };
        let triangles = mesh.geometry.triangles();
        let normal_matrix = Mat3::from_mat4(world).inverse().transpose();
        let color = mesh.material.color.rgb();
        let mut flags = 0;
        if mesh.material.shading == Shading::Lambert {
            flags |= FLAG_LIT;
        }
        if mesh.material.side == Side::Double {
            flags |= FLAG_DOUBLE_SIDED;
        }

        vertices.extend(triangles.indices.iter().map(|&i| {
            let i = i as usize;
            let position = world.transform_point3(triangles.positions[i]);
            let normal = (normal_matrix * triangles.normals[i]).normalize_or_zero();
            Vertex {
                position: position.to_array(),
                normal: normal.to_array(),
                color,
                flags,
            }
        }));
    });
    vertices
}

use glam::Vec3;

use crate::{SceneError, positive};

/// Shape data for a mesh.
///
/// Planes lie in the local XY plane facing +Z, centered on the origin.
/// Boxes are centered on the origin.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Plane { width: f32, height: f32 },
    Box { width: f32, height: f32, depth: f32 },
    Buffer(BufferGeometry),
}

/// Raw vertex data imported from a model file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BufferGeometry {
    pub positions: Vec<[f32; 3]>,
    /// Empty when the source had none; normals are then derived from faces.
    pub normals: Vec<[f32; 3]>,
    pub indices: Option<Vec<u32>>,
}

/// Indexed triangle list ready for upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Triangles {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl Geometry {
    pub fn plane(width: f32, height: f32) -> Result<Self, SceneError> {
        Ok(Self::Plane {
            width: positive("plane width", width)?,
            height: positive("plane height", height)?,
        })
    }

    pub fn cuboid(width: f32, height: f32, depth: f32) -> Result<Self, SceneError> {
        Ok(Self::Box {
            width: positive("box width", width)?,
            height: positive("box height", height)?,
            depth: positive("box depth", depth)?,
        })
    }

    /// Extent along each local axis.
    pub fn size(&self) -> Vec3 {
        match self {
            Self::Plane { width, height } => Vec3::new(*width, *height, 0.0),
            Self::Box {
                width,
                height,
                depth,
            } => Vec3::new(*width, *height, *depth),
            Self::Buffer(buffer) => {
                let mut points = buffer.positions.iter().map(|p| Vec3::from_array(*p));
                let Some(first) = points.next() else {
                    return Vec3::ZERO;
                };
                let (min, max) = points.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
                max - min
            }
        }
    }

    pub fn triangles(&self) -> Triangles {
        match self {
            Self::Plane { width, height } => plane_triangles(*width, *height),
            Self::Box {
                width,
                height,
                depth,
            } => box_triangles(Vec3::new(*width, *height, *depth) * 0.5),
            Self::Buffer(buffer) => buffer_triangles(buffer),
        }
    }
}

fn plane_triangles(width: f32, height: f32) -> Triangles {
    let (hw, hh) = (width * 0.5, height * 0.5);
    Triangles {
        positions: vec![
            Vec3::new(-hw, hh, 0.0),
            Vec3::new(hw, hh, 0.0),
            Vec3::new(-hw, -hh, 0.0),
            Vec3::new(hw, -hh, 0.0),
        ],
        normals: vec![Vec3::Z; 4],
        indices: vec![0, 2, 1, 2, 3, 1],
    }
}

fn box_triangles(half: Vec3) -> Triangles {
    // (normal, four corners as unit-cube signs, counter-clockwise seen from outside)
    #[rustfmt::skip]
    let faces: [(Vec3, [[f32; 3]; 4]); 6] = [
        (Vec3::Z,     [[-1.0, -1.0,  1.0], [ 1.0, -1.0,  1.0], [ 1.0,  1.0,  1.0], [-1.0,  1.0,  1.0]]),
        (Vec3::NEG_Z, [[ 1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0,  1.0, -1.0], [ 1.0,  1.0, -1.0]]),
        (Vec3::X,     [[ 1.0, -1.0,  1.0], [ 1.0, -1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0,  1.0,  1.0]]),
        (Vec3::NEG_X, [[-1.0, -1.0, -1.0], [-1.0, -1.0,  1.0], [-1.0,  1.0,  1.0], [-1.0,  1.0, -1.0]]),
        (Vec3::Y,     [[-1.0,  1.0,  1.0], [ 1.0,  1.0,  1.0], [ 1.0,  1.0, -1.0], [-1.0,  1.0, -1.0]]),
        (Vec3::NEG_Y, [[-1.0, -1.0, -1.0], [ 1.0, -1.0, -1.0], [ 1.0, -1.0,  1.0], [-1.0, -1.0,  1.0]]),
    ];

    let mut out = Triangles::default();
    for (normal, corners) in faces {
        let base = out.positions.len() as u32;
        for corner in corners {
            out.positions.push(Vec3::from_array(corner) * half);
            out.normals.push(normal);
        }
        out.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
    out
}

fn buffer_triangles(buffer: &BufferGeometry) -> Triangles {
    let positions: Vec<Vec3> = buffer.positions.iter().map(|p| Vec3::from_array(*p)).collect();
    let count = positions.len() as u32;
    let indices: Vec<u32> = match &buffer.indices {
        Some(indices) => indices
            .chunks_exact(3)
            .filter(|tri| tri.iter().all(|i| *i < count))
            .flatten()
            .copied()
            .collect(),
        None => (0..count - count % 3).collect(),
    };

    let normals = if buffer.normals.len() == positions.len() {
        buffer.normals.iter().map(|n| Vec3::from_array(*n)).collect()
    } else {
        face_normals(&positions, &indices)
    };

    Triangles {
        positions,
        normals,
        indices,
    }
}

/// Area-weighted vertex normals accumulated from the faces that share a vertex.
fn face_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let n = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += n;
        normals[b] += n;
        normals[c] += n;
    }
    normals
        .into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y))
        .collect()
}

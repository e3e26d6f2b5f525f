use glam::{Mat4, Vec3};

/// Perspective camera looking down its local -Z axis.
///
/// The camera carries no rotation; repositioning is the only supported motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
}

impl PerspectiveCamera {
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov,
            aspect,
            near,
            far,
            position: Vec3::ZERO,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_translation(-self.position)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_position_only_moves() {
        let mut cam = PerspectiveCamera::new(72.0, 1.5, 1.0, 200.0)
            .with_position(Vec3::new(0.0, 48.0, 120.0));
        cam.set_position(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(cam.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(cam.fov, 72.0);
        assert_eq!(cam.aspect, 1.5);
        assert_eq!(cam.near, 1.0);
        assert_eq!(cam.far, 200.0);
    }

    #[test]
    fn point_ahead_projects_inside_clip_volume() {
        let cam = PerspectiveCamera::new(72.0, 1.5, 1.0, 200.0)
            .with_position(Vec3::new(0.0, 48.0, 120.0));
        let clip = cam.view_projection() * Vec3::new(0.0, 48.0, 20.0).extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!((0.0..=1.0).contains(&ndc.z));

        let behind = cam.view_projection() * Vec3::new(0.0, 48.0, 130.0).extend(1.0);
        assert!(behind.w < 0.0);
    }
}

use std::fmt::Write as _;

use roomscene_scene::{NodeKind, PerspectiveCamera, Scene};

use crate::{FrameLog, FrameRecord, RenderError, Viewport};

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer draws the scene as seen through the camera once per call. It
/// never mutates the scene; scene truth belongs to the world.
pub trait Renderer {
    fn viewport(&self) -> Viewport;

    fn set_size(&mut self, viewport: Viewport);

    /// Render one frame.
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), RenderError>;
}

/// Debug text renderer, a stand-in for a GPU backend.
///
/// Each frame is described as text and appended to a shared [`FrameLog`].
#[derive(Debug)]
pub struct DebugTextRenderer {
    viewport: Viewport,
    log: FrameLog,
}

impl DebugTextRenderer {
    pub fn new(viewport: Viewport, log: FrameLog) -> Self {
        Self { viewport, log }
    }

    /// Human-readable description of one frame.
    pub fn describe(scene: &Scene, camera: &PerspectiveCamera, viewport: Viewport) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Frame (revision={}, nodes={}) {}x{} ===",
            scene.revision(),
            scene.node_count(),
            viewport.width,
            viewport.height
        );
        let _ = writeln!(
            out,
            "Camera: pos=({:.1}, {:.1}, {:.1}) fov={:.0} aspect={:.3} near={} far={}",
            camera.position.x,
            camera.position.y,
            camera.position.z,
            camera.fov,
            camera.aspect,
            camera.near,
            camera.far
        );
        scene.walk(|node, world| {
            let p = world.w_axis;
            let kind = match &node.kind {
                NodeKind::Group => "group".to_string(),
                NodeKind::Mesh(mesh) => {
                    let s = mesh.geometry.size();
                    format!("mesh {:.1}x{:.1}x{:.1} {}", s.x, s.y, s.z, mesh.material.color)
                }
                NodeKind::PointLight(light) => format!("point light {}", light.color),
            };
            let _ = writeln!(
                out,
                "  [{}] {:<12} {} pos=({:.2}, {:.2}, {:.2})",
                node.id.short(),
                node.name.as_deref().unwrap_or("-"),
                kind,
                p.x,
                p.y,
                p.z
            );
        });
        out
    }
}

impl Renderer for DebugTextRenderer {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn set_size(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), RenderError> {
        let text = Self::describe(scene, camera, self.viewport);
        tracing::trace!(revision = scene.revision(), "debug frame rendered");
        self.log.push(FrameRecord {
            revision: scene.revision(),
            node_count: scene.node_count(),
            camera_position: camera.position,
            text,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use roomscene_common::Color;
    use roomscene_scene::{Light, room};

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::new(72.0, 1.5, 1.0, 200.0).with_position(Vec3::new(0.0, 48.0, 120.0))
    }

    #[test]
    fn debug_renderer_empty_scene() {
        let log = FrameLog::default();
        let mut renderer = DebugTextRenderer::new(Viewport::new(800, 600), log.clone());
        renderer.render(&Scene::new(), &camera()).unwrap();

        let frames = log.frames();
        assert_eq!(frames.len(), 1);
        assert!(frames[0].text.contains("nodes=0"));
        assert!(frames[0].text.contains("fov=72"));
    }

    #[test]
    fn debug_renderer_lists_nodes() {
        let mut scene = Scene::new();
        scene.add(room::floor(12.0, 10.0).unwrap());
        scene.add(Light::new(Color(0xffff00), Vec3::new(10.0, 0.0, 25.0)).node());

        let text = DebugTextRenderer::describe(&scene, &camera(), Viewport::new(800, 600));
        assert!(text.contains("floor"));
        assert!(text.contains("144.0x120.0x0.0"));
        assert!(text.contains("point light #ffff00"));
        assert!(text.contains("pos=(10.00, 0.00, 25.00)"));
    }

    #[test]
    fn set_size_updates_viewport() {
        let mut renderer = DebugTextRenderer::new(Viewport::new(1, 1), FrameLog::default());
        renderer.set_size(Viewport::new(640, 480));
        assert_eq!(renderer.viewport(), Viewport::new(640, 480));
    }
}

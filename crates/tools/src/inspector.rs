use glam::{Mat4, Vec3};
use roomscene_common::NodeId;
use roomscene_kernel::World;
use roomscene_render::Viewport;
use roomscene_scene::{Node, NodeKind, Scene};

/// Scene inspector for developer tooling.
///
/// Read-only queries against a scene or a whole world, for debugging and the
/// CLI's listings.
pub struct SceneInspector;

impl SceneInspector {
    /// Counts over every node in the scene.
    pub fn scene_summary(scene: &Scene) -> SceneSummary {
        let mut summary = SceneSummary {
            revision: scene.revision(),
            top_level: scene.len(),
            ..SceneSummary::default()
        };
        scene.walk(|node, _| summary.count(node));
        summary
    }

    /// Scene counts plus the world's camera, viewport and loop progress.
    pub fn summary(world: &World) -> WorldSummary {
        WorldSummary {
            scene: Self::scene_summary(world.scene()),
            viewport: world.viewport(),
            camera_position: world.camera().map(|c| c.position),
            shapes: world.shapes().count(),
            pending_loads: world.pending_loads(),
            frames: world.frames_rendered(),
        }
    }

    /// Every node depth-first, roots in insertion order.
    pub fn tree(scene: &Scene) -> Vec<NodeInfo> {
        let mut out = Vec::new();
        for root in scene.children() {
            collect(root, Mat4::IDENTITY, 0, &mut out);
        }
        out
    }

    /// Same listing for a detached subtree, e.g. a model file not yet in a scene.
    pub fn subtree(node: &Node) -> Vec<NodeInfo> {
        let mut out = Vec::new();
        collect(node, Mat4::IDENTITY, 0, &mut out);
        out
    }

    pub fn inspect_node(scene: &Scene, id: NodeId) -> Option<NodeInfo> {
        Self::tree(scene).into_iter().find(|info| info.id == id)
    }
}

fn collect(node: &Node, parent: Mat4, depth: usize, out: &mut Vec<NodeInfo>) {
    let world = parent * node.transform.matrix();
    out.push(NodeInfo {
        id: node.id,
        name: node.name.clone(),
        kind: kind_label(&node.kind),
        depth,
        world_position: world.transform_point3(Vec3::ZERO),
        scale: node.transform.scale,
        children: node.children.len(),
    });
    for child in &node.children {
        collect(child, world, depth + 1, out);
    }
}

fn kind_label(kind: &NodeKind) -> &'static str {
    match kind {
        NodeKind::Group => "group",
        NodeKind::Mesh(_) => "mesh",
        NodeKind::PointLight(_) => "point light",
    }
}

/// Node counts for one scene.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneSummary {
    pub revision: u64,
    pub top_level: usize,
    pub nodes: usize,
    pub meshes: usize,
    pub lights: usize,
    pub groups: usize,
    pub triangles: usize,
}

impl SceneSummary {
    fn count(&mut self, node: &Node) {
        self.nodes += 1;
        match &node.kind {
            NodeKind::Group => self.groups += 1,
            NodeKind::Mesh(mesh) => {
                self.meshes += 1;
                self.triangles += mesh.geometry.triangles().indices.len() / 3;
            }
            NodeKind::PointLight(_) => self.lights += 1,
        }
    }
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: revision={} top_level={} nodes={} meshes={} lights={} groups={} triangles={}",
            self.revision,
            self.top_level,
            self.nodes,
            self.meshes,
            self.lights,
            self.groups,
            self.triangles
        )
    }
}

/// Summary of a world for the inspector.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldSummary {
    pub scene: SceneSummary,
    pub viewport: Viewport,
    pub camera_position: Option<Vec3>,
    pub shapes: usize,
    pub pending_loads: usize,
    pub frames: u64,
}

impl std::fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.scene)?;
        write!(
            f,
            "World: viewport={}x{} shapes={} pending_loads={} frames={}",
            self.viewport.width, self.viewport.height, self.shapes, self.pending_loads, self.frames
        )?;
        match self.camera_position {
            Some(p) => write!(f, " camera=({:.1}, {:.1}, {:.1})", p.x, p.y, p.z),
            None => write!(f, " camera=none"),
        }
    }
}

/// One node as seen by the inspector.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeInfo {
    pub id: NodeId,
    pub name: Option<String>,
    pub kind: &'static str,
    pub depth: usize,
    pub world_position: Vec3,
    pub scale: Vec3,
    pub children: usize,
}

impl std::fmt::Display for NodeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let p = self.world_position;
        write!(
            f,
            "{:indent$}[{}] {} ({}) pos=({:.2}, {:.2}, {:.2})",
            "",
            self.id.short(),
            self.name.as_deref().unwrap_or("-"),
            self.kind,
            p.x,
            p.y,
            p.z,
            indent = self.depth * 2
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomscene_common::{Color, Transform};
    use roomscene_render::{CONTAINER_SELECTOR, HeadlessHost};
    use roomscene_scene::{Light, Material, RoomDimensions, Shape, room};

    fn furnished() -> Scene {
        let mut scene = Scene::new();
        scene.add(room::floor(12.0, 10.0).unwrap());
        scene.add(room::ceiling(12.0, 10.0, 8.0).unwrap());
        scene.add(
            Node::group()
                .with_name("chair")
                .with_transform(Transform::from_position(Vec3::new(10.0, 0.0, 0.0)))
                .with_child(
                    Shape::new(2.0, 2.0, 2.0, Material::default())
                        .unwrap()
                        .node()
                        .with_transform(Transform::from_position(Vec3::new(0.0, 5.0, 0.0))),
                ),
        );
        scene.add(Light::new(Color(0xffff00), Vec3::new(10.0, 0.0, 25.0)).node());
        scene
    }

    #[test]
    fn summary_empty_scene() {
        let summary = SceneInspector::scene_summary(&Scene::new());
        assert_eq!(summary, SceneSummary::default());
    }

    #[test]
    fn summary_counts_every_kind() {
        let summary = SceneInspector::scene_summary(&furnished());
        assert_eq!(summary.revision, 4);
        assert_eq!(summary.top_level, 4);
        assert_eq!(summary.nodes, 5);
        assert_eq!(summary.meshes, 3);
        assert_eq!(summary.lights, 1);
        assert_eq!(summary.groups, 1);
        // two planes and a box
        assert_eq!(summary.triangles, 2 + 2 + 12);
        assert!(summary.to_string().contains("nodes=5"));
    }

    #[test]
    fn tree_is_depth_first_with_world_positions() {
        let tree = SceneInspector::tree(&furnished());
        let kinds: Vec<_> = tree.iter().map(|n| (n.kind, n.depth)).collect();
        assert_eq!(
            kinds,
            vec![("mesh", 0), ("mesh", 0), ("group", 0), ("mesh", 1), ("point light", 0)]
        );
        assert_eq!(tree[3].world_position, Vec3::new(10.0, 5.0, 0.0));
        assert_eq!(tree[2].children, 1);
        assert!(tree[3].to_string().starts_with("  ["));
    }

    #[test]
    fn inspect_node_found_and_missing() {
        let mut scene = furnished();
        let id = scene.add(Node::group().with_name("marker"));
        let info = SceneInspector::inspect_node(&scene, id).unwrap();
        assert_eq!(info.name.as_deref(), Some("marker"));
        assert!(SceneInspector::inspect_node(&scene, NodeId::new()).is_none());
    }

    #[test]
    fn world_summary() {
        let host = HeadlessHost::page(1024, 768, 60);
        let room = RoomDimensions::new(12.0, 10.0, 8.0).unwrap();
        let mut world = World::new(Box::new(host), CONTAINER_SELECTOR, room).unwrap();
        world.build_room(12.0, 10.0, 8.0).unwrap();

        let summary = SceneInspector::summary(&world);
        assert_eq!(summary.scene.nodes, 2);
        assert_eq!(summary.viewport, Viewport::new(1024, 658));
        assert_eq!(summary.camera_position, None);
        assert!(summary.to_string().contains("camera=none"));
    }

    #[test]
    fn subtree_of_parsed_model() {
        let json = br#"{ "metadata": { "type": "Object" },
            "object": { "type": "Group", "name": "root", "children": [
                { "type": "Group", "name": "inner" } ] } }"#;
        let node = roomscene_assets::parse_model(json).unwrap();
        let listing = SceneInspector::subtree(&node);
        assert_eq!(listing.len(), 2);
        assert_eq!(listing[1].depth, 1);
    }
}

use glam::{Mat4, Vec3};
use roomscene_common::{NodeId, Transform};

use crate::{Mesh, PointLight};

/// What a node contributes to a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Pure transform parent, e.g. the root of an imported model.
    Group,
    Mesh(Mesh),
    PointLight(PointLight),
}

/// A node and the subtree it owns.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub name: Option<String>,
    pub transform: Transform,
    pub kind: NodeKind,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            id: NodeId::new(),
            name: None,
            transform: Transform::default(),
            kind,
            children: Vec::new(),
        }
    }

    pub fn group() -> Self {
        Self::new(NodeKind::Group)
    }

    pub fn mesh(mesh: Mesh) -> Self {
        Self::new(NodeKind::Mesh(mesh))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn as_mesh(&self) -> Option<&Mesh> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    /// This node plus every descendant.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Node::subtree_len).sum::<usize>()
    }

    pub fn find(&self, id: NodeId) -> Option<&Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    fn find_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(id))
    }

    /// Depth-first, parents before children. `parent` is the parent's world matrix.
    pub fn walk<F: FnMut(&Node, Mat4)>(&self, parent: Mat4, f: &mut F) {
        let world = parent * self.transform.matrix();
        f(self, world);
        for child in &self.children {
            child.walk(world, f);
        }
    }
}

/// Root of everything rendered.
///
/// Append-only: content is added at the root and never removed or reordered.
/// The only in-place edit is a node transform, used for caller-animated shapes.
/// `revision` increases on every change so frames can tell what they saw.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    children: Vec<Node>,
    revision: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node (and its subtree) at the root. Returns the node's id.
    pub fn add(&mut self, node: Node) -> NodeId {
        let id = node.id;
        tracing::debug!(
            node = %id.short(),
            name = node.name.as_deref().unwrap_or("-"),
            subtree = node.subtree_len(),
            "node added to scene"
        );
        self.children.push(node);
        self.revision += 1;
        id
    }

    /// Top-level nodes in insertion order.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Number of top-level nodes.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes at any depth.
    pub fn node_count(&self) -> usize {
        self.children.iter().map(Node::subtree_len).sum()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.children.iter().find_map(|c| c.find(id))
    }

    /// Replace a node's local transform. Returns false if the node is not in the scene.
    pub fn set_transform(&mut self, id: NodeId, transform: Transform) -> bool {
        match self.children.iter_mut().find_map(|c| c.find_mut(id)) {
            Some(node) => {
                node.transform = transform;
                self.revision += 1;
                true
            }
            None => false,
        }
    }

    /// Visit every node with its world matrix.
    pub fn walk<F: FnMut(&Node, Mat4)>(&self, mut f: F) {
        for child in &self.children {
            child.walk(Mat4::IDENTITY, &mut f);
        }
    }

    /// Every point light with its world-space position.
    pub fn point_lights(&self) -> Vec<(Vec3, PointLight)> {
        let mut lights = Vec::new();
        self.walk(|node, world| {
            if let NodeKind::PointLight(light) = &node.kind {
                lights.push((world.transform_point3(Vec3::ZERO), *light));
            }
        });
        lights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Geometry, Material};
    use roomscene_common::Color;

    fn plane_node() -> Node {
        Node::mesh(Mesh::new(
            Geometry::plane(1.0, 1.0).unwrap(),
            Material::default(),
        ))
    }

    #[test]
    fn scene_starts_empty() {
        let scene = Scene::new();
        assert!(scene.is_empty());
        assert_eq!(scene.node_count(), 0);
        assert_eq!(scene.revision(), 0);
    }

    #[test]
    fn add_preserves_order_and_bumps_revision() {
        let mut scene = Scene::new();
        let a = scene.add(plane_node().with_name("a"));
        let b = scene.add(plane_node().with_name("b"));
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.children()[0].id, a);
        assert_eq!(scene.children()[1].id, b);
        assert_eq!(scene.revision(), 2);
    }

    #[test]
    fn subtree_counts_and_lookup() {
        let leaf = plane_node();
        let leaf_id = leaf.id;
        let group = Node::group().with_child(Node::group().with_child(leaf));
        let mut scene = Scene::new();
        scene.add(group);
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.node_count(), 3);
        assert!(scene.get(leaf_id).is_some());
        assert!(scene.get(NodeId::new()).is_none());
    }

    #[test]
    fn set_transform_edits_in_place() {
        let mut scene = Scene::new();
        let id = scene.add(plane_node());
        let moved = Transform::from_position(Vec3::new(0.0, 5.0, 0.0));
        assert!(scene.set_transform(id, moved));
        assert_eq!(scene.get(id).unwrap().transform, moved);
        assert_eq!(scene.len(), 1);
        assert!(!scene.set_transform(NodeId::new(), moved));
    }

    #[test]
    fn walk_composes_parent_transforms() {
        let light = Node::new(NodeKind::PointLight(PointLight::new(Color::WHITE)))
            .with_transform(Transform::from_position(Vec3::new(1.0, 0.0, 0.0)));
        let group = Node::group()
            .with_transform(Transform::from_position(Vec3::new(0.0, 2.0, 0.0)))
            .with_child(light);
        let mut scene = Scene::new();
        scene.add(group);

        let lights = scene.point_lights();
        assert_eq!(lights.len(), 1);
        assert!(lights[0].0.abs_diff_eq(Vec3::new(1.0, 2.0, 0.0), 1e-6));
    }
}

use std::collections::HashMap;

use glam::Mat4;
use roomscene_common::{Color, Transform};
use roomscene_scene::{BufferGeometry, Geometry, Material, Mesh, Node, NodeKind, PointLight, Side};
use serde::Deserialize;

use crate::AssetError;

#[derive(Debug, Deserialize)]
struct ObjectFile {
    metadata: Metadata,
    #[serde(default)]
    geometries: Vec<GeometryDef>,
    #[serde(default)]
    materials: Vec<MaterialDef>,
    object: ObjectDef,
}

#[derive(Debug, Deserialize)]
struct Metadata {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct GeometryDef {
    uuid: String,
    #[serde(rename = "type")]
    kind: String,
    width: Option<f32>,
    height: Option<f32>,
    depth: Option<f32>,
    data: Option<BufferData>,
}

#[derive(Debug, Deserialize)]
struct BufferData {
    attributes: Attributes,
    index: Option<IndexData>,
}

#[derive(Debug, Deserialize)]
struct Attributes {
    position: Attribute,
    normal: Option<Attribute>,
}

#[derive(Debug, Deserialize)]
struct Attribute {
    #[serde(rename = "itemSize")]
    item_size: usize,
    array: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct IndexData {
    array: Vec<u32>,
}

#[derive(Debug, Deserialize)]
struct MaterialDef {
    uuid: String,
    #[serde(rename = "type")]
    kind: String,
    color: Option<u32>,
    side: Option<u8>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MaterialRef {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Deserialize)]
struct ObjectDef {
    #[serde(rename = "type")]
    kind: String,
    name: Option<String>,
    matrix: Option<Vec<f32>>,
    #[serde(default)]
    children: Vec<ObjectDef>,
    geometry: Option<String>,
    material: Option<MaterialRef>,
    color: Option<u32>,
    intensity: Option<f32>,
    distance: Option<f32>,
}

/// Parse a model file into a single subtree rooted at one node.
pub fn parse_model(bytes: &[u8]) -> Result<Node, AssetError> {
    let file: ObjectFile = serde_json::from_slice(bytes)?;
    if file.metadata.kind != "Object" {
        return Err(AssetError::Format(format!(
            "expected metadata type \"Object\", got {:?}",
            file.metadata.kind
        )));
    }
    let lookup = Lookup {
        geometries: file.geometries.iter().map(|g| (g.uuid.as_str(), g)).collect(),
        materials: file.materials.iter().map(|m| (m.uuid.as_str(), m)).collect(),
    };
    lookup.node(&file.object)
}

struct Lookup<'a> {
    geometries: HashMap<&'a str, &'a GeometryDef>,
    materials: HashMap<&'a str, &'a MaterialDef>,
}

impl Lookup<'_> {
    fn node(&self, def: &ObjectDef) -> Result<Node, AssetError> {
        let kind = match def.kind.as_str() {
            "Mesh" => NodeKind::Mesh(self.mesh(def)?),
            "PointLight" => NodeKind::PointLight(PointLight {
                color: Color(def.color.unwrap_or(0xffffff)),
                intensity: def.intensity.unwrap_or(1.0),
                distance: def.distance.unwrap_or(0.0),
            }),
            "Scene" | "Group" | "Object3D" => NodeKind::Group,
            other => {
                tracing::warn!(kind = other, "unsupported object type imported as empty group");
                NodeKind::Group
            }
        };

        let mut node = Node::new(kind).with_transform(transform(def.matrix.as_deref())?);
        node.name = def.name.clone().filter(|n| !n.is_empty());
        for child in &def.children {
            node.children.push(self.node(child)?);
        }
        Ok(node)
    }

    fn mesh(&self, def: &ObjectDef) -> Result<Mesh, AssetError> {
        let uuid = def
            .geometry
            .as_deref()
            .ok_or_else(|| AssetError::Format("mesh without geometry".into()))?;
        let geometry = self
            .geometries
            .get(uuid)
            .ok_or_else(|| AssetError::MissingReference {
                kind: "geometry",
                uuid: uuid.to_string(),
            })?;

        let material = match &def.material {
            None => Material::default(),
            Some(MaterialRef::One(uuid)) => self.material(uuid)?,
            Some(MaterialRef::Many(uuids)) => match uuids.first() {
                Some(uuid) => self.material(uuid)?,
                None => Material::default(),
            },
        };

        Ok(Mesh::new(convert_geometry(geometry)?, material))
    }

    fn material(&self, uuid: &str) -> Result<Material, AssetError> {
        let def = self
            .materials
            .get(uuid)
            .ok_or_else(|| AssetError::MissingReference {
                kind: "material",
                uuid: uuid.to_string(),
            })?;
        let color = Color(def.color.unwrap_or(0xffffff));
        let material = match def.kind.as_str() {
            "MeshBasicMaterial" => Material::basic(color),
            _ => Material::lambert(color),
        };
        // 0 = front, 1 = back, 2 = double; back-only is drawn double-sided.
        let side = match def.side.unwrap_or(0) {
            0 => Side::Front,
            _ => Side::Double,
        };
        Ok(material.with_side(side))
    }
}

/// Column-major 4x4, identity when absent.
fn transform(matrix: Option<&[f32]>) -> Result<Transform, AssetError> {
    match matrix {
        None => Ok(Transform::default()),
        Some(m) if m.len() == 16 => Ok(Transform::from_matrix(Mat4::from_cols_slice(m))),
        Some(m) => Err(AssetError::Format(format!(
            "matrix has {} elements, expected 16",
            m.len()
        ))),
    }
}

fn convert_geometry(def: &GeometryDef) -> Result<Geometry, AssetError> {
    match def.kind.as_str() {
        "BufferGeometry" => {
            let data = def
                .data
                .as_ref()
                .ok_or_else(|| AssetError::Format(format!("geometry {} has no data", def.uuid)))?;
            Ok(Geometry::Buffer(BufferGeometry {
                positions: triples("position", &data.attributes.position)?,
                normals: match &data.attributes.normal {
                    Some(normal) => triples("normal", normal)?,
                    None => Vec::new(),
                },
                indices: data.index.as_ref().map(|i| i.array.clone()),
            }))
        }
        "BoxGeometry" | "BoxBufferGeometry" => Ok(Geometry::cuboid(
            def.width.unwrap_or(1.0),
            def.height.unwrap_or(1.0),
            def.depth.unwrap_or(1.0),
        )?),
        "PlaneGeometry" | "PlaneBufferGeometry" => Ok(Geometry::plane(
            def.width.unwrap_or(1.0),
            def.height.unwrap_or(1.0),
        )?),
        other => Err(AssetError::UnsupportedGeometry(other.to_string())),
    }
}

fn triples(name: &str, attribute: &Attribute) -> Result<Vec<[f32; 3]>, AssetError> {
    if attribute.item_size != 3 || attribute.array.len() % 3 != 0 {
        return Err(AssetError::Format(format!(
            "{name} attribute must hold whole 3-component items (itemSize {}, {} values)",
            attribute.item_size,
            attribute.array.len()
        )));
    }
    Ok(attribute
        .array
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2]])
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use roomscene_scene::Shading;

    const CHAIR: &str = r#"{
        "metadata": { "version": 4.5, "type": "Object", "generator": "Object3D.toJSON" },
        "geometries": [
            { "uuid": "seat-geo", "type": "BoxGeometry", "width": 18, "height": 2, "depth": 18 },
            { "uuid": "tri-geo", "type": "BufferGeometry", "data": {
                "attributes": { "position": { "itemSize": 3, "type": "Float32Array",
                    "array": [0, 0, 0, 1, 0, 0, 0, 1, 0] } } } }
        ],
        "materials": [
            { "uuid": "wood", "type": "MeshLambertMaterial", "color": 9127187 },
            { "uuid": "flat", "type": "MeshBasicMaterial", "color": 16711680, "side": 2 }
        ],
        "object": {
            "uuid": "root", "type": "Scene", "name": "chair",
            "matrix": [1,0,0,0, 0,1,0,0, 0,0,1,0, 0,0,0,1],
            "children": [
                { "uuid": "seat", "type": "Mesh", "name": "seat", "geometry": "seat-geo",
                  "material": "wood", "matrix": [1,0,0,0, 0,1,0,0, 0,0,1,0, 0,18,0,1] },
                { "uuid": "tag", "type": "Mesh", "geometry": "tri-geo", "material": ["flat", "wood"] },
                { "uuid": "lamp", "type": "PointLight", "color": 16777215, "intensity": 0.5 }
            ]
        }
    }"#;

    #[test]
    fn parses_object_tree_into_one_subtree() {
        let node = parse_model(CHAIR.as_bytes()).unwrap();
        assert_eq!(node.kind, NodeKind::Group);
        assert_eq!(node.name.as_deref(), Some("chair"));
        assert_eq!(node.children.len(), 3);
        assert_eq!(node.subtree_len(), 4);

        let seat = &node.children[0];
        assert_eq!(seat.transform.position, Vec3::new(0.0, 18.0, 0.0));
        let mesh = seat.as_mesh().unwrap();
        assert_eq!(mesh.geometry.size(), Vec3::new(18.0, 2.0, 18.0));
        assert_eq!(mesh.material.color, Color(0x8b4513));
        assert_eq!(mesh.material.shading, Shading::Lambert);

        let tag = node.children[1].as_mesh().unwrap();
        assert_eq!(tag.material.shading, Shading::Basic);
        assert_eq!(tag.material.side, Side::Double);
        assert!(matches!(tag.geometry, Geometry::Buffer(_)));

        match &node.children[2].kind {
            NodeKind::PointLight(light) => assert_eq!(light.intensity, 0.5),
            other => panic!("expected point light, got {other:?}"),
        }
    }

    #[test]
    fn rejects_wrong_metadata_type() {
        let json = r#"{ "metadata": { "type": "Geometry" }, "object": { "type": "Group" } }"#;
        assert!(matches!(parse_model(json.as_bytes()), Err(AssetError::Format(_))));
    }

    #[test]
    fn rejects_dangling_geometry_reference() {
        let json = r#"{ "metadata": { "type": "Object" },
            "object": { "type": "Mesh", "geometry": "nope" } }"#;
        assert!(matches!(
            parse_model(json.as_bytes()),
            Err(AssetError::MissingReference { kind: "geometry", .. })
        ));
    }

    #[test]
    fn rejects_unsupported_geometry() {
        let json = r#"{ "metadata": { "type": "Object" },
            "geometries": [ { "uuid": "g", "type": "TorusKnotGeometry" } ],
            "object": { "type": "Mesh", "geometry": "g" } }"#;
        assert!(matches!(
            parse_model(json.as_bytes()),
            Err(AssetError::UnsupportedGeometry(kind)) if kind == "TorusKnotGeometry"
        ));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(parse_model(b"not json"), Err(AssetError::Json(_))));
    }

    #[test]
    fn rejects_short_matrix() {
        let json = r#"{ "metadata": { "type": "Object" },
            "object": { "type": "Group", "matrix": [1, 0, 0] } }"#;
        assert!(matches!(parse_model(json.as_bytes()), Err(AssetError::Format(_))));
    }
}

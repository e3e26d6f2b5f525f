use glam::Vec3;
use roomscene_render::Host;
use roomscene_scene::Light;

use crate::{SceneConfig, World, WorldError};

/// Compose the standard scene on `host`: camera, renderer, the model load,
/// the room, any configured walls, then the light.
///
/// The model load is started before the room is built, so the room is always
/// in the scene before the model can land. The render loop is left to the
/// caller.
pub fn compose(host: Box<dyn Host>, config: &SceneConfig) -> Result<World, WorldError> {
    let room = config.room;
    let mut world = World::new(host, &config.container, room)?;
    world.set_wall_placement(config.wall_placement);

    world.add_camera(
        config.camera.fov,
        config.camera.near,
        config.camera.far,
        config.camera_position(),
    );
    world.add_renderer()?;

    if let Some(model) = &config.model {
        world.load_model(model);
    }
    world.build_room(room.width, room.depth, room.height)?;
    for wall in &config.walls {
        world.add_wall(
            wall.width,
            wall.height,
            Vec3::from_array(wall.position),
            Vec3::from_array(wall.rotation),
        )?;
    }
    world.add_light(&Light::new(
        config.light.color,
        Vec3::from_array(config.light.position),
    ));

    tracing::info!(
        nodes = world.scene().node_count(),
        pending_loads = world.pending_loads(),
        "scene composed"
    );
    Ok(world)
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomscene_render::{CONTAINER_SELECTOR, HeadlessHost};
    use roomscene_scene::NodeKind;

    use crate::{FixedFrames, WallConfig};

    fn config() -> SceneConfig {
        SceneConfig {
            model: None,
            ..SceneConfig::default()
        }
    }

    #[test]
    fn default_scene_is_room_plus_light() {
        let host = HeadlessHost::page(1280, 800, 60);
        let log = host.frame_log();
        let mut world = compose(Box::new(host), &config()).unwrap();

        let names: Vec<_> = world
            .scene()
            .children()
            .iter()
            .map(|n| n.name.as_deref().unwrap_or("-"))
            .collect();
        assert_eq!(names, vec!["floor", "ceiling", "point light"]);
        assert!(matches!(world.scene().children()[2].kind, NodeKind::PointLight(_)));
        assert_eq!(
            world.camera().unwrap().position,
            Vec3::new(0.0, 48.0, 120.0)
        );
        assert_eq!(world.host().attached_surfaces(CONTAINER_SELECTOR), 1);

        world.render(&mut FixedFrames::new(3)).unwrap();
        assert_eq!(log.len(), 3);
        assert!(log.last().unwrap().text.contains("point light #ffff00"));
    }

    #[test]
    fn configured_walls_are_added_before_the_light() {
        let config = SceneConfig {
            walls: vec![WallConfig {
                width: 12.0,
                height: 8.0,
                position: [0.0, 48.0, -5.0],
                rotation: [0.0; 3],
            }],
            ..config()
        };
        let world = compose(Box::new(HeadlessHost::page(1280, 800, 60)), &config).unwrap();
        let children = world.scene().children();
        assert_eq!(children.len(), 4);
        assert_eq!(children[2].name.as_deref(), Some("wall"));
        assert_eq!(children[2].transform.position, Vec3::new(0.0, 48.0, -60.0));
    }

    #[test]
    fn model_load_is_started_but_not_awaited() {
        let dir = tempfile::tempdir().unwrap();
        let config = SceneConfig {
            model: Some(dir.path().join("chair.json")),
            ..SceneConfig::default()
        };
        let world = compose(Box::new(HeadlessHost::page(1280, 800, 60)), &config).unwrap();
        assert_eq!(world.pending_loads(), 1);
        assert_eq!(world.scene().len(), 3);
    }

    #[test]
    fn unknown_container_fails_composition() {
        let config = SceneConfig {
            container: ".missing".into(),
            ..config()
        };
        let err = compose(Box::new(HeadlessHost::page(1280, 800, 60)), &config).unwrap_err();
        assert!(matches!(err, WorldError::ContainerNotFound(_)));
    }
}

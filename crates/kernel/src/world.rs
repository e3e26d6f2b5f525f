use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use glam::Vec3;
use roomscene_assets::{LoadEvent, LoadTask, ModelLoader};
use roomscene_common::NodeId;
use roomscene_render::{HEADER_SELECTOR, Host, Renderer, Viewport};
use roomscene_scene::{
    Light, Node, PerspectiveCamera, RoomDimensions, Scene, Shape, WallPlacement, room,
};

use crate::WorldError;

static NEXT_WORLD_ID: AtomicU64 = AtomicU64::new(1);

/// Outcome counts from draining model loads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Subtrees added to the scene.
    pub inserted: usize,
    /// Loads that ended in failure, cancellation included.
    pub failed: usize,
}

/// The scene orchestrator.
///
/// A world is bound to one container on its host page. It owns the scene and
/// everything needed to draw it: the active camera, the active renderer, the
/// shapes it manages and any model loads still in flight.
///
/// Scene content is append-only. Nodes are added, moved, never removed.
pub struct World {
    id: u64,
    host: Box<dyn Host>,
    container: String,
    room: RoomDimensions,
    viewport: Viewport,
    scene: Scene,
    shapes: Vec<(Shape, NodeId)>,
    camera: Option<PerspectiveCamera>,
    renderer: Option<Box<dyn Renderer>>,
    wall_placement: WallPlacement,
    loader: ModelLoader,
    loads: Vec<LoadTask>,
    frames: u64,
    loop_started: bool,
}

impl World {
    /// Bind a new world to `container` on `host`.
    ///
    /// The viewport is the container's width by the window height minus the
    /// header strip and the layout margin. A page without a header counts it
    /// as zero height.
    pub fn new(
        host: Box<dyn Host>,
        container: &str,
        room: RoomDimensions,
    ) -> Result<Self, WorldError> {
        room.validate()?;
        let viewport = layout(host.as_ref(), container)?;

        tracing::info!(
            container,
            width = viewport.width,
            height = viewport.height,
            "world created"
        );
        Ok(Self {
            id: NEXT_WORLD_ID.fetch_add(1, Ordering::Relaxed),
            host,
            container: container.to_string(),
            room,
            viewport,
            scene: Scene::new(),
            shapes: Vec::new(),
            camera: None,
            renderer: None,
            wall_placement: WallPlacement::default(),
            loader: ModelLoader::new(),
            loads: Vec::new(),
            frames: 0,
            loop_started: false,
        })
    }

    /// Process-unique identity, used to bind a render loop to its world.
    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    /// Selector of the container this world draws into.
    pub fn container(&self) -> &str {
        &self.container
    }

    /// Room dimensions given at construction.
    pub fn room(&self) -> RoomDimensions {
        self.room
    }

    /// Current viewport in pixels.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The scene graph.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The page this world is bound to.
    pub fn host(&self) -> &dyn Host {
        self.host.as_ref()
    }

    /// The active camera, if configured.
    pub fn camera(&self) -> Option<&PerspectiveCamera> {
        self.camera.as_ref()
    }

    /// Whether a renderer has been configured.
    pub fn has_renderer(&self) -> bool {
        self.renderer.is_some()
    }

    /// Frames rendered so far.
    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    // ── Camera & renderer ──────────────────────────────────────────

    /// Create the perspective camera. Aspect comes from the viewport.
    ///
    /// Calling again replaces the previous camera.
    pub fn add_camera(
        &mut self,
        fov: f32,
        near: f32,
        far: f32,
        position: Vec3,
    ) -> &PerspectiveCamera {
        if self.camera.is_some() {
            tracing::warn!("camera already configured; replacing it");
        }
        let camera =
            PerspectiveCamera::new(fov, self.viewport.aspect(), near, far).with_position(position);
        tracing::debug!(fov, near, far, ?position, "camera configured");
        self.camera.insert(camera)
    }

    /// Move the camera. Projection parameters stay as they are.
    pub fn set_camera_pos(&mut self, position: Vec3) -> Result<(), WorldError> {
        let camera = self.camera.as_mut().ok_or(WorldError::CameraNotConfigured)?;
        camera.set_position(position);
        Ok(())
    }

    /// Create a renderer sized to the viewport and attach it to the container.
    ///
    /// Calling again replaces the active renderer, but the host keeps every
    /// surface it has attached.
    pub fn add_renderer(&mut self) -> Result<(), WorldError> {
        let renderer = self.host.attach_renderer(&self.container, self.viewport)?;
        if self.renderer.replace(renderer).is_some() {
            tracing::warn!(
                container = %self.container,
                surfaces = self.host.attached_surfaces(&self.container),
                "renderer replaced; the previous surface stays attached"
            );
        }
        Ok(())
    }

    /// Re-read the host layout after a resize. Camera aspect and renderer
    /// size follow the new viewport; on error everything stays as it was.
    pub fn refresh_layout(&mut self) -> Result<Viewport, WorldError> {
        let viewport = layout(self.host.as_ref(), &self.container)?;
        if viewport == self.viewport {
            return Ok(viewport);
        }
        self.viewport = viewport;
        if let Some(camera) = &mut self.camera {
            camera.aspect = viewport.aspect();
        }
        if let Some(renderer) = &mut self.renderer {
            renderer.set_size(viewport);
        }
        tracing::debug!(width = viewport.width, height = viewport.height, "layout refreshed");
        Ok(viewport)
    }

    // ── Scene content ──────────────────────────────────────────────

    /// Insert an arbitrary subtree at the scene root.
    pub fn add_node(&mut self, node: Node) -> NodeId {
        self.scene.add(node)
    }

    /// Floor and ceiling for a room of the given size, in that order.
    ///
    /// Both surfaces are built before either is added, so an invalid size
    /// leaves the scene untouched.
    pub fn build_room(
        &mut self,
        width: f32,
        depth: f32,
        height: f32,
    ) -> Result<[NodeId; 2], WorldError> {
        let floor = room::floor(width, depth)?;
        let ceiling = room::ceiling(width, depth, height)?;
        let floor = self.scene.add(floor);
        let ceiling = self.scene.add(ceiling);
        tracing::info!(width, depth, height, "room built");
        Ok([floor, ceiling])
    }

    /// Floor surface at the origin.
    pub fn add_floor(&mut self, width: f32, depth: f32) -> Result<NodeId, WorldError> {
        Ok(self.scene.add(room::floor(width, depth)?))
    }

    /// Ceiling surface at `height` room units above the floor.
    pub fn add_ceiling(
        &mut self,
        width: f32,
        depth: f32,
        height: f32,
    ) -> Result<NodeId, WorldError> {
        Ok(self.scene.add(room::ceiling(width, depth, height)?))
    }

    /// Placement mode for subsequent `add_wall` calls.
    pub fn set_wall_placement(&mut self, placement: WallPlacement) {
        self.wall_placement = placement;
    }

    /// Placement mode `add_wall` currently uses.
    pub fn wall_placement(&self) -> WallPlacement {
        self.wall_placement
    }

    /// Single-sided wall, placed according to the current placement mode.
    pub fn add_wall(
        &mut self,
        width: f32,
        height: f32,
        position: Vec3,
        rotation: Vec3,
    ) -> Result<NodeId, WorldError> {
        let node = room::wall(width, height, position, rotation, self.wall_placement)?;
        Ok(self.scene.add(node))
    }

    /// Point light at the light's position.
    pub fn add_light(&mut self, light: &Light) -> NodeId {
        self.scene.add(light.node())
    }

    /// Take ownership of a shape and show it. Returns its index.
    pub fn add_shape(&mut self, shape: Shape) -> usize {
        let id = self.scene.add(shape.node());
        self.shapes.push((shape, id));
        self.shapes.len() - 1
    }

    /// Managed shapes in insertion order.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter().map(|(shape, _)| shape)
    }

    /// Shape at `index`, as returned by `add_shape`.
    pub fn shape(&self, index: usize) -> Option<&Shape> {
        self.shapes.get(index).map(|(shape, _)| shape)
    }

    /// Mutate a shape and carry its new transform into the scene.
    pub fn update_shape(
        &mut self,
        index: usize,
        f: impl FnOnce(&mut Shape),
    ) -> Result<(), WorldError> {
        let (shape, id) = self
            .shapes
            .get_mut(index)
            .ok_or(WorldError::ShapeNotFound(index))?;
        f(shape);
        self.scene.set_transform(*id, shape.transform);
        Ok(())
    }

    // ── Model loading ──────────────────────────────────────────────

    /// Start loading a model. Returns immediately.
    ///
    /// On success the model's subtree is added to the scene at the start of a
    /// later frame. Failures are logged and leave the scene untouched.
    pub fn load_model(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), "loading model");
        self.loads.push(self.loader.load(path));
    }

    /// Loads that have not resolved yet.
    pub fn pending_loads(&self) -> usize {
        self.loads.len()
    }

    /// Ask every pending load to stop. Their failures still arrive through
    /// `poll_loads`.
    pub fn cancel_loads(&self) {
        for task in &self.loads {
            task.cancel();
        }
    }

    /// Drain load events and report how many loads resolved, either way.
    pub fn poll_loads(&mut self) -> LoadReport {
        let mut report = LoadReport::default();
        for task in &mut self.loads {
            while let Some(event) = task.poll() {
                match event {
                    LoadEvent::Progress(progress) => {
                        if let Some(ratio) = progress.ratio() {
                            tracing::info!("{:.0}% loaded", ratio * 100.0);
                        }
                    }
                    LoadEvent::Loaded(node) => {
                        let nodes = node.subtree_len();
                        self.scene.add(node);
                        report.inserted += 1;
                        tracing::info!(
                            path = %task.path().display(),
                            nodes,
                            "model added to scene"
                        );
                    }
                    LoadEvent::Failed(err) => {
                        report.failed += 1;
                        tracing::error!(path = %task.path().display(), "model load failed: {err}");
                    }
                }
            }
        }
        self.loads.retain(|task| !task.is_finished());
        report
    }

    /// Poll until every pending load has resolved or `timeout` passes.
    ///
    /// Returns what resolved while waiting; loads still pending at the
    /// deadline keep running.
    pub fn wait_for_loads(&mut self, timeout: Duration) -> LoadReport {
        let deadline = Instant::now() + timeout;
        let mut report = LoadReport::default();
        loop {
            let polled = self.poll_loads();
            report.inserted += polled.inserted;
            report.failed += polled.failed;
            if self.loads.is_empty() || Instant::now() >= deadline {
                break;
            }
            thread::sleep(Duration::from_millis(1));
        }
        if !self.loads.is_empty() {
            tracing::warn!(pending = self.loads.len(), ?timeout, "model loads still pending");
        }
        report
    }

    // ── Rendering ──────────────────────────────────────────────────

    /// Draw the scene once through the active camera.
    pub fn render_frame(&mut self) -> Result<(), WorldError> {
        let camera = self.camera.as_ref().ok_or(WorldError::CameraNotConfigured)?;
        let renderer = self
            .renderer
            .as_mut()
            .ok_or(WorldError::RendererNotConfigured)?;
        renderer.render(&self.scene, camera)?;
        self.frames += 1;
        Ok(())
    }

    /// Mark the render loop as started. Fails if it already was or if the
    /// world cannot render yet.
    pub(crate) fn claim_loop(&mut self) -> Result<(), WorldError> {
        if self.camera.is_none() {
            return Err(WorldError::CameraNotConfigured);
        }
        if self.renderer.is_none() {
            return Err(WorldError::RendererNotConfigured);
        }
        if self.loop_started {
            return Err(WorldError::LoopAlreadyStarted);
        }
        self.loop_started = true;
        Ok(())
    }

    /// Run the render loop until `source` runs dry, the loop is stopped, or a
    /// frame fails. Returns the number of frames drawn.
    ///
    /// A world runs at most one loop over its lifetime.
    pub fn render<S: crate::FrameSource>(&mut self, source: &mut S) -> Result<u64, WorldError> {
        let mut render_loop = crate::RenderLoop::start(self)?;
        render_loop.run(self, source)
    }
}

/// Viewport for `container` under the host's current layout.
fn layout(host: &dyn Host, container: &str) -> Result<Viewport, WorldError> {
    let (container_width, _) = host
        .element_size(container)
        .ok_or_else(|| WorldError::ContainerNotFound(container.to_string()))?;
    let header_height = match host.element_size(HEADER_SELECTOR) {
        Some((_, height)) => height,
        None => {
            tracing::warn!(selector = HEADER_SELECTOR, "no header element; assuming zero height");
            0
        }
    };
    let (_, window_height) = host.window_size();
    let viewport = Viewport::from_layout(container_width, window_height, header_height);
    if viewport.is_empty() {
        return Err(WorldError::EmptyViewport {
            selector: container.to_string(),
            width: viewport.width,
            height: viewport.height,
        });
    }
    Ok(viewport)
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("container", &self.container)
            .field("viewport", &self.viewport)
            .field("nodes", &self.scene.node_count())
            .field("shapes", &self.shapes.len())
            .field("camera", &self.camera)
            .field("renderer", &self.renderer.is_some())
            .field("pending_loads", &self.loads.len())
            .field("frames", &self.frames)
            .finish()
    }
}

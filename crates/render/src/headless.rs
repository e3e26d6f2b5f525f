use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use glam::Vec3;

use crate::{
    CONTAINER_SELECTOR, DebugTextRenderer, HEADER_SELECTOR, Host, RenderError, Renderer, Viewport,
};

/// What one rendered frame saw.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRecord {
    pub revision: u64,
    pub node_count: usize,
    pub camera_position: Vec3,
    pub text: String,
}

/// Frame history shared between a host and the renderers it attached.
///
/// Single-threaded by construction, like the render loop that fills it.
#[derive(Debug, Clone, Default)]
pub struct FrameLog(Rc<RefCell<Vec<FrameRecord>>>);

impl FrameLog {
    pub fn push(&self, record: FrameRecord) {
        self.0.borrow_mut().push(record);
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn frames(&self) -> Vec<FrameRecord> {
        self.0.borrow().clone()
    }

    pub fn last(&self) -> Option<FrameRecord> {
        self.0.borrow().last().cloned()
    }
}

/// In-memory page with named elements and a fixed window size.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    elements: BTreeMap<String, (u32, u32)>,
    window: (u32, u32),
    surfaces: BTreeMap<String, usize>,
    log: FrameLog,
}

impl HeadlessHost {
    /// A window with no elements.
    pub fn new(window_width: u32, window_height: u32) -> Self {
        Self {
            window: (window_width, window_height),
            ..Self::default()
        }
    }

    /// The standard page: a full-width header strip above the content container.
    pub fn page(window_width: u32, window_height: u32, header_height: u32) -> Self {
        Self::new(window_width, window_height)
            .with_element(HEADER_SELECTOR, window_width, header_height)
            .with_element(
                CONTAINER_SELECTOR,
                window_width,
                window_height.saturating_sub(header_height),
            )
    }

    pub fn with_element(mut self, selector: &str, width: u32, height: u32) -> Self {
        self.elements.insert(selector.to_string(), (width, height));
        self
    }

    /// Frames rendered by every renderer this host created.
    pub fn frame_log(&self) -> FrameLog {
        self.log.clone()
    }
}

impl Host for HeadlessHost {
    fn element_size(&self, selector: &str) -> Option<(u32, u32)> {
        self.elements.get(selector).copied()
    }

    fn window_size(&self) -> (u32, u32) {
        self.window
    }

    fn attach_renderer(
        &mut self,
        selector: &str,
        viewport: Viewport,
    ) -> Result<Box<dyn Renderer>, RenderError> {
        if !self.elements.contains_key(selector) {
            return Err(RenderError::ContainerNotFound(selector.to_string()));
        }
        *self.surfaces.entry(selector.to_string()).or_default() += 1;
        tracing::debug!(
            selector,
            width = viewport.width,
            height = viewport.height,
            "debug surface attached"
        );
        Ok(Box::new(DebugTextRenderer::new(viewport, self.log.clone())))
    }

    fn attached_surfaces(&self, selector: &str) -> usize {
        self.surfaces.get(selector).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomscene_scene::{PerspectiveCamera, Scene};

    #[test]
    fn page_layout_elements() {
        let host = HeadlessHost::page(1024, 768, 60);
        assert_eq!(host.element_size(CONTAINER_SELECTOR), Some((1024, 708)));
        assert_eq!(host.element_size(HEADER_SELECTOR), Some((1024, 60)));
        assert_eq!(host.element_size(".missing"), None);
        assert_eq!(host.window_size(), (1024, 768));
    }

    #[test]
    fn attach_counts_surfaces_and_shares_log() {
        let mut host = HeadlessHost::page(1024, 768, 60);
        let vp = Viewport::new(1024, 658);
        let mut a = host.attach_renderer(CONTAINER_SELECTOR, vp).unwrap();
        let mut b = host.attach_renderer(CONTAINER_SELECTOR, vp).unwrap();
        assert_eq!(host.attached_surfaces(CONTAINER_SELECTOR), 2);

        let camera = PerspectiveCamera::new(60.0, 1.0, 0.1, 10.0);
        a.render(&Scene::new(), &camera).unwrap();
        b.render(&Scene::new(), &camera).unwrap();
        assert_eq!(host.frame_log().len(), 2);
    }

    #[test]
    fn attach_to_missing_container_fails() {
        let mut host = HeadlessHost::new(800, 600);
        let err = host
            .attach_renderer(CONTAINER_SELECTOR, Viewport::new(800, 550))
            .err()
            .unwrap();
        assert!(matches!(err, RenderError::ContainerNotFound(_)));
        assert_eq!(host.attached_surfaces(CONTAINER_SELECTOR), 0);
    }
}

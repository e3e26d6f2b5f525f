use std::collections::BTreeMap;
use std::sync::Arc;

use roomscene_render::{
    CONTAINER_SELECTOR, HEADER_SELECTOR, Host, RenderError, Renderer, Viewport,
};
use winit::window::Window;

use crate::WgpuRenderer;

/// A desktop window laid out like the page: a header strip of fixed height
/// across the top, the content container filling the rest.
///
/// A header height of zero means the window has no header element.
#[derive(Debug)]
pub struct WindowHost {
    window: Arc<Window>,
    header_height: u32,
    surfaces: BTreeMap<String, usize>,
}

impl WindowHost {
    pub fn new(window: Arc<Window>, header_height: u32) -> Self {
        Self {
            window,
            header_height,
            surfaces: BTreeMap::new(),
        }
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }
}

impl Host for WindowHost {
    fn element_size(&self, selector: &str) -> Option<(u32, u32)> {
        let size = self.window.inner_size();
        match selector {
            CONTAINER_SELECTOR => Some((
                size.width,
                size.height.saturating_sub(self.header_height),
            )),
            HEADER_SELECTOR if self.header_height > 0 => Some((size.width, self.header_height)),
            _ => None,
        }
    }

    fn window_size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    /// Most platforms allow one surface per window, so a second attach may
    /// fail with a surface error.
    fn attach_renderer(
        &mut self,
        selector: &str,
        viewport: Viewport,
    ) -> Result<Box<dyn Renderer>, RenderError> {
        if self.element_size(selector).is_none() {
            return Err(RenderError::ContainerNotFound(selector.to_string()));
        }
        let renderer = WgpuRenderer::new(Arc::clone(&self.window), viewport, self.header_height)?;
        *self.surfaces.entry(selector.to_string()).or_default() += 1;
        Ok(Box::new(renderer))
    }

    fn attached_surfaces(&self, selector: &str) -> usize {
        self.surfaces.get(selector).copied().unwrap_or(0)
    }
}

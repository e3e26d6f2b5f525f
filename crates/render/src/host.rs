use crate::{RenderError, Renderer};

/// Element the scene is drawn into.
pub const CONTAINER_SELECTOR: &str = ".content";

/// Page header sitting above the container.
pub const HEADER_SELECTOR: &str = ".header";

/// Pixels reserved below the container.
pub const LAYOUT_MARGIN: u32 = 50;

/// Drawing area in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Container width by `window height - header height - LAYOUT_MARGIN`.
    /// Saturates at zero rather than underflowing.
    pub fn from_layout(container_width: u32, window_height: u32, header_height: u32) -> Self {
        Self {
            width: container_width,
            height: window_height
                .saturating_sub(header_height)
                .saturating_sub(LAYOUT_MARGIN),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// The page a scene lives in.
///
/// Hosts are looked up by selector the way a page looks up elements. Every
/// `attach_renderer` call adds another output surface to the container;
/// hosts do not deduplicate them.
pub trait Host {
    /// Size of the element matching `selector`, if the page has one.
    fn element_size(&self, selector: &str) -> Option<(u32, u32)>;

    /// Inner size of the whole window.
    fn window_size(&self) -> (u32, u32);

    /// Create a renderer sized to `viewport` and attach its output to `selector`.
    fn attach_renderer(
        &mut self,
        selector: &str,
        viewport: Viewport,
    ) -> Result<Box<dyn Renderer>, RenderError>;

    /// Number of output surfaces attached to `selector` so far.
    fn attached_surfaces(&self, selector: &str) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_subtracts_header_and_margin() {
        let vp = Viewport::from_layout(1280, 800, 60);
        assert_eq!(vp, Viewport::new(1280, 690));
        assert!((vp.aspect() - 1280.0 / 690.0).abs() < 1e-6);
    }

    #[test]
    fn layout_saturates_on_tiny_windows() {
        let vp = Viewport::from_layout(640, 80, 60);
        assert_eq!(vp.height, 0);
        assert!(vp.is_empty());
    }
}

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use glam::Vec3;
use roomscene_common::Color;
use roomscene_kernel::{RenderLoop, SceneConfig, World, WorldError, compose};
use roomscene_render_wgpu::WindowHost;
use roomscene_scene::{Material, Shape};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "roomscene-desktop", about = "Room scene desktop viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene description (YAML); defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Model file to load, overriding the scene description
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Pixels reserved at the top of the window as the page header
    #[arg(long, default_value = "60")]
    header_height: u32,

    /// Add a spinning box to the middle of the room
    #[arg(long)]
    spin: bool,
}

/// Radians per frame for the spinning box.
const SPIN_RATE: f32 = 0.01;

struct ActiveScene {
    world: World,
    render_loop: RenderLoop,
    spinner: Option<usize>,
}

struct App {
    config: SceneConfig,
    header_height: u32,
    spin: bool,
    window: Option<Arc<Window>>,
    scene: Option<ActiveScene>,
}

impl App {
    fn new(config: SceneConfig, header_height: u32, spin: bool) -> Self {
        Self {
            config,
            header_height,
            spin,
            window: None,
            scene: None,
        }
    }

    fn build_scene(&self, window: &Arc<Window>) -> Result<ActiveScene, WorldError> {
        let host = WindowHost::new(Arc::clone(window), self.header_height);
        let mut world = compose(Box::new(host), &self.config)?;

        let spinner = if self.spin {
            let mut shape = Shape::new(40.0, 15.0, 20.0, Material::lambert(Color(0xfd59d7)))?;
            shape.translate(Vec3::new(0.0, 20.0, 0.0));
            Some(world.add_shape(shape))
        } else {
            None
        };

        let render_loop = RenderLoop::start(&mut world)?;
        Ok(ActiveScene {
            world,
            render_loop,
            spinner,
        })
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("Room Scene")
            .with_inner_size(PhysicalSize::new(1280u32, 800));
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                tracing::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        match self.build_scene(&window) {
            Ok(scene) => {
                self.scene = Some(scene);
                window.request_redraw();
            }
            Err(e) => {
                tracing::error!("failed to build scene: {e}");
                event_loop.exit();
            }
        }
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(scene) = &mut self.scene else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                scene.render_loop.handle().stop();
                scene.world.cancel_loads();
                event_loop.exit();
            }
            WindowEvent::Resized(_) => match scene.world.refresh_layout() {
                Ok(_) => {}
                // Minimised or shrunk below the header; keep the old layout.
                Err(WorldError::EmptyViewport { .. }) => {}
                Err(e) => tracing::warn!("layout refresh failed: {e}"),
            },
            WindowEvent::RedrawRequested => {
                if let Some(index) = scene.spinner {
                    let spun = scene.world.update_shape(index, |shape| {
                        shape.rotate(Vec3::new(SPIN_RATE, SPIN_RATE, 0.0));
                    });
                    if let Err(e) = spun {
                        tracing::warn!("spinner update failed: {e}");
                    }
                }

                match scene.render_loop.frame(&mut scene.world) {
                    Ok(true) => {
                        if let Some(window) = &self.window {
                            window.request_redraw();
                        }
                    }
                    Ok(false) => event_loop.exit(),
                    Err(e) => {
                        tracing::error!("render loop stopped: {e}");
                        event_loop.exit();
                    }
                }
            }
            _ => {}
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug,wgpu_core=warn,wgpu_hal=warn,naga=warn"
    } else {
        "info,wgpu_core=warn,wgpu_hal=warn,naga=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    let mut config = match &cli.config {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("reading scene description {}", path.display()))?,
        None => SceneConfig::default(),
    };
    if cli.model.is_some() {
        config.model = cli.model;
    }

    tracing::info!("roomscene-desktop starting");

    // Redraws are requested frame by frame, so the loop can sleep between them.
    let event_loop = EventLoop::new().context("creating event loop")?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config, cli.header_height, cli.spin);
    event_loop.run_app(&mut app).context("running event loop")?;

    tracing::info!("roomscene desktop exited");
    Ok(())
}

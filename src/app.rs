use std::sync::Arc;

use pollster::FutureExt;
use tracing::{error, warn};
use wgpu::{CommandEncoderDescriptor, SurfaceError, TextureViewDescriptor};
use winit::{event_loop::ActiveEventLoop, window::Window};

use crate::error::RenderError;
use crate::game::SimulationWorld;
use crate::game_loop::GameLoop;
use crate::render::{world_view_proj, FireworkRenderer, InstanceBatch, WgpuRenderer};

/// Window, GPU state and the simulation it draws.
pub struct App {
    pub window: Arc<Window>,
    pub renderer: WgpuRenderer,
    pub firework_renderer: FireworkRenderer,
    pub world: SimulationWorld,
    pub game_loop: GameLoop,
    batch: InstanceBatch,
}

impl App {
    pub fn new(event_loop: &ActiveEventLoop, world: SimulationWorld) -> Result<Self, RenderError> {
        let config = world.config();
        let window_attributes = Window::default_attributes()
            .with_title("Fireworks")
            .with_inner_size(winit::dpi::LogicalSize::new(config.window_width, config.window_height));

        let window = Arc::new(event_loop.create_window(window_attributes)?);

        let renderer = WgpuRenderer::new(window.clone()).block_on()?;
        let firework_renderer = FireworkRenderer::new(
            renderer.device.clone(),
            renderer.queue.clone(),
            renderer.surface_format(),
            config.arc_vertices,
            config.max_instances(),
        );
        firework_renderer.set_view_proj(world_view_proj(
            config.world_width,
            config.world_height,
            1.0 + config.jitter,
        ));

        let game_loop = GameLoop::new(config.fixed_timestep);
        let batch = InstanceBatch::with_capacity(config.max_instances());

        Ok(Self {
            window,
            renderer,
            firework_renderer,
            world,
            game_loop,
            batch,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.renderer.resize(new_size);
    }

    /// Advance the simulation by the elapsed wall-clock time, then draw it.
    pub fn frame(&mut self) {
        let world = &mut self.world;
        self.game_loop.tick(|dt| world.update(dt));

        self.batch.clear();
        self.world.render(&mut self.batch);
        self.draw();
    }

    fn draw(&mut self) {
        let frame = match self.renderer.begin_frame() {
            Ok(frame) => frame,
            Err(SurfaceError::Lost | SurfaceError::Outdated) => {
                warn!("Surface lost, reconfiguring");
                self.renderer.reconfigure();
                return;
            }
            Err(SurfaceError::Timeout) => {
                warn!("Surface timed out, skipping frame");
                return;
            }
            Err(e) => {
                error!("Failed to acquire frame: {e}");
                return;
            }
        };

        let view = frame.texture.create_view(&TextureViewDescriptor::default());
        let mut encoder = self
            .renderer
            .device
            .create_command_encoder(&CommandEncoderDescriptor { label: Some("Frame Encoder") });

        self.firework_renderer.render(&mut encoder, &view, &self.batch);

        self.renderer.queue.submit(std::iter::once(encoder.finish()));
        self.renderer.end_frame(frame);
    }
}

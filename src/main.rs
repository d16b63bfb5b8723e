use std::path::PathBuf;

use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{Key, NamedKey},
    window::WindowId,
};

use fireworks::app::App;
use fireworks::config::{SimConfig, CONFIG_FILE};
use fireworks::game::SimulationWorld;

struct FireworksApp {
    world: Option<SimulationWorld>,
    app: Option<App>,
}

impl ApplicationHandler for FireworksApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.app.is_some() {
            return;
        }
        let Some(world) = self.world.take() else {
            return;
        };

        match App::new(event_loop, world) {
            Ok(mut app) => {
                app.game_loop.restart();
                app.window.request_redraw();
                self.app = Some(app);
            }
            Err(e) => {
                error!("Failed to start renderer: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(app) = self.app.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                info!("Shutting down...");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. }
                if event.state.is_pressed() && event.logical_key == Key::Named(NamedKey::Escape) =>
            {
                info!("Shutting down...");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => app.resize(size),
            WindowEvent::RedrawRequested => {
                app.frame();
                app.window.request_redraw();
            }
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("fireworks=info".parse()?))
        .init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
    let config = SimConfig::load_from(&config_path)?;

    let count = config.firework_count as usize;
    let mut world = SimulationWorld::new(config)?;
    world.initialize(count);

    let event_loop = EventLoop::new()?;
    let mut handler = FireworksApp {
        world: Some(world),
        app: None,
    };
    event_loop.run_app(&mut handler)?;
    Ok(())
}

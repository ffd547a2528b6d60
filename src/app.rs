use crate::app_state::State;
use crate::settings::Settings;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

struct App {
    settings: Settings,
    state: Option<State>,
}

impl App {
    fn initial_window_size(&self) -> PhysicalSize<u32> {
        let [width, height] = self.settings.min_canvas_size;
        let inset_x = 2.0 * (self.settings.canvas_origin[0] + self.settings.border);
        let inset_y = 2.0 * (self.settings.canvas_origin[1] + self.settings.border);
        PhysicalSize::new(width + inset_x as u32, height + inset_y as u32)
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes()
            .with_title("wpaint")
            .with_inner_size(self.initial_window_size());
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                log::error!("failed to create window: {err}");
                event_loop.exit();
                return;
            }
        };

        match pollster::block_on(State::new(window, self.settings.clone())) {
            Ok(state) => self.state = Some(state),
            Err(err) => {
                log::error!("failed to initialise renderer: {err:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(state) = &mut self.state else {
            return;
        };
        if window_id != state.window().id() || state.input(&event) {
            return;
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(physical_size) => {
                log::info!("WindowEvent::Resized: {}x{}", physical_size.width, physical_size.height);
                state.resize(physical_size);
            }
            WindowEvent::RedrawRequested => {
                state.update();
                match state.render() {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => state.resize(state.size),
                    Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
                    Err(e) => log::warn!("{e:?}"),
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window().request_redraw();
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    let settings_path = Settings::default_path();
    let settings = Settings::load(&settings_path)?;

    let level = if settings.debug_logging { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    log::info!("using settings from {}", settings_path.display());

    let event_loop = EventLoop::new()?;
    let mut app = App {
        settings,
        state: None,
    };

    event_loop.run_app(&mut app)?;
    Ok(())
}

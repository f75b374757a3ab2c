use std::path::PathBuf;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::WindowId;

use anyhow::{anyhow, Context};
use log::{debug, error, info};

use crate::engine::graphics::renderer::Renderer;
use crate::engine::input::InputHandler;
use crate::engine::window::WindowManager;
use crate::game::state::GameState;

const DEFAULT_SHADER_PATH: &str = "res/shaders/basic.shader";

pub struct App {
    window: WindowManager,
    instance: Option<wgpu::Instance>,
    renderer: Option<Renderer>,
    input_handler: InputHandler,
    state: GameState,
    shader_path: PathBuf,
}

impl Default for App {
    fn default() -> Self {
        Self::with_shader_path(DEFAULT_SHADER_PATH)
    }
}

impl App {
    /// The loader is parameterized by resource path; the default points at
    /// the bundled quad shader.
    pub fn with_shader_path(shader_path: impl Into<PathBuf>) -> Self {
        Self {
            window: WindowManager::new(),
            instance: None,
            renderer: None,
            input_handler: InputHandler::new(),
            state: GameState::new(),
            shader_path: shader_path.into(),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let Err(e) = self.window.create_window(event_loop) {
            error!("Failed to create window: {e}");
            std::process::exit(1);
        }
        // Window or GPU binding failure is fatal; a shader failure aborts
        // here too rather than continuing with an unusable program.
        if let Err(e) = pollster::block_on(self.init_wgpu()) {
            error!("Failed to initialize graphics: {e:#}");
            std::process::exit(1);
        }
        self.window.request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                self.state.update_frame_count();
                if let Some(fps) = self.state.update_fps_display() {
                    debug!("fps: {fps}");
                }
                if let (Some(renderer), Some(window)) =
                    (&self.renderer, self.window.get_window())
                {
                    if let Some(instance) = &self.instance {
                        match instance.create_surface(window) {
                            Ok(surface) => {
                                surface.configure(&renderer.device, &renderer.config);
                                if let Err(e) = renderer.render(&surface) {
                                    error!("Render error: {e:?}");
                                }
                            }
                            Err(e) => error!("Failed to create surface: {e:?}"),
                        }
                    }
                }
                self.window.request_redraw();
            }
            WindowEvent::Resized(physical_size) => {
                self.resize(physical_size);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let winit::keyboard::PhysicalKey::Code(keycode) = event.physical_key {
                    let pressed = event.state == winit::event::ElementState::Pressed;
                    let fresh = self.input_handler.handle_keyboard_input_event(keycode, pressed);
                    if fresh && keycode == winit::keyboard::KeyCode::Space {
                        info!("Space pressed");
                    }
                }
            }
            _ => (),
        }
    }
}

impl App {
    async fn init_wgpu(&mut self) -> anyhow::Result<()> {
        let window = self
            .window
            .get_window()
            .ok_or_else(|| anyhow!("no window to bind graphics to"))?;
        let size = self
            .window
            .get_size()
            .ok_or_else(|| anyhow!("window has no size"))?;

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create surface")?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow!("no suitable graphics adapter found"))?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                },
                None,
            )
            .await
            .context("failed to request device")?;

        let renderer = Renderer::new(device, queue, &surface, &adapter, size, &self.shader_path)
            .context("failed to build shader program")?;
        surface.configure(&renderer.device, &renderer.config);

        self.instance = Some(instance);
        self.renderer = Some(renderer);
        Ok(())
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.window.set_window_size(new_size);
            if let (Some(renderer), Some(window)) =
                (&mut self.renderer, self.window.get_window())
            {
                if let Some(instance) = &self.instance {
                    match instance.create_surface(window) {
                        Ok(surface) => renderer.resize(new_size, &surface),
                        Err(e) => error!("Failed to create surface for resize: {e:?}"),
                    }
                }
            }
        }
    }
}

//! Window management implementation.

use winit::dpi::LogicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::Window;

use log::error;

pub const WINDOW_WIDTH: u32 = 640;
pub const WINDOW_HEIGHT: u32 = 480;
pub const WINDOW_TITLE: &str = "Snake";

pub struct WindowManager {
    pub window: Option<Window>,
    pub size: Option<winit::dpi::PhysicalSize<u32>>,
}

impl WindowManager {
    pub fn new() -> Self {
        Self {
            window: None,
            size: None,
        }
    }

    pub fn create_window(
        &mut self,
        event_loop: &ActiveEventLoop,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let attributes = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));
        let window = event_loop.create_window(attributes).map_err(|e| {
            error!("Failed to create window: {:?}", e);
            e
        })?;

        let size = window.inner_size();
        self.size = Some(size);
        self.window = Some(window);
        Ok(())
    }

    pub fn set_window_size(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        self.size = Some(size);
    }

    pub fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    pub fn get_window(&self) -> Option<&Window> {
        self.window.as_ref()
    }

    pub fn get_size(&self) -> Option<winit::dpi::PhysicalSize<u32>> {
        self.size
    }
}

impl Default for WindowManager {
    fn default() -> Self {
        Self::new()
    }
}

//! Windowed viewer.
//!
//! Drives a [`Field`] from a winit event loop: every redraw runs one frame
//! (clear, draw, update) into a CPU [`Canvas`] and presents it through
//! [`GpuState`]. Window input is translated by
//! [`InputAction::from_window_event`].

use std::sync::Arc;

use glam::Vec2;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::error::ViewerError;
use crate::field::Field;
use crate::gpu::GpuState;
use crate::input::{Command, InputAction};
use crate::surface::{Canvas, Surface};
use crate::time::FrameClock;

const TITLE: &str = "pixeldust";

/// A window showing one particle field.
pub struct Viewer {
    field: Field,
}

impl Viewer {
    pub fn new(field: Field) -> Self {
        Self { field }
    }

    /// Open the window and run until it is closed.
    pub fn run(self) -> Result<(), ViewerError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self.field);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

struct App {
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    field: Field,
    canvas: Canvas,
    clock: FrameClock,
    error: Option<ViewerError>,
}

impl App {
    fn new(mut field: Field) -> Self {
        let (width, height) = field.dimensions();
        let mut canvas = Canvas::new(width, height);
        if !field.is_populated() {
            field.init(&mut canvas);
        }

        Self {
            window: None,
            gpu_state: None,
            field,
            canvas,
            clock: FrameClock::new(),
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: ViewerError) {
        log::error!("{err}");
        self.error = Some(err);
        event_loop.exit();
    }

    /// Map a position in window pixels onto field pixels.
    fn to_field(&self, position: Vec2) -> Vec2 {
        let Some(window) = &self.window else {
            return position;
        };
        let size = window.inner_size();
        if size.width == 0 || size.height == 0 {
            return position;
        }
        let (width, height) = self.field.dimensions();
        position * Vec2::new(
            width as f32 / size.width as f32,
            height as f32 / size.height as f32,
        )
    }

    fn handle_input(&mut self, event_loop: &ActiveEventLoop, action: InputAction) {
        match action {
            InputAction::Pointer(position) => {
                let p = self.to_field(position);
                self.field.set_pointer(p.x, p.y);
            }
            InputAction::Command(Command::Exit) => event_loop.exit(),
            InputAction::Command(command) => self.field.apply(command, &mut self.canvas),
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.field.frame(&mut self.canvas);

        if let Some(gpu_state) = &mut self.gpu_state {
            match gpu_state.render(self.canvas.as_raw(), self.canvas.dimensions()) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                    log::warn!("render surface lost, reconfiguring");
                    gpu_state.resize(winit::dpi::PhysicalSize {
                        width: gpu_state.config.width,
                        height: gpu_state.config.height,
                    })
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("GPU out of memory");
                    event_loop.exit();
                }
                Err(e) => log::warn!("render error: {e:?}"),
            }
        }

        if self.clock.tick() {
            if let Some(window) = &self.window {
                window.set_title(&format!(
                    "{} - {} particles - {:.0} fps",
                    TITLE,
                    self.field.len(),
                    self.clock.fps()
                ));
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let (width, height) = self.field.dimensions();
        let window_attrs = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(winit::dpi::PhysicalSize::new(width, height));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(err) => return self.fail(event_loop, err.into()),
        };
        self.window = Some(window.clone());

        match pollster::block_on(GpuState::new(window, self.canvas.dimensions())) {
            Ok(gpu_state) => {
                log::info!(
                    "viewer ready: {}x{} field, {} particles, {} images",
                    width,
                    height,
                    self.field.len(),
                    self.field.image_count()
                );
                self.gpu_state = Some(gpu_state);
            }
            Err(err) => self.fail(event_loop, err.into()),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            event => {
                if let Some(action) = InputAction::from_window_event(&event) {
                    self.handle_input(event_loop, action);
                }
            }
        }
    }
}

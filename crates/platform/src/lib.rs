//! Platform layer: windowing, event loop and the demo harness.
//!
//! Each demo implements [`Demo`]; [`run`] owns the winit plumbing so the
//! binaries stay focused on scene logic. `Escape` closes the window in every
//! demo and is handled here.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use glam::Mat4;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowAttributes, WindowId},
};

use renderer::{DrawItem, GpuState};

// Re-exported so demos don't need winit as a direct dependency.
pub use winit::keyboard::KeyCode;

#[derive(Clone, Debug)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl WindowConfig {
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            width: width.max(1),
            height: height.max(1),
        }
    }
}

/// Input already reduced to what the demos consume.
#[derive(Clone, Copy, Debug)]
pub enum InputEvent {
    /// Left mouse button; (x, y) is the cursor position in physical pixels.
    MouseButton { pressed: bool, x: f32, y: f32 },
    CursorMoved { x: f32, y: f32 },
    /// Vertical scroll in lines; pixel deltas are converted.
    Scroll { delta: f32 },
    Key { code: KeyCode, pressed: bool },
    Resized { width: u32, height: u32 },
}

/// One teaching demo: load assets, react to input, hand back a scene.
pub trait Demo {
    /// Upload assets once the GPU is up. An error aborts the run.
    fn init(&mut self, gpu: &mut GpuState) -> Result<()>;

    fn input(&mut self, event: &InputEvent);

    fn update(&mut self, _dt: f32) {}

    /// Per-frame scene: view-projection matrix plus draw list.
    fn draw(&mut self) -> (Mat4, Vec<DrawItem>);
}

/// Create a window and drive `demo` until it is closed.
pub fn run<D: Demo>(config: WindowConfig, demo: D) -> Result<()> {
    let event_loop =
        EventLoop::new().map_err(|e| anyhow::anyhow!("Failed to create event loop: {e}"))?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App {
        config,
        demo,
        window: None,
        gpu: None,
        cursor: (0.0, 0.0),
        last_frame: Instant::now(),
    };
    event_loop
        .run_app(&mut app)
        .map_err(|e| anyhow::anyhow!("Event loop error: {e:?}"))?;
    Ok(())
}

struct App<D: Demo> {
    config: WindowConfig,
    demo: D,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    cursor: (f32, f32),
    last_frame: Instant,
}

impl<D: Demo> App<D> {
    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        let now = Instant::now();
        // Clamp, e.g. after the window was minimized for a while.
        let dt = (now - self.last_frame).min(Duration::from_secs(1));
        self.last_frame = now;

        self.demo.update(dt.as_secs_f32());
        let (view_proj, items) = self.demo.draw();

        match gpu.render(view_proj, &items) {
            Ok(()) => {}
            Err(ref e) if GpuState::is_surface_lost(e) => {
                log::warn!("Surface lost, recreating");
                gpu.recreate_surface();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of GPU memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("Dropped frame: {e:?}"),
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl<D: Demo> ApplicationHandler for App<D> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let attributes = WindowAttributes::default()
            .with_title(&self.config.title)
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .expect("Failed to create window"),
        );
        log::info!(
            "Window created: {}x{}",
            window.inner_size().width,
            window.inner_size().height
        );

        let mut gpu = pollster::block_on(GpuState::new(window.clone()));
        if let Err(e) = self.demo.init(&mut gpu) {
            log::error!("Demo init failed: {e:#}");
            event_loop.exit();
            return;
        }

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.last_frame = Instant::now();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested. Exiting event loop.");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if new_size.width == 0 || new_size.height == 0 {
                    return;
                }
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.resize(new_size.width, new_size.height);
                }
                self.demo.input(&InputEvent::Resized {
                    width: new_size.width,
                    height: new_size.height,
                });
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x as f32, position.y as f32);
                self.demo.input(&InputEvent::CursorMoved {
                    x: self.cursor.0,
                    y: self.cursor.1,
                });
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.demo.input(&InputEvent::MouseButton {
                    pressed: state == ElementState::Pressed,
                    x: self.cursor.0,
                    y: self.cursor.1,
                });
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.demo.input(&InputEvent::Scroll {
                    delta: scroll_lines(delta),
                });
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    if code == KeyCode::Escape && event.state == ElementState::Pressed {
                        event_loop.exit();
                        return;
                    }
                    self.demo.input(&InputEvent::Key {
                        code,
                        pressed: event.state == ElementState::Pressed,
                    });
                }
            }
            _ => {}
        }
    }
}

/// Normalize wheel input: trackpads report pixel deltas, mice report lines.
fn scroll_lines(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 20.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_lines_normalizes_pixels() {
        let lines = scroll_lines(MouseScrollDelta::LineDelta(0.0, 2.0));
        assert_eq!(lines, 2.0);
        let pixels = scroll_lines(MouseScrollDelta::PixelDelta((0.0, 40.0).into()));
        assert_eq!(pixels, 2.0);
    }

    #[test]
    fn window_config_floors_zero_sizes() {
        let cfg = WindowConfig::new("t", 0, 0);
        assert_eq!((cfg.width, cfg.height), (1, 1));
    }
}

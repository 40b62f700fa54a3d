//! Demo 1: texture-mapped cube.
//!     Mouse: left drag - arcball rotation
//!     Keyboard: R - reset arcball, Esc - quit
//!
//! Usage: texture_cube [--size=WxH] [texture-image-path]

use anyhow::Result;
use asset::{MeshData, TextureData};
use corelib::{Arcball, Camera, Mat4, Vec3, vec3};
use platform::{Demo, InputEvent, KeyCode, WindowConfig};
use renderer::{DrawItem, GpuState, MeshId, TextureId};

const ARCBALL_SPEED: f32 = 0.3;
const DEFAULT_TEXTURE: &str = "assets/container.png";

struct TextureCube {
    texture_path: String,
    arcball: Arcball,
    camera: Camera,
    cube: Option<MeshId>,
    texture: Option<TextureId>,
}

impl TextureCube {
    fn new(texture_path: String, width: u32, height: u32) -> Self {
        Self {
            texture_path,
            arcball: Arcball::new(width, height, ARCBALL_SPEED),
            camera: Camera::new_perspective(
                vec3(0.0, 0.0, 4.0),
                Vec3::ZERO,
                Vec3::Y,
                45f32.to_radians(),
                0.1,
                100.0,
                width as f32 / height as f32,
            ),
            cube: None,
            texture: None,
        }
    }
}

impl Demo for TextureCube {
    fn init(&mut self, gpu: &mut GpuState) -> Result<()> {
        gpu.set_clear_color(0.2, 0.3, 0.3);
        self.cube = Some(gpu.upload_mesh(&MeshData::cube()));

        let tex = match TextureData::load_image(&self.texture_path) {
            Ok(tex) => tex,
            Err(e) => {
                log::warn!("{e:#}; falling back to checkerboard");
                TextureData::checkerboard(256)
            }
        };
        self.texture = Some(gpu.upload_texture(&tex));
        Ok(())
    }

    fn input(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::MouseButton { pressed: true, x, y } => self.arcball.begin_drag(x, y),
            InputEvent::MouseButton { pressed: false, .. } => self.arcball.end_drag(),
            InputEvent::CursorMoved { x, y } => {
                self.arcball.drag_to(x, y);
            }
            InputEvent::Key {
                code: KeyCode::KeyR,
                pressed: true,
            } => self.arcball.reset(),
            InputEvent::Resized { width, height } => {
                self.arcball.set_viewport(width, height);
                self.camera.aspect = width as f32 / height as f32;
            }
            _ => {}
        }
    }

    fn draw(&mut self) -> (Mat4, Vec<DrawItem>) {
        let items = match (self.cube, self.texture) {
            (Some(mesh), Some(texture)) => vec![DrawItem {
                mesh,
                texture,
                model: self.arcball.matrix(),
            }],
            _ => Vec::new(),
        };
        (self.camera.proj_view(), items)
    }
}

fn parse_size_args(default_w: u32, default_h: u32) -> (u32, u32) {
    let mut size = (default_w, default_h);
    for arg in std::env::args() {
        if let Some(v) = arg.strip_prefix("--size=") {
            if let Some((sw, sh)) = v.split_once('x').or_else(|| v.split_once('X')) {
                if let (Ok(w), Ok(h)) = (sw.parse::<u32>(), sh.parse::<u32>()) {
                    size = (w.max(1), h.max(1));
                }
            }
        }
    }
    size
}

fn parse_path_arg(default: &str) -> String {
    std::env::args()
        .skip(1)
        .find(|a| !a.starts_with("--"))
        .unwrap_or_else(|| default.to_string())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (width, height) = parse_size_args(600, 600);
    let texture_path = parse_path_arg(DEFAULT_TEXTURE);
    log::info!("Starting texture_cube. texture={texture_path}, window_size={width}x{height}");

    platform::run(
        WindowConfig::new("Texture 1", width, height),
        TextureCube::new(texture_path, width, height),
    )
}

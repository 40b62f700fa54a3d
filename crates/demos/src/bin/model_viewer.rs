//! Demo 2: loading and viewing external model files (OBJ or glTF).
//!     Mouse: left drag - arcball rotation, wheel - zoom
//!     Keyboard: R - reset camera and object position
//!               A - toggle camera/object rotation for the arcball
//!               arrow keys - pan the object
//!               Esc - quit
//!
//! Usage: model_viewer [--size=WxH] [model-path]

use std::path::Path;

use anyhow::Result;
use asset::{MeshData, TextureData, load_gltf, obj::load_obj_from_path};
use corelib::{Arcball, Camera, Mat4, Vec3, vec3};
use platform::{Demo, InputEvent, KeyCode, WindowConfig};
use renderer::{DrawItem, GpuState, MeshId, TextureId};

const ARCBALL_SPEED: f32 = 0.2;
const PAN_STEP: f32 = 0.1;
const ZOOM_STEP: f32 = 0.5;
const CAMERA_ORIG_POS: Vec3 = vec3(0.0, 0.0, 9.0);
const DEFAULT_MODEL: &str = "assets/gyroscope.gltf";

struct ModelViewer {
    model_path: String,
    cam_arcball: Arcball,
    model_arcball: Arcball,
    /// True: the mouse drives the camera arcball; false: the model one.
    arcball_cam_rot: bool,
    camera: Camera,
    pan: Vec3,
    parts: Vec<(MeshId, Mat4)>,
    texture: Option<TextureId>,
}

impl ModelViewer {
    fn new(model_path: String, width: u32, height: u32) -> Self {
        Self {
            model_path,
            cam_arcball: Arcball::new(width, height, ARCBALL_SPEED),
            model_arcball: Arcball::new(width, height, ARCBALL_SPEED),
            arcball_cam_rot: true,
            camera: Camera::new_perspective(
                CAMERA_ORIG_POS,
                Vec3::ZERO,
                Vec3::Y,
                45f32.to_radians(),
                0.1,
                10000.0,
                width as f32 / height as f32,
            ),
            pan: Vec3::ZERO,
            parts: Vec::new(),
            texture: None,
        }
    }

    fn active_arcball(&mut self) -> &mut Arcball {
        if self.arcball_cam_rot {
            &mut self.cam_arcball
        } else {
            &mut self.model_arcball
        }
    }

    fn load_model(&mut self, gpu: &mut GpuState) -> Result<()> {
        let path = Path::new(&self.model_path);
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("obj") => {
                let mesh = load_obj_from_path(path)?;
                self.parts = vec![(gpu.upload_mesh(&mesh), Mat4::IDENTITY)];
            }
            Some("gltf") | Some("glb") => {
                let model = load_gltf(path)?;
                self.parts = model
                    .parts
                    .iter()
                    .map(|p| (gpu.upload_mesh(&p.mesh), p.transform))
                    .collect();
                if let Some(tex) = &model.base_color {
                    self.texture = Some(gpu.upload_texture(tex));
                }
            }
            _ => anyhow::bail!("Unsupported model extension: {}", path.display()),
        }
        Ok(())
    }
}

impl Demo for ModelViewer {
    fn init(&mut self, gpu: &mut GpuState) -> Result<()> {
        gpu.set_clear_color(0.1, 0.1, 0.1);

        if let Err(e) = self.load_model(gpu) {
            log::warn!("Model load failed ({e:#}); showing the built-in cube");
            self.parts = vec![(gpu.upload_mesh(&MeshData::cube()), Mat4::IDENTITY)];
        }
        if self.texture.is_none() {
            // Untextured models still need something bound.
            self.texture = Some(gpu.upload_texture(&TextureData::checkerboard(64)));
        }
        Ok(())
    }

    fn input(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::MouseButton { pressed: true, x, y } => {
                self.active_arcball().begin_drag(x, y)
            }
            InputEvent::MouseButton { pressed: false, .. } => self.active_arcball().end_drag(),
            InputEvent::CursorMoved { x, y } => {
                self.active_arcball().drag_to(x, y);
            }
            InputEvent::Scroll { delta } => self.camera.dolly(delta * ZOOM_STEP),
            InputEvent::Key { code, pressed: true } => match code {
                KeyCode::KeyR => {
                    self.cam_arcball.reset();
                    self.model_arcball.reset();
                    self.camera.eye = CAMERA_ORIG_POS;
                    self.pan = Vec3::ZERO;
                }
                KeyCode::KeyA => {
                    self.arcball_cam_rot = !self.arcball_cam_rot;
                    if self.arcball_cam_rot {
                        log::info!("ARCBALL: Camera rotation mode");
                    } else {
                        log::info!("ARCBALL: Model rotation mode");
                    }
                }
                KeyCode::ArrowLeft => self.pan.x -= PAN_STEP,
                KeyCode::ArrowRight => self.pan.x += PAN_STEP,
                KeyCode::ArrowDown => self.pan.y -= PAN_STEP,
                KeyCode::ArrowUp => self.pan.y += PAN_STEP,
                _ => {}
            },
            InputEvent::Resized { width, height } => {
                self.cam_arcball.set_viewport(width, height);
                self.model_arcball.set_viewport(width, height);
                self.camera.aspect = width as f32 / height as f32;
            }
            _ => {}
        }
    }

    fn draw(&mut self) -> (Mat4, Vec<DrawItem>) {
        // Camera arcball rotates the view, model arcball and pan move the
        // object.
        let view = self.camera.view() * self.cam_arcball.matrix();
        let view_proj = self.camera.proj() * view;
        let object = Mat4::from_translation(self.pan) * self.model_arcball.matrix();

        let Some(texture) = self.texture else {
            return (view_proj, Vec::new());
        };
        let items = self
            .parts
            .iter()
            .map(|&(mesh, part_transform)| DrawItem {
                mesh,
                texture,
                model: object * part_transform,
            })
            .collect();
        (view_proj, items)
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

    let (width, height) = parse_size_args(800, 600);
    let model_path = parse_path_arg(DEFAULT_MODEL);
    log::info!("Starting model_viewer. model={model_path}, window_size={width}x{height}");

    platform::run(
        WindowConfig::new("Model Loading", width, height),
        ModelViewer::new(model_path, width, height),
    )
}

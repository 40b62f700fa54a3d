//! Demo 3: keyframe animation playback.
//!     Keyboard: Space - pause/resume, R - restart, Esc - quit
//!
//! Usage: anim_player [--size=WxH] [gltf-path]

use anyhow::Result;
use asset::{MeshData, TextureData, load_gltf};
use corelib::{Camera, Clip, Keyframe, Mat4, Transform, Vec3, vec3};
use platform::{Demo, InputEvent, KeyCode, WindowConfig};
use renderer::{DrawItem, GpuState, MeshId, TextureId};

const DEFAULT_MODEL: &str = "assets/vampire.gltf";

struct AnimPlayer {
    model_path: String,
    camera: Camera,
    clip: Clip,
    time: f32,
    paused: bool,
    parts: Vec<(MeshId, Mat4)>,
    texture: Option<TextureId>,
}

impl AnimPlayer {
    fn new(model_path: String, width: u32, height: u32) -> Self {
        Self {
            model_path,
            camera: Camera::new_perspective(
                vec3(13.0, 8.0, 7.0),
                Vec3::ZERO,
                Vec3::Y,
                45f32.to_radians(),
                0.1,
                100.0,
                width as f32 / height as f32,
            ),
            clip: fallback_clip(),
            time: 0.0,
            paused: false,
            parts: Vec::new(),
            texture: None,
        }
    }

    fn load_model(&mut self, gpu: &mut GpuState) -> Result<()> {
        let model = load_gltf(&self.model_path)?;
        self.parts = model
            .parts
            .iter()
            .map(|p| (gpu.upload_mesh(&p.mesh), p.transform))
            .collect();
        if let Some(tex) = &model.base_color {
            self.texture = Some(gpu.upload_texture(tex));
        }
        match model.clips.into_iter().next() {
            Some(clip) => {
                log::info!(
                    "Playing clip: {} keys, {:.2} ticks at {} tps",
                    clip.keys().len(),
                    clip.duration(),
                    clip.ticks_per_second()
                );
                self.clip = clip;
            }
            None => log::warn!("No animation in {}; using the built-in clip", self.model_path),
        }
        Ok(())
    }
}

impl Demo for AnimPlayer {
    fn init(&mut self, gpu: &mut GpuState) -> Result<()> {
        gpu.set_clear_color(0.1, 0.1, 0.1);

        if let Err(e) = self.load_model(gpu) {
            log::warn!("Model load failed ({e:#}); animating the built-in cube");
            self.parts = vec![(gpu.upload_mesh(&MeshData::cube()), Mat4::IDENTITY)];
        }
        if self.texture.is_none() {
            self.texture = Some(gpu.upload_texture(&TextureData::checkerboard(64)));
        }
        Ok(())
    }

    fn input(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::Key { code, pressed: true } => match code {
                KeyCode::Space => {
                    self.paused = !self.paused;
                    log::info!("Playback {}", if self.paused { "paused" } else { "resumed" });
                }
                KeyCode::KeyR => self.time = 0.0,
                _ => {}
            },
            InputEvent::Resized { width, height } => {
                self.camera.aspect = width as f32 / height as f32;
            }
            _ => {}
        }
    }

    fn update(&mut self, dt: f32) {
        if !self.paused {
            self.time += dt;
        }
    }

    fn draw(&mut self) -> (Mat4, Vec<DrawItem>) {
        let animated = self.clip.sample_seconds(self.time).matrix();

        let Some(texture) = self.texture else {
            return (self.camera.proj_view(), Vec::new());
        };
        let items = self
            .parts
            .iter()
            .map(|&(mesh, part_transform)| DrawItem {
                mesh,
                texture,
                model: animated * part_transform,
            })
            .collect();
        (self.camera.proj_view(), items)
    }
}

/// A small orbit-and-tumble clip so the player works without any asset files.
fn fallback_clip() -> Clip {
    let keys = [
        (0.0, vec3(0.0, 0.0, 0.0), 0.0),
        (1.0, vec3(2.0, 1.0, 0.0), 90.0),
        (2.0, vec3(0.0, 2.0, -2.0), 180.0),
        (3.0, vec3(-2.0, 1.0, 0.0), 270.0),
        (4.0, vec3(0.0, 0.0, 0.0), 360.0),
    ]
    .into_iter()
    .map(|(time, pos, yaw_deg)| Keyframe {
        time,
        transform: Transform::from_trs(
            pos,
            corelib::Quat::from_rotation_y(f32::to_radians(yaw_deg)),
            Vec3::ONE,
        ),
    })
    .collect();
    Clip::new(keys, 4.0, 1.0).expect("built-in clip is valid")
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
    log::info!("Starting anim_player. model={model_path}, window_size={width}x{height}");

    platform::run(
        WindowConfig::new("Animation Loading", width, height),
        AnimPlayer::new(model_path, width, height),
    )
}

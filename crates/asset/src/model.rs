//! glTF scene and animation import, delegated to the `gltf` crate.
//!
//! Geometry is flattened into per-primitive parts carrying their world
//! matrix. Animations are converted into unified TRS keyframe clips: the
//! union of a node's channel key times is taken and each channel is
//! evaluated at those times (step and cubic inputs are degraded to linear).

use anyhow::{Context, Result, bail};
use std::path::Path;

use corelib::{Clip, Keyframe, Mat4, Quat, Transform, Vec3};

use crate::mesh::{MeshData, MeshVertex};
use crate::texture::TextureData;

/// One drawable chunk: a mesh plus the node transform that places it.
#[derive(Clone, Debug)]
pub struct ModelPart {
    pub mesh: MeshData,
    pub transform: Mat4,
}

/// A loaded model: geometry, an optional base-color texture and any
/// animation clips the file carried.
pub struct Model {
    pub parts: Vec<ModelPart>,
    pub base_color: Option<TextureData>,
    pub clips: Vec<Clip>,
}

/// Import a .gltf/.glb file.
pub fn load_gltf(path: impl AsRef<Path>) -> Result<Model> {
    let path = path.as_ref();
    let (document, buffers, images) = gltf::import(path)
        .with_context(|| format!("Failed to import glTF file: {}", path.display()))?;
    let model = build_model(&document, &buffers, &images)?;
    log::info!(
        "Loaded glTF {} ({} parts, {} clips, base color: {})",
        path.display(),
        model.parts.len(),
        model.clips.len(),
        model.base_color.is_some(),
    );
    Ok(model)
}

fn build_model(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
    images: &[gltf::image::Data],
) -> Result<Model> {
    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .context("glTF file has no scene")?;

    let mut parts = Vec::new();
    for node in scene.nodes() {
        collect_parts(&node, Mat4::IDENTITY, buffers, &mut parts)?;
    }
    if parts.is_empty() {
        bail!("glTF scene has no triangle meshes");
    }

    let base_color = base_color_texture(document, images);

    let clips = document
        .animations()
        .map(|anim| clip_from_animation(&anim, buffers))
        .collect::<Result<Vec<_>>>()?;

    Ok(Model {
        parts,
        base_color,
        clips,
    })
}

fn collect_parts(
    node: &gltf::Node,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    parts: &mut Vec<ModelPart>,
) -> Result<()> {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::warn!("Skipping non-triangle primitive ({:?})", primitive.mode());
                continue;
            }
            let reader = primitive.reader(|b| buffers.get(b.index()).map(|d| d.0.as_slice()));

            let positions: Vec<[f32; 3]> = reader
                .read_positions()
                .context("glTF primitive has no POSITION attribute")?
                .collect();
            let normals: Option<Vec<[f32; 3]>> = reader.read_normals().map(Iterator::collect);
            let uvs: Option<Vec<[f32; 2]>> =
                reader.read_tex_coords(0).map(|t| t.into_f32().collect());

            let vertices = (0..positions.len())
                .map(|i| {
                    MeshVertex::new(
                        positions[i],
                        normals
                            .as_ref()
                            .and_then(|n| n.get(i).copied())
                            .unwrap_or([0.0, 0.0, 1.0]),
                        uvs.as_ref().and_then(|t| t.get(i).copied()).unwrap_or([0.0, 0.0]),
                    )
                })
                .collect();

            let indices = match reader.read_indices() {
                Some(iter) => iter.into_u32().collect(),
                // Non-indexed primitives draw vertices in order.
                None => (0..positions.len() as u32).collect(),
            };

            parts.push(ModelPart {
                mesh: MeshData::new(vertices, indices),
                transform: world,
            });
        }
    }

    for child in node.children() {
        collect_parts(&child, world, buffers, parts)?;
    }
    Ok(())
}

/// First base-color texture of the document, expanded to RGBA8.
fn base_color_texture(
    document: &gltf::Document,
    images: &[gltf::image::Data],
) -> Option<TextureData> {
    for material in document.materials() {
        let Some(info) = material.pbr_metallic_roughness().base_color_texture() else {
            continue;
        };
        let index = info.texture().source().index();
        let Some(data) = images.get(index) else {
            continue;
        };
        if let Some(tex) = texture_from_image(data) {
            return Some(tex);
        }
    }
    None
}

fn texture_from_image(data: &gltf::image::Data) -> Option<TextureData> {
    use gltf::image::Format;
    let pixels = match data.format {
        Format::R8G8B8A8 => data.pixels.clone(),
        Format::R8G8B8 => data
            .pixels
            .chunks_exact(3)
            .flat_map(|px| [px[0], px[1], px[2], 255])
            .collect(),
        Format::R8 => data.pixels.iter().flat_map(|&g| [g, g, g, 255]).collect(),
        other => {
            log::warn!("Unsupported glTF image format {:?}, ignoring texture", other);
            return None;
        }
    };
    Some(TextureData::new_rgba8(data.width, data.height, pixels))
}

/// Per-property key track of one node.
struct Track<T> {
    times: Vec<f32>,
    values: Vec<T>,
}

/// Evaluate a track at `t`: clamp outside the key range, blend inside.
fn eval_track<T: Copy>(
    track: Option<&Track<T>>,
    t: f32,
    default: T,
    blend: impl Fn(T, T, f32) -> T,
) -> T {
    let Some(track) = track else {
        return default;
    };
    let (times, values) = (&track.times, &track.values);
    if times.is_empty() {
        return default;
    }
    if t <= times[0] {
        return values[0];
    }
    let last = times.len() - 1;
    if t >= times[last] {
        return values[last];
    }
    let next = times.partition_point(|&k| k <= t);
    let span = times[next] - times[next - 1];
    if span <= f32::EPSILON {
        return values[next - 1];
    }
    let factor = (t - times[next - 1]) / span;
    blend(values[next - 1], values[next], factor)
}

/// Build one unified TRS clip from the first animated node's channels, the
/// way assimp presented COLLADA channels to the original demo. glTF key
/// times are seconds, so the clip runs at 1 tick per second.
fn clip_from_animation(anim: &gltf::Animation, buffers: &[gltf::buffer::Data]) -> Result<Clip> {
    use gltf::animation::{Interpolation, Property, util::ReadOutputs};

    let target = anim
        .channels()
        .next()
        .context("glTF animation has no channels")?
        .target()
        .node()
        .index();

    let mut translation: Option<Track<Vec3>> = None;
    let mut rotation: Option<Track<Quat>> = None;
    let mut scale: Option<Track<Vec3>> = None;

    for channel in anim.channels() {
        if channel.target().node().index() != target {
            log::warn!(
                "Animation {:?} targets multiple nodes; keeping the first only",
                anim.name().unwrap_or("<unnamed>")
            );
            continue;
        }

        let reader = channel.reader(|b| buffers.get(b.index()).map(|d| d.0.as_slice()));
        let times: Vec<f32> = reader
            .read_inputs()
            .context("animation sampler has no input accessor")?
            .collect();

        // Cubic-spline samplers store [in-tangent, value, out-tangent]
        // triplets; keep the values and interpolate them linearly.
        let cubic = channel.sampler().interpolation() == Interpolation::CubicSpline;
        let pick = |i: usize| if cubic { i * 3 + 1 } else { i };

        match reader
            .read_outputs()
            .context("animation sampler has no output accessor")?
        {
            ReadOutputs::Translations(iter) => {
                let all: Vec<Vec3> = iter.map(Vec3::from).collect();
                translation = Some(Track {
                    values: (0..times.len()).filter_map(|i| all.get(pick(i)).copied()).collect(),
                    times,
                });
            }
            ReadOutputs::Rotations(iter) => {
                let all: Vec<Quat> = iter
                    .into_f32()
                    .map(|q| Quat::from_array(q).normalize())
                    .collect();
                rotation = Some(Track {
                    values: (0..times.len()).filter_map(|i| all.get(pick(i)).copied()).collect(),
                    times,
                });
            }
            ReadOutputs::Scales(iter) => {
                let all: Vec<Vec3> = iter.map(Vec3::from).collect();
                scale = Some(Track {
                    values: (0..times.len()).filter_map(|i| all.get(pick(i)).copied()).collect(),
                    times,
                });
            }
            ReadOutputs::MorphTargetWeights(_) => {
                log::debug!("Ignoring morph-target channel ({:?})", Property::MorphTargetWeights);
            }
        }
    }

    // Union of key times across the three properties.
    let mut times: Vec<f32> = Vec::new();
    for track_times in [
        translation.as_ref().map(|t| &t.times),
        rotation.as_ref().map(|t| &t.times),
        scale.as_ref().map(|t| &t.times),
    ]
    .into_iter()
    .flatten()
    {
        times.extend_from_slice(track_times);
    }
    times.sort_by(f32::total_cmp);
    times.dedup_by(|a, b| (*a - *b).abs() < 1e-6);
    if times.is_empty() {
        bail!("glTF animation has no TRS channels");
    }

    let keys = times
        .iter()
        .map(|&t| {
            Keyframe::new(
                t,
                Transform::from_trs(
                    eval_track(translation.as_ref(), t, Vec3::ZERO, |a, b, f| a.lerp(b, f)),
                    eval_track(rotation.as_ref(), t, Quat::IDENTITY, |a, b, f| a.slerp(b, f)),
                    eval_track(scale.as_ref(), t, Vec3::ONE, |a, b, f| a.lerp(b, f)),
                ),
            )
        })
        .collect();

    let duration = times.last().copied().unwrap_or(0.0).max(1e-3);
    Clip::new(keys, duration, 1.0).context("glTF animation produced an invalid clip")
}

#[cfg(test)]
mod tests {
    use super::*;

    // One triangle plus a two-key translation/rotation animation, buffer
    // embedded as a data URI.
    const ANIMATED_TRIANGLE: &str = r#"{"asset": {"version": "2.0"}, "scene": 0, "scenes": [{"nodes": [0]}], "nodes": [{"mesh": 0, "name": "tri"}], "meshes": [{"primitives": [{"attributes": {"POSITION": 0}, "indices": 1}]}], "buffers": [{"byteLength": 108, "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAAAAABAAIAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAAEAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAgD8AAAAA8wQ1PwAAAADzBDU/"}], "bufferViews": [{"buffer": 0, "byteOffset": 0, "byteLength": 36}, {"buffer": 0, "byteOffset": 36, "byteLength": 6}, {"buffer": 0, "byteOffset": 44, "byteLength": 8}, {"buffer": 0, "byteOffset": 52, "byteLength": 24}, {"buffer": 0, "byteOffset": 76, "byteLength": 32}], "accessors": [{"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3", "min": [0, 0, 0], "max": [1, 1, 0]}, {"bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR"}, {"bufferView": 2, "componentType": 5126, "count": 2, "type": "SCALAR", "min": [0.0], "max": [1.0]}, {"bufferView": 3, "componentType": 5126, "count": 2, "type": "VEC3"}, {"bufferView": 4, "componentType": 5126, "count": 2, "type": "VEC4"}], "animations": [{"samplers": [{"input": 2, "output": 3, "interpolation": "LINEAR"}, {"input": 2, "output": 4, "interpolation": "LINEAR"}], "channels": [{"sampler": 0, "target": {"node": 0, "path": "translation"}}, {"sampler": 1, "target": {"node": 0, "path": "rotation"}}]}]}"#;

    fn import() -> Model {
        let (document, buffers, images) =
            gltf::import_slice(ANIMATED_TRIANGLE.as_bytes()).expect("import test gltf");
        build_model(&document, &buffers, &images).expect("build model")
    }

    #[test]
    fn imports_triangle_geometry() {
        let model = import();
        assert_eq!(model.parts.len(), 1);
        let mesh = &model.parts[0].mesh;
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(model.parts[0].transform, Mat4::IDENTITY);
        assert!(model.base_color.is_none());
    }

    #[test]
    fn merges_channels_into_unified_clip() {
        let model = import();
        assert_eq!(model.clips.len(), 1);
        let clip = &model.clips[0];
        assert_eq!(clip.keys().len(), 2);
        assert_eq!(clip.ticks_per_second(), 1.0);

        let mid = clip.sample(0.5);
        assert!(mid.translation.abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), 1e-5));
        let expected = Quat::from_rotation_y(core::f32::consts::FRAC_PI_4);
        assert!(mid.rotation.abs_diff_eq(expected, 1e-4));
        assert!(mid.scale.abs_diff_eq(Vec3::ONE, 1e-6));
    }

    #[test]
    fn eval_track_clamps_and_blends() {
        let track = Track {
            times: vec![1.0, 3.0],
            values: vec![0.0f32, 4.0],
        };
        let lerp = |a: f32, b: f32, t: f32| a + (b - a) * t;
        assert_eq!(eval_track(Some(&track), 0.0, 9.0, lerp), 0.0);
        assert_eq!(eval_track(Some(&track), 2.0, 9.0, lerp), 2.0);
        assert_eq!(eval_track(Some(&track), 5.0, 9.0, lerp), 4.0);
        assert_eq!(eval_track(None, 2.0, 9.0, lerp), 9.0);
    }
}

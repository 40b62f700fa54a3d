//! OBJ mesh loading, delegated to the `obj` crate.
//!
//! Richest vertex layout is tried first; files without uvs or normals
//! degrade to defaults rather than failing.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use obj::{Obj, Position, TexturedVertex, Vertex, load_obj};

use crate::mesh::{MeshData, MeshVertex};

/// Load an OBJ mesh from a file path.
pub fn load_obj_from_path(path: impl AsRef<Path>) -> Result<MeshData> {
    let path = path.as_ref();
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read OBJ file: {}", path.display()))?;
    let mesh = load_obj_from_bytes(&bytes)
        .with_context(|| format!("Failed to parse OBJ file: {}", path.display()))?;
    log::info!(
        "Loaded OBJ {} ({} vertices, {} triangles)",
        path.display(),
        mesh.vertices.len(),
        mesh.indices.len() / 3
    );
    Ok(mesh)
}

/// Parse OBJ bytes into mesh data.
pub fn load_obj_from_bytes(bytes: &[u8]) -> Result<MeshData> {
    if let Ok(model) = load_obj::<TexturedVertex, _, u32>(bytes) {
        let vertices = model
            .vertices
            .iter()
            .map(|v| MeshVertex::new(v.position, v.normal, [v.texture[0], v.texture[1]]))
            .collect();
        return finish(vertices, model.indices);
    }

    if let Ok(model) = load_obj::<Vertex, _, u32>(bytes) {
        // No uvs in the file.
        let vertices = model
            .vertices
            .iter()
            .map(|v| MeshVertex::new(v.position, v.normal, [0.0, 0.0]))
            .collect();
        return finish(vertices, model.indices);
    }

    // Positions only.
    let model: Obj<Position, u32> =
        load_obj(bytes).context("OBJ rejected for every supported vertex layout")?;
    let vertices = model
        .vertices
        .iter()
        .map(|v| MeshVertex::new(v.position, [0.0, 0.0, 1.0], [0.0, 0.0]))
        .collect();
    finish(vertices, model.indices)
}

fn finish(vertices: Vec<MeshVertex>, indices: Vec<u32>) -> Result<MeshData> {
    let mesh = MeshData::new(vertices, indices);
    anyhow::ensure!(mesh.is_valid(), "OBJ contained no triangles");
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_textured_triangle() {
        let src = b"
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vn 0.0 0.0 1.0
vt 0.0 0.0
vt 1.0 0.0
vt 0.0 1.0
f 1/1/1 2/2/1 3/3/1
";
        let mesh = load_obj_from_bytes(src).expect("parse triangle");
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.indices.len(), 3);
        assert_eq!(mesh.vertices[1].uv, [1.0, 0.0]);
        assert_eq!(mesh.vertices[0].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn positions_only_falls_back_to_defaults() {
        let src = b"
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
f 1 2 3
";
        let mesh = load_obj_from_bytes(src).expect("parse bare triangle");
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.vertices[0].normal, [0.0, 0.0, 1.0]);
        assert_eq!(mesh.vertices[0].uv, [0.0, 0.0]);
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(load_obj_from_bytes(b"# nothing here\n").is_err());
    }
}

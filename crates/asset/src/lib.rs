//! Asset loading: CPU-side meshes and textures, with file parsing delegated
//! to the `obj` and `gltf` crates and image decoding to `image`.

pub mod mesh;
pub mod model;
pub mod obj;
pub mod texture;

pub use mesh::{MeshData, MeshVertex};
pub use model::{Model, ModelPart, load_gltf};
pub use texture::TextureData;

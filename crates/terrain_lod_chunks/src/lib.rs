#![deny(rust_2018_compatibility, rust_2018_idioms, nonstandard_style)]
#![warn(clippy::doc_markdown)]

//! Terrain chunks, from data source to render-ready drawable.
//!
//! The `ChunkManager` is the entry point. It resolves chunk requests against an expiring cache, reuses the geometry of
//! cached chunks that differ only in edge stitching, and decides per chunk between a multi-pass material and a baked
//! `CompositeMap`.
//!
//! Nothing here talks to the GPU on its own. Uploads go through the `IncrementalCompileQueue` and composite maps are
//! baked by the `CompositeMapRenderer`, both driven by the thread that owns the `GraphicsContext`.
//!
//! The collaborators are traits: `TerrainDataSource` provides heights, colors and layers, and `SceneManager` provides
//! textures and global rendering modes.

pub mod chunk_manager;
pub mod compile_queue;
pub mod composite_map;
pub mod config;
pub mod data_source;
pub mod drawable;
pub mod error;
pub mod material;
pub mod renderer;
pub mod scene;
pub mod texture;

pub use chunk_manager::*;
pub use compile_queue::*;
pub use composite_map::*;
pub use config::*;
pub use data_source::*;
pub use drawable::*;
pub use error::*;
pub use material::*;
pub use renderer::*;
pub use scene::*;
pub use texture::*;

pub mod prelude {
    pub use super::{
        ChunkManager, ChunkManagerConfig, ChunkManagerStats, CompositeMap, CompositeMapBackend,
        CompositeMapRenderer, CompositeMapRendererConfig, IncrementalCompileQueue, LayerInfo, SceneManager,
        TerrainDataSource, TerrainDrawable, Texture2D, TextureHandle, VertexBuffers,
    };
}

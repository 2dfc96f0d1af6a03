//! Terrain chunk caching, seam-stitched LOD meshes and baked composite textures for heightfield terrain.
//!
//! This library is organized into several crates:
//! - **core**: points, chunk keys, LOD stitching flags and GPU handle bookkeeping
//! - **mesh**: crack-free index generation for chunk grids, UVs and composite map geometry
//! - **storage**: the expiring chunk cache, shared index/UV buffers and per-chunk vertex arrays
//! - **chunks**: the chunk manager, materials, composite maps and the deferred composite renderer
//!
//! Most users start at `chunks::ChunkManager`, supplying a `TerrainDataSource` and a `SceneManager`.

pub use terrain_lod_chunks as chunks;
pub use terrain_lod_core as core;
pub use terrain_lod_mesh as mesh;
pub use terrain_lod_storage as storage;

pub mod prelude {
    pub use super::chunks::prelude::*;
    pub use super::core::prelude::*;
    pub use super::storage::prelude::*;
}

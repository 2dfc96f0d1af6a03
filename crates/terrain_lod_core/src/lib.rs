#![deny(rust_2018_compatibility, rust_2018_idioms, nonstandard_style)]
#![warn(clippy::doc_markdown)]

//! The core data types for terrain level of detail:
//! - `PointN`: a 2D or 3D point, most importantly `Point2f` and `Point3f`
//! - `TexCoordRect`: a rectangle in texture space
//! - `LodFlags`: per-edge seam stitching flags
//! - `ChunkKey` and `TemplateKey`: identities of built chunks and of their shared raw geometry
//! - `GpuSlot` and `GraphicsContext`: the explicit lifecycle of GPU-side handles

pub mod gpu;
pub mod key;
pub mod lod;
pub mod point;
pub mod rect;

pub use gpu::{GpuHandle, GpuSlot, GraphicsContext};
pub use key::{ChunkKey, TemplateKey, WorldspaceId};
pub use lod::{grid_resolution, Direction, LodFlags};
pub use point::{Point2, Point2f, Point3, Point3f, PointN};
pub use rect::TexCoordRect;

/// An 8-bit-per-channel RGBA color.
pub type Rgba8 = [u8; 4];

pub mod prelude {
    pub use super::{
        grid_resolution, ChunkKey, Direction, GpuHandle, GpuSlot, GraphicsContext, LodFlags, Point2f,
        Point3f, PointN, Rgba8, TemplateKey, TexCoordRect, WorldspaceId,
    };
}

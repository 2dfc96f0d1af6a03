use crate::{LodFlags, Point2f, PointN};

use float_ord::FloatOrd;

/// Identifies the worldspace a chunk's terrain data is sampled from.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct WorldspaceId(pub u64);

/// The identity of a fully built, render-ready chunk.
///
/// Keys are ordered lexicographically by `(center, lod, lod_flags)`, so all keys sharing a `TemplateKey` are adjacent
/// in an ordered map, and among them they are ordered by `lod_flags`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ChunkKey {
    center: [FloatOrd<f32>; 2],
    pub lod: u8,
    pub lod_flags: LodFlags,
}

impl ChunkKey {
    pub fn new(center: Point2f, lod: u8, lod_flags: LodFlags) -> Self {
        Self {
            center: [FloatOrd(center.x()), FloatOrd(center.y())],
            lod,
            lod_flags,
        }
    }

    pub fn center(&self) -> Point2f {
        PointN([self.center[0].0, self.center[1].0])
    }

    pub fn template_key(&self) -> TemplateKey {
        TemplateKey {
            center: self.center,
            lod: self.lod,
        }
    }
}

/// The part of a `ChunkKey` that determines a chunk's raw vertex data.
///
/// Chunks with equal template keys have identical positions, normals and colors; they differ only in how their index
/// buffers stitch edges to coarser neighbours.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TemplateKey {
    center: [FloatOrd<f32>; 2],
    pub lod: u8,
}

impl TemplateKey {
    pub fn new(center: Point2f, lod: u8) -> Self {
        Self {
            center: [FloatOrd(center.x()), FloatOrd(center.y())],
            lod,
        }
    }

    pub fn center(&self) -> Point2f {
        PointN([self.center[0].0, self.center[1].0])
    }

    /// The greatest `ChunkKey` that has this template key. Every other variant sorts at or below it.
    pub fn last_variant(&self) -> ChunkKey {
        ChunkKey {
            center: self.center,
            lod: self.lod,
            lod_flags: LodFlags(u32::MAX),
        }
    }

    pub fn matches(&self, key: &ChunkKey) -> bool {
        *self == key.template_key()
    }
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝

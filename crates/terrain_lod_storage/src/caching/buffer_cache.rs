use crate::SmallKeyHashMap;

use terrain_lod_core::{GpuSlot, GraphicsContext, LodFlags};
use terrain_lod_mesh::{grid_uvs, stitched_grid_indices, Indices};

use std::sync::Arc;

/// An immutable, shareable triangle list for a chunk grid.
#[derive(Debug)]
pub struct IndexBuffer {
    grid_resolution: u32,
    stitch_bits: u16,
    indices: Indices,
    gpu: GpuSlot,
}

impl IndexBuffer {
    pub fn grid_resolution(&self) -> u32 {
        self.grid_resolution
    }

    /// The number of vertices this buffer indexes into: `grid_resolution`².
    pub fn num_vertices(&self) -> usize {
        let n = self.grid_resolution as usize;

        n * n
    }

    pub fn lod_flags(&self) -> LodFlags {
        LodFlags(self.stitch_bits as u32)
    }

    pub fn indices(&self) -> &Indices {
        &self.indices
    }

    pub fn gpu_slot(&self) -> &GpuSlot {
        &self.gpu
    }

    pub fn upload(&self, ctx: &mut (impl GraphicsContext + ?Sized)) -> bool {
        let bytes = self.indices.as_bytes();
        let (_, uploaded) = self.gpu.upload_with(ctx, |c| c.create_buffer(bytes));

        uploaded
    }
}

/// Immutable, shareable texture coordinates for a chunk grid.
#[derive(Debug)]
pub struct UvBuffer {
    grid_resolution: u32,
    uvs: Vec<[f32; 2]>,
    gpu: GpuSlot,
}

impl UvBuffer {
    pub fn grid_resolution(&self) -> u32 {
        self.grid_resolution
    }

    pub fn uvs(&self) -> &[[f32; 2]] {
        &self.uvs
    }

    pub fn gpu_slot(&self) -> &GpuSlot {
        &self.gpu
    }

    pub fn upload(&self, ctx: &mut (impl GraphicsContext + ?Sized)) -> bool {
        let bytes: &[u8] = bytemuck::cast_slice(&self.uvs);
        let (_, uploaded) = self.gpu.upload_with(ctx, |c| c.create_buffer(bytes));

        uploaded
    }
}

/// Memoizes index and UV buffers, which depend only on the grid resolution (and for indices, the edge stitching).
///
/// Buffers are published as `Arc`s and never mutated afterwards, so any number of chunks can share them. Clearing the
/// cache only drops the cache's references; releasing their GPU handles is the separate `release_all` pass.
#[derive(Debug, Default)]
pub struct BufferCache {
    index_buffers: SmallKeyHashMap<(u32, u16), Arc<IndexBuffer>>,
    uv_buffers: SmallKeyHashMap<u32, Arc<UvBuffer>>,
}

impl BufferCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the index buffer for a `grid_resolution`² grid stitched according to `lod_flags`. Only the edge bits of
    /// `lod_flags` take part in the lookup, because they alone affect the triangulation.
    pub fn get_index_buffer(&mut self, grid_resolution: u32, lod_flags: LodFlags) -> Arc<IndexBuffer> {
        let stitch_bits = lod_flags.stitch_bits();

        self.index_buffers
            .entry((grid_resolution, stitch_bits))
            .or_insert_with(|| {
                tracing::trace!(grid_resolution, stitch_bits, "building index buffer");

                Arc::new(IndexBuffer {
                    grid_resolution,
                    stitch_bits,
                    indices: stitched_grid_indices(grid_resolution, lod_flags),
                    gpu: GpuSlot::new(),
                })
            })
            .clone()
    }

    pub fn get_uv_buffer(&mut self, grid_resolution: u32) -> Arc<UvBuffer> {
        self.uv_buffers
            .entry(grid_resolution)
            .or_insert_with(|| {
                tracing::trace!(grid_resolution, "building UV buffer");

                Arc::new(UvBuffer {
                    grid_resolution,
                    uvs: grid_uvs(grid_resolution),
                    gpu: GpuSlot::new(),
                })
            })
            .clone()
    }

    pub fn num_index_buffers(&self) -> usize {
        self.index_buffers.len()
    }

    pub fn num_uv_buffers(&self) -> usize {
        self.uv_buffers.len()
    }

    /// Forget all buffers. Chunks that still hold them keep them alive.
    pub fn clear(&mut self) {
        self.index_buffers.clear();
        self.uv_buffers.clear();
    }

    /// Release the GPU handles of every cached buffer. The CPU data stays cached and can be uploaded again. Returns the
    /// number of handles released.
    pub fn release_all(&self, ctx: &mut (impl GraphicsContext + ?Sized)) -> usize {
        let mut released = 0;
        for buffer in self.index_buffers.values() {
            released += buffer.gpu.release(ctx) as usize;
        }
        for buffer in self.uv_buffers.values() {
            released += buffer.gpu.release(ctx) as usize;
        }

        released
    }
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝

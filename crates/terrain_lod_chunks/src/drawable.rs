use crate::{CompositeMap, CompositeMapRenderer, Pass};

use terrain_lod_core::{ChunkKey, GraphicsContext, Point2f, Rgba8};
use terrain_lod_storage::{IndexBuffer, UvBuffer, VertexArray};

use std::sync::Arc;

/// A render-ready terrain chunk.
///
/// The vertex arrays belong to this chunk alone. The index and UV buffers, the passes and the composite map may be
/// shared with other chunks.
#[derive(Debug)]
pub struct TerrainDrawable {
    pub(crate) key: ChunkKey,
    pub(crate) chunk_size: f32,
    pub(crate) positions: VertexArray<[f32; 3]>,
    pub(crate) normals: VertexArray<[f32; 3]>,
    pub(crate) colors: VertexArray<Rgba8>,
    pub(crate) index_buffer: Arc<IndexBuffer>,
    pub(crate) uv_buffer: Arc<UvBuffer>,
    pub(crate) num_uv_sets: usize,
    pub(crate) passes: Arc<Vec<Pass>>,
    pub(crate) composite_map: Option<Arc<CompositeMap>>,
    pub(crate) composite_renderer: Option<Arc<CompositeMapRenderer>>,
    pub(crate) light_list: bool,
    pub(crate) water_bounding_margin: f32,
    pub(crate) node_mask: u32,
    pub(crate) from_template: bool,
}

impl TerrainDrawable {
    pub fn key(&self) -> &ChunkKey {
        &self.key
    }

    pub fn chunk_size(&self) -> f32 {
        self.chunk_size
    }

    pub fn center(&self) -> Point2f {
        self.key.center()
    }

    pub fn positions(&self) -> &VertexArray<[f32; 3]> {
        &self.positions
    }

    pub fn normals(&self) -> &VertexArray<[f32; 3]> {
        &self.normals
    }

    pub fn colors(&self) -> &VertexArray<Rgba8> {
        &self.colors
    }

    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    pub fn index_buffer(&self) -> &Arc<IndexBuffer> {
        &self.index_buffer
    }

    pub fn uv_buffer(&self) -> &Arc<UvBuffer> {
        &self.uv_buffer
    }

    /// Each texture coordinate set is bound to the same shared UV buffer. Composited chunks sample one texture and need
    /// one set; multi-pass chunks need a second set for their blend maps.
    pub fn uv_sets(&self) -> impl Iterator<Item = &Arc<UvBuffer>> {
        std::iter::repeat(&self.uv_buffer).take(self.num_uv_sets)
    }

    pub fn num_uv_sets(&self) -> usize {
        self.num_uv_sets
    }

    pub fn passes(&self) -> &Arc<Vec<Pass>> {
        &self.passes
    }

    pub fn composite_map(&self) -> Option<&Arc<CompositeMap>> {
        self.composite_map.as_ref()
    }

    /// Whether the chunk is small enough to be lit by its own light list.
    pub fn uses_light_list(&self) -> bool {
        self.light_list
    }

    /// Margin around the chunk's bounds within which water must still be considered: one grid interval in world units.
    pub fn water_bounding_margin(&self) -> f32 {
        self.water_bounding_margin
    }

    pub fn node_mask(&self) -> u32 {
        self.node_mask
    }

    /// Whether the vertex arrays were copied from another cached chunk rather than sampled from the data source.
    pub fn is_from_template(&self) -> bool {
        self.from_template
    }

    /// Makes sure the composite map is baked before the chunk is drawn. Call when the chunk is about to be drawn.
    /// Returns `true` iff a bake was requested.
    pub fn request_composite_render(&self) -> bool {
        match (&self.composite_map, &self.composite_renderer) {
            (Some(map), Some(renderer)) if !map.is_rendered() => {
                // Immediate requests can't be rejected.
                renderer.add_composite_map(map.clone(), true).is_ok()
            }
            _ => false,
        }
    }

    /// Uploads everything this chunk draws with that isn't resident yet. Returns the number of GPU objects created.
    pub fn compile(&self, ctx: &mut (impl GraphicsContext + ?Sized)) -> usize {
        let mut created = self.positions.upload(ctx) as usize
            + self.normals.upload(ctx) as usize
            + self.colors.upload(ctx) as usize
            + self.index_buffer.upload(ctx) as usize
            + self.uv_buffer.upload(ctx) as usize;
        for pass in self.passes.iter() {
            for texture in pass.textures().filter(|t| !t.is_render_target()) {
                created += texture.upload(ctx) as usize;
            }
        }

        created
    }

    /// Releases the GPU objects owned by this chunk, its pass textures and its composite map. Shared index and UV
    /// buffers are released by their cache. Returns the number of GPU objects released.
    pub fn release_gl_objects(&self, ctx: &mut (impl GraphicsContext + ?Sized)) -> usize {
        let mut released = self.positions.release(ctx) as usize
            + self.normals.release(ctx) as usize
            + self.colors.release(ctx) as usize;
        for pass in self.passes.iter() {
            for texture in pass.textures() {
                released += texture.release(ctx) as usize;
            }
        }
        if let Some(map) = &self.composite_map {
            released += map.release_gl_objects(ctx);
        }

        released
    }
}

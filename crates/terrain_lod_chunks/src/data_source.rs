use terrain_lod_core::{Point2f, Rgba8, WorldspaceId};

use auto_impl::auto_impl;
use image::GrayImage;

/// Describes one blend layer of a terrain chunk, by texture path.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LayerInfo {
    pub diffuse_map: String,
    pub normal_map: Option<String>,
    pub parallax: bool,
    pub specular: bool,
}

impl LayerInfo {
    pub fn requires_shaders(&self) -> bool {
        self.normal_map.is_some() || self.parallax || self.specular
    }
}

/// The per-vertex arrays of one chunk, laid out like the chunk's grid: vertex `(x, y)` at `x * grid_resolution + y`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VertexBuffers {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub colors: Vec<Rgba8>,
}

/// The blend layers of a chunk, bottom to top, with the blend maps that paint each layer over the ones below it.
///
/// The bottom layer is opaque, so there is one blend map fewer than there are layers.
#[derive(Clone, Debug, Default)]
pub struct Blendmaps {
    pub images: Vec<GrayImage>,
    pub layers: Vec<LayerInfo>,
}

/// The provider of terrain heights, normals, vertex colors and texture layers.
///
/// Implementations must be pure functions of their arguments as far as the chunk manager is concerned: asking twice for
/// the same chunk gives the same data. Missing data is expressed as empty or default values, never as a failure.
#[auto_impl(&, Box, Arc)]
pub trait TerrainDataSource {
    /// Fill `out` with the vertices of a chunk of `size` cells centered on `center` (in cell units), sampling every
    /// `2^lod`-th vertex. `use_composite` hints that the chunk will be drawn with a composite map.
    fn fill_vertex_buffers(
        &self,
        lod: u8,
        size: f32,
        center: Point2f,
        worldspace: WorldspaceId,
        out: &mut VertexBuffers,
        use_composite: bool,
    );

    /// Fill `colors` with the vertex colors of a composite map leaf, laid out like `fill_vertex_buffers`.
    fn fill_vertex_buffers_composite_map(
        &self,
        lod: u8,
        size: f32,
        center: Point2f,
        worldspace: WorldspaceId,
        colors: &mut Vec<Rgba8>,
    );

    fn blendmaps(&self, size: f32, center: Point2f, worldspace: WorldspaceId) -> Blendmaps;

    /// How many times the layer textures repeat across a chunk of `size` cells.
    fn blendmap_scale(&self, size: f32) -> f32;

    /// The number of vertices along one edge of a cell at LOD 0.
    fn cell_vertices(&self, worldspace: WorldspaceId) -> u32;

    /// The length of one cell edge in world units.
    fn cell_world_size(&self, worldspace: WorldspaceId) -> f32;
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_diffuse_layer_needs_no_shaders() {
        let mut layer = LayerInfo {
            diffuse_map: "textures/grass.dds".into(),
            ..Default::default()
        };
        assert!(!layer.requires_shaders());

        layer.specular = true;
        assert!(layer.requires_shaders());

        layer.specular = false;
        layer.normal_map = Some("textures/grass_n.dds".into());
        assert!(layer.requires_shaders());
    }
}

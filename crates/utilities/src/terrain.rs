use terrain_lod_chunks::{Blendmaps, LayerInfo, TerrainDataSource, VertexBuffers};
use terrain_lod_core::{grid_resolution, Point2f, Rgba8, WorldspaceId};

use image::{GrayImage, Luma};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Perfectly flat terrain at height 0, white vertex colors and `num_layers` blend layers everywhere. Counts how often
/// each kind of data was requested.
#[derive(Debug)]
pub struct FlatTerrain {
    pub cell_vertices: u32,
    pub cell_world_size: f32,
    pub num_layers: usize,
    pub blendmap_size: u32,
    pub normal_maps: bool,
    vertex_fills: AtomicUsize,
    composite_fills: AtomicUsize,
    blendmap_requests: AtomicUsize,
}

impl Default for FlatTerrain {
    fn default() -> Self {
        Self {
            cell_vertices: 5,
            cell_world_size: 8192.0,
            num_layers: 2,
            blendmap_size: 4,
            normal_maps: false,
            vertex_fills: AtomicUsize::new(0),
            composite_fills: AtomicUsize::new(0),
            blendmap_requests: AtomicUsize::new(0),
        }
    }
}

impl FlatTerrain {
    pub fn with_layers(num_layers: usize) -> Self {
        Self {
            num_layers,
            ..Default::default()
        }
    }

    pub fn num_vertex_fills(&self) -> usize {
        self.vertex_fills.load(Ordering::SeqCst)
    }

    pub fn num_composite_fills(&self) -> usize {
        self.composite_fills.load(Ordering::SeqCst)
    }

    pub fn num_blendmap_requests(&self) -> usize {
        self.blendmap_requests.load(Ordering::SeqCst)
    }
}

const WHITE: Rgba8 = [255; 4];

impl TerrainDataSource for FlatTerrain {
    fn fill_vertex_buffers(
        &self,
        lod: u8,
        size: f32,
        center: Point2f,
        _worldspace: WorldspaceId,
        out: &mut VertexBuffers,
        _use_composite: bool,
    ) {
        self.vertex_fills.fetch_add(1, Ordering::SeqCst);

        let n = grid_resolution(self.cell_vertices, size, lod) as usize;
        let origin = (center - Point2f::fill(size / 2.0)) * self.cell_world_size;
        let step = size * self.cell_world_size / (n.max(2) - 1) as f32;

        out.positions.clear();
        out.normals.clear();
        out.colors.clear();
        for x in 0..n {
            for y in 0..n {
                out.positions
                    .push([origin.x() + x as f32 * step, origin.y() + y as f32 * step, 0.0]);
                out.normals.push([0.0, 0.0, 1.0]);
                out.colors.push(WHITE);
            }
        }
    }

    fn fill_vertex_buffers_composite_map(
        &self,
        lod: u8,
        size: f32,
        _center: Point2f,
        _worldspace: WorldspaceId,
        colors: &mut Vec<Rgba8>,
    ) {
        self.composite_fills.fetch_add(1, Ordering::SeqCst);

        let n = grid_resolution(self.cell_vertices, size, lod) as usize;
        colors.clear();
        colors.resize(n * n, WHITE);
    }

    fn blendmaps(&self, _size: f32, _center: Point2f, _worldspace: WorldspaceId) -> Blendmaps {
        self.blendmap_requests.fetch_add(1, Ordering::SeqCst);

        let layers = (0..self.num_layers)
            .map(|i| LayerInfo {
                diffuse_map: format!("textures/layer{}.dds", i),
                normal_map: if self.normal_maps {
                    Some(format!("textures/layer{}_n.dds", i))
                } else {
                    None
                },
                parallax: false,
                specular: false,
            })
            .collect();
        let images = (1..self.num_layers)
            .map(|_| GrayImage::from_pixel(self.blendmap_size, self.blendmap_size, Luma([128])))
            .collect();

        Blendmaps { images, layers }
    }

    fn blendmap_scale(&self, size: f32) -> f32 {
        16.0 * size
    }

    fn cell_vertices(&self, _worldspace: WorldspaceId) -> u32 {
        self.cell_vertices
    }

    fn cell_world_size(&self, _worldspace: WorldspaceId) -> f32 {
        self.cell_world_size
    }
}

//! Composite maps bake all blend layers of a distant chunk into one texture.
//!
//! The bake draws, for each leaf of a quadtree over the chunk, one textured quad per layer and then the leaf's vertex
//! colors multiplied on top. Leaf grids don't depend on the chunk they belong to, only on their size and place within
//! the composite texture, so the builder memoizes them.

use crate::material::assemble_layer_passes;
use crate::{BlendFunc, ConfigError, Pass, SceneManager, TerrainDataSource, TextureHandle};

use terrain_lod_core::{grid_resolution, GraphicsContext, LodFlags, Point2f, PointN, Rgba8, TexCoordRect, WorldspaceId};
use terrain_lod_mesh::{flat_grid_positions, TexturedQuad};
use terrain_lod_storage::{BufferCache, IndexBuffer, SmallKeyHashMap, UvBuffer, VertexArray};

use float_ord::FloatOrd;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Composite maps are always baked from full resolution vertex colors.
const COMPOSITE_MAP_LOD: u8 = 0;

/// A baked texture standing in for every blend layer of one chunk, plus what it takes to bake it.
#[derive(Debug)]
pub struct CompositeMap {
    texture: TextureHandle,
    leaves: Vec<CompositeLeaf>,
    rendered: AtomicBool,
}

impl CompositeMap {
    pub fn new(texture: TextureHandle, leaves: Vec<CompositeLeaf>) -> Self {
        Self {
            texture,
            leaves,
            rendered: AtomicBool::new(false),
        }
    }

    /// The render target that the leaves are baked into.
    pub fn texture(&self) -> &TextureHandle {
        &self.texture
    }

    pub fn leaves(&self) -> &[CompositeLeaf] {
        &self.leaves
    }

    /// All drawables in bake order.
    pub fn drawables(&self) -> impl Iterator<Item = &CompositeDrawable> {
        self.leaves.iter().flat_map(|leaf| leaf.drawables.iter())
    }

    pub fn num_drawables(&self) -> usize {
        self.leaves.iter().map(|leaf| leaf.drawables.len()).sum()
    }

    pub fn is_rendered(&self) -> bool {
        self.rendered.load(Ordering::Acquire)
    }

    /// Called by the renderer once the bake has been submitted.
    pub fn mark_rendered(&self) {
        self.rendered.store(true, Ordering::Release);
    }

    /// Releases the baked texture, the layer and blend map textures and the per-leaf vertex colors. The map must be
    /// baked again before it is drawn.
    pub fn release_gl_objects(&self, ctx: &mut (impl GraphicsContext + ?Sized)) -> usize {
        let mut released = self.texture.release(ctx) as usize;
        for drawable in self.drawables() {
            match drawable {
                CompositeDrawable::Layer { pass, .. } => {
                    for texture in pass.textures() {
                        released += texture.release(ctx) as usize;
                    }
                }
                CompositeDrawable::Detail { colors, .. } => {
                    released += colors.release(ctx) as usize;
                }
            }
        }
        self.rendered.store(false, Ordering::Release);

        released
    }
}

/// One quadrant of a composite map at which subdivision stopped.
#[derive(Debug)]
pub struct CompositeLeaf {
    /// Size of the quadrant in cells.
    pub chunk_size: f32,
    /// Center of the quadrant in cell units.
    pub chunk_center: Point2f,
    /// The part of the composite texture this leaf covers.
    pub tex_coords: TexCoordRect,
    /// One `Layer` per blend layer, bottom to top, then one `Detail`.
    pub drawables: Vec<CompositeDrawable>,
}

#[derive(Debug)]
pub enum CompositeDrawable {
    /// A layer texture drawn over the leaf's quad. Both texture coordinate sets of the pass use `quad.tex_coords`.
    Layer { quad: TexturedQuad, pass: Pass },
    /// The leaf's vertex colors, blended over the layers with `blend`.
    Detail {
        geometry: Arc<CompositeGeometry>,
        colors: VertexArray<Rgba8>,
        blend: BlendFunc,
    },
}

/// A flat leaf grid in the composite texture's normalized device coordinates. Shared by every composite map with a
/// leaf of the same size in the same place.
#[derive(Debug)]
pub struct CompositeGeometry {
    positions: VertexArray<[f32; 3]>,
    uvs: Arc<UvBuffer>,
    indices: Arc<IndexBuffer>,
}

impl CompositeGeometry {
    pub fn positions(&self) -> &VertexArray<[f32; 3]> {
        &self.positions
    }

    pub fn uvs(&self) -> &Arc<UvBuffer> {
        &self.uvs
    }

    pub fn indices(&self) -> &Arc<IndexBuffer> {
        &self.indices
    }
}

/// Memoization key of a `CompositeGeometry`: the leaf's size in cells, and its center and width in normalized device
/// coordinates. This is not an identity; distinct leaves with equal keys get the same geometry.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct CompositeGeometryKey {
    chunk_size: FloatOrd<f32>,
    position: [FloatOrd<f32>; 2],
    width: FloatOrd<f32>,
}

impl CompositeGeometryKey {
    pub fn new(chunk_size: f32, position: Point2f, width: f32) -> Self {
        Self {
            chunk_size: FloatOrd(chunk_size),
            position: [FloatOrd(position.x()), FloatOrd(position.y())],
            width: FloatOrd(width),
        }
    }
}

/// Builds composite maps and owns the memo of leaf geometry.
#[derive(Debug)]
pub struct CompositeMapBuilder {
    max_geometry_size: f32,
    geometry_cache: SmallKeyHashMap<CompositeGeometryKey, Arc<CompositeGeometry>>,
}

impl CompositeMapBuilder {
    pub fn new(max_geometry_size: f32) -> Result<Self, ConfigError> {
        if !(max_geometry_size > 0.0) {
            return Err(ConfigError::NonPositiveCompositeGeometrySize(
                max_geometry_size,
            ));
        }

        Ok(Self {
            max_geometry_size,
            geometry_cache: SmallKeyHashMap::default(),
        })
    }

    pub fn max_geometry_size(&self) -> f32 {
        self.max_geometry_size
    }

    /// Assembles the composite map of the chunk of `chunk_size` cells at `chunk_center`, to be baked into `texture`.
    ///
    /// This only builds CPU-side data. Baking is up to a `CompositeMapRenderer`.
    #[allow(clippy::too_many_arguments)]
    pub fn build<S, M>(
        &mut self,
        source: &S,
        scene: &M,
        buffers: &mut BufferCache,
        worldspace: WorldspaceId,
        chunk_size: f32,
        chunk_center: Point2f,
        texture: TextureHandle,
    ) -> CompositeMap
    where
        S: TerrainDataSource,
        M: SceneManager,
    {
        let leaves = subdivide(chunk_size, chunk_center, self.max_geometry_size)
            .into_iter()
            .map(|(size, center, tex_coords)| {
                self.build_leaf(source, scene, buffers, worldspace, size, center, tex_coords)
            })
            .collect();

        CompositeMap::new(texture, leaves)
    }

    #[allow(clippy::too_many_arguments)]
    fn build_leaf<S, M>(
        &mut self,
        source: &S,
        scene: &M,
        buffers: &mut BufferCache,
        worldspace: WorldspaceId,
        chunk_size: f32,
        chunk_center: Point2f,
        tex_coords: TexCoordRect,
    ) -> CompositeLeaf
    where
        S: TerrainDataSource,
        M: SceneManager,
    {
        // Texture space [0, 1] maps to NDC [-1, 1], with Y flipped for the leaf grid.
        let corner = tex_coords.minimum * 2.0 - PointN([1.0, 1.0]);
        let extent = tex_coords.shape * 2.0;
        let position = corner + tex_coords.shape;
        let (width, height) = (extent.x(), -extent.y());

        let key = CompositeGeometryKey::new(chunk_size, position, width);
        let cell_vertices = source.cell_vertices(worldspace);
        let geometry = self
            .geometry_cache
            .entry(key)
            .or_insert_with(|| {
                tracing::debug!(chunk_size, ?tex_coords, "creating composite map geometry template");

                let n = grid_resolution(cell_vertices, chunk_size, COMPOSITE_MAP_LOD);

                Arc::new(CompositeGeometry {
                    positions: VertexArray::new(flat_grid_positions(n, position, width, height)),
                    uvs: buffers.get_uv_buffer(n),
                    indices: buffers.get_index_buffer(n, LodFlags::NONE),
                })
            })
            .clone();

        let mut colors = Vec::new();
        source.fill_vertex_buffers_composite_map(
            COMPOSITE_MAP_LOD,
            chunk_size,
            chunk_center,
            worldspace,
            &mut colors,
        );

        let passes = assemble_layer_passes(source, scene, chunk_size, chunk_center, worldspace, true);

        let mut drawables = Vec::with_capacity(passes.len() + 1);
        for pass in passes.into_iter() {
            drawables.push(CompositeDrawable::Layer {
                quad: TexturedQuad::axis_aligned(corner, extent),
                pass,
            });
        }
        drawables.push(CompositeDrawable::Detail {
            geometry,
            colors: VertexArray::new(colors),
            blend: BlendFunc::MULTIPLY,
        });

        CompositeLeaf {
            chunk_size,
            chunk_center,
            tex_coords,
            drawables,
        }
    }

    pub fn num_geometry_templates(&self) -> usize {
        self.geometry_cache.len()
    }

    pub fn clear(&mut self) {
        self.geometry_cache.clear();
    }

    /// Releases the GPU copies of all memoized leaf positions. Returns the number of handles released.
    pub fn release_gl_objects(&self, ctx: &mut (impl GraphicsContext + ?Sized)) -> usize {
        self.geometry_cache
            .values()
            .map(|geometry| geometry.positions.release(ctx) as usize)
            .sum()
    }
}

/// Splits a chunk into quadrants until each is at most `max_size` cells large. Returns `(size, center, tex_coords)`
/// for every leaf, in depth-first order.
///
/// `max_size` must be positive.
pub fn subdivide(chunk_size: f32, chunk_center: Point2f, max_size: f32) -> Vec<(f32, Point2f, TexCoordRect)> {
    debug_assert!(max_size > 0.0);
    debug_assert!(chunk_size.is_finite());

    let max_depth = max_subdivision_depth(chunk_size, max_size);

    let mut leaves = Vec::new();
    let mut work = vec![(chunk_size, chunk_center, TexCoordRect::UNIT, 0)];
    while let Some((size, center, tex_coords, depth)) = work.pop() {
        debug_assert!(depth <= max_depth);

        if size > max_size {
            let quarter = size / 4.0;
            // Reversed so the first quadrant is popped first.
            for (direction, quadrant) in tex_coords.quadrants().iter().rev() {
                work.push((size / 2.0, center + *direction * quarter, *quadrant, depth + 1));
            }
        } else {
            leaves.push((size, center, tex_coords));
        }
    }

    leaves
}

fn max_subdivision_depth(chunk_size: f32, max_size: f32) -> u32 {
    (chunk_size / max_size).log2().ceil().max(0.0) as u32 + 1
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝

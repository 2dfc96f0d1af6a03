use crate::material::assemble_layer_passes;
use crate::{
    create_passes, ChunkManagerConfig, CompositeMap, CompositeMapBuilder, CompositeMapRenderer, ConfigError, Pass,
    SceneManager, TerrainDataSource, TerrainDrawable, Texture2D, TextureLayer, VertexBuffers,
};

use terrain_lod_core::{grid_resolution, ChunkKey, GraphicsContext, LodFlags, Point2f, Point3f};
use terrain_lod_storage::{BufferCache, ObjectCache, VertexArray};

use std::sync::Arc;
use std::time::Instant;

/// Builds terrain chunks and keeps them cached until they expire.
///
/// A requested chunk is resolved in three steps:
///   1. An exact match in the cache is returned as is.
///   2. Otherwise a cached chunk with the same center and LOD (but different edge stitching) is used as a template: its
///      vertex arrays are copied, and its passes and composite map are shared.
///   3. Otherwise the vertices are sampled from the data source.
///
/// Chunks at least `composite_map_level` cells large are drawn with one baked composite map. Smaller chunks are drawn
/// with one pass per blend layer.
///
/// All methods that change the cache take `&mut self`. To build chunks on several threads, put the manager behind a
/// lock.
pub struct ChunkManager<S, M> {
    source: S,
    scene: M,
    renderer: Arc<CompositeMapRenderer>,
    config: ChunkManagerConfig,
    cell_vertices: u32,
    node_mask: u32,
    cache: ObjectCache<ChunkKey, TerrainDrawable>,
    buffers: BufferCache,
    composite_builder: CompositeMapBuilder,
    counters: BuildCounters,
}

#[derive(Clone, Copy, Debug, Default)]
struct BuildCounters {
    hits: u64,
    template_reuses: u64,
    fresh_builds: u64,
    composite_maps_built: u64,
}

/// A snapshot of chunk manager activity, reported once per frame.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ChunkManagerStats {
    pub frame: u32,
    /// Number of chunks in the cache.
    pub cache_size: usize,
    pub hits: u64,
    pub template_reuses: u64,
    pub fresh_builds: u64,
    pub composite_maps_built: u64,
}

impl<S, M> ChunkManager<S, M>
where
    S: TerrainDataSource,
    M: SceneManager,
{
    pub fn new(
        source: S,
        scene: M,
        renderer: Arc<CompositeMapRenderer>,
        config: ChunkManagerConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let cell_vertices = source.cell_vertices(config.worldspace);
        if cell_vertices < 2 {
            return Err(ConfigError::InvalidCellVertices(cell_vertices));
        }
        if grid_resolution(cell_vertices, config.max_composite_geometry_size, 0) < 2 {
            return Err(ConfigError::CompositeGeometryBelowOneInterval {
                size: config.max_composite_geometry_size,
                cell_vertices,
            });
        }

        Ok(Self {
            cache: ObjectCache::new(config.expiry_delay),
            buffers: BufferCache::new(),
            composite_builder: CompositeMapBuilder::new(config.max_composite_geometry_size)?,
            node_mask: config.node_mask,
            counters: BuildCounters::default(),
            cell_vertices,
            source,
            scene,
            renderer,
            config,
        })
    }

    pub fn config(&self) -> &ChunkManagerConfig {
        &self.config
    }

    pub fn data_source(&self) -> &S {
        &self.source
    }

    pub fn scene_manager(&self) -> &M {
        &self.scene
    }

    pub fn renderer(&self) -> &Arc<CompositeMapRenderer> {
        &self.renderer
    }

    pub fn buffer_cache(&self) -> &BufferCache {
        &self.buffers
    }

    pub fn composite_map_builder(&self) -> &CompositeMapBuilder {
        &self.composite_builder
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }

    pub fn node_mask(&self) -> u32 {
        self.node_mask
    }

    /// Stamp `mask` on every chunk built from now on. Cached chunks keep their mask.
    pub fn set_node_mask(&mut self, mask: u32) {
        self.node_mask = mask;
    }

    /// Get the chunk of `size` cells centered on `center` at `lod`, with edges stitched according to `lod_flags`.
    ///
    /// A non-zero vertex LOD in `lod_flags` replaces `lod`. If `compile_now` is set, a freshly sampled chunk is handed
    /// to the scene's incremental compile queue. Chunks copied from a template never are, since their shared state is
    /// already compiled.
    pub fn get_chunk(
        &mut self,
        size: f32,
        center: Point2f,
        lod: u8,
        lod_flags: LodFlags,
        _view_point: Point3f,
        compile_now: bool,
    ) -> Arc<TerrainDrawable> {
        let lod = effective_lod(lod, lod_flags);
        let key = ChunkKey::new(center, lod, lod_flags);

        if let Some(chunk) = self.cache.get(&key) {
            tracing::trace!(?key, "chunk cache hit");
            self.counters.hits += 1;
            return chunk;
        }

        let _span = tracing::debug_span!("build_chunk", size, lod, lod_flags = lod_flags.0).entered();

        let template_key = key.template_key();
        let template = self
            .cache
            .lower_bound(&template_key.last_variant())
            .filter(|(found, _)| template_key.matches(found))
            .map(|(_, chunk)| chunk);

        let chunk = Arc::new(self.create_chunk(size, key, template.as_deref()));

        if compile_now && !chunk.from_template {
            if let Some(queue) = self.scene.incremental_compile_queue() {
                queue.add(chunk.clone());
            }
        }

        self.cache.insert(key, chunk.clone(), Instant::now());

        chunk
    }

    fn create_chunk(&mut self, size: f32, key: ChunkKey, template: Option<&TerrainDrawable>) -> TerrainDrawable {
        let worldspace = self.config.worldspace;
        let center = key.center();
        let use_composite_map = size >= self.config.composite_map_level;
        let num_uv_sets = if use_composite_map { 1 } else { 2 };

        let (positions, normals, colors) = match template {
            Some(template) => {
                tracing::debug!(template = ?template.key, "reusing template geometry");
                self.counters.template_reuses += 1;

                (
                    template.positions.deep_copy(),
                    template.normals.deep_copy(),
                    template.colors.deep_copy(),
                )
            }
            None => {
                tracing::debug!("sampling chunk from data source");
                self.counters.fresh_builds += 1;

                let mut vertices = VertexBuffers::default();
                self.source.fill_vertex_buffers(
                    key.lod,
                    size,
                    center,
                    worldspace,
                    &mut vertices,
                    use_composite_map,
                );

                (
                    VertexArray::new(vertices.positions),
                    VertexArray::new(vertices.normals),
                    VertexArray::new(vertices.colors),
                )
            }
        };

        let grid_resolution = grid_resolution(self.cell_vertices, size, key.lod);
        let index_buffer = self.buffers.get_index_buffer(grid_resolution, key.lod_flags);
        let uv_buffer = self.buffers.get_uv_buffer(grid_resolution);
        debug_assert_eq!(index_buffer.num_vertices(), positions.len());

        let (passes, composite_map) = match template {
            Some(template) => (template.passes.clone(), template.composite_map.clone()),
            None if use_composite_map => {
                let (passes, map) = self.create_composite_map(size, center);

                (passes, Some(map))
            }
            None => {
                let passes = assemble_layer_passes(&self.source, &self.scene, size, center, worldspace, false);

                (Arc::new(passes), None)
            }
        };
        let composite_renderer = composite_map.as_ref().map(|_| self.renderer.clone());

        let cell_world_size = self.source.cell_world_size(worldspace);

        TerrainDrawable {
            key,
            chunk_size: size,
            positions,
            normals,
            colors,
            index_buffer,
            uv_buffer,
            num_uv_sets,
            passes,
            composite_map,
            composite_renderer,
            light_list: size <= 1.0,
            water_bounding_margin: size * cell_world_size / grid_resolution as f32,
            node_mask: self.node_mask,
            from_template: template.is_some(),
        }
    }

    /// Builds the composite map of a chunk, queues it for baking, and returns the single pass that draws it.
    fn create_composite_map(&mut self, size: f32, center: Point2f) -> (Arc<Vec<Pass>>, Arc<CompositeMap>) {
        let texture = Arc::new(Texture2D::composite_render_target(
            self.config.composite_map_size,
        ));
        let map = Arc::new(self.composite_builder.build(
            &self.source,
            &self.scene,
            &mut self.buffers,
            self.config.worldspace,
            size,
            center,
            texture.clone(),
        ));
        self.counters.composite_maps_built += 1;
        tracing::debug!(leaves = map.leaves().len(), "built composite map");

        if self.renderer.add_composite_map(map.clone(), false).is_err() {
            // The chunk requests an immediate bake before it is drawn.
            tracing::debug!("composite map left unqueued");
        }

        let use_shaders = self.scene.force_shaders() || !self.scene.clamp_lighting();
        let passes = create_passes(
            use_shaders,
            &[TextureLayer::diffuse_only(texture)],
            &[],
            1.0,
            1.0,
        );

        (Arc::new(passes), map)
    }

    pub fn report_stats(&self, frame: u32) -> ChunkManagerStats {
        let BuildCounters {
            hits,
            template_reuses,
            fresh_builds,
            composite_maps_built,
        } = self.counters;

        ChunkManagerStats {
            frame,
            cache_size: self.cache.len(),
            hits,
            template_reuses,
            fresh_builds,
            composite_maps_built,
        }
    }

    /// Refresh chunks still referenced outside the cache and evict those that expired. Returns the number evicted.
    pub fn update_cache(&mut self, now: Instant) -> usize {
        let evicted = self.cache.evict_expired(now);
        if evicted > 0 {
            tracing::debug!(evicted, remaining = self.cache.len(), "evicted terrain chunks");
        }

        evicted
    }

    /// Forget all cached chunks, shared buffers and composite map geometry. Chunks held elsewhere stay alive.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
        self.buffers.clear();
        self.composite_builder.clear();
    }

    /// Release the GPU objects of everything cached, without dropping any CPU data. Returns the number of GPU objects
    /// released.
    pub fn release_gl_objects(&self, ctx: &mut (impl GraphicsContext + ?Sized)) -> usize {
        let mut released = 0;
        for (_, chunk) in self.cache.iter() {
            released += chunk.release_gl_objects(ctx);
        }
        released += self.buffers.release_all(ctx);
        released += self.composite_builder.release_gl_objects(ctx);

        released
    }
}

fn effective_lod(lod: u8, lod_flags: LodFlags) -> u8 {
    match lod_flags.vertex_lod() {
        0 => lod,
        vertex_lod => vertex_lod,
    }
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝

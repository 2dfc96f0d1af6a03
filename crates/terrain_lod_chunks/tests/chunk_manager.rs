use terrain_lod_chunks::prelude::*;
use terrain_lod_chunks::{BlendFunc, CompositeDrawable, ConfigError};
use terrain_lod_core::{Direction, LodFlags, Point3f, PointN};

use utilities::{FlatTerrain, RecordingBackend, RecordingContext, TestScene};

use pretty_assertions::assert_eq;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::sync::Arc;
use std::time::{Duration, Instant};

type TestManager = ChunkManager<Arc<FlatTerrain>, Arc<TestScene>>;

const VIEW_POINT: Point3f = PointN([0.0, 0.0, 0.0]);

fn config_with_threshold(threshold: f32) -> ChunkManagerConfig {
    ChunkManagerConfig {
        composite_map_level: threshold,
        max_composite_geometry_size: threshold,
        ..Default::default()
    }
}

fn renderer() -> Arc<CompositeMapRenderer> {
    Arc::new(CompositeMapRenderer::new(&CompositeMapRendererConfig::default()).unwrap())
}

fn manager_with(terrain: FlatTerrain, scene: TestScene, config: ChunkManagerConfig) -> TestManager {
    ChunkManager::new(Arc::new(terrain), Arc::new(scene), renderer(), config).unwrap()
}

fn manager() -> TestManager {
    manager_with(FlatTerrain::default(), TestScene::default(), config_with_threshold(4.0))
}

#[test]
fn repeated_request_is_served_from_cache() {
    let mut manager = manager();

    let first = manager.get_chunk(1.0, PointN([0.0, 0.0]), 0, LodFlags::NONE, VIEW_POINT, false);
    let second = manager.get_chunk(1.0, PointN([0.0, 0.0]), 0, LodFlags::NONE, VIEW_POINT, false);

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(manager.data_source().num_vertex_fills(), 1);
    assert_eq!(manager.data_source().num_blendmap_requests(), 1);

    let stats = manager.report_stats(7);
    assert_eq!(stats.frame, 7);
    assert_eq!(stats.cache_size, 1);
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.fresh_builds, 1);
}

#[test]
fn random_requests_sample_each_template_once() {
    let mut rng = StdRng::seed_from_u64(0xc0ffee);
    let mut manager = manager();
    let mut held = Vec::new();

    for _ in 0..200 {
        let center = PointN([rng.gen_range(-4..4) as f32, rng.gen_range(-4..4) as f32]);
        let lod = rng.gen_range(0..2);
        let flags = Direction::ALL
            .iter()
            .fold(LodFlags::NONE, |flags, &d| flags.with_edge_delta(d, rng.gen_range(0..2)));

        let chunk = manager.get_chunk(1.0, center, lod, flags, VIEW_POINT, false);
        let fills = manager.data_source().num_vertex_fills();
        let again = manager.get_chunk(1.0, center, lod, flags, VIEW_POINT, false);

        assert!(Arc::ptr_eq(&chunk, &again));
        assert_eq!(manager.data_source().num_vertex_fills(), fills);
        assert_eq!(chunk.index_buffer().num_vertices(), chunk.num_vertices());
        held.push(chunk);
    }

    // At most one fresh build per (center, lod).
    assert!(manager.data_source().num_vertex_fills() <= 8 * 8 * 2);
    assert_eq!(
        manager.report_stats(0).fresh_builds as usize,
        manager.data_source().num_vertex_fills()
    );
}

#[test]
fn flat_unit_chunk_has_full_grid_and_no_composite_map() {
    let mut manager = manager();

    let chunk = manager.get_chunk(1.0, PointN([0.0, 0.0]), 0, LodFlags::NONE, VIEW_POINT, false);

    assert_eq!(chunk.num_vertices(), 25);
    assert_eq!(chunk.normals().len(), 25);
    assert_eq!(chunk.colors().len(), 25);
    assert_eq!(chunk.index_buffer().num_vertices(), chunk.num_vertices());
    assert_eq!(chunk.index_buffer().indices().num_triangles(), 32);
    assert!(chunk.positions().as_slice().iter().all(|p| p[2] == 0.0));

    assert!(chunk.composite_map().is_none());
    assert_eq!(chunk.num_uv_sets(), 2);
    assert!(chunk.uv_sets().all(|uvs| Arc::ptr_eq(uvs, chunk.uv_buffer())));
    // One pass per layer of the data source.
    assert_eq!(chunk.passes().len(), 2);
    assert!(chunk.uses_light_list());
    assert!(!chunk.is_from_template());
}

#[test]
fn flag_variants_copy_template_geometry() {
    let mut manager = manager();
    let center = PointN([2.0, -3.0]);
    let stitched = LodFlags::NONE.with_edge_delta(Direction::East, 1);

    let template = manager.get_chunk(1.0, center, 0, LodFlags::NONE, VIEW_POINT, false);
    let variant = manager.get_chunk(1.0, center, 0, stitched, VIEW_POINT, false);

    assert_eq!(manager.data_source().num_vertex_fills(), 1);
    assert!(variant.is_from_template());
    assert!(!Arc::ptr_eq(&template, &variant));

    // Equal contents in distinct storage.
    assert_eq!(variant.positions().as_slice(), template.positions().as_slice());
    assert_eq!(variant.normals().as_slice(), template.normals().as_slice());
    assert_eq!(variant.colors().as_slice(), template.colors().as_slice());
    assert_ne!(
        variant.positions().as_slice().as_ptr(),
        template.positions().as_slice().as_ptr()
    );
    assert_ne!(
        variant.colors().as_slice().as_ptr(),
        template.colors().as_slice().as_ptr()
    );

    // State is shared, stitching is not.
    assert!(Arc::ptr_eq(variant.passes(), template.passes()));
    assert!(!Arc::ptr_eq(variant.index_buffer(), template.index_buffer()));
    assert!(Arc::ptr_eq(variant.uv_buffer(), template.uv_buffer()));

    assert_eq!(manager.report_stats(0).template_reuses, 1);
}

#[test]
fn template_must_match_center_and_lod() {
    let mut manager = manager();

    manager.get_chunk(1.0, PointN([0.0, 0.0]), 0, LodFlags::NONE, VIEW_POINT, false);
    let other_lod = manager.get_chunk(1.0, PointN([0.0, 0.0]), 1, LodFlags::NONE, VIEW_POINT, false);
    let other_center = manager.get_chunk(1.0, PointN([1.0, 0.0]), 0, LodFlags::NONE, VIEW_POINT, false);

    assert!(!other_lod.is_from_template());
    assert!(!other_center.is_from_template());
    assert_eq!(other_lod.num_vertices(), 9);
    assert_eq!(manager.data_source().num_vertex_fills(), 3);
}

#[test]
fn index_buffers_are_shared_by_resolution_and_flags() {
    let mut manager = manager();
    let stitched = LodFlags::NONE.with_edge_delta(Direction::North, 1);

    let a = manager.get_chunk(1.0, PointN([0.0, 0.0]), 0, stitched, VIEW_POINT, false);
    let b = manager.get_chunk(1.0, PointN([5.0, 5.0]), 0, stitched, VIEW_POINT, false);
    let c = manager.get_chunk(1.0, PointN([9.0, 9.0]), 0, LodFlags::NONE, VIEW_POINT, false);

    assert!(Arc::ptr_eq(a.index_buffer(), b.index_buffer()));
    assert!(!Arc::ptr_eq(a.index_buffer(), c.index_buffer()));
    assert_eq!(manager.buffer_cache().num_index_buffers(), 2);
    assert_eq!(manager.buffer_cache().num_uv_buffers(), 1);
}

#[test]
fn large_chunk_builds_subdivided_composite_map() {
    let mut manager = manager();

    let chunk = manager.get_chunk(8.0, PointN([0.0, 0.0]), 2, LodFlags::NONE, VIEW_POINT, false);

    let map = chunk.composite_map().expect("composite map");
    assert_eq!(map.leaves().len(), 4);
    for leaf in map.leaves() {
        assert_eq!(leaf.chunk_size, 4.0);
        // Two layers and the vertex color detail.
        assert_eq!(leaf.drawables.len(), 3);
        match leaf.drawables.last() {
            Some(CompositeDrawable::Detail {
                geometry, colors, blend,
            }) => {
                assert_eq!(*blend, BlendFunc::MULTIPLY);
                assert_eq!(colors.len(), geometry.positions().len());
                assert_eq!(geometry.positions().len(), 17 * 17);
            }
            other => panic!("expected detail drawable, got {:?}", other),
        }
        for drawable in leaf.drawables[..2].iter() {
            match drawable {
                CompositeDrawable::Layer { pass, .. } => {
                    assert!(!pass.use_shaders);
                    assert!(pass.normal_map.is_none());
                }
                other => panic!("expected layer drawable, got {:?}", other),
            }
        }
    }

    let total_area: f32 = map.leaves().iter().map(|leaf| leaf.tex_coords.area()).sum();
    assert!((total_area - 1.0).abs() < 1e-5);

    // Drawn with the baked texture alone.
    assert_eq!(chunk.num_uv_sets(), 1);
    assert_eq!(chunk.passes().len(), 1);
    assert!(Arc::ptr_eq(&chunk.passes()[0].diffuse_map, map.texture()));
    assert_eq!(map.texture().width(), 512);
    assert!(!chunk.uses_light_list());

    assert_eq!(manager.data_source().num_composite_fills(), 4);
    assert_eq!(manager.renderer().num_pending(), 1);
    assert_eq!(manager.report_stats(0).composite_maps_built, 1);
}

#[test]
fn composite_geometry_is_memoized_across_chunks() {
    let mut manager = manager();

    let a = manager.get_chunk(8.0, PointN([0.0, 0.0]), 2, LodFlags::NONE, VIEW_POINT, false);
    let b = manager.get_chunk(8.0, PointN([8.0, 0.0]), 2, LodFlags::NONE, VIEW_POINT, false);

    assert_eq!(manager.composite_map_builder().num_geometry_templates(), 4);

    let detail_geometry = |chunk: &TerrainDrawable| -> Vec<_> {
        chunk
            .composite_map()
            .unwrap()
            .drawables()
            .filter_map(|d| match d {
                CompositeDrawable::Detail { geometry, .. } => Some(geometry.clone()),
                _ => None,
            })
            .collect()
    };
    for (ga, gb) in detail_geometry(&a).iter().zip(detail_geometry(&b).iter()) {
        assert!(Arc::ptr_eq(ga, gb));
    }
}

#[test]
fn template_clone_shares_composite_map() {
    let mut manager = manager();
    let stitched = LodFlags::NONE.with_edge_delta(Direction::South, 1);

    let template = manager.get_chunk(8.0, PointN([0.0, 0.0]), 2, LodFlags::NONE, VIEW_POINT, false);
    let variant = manager.get_chunk(8.0, PointN([0.0, 0.0]), 2, stitched, VIEW_POINT, false);

    assert!(Arc::ptr_eq(
        template.composite_map().unwrap(),
        variant.composite_map().unwrap()
    ));
    assert_eq!(manager.report_stats(0).composite_maps_built, 1);
    assert_eq!(manager.renderer().num_pending(), 1);
}

#[test]
fn composite_map_is_baked_once_before_drawing() {
    let mut manager = manager();
    let mut backend = RecordingBackend::default();

    let chunk = manager.get_chunk(8.0, PointN([0.0, 0.0]), 2, LodFlags::NONE, VIEW_POINT, false);
    assert!(chunk.request_composite_render());
    assert_eq!(manager.renderer().num_immediate(), 1);

    let stats = manager.renderer().render_frame(&mut backend);

    assert_eq!(stats.immediate_rendered, 1);
    assert_eq!(backend.maps_rendered, 1);
    assert_eq!(backend.drawables_rendered, 12);
    assert!(chunk.composite_map().unwrap().is_rendered());
    assert!(!chunk.request_composite_render());
}

#[test]
fn only_fresh_chunks_are_queued_for_compilation() {
    let mut manager = manager();
    let stitched = LodFlags::NONE.with_edge_delta(Direction::West, 1);

    let fresh = manager.get_chunk(1.0, PointN([0.0, 0.0]), 0, LodFlags::NONE, VIEW_POINT, true);
    manager.get_chunk(1.0, PointN([0.0, 0.0]), 0, stitched, VIEW_POINT, true);
    manager.get_chunk(1.0, PointN([3.0, 0.0]), 0, LodFlags::NONE, VIEW_POINT, false);

    let queue = manager.scene_manager().incremental_compile_queue().unwrap();
    assert_eq!(queue.len(), 1);

    let mut ctx = RecordingContext::default();
    assert_eq!(queue.compile(&mut ctx, 4), 1);
    assert!(queue.is_empty());
    assert!(fresh.positions().gpu_handle().is_some());
    assert!(fresh.index_buffer().gpu_slot().is_resident());
}

#[test]
fn compile_queue_respects_object_limit() {
    let mut manager = manager();
    for i in 0..5 {
        manager.get_chunk(1.0, PointN([i as f32, 0.0]), 0, LodFlags::NONE, VIEW_POINT, true);
    }

    let queue = manager.scene_manager().incremental_compile_queue().unwrap();
    let mut ctx = RecordingContext::default();

    assert_eq!(queue.compile(&mut ctx, 2), 2);
    assert_eq!(queue.len(), 3);
    assert_eq!(queue.compile(&mut ctx, 10), 3);
}

#[test]
fn missing_compile_queue_is_tolerated() {
    let mut manager = manager_with(
        FlatTerrain::default(),
        TestScene::without_compile_queue(),
        config_with_threshold(4.0),
    );

    let chunk = manager.get_chunk(1.0, PointN([0.0, 0.0]), 0, LodFlags::NONE, VIEW_POINT, true);

    assert_eq!(chunk.num_vertices(), 25);
}

#[test]
fn referenced_chunks_survive_eviction() {
    let mut manager = manager();

    let held = manager.get_chunk(1.0, PointN([0.0, 0.0]), 0, LodFlags::NONE, VIEW_POINT, false);
    manager.get_chunk(1.0, PointN([1.0, 0.0]), 0, LodFlags::NONE, VIEW_POINT, false);
    let t0 = Instant::now();

    assert_eq!(manager.update_cache(t0 + Duration::from_secs(100)), 1);
    assert_eq!(manager.cache_size(), 1);

    drop(held);
    assert_eq!(manager.update_cache(t0 + Duration::from_secs(104)), 0);
    assert_eq!(manager.update_cache(t0 + Duration::from_secs(106)), 1);
    assert_eq!(manager.cache_size(), 0);
}

#[test]
fn clear_cache_forces_rebuild() {
    let mut manager = manager();

    let held = manager.get_chunk(1.0, PointN([0.0, 0.0]), 0, LodFlags::NONE, VIEW_POINT, false);
    manager.clear_cache();

    assert_eq!(manager.cache_size(), 0);
    assert_eq!(manager.buffer_cache().num_index_buffers(), 0);
    assert_eq!(held.num_vertices(), 25);

    let rebuilt = manager.get_chunk(1.0, PointN([0.0, 0.0]), 0, LodFlags::NONE, VIEW_POINT, false);
    assert!(!Arc::ptr_eq(&held, &rebuilt));
    assert_eq!(manager.data_source().num_vertex_fills(), 2);
}

#[test]
fn release_gl_objects_frees_everything_compiled() {
    let mut manager = manager();
    let mut ctx = RecordingContext::default();

    let chunk = manager.get_chunk(1.0, PointN([0.0, 0.0]), 0, LodFlags::NONE, VIEW_POINT, false);
    // 3 vertex arrays, shared indices and UVs, 2 diffuse maps and 1 blend map.
    let created = chunk.compile(&mut ctx);
    assert_eq!(created, 8);

    assert_eq!(manager.release_gl_objects(&mut ctx), created);
    assert_eq!(ctx.num_live(), 0);

    // CPU data is untouched and can be uploaded again.
    assert_eq!(manager.cache_size(), 1);
    assert_eq!(chunk.compile(&mut ctx), created);
}

#[test]
fn release_gl_objects_frees_baked_composite_maps() {
    let mut manager = manager();
    let mut backend = RecordingBackend::default();

    let chunk = manager.get_chunk(8.0, PointN([0.0, 0.0]), 2, LodFlags::NONE, VIEW_POINT, false);
    assert!(chunk.request_composite_render());
    manager.renderer().render_frame(&mut backend);

    // Render target, then per leaf: 2 diffuse maps, 1 blend map, leaf positions and leaf colors.
    let created = backend.ctx.num_created();
    assert_eq!(created, 1 + 4 * 5);

    assert_eq!(manager.release_gl_objects(&mut backend.ctx), created);
    assert_eq!(backend.ctx.num_live(), 0);
    assert!(!chunk.composite_map().unwrap().is_rendered());
}

#[test]
fn chunks_below_one_grid_interval_degenerate_to_a_single_vertex() {
    let mut manager = manager();

    let chunk = manager.get_chunk(0.25, PointN([0.0, 0.0]), 2, LodFlags::NONE, VIEW_POINT, false);

    assert_eq!(chunk.num_vertices(), 1);
    assert_eq!(chunk.index_buffer().num_vertices(), 1);
    assert!(chunk.index_buffer().indices().is_empty());
}

#[test]
fn node_mask_and_water_margin_are_stamped() {
    let mut manager = manager();
    manager.set_node_mask(0x4);

    let chunk = manager.get_chunk(1.0, PointN([0.0, 0.0]), 0, LodFlags::NONE, VIEW_POINT, false);

    assert_eq!(chunk.node_mask(), 0x4);
    assert_eq!(chunk.water_bounding_margin(), 8192.0 / 5.0);
}

#[test]
fn vertex_lod_in_flags_overrides_lod() {
    let mut manager = manager();

    let chunk = manager.get_chunk(
        1.0,
        PointN([0.0, 0.0]),
        0,
        LodFlags::NONE.with_vertex_lod(1),
        VIEW_POINT,
        false,
    );

    assert_eq!(chunk.key().lod, 1);
    assert_eq!(chunk.num_vertices(), 9);
    assert_eq!(chunk.index_buffer().num_vertices(), 9);
}

#[test]
fn shader_requirements_follow_scene_and_layers() {
    let mut scene = TestScene::default();
    scene.force_shaders = true;
    let mut forced = manager_with(FlatTerrain::default(), scene, config_with_threshold(4.0));
    let chunk = forced.get_chunk(1.0, PointN([0.0, 0.0]), 0, LodFlags::NONE, VIEW_POINT, false);
    assert!(chunk.passes().iter().all(|p| p.use_shaders));

    let mut terrain = FlatTerrain::default();
    terrain.normal_maps = true;
    let mut with_normal_maps = manager_with(terrain, TestScene::default(), config_with_threshold(4.0));
    let chunk = with_normal_maps.get_chunk(1.0, PointN([0.0, 0.0]), 0, LodFlags::NONE, VIEW_POINT, false);
    assert!(chunk.passes().iter().all(|p| p.use_shaders && p.normal_map.is_some()));

    let mut fixed_function = manager();
    let chunk = fixed_function.get_chunk(1.0, PointN([0.0, 0.0]), 0, LodFlags::NONE, VIEW_POINT, false);
    assert!(chunk.passes().iter().all(|p| !p.use_shaders));
}

#[test]
fn invalid_configuration_fails_fast() {
    let result = ChunkManager::new(
        Arc::new(FlatTerrain::default()),
        Arc::new(TestScene::default()),
        renderer(),
        ChunkManagerConfig {
            max_composite_geometry_size: 0.0,
            ..Default::default()
        },
    );
    assert_eq!(
        result.err(),
        Some(ConfigError::NonPositiveCompositeGeometrySize(0.0))
    );

    let mut terrain = FlatTerrain::default();
    terrain.cell_vertices = 1;
    let result = ChunkManager::new(
        Arc::new(terrain),
        Arc::new(TestScene::default()),
        renderer(),
        ChunkManagerConfig::default(),
    );
    assert_eq!(result.err(), Some(ConfigError::InvalidCellVertices(1)));

    let mut terrain = FlatTerrain::default();
    terrain.cell_vertices = 65;
    let result = ChunkManager::new(
        Arc::new(terrain),
        Arc::new(TestScene::default()),
        renderer(),
        ChunkManagerConfig {
            max_composite_geometry_size: 0.01,
            ..Default::default()
        },
    );
    assert_eq!(
        result.err(),
        Some(ConfigError::CompositeGeometryBelowOneInterval {
            size: 0.01,
            cell_vertices: 65
        })
    );
}

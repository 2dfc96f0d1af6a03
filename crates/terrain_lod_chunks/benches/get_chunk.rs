use terrain_lod_chunks::prelude::*;
use terrain_lod_core::{Direction, LodFlags, Point3f, PointN};
use utilities::{FlatTerrain, TestScene};

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;

const VIEW_POINT: Point3f = PointN([0.0, 0.0, 0.0]);

fn new_manager() -> ChunkManager<FlatTerrain, TestScene> {
    let renderer = CompositeMapRenderer::new(&CompositeMapRendererConfig {
        pending_capacity: 1 << 16,
        ..Default::default()
    })
    .unwrap();
    let config = ChunkManagerConfig {
        composite_map_level: 8.0,
        max_composite_geometry_size: 2.0,
        ..Default::default()
    };

    ChunkManager::new(
        FlatTerrain::default(),
        TestScene::without_compile_queue(),
        Arc::new(renderer),
        config,
    )
    .unwrap()
}

fn get_chunk_fresh(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_chunk_fresh");
    for size in [1.0f32, 4.0, 16.0].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter_with_setup(new_manager, |mut manager| {
                black_box(manager.get_chunk(size, PointN([0.0, 0.0]), 0, LodFlags::NONE, VIEW_POINT, false))
            });
        });
    }
    group.finish();
}

fn get_chunk_from_template(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_chunk_from_template");
    let stitched = LodFlags::NONE.with_edge_delta(Direction::North, 1);
    for size in [1.0f32, 4.0].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter_with_setup(
                || {
                    let mut manager = new_manager();
                    manager.get_chunk(size, PointN([0.0, 0.0]), 0, LodFlags::NONE, VIEW_POINT, false);

                    manager
                },
                |mut manager| {
                    black_box(manager.get_chunk(size, PointN([0.0, 0.0]), 0, stitched, VIEW_POINT, false))
                },
            );
        });
    }
    group.finish();
}

fn get_chunk_cached(c: &mut Criterion) {
    let mut manager = new_manager();
    manager.get_chunk(1.0, PointN([0.0, 0.0]), 0, LodFlags::NONE, VIEW_POINT, false);

    c.bench_function("get_chunk_cached", |b| {
        b.iter(|| black_box(manager.get_chunk(1.0, PointN([0.0, 0.0]), 0, LodFlags::NONE, VIEW_POINT, false)))
    });
}

criterion_group!(benches, get_chunk_fresh, get_chunk_from_template, get_chunk_cached);
criterion_main!(benches);

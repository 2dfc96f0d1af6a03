use terrain_lod_core::{Direction, LodFlags};
use terrain_lod_mesh::{grid_uvs, stitched_grid_indices};

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn stitched_indices(c: &mut Criterion) {
    let mut group = c.benchmark_group("stitched_grid_indices");
    let flags = LodFlags::NONE
        .with_edge_delta(Direction::North, 1)
        .with_edge_delta(Direction::West, 2);
    for size in GRID_SIZES.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| black_box(stitched_grid_indices(size, flags)));
        });
    }
    group.finish();
}

fn unstitched_indices(c: &mut Criterion) {
    let mut group = c.benchmark_group("unstitched_grid_indices");
    for size in GRID_SIZES.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| black_box(stitched_grid_indices(size, LodFlags::NONE)));
        });
    }
    group.finish();
}

fn uvs(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_uvs");
    for size in GRID_SIZES.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| black_box(grid_uvs(size)));
        });
    }
    group.finish();
}

const GRID_SIZES: [u32; 3] = [17, 65, 257];

criterion_group!(benches, stitched_indices, unstitched_indices, uvs);
criterion_main!(benches);

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use glam::UVec2;

use occupancy_grid_map::grid::{CellState, FrameGrid};
use occupancy_grid_map::iterators::BresenhamLine;
use occupancy_grid_map::raycast::cast_ray;
use occupancy_grid_map::types::MapInfo;

fn bench_line_iterator(c: &mut Criterion) {
    let rays = build_rays();

    c.bench_function("bresenham_steps_only", |b| {
        b.iter(|| {
            let mut steps = 0usize;
            for (start, end) in &rays {
                steps += BresenhamLine::between(*start, *end).count();
            }
            black_box(steps);
        });
    });

    c.bench_function("bresenham_cell_count", |b| {
        b.iter(|| {
            let mut steps = 0usize;
            for (start, end) in &rays {
                steps += BresenhamLine::cell_count(start.as_ivec2(), end.as_ivec2());
            }
            black_box(steps);
        });
    });

    c.bench_function("cast_ray_write", |b| {
        b.iter_batched(
            || build_empty_grid(256, 256, 0.05),
            |mut grid| {
                for (start, end) in &rays {
                    cast_ray(&mut grid, *start, *end, true);
                }
                black_box(grid);
            },
            BatchSize::SmallInput,
        );
    });
}

fn build_empty_grid(width: u32, height: u32, resolution: f32) -> FrameGrid {
    let info = MapInfo {
        width,
        height,
        resolution,
        ..Default::default()
    };
    FrameGrid::filled(info, CellState::Unknown).expect("grid should build")
}

/// A fan of rays from the grid center to every border cell, every fourth cell.
fn build_rays() -> Vec<(UVec2, UVec2)> {
    let center = UVec2::new(128, 128);
    let mut rays = Vec::new();
    for i in (0..256).step_by(4) {
        rays.push((center, UVec2::new(i, 0)));
        rays.push((center, UVec2::new(i, 255)));
        rays.push((center, UVec2::new(0, i)));
        rays.push((center, UVec2::new(255, i)));
    }
    rays
}

criterion_group!(benches, bench_line_iterator);
criterion_main!(benches);

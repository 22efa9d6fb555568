use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use glam::{UVec2, Vec2, Vec3};

use occupancy_grid_map::fusion::{BayesFilterUpdater, FusionConfig};
use occupancy_grid_map::grid::{CellState, FrameGrid};
use occupancy_grid_map::types::{FramePoses, MapInfo, Pose};
use occupancy_grid_map::{FrameInput, MapperConfig, OccupancyGridMapper};

fn bench_fusion(c: &mut Criterion) {
    let info = MapInfo::square(200, 0.5);
    let updater = BayesFilterUpdater::new(info.clone(), FusionConfig::default())
        .expect("updater should build");
    let frame = build_frame(&info);

    c.bench_function("bayes_update_200x200", |b| {
        b.iter_batched(
            || updater.clone(),
            |mut updater| {
                let stats = updater.update(&frame).expect("shapes match");
                black_box((updater, stats));
            },
            BatchSize::LargeInput,
        );
    });

    let mut mapper = OccupancyGridMapper::new(MapperConfig::default()).expect("mapper should build");
    let (obstacle, raw) = build_clouds();
    c.bench_function("mapper_process_frame", |b| {
        b.iter(|| {
            let input = FrameInput {
                obstacle_points: &obstacle,
                raw_points: &raw,
                poses: Some(FramePoses::colocated(Pose::from_xy(0.0, 0.0))),
            };
            black_box(mapper.process_frame(&input).expect("frame should fuse"));
        });
    });
}

/// Frame with a free disc and an occupied ring.
fn build_frame(info: &MapInfo) -> FrameGrid {
    let mut frame = FrameGrid::empty(info.clone()).expect("grid should build");
    let center = UVec2::new(info.width / 2, info.height / 2).as_vec2();
    for y in 0..info.height {
        for x in 0..info.width {
            let d = UVec2::new(x, y).as_vec2().distance(center);
            let state = if d < 60.0 {
                CellState::Free
            } else if d < 62.0 {
                CellState::Occupied
            } else {
                CellState::Unknown
            };
            frame.set(UVec2::new(x, y), state).expect("cell in range");
        }
    }
    frame
}

fn build_clouds() -> (Vec<Vec3>, Vec<Vec3>) {
    let raw: Vec<Vec3> = (0..720)
        .map(|i| {
            let angle = std::f32::consts::TAU * i as f32 / 720.0;
            (Vec2::from_angle(angle) * 30.0).extend(0.5)
        })
        .collect();
    let obstacle = raw.iter().step_by(3).copied().collect();
    (obstacle, raw)
}

criterion_group!(benches, bench_fusion);
criterion_main!(benches);

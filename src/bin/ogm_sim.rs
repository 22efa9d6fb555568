//! Drive the mapper with a simulated 2D lidar in a walled room and save the
//! fused map as a PNG.
//!
//! usage: ogm_sim [config.yaml] [output.png]

use std::error::Error;
use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use tracing::info;
use tracing_subscriber::EnvFilter;

use occupancy_grid_map::visualization::save_snapshot_png;
use occupancy_grid_map::{FrameInput, FramePoses, MapperConfig, OccupancyGridMapper, Pose};

const BEAMS: usize = 360;
const MAX_RANGE: f32 = 12.0;
const SENSOR_HEIGHT: f32 = 0.4;
const STEPS_PER_LEG: usize = 20;

/// Axis-aligned box in the world.
struct Block {
    min: Vec2,
    max: Vec2,
}

impl Block {
    fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Distance along `dir` at which a ray from `origin` enters the box.
    fn entry(&self, origin: Vec2, dir: Vec2) -> Option<f32> {
        let inv = dir.recip();
        let t0 = (self.min - origin) * inv;
        let t1 = (self.max - origin) * inv;
        let near = t0.min(t1).max_element();
        let far = t0.max(t1).min_element();
        (near <= far && near > 0.0).then_some(near)
    }
}

struct World {
    /// Room walls, the robot is always inside.
    room: Block,
    blocks: Vec<Block>,
}

impl World {
    fn demo() -> Self {
        Self {
            room: Block::new(Vec2::splat(-8.0), Vec2::splat(8.0)),
            blocks: vec![
                Block::new(Vec2::new(2.0, 1.0), Vec2::new(3.0, 2.0)),
                Block::new(Vec2::new(-5.0, -4.0), Vec2::new(-2.0, -3.5)),
                Block::new(Vec2::new(-1.0, 4.0), Vec2::new(0.0, 6.0)),
            ],
        }
    }

    /// Range to the first surface along `dir`, if within `MAX_RANGE`.
    fn cast(&self, origin: Vec2, dir: Vec2) -> Option<f32> {
        let inv = dir.recip();
        let t0 = (self.room.min - origin) * inv;
        let t1 = (self.room.max - origin) * inv;
        let wall = t0.max(t1).min_element();

        let hit = self
            .blocks
            .iter()
            .filter_map(|b| b.entry(origin, dir))
            .fold(wall, f32::min);
        (hit <= MAX_RANGE).then_some(hit)
    }

    /// One revolution: `(obstacle, raw)` clouds in the map frame.
    fn scan(&self, pose: &Pose) -> (Vec<Vec3>, Vec<Vec3>) {
        let origin = pose.xy();
        let mut obstacle = Vec::new();
        let mut raw = Vec::with_capacity(BEAMS);
        for i in 0..BEAMS {
            let angle = pose.yaw + TAU * i as f32 / BEAMS as f32;
            let dir = Vec2::from_angle(angle);
            match self.cast(origin, dir) {
                Some(range) => {
                    let point = (origin + dir * range).extend(SENSOR_HEIGHT);
                    obstacle.push(point);
                    raw.push(point);
                }
                None => raw.push((origin + dir * MAX_RANGE).extend(SENSOR_HEIGHT)),
            }
        }
        (obstacle, raw)
    }
}

fn trajectory() -> Vec<Pose> {
    let waypoints = [
        Vec2::new(-6.0, -6.0),
        Vec2::new(6.0, -6.0),
        Vec2::new(6.0, 6.0),
        Vec2::new(-6.0, 6.0),
    ];
    waypoints
        .iter()
        .zip(waypoints.iter().cycle().skip(1))
        .flat_map(|(&from, &to)| {
            let yaw = (to - from).to_angle();
            (0..STEPS_PER_LEG).map(move |step| {
                let p = from.lerp(to, step as f32 / STEPS_PER_LEG as f32);
                Pose::new(p.extend(0.0), yaw)
            })
        })
        .collect()
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .compact()
        .init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => MapperConfig::from_yaml_file(&path)?,
        None => MapperConfig {
            map_length: 20.0,
            map_resolution: 0.1,
            ..Default::default()
        },
    };
    let output = args.next().unwrap_or_else(|| "ogm_sim.png".to_string());

    let world = World::demo();
    let mut mapper = OccupancyGridMapper::new(config)?;
    let mut last = None;
    for pose in trajectory() {
        let (obstacle, raw) = world.scan(&pose);
        let input = FrameInput {
            obstacle_points: &obstacle,
            raw_points: &raw,
            poses: Some(FramePoses::colocated(pose)),
        };
        last = Some(mapper.process_frame(&input)?);
    }

    let snapshot = last.map(|out| out.snapshot).unwrap_or_else(|| mapper.snapshot());
    let occupied = snapshot.data.iter().filter(|&&v| v > 50).count();
    let free = snapshot.data.iter().filter(|&&v| (0..50).contains(&v)).count();
    info!(occupied, free, path = %output, "writing map");
    save_snapshot_png(&snapshot, &output)?;
    Ok(())
}

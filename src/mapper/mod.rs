//! Per-cycle orchestration: filter the clouds, build a single-frame grid around the
//! current grid origin, fuse it into the persistent map and quantize the result.
//!
//! Building a frame only reads the mapper, so it can happen outside any lock;
//! fusing needs `&mut` and is the single writer of the persistent map. See
//! [`SharedMapper`] for hosts with overlapping sensor callbacks.

pub mod config;
pub mod filter;
pub mod shared;

pub use config::MapperConfig;
pub use shared::SharedMapper;

use glam::{Vec2, Vec3};
use tracing::{debug, info, warn};

use crate::cost_value::{quantize_confidence_grid, quantize_frame_grid};
use crate::fusion::{BayesFilterUpdater, FusionStats};
use crate::grid::{ConfidenceGrid, FrameGrid};
use crate::raycast::{RaycastStats, build_frame_grid, observations_from_clouds};
use crate::types::{FramePoses, GridError, MapInfo, Pose};

/// Everything the host hands over for one cycle.
#[derive(Debug, Clone, Copy)]
pub struct FrameInput<'a> {
    /// Points classified as obstacles, map frame.
    pub obstacle_points: &'a [Vec3],
    /// All returns, map frame.
    pub raw_points: &'a [Vec3],
    /// `None` when the host could not resolve the poses for this stamp.
    pub poses: Option<FramePoses>,
}

/// Quantized map handed back to the host for publication.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSnapshot {
    pub info: MapInfo,
    /// Height of the robot when the frame was taken, for the published origin.
    pub robot_z: f32,
    /// Row-major occupancy values, see [`crate::cost_value`].
    pub data: Vec<i8>,
}

/// Counters for one cycle.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct FrameStats {
    pub obstacle_points: usize,
    pub raw_points: usize,
    pub raycast: RaycastStats,
    /// `None` in single-frame mode.
    pub fusion: Option<FusionStats>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapperOutput {
    pub snapshot: GridSnapshot,
    pub stats: FrameStats,
}

/// A raycast frame waiting to be fused.
#[derive(Debug, Clone)]
pub struct SingleFrame {
    pub grid: FrameGrid,
    pub robot: Pose,
    pub stats: FrameStats,
}

/// Read-only half of the mapper: turns a [`FrameInput`] into a [`SingleFrame`].
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    config: MapperConfig,
    /// Geometry of the persistent map, used to align frames to its lattice.
    anchor: MapInfo,
}

impl FrameBuilder {
    pub fn new(config: MapperConfig, anchor: MapInfo) -> Self {
        Self { config, anchor }
    }

    /// Origin of the frame window centered on `grid_origin`.
    fn frame_origin(&self, grid_origin: Vec2) -> Vec2 {
        let half = Vec2::new(self.anchor.world_width(), self.anchor.world_height()) * 0.5;
        let origin = grid_origin - half;
        if self.config.enable_single_frame_mode {
            return origin;
        }
        // Land exactly on the persistent lattice so fusion is a cell-for-cell update.
        self.anchor.snap_origin(origin)
    }

    pub fn build(&self, input: &FrameInput<'_>) -> Result<SingleFrame, GridError> {
        let poses = input
            .poses
            .ok_or_else(|| GridError::GeometryUnavailable("no poses for frame".to_string()))?;
        if !poses.is_finite() {
            return Err(GridError::GeometryUnavailable(
                "frame poses are not finite".to_string(),
            ));
        }

        let (obstacle, raw) = self.filter_clouds(input, &poses);

        let info = MapInfo {
            origin: self.frame_origin(poses.grid_origin.xy()),
            ..self.anchor.clone()
        };
        let observations = observations_from_clouds(&raw, &obstacle);
        let (grid, raycast) = build_frame_grid(info, poses.scan_origin.xy(), observations)?;

        Ok(SingleFrame {
            grid,
            robot: poses.robot,
            stats: FrameStats {
                obstacle_points: obstacle.len(),
                raw_points: raw.len(),
                raycast,
                fusion: None,
            },
        })
    }

    fn filter_clouds(&self, input: &FrameInput<'_>, poses: &FramePoses) -> (Vec<Vec3>, Vec<Vec3>) {
        let config = &self.config;
        let (obstacle, raw) = if config.use_height_filter {
            let z = poses.robot.position.z;
            (
                filter::crop_by_height(input.obstacle_points, z, config.min_height, config.max_height),
                filter::crop_by_height(input.raw_points, z, config.min_height, config.max_height),
            )
        } else {
            (input.obstacle_points.to_vec(), input.raw_points.to_vec())
        };

        if !config.filter_obstacle_pointcloud_by_raw_pointcloud {
            return (obstacle, raw);
        }
        let common = filter::extract_common_points(&obstacle, &raw, config.common_point_tolerance);
        if common.is_empty() {
            // Nothing matched; fall back to the unfiltered obstacles.
            (obstacle, raw)
        } else {
            (common, raw)
        }
    }
}

/// Owns the persistent map and runs complete cycles.
#[derive(Debug, Clone)]
pub struct OccupancyGridMapper {
    config: MapperConfig,
    updater: BayesFilterUpdater,
    /// Robot height of the last integrated frame.
    robot_z: f32,
}

impl OccupancyGridMapper {
    pub fn new(config: MapperConfig) -> Result<Self, GridError> {
        config.validate()?;
        let updater = BayesFilterUpdater::new(config.map_info()?, config.fusion.clone())?;
        info!(
            map_length = config.map_length,
            resolution = config.map_resolution,
            single_frame = config.enable_single_frame_mode,
            "occupancy grid mapper ready"
        );
        Ok(Self {
            config,
            updater,
            robot_z: 0.0,
        })
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    pub fn persistent_map(&self) -> &ConfidenceGrid {
        self.updater.map()
    }

    pub fn updater(&self) -> &BayesFilterUpdater {
        &self.updater
    }

    /// Quantized copy of the persistent map.
    pub fn snapshot(&self) -> GridSnapshot {
        let map = self.updater.map();
        GridSnapshot {
            info: map.info().clone(),
            robot_z: self.robot_z,
            data: quantize_confidence_grid(map),
        }
    }

    pub fn frame_builder(&self) -> FrameBuilder {
        FrameBuilder::new(self.config.clone(), self.updater.info().clone())
    }

    pub fn build_frame(&self, input: &FrameInput<'_>) -> Result<SingleFrame, GridError> {
        self.frame_builder().build(input)
    }

    /// Fuse a frame (unless in single-frame mode) and quantize the published map.
    pub fn integrate(&mut self, frame: SingleFrame) -> Result<MapperOutput, GridError> {
        let SingleFrame {
            grid,
            robot,
            mut stats,
        } = frame;

        self.robot_z = robot.position.z;
        let snapshot = if self.config.enable_single_frame_mode {
            GridSnapshot {
                info: grid.info().clone(),
                robot_z: robot.position.z,
                data: quantize_frame_grid(&grid),
            }
        } else {
            stats.fusion = Some(self.updater.update(&grid)?);
            self.snapshot()
        };

        debug!(
            obstacle_points = stats.obstacle_points,
            raw_points = stats.raw_points,
            rays = stats.raycast.rays_cast,
            skipped = stats.raycast.skipped,
            free = stats.raycast.free_cells,
            occupied = stats.raycast.occupied_cells,
            "processed frame"
        );
        Ok(MapperOutput { snapshot, stats })
    }

    /// Run one full cycle. A frame without usable poses is skipped and the
    /// persistent map is left untouched.
    pub fn process_frame(&mut self, input: &FrameInput<'_>) -> Result<MapperOutput, GridError> {
        let frame = self.build_frame(input).inspect_err(|err| {
            warn!(%err, "skipping frame");
        })?;
        self.integrate(frame)
    }

    pub fn reset(&mut self) {
        self.updater.reset();
    }
}

#[cfg(test)]
mod tests {
    use glam::{IVec2, UVec2};

    use super::*;
    use crate::fusion::FusionConfig;
    use crate::types::{LETHAL_OBSTACLE, NO_INFORMATION};

    fn small_config() -> MapperConfig {
        MapperConfig {
            map_length: 10.0,
            map_resolution: 1.0,
            use_height_filter: false,
            fusion: FusionConfig {
                l_occupied: 2.0,
                l_free: -1.0,
                l_min: -5.0,
                l_max: 5.0,
                decay_rate: 0.0,
                occupied_threshold: 2.0,
                free_threshold: -2.0,
            },
            ..Default::default()
        }
    }

    fn input<'a>(obstacle: &'a [Vec3], raw: &'a [Vec3], at: Vec2) -> FrameInput<'a> {
        FrameInput {
            obstacle_points: obstacle,
            raw_points: raw,
            poses: Some(FramePoses::colocated(Pose::from_xy(at.x, at.y))),
        }
    }

    #[test]
    fn frame_is_centered_on_grid_origin() {
        let mapper = OccupancyGridMapper::new(small_config()).unwrap();
        let frame = mapper
            .build_frame(&input(&[], &[], Vec2::new(0.2, -0.3)))
            .unwrap();
        assert_eq!(frame.grid.origin(), Vec2::new(-5.0, -5.0));
        assert_eq!(frame.grid.width(), 10);
    }

    #[test]
    fn missing_poses_skip_the_cycle() {
        let mut mapper = OccupancyGridMapper::new(small_config()).unwrap();
        let before = mapper.persistent_map().clone();
        let frame = FrameInput {
            obstacle_points: &[Vec3::new(1.0, 1.0, 0.0)],
            raw_points: &[],
            poses: None,
        };
        assert!(matches!(
            mapper.process_frame(&frame),
            Err(GridError::GeometryUnavailable(_))
        ));
        assert_eq!(mapper.persistent_map(), &before);
    }

    #[test]
    fn obstacle_is_published_after_fusion() {
        let mut mapper = OccupancyGridMapper::new(small_config()).unwrap();
        let obstacle = [Vec3::new(3.5, 0.5, 0.0)];
        let output = mapper
            .process_frame(&input(&obstacle, &obstacle, Vec2::new(0.5, 0.5)))
            .unwrap();

        let info = &output.snapshot.info;
        let cell = info.world_to_cell(Vec2::new(3.5, 0.5)).unwrap();
        let idx = (cell.y * info.width + cell.x) as usize;
        assert!(output.snapshot.data[idx] > 50);
        assert_eq!(output.snapshot.data[0], NO_INFORMATION);
        assert_eq!(output.stats.fusion.unwrap().occupied_updates, 1);
        assert_eq!(
            mapper.updater().cell_state(cell).unwrap(),
            crate::grid::CellState::Occupied
        );
    }

    #[test]
    fn single_frame_mode_does_not_touch_persistent_map() {
        let config = MapperConfig {
            enable_single_frame_mode: true,
            ..small_config()
        };
        let mut mapper = OccupancyGridMapper::new(config).unwrap();
        let before = mapper.persistent_map().clone();
        let obstacle = [Vec3::new(2.5, 2.5, 0.0)];

        let output = mapper
            .process_frame(&input(&obstacle, &[], Vec2::new(0.5, 0.5)))
            .unwrap();

        assert_eq!(mapper.persistent_map(), &before);
        assert!(output.stats.fusion.is_none());
        let cell = output.snapshot.info.world_to_cell(Vec2::new(2.5, 2.5)).unwrap();
        assert_eq!(cell, UVec2::new(7, 7));
        assert_eq!(output.snapshot.data[7 * 10 + 7], LETHAL_OBSTACLE);
    }

    #[test]
    fn height_filter_drops_points_outside_band() {
        let config = MapperConfig {
            use_height_filter: true,
            ..small_config()
        };
        let mapper = OccupancyGridMapper::new(config).unwrap();
        let obstacle = [Vec3::new(2.5, 0.5, 0.5), Vec3::new(-2.5, 0.5, 5.0)];
        let frame = mapper
            .build_frame(&input(&obstacle, &obstacle, Vec2::new(0.5, 0.5)))
            .unwrap();
        assert_eq!(frame.stats.obstacle_points, 1);
        assert_eq!(frame.stats.raw_points, 1);
    }

    #[test]
    fn obstacle_filter_falls_back_when_nothing_matches() {
        let config = MapperConfig {
            filter_obstacle_pointcloud_by_raw_pointcloud: true,
            ..small_config()
        };
        let mapper = OccupancyGridMapper::new(config).unwrap();
        let obstacle = [Vec3::new(2.5, 0.5, 0.0), Vec3::new(-2.5, 0.5, 0.0)];
        let raw = [Vec3::new(2.5, 0.5, 0.0)];

        let frame = mapper
            .build_frame(&input(&obstacle, &raw, Vec2::new(0.5, 0.5)))
            .unwrap();
        assert_eq!(frame.stats.obstacle_points, 1);

        let frame = mapper
            .build_frame(&input(&obstacle, &[Vec3::new(0.0, 4.0, 0.0)], Vec2::new(0.5, 0.5)))
            .unwrap();
        assert_eq!(frame.stats.obstacle_points, 2);
    }

    #[test]
    fn distant_jump_moves_window_and_forgets_map() {
        let mut mapper = OccupancyGridMapper::new(small_config()).unwrap();
        let obstacle = [Vec3::new(3.5, 0.5, 0.0)];
        mapper
            .process_frame(&input(&obstacle, &[], Vec2::new(0.5, 0.5)))
            .unwrap();

        let output = mapper
            .process_frame(&input(&[], &[], Vec2::new(-3.0e9, 0.0)))
            .unwrap();

        assert_eq!(output.stats.fusion.unwrap().shift, IVec2::new(-10, 0));
        assert_eq!(mapper.persistent_map().origin(), Vec2::new(-3.0e9, -5.0));
        assert!(mapper.persistent_map().data().iter().all(|l| l.is_unknown()));
        assert!(output.snapshot.data.iter().all(|&v| v == NO_INFORMATION));
    }

    #[test]
    fn reset_forgets_fused_evidence() {
        let mut mapper = OccupancyGridMapper::new(small_config()).unwrap();
        let obstacle = [Vec3::new(3.5, 0.5, 0.0)];
        mapper
            .process_frame(&input(&obstacle, &[], Vec2::new(0.5, 0.5)))
            .unwrap();
        mapper.reset();
        assert!(mapper.persistent_map().data().iter().all(|l| l.is_unknown()));
    }
}

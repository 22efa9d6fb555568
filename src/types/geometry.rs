//! Geometric and spatial types used across the grid and mapper APIs.

use glam::{UVec2, Vec2, Vec3};

/// Pose in the map frame. Only the position is used by the mapper; the yaw is
/// carried along for hosts that need it.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub yaw: f32,
}

impl Pose {
    pub fn new(position: Vec3, yaw: f32) -> Self {
        Self { position, yaw }
    }

    /// Pose at `(x, y)` on the ground plane with zero yaw.
    pub fn from_xy(x: f32, y: f32) -> Self {
        Self::new(Vec3::new(x, y, 0.0), 0.0)
    }

    #[inline]
    pub fn xy(&self) -> Vec2 {
        self.position.truncate()
    }
}

/// Poses resolved by the host for a single cycle, all expressed in the map frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FramePoses {
    /// Platform pose, carried through to the output metadata.
    pub robot: Pose,
    /// Position rays are cast from.
    pub scan_origin: Pose,
    /// Position the grid window is centered on.
    pub grid_origin: Pose,
}

impl FramePoses {
    /// Robot, scan origin and grid center all at the same pose.
    pub fn colocated(pose: Pose) -> Self {
        Self {
            robot: pose,
            scan_origin: pose,
            grid_origin: pose,
        }
    }

    /// True when every pose component is a finite number.
    pub fn is_finite(&self) -> bool {
        [self.robot, self.scan_origin, self.grid_origin]
            .iter()
            .all(|p| p.position.is_finite() && p.yaw.is_finite())
    }
}

/// Update window in cell indices. Region is [min.x, max.x) x [min.y, max.y).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellRegion {
    pub min: UVec2,
    pub max: UVec2,
}

impl CellRegion {
    pub fn new(min: UVec2, max: UVec2) -> Self {
        Self { min, max }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y
    }
}

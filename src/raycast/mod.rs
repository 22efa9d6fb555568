use std::ops::AddAssign;

use glam::{Vec2, Vec3};

use crate::grid::CellState;

pub mod frame;

pub use frame::{build_frame_grid, cast_ray, raycast_frame};

/// A range return in the map frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Observation {
    pub point: Vec2,
    /// True when the point belongs to the obstacle cloud.
    pub is_obstacle: bool,
}

impl Observation {
    pub fn obstacle(point: Vec2) -> Self {
        Self {
            point,
            is_obstacle: true,
        }
    }

    pub fn free(point: Vec2) -> Self {
        Self {
            point,
            is_obstacle: false,
        }
    }
}

/// Counters collected while casting one frame.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct RaycastStats {
    /// Observations whose ray was traced.
    pub rays_cast: usize,
    /// Observations dropped because the point or the scan origin left the grid.
    pub skipped: usize,
    /// Cells this call turned free.
    pub free_cells: usize,
    /// Cells this call turned occupied, including ones it had turned free first.
    pub occupied_cells: usize,
}

impl RaycastStats {
    /// Count a cell that was just marked into `state`.
    pub(crate) fn record_mark(&mut self, state: CellState) {
        match state {
            CellState::Free => self.free_cells += 1,
            CellState::Occupied => self.occupied_cells += 1,
            CellState::Unknown => {}
        }
    }
}

impl AddAssign for RaycastStats {
    fn add_assign(&mut self, other: Self) {
        self.rays_cast += other.rays_cast;
        self.skipped += other.skipped;
        self.free_cells += other.free_cells;
        self.occupied_cells += other.occupied_cells;
    }
}

/// Tag the two clouds of a frame. Raw returns clear space up to and including
/// their endpoint; obstacle returns additionally mark their endpoint occupied.
pub fn observations_from_clouds(raw: &[Vec3], obstacle: &[Vec3]) -> Vec<Observation> {
    raw.iter()
        .map(|p| Observation::free(p.truncate()))
        .chain(obstacle.iter().map(|p| Observation::obstacle(p.truncate())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clouds_are_tagged_by_origin() {
        let raw = [Vec3::new(1.0, 2.0, 0.3), Vec3::new(-1.0, 0.0, 0.0)];
        let obstacle = [Vec3::new(4.0, 4.0, 1.0)];
        let observations = observations_from_clouds(&raw, &obstacle);
        assert_eq!(
            observations,
            vec![
                Observation::free(Vec2::new(1.0, 2.0)),
                Observation::free(Vec2::new(-1.0, 0.0)),
                Observation::obstacle(Vec2::new(4.0, 4.0)),
            ]
        );
    }
}

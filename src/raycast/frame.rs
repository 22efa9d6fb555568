//! Single-frame ray casting into a [`FrameGrid`].

use glam::{UVec2, Vec2};

use crate::grid::{CellState, FrameGrid};
use crate::iterators::BresenhamLine;
use crate::raycast::{Observation, RaycastStats};
use crate::types::{GridError, MapInfo};

/// Trace one ray from `origin` to `target`.
///
/// Every traversed cell is marked free. The target cell is marked occupied when
/// `is_obstacle` is set. Occupied cells are never downgraded, so the result does
/// not depend on the order rays are cast in. The returned stats count this ray
/// only, with the cells it changed.
pub fn cast_ray(
    grid: &mut FrameGrid,
    origin: UVec2,
    target: UVec2,
    is_obstacle: bool,
) -> RaycastStats {
    let mut stats = RaycastStats {
        rays_cast: 1,
        ..Default::default()
    };
    let target_cell = target.as_ivec2();
    for cell in BresenhamLine::between(origin, target) {
        let observed = if is_obstacle && cell == target_cell {
            CellState::Occupied
        } else {
            CellState::Free
        };
        // Both endpoints are inside the grid, so every cell between them is too.
        let cell = cell.as_uvec2();
        debug_assert!(
            grid.info().contains_cell(cell),
            "ray {origin} -> {target} left the grid at {cell}"
        );
        if let Ok(state) = grid.get_mut(cell)
            && state.mark(observed)
        {
            stats.record_mark(*state);
        }
    }
    stats
}

/// Cast every observation of a frame from `scan_origin` into `grid`.
///
/// Observations outside the grid are skipped, as is the whole frame when the scan
/// origin itself is outside the grid.
pub fn raycast_frame<I>(grid: &mut FrameGrid, scan_origin: Vec2, observations: I) -> RaycastStats
where
    I: IntoIterator<Item = Observation>,
{
    let mut stats = RaycastStats::default();

    match grid.world_to_cell(scan_origin) {
        Ok(origin_cell) => {
            for observation in observations {
                match grid.world_to_cell(observation.point) {
                    Ok(target) => {
                        stats += cast_ray(grid, origin_cell, target, observation.is_obstacle);
                    }
                    Err(_) => stats.skipped += 1,
                }
            }
        }
        Err(_) => stats.skipped = observations.into_iter().count(),
    }
    stats
}

/// Allocate an all-unknown grid described by `info` and cast a frame into it.
pub fn build_frame_grid<I>(
    info: MapInfo,
    scan_origin: Vec2,
    observations: I,
) -> Result<(FrameGrid, RaycastStats), GridError>
where
    I: IntoIterator<Item = Observation>,
{
    let mut grid = FrameGrid::empty(info)?;
    let stats = raycast_frame(&mut grid, scan_origin, observations);
    Ok((grid, stats))
}

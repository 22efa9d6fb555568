//! Map metadata.

use glam::{IVec2, UVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::types::GridError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapInfo {
    pub width: u32,
    pub height: u32,
    pub resolution: f32,
    /// World coordinate of the lower-left corner of cell (0, 0), in meters.
    pub origin: Vec2,
}

impl Default for MapInfo {
    fn default() -> Self {
        Self {
            width: 200,
            height: 200,
            resolution: 0.5,
            origin: Vec2::ZERO,
        }
    }
}

impl MapInfo {
    /// Largest `width * height` a map may have.
    pub const MAX_CELLS: u64 = 1 << 28;

    pub fn square(width: u32, resolution: f32) -> Self {
        Self {
            width,
            height: width,
            resolution,
            ..Default::default()
        }
    }

    /// Check that the map has a non-empty cell area and a usable resolution.
    pub fn validate(&self) -> Result<(), GridError> {
        if self.width == 0 || self.height == 0 {
            return Err(GridError::InvalidDimension(format!(
                "map size {}x{} must be non-zero",
                self.width, self.height
            )));
        }
        if !self.resolution.is_finite() || self.resolution <= 0.0 {
            return Err(GridError::InvalidResolution(self.resolution));
        }
        if u64::from(self.width) * u64::from(self.height) > Self::MAX_CELLS {
            return Err(GridError::InvalidDimension(format!(
                "map size {}x{} exceeds {} cells",
                self.width,
                self.height,
                Self::MAX_CELLS
            )));
        }
        Ok(())
    }

    /// Number of cells in the map.
    #[inline]
    pub fn len(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Width of the map in world units (meters).
    #[inline]
    pub fn world_width(&self) -> f32 {
        self.width as f32 * self.resolution
    }

    /// Height of the map in world units (meters).
    #[inline]
    pub fn world_height(&self) -> f32 {
        self.height as f32 * self.resolution
    }

    /// Center of the map in world coordinates.
    #[inline]
    pub fn world_center(&self) -> Vec2 {
        self.origin + Vec2::new(0.5 * self.world_width(), 0.5 * self.world_height())
    }

    #[inline]
    pub fn contains_cell(&self, cell: UVec2) -> bool {
        cell.x < self.width && cell.y < self.height
    }

    /// Same size and resolution, origin ignored.
    pub fn same_shape(&self, other: &MapInfo) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.resolution == other.resolution
    }

    /// Whole-cell shift that moving the origin to `origin` corresponds to.
    ///
    /// Each axis is rounded to the nearest cell (halves away from zero) and clamped
    /// to the map size: a longer move leaves no overlap, however far it goes.
    pub fn origin_shift(&self, origin: Vec2) -> IVec2 {
        let size = Vec2::new(self.width as f32, self.height as f32);
        self.cells_to(origin).clamp(-size, size).as_ivec2()
    }

    /// `origin` snapped onto this map's cell lattice. Not finite when the move
    /// does not fit in an `f32`.
    pub fn snap_origin(&self, origin: Vec2) -> Vec2 {
        self.origin + self.cells_to(origin) * self.resolution
    }

    /// Unclamped move to `origin`, in whole cells.
    fn cells_to(&self, origin: Vec2) -> Vec2 {
        ((origin - self.origin) / self.resolution).round()
    }

    /// Continuous map coordinates (in cells) of a world point, without bounds checks.
    #[inline]
    pub fn world_to_map_continuous(&self, point: Vec2) -> Vec2 {
        (point - self.origin) / self.resolution
    }

    /// Cell containing the world point. Points outside the map are rejected.
    pub fn world_to_cell(&self, point: Vec2) -> Result<UVec2, GridError> {
        let map = self.world_to_map_continuous(point).floor();
        if !map.is_finite()
            || map.x < 0.0
            || map.y < 0.0
            || map.x >= self.width as f32
            || map.y >= self.height as f32
        {
            return Err(GridError::OutOfBounds {
                x: point.x,
                y: point.y,
            });
        }
        Ok(map.as_uvec2())
    }

    /// World coordinate of the center of `cell`.
    pub fn cell_to_world(&self, cell: UVec2) -> Result<Vec2, GridError> {
        if !self.contains_cell(cell) {
            return Err(self.index_error(cell));
        }
        Ok(self.origin + (cell.as_vec2() + Vec2::splat(0.5)) * self.resolution)
    }

    pub(crate) fn index_error(&self, cell: UVec2) -> GridError {
        GridError::IndexOutOfBounds {
            x: cell.x,
            y: cell.y,
            width: self.width,
            height: self.height,
        }
    }
}

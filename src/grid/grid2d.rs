use glam::{IVec2, UVec2, Vec2};

use crate::types::{CellRegion, GridError, MapInfo};

/// Dense row-major 2D grid with a movable world origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid2d<T> {
    info: MapInfo,
    data: Vec<T>,
}

impl<T> Grid2d<T> {
    pub fn new(info: MapInfo, data: Vec<T>) -> Result<Self, GridError> {
        info.validate()?;
        let expected_len = info.len();
        if data.len() != expected_len {
            return Err(GridError::InvalidDimension(format!(
                "data length {} does not match map size {}",
                data.len(),
                expected_len
            )));
        }

        Ok(Self { info, data })
    }

    pub fn info(&self) -> &MapInfo {
        &self.info
    }

    pub fn width(&self) -> u32 {
        self.info.width
    }

    pub fn height(&self) -> u32 {
        self.info.height
    }

    pub fn resolution(&self) -> f32 {
        self.info.resolution
    }

    pub fn origin(&self) -> Vec2 {
        self.info.origin
    }

    /// Move the grid in the world without touching any cell.
    pub fn set_origin(&mut self, origin: Vec2) {
        self.info.origin = origin;
    }

    pub fn get(&self, cell: UVec2) -> Result<&T, GridError> {
        let idx = self.checked_index(cell)?;
        Ok(&self.data[idx])
    }

    pub fn get_mut(&mut self, cell: UVec2) -> Result<&mut T, GridError> {
        let idx = self.checked_index(cell)?;
        Ok(&mut self.data[idx])
    }

    pub fn set(&mut self, cell: UVec2, value: T) -> Result<(), GridError> {
        let idx = self.checked_index(cell)?;
        self.data[idx] = value;
        Ok(())
    }

    fn checked_index(&self, cell: UVec2) -> Result<usize, GridError> {
        if !self.info.contains_cell(cell) {
            return Err(self.info.index_error(cell));
        }
        Ok(self.index(cell))
    }

    #[inline]
    fn index(&self, cell: UVec2) -> usize {
        (cell.y as usize) * (self.info.width as usize) + (cell.x as usize)
    }

    pub fn world_to_cell(&self, point: Vec2) -> Result<UVec2, GridError> {
        self.info.world_to_cell(point)
    }

    pub fn cell_to_world(&self, cell: UVec2) -> Result<Vec2, GridError> {
        self.info.cell_to_world(cell)
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Iterate `(cell, value)` pairs in row-major order.
    pub fn iter_cells(&self) -> impl Iterator<Item = (UVec2, &T)> {
        let width = self.info.width as usize;
        self.data
            .iter()
            .enumerate()
            .map(move |(i, v)| (UVec2::new((i % width) as u32, (i / width) as u32), v))
    }

    pub fn origin_shift(&self, origin: Vec2) -> IVec2 {
        self.info.origin_shift(origin)
    }

    /// The origin `update_origin(origin)` would settle on: the current origin moved
    /// by a whole number of cells, so the grid stays on the same world lattice.
    pub fn snap_origin(&self, origin: Vec2) -> Vec2 {
        self.info.snap_origin(origin)
    }
}

impl<T: Clone> Grid2d<T> {
    pub fn filled(info: MapInfo, value: T) -> Result<Self, GridError> {
        let len = info.len();
        Self::new(info, vec![value; len])
    }

    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Reallocate the grid. Every cell is reset to `value` and the origin is kept.
    pub fn resize(
        &mut self,
        width: u32,
        height: u32,
        resolution: f32,
        value: T,
    ) -> Result<(), GridError> {
        let info = MapInfo {
            width,
            height,
            resolution,
            origin: self.info.origin,
        };
        *self = Self::filled(info, value)?;
        Ok(())
    }

    /// Reset a rectangular region to `value`. The region is clipped to the map.
    pub fn reset_map(&mut self, region: CellRegion, value: T) {
        let max = region
            .max
            .min(UVec2::new(self.info.width, self.info.height));
        if region.min.x >= max.x || region.min.y >= max.y {
            return;
        }
        for y in region.min.y..max.y {
            let start = self.index(UVec2::new(region.min.x, y));
            let end = self.index(UVec2::new(max.x, y));
            self.data[start..end].fill(value.clone());
        }
    }

    /// Roll the window so its origin lands on `snap_origin(origin)`.
    ///
    /// Cells whose world footprint lies in both windows keep their value, cells
    /// entering the window are set to `fill`, cells leaving it are dropped. The
    /// shifted contents are built in a new buffer, so the grid is never observed
    /// half-shifted. Returns the applied shift in cells, clamped to the map size
    /// as in [`MapInfo::origin_shift`].
    pub fn update_origin(&mut self, origin: Vec2, fill: T) -> Result<IVec2, GridError> {
        let new_origin = self.snap_origin(origin);
        if !new_origin.is_finite() {
            return Err(GridError::GeometryUnavailable(format!(
                "grid origin ({}, {}) has no finite cell lattice position",
                origin.x, origin.y
            )));
        }

        let shift = self.origin_shift(origin);
        if shift == IVec2::ZERO {
            return Ok(shift);
        }

        let width = self.info.width as i32;
        let height = self.info.height as i32;
        let mut data = vec![fill; self.data.len()];

        // New cell (x, y) covers the footprint of old cell (x + shift.x, y + shift.y).
        let x0 = (-shift.x).clamp(0, width);
        let x1 = (width - shift.x).clamp(0, width);
        let y0 = (-shift.y).clamp(0, height);
        let y1 = (height - shift.y).clamp(0, height);

        if x0 < x1 {
            for y in y0..y1 {
                let dst = (y * width + x0) as usize;
                let src = ((y + shift.y) * width + x0 + shift.x) as usize;
                let len = (x1 - x0) as usize;
                data[dst..dst + len].clone_from_slice(&self.data[src..src + len]);
            }
        }

        self.data = data;
        self.info.origin = new_origin;
        Ok(shift)
    }
}

impl<T: Clone + Default> Grid2d<T> {
    /// Grid with every cell set to `T::default()`.
    pub fn empty(info: MapInfo) -> Result<Self, GridError> {
        Self::filled(info, T::default())
    }

    pub fn clear(&mut self) {
        self.fill(T::default());
    }
}

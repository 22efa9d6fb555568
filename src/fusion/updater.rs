//! Binary Bayes filter over a rolling window.
//!
//! The updater owns the persistent [`ConfidenceGrid`]. Each call to
//! [`BayesFilterUpdater::update`] first rolls the window onto the frame's origin and
//! then adds the frame's evidence cell by cell:
//!
//! ```text
//! Occupied: L' = clamp(L + l_occupied, l_min, l_max)
//! Free:     L' = clamp(L + l_free,     l_min, l_max)
//! Unknown:  L' = L  (or L decayed toward 0 when decay_rate > 0)
//! ```

use glam::{IVec2, UVec2, Vec2};
use tracing::{info, trace};

use crate::fusion::FusionConfig;
use crate::grid::{CellState, ConfidenceGrid, FrameGrid, LogOdds};
use crate::types::{GridError, MapInfo};

/// Apply one frame's observation of a cell to its prior confidence.
#[inline]
pub fn update_cell(prior: LogOdds, observed: CellState, config: &FusionConfig) -> LogOdds {
    match observed {
        CellState::Occupied => prior.update(config.l_occupied, config.l_min, config.l_max),
        CellState::Free => prior.update(config.l_free, config.l_min, config.l_max),
        CellState::Unknown if config.decay_rate > 0.0 => prior.decay(config.decay_rate),
        CellState::Unknown => prior,
    }
}

/// What a single fuse step did.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct FusionStats {
    /// Window shift applied before fusing, in cells.
    pub shift: IVec2,
    pub occupied_updates: usize,
    pub free_updates: usize,
}

#[derive(Debug, Clone)]
pub struct BayesFilterUpdater {
    config: FusionConfig,
    map: ConfidenceGrid,
}

impl BayesFilterUpdater {
    /// Persistent map described by `info`, every cell unknown.
    pub fn new(info: MapInfo, config: FusionConfig) -> Result<Self, GridError> {
        let map = ConfidenceGrid::empty(info)?;
        Self::with_map(map, config)
    }

    /// Start from an existing confidence grid, e.g. a prior map.
    pub fn with_map(map: ConfidenceGrid, config: FusionConfig) -> Result<Self, GridError> {
        config.validate()?;
        info!(
            width = map.width(),
            height = map.height(),
            resolution = map.resolution(),
            "created bayes filter updater"
        );
        Ok(Self { config, map })
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    pub fn map(&self) -> &ConfidenceGrid {
        &self.map
    }

    pub fn info(&self) -> &MapInfo {
        self.map.info()
    }

    /// Origin the persistent map will adopt when a frame asks for `origin`.
    ///
    /// Frames built at this origin line up with the persistent cells exactly.
    pub fn snap_origin(&self, origin: Vec2) -> Vec2 {
        self.map.snap_origin(origin)
    }

    /// Fuse one frame into the persistent map.
    ///
    /// The frame must have the persistent map's size and resolution. All checks
    /// run before the map is touched, so a failed update leaves it unchanged.
    pub fn update(&mut self, frame: &FrameGrid) -> Result<FusionStats, GridError> {
        if !frame.info().same_shape(self.map.info()) {
            return Err(GridError::DimensionMismatch(format!(
                "frame {}x{}@{} does not match map {}x{}@{}",
                frame.width(),
                frame.height(),
                frame.resolution(),
                self.map.width(),
                self.map.height(),
                self.map.resolution()
            )));
        }

        let shift = self.map.update_origin(frame.origin(), LogOdds::UNKNOWN)?;
        if shift != IVec2::ZERO {
            trace!(dx = shift.x, dy = shift.y, "shifted persistent map");
        }

        let mut stats = FusionStats {
            shift,
            ..Default::default()
        };
        let config = &self.config;
        for (confidence, observed) in self.map.data_mut().iter_mut().zip(frame.data()) {
            match observed {
                CellState::Occupied => stats.occupied_updates += 1,
                CellState::Free => stats.free_updates += 1,
                CellState::Unknown => {}
            }
            *confidence = update_cell(*confidence, *observed, config);
        }
        Ok(stats)
    }

    /// Forget everything: every cell back to unknown.
    pub fn reset(&mut self) {
        info!("resetting persistent occupancy map");
        self.map.clear();
    }

    /// Three-way state of a confidence under the configured thresholds.
    pub fn classify(&self, confidence: LogOdds) -> CellState {
        let value = confidence.value();
        if value >= self.config.occupied_threshold {
            CellState::Occupied
        } else if value <= self.config.free_threshold {
            CellState::Free
        } else {
            CellState::Unknown
        }
    }

    pub fn cell_state(&self, cell: UVec2) -> Result<CellState, GridError> {
        Ok(self.classify(*self.map.get(cell)?))
    }
}

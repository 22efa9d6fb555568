//! Tunable parameters of the binary Bayes filter.

use serde::{Deserialize, Serialize};

use crate::grid::LogOdds;
use crate::types::GridError;

/// Log-odds increments, saturation bounds and classification thresholds.
///
/// The defaults are calibration starting points, not derived constants:
/// - `l_occupied = 0.85` (P ≈ 0.70 per hit)
/// - `l_free = -0.4` (P ≈ 0.40 per miss), so obstacles are stickier than free space
/// - clamp at ±3.5 (P ≈ 0.03 / 0.97)
/// - no decay of unobserved cells
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FusionConfig {
    /// Evidence added when a frame sees the cell occupied. Must be > 0.
    #[serde(default = "default_l_occupied")]
    pub l_occupied: f32,

    /// Evidence added when a frame sees the cell free. Must be < 0.
    #[serde(default = "default_l_free")]
    pub l_free: f32,

    /// Lower saturation bound.
    #[serde(default = "default_l_min")]
    pub l_min: f32,

    /// Upper saturation bound.
    #[serde(default = "default_l_max")]
    pub l_max: f32,

    /// Amount an unobserved cell moves toward zero per cycle. 0 disables decay.
    #[serde(default)]
    pub decay_rate: f32,

    /// Log-odds at or above which a cell is reported occupied.
    #[serde(default = "default_occupied_threshold")]
    pub occupied_threshold: f32,

    /// Log-odds at or below which a cell is reported free.
    #[serde(default = "default_free_threshold")]
    pub free_threshold: f32,
}

fn default_l_occupied() -> f32 {
    0.85
}
fn default_l_free() -> f32 {
    -0.4
}
fn default_l_min() -> f32 {
    -3.5
}
fn default_l_max() -> f32 {
    3.5
}
fn default_occupied_threshold() -> f32 {
    0.85
}
fn default_free_threshold() -> f32 {
    -0.85
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            l_occupied: default_l_occupied(),
            l_free: default_l_free(),
            l_min: default_l_min(),
            l_max: default_l_max(),
            decay_rate: 0.0,
            occupied_threshold: default_occupied_threshold(),
            free_threshold: default_free_threshold(),
        }
    }
}

impl FusionConfig {
    /// Increments derived from per-frame hit and miss probabilities.
    pub fn from_probabilities(hit_prob: f32, miss_prob: f32) -> Self {
        Self {
            l_occupied: LogOdds::from_probability(hit_prob).value(),
            l_free: LogOdds::from_probability(miss_prob).value(),
            ..Default::default()
        }
    }

    pub fn with_decay(mut self, decay_rate: f32) -> Self {
        self.decay_rate = decay_rate;
        self
    }

    pub fn validate(&self) -> Result<(), GridError> {
        let values = [
            self.l_occupied,
            self.l_free,
            self.l_min,
            self.l_max,
            self.decay_rate,
            self.occupied_threshold,
            self.free_threshold,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(GridError::InvalidConfig(
                "fusion parameters must be finite".to_string(),
            ));
        }
        if self.l_occupied <= 0.0 {
            return Err(GridError::InvalidConfig(format!(
                "l_occupied must be > 0, got {}",
                self.l_occupied
            )));
        }
        if self.l_free >= 0.0 {
            return Err(GridError::InvalidConfig(format!(
                "l_free must be < 0, got {}",
                self.l_free
            )));
        }
        if !(self.l_min < 0.0 && self.l_max > 0.0) {
            return Err(GridError::InvalidConfig(format!(
                "clamp bounds [{}, {}] must contain 0",
                self.l_min, self.l_max
            )));
        }
        if self.decay_rate < 0.0 {
            return Err(GridError::InvalidConfig(format!(
                "decay_rate must be >= 0, got {}",
                self.decay_rate
            )));
        }
        if !(self.l_min <= self.free_threshold
            && self.free_threshold < 0.0
            && 0.0 < self.occupied_threshold
            && self.occupied_threshold <= self.l_max)
        {
            return Err(GridError::InvalidConfig(format!(
                "thresholds must satisfy l_min <= free ({}) < 0 < occupied ({}) <= l_max",
                self.free_threshold, self.occupied_threshold
            )));
        }
        Ok(())
    }
}

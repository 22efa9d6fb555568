//! Log-odds confidence stored by the persistent grid.
//!
//! `L = ln(p / (1 - p))`. Independent evidence adds in log-odds space, which keeps
//! the Bayes update a clamped sum. A value of exactly zero is treated as "no
//! information": fresh cells start there and decay returns to it.

use crate::types::{CONFIDENCE_FREE, CONFIDENCE_UNKNOWN};

#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
pub struct LogOdds(f32);

impl LogOdds {
    pub const UNKNOWN: LogOdds = LogOdds(0.0);

    pub const fn new(value: f32) -> Self {
        Self(value)
    }

    /// Log-odds of probability `p`. `p` must lie in the open interval (0, 1).
    pub fn from_probability(p: f32) -> Self {
        Self((p / (1.0 - p)).ln())
    }

    #[inline]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Occupancy probability in [0, 1].
    #[inline]
    pub fn probability(self) -> f32 {
        1.0 / (1.0 + (-self.0).exp())
    }

    #[inline]
    pub fn is_unknown(self) -> bool {
        self.0 == 0.0
    }

    /// Add `evidence` and saturate at `[min, max]`.
    #[inline]
    pub fn update(self, evidence: f32, min: f32, max: f32) -> Self {
        Self((self.0 + evidence).clamp(min, max))
    }

    /// Move toward zero by `rate` without crossing it.
    #[inline]
    pub fn decay(self, rate: f32) -> Self {
        if self.0 > 0.0 {
            Self((self.0 - rate).max(0.0))
        } else if self.0 < 0.0 {
            Self((self.0 + rate).min(0.0))
        } else {
            self
        }
    }

    /// Discretized confidence: 0 for unknown, `1 + round(p * 254)` otherwise.
    pub fn confidence_byte(self) -> u8 {
        if self.is_unknown() {
            return CONFIDENCE_UNKNOWN;
        }
        let scaled = (self.probability() * 254.0).round().clamp(0.0, 254.0) as u8;
        CONFIDENCE_FREE + scaled
    }
}

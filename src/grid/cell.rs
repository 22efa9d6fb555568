//! Per-frame cell state.

use crate::types::{CONFIDENCE_FREE, CONFIDENCE_OCCUPIED, CONFIDENCE_UNKNOWN};

/// What a single frame observed in a cell.
///
/// Variants are ordered by precedence: a frame never downgrades `Occupied` to
/// `Free`, and never forgets an observation by writing `Unknown`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CellState {
    #[default]
    Unknown,
    Free,
    Occupied,
}

impl CellState {
    /// Combine two observations of the same cell within one frame.
    #[inline]
    pub fn join(self, other: CellState) -> CellState {
        self.max(other)
    }

    /// Record `observed` into `self`, keeping the stronger observation.
    /// Returns true when the state changed.
    #[inline]
    pub fn mark(&mut self, observed: CellState) -> bool {
        let joined = self.join(observed);
        let changed = joined != *self;
        *self = joined;
        changed
    }

    /// Confidence byte used by the cost translation table.
    pub fn confidence_byte(self) -> u8 {
        match self {
            CellState::Unknown => CONFIDENCE_UNKNOWN,
            CellState::Free => CONFIDENCE_FREE,
            CellState::Occupied => CONFIDENCE_OCCUPIED,
        }
    }
}

//! Translation from internal confidence to the published occupancy alphabet.
//!
//! Confidences are first discretized to a byte (see [`LogOdds::confidence_byte`]
//! and [`CellState::confidence_byte`]); the byte then indexes a fixed 256-entry
//! table. Byte 0 is "no information" and translates to [`NO_INFORMATION`]; bytes
//! 1..=255 translate linearly to occupancy percentages 0..=100.

use crate::grid::{CellState, ConfidenceGrid, FrameGrid, LogOdds};
use crate::types::{CONFIDENCE_UNKNOWN, NO_INFORMATION};

pub static COST_TRANSLATION_TABLE: [i8; 256] = build_translation_table();

const fn build_translation_table() -> [i8; 256] {
    let mut table = [0i8; 256];
    table[CONFIDENCE_UNKNOWN as usize] = NO_INFORMATION;
    let mut i = 1;
    while i < 256 {
        table[i] = (((i - 1) * 100 + 127) / 254) as i8;
        i += 1;
    }
    table
}

#[inline]
pub fn translate(confidence_byte: u8) -> i8 {
    COST_TRANSLATION_TABLE[confidence_byte as usize]
}

#[inline]
pub fn log_odds_to_cost(confidence: LogOdds) -> i8 {
    translate(confidence.confidence_byte())
}

#[inline]
pub fn cell_state_to_cost(state: CellState) -> i8 {
    translate(state.confidence_byte())
}

/// Row-major output values for the persistent map.
pub fn quantize_confidence_grid(grid: &ConfidenceGrid) -> Vec<i8> {
    grid.data().iter().map(|&l| log_odds_to_cost(l)).collect()
}

/// Row-major output values for a single-frame map.
pub fn quantize_frame_grid(grid: &FrameGrid) -> Vec<i8> {
    grid.data().iter().map(|&s| cell_state_to_cost(s)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FREE_SPACE, LETHAL_OBSTACLE};

    #[test]
    fn table_is_total_and_monotonic() {
        assert_eq!(COST_TRANSLATION_TABLE[0], NO_INFORMATION);
        assert_eq!(COST_TRANSLATION_TABLE[1], FREE_SPACE);
        assert_eq!(COST_TRANSLATION_TABLE[255], LETHAL_OBSTACLE);
        for pair in COST_TRANSLATION_TABLE.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
        assert!(COST_TRANSLATION_TABLE.iter().all(|&v| (-1..=100).contains(&v)));
    }

    #[test]
    fn even_odds_map_to_fifty() {
        assert_eq!(log_odds_to_cost(LogOdds::new(1e-4)), 50);
        assert_eq!(log_odds_to_cost(LogOdds::new(-1e-4)), 50);
    }

    #[test]
    fn frame_states_map_to_extremes() {
        assert_eq!(cell_state_to_cost(CellState::Unknown), NO_INFORMATION);
        assert_eq!(cell_state_to_cost(CellState::Free), FREE_SPACE);
        assert_eq!(cell_state_to_cost(CellState::Occupied), LETHAL_OBSTACLE);
    }

    #[test]
    fn higher_confidence_gives_higher_cost() {
        let low = log_odds_to_cost(LogOdds::new(-2.0));
        let mid = log_odds_to_cost(LogOdds::new(0.5));
        let high = log_odds_to_cost(LogOdds::new(3.0));
        assert!(FREE_SPACE <= low && low < mid && mid < high && high <= LETHAL_OBSTACLE);
        assert_eq!(log_odds_to_cost(LogOdds::UNKNOWN), NO_INFORMATION);
    }
}

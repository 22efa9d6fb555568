/// Output value for cells with no information.
pub const NO_INFORMATION: i8 = -1;
/// Output value for certainly free cells.
pub const FREE_SPACE: i8 = 0;
/// Output value for certainly occupied cells.
pub const LETHAL_OBSTACLE: i8 = 100;

/// Confidence byte reserved for the unknown state.
pub const CONFIDENCE_UNKNOWN: u8 = 0;
/// Confidence byte of a cell with probability 0.
pub const CONFIDENCE_FREE: u8 = 1;
/// Confidence byte of a cell with probability 1.
pub const CONFIDENCE_OCCUPIED: u8 = u8::MAX;

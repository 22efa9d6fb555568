pub mod cell;
pub mod grid2d;
pub mod log_odds;

pub use cell::CellState;
pub use grid2d::Grid2d;
pub use log_odds::LogOdds;

/// Instantaneous grid built from a single frame.
pub type FrameGrid = Grid2d<CellState>;

/// Persistent grid of fused log-odds confidences.
pub type ConfidenceGrid = Grid2d<LogOdds>;

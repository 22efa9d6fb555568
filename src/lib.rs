pub mod cost_value;
pub mod fusion;
pub mod grid;
pub mod iterators;
pub mod mapper;
pub mod raycast;
pub mod types;
pub mod visualization;

pub use fusion::{BayesFilterUpdater, FusionConfig};
pub use grid::{CellState, ConfidenceGrid, FrameGrid, Grid2d, LogOdds};
pub use mapper::{FrameInput, GridSnapshot, MapperConfig, OccupancyGridMapper, SharedMapper};
pub use types::{FramePoses, GridError, MapInfo, Pose};

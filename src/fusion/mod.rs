//! Temporal fusion of single-frame grids into a persistent log-odds map.

pub mod config;
pub mod updater;

pub use config::FusionConfig;
pub use updater::{BayesFilterUpdater, FusionStats, update_cell};

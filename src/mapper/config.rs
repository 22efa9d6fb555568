//! Mapper configuration, loadable from YAML.
//!
//! ```yaml
//! map_length: 100.0
//! map_resolution: 0.5
//! use_height_filter: true
//! min_height: -1.0
//! max_height: 2.0
//! filter_obstacle_pointcloud_by_raw_pointcloud: false
//! enable_single_frame_mode: false
//! fusion:
//!   l_occupied: 0.85
//!   l_free: -0.4
//! ```

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::fusion::FusionConfig;
use crate::types::{GridError, MapInfo};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapperConfig {
    /// Side length of the square map window in meters.
    #[serde(default = "default_map_length")]
    pub map_length: f32,

    /// Meters per cell.
    #[serde(default = "default_map_resolution")]
    pub map_resolution: f32,

    /// Explicit width in cells, overriding `map_length`.
    #[serde(default)]
    pub map_width: Option<u32>,

    /// Explicit height in cells, overriding `map_length`.
    #[serde(default)]
    pub map_height: Option<u32>,

    /// Crop both clouds to a height band around the robot before casting.
    #[serde(default = "default_true")]
    pub use_height_filter: bool,

    /// Lower edge of the height band, relative to the robot (meters).
    #[serde(default = "default_min_height")]
    pub min_height: f32,

    /// Upper edge of the height band, relative to the robot (meters).
    #[serde(default = "default_max_height")]
    pub max_height: f32,

    /// Keep only obstacle points that also appear in the raw cloud.
    #[serde(default)]
    pub filter_obstacle_pointcloud_by_raw_pointcloud: bool,

    /// Distance under which an obstacle point and a raw point count as the same return.
    #[serde(default = "default_common_point_tolerance")]
    pub common_point_tolerance: f32,

    /// Publish each frame on its own instead of the fused map.
    #[serde(default)]
    pub enable_single_frame_mode: bool,

    #[serde(default)]
    pub fusion: FusionConfig,
}

fn default_map_length() -> f32 {
    100.0
}
fn default_map_resolution() -> f32 {
    0.5
}
fn default_true() -> bool {
    true
}
fn default_min_height() -> f32 {
    -1.0
}
fn default_max_height() -> f32 {
    2.0
}
fn default_common_point_tolerance() -> f32 {
    0.01
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            map_length: default_map_length(),
            map_resolution: default_map_resolution(),
            map_width: None,
            map_height: None,
            use_height_filter: true,
            min_height: default_min_height(),
            max_height: default_max_height(),
            filter_obstacle_pointcloud_by_raw_pointcloud: false,
            common_point_tolerance: default_common_point_tolerance(),
            enable_single_frame_mode: false,
            fusion: FusionConfig::default(),
        }
    }
}

impl MapperConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, GridError> {
        let config: MapperConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, GridError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Cells per side of the map window, rounded to the nearest cell.
    pub fn cells_per_side(&self) -> u32 {
        (self.map_length / self.map_resolution).round() as u32
    }

    /// Geometry of the map window, positioned at the world origin.
    ///
    /// Each side is `map_width`/`map_height` when given, `cells_per_side()` otherwise.
    pub fn map_info(&self) -> Result<MapInfo, GridError> {
        if !self.map_resolution.is_finite() || self.map_resolution <= 0.0 {
            return Err(GridError::InvalidResolution(self.map_resolution));
        }
        if !self.map_length.is_finite() || self.map_length <= 0.0 {
            return Err(GridError::InvalidDimension(format!(
                "map_length must be positive, got {}",
                self.map_length
            )));
        }
        let cells = self.cells_per_side();
        let info = MapInfo {
            width: self.map_width.unwrap_or(cells),
            height: self.map_height.unwrap_or(cells),
            resolution: self.map_resolution,
            origin: Vec2::ZERO,
        };
        info.validate()?;
        Ok(info)
    }

    pub fn validate(&self) -> Result<(), GridError> {
        self.map_info()?;
        self.fusion.validate()?;
        if self.use_height_filter
            && !(self.min_height.is_finite()
                && self.max_height.is_finite()
                && self.min_height < self.max_height)
        {
            return Err(GridError::InvalidConfig(format!(
                "height band [{}, {}] is empty",
                self.min_height, self.max_height
            )));
        }
        if self.filter_obstacle_pointcloud_by_raw_pointcloud
            && !(self.common_point_tolerance.is_finite() && self.common_point_tolerance > 0.0)
        {
            return Err(GridError::InvalidConfig(format!(
                "common_point_tolerance must be positive, got {}",
                self.common_point_tolerance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_map_is_200_cells_square() {
        let config = MapperConfig::default();
        config.validate().unwrap();
        let info = config.map_info().unwrap();
        assert_eq!(info.width, 200);
        assert_eq!(info.height, 200);
        assert_eq!(info.resolution, 0.5);
    }

    #[test]
    fn empty_yaml_gives_defaults() {
        let config = MapperConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, MapperConfig::default());
    }

    #[test]
    fn partial_yaml_overrides_fields() {
        let config = MapperConfig::from_yaml_str(
            "map_length: 20.0\nmap_resolution: 0.1\nenable_single_frame_mode: true\nfusion:\n  decay_rate: 0.1\n",
        )
        .unwrap();
        assert_eq!(config.cells_per_side(), 200);
        assert!(config.enable_single_frame_mode);
        assert_eq!(config.fusion.decay_rate, 0.1);
        assert_eq!(config.fusion.l_occupied, 0.85);
    }

    #[test]
    fn explicit_cell_counts_override_length() {
        let config =
            MapperConfig::from_yaml_str("map_resolution: 0.2\nmap_width: 64\nmap_height: 32")
                .unwrap();
        let info = config.map_info().unwrap();
        assert_eq!((info.width, info.height), (64, 32));
        assert!(matches!(
            MapperConfig::from_yaml_str("map_width: 0"),
            Err(GridError::InvalidDimension(_))
        ));
    }

    #[test]
    fn oversized_map_is_rejected_at_load() {
        assert!(matches!(
            MapperConfig::from_yaml_str("map_length: 1.0e9\nmap_resolution: 1.0e-3"),
            Err(GridError::InvalidDimension(_))
        ));
        assert!(matches!(
            MapperConfig::from_yaml_str("map_width: 100000\nmap_height: 100000"),
            Err(GridError::InvalidDimension(_))
        ));
    }

    #[test]
    fn invalid_geometry_is_rejected() {
        assert!(matches!(
            MapperConfig::from_yaml_str("map_resolution: 0.0"),
            Err(GridError::InvalidResolution(_))
        ));
        assert!(matches!(
            MapperConfig::from_yaml_str("map_length: 0.2\nmap_resolution: 0.5"),
            Err(GridError::InvalidDimension(_))
        ));
        assert!(matches!(
            MapperConfig::from_yaml_str("min_height: 3.0"),
            Err(GridError::InvalidConfig(_))
        ));
        assert!(matches!(
            MapperConfig::from_yaml_str("fusion:\n  l_free: 1.0"),
            Err(GridError::InvalidConfig(_))
        ));
        assert!(matches!(
            MapperConfig::from_yaml_str("map_length: [1, 2]"),
            Err(GridError::Yaml(_))
        ));
    }
}

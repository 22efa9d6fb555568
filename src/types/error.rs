use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("invalid dimension: {0}")]
    InvalidDimension(String),
    #[error("invalid resolution: {0}")]
    InvalidResolution(f32),
    #[error("cell ({x}, {y}) out of bounds for map {width}x{height}")]
    IndexOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    #[error("world point ({x}, {y}) is outside the map")]
    OutOfBounds { x: f32, y: f32 },
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),
    #[error("geometry unavailable: {0}")]
    GeometryUnavailable(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

//! Thread-safe handle for hosts whose sensor callbacks may overlap.

use std::sync::Arc;

use parking_lot::Mutex;

use super::{FrameInput, GridSnapshot, MapperConfig, MapperOutput, OccupancyGridMapper};
use crate::types::GridError;

/// Cloneable handle around a single [`OccupancyGridMapper`].
///
/// Filtering and ray casting run without the lock. Only the fusion step, the one
/// writer of the persistent map, is serialized, so concurrent cycles are applied
/// one after the other and never interleave on the map.
#[derive(Debug, Clone)]
pub struct SharedMapper {
    inner: Arc<Mutex<OccupancyGridMapper>>,
}

impl SharedMapper {
    pub fn new(config: MapperConfig) -> Result<Self, GridError> {
        Ok(Self::from_mapper(OccupancyGridMapper::new(config)?))
    }

    pub fn from_mapper(mapper: OccupancyGridMapper) -> Self {
        Self {
            inner: Arc::new(Mutex::new(mapper)),
        }
    }

    pub fn process_frame(&self, input: &FrameInput<'_>) -> Result<MapperOutput, GridError> {
        let builder = self.inner.lock().frame_builder();
        let frame = builder.build(input).inspect_err(|err| {
            tracing::warn!(%err, "skipping frame");
        })?;
        self.inner.lock().integrate(frame)
    }

    pub fn reset(&self) {
        self.inner.lock().reset();
    }

    /// Quantized copy of the persistent map as it stands now.
    pub fn snapshot(&self) -> GridSnapshot {
        self.inner.lock().snapshot()
    }

    /// Run `f` with exclusive access to the mapper.
    pub fn with_mapper<R>(&self, f: impl FnOnce(&mut OccupancyGridMapper) -> R) -> R {
        f(&mut *self.inner.lock())
    }
}

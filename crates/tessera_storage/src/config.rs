//! Configuration for pooled storage.

use tessera_foundation::{Error, ErrorKind, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for a [`PooledStore`](crate::PooledStore).
///
/// Controls how memory is carved into chunks and how much is reserved up
/// front.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PoolConfig {
    /// Number of slots per chunk. Must be non-zero.
    pub chunk_size: usize,

    /// Slots to reserve at construction, rounded up to whole chunks.
    pub initial_capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            chunk_size: 64,
            initial_capacity: 0,
        }
    }
}

impl PoolConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the chunk size.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Builder method to set the initial capacity.
    #[must_use]
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Checks the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `chunk_size` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::new(ErrorKind::Internal(
                "pool chunk size must be non-zero".to_string(),
            )));
        }
        Ok(())
    }

    /// Number of chunks needed to reserve `initial_capacity` slots.
    #[must_use]
    pub fn initial_chunks(&self) -> usize {
        self.initial_capacity.div_ceil(self.chunk_size.max(1))
    }
}

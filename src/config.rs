//! Map configuration: bucket count and lock granularity.

use crate::error::Error;
use core::num::NonZeroUsize;

/// How buckets are grouped under mutexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockGranularity {
    /// One mutex guards every bucket; all operations are serialized.
    #[default]
    Global,
    /// Buckets are spread over `n` mutexes, bucket `b` under mutex `b % n`.
    /// Values above the capacity are clamped to it.
    Striped(usize),
}

/// Validated settings for a `ConcurrentChainedMap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapConfig {
    capacity: NonZeroUsize,
    granularity: LockGranularity,
}

impl MapConfig {
    /// Global locking over `capacity` buckets.
    pub fn new(capacity: usize) -> Result<Self, Error> {
        Self::builder().capacity(capacity).build()
    }

    pub fn builder() -> MapConfigBuilder {
        MapConfigBuilder::default()
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub(crate) fn nonzero_capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    pub fn granularity(&self) -> LockGranularity {
        self.granularity
    }

    /// Number of mutexes the map will own.
    pub fn stripe_count(&self) -> usize {
        match self.granularity {
            LockGranularity::Global => 1,
            LockGranularity::Striped(n) => n.min(self.capacity.get()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MapConfigBuilder {
    capacity: Option<usize>,
    granularity: LockGranularity,
}

impl MapConfigBuilder {
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn granularity(mut self, granularity: LockGranularity) -> Self {
        self.granularity = granularity;
        self
    }

    /// Shorthand for `granularity(LockGranularity::Striped(n))`.
    pub fn stripes(self, n: usize) -> Self {
        self.granularity(LockGranularity::Striped(n))
    }

    pub fn build(self) -> Result<MapConfig, Error> {
        let capacity = self
            .capacity
            .and_then(NonZeroUsize::new)
            .ok_or(Error::ZeroCapacity)?;
        if self.granularity == LockGranularity::Striped(0) {
            return Err(Error::ZeroStripes);
        }
        Ok(MapConfig {
            capacity,
            granularity: self.granularity,
        })
    }
}

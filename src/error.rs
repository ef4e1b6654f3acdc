//! Construction errors.
//!
//! Lookups never fail: a missing key is `None`, not an error.

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A map needs at least one bucket.
    #[error("capacity must be at least one bucket")]
    ZeroCapacity,
    /// `LockGranularity::Striped(0)` was requested.
    #[error("striped locking needs at least one stripe")]
    ZeroStripes,
}

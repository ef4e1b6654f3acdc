//! striped-chain-map: a fixed-capacity, separately chained hash map from
//! `i32` keys to `i32` values, shared between threads.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a map whose chain structure can never be observed or modified
//!   by two threads at once, with each operation atomic per key.
//! - Layers:
//!   - ChainTable: single-threaded structure. Bucket heads plus an arena
//!     (`slotmap`) of entries linked by generational keys.
//!   - ConcurrentChainedMap: public API. Owns one or more lock stripes,
//!     each a mutex around a ChainTable, and routes every key to the stripe
//!     owning its bucket.
//!
//! Constraints
//! - Fixed bucket count for the map's lifetime; no rehashing.
//! - Bucket of `k` is `(k as u32) % capacity` for every operation.
//! - Keys are unique within the map: `put` scans the whole chain before
//!   appending.
//! - No process-wide state. Each map owns its own locks.
//!
//! Locking
//! - `LockGranularity::Global` (default) is one mutex over all buckets, so
//!   all operations run in a single total order.
//! - `LockGranularity::Striped(n)` puts bucket `b` under mutex `b % n`.
//!   Operations on different stripes commute, so per-key linearizability
//!   and one global order are kept.
//! - Whole-map reads (`len`, `operation_count`, `snapshot`, `dump`,
//!   `for_each`) lock every stripe in ascending order and see a consistent
//!   state.
//! - Size and operation counters live inside each ChainTable and are only
//!   touched with its lock held.
//!
//! Reentrancy policy
//! - `for_each` runs user code with stripes locked. Calling back into the
//!   map from it would self-deadlock; a debug-only guard turns that into a
//!   panic.
//!
//! Notes and non-goals
//! - Absence is `None`, never a reserved integer.
//! - No resizing, no multi-key transactions, no lock-free reads.
//! - Allocation failure aborts through the global allocator.
//! - `teardown(self)` consumes the map. Ownership rules out use after
//!   teardown; an `Arc`-shared map must be unwrapped first.

pub mod chain_table;
mod chain_table_proptest;
mod concurrent_map;
pub mod config;
mod dump;
mod error;
mod reentrancy;

// Public surface
pub use concurrent_map::ConcurrentChainedMap;
pub use config::{LockGranularity, MapConfig, MapConfigBuilder};
pub use dump::Dump;
pub use error::Error;

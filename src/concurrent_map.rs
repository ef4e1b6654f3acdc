//! ConcurrentChainedMap: the thread-safe public map.
//!
//! Buckets are spread over one or more lock stripes, each a
//! `parking_lot::Mutex<ChainTable>`. A single-key operation locks exactly
//! the stripe owning its bucket; whole-map reads lock every stripe in
//! ascending order, so lock acquisition always follows one global order.

use crate::chain_table::{bucket_index, ChainTable};
use crate::config::MapConfig;
use crate::dump::Dump;
use crate::error::Error;
use crate::reentrancy::{DebugReentrancy, ReentrancyGuard};
use core::num::NonZeroUsize;
use core::ops::{Deref, DerefMut};
use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, trace};

#[derive(Debug)]
struct Stripe {
    table: Mutex<ChainTable>,
    reentrancy: DebugReentrancy,
}

/// Held lock on one stripe.
struct StripeGuard<'a> {
    // Declared first so the holder mark is cleared before the mutex unlocks.
    _reentry: ReentrancyGuard<'a>,
    table: MutexGuard<'a, ChainTable>,
}

impl Deref for StripeGuard<'_> {
    type Target = ChainTable;
    fn deref(&self) -> &ChainTable {
        &self.table
    }
}

impl DerefMut for StripeGuard<'_> {
    fn deref_mut(&mut self) -> &mut ChainTable {
        &mut self.table
    }
}

impl Stripe {
    fn new(buckets: usize) -> Self {
        Self {
            table: Mutex::new(ChainTable::new(buckets)),
            reentrancy: DebugReentrancy::new(),
        }
    }

    fn lock(&self) -> StripeGuard<'_> {
        self.reentrancy.assert_not_held();
        let table = self.table.lock();
        StripeGuard {
            _reentry: self.reentrancy.enter(),
            table,
        }
    }
}

/// Fixed-capacity chained hash map from `i32` to `i32`, shared by reference
/// between threads.
///
/// Every `get`, `put`, `delete` and `contains_key` runs entirely inside the
/// critical section of the key's stripe, so operations on one key take
/// effect in a single total order. Absence is `None`; every `i32`,
/// `i32::MAX` included, can be stored.
///
/// ```
/// use std::sync::Arc;
/// use striped_chain_map::ConcurrentChainedMap;
///
/// let map = Arc::new(ConcurrentChainedMap::new(4).unwrap());
/// let workers: Vec<_> = (0..4)
///     .map(|t| {
///         let map = Arc::clone(&map);
///         std::thread::spawn(move || {
///             map.put(t, t * 10);
///         })
///     })
///     .collect();
/// for w in workers {
///     w.join().unwrap();
/// }
/// assert_eq!(map.len(), 4);
/// assert_eq!(map.get(3), Some(30));
///
/// let map = Arc::try_unwrap(map).unwrap();
/// assert_eq!(map.teardown(), 4);
/// ```
#[derive(Debug)]
pub struct ConcurrentChainedMap {
    capacity: NonZeroUsize,
    stripes: Box<[Stripe]>,
}

impl ConcurrentChainedMap {
    /// Map with `capacity` buckets under one global lock.
    pub fn new(capacity: usize) -> Result<Self, Error> {
        MapConfig::new(capacity).map(Self::with_config)
    }

    pub fn with_config(config: MapConfig) -> Self {
        let capacity = config.nonzero_capacity();
        let n = config.stripe_count();
        // Stripe `s` owns buckets s, s + n, s + 2n, ...
        let stripes = (0..n)
            .map(|s| Stripe::new((capacity.get() - s).div_ceil(n)))
            .collect();
        debug!(capacity = capacity.get(), stripes = n, "created chained map");
        Self { capacity, stripes }
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub fn stripe_count(&self) -> usize {
        self.stripes.len()
    }

    /// Bucket index `key` maps to; stable for the map's lifetime.
    pub fn bucket_of(&self, key: i32) -> usize {
        bucket_index(key, self.capacity)
    }

    /// (global bucket, owning stripe, bucket index inside that stripe)
    fn locate(&self, key: i32) -> (usize, &Stripe, usize) {
        let bucket = self.bucket_of(key);
        let n = self.stripes.len();
        (bucket, &self.stripes[bucket % n], bucket / n)
    }

    fn lock_all(&self) -> Vec<StripeGuard<'_>> {
        self.stripes.iter().map(Stripe::lock).collect()
    }

    pub fn get(&self, key: i32) -> Option<i32> {
        let (bucket, stripe, local) = self.locate(key);
        let mut table = stripe.lock();
        table.record_op();
        let found = table.get(local, key);
        trace!(key, bucket, ?found, "get");
        found
    }

    pub fn contains_key(&self, key: i32) -> bool {
        let (bucket, stripe, local) = self.locate(key);
        let mut table = stripe.lock();
        table.record_op();
        let found = table.contains_key(local, key);
        trace!(key, bucket, found, "contains_key");
        found
    }

    /// Associate `value` with `key`, returning the value it replaced.
    pub fn put(&self, key: i32, value: i32) -> Option<i32> {
        let (bucket, stripe, local) = self.locate(key);
        let mut table = stripe.lock();
        table.record_op();
        let previous = table.put(local, key, value);
        trace!(key, value, bucket, ?previous, "put");
        previous
    }

    /// Remove `key`, returning the value it held.
    pub fn delete(&self, key: i32) -> Option<i32> {
        let (bucket, stripe, local) = self.locate(key);
        let mut table = stripe.lock();
        table.record_op();
        let removed = table.remove(local, key);
        trace!(key, bucket, ?removed, "delete");
        removed
    }

    /// Number of live entries, counted with every stripe held.
    pub fn len(&self) -> usize {
        self.lock_all().iter().map(|t| t.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_all().iter().all(|t| t.is_empty())
    }

    /// Total `get`/`put`/`delete`/`contains_key` calls served so far.
    pub fn operation_count(&self) -> u64 {
        self.lock_all().iter().map(|t| t.ops()).sum()
    }

    /// Visit every entry as `(bucket, key, value)`, buckets ascending and
    /// chains head to tail, with all stripes locked for the whole walk.
    ///
    /// `f` must not call back into this map; debug builds panic if it does.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(usize, i32, i32),
    {
        let guards = self.lock_all();
        let n = guards.len();
        for bucket in 0..self.capacity.get() {
            for (k, v) in guards[bucket % n].chain(bucket / n) {
                f(bucket, k, v);
            }
        }
    }

    /// Consistent copy of every chain.
    pub fn snapshot(&self) -> Dump {
        let guards = self.lock_all();
        let n = guards.len();
        let buckets = (0..self.capacity.get())
            .map(|bucket| guards[bucket % n].chain(bucket / n).collect())
            .collect();
        Dump::new(buckets)
    }

    /// Text rendering of `snapshot`, one line per bucket.
    pub fn dump(&self) -> String {
        self.snapshot().to_string()
    }

    /// Release every entry and the map itself, returning how many entries
    /// were released. Taking `self` by value means no other operation can
    /// be in flight.
    pub fn teardown(self) -> usize {
        let mut released = 0;
        let mut ops = 0;
        for stripe in self.stripes.into_vec() {
            let mut table = stripe.table.into_inner();
            ops += table.ops();
            released += table.clear();
        }
        debug!(released, operations = ops, "tore down chained map");
        released
    }
}

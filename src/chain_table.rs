//! ChainTable: single-threaded structural layer of bucket chains.
//!
//! Each bucket slot holds the arena key of its chain head; entries link to
//! their successor by arena key. Removing an entry unlinks it first and
//! then releases its arena slot, so a chain never points at freed storage.

use core::iter::FusedIterator;
use core::mem;
use core::num::NonZeroUsize;
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Arena key of one chain entry.
    pub struct EntryKey;
}

/// Bucket for `key` in a table of `capacity` buckets.
///
/// The key's bit pattern is reinterpreted as `u32` before the modulo, so
/// negative keys land in `[0, capacity)` deterministically.
#[inline]
pub fn bucket_index(key: i32, capacity: NonZeroUsize) -> usize {
    (key as u32 as usize) % capacity.get()
}

#[derive(Debug)]
struct Entry {
    key: i32,
    value: i32,
    next: Option<EntryKey>,
}

#[derive(Debug)]
pub struct ChainTable {
    heads: Vec<Option<EntryKey>>,
    entries: SlotMap<EntryKey, Entry>, // storage for every chain in this table
    ops: u64,
}

impl ChainTable {
    /// Table with `buckets` empty chains. Bucket arguments to the other
    /// methods must be below `buckets`.
    pub fn new(buckets: usize) -> Self {
        Self {
            heads: vec![None; buckets],
            entries: SlotMap::with_key(),
            ops: 0,
        }
    }

    pub fn bucket_count(&self) -> usize {
        self.heads.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Operations recorded through `record_op`.
    pub fn ops(&self) -> u64 {
        self.ops
    }

    pub fn record_op(&mut self) {
        self.ops += 1;
    }

    fn find(&self, bucket: usize, key: i32) -> Option<EntryKey> {
        let mut cur = self.heads[bucket];
        while let Some(k) = cur {
            let entry = &self.entries[k];
            if entry.key == key {
                return Some(k);
            }
            cur = entry.next;
        }
        None
    }

    pub fn get(&self, bucket: usize, key: i32) -> Option<i32> {
        self.find(bucket, key).map(|k| self.entries[k].value)
    }

    pub fn contains_key(&self, bucket: usize, key: i32) -> bool {
        self.find(bucket, key).is_some()
    }

    /// Overwrite the value of `key` in place and return the old one, or
    /// append a new entry at the chain's tail and return `None`.
    ///
    /// The whole chain is scanned before appending, the tail included, so a
    /// key never appears twice in one chain.
    pub fn put(&mut self, bucket: usize, key: i32, value: i32) -> Option<i32> {
        let mut tail = None;
        let mut cur = self.heads[bucket];
        while let Some(k) = cur {
            let entry = &mut self.entries[k];
            if entry.key == key {
                return Some(mem::replace(&mut entry.value, value));
            }
            tail = Some(k);
            cur = entry.next;
        }

        let fresh = self.entries.insert(Entry {
            key,
            value,
            next: None,
        });
        match tail {
            Some(t) => self.entries[t].next = Some(fresh),
            None => self.heads[bucket] = Some(fresh),
        }
        None
    }

    /// Unlink the entry for `key` and release it, returning its value.
    /// An absent key leaves the chain untouched.
    pub fn remove(&mut self, bucket: usize, key: i32) -> Option<i32> {
        let mut prev: Option<EntryKey> = None;
        let mut cur = self.heads[bucket];
        while let Some(k) = cur {
            let (entry_key, next) = {
                let e = &self.entries[k];
                (e.key, e.next)
            };
            if entry_key == key {
                // Relink around the match before its slot is freed.
                match prev {
                    Some(p) => self.entries[p].next = next,
                    None => self.heads[bucket] = next,
                }
                return self.entries.remove(k).map(|e| e.value);
            }
            prev = Some(k);
            cur = next;
        }
        None
    }

    /// Entries of `bucket` from head to tail.
    pub fn chain(&self, bucket: usize) -> Chain<'_> {
        Chain {
            entries: &self.entries,
            cur: self.heads[bucket],
        }
    }

    /// Release every entry and return how many there were. Bucket count and
    /// the operation counter are kept.
    pub fn clear(&mut self) -> usize {
        let released = self.entries.len();
        self.entries.clear();
        self.heads.iter_mut().for_each(|h| *h = None);
        released
    }
}

/// Iterator over one chain, yielding `(key, value)` head to tail.
pub struct Chain<'a> {
    entries: &'a SlotMap<EntryKey, Entry>,
    cur: Option<EntryKey>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = (i32, i32);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.entries.get(self.cur?)?;
        self.cur = entry.next;
        Some((entry.key, entry.value))
    }
}

impl FusedIterator for Chain<'_> {}

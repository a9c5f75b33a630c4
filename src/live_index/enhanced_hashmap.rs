//! Enhanced hashmap backend: a fixed-size array of buckets indexed by
//! `id % num_buckets`, each bucket holding a short overflow list of
//! colliding entries. Insert and remove are amortized O(1) as long as
//! buckets stay small; oldest-lookup is a linear scan across buckets,
//! acceptable since flushing is far rarer than insert/remove.

use crate::types::{Attr, Key, Timestamp};

const DEFAULT_BUCKETS: usize = 1024;

#[derive(Debug)]
pub struct EnhancedHashMapBackend {
    buckets: Vec<Vec<(Key, Timestamp, Option<Attr>)>>,
    len: usize,
}

impl EnhancedHashMapBackend {
    pub fn new() -> EnhancedHashMapBackend {
        EnhancedHashMapBackend::with_buckets(DEFAULT_BUCKETS)
    }

    pub fn with_buckets(num_buckets: usize) -> EnhancedHashMapBackend {
        assert!(num_buckets > 0, "bucket array must be non-empty");
        EnhancedHashMapBackend {
            buckets: (0..num_buckets).map(|_| Vec::new()).collect(),
            len: 0,
        }
    }

    fn bucket_of(&self, id: Key) -> usize {
        (id as i128).rem_euclid(self.buckets.len() as i128) as usize
    }

    pub fn insert(&mut self, id: Key, start: Timestamp, secondary: Option<Attr>) {
        let b = self.bucket_of(id);
        self.buckets[b].push((id, start, secondary));
        self.len += 1;
    }

    pub fn remove(&mut self, id: Key) -> Option<(Timestamp, Option<Attr>)> {
        let b = self.bucket_of(id);
        let bucket = &mut self.buckets[b];
        let pos = bucket.iter().position(|(i, _, _)| *i == id)?;
        let (_, start, secondary) = bucket.remove(pos);
        self.len -= 1;
        Some((start, secondary))
    }

    pub fn oldest(&self) -> Option<(Key, Timestamp)> {
        self.buckets
            .iter()
            .flatten()
            .min_by_key(|(_, start, _)| *start)
            .map(|(id, start, _)| (*id, *start))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Key, Timestamp, Option<Attr>)> + '_ {
        self.buckets.iter().flatten().copied()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn num_buffers(&self) -> usize {
        self.buckets.len()
    }
}

impl Default for EnhancedHashMapBackend {
    fn default() -> EnhancedHashMapBackend {
        EnhancedHashMapBackend::new()
    }
}

#[cfg(test)]
#[path = "enhanced_hashmap_test.rs"]
mod enhanced_hashmap_test;

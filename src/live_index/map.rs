//! Ordered-map backend: a `BTreeMap` keyed by start endpoint gives O(log n)
//! access to the oldest open record, which is what capacity/duration
//! flushing needs; a reverse `HashMap` gives O(log n) removal by id.

use std::collections::{BTreeMap, HashMap};

use crate::types::{Attr, Key, Timestamp};

#[derive(Debug, Default)]
pub struct MapBackend {
    by_start: BTreeMap<Timestamp, Vec<(Key, Option<Attr>)>>,
    index: HashMap<Key, Timestamp>,
}

impl MapBackend {
    pub fn new() -> MapBackend {
        MapBackend::default()
    }

    pub fn insert(&mut self, id: Key, start: Timestamp, secondary: Option<Attr>) {
        self.by_start.entry(start).or_default().push((id, secondary));
        self.index.insert(id, start);
    }

    pub fn remove(&mut self, id: Key) -> Option<(Timestamp, Option<Attr>)> {
        let start = self.index.remove(&id)?;
        let bucket = self.by_start.get_mut(&start)?;
        let pos = bucket.iter().position(|(i, _)| *i == id)?;
        let (_, secondary) = bucket.remove(pos);
        if bucket.is_empty() {
            self.by_start.remove(&start);
        }
        Some((start, secondary))
    }

    pub fn oldest(&self) -> Option<(Key, Timestamp)> {
        self.by_start.iter().next().map(|(start, bucket)| (bucket[0].0, *start))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Key, Timestamp, Option<Attr>)> + '_ {
        self.by_start
            .iter()
            .flat_map(|(start, bucket)| bucket.iter().map(move |(id, attr)| (*id, *start, *attr)))
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn num_buffers(&self) -> usize {
        1
    }
}

#[cfg(test)]
#[path = "map_test.rs"]
mod map_test;

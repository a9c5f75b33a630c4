//! Vector backend: an unsorted `Vec`, linear scan for every operation.
//! Simplest possible backend, useful as a correctness baseline for the
//! other two.

use crate::types::{Attr, Key, Timestamp};

#[derive(Debug, Default)]
pub struct VectorBackend {
    entries: Vec<(Key, Timestamp, Option<Attr>)>,
}

impl VectorBackend {
    pub fn new() -> VectorBackend {
        VectorBackend::default()
    }

    pub fn insert(&mut self, id: Key, start: Timestamp, secondary: Option<Attr>) {
        self.entries.push((id, start, secondary));
    }

    pub fn remove(&mut self, id: Key) -> Option<(Timestamp, Option<Attr>)> {
        let pos = self.entries.iter().position(|(i, _, _)| *i == id)?;
        let (_, start, secondary) = self.entries.remove(pos);
        Some((start, secondary))
    }

    pub fn oldest(&self) -> Option<(Key, Timestamp)> {
        self.entries
            .iter()
            .min_by_key(|(_, start, _)| *start)
            .map(|(id, start, _)| (*id, *start))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Key, Timestamp, Option<Attr>)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn num_buffers(&self) -> usize {
        1
    }
}

#[cfg(test)]
#[path = "vector_test.rs"]
mod vector_test;

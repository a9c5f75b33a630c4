//! The Live Index buffers records whose start has been seen but whose end
//! has not: a map from open record-id to its start endpoint (and
//! optional secondary attribute), backed by one of three interchangeable
//! implementations, and bounded either by capacity or by duration.
//!
//! On arrival of an end event the matching entry is removed and the now-
//! complete interval flows on into the persistent index. When the buffer
//! grows past its bound, the oldest open entries are flushed early as
//! synthetic `(start, now, id)` intervals -- the end is not really known
//! yet, but the persistent index needs *some* answer for "alive at t" for
//! t beyond `now`, and `now` is the best closed approximation available.

mod enhanced_hashmap;
mod map;
mod vector;

use log::debug;

use crate::error::{Error, Result};
use crate::types::{Attr, Key, Record, Timestamp};

use enhanced_hashmap::EnhancedHashMapBackend;
use map::MapBackend;
use vector::VectorBackend;

/// Selects which backend a [LiveIndex] is built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Map,
    Vector,
    EnhancedHashMap,
}

impl BackendKind {
    pub fn parse(name: &str) -> Result<BackendKind> {
        match name.to_ascii_uppercase().as_str() {
            "MAP" => Ok(BackendKind::Map),
            "VECTOR" => Ok(BackendKind::Vector),
            "ENHANCEDHASHMAP" => Ok(BackendKind::EnhancedHashMap),
            other => Err(Error::UsageError(format!("unknown live-index backend: {}", other))),
        }
    }
}

enum Backend {
    Map(MapBackend),
    Vector(VectorBackend),
    EnhancedHashMap(EnhancedHashMapBackend),
}

impl Backend {
    fn new(kind: BackendKind) -> Backend {
        match kind {
            BackendKind::Map => Backend::Map(MapBackend::new()),
            BackendKind::Vector => Backend::Vector(VectorBackend::new()),
            BackendKind::EnhancedHashMap => Backend::EnhancedHashMap(EnhancedHashMapBackend::new()),
        }
    }

    fn insert(&mut self, id: Key, start: Timestamp, secondary: Option<Attr>) {
        match self {
            Backend::Map(b) => b.insert(id, start, secondary),
            Backend::Vector(b) => b.insert(id, start, secondary),
            Backend::EnhancedHashMap(b) => b.insert(id, start, secondary),
        }
    }

    fn remove(&mut self, id: Key) -> Option<(Timestamp, Option<Attr>)> {
        match self {
            Backend::Map(b) => b.remove(id),
            Backend::Vector(b) => b.remove(id),
            Backend::EnhancedHashMap(b) => b.remove(id),
        }
    }

    fn oldest(&self) -> Option<(Key, Timestamp)> {
        match self {
            Backend::Map(b) => b.oldest(),
            Backend::Vector(b) => b.oldest(),
            Backend::EnhancedHashMap(b) => b.oldest(),
        }
    }

    fn iter(&self) -> Box<dyn Iterator<Item = (Key, Timestamp, Option<Attr>)> + '_> {
        match self {
            Backend::Map(b) => Box::new(b.iter()),
            Backend::Vector(b) => Box::new(b.iter()),
            Backend::EnhancedHashMap(b) => Box::new(b.iter()),
        }
    }

    fn len(&self) -> usize {
        match self {
            Backend::Map(b) => b.len(),
            Backend::Vector(b) => b.len(),
            Backend::EnhancedHashMap(b) => b.len(),
        }
    }

    fn num_buffers(&self) -> usize {
        match self {
            Backend::Map(b) => b.num_buffers(),
            Backend::Vector(b) => b.num_buffers(),
            Backend::EnhancedHashMap(b) => b.num_buffers(),
        }
    }
}

/// Capacity-constrained flushes the oldest entries once `size() >
/// max_capacity`; duration-constrained flushes entries whose start is
/// older than `now - max_duration`. The two are mutually exclusive, as
/// at the CLI (`-c` and `-d`).
#[derive(Debug, Clone, Copy)]
pub enum BoundMode {
    Capacity(usize),
    Duration(Timestamp),
    Unbounded,
}

/// The write buffer of not-yet-closed records.
pub struct LiveIndex {
    backend: Backend,
    bound: BoundMode,
    max_population_seen: usize,
}

impl LiveIndex {
    pub fn new(kind: BackendKind, bound: BoundMode) -> LiveIndex {
        LiveIndex {
            backend: Backend::new(kind),
            bound,
            max_population_seen: 0,
        }
    }

    pub fn size(&self) -> usize {
        self.backend.len()
    }

    pub fn num_buffers(&self) -> usize {
        self.backend.num_buffers()
    }

    pub fn max_population_seen(&self) -> usize {
        self.max_population_seen
    }

    /// Insert an open record and flush any entries the bound now forces
    /// out, returning them as completed records ready for the persistent
    /// index.
    pub fn insert(&mut self, id: Key, start: Timestamp, secondary: Option<Attr>, now: Timestamp) -> Vec<Record> {
        self.backend.insert(id, start, secondary);
        self.max_population_seen = self.max_population_seen.max(self.backend.len());
        self.flush_due(now)
    }

    /// Remove the entry for `id`, returning its original start (and
    /// secondary attribute, if any). `Err(NotFound)` if `id` is not
    /// currently open.
    pub fn remove(&mut self, id: Key) -> Result<(Timestamp, Option<Attr>)> {
        match self.backend.remove(id) {
            Some(v) => Ok(v),
            None => Err(Error::NotFound(format!("live record {} is not open", id))),
        }
    }

    fn flush_due(&mut self, now: Timestamp) -> Vec<Record> {
        let mut flushed = Vec::new();
        match self.bound {
            BoundMode::Capacity(max_capacity) => {
                while self.backend.len() > max_capacity {
                    let (id, start) = self.backend.oldest().expect("size()>max_capacity implies an entry exists");
                    let (_, secondary) = self.backend.remove(id).expect("just observed via oldest()");
                    debug!(target: "live  ", "capacity flush id={} start={} now={}", id, start, now);
                    flushed.push(make_flushed(id, start, now, secondary));
                }
            }
            BoundMode::Duration(max_duration) => {
                while let Some((id, start)) = self.backend.oldest() {
                    if now - start <= max_duration {
                        break;
                    }
                    let (_, secondary) = self.backend.remove(id).expect("just observed via oldest()");
                    debug!(target: "live  ", "duration flush id={} start={} now={}", id, start, now);
                    flushed.push(make_flushed(id, start, now, secondary));
                }
            }
            BoundMode::Unbounded => {}
        }
        flushed
    }

    /// Records still open whose start is `<= hi`: they are alive at any
    /// query timestamp `>= their start`, since their end is not yet known.
    pub fn execute_pure_time_travel(&self, hi: Timestamp) -> Vec<Key> {
        self.execute_range_time_travel(hi, hi, None, None)
    }

    /// Records still open whose start is `<= hi` (an open record's
    /// effective end is `+inf`, so it overlaps any window whose `hi >=
    /// start`), optionally filtered on the secondary attribute.
    pub fn execute_range_time_travel(&self, _lo: Timestamp, hi: Timestamp, attr_lo: Option<Attr>, attr_hi: Option<Attr>) -> Vec<Key> {
        self.backend
            .iter()
            .filter(|(_, start, _)| *start <= hi)
            .filter(|(_, _, secondary)| match (attr_lo, attr_hi, secondary) {
                (Some(lo), Some(hi), Some(v)) => *v >= lo && *v <= hi,
                (Some(_), Some(_), None) => false,
                _ => true,
            })
            .map(|(id, _, _)| id)
            .collect()
    }
}

fn make_flushed(id: Key, start: Timestamp, now: Timestamp, secondary: Option<Attr>) -> Record {
    match secondary {
        Some(attr) => Record::with_secondary(id, start, now, attr),
        None => Record::new(id, start, now),
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;

//! The R-tree is an external collaborator: this crate only needs a 2-D
//! (or 3-D, with the secondary attribute as a third axis) box index
//! supporting `insert((box, id))` and `query(box) -> iterator<(box, id)>`.
//! [SpatialIndex] names the capability the driver needs from it;
//! [ClosedIntervalIndex] is a minimal reference implementation good
//! enough to exercise the driver and tests without pulling in an actual
//! boost-style R-tree crate.

use crate::types::{Attr, Key, Record, Timestamp};

/// Capability an external spatial collaborator must offer: indexing
/// closed `(start, end[, secondary])` boxes by record id, and answering
/// window queries that overlap a given box.
pub trait SpatialIndex {
    fn insert(&mut self, record: Record);
    fn query(&self, lo: Timestamp, hi: Timestamp, attr_lo: Option<Attr>, attr_hi: Option<Attr>) -> Vec<Key>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Linear-scan reference index over closed `(start, end[, secondary])`
/// intervals, keyed by record id. Adequate for the data volumes this
/// crate is exercised against; a production deployment would swap this
/// for a real R-tree without touching [SpatialIndex]'s callers.
#[derive(Debug, Default)]
pub struct ClosedIntervalIndex {
    records: Vec<Record>,
}

impl ClosedIntervalIndex {
    pub fn new() -> ClosedIntervalIndex {
        ClosedIntervalIndex { records: Vec::new() }
    }
}

impl SpatialIndex for ClosedIntervalIndex {
    fn insert(&mut self, record: Record) {
        self.records.push(record);
    }

    fn query(&self, lo: Timestamp, hi: Timestamp, attr_lo: Option<Attr>, attr_hi: Option<Attr>) -> Vec<Key> {
        self.records
            .iter()
            .filter(|r| r.overlaps(lo, hi))
            .filter(|r| match (attr_lo, attr_hi) {
                (Some(a), Some(b)) => match r.secondary {
                    Some(v) => v >= a && v <= b,
                    None => false,
                },
                _ => true,
            })
            .map(|r| r.id)
            .collect()
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
#[path = "rtree_test.rs"]
mod rtree_test;

//! Module `timeline` implements the Timeline Index: an
//! append-only event log with periodic bitmap checkpoints, answering pure
//! time-travel range queries without touching the MVBT.
//!
//! Grounded in `original_source/indices/timelineindex.{h,cpp}`
//! (`TimelineIndex::insert`, `createCheckpoint`, `execute_pureTimeTravel`).
//! The alive-set bitmap uses [croaring::Bitmap] rather than a dense
//! `Vec<bool>`, scaling better to sparse id spaces.

use croaring::Bitmap;
use log::debug;

use crate::types::{Key, Reduce, Timestamp};

/// One occurrence in the append-only event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineEntry {
    pub id: Key,
    pub endpoint: Timestamp,
    pub is_start: bool,
}

impl TimelineEntry {
    /// Ordering used throughout this module: primary by endpoint
    /// ascending, secondary starts-before-ends at a tied endpoint.
    fn sort_key(&self) -> (Timestamp, u8) {
        (self.endpoint, if self.is_start { 0 } else { 1 })
    }

    fn less_than(&self, other: &TimelineEntry) -> bool {
        self.sort_key() < other.sort_key()
    }
}

/// A checkpoint: the alive-set snapshot in effect just before event index
/// `spot`.
#[derive(Debug, Clone)]
struct Checkpoint {
    timestamp: Timestamp,
    spot: usize,
    bitmap: Bitmap,
}

/// Append-only event log plus periodic checkpoints.
pub struct TimelineIndex {
    checkpoint_frequency: Timestamp,
    next_checkpoint_boundary: Timestamp,
    event_list: Vec<TimelineEntry>,
    version_map: Vec<Checkpoint>,
    running_bitmap: Bitmap,
}

impl TimelineIndex {
    pub fn new(checkpoint_frequency: Timestamp) -> TimelineIndex {
        assert!(checkpoint_frequency > 0, "checkpoint frequency must be positive");
        TimelineIndex {
            checkpoint_frequency,
            next_checkpoint_boundary: checkpoint_frequency,
            event_list: Vec::new(),
            version_map: Vec::new(),
            running_bitmap: Bitmap::create(),
        }
    }

    pub fn len(&self) -> usize {
        self.event_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.event_list.is_empty()
    }

    pub fn num_checkpoints(&self) -> usize {
        self.version_map.len()
    }

    /// Insert a start or end event at `endpoint`. The event log is
    /// appended in stream order and never re-sorted, so the binary
    /// searches in `execute_pure_time_travel` rely on the caller feeding
    /// events with non-decreasing endpoints, starts before ends at a
    /// tied endpoint -- true of any driver that reports S/E as they
    /// happen. A new checkpoint is created first whenever `endpoint`
    /// crosses the next boundary; a tie at the boundary breaks toward
    /// ends happening before starts, so a checkpoint never straddles an
    /// end event landing exactly on the boundary.
    pub fn insert(&mut self, id: Key, endpoint: Timestamp, is_start: bool) {
        if endpoint > self.next_checkpoint_boundary
            || (endpoint == self.next_checkpoint_boundary && !is_start)
        {
            self.create_checkpoints_up_to(endpoint);
        }

        if is_start {
            self.running_bitmap.add(id as u32);
        } else {
            self.running_bitmap.remove(id as u32);
        }

        self.event_list.push(TimelineEntry {
            id,
            endpoint,
            is_start,
        });
    }

    fn create_checkpoints_up_to(&mut self, endpoint: Timestamp) {
        while endpoint > self.next_checkpoint_boundary {
            self.version_map.push(Checkpoint {
                timestamp: self.next_checkpoint_boundary,
                spot: self.event_list.len(),
                bitmap: self.running_bitmap.clone(),
            });
            debug!(
                target: "timeline",
                "checkpoint at t={} spot={} alive={}",
                self.next_checkpoint_boundary,
                self.event_list.len(),
                self.running_bitmap.cardinality(),
            );
            self.next_checkpoint_boundary += self.checkpoint_frequency;
        }
    }

    fn latest_checkpoint_before(&self, lo: Timestamp) -> Option<&Checkpoint> {
        // checkpoints are created in increasing-timestamp order: binary
        // search for the last one whose timestamp <= lo.
        let idx = self
            .version_map
            .partition_point(|cp| cp.timestamp <= lo);
        if idx == 0 {
            None
        } else {
            Some(&self.version_map[idx - 1])
        }
    }

    fn lower_bound(&self, dummy: &TimelineEntry) -> usize {
        self.event_list.partition_point(|e| e.less_than(dummy))
    }

    fn upper_bound(&self, dummy: &TimelineEntry) -> usize {
        self.event_list.partition_point(|e| !dummy.less_than(e))
    }

    /// Pure time-travel range query over `[lo, hi]`:
    /// locate the alive set at `lo`, then fold in every record whose
    /// lifespan *begins* within the window.
    pub fn execute_pure_time_travel(&self, lo: Timestamp, hi: Timestamp, reduce: Reduce) -> i64 {
        let start_dummy = TimelineEntry {
            id: 0,
            endpoint: lo,
            is_start: true,
        };
        let end_dummy = TimelineEntry {
            id: 0,
            endpoint: hi,
            is_start: true,
        };
        let q_start = self.lower_bound(&start_dummy);
        let q_end = self.upper_bound(&end_dummy);

        let mut alive = match self.latest_checkpoint_before(lo) {
            Some(cp) => cp.bitmap.clone(),
            None => Bitmap::create(),
        };
        let replay_from = self.latest_checkpoint_before(lo).map(|cp| cp.spot).unwrap_or(0);

        for entry in &self.event_list[replay_from..q_start] {
            if entry.is_start {
                alive.add(entry.id as u32);
            } else {
                alive.remove(entry.id as u32);
            }
        }

        let mut result: i64 = 0;
        for id in alive.iter() {
            result = reduce.combine(result, id as i64);
        }

        for entry in &self.event_list[q_start..q_end] {
            if entry.is_start {
                result = reduce.combine(result, entry.id);
            }
        }

        result
    }
}

#[cfg(test)]
#[path = "timeline_test.rs"]
mod timeline_test;

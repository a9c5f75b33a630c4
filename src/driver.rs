//! Single-threaded, synchronous event-dispatch loop: reads one `S`/`E`/`Q`
//! line at a time and drives the Live Index plus a persistent geometric
//! index.
//!
//! Grounded in `original_source/main_timelineindex.cpp`'s dispatch loop:
//! one pass over the input, no suspension points, a running report of
//! update counts, buffer high-water mark, query count and the reduced
//! query result.
//!
//! `S` moves a record into the Live Index; `E` removes it from the Live
//! Index and inserts the now-closed interval into the persistent index
//! (a [crate::rtree::ClosedIntervalIndex], chosen here because the
//! driver's `Q` events are literally 2-D overlap queries on
//! `(start, end[, secondary])` -- the shape [crate::rtree] is built for.
//! [crate::mvbt::Mvbt] answers a different question (what did key K look
//! like at version V) and is exercised directly as a library component
//! rather than wired into this loop; see the design ledger for the
//! reasoning.

use log::debug;

use crate::error::{Error, Result};
use crate::live_index::{BackendKind, BoundMode, LiveIndex};
use crate::rtree::{ClosedIntervalIndex, SpatialIndex};
use crate::types::{Attr, Event, Key, Reduce, Timestamp};

/// Driver tuning, built with the chained `set_*` convention used across
/// this crate's components.
#[derive(Debug, Clone, Copy)]
pub struct DriverConfig {
    backend: BackendKind,
    bound: BoundMode,
    repeats: usize,
    reduce: Reduce,
}

impl DriverConfig {
    pub fn new(backend: BackendKind) -> DriverConfig {
        DriverConfig {
            backend,
            bound: BoundMode::Unbounded,
            repeats: 1,
            reduce: Reduce::Xor,
        }
    }

    pub fn set_capacity(mut self, max_capacity: usize) -> DriverConfig {
        self.bound = BoundMode::Capacity(max_capacity);
        self
    }

    pub fn set_duration(mut self, max_duration: Timestamp) -> DriverConfig {
        self.bound = BoundMode::Duration(max_duration);
        self
    }

    pub fn set_repeats(mut self, repeats: usize) -> DriverConfig {
        self.repeats = repeats.max(1);
        self
    }

    pub fn set_reduce(mut self, reduce: Reduce) -> DriverConfig {
        self.reduce = reduce;
        self
    }
}

/// Running counters surfaced in the end-of-stream report.
#[derive(Debug, Default, Clone, Copy)]
pub struct Stats {
    pub updates: usize,
    pub queries: usize,
    pub max_population: usize,
    pub total_reduced: i64,
}

pub struct Driver {
    config: DriverConfig,
    live: LiveIndex,
    persistent: ClosedIntervalIndex,
    clock: Timestamp,
    stats: Stats,
}

impl Driver {
    pub fn new(config: DriverConfig) -> Driver {
        Driver {
            live: LiveIndex::new(config.backend, config.bound),
            persistent: ClosedIntervalIndex::new(),
            clock: 0,
            stats: Stats::default(),
            config,
        }
    }

    pub fn stats(&self) -> Stats {
        let mut s = self.stats;
        s.max_population = s.max_population.max(self.live.max_population_seen());
        s
    }

    /// Parse and dispatch one line. Returns `Ok(Some(result))` for a
    /// query line, `Ok(None)` for `S`/`E`, and propagates a `NotFound`
    /// when `E` names a record that was never started.
    pub fn apply_line(&mut self, line: &str) -> Result<Option<i64>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        match parse_event(line)? {
            Event::Start { id, start, secondary } => {
                self.dispatch_start(id, start, secondary);
                Ok(None)
            }
            Event::End { id, end, secondary } => {
                self.dispatch_end(id, end, secondary)?;
                Ok(None)
            }
            Event::Query(q) => Ok(Some(self.dispatch_query(q.lo, q.hi, q.attr_lo, q.attr_hi))),
        }
    }

    fn advance_clock(&mut self, t: Timestamp) {
        self.clock = self.clock.max(t);
    }

    fn dispatch_start(&mut self, id: Key, start: Timestamp, secondary: Option<Attr>) {
        self.advance_clock(start);
        let flushed = self.live.insert(id, start, secondary, self.clock);
        for record in flushed {
            debug!(target: "driver", "early flush of id={} due to live-index bound", record.id);
            self.persistent.insert(record);
        }
        self.stats.updates += 1;
    }

    fn dispatch_end(&mut self, id: Key, end: Timestamp, secondary: Option<Attr>) -> Result<()> {
        self.advance_clock(end);
        let (start, started_secondary) = self.live.remove(id)?;
        let chosen = secondary.or(started_secondary);
        let record = match chosen {
            Some(attr) => crate::types::Record::with_secondary(id, start, end, attr),
            None => crate::types::Record::new(id, start, end),
        };
        self.persistent.insert(record);
        self.stats.updates += 1;
        Ok(())
    }

    fn dispatch_query(&mut self, lo: Timestamp, hi: Timestamp, attr_lo: Option<Attr>, attr_hi: Option<Attr>) -> i64 {
        let mut result = 0;
        for _ in 0..self.config.repeats {
            result = self.run_query(lo, hi, attr_lo, attr_hi);
        }
        self.stats.queries += 1;
        self.stats.total_reduced = self.config.reduce.combine(self.stats.total_reduced, result);
        result
    }

    fn run_query(&self, lo: Timestamp, hi: Timestamp, attr_lo: Option<Attr>, attr_hi: Option<Attr>) -> i64 {
        let mut acc = 0;
        for id in self.live.execute_range_time_travel(lo, hi, attr_lo, attr_hi) {
            acc = self.config.reduce.combine(acc, id);
        }
        for id in self.persistent.query(lo, hi, attr_lo, attr_hi) {
            acc = self.config.reduce.combine(acc, id);
        }
        acc
    }

    /// Render the end-of-stream report: update/query counts, buffer
    /// high-water mark, and the accumulated reduced result tagged by
    /// reduction mode.
    pub fn report(&self) -> String {
        let s = self.stats();
        let tag = match self.config.reduce {
            Reduce::Xor => "XOR",
            Reduce::Count => "COUNT",
        };
        format!(
            "updates={} queries={} max_population={} num_buffers={} [{}]={}",
            s.updates,
            s.queries,
            s.max_population,
            self.live.num_buffers(),
            tag,
            s.total_reduced,
        )
    }
}

fn parse_event(line: &str) -> Result<Event> {
    let mut fields = line.split_whitespace();
    let op = fields.next().ok_or_else(|| Error::InvalidEvent("empty line".to_string()))?;
    let a: i64 = fields
        .next()
        .ok_or_else(|| Error::InvalidEvent(format!("missing field `a` in: {}", line)))?
        .parse()?;
    let b: i64 = fields
        .next()
        .ok_or_else(|| Error::InvalidEvent(format!("missing field `b` in: {}", line)))?
        .parse()?;
    let c: Option<Attr> = fields.next().map(str::parse).transpose()?;
    let d: Option<Attr> = fields.next().map(str::parse).transpose()?;

    match op {
        "S" => Ok(Event::Start {
            id: a,
            start: b,
            secondary: c,
        }),
        "E" => Ok(Event::End { id: a, end: b, secondary: c }),
        "Q" => {
            let mut q = crate::types::RangeQuery::new(a, b);
            if let (Some(lo), Some(hi)) = (c, d) {
                q = q.with_attr(lo, hi);
            }
            Ok(Event::Query(q))
        }
        other => Err(Error::InvalidEvent(format!("unknown op `{}` in: {}", other, line))),
    }
}

#[cfg(test)]
#[path = "driver_test.rs"]
mod driver_test;

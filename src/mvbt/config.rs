//! Tuning knobs for the multiversion tree: fanout and the `D`/`E`
//! thresholds that govern version-split, key-split and merge behavior.

/// Configuration for a [super::tree::Mvbt], built with the chained
/// `set_*` convention used across this crate's components.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    fanout: usize,
    d: f64,
    e: f64,
    copy_entry_with_segment: bool,
}

impl Config {
    const FANOUT: usize = 64;
    const D: f64 = 0.0;
    const E: f64 = 1.0;

    /// Default fanout, `D=0`, `E=1` -- the multiversion policy degenerates
    /// to plain key-split-on-overflow, per the documented defaults.
    pub fn new(fanout: usize) -> Config {
        assert!(fanout >= 4, "fanout must allow a meaningful key split");
        Config {
            fanout,
            d: Self::D,
            e: Self::E,
            copy_entry_with_segment: false,
        }
    }

    pub fn set_thresholds(mut self, d: f64, e: f64) -> Config {
        assert!((0.0..=1.0).contains(&d), "D must be a fraction of fanout");
        assert!(e >= 0.0, "E must be non-negative");
        self.d = d;
        self.e = e;
        self
    }

    pub fn set_copy_entry_with_segment(mut self, yes: bool) -> Config {
        self.copy_entry_with_segment = yes;
        self
    }

    pub fn copy_entry_with_segment(&self) -> bool {
        self.copy_entry_with_segment
    }

    pub fn max_slots(&self) -> usize {
        self.fanout
    }

    /// Weak-underflow guard: a node below this many alive entries must be
    /// handled on erase.
    pub fn min_alive(&self) -> usize {
        (self.fanout as f64 * self.d).floor() as usize
    }

    /// Strong-overflow guard applied to a version-split successor: above
    /// this many alive entries, key-split instead of a plain insert.
    pub fn strong_max_alive(&self) -> usize {
        (self.fanout as f64 * (1.0 - self.d * self.e)).floor() as usize
    }

    /// Strong-underflow guard applied to a version-split successor: below
    /// this many alive entries, merge with a sibling instead of a plain
    /// insert.
    pub fn strong_min_alive(&self) -> usize {
        (self.fanout as f64 * self.d * (1.0 + self.e)).ceil() as usize
    }
}

impl Default for Config {
    fn default() -> Config {
        Config::new(Self::FANOUT)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

//! The multiversion B+tree itself: insertion, erase, and the three query
//! shapes, all driven by the arena in [super::node] and tuned by
//! [super::config::Config].
//!
//! Grounded in `original_source/indices/mvbtree.h`: `MVBTree::insert`
//! (version split, strong-overflow key split, strong-underflow sibling
//! merge), `MVBTree::erase` (weak-underflow handling), `get_root(version)`
//! and `query_range_lifespan_start` (historical root routing through the
//! root forest).

use std::collections::HashSet;

use log::{debug, warn};

use crate::btree::BTree;
use crate::error::{Error, Result};
use crate::types::{Key, KeyRange, Lifespan, Reduce, Version};

use super::config::Config;
use super::entry::{EntryType, InnerEntry, LeafEntry};
use super::node::{Arena, Body, Node, NodeId};

/// Metadata describing the root in effect over a version range.
#[derive(Debug, Clone, Copy)]
struct RootBox {
    lifespan: Lifespan,
    keyrange: KeyRange,
    root: NodeId,
}

fn union_keyrange(a: KeyRange, b: KeyRange) -> KeyRange {
    KeyRange::new(a.min_key.min(b.min_key), a.max_key.max(b.max_key))
}

/// What a child-level change requires its parent to do: replace one
/// pointer with one (`Plain`), replace one pointer with two from a key
/// split (`KeySplit`), or replace one pointer with a successor that still
/// needs a merge partner found among its own siblings (`NeedsMerge`).
#[derive(Clone, Copy)]
enum Update {
    Plain {
        old_child: NodeId,
        new_child: NodeId,
    },
    KeySplit {
        old_child: NodeId,
        left: NodeId,
        right: NodeId,
    },
    NeedsMerge {
        old_child: NodeId,
        new_child: NodeId,
    },
    /// `child`'s identity is unchanged, but a key landed outside the
    /// keyrange recorded for it; the parent must widen its `InnerEntry`
    /// bounds for `child` to `keyrange` in place, no version split
    /// needed. Propagated all the way to the root so no inner entry's
    /// recorded range ever falls out of sync with what its subtree
    /// actually covers (spec invariant 4: key coverage with no gaps).
    KeyRangeExpanded {
        child: NodeId,
        keyrange: KeyRange,
    },
}

/// A multiversion B+tree: the persistent engine backing key-timestamp,
/// range-timestamp and range-lifespan queries over a stream of inserted
/// and erased `(key, id)` pairs.
pub struct Mvbt {
    config: Config,
    arena: Arena,
    current_version: Version,
    live_root: RootBox,
    root_forest: BTree<Version, RootBox>,
}

impl Mvbt {
    pub fn new(config: Config) -> Mvbt {
        let mut arena = Arena::new();
        let keyrange = KeyRange::new(Key::MAX, Key::MIN);
        let root = arena.alloc(Node::new_leaf(0, keyrange));
        Mvbt {
            config,
            arena,
            current_version: 0,
            live_root: RootBox {
                lifespan: Lifespan::open(0),
                keyrange,
                root,
            },
            root_forest: BTree::new(8),
        }
    }

    pub fn current_version(&self) -> Version {
        self.current_version
    }

    pub fn num_nodes(&self) -> usize {
        self.arena.len()
    }

    pub fn num_historical_roots(&self) -> usize {
        self.root_forest.len()
    }

    // -- mutation -----------------------------------------------------

    pub fn insert(&mut self, v: Version, key: Key, id: Key) {
        assert!(
            v >= self.current_version,
            "version must be non-decreasing across public operations"
        );
        self.current_version = v;
        self.live_root.keyrange = union_keyrange(self.live_root.keyrange, KeyRange::point(key));

        let mut path = self.descend_path(key);
        let leaf_id = path.pop().expect("descent always reaches a leaf");
        let mut update = self.insert_into_leaf(leaf_id, v, key, id);

        while let Some(upd) = update {
            match path.pop() {
                Some(parent_id) => update = self.apply_update(parent_id, v, upd),
                None => {
                    self.finish_at_root(v, upd);
                    update = None;
                }
            }
        }
    }

    pub fn erase(&mut self, v: Version, key: Key, id: Key) -> Result<()> {
        assert!(
            v >= self.current_version,
            "version must be non-decreasing across public operations"
        );
        self.current_version = v;

        let mut path = self.descend_path(key);
        let leaf_id = path.pop().expect("descent always reaches a leaf");
        let mut update = match self.erase_from_leaf(leaf_id, v, key, id) {
            Ok(u) => u,
            Err(e) => {
                warn!(target: "mvbt  ", "erase: {}", e);
                return Err(e);
            }
        };

        while let Some(upd) = update {
            match path.pop() {
                Some(parent_id) => update = self.apply_update(parent_id, v, upd),
                None => {
                    self.finish_at_root(v, upd);
                    update = None;
                }
            }
        }
        Ok(())
    }

    /// Path of alive nodes from the live root down to the leaf that would
    /// hold `key`, root first.
    fn descend_path(&self, key: Key) -> Vec<NodeId> {
        let mut path = vec![self.live_root.root];
        loop {
            let current = *path.last().unwrap();
            let node = self.arena.get(current);
            if node.is_leaf() {
                return path;
            }
            let child = node
                .inner_entries()
                .iter()
                .find(|e| e.is_alive() && e.contains_key(key))
                .map(|e| e.child)
                .unwrap_or_else(|| {
                    // key outside every alive child's range: descend the
                    // nearest one by min_key, extending coverage on the way.
                    node.inner_entries()
                        .iter()
                        .filter(|e| e.is_alive())
                        .min_by_key(|e| (e.min_key - key).abs())
                        .expect("an alive inner node always has a child")
                        .child
                });
            path.push(child);
        }
    }

    fn insert_into_leaf(&mut self, leaf_id: NodeId, v: Version, key: Key, id: Key) -> Option<Update> {
        let cfg = self.config;
        let alive_now = self.arena.get(leaf_id).alive_slots();
        if alive_now + 1 <= cfg.max_slots() {
            let node = self.arena.get_mut(leaf_id);
            node.leaf_entries_mut().push(LeafEntry {
                key,
                lifespan: Lifespan::open(v),
                id,
                entry_type: EntryType::Positive,
            });
            let old_keyrange = node.keyrange;
            let new_keyrange = union_keyrange(old_keyrange, KeyRange::point(key));
            if new_keyrange != old_keyrange {
                node.keyrange = new_keyrange;
                return Some(Update::KeyRangeExpanded {
                    child: leaf_id,
                    keyrange: new_keyrange,
                });
            }
            return None;
        }

        debug!(target: "mvbt  ", "version split leaf {:?} at v={}", leaf_id, v);
        let old_keyrange = self.arena.get(leaf_id).keyrange;
        let mut alive_entries: Vec<LeafEntry> = self
            .arena
            .get(leaf_id)
            .leaf_entries()
            .iter()
            .filter(|e| e.is_alive())
            .map(|e| LeafEntry {
                entry_type: EntryType::Negative,
                ..*e
            })
            .collect();
        self.arena.get_mut(leaf_id).lifespan.end(v);

        alive_entries.push(LeafEntry {
            key,
            lifespan: Lifespan::open(v),
            id,
            entry_type: EntryType::Positive,
        });
        let new_keyrange = union_keyrange(old_keyrange, KeyRange::point(key));

        Some(self.classify_leaf_successor(v, new_keyrange, alive_entries, leaf_id))
    }

    fn erase_from_leaf(&mut self, leaf_id: NodeId, v: Version, key: Key, id: Key) -> Result<Option<Update>> {
        let cfg = self.config;
        let idx = self
            .arena
            .get(leaf_id)
            .leaf_entries()
            .iter()
            .position(|e| e.key == key && e.id == id && e.is_alive());
        let idx = match idx {
            Some(i) => i,
            None => return Err(Error::NotFound(format!("id {} at key {} is not alive", id, key))),
        };

        let alive_now = self.arena.get(leaf_id).alive_slots();
        if alive_now >= 1 && alive_now.saturating_sub(1) >= cfg.min_alive() {
            self.arena.get_mut(leaf_id).leaf_entries_mut()[idx].lifespan.end(v);
            return Ok(None);
        }

        debug!(target: "mvbt  ", "weak-underflow at leaf {:?}, version-splitting", leaf_id);
        let keyrange = self.arena.get(leaf_id).keyrange;
        let alive_entries: Vec<LeafEntry> = self
            .arena
            .get(leaf_id)
            .leaf_entries()
            .iter()
            .enumerate()
            .filter(|(i, e)| *i != idx && e.is_alive())
            .map(|(_, e)| LeafEntry {
                entry_type: EntryType::Negative,
                ..*e
            })
            .collect();
        self.arena.get_mut(leaf_id).lifespan.end(v);

        Ok(Some(self.classify_leaf_successor(v, keyrange, alive_entries, leaf_id)))
    }

    fn classify_leaf_successor(
        &mut self,
        v: Version,
        keyrange: KeyRange,
        alive_entries: Vec<LeafEntry>,
        old_child: NodeId,
    ) -> Update {
        let cfg = self.config;
        let n = alive_entries.len();
        if n > cfg.strong_max_alive() && cfg.strong_max_alive() > 0 {
            let alive_entries = segment_leaf_entries(alive_entries, v, cfg.copy_entry_with_segment());
            let (left_kr, left_entries, right_kr, right_entries) = key_split_leaf(alive_entries, keyrange);
            let left = self.arena.alloc(Node {
                level: 0,
                keyrange: left_kr,
                lifespan: Lifespan::open(v),
                body: Body::Leaf(left_entries),
            });
            let right = self.arena.alloc(Node {
                level: 0,
                keyrange: right_kr,
                lifespan: Lifespan::open(v),
                body: Body::Leaf(right_entries),
            });
            Update::KeySplit { old_child, left, right }
        } else {
            let new_child = self.arena.alloc(Node {
                level: 0,
                keyrange,
                lifespan: Lifespan::open(v),
                body: Body::Leaf(alive_entries),
            });
            if n < cfg.strong_min_alive() {
                Update::NeedsMerge { old_child, new_child }
            } else {
                Update::Plain { old_child, new_child }
            }
        }
    }

    fn classify_inner_successor(
        &mut self,
        v: Version,
        level: usize,
        keyrange: KeyRange,
        alive_entries: Vec<InnerEntry>,
        old_child: NodeId,
    ) -> Update {
        let cfg = self.config;
        let n = alive_entries.len();
        if n > cfg.strong_max_alive() && cfg.strong_max_alive() > 0 {
            let alive_entries = segment_inner_entries(alive_entries, v, cfg.copy_entry_with_segment());
            let (left_kr, left_entries, right_kr, right_entries) = key_split_inner(alive_entries, keyrange);
            let left = self.arena.alloc(Node {
                level,
                keyrange: left_kr,
                lifespan: Lifespan::open(v),
                body: Body::Inner(left_entries),
            });
            let right = self.arena.alloc(Node {
                level,
                keyrange: right_kr,
                lifespan: Lifespan::open(v),
                body: Body::Inner(right_entries),
            });
            Update::KeySplit { old_child, left, right }
        } else {
            let new_child = self.arena.alloc(Node {
                level,
                keyrange,
                lifespan: Lifespan::open(v),
                body: Body::Inner(alive_entries),
            });
            if n < cfg.strong_min_alive() {
                Update::NeedsMerge { old_child, new_child }
            } else {
                Update::Plain { old_child, new_child }
            }
        }
    }

    /// Fold a child-level [Update] into `parent_id`'s own entries, then
    /// apply the identical version-split/overflow/underflow analysis to
    /// the parent, returning what the grandparent must now do (`None` if
    /// nothing needs to propagate further).
    fn apply_update(&mut self, parent_id: NodeId, v: Version, update: Update) -> Option<Update> {
        if let Update::KeyRangeExpanded { child, keyrange } = update {
            let node = self.arena.get_mut(parent_id);
            let old_node_keyrange = node.keyrange;
            if let Some(entry) = node.inner_entries_mut().iter_mut().find(|e| e.child == child && e.is_alive()) {
                entry.min_key = entry.min_key.min(keyrange.min_key);
                entry.max_key = entry.max_key.max(keyrange.max_key);
            }
            let new_node_keyrange = union_keyrange(old_node_keyrange, keyrange);
            if new_node_keyrange == old_node_keyrange {
                return None;
            }
            node.keyrange = new_node_keyrange;
            return Some(Update::KeyRangeExpanded {
                child: parent_id,
                keyrange: new_node_keyrange,
            });
        }

        let level = self.arena.get(parent_id).level;
        let old_keyrange = self.arena.get(parent_id).keyrange;
        let mut carried: Vec<InnerEntry> = self
            .arena
            .get(parent_id)
            .inner_entries()
            .iter()
            .filter(|e| e.is_alive())
            .map(|e| InnerEntry {
                entry_type: EntryType::Negative,
                ..*e
            })
            .collect();

        let mut new_keyrange = old_keyrange;

        match update {
            Update::Plain { old_child, new_child } => {
                carried.retain(|e| e.child != old_child);
                let kr = self.arena.get(new_child).keyrange;
                new_keyrange = union_keyrange(new_keyrange, kr);
                carried.push(InnerEntry {
                    min_key: kr.min_key,
                    max_key: kr.max_key,
                    lifespan: Lifespan::open(v),
                    child: new_child,
                    entry_type: EntryType::Positive,
                });
            }
            Update::KeySplit { old_child, left, right } => {
                carried.retain(|e| e.child != old_child);
                for child in [left, right] {
                    let kr = self.arena.get(child).keyrange;
                    new_keyrange = union_keyrange(new_keyrange, kr);
                    carried.push(InnerEntry {
                        min_key: kr.min_key,
                        max_key: kr.max_key,
                        lifespan: Lifespan::open(v),
                        child,
                        entry_type: EntryType::Positive,
                    });
                }
            }
            Update::NeedsMerge { old_child, new_child } => {
                carried.retain(|e| e.child != old_child);
                let new_kr = self.arena.get(new_child).keyrange;
                let sibling_idx = pick_merge_sibling(&carried, new_kr);
                match sibling_idx {
                    Some(idx) => {
                        let sibling_child = carried.remove(idx).child;
                        let merged_alive = self.merge_child_bodies(new_child, sibling_child, v);
                        let cfg = self.config;
                        if merged_alive > cfg.strong_max_alive() && cfg.strong_max_alive() > 0 {
                            let (left, right) = self.key_split_existing(new_child, v);
                            for child in [left, right] {
                                let kr = self.arena.get(child).keyrange;
                                new_keyrange = union_keyrange(new_keyrange, kr);
                                carried.push(InnerEntry {
                                    min_key: kr.min_key,
                                    max_key: kr.max_key,
                                    lifespan: Lifespan::open(v),
                                    child,
                                    entry_type: EntryType::Positive,
                                });
                            }
                        } else {
                            let kr = self.arena.get(new_child).keyrange;
                            new_keyrange = union_keyrange(new_keyrange, kr);
                            carried.push(InnerEntry {
                                min_key: kr.min_key,
                                max_key: kr.max_key,
                                lifespan: Lifespan::open(v),
                                child: new_child,
                                entry_type: EntryType::Positive,
                            });
                        }
                    }
                    None => {
                        // no sibling under this parent: nothing to merge with,
                        // carry the under-filled successor forward as-is.
                        new_keyrange = union_keyrange(new_keyrange, new_kr);
                        carried.push(InnerEntry {
                            min_key: new_kr.min_key,
                            max_key: new_kr.max_key,
                            lifespan: Lifespan::open(v),
                            child: new_child,
                            entry_type: EntryType::Positive,
                        });
                    }
                }
            }
            Update::KeyRangeExpanded { .. } => unreachable!("handled by the early return above"),
        }

        self.arena.get_mut(parent_id).lifespan.end(v);
        Some(self.classify_inner_successor(v, level, new_keyrange, carried, parent_id))
    }

    /// Combine `sibling_child`'s alive entries into `new_child`'s body,
    /// ending `sibling_child`. Returns the merged node's alive count.
    fn merge_child_bodies(&mut self, new_child: NodeId, sibling_child: NodeId, v: Version) -> usize {
        self.arena.get_mut(sibling_child).lifespan.end(v);
        let sibling_kr = self.arena.get(sibling_child).keyrange;
        let merged_kr = union_keyrange(self.arena.get(new_child).keyrange, sibling_kr);

        if self.arena.get(sibling_child).is_leaf() {
            let sibling_alive: Vec<LeafEntry> = self
                .arena
                .get(sibling_child)
                .leaf_entries()
                .iter()
                .filter(|e| e.is_alive())
                .map(|e| LeafEntry {
                    entry_type: EntryType::Negative,
                    ..*e
                })
                .collect();
            let node = self.arena.get_mut(new_child);
            node.leaf_entries_mut().extend(sibling_alive);
            node.keyrange = merged_kr;
        } else {
            let sibling_alive: Vec<InnerEntry> = self
                .arena
                .get(sibling_child)
                .inner_entries()
                .iter()
                .filter(|e| e.is_alive())
                .map(|e| InnerEntry {
                    entry_type: EntryType::Negative,
                    ..*e
                })
                .collect();
            let node = self.arena.get_mut(new_child);
            node.inner_entries_mut().extend(sibling_alive);
            node.keyrange = merged_kr;
        }
        self.arena.get(new_child).alive_slots()
    }

    /// Key-split an already-allocated (not yet linked) node's entries into
    /// two fresh nodes at the same level. The source node is abandoned.
    fn key_split_existing(&mut self, node_id: NodeId, v: Version) -> (NodeId, NodeId) {
        let level = self.arena.get(node_id).level;
        let keyrange = self.arena.get(node_id).keyrange;
        let segment = self.config.copy_entry_with_segment();
        if self.arena.get(node_id).is_leaf() {
            let entries = self.arena.get(node_id).leaf_entries().to_vec();
            let entries = segment_leaf_entries(entries, v, segment);
            let (left_kr, left_entries, right_kr, right_entries) = key_split_leaf(entries, keyrange);
            let left = self.arena.alloc(Node {
                level,
                keyrange: left_kr,
                lifespan: Lifespan::open(v),
                body: Body::Leaf(left_entries),
            });
            let right = self.arena.alloc(Node {
                level,
                keyrange: right_kr,
                lifespan: Lifespan::open(v),
                body: Body::Leaf(right_entries),
            });
            (left, right)
        } else {
            let entries = self.arena.get(node_id).inner_entries().to_vec();
            let entries = segment_inner_entries(entries, v, segment);
            let (left_kr, left_entries, right_kr, right_entries) = key_split_inner(entries, keyrange);
            let left = self.arena.alloc(Node {
                level,
                keyrange: left_kr,
                lifespan: Lifespan::open(v),
                body: Body::Inner(left_entries),
            });
            let right = self.arena.alloc(Node {
                level,
                keyrange: right_kr,
                lifespan: Lifespan::open(v),
                body: Body::Inner(right_entries),
            });
            (left, right)
        }
    }

    fn finish_at_root(&mut self, v: Version, update: Update) {
        match update {
            Update::Plain { new_child, .. } | Update::NeedsMerge { new_child, .. } => {
                self.replace_root(v, new_child);
            }
            Update::KeyRangeExpanded { keyrange, .. } => {
                // the root node itself was widened in place, no new
                // generation needed; just keep the RootBox's cached
                // keyrange in sync with it.
                self.live_root.keyrange = union_keyrange(self.live_root.keyrange, keyrange);
            }
            Update::KeySplit { left, right, .. } => {
                let new_level = self.arena.get(left).level + 1;
                let left_kr = self.arena.get(left).keyrange;
                let right_kr = self.arena.get(right).keyrange;
                let entries = vec![
                    InnerEntry {
                        min_key: left_kr.min_key,
                        max_key: left_kr.max_key,
                        lifespan: Lifespan::open(v),
                        child: left,
                        entry_type: EntryType::Positive,
                    },
                    InnerEntry {
                        min_key: right_kr.min_key,
                        max_key: right_kr.max_key,
                        lifespan: Lifespan::open(v),
                        child: right,
                        entry_type: EntryType::Positive,
                    },
                ];
                let new_root = self.arena.alloc(Node {
                    level: new_level,
                    keyrange: union_keyrange(left_kr, right_kr),
                    lifespan: Lifespan::open(v),
                    body: Body::Inner(entries),
                });
                debug!(target: "mvbt  ", "root growth to level {} at v={}", new_level, v);
                self.replace_root(v, new_root);
            }
        }
    }

    fn replace_root(&mut self, v: Version, new_root: NodeId) {
        let mut closed = self.live_root;
        closed.lifespan.end(v);
        // a rootbox whose lifespan is empty (opened and closed at the same
        // version, from a second root growth within one version) covers no
        // queryable version and would collide with the previous forest key.
        if closed.lifespan.start_version != v {
            self.root_forest.insert(closed.lifespan.start_version, closed);
        }
        let keyrange = self.arena.get(new_root).keyrange;
        self.live_root = RootBox {
            lifespan: Lifespan::open(v),
            keyrange,
            root: new_root,
        };
    }

    // -- queries --------------------------------------------------------

    fn root_for_version(&self, v: Version) -> Option<NodeId> {
        if v >= self.live_root.lifespan.start_version {
            Some(self.live_root.root)
        } else {
            self.root_forest.floor(v).map(|(_, rb)| rb.root)
        }
    }

    pub fn query_key_timestamp(&self, key: Key, v: Version) -> Vec<Key> {
        assert!(v <= self.current_version, "query version exceeds current version");
        let mut out = Vec::new();
        if let Some(root) = self.root_for_version(v) {
            self.descend_key(root, key, v, &mut out);
        }
        out
    }

    fn descend_key(&self, node_id: NodeId, key: Key, v: Version, out: &mut Vec<Key>) {
        let node = self.arena.get(node_id);
        if node.is_leaf() {
            out.extend(
                node.leaf_entries()
                    .iter()
                    .filter(|e| e.key == key && e.is_alive_at(v))
                    .map(|e| e.id),
            );
        } else {
            for e in node.inner_entries() {
                if e.is_alive_at(v) && e.contains_key(key) {
                    self.descend_key(e.child, key, v, out);
                }
            }
        }
    }

    pub fn query_range_timestamp(&self, lo: Key, hi: Key, v: Version) -> Vec<Key> {
        assert!(v <= self.current_version, "query version exceeds current version");
        let mut out = Vec::new();
        if let Some(root) = self.root_for_version(v) {
            self.descend_range(root, lo, hi, v, &mut out);
        }
        out
    }

    fn descend_range(&self, node_id: NodeId, lo: Key, hi: Key, v: Version, out: &mut Vec<Key>) {
        let node = self.arena.get(node_id);
        if node.is_leaf() {
            out.extend(
                node.leaf_entries()
                    .iter()
                    .filter(|e| e.key >= lo && e.key <= hi && e.is_alive_at(v))
                    .map(|e| e.id),
            );
        } else {
            for e in node.inner_entries() {
                if e.is_alive_at(v) && e.overlaps_keyrange(lo, hi) {
                    self.descend_range(e.child, lo, hi, v, out);
                }
            }
        }
    }

    /// Every leaf entry whose key is in `[lo, hi]` and whose lifespan
    /// intersects `[v_lo, v_hi]`, reduced by `reduce`. Ids are deduplicated
    /// across the historical roots walked to cover the version window, so
    /// a long-lived entry visible from several root generations is folded
    /// in exactly once.
    pub fn query_range_lifespan(&self, lo: Key, hi: Key, v_lo: Version, v_hi: Version, reduce: Reduce) -> i64 {
        assert!(v_hi <= self.current_version, "query version exceeds current version");

        let mut roots = Vec::new();
        for (_, rb) in self.root_forest.iter() {
            if rb.lifespan.intersects(v_lo, v_hi) {
                roots.push(rb.root);
            }
        }
        if self.live_root.lifespan.intersects(v_lo, v_hi) {
            roots.push(self.live_root.root);
        }

        let mut seen: HashSet<Key> = HashSet::new();
        let mut result: i64 = 0;
        for root in roots {
            self.collect_range_lifespan(root, lo, hi, v_lo, v_hi, &mut seen, reduce, &mut result);
        }
        result
    }

    pub fn execute_range_time_travel(&self, lo: Key, hi: Key, v_lo: Version, v_hi: Version, reduce: Reduce) -> i64 {
        self.query_range_lifespan(lo, hi, v_lo, v_hi, reduce)
    }

    #[allow(clippy::too_many_arguments)]
    fn collect_range_lifespan(
        &self,
        node_id: NodeId,
        lo: Key,
        hi: Key,
        v_lo: Version,
        v_hi: Version,
        seen: &mut HashSet<Key>,
        reduce: Reduce,
        result: &mut i64,
    ) {
        let node = self.arena.get(node_id);
        if node.is_leaf() {
            for e in node.leaf_entries() {
                if e.key >= lo && e.key <= hi && e.lifespan.intersects(v_lo, v_hi) && seen.insert(e.id) {
                    *result = reduce.combine(*result, e.id);
                }
            }
        } else {
            for e in node.inner_entries() {
                if e.overlaps_keyrange(lo, hi) && e.lifespan.intersects(v_lo, v_hi) {
                    self.collect_range_lifespan(e.child, lo, hi, v_lo, v_hi, seen, reduce, result);
                }
            }
        }
    }
}

fn pick_merge_sibling(candidates: &[InnerEntry], target: KeyRange) -> Option<usize> {
    candidates
        .iter()
        .position(|e| e.max_key + 1 == target.min_key || target.max_key + 1 == e.min_key)
        .or_else(|| {
            candidates
                .iter()
                .enumerate()
                .min_by_key(|(_, e)| (e.min_key - target.min_key).abs())
                .map(|(idx, _)| idx)
        })
}

/// When `copy_entry_with_segment` is on, every entry surviving a key
/// split is reborn at `v`: its carried-forward copy starts a fresh
/// lifespan instead of extending the one it already had. The original
/// history stays intact in the abandoned predecessor node, so this only
/// affects how the successor's own entries are dated, not what a
/// historical query sees.
fn segment_leaf_entries(entries: Vec<LeafEntry>, v: Version, segment: bool) -> Vec<LeafEntry> {
    if !segment {
        return entries;
    }
    entries
        .into_iter()
        .map(|e| LeafEntry {
            lifespan: Lifespan::open(v),
            entry_type: EntryType::Positive,
            ..e
        })
        .collect()
}

fn segment_inner_entries(entries: Vec<InnerEntry>, v: Version, segment: bool) -> Vec<InnerEntry> {
    if !segment {
        return entries;
    }
    entries
        .into_iter()
        .map(|e| InnerEntry {
            lifespan: Lifespan::open(v),
            entry_type: EntryType::Positive,
            ..e
        })
        .collect()
}

/// Split sorted-by-key `entries` at the median into two halves, with the
/// halves' keyranges set from `bounds` (the full keyrange the node being
/// split was responsible for) and `split_key`, not from the tight bounding
/// box of the entries actually present. Grounded in
/// `original_source/indices/mvbtree.h:2301-2367`
/// (`node->keyrange.max_key = split_key;` / the successor's keyrange is
/// `[split_key, old_max_key)`): the node's keyrange is the contiguous
/// partition of key space it answers for, which can be wider than any
/// entry actually stored in it, so a sparse key routed here must still
/// land inside the range a later lookup will recompute the same descent
/// from.
fn key_split_leaf(mut entries: Vec<LeafEntry>, bounds: KeyRange) -> (KeyRange, Vec<LeafEntry>, KeyRange, Vec<LeafEntry>) {
    entries.sort_by_key(|e| e.key);
    let mid = (entries.len() + 1) / 2;
    let split_key = entries[mid].key;
    let right = entries.split_off(mid);
    let left = entries;
    let left_kr = KeyRange::new(bounds.min_key, split_key - 1);
    let right_kr = KeyRange::new(split_key, bounds.max_key);
    (left_kr, left, right_kr, right)
}

fn key_split_inner(mut entries: Vec<InnerEntry>, bounds: KeyRange) -> (KeyRange, Vec<InnerEntry>, KeyRange, Vec<InnerEntry>) {
    entries.sort_by_key(|e| e.min_key);
    let mid = (entries.len() + 1) / 2;
    let split_key = entries[mid].min_key;
    let right = entries.split_off(mid);
    let left = entries;
    let left_kr = KeyRange::new(bounds.min_key, split_key - 1);
    let right_kr = KeyRange::new(split_key, bounds.max_key);
    (left_kr, left, right_kr, right)
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;

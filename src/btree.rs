//! Module `btree` is a plain (single-version) B+tree, used by [crate::mvbt]
//! to hold the root forest: historical `RootBox` values keyed by their
//! `start_version`, with an in-order-predecessor lookup for historical
//! root routing.
//!
//! Nodes live in an arena and are addressed by [NodeId] rather than by
//! pointer, mirroring the arena discipline used by the multiversion tree
//! itself.

use std::fmt;

/// Index into a [BTree]'s node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

enum Node<K, V> {
    Leaf {
        keys: Vec<K>,
        values: Vec<V>,
    },
    Inner {
        // keys[i] is the smallest key reachable through children[i+1].
        keys: Vec<K>,
        children: Vec<NodeId>,
    },
}

/// A plain B+tree with branching factor `order`, storing `(K, V)` pairs.
/// Keys must be inserted in strictly increasing order -- the only access
/// pattern the root forest ever needs -- and `floor` resolves the
/// in-order predecessor of a query key.
pub struct BTree<K, V> {
    order: usize,
    arena: Vec<Node<K, V>>,
    root: NodeId,
    len: usize,
}

impl<K, V> BTree<K, V>
where
    K: Ord + Copy + fmt::Debug,
{
    pub fn new(order: usize) -> BTree<K, V> {
        assert!(order >= 3, "order must allow at least one split child");
        let root = Node::Leaf {
            keys: Vec::new(),
            values: Vec::new(),
        };
        BTree {
            order,
            arena: vec![root],
            root: NodeId(0),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert `(key, value)`. `key` must be strictly greater than every
    /// key already present.
    pub fn insert(&mut self, key: K, value: V) {
        if let Some(last) = self.max_key() {
            assert!(key > last, "root forest keys must be strictly increasing");
        }
        self.len += 1;
        if let Some((split_key, right)) = self.insert_into(self.root, key, value) {
            let left = self.root;
            let new_root = Node::Inner {
                keys: vec![split_key],
                children: vec![left, right],
            };
            self.root = self.push(new_root);
        }
    }

    fn max_key(&self) -> Option<K> {
        let mut id = self.root;
        loop {
            match &self.arena[id.0] {
                Node::Leaf { keys, .. } => return keys.last().copied(),
                Node::Inner { children, .. } => id = *children.last().unwrap(),
            }
        }
    }

    fn push(&mut self, node: Node<K, V>) -> NodeId {
        self.arena.push(node);
        NodeId(self.arena.len() - 1)
    }

    /// Returns `Some((split_key, new_right_sibling))` when `id` overflowed
    /// and had to be split; `split_key` is the smallest key of the new
    /// right sibling's subtree.
    fn insert_into(&mut self, id: NodeId, key: K, value: V) -> Option<(K, NodeId)> {
        match &mut self.arena[id.0] {
            Node::Leaf { keys, values } => {
                let pos = keys.partition_point(|k| *k < key);
                keys.insert(pos, key);
                values.insert(pos, value);
                if keys.len() <= self.order {
                    return None;
                }
                let mid = keys.len() / 2;
                let right_keys = keys.split_off(mid);
                let right_values = values.split_off(mid);
                let split_key = right_keys[0];
                let right = self.push(Node::Leaf {
                    keys: right_keys,
                    values: right_values,
                });
                Some((split_key, right))
            }
            Node::Inner { keys, children } => {
                let child_idx = keys.partition_point(|k| *k <= key);
                let child = children[child_idx];
                match self.insert_into(child, key, value) {
                    None => None,
                    Some((split_key, right_child)) => {
                        keys.insert(child_idx, split_key);
                        children.insert(child_idx + 1, right_child);
                        if keys.len() <= self.order {
                            None
                        } else {
                            let mid = keys.len() / 2;
                            let right_keys = keys.split_off(mid + 1);
                            let promoted = keys.remove(mid);
                            let right_children = children.split_off(mid + 1);
                            let right = self.push(Node::Inner {
                                keys: right_keys,
                                children: right_children,
                            });
                            Some((promoted, right))
                        }
                    }
                }
            }
        }
    }

    /// Exact lookup.
    pub fn get(&self, key: K) -> Option<&V> {
        let mut id = self.root;
        loop {
            match &self.arena[id.0] {
                Node::Leaf { keys, values } => {
                    return keys.iter().position(|k| *k == key).map(|i| &values[i]);
                }
                Node::Inner { keys, children } => {
                    let idx = keys.partition_point(|k| *k <= key);
                    id = children[idx];
                }
            }
        }
    }

    /// In-order traversal of every stored pair, ascending by key.
    pub fn iter(&self) -> Vec<(&K, &V)> {
        let mut out = Vec::with_capacity(self.len);
        self.collect_inorder(self.root, &mut out);
        out
    }

    fn collect_inorder<'a>(&'a self, id: NodeId, out: &mut Vec<(&'a K, &'a V)>) {
        match &self.arena[id.0] {
            Node::Leaf { keys, values } => out.extend(keys.iter().zip(values.iter())),
            Node::Inner { children, .. } => {
                for child in children {
                    self.collect_inorder(*child, out);
                }
            }
        }
    }

    /// In-order predecessor: the greatest key `<= key`, or `None` if every
    /// stored key is greater than `key`.
    pub fn floor(&self, key: K) -> Option<(&K, &V)> {
        let mut id = self.root;
        loop {
            match &self.arena[id.0] {
                Node::Leaf { keys, values } => {
                    let pos = keys.partition_point(|k| *k <= key);
                    return if pos == 0 {
                        None
                    } else {
                        Some((&keys[pos - 1], &values[pos - 1]))
                    };
                }
                Node::Inner { keys, children } => {
                    let idx = keys.partition_point(|k| *k <= key);
                    id = children[idx];
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "btree_test.rs"]
mod btree_test;

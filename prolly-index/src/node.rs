//! Tree node representation.
//!
//! A node is an immutable, content-addressed block of items. Items appear in
//! pairs: at level 0 a pair is `(key, value)`; above level 0 a pair is
//! `(boundary_key, meta_value)`, where the boundary key equals the last key
//! in the subtree the meta value points to.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::meta::{new_meta_value, MetaValue};
use crate::store::{Context, NodeStore};
use crate::{KeyOrder, Result};

/// Fixed pair width inside a node's item array.
pub const STRIDE: usize = 2;

/// An immutable tree node. Leaves are level 0; an internal node at level L
/// references only nodes at level L-1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    level: u8,
    items: Vec<Vec<u8>>,
}

/// A `(key, value)` pair borrowed from a node.
#[derive(Debug, Clone, Copy)]
pub struct NodePair<'a> {
    key: &'a [u8],
    value: &'a [u8],
}

impl<'a> NodePair<'a> {
    pub fn key(&self) -> &'a [u8] {
        self.key
    }

    pub fn value(&self) -> &'a [u8] {
        self.value
    }
}

impl Node {
    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn is_leaf(&self) -> bool {
        self.level == 0
    }

    /// Number of items. Always even: items form pairs.
    pub fn node_count(&self) -> usize {
        self.items.len()
    }

    pub fn pair_count(&self) -> usize {
        self.items.len() / STRIDE
    }

    pub fn item(&self, i: usize) -> &[u8] {
        &self.items[i]
    }

    /// Pair `i` occupies items `[2i, 2i+1]`.
    pub fn pair(&self, i: usize) -> NodePair<'_> {
        NodePair {
            key: &self.items[i * STRIDE],
            value: &self.items[i * STRIDE + 1],
        }
    }

    /// Total number of leaf pairs reachable from this node. For a leaf this
    /// is its own pair count; for an internal node it is the sum of the
    /// cumulative counts carried by its meta values.
    pub fn cumulative_count(&self) -> u64 {
        if self.is_leaf() {
            return self.pair_count() as u64;
        }
        (0..self.pair_count())
            .map(|i| MetaValue::from_item(self.pair(i).value()).cumulative_count())
            .sum()
    }

    /// Validate this node and, when a store is given, its entire subtree:
    /// even item count, strictly increasing keys under `cmp`, boundary keys
    /// equal to the last key of the referenced child, cumulative counts
    /// consistent, and child levels one below the parent.
    pub fn validate(
        &self,
        ctx: &Context,
        store: Option<&dyn NodeStore>,
        cmp: &KeyOrder,
    ) -> std::result::Result<(), String> {
        if self.items.len() % STRIDE != 0 {
            return Err(format!(
                "node at level {} has {} items (odd)",
                self.level,
                self.items.len()
            ));
        }

        for i in 1..self.pair_count() {
            let prev = self.pair(i - 1).key();
            let cur = self.pair(i).key();
            if cmp(prev, cur) != std::cmp::Ordering::Less {
                return Err(format!(
                    "keys out of order at pair {} of level-{} node: {:?} !< {:?}",
                    i, self.level, prev, cur
                ));
            }
        }

        if self.is_leaf() {
            return Ok(());
        }

        let store = match store {
            Some(s) => s,
            None => return Ok(()),
        };

        for i in 0..self.pair_count() {
            let pair = self.pair(i);
            let mv = MetaValue::from_item(pair.value());
            let child = store
                .read(ctx, mv.child_ref())
                .map_err(|e| format!("child {} of pair {}: {}", mv.child_ref(), i, e))?;

            if child.level() + 1 != self.level {
                return Err(format!(
                    "child at pair {} has level {}, parent has level {}",
                    i,
                    child.level(),
                    self.level
                ));
            }
            if child.node_count() == 0 {
                return Err(format!("empty child at pair {}", i));
            }

            let child_last = child.pair(child.pair_count() - 1).key();
            if cmp(pair.key(), child_last) != std::cmp::Ordering::Equal {
                return Err(format!(
                    "boundary key {:?} at pair {} does not equal child's last key {:?}",
                    pair.key(),
                    i,
                    child_last
                ));
            }

            if mv.cumulative_count() != child.cumulative_count() {
                return Err(format!(
                    "meta count {} at pair {} does not match child subtree count {}",
                    mv.cumulative_count(),
                    i,
                    child.cumulative_count()
                ));
            }

            child.validate(ctx, Some(store), cmp)?;
        }

        Ok(())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_leaf() {
            write!(f, "Leaf({} pairs)", self.pair_count())
        } else {
            write!(f, "Internal(level={}, pairs={})", self.level, self.pair_count())
        }
    }
}

/// Construct a node from pre-encoded items. Items must form pairs.
pub fn make_node(level: u8, items: Vec<Vec<u8>>) -> Node {
    assert!(items.len() % STRIDE == 0, "node items must form pairs");
    Node { level, items }
}

/// Write a new node and derive the `(boundary_key, meta_value)` pair that
/// identifies it in its parent: the boundary key is a pooled clone of the
/// last pair's key, the meta value carries the subtree count and the written
/// hash. An empty leaf yields no meta pair.
pub fn write_new_child(
    ctx: &Context,
    store: &dyn NodeStore,
    level: u8,
    items: Vec<Vec<u8>>,
) -> Result<(Arc<Node>, Option<(Vec<u8>, Vec<u8>)>)> {
    let child = make_node(level, items);
    let child_ref = store.write(ctx, &child)?;

    if child.node_count() == 0 {
        return Ok((Arc::new(child), None));
    }

    let pool = store.pool();
    let last_key = child.item(child.node_count() - STRIDE);
    let mut meta_key = pool.get(last_key.len());
    meta_key.extend_from_slice(last_key);
    let meta_val = new_meta_value(pool, child.cumulative_count(), child_ref);

    Ok((Arc::new(child), Some((meta_key, meta_val))))
}

//! Bottom-up tree construction with content-based chunk boundaries.
//!
//! Items are chunked by a deterministic rolling hash: a chunk ends when the
//! rolled value falls below the split pattern (after a minimum size), or at
//! the end of the level. Each chunk is written as a node and represented one
//! level up by its `(boundary_key, meta_value)` pair, until a level fits in
//! a single node. Equal inputs always produce equal trees.
//!
//! The cursor layer is independent of this policy; it only interprets the
//! resulting nodes.

use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::hash::Hash;
use crate::meta::MetaValue;
use crate::node::{write_new_child, Node, STRIDE};
use crate::store::{Context, NodeStore};
use crate::Result;

const MIN_CHUNK_PAIRS: usize = 2;

pub const DEFAULT_PATTERN: f64 = 0.01;
pub const DEFAULT_SEED: u32 = 42;

/// Builds prolly trees from sorted `(key, value)` pairs.
pub struct TreeBuilder {
    /// Split threshold scaled to u32. Higher pattern means smaller chunks.
    pattern: u32,
    /// Seed for the rolling hash, for reproducibility.
    seed: u32,
}

impl TreeBuilder {
    /// `pattern` is the split probability in `0.0..=1.0`; the default 0.01
    /// averages about 100 pairs per chunk.
    pub fn new(pattern: f64, seed: u32) -> Self {
        TreeBuilder {
            pattern: (pattern * u32::MAX as f64) as u32,
            seed,
        }
    }

    /// Write a tree holding `items`, which must be sorted and free of
    /// duplicate keys under the tree's comparator. Returns the root node and
    /// its hash.
    pub fn build(
        &self,
        ctx: &Context,
        store: &dyn NodeStore,
        items: &[(Vec<u8>, Vec<u8>)],
    ) -> Result<(Arc<Node>, Hash)> {
        let mut current: Vec<Vec<u8>> = items
            .iter()
            .flat_map(|(k, v)| [k.clone(), v.clone()])
            .collect();

        let mut level = 0u8;
        loop {
            let mut chunks = self.chunk_level(current);

            if chunks.len() == 1 {
                let (root, meta) = write_new_child(ctx, store, level, chunks.remove(0))?;
                let root_ref = match meta {
                    Some((meta_key, meta_val)) => {
                        let root_ref = MetaValue::from_item(&meta_val).child_ref();
                        store.pool().put(meta_key);
                        store.pool().put(meta_val);
                        root_ref
                    }
                    // empty tree: an empty leaf is the root
                    None => store.write(ctx, &root)?,
                };
                return Ok((root, root_ref));
            }

            let mut next = Vec::with_capacity(chunks.len() * STRIDE);
            for chunk in chunks {
                let (_, meta) = write_new_child(ctx, store, level, chunk)?;
                let (meta_key, meta_val) =
                    meta.expect("non-empty chunk always yields a meta pair");
                next.push(meta_key);
                next.push(meta_val);
            }
            current = next;
            level += 1;
        }
    }

    /// Split one level's items into chunks on pair boundaries.
    fn chunk_level(&self, items: Vec<Vec<u8>>) -> Vec<Vec<Vec<u8>>> {
        if items.is_empty() {
            return vec![Vec::new()];
        }

        let total = items.len();
        let mut chunks = Vec::new();
        let mut chunk: Vec<Vec<u8>> = Vec::new();
        let mut roll = self.seed;

        for (i, item) in items.into_iter().enumerate() {
            roll = self.rolling_hash(roll, &item);
            chunk.push(item);

            if chunk.len() % STRIDE != 0 {
                continue;
            }
            let has_min = chunk.len() / STRIDE >= MIN_CHUNK_PAIRS;
            let last = i + 1 == total;
            if (has_min && roll < self.pattern) || last {
                chunks.push(std::mem::take(&mut chunk));
                roll = self.seed;
            }
        }

        chunks
    }

    /// Deterministic rolling hash: SHA-256 over the previous value chained
    /// with the next item's bytes, truncated to u32.
    fn rolling_hash(&self, current: u32, data: &[u8]) -> u32 {
        let mut hasher = Sha256::new();
        hasher.update(current.to_be_bytes());
        hasher.update(data);
        let digest = hasher.finalize();
        u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        TreeBuilder::new(DEFAULT_PATTERN, DEFAULT_SEED)
    }
}

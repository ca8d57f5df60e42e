//! Ordered pairwise diff of two trees.
//!
//! Two cursors are advanced in lockstep under a shared comparator and tagged
//! rows are emitted lazily, in ascending key order. Leaf chunks referenced
//! by equal hashes are skipped wholesale; equal roots short-circuit to an
//! empty stream. The stream is finite and restartable only by rebuilding
//! the differ.

use std::cmp::Ordering;

use crate::cursor::NodeCursor;
use crate::hash::Hash;
use crate::store::{Context, NodeStore};
use crate::{KeyOrder, Result};

/// A change between the `from` tree and the `to` tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffEvent {
    /// Key present in `to`, absent in `from`.
    Added { key: Vec<u8>, value: Vec<u8> },
    /// Key present in `from`, absent in `to`.
    Removed { key: Vec<u8>, old_value: Vec<u8> },
    /// Key present in both with differing values.
    Modified {
        key: Vec<u8>,
        old_value: Vec<u8>,
        new_value: Vec<u8>,
    },
}

impl DiffEvent {
    pub fn key(&self) -> &[u8] {
        match self {
            DiffEvent::Added { key, .. } => key,
            DiffEvent::Removed { key, .. } => key,
            DiffEvent::Modified { key, .. } => key,
        }
    }
}

/// Counters from a diff traversal.
#[derive(Debug, Clone, Default)]
pub struct DiffStats {
    /// Leaf chunks skipped because both sides referenced the same hash.
    pub chunks_skipped: usize,
}

/// Streaming iterator over the ordered differences between two trees.
pub struct Differ<'a> {
    ctx: Context,
    from: NodeCursor<'a>,
    to: NodeCursor<'a>,
    cmp: &'a KeyOrder,
    done: bool,
    stats: DiffStats,
}

impl<'a> Differ<'a> {
    /// Build a differ over two roots held in the same store. Both trees must
    /// have been built under `cmp`.
    pub fn new(
        ctx: &Context,
        store: &'a dyn NodeStore,
        from_root: Hash,
        to_root: Hash,
        cmp: &'a KeyOrder,
    ) -> Result<Self> {
        let done = from_root == to_root;
        let from_nd = store.read(ctx, from_root)?;
        let to_nd = store.read(ctx, to_root)?;
        let from = NodeCursor::new_at_start(ctx, store, from_nd)?;
        let to = NodeCursor::new_at_start(ctx, store, to_nd)?;
        Ok(Differ {
            ctx: ctx.clone(),
            from,
            to,
            cmp,
            done,
            stats: DiffStats::default(),
        })
    }

    pub fn stats(&self) -> &DiffStats {
        &self.stats
    }

    fn step(&mut self) -> Result<Option<DiffEvent>> {
        loop {
            self.ctx.check()?;

            // both sitting at the start of identically-hashed chunks:
            // nothing inside can differ, skip the whole chunk
            if self.from.valid()
                && self.to.valid()
                && self.from.at_node_start()
                && self.to.at_node_start()
            {
                if let (Some(f), Some(t)) = (self.from.chunk_ref(), self.to.chunk_ref()) {
                    if f == t {
                        self.stats.chunks_skipped += 1;
                        self.from.skip_to_node_end();
                        self.to.skip_to_node_end();
                        self.from.advance(&self.ctx)?;
                        self.to.advance(&self.ctx)?;
                        continue;
                    }
                }
            }

            match (self.from.valid(), self.to.valid()) {
                (false, false) => return Ok(None),
                (true, false) => {
                    let event = {
                        let pair = self.from.current_pair();
                        DiffEvent::Removed {
                            key: pair.key().to_vec(),
                            old_value: pair.value().to_vec(),
                        }
                    };
                    self.from.advance(&self.ctx)?;
                    return Ok(Some(event));
                }
                (false, true) => {
                    let event = {
                        let pair = self.to.current_pair();
                        DiffEvent::Added {
                            key: pair.key().to_vec(),
                            value: pair.value().to_vec(),
                        }
                    };
                    self.to.advance(&self.ctx)?;
                    return Ok(Some(event));
                }
                (true, true) => {
                    let ord = (self.cmp)(
                        self.from.current_pair().key(),
                        self.to.current_pair().key(),
                    );
                    match ord {
                        Ordering::Less => {
                            let event = {
                                let pair = self.from.current_pair();
                                DiffEvent::Removed {
                                    key: pair.key().to_vec(),
                                    old_value: pair.value().to_vec(),
                                }
                            };
                            self.from.advance(&self.ctx)?;
                            return Ok(Some(event));
                        }
                        Ordering::Greater => {
                            let event = {
                                let pair = self.to.current_pair();
                                DiffEvent::Added {
                                    key: pair.key().to_vec(),
                                    value: pair.value().to_vec(),
                                }
                            };
                            self.to.advance(&self.ctx)?;
                            return Ok(Some(event));
                        }
                        Ordering::Equal => {
                            let event = {
                                let from_pair = self.from.current_pair();
                                let to_pair = self.to.current_pair();
                                if from_pair.value() != to_pair.value() {
                                    Some(DiffEvent::Modified {
                                        key: to_pair.key().to_vec(),
                                        old_value: from_pair.value().to_vec(),
                                        new_value: to_pair.value().to_vec(),
                                    })
                                } else {
                                    None
                                }
                            };
                            self.from.advance(&self.ctx)?;
                            self.to.advance(&self.ctx)?;
                            if let Some(event) = event {
                                return Ok(Some(event));
                            }
                        }
                    }
                }
            }
        }
    }
}

impl<'a> Iterator for Differ<'a> {
    type Item = Result<DiffEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.step() {
            Ok(Some(event)) => Some(Ok(event)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

//! Pairwise commit-state partitions, the unit of work handed to the differ.
//!
//! A partition names two tree roots chosen by a higher layer (for example
//! the table states at two commits). The cursor layer never interprets
//! schema; whether a partition is diffable at all is decided here, before
//! any cursor is built, by comparing the primary key sets the two states
//! were keyed under.

use crate::diff::Differ;
use crate::hash::Hash;
use crate::store::{Context, NodeStore};
use crate::{KeyOrder, Result};

/// A `(from, to)` pair of tree roots to be diffed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    key: String,
    from: Hash,
    to: Hash,
}

impl Partition {
    pub fn new(from: Hash, to: Hash) -> Self {
        Partition {
            key: format!("{}..{}", from, to),
            from,
            to,
        }
    }

    /// Stable identifier for this partition, derived from the base32 form
    /// of both roots.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn from_root(&self) -> Hash {
        self.from
    }

    pub fn to_root(&self) -> Hash {
        self.to
    }

    /// Equal roots cannot produce any rows.
    pub fn is_trivial(&self) -> bool {
        self.from == self.to
    }

    /// Build the ordered row stream for this partition.
    pub fn differ<'a>(
        &self,
        ctx: &Context,
        store: &'a dyn NodeStore,
        cmp: &'a KeyOrder,
    ) -> Result<Differ<'a>> {
        Differ::new(ctx, store, self.from, self.to, cmp)
    }
}

/// Whether two primary key sets describe comparable row identities. Key
/// columns are matched positionally: a reordered set keys rows differently
/// and is not diffable.
pub fn key_sets_diffable<T: PartialEq>(from_keys: &[T], to_keys: &[T]) -> bool {
    from_keys == to_keys
}

/// User-visible warning for a partition whose primary key set changed.
pub fn key_set_change_warning(partition: &Partition) -> String {
    format!(
        "cannot render full diff between {} and {}: the primary key set changed",
        partition.from, partition.to
    )
}

/// Guard a partition against an incompatible key set change. Incompatible
/// partitions warn and must be halted early by the caller; no rows are
/// produced for them.
pub fn check_diffable<T: PartialEq>(
    partition: &Partition,
    from_keys: &[T],
    to_keys: &[T],
) -> bool {
    if key_sets_diffable(from_keys, to_keys) {
        return true;
    }
    log::warn!("{}", key_set_change_warning(partition));
    false
}

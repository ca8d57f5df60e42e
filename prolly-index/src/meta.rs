//! Meta values: the value half of an internal-node pair.
//!
//! A meta value is a two-field tuple `{cumulative_count: u48, ref: hash}`
//! linking a parent node to a child by content hash and carrying the number
//! of leaf pairs in the child's subtree.

use std::sync::Arc;

use crate::hash::Hash;
use crate::node::Node;
use crate::store::{Context, NodeStore};
use crate::tuple::{encode_tuple, read_uint48, uint48_to_bytes, BufferPool, Tuple};
use crate::Result;

const META_VALUE_COUNT_IDX: usize = 0;
const META_VALUE_REF_IDX: usize = 1;

/// Encode a meta value: 6-byte big-endian cumulative count and a 20-byte
/// child ref. Counts outside 48 bits are rejected; the chunker upstream must
/// never produce them.
pub fn new_meta_value(pool: &BufferPool, count: u64, child: Hash) -> Vec<u8> {
    let cnt = uint48_to_bytes(count);
    encode_tuple(pool, &[&cnt, child.as_bytes()])
}

/// Borrowed view over the value item of an internal pair. Opaque to
/// consumers outside the internal-node code.
#[derive(Debug, Clone, Copy)]
pub struct MetaValue<'a>(Tuple<'a>);

impl<'a> MetaValue<'a> {
    pub fn from_item(item: &'a [u8]) -> Self {
        MetaValue(Tuple::new(item))
    }

    /// Number of leaf pairs within the subtree pointed to by this meta value.
    pub fn cumulative_count(&self) -> u64 {
        read_uint48(self.0.field(META_VALUE_COUNT_IDX))
    }

    /// Content hash of the child node pointed to by this meta value.
    pub fn child_ref(&self) -> Hash {
        Hash::from_slice(self.0.field(META_VALUE_REF_IDX))
    }
}

/// Resolve the child node a meta value points to. A failed read is fatal to
/// the traversal that triggered it; there is no fallback.
pub fn fetch_child(ctx: &Context, store: &dyn NodeStore, meta: &MetaValue<'_>) -> Result<Arc<Node>> {
    store.read(ctx, meta.child_ref())
}

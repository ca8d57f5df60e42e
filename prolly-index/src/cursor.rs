//! Hierarchical cursor over a prolly tree.
//!
//! A cursor holds one frame per tree level: the viewed node, an item index
//! into it, and an owned parent cursor one level up. The invariant is that
//! the parent's current meta value always references the node this frame
//! views; any parent move that crosses to a different meta value is followed
//! by a child re-fetch before the child's index is observed.
//!
//! Within-chunk motion never touches the store. Crossing a chunk boundary
//! (construction, `advance`/`retreat` at a node edge, upward `seek`) may
//! block on node reads, so all of those take a cancellation context.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::error::TreeError;
use crate::hash::Hash;
use crate::meta::{fetch_child, MetaValue};
use crate::node::{Node, NodePair, STRIDE as PAIR_STRIDE};
use crate::store::{Context, NodeStore};
use crate::{KeyOrder, Result};

const STRIDE: isize = PAIR_STRIDE as isize;

/// A cursor over the items of a prolly tree.
///
/// Frame states: before start (`idx == -stride`), valid (`0 <= idx <=
/// last_key_idx()`, even), past end (`idx == node_count()`). A cursor is not
/// safe to use from multiple tasks concurrently; independent cursors over
/// the same tree are.
#[derive(Clone)]
pub struct NodeCursor<'a> {
    nd: Arc<Node>,
    idx: isize,
    parent: Option<Box<NodeCursor<'a>>>,
    store: &'a dyn NodeStore,
}

impl<'a> NodeCursor<'a> {
    /// Position a cursor on the first leaf pair by descending the leftmost
    /// spine.
    pub fn new_at_start(ctx: &Context, store: &'a dyn NodeStore, nd: Arc<Node>) -> Result<Self> {
        let mut cur = NodeCursor {
            nd,
            idx: 0,
            parent: None,
            store,
        };
        while !cur.is_leaf() {
            let child = cur.fetch_current_child(ctx)?;
            cur = NodeCursor {
                nd: child,
                idx: 0,
                parent: Some(Box::new(cur)),
                store,
            };
        }
        Ok(cur)
    }

    /// Position a cursor on the last leaf pair by descending the rightmost
    /// spine.
    pub fn new_at_end(ctx: &Context, store: &'a dyn NodeStore, nd: Arc<Node>) -> Result<Self> {
        let mut cur = NodeCursor {
            nd,
            idx: 0,
            parent: None,
            store,
        };
        cur.skip_to_node_end();
        while !cur.is_leaf() {
            let child = cur.fetch_current_child(ctx)?;
            cur = NodeCursor {
                nd: child,
                idx: 0,
                parent: Some(Box::new(cur)),
                store,
            };
            cur.skip_to_node_end();
        }
        Ok(cur)
    }

    /// Position a cursor on the leaf position `search` selects for `item`.
    ///
    /// At internal levels the searched index is clamped into bounds before
    /// descending; on the leaf it is not, so the cursor may land past the
    /// end when `item` is greater than every key in the tree.
    pub fn new_at_item<S>(
        ctx: &Context,
        store: &'a dyn NodeStore,
        nd: Arc<Node>,
        item: &[u8],
        search: S,
    ) -> Result<Self>
    where
        S: Fn(&[u8], &Node) -> isize,
    {
        let mut cur = NodeCursor {
            nd,
            idx: 0,
            parent: None,
            store,
        };
        cur.idx = search(item, &cur.nd);
        while !cur.is_leaf() {
            cur.keep_in_bounds();
            let child = cur.fetch_current_child(ctx)?;
            cur = NodeCursor {
                nd: child,
                idx: 0,
                parent: Some(Box::new(cur)),
                store,
            };
            cur.idx = search(item, &cur.nd);
        }
        Ok(cur)
    }

    /// Like [`NodeCursor::new_at_item`], but reuses a single frame and
    /// allocates no parent chain. The resulting cursor answers point lookups
    /// identically but cannot traverse past its leaf.
    pub fn new_leaf_at_item<S>(
        ctx: &Context,
        store: &'a dyn NodeStore,
        nd: Arc<Node>,
        item: &[u8],
        search: S,
    ) -> Result<Self>
    where
        S: Fn(&[u8], &Node) -> isize,
    {
        let mut cur = NodeCursor {
            nd,
            idx: 0,
            parent: None,
            store,
        };
        cur.idx = search(item, &cur.nd);
        while !cur.is_leaf() {
            cur.keep_in_bounds();
            let child = cur.fetch_current_child(ctx)?;
            cur.nd = child;
            cur.idx = search(item, &cur.nd);
        }
        Ok(cur)
    }

    /// Position a cursor on the `index`th leaf pair, counting from zero
    /// across the whole tree.
    ///
    /// At each internal level the cursor advances right, subtracting each
    /// subtree's cumulative count from the remaining distance, until the
    /// distance falls inside the current subtree; advancing may itself cross
    /// chunk boundaries. Walking off the root's right edge yields
    /// `OutOfRange`. On a single-leaf tree the cursor is produced
    /// uncritically and the caller enforces range.
    pub fn new_at_index(
        ctx: &Context,
        store: &'a dyn NodeStore,
        nd: Arc<Node>,
        index: u64,
    ) -> Result<Self> {
        let total = nd.cumulative_count();
        let mut cur = NodeCursor {
            nd,
            idx: 0,
            parent: None,
            store,
        };

        let mut distance = index;
        while !cur.is_leaf() {
            loop {
                let count = MetaValue::from_item(cur.current_pair().value()).cumulative_count();
                if distance < count {
                    break;
                }
                if !cur.advance(ctx)? {
                    return Err(TreeError::OutOfRange {
                        index,
                        count: total,
                    });
                }
                distance -= count;
            }
            let child = cur.fetch_current_child(ctx)?;
            cur = NodeCursor {
                nd: child,
                idx: 0,
                parent: Some(Box::new(cur)),
                store,
            };
        }

        cur.idx = distance as isize * STRIDE;
        Ok(cur)
    }

    pub fn valid(&self) -> bool {
        self.idx >= 0 && self.idx < self.nd.node_count() as isize
    }

    /// The pair at the cursor's position. Panics on an invalid position.
    pub fn current_pair(&self) -> NodePair<'_> {
        assert!(self.valid(), "current_pair on invalid cursor position");
        self.nd.pair((self.idx / STRIDE) as usize)
    }

    pub fn first_key(&self) -> &[u8] {
        self.nd.item(0)
    }

    pub fn last_key(&self) -> &[u8] {
        self.nd.item(self.last_key_idx() as usize)
    }

    pub fn last_key_idx(&self) -> isize {
        self.nd.node_count() as isize - STRIDE
    }

    pub fn at_node_start(&self) -> bool {
        self.idx == 0
    }

    pub fn at_node_end(&self) -> bool {
        self.idx == self.last_key_idx()
    }

    pub fn is_leaf(&self) -> bool {
        self.level() == 0
    }

    pub fn level(&self) -> u8 {
        self.nd.level()
    }

    pub fn skip_to_node_start(&mut self) {
        self.idx = 0;
    }

    pub fn skip_to_node_end(&mut self) {
        self.idx = self.last_key_idx();
    }

    /// Clamp the index into `[0, last_key_idx()]`.
    pub fn keep_in_bounds(&mut self) {
        if self.idx < 0 {
            self.skip_to_node_start();
        }
        if self.idx > self.last_key_idx() {
            self.skip_to_node_end();
        }
    }

    /// Binary search this node's pair keys for the smallest pair whose key
    /// is greater than or equal to `item`. Returns that pair's (even) item
    /// index, or `node_count()` if no such pair exists.
    pub fn search(&self, item: &[u8], cmp: &KeyOrder) -> isize {
        search_node(item, &self.nd, cmp)
    }

    /// Reposition this cursor on `item`, reusing its frames.
    ///
    /// If `item` lies outside `[first_key, last_key]` of the current node,
    /// the parent is recursively sought first, its index clamped, and this
    /// frame's node re-fetched before the local search runs.
    pub fn seek(&mut self, ctx: &Context, item: &[u8], cmp: &KeyOrder) -> Result<()> {
        let in_bounds = match self.parent {
            // the root node bounds the whole key space
            None => true,
            Some(_) => {
                cmp(item, self.first_key()) != Ordering::Less
                    && cmp(item, self.last_key()) != Ordering::Greater
            }
        };

        if !in_bounds {
            let parent = self
                .parent
                .as_deref_mut()
                .expect("out-of-bounds seek requires a parent");
            parent.seek(ctx, item, cmp)?;
            parent.keep_in_bounds();
            let child_ref = MetaValue::from_item(parent.current_pair().value()).child_ref();
            self.nd = self.store.read(ctx, child_ref)?;
        }

        self.idx = self.search(item, cmp);
        Ok(())
    }

    /// Move to the next pair. Returns true iff the cursor moved to a valid
    /// position; on false the cursor is parked past the end.
    pub fn advance(&mut self, ctx: &Context) -> Result<bool> {
        let ok = self.advance_in_bounds(ctx)?;
        if !ok {
            self.idx = self.nd.node_count() as isize;
        }
        Ok(ok)
    }

    fn advance_in_bounds(&mut self, ctx: &Context) -> Result<bool> {
        if self.idx < self.last_key_idx() {
            self.idx += STRIDE;
            return Ok(true);
        }

        if self.idx == self.nd.node_count() as isize {
            // already out of bounds
            return Ok(false);
        }

        assert!(self.idx == self.last_key_idx(), "cursor index out of phase");

        let Some(parent) = self.parent.as_deref_mut() else {
            // no parent could advance: past the tree's right edge
            return Ok(false);
        };
        let ok = parent.advance_in_bounds(ctx)?;
        if !ok {
            return Ok(false);
        }

        self.fetch_node(ctx)?;
        self.skip_to_node_start();
        Ok(true)
    }

    /// Move to the previous pair. Returns true iff the cursor moved to a
    /// valid position; on false the cursor is parked before the start.
    pub fn retreat(&mut self, ctx: &Context) -> Result<bool> {
        let ok = self.retreat_in_bounds(ctx)?;
        if !ok {
            self.idx = -STRIDE;
        }
        Ok(ok)
    }

    fn retreat_in_bounds(&mut self, ctx: &Context) -> Result<bool> {
        if self.idx > 0 {
            self.idx -= STRIDE;
            return Ok(true);
        }

        if self.idx == -STRIDE {
            // already out of bounds
            return Ok(false);
        }

        assert!(self.idx == 0, "cursor index out of phase");

        let Some(parent) = self.parent.as_deref_mut() else {
            return Ok(false);
        };
        let ok = parent.retreat_in_bounds(ctx)?;
        if !ok {
            return Ok(false);
        }

        self.fetch_node(ctx)?;
        self.skip_to_node_end();
        Ok(true)
    }

    /// Reload this frame's node from the parent's current meta value. The
    /// index is left at the transient -1; callers must position the cursor
    /// with `skip_to_node_start`/`skip_to_node_end` before it is observed.
    fn fetch_node(&mut self, ctx: &Context) -> Result<()> {
        let child_ref = {
            let parent = self.parent.as_deref().expect("fetch_node requires a parent");
            MetaValue::from_item(parent.current_pair().value()).child_ref()
        };
        self.nd = self.store.read(ctx, child_ref)?;
        self.idx = -1; // caller must set
        Ok(())
    }

    fn fetch_current_child(&self, ctx: &Context) -> Result<Arc<Node>> {
        let mv = MetaValue::from_item(self.current_pair().value());
        fetch_child(ctx, self.store, &mv)
    }

    /// Content hash of the chunk this frame views, read from the parent's
    /// current meta value. None at the root.
    pub(crate) fn chunk_ref(&self) -> Option<Hash> {
        self.parent
            .as_deref()
            .filter(|p| p.valid())
            .map(|p| MetaValue::from_item(p.current_pair().value()).child_ref())
    }

    /// Mirror `other`'s node and index at every level. Both cursors must
    /// have parent chains of identical depth.
    pub fn copy_from(&mut self, other: &NodeCursor<'a>) {
        self.nd = other.nd.clone();
        self.idx = other.idx;
        self.store = other.store;
        match (self.parent.as_deref_mut(), other.parent.as_deref()) {
            (Some(a), Some(b)) => a.copy_from(b),
            (None, None) => {}
            _ => panic!("cursor copy across chains of different depth"),
        }
    }

    /// Lexicographic position comparison over the parent chain, root first.
    /// Both cursors must view the same tree.
    pub fn compare(&self, other: &NodeCursor<'_>) -> Ordering {
        match (self.parent.as_deref(), other.parent.as_deref()) {
            (Some(a), Some(b)) => {
                let ord = a.compare(b);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (None, None) => {}
            _ => panic!("cursor compare across chains of different depth"),
        }
        assert!(
            self.nd.node_count() == other.nd.node_count(),
            "cursor compare across different trees"
        );
        self.idx.cmp(&other.idx)
    }
}

fn search_node(item: &[u8], nd: &Node, cmp: &KeyOrder) -> isize {
    let mut lo = 0usize;
    let mut hi = nd.pair_count();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if cmp(item, nd.pair(mid).key()) == Ordering::Greater {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo as isize * STRIDE
}

/// The standard search function for [`NodeCursor::new_at_item`]: binary
/// search over pair keys under `cmp`.
pub fn key_search<'c>(cmp: &'c KeyOrder) -> impl Fn(&[u8], &Node) -> isize + 'c {
    move |item, nd| search_node(item, nd, cmp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::write_new_child;
    use crate::store::MemoryNodeStore;

    fn cmp() -> &'static KeyOrder {
        &|a, b| a.cmp(b)
    }

    /// Five 2-pair leaves under one meta root:
    /// ["a","b"] ["c","d"] ["e","f"] ["g","h"] ["i","j"]
    fn two_level_tree(ctx: &Context, store: &MemoryNodeStore) -> Arc<Node> {
        let keys = ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"];
        let mut meta_items = Vec::new();
        for chunk in keys.chunks(2) {
            let items: Vec<Vec<u8>> = chunk
                .iter()
                .enumerate()
                .flat_map(|(i, k)| {
                    [k.as_bytes().to_vec(), format!("val_{}{}", k, i).into_bytes()]
                })
                .collect();
            let (_, meta) = write_new_child(ctx, store, 0, items).unwrap();
            let (mk, mv) = meta.unwrap();
            meta_items.push(mk);
            meta_items.push(mv);
        }
        let (root, _) = write_new_child(ctx, store, 1, meta_items).unwrap();
        root
    }

    fn single_leaf_tree(ctx: &Context, store: &MemoryNodeStore) -> Arc<Node> {
        let items = vec![
            b"a".to_vec(),
            b"1".to_vec(),
            b"b".to_vec(),
            b"2".to_vec(),
        ];
        let (root, _) = write_new_child(ctx, store, 0, items).unwrap();
        root
    }

    fn collect_forward(ctx: &Context, cur: &mut NodeCursor<'_>) -> Vec<Vec<u8>> {
        let mut keys = Vec::new();
        while cur.valid() {
            keys.push(cur.current_pair().key().to_vec());
            if !cur.advance(ctx).unwrap() {
                break;
            }
        }
        keys
    }

    #[test]
    fn test_linear_scan_across_chunks() {
        let ctx = Context::new();
        let store = MemoryNodeStore::new();
        let root = two_level_tree(&ctx, &store);

        let mut cur = NodeCursor::new_at_start(&ctx, &store, root).unwrap();
        let keys = collect_forward(&ctx, &mut cur);

        let expected: Vec<Vec<u8>> = ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"]
            .iter()
            .map(|k| k.as_bytes().to_vec())
            .collect();
        assert_eq!(keys, expected);
        assert!(!cur.valid());
        assert!(!cur.advance(&ctx).unwrap());
    }

    #[test]
    fn test_reverse_scan_across_chunks() {
        let ctx = Context::new();
        let store = MemoryNodeStore::new();
        let root = two_level_tree(&ctx, &store);

        let mut cur = NodeCursor::new_at_end(&ctx, &store, root).unwrap();
        let mut keys = Vec::new();
        while cur.valid() {
            keys.push(cur.current_pair().key().to_vec());
            if !cur.retreat(&ctx).unwrap() {
                break;
            }
        }

        let expected: Vec<Vec<u8>> = ["j", "i", "h", "g", "f", "e", "d", "c", "b", "a"]
            .iter()
            .map(|k| k.as_bytes().to_vec())
            .collect();
        assert_eq!(keys, expected);
        assert!(!cur.retreat(&ctx).unwrap());
    }

    #[test]
    fn test_seek_present_and_missing_keys() {
        let ctx = Context::new();
        let store = MemoryNodeStore::new();
        let root = two_level_tree(&ctx, &store);

        let cur =
            NodeCursor::new_at_item(&ctx, &store, root.clone(), b"d", key_search(cmp())).unwrap();
        assert_eq!(cur.current_pair().key(), b"d");

        // absent key lands on the next greater key
        let cur =
            NodeCursor::new_at_item(&ctx, &store, root.clone(), b"dd", key_search(cmp())).unwrap();
        assert_eq!(cur.current_pair().key(), b"e");

        // greater than every key: past end
        let cur = NodeCursor::new_at_item(&ctx, &store, root, b"zz", key_search(cmp())).unwrap();
        assert!(!cur.valid());
    }

    #[test]
    fn test_leaf_cursor_matches_full_cursor() {
        let ctx = Context::new();
        let store = MemoryNodeStore::new();
        let root = two_level_tree(&ctx, &store);

        for probe in [&b"a"[..], b"dd", b"g", b"zz"] {
            let full =
                NodeCursor::new_at_item(&ctx, &store, root.clone(), probe, key_search(cmp()))
                    .unwrap();
            let leaf =
                NodeCursor::new_leaf_at_item(&ctx, &store, root.clone(), probe, key_search(cmp()))
                    .unwrap();
            assert_eq!(full.valid(), leaf.valid());
            if full.valid() {
                assert_eq!(full.current_pair().key(), leaf.current_pair().key());
                assert_eq!(full.current_pair().value(), leaf.current_pair().value());
            }
        }
    }

    #[test]
    fn test_positional_access_across_chunks() {
        let ctx = Context::new();
        let store = MemoryNodeStore::new();
        let root = two_level_tree(&ctx, &store);

        let cases = [(0u64, &b"a"[..]), (4, b"e"), (9, b"j")];
        for (idx, key) in cases {
            let cur = NodeCursor::new_at_index(&ctx, &store, root.clone(), idx).unwrap();
            assert_eq!(cur.current_pair().key(), key, "index {}", idx);
        }

        assert!(matches!(
            NodeCursor::new_at_index(&ctx, &store, root, 10),
            Err(TreeError::OutOfRange { index: 10, .. })
        ));
    }

    #[test]
    fn test_positional_matches_advancing() {
        let ctx = Context::new();
        let store = MemoryNodeStore::new();
        let root = two_level_tree(&ctx, &store);

        for i in 0..10u64 {
            let positional = NodeCursor::new_at_index(&ctx, &store, root.clone(), i).unwrap();
            let mut stepped = NodeCursor::new_at_start(&ctx, &store, root.clone()).unwrap();
            for _ in 0..i {
                assert!(stepped.advance(&ctx).unwrap());
            }
            assert_eq!(positional.compare(&stepped), Ordering::Equal);
        }
    }

    #[test]
    fn test_seek_across_parent_refetch() {
        let ctx = Context::new();
        let store = MemoryNodeStore::new();
        let root = two_level_tree(&ctx, &store);

        let mut cur = NodeCursor::new_at_start(&ctx, &store, root).unwrap();
        assert_eq!(cur.current_pair().key(), b"a");

        // two sibling leaves away; reaches "g" through the parent
        cur.seek(&ctx, b"g", cmp()).unwrap();
        assert_eq!(cur.current_pair().key(), b"g");

        // backwards as well
        cur.seek(&ctx, b"b", cmp()).unwrap();
        assert_eq!(cur.current_pair().key(), b"b");
    }

    #[test]
    fn test_seek_every_key_from_anywhere() {
        let ctx = Context::new();
        let store = MemoryNodeStore::new();
        let root = two_level_tree(&ctx, &store);

        let mut cur = NodeCursor::new_at_end(&ctx, &store, root).unwrap();
        for key in ["j", "a", "e", "c", "h", "b", "i", "d", "g", "f"] {
            cur.seek(&ctx, key.as_bytes(), cmp()).unwrap();
            assert_eq!(cur.current_pair().key(), key.as_bytes());
        }

        // absent key: smallest pair greater than it
        cur.seek(&ctx, b"ee", cmp()).unwrap();
        assert_eq!(cur.current_pair().key(), b"f");

        // past every key
        cur.seek(&ctx, b"zz", cmp()).unwrap();
        assert!(!cur.valid());
    }

    #[test]
    fn test_advance_then_retreat_restores_position() {
        let ctx = Context::new();
        let store = MemoryNodeStore::new();
        let root = two_level_tree(&ctx, &store);

        for n in 0..9 {
            let mut cur = NodeCursor::new_at_start(&ctx, &store, root.clone()).unwrap();
            let origin = cur.clone();
            for _ in 0..n {
                assert!(cur.advance(&ctx).unwrap());
            }
            for _ in 0..n {
                assert!(cur.retreat(&ctx).unwrap());
            }
            assert_eq!(cur.compare(&origin), Ordering::Equal);
            assert_eq!(cur.current_pair().key(), b"a");
        }
    }

    #[test]
    fn test_clone_independence() {
        let ctx = Context::new();
        let store = MemoryNodeStore::new();
        let root = two_level_tree(&ctx, &store);

        let cur = NodeCursor::new_at_start(&ctx, &store, root).unwrap();
        let mut cloned = cur.clone();
        while cloned.advance(&ctx).unwrap() {}

        assert_eq!(cur.current_pair().key(), b"a");
        assert!(!cloned.valid());
        assert!(cur.valid());
    }

    #[test]
    fn test_copy_from_mirrors_position() {
        let ctx = Context::new();
        let store = MemoryNodeStore::new();
        let root = two_level_tree(&ctx, &store);

        let target = NodeCursor::new_at_index(&ctx, &store, root.clone(), 7).unwrap();
        let mut cur = NodeCursor::new_at_start(&ctx, &store, root).unwrap();
        cur.copy_from(&target);

        assert_eq!(cur.compare(&target), Ordering::Equal);
        assert_eq!(cur.current_pair().key(), b"h");
    }

    #[test]
    #[should_panic(expected = "different depth")]
    fn test_copy_from_depth_mismatch() {
        let ctx = Context::new();
        let store = MemoryNodeStore::new();
        let deep_root = two_level_tree(&ctx, &store);
        let shallow_root = single_leaf_tree(&ctx, &store);

        let deep = NodeCursor::new_at_start(&ctx, &store, deep_root).unwrap();
        let mut shallow = NodeCursor::new_at_start(&ctx, &store, shallow_root).unwrap();
        shallow.copy_from(&deep);
    }

    #[test]
    fn test_single_leaf_bounds() {
        let ctx = Context::new();
        let store = MemoryNodeStore::new();
        let root = single_leaf_tree(&ctx, &store);

        let mut cur = NodeCursor::new_at_start(&ctx, &store, root).unwrap();
        assert_eq!(cur.current_pair().key(), b"a");
        assert!(cur.advance(&ctx).unwrap());
        assert_eq!(cur.current_pair().key(), b"b");
        assert!(!cur.advance(&ctx).unwrap());
        assert!(!cur.valid());

        // retreating from past the end lands back on the last pair
        assert!(cur.retreat(&ctx).unwrap());
        assert_eq!(cur.current_pair().key(), b"b");
    }

    #[test]
    fn test_empty_tree() {
        let ctx = Context::new();
        let store = MemoryNodeStore::new();
        let (root, _) = write_new_child(&ctx, &store, 0, Vec::new()).unwrap();

        let mut cur = NodeCursor::new_at_start(&ctx, &store, root).unwrap();
        assert!(!cur.valid());
        assert!(!cur.advance(&ctx).unwrap());
        assert!(!cur.retreat(&ctx).unwrap());
    }

    #[test]
    fn test_cancelled_context_surfaces() {
        let ctx = Context::new();
        let store = MemoryNodeStore::new();
        let root = two_level_tree(&ctx, &store);

        let mut cur = NodeCursor::new_at_start(&ctx, &store, root).unwrap();
        ctx.cancel();

        // within-chunk motion performs no reads and still succeeds
        assert!(cur.advance(&ctx).unwrap());
        // crossing the chunk boundary hits the store and fails
        assert!(matches!(cur.advance(&ctx), Err(TreeError::Cancelled)));
    }
}

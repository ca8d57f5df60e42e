//! # Prolly Index
//!
//! Core of a content-addressed prolly-tree index: an ordered key/value tree
//! whose node boundaries are decided by item content rather than insertion
//! history, so equal contents always produce equal trees.
//!
//! The crate provides the node representation, the hierarchical cursor used
//! to navigate it, and the ordered pairwise diff built on top of two cursors.

pub mod builder;
pub mod cursor;
pub mod diff;
pub mod error;
pub mod hash;
pub mod meta;
pub mod node;
pub mod partition;
pub mod store;
pub mod tuple;

// Re-export commonly used types
pub use builder::TreeBuilder;
pub use cursor::NodeCursor;
pub use diff::{DiffEvent, DiffStats, Differ};
pub use error::TreeError;
pub use hash::Hash;
pub use meta::MetaValue;
pub use node::{make_node, write_new_child, Node, NodePair};
pub use partition::Partition;
pub use store::{Context, FileSystemNodeStore, MemoryNodeStore, NodeStore};
pub use tuple::BufferPool;

/// Result type for prolly-index operations
pub type Result<T> = std::result::Result<T, TreeError>;

/// Key comparator supplied by the caller at search time. It must be total
/// and consistent with the order the tree was built under.
pub type KeyOrder = dyn Fn(&[u8], &[u8]) -> std::cmp::Ordering;

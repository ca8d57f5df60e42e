//! Node storage: the content-addressed store trait and its backends.
//!
//! - `MemoryNodeStore`: in-memory storage using a HashMap
//! - `FileSystemNodeStore`: one file per node under a hex fan-out directory
//!
//! Writes are idempotent: a node's hash is a deterministic function of its
//! serialized bytes, so writing identical content yields the same hash and
//! never duplicates storage.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::TreeError;
use crate::hash::Hash;
use crate::node::Node;
use crate::tuple::BufferPool;
use crate::Result;

/// Cancellation context threaded through every I/O-capable operation.
///
/// Cloning is cheap; clones share the same cancellation flag. Once
/// cancelled, in-flight operations return `TreeError::Cancelled` at their
/// next check and the affected cursor's position is undefined: callers must
/// seek to a known key or discard the cursor.
#[derive(Debug, Clone, Default)]
pub struct Context {
    cancelled: Arc<AtomicBool>,
}

impl Context {
    pub fn new() -> Self {
        Context::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Error out if this context has been cancelled.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(TreeError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Content-addressed, immutable node store.
///
/// `read` is referentially transparent within a logical view; a ref with no
/// stored node surfaces `NotFound` and is fatal to the traversal that hit
/// it. Implementations must be safe for concurrent reads.
pub trait NodeStore: Send + Sync {
    /// Resolve a node by content hash.
    fn read(&self, ctx: &Context, node_ref: Hash) -> Result<Arc<Node>>;

    /// Store a node, returning its content hash.
    fn write(&self, ctx: &Context, node: &Node) -> Result<Hash>;

    /// Pooled allocator for tuple construction.
    fn pool(&self) -> &BufferPool;
}

fn encode_node(node: &Node) -> Result<Vec<u8>> {
    Ok(bincode::serialize(node)?)
}

fn decode_node(bytes: &[u8]) -> Result<Node> {
    Ok(bincode::deserialize(bytes)?)
}

/// In-memory node storage using a HashMap.
#[derive(Debug, Default)]
pub struct MemoryNodeStore {
    nodes: Mutex<HashMap<Hash, Arc<Node>>>,
    pool: BufferPool,
}

impl MemoryNodeStore {
    pub fn new() -> Self {
        MemoryNodeStore::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.lock().expect("node store lock poisoned").len()
    }
}

impl NodeStore for MemoryNodeStore {
    fn read(&self, ctx: &Context, node_ref: Hash) -> Result<Arc<Node>> {
        ctx.check()?;
        let nodes = self.nodes.lock().expect("node store lock poisoned");
        nodes
            .get(&node_ref)
            .cloned()
            .ok_or(TreeError::NotFound(node_ref))
    }

    fn write(&self, ctx: &Context, node: &Node) -> Result<Hash> {
        ctx.check()?;
        let bytes = encode_node(node)?;
        let node_ref = Hash::of(&bytes);
        let mut nodes = self.nodes.lock().expect("node store lock poisoned");
        nodes
            .entry(node_ref)
            .or_insert_with(|| Arc::new(node.clone()));
        Ok(node_ref)
    }

    fn pool(&self) -> &BufferPool {
        &self.pool
    }
}

/// File system-based node storage.
pub struct FileSystemNodeStore {
    base_path: PathBuf,
    pool: BufferPool,
}

impl FileSystemNodeStore {
    pub fn new(base_path: impl AsRef<Path>) -> Result<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;
        Ok(FileSystemNodeStore {
            base_path,
            pool: BufferPool::new(),
        })
    }

    /// File path for a node ref. The first two hex chars fan nodes out into
    /// subdirectories.
    fn node_path(&self, node_ref: Hash) -> PathBuf {
        let hex = hex::encode(node_ref.as_bytes());
        self.base_path.join(&hex[..2]).join(hex)
    }
}

impl NodeStore for FileSystemNodeStore {
    fn read(&self, ctx: &Context, node_ref: Hash) -> Result<Arc<Node>> {
        ctx.check()?;
        let path = self.node_path(node_ref);
        if !path.exists() {
            return Err(TreeError::NotFound(node_ref));
        }
        let bytes = fs::read(path)?;
        Ok(Arc::new(decode_node(&bytes)?))
    }

    fn write(&self, ctx: &Context, node: &Node) -> Result<Hash> {
        ctx.check()?;
        let bytes = encode_node(node)?;
        let node_ref = Hash::of(&bytes);
        let path = self.node_path(node_ref);
        if !path.exists() {
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir)?;
            }
            fs::write(&path, &bytes)?;
            log::debug!("wrote node {} ({} bytes)", node_ref, bytes.len());
        }
        Ok(node_ref)
    }

    fn pool(&self) -> &BufferPool {
        &self.pool
    }
}

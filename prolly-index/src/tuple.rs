//! Fixed-width binary tuples and the buffer pool they are built from.
//!
//! A tuple is a flat byte string: the field bytes back to back, followed by
//! a table of 2-byte big-endian end offsets (one per field), followed by a
//! 1-byte field count. Fields are read by index without copying.

use std::sync::Mutex;

const MAX_POOLED_BUFFERS: usize = 64;

/// Pooled allocator for tuple construction. Buffers handed out by `get` are
/// returned via `put` once the tuple layer is done with them.
#[derive(Debug, Default)]
pub struct BufferPool {
    free: Mutex<Vec<Vec<u8>>>,
}

impl BufferPool {
    pub fn new() -> Self {
        BufferPool {
            free: Mutex::new(Vec::new()),
        }
    }

    /// Take a cleared buffer with at least `capacity` bytes reserved.
    pub fn get(&self, capacity: usize) -> Vec<u8> {
        let mut free = self.free.lock().expect("buffer pool lock poisoned");
        match free.pop() {
            Some(mut buf) => {
                buf.clear();
                buf.reserve(capacity);
                buf
            }
            None => Vec::with_capacity(capacity),
        }
    }

    /// Return a buffer to the pool.
    pub fn put(&self, buf: Vec<u8>) {
        let mut free = self.free.lock().expect("buffer pool lock poisoned");
        if free.len() < MAX_POOLED_BUFFERS {
            free.push(buf);
        }
    }
}

/// Encode `fields` into a tuple drawn from `pool`.
pub fn encode_tuple(pool: &BufferPool, fields: &[&[u8]]) -> Vec<u8> {
    assert!(fields.len() <= u8::MAX as usize, "too many tuple fields");
    let data_len: usize = fields.iter().map(|f| f.len()).sum();
    assert!(data_len <= u16::MAX as usize, "tuple fields too large");

    let mut buf = pool.get(data_len + fields.len() * 2 + 1);
    for field in fields {
        buf.extend_from_slice(field);
    }
    let mut end = 0u16;
    for field in fields {
        end += field.len() as u16;
        buf.extend_from_slice(&end.to_be_bytes());
    }
    buf.push(fields.len() as u8);
    buf
}

/// Read-only view over an encoded tuple.
#[derive(Debug, Clone, Copy)]
pub struct Tuple<'a>(&'a [u8]);

impl<'a> Tuple<'a> {
    pub fn new(item: &'a [u8]) -> Self {
        assert!(!item.is_empty(), "empty tuple item");
        Tuple(item)
    }

    pub fn field_count(&self) -> usize {
        self.0[self.0.len() - 1] as usize
    }

    pub fn field(&self, i: usize) -> &'a [u8] {
        let count = self.field_count();
        assert!(i < count, "tuple field {} out of range ({})", i, count);
        let offsets = self.0.len() - 1 - count * 2;
        let start = if i == 0 {
            0
        } else {
            read_u16(&self.0[offsets + (i - 1) * 2..]) as usize
        };
        let end = read_u16(&self.0[offsets + i * 2..]) as usize;
        &self.0[start..end]
    }
}

fn read_u16(bytes: &[u8]) -> u16 {
    u16::from_be_bytes([bytes[0], bytes[1]])
}

/// Write `v` as a 6-byte unsigned big-endian integer. Values outside 48 bits
/// are rejected.
pub fn uint48_to_bytes(v: u64) -> [u8; 6] {
    assert!(v < (1u64 << 48), "value does not fit in 48 bits");
    let be = v.to_be_bytes();
    [be[2], be[3], be[4], be[5], be[6], be[7]]
}

/// Read a 6-byte unsigned big-endian integer.
pub fn read_uint48(bytes: &[u8]) -> u64 {
    assert!(bytes.len() == 6, "uint48 field must be 6 bytes");
    let mut be = [0u8; 8];
    be[2..].copy_from_slice(bytes);
    u64::from_be_bytes(be)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_and_read_fields() {
        let pool = BufferPool::new();
        let tup = encode_tuple(&pool, &[b"abc", b"", b"wxyz"]);
        let view = Tuple::new(&tup);
        assert_eq!(view.field_count(), 3);
        assert_eq!(view.field(0), b"abc");
        assert_eq!(view.field(1), b"");
        assert_eq!(view.field(2), b"wxyz");
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_field_out_of_range() {
        let pool = BufferPool::new();
        let tup = encode_tuple(&pool, &[b"abc"]);
        Tuple::new(&tup).field(1);
    }

    #[test]
    fn test_pool_reuse() {
        let pool = BufferPool::new();
        let mut buf = pool.get(16);
        buf.extend_from_slice(b"scratch");
        let cap = buf.capacity();
        pool.put(buf);

        let reused = pool.get(8);
        assert!(reused.is_empty());
        assert!(reused.capacity() >= cap.min(8));
    }

    #[test]
    fn test_uint48_round_trip() {
        for v in [0u64, 1, 500, (1 << 48) - 1] {
            let bytes = uint48_to_bytes(v);
            assert_eq!(read_uint48(&bytes), v);
        }
    }

    #[test]
    #[should_panic(expected = "does not fit in 48 bits")]
    fn test_uint48_overflow() {
        uint48_to_bytes(1 << 48);
    }
}

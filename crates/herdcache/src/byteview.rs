//! Immutable view over cached bytes

use std::fmt;

use bytes::Bytes;
use herdlru::Value;

/// Read-only bytes handed out by a group
///
/// Clones share the same buffer; nothing can mutate it after construction.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ByteView {
    b: Bytes,
}

impl ByteView {
    /// Number of bytes in the view
    pub fn len(&self) -> usize {
        self.b.len()
    }

    /// Check if the view holds no bytes
    pub fn is_empty(&self) -> bool {
        self.b.is_empty()
    }

    /// Byte at index `i`, if in range
    pub fn at(&self, i: usize) -> Option<u8> {
        self.b.get(i).copied()
    }

    /// Copy of the bytes the caller is free to mutate
    pub fn byte_slice(&self) -> Vec<u8> {
        self.b.to_vec()
    }

    /// Cheap handle on the underlying buffer
    pub fn bytes(&self) -> Bytes {
        self.b.clone()
    }
}

impl Value for ByteView {
    fn len(&self) -> usize {
        self.b.len()
    }
}

impl AsRef<[u8]> for ByteView {
    fn as_ref(&self) -> &[u8] {
        &self.b
    }
}

impl From<Vec<u8>> for ByteView {
    fn from(v: Vec<u8>) -> Self {
        Self { b: Bytes::from(v) }
    }
}

impl From<Bytes> for ByteView {
    fn from(b: Bytes) -> Self {
        Self { b }
    }
}

impl From<&[u8]> for ByteView {
    fn from(s: &[u8]) -> Self {
        Self {
            b: Bytes::copy_from_slice(s),
        }
    }
}

impl From<&str> for ByteView {
    fn from(s: &str) -> Self {
        Self::from(s.as_bytes())
    }
}

impl fmt::Display for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.b))
    }
}

impl fmt::Debug for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ByteView").field(&self.b).finish()
    }
}

//! HPACK: Header Compression for HTTP/2 (RFC 7541)
//!
//! - [`table`]: the 61-entry static table and the size-bounded dynamic table
//! - [`integer`] / [`string`]: prefixed integer and string literal primitives
//! - [`huffman`]: the swappable Huffman decoding capability
//! - [`Decoder`] / [`Encoder`]: one per direction per connection, each owning
//!   its own dynamic table

use std::fmt;

use bytes::Bytes;

pub mod decoder;
pub mod encoder;
pub mod huffman;
pub mod integer;
pub mod string;
pub mod table;

pub use decoder::Decoder;
pub use encoder::{Encoder, IndexingStrategy};
pub use huffman::{FlukeHuffman, HuffmanDecode};
pub use table::{DynamicTable, HeaderTable, StaticTable};

/// Per-entry overhead counted against the dynamic table size (RFC 7541 Section 4.1).
pub const ENTRY_OVERHEAD: usize = 32;

/// Default SETTINGS_HEADER_TABLE_SIZE.
pub const DEFAULT_TABLE_SIZE: usize = 4096;

/// A header field: an opaque `(name, value)` pair compared byte for byte.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct HeaderField {
    pub name: Bytes,
    pub value: Bytes,
}

impl HeaderField {
    pub fn new(name: impl Into<Bytes>, value: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Size counted against the dynamic table: `len(name) + len(value) + 32`.
    pub fn size(&self) -> usize {
        self.name.len() + self.value.len() + ENTRY_OVERHEAD
    }

    pub fn name_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.name).ok()
    }

    pub fn value_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.value).ok()
    }
}

impl fmt::Debug for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}",
            String::from_utf8_lossy(&self.name),
            String::from_utf8_lossy(&self.value)
        )
    }
}

impl<N, V> From<(N, V)> for HeaderField
where
    N: Into<Bytes>,
    V: Into<Bytes>,
{
    fn from((name, value): (N, V)) -> Self {
        Self::new(name, value)
    }
}

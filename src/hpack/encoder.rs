//! HPACK header block encoder.

use bytes::{BufMut, Bytes, BytesMut};

use super::integer::encode_integer;
use super::string::encode_string;
use super::table::{dynamic_index, DynamicTable, HeaderTable, StaticTable};
use super::{HeaderField, DEFAULT_TABLE_SIZE};

const PATTERN_INDEXED: u8 = 0x80;
const PATTERN_LITERAL_INCREMENTAL: u8 = 0x40;
const PATTERN_SIZE_UPDATE: u8 = 0x20;

/// Which tables the encoder consults when looking for matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexingStrategy {
    /// Match against the static table only. Every field without an exact
    /// static match is sent as a literal and inserted into the dynamic table.
    #[default]
    StaticOnly,
    /// Also reuse the encoder's own dynamic table entries, by exact match and
    /// then by name.
    Full,
}

#[derive(Debug, Clone, Copy)]
struct PendingSizeUpdate {
    smallest: usize,
    last: usize,
}

/// HPACK encoder for HTTP/2 header blocks.
///
/// Mirrors the dynamic table the peer's decoder keeps for this direction.
/// String literals are always sent without Huffman coding.
#[derive(Debug, Clone)]
pub struct Encoder<'t> {
    table: HeaderTable<'t>,
    indexing: IndexingStrategy,
    pending_size_update: Option<PendingSizeUpdate>,
}

impl Default for Encoder<'static> {
    fn default() -> Self {
        Self::new(DEFAULT_TABLE_SIZE)
    }
}

impl Encoder<'static> {
    /// Create an encoder for a peer that allows `max_table_size` octets of
    /// dynamic table (the peer's SETTINGS_HEADER_TABLE_SIZE).
    pub fn new(max_table_size: usize) -> Self {
        Self::with_static_table(StaticTable::get(), max_table_size)
    }
}

impl<'t> Encoder<'t> {
    pub fn with_static_table(static_table: &'t StaticTable, max_table_size: usize) -> Self {
        Self {
            table: HeaderTable::with_static_table(static_table, max_table_size),
            indexing: IndexingStrategy::default(),
            pending_size_update: None,
        }
    }

    pub fn with_indexing(mut self, indexing: IndexingStrategy) -> Self {
        self.indexing = indexing;
        self
    }

    pub fn indexing(&self) -> IndexingStrategy {
        self.indexing
    }

    pub fn dynamic_table(&self) -> &DynamicTable {
        self.table.dynamic()
    }

    /// Change the dynamic table size. The table is resized now; the matching
    /// Dynamic Table Size Update is emitted at the start of the next block.
    pub fn set_max_table_size(&mut self, max_size: usize) {
        if max_size == self.table.dynamic().max_size() && self.pending_size_update.is_none() {
            return;
        }
        self.table.dynamic_mut().set_max_size(max_size);
        self.pending_size_update = Some(match self.pending_size_update {
            Some(p) => PendingSizeUpdate {
                smallest: p.smallest.min(max_size),
                last: max_size,
            },
            None => PendingSizeUpdate {
                smallest: max_size,
                last: max_size,
            },
        });
    }

    /// Encode `fields` in order into a new header block.
    pub fn encode(&mut self, fields: &[HeaderField]) -> Bytes {
        let mut dst = BytesMut::new();
        self.encode_into(fields, &mut dst);
        dst.freeze()
    }

    /// Encode `fields` in order, appending the header block to `dst`.
    pub fn encode_into<B: BufMut>(&mut self, fields: &[HeaderField], dst: &mut B) {
        if let Some(update) = self.pending_size_update.take() {
            // A shrink followed by a grow must be signalled as both (Section 4.2).
            if update.smallest < update.last {
                encode_integer(dst, update.smallest, 5, PATTERN_SIZE_UPDATE);
            }
            encode_integer(dst, update.last, 5, PATTERN_SIZE_UPDATE);
        }

        for field in fields {
            self.encode_field(field, dst);
            tracing::trace!(name = ?field.name, value = ?field.value, "encoded header field");
        }
    }

    fn encode_field<B: BufMut>(&mut self, field: &HeaderField, dst: &mut B) {
        let static_table = self.table.static_table();

        // 1. Exact match in the static table.
        if let Some(index) = static_table.find(&field.name, &field.value) {
            encode_integer(dst, index, 7, PATTERN_INDEXED);
            return;
        }

        if self.indexing == IndexingStrategy::Full {
            if let Some(position) = self.table.dynamic().find(&field.name, &field.value) {
                encode_integer(dst, dynamic_index(position), 7, PATTERN_INDEXED);
                return;
            }
        }

        // 2. Name match, static first.
        let name_index = static_table.find_name(&field.name).or_else(|| match self.indexing {
            IndexingStrategy::Full => self.table.dynamic().find_name(&field.name).map(dynamic_index),
            IndexingStrategy::StaticOnly => None,
        });

        match name_index {
            Some(index) => {
                encode_integer(dst, index, 6, PATTERN_LITERAL_INCREMENTAL);
            }
            None => {
                // 3. New name.
                encode_integer(dst, 0, 6, PATTERN_LITERAL_INCREMENTAL);
                encode_string(dst, &field.name);
            }
        }
        encode_string(dst, &field.value);
        self.table.dynamic_mut().insert(field.clone());
    }
}

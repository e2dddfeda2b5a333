//! HPACK header block decoder.

use bytes::{Buf, Bytes};

use super::huffman::{FlukeHuffman, HuffmanDecode};
use super::integer::decode_integer;
use super::string::decode_string;
use super::table::{DynamicTable, HeaderTable, StaticTable};
use super::{HeaderField, DEFAULT_TABLE_SIZE};
use crate::error::HpackError;

// Masks and patterns for the representation carried in the first octet.
const MASK_INDEXED: u8 = 0x80; // 1xxxxxxx
const MASK_LITERAL_INCREMENTAL: u8 = 0xc0; // 01xxxxxx
const MASK_SIZE_UPDATE: u8 = 0xe0; // 001xxxxx
const MASK_LITERAL: u8 = 0xf0; // 0000xxxx / 0001xxxx

const PATTERN_INDEXED: u8 = 0x80;
const PATTERN_LITERAL_INCREMENTAL: u8 = 0x40;
const PATTERN_SIZE_UPDATE: u8 = 0x20;
const PATTERN_LITERAL_NEVER: u8 = 0x10;
const PATTERN_LITERAL: u8 = 0x00;

/// HPACK decoder for HTTP/2 header blocks.
///
/// Holds the receiving side's dynamic table. Blocks must be decoded in the
/// order they arrive on the connection: each decode mutates the table the
/// next one depends on.
pub struct Decoder<'t, H = FlukeHuffman> {
    table: HeaderTable<'t>,
    /// Upper bound for Dynamic Table Size Updates sent by the peer.
    max_allowed_size: usize,
    huffman: H,
}

impl<H> std::fmt::Debug for Decoder<'_, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Decoder")
            .field("table_size", &self.table.dynamic().size())
            .field("max_table_size", &self.table.dynamic().max_size())
            .field("max_allowed_size", &self.max_allowed_size)
            .field("entries", &self.table.dynamic().len())
            .finish()
    }
}

impl Default for Decoder<'static> {
    fn default() -> Self {
        Self::new(DEFAULT_TABLE_SIZE)
    }
}

impl Decoder<'static> {
    /// Create a decoder whose dynamic table starts at `max_table_size`
    /// (the locally advertised SETTINGS_HEADER_TABLE_SIZE). Size updates
    /// above that value are rejected.
    pub fn new(max_table_size: usize) -> Self {
        Self::with_huffman(StaticTable::get(), max_table_size, FlukeHuffman::new())
    }
}

impl<'t, H: HuffmanDecode> Decoder<'t, H> {
    pub fn with_huffman(static_table: &'t StaticTable, max_table_size: usize, huffman: H) -> Self {
        Self {
            table: HeaderTable::with_static_table(static_table, max_table_size),
            max_allowed_size: max_table_size,
            huffman,
        }
    }

    pub fn max_allowed_size(&self) -> usize {
        self.max_allowed_size
    }

    /// Change the limit for peer size updates after a new
    /// SETTINGS_HEADER_TABLE_SIZE has been acknowledged. The table itself is
    /// only resized by the peer's next size update.
    pub fn set_max_allowed_size(&mut self, max_allowed_size: usize) {
        self.max_allowed_size = max_allowed_size;
    }

    pub fn dynamic_table(&self) -> &DynamicTable {
        self.table.dynamic()
    }

    /// Decode a complete header block into its ordered header fields.
    ///
    /// Table mutations are applied in block order as each representation is
    /// read. On error, decoding stops and mutations already applied stay in
    /// place; the connection can no longer trust this table.
    pub fn decode(&mut self, block: &[u8]) -> Result<Vec<HeaderField>, HpackError> {
        let mut src = block;
        let mut headers = Vec::new();

        while src.has_remaining() {
            match self.decode_representation(&mut src) {
                Ok(Some(field)) => {
                    tracing::trace!(name = ?field.name, value = ?field.value, "decoded header field");
                    headers.push(field);
                }
                Ok(None) => {}
                Err(e) => {
                    let offset = block.len() - src.len();
                    tracing::warn!(error = %e, offset, "rejecting header block");
                    return Err(e);
                }
            }
        }

        Ok(headers)
    }

    /// Decode one representation. Dynamic Table Size Updates yield `None`.
    fn decode_representation(&mut self, src: &mut &[u8]) -> Result<Option<HeaderField>, HpackError> {
        let b = src.get_u8();

        if b & MASK_INDEXED == PATTERN_INDEXED {
            // Indexed Header Field (Section 6.1)
            let index = decode_integer(b, src, 7)?;
            return self.table.resolve(index).cloned().map(Some);
        }

        if b & MASK_LITERAL_INCREMENTAL == PATTERN_LITERAL_INCREMENTAL {
            // Literal with Incremental Indexing (Section 6.2.1)
            let name_index = decode_integer(b, src, 6)?;
            let field = self.decode_literal(src, name_index)?;
            self.table.dynamic_mut().insert(field.clone());
            return Ok(Some(field));
        }

        let literal = b & MASK_LITERAL;
        if literal == PATTERN_LITERAL || literal == PATTERN_LITERAL_NEVER {
            // Literal without Indexing / Never Indexed (Sections 6.2.2, 6.2.3)
            let name_index = decode_integer(b, src, 4)?;
            return self.decode_literal(src, name_index).map(Some);
        }

        if b & MASK_SIZE_UPDATE == PATTERN_SIZE_UPDATE {
            // Dynamic Table Size Update (Section 6.3)
            let new_max = decode_integer(b, src, 5)?;
            if new_max > self.max_allowed_size {
                return Err(HpackError::SizeUpdateTooLarge {
                    requested: new_max,
                    allowed: self.max_allowed_size,
                });
            }
            self.table.dynamic_mut().set_max_size(new_max);
            return Ok(None);
        }

        Err(HpackError::UnknownRepresentation(b))
    }

    /// Name from the table (or a literal when `name_index == 0`), then a literal value.
    fn decode_literal(&mut self, src: &mut &[u8], name_index: usize) -> Result<HeaderField, HpackError> {
        let name: Bytes = if name_index > 0 {
            self.table.resolve(name_index)?.name.clone()
        } else {
            decode_string(src, &mut self.huffman)?
        };
        let value = decode_string(src, &mut self.huffman)?;
        Ok(HeaderField { name, value })
    }
}

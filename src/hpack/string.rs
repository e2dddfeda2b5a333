//! String literal codec (RFC 7541 Section 5.2).

use bytes::{Buf, BufMut, Bytes};

use super::huffman::HuffmanDecode;
use super::integer::{decode_integer, encode_integer};
use crate::error::HpackError;

const HUFFMAN_FLAG: u8 = 0x80;

/// Append `data` as a raw (non-Huffman) string literal.
pub fn encode_string<B: BufMut>(dst: &mut B, data: &[u8]) {
    encode_integer(dst, data.len(), 7, 0x00);
    dst.put_slice(data);
}

/// Read one string literal from `src`, Huffman-decoding it when flagged.
pub fn decode_string<B, H>(src: &mut B, huffman: &mut H) -> Result<Bytes, HpackError>
where
    B: Buf,
    H: HuffmanDecode + ?Sized,
{
    if !src.has_remaining() {
        return Err(HpackError::TruncatedString {
            expected: 1,
            available: 0,
        });
    }
    let first = src.get_u8();
    let is_huffman = first & HUFFMAN_FLAG == HUFFMAN_FLAG;
    let len = decode_integer(first, src, 7)?;
    if src.remaining() < len {
        return Err(HpackError::TruncatedString {
            expected: len,
            available: src.remaining(),
        });
    }

    let data = src.copy_to_bytes(len);
    if is_huffman {
        Ok(Bytes::from(huffman.decode(&data)?))
    } else {
        Ok(data)
    }
}

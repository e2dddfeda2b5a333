//! Huffman decoding (RFC 7541 Section 5.2, Appendix B).
//!
//! The canonical code table is large, static and orthogonal to the table
//! logic, so it lives behind [`HuffmanDecode`]. [`FlukeHuffman`] delegates to
//! the decoder shipped with `fluke-hpack`.

use std::fmt;

use crate::error::HpackError;

/// Decodes Huffman-coded string literal octets into raw bytes.
pub trait HuffmanDecode {
    fn decode(&mut self, encoded: &[u8]) -> Result<Vec<u8>, HpackError>;
}

/// [`HuffmanDecode`] backed by `fluke_hpack::huffman::HuffmanDecoder`.
pub struct FlukeHuffman {
    inner: fluke_hpack::huffman::HuffmanDecoder,
}

impl fmt::Debug for FlukeHuffman {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlukeHuffman").finish()
    }
}

impl Default for FlukeHuffman {
    fn default() -> Self {
        Self::new()
    }
}

impl FlukeHuffman {
    pub fn new() -> Self {
        Self {
            inner: fluke_hpack::huffman::HuffmanDecoder::new(),
        }
    }
}

impl HuffmanDecode for FlukeHuffman {
    fn decode(&mut self, encoded: &[u8]) -> Result<Vec<u8>, HpackError> {
        self.inner.decode(encoded).map_err(|e| {
            tracing::debug!(error = ?e, len = encoded.len(), "huffman decode failed");
            HpackError::Huffman
        })
    }
}

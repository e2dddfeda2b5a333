//! Error types for the frame layer, the HPACK layer and the codec glue.
//!
//! Every error is terminal for the call that produced it. A decode error on a
//! header block leaves the decoder's dynamic table in a state the peer can no
//! longer be assumed to share, so callers must treat it as fatal to the
//! connection.

use std::io;

/// Errors produced while reading or writing frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// Fewer than 9 bytes were available for the frame header.
    #[error("truncated frame header")]
    TruncatedHeader,

    /// The source ended before the declared payload length was read.
    #[error("truncated frame payload (expected {expected} bytes, got {actual})")]
    TruncatedPayload { expected: usize, actual: usize },

    /// Payload length exceeds what the frame (or the negotiated limit) can carry.
    #[error("frame payload too large ({len} bytes, max {max})")]
    PayloadTooLarge { len: usize, max: usize },

    /// PADDED flag set but the pad length does not fit the payload.
    #[error("invalid padding length in HEADERS frame")]
    InvalidPadding,

    /// PRIORITY flag set but the payload is too short for the priority fields.
    #[error("PRIORITY HEADERS frame with insufficient data")]
    InvalidPriority,

    /// Transport failure other than a short read.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Errors produced while decoding a header block.
#[derive(Debug, thiserror::Error)]
pub enum HpackError {
    /// Index 0, or an index beyond the static and dynamic tables.
    #[error("invalid header index: {0}")]
    InvalidIndex(usize),

    /// A prefixed integer ran past the end of the block.
    #[error("truncated prefixed integer")]
    TruncatedInteger,

    /// A string literal is longer than the bytes left in the block.
    #[error("truncated string literal (expected {expected} bytes, {available} available)")]
    TruncatedString { expected: usize, available: usize },

    /// The leading octet matches no known representation.
    #[error("unknown header field representation {0:#010b}")]
    UnknownRepresentation(u8),

    /// A Dynamic Table Size Update exceeds the size we advertised.
    #[error("dynamic table size update to {requested} exceeds the allowed {allowed}")]
    SizeUpdateTooLarge { requested: usize, allowed: usize },

    /// A prefixed integer does not fit in `usize`.
    #[error("prefixed integer overflow")]
    IntegerOverflow,

    /// The Huffman collaborator rejected the encoded octets.
    #[error("invalid huffman-encoded string")]
    Huffman,
}

/// Errors produced by [`HeaderCodec`](crate::HeaderCodec).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Framing error.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// Header compression error.
    #[error("hpack error: {0}")]
    Hpack(#[from] HpackError),

    /// A frame that does not carry a header block was handed to the header codec.
    #[error("unexpected frame type {0:#x}")]
    UnexpectedFrameType(u8),

    /// HEADERS without END_HEADERS; CONTINUATION reassembly is not supported.
    #[error("header block on stream {stream_id} continues in CONTINUATION frames")]
    IncompleteHeaderBlock { stream_id: u32 },
}

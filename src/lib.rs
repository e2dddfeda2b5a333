//! h2-hpack-codec: a sans-I/O HTTP/2 frame layer and HPACK codec
//!
//! This crate provides the binary framing layer of HTTP/2 (RFC 9113 Section 4)
//! together with an HPACK header compression encoder/decoder (RFC 7541).
//!
//! # Features
//!
//! - **Sans-I/O Design**: No async runtime dependencies; bring your own transport
//! - **Frame Layer**: 9-byte header codec, blocking `read_frame` / `write_frame`
//!   over `std::io`, and a buffering [`FrameDecoder`] for chunked input
//! - **HPACK**: static table, size-bounded dynamic table with RFC 7541
//!   eviction, prefixed integers, string literals, Huffman decoding via
//!   fluke-hpack
//! - **Header Codec**: HEADERS frame <-> header field list in one call
//!
//! # Quick Start
//!
//! ```rust
//! use h2_hpack_codec::{read_frame, HeaderCodec, HeaderField};
//!
//! let mut client = HeaderCodec::default();
//! let mut server = HeaderCodec::default();
//!
//! let request = vec![
//!     HeaderField::new(":method", "GET"),
//!     HeaderField::new(":path", "/"),
//!     HeaderField::new(":scheme", "https"),
//!     HeaderField::new("x-request-id", "abc-123"),
//! ];
//!
//! // Client side: encode and write a HEADERS frame on stream 1.
//! let mut wire = Vec::new();
//! client.write_headers(&mut wire, 1, &request, true).unwrap();
//!
//! // Server side: read the frame back and decode its header block.
//! let frame = read_frame(&mut wire.as_slice()).unwrap();
//! let headers = server.decode_headers(&frame).unwrap();
//! assert_eq!(headers, request);
//! ```
//!
//! # Architecture
//!
//! ```text
//!   transport bytes
//!        |
//!   +----v---------+        +-------------+
//!   | frame        | -----> | hpack       |
//!   | FrameHeader  | block  | Decoder     | --> Vec<HeaderField>
//!   | Frame        | <----- | Encoder     | <-- &[HeaderField]
//!   +--------------+        +-------------+
//! ```
//!
//! Each connection owns one [`Encoder`] and one [`Decoder`], each with its own
//! dynamic table. Header blocks on a connection must be decoded in arrival
//! order.
//!
//! It does NOT provide:
//! - TCP/TLS transport or ALPN (you provide the bytes)
//! - The connection preface, SETTINGS handshake, streams or flow control
//! - CONTINUATION reassembly or Huffman encoding

pub mod codec;
pub mod config;
pub mod error;
pub mod frame;
pub mod hpack;

pub use codec::{header_block, HeaderCodec};
pub use config::{settings_id, CodecConfig, DEFAULT_MAX_FRAME_SIZE};
pub use error::{Error, FrameError, HpackError};
pub use frame::{
    flags, frame_type, read_frame, write_frame, Frame, FrameDecoder, FrameHeader,
    FRAME_HEADER_LEN, MAX_FRAME_PAYLOAD,
};
pub use hpack::{
    Decoder, DynamicTable, Encoder, FlukeHuffman, HeaderField, HeaderTable, HuffmanDecode,
    IndexingStrategy, StaticTable,
};

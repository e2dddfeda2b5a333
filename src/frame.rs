//! HTTP/2 frame layer.
//!
//! Every frame starts with a fixed 9-byte header (RFC 9113 Section 4.1):
//! ```text
//! +-----------------------------------------------+
//! |                 Length (24)                    |
//! +---------------+---------------+---------------+
//! |   Type (8)    |   Flags (8)   |
//! +-+-------------+---------------+------...------+
//! |R|                 Stream Identifier (31)       |
//! +-+---------------------------------------------+
//! |                   Frame Payload ...            |
//! +-----------------------------------------------+
//! ```
//!
//! Nothing here interprets payloads; type-specific meaning belongs to the
//! caller (see [`HeaderCodec`](crate::HeaderCodec) for HEADERS).

use std::io::{self, Read, Write};

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::FrameError;

/// Size of the fixed frame header.
pub const FRAME_HEADER_LEN: usize = 9;

/// Largest payload the 24-bit length field can describe.
pub const MAX_FRAME_PAYLOAD: usize = (1 << 24) - 1;

/// Upper bound for the payload buffer reserved before any payload byte has
/// been read; larger payloads grow the buffer as they arrive.
const INITIAL_READ_CAPACITY: usize = 16_384;

/// Mask clearing the reserved bit of a stream identifier.
const STREAM_ID_MASK: u32 = 0x7FFF_FFFF;

/// HTTP/2 frame types (RFC 9113 Section 6)
pub mod frame_type {
    pub const DATA: u8 = 0x0;
    pub const HEADERS: u8 = 0x1;
    pub const PRIORITY: u8 = 0x2;
    pub const RST_STREAM: u8 = 0x3;
    pub const SETTINGS: u8 = 0x4;
    pub const PUSH_PROMISE: u8 = 0x5;
    pub const PING: u8 = 0x6;
    pub const GOAWAY: u8 = 0x7;
    pub const WINDOW_UPDATE: u8 = 0x8;
    pub const CONTINUATION: u8 = 0x9;
}

/// HTTP/2 frame flags
pub mod flags {
    pub const END_STREAM: u8 = 0x1;
    pub const ACK: u8 = 0x1;
    pub const END_HEADERS: u8 = 0x4;
    pub const PADDED: u8 = 0x8;
    pub const PRIORITY: u8 = 0x20;
}

/// A parsed HTTP/2 frame header (9 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub length: u32,      // 24 bits
    pub frame_type: u8,
    pub flags: u8,
    pub stream_id: u32,   // 31 bits (high bit reserved)
}

impl FrameHeader {
    pub fn new(length: u32, frame_type: u8, flags: u8, stream_id: u32) -> Self {
        Self {
            length,
            frame_type,
            flags,
            stream_id: stream_id & STREAM_ID_MASK,
        }
    }

    /// Parse a 9-byte frame header. Returns `None` if fewer than 9 bytes are given.
    pub fn parse(data: &[u8]) -> Option<Self> {
        if data.len() < FRAME_HEADER_LEN {
            return None;
        }

        let mut buf = &data[..FRAME_HEADER_LEN];
        let length = ((buf.get_u8() as u32) << 16) | buf.get_u16() as u32;
        let frame_type = buf.get_u8();
        let flags = buf.get_u8();
        let stream_id = buf.get_u32() & STREAM_ID_MASK; // Clear reserved bit

        Some(Self {
            length,
            frame_type,
            flags,
            stream_id,
        })
    }

    /// Append the 9-byte wire form. The reserved bit is always written as zero.
    pub fn encode(&self, dst: &mut BytesMut) {
        dst.reserve(FRAME_HEADER_LEN);
        dst.put_u8((self.length >> 16) as u8);
        dst.put_u16(self.length as u16);
        dst.put_u8(self.frame_type);
        dst.put_u8(self.flags);
        dst.put_u32(self.stream_id & STREAM_ID_MASK);
    }

    /// Total frame size including header
    pub fn total_size(&self) -> usize {
        FRAME_HEADER_LEN + self.length as usize
    }

    /// Check if END_STREAM flag is set
    pub fn is_end_stream(&self) -> bool {
        self.flags & flags::END_STREAM != 0
    }

    /// Check if END_HEADERS flag is set
    pub fn is_end_headers(&self) -> bool {
        self.flags & flags::END_HEADERS != 0
    }

    pub fn is_padded(&self) -> bool {
        self.flags & flags::PADDED != 0
    }

    pub fn has_priority(&self) -> bool {
        self.flags & flags::PRIORITY != 0
    }
}

/// A complete frame: header plus payload, with `header.length == payload.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub header: FrameHeader,
    pub payload: Bytes,
}

impl Frame {
    /// Build a frame whose length field is taken from the payload.
    pub fn new(frame_type: u8, flags: u8, stream_id: u32, payload: impl Into<Bytes>) -> Result<Self, FrameError> {
        let payload = payload.into();
        check_payload_len(payload.len(), MAX_FRAME_PAYLOAD)?;
        Ok(Self {
            header: FrameHeader::new(payload.len() as u32, frame_type, flags, stream_id),
            payload,
        })
    }

    /// Serialize header and payload into one contiguous buffer.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(FRAME_HEADER_LEN + self.payload.len());
        self.header.encode(&mut buf);
        buf.extend_from_slice(&self.payload);
        buf.freeze()
    }
}

fn check_payload_len(len: usize, max: usize) -> Result<(), FrameError> {
    if len > max {
        return Err(FrameError::PayloadTooLarge { len, max });
    }
    Ok(())
}

/// Read exactly one frame from `source`.
///
/// A source that ends before 9 header bytes fails with `TruncatedHeader`; one
/// that ends inside the payload fails with `TruncatedPayload`.
pub fn read_frame<R: Read>(source: &mut R) -> Result<Frame, FrameError> {
    let mut header_buf = [0u8; FRAME_HEADER_LEN];
    match source.read_exact(&mut header_buf) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Err(FrameError::TruncatedHeader),
        Err(e) => return Err(e.into()),
    }
    let header = FrameHeader::parse(&header_buf).ok_or(FrameError::TruncatedHeader)?;

    let expected = header.length as usize;
    let mut payload = Vec::with_capacity(expected.min(INITIAL_READ_CAPACITY));
    let actual = source.by_ref().take(expected as u64).read_to_end(&mut payload)?;
    if actual < expected {
        return Err(FrameError::TruncatedPayload { expected, actual });
    }

    tracing::trace!(
        frame_type = header.frame_type,
        flags = header.flags,
        stream_id = header.stream_id,
        length = expected,
        "read frame"
    );

    Ok(Frame {
        header,
        payload: Bytes::from(payload),
    })
}

/// Write the 9-byte header followed by `payload` verbatim.
///
/// The length on the wire is always `payload.len()`; `header.length` is not
/// consulted. A failed or partial write is propagated, never retried.
pub fn write_frame<W: Write>(sink: &mut W, header: &FrameHeader, payload: &[u8]) -> Result<(), FrameError> {
    check_payload_len(payload.len(), MAX_FRAME_PAYLOAD)?;
    if header.length as usize != payload.len() {
        tracing::debug!(
            declared = header.length,
            actual = payload.len(),
            "frame header length differs from payload, writing payload length"
        );
    }

    let mut buf = BytesMut::with_capacity(FRAME_HEADER_LEN);
    FrameHeader {
        length: payload.len() as u32,
        ..*header
    }
    .encode(&mut buf);

    sink.write_all(&buf)?;
    sink.write_all(payload)?;

    tracing::trace!(
        frame_type = header.frame_type,
        flags = header.flags,
        stream_id = header.stream_id & STREAM_ID_MASK,
        length = payload.len(),
        "wrote frame"
    );
    Ok(())
}

/// Buffering frame parser for byte streams that arrive in arbitrary chunks.
///
/// Feed raw bytes, then pull complete frames. Incomplete frames stay buffered
/// until the rest arrives.
#[derive(Debug)]
pub struct FrameDecoder {
    /// Buffer for incomplete frames
    buffer: BytesMut,
    max_payload: usize,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::with_max_payload(MAX_FRAME_PAYLOAD)
    }

    /// Reject frames whose declared length exceeds `max_payload`
    /// (e.g. the negotiated SETTINGS_MAX_FRAME_SIZE).
    pub fn with_max_payload(max_payload: usize) -> Self {
        Self {
            buffer: BytesMut::new(),
            max_payload: max_payload.min(MAX_FRAME_PAYLOAD),
        }
    }

    pub fn set_max_payload(&mut self, max_payload: usize) {
        self.max_payload = max_payload.min(MAX_FRAME_PAYLOAD);
    }

    /// Append received bytes to the internal buffer.
    pub fn feed(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Number of buffered bytes not yet returned as frames.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Take the next complete frame, or `Ok(None)` if more bytes are needed.
    pub fn next_frame(&mut self) -> Result<Option<Frame>, FrameError> {
        let header = match FrameHeader::parse(&self.buffer) {
            Some(h) => h,
            None => return Ok(None),
        };
        check_payload_len(header.length as usize, self.max_payload)?;

        // Check if we have the complete frame
        if self.buffer.len() < header.total_size() {
            return Ok(None);
        }

        self.buffer.advance(FRAME_HEADER_LEN);
        let payload = self.buffer.split_to(header.length as usize).freeze();
        Ok(Some(Frame { header, payload }))
    }

    /// Feed `data` and drain every frame that is now complete.
    pub fn decode(&mut self, data: &[u8]) -> Result<Vec<Frame>, FrameError> {
        self.feed(data);
        let mut frames = Vec::new();
        while let Some(frame) = self.next_frame()? {
            frames.push(frame);
        }
        Ok(frames)
    }

    /// Drop any partially buffered frame.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }
}

//! Glue between the frame layer and HPACK.
//!
//! Outbound: header fields -> [`Encoder`] -> HEADERS payload -> [`Frame`].
//! Inbound: HEADERS [`Frame`] -> header block -> [`Decoder`] -> header fields.

use std::io::Write;

use bytes::Bytes;

use crate::config::CodecConfig;
use crate::error::{Error, FrameError};
use crate::frame::{flags, frame_type, write_frame, Frame, FrameHeader};
use crate::hpack::{Decoder, DynamicTable, Encoder, HeaderField};

/// Per-connection header codec: one encoder and one decoder, each with its
/// own dynamic table.
///
/// Header blocks must be decoded in arrival order and encoded in send order;
/// the codec is not meant to be shared between connections or tasks.
#[derive(Debug)]
pub struct HeaderCodec {
    encoder: Encoder<'static>,
    decoder: Decoder<'static>,
    local: CodecConfig,
    peer: CodecConfig,
}

impl Default for HeaderCodec {
    fn default() -> Self {
        Self::new(CodecConfig::default())
    }
}

impl HeaderCodec {
    /// `config` holds our own settings: the decoder's table size and the
    /// largest frame we accept. The peer is assumed to use protocol defaults
    /// until [`apply_settings`](Self::apply_settings) is called.
    pub fn new(config: CodecConfig) -> Self {
        let peer = CodecConfig::default().with_indexing(config.indexing);
        Self {
            encoder: Encoder::new(peer.header_table_size).with_indexing(config.indexing),
            decoder: Decoder::new(config.header_table_size),
            local: config,
            peer,
        }
    }

    pub fn local_config(&self) -> &CodecConfig {
        &self.local
    }

    pub fn peer_config(&self) -> &CodecConfig {
        &self.peer
    }

    pub fn encoder_table(&self) -> &DynamicTable {
        self.encoder.dynamic_table()
    }

    pub fn decoder_table(&self) -> &DynamicTable {
        self.decoder.dynamic_table()
    }

    /// Apply the peer's SETTINGS entries. HEADER_TABLE_SIZE resizes the
    /// encoder's table (signalled in the next header block); MAX_FRAME_SIZE
    /// bounds the frames [`encode_headers`](Self::encode_headers) produces.
    pub fn apply_settings(&mut self, settings: &[(u16, u32)]) {
        for &(id, value) in settings {
            if self.peer.apply_setting(id, value) {
                tracing::debug!(id, value, "applied peer setting");
            }
        }
        self.encoder.set_max_table_size(self.peer.header_table_size);
    }

    /// Encode `fields` into a single HEADERS frame with END_HEADERS set.
    ///
    /// Fails with `PayloadTooLarge` if the block exceeds the peer's maximum
    /// frame size. The encoder's table has already been updated at that point,
    /// so the connection cannot continue without sending the block some other
    /// way (CONTINUATION frames are not produced here).
    pub fn encode_headers(&mut self, stream_id: u32, fields: &[HeaderField], end_stream: bool) -> Result<Frame, Error> {
        let block = self.encoder.encode(fields);
        if block.len() > self.peer.max_frame_size {
            return Err(FrameError::PayloadTooLarge {
                len: block.len(),
                max: self.peer.max_frame_size,
            }
            .into());
        }

        let mut frame_flags = flags::END_HEADERS;
        if end_stream {
            frame_flags |= flags::END_STREAM;
        }
        Ok(Frame::new(frame_type::HEADERS, frame_flags, stream_id, block)?)
    }

    /// [`encode_headers`](Self::encode_headers) and write the frame to `sink`.
    pub fn write_headers<W: Write>(
        &mut self,
        sink: &mut W,
        stream_id: u32,
        fields: &[HeaderField],
        end_stream: bool,
    ) -> Result<(), Error> {
        let frame = self.encode_headers(stream_id, fields, end_stream)?;
        write_frame(sink, &frame.header, &frame.payload)?;
        Ok(())
    }

    /// Decode the header block carried by a HEADERS frame.
    ///
    /// Any error is fatal to the connection: the decoder's table may no
    /// longer match the peer's encoder.
    pub fn decode_headers(&mut self, frame: &Frame) -> Result<Vec<HeaderField>, Error> {
        if frame.header.frame_type != frame_type::HEADERS {
            return Err(Error::UnexpectedFrameType(frame.header.frame_type));
        }
        if frame.payload.len() > self.local.max_frame_size {
            return Err(FrameError::PayloadTooLarge {
                len: frame.payload.len(),
                max: self.local.max_frame_size,
            }
            .into());
        }
        if !frame.header.is_end_headers() {
            return Err(Error::IncompleteHeaderBlock {
                stream_id: frame.header.stream_id,
            });
        }

        let block = header_block(&frame.header, &frame.payload)?;
        let fields = self.decoder.decode(&block)?;
        tracing::trace!(stream_id = frame.header.stream_id, count = fields.len(), "decoded header block");
        Ok(fields)
    }
}

/// Extract the header block fragment from a HEADERS payload, stripping the
/// PADDED and PRIORITY fields (RFC 9113 Section 6.2).
pub fn header_block(header: &FrameHeader, payload: &Bytes) -> Result<Bytes, FrameError> {
    let mut offset = 0;
    let mut end = payload.len();

    // Handle PADDED flag
    if header.is_padded() {
        let pad_length = *payload.first().ok_or(FrameError::InvalidPadding)? as usize;
        offset = 1;
        if pad_length > payload.len() - offset {
            return Err(FrameError::InvalidPadding);
        }
        end = payload.len() - pad_length;
    }

    // Handle PRIORITY flag: stream dependency (4 bytes) + weight (1 byte)
    if header.has_priority() {
        if end - offset < 5 {
            return Err(FrameError::InvalidPriority);
        }
        offset += 5;
    }

    Ok(payload.slice(offset..end))
}

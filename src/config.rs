//! Codec configuration and the SETTINGS values that feed it.

use crate::frame::MAX_FRAME_PAYLOAD;
use crate::hpack::{IndexingStrategy, DEFAULT_TABLE_SIZE};

/// Default SETTINGS_MAX_FRAME_SIZE (RFC 9113 Section 6.5.2).
pub const DEFAULT_MAX_FRAME_SIZE: usize = 16_384;

/// HTTP/2 SETTINGS identifiers (RFC 9113 Section 6.5.2)
pub mod settings_id {
    pub const HEADER_TABLE_SIZE: u16 = 0x1;
    pub const ENABLE_PUSH: u16 = 0x2;
    pub const MAX_CONCURRENT_STREAMS: u16 = 0x3;
    pub const INITIAL_WINDOW_SIZE: u16 = 0x4;
    pub const MAX_FRAME_SIZE: u16 = 0x5;
    pub const MAX_HEADER_LIST_SIZE: u16 = 0x6;
}

/// Configuration for a [`HeaderCodec`](crate::HeaderCodec).
///
/// `header_table_size` bounds both dynamic tables until the peer says
/// otherwise; `max_frame_size` bounds the payload of frames the codec
/// produces and accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    pub header_table_size: usize,
    pub max_frame_size: usize,
    pub indexing: IndexingStrategy,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            header_table_size: DEFAULT_TABLE_SIZE,
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            indexing: IndexingStrategy::StaticOnly,
        }
    }
}

impl CodecConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header_table_size(mut self, size: usize) -> Self {
        self.header_table_size = size;
        self
    }

    /// Clamped to the 24-bit frame length limit.
    pub fn with_max_frame_size(mut self, size: usize) -> Self {
        self.max_frame_size = size.min(MAX_FRAME_PAYLOAD);
        self
    }

    pub fn with_indexing(mut self, indexing: IndexingStrategy) -> Self {
        self.indexing = indexing;
        self
    }

    /// Apply one SETTINGS entry. Returns `true` if the entry changed a value
    /// this codec uses; every other identifier is ignored.
    pub fn apply_setting(&mut self, id: u16, value: u32) -> bool {
        match id {
            settings_id::HEADER_TABLE_SIZE => {
                self.header_table_size = value as usize;
                true
            }
            settings_id::MAX_FRAME_SIZE => {
                self.max_frame_size = (value as usize).min(MAX_FRAME_PAYLOAD);
                true
            }
            _ => false,
        }
    }
}

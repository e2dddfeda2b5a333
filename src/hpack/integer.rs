//! Prefixed integer codec (RFC 7541 Section 5.1).
//!
//! The first octet carries a representation pattern in its high bits and up to
//! `prefix_bits` bits of value. Values that do not fit below the all-ones
//! prefix continue in base-128 octets, least significant group first, with the
//! high bit of each octet marking continuation.

use bytes::{Buf, BufMut};

use crate::error::HpackError;

const CONTINUATION: u8 = 0x80;

fn prefix_mask(prefix_bits: u8) -> usize {
    debug_assert!((1..=8).contains(&prefix_bits));
    (1usize << prefix_bits) - 1
}

/// Append `value` using an N-bit prefix, OR-ing `pattern` into the first octet.
pub fn encode_integer<B: BufMut>(dst: &mut B, value: usize, prefix_bits: u8, pattern: u8) {
    let mask = prefix_mask(prefix_bits);
    if value < mask {
        dst.put_u8(pattern | value as u8);
        return;
    }

    dst.put_u8(pattern | mask as u8);
    let mut remaining = value - mask;
    while remaining >= 128 {
        dst.put_u8(CONTINUATION | (remaining & 0x7f) as u8);
        remaining >>= 7;
    }
    dst.put_u8(remaining as u8);
}

/// Decode an integer whose first octet `first` has already been consumed;
/// continuation octets are taken from `src`.
pub fn decode_integer<B: Buf>(first: u8, src: &mut B, prefix_bits: u8) -> Result<usize, HpackError> {
    let mask = prefix_mask(prefix_bits);
    let prefix = first as usize & mask;
    if prefix < mask {
        return Ok(prefix);
    }

    let mut value = 0usize;
    let mut shift = 0u32;
    loop {
        if !src.has_remaining() {
            return Err(HpackError::TruncatedInteger);
        }
        let b = src.get_u8();
        let group = (b & 0x7f) as usize;
        if shift >= usize::BITS || group > usize::MAX >> shift {
            return Err(HpackError::IntegerOverflow);
        }
        value = value
            .checked_add(group << shift)
            .ok_or(HpackError::IntegerOverflow)?;
        shift += 7;
        if b & CONTINUATION == 0 {
            break;
        }
    }
    prefix.checked_add(value).ok_or(HpackError::IntegerOverflow)
}

/// Decode an integer from the start of `src`, returning the value and the
/// number of octets consumed.
pub fn decode_integer_slice(src: &[u8], prefix_bits: u8) -> Result<(usize, usize), HpackError> {
    let mut buf = src;
    if !buf.has_remaining() {
        return Err(HpackError::TruncatedInteger);
    }
    let first = buf.get_u8();
    let value = decode_integer(first, &mut buf, prefix_bits)?;
    Ok((value, src.len() - buf.len()))
}

//! Tests for blocking read_frame / write_frame

use std::io::{self, Read, Write};

use h2_hpack_codec::{
    flags, frame_type, read_frame, write_frame, FrameError, FrameHeader, FRAME_HEADER_LEN, MAX_FRAME_PAYLOAD,
};
use proptest::prelude::*;

/// Sink that accepts a limited number of bytes, then fails.
struct FailingSink {
    written: Vec<u8>,
    capacity: usize,
}

impl Write for FailingSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let room = self.capacity - self.written.len();
        if room == 0 {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "peer went away"));
        }
        let n = room.min(buf.len());
        self.written.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Source that yields one byte per read call.
struct Trickle<'a>(&'a [u8]);

impl Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.0.is_empty() || buf.is_empty() {
            return Ok(0);
        }
        buf[0] = self.0[0];
        self.0 = &self.0[1..];
        Ok(1)
    }
}

#[test]
fn test_write_then_read() {
    let header = FrameHeader::new(5, frame_type::DATA, flags::END_STREAM, 1);
    let mut wire = Vec::new();
    write_frame(&mut wire, &header, b"hello").unwrap();

    assert_eq!(wire.len(), 14);
    assert_eq!(&wire[..9], &[0, 0, 5, 0, 1, 0, 0, 0, 1]);

    let frame = read_frame(&mut wire.as_slice()).unwrap();
    assert_eq!(frame.header, header);
    assert_eq!(&frame.payload[..], b"hello");
}

#[test]
fn test_read_consecutive_frames() {
    let mut wire = Vec::new();
    write_frame(&mut wire, &FrameHeader::new(0, frame_type::SETTINGS, 0, 0), &[]).unwrap();
    write_frame(&mut wire, &FrameHeader::new(8, frame_type::PING, 0, 0), b"pingpong").unwrap();

    let mut source = wire.as_slice();
    let settings = read_frame(&mut source).unwrap();
    let ping = read_frame(&mut source).unwrap();

    assert_eq!(settings.header.frame_type, frame_type::SETTINGS);
    assert!(settings.payload.is_empty());
    assert_eq!(ping.header.frame_type, frame_type::PING);
    assert_eq!(&ping.payload[..], b"pingpong");
    assert!(source.is_empty());
}

#[test]
fn test_read_from_trickling_source() {
    let mut wire = Vec::new();
    write_frame(&mut wire, &FrameHeader::new(3, frame_type::DATA, 0, 7), b"abc").unwrap();

    let frame = read_frame(&mut Trickle(&wire)).unwrap();
    assert_eq!(frame.header.stream_id, 7);
    assert_eq!(&frame.payload[..], b"abc");
}

#[test]
fn test_read_empty_source() {
    let mut source: &[u8] = &[];
    assert!(matches!(read_frame(&mut source), Err(FrameError::TruncatedHeader)));
}

#[test]
fn test_read_truncated_header() {
    let mut source: &[u8] = &[0, 0, 5, 0, 1];
    assert!(matches!(read_frame(&mut source), Err(FrameError::TruncatedHeader)));
}

#[test]
fn test_read_truncated_payload() {
    let mut source: &[u8] = &[0, 0, 5, 0, 1, 0, 0, 0, 1, b'h', b'e'];
    assert!(matches!(
        read_frame(&mut source),
        Err(FrameError::TruncatedPayload { expected: 5, actual: 2 })
    ));
}

#[test]
fn test_write_uses_payload_length() {
    let header = FrameHeader::new(100, frame_type::DATA, 0, 1);
    let mut wire = Vec::new();
    write_frame(&mut wire, &header, b"xy").unwrap();

    assert_eq!(&wire[..3], &[0, 0, 2]);
    assert_eq!(wire.len(), 11);
}

#[test]
fn test_write_propagates_partial_write() {
    let mut sink = FailingSink {
        written: Vec::new(),
        capacity: 12,
    };
    let header = FrameHeader::new(5, frame_type::DATA, 0, 1);

    let err = write_frame(&mut sink, &header, b"hello").unwrap_err();
    assert!(matches!(err, FrameError::Io(ref e) if e.kind() == io::ErrorKind::BrokenPipe));
    assert_eq!(sink.written.len(), 12);
}

#[test]
fn test_write_rejects_oversized_payload() {
    let payload = vec![0u8; 1 << 24];
    let header = FrameHeader::new(0, frame_type::DATA, 0, 1);
    let mut wire = Vec::new();

    assert!(matches!(
        write_frame(&mut wire, &header, &payload),
        Err(FrameError::PayloadTooLarge { len, .. }) if len == 1 << 24
    ));
    assert!(wire.is_empty());
}

#[test]
fn test_max_payload_round_trip() {
    let payload: Vec<u8> = (0..MAX_FRAME_PAYLOAD).map(|i| i as u8).collect();
    let header = FrameHeader::new(MAX_FRAME_PAYLOAD as u32, frame_type::DATA, flags::END_STREAM, 3);
    let mut wire = Vec::new();
    write_frame(&mut wire, &header, &payload).unwrap();

    assert_eq!(&wire[..3], &[0xff, 0xff, 0xff]);
    assert_eq!(wire.len(), FRAME_HEADER_LEN + MAX_FRAME_PAYLOAD);

    let frame = read_frame(&mut wire.as_slice()).unwrap();
    assert_eq!(frame.header, header);
    assert_eq!(frame.payload.len(), MAX_FRAME_PAYLOAD);
    assert!(frame.payload[..] == payload[..]);
}

proptest! {
    #[test]
    fn prop_write_then_read_frame(
        frame_type: u8,
        frame_flags: u8,
        stream_id in 0u32..=0x7fff_ffff,
        payload in prop::collection::vec(any::<u8>(), 0..4096),
    ) {
        let header = FrameHeader::new(payload.len() as u32, frame_type, frame_flags, stream_id);
        let mut wire = Vec::new();
        write_frame(&mut wire, &header, &payload).unwrap();

        let mut source = wire.as_slice();
        let frame = read_frame(&mut source).unwrap();
        prop_assert_eq!(frame.header, header);
        prop_assert_eq!(&frame.payload[..], &payload[..]);
        prop_assert!(source.is_empty());
    }
}

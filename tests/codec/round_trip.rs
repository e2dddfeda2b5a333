//! HEADERS frames through a pair of HeaderCodecs

use h2_hpack_codec::{
    flags, frame_type, read_frame, CodecConfig, Error, Frame, FrameDecoder, FrameError, HeaderCodec,
    HeaderField, HpackError, IndexingStrategy,
};

fn request(path: &'static str) -> Vec<HeaderField> {
    vec![
        HeaderField::new(":method", "GET"),
        HeaderField::new(":scheme", "https"),
        HeaderField::new(":path", path),
        HeaderField::new(":authority", "api.example.com"),
        HeaderField::new("authorization", "Bearer token-123"),
        HeaderField::new("x-request-id", path),
    ]
}

#[test]
fn test_requests_over_one_connection() {
    let mut client = HeaderCodec::default();
    let mut server = HeaderCodec::default();
    let mut wire = Vec::new();

    let paths = ["/a", "/b", "/c"];
    for (i, &path) in paths.iter().enumerate() {
        client.write_headers(&mut wire, 1 + 2 * i as u32, &request(path), true).unwrap();
    }

    let mut source = wire.as_slice();
    for (i, &path) in paths.iter().enumerate() {
        let frame = read_frame(&mut source).unwrap();
        assert_eq!(frame.header.stream_id, 1 + 2 * i as u32);
        assert!(frame.header.is_end_stream());
        assert_eq!(server.decode_headers(&frame).unwrap(), request(path));
    }

    assert_eq!(client.encoder_table().size(), server.decoder_table().size());
    assert_eq!(client.encoder_table().len(), server.decoder_table().len());
}

#[test]
fn test_full_indexing_shrinks_repeat_blocks() {
    let config = CodecConfig::new().with_indexing(IndexingStrategy::Full);
    let mut client = HeaderCodec::new(config);
    let mut server = HeaderCodec::new(config);

    let first = client.encode_headers(1, &request("/same"), false).unwrap();
    let second = client.encode_headers(3, &request("/same"), false).unwrap();

    assert!(second.payload.len() < first.payload.len());
    assert!(!second.header.is_end_stream());
    assert_eq!(server.decode_headers(&first).unwrap(), request("/same"));
    assert_eq!(server.decode_headers(&second).unwrap(), request("/same"));
}

#[test]
fn test_chunked_transport() {
    let mut client = HeaderCodec::default();
    let mut server = HeaderCodec::default();

    let mut wire = Vec::new();
    client.write_headers(&mut wire, 1, &request("/chunked"), false).unwrap();
    client.write_headers(&mut wire, 3, &request("/chunked"), false).unwrap();

    let mut decoder = FrameDecoder::new();
    let mut decoded = Vec::new();
    for chunk in wire.chunks(5) {
        for frame in decoder.decode(chunk).unwrap() {
            decoded.push(server.decode_headers(&frame).unwrap());
        }
    }
    assert_eq!(decoded, vec![request("/chunked"), request("/chunked")]);
}

#[test]
fn test_decode_padded_priority_headers() {
    let mut server = HeaderCodec::default();
    // pad length 3, dependency 0 + weight 15, block :method GET :path /, padding
    let payload: [u8; 11] = [3, 0, 0, 0, 0, 15, 0x82, 0x84, 0, 0, 0];
    let frame = Frame::new(
        frame_type::HEADERS,
        flags::END_HEADERS | flags::PADDED | flags::PRIORITY,
        5,
        payload.to_vec(),
    )
    .unwrap();

    assert_eq!(
        server.decode_headers(&frame).unwrap(),
        vec![HeaderField::new(":method", "GET"), HeaderField::new(":path", "/")]
    );
}

#[test]
fn test_decode_invalid_padding() {
    let mut server = HeaderCodec::default();
    let frame = Frame::new(frame_type::HEADERS, flags::END_HEADERS | flags::PADDED, 1, vec![9u8, 0x82]).unwrap();

    assert!(matches!(
        server.decode_headers(&frame),
        Err(Error::Frame(FrameError::InvalidPadding))
    ));
}

#[test]
fn test_decode_bad_block_is_hpack_error() {
    let mut server = HeaderCodec::default();
    let frame = Frame::new(frame_type::HEADERS, flags::END_HEADERS, 1, vec![0xc6u8]).unwrap();

    let err = server.decode_headers(&frame).unwrap_err();
    assert!(matches!(err, Error::Hpack(HpackError::InvalidIndex(70))));
    assert_eq!(err.to_string(), "hpack error: invalid header index: 70");
}

#[test]
fn test_decode_rejects_frame_above_local_limit() {
    let mut server = HeaderCodec::new(CodecConfig::new().with_max_frame_size(4));
    let frame = Frame::new(frame_type::HEADERS, flags::END_HEADERS, 1, vec![0x82u8; 5]).unwrap();

    assert!(matches!(
        server.decode_headers(&frame),
        Err(Error::Frame(FrameError::PayloadTooLarge { len: 5, max: 4 }))
    ));
}

#[test]
fn test_decode_padding_fills_payload() {
    let mut server = HeaderCodec::default();

    for (frame_flags, payload) in [
        (flags::END_HEADERS | flags::PADDED, vec![2u8, 0, 0]),
        (flags::END_HEADERS | flags::PADDED, vec![0u8]),
        (flags::END_HEADERS | flags::PADDED | flags::PRIORITY, vec![3u8, 0, 0, 0, 0, 16, 0, 0, 0]),
    ] {
        let frame = Frame::new(frame_type::HEADERS, frame_flags, 1, payload).unwrap();
        assert!(server.decode_headers(&frame).unwrap().is_empty());
    }
}

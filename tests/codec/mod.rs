//! HeaderCodec integration tests

mod round_trip;

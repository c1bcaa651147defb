//! Fuzz target: request and reply decoding
//!
//! Arbitrary datagrams must decode without panicking.  Anything accepted
//! as a reply must encode back to the exact same bytes, and only the one
//! exact request string is ever a `GET COLOR`.
//!
//! cargo fuzz run fuzz_wire_codec

#![no_main]

use colorsource::{Reply, Request};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if Request::decode(data) == Request::GetColor {
        assert_eq!(data, b"GET COLOR");
    }

    if let Some(reply) = Reply::decode(data) {
        assert_eq!(reply.encode().as_bytes(), data, "decode accepted a non-canonical reply");
    }
});

#![no_main]
use libfuzzer_sys::fuzz_target;
use bytes::Bytes;
use rtkit::parser::bgp::messages::parse_bgp_message;

fuzz_target!(|data: &[u8]| {
    let mut bytes = Bytes::copy_from_slice(data);
    let _ = parse_bgp_message(&mut bytes);
});

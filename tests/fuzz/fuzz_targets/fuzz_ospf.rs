#![no_main]
use libfuzzer_sys::fuzz_target;
use bytes::Bytes;
use rtkit::parser::{decode_ospf_packet, parse_ospf_packet};

fuzz_target!(|data: &[u8]| {
    let bytes = Bytes::copy_from_slice(data);
    let _ = decode_ospf_packet(bytes.clone());
    let _ = parse_ospf_packet(bytes);
});

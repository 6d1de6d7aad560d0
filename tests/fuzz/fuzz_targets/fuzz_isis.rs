#![no_main]
use libfuzzer_sys::fuzz_target;
use bytes::Bytes;
use rtkit::parser::{parse_isis_frame, parse_isis_pdu};

fuzz_target!(|data: &[u8]| {
    let bytes = Bytes::copy_from_slice(data);
    let _ = parse_isis_frame(bytes.clone());
    let _ = parse_isis_pdu(bytes);
});

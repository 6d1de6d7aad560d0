#![no_main]
use libfuzzer_sys::fuzz_target;
use bytes::Bytes;
use rtkit::parser::bgp::attributes::parse_attributes;

fuzz_target!(|data: &[u8]| {
    let bytes = Bytes::copy_from_slice(data);
    if let Ok(attributes) = parse_attributes(bytes) {
        // whatever decodes must re-encode without panicking
        let _ = attributes.encode();
    }
});

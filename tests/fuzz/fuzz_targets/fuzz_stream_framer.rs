#![no_main]
use libfuzzer_sys::fuzz_target;
use rtkit::parser::BgpStreamFramer;

fuzz_target!(|data: &[u8]| {
    let mut framer = BgpStreamFramer::new();
    // feed in two uneven pieces to exercise resumption
    let split = data.len() / 3;
    framer.push(&data[..split]);
    while let Some(msg) = framer.next_message() {
        let _ = msg.parse();
    }
    framer.push(&data[split..]);
    while let Some(msg) = framer.next_message() {
        let _ = msg.parse();
    }
});

use rtkit::models::*;
use rtkit::parser::BgpStreamFramer;
use rtkit::ParserError;
use std::io::Cursor;
use std::net::Ipv4Addr;

fn sample_messages() -> Vec<BgpMessage> {
    let update = BgpUpdateMessage {
        withdrawn_prefixes: vec![Prefix::from_ipv4(Ipv4Addr::new(172, 16, 0, 0), 12).unwrap()],
        attributes: [
            Attribute::new(AttrType::ORIGIN, AttributeValue::Origin(Origin::IGP)),
            Attribute::new(
                AttrType::NEXT_HOP,
                AttributeValue::NextHop(Ipv4Addr::new(192, 0, 2, 1)),
            ),
        ]
        .into_iter()
        .collect(),
        announced_prefixes: vec![Prefix::from_ipv4(Ipv4Addr::new(10, 0, 0, 0), 8).unwrap()],
    };
    vec![
        BgpMessage::open(65001, 180, Ipv4Addr::new(10, 0, 0, 1)),
        BgpMessage::keepalive(),
        BgpMessage::Update(update),
        BgpMessage::keepalive(),
    ]
}

fn stream_bytes(messages: &[BgpMessage]) -> Vec<u8> {
    messages.iter().flat_map(|m| m.encode().to_vec()).collect()
}

fn drain(framer: &mut BgpStreamFramer, out: &mut Vec<BgpMessage>) {
    while let Some(raw) = framer.next_message() {
        out.push(raw.parse().unwrap());
    }
}

#[test]
fn test_same_messages_for_any_split() {
    let messages = sample_messages();
    let bytes = stream_bytes(&messages);

    let mut whole = BgpStreamFramer::new();
    whole.push(&bytes);
    let mut expected = vec![];
    drain(&mut whole, &mut expected);
    assert_eq!(expected, messages);

    for chunk_size in [1, 2, 3, 7, 16, 19, 20, 33, 64] {
        let mut framer = BgpStreamFramer::new();
        let mut decoded = vec![];
        for chunk in bytes.chunks(chunk_size) {
            framer.push(chunk);
            drain(&mut framer, &mut decoded);
        }
        assert_eq!(decoded, messages, "chunk size {}", chunk_size);
        assert_eq!(framer.buffered(), 0);
    }
}

#[test]
fn test_uneven_splits() {
    let messages = sample_messages();
    let bytes = stream_bytes(&messages);
    // split points that land inside markers, length fields and bodies
    let cuts = [5, 17, 18, 29, 30, 47, 50, bytes.len() - 1];
    let mut framer = BgpStreamFramer::new();
    let mut decoded = vec![];
    let mut start = 0;
    for cut in cuts.into_iter().chain([bytes.len()]) {
        framer.push(&bytes[start..cut]);
        drain(&mut framer, &mut decoded);
        start = cut;
    }
    assert_eq!(decoded, messages);
}

#[test]
fn test_resync_after_garbage() {
    let messages = sample_messages();
    let mut bytes = vec![0xde, 0xad, 0xbe, 0xef, 0xff, 0xff];
    bytes.extend(stream_bytes(&messages));
    let mut framer = BgpStreamFramer::new();
    framer.push(&bytes);
    let mut decoded = vec![];
    drain(&mut framer, &mut decoded);
    assert_eq!(decoded, messages);
}

#[test]
fn test_reader_until_closed() {
    let messages = sample_messages();
    let mut reader = Cursor::new(stream_bytes(&messages));
    let mut framer = BgpStreamFramer::new();
    let mut decoded = vec![];
    loop {
        match framer.extract_next_message(&mut reader) {
            Ok(raw) => decoded.push(raw.parse().unwrap()),
            Err(ParserError::ConnectionClosed) => break,
            Err(e) => panic!("unexpected {}", e),
        }
    }
    assert_eq!(decoded, messages);
}

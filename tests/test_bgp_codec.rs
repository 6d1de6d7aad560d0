use bytes::Bytes;
use rtkit::models::*;
use rtkit::parser::{parse_bgp_message, parse_bgp_message_body, parse_prefix_list};
use std::net::Ipv4Addr;

const MARKER: &str = "ffffffffffffffffffffffffffffffff";

/// A framed message from the hex of everything after the marker.
fn message(hex_str: &str) -> Bytes {
    Bytes::from(hex::decode(format!("{}{}", MARKER, hex_str)).unwrap())
}

#[test]
fn test_open_round_trip() {
    let raw = message("001d0104fde900b40a00000100");
    assert_eq!(raw.len(), 29);
    let msg = parse_bgp_message(&mut raw.clone()).unwrap();
    let BgpMessage::Open(open) = &msg else {
        panic!("expected OPEN, got {:?}", msg);
    };
    assert_eq!(open.version, 4);
    assert_eq!(open.asn, 65001);
    assert_eq!(open.hold_time, 180);
    assert_eq!(open.bgp_identifier, Ipv4Addr::new(10, 0, 0, 1));
    assert!(open.opt_params.is_empty());
    assert_eq!(msg.encode(), raw);
}

#[test]
fn test_update_with_next_hop() {
    let raw = message("00200200000007400304c0000201080a");
    let msg = parse_bgp_message(&mut raw.clone()).unwrap();
    let BgpMessage::Update(update) = &msg else {
        panic!("expected UPDATE, got {:?}", msg);
    };
    assert!(update.withdrawn_prefixes.is_empty());
    assert_eq!(update.attributes.next_hop(), Some(Ipv4Addr::new(192, 0, 2, 1)));
    assert_eq!(
        update.announced_prefixes,
        vec![Prefix::from_ipv4(Ipv4Addr::new(10, 0, 0, 0), 8).unwrap()]
    );
    assert_eq!(update.announced_prefixes[0].octets.as_ref(), &[0x0a]);
    assert_eq!(msg.encode(), raw);
}

#[test]
fn test_unknown_attribute_round_trips() {
    // withdrawn len 0, attrs: ORIGIN IGP, unknown type 99 (optional transitive) with 3 bytes
    let body = Bytes::from(hex::decode("0000000a40010100c063031234560818").unwrap());
    let msg = parse_bgp_message_body(2, body.clone()).unwrap();
    let BgpMessage::Update(update) = &msg else {
        panic!("expected UPDATE, got {:?}", msg);
    };
    let unknown = update.attributes.get(AttrType::Unknown(99)).unwrap();
    assert_eq!(
        unknown.value,
        AttributeValue::Unknown(Bytes::from_static(&[0x12, 0x34, 0x56]))
    );
    assert_eq!(
        unknown.flags,
        AttrFlags::OPTIONAL | AttrFlags::TRANSITIVE
    );
    assert_eq!(update.announced_prefixes[0].to_string(), "24.0.0.0/8");
    assert_eq!(msg.encode_body(), body);
}

#[test]
fn test_extended_length_preserved() {
    // COMMUNITIES with the extended-length flag set although the value is short
    let body = Bytes::from(hex::decode("00000008d0080004fde90064").unwrap());
    let msg = parse_bgp_message_body(2, body.clone()).unwrap();
    let BgpMessage::Update(update) = &msg else {
        panic!("expected UPDATE, got {:?}", msg);
    };
    let communities = update.attributes.get(AttrType::COMMUNITIES).unwrap();
    assert_eq!(
        communities.value,
        AttributeValue::Communities(vec![0xfde90064])
    );
    assert!(communities.flags.contains(AttrFlags::EXTENDED));
    assert_eq!(msg.encode_body(), body);
}

#[test]
fn test_truncated_and_malformed_are_distinct() {
    // attribute length runs past the section
    let truncated = Bytes::from(hex::decode("00000004400304c0").unwrap());
    assert!(parse_bgp_message_body(2, truncated)
        .unwrap_err()
        .is_truncated());

    let mut bad_marker = message("001304").to_vec();
    bad_marker[3] = 0;
    let err = parse_bgp_message(&mut Bytes::from(bad_marker)).unwrap_err();
    assert!(!err.is_truncated());
    assert!(matches!(err, rtkit::ParserError::Malformed(_)));
}

#[test]
fn test_prefix_padding_bits_survive() {
    // 10.16.0.0/12 written with garbage in the low four bits
    let data = Bytes::from_static(&[12, 0x0a, 0x1f]);
    let prefixes = parse_prefix_list(data.clone()).unwrap();
    assert_eq!(prefixes[0].octets.len(), 2);
    assert_eq!(prefixes[0].encode(), data);
    assert_eq!(
        prefixes[0],
        Prefix::from_ipv4(Ipv4Addr::new(10, 16, 0, 0), 12).unwrap()
    );
}

#[test]
fn test_notification_description() {
    let raw = message("0015030602");
    let msg = parse_bgp_message(&mut raw.clone()).unwrap();
    let BgpMessage::Notification(n) = &msg else {
        panic!("expected NOTIFICATION, got {:?}", msg);
    };
    assert_eq!(
        n.description().unwrap(),
        ("cease", Some("administrative shutdown"))
    );
    assert_eq!(msg.encode(), raw);
}

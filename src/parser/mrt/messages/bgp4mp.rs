use crate::error::*;
use crate::models::*;
use crate::parser::bgp::parse_bgp_message;
use crate::parser::ReadUtils;
use bytes::{BufMut, Bytes, BytesMut};
use log::warn;
use std::net::IpAddr;

/// Parse MRT BGP4MP type
///
/// RFC: <https://www.rfc-editor.org/rfc/rfc6396#section-4.4>
///
/// Only the subtypes with 2-byte AS numbers are decoded: STATE_CHANGE, MESSAGE and
/// MESSAGE_LOCAL. The AS4 variants are reported as [ParserError::Unsupported].
pub fn parse_bgp4mp(sub_type: u16, input: Bytes) -> Result<Bgp4Mp, ParserError> {
    let bgp4mp_type = Bgp4MpType::from(sub_type);
    let msg: Bgp4Mp = match bgp4mp_type {
        Bgp4MpType::StateChange => Bgp4Mp::StateChange(parse_bgp4mp_state_change(input)?),
        Bgp4MpType::Message | Bgp4MpType::MessageLocal => {
            Bgp4Mp::Message(parse_bgp4mp_message(bgp4mp_type, input)?)
        }
        _ => {
            return Err(ParserError::Unsupported(format!(
                "BGP4MP subtype {:?}",
                bgp4mp_type
            )))
        }
    };
    Ok(msg)
}

fn read_afi_address(data: &mut Bytes, afi: Afi) -> Result<IpAddr, ParserError> {
    match afi {
        Afi::Ipv4 => data.read_ipv4_address().map(IpAddr::V4),
        Afi::Ipv6 => data.read_ipv6_address().map(IpAddr::V6),
    }
}

fn put_address(bytes: &mut BytesMut, addr: &IpAddr) {
    match addr {
        IpAddr::V4(a) => bytes.put_slice(&a.octets()),
        IpAddr::V6(a) => bytes.put_slice(&a.octets()),
    }
}

/// The common `{peer_as, local_as, ifindex, afi, peer_ip, local_ip}` prefix.
fn parse_peer_header(
    data: &mut Bytes,
) -> Result<(u16, u16, u16, IpAddr, IpAddr), ParserError> {
    let peer_asn = data.read_u16()?;
    let local_asn = data.read_u16()?;
    let interface_index = data.read_u16()?;
    let afi = Afi::try_from(data.read_u16()?)?;
    let peer_ip = read_afi_address(data, afi)?;
    let local_ip = read_afi_address(data, afi)?;
    Ok((peer_asn, local_asn, interface_index, peer_ip, local_ip))
}

fn put_peer_header(
    bytes: &mut BytesMut,
    peer_asn: u16,
    local_asn: u16,
    interface_index: u16,
    peer_ip: &IpAddr,
    local_ip: &IpAddr,
) {
    bytes.put_u16(peer_asn);
    bytes.put_u16(local_asn);
    bytes.put_u16(interface_index);
    bytes.put_u16(Afi::from(*peer_ip).into());
    put_address(bytes, peer_ip);
    put_address(bytes, local_ip);
}

/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |         Peer AS Number        |        Local AS Number        |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |        Interface Index        |        Address Family         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                      Peer IP Address (variable)               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                      Local IP Address (variable)              |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                    BGP Message... (variable)
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
pub fn parse_bgp4mp_message(
    msg_type: Bgp4MpType,
    mut data: Bytes,
) -> Result<Bgp4MpMessage, ParserError> {
    let (peer_asn, local_asn, interface_index, peer_ip, local_ip) =
        parse_peer_header(&mut data)?;
    let bgp_message = parse_bgp_message(&mut data)?;
    if !data.is_empty() {
        warn!("{} bytes left after BGP4MP message", data.len());
    }

    Ok(Bgp4MpMessage {
        msg_type,
        peer_asn,
        local_asn,
        interface_index,
        peer_ip,
        local_ip,
        bgp_message,
    })
}

/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |         Peer AS Number        |        Local AS Number        |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |        Interface Index        |        Address Family         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                      Peer IP Address (variable)               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                      Local IP Address (variable)              |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |            Old State          |          New State            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
pub fn parse_bgp4mp_state_change(mut input: Bytes) -> Result<Bgp4MpStateChange, ParserError> {
    let (peer_asn, local_asn, interface_index, peer_addr, local_addr) =
        parse_peer_header(&mut input)?;
    let old_state = BgpState::from(input.read_u16()?);
    let new_state = BgpState::from(input.read_u16()?);
    Ok(Bgp4MpStateChange {
        msg_type: Bgp4MpType::StateChange,
        peer_asn,
        local_asn,
        interface_index,
        peer_addr,
        local_addr,
        old_state,
        new_state,
    })
}

impl Bgp4Mp {
    pub fn encode(&self) -> Bytes {
        let mut bytes = BytesMut::new();
        match self {
            Bgp4Mp::StateChange(msg) => {
                put_peer_header(
                    &mut bytes,
                    msg.peer_asn,
                    msg.local_asn,
                    msg.interface_index,
                    &msg.peer_addr,
                    &msg.local_addr,
                );
                bytes.put_u16(msg.old_state.into());
                bytes.put_u16(msg.new_state.into());
            }
            Bgp4Mp::Message(msg) => {
                put_peer_header(
                    &mut bytes,
                    msg.peer_asn,
                    msg.local_asn,
                    msg.interface_index,
                    &msg.peer_ip,
                    &msg.local_ip,
                );
                bytes.put_slice(&msg.bgp_message.encode());
            }
        }
        bytes.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_parse_bgp4mp_keepalive_message() {
        let mut bytes = BytesMut::new();
        bytes.put_slice(&[0xfd, 0xe9, 0xfd, 0xea, 0, 3, 0, 1]);
        bytes.put_slice(&[10, 0, 0, 1, 10, 0, 0, 2]);
        bytes.put_slice(&BgpMessage::keepalive().encode());
        let bytes = bytes.freeze();

        let msg = parse_bgp4mp(1, bytes.clone()).unwrap();
        match &msg {
            Bgp4Mp::Message(m) => {
                assert_eq!(m.peer_asn, 65001);
                assert_eq!(m.interface_index, 3);
                assert_eq!(m.local_ip, IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2)));
                assert_eq!(m.bgp_message, BgpMessage::KeepAlive);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(msg.msg_type(), Bgp4MpType::Message);
        assert_eq!(msg.encode(), bytes);
    }

    #[test]
    fn test_parse_bgp4mp_state_change() {
        let raw: &[u8] = &[
            0, 1, 0, 2, 0, 0, 0, 1, 10, 0, 0, 1, 10, 0, 0, 2, 0, 3, 0, 1,
        ];
        let msg = parse_bgp4mp(0, Bytes::copy_from_slice(raw)).unwrap();
        match &msg {
            Bgp4Mp::StateChange(s) => {
                assert_eq!(s.old_state, BgpState::Active);
                assert_eq!(s.new_state, BgpState::Idle);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(msg.encode().as_ref(), raw);
    }

    #[test]
    fn test_as4_subtypes_unsupported() {
        for subtype in [4u16, 5, 7, 9] {
            assert!(matches!(
                parse_bgp4mp(subtype, Bytes::new()).unwrap_err(),
                ParserError::Unsupported(_)
            ));
        }
    }

    #[test]
    fn test_bad_afi() {
        let raw = Bytes::from_static(&[0, 1, 0, 2, 0, 0, 0, 9, 10, 0, 0, 1]);
        assert!(matches!(
            parse_bgp4mp(0, raw).unwrap_err(),
            ParserError::UnrecognizedEnumVariant { .. }
        ));
    }
}

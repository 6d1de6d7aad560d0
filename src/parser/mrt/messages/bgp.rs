use crate::error::*;
use crate::models::*;
use crate::parser::bgp::parse_bgp_message_body;
use crate::parser::ReadUtils;
use bytes::{BufMut, Bytes, BytesMut};
use log::warn;

/// Parse a record of the deprecated MRT `BGP` type.
///
/// Message subtypes store the BGP body without its marker and 19-byte header; the BGP
/// message type is implied by the subtype.
pub fn parse_mrt_bgp(sub_type: u16, mut data: Bytes) -> Result<MrtBgpMessage, ParserError> {
    let subtype = MrtBgpType::from(sub_type);

    if let Some(bgp_type) = subtype.bgp_message_type() {
        let peer_as = data.read_u16()?;
        let peer_ip = data.read_ipv4_address()?;
        let local_as = data.read_u16()?;
        let local_ip = data.read_ipv4_address()?;
        let message = parse_bgp_message_body(bgp_type.into(), data)?;
        return Ok(MrtBgpMessage::Message {
            subtype,
            peer_as,
            peer_ip,
            local_as,
            local_ip,
            message,
        });
    }

    match subtype {
        MrtBgpType::STATE_CHANGE => {
            let peer_as = data.read_u16()?;
            let peer_ip = data.read_ipv4_address()?;
            let old_state = BgpState::from(data.read_u16()?);
            let new_state = BgpState::from(data.read_u16()?);
            if !data.is_empty() {
                warn!("{} bytes left after BGP STATE_CHANGE", data.len());
            }
            Ok(MrtBgpMessage::StateChange {
                peer_as,
                peer_ip,
                old_state,
                new_state,
            })
        }
        MrtBgpType::NULL | MrtBgpType::PREF_UPDATE | MrtBgpType::SYNC => {
            Ok(MrtBgpMessage::Raw { subtype, data })
        }
        _ => Err(ParserError::Unsupported(format!(
            "BGP record subtype {}",
            sub_type
        ))),
    }
}

impl MrtBgpMessage {
    /// Record subtype this body is written under.
    pub fn subtype(&self) -> MrtBgpType {
        match self {
            MrtBgpMessage::Message { subtype, .. } | MrtBgpMessage::Raw { subtype, .. } => {
                *subtype
            }
            MrtBgpMessage::StateChange { .. } => MrtBgpType::STATE_CHANGE,
        }
    }

    pub fn encode(&self) -> Bytes {
        let mut bytes = BytesMut::new();
        match self {
            MrtBgpMessage::Message {
                peer_as,
                peer_ip,
                local_as,
                local_ip,
                message,
                ..
            } => {
                bytes.put_u16(*peer_as);
                bytes.put_slice(&peer_ip.octets());
                bytes.put_u16(*local_as);
                bytes.put_slice(&local_ip.octets());
                bytes.put_slice(&message.encode_body());
            }
            MrtBgpMessage::StateChange {
                peer_as,
                peer_ip,
                old_state,
                new_state,
            } => {
                bytes.put_u16(*peer_as);
                bytes.put_slice(&peer_ip.octets());
                bytes.put_u16((*old_state).into());
                bytes.put_u16((*new_state).into());
            }
            MrtBgpMessage::Raw { data, .. } => bytes.put_slice(data),
        }
        bytes.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_parse_bgp_update_subtype() {
        let body: &[u8] = &[
            0xfd, 0xe9, 192, 0, 2, 1, // peer
            0xfd, 0xea, 192, 0, 2, 2, // local
            0, 0, // withdrawn length
            0, 4, 0x40, 1, 1, 0, // ORIGIN IGP
            24, 10, 1, 2, // 10.1.2.0/24
        ];
        let msg = parse_mrt_bgp(1, Bytes::copy_from_slice(body)).unwrap();
        match &msg {
            MrtBgpMessage::Message {
                subtype,
                peer_as,
                local_ip,
                message: BgpMessage::Update(update),
                ..
            } => {
                assert_eq!(*subtype, MrtBgpType::UPDATE);
                assert_eq!(*peer_as, 65001);
                assert_eq!(*local_ip, Ipv4Addr::new(192, 0, 2, 2));
                assert_eq!(update.announced_prefixes.len(), 1);
                assert_eq!(update.attributes.origin(), Some(Origin::IGP));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(msg.encode().as_ref(), body);
    }

    #[test]
    fn test_parse_state_change() {
        let body: &[u8] = &[0, 1, 10, 0, 0, 1, 0, 1, 0, 6];
        let msg = parse_mrt_bgp(3, Bytes::copy_from_slice(body)).unwrap();
        assert_eq!(
            msg,
            MrtBgpMessage::StateChange {
                peer_as: 1,
                peer_ip: Ipv4Addr::new(10, 0, 0, 1),
                old_state: BgpState::Idle,
                new_state: BgpState::Established,
            }
        );
        assert_eq!(msg.subtype(), MrtBgpType::STATE_CHANGE);
        assert_eq!(msg.encode().as_ref(), body);
    }

    #[test]
    fn test_raw_and_unsupported_subtypes() {
        let msg = parse_mrt_bgp(4, Bytes::from_static(&[1, 2, 3])).unwrap();
        assert_eq!(msg.subtype(), MrtBgpType::SYNC);
        assert_eq!(msg.encode().as_ref(), &[1, 2, 3]);
        assert!(matches!(
            parse_mrt_bgp(42, Bytes::new()).unwrap_err(),
            ParserError::Unsupported(_)
        ));
    }
}

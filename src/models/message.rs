//! One tagged result type for every protocol.
use crate::models::*;
use bytes::Bytes;

/// Protocol of a decoded [Message].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Protocol {
    Bgp,
    Isis,
    Ospf,
}

/// A decoded message of any supported protocol.
///
/// Consumers that only forward or re-encode messages can work on this type and never look
/// inside the protocol bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Message {
    Bgp(BgpMessage),
    Isis(IsisPdu),
    IsisFrame(IsisFrame),
    Ospf(OspfPacket),
    OspfIp(OspfIpPacket),
}

impl Message {
    pub fn protocol(&self) -> Protocol {
        match self {
            Message::Bgp(_) => Protocol::Bgp,
            Message::Isis(_) | Message::IsisFrame(_) => Protocol::Isis,
            Message::Ospf(_) | Message::OspfIp(_) => Protocol::Ospf,
        }
    }

    /// Protocol-level message type code: the BGP message type, the IS-IS PDU type or the
    /// OSPF packet type.
    pub fn type_code(&self) -> u8 {
        match self {
            Message::Bgp(m) => m.msg_type(),
            Message::Isis(pdu) => pdu.header.pdu_type.into(),
            Message::IsisFrame(frame) => frame.pdu.header.pdu_type.into(),
            Message::Ospf(p) => p.header.packet_type.into(),
            Message::OspfIp(p) => p.ospf.header.packet_type.into(),
        }
    }

    pub fn encode(&self) -> Bytes {
        match self {
            Message::Bgp(m) => m.encode(),
            Message::Isis(pdu) => pdu.encode(),
            Message::IsisFrame(frame) => frame.encode(),
            Message::Ospf(p) => p.encode(),
            Message::OspfIp(p) => p.encode(),
        }
    }

    /// Length of the encoded message.
    pub fn encoded_len(&self) -> usize {
        self.encode().len()
    }
}

impl From<BgpMessage> for Message {
    fn from(value: BgpMessage) -> Self {
        Message::Bgp(value)
    }
}

impl From<IsisPdu> for Message {
    fn from(value: IsisPdu) -> Self {
        Message::Isis(value)
    }
}

impl From<IsisFrame> for Message {
    fn from(value: IsisFrame) -> Self {
        Message::IsisFrame(value)
    }
}

impl From<OspfPacket> for Message {
    fn from(value: OspfPacket) -> Self {
        Message::Ospf(value)
    }
}

impl From<OspfIpPacket> for Message {
    fn from(value: OspfIpPacket) -> Self {
        Message::OspfIp(value)
    }
}

impl MrtMessage {
    /// The protocol message inside an MRT body, if the body carries one.
    pub fn protocol_message(&self) -> Option<Message> {
        match self {
            MrtMessage::Ospf(m) => Some(Message::Ospf(m.packet.clone())),
            MrtMessage::Bgp(MrtBgpMessage::Message { message, .. }) => {
                Some(Message::Bgp(message.clone()))
            }
            MrtMessage::Bgp4Mp(Bgp4Mp::Message(m)) => Some(Message::Bgp(m.bgp_message.clone())),
            MrtMessage::Isis(MrtIsisMessage::Pdu(pdu)) => Some(Message::Isis(pdu.clone())),
            MrtMessage::Isis(MrtIsisMessage::Frame(f)) => Some(Message::IsisFrame(f.clone())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_message_tags() {
        let msg = Message::from(BgpMessage::open(65001, 180, Ipv4Addr::new(10, 0, 0, 1)));
        assert_eq!(msg.protocol(), Protocol::Bgp);
        assert_eq!(msg.type_code(), 1);
        assert_eq!(msg.encoded_len(), 29);
    }

    #[test]
    fn test_protocol_message_of_mrt_body() {
        let body = MrtMessage::Bgp4Mp(Bgp4Mp::Message(Bgp4MpMessage {
            msg_type: Bgp4MpType::Message,
            peer_asn: 1,
            local_asn: 2,
            interface_index: 0,
            peer_ip: Ipv4Addr::new(10, 0, 0, 1).into(),
            local_ip: Ipv4Addr::new(10, 0, 0, 2).into(),
            bgp_message: BgpMessage::keepalive(),
        }));
        assert_eq!(
            body.protocol_message(),
            Some(Message::Bgp(BgpMessage::KeepAlive))
        );

        let state = MrtMessage::Bgp(MrtBgpMessage::StateChange {
            peer_as: 1,
            peer_ip: Ipv4Addr::new(10, 0, 0, 1),
            old_state: BgpState::Idle,
            new_state: BgpState::Idle,
        });
        assert!(state.protocol_message().is_none());
    }
}

//! Structs of the deprecated MRT `BGP` type (5), still produced by old collectors.
use crate::models::*;
use num_enum::{FromPrimitive, IntoPrimitive};
use std::net::Ipv4Addr;

/// Subtypes of the deprecated `BGP` record type.
#[derive(Debug, FromPrimitive, IntoPrimitive, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(non_camel_case_types)]
#[repr(u16)]
pub enum MrtBgpType {
    NULL = 0,
    UPDATE = 1,
    PREF_UPDATE = 2,
    STATE_CHANGE = 3,
    SYNC = 4,
    OPEN = 5,
    NOTIFY = 6,
    KEEPALIVE = 7,
    #[num_enum(catch_all)]
    Unknown(u16),
}

impl MrtBgpType {
    /// BGP message type carried by a message subtype, `None` for the others.
    pub fn bgp_message_type(&self) -> Option<BgpMessageType> {
        match self {
            MrtBgpType::UPDATE => Some(BgpMessageType::UPDATE),
            MrtBgpType::OPEN => Some(BgpMessageType::OPEN),
            MrtBgpType::NOTIFY => Some(BgpMessageType::NOTIFICATION),
            MrtBgpType::KEEPALIVE => Some(BgpMessageType::KEEPALIVE),
            _ => None,
        }
    }
}

/// Body of a `BGP` record.
///
/// ```text
/// UPDATE, OPEN, NOTIFY, KEEPALIVE:
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |        Peer AS number         |        Peer IP address        |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |        Peer IP address        |        Local AS number        |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                       Local IP address                        |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                BGP message body, no 19-byte header            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///
/// STATE_CHANGE:
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |        Peer AS number         |        Peer IP address        |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |        Peer IP address        |          Old State            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |          New State            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MrtBgpMessage {
    Message {
        subtype: MrtBgpType,
        peer_as: u16,
        peer_ip: Ipv4Addr,
        local_as: u16,
        local_ip: Ipv4Addr,
        message: BgpMessage,
    },
    StateChange {
        peer_as: u16,
        peer_ip: Ipv4Addr,
        old_state: BgpState,
        new_state: BgpState,
    },
    /// NULL, PREF_UPDATE and SYNC carry no decodable structure; their bytes are kept.
    Raw { subtype: MrtBgpType, data: bytes::Bytes },
}

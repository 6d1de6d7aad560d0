//! BGP messages and relevant structs.

pub mod attributes;
pub mod capabilities;
pub mod error;

pub use attributes::*;
pub use capabilities::*;
pub use error::*;

use crate::models::network::*;
use bytes::Bytes;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::net::Ipv4Addr;

/// Length of the fixed BGP header: 16-byte marker, 2-byte length, 1-byte type.
pub const BGP_HEADER_LEN: usize = 19;
pub const BGP_MARKER_LEN: usize = 16;
pub const BGP_MAX_MESSAGE_LEN: usize = 4096;
pub const BGP_MARKER: [u8; BGP_MARKER_LEN] = [0xff; BGP_MARKER_LEN];

#[allow(non_camel_case_types)]
#[derive(Debug, TryFromPrimitive, IntoPrimitive, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum BgpMessageType {
    OPEN = 1,
    UPDATE = 2,
    NOTIFICATION = 3,
    KEEPALIVE = 4,
    /// <https://datatracker.ietf.org/doc/html/rfc2918>
    ROUTE_REFRESH = 5,
}

// https://tools.ietf.org/html/rfc4271#section-4
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BgpMessage {
    Open(BgpOpenMessage),
    Update(BgpUpdateMessage),
    Notification(BgpNotificationMessage),
    KeepAlive,
    /// Route refresh body is not decoded; any bytes present are kept for re-encoding.
    RouteRefresh(Bytes),
    /// A message type outside 1-5, kept raw.
    Unknown { msg_type: u8, data: Bytes },
}

impl BgpMessage {
    /// OPEN message with no optional parameters.
    pub fn open(asn: u16, hold_time: u16, bgp_identifier: Ipv4Addr) -> BgpMessage {
        BgpMessage::Open(BgpOpenMessage {
            version: 4,
            asn,
            hold_time,
            bgp_identifier,
            opt_params: vec![],
        })
    }

    pub fn keepalive() -> BgpMessage {
        BgpMessage::KeepAlive
    }

    /// The wire type code of this message.
    pub fn msg_type(&self) -> u8 {
        match self {
            BgpMessage::Open(_) => BgpMessageType::OPEN.into(),
            BgpMessage::Update(_) => BgpMessageType::UPDATE.into(),
            BgpMessage::Notification(_) => BgpMessageType::NOTIFICATION.into(),
            BgpMessage::KeepAlive => BgpMessageType::KEEPALIVE.into(),
            BgpMessage::RouteRefresh(_) => BgpMessageType::ROUTE_REFRESH.into(),
            BgpMessage::Unknown { msg_type, .. } => *msg_type,
        }
    }
}

/// BGP Open Message
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
///  +-+-+-+-+-+-+-+-+
///  |    Version    |
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///  |     My Autonomous System      |
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///  |           Hold Time           |
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///  |                         BGP Identifier                        |
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///  | Opt Parm Len  |
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///  |                                                               |
///  |             Optional Parameters (variable)                    |
///  |                                                               |
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BgpOpenMessage {
    pub version: u8,
    pub asn: u16,
    pub hold_time: u16,
    pub bgp_identifier: Ipv4Addr,
    pub opt_params: Vec<OptParam>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptParam {
    pub param_type: OptParamType,
    pub param_value: ParamValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParamValue {
    /// Value of a non-capability parameter, kept as read.
    Raw(Bytes),
    /// A CAPABILITY parameter may carry several capabilities back to back (RFC 5492).
    Capabilities(Vec<Capability>),
}

/// BGP Update Message
///
/// ```text
/// +-----------------------------------------------------+
/// |   Withdrawn Routes Length (2 octets)                |
/// +-----------------------------------------------------+
/// |   Withdrawn Routes (variable)                       |
/// +-----------------------------------------------------+
/// |   Total Path Attribute Length (2 octets)            |
/// +-----------------------------------------------------+
/// |   Path Attributes (variable)                        |
/// +-----------------------------------------------------+
/// |   Network Layer Reachability Information (variable) |
/// +-----------------------------------------------------+
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BgpUpdateMessage {
    pub withdrawn_prefixes: Vec<Prefix>,
    pub attributes: Attributes,
    pub announced_prefixes: Vec<Prefix>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BgpNotificationMessage {
    pub error_code: u8,
    pub error_subcode: u8,
    pub data: Bytes,
}

impl BgpNotificationMessage {
    /// Human-readable `(code, subcode)` descriptions, see [notification_description].
    pub fn description(
        &self,
    ) -> Result<(&'static str, Option<&'static str>), crate::ParserError> {
        notification_description(self.error_code, self.error_subcode)
    }
}

/// Session progress from the point of view of a passive collector.
///
/// The collector sends an OPEN, waits for the peer's OPEN, sends a KEEPALIVE and then reads
/// messages forever. Driving the socket is up to the caller; this only tracks where the
/// exchange is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BgpSessionState {
    SendOpen,
    AwaitOpenReply,
    SendKeepalive,
    Established,
}

impl BgpSessionState {
    /// The state after our OPEN or KEEPALIVE has been sent.
    pub fn on_sent(self) -> BgpSessionState {
        match self {
            BgpSessionState::SendOpen => BgpSessionState::AwaitOpenReply,
            BgpSessionState::SendKeepalive => BgpSessionState::Established,
            other => other,
        }
    }

    /// The state after a message from the peer has been decoded.
    ///
    /// A NOTIFICATION at any point sends the session back to the start.
    pub fn on_received(self, msg: &BgpMessage) -> BgpSessionState {
        match (self, msg) {
            (_, BgpMessage::Notification(_)) => BgpSessionState::SendOpen,
            (BgpSessionState::AwaitOpenReply, BgpMessage::Open(_)) => {
                BgpSessionState::SendKeepalive
            }
            (state, _) => state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_progression() {
        let open = BgpMessage::open(65001, 180, Ipv4Addr::new(10, 0, 0, 1));
        let mut state = BgpSessionState::SendOpen;
        state = state.on_sent();
        assert_eq!(state, BgpSessionState::AwaitOpenReply);
        state = state.on_received(&BgpMessage::keepalive());
        assert_eq!(state, BgpSessionState::AwaitOpenReply);
        state = state.on_received(&open);
        assert_eq!(state, BgpSessionState::SendKeepalive);
        state = state.on_sent();
        assert_eq!(state, BgpSessionState::Established);
        state = state.on_received(&open);
        assert_eq!(state, BgpSessionState::Established);

        let notification = BgpMessage::Notification(BgpNotificationMessage {
            error_code: 6,
            error_subcode: 2,
            data: Bytes::new(),
        });
        assert_eq!(
            state.on_received(&notification),
            BgpSessionState::SendOpen
        );
    }

    #[test]
    fn test_msg_type_codes() {
        assert_eq!(BgpMessage::keepalive().msg_type(), 4);
        assert_eq!(BgpMessage::RouteRefresh(Bytes::new()).msg_type(), 5);
        assert_eq!(
            BgpMessage::Unknown {
                msg_type: 9,
                data: Bytes::new()
            }
            .msg_type(),
            9
        );
    }
}

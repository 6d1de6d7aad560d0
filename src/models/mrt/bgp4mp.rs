//! MRT BGP4MP structs
use crate::models::*;
use num_enum::{FromPrimitive, IntoPrimitive};
use std::net::IpAddr;

/// BGP finite state machine states as recorded by state-change records.
#[derive(Debug, FromPrimitive, IntoPrimitive, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum BgpState {
    Idle = 1,
    Connect = 2,
    Active = 3,
    OpenSent = 4,
    OpenConfirm = 5,
    Established = 6,
    #[num_enum(catch_all)]
    Unknown(u16),
}

/// BGP4MP subtypes.
///
/// Only the 2-byte ASN subtypes have decoders; the AS4 and add-path variants are named so
/// they print sensibly but are reported as unsupported.
///
/// <https://www.iana.org/assignments/mrt/mrt.xhtml#BGP4MP-codes>
#[derive(Debug, FromPrimitive, IntoPrimitive, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum Bgp4MpType {
    StateChange = 0,
    Message = 1,
    MessageAs4 = 4,
    StateChangeAs4 = 5,
    MessageLocal = 6,
    MessageAs4Local = 7,
    #[num_enum(catch_all)]
    Unknown(u16),
}

/// BGP4MP record body.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Bgp4Mp {
    StateChange(Bgp4MpStateChange),
    Message(Bgp4MpMessage),
}

impl Bgp4Mp {
    pub fn msg_type(&self) -> Bgp4MpType {
        match self {
            Bgp4Mp::StateChange(m) => m.msg_type,
            Bgp4Mp::Message(m) => m.msg_type,
        }
    }
}

/// BGP4MP state change message.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bgp4MpStateChange {
    pub msg_type: Bgp4MpType,
    pub peer_asn: u16,
    pub local_asn: u16,
    pub interface_index: u16,
    pub peer_addr: IpAddr,
    pub local_addr: IpAddr,
    pub old_state: BgpState,
    pub new_state: BgpState,
}

/// BGP4MP message, carrying a complete marker-framed BGP message.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bgp4MpMessage {
    pub msg_type: Bgp4MpType,
    pub peer_asn: u16,
    pub local_asn: u16,
    pub interface_index: u16,
    pub peer_ip: IpAddr,
    pub local_ip: IpAddr,
    pub bgp_message: BgpMessage,
}

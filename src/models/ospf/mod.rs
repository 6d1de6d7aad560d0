//! OSPFv2 packets, RFC 2328.
mod lsa;

pub use lsa::*;

use bitflags::bitflags;
use bytes::Bytes;
use num_enum::{FromPrimitive, IntoPrimitive};
use std::net::Ipv4Addr;

/// IP protocol number of OSPF.
pub const IPPROTO_OSPF: u8 = 89;
pub const IPV4_HEADER_LEN: usize = 20;
pub const OSPF_HEADER_LEN: usize = 24;
pub const OSPF_HELLO_LEN: usize = 20;
pub const OSPF_DBDESC_LEN: usize = 8;
pub const OSPF_LSREQ_LEN: usize = 12;

pub const ALL_SPF_ROUTERS: Ipv4Addr = Ipv4Addr::new(224, 0, 0, 5);
pub const ALL_D_ROUTERS: Ipv4Addr = Ipv4Addr::new(224, 0, 0, 6);

#[derive(Debug, FromPrimitive, IntoPrimitive, PartialEq, Eq, Hash, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum OspfPacketType {
    Hello = 1,
    DbDescription = 2,
    LsRequest = 3,
    LsUpdate = 4,
    LsAck = 5,
    #[num_enum(catch_all)]
    Unknown(u8),
}

#[derive(Debug, FromPrimitive, IntoPrimitive, PartialEq, Eq, Hash, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum OspfAuthType {
    Null = 0,
    Password = 1,
    Cryptographic = 2,
    #[num_enum(catch_all)]
    Unknown(u16),
}

bitflags! {
    /// OSPF options octet. Bit 0 was the TOS bit of RFC 2328 and is reused as Q (RFC 2676).
    #[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct OspfOptions: u8 {
        const Q  = 0x01;
        const E  = 0x02;
        const MC = 0x04;
        const NP = 0x08;
        const EA = 0x10;
        const DC = 0x20;
        const O  = 0x40;
    }
}

bitflags! {
    /// Database description flags.
    #[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct DdFlags: u8 {
        const INIT   = 0x04;
        const MORE   = 0x02;
        const MASTER = 0x01;
    }
}

/// IPv4 header, options kept as read.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ipv4Header {
    pub version: u8,
    /// Header length in 32-bit words.
    pub ihl: u8,
    pub tos: u8,
    pub total_length: u16,
    pub identification: u16,
    pub fragment: u16,
    pub ttl: u8,
    pub protocol: u8,
    pub checksum: u16,
    pub src: Ipv4Addr,
    pub dst: Ipv4Addr,
    pub options: Bytes,
}

/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |   Version #   |     Type      |         Packet length         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                          Router ID                            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                           Area ID                             |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |           Checksum            |             AuType            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                       Authentication                          |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                       Authentication                          |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OspfHeader {
    pub version: u8,
    pub packet_type: OspfPacketType,
    pub length: u16,
    pub router_id: Ipv4Addr,
    pub area_id: Ipv4Addr,
    pub checksum: u16,
    pub auth_type: OspfAuthType,
    pub auth: [u8; 8],
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OspfHello {
    pub netmask: Ipv4Addr,
    pub hello_interval: u16,
    pub options: OspfOptions,
    pub priority: u8,
    pub dead_interval: u32,
    pub designated_router: Ipv4Addr,
    pub backup_designated_router: Ipv4Addr,
    pub neighbors: Vec<Ipv4Addr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OspfDbDescription {
    pub mtu: u16,
    pub options: OspfOptions,
    pub flags: DdFlags,
    pub dd_sequence: u32,
    pub lsa_headers: Vec<LsaHeader>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LsRequest {
    pub ls_type: u32,
    pub link_state_id: Ipv4Addr,
    pub advertising_router: Ipv4Addr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OspfBody {
    Hello(OspfHello),
    DbDescription(OspfDbDescription),
    LsRequest(Vec<LsRequest>),
    /// The LSA count is implied by the vector on encode.
    LsUpdate(Vec<Lsa>),
    LsAck(Vec<LsaHeader>),
    Unknown(Bytes),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OspfPacket {
    pub header: OspfHeader,
    pub body: OspfBody,
}

/// An OSPF packet together with the IP header it arrived in.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OspfIpPacket {
    pub ip: Ipv4Header,
    pub ospf: OspfPacket,
}

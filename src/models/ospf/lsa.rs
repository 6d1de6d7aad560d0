use bitflags::bitflags;
use bytes::Bytes;
use num_enum::{FromPrimitive, IntoPrimitive};
use std::net::Ipv4Addr;

use crate::models::ospf::OspfOptions;

pub const LSA_HEADER_LEN: usize = 20;
pub const LS_INFINITY: u32 = 0xffff;
/// RFC 3137: a summary metric of 0xffffff marks a stub router that should not be transited.
pub const LS_STUB_RTR: u32 = 0xff_ffff;

#[derive(Debug, FromPrimitive, IntoPrimitive, PartialEq, Eq, Hash, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum LsaType {
    Router = 1,
    Network = 2,
    SummaryIp = 3,
    SummaryAsbr = 4,
    AsExternal = 5,
    Mospf = 6,
    Nssa = 7,
    OpaqueLinkLocal = 9,
    OpaqueAreaLocal = 10,
    OpaqueAsLocal = 11,
    #[num_enum(catch_all)]
    Unknown(u8),
}

/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |            LS age             |    Options    |    LS type    |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                        Link State ID                          |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                     Advertising Router                        |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                     LS sequence number                        |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |         LS checksum           |             length            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// `length` covers the header itself.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LsaHeader {
    pub age: u16,
    pub options: OspfOptions,
    pub ls_type: LsaType,
    pub link_state_id: Ipv4Addr,
    pub advertising_router: Ipv4Addr,
    pub sequence_number: u32,
    pub checksum: u16,
    pub length: u16,
}

bitflags! {
    #[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct RouterLsaFlags: u8 {
        const VIRTUAL  = 0x01;
        const EXTERNAL = 0x02;
        const BORDER   = 0x04;
    }
}

#[derive(Debug, FromPrimitive, IntoPrimitive, PartialEq, Eq, Hash, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum RouterLinkType {
    PointToPoint = 1,
    Transit = 2,
    Stub = 3,
    Virtual = 4,
    #[num_enum(catch_all)]
    Unknown(u8),
}

/// A 24-bit OSPF metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OspfMetric(pub u32);

impl OspfMetric {
    pub fn is_stub_router(&self) -> bool {
        self.0 == LS_STUB_RTR
    }

    pub fn is_infinity(&self) -> bool {
        self.0 == LS_INFINITY
    }

    /// Above LSInfinity without being the stub-router sentinel.
    pub fn is_out_of_range(&self) -> bool {
        self.0 > LS_INFINITY && !self.is_stub_router()
    }
}

impl std::fmt::Display for OspfMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_stub_router() {
            write!(f, "STUB_ROUTER")
        } else if self.is_infinity() {
            write!(f, "LS_INFINITY")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TosMetric {
    pub tos: u8,
    pub metric: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouterLink {
    pub link_id: Ipv4Addr,
    pub link_data: Ipv4Addr,
    pub link_type: RouterLinkType,
    pub metric: u16,
    pub tos_metrics: Vec<TosMetric>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouterLsa {
    pub flags: RouterLsaFlags,
    pub links: Vec<RouterLink>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkLsa {
    pub netmask: Ipv4Addr,
    pub attached_routers: Vec<Ipv4Addr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SummaryMetric {
    pub tos: u8,
    pub metric: OspfMetric,
}

/// Summary LSA, used for both type 3 (IP network) and type 4 (ASBR).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SummaryLsa {
    pub netmask: Ipv4Addr,
    pub metrics: Vec<SummaryMetric>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExternalMetric {
    /// E bit: the metric is a type 2 external metric.
    pub external_type_2: bool,
    pub tos: u8,
    pub metric: OspfMetric,
    pub forwarding_address: Ipv4Addr,
    pub route_tag: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExternalLsa {
    pub netmask: Ipv4Addr,
    pub metrics: Vec<ExternalMetric>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LsaBody {
    Router(RouterLsa),
    Network(NetworkLsa),
    Summary(SummaryLsa),
    External(ExternalLsa),
    /// Body of an LSA type without a decoder, or a known body that failed to decode. Either
    /// way it is skipped by its declared length.
    Unknown(Bytes),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lsa {
    pub header: LsaHeader,
    pub body: LsaBody,
    /// Bytes inside the declared length that follow the decoded body.
    pub trailing: Bytes,
}

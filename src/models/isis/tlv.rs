use bytes::Bytes;
use num_enum::{FromPrimitive, IntoPrimitive};
use std::net::Ipv4Addr;

use crate::models::isis::LspId;

/// Variable-length field types.
#[allow(non_camel_case_types)]
#[derive(Debug, FromPrimitive, IntoPrimitive, PartialEq, Eq, Hash, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum TlvType {
    NULL = 0,
    AREA_ADDRESSES = 1,
    /// IS neighbours as listed in an LSP.
    LSP_IS_NEIGHBORS = 2,
    ES_NEIGHBORS = 3,
    PARTITION_DIS = 4,
    PREFIX_NEIGHBORS = 5,
    /// IS neighbours as listed in a LAN hello, by MAC.
    IIH_IS_NEIGHBORS = 6,
    PADDING = 8,
    LSP_ENTRIES = 9,
    AUTHENTICATION = 10,
    OPTIONAL_CHECKSUM = 12,
    LSP_BUFFER_SIZE = 14,
    TE_IS_NEIGHBORS = 22,
    IP_INTERNAL_REACH = 128,
    PROTOCOLS_SUPPORTED = 129,
    IP_EXTERNAL_REACH = 130,
    IP_INTER_DOMAIN_INFO = 131,
    IP_INTERFACE_ADDRESSES = 132,
    /// Deprecated, illegal in any PDU.
    IP_AUTH_INFO = 133,
    TE_ROUTER_ID = 134,
    TE_IP_REACH = 135,
    DYNAMIC_HOSTNAME = 137,
    LEAF_NODE = 180,
    MT_IS_NEIGHBORS = 222,
    MULTI_TOPOLOGIES = 229,
    IPV6_INTERFACE_ADDRESSES = 232,
    MT_IP_REACH = 235,
    IPV6_IP_REACH = 236,
    THREE_WAY_HELLO = 240,
    IP_SUMMARY_REACH = 254,
    #[num_enum(catch_all)]
    Unknown(u8),
}

impl TlvType {
    pub fn is_registered(&self) -> bool {
        !matches!(self, TlvType::Unknown(_))
    }
}

/// The four ISO 10589 metric octets. Only the low six bits of each carry the metric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IsisMetrics {
    pub default: u8,
    pub delay: u8,
    pub expense: u8,
    pub error: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IsNeighbor {
    pub metrics: IsisMetrics,
    pub neighbor_id: [u8; 7],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LspEntry {
    pub remaining_lifetime: u16,
    pub lsp_id: LspId,
    pub sequence_number: u32,
    pub checksum: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IpReachability {
    pub metrics: IsisMetrics,
    pub address: Ipv4Addr,
    pub mask: Ipv4Addr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TlvValue {
    /// Each area address carried with its own length octet on the wire.
    AreaAddresses(Vec<Bytes>),
    LspIsNeighbors {
        virtual_flag: u8,
        neighbors: Vec<IsNeighbor>,
    },
    EsNeighbors {
        metrics: IsisMetrics,
        neighbors: Vec<[u8; 6]>,
    },
    IihIsNeighbors(Vec<[u8; 6]>),
    /// Padding octets as received. Senders usually zero them, but not always.
    Padding(Bytes),
    LspEntries(Vec<LspEntry>),
    IpInternalReach(Vec<IpReachability>),
    /// NLPIDs of the protocols this IS can relay.
    ProtocolsSupported(Vec<u8>),
    IpExternalReach(Vec<IpReachability>),
    IpInterDomainInfo(Bytes),
    IpInterfaceAddresses(Vec<Ipv4Addr>),
    DynamicHostname(Bytes),
    /// A registered type without a decoder.
    NotDecoded(Bytes),
    Unknown(Bytes),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tlv {
    pub tlv_type: TlvType,
    pub value: TlvValue,
}

/// The TLV area of a PDU.
///
/// Scanning stops when fewer than two octets are left; such a stray octet (routers have been
/// seen emitting a single null byte) is kept in `trailing` so the PDU re-encodes unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tlvs {
    pub entries: Vec<Tlv>,
    pub trailing: Bytes,
}

impl Tlvs {
    pub fn iter(&self) -> std::slice::Iter<'_, Tlv> {
        self.entries.iter()
    }

    pub fn find(&self, tlv_type: TlvType) -> impl Iterator<Item = &TlvValue> {
        self.entries
            .iter()
            .filter(move |t| t.tlv_type == tlv_type)
            .map(|t| &t.value)
    }

    /// All area addresses listed in any Area Addresses TLV.
    pub fn area_addresses(&self) -> Vec<Bytes> {
        self.find(TlvType::AREA_ADDRESSES)
            .flat_map(|v| match v {
                TlvValue::AreaAddresses(areas) => areas.clone(),
                _ => vec![],
            })
            .collect()
    }

    pub fn hostname(&self) -> Option<String> {
        self.find(TlvType::DYNAMIC_HOSTNAME).find_map(|v| match v {
            TlvValue::DynamicHostname(name) => Some(String::from_utf8_lossy(name).into_owned()),
            _ => None,
        })
    }
}

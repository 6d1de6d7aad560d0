//! MRT TABLE_DUMP structs
use crate::models::*;
use std::net::{IpAddr, Ipv4Addr};

/// TABLE_DUMP subtype selecting the address family of prefix and peer address.
pub const TABLE_DUMP_AFI_IPV4: u16 = 1;
pub const TABLE_DUMP_AFI_IPV6: u16 = 2;

/// Length of the fixed part of an IPv4 TABLE_DUMP body, up to and including the attribute
/// length field.
pub const TABLE_DUMP_IPV4_HEADER_LEN: usize = 22;

/// One RIB entry from a TABLE_DUMP record.
///
/// The prefix is stored as the full-width address from the record, so the bytes written back
/// are the bytes read, host bits included.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableDumpMessage {
    pub view_number: u16,
    pub sequence_number: u16,
    pub prefix: IpAddr,
    pub prefix_len: u8,
    pub status: u8,
    /// Time the route was last changed, in seconds since the epoch.
    pub originated_time: u32,
    pub peer_address: IpAddr,
    pub peer_asn: u16,
    pub attributes: Attributes,
}

impl TableDumpMessage {
    /// Address family of the entry, which is also the record subtype.
    pub fn afi(&self) -> Afi {
        Afi::from(self.prefix)
    }

    /// The entry's prefix in NLRI form, for IPv4 entries.
    pub fn nlri_prefix(&self) -> Option<Prefix> {
        match self.prefix {
            IpAddr::V4(addr) => Prefix::from_ipv4(addr, self.prefix_len).ok(),
            IpAddr::V6(_) => None,
        }
    }

    pub fn peer_ipv4(&self) -> Option<Ipv4Addr> {
        match self.peer_address {
            IpAddr::V4(addr) => Some(addr),
            IpAddr::V6(_) => None,
        }
    }
}

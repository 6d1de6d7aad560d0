//! MRT message and relevant structs.

pub mod bgp;
pub mod bgp4mp;
pub mod table_dump;

pub use bgp::*;
pub use bgp4mp::*;
pub use table_dump::*;

use crate::models::{IsisFrame, IsisPdu, OspfPacket};
use num_enum::{FromPrimitive, IntoPrimitive};
use std::net::Ipv4Addr;

/// Length of the MRT common header without the extended timestamp.
pub const MRT_HEADER_LEN: usize = 12;

/// MrtRecord is a wrapper struct that contains a header and a message.
///
/// A MRT record is constructed as the following:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                      Header... (variable)                     |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                      Message... (variable)
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// See [CommonHeader] for the content in header, and [MrtMessage] for the
/// message format.
#[derive(Debug, PartialEq, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MrtRecord {
    pub common_header: CommonHeader,
    pub message: MrtMessage,
}

/// MRT common header.
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                           Timestamp                           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |             Type              |            Subtype            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                             Length                            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                      Microsecond Timestamp (_ET types only)   |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// `length` is the length of the message that follows. For `_ET` types the on-wire length
/// also counts the 4-byte microsecond field; that adjustment happens on read and write.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommonHeader {
    pub timestamp: u32,
    pub microsecond_timestamp: Option<u32>,
    pub entry_type: EntryType,
    pub entry_subtype: u16,
    pub length: u32,
}

impl CommonHeader {
    /// Header for a record without extended timestamp.
    pub fn new(timestamp: u32, entry_type: EntryType, entry_subtype: u16, length: u32) -> Self {
        CommonHeader {
            timestamp,
            microsecond_timestamp: None,
            entry_type,
            entry_subtype,
            length,
        }
    }
}

/// MRT entry type. Types 0 to 10 are deprecated but still found in old archives; type 5
/// (`BGP`) is the legacy format this crate also writes.
///
/// ```text
///     11   OSPFv2
///     12   TABLE_DUMP
///     13   TABLE_DUMP_V2
///     16   BGP4MP
///     17   BGP4MP_ET
///     32   ISIS
///     33   ISIS_ET
///     48   OSPFv3
///     49   OSPFv3_ET
/// ```
#[derive(Debug, FromPrimitive, IntoPrimitive, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(non_camel_case_types)]
#[repr(u16)]
pub enum EntryType {
    // START DEPRECATED
    NULL = 0,
    START = 1,
    DIE = 2,
    I_AM_DEAD = 3,
    PEER_DOWN = 4,
    BGP = 5,
    RIP = 6,
    IDRP = 7,
    RIPNG = 8,
    BGP4PLUS = 9,
    BGP4PLUS_01 = 10,
    // END DEPRECATED
    OSPFv2 = 11,
    TABLE_DUMP = 12,
    TABLE_DUMP_V2 = 13,
    BGP4MP = 16,
    BGP4MP_ET = 17,
    ISIS = 32,
    ISIS_ET = 33,
    OSPFv3 = 48,
    OSPFv3_ET = 49,
    /// Any type code this crate has no name for. Such records still frame normally.
    #[num_enum(catch_all)]
    Unknown(u16),
}

impl EntryType {
    /// `true` for the `_ET` types whose header carries a microsecond timestamp.
    pub fn has_extended_timestamp(&self) -> bool {
        matches!(
            self,
            EntryType::BGP4MP_ET | EntryType::ISIS_ET | EntryType::OSPFv3_ET
        )
    }
}

/// Decoded MRT record body.
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MrtMessage {
    Ospf(MrtOspfMessage),
    TableDump(TableDumpMessage),
    /// Deprecated `BGP` (type 5) record.
    Bgp(MrtBgpMessage),
    Bgp4Mp(Bgp4Mp),
    Isis(MrtIsisMessage),
}

/// OSPFv2 record body: the addresses of the capturing interface's peer and of the
/// interface itself, followed by the OSPF packet without its IP header.
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MrtOspfMessage {
    pub remote_ip: Ipv4Addr,
    pub local_ip: Ipv4Addr,
    pub packet: OspfPacket,
}

/// ISIS record body. Collectors normally store the bare PDU; a full 802.3 frame is
/// recognised by its LLC signature and kept as such.
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MrtIsisMessage {
    Pdu(IsisPdu),
    Frame(IsisFrame),
}

//! IS-IS frames and PDUs as seen on an 802.3 LAN.
//!
//! ```text
//! +----------------+----------------+-----------+------------------+
//! | 802.3 MAC (14) | LLC fe fe 03   | NLPID 83  | rest of the PDU  |
//! +----------------+----------------+-----------+------------------+
//! ```
mod tlv;

pub use tlv::*;

use bitflags::bitflags;
use bytes::Bytes;
use num_enum::{FromPrimitive, IntoPrimitive, TryFromPrimitive};

/// DSAP, SSAP, control and NLPID that start every IS-IS payload on a LAN.
pub const ISIS_LLC_SIGNATURE: [u8; 4] = [0xfe, 0xfe, 0x03, 0x83];
/// Destination MAC, source MAC and the 802.3 length field.
pub const MAC_HEADER_LEN: usize = 14;
pub const LLC_HEADER_LEN: usize = 3;
/// Fixed part of every IS-IS PDU, NLPID included.
pub const ISIS_HEADER_LEN: usize = 8;
pub const ISIS_HELLO_HEADER_LEN: usize = 19;
pub const ISIS_LSP_HEADER_LEN: usize = 19;
pub const ISIS_CSNP_HEADER_LEN: usize = 25;
pub const ISIS_PSNP_HEADER_LEN: usize = 9;

/// Maximum Ethernet frame, the size hellos are padded to.
pub const MAC_FRAME_LEN: usize = 1514;
/// Value of the 802.3 length field in a full-size frame.
pub const ISIS_PACKET_LEN: u16 = 1500;
pub const ISIS_PDU_LEN: u16 = ISIS_PACKET_LEN - LLC_HEADER_LEN as u16;

pub const NLPID_ISIS: u8 = 0x83;
pub const NLPID_IP: u8 = 0xcc;

pub const ALL_L1_ISS: [u8; 6] = [0x01, 0x80, 0xc2, 0x00, 0x00, 0x14];
pub const ALL_L2_ISS: [u8; 6] = [0x01, 0x80, 0xc2, 0x00, 0x00, 0x15];

#[allow(non_camel_case_types)]
#[derive(Debug, FromPrimitive, IntoPrimitive, PartialEq, Eq, Hash, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum IsisPduType {
    L1_LAN_HELLO = 15,
    L2_LAN_HELLO = 16,
    P2P_HELLO = 17,
    L1_LSP = 18,
    L2_LSP = 20,
    L1_CSNP = 24,
    L2_CSNP = 25,
    L1_PSNP = 26,
    L2_PSNP = 27,
    #[num_enum(catch_all)]
    Unknown(u8),
}

impl IsisPduType {
    /// The level a LAN hello belongs to.
    pub fn hello_level(&self) -> Option<IsisLevel> {
        match self {
            IsisPduType::L1_LAN_HELLO => Some(IsisLevel::L1),
            IsisPduType::L2_LAN_HELLO => Some(IsisLevel::L2),
            _ => None,
        }
    }
}

#[derive(Debug, TryFromPrimitive, IntoPrimitive, PartialEq, Eq, PartialOrd, Ord, Hash, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum IsisLevel {
    L1 = 1,
    L2 = 2,
}

impl IsisLevel {
    pub fn lan_hello_type(&self) -> IsisPduType {
        match self {
            IsisLevel::L1 => IsisPduType::L1_LAN_HELLO,
            IsisLevel::L2 => IsisPduType::L2_LAN_HELLO,
        }
    }

    /// Multicast destination for hellos at this level.
    pub fn all_iss_mac(&self) -> [u8; 6] {
        match self {
            IsisLevel::L1 => ALL_L1_ISS,
            IsisLevel::L2 => ALL_L2_ISS,
        }
    }
}

#[derive(Debug, FromPrimitive, IntoPrimitive, PartialEq, Eq, Hash, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum CircuitType {
    /// A PDU with a reserved circuit type is meant to be ignored.
    Reserved = 0,
    L1 = 1,
    L2 = 2,
    L1L2 = 3,
    #[num_enum(catch_all)]
    Unknown(u8),
}

bitflags! {
    /// The last octet of an LSP header.
    #[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct LspFlags: u8 {
        const PARTITION_REPAIR = 0x80;
        const ATT_ERROR        = 0x40;
        const ATT_EXPENSE      = 0x20;
        const ATT_DELAY        = 0x10;
        const ATT_DEFAULT      = 0x08;
        const OVERLOAD         = 0x04;
        const IS_TYPE_L1       = 0x01;
        const IS_TYPE_L2       = 0x02;
    }
}

/// 802.3 MAC header plus the LLC octets.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MacHeader {
    pub dst_mac: [u8; 6],
    pub src_mac: [u8; 6],
    pub length: u16,
    pub dsap: u8,
    pub ssap: u8,
    pub ctrl: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IsisHeader {
    pub nlpid: u8,
    pub header_len: u8,
    pub version_proto_id: u8,
    pub reserved: u8,
    pub pdu_type: IsisPduType,
    pub version: u8,
    pub eco: u8,
    pub user_eco: u8,
}

/// `system id . pseudonode - fragment`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LspId {
    pub system_id: [u8; 6],
    pub pseudonode: u8,
    pub fragment: u8,
}

impl LspId {
    pub fn to_bytes(&self) -> [u8; 8] {
        let mut out = [0u8; 8];
        out[..6].copy_from_slice(&self.system_id);
        out[6] = self.pseudonode;
        out[7] = self.fragment;
        out
    }
}

impl From<[u8; 8]> for LspId {
    fn from(b: [u8; 8]) -> Self {
        LspId {
            system_id: [b[0], b[1], b[2], b[3], b[4], b[5]],
            pseudonode: b[6],
            fragment: b[7],
        }
    }
}

impl std::fmt::Display for LspId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", crate::parser::sys_id_to_string(&self.to_bytes()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LanHello {
    pub circuit_type: CircuitType,
    pub source_id: [u8; 6],
    pub hold_timer: u16,
    pub pdu_len: u16,
    /// Raw octet; the top bit is reserved, see [LanHello::priority].
    pub priority_byte: u8,
    pub lan_id: [u8; 7],
    pub tlvs: Tlvs,
}

impl LanHello {
    pub fn priority(&self) -> u8 {
        self.priority_byte & 0x7f
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lsp {
    pub pdu_len: u16,
    pub remaining_lifetime: u16,
    pub lsp_id: LspId,
    pub sequence_number: u32,
    pub checksum: u16,
    pub flags: LspFlags,
    pub tlvs: Tlvs,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Csnp {
    pub pdu_len: u16,
    pub source_id: [u8; 7],
    pub start_lsp_id: LspId,
    pub end_lsp_id: LspId,
    pub tlvs: Tlvs,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Psnp {
    pub pdu_len: u16,
    pub source_id: [u8; 7],
    pub tlvs: Tlvs,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IsisPduBody {
    LanHello(LanHello),
    Lsp(Lsp),
    Csnp(Csnp),
    Psnp(Psnp),
    /// Point-to-point hellos and unknown PDU types.
    Raw(Bytes),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IsisPdu {
    pub header: IsisHeader,
    pub body: IsisPduBody,
}

impl IsisPdu {
    pub fn tlvs(&self) -> Option<&Tlvs> {
        match &self.body {
            IsisPduBody::LanHello(h) => Some(&h.tlvs),
            IsisPduBody::Lsp(l) => Some(&l.tlvs),
            IsisPduBody::Csnp(c) => Some(&c.tlvs),
            IsisPduBody::Psnp(p) => Some(&p.tlvs),
            IsisPduBody::Raw(_) => None,
        }
    }

    pub(crate) fn tlvs_mut(&mut self) -> Option<&mut Tlvs> {
        match &mut self.body {
            IsisPduBody::LanHello(h) => Some(&mut h.tlvs),
            IsisPduBody::Lsp(l) => Some(&mut l.tlvs),
            IsisPduBody::Csnp(c) => Some(&mut c.tlvs),
            IsisPduBody::Psnp(p) => Some(&mut p.tlvs),
            IsisPduBody::Raw(_) => None,
        }
    }
}

/// A whole LAN frame carrying an IS-IS PDU.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IsisFrame {
    pub mac: MacHeader,
    pub pdu: IsisPdu,
}

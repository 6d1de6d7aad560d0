//! LAN hello construction for a passive IS-IS speaker.
use bytes::Bytes;
use std::net::Ipv4Addr;

use crate::error::ParserError;
use crate::models::*;
use crate::parser::isis::padding::pad_frame;

/// Default hello hold timer, in seconds.
pub const DEFAULT_HOLD_TIMER: u16 = 10;
/// Hold timer multiplier applied once an adjacency is up.
pub const HOLD_MULTIPLIER: u16 = 3;

/// MAC octets per IIH IS neighbour entry; 42 entries fill one TLV.
const MAX_IIH_NEIGHBORS_PER_TLV: usize = 255 / 6;

/// Identity of the local speaker.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IsisSpeakerConfig {
    pub src_mac: [u8; 6],
    pub src_id: [u8; 6],
    pub lan_id: [u8; 7],
    pub area_address: Bytes,
    pub src_ip: Ipv4Addr,
    pub hold_timer: u16,
}

impl IsisSpeakerConfig {
    /// The system ID defaults to the interface MAC, and the LAN ID to the system ID with
    /// pseudonode 1.
    pub fn new(src_mac: [u8; 6], area_address: impl Into<Bytes>, src_ip: Ipv4Addr) -> Self {
        let mut lan_id = [1u8; 7];
        lan_id[..6].copy_from_slice(&src_mac);
        IsisSpeakerConfig {
            src_mac,
            src_id: src_mac,
            lan_id,
            area_address: area_address.into(),
            src_ip,
            hold_timer: DEFAULT_HOLD_TIMER,
        }
    }

    pub fn with_src_id(mut self, src_id: [u8; 6]) -> Self {
        self.src_id = src_id;
        self.lan_id[..6].copy_from_slice(&src_id);
        self
    }

    pub fn with_lan_id(mut self, lan_id: [u8; 7]) -> Self {
        self.lan_id = lan_id;
        self
    }
}

/// Build a LAN hello for `level`, padded to a full 1514-octet frame.
///
/// The hello advertises an L1L2 circuit with priority 0, so the speaker is never elected
/// designated IS. `neighbors` are the MACs of the neighbours seen at this level.
pub fn build_lan_hello(
    config: &IsisSpeakerConfig,
    level: IsisLevel,
    lan_id: &[u8; 7],
    hold_timer: u16,
    neighbors: &[[u8; 6]],
) -> Result<IsisFrame, ParserError> {
    let mut tlvs = vec![
        Tlv::new(
            TlvType::PROTOCOLS_SUPPORTED,
            TlvValue::ProtocolsSupported(vec![NLPID_IP]),
        ),
        Tlv::new(
            TlvType::AREA_ADDRESSES,
            TlvValue::AreaAddresses(vec![config.area_address.clone()]),
        ),
        Tlv::new(
            TlvType::IP_INTERFACE_ADDRESSES,
            TlvValue::IpInterfaceAddresses(vec![config.src_ip]),
        ),
    ];
    for chunk in neighbors.chunks(MAX_IIH_NEIGHBORS_PER_TLV) {
        tlvs.push(Tlv::new(
            TlvType::IIH_IS_NEIGHBORS,
            TlvValue::IihIsNeighbors(chunk.to_vec()),
        ));
    }

    let mut frame = IsisFrame {
        mac: MacHeader {
            dst_mac: level.all_iss_mac(),
            src_mac: config.src_mac,
            length: ISIS_PACKET_LEN,
            dsap: ISIS_LLC_SIGNATURE[0],
            ssap: ISIS_LLC_SIGNATURE[1],
            ctrl: ISIS_LLC_SIGNATURE[2],
        },
        pdu: IsisPdu {
            header: IsisHeader {
                nlpid: NLPID_ISIS,
                header_len: (ISIS_HEADER_LEN + ISIS_HELLO_HEADER_LEN) as u8,
                version_proto_id: 1,
                reserved: 0,
                pdu_type: level.lan_hello_type(),
                version: 1,
                eco: 0,
                user_eco: 0,
            },
            body: IsisPduBody::LanHello(LanHello {
                circuit_type: CircuitType::L1L2,
                source_id: config.src_id,
                hold_timer,
                pdu_len: ISIS_PDU_LEN,
                priority_byte: 0,
                lan_id: *lan_id,
                tlvs: Tlvs {
                    entries: tlvs,
                    trailing: Bytes::new(),
                },
            }),
        },
    };
    pad_frame(&mut frame, MAC_FRAME_LEN)?;
    Ok(frame)
}

use bytes::{Buf, BufMut, Bytes, BytesMut};
use log::{debug, warn};

use crate::error::ParserError;
use crate::models::*;
use crate::parser::ospf::ip_header::parse_ipv4_header;
use crate::parser::ospf::lsa::{parse_lsa, parse_lsa_headers};
use crate::parser::ReadUtils;

/// Decode an IPv4 datagram carrying OSPF.
pub fn decode_ospf_packet(mut data: Bytes) -> Result<OspfIpPacket, ParserError> {
    let ip = parse_ipv4_header(&mut data)?;
    let ospf = parse_ospf_packet(data)?;
    Ok(OspfIpPacket { ip, ospf })
}

pub fn parse_ospf_header(data: &mut Bytes) -> Result<OspfHeader, ParserError> {
    data.has_n_remaining(OSPF_HEADER_LEN)?;
    let version = data.get_u8();
    let packet_type = OspfPacketType::from(data.get_u8());
    let length = data.get_u16();
    let router_id = data.read_ipv4_address()?;
    let area_id = data.read_ipv4_address()?;
    let checksum = data.read_u16()?;
    let auth_type = OspfAuthType::from(data.read_u16()?);
    let auth = data.read_array::<8>()?;
    if version != 2 {
        warn!("OSPF version {} from {}, decoding as v2", version, router_id);
    }
    Ok(OspfHeader {
        version,
        packet_type,
        length,
        router_id,
        area_id,
        checksum,
        auth_type,
        auth,
    })
}

/// Parse an OSPF packet starting at its common header.
///
/// The body is bounded by the header's packet length; anything after it (an authentication
/// trailer, link-layer padding) is ignored.
pub fn parse_ospf_packet(mut data: Bytes) -> Result<OspfPacket, ParserError> {
    let header = parse_ospf_header(&mut data)?;
    let length = header.length as usize;
    if length < OSPF_HEADER_LEN {
        return Err(ParserError::malformed(format!(
            "OSPF packet length {} shorter than its header",
            length
        )));
    }
    data.has_n_remaining(length - OSPF_HEADER_LEN)?;
    let body_bytes = data.split_to(length - OSPF_HEADER_LEN);
    if data.has_remaining() {
        debug!("ignoring {} bytes after OSPF packet", data.remaining());
    }

    let body = match header.packet_type {
        OspfPacketType::Hello => OspfBody::Hello(parse_hello(body_bytes)?),
        OspfPacketType::DbDescription => OspfBody::DbDescription(parse_db_description(body_bytes)?),
        OspfPacketType::LsRequest => OspfBody::LsRequest(parse_ls_requests(body_bytes)?),
        OspfPacketType::LsUpdate => OspfBody::LsUpdate(parse_ls_update(body_bytes)?),
        OspfPacketType::LsAck => OspfBody::LsAck(parse_lsa_headers(body_bytes)?),
        OspfPacketType::Unknown(t) => {
            warn!("unknown OSPF packet type {} from {}", t, header.router_id);
            OspfBody::Unknown(body_bytes)
        }
    };
    Ok(OspfPacket { header, body })
}

/// ```text
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                        Network Mask                           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |         HelloInterval         |    Options    |    Rtr Pri    |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                     RouterDeadInterval                        |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                      Designated Router                        |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                   Backup Designated Router                    |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                          Neighbor                             |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                              ...                              |
/// ```
fn parse_hello(mut data: Bytes) -> Result<OspfHello, ParserError> {
    data.has_n_remaining(OSPF_HELLO_LEN)?;
    let netmask = data.read_ipv4_address()?;
    let hello_interval = data.read_u16()?;
    let options = OspfOptions::from_bits_retain(data.read_u8()?);
    let priority = data.read_u8()?;
    let dead_interval = data.read_u32()?;
    let designated_router = data.read_ipv4_address()?;
    let backup_designated_router = data.read_ipv4_address()?;
    let mut neighbors = Vec::with_capacity(data.remaining() / 4);
    while data.has_remaining() {
        neighbors.push(data.read_ipv4_address()?);
    }
    Ok(OspfHello {
        netmask,
        hello_interval,
        options,
        priority,
        dead_interval,
        designated_router,
        backup_designated_router,
        neighbors,
    })
}

fn parse_db_description(mut data: Bytes) -> Result<OspfDbDescription, ParserError> {
    data.has_n_remaining(OSPF_DBDESC_LEN)?;
    let mtu = data.get_u16();
    let options = OspfOptions::from_bits_retain(data.get_u8());
    let flags = DdFlags::from_bits_retain(data.get_u8());
    let dd_sequence = data.get_u32();
    Ok(OspfDbDescription {
        mtu,
        options,
        flags,
        dd_sequence,
        lsa_headers: parse_lsa_headers(data)?,
    })
}

fn parse_ls_requests(mut data: Bytes) -> Result<Vec<LsRequest>, ParserError> {
    if data.remaining() % OSPF_LSREQ_LEN != 0 {
        return Err(ParserError::malformed(format!(
            "LS request body of {} bytes is not a multiple of {}",
            data.remaining(),
            OSPF_LSREQ_LEN
        )));
    }
    let mut requests = Vec::with_capacity(data.remaining() / OSPF_LSREQ_LEN);
    while data.has_remaining() {
        requests.push(LsRequest {
            ls_type: data.read_u32()?,
            link_state_id: data.read_ipv4_address()?,
            advertising_router: data.read_ipv4_address()?,
        });
    }
    Ok(requests)
}

fn parse_ls_update(mut data: Bytes) -> Result<Vec<Lsa>, ParserError> {
    let count = data.read_u32()?;
    let mut lsas = vec![];
    for _ in 0..count {
        lsas.push(parse_lsa(&mut data)?);
    }
    if data.has_remaining() {
        warn!(
            "{} bytes left after {} LSAs in LS update",
            data.remaining(),
            count
        );
    }
    Ok(lsas)
}

impl OspfHeader {
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(OSPF_HEADER_LEN);
        buf.put_u8(self.version);
        buf.put_u8(self.packet_type.into());
        buf.put_u16(self.length);
        buf.put_slice(&self.router_id.octets());
        buf.put_slice(&self.area_id.octets());
        buf.put_u16(self.checksum);
        buf.put_u16(self.auth_type.into());
        buf.put_slice(&self.auth);
        buf.freeze()
    }
}

impl OspfBody {
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::new();
        match self {
            OspfBody::Hello(h) => {
                buf.put_slice(&h.netmask.octets());
                buf.put_u16(h.hello_interval);
                buf.put_u8(h.options.bits());
                buf.put_u8(h.priority);
                buf.put_u32(h.dead_interval);
                buf.put_slice(&h.designated_router.octets());
                buf.put_slice(&h.backup_designated_router.octets());
                for n in &h.neighbors {
                    buf.put_slice(&n.octets());
                }
            }
            OspfBody::DbDescription(d) => {
                buf.put_u16(d.mtu);
                buf.put_u8(d.options.bits());
                buf.put_u8(d.flags.bits());
                buf.put_u32(d.dd_sequence);
                for h in &d.lsa_headers {
                    buf.extend(h.encode());
                }
            }
            OspfBody::LsRequest(requests) => {
                for r in requests {
                    buf.put_u32(r.ls_type);
                    buf.put_slice(&r.link_state_id.octets());
                    buf.put_slice(&r.advertising_router.octets());
                }
            }
            OspfBody::LsUpdate(lsas) => {
                buf.put_u32(lsas.len() as u32);
                for lsa in lsas {
                    buf.extend(lsa.encode());
                }
            }
            OspfBody::LsAck(headers) => {
                for h in headers {
                    buf.extend(h.encode());
                }
            }
            OspfBody::Unknown(raw) => buf.put_slice(raw),
        }
        buf.freeze()
    }
}

impl OspfPacket {
    /// Encode header and body, with the packet length recomputed. The checksum is written as
    /// stored.
    pub fn encode(&self) -> Bytes {
        let body = self.body.encode();
        let header = OspfHeader {
            length: (OSPF_HEADER_LEN + body.len()) as u16,
            ..self.header.clone()
        };
        let mut buf = BytesMut::with_capacity(OSPF_HEADER_LEN + body.len());
        buf.extend(header.encode());
        buf.put_slice(&body);
        buf.freeze()
    }
}

impl OspfIpPacket {
    /// Encode the IP header followed by the OSPF packet, with the IP total length recomputed.
    pub fn encode(&self) -> Bytes {
        let ospf = self.ospf.encode();
        let ip = Ipv4Header {
            total_length: (self.ip.ihl as usize * 4 + ospf.len()) as u16,
            ..self.ip.clone()
        };
        let mut buf = BytesMut::new();
        buf.extend(ip.encode());
        buf.put_slice(&ospf);
        buf.freeze()
    }
}

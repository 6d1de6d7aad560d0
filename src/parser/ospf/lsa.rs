//! Link state advertisements.
use bytes::{Buf, BufMut, Bytes, BytesMut};
use log::warn;

use crate::error::ParserError;
use crate::models::*;
use crate::parser::ReadUtils;

pub fn parse_lsa_header(data: &mut Bytes) -> Result<LsaHeader, ParserError> {
    data.has_n_remaining(LSA_HEADER_LEN)?;
    Ok(LsaHeader {
        age: data.get_u16(),
        options: OspfOptions::from_bits_retain(data.get_u8()),
        ls_type: LsaType::from(data.get_u8()),
        link_state_id: data.read_ipv4_address()?,
        advertising_router: data.read_ipv4_address()?,
        sequence_number: data.read_u32()?,
        checksum: data.read_u16()?,
        length: data.read_u16()?,
    })
}

/// Parse LSA headers until the input is exhausted, as found in LS-Ack and DB description
/// packets.
pub fn parse_lsa_headers(mut data: Bytes) -> Result<Vec<LsaHeader>, ParserError> {
    let mut headers = vec![];
    while data.has_remaining() {
        headers.push(parse_lsa_header(&mut data)?);
    }
    Ok(headers)
}

/// Read one LSA.
///
/// The body is cut by the header's declared length before any type-specific decoding, so an
/// LSA of unknown type, or one whose body does not decode, is stepped over whole and the LSAs
/// after it stay readable. The length is checked against what is left first: shorter than a
/// header is `Malformed`, longer than the remaining input is `Truncated`.
pub fn parse_lsa(data: &mut Bytes) -> Result<Lsa, ParserError> {
    let header = parse_lsa_header(data)?;
    let length = header.length as usize;
    if length < LSA_HEADER_LEN {
        return Err(ParserError::malformed(format!(
            "LSA length {} shorter than its header",
            length
        )));
    }
    data.has_n_remaining(length - LSA_HEADER_LEN)?;
    let raw = data.split_to(length - LSA_HEADER_LEN);
    let mut body = raw.clone();

    let decoded = match header.ls_type {
        LsaType::Router => parse_router_lsa(&mut body).map(LsaBody::Router),
        LsaType::Network => parse_network_lsa(&mut body).map(LsaBody::Network),
        LsaType::SummaryIp | LsaType::SummaryAsbr => {
            parse_summary_lsa(&mut body).map(LsaBody::Summary)
        }
        LsaType::AsExternal => parse_external_lsa(&mut body).map(LsaBody::External),
        t => {
            warn!(
                "unknown LSA type {:?} from {}, skipping {} bytes",
                t,
                header.advertising_router,
                raw.len()
            );
            return Ok(Lsa {
                header,
                body: LsaBody::Unknown(raw),
                trailing: Bytes::new(),
            });
        }
    };
    match decoded {
        Ok(lsa_body) => {
            if body.has_remaining() {
                warn!("{} bytes left after {:?} LSA body", body.remaining(), header.ls_type);
            }
            Ok(Lsa {
                header,
                body: lsa_body,
                trailing: body,
            })
        }
        Err(e) => {
            warn!(
                "bad {:?} LSA from {}, skipping {} bytes: {}",
                header.ls_type,
                header.advertising_router,
                raw.len(),
                e
            );
            Ok(Lsa {
                header,
                body: LsaBody::Unknown(raw),
                trailing: Bytes::new(),
            })
        }
    }
}

fn read_metric24(data: &mut Bytes) -> Result<OspfMetric, ParserError> {
    let high = data.read_u8()? as u32;
    let low = data.read_u16()? as u32;
    let metric = OspfMetric((high << 16) | low);
    if metric.is_out_of_range() {
        warn!("OSPF metric {} exceeds LSInfinity", metric.0);
    }
    Ok(metric)
}

fn put_metric24(buf: &mut BytesMut, metric: OspfMetric) {
    buf.put_u8(((metric.0 >> 16) & 0xff) as u8);
    buf.put_u16((metric.0 & 0xffff) as u16);
}

fn parse_router_lsa(data: &mut Bytes) -> Result<RouterLsa, ParserError> {
    let flags = RouterLsaFlags::from_bits_retain(data.read_u8()?);
    let _reserved = data.read_u8()?;
    let link_count = data.read_u16()?;
    let mut links = Vec::with_capacity(link_count as usize);
    for _ in 0..link_count {
        let link_id = data.read_ipv4_address()?;
        let link_data = data.read_ipv4_address()?;
        let link_type = RouterLinkType::from(data.read_u8()?);
        let tos_count = data.read_u8()?;
        let metric = data.read_u16()?;
        let mut tos_metrics = Vec::with_capacity(tos_count as usize);
        for _ in 0..tos_count {
            let tos = data.read_u8()?;
            let _reserved = data.read_u8()?;
            let metric = data.read_u16()?;
            tos_metrics.push(TosMetric { tos, metric });
        }
        links.push(RouterLink {
            link_id,
            link_data,
            link_type,
            metric,
            tos_metrics,
        });
    }
    Ok(RouterLsa { flags, links })
}

fn parse_network_lsa(data: &mut Bytes) -> Result<NetworkLsa, ParserError> {
    let netmask = data.read_ipv4_address()?;
    let mut attached_routers = vec![];
    while data.has_remaining() {
        attached_routers.push(data.read_ipv4_address()?);
    }
    Ok(NetworkLsa {
        netmask,
        attached_routers,
    })
}

fn parse_summary_lsa(data: &mut Bytes) -> Result<SummaryLsa, ParserError> {
    let netmask = data.read_ipv4_address()?;
    let mut metrics = vec![];
    while data.has_remaining() {
        let tos = data.read_u8()?;
        let metric = read_metric24(data)?;
        metrics.push(SummaryMetric { tos, metric });
    }
    Ok(SummaryLsa { netmask, metrics })
}

fn parse_external_lsa(data: &mut Bytes) -> Result<ExternalLsa, ParserError> {
    let netmask = data.read_ipv4_address()?;
    let mut metrics = vec![];
    while data.has_remaining() {
        let ext_tos = data.read_u8()?;
        let metric = read_metric24(data)?;
        metrics.push(ExternalMetric {
            external_type_2: ext_tos & 0x80 != 0,
            tos: ext_tos & 0x7f,
            metric,
            forwarding_address: data.read_ipv4_address()?,
            route_tag: data.read_u32()?,
        });
    }
    Ok(ExternalLsa { netmask, metrics })
}

impl LsaHeader {
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(LSA_HEADER_LEN);
        buf.put_u16(self.age);
        buf.put_u8(self.options.bits());
        buf.put_u8(self.ls_type.into());
        buf.put_slice(&self.link_state_id.octets());
        buf.put_slice(&self.advertising_router.octets());
        buf.put_u32(self.sequence_number);
        buf.put_u16(self.checksum);
        buf.put_u16(self.length);
        buf.freeze()
    }
}

impl LsaBody {
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::new();
        match self {
            LsaBody::Router(r) => {
                buf.put_u8(r.flags.bits());
                buf.put_u8(0);
                buf.put_u16(r.links.len() as u16);
                for link in &r.links {
                    buf.put_slice(&link.link_id.octets());
                    buf.put_slice(&link.link_data.octets());
                    buf.put_u8(link.link_type.into());
                    buf.put_u8(link.tos_metrics.len() as u8);
                    buf.put_u16(link.metric);
                    for t in &link.tos_metrics {
                        buf.put_u8(t.tos);
                        buf.put_u8(0);
                        buf.put_u16(t.metric);
                    }
                }
            }
            LsaBody::Network(n) => {
                buf.put_slice(&n.netmask.octets());
                for r in &n.attached_routers {
                    buf.put_slice(&r.octets());
                }
            }
            LsaBody::Summary(s) => {
                buf.put_slice(&s.netmask.octets());
                for m in &s.metrics {
                    buf.put_u8(m.tos);
                    put_metric24(&mut buf, m.metric);
                }
            }
            LsaBody::External(e) => {
                buf.put_slice(&e.netmask.octets());
                for m in &e.metrics {
                    let e_bit = if m.external_type_2 { 0x80 } else { 0 };
                    buf.put_u8(e_bit | (m.tos & 0x7f));
                    put_metric24(&mut buf, m.metric);
                    buf.put_slice(&m.forwarding_address.octets());
                    buf.put_u32(m.route_tag);
                }
            }
            LsaBody::Unknown(raw) => buf.put_slice(raw),
        }
        buf.freeze()
    }
}

impl Lsa {
    /// Encode header, body and any trailing bytes. The header's length field is recomputed.
    pub fn encode(&self) -> Bytes {
        let body = self.body.encode();
        let body_len = body.len() + self.trailing.len();
        let header = LsaHeader {
            length: (LSA_HEADER_LEN + body_len) as u16,
            ..self.header.clone()
        };
        let mut buf = BytesMut::with_capacity(LSA_HEADER_LEN + body_len);
        buf.extend(header.encode());
        buf.put_slice(&body);
        buf.put_slice(&self.trailing);
        buf.freeze()
    }
}

//! IS-IS variable-length fields.
use bytes::{Buf, BufMut, Bytes, BytesMut};
use log::debug;

use crate::error::ParserError;
use crate::models::*;
use crate::parser::ReadUtils;

/// Scan TLVs until fewer than two octets remain.
pub fn parse_tlvs(mut data: Bytes) -> Result<Tlvs, ParserError> {
    let mut entries = vec![];
    while data.remaining() >= 2 {
        let tlv_type = TlvType::from(data.get_u8());
        let len = data.get_u8() as usize;
        let value = data.read_n_bytes(len)?;
        entries.push(Tlv {
            tlv_type,
            value: parse_tlv_value(tlv_type, value)?,
        });
    }
    Ok(Tlvs {
        entries,
        trailing: data,
    })
}

fn check_records(
    data: &Bytes,
    record_len: usize,
    tlv_type: TlvType,
) -> Result<usize, ParserError> {
    if data.len() % record_len != 0 {
        return Err(ParserError::malformed(format!(
            "{:?} length {} is not a multiple of {}",
            tlv_type,
            data.len(),
            record_len
        )));
    }
    Ok(data.len() / record_len)
}

fn read_metrics(data: &mut Bytes) -> Result<IsisMetrics, ParserError> {
    let [default, delay, expense, error] = data.read_array::<4>()?;
    Ok(IsisMetrics {
        default,
        delay,
        expense,
        error,
    })
}

fn parse_ip_reachability(
    mut data: Bytes,
    tlv_type: TlvType,
) -> Result<Vec<IpReachability>, ParserError> {
    let count = check_records(&data, 12, tlv_type)?;
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        out.push(IpReachability {
            metrics: read_metrics(&mut data)?,
            address: data.read_ipv4_address()?,
            mask: data.read_ipv4_address()?,
        });
    }
    Ok(out)
}

pub(crate) fn read_lsp_id(data: &mut Bytes) -> Result<LspId, ParserError> {
    Ok(LspId::from(data.read_array::<8>()?))
}

pub fn parse_tlv_value(tlv_type: TlvType, mut data: Bytes) -> Result<TlvValue, ParserError> {
    let value = match tlv_type {
        TlvType::AREA_ADDRESSES => {
            let mut areas = vec![];
            while data.has_remaining() {
                let len = data.read_u8()? as usize;
                areas.push(data.read_n_bytes(len)?);
            }
            TlvValue::AreaAddresses(areas)
        }
        TlvType::LSP_IS_NEIGHBORS => {
            let virtual_flag = data.read_u8()?;
            let count = check_records(&data, 11, tlv_type)?;
            let mut neighbors = Vec::with_capacity(count);
            for _ in 0..count {
                neighbors.push(IsNeighbor {
                    metrics: read_metrics(&mut data)?,
                    neighbor_id: data.read_array::<7>()?,
                });
            }
            TlvValue::LspIsNeighbors {
                virtual_flag,
                neighbors,
            }
        }
        TlvType::ES_NEIGHBORS => {
            let metrics = read_metrics(&mut data)?;
            let count = check_records(&data, 6, tlv_type)?;
            let mut neighbors = Vec::with_capacity(count);
            for _ in 0..count {
                neighbors.push(data.read_array::<6>()?);
            }
            TlvValue::EsNeighbors { metrics, neighbors }
        }
        TlvType::IIH_IS_NEIGHBORS => {
            let count = check_records(&data, 6, tlv_type)?;
            let mut neighbors = Vec::with_capacity(count);
            for _ in 0..count {
                neighbors.push(data.read_array::<6>()?);
            }
            TlvValue::IihIsNeighbors(neighbors)
        }
        TlvType::PADDING => TlvValue::Padding(data),
        TlvType::LSP_ENTRIES => {
            let count = check_records(&data, 16, tlv_type)?;
            let mut entries = Vec::with_capacity(count);
            for _ in 0..count {
                entries.push(LspEntry {
                    remaining_lifetime: data.read_u16()?,
                    lsp_id: read_lsp_id(&mut data)?,
                    sequence_number: data.read_u32()?,
                    checksum: data.read_u16()?,
                });
            }
            TlvValue::LspEntries(entries)
        }
        TlvType::IP_INTERNAL_REACH => {
            TlvValue::IpInternalReach(parse_ip_reachability(data, tlv_type)?)
        }
        TlvType::IP_EXTERNAL_REACH => {
            TlvValue::IpExternalReach(parse_ip_reachability(data, tlv_type)?)
        }
        TlvType::PROTOCOLS_SUPPORTED => TlvValue::ProtocolsSupported(data.to_vec()),
        TlvType::IP_INTER_DOMAIN_INFO => TlvValue::IpInterDomainInfo(data),
        TlvType::IP_INTERFACE_ADDRESSES => {
            let count = check_records(&data, 4, tlv_type)?;
            let mut addrs = Vec::with_capacity(count);
            for _ in 0..count {
                addrs.push(data.read_ipv4_address()?);
            }
            TlvValue::IpInterfaceAddresses(addrs)
        }
        TlvType::DYNAMIC_HOSTNAME => TlvValue::DynamicHostname(data),
        TlvType::Unknown(t) => {
            debug!("unknown IS-IS TLV type {}", t);
            TlvValue::Unknown(data)
        }
        _ => TlvValue::NotDecoded(data),
    };
    Ok(value)
}

fn put_metrics(buf: &mut BytesMut, m: &IsisMetrics) {
    buf.put_slice(&[m.default, m.delay, m.expense, m.error]);
}

fn put_ip_reachability(buf: &mut BytesMut, entries: &[IpReachability]) {
    for e in entries {
        put_metrics(buf, &e.metrics);
        buf.put_slice(&e.address.octets());
        buf.put_slice(&e.mask.octets());
    }
}

impl TlvValue {
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::new();
        match self {
            TlvValue::AreaAddresses(areas) => {
                for area in areas {
                    buf.put_u8(area.len() as u8);
                    buf.put_slice(area);
                }
            }
            TlvValue::LspIsNeighbors {
                virtual_flag,
                neighbors,
            } => {
                buf.put_u8(*virtual_flag);
                for n in neighbors {
                    put_metrics(&mut buf, &n.metrics);
                    buf.put_slice(&n.neighbor_id);
                }
            }
            TlvValue::EsNeighbors { metrics, neighbors } => {
                put_metrics(&mut buf, metrics);
                for n in neighbors {
                    buf.put_slice(n);
                }
            }
            TlvValue::IihIsNeighbors(neighbors) => {
                for n in neighbors {
                    buf.put_slice(n);
                }
            }
            TlvValue::Padding(raw) => buf.put_slice(raw),
            TlvValue::LspEntries(entries) => {
                for e in entries {
                    buf.put_u16(e.remaining_lifetime);
                    buf.put_slice(&e.lsp_id.to_bytes());
                    buf.put_u32(e.sequence_number);
                    buf.put_u16(e.checksum);
                }
            }
            TlvValue::IpInternalReach(entries) | TlvValue::IpExternalReach(entries) => {
                put_ip_reachability(&mut buf, entries)
            }
            TlvValue::ProtocolsSupported(nlpids) => buf.put_slice(nlpids),
            TlvValue::IpInterfaceAddresses(addrs) => {
                for a in addrs {
                    buf.put_slice(&a.octets());
                }
            }
            TlvValue::IpInterDomainInfo(raw)
            | TlvValue::DynamicHostname(raw)
            | TlvValue::NotDecoded(raw)
            | TlvValue::Unknown(raw) => buf.put_slice(raw),
        }
        buf.freeze()
    }
}

impl Tlv {
    pub fn new(tlv_type: TlvType, value: TlvValue) -> Tlv {
        Tlv { tlv_type, value }
    }

    /// Encode type, length and value. Values longer than 255 octets cannot be represented;
    /// callers split them over several TLVs.
    pub fn encode(&self) -> Bytes {
        let value = self.value.encode();
        let mut buf = BytesMut::with_capacity(2 + value.len());
        buf.put_u8(self.tlv_type.into());
        buf.put_u8(value.len() as u8);
        buf.put_slice(&value);
        buf.freeze()
    }

    pub fn encoded_len(&self) -> usize {
        2 + self.value.encode().len()
    }
}

impl Tlvs {
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::new();
        for tlv in &self.entries {
            buf.extend(tlv.encode());
        }
        buf.put_slice(&self.trailing);
        buf.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_area_addresses() {
        let data = Bytes::from_static(&[1, 7, 3, 0x49, 0x00, 0x01, 2, 0x49, 0x02]);
        let tlvs = parse_tlvs(data.clone()).unwrap();
        assert_eq!(
            tlvs.area_addresses(),
            vec![
                Bytes::from_static(&[0x49, 0x00, 0x01]),
                Bytes::from_static(&[0x49, 0x02])
            ]
        );
        assert_eq!(tlvs.encode(), data);
    }

    #[test]
    fn test_nonzero_padding_kept() {
        let data = Bytes::from_static(&[8, 4, 0xde, 0xad, 0xbe, 0xef, 129, 1, 0xcc]);
        let tlvs = parse_tlvs(data.clone()).unwrap();
        assert_eq!(
            tlvs.entries[0].value,
            TlvValue::Padding(Bytes::from_static(&[0xde, 0xad, 0xbe, 0xef]))
        );
        assert_eq!(tlvs.encode(), data);
    }

    #[test]
    fn test_stray_trailing_byte() {
        let data = Bytes::from_static(&[129, 1, 0xcc, 0]);
        let tlvs = parse_tlvs(data.clone()).unwrap();
        assert_eq!(tlvs.entries.len(), 1);
        assert_eq!(
            tlvs.entries[0].value,
            TlvValue::ProtocolsSupported(vec![NLPID_IP])
        );
        assert_eq!(tlvs.trailing.as_ref(), &[0]);
        assert_eq!(tlvs.encode(), data);
    }

    #[test]
    fn test_unknown_and_not_decoded() {
        let data = Bytes::from_static(&[
            250, 2, 0xaa, 0xbb, // unknown
            240, 1, 0x00, // three-way hello, not decoded
            137, 3, b'r', b't', b'r',
        ]);
        let tlvs = parse_tlvs(data.clone()).unwrap();
        assert_eq!(
            tlvs.entries[0].value,
            TlvValue::Unknown(Bytes::from_static(&[0xaa, 0xbb]))
        );
        assert!(matches!(tlvs.entries[1].value, TlvValue::NotDecoded(_)));
        assert_eq!(tlvs.hostname().as_deref(), Some("rtr"));
        assert_eq!(tlvs.encode(), data);
    }

    #[test]
    fn test_reachability_and_lsp_entries() {
        let mut data = BytesMut::new();
        data.put_slice(&[128, 12, 10, 0x80, 0x80, 0x80, 192, 168, 1, 0, 255, 255, 255, 0]);
        data.put_slice(&[9, 16, 0x04, 0xb0]);
        data.put_slice(&[0x19, 0x21, 0x68, 0x00, 0x10, 0x01, 0x00, 0x00]);
        data.put_u32(0x1234);
        data.put_u16(0xbeef);
        let data = data.freeze();
        let tlvs = parse_tlvs(data.clone()).unwrap();
        match &tlvs.entries[0].value {
            TlvValue::IpInternalReach(r) => {
                assert_eq!(r[0].metrics.default, 10);
                assert_eq!(r[0].address, Ipv4Addr::new(192, 168, 1, 0));
                assert_eq!(r[0].mask, Ipv4Addr::new(255, 255, 255, 0));
            }
            v => panic!("unexpected {:?}", v),
        }
        match &tlvs.entries[1].value {
            TlvValue::LspEntries(e) => {
                assert_eq!(e[0].remaining_lifetime, 1200);
                assert_eq!(e[0].lsp_id.to_string(), "1921.6800.1001.00-00");
                assert_eq!(e[0].sequence_number, 0x1234);
            }
            v => panic!("unexpected {:?}", v),
        }
        assert_eq!(tlvs.encode(), data);
    }

    #[test]
    fn test_bad_record_length() {
        let data = Bytes::from_static(&[6, 5, 1, 2, 3, 4, 5]);
        assert!(matches!(
            parse_tlvs(data).unwrap_err(),
            ParserError::Malformed(_)
        ));
    }

    #[test]
    fn test_value_overrun() {
        let data = Bytes::from_static(&[132, 8, 10, 0, 0, 1]);
        assert!(parse_tlvs(data).unwrap_err().is_truncated());
    }
}

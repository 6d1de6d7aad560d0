use bytes::{Buf, BufMut, Bytes, BytesMut};
use log::debug;

use crate::error::ParserError;
use crate::models::*;
use crate::parser::isis::tlvs::{parse_tlvs, read_lsp_id};
use crate::parser::ReadUtils;

/// Parse an IS-IS PDU starting at its NLPID octet.
///
/// ```text
///  +--------+---------+-----------+----------+----------+---------+-----+----------+
///  | NLPID  | hdr len | ver/proto | reserved | PDU type | version | eco | user eco |
///  +--------+---------+-----------+----------+----------+---------+-----+----------+
/// ```
pub fn parse_isis_pdu(mut data: Bytes) -> Result<IsisPdu, ParserError> {
    data.has_n_remaining(ISIS_HEADER_LEN)?;
    if data[0] != NLPID_ISIS {
        return Err(ParserError::NotThisProtocol("IS-IS"));
    }
    let header = IsisHeader {
        nlpid: data.get_u8(),
        header_len: data.get_u8(),
        version_proto_id: data.get_u8(),
        reserved: data.get_u8(),
        pdu_type: IsisPduType::from(data.get_u8()),
        version: data.get_u8(),
        eco: data.get_u8(),
        user_eco: data.get_u8(),
    };

    let body = match header.pdu_type {
        IsisPduType::L1_LAN_HELLO | IsisPduType::L2_LAN_HELLO => {
            data.has_n_remaining(ISIS_HELLO_HEADER_LEN)?;
            IsisPduBody::LanHello(LanHello {
                circuit_type: CircuitType::from(data.get_u8()),
                source_id: data.read_array::<6>()?,
                hold_timer: data.read_u16()?,
                pdu_len: data.read_u16()?,
                priority_byte: data.read_u8()?,
                lan_id: data.read_array::<7>()?,
                tlvs: parse_tlvs(data)?,
            })
        }
        IsisPduType::L1_LSP | IsisPduType::L2_LSP => {
            data.has_n_remaining(ISIS_LSP_HEADER_LEN)?;
            IsisPduBody::Lsp(Lsp {
                pdu_len: data.read_u16()?,
                remaining_lifetime: data.read_u16()?,
                lsp_id: read_lsp_id(&mut data)?,
                sequence_number: data.read_u32()?,
                checksum: data.read_u16()?,
                flags: LspFlags::from_bits_retain(data.read_u8()?),
                tlvs: parse_tlvs(data)?,
            })
        }
        IsisPduType::L1_CSNP | IsisPduType::L2_CSNP => {
            data.has_n_remaining(ISIS_CSNP_HEADER_LEN)?;
            IsisPduBody::Csnp(Csnp {
                pdu_len: data.read_u16()?,
                source_id: data.read_array::<7>()?,
                start_lsp_id: read_lsp_id(&mut data)?,
                end_lsp_id: read_lsp_id(&mut data)?,
                tlvs: parse_tlvs(data)?,
            })
        }
        IsisPduType::L1_PSNP | IsisPduType::L2_PSNP => {
            data.has_n_remaining(ISIS_PSNP_HEADER_LEN)?;
            IsisPduBody::Psnp(Psnp {
                pdu_len: data.read_u16()?,
                source_id: data.read_array::<7>()?,
                tlvs: parse_tlvs(data)?,
            })
        }
        t => {
            debug!("IS-IS PDU type {:?} kept raw", t);
            IsisPduBody::Raw(data)
        }
    };

    Ok(IsisPdu { header, body })
}

impl IsisHeader {
    pub fn encode(&self) -> Bytes {
        Bytes::from(vec![
            self.nlpid,
            self.header_len,
            self.version_proto_id,
            self.reserved,
            self.pdu_type.into(),
            self.version,
            self.eco,
            self.user_eco,
        ])
    }
}

impl IsisPdu {
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::new();
        buf.extend(self.header.encode());
        match &self.body {
            IsisPduBody::LanHello(h) => {
                buf.put_u8(h.circuit_type.into());
                buf.put_slice(&h.source_id);
                buf.put_u16(h.hold_timer);
                buf.put_u16(h.pdu_len);
                buf.put_u8(h.priority_byte);
                buf.put_slice(&h.lan_id);
                buf.extend(h.tlvs.encode());
            }
            IsisPduBody::Lsp(l) => {
                buf.put_u16(l.pdu_len);
                buf.put_u16(l.remaining_lifetime);
                buf.put_slice(&l.lsp_id.to_bytes());
                buf.put_u32(l.sequence_number);
                buf.put_u16(l.checksum);
                buf.put_u8(l.flags.bits());
                buf.extend(l.tlvs.encode());
            }
            IsisPduBody::Csnp(c) => {
                buf.put_u16(c.pdu_len);
                buf.put_slice(&c.source_id);
                buf.put_slice(&c.start_lsp_id.to_bytes());
                buf.put_slice(&c.end_lsp_id.to_bytes());
                buf.extend(c.tlvs.encode());
            }
            IsisPduBody::Psnp(p) => {
                buf.put_u16(p.pdu_len);
                buf.put_slice(&p.source_id);
                buf.extend(p.tlvs.encode());
            }
            IsisPduBody::Raw(raw) => buf.put_slice(raw),
        }
        buf.freeze()
    }
}

use bytes::{Buf, BufMut, Bytes, BytesMut};
use log::debug;

use crate::error::ParserError;
use crate::models::*;
use crate::parser::isis::pdus::parse_isis_pdu;
use crate::parser::ReadUtils;

/// Decode a raw 802.3 frame carrying IS-IS.
///
/// Frames whose LLC octets and NLPID are not `fe fe 03 83` fail with
/// [ParserError::NotThisProtocol]; this check happens before anything else is decoded, so
/// filtering mixed traffic stays cheap.
pub fn parse_isis_frame(mut data: Bytes) -> Result<IsisFrame, ParserError> {
    let sig_start = MAC_HEADER_LEN;
    let sig_end = sig_start + ISIS_LLC_SIGNATURE.len();
    if data.len() < sig_end || data[sig_start..sig_end] != ISIS_LLC_SIGNATURE {
        debug!("not an IS-IS frame");
        return Err(ParserError::NotThisProtocol("IS-IS"));
    }

    let mac = MacHeader {
        dst_mac: data.read_array::<6>()?,
        src_mac: data.read_array::<6>()?,
        length: data.read_u16()?,
        dsap: data.get_u8(),
        ssap: data.get_u8(),
        ctrl: data.get_u8(),
    };
    let pdu = parse_isis_pdu(data)?;
    Ok(IsisFrame { mac, pdu })
}

impl MacHeader {
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(MAC_HEADER_LEN + LLC_HEADER_LEN);
        buf.put_slice(&self.dst_mac);
        buf.put_slice(&self.src_mac);
        buf.put_u16(self.length);
        buf.put_u8(self.dsap);
        buf.put_u8(self.ssap);
        buf.put_u8(self.ctrl);
        buf.freeze()
    }
}

impl IsisFrame {
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::new();
        buf.extend(self.mac.encode());
        buf.extend(self.pdu.encode());
        buf.freeze()
    }

    pub fn encoded_len(&self) -> usize {
        self.encode().len()
    }
}

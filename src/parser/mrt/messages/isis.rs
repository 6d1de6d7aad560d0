use crate::error::*;
use crate::models::*;
use crate::parser::isis::{parse_isis_frame, parse_isis_pdu};
use bytes::Bytes;

/// Parse an `ISIS` or `ISIS_ET` record body.
///
/// Bodies that carry the 802.3/LLC framing in front of the PDU are decoded as whole frames.
pub fn parse_mrt_isis(data: Bytes) -> Result<MrtIsisMessage, ParserError> {
    let sig = MAC_HEADER_LEN..MAC_HEADER_LEN + ISIS_LLC_SIGNATURE.len();
    match data.get(sig) {
        Some(s) if s == ISIS_LLC_SIGNATURE => Ok(MrtIsisMessage::Frame(parse_isis_frame(data)?)),
        _ => Ok(MrtIsisMessage::Pdu(parse_isis_pdu(data)?)),
    }
}

impl MrtIsisMessage {
    pub fn encode(&self) -> Bytes {
        match self {
            MrtIsisMessage::Pdu(pdu) => pdu.encode(),
            MrtIsisMessage::Frame(frame) => frame.encode(),
        }
    }
}

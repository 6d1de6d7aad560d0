use super::messages::{
    parse_bgp4mp, parse_mrt_bgp, parse_mrt_isis, parse_mrt_ospf, parse_table_dump_message,
};
use super::mrt_header::{parse_common_header, read_full};
use crate::error::{ParserError, ParserErrorWithBytes};
use crate::models::*;
use bytes::{BufMut, Bytes, BytesMut};
use std::io::Read;

/// One MRT record as framed from the stream, body not yet decoded.
///
/// Framing only depends on the common header, so a record whose body cannot be decoded still
/// has its exact bytes here and can be copied or dumped untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMrtRecord {
    pub common_header: CommonHeader,
    pub header_bytes: Bytes,
    pub message_bytes: Bytes,
}

impl RawMrtRecord {
    /// Decode the body.
    pub fn parse(&self) -> Result<MrtRecord, ParserError> {
        let message = parse_mrt_body(
            self.common_header.entry_type.into(),
            self.common_header.entry_subtype,
            self.message_bytes.clone(),
        )?;
        Ok(MrtRecord {
            common_header: self.common_header,
            message,
        })
    }

    /// Header and body exactly as read.
    pub fn raw_bytes(&self) -> Bytes {
        let mut bytes = BytesMut::with_capacity(self.total_bytes_len());
        bytes.put_slice(&self.header_bytes);
        bytes.put_slice(&self.message_bytes);
        bytes.freeze()
    }

    pub fn total_bytes_len(&self) -> usize {
        self.header_bytes.len() + self.message_bytes.len()
    }
}

/// Read the next record off the stream without decoding its body.
///
/// A clean end of stream before the header yields [ParserError::EofExpected]. A body shorter
/// than the header's length field is [ParserError::Truncated], with the bytes that were read
/// attached.
pub fn chunk_mrt_record(input: &mut impl Read) -> Result<RawMrtRecord, ParserErrorWithBytes> {
    let common_header = parse_common_header(input)?;
    let header_bytes = common_header.encode();

    let length = common_header.length as usize;
    let mut buffer = BytesMut::zeroed(length);
    let n = read_full(input, &mut buffer)?;
    if n < length {
        buffer.truncate(n);
        let mut bytes = header_bytes.to_vec();
        bytes.extend_from_slice(&buffer);
        return Err(ParserErrorWithBytes {
            error: ParserError::Truncated {
                needed: length,
                remaining: n,
            },
            bytes: Some(bytes),
        });
    }

    Ok(RawMrtRecord {
        common_header,
        header_bytes,
        message_bytes: buffer.freeze(),
    })
}

/// Read and decode the next record.
///
/// On a body decode failure the error carries the record's raw bytes so callers can dump it.
pub fn parse_mrt_record(input: &mut impl Read) -> Result<MrtRecord, ParserErrorWithBytes> {
    let raw_record = chunk_mrt_record(input)?;
    raw_record.parse().map_err(|error| ParserErrorWithBytes {
        error,
        bytes: Some(raw_record.raw_bytes().to_vec()),
    })
}

/// Parse MRT message body with given entry type and subtype.
///
/// Types without a decoder, known or not, fail with [ParserError::Unsupported]. The record
/// has been framed by then, so readers can skip it and carry on.
pub fn parse_mrt_body(
    entry_type: u16,
    entry_subtype: u16,
    data: Bytes,
) -> Result<MrtMessage, ParserError> {
    let message = match EntryType::from(entry_type) {
        EntryType::OSPFv2 => MrtMessage::Ospf(parse_mrt_ospf(data)?),
        EntryType::TABLE_DUMP => {
            MrtMessage::TableDump(parse_table_dump_message(entry_subtype, data)?)
        }
        EntryType::BGP => MrtMessage::Bgp(parse_mrt_bgp(entry_subtype, data)?),
        EntryType::BGP4MP | EntryType::BGP4MP_ET => {
            MrtMessage::Bgp4Mp(parse_bgp4mp(entry_subtype, data)?)
        }
        EntryType::ISIS | EntryType::ISIS_ET => MrtMessage::Isis(parse_mrt_isis(data)?),
        v => {
            return Err(ParserError::Unsupported(format!(
                "unsupported MRT type: {:?}",
                v
            )));
        }
    };
    Ok(message)
}

impl MrtRecord {
    /// Build a record around `message`, with the length filled in from its encoding.
    pub fn new(
        timestamp: u32,
        entry_type: EntryType,
        entry_subtype: u16,
        message: MrtMessage,
    ) -> MrtRecord {
        let length = message.encode().len() as u32;
        MrtRecord {
            common_header: CommonHeader::new(timestamp, entry_type, entry_subtype, length),
            message,
        }
    }

    /// Encode header and body. The header length is always recomputed from the body.
    pub fn encode(&self) -> Bytes {
        let message_bytes = self.message.encode();
        let mut new_header = self.common_header;
        new_header.length = message_bytes.len() as u32;
        let header_bytes = new_header.encode();

        let mut bytes = BytesMut::with_capacity(header_bytes.len() + message_bytes.len());
        bytes.put_slice(&header_bytes);
        bytes.put_slice(&message_bytes);
        bytes.freeze()
    }
}

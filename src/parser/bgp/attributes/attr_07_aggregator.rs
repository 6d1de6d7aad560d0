use crate::models::*;
use crate::parser::ReadUtils;
use crate::ParserError;
use bytes::{BufMut, Bytes, BytesMut};
use std::net::Ipv4Addr;

use super::expect_len;

/// AGGREGATOR with a 2-octet AS number followed by the IPv4 address of the aggregating
/// speaker.
pub fn parse_aggregator(mut input: Bytes) -> Result<AttributeValue, ParserError> {
    expect_len(&input, 6, "AGGREGATOR")?;
    let asn = input.read_u16()?;
    let ip = input.read_ipv4_address()?;
    Ok(AttributeValue::Aggregator { asn, ip })
}

pub fn encode_aggregator(asn: u16, ip: &Ipv4Addr) -> Bytes {
    let mut bytes = BytesMut::with_capacity(6);
    bytes.put_u16(asn);
    bytes.put_slice(&ip.octets());
    bytes.freeze()
}

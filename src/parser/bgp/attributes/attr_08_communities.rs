use crate::models::*;
use crate::ParserError;
use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::expect_multiple_of;

/// COMMUNITIES (RFC 1997): a list of opaque 4-octet values.
pub fn parse_communities(mut input: Bytes) -> Result<AttributeValue, ParserError> {
    expect_multiple_of(&input, 4, "COMMUNITIES")?;
    let mut communities = Vec::with_capacity(input.remaining() / 4);
    while input.has_remaining() {
        communities.push(input.get_u32());
    }
    Ok(AttributeValue::Communities(communities))
}

pub fn encode_communities(communities: &[u32]) -> Bytes {
    let mut bytes = BytesMut::with_capacity(communities.len() * 4);
    for community in communities {
        bytes.put_u32(*community);
    }
    bytes.freeze()
}

/// Format a community as `asn:value`.
pub fn community_to_string(community: u32) -> String {
    format!("{}:{}", community >> 16, community & 0xffff)
}

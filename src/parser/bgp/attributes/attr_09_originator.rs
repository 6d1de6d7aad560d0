use crate::models::*;
use crate::parser::ReadUtils;
use crate::ParserError;
use bytes::Bytes;

use super::expect_len;

/// ORIGINATOR_ID, <https://tools.ietf.org/html/rfc4456>
pub fn parse_originator_id(mut input: Bytes) -> Result<AttributeValue, ParserError> {
    expect_len(&input, 4, "ORIGINATOR_ID")?;
    Ok(AttributeValue::OriginatorId(input.read_ipv4_address()?))
}

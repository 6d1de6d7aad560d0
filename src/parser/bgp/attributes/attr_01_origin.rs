use crate::models::*;
use crate::parser::ReadUtils;
use crate::ParserError;
use bytes::Bytes;

use super::expect_len;

pub fn parse_origin(mut input: Bytes) -> Result<AttributeValue, ParserError> {
    expect_len(&input, 1, "ORIGIN")?;
    Ok(AttributeValue::Origin(Origin::from(input.read_u8()?)))
}

pub fn encode_origin(origin: &Origin) -> Bytes {
    Bytes::from(vec![u8::from(*origin)])
}

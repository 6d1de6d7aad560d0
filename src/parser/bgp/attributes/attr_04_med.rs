use crate::models::*;
use crate::parser::ReadUtils;
use crate::ParserError;
use bytes::Bytes;

use super::expect_len;

pub fn parse_med(mut input: Bytes) -> Result<AttributeValue, ParserError> {
    expect_len(&input, 4, "MULTI_EXIT_DISC")?;
    Ok(AttributeValue::MultiExitDiscriminator(input.read_u32()?))
}

pub fn encode_med(med: u32) -> Bytes {
    Bytes::from(med.to_be_bytes().to_vec())
}

use crate::models::*;
use crate::parser::ReadUtils;
use crate::ParserError;
use bytes::Bytes;

use super::expect_len;

pub fn parse_local_pref(mut input: Bytes) -> Result<AttributeValue, ParserError> {
    expect_len(&input, 4, "LOCAL_PREF")?;
    Ok(AttributeValue::LocalPreference(input.read_u32()?))
}

pub fn encode_local_pref(local_pref: u32) -> Bytes {
    Bytes::from(local_pref.to_be_bytes().to_vec())
}

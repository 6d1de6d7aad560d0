use crate::models::*;
use crate::parser::ReadUtils;
use crate::ParserError;
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Parse AS_PATH with 2-octet AS numbers.
///
/// ```text
/// Each AS path segment is represented by a triple
/// <path segment type, path segment length, path segment value>.
///
/// The path segment length is a 1-octet length field,
/// containing the number of ASes (not the number of octets) in
/// the path segment value field.
/// ```
pub fn parse_as_path(mut input: Bytes) -> Result<AttributeValue, ParserError> {
    let mut segments = vec![];
    while input.has_remaining() {
        let seg_type = SegmentType::from(input.read_u8()?);
        let count = input.read_u8()? as usize;
        input.has_n_remaining(count * 2)?;
        let asns = (0..count).map(|_| input.get_u16()).collect();
        segments.push(AsPathSegment { seg_type, asns });
    }
    Ok(AttributeValue::AsPath(AsPath::from_segments(segments)))
}

pub fn encode_as_path(path: &AsPath) -> Bytes {
    let mut bytes = BytesMut::new();
    for segment in &path.segments {
        bytes.put_u8(segment.seg_type.into());
        bytes.put_u8(segment.asns.len() as u8);
        for asn in &segment.asns {
            bytes.put_u16(*asn);
        }
    }
    bytes.freeze()
}

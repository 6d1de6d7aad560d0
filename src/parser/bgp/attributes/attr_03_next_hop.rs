use crate::models::*;
use crate::parser::ReadUtils;
use crate::ParserError;
use bytes::Bytes;
use std::net::Ipv4Addr;

use super::expect_len;

pub fn parse_next_hop(mut input: Bytes) -> Result<AttributeValue, ParserError> {
    expect_len(&input, 4, "NEXT_HOP")?;
    Ok(AttributeValue::NextHop(input.read_ipv4_address()?))
}

pub fn encode_next_hop(addr: &Ipv4Addr) -> Bytes {
    Bytes::from(addr.octets().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_next_hop() {
        let value = parse_next_hop(Bytes::from_static(&[192, 0, 2, 1])).unwrap();
        assert_eq!(value, AttributeValue::NextHop(Ipv4Addr::new(192, 0, 2, 1)));
        if let AttributeValue::NextHop(ip) = value {
            assert_eq!(u32::from(ip), 0xC0000201);
        }
        assert!(parse_next_hop(Bytes::from_static(&[192, 0, 2])).is_err());
    }

    #[test]
    fn test_encode_next_hop() {
        assert_eq!(
            encode_next_hop(&Ipv4Addr::new(10, 0, 0, 1)),
            Bytes::from_static(&[10, 0, 0, 1])
        );
    }
}

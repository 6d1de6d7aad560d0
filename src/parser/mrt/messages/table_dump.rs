use crate::error::*;
use crate::models::*;
use crate::parser::bgp::attributes::parse_attributes;
use crate::parser::ReadUtils;
use bytes::{BufMut, Bytes, BytesMut};
use log::warn;
use std::net::IpAddr;

fn read_address(data: &mut Bytes, afi: Afi) -> Result<IpAddr, ParserError> {
    match afi {
        Afi::Ipv4 => data.read_ipv4_address().map(IpAddr::V4),
        Afi::Ipv6 => data.read_ipv6_address().map(IpAddr::V6),
    }
}

fn put_address(bytes: &mut BytesMut, addr: &IpAddr) {
    match addr {
        IpAddr::V4(a) => bytes.put_slice(&a.octets()),
        IpAddr::V6(a) => bytes.put_slice(&a.octets()),
    }
}

/// Parse MRT TABLE_DUMP type message.
///
/// <https://www.rfc-editor.org/rfc/rfc6396#section-4.2>
///
/// The subtype selects the address family of both the prefix and the peer address. Peer AS
/// numbers are always 2 bytes.
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |         View Number           |       Sequence Number         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                        Prefix (variable)                      |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// | Prefix Length |    Status     |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                         Originated Time                       |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                    Peer IP Address (variable)                 |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |           Peer AS             |       Attribute Length        |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                   BGP Attribute... (variable)
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
pub fn parse_table_dump_message(
    sub_type: u16,
    mut data: Bytes,
) -> Result<TableDumpMessage, ParserError> {
    let afi = match sub_type {
        TABLE_DUMP_AFI_IPV4 => Afi::Ipv4,
        TABLE_DUMP_AFI_IPV6 => Afi::Ipv6,
        _ => {
            return Err(ParserError::Unsupported(format!(
                "TABLE_DUMP subtype {}",
                sub_type
            )))
        }
    };

    let view_number = data.read_u16()?;
    let sequence_number = data.read_u16()?;
    let prefix = read_address(&mut data, afi)?;
    let prefix_len = data.read_u8()?;
    if prefix_len as usize > afi.address_len() * 8 {
        return Err(ParserError::malformed(format!(
            "TABLE_DUMP prefix length {} too long for {:?}",
            prefix_len, afi
        )));
    }
    let status = data.read_u8()?;
    let originated_time = data.read_u32()?;
    let peer_address = read_address(&mut data, afi)?;
    let peer_asn = data.read_u16()?;

    let attribute_length = data.read_u16()? as usize;
    data.has_n_remaining(attribute_length)?;
    let attributes = parse_attributes(data.split_to(attribute_length))?;
    if !data.is_empty() {
        warn!("{} bytes left after TABLE_DUMP entry", data.len());
    }

    Ok(TableDumpMessage {
        view_number,
        sequence_number,
        prefix,
        prefix_len,
        status,
        originated_time,
        peer_address,
        peer_asn,
        attributes,
    })
}

impl TableDumpMessage {
    pub fn encode(&self) -> Bytes {
        let attr_bytes = self.attributes.encode();
        let mut bytes = BytesMut::new();
        bytes.put_u16(self.view_number);
        bytes.put_u16(self.sequence_number);
        put_address(&mut bytes, &self.prefix);
        bytes.put_u8(self.prefix_len);
        bytes.put_u8(self.status);
        bytes.put_u32(self.originated_time);
        put_address(&mut bytes, &self.peer_address);
        bytes.put_u16(self.peer_asn);
        bytes.put_u16(attr_bytes.len() as u16);
        bytes.put_slice(&attr_bytes);
        bytes.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn test_parse_table_dump_message_ipv4() {
        let mut bytes_mut = BytesMut::new();
        bytes_mut.put_u16(0);
        bytes_mut.put_u16(7);
        bytes_mut.put_slice(&[10, 0, 0, 0]);
        bytes_mut.put_u8(8);
        bytes_mut.put_u8(1);
        bytes_mut.put_u32(1_000_000);
        bytes_mut.put_slice(&[192, 0, 2, 9]);
        bytes_mut.put_u16(65001);
        bytes_mut.put_u16(7);
        bytes_mut.put_slice(&[0x40, 3, 4, 192, 0, 2, 1]);
        let bytes = bytes_mut.freeze();

        let msg = parse_table_dump_message(1, bytes.clone()).unwrap();
        assert_eq!(msg.sequence_number, 7);
        assert_eq!(msg.prefix, IpAddr::V4(Ipv4Addr::new(10, 0, 0, 0)));
        assert_eq!(msg.nlri_prefix().unwrap().to_string(), "10.0.0.0/8");
        assert_eq!(msg.peer_asn, 65001);
        assert_eq!(
            msg.attributes.next_hop(),
            Some(Ipv4Addr::new(192, 0, 2, 1))
        );
        assert_eq!(msg.encode(), bytes);
        assert_eq!(bytes.len(), TABLE_DUMP_IPV4_HEADER_LEN + 7);
    }

    #[test]
    fn test_parse_table_dump_message_ipv6() {
        let mut bytes_mut = BytesMut::new();
        bytes_mut.put_u16(0);
        bytes_mut.put_u16(0);
        bytes_mut.put_u128(Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 0).into());
        bytes_mut.put_u8(32);
        bytes_mut.put_u8(1);
        bytes_mut.put_u32(0);
        bytes_mut.put_u128(Ipv6Addr::LOCALHOST.into());
        bytes_mut.put_u16(65002);
        bytes_mut.put_u16(0);
        let bytes = bytes_mut.freeze();

        let msg = parse_table_dump_message(2, bytes.clone()).unwrap();
        assert_eq!(msg.afi(), Afi::Ipv6);
        assert!(msg.nlri_prefix().is_none());
        assert_eq!(msg.encode(), bytes);
    }

    #[test]
    fn test_bad_subtype_and_truncation() {
        assert!(matches!(
            parse_table_dump_message(3, Bytes::new()).unwrap_err(),
            ParserError::Unsupported(_)
        ));
        let bytes = Bytes::from_static(&[0, 0, 0, 0, 10, 0, 0, 0, 8, 1]);
        assert!(parse_table_dump_message(1, bytes).unwrap_err().is_truncated());
    }
}

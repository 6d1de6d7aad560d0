use bytes::{Buf, BufMut, Bytes, BytesMut};
use log::debug;

use crate::error::ParserError;
use crate::models::*;
use crate::parser::ReadUtils;

/// Parse the IPv4 header in front of an OSPF packet.
///
/// Anything that is not IPv4 carrying protocol 89 is [ParserError::NotThisProtocol]; the
/// caller is expected to drop such packets quietly. Options are kept as read.
pub fn parse_ipv4_header(data: &mut Bytes) -> Result<Ipv4Header, ParserError> {
    data.has_n_remaining(IPV4_HEADER_LEN)?;
    let version_ihl = data.get_u8();
    let version = version_ihl >> 4;
    let ihl = version_ihl & 0x0f;
    if version != 4 {
        debug!("IP version {}, not IPv4", version);
        return Err(ParserError::NotThisProtocol("OSPF"));
    }
    if (ihl as usize) * 4 < IPV4_HEADER_LEN {
        return Err(ParserError::malformed(format!("IPv4 header length {} words", ihl)));
    }

    let tos = data.get_u8();
    let total_length = data.get_u16();
    let identification = data.get_u16();
    let fragment = data.get_u16();
    let ttl = data.get_u8();
    let protocol = data.get_u8();
    let checksum = data.get_u16();
    let src = data.read_ipv4_address()?;
    let dst = data.read_ipv4_address()?;
    let options = data.read_n_bytes(ihl as usize * 4 - IPV4_HEADER_LEN)?;

    if protocol != IPPROTO_OSPF {
        debug!("IP protocol {}, not OSPF", protocol);
        return Err(ParserError::NotThisProtocol("OSPF"));
    }

    Ok(Ipv4Header {
        version,
        ihl,
        tos,
        total_length,
        identification,
        fragment,
        ttl,
        protocol,
        checksum,
        src,
        dst,
        options,
    })
}

impl Ipv4Header {
    /// Encode the header as stored. Length and checksum are not recomputed.
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(IPV4_HEADER_LEN + self.options.len());
        buf.put_u8((self.version << 4) | (self.ihl & 0x0f));
        buf.put_u8(self.tos);
        buf.put_u16(self.total_length);
        buf.put_u16(self.identification);
        buf.put_u16(self.fragment);
        buf.put_u8(self.ttl);
        buf.put_u8(self.protocol);
        buf.put_u16(self.checksum);
        buf.put_slice(&self.src.octets());
        buf.put_slice(&self.dst.octets());
        buf.put_slice(&self.options);
        buf.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn header(version_ihl: u8, protocol: u8) -> BytesMut {
        let mut buf = BytesMut::new();
        buf.put_u8(version_ihl);
        buf.put_u8(0xc0);
        buf.put_u16(64);
        buf.put_u16(0x1234);
        buf.put_u16(0);
        buf.put_u8(1);
        buf.put_u8(protocol);
        buf.put_u16(0xabcd);
        buf.put_slice(&[10, 0, 0, 1]);
        buf.put_slice(&[224, 0, 0, 5]);
        buf
    }

    #[test]
    fn test_parse_plain_header() {
        let data = header(0x45, 89).freeze();
        let ip = parse_ipv4_header(&mut data.clone()).unwrap();
        assert_eq!(ip.ihl, 5);
        assert_eq!(ip.src, Ipv4Addr::new(10, 0, 0, 1));
        assert_eq!(ip.dst, ALL_SPF_ROUTERS);
        assert!(ip.options.is_empty());
        assert_eq!(ip.encode(), data);
    }

    #[test]
    fn test_options_preserved() {
        let mut buf = header(0x46, 89);
        buf.put_slice(&[0x94, 0x04, 0x00, 0x00]);
        let data = buf.freeze();
        let ip = parse_ipv4_header(&mut data.clone()).unwrap();
        assert_eq!(ip.options.as_ref(), &[0x94, 0x04, 0x00, 0x00]);
        assert_eq!(ip.encode(), data);
    }

    #[test]
    fn test_not_ospf() {
        let mut data = header(0x45, 6).freeze();
        assert!(parse_ipv4_header(&mut data)
            .unwrap_err()
            .is_not_this_protocol());
        let mut data = header(0x65, 89).freeze();
        assert!(parse_ipv4_header(&mut data)
            .unwrap_err()
            .is_not_this_protocol());
    }

    #[test]
    fn test_short_ihl() {
        let mut data = header(0x44, 89).freeze();
        assert!(matches!(
            parse_ipv4_header(&mut data).unwrap_err(),
            ParserError::Malformed(_)
        ));
    }
}

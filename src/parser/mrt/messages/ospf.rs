use crate::error::*;
use crate::models::*;
use crate::parser::ospf::parse_ospf_packet;
use crate::parser::ReadUtils;
use bytes::{BufMut, Bytes, BytesMut};

/// Parse an `OSPFv2` record body.
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                        Remote IP Address                      |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                         Local IP Address                      |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                  OSPF Message Contents (variable)
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
pub fn parse_mrt_ospf(mut data: Bytes) -> Result<MrtOspfMessage, ParserError> {
    let remote_ip = data.read_ipv4_address()?;
    let local_ip = data.read_ipv4_address()?;
    let packet = parse_ospf_packet(data)?;
    Ok(MrtOspfMessage {
        remote_ip,
        local_ip,
        packet,
    })
}

impl MrtOspfMessage {
    pub fn encode(&self) -> Bytes {
        let packet = self.packet.encode();
        let mut bytes = BytesMut::with_capacity(8 + packet.len());
        bytes.put_slice(&self.remote_ip.octets());
        bytes.put_slice(&self.local_ip.octets());
        bytes.put_slice(&packet);
        bytes.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_parse_mrt_ospf_ls_ack() {
        let mut buf = BytesMut::new();
        buf.put_slice(&[10, 0, 0, 2, 10, 0, 0, 1]);
        // OSPF header, LS ack with no headers
        buf.put_slice(&[2, 5, 0, 24, 10, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0]);
        buf.put_slice(&[0; 8]);
        let data = buf.freeze();

        let msg = parse_mrt_ospf(data.clone()).unwrap();
        assert_eq!(msg.remote_ip, Ipv4Addr::new(10, 0, 0, 2));
        assert_eq!(msg.packet.header.packet_type, OspfPacketType::LsAck);
        assert_eq!(msg.packet.body, OspfBody::LsAck(vec![]));
        assert_eq!(msg.encode(), data);
    }

    #[test]
    fn test_truncated_addresses() {
        assert!(parse_mrt_ospf(Bytes::from_static(&[10, 0, 0]))
            .unwrap_err()
            .is_truncated());
    }
}

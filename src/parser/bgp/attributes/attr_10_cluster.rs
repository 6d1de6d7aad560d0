use crate::models::*;
use crate::ParserError;
use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::expect_multiple_of;

/// CLUSTER_LIST, <https://tools.ietf.org/html/rfc4456>
pub fn parse_clusters(mut input: Bytes) -> Result<AttributeValue, ParserError> {
    expect_multiple_of(&input, 4, "CLUSTER_LIST")?;
    let mut clusters = Vec::with_capacity(input.remaining() / 4);
    while input.has_remaining() {
        clusters.push(input.get_u32());
    }
    Ok(AttributeValue::ClusterList(clusters))
}

pub fn encode_clusters(clusters: &[u32]) -> Bytes {
    let mut bytes = BytesMut::with_capacity(clusters.len() * 4);
    for cluster in clusters {
        bytes.put_u32(*cluster);
    }
    bytes.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clusters() {
        if let Ok(AttributeValue::ClusterList(n)) = parse_clusters(Bytes::from(vec![
            0xC0, 0x00, 0x02, 0x01, 0xC0, 0x00, 0x02, 0x02,
        ])) {
            assert_eq!(n.len(), 2);
            assert_eq!(n[0], 0xC0000201);
            assert_eq!(n[1], 0xC0000202);
        } else {
            panic!()
        }
    }

    #[test]
    fn test_encode_clusters() {
        assert_eq!(
            encode_clusters(&[0xC0000201, 0xC0000202]),
            Bytes::from(vec![
                0xC0, 0x00, 0x02, 0x01, //
                0xC0, 0x00, 0x02, 0x02,
            ])
        );
    }
}

use crate::parser::ReadUtils;
use crate::ParserError;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use num_enum::{FromPrimitive, IntoPrimitive};

/// OPEN optional parameter types.
#[allow(non_camel_case_types)]
#[derive(Debug, FromPrimitive, IntoPrimitive, PartialEq, Eq, Hash, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum OptParamType {
    /// Deprecated by RFC 5492.
    AUTHENTICATION = 1,
    CAPABILITY = 2,
    #[num_enum(catch_all)]
    Unknown(u8),
}

#[allow(non_camel_case_types)]
#[derive(Debug, FromPrimitive, IntoPrimitive, PartialEq, Eq, Hash, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum BgpCapabilityType {
    MULTIPROTOCOL_EXT = 1,
    ROUTE_REFRESH = 2,
    /// Pre-standard route refresh, still announced by older Cisco speakers.
    ROUTE_REFRESH_Z = 128,

    /// Catch-all type for any capability code without a decoder
    #[num_enum(catch_all)]
    Unknown(u8),
}

/// Decoded capability value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CapabilityValue {
    /// Multiprotocol extensions, RFC 4760. The SAFI is read as a 16-bit field, which absorbs
    /// the reserved octet that precedes it on the wire.
    MultiProtocol { afi: u16, safi: u16 },
    RouteRefresh,
    RouteRefreshZ,
    /// Raw bytes of a capability that has no decoder, or whose length did not match the
    /// layout its code implies.
    Unknown(Bytes),
}

/// BGP Capability.
///
/// - RFC3392: <https://datatracker.ietf.org/doc/html/rfc3392>
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Capability {
    pub code: BgpCapabilityType,
    pub value: CapabilityValue,
}

impl Capability {
    /// Parse one `{code, length, value}` capability triple.
    pub fn parse(data: &mut Bytes) -> Result<Capability, ParserError> {
        let code = BgpCapabilityType::from(data.read_u8()?);
        let len = data.read_u8()? as usize;
        data.has_n_remaining(len)?;
        let mut value_bytes = data.split_to(len);

        let value = match (code, len) {
            (BgpCapabilityType::MULTIPROTOCOL_EXT, 4) => CapabilityValue::MultiProtocol {
                afi: value_bytes.get_u16(),
                safi: value_bytes.get_u16(),
            },
            (BgpCapabilityType::ROUTE_REFRESH, 0) => CapabilityValue::RouteRefresh,
            (BgpCapabilityType::ROUTE_REFRESH_Z, 0) => CapabilityValue::RouteRefreshZ,
            _ => CapabilityValue::Unknown(value_bytes),
        };
        Ok(Capability { code, value })
    }

    pub fn encode(&self) -> Bytes {
        let mut bytes = BytesMut::new();
        bytes.put_u8(self.code.into());
        match &self.value {
            CapabilityValue::MultiProtocol { afi, safi } => {
                bytes.put_u8(4);
                bytes.put_u16(*afi);
                bytes.put_u16(*safi);
            }
            CapabilityValue::RouteRefresh | CapabilityValue::RouteRefreshZ => {
                bytes.put_u8(0);
            }
            CapabilityValue::Unknown(raw) => {
                bytes.put_u8(raw.len() as u8);
                bytes.put_slice(raw);
            }
        }
        bytes.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_multiprotocol() {
        let mut data = Bytes::from_static(&[1, 4, 0, 1, 0, 1]);
        let cap = Capability::parse(&mut data).unwrap();
        assert_eq!(cap.code, BgpCapabilityType::MULTIPROTOCOL_EXT);
        assert_eq!(cap.value, CapabilityValue::MultiProtocol { afi: 1, safi: 1 });
        assert_eq!(cap.encode().as_ref(), &[1, 4, 0, 1, 0, 1]);
        assert!(data.is_empty());
    }

    #[test]
    fn test_parse_route_refresh_variants() {
        let mut data = Bytes::from_static(&[2, 0, 128, 0]);
        let first = Capability::parse(&mut data).unwrap();
        let second = Capability::parse(&mut data).unwrap();
        assert_eq!(first.value, CapabilityValue::RouteRefresh);
        assert_eq!(second.value, CapabilityValue::RouteRefreshZ);
    }

    #[test]
    fn test_unknown_capability_kept_raw() {
        // 4-octet AS capability, no decoder here
        let raw = [65, 4, 0, 0, 0xfd, 0xe9];
        let mut data = Bytes::copy_from_slice(&raw);
        let cap = Capability::parse(&mut data).unwrap();
        assert_eq!(cap.code, BgpCapabilityType::Unknown(65));
        assert_eq!(
            cap.value,
            CapabilityValue::Unknown(Bytes::from_static(&[0, 0, 0xfd, 0xe9]))
        );
        assert_eq!(cap.encode().as_ref(), &raw);
    }

    #[test]
    fn test_truncated_capability() {
        let mut data = Bytes::from_static(&[1, 4, 0, 1]);
        assert!(Capability::parse(&mut data).unwrap_err().is_truncated());
    }
}

use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::net::IpAddr;

/// AFI -- Address Family Identifier
///
/// Used by the BGP4MP and TABLE_DUMP MRT bodies to select the width of peer and prefix
/// addresses, and by the multiprotocol capability.
///
/// <https://www.iana.org/assignments/address-family-numbers/address-family-numbers.xhtml>
#[derive(Debug, PartialEq, TryFromPrimitive, IntoPrimitive, Clone, Copy, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum Afi {
    Ipv4 = 1,
    Ipv6 = 2,
}

impl Afi {
    /// Number of octets in an address of this family.
    pub const fn address_len(&self) -> usize {
        match self {
            Afi::Ipv4 => 4,
            Afi::Ipv6 => 16,
        }
    }
}

impl From<IpAddr> for Afi {
    #[inline]
    fn from(value: IpAddr) -> Self {
        match value {
            IpAddr::V4(_) => Afi::Ipv4,
            IpAddr::V6(_) => Afi::Ipv6,
        }
    }
}

/// SAFI -- Subsequent Address Family Identifier
#[derive(Debug, PartialEq, TryFromPrimitive, IntoPrimitive, Clone, Copy, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Safi {
    Unicast = 1,
    Multicast = 2,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn test_afi_from_addr() {
        assert_eq!(Afi::from(IpAddr::V4(Ipv4Addr::LOCALHOST)), Afi::Ipv4);
        assert_eq!(Afi::from(IpAddr::V6(Ipv6Addr::LOCALHOST)), Afi::Ipv6);
        assert_eq!(Afi::Ipv4.address_len(), 4);
        assert_eq!(Afi::Ipv6.address_len(), 16);
    }

    #[test]
    fn test_afi_safi_values() {
        assert_eq!(Afi::try_from(2u16).unwrap(), Afi::Ipv6);
        assert!(Afi::try_from(3u16).is_err());
        assert_eq!(u8::from(Safi::Multicast), 2);
    }
}

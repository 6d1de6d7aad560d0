use crate::error::ParserError;
use bytes::{BufMut, Bytes, BytesMut};
use ipnet::Ipv4Net;
use std::cmp::Ordering;
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::net::Ipv4Addr;

/// A variable-length prefix as carried on the wire by BGP NLRI: a length in bits followed by
/// `ceil(bits / 8)` octets.
///
/// The trailing bits of the last octet beyond `bits` are padding. Routers are not required to
/// zero them, so they are kept verbatim for re-encoding but ignored by `==`, `Hash` and `Ord`:
/// `10.1.0.0/8` and `10.0.0.0/8` are the same prefix.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Prefix {
    pub bits: u8,
    pub octets: Bytes,
}

impl Prefix {
    /// Create a prefix, checking that `octets` holds exactly `ceil(bits / 8)` bytes.
    pub fn new(bits: u8, octets: impl Into<Bytes>) -> Result<Self, ParserError> {
        let octets = octets.into();
        let expected = Self::octets_len(bits);
        if octets.len() != expected {
            return Err(ParserError::malformed(format!(
                "prefix of {} bits needs {} octets, got {}",
                bits,
                expected,
                octets.len()
            )));
        }
        Ok(Prefix { bits, octets })
    }

    /// Build an IPv4 prefix from an address, keeping only the octets the length covers.
    pub fn from_ipv4(addr: Ipv4Addr, bits: u8) -> Result<Self, ParserError> {
        if bits > 32 {
            return Err(ParserError::malformed(format!(
                "invalid IPv4 prefix length {}",
                bits
            )));
        }
        let len = Self::octets_len(bits);
        Ok(Prefix {
            bits,
            octets: Bytes::copy_from_slice(&addr.octets()[..len]),
        })
    }

    /// Number of octets needed to hold `bits` bits.
    #[inline]
    pub const fn octets_len(bits: u8) -> usize {
        (bits as usize).div_ceil(8)
    }

    /// The octets with padding bits cleared.
    pub fn significant_octets(&self) -> Vec<u8> {
        let mut out = self.octets.to_vec();
        let rem = self.bits % 8;
        if rem != 0 {
            if let Some(last) = out.last_mut() {
                *last &= 0xffu8 << (8 - rem);
            }
        }
        out
    }

    /// Wire form: length byte followed by the original octets, padding included.
    pub fn encode(&self) -> Bytes {
        let mut bytes = BytesMut::with_capacity(1 + self.octets.len());
        bytes.put_u8(self.bits);
        bytes.put_slice(&self.octets);
        bytes.freeze()
    }

    /// The prefix as a 4-byte IPv4 address, zero-filled past the carried octets. Padding
    /// bits in the carried octets are kept.
    pub fn to_ipv4_addr(&self) -> Result<Ipv4Addr, ParserError> {
        if self.bits > 32 || self.octets.len() > 4 {
            return Err(ParserError::malformed(format!(
                "prefix /{} does not fit an IPv4 address",
                self.bits
            )));
        }
        let mut buf = [0u8; 4];
        buf[..self.octets.len()].copy_from_slice(&self.octets);
        Ok(Ipv4Addr::from(buf))
    }

    pub fn to_ipv4_net(&self) -> Result<Ipv4Net, ParserError> {
        let addr = self.to_ipv4_addr()?;
        Ipv4Net::new(addr, self.bits)
            .map(|net| net.trunc())
            .map_err(|_| ParserError::malformed(format!("invalid prefix length {}", self.bits)))
    }
}

impl PartialEq for Prefix {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits && self.significant_octets() == other.significant_octets()
    }
}

impl Eq for Prefix {}

impl Hash for Prefix {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits.hash(state);
        self.significant_octets().hash(state);
    }
}

impl Ord for Prefix {
    fn cmp(&self, other: &Self) -> Ordering {
        self.significant_octets()
            .cmp(&other.significant_octets())
            .then(self.bits.cmp(&other.bits))
    }
}

impl PartialOrd for Prefix {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// keep debug output close to the textual prefix form
impl Debug for Prefix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Prefix({}/{})", hex::encode(&self.octets), self.bits)
    }
}

impl Display for Prefix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.to_ipv4_net() {
            Ok(net) => write!(f, "{}", net),
            Err(_) => write!(f, "{}/{}", hex::encode(&self.octets), self.bits),
        }
    }
}

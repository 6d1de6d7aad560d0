//! BGP path attribute structs
mod aspath;
mod origin;

use bitflags::bitflags;
use bytes::Bytes;
use log::warn;
use num_enum::{FromPrimitive, IntoPrimitive};
use std::net::Ipv4Addr;

pub use aspath::*;
pub use origin::*;

bitflags! {
    /// The high-order bit (bit 0) of the Attribute Flags octet is the
    /// Optional bit.  It defines whether the attribute is optional (if
    /// set to 1) or well-known (if set to 0).
    ///
    /// The second high-order bit (bit 1) of the Attribute Flags octet
    /// is the Transitive bit.  It defines whether an optional
    /// attribute is transitive (if set to 1) or non-transitive (if set
    /// to 0).
    ///
    /// The third high-order bit (bit 2) of the Attribute Flags octet
    /// is the Partial bit.  It defines whether the information
    /// contained in the optional transitive attribute is partial (if
    /// set to 1) or complete (if set to 0).
    ///
    /// The fourth high-order bit (bit 3) of the Attribute Flags octet
    /// is the Extended Length bit.  It defines whether the Attribute
    /// Length is one octet (if set to 0) or two octets (if set to 1).
    ///
    /// The low-order four bits are unused; they are retained as read.
    #[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct AttrFlags: u8 {
        const OPTIONAL   = 0b10000000;
        const TRANSITIVE = 0b01000000;
        const PARTIAL    = 0b00100000;
        const EXTENDED   = 0b00010000;
    }
}

/// Path attribute type codes.
///
/// Codes 1 through 16 form the registered set this crate knows by name; everything else is
/// `Unknown`. Only a subset of the registered set is decoded, see [AttributeValue].
#[allow(non_camel_case_types)]
#[derive(Debug, FromPrimitive, IntoPrimitive, PartialEq, Eq, Hash, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum AttrType {
    ORIGIN = 1,
    AS_PATH = 2,
    NEXT_HOP = 3,
    MULTI_EXIT_DISCRIMINATOR = 4,
    LOCAL_PREFERENCE = 5,
    ATOMIC_AGGREGATE = 6,
    AGGREGATOR = 7,
    COMMUNITIES = 8,
    /// <https://tools.ietf.org/html/rfc4456>
    ORIGINATOR_ID = 9,
    CLUSTER_LIST = 10,
    /// Destination Preference Attribute, only ever a draft.
    DPA = 11,
    ADVERTISER = 12,
    RCID_PATH = 13,
    /// <https://tools.ietf.org/html/rfc4760>
    MP_REACHABLE_NLRI = 14,
    MP_UNREACHABLE_NLRI = 15,
    /// <https://datatracker.ietf.org/doc/html/rfc4360>
    EXTENDED_COMMUNITIES = 16,
    #[num_enum(catch_all)]
    Unknown(u8),
}

impl AttrType {
    /// `true` for the named codes 1 through 16.
    pub fn is_registered(&self) -> bool {
        !matches!(self, AttrType::Unknown(_))
    }
}

/// BGP Attribute struct with attribute value and flag
#[derive(Debug, PartialEq, Clone, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attribute {
    pub flags: AttrFlags,
    pub attr_type: AttrType,
    pub value: AttributeValue,
}

impl Attribute {
    /// Build an attribute with the flags a well-behaved speaker would use for its type.
    pub fn new(attr_type: AttrType, value: AttributeValue) -> Attribute {
        let flags = match attr_type {
            AttrType::ORIGIN
            | AttrType::AS_PATH
            | AttrType::NEXT_HOP
            | AttrType::LOCAL_PREFERENCE
            | AttrType::ATOMIC_AGGREGATE => AttrFlags::TRANSITIVE,
            AttrType::AGGREGATOR | AttrType::COMMUNITIES | AttrType::EXTENDED_COMMUNITIES => {
                AttrFlags::OPTIONAL | AttrFlags::TRANSITIVE
            }
            _ => AttrFlags::OPTIONAL,
        };
        Attribute {
            flags,
            attr_type,
            value,
        }
    }
}

/// Decoded path attribute value.
///
/// A zero-length value always decodes to `Null`, whatever the type code. Registered codes
/// without a decoder keep their bytes in `NotDecoded`; unregistered codes keep them in
/// `Unknown`.
#[derive(Debug, PartialEq, Clone, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttributeValue {
    Null,
    Origin(Origin),
    AsPath(AsPath),
    NextHop(Ipv4Addr),
    MultiExitDiscriminator(u32),
    LocalPreference(u32),
    Aggregator { asn: u16, ip: Ipv4Addr },
    Communities(Vec<u32>),
    OriginatorId(Ipv4Addr),
    ClusterList(Vec<u32>),
    NotDecoded(Bytes),
    Unknown(Bytes),
}

/// The path attributes of one UPDATE, keyed by type code and kept in wire order.
///
/// Inserting an attribute whose type code is already present replaces the earlier one in its
/// original position. RFC 4271 forbids duplicates, so this only matters for malformed input,
/// where the last occurrence wins.
#[derive(Debug, PartialEq, Clone, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attributes {
    inner: Vec<Attribute>,
}

impl Attributes {
    pub fn new() -> Attributes {
        Attributes::default()
    }

    /// Insert an attribute, returning the one it replaced if the type code was already set.
    pub fn insert(&mut self, attr: Attribute) -> Option<Attribute> {
        match self
            .inner
            .iter_mut()
            .find(|existing| existing.attr_type == attr.attr_type)
        {
            Some(existing) => {
                warn!(
                    "duplicate path attribute {:?}, later value overwrites earlier",
                    attr.attr_type
                );
                Some(std::mem::replace(existing, attr))
            }
            None => {
                self.inner.push(attr);
                None
            }
        }
    }

    pub fn get(&self, attr_type: AttrType) -> Option<&Attribute> {
        self.inner.iter().find(|a| a.attr_type == attr_type)
    }

    pub fn remove(&mut self, attr_type: AttrType) -> Option<Attribute> {
        let idx = self.inner.iter().position(|a| a.attr_type == attr_type)?;
        Some(self.inner.remove(idx))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.inner.iter()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn origin(&self) -> Option<Origin> {
        match self.get(AttrType::ORIGIN).map(|a| &a.value) {
            Some(AttributeValue::Origin(o)) => Some(*o),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&AsPath> {
        match self.get(AttrType::AS_PATH).map(|a| &a.value) {
            Some(AttributeValue::AsPath(p)) => Some(p),
            _ => None,
        }
    }

    pub fn next_hop(&self) -> Option<Ipv4Addr> {
        match self.get(AttrType::NEXT_HOP).map(|a| &a.value) {
            Some(AttributeValue::NextHop(ip)) => Some(*ip),
            _ => None,
        }
    }
}

impl FromIterator<Attribute> for Attributes {
    fn from_iter<T: IntoIterator<Item = Attribute>>(iter: T) -> Self {
        let mut attributes = Attributes::new();
        for attr in iter {
            attributes.insert(attr);
        }
        attributes
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_type_registry() {
        assert_eq!(AttrType::from(3u8), AttrType::NEXT_HOP);
        assert_eq!(AttrType::from(16u8), AttrType::EXTENDED_COMMUNITIES);
        assert!(AttrType::from(13u8).is_registered());
        assert_eq!(AttrType::from(99u8), AttrType::Unknown(99));
        assert!(!AttrType::from(0u8).is_registered());
        assert_eq!(u8::from(AttrType::Unknown(99)), 99);
    }

    #[test]
    fn test_duplicate_overwrites_in_place() {
        let mut attrs = Attributes::new();
        attrs.insert(Attribute::new(
            AttrType::ORIGIN,
            AttributeValue::Origin(Origin::IGP),
        ));
        attrs.insert(Attribute::new(
            AttrType::NEXT_HOP,
            AttributeValue::NextHop(Ipv4Addr::new(192, 0, 2, 1)),
        ));
        let replaced = attrs.insert(Attribute::new(
            AttrType::ORIGIN,
            AttributeValue::Origin(Origin::EGP),
        ));

        assert_eq!(
            replaced.map(|a| a.value),
            Some(AttributeValue::Origin(Origin::IGP))
        );
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.origin(), Some(Origin::EGP));
        // the replacement keeps the first occurrence's position
        assert_eq!(attrs.iter().next().unwrap().attr_type, AttrType::ORIGIN);
    }

    #[test]
    fn test_flags_retain_unused_bits() {
        let flags = AttrFlags::from_bits_retain(0x4f);
        assert!(flags.contains(AttrFlags::TRANSITIVE));
        assert!(!flags.contains(AttrFlags::EXTENDED));
        assert_eq!(flags.bits(), 0x4f);
    }
}

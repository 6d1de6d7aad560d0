mod attr_01_origin;
mod attr_02_as_path;
mod attr_03_next_hop;
mod attr_04_med;
mod attr_05_local_pref;
mod attr_07_aggregator;
mod attr_08_communities;
mod attr_09_originator;
mod attr_10_cluster;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use log::{debug, warn};

use crate::models::*;

use crate::error::ParserError;
use crate::parser::ReadUtils;

pub use attr_01_origin::{encode_origin, parse_origin};
pub use attr_02_as_path::{encode_as_path, parse_as_path};
pub use attr_03_next_hop::{encode_next_hop, parse_next_hop};
pub use attr_04_med::{encode_med, parse_med};
pub use attr_05_local_pref::{encode_local_pref, parse_local_pref};
pub use attr_07_aggregator::{encode_aggregator, parse_aggregator};
pub use attr_08_communities::{community_to_string, encode_communities, parse_communities};
pub use attr_09_originator::parse_originator_id;
pub use attr_10_cluster::{encode_clusters, parse_clusters};

pub(crate) fn expect_len(data: &Bytes, len: usize, name: &str) -> Result<(), ParserError> {
    if data.len() != len {
        return Err(ParserError::malformed(format!(
            "{} attribute length {}, expected {}",
            name,
            data.len(),
            len
        )));
    }
    Ok(())
}

pub(crate) fn expect_multiple_of(data: &Bytes, unit: usize, name: &str) -> Result<(), ParserError> {
    if data.len() % unit != 0 {
        return Err(ParserError::malformed(format!(
            "{} attribute length {} is not a multiple of {}",
            name,
            data.len(),
            unit
        )));
    }
    Ok(())
}

/// Parse BGP path attributes.
///
/// `data` holds the whole attributes section of an UPDATE, so parsing stops once it is
/// consumed. A value that runs past the end of the section is `Truncated`.
pub fn parse_attributes(mut data: Bytes) -> Result<Attributes, ParserError> {
    let mut attributes = Attributes::new();

    while data.has_remaining() {
        let flags = AttrFlags::from_bits_retain(data.read_u8()?);
        let attr_type = AttrType::from(data.read_u8()?);
        let attr_length = match flags.contains(AttrFlags::EXTENDED) {
            false => data.read_u8()? as usize,
            true => data.read_u16()? as usize,
        };

        debug!(
            "reading attribute: type -- {:?}, length -- {}",
            &attr_type, attr_length
        );
        data.has_n_remaining(attr_length)?;
        let attr_data = data.split_to(attr_length);

        let value = parse_attribute_value(attr_type, attr_data.clone());
        let value = match value {
            Ok(v) => v,
            Err(e) if flags.contains(AttrFlags::PARTIAL) => {
                // partial optional transitive attributes may be garbled by a speaker upstream
                warn!("PARTIAL {:?}: {}", attr_type, e);
                AttributeValue::NotDecoded(attr_data)
            }
            Err(e) => return Err(e),
        };
        attributes.insert(Attribute {
            flags,
            attr_type,
            value,
        });
    }

    Ok(attributes)
}

fn parse_attribute_value(attr_type: AttrType, data: Bytes) -> Result<AttributeValue, ParserError> {
    if data.is_empty() {
        return Ok(AttributeValue::Null);
    }
    match attr_type {
        AttrType::ORIGIN => parse_origin(data),
        AttrType::AS_PATH => parse_as_path(data),
        AttrType::NEXT_HOP => parse_next_hop(data),
        AttrType::MULTI_EXIT_DISCRIMINATOR => parse_med(data),
        AttrType::LOCAL_PREFERENCE => parse_local_pref(data),
        AttrType::AGGREGATOR => parse_aggregator(data),
        AttrType::COMMUNITIES => parse_communities(data),
        AttrType::ORIGINATOR_ID => parse_originator_id(data),
        AttrType::CLUSTER_LIST => parse_clusters(data),
        AttrType::Unknown(t) => {
            debug!("unknown attribute type: {}", t);
            Ok(AttributeValue::Unknown(data))
        }
        t => {
            debug!("attribute {:?} not decoded", t);
            Ok(AttributeValue::NotDecoded(data))
        }
    }
}

impl AttributeValue {
    /// Encode the attribute value, without the flags/type/length prefix.
    pub fn encode(&self) -> Bytes {
        match self {
            AttributeValue::Null => Bytes::new(),
            AttributeValue::Origin(origin) => encode_origin(origin),
            AttributeValue::AsPath(path) => encode_as_path(path),
            AttributeValue::NextHop(ip) | AttributeValue::OriginatorId(ip) => encode_next_hop(ip),
            AttributeValue::MultiExitDiscriminator(v) => encode_med(*v),
            AttributeValue::LocalPreference(v) => encode_local_pref(*v),
            AttributeValue::Aggregator { asn, ip } => encode_aggregator(*asn, ip),
            AttributeValue::Communities(v) => encode_communities(v),
            AttributeValue::ClusterList(v) => encode_clusters(v),
            AttributeValue::NotDecoded(raw) | AttributeValue::Unknown(raw) => raw.clone(),
        }
    }
}

impl Attribute {
    /// Encode the attribute including its header.
    ///
    /// The extended-length flag is honored when set and forced on when the value does not fit
    /// in one length octet.
    pub fn encode(&self) -> Bytes {
        let value = self.value.encode();
        let mut flags = self.flags;
        if value.len() > u8::MAX as usize {
            flags.insert(AttrFlags::EXTENDED);
        }

        let mut bytes = BytesMut::with_capacity(value.len() + 4);
        bytes.put_u8(flags.bits());
        bytes.put_u8(self.attr_type.into());
        if flags.contains(AttrFlags::EXTENDED) {
            bytes.put_u16(value.len() as u16);
        } else {
            bytes.put_u8(value.len() as u8);
        }
        bytes.put_slice(&value);
        bytes.freeze()
    }
}

impl Attributes {
    pub fn encode(&self) -> Bytes {
        let mut bytes = BytesMut::new();
        for attr in self {
            bytes.extend(attr.encode());
        }
        bytes.freeze()
    }
}

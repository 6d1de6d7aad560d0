use itertools::Itertools;
use num_enum::{FromPrimitive, IntoPrimitive};
use std::fmt::{Display, Formatter};

/// AS_PATH segment type.
#[allow(non_camel_case_types)]
#[derive(Debug, FromPrimitive, IntoPrimitive, PartialEq, Eq, Hash, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum SegmentType {
    AS_SET = 1,
    AS_SEQUENCE = 2,
    /// <https://datatracker.ietf.org/doc/html/rfc5065>
    AS_CONFED_SET = 3,
    AS_CONFED_SEQUENCE = 4,
    #[num_enum(catch_all)]
    Unknown(u8),
}

/// One AS_PATH segment with 2-octet AS numbers.
#[derive(Debug, PartialEq, Clone, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AsPathSegment {
    pub seg_type: SegmentType,
    pub asns: Vec<u16>,
}

impl AsPathSegment {
    pub fn sequence(asns: Vec<u16>) -> Self {
        AsPathSegment {
            seg_type: SegmentType::AS_SEQUENCE,
            asns,
        }
    }

    pub fn set(asns: Vec<u16>) -> Self {
        AsPathSegment {
            seg_type: SegmentType::AS_SET,
            asns,
        }
    }

    /// Gets if a segment represents the local members of an autonomous system confederation.
    pub fn is_confed(&self) -> bool {
        matches!(
            self.seg_type,
            SegmentType::AS_CONFED_SET | SegmentType::AS_CONFED_SEQUENCE
        )
    }
}

#[derive(Debug, PartialEq, Clone, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AsPath {
    pub segments: Vec<AsPathSegment>,
}

impl AsPath {
    pub fn from_segments(segments: Vec<AsPathSegment>) -> AsPath {
        AsPath { segments }
    }

    /// The last AS of the last sequence segment, if any.
    pub fn origin(&self) -> Option<u16> {
        self.segments
            .iter()
            .rev()
            .find(|s| s.seg_type == SegmentType::AS_SEQUENCE)
            .and_then(|s| s.asns.last().copied())
    }
}

impl Display for AsPathSegment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let asns = self.asns.iter().join(" ");
        match self.seg_type {
            SegmentType::AS_SEQUENCE => write!(f, "{}", asns),
            SegmentType::AS_SET => write!(f, "{{{}}}", self.asns.iter().join(",")),
            SegmentType::AS_CONFED_SEQUENCE => write!(f, "({})", asns),
            SegmentType::AS_CONFED_SET => write!(f, "[{}]", self.asns.iter().join(",")),
            SegmentType::Unknown(t) => write!(f, "<{}:{}>", t, asns),
        }
    }
}

impl Display for AsPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segments.iter().join(" "))
    }
}

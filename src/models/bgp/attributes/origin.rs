use num_enum::{FromPrimitive, IntoPrimitive};
use std::fmt::{Display, Formatter};

/// ORIGIN attribute value.
///
/// Values outside the three registered codes are kept as `Unknown` so that the attribute
/// still re-encodes byte for byte.
#[allow(non_camel_case_types)]
#[derive(Debug, FromPrimitive, IntoPrimitive, PartialEq, Eq, Hash, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Origin {
    IGP = 0,
    EGP = 1,
    INCOMPLETE = 2,
    #[num_enum(catch_all)]
    Unknown(u8),
}

impl Display for Origin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Origin::IGP => write!(f, "IGP"),
            Origin::EGP => write!(f, "EGP"),
            Origin::INCOMPLETE => write!(f, "INCOMPLETE"),
            Origin::Unknown(v) => write!(f, "UNKNOWN({})", v),
        }
    }
}

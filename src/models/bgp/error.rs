//! NOTIFICATION error codes and their descriptions.
//!
//! <https://www.iana.org/assignments/bgp-parameters/bgp-parameters.xhtml#bgp-parameters-3>
use crate::ParserError;
use num_enum::{FromPrimitive, IntoPrimitive};

#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum BgpErrorCode {
    MessageHeaderError = 1,
    OpenError = 2,
    UpdateError = 3,
    HoldTimerExpired = 4,
    FiniteStateMachineError = 5,
    Cease = 6,
    #[num_enum(catch_all)]
    Unknown(u8),
}

/// Descriptions indexed by `[code - 1]`, each with its subcode descriptions indexed by
/// `[subcode - 1]`. An empty subcode list means the code defines no subcodes.
pub const NOTIFICATION_DESCRIPTIONS: [(&str, &[&str]); 6] = [
    (
        "message header error",
        &[
            "connection not synchronized",
            "bad message length",
            "bad message type",
        ],
    ),
    (
        "OPEN message error",
        &[
            "unsupported version number",
            "bad peer AS",
            "bad BGP identifier",
            "unsupported optional parameter",
            "authentication failure",
            "unacceptable hold time",
            "unsupported capability",
        ],
    ),
    (
        "UPDATE message error",
        &[
            "malformed attribute list",
            "unrecognized well-known attribute",
            "missing well-known attribute",
            "attribute flags error",
            "attribute length error",
            "invalid ORIGIN attribute",
            "AS routing loop",
            "invalid NEXT_HOP attribute",
            "optional attribute error",
            "invalid network field",
            "malformed AS_PATH",
        ],
    ),
    ("hold timer expired", &[]),
    ("finite state machine error", &[]),
    (
        "cease",
        &[
            "maximum number of prefixes reached",
            "administrative shutdown",
            "peer de-configured",
            "administrative reset",
            "connection rejected",
            "other configuration change",
        ],
    ),
];

/// Look up the `(code, subcode)` descriptions of a NOTIFICATION.
///
/// Both values are 1-based. A code of 0 is rejected, as is a subcode of 0 (or one past the
/// end of the table) for codes that define subcodes. For codes without subcodes the subcode
/// is ignored and `None` is returned for it.
pub fn notification_description(
    code: u8,
    subcode: u8,
) -> Result<(&'static str, Option<&'static str>), ParserError> {
    let &(code_desc, subcodes) = match code {
        0 => return Err(ParserError::malformed("NOTIFICATION error code 0")),
        c => NOTIFICATION_DESCRIPTIONS
            .get(c as usize - 1)
            .ok_or_else(|| ParserError::malformed(format!("unknown NOTIFICATION code {}", c)))?,
    };
    if subcodes.is_empty() {
        return Ok((code_desc, None));
    }
    match subcode {
        0 => Err(ParserError::malformed(format!(
            "NOTIFICATION subcode 0 for code {}",
            code
        ))),
        s => subcodes
            .get(s as usize - 1)
            .map(|d| (code_desc, Some(*d)))
            .ok_or_else(|| {
                ParserError::malformed(format!("unknown NOTIFICATION subcode {}/{}", code, s))
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptions() {
        assert_eq!(
            notification_description(1, 2).unwrap(),
            ("message header error", Some("bad message length"))
        );
        assert_eq!(
            notification_description(3, 11).unwrap(),
            ("UPDATE message error", Some("malformed AS_PATH"))
        );
        assert_eq!(
            notification_description(4, 0).unwrap(),
            ("hold timer expired", None)
        );
        assert_eq!(
            notification_description(6, 2).unwrap().1,
            Some("administrative shutdown")
        );
    }

    #[test]
    fn test_zero_index_rejected() {
        assert!(notification_description(0, 1).is_err());
        assert!(notification_description(2, 0).is_err());
        assert!(notification_description(7, 1).is_err());
        assert!(notification_description(1, 4).is_err());
    }

    #[test]
    fn test_error_code_enum() {
        assert_eq!(BgpErrorCode::from(6u8), BgpErrorCode::Cease);
        assert_eq!(BgpErrorCode::from(9u8), BgpErrorCode::Unknown(9));
    }
}

/*!
error module defines the error types used in rtkit.

Decoding failures fall into a small number of classes:

* [ParserError::Malformed]: a length or flag field contradicts the protocol rules; fatal for
  the current message, but outer framing can still skip to the next one.
* [ParserError::Truncated]: fewer bytes are available than a just-read length field promises.
* [ParserError::NotThisProtocol]: the bytes belong to some other protocol; a routine filtering
  signal rather than a failure.

Unrecognized but well-formed values (unknown attribute, TLV or LSA types) are not errors at
all. They are carried in the data model as raw bytes.
*/
use num_enum::{TryFromPrimitive, TryFromPrimitiveError};
use oneio::OneIoError;
use std::fmt::{Display, Formatter};
use std::{error::Error, fmt, io};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParserError {
    /// A field is inconsistent with the protocol rules, e.g. an attribute whose value length
    /// is not a multiple of its record size.
    ///
    /// ## Occurs during:
    ///  - Parsing of any message body
    #[error("malformed message: {0}")]
    Malformed(String),
    /// Fewer bytes are available than the message claims.
    ///
    /// ## Occurs during:
    ///  - Any bounded read through [crate::parser::ReadUtils]
    ///  - Reading an MRT record whose header or payload ends early
    #[error("truncated message: {needed} bytes needed, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },
    /// The input is not a frame of the named protocol.
    ///
    /// ## Occurs during:
    ///  - IS-IS frame decoding (LLC/NLPID signature mismatch)
    ///  - OSPF packet decoding (IP protocol number is not 89)
    #[error("not a {0} frame")]
    NotThisProtocol(&'static str),
    /// This error represents a [num_enum::TryFromPrimitiveError] error for any of a number of
    /// different types.
    #[error("unrecognized value {value} for {type_name}")]
    UnrecognizedEnumVariant { type_name: &'static str, value: u64 },
    /// The MRT record type or subtype has no body decoder. The record still frames correctly.
    #[error("unsupported: {0}")]
    Unsupported(String),
    /// A general IO error triggered by the internal reader.
    #[error(transparent)]
    IoError(#[from] io::Error),
    #[error(transparent)]
    OneIoError(#[from] OneIoError),
    /// The peer closed the connection (a read returned zero bytes) while the live-stream
    /// framer was waiting for more data.
    #[error("connection closed by peer")]
    ConnectionClosed,
    /// Normal end of an MRT stream: no bytes where the next record header was expected.
    #[error("end of stream")]
    EofExpected,
}

impl ParserError {
    /// Shorthand used by decoders for [ParserError::Malformed].
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        ParserError::Malformed(msg.into())
    }

    /// `true` for the routine "these bytes belong to some other protocol" signal.
    pub fn is_not_this_protocol(&self) -> bool {
        matches!(self, ParserError::NotThisProtocol(_))
    }

    pub fn is_truncated(&self) -> bool {
        matches!(self, ParserError::Truncated { .. })
    }
}

impl<T> From<TryFromPrimitiveError<T>> for ParserError
where
    T: TryFromPrimitive,
    T::Primitive: Into<u64>,
{
    #[inline]
    fn from(value: TryFromPrimitiveError<T>) -> Self {
        ParserError::UnrecognizedEnumVariant {
            type_name: T::NAME,
            value: value.number.into(),
        }
    }
}

/// A [ParserError] together with the raw bytes of the record that failed, if they could be
/// recovered. Used by the MRT iterators for core dumps.
#[derive(Debug)]
pub struct ParserErrorWithBytes {
    pub error: ParserError,
    pub bytes: Option<Vec<u8>>,
}

impl Display for ParserErrorWithBytes {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl Error for ParserErrorWithBytes {}

impl From<ParserError> for ParserErrorWithBytes {
    fn from(error: ParserError) -> Self {
        ParserErrorWithBytes { error, bytes: None }
    }
}

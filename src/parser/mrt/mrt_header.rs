use crate::models::{CommonHeader, EntryType, MRT_HEADER_LEN};
use crate::ParserError;
use bytes::{BufMut, Bytes, BytesMut};
use std::io::{ErrorKind, Read};
use zerocopy::byteorder::{NetworkEndian, U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// On-wire layout of the fixed 12-byte MRT header.
#[derive(FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
struct RawMrtCommonHeader {
    timestamp: U32<NetworkEndian>,
    entry_type: U16<NetworkEndian>,
    entry_subtype: U16<NetworkEndian>,
    length: U32<NetworkEndian>,
}

/// Fill `buf` from `input`, stopping early only at end of stream. Returns the number of
/// bytes read.
pub(crate) fn read_full<T: Read>(input: &mut T, buf: &mut [u8]) -> Result<usize, ParserError> {
    let mut filled = 0;
    while filled < buf.len() {
        match input.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(ParserError::IoError(e)),
        }
    }
    Ok(filled)
}

/// MRT common header [RFC6396][header].
///
/// [header]: https://tools.ietf.org/html/rfc6396#section-2
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                           Timestamp                           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |             Type              |            Subtype            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                             Length                            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                      Message... (variable)
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// Finding no bytes at all where a header should start is the normal end of a stream and
/// yields [ParserError::EofExpected]. A header cut short is [ParserError::Truncated].
pub fn parse_common_header<T: Read>(input: &mut T) -> Result<CommonHeader, ParserError> {
    let mut raw_bytes = [0u8; MRT_HEADER_LEN];
    match read_full(input, &mut raw_bytes)? {
        0 => return Err(ParserError::EofExpected),
        n if n < MRT_HEADER_LEN => {
            return Err(ParserError::Truncated {
                needed: MRT_HEADER_LEN,
                remaining: n,
            })
        }
        _ => {}
    }
    let raw = RawMrtCommonHeader::read_from_bytes(&raw_bytes[..])
        .map_err(|_| ParserError::malformed("MRT header size mismatch"))?;

    let entry_type = EntryType::from(raw.entry_type.get());
    // the length field does not include the length of the common header
    let mut length = raw.length.get();

    let microsecond_timestamp = match entry_type.has_extended_timestamp() {
        true => {
            // The on-wire length of an ET record counts the microsecond field that lives in
            // the header. `length` is kept as the message length only.
            if length < 4 {
                // step over the short body so the next header is read from its boundary
                let mut skip = [0u8; 4];
                read_full(input, &mut skip[..length as usize])?;
                return Err(ParserError::malformed(format!(
                    "MRT length {} too short for an extended timestamp record",
                    length
                )));
            }
            length -= 4;
            let mut micros = [0u8; 4];
            let n = read_full(input, &mut micros)?;
            if n < micros.len() {
                return Err(ParserError::Truncated {
                    needed: micros.len(),
                    remaining: n,
                });
            }
            Some(u32::from_be_bytes(micros))
        }
        false => None,
    };

    Ok(CommonHeader {
        timestamp: raw.timestamp.get(),
        microsecond_timestamp,
        entry_type,
        entry_subtype: raw.entry_subtype.get(),
        length,
    })
}

impl CommonHeader {
    pub fn encode(&self) -> Bytes {
        let on_wire_length = match self.microsecond_timestamp {
            Some(_) => self.length + 4,
            None => self.length,
        };
        let raw = RawMrtCommonHeader {
            timestamp: U32::new(self.timestamp),
            entry_type: U16::new(self.entry_type.into()),
            entry_subtype: U16::new(self.entry_subtype),
            length: U32::new(on_wire_length),
        };
        let mut bytes = BytesMut::with_capacity(MRT_HEADER_LEN + 4);
        bytes.put_slice(raw.as_bytes());
        if let Some(microseconds) = self.microsecond_timestamp {
            bytes.put_u32(microseconds);
        }
        bytes.freeze()
    }
}

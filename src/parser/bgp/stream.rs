//! Framing of a live BGP byte stream.
//!
//! Bytes arrive from a socket in arbitrary chunks. [BgpStreamFramer] buffers them and cuts out
//! one complete marker-delimited message at a time, resynchronising on the 16-byte marker
//! whenever the stream contains garbage.
use bytes::{Buf, Bytes, BytesMut};
use log::warn;
use std::io::Read;

use crate::error::ParserError;
use crate::models::*;
use crate::parser::bgp::messages::parse_bgp_message_body;

const READ_CHUNK_SIZE: usize = 8192;

/// One framed message as it came off the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBgpMessage {
    pub msg_type: u8,
    /// Total length, header included.
    pub length: u16,
    /// The whole message, marker included.
    pub bytes: Bytes,
}

impl RawBgpMessage {
    pub fn body(&self) -> Bytes {
        self.bytes.slice(BGP_HEADER_LEN..)
    }

    pub fn parse(&self) -> Result<BgpMessage, ParserError> {
        parse_bgp_message_body(self.msg_type, self.body())
    }
}

/// Resumable framer over a receive buffer.
///
/// State is only the buffered bytes, so a framer can be fed from one reader for its whole
/// life or have bytes pushed into it from elsewhere.
#[derive(Debug, Default)]
pub struct BgpStreamFramer {
    buffer: BytesMut,
}

impl BgpStreamFramer {
    pub fn new() -> BgpStreamFramer {
        BgpStreamFramer::default()
    }

    /// Append received bytes.
    pub fn push(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Number of bytes buffered but not yet returned as part of a message.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Cut the next complete message out of the buffer, if one is there.
    ///
    /// Bytes in front of a marker are discarded as noise. A marker followed by an impossible
    /// length is treated as noise too: one byte is dropped and the search restarts.
    pub fn next_message(&mut self) -> Option<RawBgpMessage> {
        loop {
            let pos = match find_marker(&self.buffer) {
                Some(pos) => pos,
                None => {
                    // keep a tail that may be the start of a marker split across reads
                    let keep = BGP_MARKER_LEN - 1;
                    if self.buffer.len() > keep {
                        let drop = self.buffer.len() - keep;
                        warn!("no BGP marker found, discarding {} bytes", drop);
                        self.buffer.advance(drop);
                    }
                    return None;
                }
            };
            if pos > 0 {
                warn!("discarding {} unsynchronised bytes before BGP marker", pos);
                self.buffer.advance(pos);
            }

            if self.buffer.len() < BGP_HEADER_LEN {
                return None;
            }
            let length = u16::from_be_bytes([self.buffer[16], self.buffer[17]]);
            if !(BGP_HEADER_LEN..=BGP_MAX_MESSAGE_LEN).contains(&(length as usize)) {
                warn!("invalid BGP message length {}, resynchronising", length);
                self.buffer.advance(1);
                continue;
            }
            if self.buffer.len() < length as usize {
                return None;
            }

            let msg_type = self.buffer[18];
            let bytes = self.buffer.split_to(length as usize).freeze();
            return Some(RawBgpMessage {
                msg_type,
                length,
                bytes,
            });
        }
    }

    /// Read from `reader` until one complete message is buffered and return it.
    ///
    /// A read returning zero bytes means the peer closed the connection and fails with
    /// [ParserError::ConnectionClosed].
    pub fn extract_next_message<R: Read>(
        &mut self,
        reader: &mut R,
    ) -> Result<RawBgpMessage, ParserError> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        loop {
            if let Some(msg) = self.next_message() {
                return Ok(msg);
            }
            let n = match reader.read(&mut chunk) {
                Ok(0) => return Err(ParserError::ConnectionClosed),
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            self.push(&chunk[..n]);
        }
    }
}

fn find_marker(data: &[u8]) -> Option<usize> {
    data.windows(BGP_MARKER_LEN)
        .position(|w| w == BGP_MARKER.as_slice())
}

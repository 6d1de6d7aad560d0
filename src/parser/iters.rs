/*!
Iterators over the records of an [RtkitParser].

Both iterators skip records that fail to decode and keep going as long as the outer MRT
framing stays intact. They stop at the end of the stream, on I/O errors and on truncated
records, since neither leaves a next header to resynchronize on.
*/
use crate::error::{ParserError, ParserErrorWithBytes};
use crate::models::MrtRecord;
use crate::parser::{RawMrtRecord, RtkitParser};
use log::{error, warn};
use std::io::Read;

const CORE_DUMP_FILE: &str = "mrt_core_dump";

impl<R: Read> IntoIterator for RtkitParser<R> {
    type Item = MrtRecord;
    type IntoIter = RecordIterator<R>;

    fn into_iter(self) -> Self::IntoIter {
        RecordIterator::new(self)
    }
}

impl<R> RtkitParser<R> {
    pub fn into_record_iter(self) -> RecordIterator<R> {
        RecordIterator::new(self)
    }

    pub fn into_raw_record_iter(self) -> RawRecordIterator<R> {
        RawRecordIterator::new(self)
    }
}

enum Next {
    Skip,
    Stop,
}

fn write_core_dump(bytes: &[u8]) {
    if let Err(e) = std::fs::write(CORE_DUMP_FILE, bytes) {
        error!("unable to write {}: {}", CORE_DUMP_FILE, e);
    }
}

/// Decide what to do after a record failed to decode. Decode failures are skipped unless a
/// core dump was requested, in which case the record's bytes are dumped and iteration ends.
fn handle_error<R>(parser: &RtkitParser<R>, e: ParserErrorWithBytes) -> Next {
    match e.error {
        ParserError::EofExpected => Next::Stop,
        ParserError::Unsupported(msg) => {
            if parser.options.show_warnings {
                warn!("skipping record: {}", msg);
            }
            Next::Skip
        }
        err @ (ParserError::Malformed(_)
        | ParserError::Truncated { .. }
        | ParserError::UnrecognizedEnumVariant { .. }
        | ParserError::NotThisProtocol(_)) => {
            if parser.options.show_warnings {
                warn!("parser error: {}", err);
            }
            if parser.core_dump {
                if let Some(bytes) = e.bytes {
                    write_core_dump(&bytes);
                }
                return Next::Stop;
            }
            Next::Skip
        }
        err => {
            error!("stopping: {}", err);
            if parser.core_dump {
                if let Some(bytes) = e.bytes {
                    write_core_dump(&bytes);
                }
            }
            Next::Stop
        }
    }
}

/// Iterator over decoded [MrtRecord]s.
pub struct RecordIterator<R> {
    parser: RtkitParser<R>,
    count: u64,
}

impl<R> RecordIterator<R> {
    fn new(parser: RtkitParser<R>) -> Self {
        RecordIterator { parser, count: 0 }
    }

    /// Number of records read so far, skipped ones included.
    pub fn count_read(&self) -> u64 {
        self.count
    }
}

impl<R: Read> Iterator for RecordIterator<R> {
    type Item = MrtRecord;

    fn next(&mut self) -> Option<MrtRecord> {
        loop {
            let result = self.parser.next_raw_record();
            let raw = match result {
                Ok(raw) => raw,
                Err(e) if e.error.is_truncated() => {
                    // the stream ended inside a record
                    error!("stopping: {}", e.error);
                    if self.parser.core_dump {
                        if let Some(bytes) = e.bytes {
                            write_core_dump(&bytes);
                        }
                    }
                    return None;
                }
                Err(e) => match handle_error(&self.parser, e) {
                    Next::Skip => continue,
                    Next::Stop => return None,
                },
            };
            self.count += 1;
            match raw.parse() {
                Ok(record) => return Some(record),
                Err(error) => {
                    let e = ParserErrorWithBytes {
                        error,
                        bytes: Some(raw.raw_bytes().to_vec()),
                    };
                    match handle_error(&self.parser, e) {
                        Next::Skip => continue,
                        Next::Stop => return None,
                    }
                }
            }
        }
    }
}

/// Iterator over framed but undecoded [RawMrtRecord]s.
pub struct RawRecordIterator<R> {
    parser: RtkitParser<R>,
}

impl<R> RawRecordIterator<R> {
    fn new(parser: RtkitParser<R>) -> Self {
        RawRecordIterator { parser }
    }
}

impl<R: Read> Iterator for RawRecordIterator<R> {
    type Item = RawMrtRecord;

    fn next(&mut self) -> Option<RawMrtRecord> {
        match self.parser.next_raw_record() {
            Ok(raw) => Some(raw),
            Err(e) => {
                if !matches!(e.error, ParserError::EofExpected) {
                    error!("stopping: {}", e.error);
                    if self.parser.core_dump {
                        if let Some(bytes) = e.bytes {
                            write_core_dump(&bytes);
                        }
                    }
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::*;
    use bytes::{BufMut, BytesMut};
    use std::io::Cursor;
    use std::net::Ipv4Addr;

    fn state_change(ts: u32) -> MrtRecord {
        MrtRecord::new(
            ts,
            EntryType::BGP,
            3,
            MrtMessage::Bgp(MrtBgpMessage::StateChange {
                peer_as: 65000,
                peer_ip: Ipv4Addr::new(192, 0, 2, 1),
                old_state: BgpState::Active,
                new_state: BgpState::OpenSent,
            }),
        )
    }

    fn stream() -> Vec<u8> {
        let mut data = BytesMut::new();
        data.put_slice(&state_change(1).encode());
        // unsupported type
        data.put_slice(&CommonHeader::new(2, EntryType::TABLE_DUMP_V2, 1, 2).encode());
        data.put_slice(&[0, 0]);
        // BGP4MP body too short to decode
        data.put_slice(&CommonHeader::new(3, EntryType::BGP4MP, 1, 2).encode());
        data.put_slice(&[0, 0]);
        data.put_slice(&state_change(4).encode());
        data.to_vec()
    }

    #[test]
    fn test_record_iter_skips_bad_records() {
        let parser = RtkitParser::from_reader(Cursor::new(stream())).disable_warnings();
        let timestamps: Vec<u32> = parser
            .into_record_iter()
            .map(|r| r.common_header.timestamp)
            .collect();
        assert_eq!(timestamps, vec![1, 4]);
    }

    #[test]
    fn test_raw_iter_yields_every_record() {
        let parser = RtkitParser::from_reader(Cursor::new(stream()));
        let raws: Vec<RawMrtRecord> = parser.into_raw_record_iter().collect();
        assert_eq!(raws.len(), 4);
        assert_eq!(raws[1].common_header.entry_type, EntryType::TABLE_DUMP_V2);
        assert_eq!(raws[1].total_bytes_len(), 14);
    }

    #[test]
    fn test_short_et_record_keeps_alignment() {
        let mut data = BytesMut::new();
        data.put_slice(&state_change(1).encode());
        // BGP4MP_ET with an on-wire length that cannot hold the microsecond field
        data.put_slice(&[0, 0, 0, 2, 0, 17, 0, 4, 0, 0, 0, 2, 0xde, 0xad]);
        data.put_slice(&state_change(3).encode());
        let timestamps: Vec<u32> = RtkitParser::from_reader(Cursor::new(data.to_vec()))
            .disable_warnings()
            .into_record_iter()
            .map(|r| r.common_header.timestamp)
            .collect();
        assert_eq!(timestamps, vec![1, 3]);
    }

    #[test]
    fn test_truncated_tail_stops() {
        let mut data = state_change(1).encode().to_vec();
        data.extend_from_slice(&state_change(2).encode()[..15]);
        let records: Vec<MrtRecord> = RtkitParser::from_reader(Cursor::new(data))
            .into_iter()
            .collect();
        assert_eq!(records.len(), 1);
    }
}

/*!
Decoders for BGP, IS-IS, OSPFv2 and MRT, with the matching encoders alongside, plus the
[RtkitParser] reader facade over MRT streams.
*/
use std::io::Read;

pub mod utils;
pub mod bgp;
pub mod isis;
pub mod iters;
pub mod mrt;
pub mod ospf;

pub use self::utils::*;
pub use bgp::{parse_bgp_message, parse_bgp_message_body, BgpStreamFramer};
pub use isis::{parse_isis_frame, parse_isis_pdu};
pub use iters::{RawRecordIterator, RecordIterator};
pub use mrt::{
    chunk_mrt_record, parse_common_header, parse_mrt_body, parse_mrt_record, RawMrtRecord,
};
pub use ospf::{decode_ospf_packet, parse_ospf_packet};

pub use crate::error::{ParserError, ParserErrorWithBytes};
use crate::models::MrtRecord;

/// Reader facade over a stream of MRT records.
pub struct RtkitParser<R> {
    reader: R,
    core_dump: bool,
    options: ParserOptions,
}

#[derive(Debug, Clone, Copy)]
pub struct ParserOptions {
    /// Log a warning for every record that is skipped.
    pub show_warnings: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            show_warnings: true,
        }
    }
}

impl RtkitParser<Box<dyn Read + Send>> {
    /// Open a local file, decompressing `.gz` and `.bz2` transparently.
    pub fn new(path: &str) -> Result<Self, ParserErrorWithBytes> {
        let reader = oneio::get_reader(path).map_err(ParserError::from)?;
        Ok(RtkitParser {
            reader,
            core_dump: false,
            options: ParserOptions::default(),
        })
    }
}

impl<R: Read> RtkitParser<R> {
    /// Creating a new parser from a object that implements [Read] trait.
    pub fn from_reader(reader: R) -> Self {
        RtkitParser {
            reader,
            core_dump: false,
            options: ParserOptions::default(),
        }
    }

    /// Read and decode the next record.
    pub fn next_record(&mut self) -> Result<MrtRecord, ParserErrorWithBytes> {
        parse_mrt_record(&mut self.reader)
    }

    /// Read the next record without decoding its body.
    pub fn next_raw_record(&mut self) -> Result<RawMrtRecord, ParserErrorWithBytes> {
        chunk_mrt_record(&mut self.reader)
    }
}

impl<R> RtkitParser<R> {
    /// Write the bytes of the first record that fails to decode to `mrt_core_dump` and stop.
    pub fn enable_core_dump(self) -> Self {
        RtkitParser {
            reader: self.reader,
            core_dump: true,
            options: self.options,
        }
    }

    pub fn disable_warnings(self) -> Self {
        let mut options = self.options;
        options.show_warnings = false;
        RtkitParser {
            reader: self.reader,
            core_dump: self.core_dump,
            options,
        }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::*;
    use std::io::Cursor;
    use std::net::Ipv4Addr;

    #[test]
    fn test_from_reader() {
        let record = MrtRecord::new(
            10,
            EntryType::BGP,
            3,
            MrtMessage::Bgp(MrtBgpMessage::StateChange {
                peer_as: 1,
                peer_ip: Ipv4Addr::new(10, 0, 0, 1),
                old_state: BgpState::Idle,
                new_state: BgpState::Connect,
            }),
        );
        let mut parser = RtkitParser::from_reader(Cursor::new(record.encode().to_vec()));
        assert_eq!(parser.next_record().unwrap(), record);
        assert!(matches!(
            parser.next_record().unwrap_err().error,
            ParserError::EofExpected
        ));
    }

    #[test]
    fn test_builder_options() {
        let parser = RtkitParser::from_reader(Cursor::new(vec![]))
            .disable_warnings()
            .enable_core_dump();
        assert!(!parser.options().show_warnings);
        assert!(parser.core_dump);
    }

    #[test]
    fn test_missing_file() {
        assert!(RtkitParser::new("/nonexistent/rtkit/updates.mrt").is_err());
    }
}

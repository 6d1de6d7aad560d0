//! Filter an MRT stream down to the records whose bodies decode.
use crate::error::ParserError;
use crate::parser::utils::hex_dump;
use crate::parser::RtkitParser;
use log::{debug, warn};
use std::io::{Read, Write};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CleanStats {
    pub clean: u64,
    pub dirty: u64,
}

/// Copy every record of `reader` whose body decodes into `writer`, byte for byte.
///
/// Records that fail to decode are dropped and counted as dirty. A truncated final record
/// counts as dirty and ends the stream.
pub fn clean<R: Read, W: Write>(reader: R, writer: &mut W) -> Result<CleanStats, ParserError> {
    let mut parser = RtkitParser::from_reader(reader);
    let mut stats = CleanStats::default();
    loop {
        let raw = match parser.next_raw_record() {
            Ok(raw) => raw,
            Err(e) => match e.error {
                ParserError::EofExpected => break,
                ParserError::Truncated { .. } => {
                    warn!("record {} truncated: {}", stats.clean + stats.dirty + 1, e.error);
                    stats.dirty += 1;
                    break;
                }
                error => return Err(error),
            },
        };
        match raw.parse() {
            Ok(_) => {
                writer.write_all(&raw.raw_bytes())?;
                stats.clean += 1;
            }
            Err(e) => {
                warn!("record {} dirty: {}", stats.clean + stats.dirty + 1, e);
                debug!("\n{}", hex_dump(&raw.raw_bytes()));
                stats.dirty += 1;
            }
        }
    }
    writer.flush()?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::mrt_writer::write_record;
    use crate::models::EntryType;

    #[test]
    fn test_clean_drops_undecodable() {
        let mut input = vec![];
        // BGP4MP state change, IPv4
        let state_change = [
            0, 1, 0, 2, 0, 0, 0, 1, 192, 0, 2, 1, 192, 0, 2, 2, 0, 1, 0, 6,
        ];
        write_record(&mut input, 1, EntryType::BGP4MP, 0, &state_change).unwrap();
        // same body cut short
        write_record(&mut input, 2, EntryType::BGP4MP, 0, &state_change[..10]).unwrap();
        write_record(&mut input, 3, EntryType::BGP4MP, 0, &state_change).unwrap();

        let mut output = vec![];
        let stats = clean(&input[..], &mut output).unwrap();
        assert_eq!(stats, CleanStats { clean: 2, dirty: 1 });
        assert_eq!(output.len(), 2 * (12 + state_change.len()));
        assert_eq!(&output[..12 + state_change.len()], &input[..12 + state_change.len()]);
    }

    #[test]
    fn test_clean_truncated_tail() {
        // legacy BGP KEEPALIVE: peer and local AS/address, no body
        let keepalive = [0, 1, 192, 0, 2, 1, 0, 2, 192, 0, 2, 2];
        let mut input = vec![];
        write_record(&mut input, 1, EntryType::BGP, 7, &keepalive).unwrap();
        write_record(&mut input, 2, EntryType::BGP, 7, &keepalive).unwrap();
        input.truncate(input.len() - 4);

        let mut output = vec![];
        let stats = clean(&input[..], &mut output).unwrap();
        assert_eq!(stats, CleanStats { clean: 1, dirty: 1 });
    }
}

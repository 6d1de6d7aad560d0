/*!
Provides IO utility functions for read bytes of different length and converting to corresponding structs,
plus the textual helpers used when printing decoded messages.
*/
use std::net::{Ipv4Addr, Ipv6Addr};

use crate::models::*;
use bytes::{Buf, Bytes};
use itertools::Itertools;

use crate::error::ParserError;

impl ReadUtils for Bytes {}

/// Bounds-checked cursor reads over a [Buf]. Every read fails with
/// [ParserError::Truncated] instead of panicking when the buffer runs short.
pub trait ReadUtils: Buf {
    #[inline]
    fn has_n_remaining(&self, n: usize) -> Result<(), ParserError> {
        if self.remaining() < n {
            Err(ParserError::Truncated {
                needed: n,
                remaining: self.remaining(),
            })
        } else {
            Ok(())
        }
    }

    #[inline]
    fn read_u8(&mut self) -> Result<u8, ParserError> {
        self.has_n_remaining(1)?;
        Ok(self.get_u8())
    }

    #[inline]
    fn read_u16(&mut self) -> Result<u16, ParserError> {
        self.has_n_remaining(2)?;
        Ok(self.get_u16())
    }

    #[inline]
    fn read_u32(&mut self) -> Result<u32, ParserError> {
        self.has_n_remaining(4)?;
        Ok(self.get_u32())
    }

    #[inline]
    fn read_u64(&mut self) -> Result<u64, ParserError> {
        self.has_n_remaining(8)?;
        Ok(self.get_u64())
    }

    fn read_ipv4_address(&mut self) -> Result<Ipv4Addr, ParserError> {
        let addr = self.read_u32()?;
        Ok(Ipv4Addr::from(addr))
    }

    fn read_ipv6_address(&mut self) -> Result<Ipv6Addr, ParserError> {
        self.has_n_remaining(16)?;
        let buf = self.get_u128();
        Ok(Ipv6Addr::from(buf))
    }

    /// Read a fixed-size array, e.g. a 6-byte system ID or MAC address.
    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], ParserError> {
        self.has_n_remaining(N)?;
        let mut buf = [0u8; N];
        self.copy_to_slice(&mut buf);
        Ok(buf)
    }

    fn read_n_bytes(&mut self, n_bytes: usize) -> Result<Bytes, ParserError> {
        self.has_n_remaining(n_bytes)?;
        Ok(self.copy_to_bytes(n_bytes))
    }

    /// Read a `{length_in_bits, ceil(bits/8) octets}` prefix. The octets are kept exactly as
    /// they appear on the wire, padding included.
    fn read_prefix(&mut self) -> Result<Prefix, ParserError> {
        let bits = self.read_u8()?;
        let octets = self.read_n_bytes(Prefix::octets_len(bits))?;
        Ok(Prefix { bits, octets })
    }
}

/// Read prefixes until the input is exhausted.
///
/// The prefix count is never carried on the wire; the list simply fills its section.
pub fn parse_prefix_list(mut input: Bytes) -> Result<Vec<Prefix>, ParserError> {
    let mut prefixes = vec![];
    while input.has_remaining() {
        prefixes.push(input.read_prefix()?);
    }
    Ok(prefixes)
}

/// Format a MAC address as `aa:bb:cc:dd:ee:ff`.
pub fn mac_to_string(mac: &[u8]) -> String {
    mac.iter().map(|b| format!("{:02x}", b)).join(":")
}

/// Format an IS-IS system, LAN or LSP identifier in the usual dotted form: the first six
/// octets as `xxxx.xxxx.xxxx` followed by any pseudonode/fragment octets as `.nn` / `-nn`.
pub fn sys_id_to_string(id: &[u8]) -> String {
    let sys = id[..id.len().min(6)].chunks(2).map(hex::encode).join(".");
    match id.len() {
        7 => format!("{}.{:02x}", sys, id[6]),
        8 => format!("{}.{:02x}-{:02x}", sys, id[6], id[7]),
        _ => sys,
    }
}

/// Hex dump for diagnostics: 16 bytes per line, each line prefixed with its offset.
pub fn hex_dump(data: &[u8]) -> String {
    data.chunks(16)
        .enumerate()
        .map(|(i, chunk)| {
            let groups = chunk.chunks(4).map(hex::encode).join(" ");
            format!("{:08x}  {}", i * 16, groups)
        })
        .join("\n")
}

/// Binary dump for diagnostics: 4 bytes per line, bits grouped by octet.
pub fn binary_dump(data: &[u8]) -> String {
    data.chunks(4)
        .enumerate()
        .map(|(i, chunk)| {
            let bits = chunk.iter().map(|b| format!("{:08b}", b)).join(" ");
            format!("{:08x}  {}", i * 4, bits)
        })
        .join("\n")
}

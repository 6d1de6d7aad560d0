//! Prefix table rebuilt from a stream of UPDATEs, and its export as TABLE_DUMP records.
//!
//! The table is keyed by prefix, padding bits ignored. Withdrawals delete, advertisements
//! overwrite, so applying records in timestamp order leaves the last advertisement of every
//! prefix that has not been withdrawn since.
use crate::encoder::mrt_writer::{timestamped_file_name, unused_path};
use crate::error::ParserError;
use crate::models::*;
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

/// Status written into every dumped entry.
pub const TABLE_DUMP_STATUS: u8 = 1;

/// What the table holds for one prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteTableEntry {
    pub prefix: Prefix,
    /// Time of the advertisement, written out as the entry's originated time.
    pub timestamp: u32,
    pub peer_ip: Ipv4Addr,
    pub peer_as: u16,
    pub attributes: Attributes,
}

#[derive(Debug, Default, Clone)]
pub struct PrefixTable {
    entries: BTreeMap<Prefix, RouteTableEntry>,
}

impl PrefixTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, prefix: &Prefix) -> Option<&RouteTableEntry> {
        self.entries.get(prefix)
    }

    /// Entries in prefix order.
    pub fn iter(&self) -> impl Iterator<Item = &RouteTableEntry> {
        self.entries.values()
    }

    /// Apply one UPDATE received from `peer_ip`/`peer_as` at `timestamp`.
    ///
    /// Withdrawing a prefix the table does not hold is not an error.
    pub fn apply_update(
        &mut self,
        timestamp: u32,
        peer_ip: Ipv4Addr,
        peer_as: u16,
        update: &BgpUpdateMessage,
    ) {
        for prefix in &update.withdrawn_prefixes {
            if self.entries.remove(prefix).is_none() {
                debug!("withdrawal of {} not in table", prefix);
            }
        }
        for prefix in &update.announced_prefixes {
            self.entries.insert(
                prefix.clone(),
                RouteTableEntry {
                    prefix: prefix.clone(),
                    timestamp,
                    peer_ip,
                    peer_as,
                    attributes: update.attributes.clone(),
                },
            );
        }
    }

    /// Apply the UPDATE carried by a `BGP` UPDATE record or a `BGP4MP` MESSAGE record.
    /// Returns whether the record carried one.
    pub fn apply_record(&mut self, record: &MrtRecord) -> bool {
        let timestamp = record.common_header.timestamp;
        match &record.message {
            MrtMessage::Bgp(MrtBgpMessage::Message {
                subtype: MrtBgpType::UPDATE,
                peer_as,
                peer_ip,
                message: BgpMessage::Update(update),
                ..
            }) => {
                self.apply_update(timestamp, *peer_ip, *peer_as, update);
                true
            }
            MrtMessage::Bgp4Mp(Bgp4Mp::Message(Bgp4MpMessage {
                msg_type: Bgp4MpType::Message,
                peer_asn,
                peer_ip: IpAddr::V4(peer_ip),
                bgp_message: BgpMessage::Update(update),
                ..
            })) => {
                self.apply_update(timestamp, *peer_ip, *peer_asn, update);
                true
            }
            _ => false,
        }
    }

    /// Load an entry from an existing IPv4 TABLE_DUMP record. Returns whether one was loaded.
    pub fn seed_from_record(&mut self, record: &MrtRecord) -> bool {
        let MrtMessage::TableDump(entry) = &record.message else {
            return false;
        };
        let (Some(prefix), Some(peer_ip)) = (entry.nlri_prefix(), entry.peer_ipv4()) else {
            debug!("skipping non-IPv4 TABLE_DUMP entry");
            return false;
        };
        self.entries.insert(
            prefix.clone(),
            RouteTableEntry {
                prefix,
                timestamp: entry.originated_time,
                peer_ip,
                peer_as: entry.peer_asn,
                attributes: entry.attributes.clone(),
            },
        );
        true
    }

    /// One TABLE_DUMP record per entry, in prefix order, with sequence numbers from 0.
    ///
    /// The sequence number field is 16 bits wide and wraps on tables with more entries.
    /// Prefixes too long for IPv4 cannot be written and are skipped.
    pub fn snapshot(&self, as_of: u32, view_number: u16) -> Vec<MrtRecord> {
        let mut records = Vec::with_capacity(self.entries.len());
        let mut sequence_number: u16 = 0;
        for entry in self.entries.values() {
            let prefix = match entry.prefix.to_ipv4_addr() {
                Ok(addr) => addr,
                Err(e) => {
                    warn!("not dumping {}: {}", entry.prefix, e);
                    continue;
                }
            };
            let message = MrtMessage::TableDump(TableDumpMessage {
                view_number,
                sequence_number,
                prefix: IpAddr::V4(prefix),
                prefix_len: entry.prefix.bits,
                status: TABLE_DUMP_STATUS,
                originated_time: entry.timestamp,
                peer_address: IpAddr::V4(entry.peer_ip),
                peer_asn: entry.peer_as,
                attributes: entry.attributes.clone(),
            });
            records.push(MrtRecord::new(
                as_of,
                EntryType::TABLE_DUMP,
                TABLE_DUMP_AFI_IPV4,
                message,
            ));
            sequence_number = sequence_number.wrapping_add(1);
        }
        records
    }
}

/// Dump `table` as of `as_of`, in view 0.
pub fn snapshot_table(table: &PrefixTable, as_of: u32) -> Vec<MrtRecord> {
    table.snapshot(as_of, 0)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDumpConfig {
    /// Output path up to the timestamp suffix.
    pub file_prefix: PathBuf,
    /// Seconds of record time between dumps. Without one only the final dump is written.
    pub interval_secs: Option<u32>,
    pub view_number: u16,
    /// Records before this time are ignored.
    pub start_time: Option<u32>,
}

impl TableDumpConfig {
    pub fn new(file_prefix: impl Into<PathBuf>, interval_secs: Option<u32>) -> Self {
        TableDumpConfig {
            file_prefix: file_prefix.into(),
            interval_secs,
            view_number: 0,
            start_time: None,
        }
    }
}

/// Replays records into a [PrefixTable] and writes a full dump every `interval_secs` of
/// record time, each to its own file named after the time of the last record applied.
///
/// The first dump is due one interval after the start time, or after the first record
/// applied when no start time is set.
pub struct TableDumper {
    config: TableDumpConfig,
    table: PrefixTable,
    next_dump: Option<u32>,
    last_timestamp: Option<u32>,
    files: Vec<PathBuf>,
}

impl TableDumper {
    pub fn new(config: TableDumpConfig) -> Self {
        let next_dump = config
            .start_time
            .zip(config.interval_secs)
            .map(|(start, interval)| start.saturating_add(interval));
        TableDumper {
            config,
            table: PrefixTable::new(),
            next_dump,
            last_timestamp: None,
            files: vec![],
        }
    }

    /// Start from an existing table instead of an empty one.
    pub fn with_table(mut self, table: PrefixTable) -> Self {
        self.table = table;
        self
    }

    pub fn table(&self) -> &PrefixTable {
        &self.table
    }

    /// Seed the table from a TABLE_DUMP record.
    pub fn seed(&mut self, record: &MrtRecord) -> bool {
        self.table.seed_from_record(record)
    }

    /// Apply one record, then dump the table if the record's time has passed the next dump
    /// time. The record that triggers a dump is part of it.
    pub fn process(&mut self, record: &MrtRecord) -> Result<(), ParserError> {
        let timestamp = record.common_header.timestamp;
        if matches!(self.config.start_time, Some(start) if timestamp < start) {
            return Ok(());
        }
        if !self.table.apply_record(record) {
            return Ok(());
        }
        self.last_timestamp = Some(timestamp);

        let Some(interval) = self.config.interval_secs else {
            return Ok(());
        };
        let next_dump = *self
            .next_dump
            .get_or_insert(timestamp.saturating_add(interval));
        if timestamp > next_dump {
            self.dump(timestamp)?;
            self.next_dump = Some(next_dump.saturating_add(interval));
        }
        Ok(())
    }

    fn dump(&mut self, timestamp: u32) -> Result<(), ParserError> {
        let path = unused_path(
            timestamped_file_name(&self.config.file_prefix, timestamp),
            &self.files,
        );
        let mut writer = BufWriter::new(File::create(&path)?);
        let now = chrono::Utc::now().timestamp() as u32;
        for record in self.table.snapshot(now, self.config.view_number) {
            writer.write_all(&record.encode())?;
        }
        writer.flush()?;
        info!("dumped {} entries to {}", self.table.len(), path.display());
        self.files.push(path);
        Ok(())
    }

    /// Write the final dump and return every file written.
    pub fn finish(mut self) -> Result<Vec<PathBuf>, ParserError> {
        let timestamp = self
            .last_timestamp
            .unwrap_or_else(|| chrono::Utc::now().timestamp() as u32);
        self.dump(timestamp)?;
        Ok(self.files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::RtkitParser;

    fn update(withdrawn: &[Prefix], announced: &[Prefix], next_hop: [u8; 4]) -> BgpUpdateMessage {
        let attributes = [
            Attribute::new(AttrType::ORIGIN, AttributeValue::Origin(Origin::IGP)),
            Attribute::new(AttrType::NEXT_HOP, AttributeValue::NextHop(next_hop.into())),
        ]
        .into_iter()
        .collect();
        BgpUpdateMessage {
            withdrawn_prefixes: withdrawn.to_vec(),
            attributes,
            announced_prefixes: announced.to_vec(),
        }
    }

    fn pfx(a: u8, b: u8, bits: u8) -> Prefix {
        Prefix::from_ipv4(Ipv4Addr::new(a, b, 0, 0), bits).unwrap()
    }

    const PEER: Ipv4Addr = Ipv4Addr::new(192, 0, 2, 1);

    #[test]
    fn test_last_writer_wins() {
        let mut table = PrefixTable::new();
        table.apply_update(10, PEER, 65001, &update(&[], &[pfx(10, 0, 8)], [1, 1, 1, 1]));
        table.apply_update(20, PEER, 65002, &update(&[], &[pfx(10, 0, 8)], [2, 2, 2, 2]));
        assert_eq!(table.len(), 1);
        let entry = table.get(&pfx(10, 0, 8)).unwrap();
        assert_eq!(entry.timestamp, 20);
        assert_eq!(entry.peer_as, 65002);
        assert_eq!(entry.attributes.next_hop(), Some(Ipv4Addr::new(2, 2, 2, 2)));
    }

    #[test]
    fn test_withdraw_idempotent() {
        let mut table = PrefixTable::new();
        table.apply_update(
            10,
            PEER,
            1,
            &update(&[], &[pfx(10, 0, 8), pfx(172, 16, 12)], [1, 1, 1, 1]),
        );
        let withdraw = update(&[pfx(10, 0, 8)], &[], [1, 1, 1, 1]);
        table.apply_update(11, PEER, 1, &withdraw);
        assert_eq!(table.len(), 1);
        table.apply_update(12, PEER, 1, &withdraw);
        assert_eq!(table.len(), 1);
        assert!(table.get(&pfx(172, 16, 12)).is_some());
    }

    #[test]
    fn test_padding_bits_share_a_key() {
        let mut table = PrefixTable::new();
        let padded = Prefix::new(12, vec![10, 0x1f]).unwrap();
        let clean = Prefix::new(12, vec![10, 0x10]).unwrap();
        table.apply_update(1, PEER, 1, &update(&[], &[padded], [1, 1, 1, 1]));
        table.apply_update(2, PEER, 1, &update(&[clean.clone()], &[], [1, 1, 1, 1]));
        assert!(table.is_empty());
    }

    #[test]
    fn test_snapshot_records() {
        let mut table = PrefixTable::new();
        table.apply_update(
            100,
            PEER,
            65001,
            &update(&[], &[pfx(192, 168, 16), pfx(10, 0, 8)], [192, 0, 2, 1]),
        );
        let records = snapshot_table(&table, 500);
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.common_header.timestamp, 500);
        assert_eq!(first.common_header.entry_type, EntryType::TABLE_DUMP);
        assert_eq!(first.common_header.entry_subtype, TABLE_DUMP_AFI_IPV4);
        match &first.message {
            MrtMessage::TableDump(entry) => {
                assert_eq!(entry.sequence_number, 0);
                assert_eq!(entry.prefix, IpAddr::V4(Ipv4Addr::new(10, 0, 0, 0)));
                assert_eq!(entry.status, 1);
                assert_eq!(entry.originated_time, 100);
                let attr_len = entry.attributes.encode().len();
                assert_eq!(
                    first.common_header.length as usize,
                    attr_len + TABLE_DUMP_IPV4_HEADER_LEN
                );
            }
            other => panic!("unexpected {:?}", other),
        }

        // the dump reads back into an identical table
        let mut bytes = vec![];
        for r in &records {
            bytes.extend_from_slice(&r.encode());
        }
        let mut seeded = PrefixTable::new();
        for record in RtkitParser::from_reader(&bytes[..]) {
            assert!(seeded.seed_from_record(&record));
        }
        assert_eq!(
            seeded.iter().collect::<Vec<_>>(),
            table.iter().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_apply_record_kinds() {
        let upd = update(&[], &[pfx(10, 0, 8)], [1, 1, 1, 1]);
        let legacy = MrtRecord::new(
            5,
            EntryType::BGP,
            1,
            MrtMessage::Bgp(MrtBgpMessage::Message {
                subtype: MrtBgpType::UPDATE,
                peer_as: 1,
                peer_ip: PEER,
                local_as: 2,
                local_ip: Ipv4Addr::new(192, 0, 2, 2),
                message: BgpMessage::Update(upd.clone()),
            }),
        );
        let keepalive = MrtRecord::new(
            6,
            EntryType::BGP4MP,
            1,
            MrtMessage::Bgp4Mp(Bgp4Mp::Message(Bgp4MpMessage {
                msg_type: Bgp4MpType::Message,
                peer_asn: 1,
                local_asn: 2,
                interface_index: 0,
                peer_ip: PEER.into(),
                local_ip: Ipv4Addr::new(192, 0, 2, 2).into(),
                bgp_message: BgpMessage::KeepAlive,
            })),
        );
        let mut table = PrefixTable::new();
        assert!(table.apply_record(&legacy));
        assert!(!table.apply_record(&keepalive));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_dumper_schedule() {
        let dir = tempfile::tempdir().unwrap();
        let config = TableDumpConfig::new(dir.path().join("bview"), Some(60));
        let mut dumper = TableDumper::new(config);

        for (i, ts) in [1000u32, 1030, 1061, 1070, 1200].iter().enumerate() {
            let record = MrtRecord::new(
                *ts,
                EntryType::BGP,
                1,
                MrtMessage::Bgp(MrtBgpMessage::Message {
                    subtype: MrtBgpType::UPDATE,
                    peer_as: 1,
                    peer_ip: PEER,
                    local_as: 2,
                    local_ip: PEER,
                    message: BgpMessage::Update(update(
                        &[],
                        &[pfx(10, i as u8, 16)],
                        [1, 1, 1, 1],
                    )),
                }),
            );
            dumper.process(&record).unwrap();
        }
        assert_eq!(dumper.table().len(), 5);
        let files = dumper.finish().unwrap();
        // dumps at 1061 and 1200, then the final one
        assert_eq!(files.len(), 3);
        let first: Vec<MrtRecord> = RtkitParser::new(files[0].to_str().unwrap())
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(first.len(), 3);
        assert!(files[1].to_string_lossy().ends_with("1970-01-01_00.20.00"));
        assert!(files[2].to_string_lossy().ends_with("1970-01-01_00.20.00.1"));
    }

    #[test]
    fn test_dumper_final_only_and_start_time() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = TableDumpConfig::new(dir.path().join("final"), None);
        config.start_time = Some(50);
        let mut dumper = TableDumper::new(config);
        for ts in [10u32, 60, 5000] {
            let record = MrtRecord::new(
                ts,
                EntryType::BGP,
                1,
                MrtMessage::Bgp(MrtBgpMessage::Message {
                    subtype: MrtBgpType::UPDATE,
                    peer_as: 1,
                    peer_ip: PEER,
                    local_as: 2,
                    local_ip: PEER,
                    message: BgpMessage::Update(update(
                        &[],
                        &[pfx(10, (ts / 10) as u8, 16)],
                        [1, 1, 1, 1],
                    )),
                }),
            );
            dumper.process(&record).unwrap();
        }
        // the record before the start time is ignored
        assert_eq!(dumper.table().len(), 2);
        let files = dumper.finish().unwrap();
        assert_eq!(files.len(), 1);
    }
}

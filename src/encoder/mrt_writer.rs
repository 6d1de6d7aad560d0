//! MRT writers.
//!
//! [write_record] frames a single payload onto any [Write]. [RotatingMrtWriter] spreads a
//! stream of records over files of bounded size, starting a new file on a record boundary
//! whenever the next record would push the current one past the limit.
use crate::error::ParserError;
use crate::models::{CommonHeader, EntryType, MrtRecord};
use crate::parser::RawMrtRecord;
use chrono::DateTime;
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Smallest file size a rotating writer accepts.
pub const MIN_FILE_SIZE: u64 = 64 * 1024;
pub const DEFAULT_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Suffix appended to the file prefix, formatted from the first record's time in UTC.
const FILE_TIME_FORMAT: &str = ".%Y-%m-%d_%H.%M.%S";

/// Frame `payload` as one MRT record and write it out. Returns the number of bytes written.
pub fn write_record<W: Write>(
    writer: &mut W,
    timestamp: u32,
    entry_type: EntryType,
    entry_subtype: u16,
    payload: &[u8],
) -> Result<usize, ParserError> {
    let header = CommonHeader::new(timestamp, entry_type, entry_subtype, payload.len() as u32);
    let header_bytes = header.encode();
    writer.write_all(&header_bytes)?;
    writer.write_all(payload)?;
    Ok(header_bytes.len() + payload.len())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterConfig {
    /// Output path up to the timestamp suffix, e.g. `out/updates`.
    pub file_prefix: PathBuf,
    /// Rotation threshold in bytes, never below [MIN_FILE_SIZE].
    pub file_size: u64,
}

impl WriterConfig {
    pub fn new(file_prefix: impl Into<PathBuf>, file_size: u64) -> Self {
        let file_size = if file_size < MIN_FILE_SIZE {
            debug!(
                "file size {} below minimum, using {}",
                file_size, MIN_FILE_SIZE
            );
            MIN_FILE_SIZE
        } else {
            file_size
        };
        WriterConfig {
            file_prefix: file_prefix.into(),
            file_size,
        }
    }
}

impl Default for WriterConfig {
    fn default() -> Self {
        WriterConfig::new("mrt", DEFAULT_FILE_SIZE)
    }
}

/// Name of the file whose first record has `timestamp`.
pub fn timestamped_file_name(prefix: &Path, timestamp: u32) -> PathBuf {
    let time = DateTime::from_timestamp(timestamp as i64, 0).unwrap_or_default();
    let mut name = prefix.as_os_str().to_owned();
    name.push(time.format(FILE_TIME_FORMAT).to_string());
    PathBuf::from(name)
}

/// A first free path for `base`: `base` itself, then `base.1`, `base.2` and so on.
pub(crate) fn unused_path(base: PathBuf, taken: &[PathBuf]) -> PathBuf {
    let is_free = |p: &PathBuf| !p.exists() && !taken.contains(p);
    if is_free(&base) {
        return base;
    }
    let mut n = 1;
    loop {
        let mut name = base.as_os_str().to_owned();
        name.push(format!(".{}", n));
        let candidate = PathBuf::from(name);
        if is_free(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Size-bounded MRT writer that rotates across timestamped files.
pub struct RotatingMrtWriter {
    config: WriterConfig,
    current: Option<BufWriter<File>>,
    position: u64,
    files: Vec<PathBuf>,
}

impl RotatingMrtWriter {
    pub fn new(config: WriterConfig) -> Self {
        RotatingMrtWriter {
            config,
            current: None,
            position: 0,
            files: vec![],
        }
    }

    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Files opened so far, in order.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    fn rotate(&mut self, timestamp: u32) -> Result<(), ParserError> {
        if let Some(mut file) = self.current.take() {
            file.flush()?;
        }
        let path = unused_path(
            timestamped_file_name(&self.config.file_prefix, timestamp),
            &self.files,
        );
        info!("writing {}", path.display());
        self.current = Some(BufWriter::new(File::create(&path)?));
        self.files.push(path);
        self.position = 0;
        Ok(())
    }

    /// Write one complete record. A record larger than the size limit still goes into a
    /// file of its own.
    pub fn write_bytes(&mut self, timestamp: u32, bytes: &[u8]) -> Result<(), ParserError> {
        let len = bytes.len() as u64;
        let needs_rotation = match self.current {
            None => true,
            Some(_) => self.position > 0 && self.position + len > self.config.file_size,
        };
        if needs_rotation {
            self.rotate(timestamp)?;
        }
        if let Some(file) = self.current.as_mut() {
            file.write_all(bytes)?;
        }
        self.position += len;
        Ok(())
    }

    pub fn write_record(&mut self, record: &MrtRecord) -> Result<(), ParserError> {
        self.write_bytes(record.common_header.timestamp, &record.encode())
    }

    /// Copy a framed record as read, undecoded bodies included.
    pub fn write_raw_record(&mut self, record: &RawMrtRecord) -> Result<(), ParserError> {
        self.write_bytes(record.common_header.timestamp, &record.raw_bytes())
    }

    /// Flush the open file and return every file written.
    pub fn finish(mut self) -> Result<Vec<PathBuf>, ParserError> {
        if let Some(mut file) = self.current.take() {
            file.flush()?;
        }
        Ok(self.files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::RtkitParser;

    #[test]
    fn test_write_record() {
        let mut buf = vec![];
        let n = write_record(&mut buf, 7, EntryType::BGP, 4, &[1, 2, 3]).unwrap();
        assert_eq!(n, 15);
        assert_eq!(&buf[..12], &[0, 0, 0, 7, 0, 5, 0, 4, 0, 0, 0, 3]);
        let raw = RtkitParser::from_reader(&buf[..]).next_raw_record().unwrap();
        assert_eq!(raw.message_bytes.as_ref(), &[1, 2, 3]);
    }

    #[test]
    fn test_config_minimum() {
        assert_eq!(WriterConfig::new("x", 10).file_size, MIN_FILE_SIZE);
        assert_eq!(WriterConfig::default().file_size, DEFAULT_FILE_SIZE);
    }

    #[test]
    fn test_file_name() {
        let name = timestamped_file_name(Path::new("out/updates"), 1_000_000_000);
        assert_eq!(name, PathBuf::from("out/updates.2001-09-09_01.46.40"));
    }

    #[test]
    fn test_rotation_on_record_boundary() {
        let dir = tempfile::tempdir().unwrap();
        let config = WriterConfig::new(dir.path().join("spliced"), MIN_FILE_SIZE);
        let mut writer = RotatingMrtWriter::new(config);

        let payload = vec![0u8; 30_000 - 12];
        for ts in 0..5u32 {
            let mut record = vec![];
            write_record(&mut record, ts, EntryType::BGP, 0, &payload).unwrap();
            writer.write_bytes(ts, &record).unwrap();
        }
        let files = writer.finish().unwrap();

        // two 30000-byte records fit under 64 KiB, a third does not
        assert_eq!(files.len(), 3);
        let sizes: Vec<u64> = files
            .iter()
            .map(|f| std::fs::metadata(f).unwrap().len())
            .collect();
        assert_eq!(sizes, vec![60_000, 60_000, 30_000]);
        assert!(files[1].to_string_lossy().ends_with("1970-01-01_00.00.02"));
    }

    #[test]
    fn test_same_second_collision() {
        let dir = tempfile::tempdir().unwrap();
        let config = WriterConfig::new(dir.path().join("f"), MIN_FILE_SIZE);
        let mut writer = RotatingMrtWriter::new(config);
        let big = vec![0u8; 40_000];
        writer.write_bytes(5, &big).unwrap();
        writer.write_bytes(5, &big).unwrap();
        let files = writer.finish().unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[1].to_string_lossy().ends_with("00.00.05.1"));
    }
}

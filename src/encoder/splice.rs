//! Merge several MRT streams into one, ordered by record time.
use crate::encoder::mrt_writer::RotatingMrtWriter;
use crate::error::ParserError;
use crate::parser::RawMrtRecord;
use log::debug;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Inclusive timestamp bounds. Either side may be open.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: Option<u32>,
    pub end: Option<u32>,
}

impl TimeWindow {
    pub fn new(start: Option<u32>, end: Option<u32>) -> Self {
        TimeWindow { start, end }
    }

    pub fn contains(&self, timestamp: u32) -> bool {
        self.start.map_or(true, |s| timestamp >= s) && self.end.map_or(true, |e| timestamp <= e)
    }
}

/// Copy every record of `sources` that falls inside `window` into `writer`, earliest first.
///
/// Each source is assumed to be in time order already; records with equal timestamps keep
/// the order of their sources. Returns the number of records written.
pub fn splice<I>(
    mut sources: Vec<I>,
    window: TimeWindow,
    writer: &mut RotatingMrtWriter,
) -> Result<usize, ParserError>
where
    I: Iterator<Item = RawMrtRecord>,
{
    // (timestamp, source index) orders ties by source
    let mut heap = BinaryHeap::new();
    let mut heads: Vec<Option<RawMrtRecord>> = Vec::with_capacity(sources.len());

    for (idx, source) in sources.iter_mut().enumerate() {
        let head = next_in_window(source, &window);
        if let Some(record) = &head {
            heap.push(Reverse((record.common_header.timestamp, idx)));
        } else {
            debug!("source {} has no records in window", idx);
        }
        heads.push(head);
    }

    let mut count = 0;
    while let Some(Reverse((_, idx))) = heap.pop() {
        let Some(record) = heads[idx].take() else {
            continue;
        };
        writer.write_raw_record(&record)?;
        count += 1;

        if let Some(next) = next_in_window(&mut sources[idx], &window) {
            heap.push(Reverse((next.common_header.timestamp, idx)));
            heads[idx] = Some(next);
        }
    }
    Ok(count)
}

fn next_in_window<I>(source: &mut I, window: &TimeWindow) -> Option<RawMrtRecord>
where
    I: Iterator<Item = RawMrtRecord>,
{
    source.find(|r| window.contains(r.common_header.timestamp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::mrt_writer::{write_record, WriterConfig};
    use crate::models::EntryType;
    use crate::parser::RtkitParser;

    fn stream(timestamps: &[u32], tag: u8) -> Vec<u8> {
        let mut buf = vec![];
        for ts in timestamps {
            write_record(&mut buf, *ts, EntryType::BGP, 0, &[tag]).unwrap();
        }
        buf
    }

    fn read_back(files: &[std::path::PathBuf]) -> Vec<(u32, u8)> {
        files
            .iter()
            .flat_map(|f| {
                RtkitParser::new(f.to_str().unwrap())
                    .unwrap()
                    .into_raw_record_iter()
                    .map(|r| (r.common_header.timestamp, r.message_bytes[0]))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    #[test]
    fn test_merge_order() {
        let a = stream(&[1, 4, 4, 9], 0xa);
        let b = stream(&[2, 4, 8], 0xb);
        let dir = tempfile::tempdir().unwrap();
        let mut writer = RotatingMrtWriter::new(WriterConfig::new(dir.path().join("out"), 0));
        let sources = vec![
            RtkitParser::from_reader(&a[..]).into_raw_record_iter(),
            RtkitParser::from_reader(&b[..]).into_raw_record_iter(),
        ];
        let n = splice(sources, TimeWindow::default(), &mut writer).unwrap();
        assert_eq!(n, 7);
        let files = writer.finish().unwrap();
        assert_eq!(
            read_back(&files),
            vec![
                (1, 0xa),
                (2, 0xb),
                (4, 0xa),
                (4, 0xa),
                (4, 0xb),
                (8, 0xb),
                (9, 0xa)
            ]
        );
    }

    #[test]
    fn test_window_inclusive() {
        let a = stream(&[1, 3, 5, 7], 0xa);
        let b = stream(&[2, 6, 10], 0xb);
        let dir = tempfile::tempdir().unwrap();
        let mut writer = RotatingMrtWriter::new(WriterConfig::new(dir.path().join("out"), 0));
        let sources = vec![
            RtkitParser::from_reader(&a[..]).into_raw_record_iter(),
            RtkitParser::from_reader(&b[..]).into_raw_record_iter(),
        ];
        let n = splice(sources, TimeWindow::new(Some(3), Some(6)), &mut writer).unwrap();
        assert_eq!(n, 3);
        let files = writer.finish().unwrap();
        let timestamps: Vec<u32> = read_back(&files).into_iter().map(|(t, _)| t).collect();
        assert_eq!(timestamps, vec![3, 5, 6]);
    }

    #[test]
    fn test_window() {
        let w = TimeWindow::new(None, Some(10));
        assert!(w.contains(0));
        assert!(w.contains(10));
        assert!(!w.contains(11));
    }
}

use rtkit::encoder::{clean, splice, write_record, RotatingMrtWriter, TimeWindow, WriterConfig};
use rtkit::models::*;
use rtkit::RtkitParser;
use std::path::Path;

fn ospf_ls_ack() -> Vec<u8> {
    // remote and local address, then an OSPF header with an empty LS ack
    hex::decode("0a0000020a000001020500180a00000200000000000000000000000000000000").unwrap()
}

fn isis_psnp() -> Vec<u8> {
    hex::decode("831101001a010000001101020304050600").unwrap()
}

fn bgp4mp_keepalive(afi: u8) -> Vec<u8> {
    let mut body = hex::decode("fde9fde8000300").unwrap();
    body.push(afi);
    body.extend_from_slice(&[192, 0, 2, 1, 192, 0, 2, 2]);
    body.extend_from_slice(&[0xff; 16]);
    body.extend_from_slice(&[0, 19, 4]);
    body
}

fn bgp4mp_state_change() -> Vec<u8> {
    hex::decode("fde9fde800030001c0000201c000020200010006").unwrap()
}

/// Six records: four decodable ones around a corrupt BGP4MP record and a TABLE_DUMP_V2 record.
fn mixed_archive() -> Vec<u8> {
    let mut buf = vec![];
    write_record(&mut buf, 1, EntryType::OSPFv2, 0, &ospf_ls_ack()).unwrap();
    write_record(&mut buf, 2, EntryType::ISIS, 0, &isis_psnp()).unwrap();
    write_record(&mut buf, 3, EntryType::BGP4MP, 1, &bgp4mp_keepalive(1)).unwrap();
    write_record(&mut buf, 4, EntryType::BGP4MP, 1, &bgp4mp_keepalive(9)).unwrap();
    write_record(&mut buf, 5, EntryType::TABLE_DUMP_V2, 1, &[0, 1, 2, 3]).unwrap();
    write_record(&mut buf, 6, EntryType::BGP4MP, 0, &bgp4mp_state_change()).unwrap();
    buf
}

#[test]
fn test_decode_skips_bad_records() {
    let archive = mixed_archive();
    let records: Vec<MrtRecord> = RtkitParser::from_reader(&archive[..]).into_iter().collect();
    let timestamps: Vec<u32> = records.iter().map(|r| r.common_header.timestamp).collect();
    assert_eq!(timestamps, vec![1, 2, 3, 6]);

    let protocols: Vec<Option<Protocol>> = records
        .iter()
        .map(|r| r.message.protocol_message().map(|m| m.protocol()))
        .collect();
    assert_eq!(
        protocols,
        vec![
            Some(Protocol::Ospf),
            Some(Protocol::Isis),
            Some(Protocol::Bgp),
            None
        ]
    );

    match &records[3].message {
        MrtMessage::Bgp4Mp(Bgp4Mp::StateChange(sc)) => {
            assert_eq!(sc.peer_asn, 65001);
            assert_eq!(sc.old_state, BgpState::Idle);
            assert_eq!(sc.new_state, BgpState::Established);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_decoded_records_re_encode_exactly() {
    let archive = mixed_archive();
    let raw: Vec<_> = RtkitParser::from_reader(&archive[..])
        .into_raw_record_iter()
        .collect();
    assert_eq!(raw.len(), 6);
    let joined: Vec<u8> = raw.iter().flat_map(|r| r.raw_bytes().to_vec()).collect();
    assert_eq!(joined, archive);

    for record in raw.iter().filter_map(|r| r.parse().ok()) {
        let original = raw
            .iter()
            .find(|r| r.common_header.timestamp == record.common_header.timestamp)
            .unwrap();
        assert_eq!(record.encode(), original.raw_bytes());
    }
}

#[test]
fn test_clean_archive() {
    let archive = mixed_archive();
    let mut out = vec![];
    let stats = clean(&archive[..], &mut out).unwrap();
    assert_eq!(stats.clean, 4);
    assert_eq!(stats.dirty, 2);
    let timestamps: Vec<u32> = RtkitParser::from_reader(&out[..])
        .into_raw_record_iter()
        .map(|r| r.common_header.timestamp)
        .collect();
    assert_eq!(timestamps, vec![1, 2, 3, 6]);
}

fn write_file(path: &Path, records: &[(u32, Vec<u8>)]) {
    let mut buf = vec![];
    for (ts, body) in records {
        write_record(&mut buf, *ts, EntryType::BGP4MP, 0, body).unwrap();
    }
    std::fs::write(path, buf).unwrap();
}

#[test]
fn test_splice_files() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.mrt");
    let b = dir.path().join("b.mrt");
    write_file(&a, &[(10, bgp4mp_state_change()), (30, bgp4mp_state_change())]);
    write_file(
        &b,
        &[
            (5, bgp4mp_state_change()),
            (20, bgp4mp_state_change()),
            (40, bgp4mp_state_change()),
        ],
    );

    let sources = [&a, &b]
        .iter()
        .map(|p| {
            RtkitParser::new(p.to_str().unwrap())
                .unwrap()
                .into_raw_record_iter()
        })
        .collect();
    let mut writer = RotatingMrtWriter::new(WriterConfig::new(dir.path().join("merged"), 0));
    let count = splice(sources, TimeWindow::new(Some(10), None), &mut writer).unwrap();
    assert_eq!(count, 4);

    let files = writer.finish().unwrap();
    assert_eq!(files.len(), 1);
    assert!(files[0]
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("merged.1970-01-01_00.00.10"));
    let timestamps: Vec<u32> = RtkitParser::new(files[0].to_str().unwrap())
        .unwrap()
        .into_iter()
        .map(|r| r.common_header.timestamp)
        .collect();
    assert_eq!(timestamps, vec![10, 20, 30, 40]);
}

use std::fs;
use std::io::{Cursor, ErrorKind};
use std::path::PathBuf;

use test_case::test_case;
use ts_packets::errors::{Constraint, FieldConstraint, TSError};
use ts_packets::{
    AdaptationFieldControl, DecodeMode, OpenMode, PACKET_SIZE, PADDING_PID, SYNC_BYTE, TSPacket,
    TSReader,
};

fn packet(pid: u16, afc: u8, counter: u8) -> Vec<u8> {
    let mut buf = vec![0xFF; PACKET_SIZE];
    buf[0] = SYNC_BYTE;
    buf[1] = (pid >> 8) as u8 & 0x1F;
    buf[2] = pid as u8;
    buf[3] = (afc << 4) | (counter & 0x0F);
    // Adaptation field with no optional fields: either filling the packet or empty.
    if afc == 0b10 {
        buf[4] = 183;
        buf[5] = 0;
    } else if afc == 0b11 {
        buf[4] = 0;
    }
    buf
}

/// An adaptation-field-only packet carrying a PCR; `reserved` replaces the 6 reserved bits.
fn pcr_packet(reserved: u8) -> Vec<u8> {
    let mut buf = packet(0x0100, 0b10, 0);
    buf[5] = 0b0001_0000;
    // Base 1, extension 2.
    buf[6..12].copy_from_slice(&[0x00, 0x00, 0x00, 0x00, 0x80 | (reserved << 1), 0x02]);
    buf
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("ts-packets-{}-{}.ts", std::process::id(), name))
}

#[test]
fn n_packets_then_end_of_stream() {
    let data: Vec<u8> = (0..10).flat_map(|i| packet(i, 0b01, i as u8)).collect();
    let mut reader = TSReader::with_position("ten", Cursor::new(data), 376, 0);

    let packets: Vec<TSPacket> = reader.packets().map(|p| p.unwrap()).collect();
    assert_eq!(packets.len(), 10);
    for (i, packet) in packets.iter().enumerate() {
        assert_eq!(packet.index(), Some(i as u64));
        assert_eq!(packet.offset(), Some(376 + i as u64 * 188));
    }
    assert!(reader.read().unwrap().is_none());
}

#[test]
fn filtering_padding_out() {
    let pids = [0x0000, 0x0100, PADDING_PID, 0x0101, PADDING_PID];
    let data: Vec<u8> = pids.iter().flat_map(|&pid| packet(pid, 0b01, 0)).collect();
    let mut reader = TSReader::new("padded", Cursor::new(data));

    let wanted: Vec<u16> = reader
        .filtered([0x0000, 0x0100, 0x0101])
        .map(|p| p.unwrap())
        .filter(|p| !p.is_padding())
        .map(|p| p.pid())
        .collect();
    assert_eq!(wanted, vec![0x0000, 0x0100, 0x0101]);
}

#[test]
fn same_bytes_from_different_streams_are_equal() {
    let bytes = packet(0x0042, 0b01, 3);
    let mut first = TSReader::new("first", Cursor::new(bytes.clone()));
    let mut second = TSReader::with_position("second", Cursor::new(bytes), 0, 7);

    let a = first.read().unwrap().unwrap();
    let b = second.read().unwrap().unwrap();
    assert_ne!(a.index(), b.index());
    assert_eq!(a, b);
}

#[test_case(0b01, false, true ; "payload only")]
#[test_case(0b10, true, false ; "adaptation field only")]
#[test_case(0b11, true, true ; "adaptation field and payload")]
fn adaptation_field_control_drives_decoding(afc: u8, adaptation: bool, payload: bool) {
    let packet = TSPacket::from_bytes(&packet(0x0042, afc, 9)).unwrap();

    for mode in [DecodeMode::Validating, DecodeMode::Forgiving] {
        let decoded = packet.decode(mode).unwrap();
        let control = decoded.header().adaptation_field_control();
        assert_eq!(control, AdaptationFieldControl::from(afc));
        assert_eq!(decoded.adaptation_field().is_some(), adaptation);
        assert_eq!(control.has_adaptation_field(), adaptation);
        assert_eq!(decoded.payload().is_some(), payload);
        assert_eq!(decoded.header().continuity_counter(), 9);
        assert_eq!(decoded.header().pid(), packet.pid());
    }
}

#[test]
fn reserved_control_only_decodes_forgiving() {
    let packet = TSPacket::from_bytes(&packet(0x0042, 0b00, 0)).unwrap();
    assert!(matches!(packet.decode(DecodeMode::Validating), Err(TSError::FieldConstraint(_))));

    let decoded = packet.decode(DecodeMode::Forgiving).unwrap();
    assert!(decoded.adaptation_field().is_none());
    assert!(decoded.payload().is_none());
}

#[test]
fn corrupted_pcr_reserved_bits() {
    let good = TSPacket::from_bytes(&pcr_packet(0b11_1111)).unwrap();
    let pcr = good.decode(DecodeMode::Validating).unwrap().adaptation_field().as_ref().unwrap().pcr();
    assert_eq!(pcr.map(|pcr| pcr.value()), Some(302));

    let bad = TSPacket::from_bytes(&pcr_packet(0b00_0101)).unwrap();
    match bad.decode(DecodeMode::Validating) {
        Err(TSError::FieldConstraint(FieldConstraint { field, value, constraint })) => {
            assert_eq!(field, "reserved");
            assert_eq!(value, 0b00_0101);
            assert_eq!(constraint, Constraint::AllOnes { width: 6 });
        }
        other => panic!("expected a constraint error, got {:?}", other),
    }

    let decoded = bad.decode(DecodeMode::Forgiving).unwrap();
    let pcr = decoded.adaptation_field().as_ref().and_then(|field| field.pcr()).unwrap();
    assert_eq!(pcr.reserved(), 0b00_0101);
    assert_eq!(pcr.base(), 1);
    assert_eq!(pcr.extension(), 2);
}

#[test]
fn oversized_adaptation_field_length() {
    let mut buf = packet(0x0042, 0b11, 0);
    buf[4] = 200;
    buf[5] = 0;
    let packet = TSPacket::from_bytes(&buf).unwrap();

    assert!(matches!(packet.decode(DecodeMode::Validating), Err(TSError::FieldConstraint(_))));
    let decoded = packet.decode(DecodeMode::Forgiving).unwrap();
    assert_eq!(decoded.adaptation_field().as_ref().unwrap().adaptation_field_length(), 200);
    assert!(decoded.payload().as_ref().unwrap().is_empty());
}

#[test]
fn file_round_trip() {
    let path = temp_path("round-trip");
    let data: Vec<u8> = [1, 2, 3].iter().flat_map(|&pid| packet(pid, 0b01, 0)).collect();
    fs::write(&path, &data).unwrap();

    {
        let mut reader = TSReader::open(&path, OpenMode::Read).unwrap();
        assert_eq!(reader.name(), path.display().to_string());
        assert_eq!(reader.mode(), Some(OpenMode::Read));
        assert_eq!(
            reader.to_string(),
            format!("TS reader for {:?}, open for read only", path.display().to_string())
        );
        let pids: Vec<u16> = reader.packets().map(|p| p.unwrap().pid()).collect();
        assert_eq!(pids, vec![1, 2, 3]);
        reader.close();
        assert!(reader.to_string().ends_with(", closed"));
    }

    // Write mode truncates.
    let mut reader = TSReader::open(&path, OpenMode::Write).unwrap();
    assert!(reader.read().unwrap().is_none());
    drop(reader);

    let err = TSReader::open(&path, OpenMode::Exclusive).unwrap_err();
    assert!(matches!(err, TSError::Io(ref e) if e.kind() == ErrorKind::AlreadyExists));

    fs::remove_file(&path).unwrap();
    let err = TSReader::open(&path, OpenMode::Read).unwrap_err();
    assert!(matches!(err, TSError::Io(ref e) if e.kind() == ErrorKind::NotFound));
}

#[test]
fn exclusive_creates_new_file() {
    let path = temp_path("exclusive");
    let _ = fs::remove_file(&path);

    let mut reader = TSReader::open(&path, OpenMode::Exclusive).unwrap();
    assert!(reader.read().unwrap().is_none());
    drop(reader);

    assert!(path.exists());
    fs::remove_file(&path).unwrap();
}

#[test]
fn unknown_mode_fails_before_opening() {
    fn open(mode: &str) -> ts_packets::errors::Result<TSReader<fs::File>> {
        let mode: OpenMode = mode.parse()?;
        TSReader::open(temp_path("never-created"), mode)
    }

    assert!(matches!(open("rw"), Err(TSError::UnsupportedMode(_))));
    assert!(!temp_path("never-created").exists());
}

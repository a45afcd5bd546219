mod common;

use timestack_core::error::TimestackError;
use timestack_core::io::{open_source, FrameSource, SerReader};

#[test]
fn test_mono_8bit_is_single_channel() {
    let frames = vec![(0..12).collect::<Vec<u8>>(), vec![200; 12]];
    let file = common::write_temp(&common::build_ser(4, 3, 0, &frames), ".ser");

    let mut reader = SerReader::open(file.path()).unwrap();
    assert_eq!(reader.info().channels, 1);
    assert_eq!(reader.info().declared_frames, Some(2));
    assert_eq!((reader.info().width, reader.info().height), (4, 3));

    let raw = reader.read_frames().unwrap();
    assert_eq!(raw.frame_count, 2);
    assert_eq!(raw.channels, 1);
    assert_eq!(&raw.bytes[..12], &frames[0][..]);
    assert_eq!(&raw.bytes[12..], &frames[1][..]);
}

#[test]
fn test_rgb_keeps_sample_order() {
    let frame = vec![10, 20, 30, 40, 50, 60];
    let file = common::write_temp(&common::build_ser(2, 1, 100, &[frame.clone()]), ".ser");

    let raw = SerReader::open(file.path()).unwrap().read_frames().unwrap();
    assert_eq!(raw.channels, 3);
    assert_eq!(raw.bytes, frame);
}

#[test]
fn test_bgr_is_swapped_to_rgb() {
    let frame = vec![30, 20, 10, 60, 50, 40];
    let file = common::write_temp(&common::build_ser(2, 1, 101, &[frame]), ".ser");

    let raw = SerReader::open(file.path()).unwrap().read_frames().unwrap();
    assert_eq!(raw.bytes, vec![10, 20, 30, 40, 50, 60]);
}

#[test]
fn test_16bit_scaled_to_8bit() {
    let mut data = common::build_ser_header(2, 1, 16, 1, 0);
    data.extend_from_slice(&0xFF00u16.to_le_bytes());
    data.extend_from_slice(&0x1234u16.to_le_bytes());
    let file = common::write_temp(&data, ".ser");

    let raw = SerReader::open(file.path()).unwrap().read_frames().unwrap();
    assert_eq!(raw.bytes, vec![0xFF, 0x12]);
}

#[test]
fn test_12bit_scaled_to_8bit() {
    let mut data = common::build_ser_header(1, 1, 12, 1, 0);
    data.extend_from_slice(&4095u16.to_le_bytes());
    let file = common::write_temp(&data, ".ser");

    let raw = SerReader::open(file.path()).unwrap().read_frames().unwrap();
    assert_eq!(raw.bytes, vec![255]);
}

#[test]
fn test_truncated_file_rejected() {
    let mut data = common::ramp_ser(3, 4, 4, 0);
    data.truncate(data.len() - 5);
    let file = common::write_temp(&data, ".ser");

    let err = SerReader::open(file.path()).err().unwrap();
    assert!(matches!(err, TimestackError::Decode(_)), "{err}");
}

#[test]
fn test_bad_magic_rejected() {
    let mut data = common::ramp_ser(1, 2, 2, 0);
    data[0] = b'X';
    let file = common::write_temp(&data, ".ser");
    assert!(matches!(
        SerReader::open(file.path()),
        Err(TimestackError::Decode(_))
    ));
}

#[test]
fn test_open_source_dispatches_on_extension() {
    let file = common::write_temp(&common::ramp_ser(2, 2, 2, 100), ".SER");
    let source = open_source(file.path()).unwrap();
    assert_eq!(source.info().format, "ser");
    assert_eq!(source.info().channels, 3);
}

#[test]
fn test_open_source_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.mp4");
    assert!(matches!(
        open_source(&missing),
        Err(TimestackError::InvalidPath(p)) if p == missing
    ));
}

#[test]
fn test_open_source_directory_is_not_a_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        open_source(dir.path()),
        Err(TimestackError::InvalidPath(_))
    ));
}

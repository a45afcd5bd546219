#![allow(dead_code)]

use std::io::Write;

use image::{Delay, Frame, RgbaImage};
use ndarray::Array4;
use timestack_core::frame::{FrameStack, RawFrames};
use timestack_core::io::ser::SER_HEADER_SIZE;

/// Stack where every sample of frame `t` equals `t`.
pub fn ramp_stack(frames: usize, height: usize, width: usize, channels: usize) -> FrameStack<u8> {
    FrameStack::new(Array4::from_shape_fn(
        (frames, height, width, channels),
        |(t, _, _, _)| t as u8,
    ))
}

/// Raw buffer where every sample of frame `t` equals `t`.
pub fn ramp_raw(frames: usize, height: usize, width: usize, channels: usize) -> RawFrames {
    let frame_size = height * width * channels;
    let bytes = (0..frames)
        .flat_map(|t| std::iter::repeat(t as u8).take(frame_size))
        .collect();
    RawFrames {
        bytes,
        frame_count: frames,
        height,
        width,
        channels,
    }
}

/// Deterministic pseudo-random stack.
pub fn noise_stack(frames: usize, height: usize, width: usize, channels: usize, seed: u32) -> FrameStack<u8> {
    let mut state = seed.wrapping_mul(2_654_435_761).max(1);
    FrameStack::new(Array4::from_shape_simple_fn(
        (frames, height, width, channels),
        || {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        },
    ))
}

/// Build a SER file header.
///
/// `color_id`: 0=MONO, 8=BAYER_RGGB, 100=RGB, 101=BGR
pub fn build_ser_header(
    width: u32,
    height: u32,
    bit_depth: u32,
    num_frames: usize,
    color_id: i32,
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(SER_HEADER_SIZE);

    // Magic (14 bytes)
    buf.extend_from_slice(b"LUCAM-RECORDER");
    // LuID (4 bytes)
    buf.extend_from_slice(&0i32.to_le_bytes());
    // ColorID (4 bytes)
    buf.extend_from_slice(&color_id.to_le_bytes());
    // LittleEndian = 0 (little-endian)
    buf.extend_from_slice(&0i32.to_le_bytes());
    // Width
    buf.extend_from_slice(&(width as i32).to_le_bytes());
    // Height
    buf.extend_from_slice(&(height as i32).to_le_bytes());
    // PixelDepth
    buf.extend_from_slice(&(bit_depth as i32).to_le_bytes());
    // FrameCount
    buf.extend_from_slice(&(num_frames as i32).to_le_bytes());
    // Observer, Instrument, Telescope (40 bytes each)
    buf.extend_from_slice(&[0u8; 120]);
    // DateTime, DateTimeUTC (8 bytes each)
    buf.extend_from_slice(&[0u8; 16]);

    assert_eq!(buf.len(), SER_HEADER_SIZE);
    buf
}

/// Complete 8-bit SER file with the given frame payloads.
pub fn build_ser(width: u32, height: u32, color_id: i32, frames: &[Vec<u8>]) -> Vec<u8> {
    let mut buf = build_ser_header(width, height, 8, frames.len(), color_id);
    for frame in frames {
        buf.extend_from_slice(frame);
    }
    buf
}

/// 8-bit SER whose frame `t` holds `t` in every sample.
pub fn ramp_ser(frames: usize, width: u32, height: u32, color_id: i32) -> Vec<u8> {
    let planes = if color_id >= 100 { 3 } else { 1 };
    let size = width as usize * height as usize * planes;
    let payloads: Vec<Vec<u8>> = (0..frames).map(|t| vec![t as u8; size]).collect();
    build_ser(width, height, color_id, &payloads)
}

/// Write bytes to a temporary file with the given extension.
///
/// The file stays alive as long as the returned `NamedTempFile` is not dropped.
pub fn write_temp(data: &[u8], suffix: &str) -> tempfile::NamedTempFile {
    let mut f = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    f.write_all(data).expect("write data");
    f.flush().expect("flush");
    f
}

/// Encode RGBA frames as an animated GIF in a temporary file.
pub fn write_test_gif(frames: Vec<RgbaImage>) -> tempfile::NamedTempFile {
    let mut buf = Vec::new();
    {
        let mut encoder = image::codecs::gif::GifEncoder::new(&mut buf);
        encoder
            .encode_frames(
                frames
                    .into_iter()
                    .map(|img| Frame::from_parts(img, 0, 0, Delay::from_numer_denom_ms(100, 1))),
            )
            .expect("encode gif");
    }
    write_temp(&buf, ".gif")
}

/// Write an executable `/bin/sh` script named `name` into `dir`.
#[cfg(unix)]
pub fn write_script(dir: &std::path::Path, name: &str, body: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).expect("chmod script");
    path
}

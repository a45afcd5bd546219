use std::fs::File;
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use memmap2::Mmap;
use tracing::debug;

use crate::consts::{COLOR_CHANNEL_COUNT, MONO_CHANNEL_COUNT};
use crate::error::{Result, TimestackError};
use crate::frame::{RawFrames, SourceInfo};

use super::FrameSource;

pub const SER_HEADER_SIZE: usize = 178;
const SER_MAGIC: &[u8; 14] = b"LUCAM-RECORDER";

/// SER color identifiers.
const COLOR_ID_RGB: i32 = 100;
const COLOR_ID_BGR: i32 = 101;

/// SER file header (178 bytes).
#[derive(Clone, Debug)]
pub(crate) struct SerHeader {
    pub color_id: i32,
    pub little_endian: bool,
    pub width: u32,
    pub height: u32,
    pub pixel_depth: u32,
    pub frame_count: u32,
}

impl SerHeader {
    /// Bytes per sample (1 for 8-bit, 2 for 9-16 bit).
    pub fn bytes_per_sample(&self) -> usize {
        if self.pixel_depth <= 8 { 1 } else { 2 }
    }

    /// Samples per pixel: 3 for RGB/BGR, 1 for mono and raw Bayer.
    pub fn planes_per_pixel(&self) -> usize {
        match self.color_id {
            COLOR_ID_RGB | COLOR_ID_BGR => COLOR_CHANNEL_COUNT,
            _ => MONO_CHANNEL_COUNT,
        }
    }

    /// Total bytes per stored frame.
    pub fn frame_byte_size(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(self.bytes_per_sample() * self.planes_per_pixel())
    }
}

/// Memory-mapped SER file reader.
pub struct SerReader {
    mmap: Mmap,
    pub(crate) header: SerHeader,
    info: SourceInfo,
}

impl SerReader {
    /// Open a SER file and parse its header.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };

        if mmap.len() < SER_HEADER_SIZE {
            return Err(TimestackError::Decode(
                "file too small for SER header".into(),
            ));
        }

        if &mmap[0..14] != SER_MAGIC {
            return Err(TimestackError::Decode(
                "missing LUCAM-RECORDER magic".into(),
            ));
        }

        let header = parse_header(&mmap[..SER_HEADER_SIZE])?;

        let frame_bytes = header
            .frame_byte_size()
            .ok_or_else(|| TimestackError::Decode("SER frame size overflows".into()))?;
        let expected_data_size = frame_bytes
            .checked_mul(header.frame_count as usize)
            .and_then(|n| n.checked_add(SER_HEADER_SIZE))
            .ok_or_else(|| TimestackError::Decode("SER data size overflows".into()))?;
        if mmap.len() < expected_data_size {
            return Err(TimestackError::Decode(format!(
                "SER file truncated: expected at least {} bytes, got {}",
                expected_data_size,
                mmap.len()
            )));
        }

        let info = SourceInfo {
            filename: path.to_path_buf(),
            format: "ser".into(),
            width: header.width,
            height: header.height,
            channels: header.planes_per_pixel(),
            declared_frames: Some(header.frame_count as usize),
            frame_rate: None,
        };

        debug!(
            width = header.width,
            height = header.height,
            depth = header.pixel_depth,
            color_id = header.color_id,
            frames = header.frame_count,
            "Parsed SER header"
        );

        Ok(Self { mmap, header, info })
    }

    pub fn frame_count(&self) -> usize {
        self.header.frame_count as usize
    }

    /// Raw stored bytes of a single frame.
    pub(crate) fn frame_raw(&self, index: usize) -> Result<&[u8]> {
        let count = self.frame_count();
        if index >= count {
            return Err(TimestackError::Decode(format!(
                "frame index {index} out of range (total: {count})"
            )));
        }
        // Size was checked against the mapping in `open`.
        let size = self.header.frame_byte_size().unwrap_or(0);
        let offset = SER_HEADER_SIZE + index * size;
        Ok(&self.mmap[offset..offset + size])
    }

    /// Decode one frame to interleaved 8-bit samples in RGB order.
    fn decode_frame(&self, index: usize, out: &mut Vec<u8>) -> Result<()> {
        let raw = self.frame_raw(index)?;
        let bps = self.header.bytes_per_sample();
        let planes = self.header.planes_per_pixel();
        let shift = self.header.pixel_depth.saturating_sub(8);

        for pixel in raw.chunks_exact(bps * planes) {
            let mut samples = [0u8; COLOR_CHANNEL_COUNT];
            for (plane, sample) in samples.iter_mut().take(planes).enumerate() {
                let idx = plane * bps;
                *sample = if bps == 1 {
                    pixel[idx]
                } else {
                    let pair = [pixel[idx], pixel[idx + 1]];
                    let val = if self.header.little_endian {
                        u16::from_le_bytes(pair)
                    } else {
                        u16::from_be_bytes(pair)
                    };
                    (val >> shift).min(u8::MAX as u16) as u8
                };
            }
            if self.header.color_id == COLOR_ID_BGR {
                samples.swap(0, 2);
            }
            out.extend_from_slice(&samples[..planes]);
        }
        Ok(())
    }
}

impl FrameSource for SerReader {
    fn info(&self) -> &SourceInfo {
        &self.info
    }

    fn read_frames(&mut self) -> Result<RawFrames> {
        let h = self.header.height as usize;
        let w = self.header.width as usize;
        let channels = self.header.planes_per_pixel();
        let total = self.frame_count();

        let mut bytes = Vec::with_capacity(h * w * channels * total);
        for i in 0..total {
            self.decode_frame(i, &mut bytes)?;
        }

        Ok(RawFrames {
            bytes,
            frame_count: total,
            height: h,
            width: w,
            channels,
        })
    }
}

fn parse_header(buf: &[u8]) -> Result<SerHeader> {
    let mut cursor = std::io::Cursor::new(&buf[14..]); // skip magic

    let _lu_id = cursor.read_i32::<LittleEndian>()?;
    let color_id = cursor.read_i32::<LittleEndian>()?;
    let le_flag = cursor.read_i32::<LittleEndian>()?;
    let width = cursor.read_i32::<LittleEndian>()?;
    let height = cursor.read_i32::<LittleEndian>()?;
    let pixel_depth = cursor.read_i32::<LittleEndian>()?;
    let frame_count = cursor.read_i32::<LittleEndian>()?;

    if width <= 0 || height <= 0 {
        return Err(TimestackError::Decode(format!(
            "invalid SER dimensions: {width}x{height}"
        )));
    }
    if !(1..=16).contains(&pixel_depth) {
        return Err(TimestackError::Decode(format!(
            "unsupported SER pixel depth: {pixel_depth}"
        )));
    }
    if frame_count < 0 {
        return Err(TimestackError::Decode(format!(
            "invalid SER frame count: {frame_count}"
        )));
    }

    // Treat 0 as little-endian, as most capture software writes it.
    let little_endian = le_flag != 1;

    Ok(SerHeader {
        color_id,
        little_endian,
        width: width as u32,
        height: height as u32,
        pixel_depth: pixel_depth as u32,
        frame_count: frame_count as u32,
    })
}

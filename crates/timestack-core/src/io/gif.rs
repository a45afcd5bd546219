use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, ImageDecoder};

use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::{Result, TimestackError};
use crate::frame::{RawFrames, SourceInfo};

use super::FrameSource;

/// Animated GIF reader. Frames are composited onto the full logical screen
/// and the alpha channel is dropped.
pub struct GifReader {
    path: PathBuf,
    info: SourceInfo,
}

impl GifReader {
    pub fn open(path: &Path) -> Result<Self> {
        let decoder = open_decoder(path)?;
        let (width, height) = decoder.dimensions();
        if width == 0 || height == 0 {
            return Err(TimestackError::Decode(format!(
                "invalid GIF dimensions: {width}x{height}"
            )));
        }

        Ok(Self {
            path: path.to_path_buf(),
            info: SourceInfo {
                filename: path.to_path_buf(),
                format: "gif".into(),
                width,
                height,
                channels: COLOR_CHANNEL_COUNT,
                declared_frames: None,
                frame_rate: None,
            },
        })
    }
}

impl FrameSource for GifReader {
    fn info(&self) -> &SourceInfo {
        &self.info
    }

    fn read_frames(&mut self) -> Result<RawFrames> {
        let frames = open_decoder(&self.path)?
            .into_frames()
            .collect_frames()
            .map_err(|e| TimestackError::Decode(format!("GIF frame decode failed: {e}")))?;

        let width = self.info.width as usize;
        let height = self.info.height as usize;
        let mut bytes = Vec::with_capacity(frames.len() * width * height * COLOR_CHANNEL_COUNT);
        for frame in &frames {
            let buffer = frame.buffer();
            if buffer.dimensions() != (self.info.width, self.info.height) {
                return Err(TimestackError::Decode(format!(
                    "GIF frame is {}x{}, expected {}x{}",
                    buffer.width(),
                    buffer.height(),
                    width,
                    height
                )));
            }
            for pixel in buffer.pixels() {
                bytes.extend_from_slice(&pixel.0[..COLOR_CHANNEL_COUNT]);
            }
        }

        Ok(RawFrames {
            bytes,
            frame_count: frames.len(),
            height,
            width,
            channels: COLOR_CHANNEL_COUNT,
        })
    }
}

fn open_decoder(path: &Path) -> Result<GifDecoder<BufReader<File>>> {
    let file = BufReader::new(File::open(path)?);
    GifDecoder::new(file).map_err(|e| TimestackError::Decode(format!("not a readable GIF: {e}")))
}

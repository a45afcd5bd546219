pub mod ffmpeg;
pub mod gif;
pub mod ser;

use std::path::Path;

use tracing::debug;

use crate::error::{Result, TimestackError};
use crate::frame::{RawFrames, SourceInfo};

pub use ffmpeg::{FfmpegReader, FfmpegTools};
pub use gif::GifReader;
pub use ser::SerReader;

/// A decoder that yields every frame of one input as raw 8-bit samples.
pub trait FrameSource {
    /// Stream metadata, known before any pixel data is decoded.
    fn info(&self) -> &SourceInfo;

    /// Decode all frames into one contiguous buffer.
    fn read_frames(&mut self) -> Result<RawFrames>;
}

/// Open the right reader for `path`, chosen by file extension.
///
/// `.ser` and `.gif` are decoded in-process; anything else goes through
/// ffmpeg.
pub fn open_source(path: &Path) -> Result<Box<dyn FrameSource>> {
    if !path.is_file() {
        return Err(TimestackError::InvalidPath(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    debug!(path = %path.display(), ext = ?ext, "Opening frame source");

    match ext.as_deref() {
        Some("ser") => Ok(Box::new(SerReader::open(path)?)),
        Some("gif") => Ok(Box::new(GifReader::open(path)?)),
        _ => Ok(Box::new(FfmpegReader::open(path)?)),
    }
}

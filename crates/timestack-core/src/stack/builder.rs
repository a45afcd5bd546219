use ndarray::Array4;
use tracing::info;

use crate::consts::{COLOR_CHANNEL_COUNT, MONO_CHANNEL_COUNT};
use crate::error::{Result, TimestackError};
use crate::frame::{FrameStack, RawFrames};

/// Materialize decoded bytes into a `(frame, row, column, channel)` stack.
///
/// The buffer must hold exactly `frame_count` whole frames.
pub fn build_stack(raw: RawFrames) -> Result<FrameStack<u8>> {
    if raw.channels != MONO_CHANNEL_COUNT && raw.channels != COLOR_CHANNEL_COUNT {
        return Err(TimestackError::InvalidChannelCount {
            channels: raw.channels,
            reason: "frames must have 1 or 3 channels",
        });
    }

    let frame_size = raw.frame_byte_size();
    if frame_size == 0 {
        return Err(TimestackError::Decode(format!(
            "frame dimensions are empty ({}x{})",
            raw.width, raw.height
        )));
    }

    let len = raw.bytes.len();
    if len % frame_size != 0 {
        return Err(TimestackError::Decode(format!(
            "{len} bytes is not a whole number of {}x{}x{} frames",
            raw.width, raw.height, raw.channels
        )));
    }

    let decoded = len / frame_size;
    if decoded != raw.frame_count {
        return Err(TimestackError::Decode(format!(
            "expected {} frames, buffer holds {decoded}",
            raw.frame_count
        )));
    }
    if decoded == 0 {
        return Err(TimestackError::Decode("no frames decoded".into()));
    }

    let shape = (decoded, raw.height, raw.width, raw.channels);
    let data = Array4::from_shape_vec(shape, raw.bytes)
        .map_err(|e| TimestackError::Decode(format!("cannot shape frame buffer: {e}")))?;

    info!(
        frames = decoded,
        width = raw.width,
        height = raw.height,
        channels = raw.channels,
        "Built frame stack"
    );
    Ok(FrameStack::new(data))
}

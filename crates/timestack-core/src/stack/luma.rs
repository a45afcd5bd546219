use ndarray::{Axis, Zip};
use tracing::info;

use crate::consts::{COLOR_CHANNEL_COUNT, LUMA_B, LUMA_G, LUMA_R};
use crate::error::{Result, TimestackError};
use crate::frame::{FrameStack, PixelStack};

/// Collapse RGB frames to BT.601 luma, `0.2989 R + 0.5870 G + 0.1140 B`.
///
/// Values stay in floating point; nothing is rounded or clamped.
pub fn to_luma(stack: &FrameStack<u8>) -> Result<FrameStack<f64>> {
    if stack.channels() != COLOR_CHANNEL_COUNT {
        return Err(TimestackError::InvalidChannelCount {
            channels: stack.channels(),
            reason: "grayscale conversion needs 3-channel frames",
        });
    }

    let red = stack.data.index_axis(Axis(3), 0);
    let green = stack.data.index_axis(Axis(3), 1);
    let blue = stack.data.index_axis(Axis(3), 2);

    let luma = Zip::from(&red)
        .and(&green)
        .and(&blue)
        .map_collect(|&r, &g, &b| LUMA_R * f64::from(r) + LUMA_G * f64::from(g) + LUMA_B * f64::from(b));

    Ok(FrameStack::new(luma.insert_axis(Axis(3))))
}

/// Apply the grayscale option: convert when set, pass the stack through otherwise.
pub fn reduce_channels(stack: FrameStack<u8>, grayscale: bool) -> Result<PixelStack> {
    if !grayscale {
        return Ok(PixelStack::Raw(stack));
    }
    let luma = to_luma(&stack)?;
    info!(frames = luma.frame_count(), "Converted frames to grayscale");
    Ok(PixelStack::Luma(luma))
}

use ndarray::s;
use tracing::info;

use crate::error::{Result, TimestackError};
use crate::frame::FrameStack;

/// Reject strides below 1.
pub fn validate_interval(interval: usize) -> Result<()> {
    if interval < 1 {
        return Err(TimestackError::InvalidInterval(interval));
    }
    Ok(())
}

/// Keep frames `0, n, 2n, ...`.
///
/// A stride at or beyond the frame count keeps frame 0 alone.
pub fn sample_interval<T: Clone>(stack: &FrameStack<T>, interval: usize) -> Result<FrameStack<T>> {
    validate_interval(interval)?;

    let step = isize::try_from(interval).unwrap_or(isize::MAX);
    let data = stack.data.slice(s![..;step, .., .., ..]).to_owned();

    info!(
        interval,
        before = stack.frame_count(),
        after = data.len_of(ndarray::Axis(0)),
        "Sampled frames"
    );
    Ok(FrameStack::new(data))
}

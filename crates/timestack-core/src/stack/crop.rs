use std::ops::Range;

use ndarray::s;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, TimestackError};
use crate::frame::FrameStack;

/// Rectangular window applied to every frame. Bounds are half-open pixel
/// coordinates; a missing bound means the edge of the frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roi {
    pub x_min: Option<i64>,
    pub x_max: Option<i64>,
    pub y_min: Option<i64>,
    pub y_max: Option<i64>,
}

impl Roi {
    /// Full-frame window spelled out explicitly.
    pub fn full(width: usize, height: usize) -> Self {
        Self {
            x_min: Some(0),
            x_max: Some(width as i64),
            y_min: Some(0),
            y_max: Some(height as i64),
        }
    }

    pub fn is_unset(&self) -> bool {
        *self == Self::default()
    }

    /// Resolve to `(columns, rows)` index ranges for a `width x height` frame.
    pub fn resolve(&self, width: usize, height: usize) -> Result<(Range<usize>, Range<usize>)> {
        let cols = resolve_axis("x", self.x_min, self.x_max, width)?;
        let rows = resolve_axis("y", self.y_min, self.y_max, height)?;
        Ok((cols, rows))
    }
}

/// Half-open window `[first, last)` over the time axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRange {
    pub first: Option<i64>,
    pub last: Option<i64>,
}

impl FrameRange {
    pub fn is_unset(&self) -> bool {
        *self == Self::default()
    }

    pub fn resolve(&self, frame_count: usize) -> Result<Range<usize>> {
        resolve_axis("frame", self.first, self.last, frame_count)
    }
}

fn resolve_axis(axis: &str, min: Option<i64>, max: Option<i64>, size: usize) -> Result<Range<usize>> {
    let size_i = i64::try_from(size).unwrap_or(i64::MAX);
    let lo = min.unwrap_or(0);
    let hi = max.unwrap_or(size_i);

    if lo < 0 || hi < 0 {
        return Err(TimestackError::InvalidBounds(format!(
            "{axis} bounds {lo}..{hi} must not be negative"
        )));
    }
    if lo > size_i || hi > size_i {
        return Err(TimestackError::InvalidBounds(format!(
            "{axis} bounds {lo}..{hi} exceed the available extent {size}"
        )));
    }
    if lo >= hi {
        return Err(TimestackError::InvalidBounds(format!(
            "{axis} lower bound {lo} must be below upper bound {hi}"
        )));
    }

    Ok(lo as usize..hi as usize)
}

/// Restrict a stack to `range` in time and `roi` in space.
pub fn crop_stack<T: Clone>(stack: &FrameStack<T>, roi: &Roi, range: &FrameRange) -> Result<FrameStack<T>> {
    let frames = range.resolve(stack.frame_count())?;
    let (cols, rows) = roi.resolve(stack.width(), stack.height())?;

    info!(
        frames = ?frames,
        rows = ?rows,
        cols = ?cols,
        "Cropping frame stack"
    );

    let data = stack.data.slice(s![frames, rows, cols, ..]).to_owned();
    Ok(FrameStack::new(data))
}

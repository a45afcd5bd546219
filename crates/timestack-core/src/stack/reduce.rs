use std::fmt;
use std::str::FromStr;

use ndarray::{Axis, Zip};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, TimestackError};
use crate::frame::{Composite, CompositeImage, FrameStack, PixelStack};

/// How the time axis is collapsed.
///
/// `Min` suits dark subjects on a light background, `Max` the opposite.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReduceMethod {
    #[default]
    Min,
    Max,
}

impl fmt::Display for ReduceMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Min => write!(f, "min"),
            Self::Max => write!(f, "max"),
        }
    }
}

impl FromStr for ReduceMethod {
    type Err = TimestackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "min" => Ok(Self::Min),
            "max" => Ok(Self::Max),
            _ => Err(TimestackError::UnknownMethod(s.to_string())),
        }
    }
}

/// Elementwise minimum or maximum over all frames.
///
/// Works in the stack's own element type; selection never overflows.
pub fn temporal_reduce<T>(stack: &FrameStack<T>, method: ReduceMethod) -> Result<Composite<T>>
where
    T: Copy + PartialOrd,
{
    if stack.is_empty() {
        return Err(TimestackError::EmptySequence);
    }

    let replaces: fn(&T, &T) -> bool = match method {
        ReduceMethod::Min => |new, current| new < current,
        ReduceMethod::Max => |new, current| new > current,
    };

    let mut acc = stack.frame(0).to_owned();
    for frame in stack.data.axis_iter(Axis(0)).skip(1) {
        Zip::from(&mut acc).and(&frame).for_each(|current, new| {
            if replaces(new, current) {
                *current = *new;
            }
        });
    }

    Ok(Composite::new(acc))
}

impl PixelStack {
    /// Collapse the time axis, keeping the stack's element type.
    pub fn reduce(&self, method: ReduceMethod) -> Result<CompositeImage> {
        info!(%method, frames = self.frame_count(), "Flattening frame stack");
        match self {
            Self::Raw(stack) => Ok(CompositeImage::Raw(temporal_reduce(stack, method)?)),
            Self::Luma(stack) => Ok(CompositeImage::Luma(temporal_reduce(stack, method)?)),
        }
    }
}

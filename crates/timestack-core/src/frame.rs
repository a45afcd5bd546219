use std::path::PathBuf;

use ndarray::{Array3, Array4, ArrayView2, ArrayView3, Axis};

/// An ordered stack of equally-shaped frames.
///
/// Axes are `(frame, row, column, channel)`. Ingested stacks hold `u8`
/// samples; channel reduction produces `f64` stacks with one channel.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameStack<T> {
    pub data: Array4<T>,
}

impl<T> FrameStack<T> {
    pub fn new(data: Array4<T>) -> Self {
        Self { data }
    }

    pub fn frame_count(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    pub fn height(&self) -> usize {
        self.data.len_of(Axis(1))
    }

    pub fn width(&self) -> usize {
        self.data.len_of(Axis(2))
    }

    pub fn channels(&self) -> usize {
        self.data.len_of(Axis(3))
    }

    pub fn is_empty(&self) -> bool {
        self.frame_count() == 0
    }

    /// View of a single frame, shape `(row, column, channel)`.
    pub fn frame(&self, index: usize) -> ArrayView3<'_, T> {
        self.data.index_axis(Axis(0), index)
    }
}

/// A frame stack before or after channel reduction.
#[derive(Clone, Debug, PartialEq)]
pub enum PixelStack {
    /// Integer samples as decoded, 1 or 3 channels.
    Raw(FrameStack<u8>),
    /// Single-channel luma computed in floating point.
    Luma(FrameStack<f64>),
}

impl PixelStack {
    pub fn frame_count(&self) -> usize {
        match self {
            Self::Raw(s) => s.frame_count(),
            Self::Luma(s) => s.frame_count(),
        }
    }

    pub fn channels(&self) -> usize {
        match self {
            Self::Raw(s) => s.channels(),
            Self::Luma(s) => s.channels(),
        }
    }
}

/// Result of collapsing a stack along its time axis.
/// Axes are `(row, column, channel)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Composite<T> {
    pub data: Array3<T>,
}

impl<T> Composite<T> {
    pub fn new(data: Array3<T>) -> Self {
        Self { data }
    }

    pub fn height(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    pub fn width(&self) -> usize {
        self.data.len_of(Axis(1))
    }

    pub fn channels(&self) -> usize {
        self.data.len_of(Axis(2))
    }

    /// One channel of the composite as a 2-D `(row, column)` view.
    pub fn plane(&self, channel: usize) -> ArrayView2<'_, T> {
        self.data.index_axis(Axis(2), channel)
    }
}

/// Composite produced by the pipeline, in the element type of the reduced stack.
#[derive(Clone, Debug, PartialEq)]
pub enum CompositeImage {
    Raw(Composite<u8>),
    Luma(Composite<f64>),
}

impl CompositeImage {
    pub fn height(&self) -> usize {
        match self {
            Self::Raw(c) => c.height(),
            Self::Luma(c) => c.height(),
        }
    }

    pub fn width(&self) -> usize {
        match self {
            Self::Raw(c) => c.width(),
            Self::Luma(c) => c.width(),
        }
    }

    pub fn channels(&self) -> usize {
        match self {
            Self::Raw(c) => c.channels(),
            Self::Luma(c) => c.channels(),
        }
    }
}

/// Decoded pixel bytes as delivered by a frame source, frame after frame,
/// row-major, channels interleaved.
#[derive(Clone, Debug)]
pub struct RawFrames {
    pub bytes: Vec<u8>,
    pub frame_count: usize,
    pub height: usize,
    pub width: usize,
    pub channels: usize,
}

impl RawFrames {
    /// Bytes in one frame.
    pub fn frame_byte_size(&self) -> usize {
        self.height * self.width * self.channels
    }
}

/// Metadata about the source file.
#[derive(Clone, Debug)]
pub struct SourceInfo {
    pub filename: PathBuf,
    /// Container label, e.g. "ser", "gif" or the ffprobe format name.
    pub format: String,
    pub width: u32,
    pub height: u32,
    pub channels: usize,
    /// Frame count declared by the container, if it declares one.
    pub declared_frames: Option<usize>,
    pub frame_rate: Option<f64>,
}

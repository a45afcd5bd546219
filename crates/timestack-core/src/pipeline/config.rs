use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_INTERVAL;
use crate::error::{Result, TimestackError};
use crate::render::{output_format, RenderOptions};
use crate::stack::{validate_interval, FrameRange, ReduceMethod, Roi};

/// Everything one run needs. Built once, never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(default)]
    pub method: ReduceMethod,
    #[serde(default = "default_interval")]
    pub interval: usize,
    #[serde(default)]
    pub grayscale: bool,
    #[serde(default)]
    pub roi: Roi,
    /// Window over the sampled frames.
    #[serde(default)]
    pub frame_range: FrameRange,
    pub dpi: Option<u32>,
}

fn default_interval() -> usize {
    DEFAULT_INTERVAL
}

impl PipelineConfig {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            method: ReduceMethod::default(),
            interval: DEFAULT_INTERVAL,
            grayscale: false,
            roi: Roi::default(),
            frame_range: FrameRange::default(),
            dpi: None,
        }
    }

    /// Checks that need no frame data: stride, output format, dpi, and
    /// crop bounds that are wrong whatever the input size.
    pub fn validate(&self) -> Result<()> {
        validate_interval(self.interval)?;
        output_format(&self.output)?;
        if self.dpi == Some(0) {
            return Err(TimestackError::Render("dpi must be at least 1".into()));
        }
        // An unbounded extent only rejects negative or inverted bounds.
        self.roi.resolve(usize::MAX, usize::MAX)?;
        self.frame_range.resolve(usize::MAX)?;
        Ok(())
    }

    /// Whether the crop stage has anything to do.
    pub fn crops(&self) -> bool {
        !self.roi.is_unset() || !self.frame_range.is_unset()
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::with_dpi(self.dpi)
    }
}

/// Pipeline processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Validating,
    Reading,
    Sampling,
    Cropping,
    Flattening,
    Rendering,
}

impl PipelineStage {
    /// Number of user-visible stages.
    pub const COUNT: usize = 6;

    /// 1-based position of the stage in a full run.
    pub fn number(&self) -> usize {
        match self {
            Self::Validating => 1,
            Self::Reading => 2,
            Self::Sampling => 3,
            Self::Cropping => 4,
            Self::Flattening => 5,
            Self::Rendering => 6,
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validating => write!(f, "Checking arguments"),
            Self::Reading => write!(f, "Reading input"),
            Self::Sampling => write!(f, "Slicing by interval"),
            Self::Cropping => write!(f, "Cropping and converting to grayscale"),
            Self::Flattening => write!(f, "Flattening frame stack"),
            Self::Rendering => write!(f, "Rendering time stack"),
        }
    }
}

/// Progress reporting for the pipeline.
///
/// Implementors can use this to drive progress bars, logging, or any other
/// UI feedback. All methods have default no-op implementations.
pub trait ProgressReporter {
    /// A new pipeline stage has started. `detail` is a short description of
    /// what the stage works on, if any.
    fn begin_stage(&self, _stage: PipelineStage, _detail: Option<&str>) {}

    /// Frames handled so far in the current stage.
    fn advance(&self, _frames_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// No-op progress reporter, used when `run_pipeline` delegates.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}

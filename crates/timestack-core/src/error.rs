use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TimestackError {
    #[error("invalid input file path: {}", .0.display())]
    InvalidPath(PathBuf),

    #[error("could not decode input: {0}")]
    Decode(String),

    #[error("invalid channel count {channels}: {reason}")]
    InvalidChannelCount { channels: usize, reason: &'static str },

    #[error("invalid interval {0}: must be at least 1")]
    InvalidInterval(usize),

    #[error("invalid bounds: {0}")]
    InvalidBounds(String),

    #[error("unknown reduction method '{0}': expected 'min' or 'max'")]
    UnknownMethod(String),

    #[error("could not render output: {0}")]
    Render(String),

    #[error("Empty frame sequence")]
    EmptySequence,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TimestackError {
    /// Process exit code for this error kind.
    ///
    /// Rejected configuration values exit with 2, the same code argument
    /// parsing failures use; everything else exits with 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidInterval(_) | Self::InvalidBounds(_) | Self::UnknownMethod(_) => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, TimestackError>;

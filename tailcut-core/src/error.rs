//! Error types for the tailcut-core library.
//!
//! Every fallible operation in the crate returns [`CoreResult`]. Detector
//! outcomes that mean "no usable cut point" (`InsufficientDetections`,
//! `NoBlackFrame`) are ordinary variants so the batch driver can log them and
//! move on to the next file.

use std::process::ExitStatus;
use thiserror::Error;

/// Custom error types for tailcut
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Path error: {0}")]
    PathError(String),

    #[error("No processable video files found in the input directory")]
    NoFilesFound,

    #[error("Required dependency '{0}' not found on PATH")]
    DependencyNotFound(String),

    #[error("Failed to start '{0}': {1}")]
    CommandStart(String, std::io::Error),

    #[error("Failed waiting for '{0}': {1}")]
    CommandWait(String, std::io::Error),

    #[error("'{cmd}' exited with {status}: {stderr}")]
    CommandFailed {
        cmd: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("ffprobe output parse error: {0}")]
    FfprobeParse(String),

    #[error("JSON parse error: {0}")]
    JsonParseError(String),

    #[error("Video info error: {0}")]
    VideoInfoError(String),

    #[error("Malformed blackdetect line: {0}")]
    BlackDetectParse(String),

    #[error("Found {found} black region(s), need at least {required}")]
    InsufficientDetections { found: usize, required: usize },

    #[error("No frame darker than {threshold} in the last {window_secs:.1}s")]
    NoBlackFrame { threshold: u8, window_secs: f64 },

    #[error("Cut point {cut:.3}s is outside the video (duration {duration:.3}s)")]
    InvalidCutPoint { cut: f64, duration: f64 },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl CoreError {
    /// Whether this error only means the detector found no usable cut point.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::InsufficientDetections { .. } | CoreError::NoBlackFrame { .. }
        )
    }
}

/// Result type for tailcut operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

pub fn command_start_error(cmd: impl Into<String>, err: std::io::Error) -> CoreError {
    CoreError::CommandStart(cmd.into(), err)
}

pub fn command_wait_error(cmd: impl Into<String>, err: std::io::Error) -> CoreError {
    CoreError::CommandWait(cmd.into(), err)
}

pub fn command_failed_error(
    cmd: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        cmd: cmd.into(),
        status,
        stderr: stderr.into(),
    }
}

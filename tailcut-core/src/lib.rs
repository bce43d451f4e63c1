//! Core library for trimming the tail of video files at a black-frame boundary.
//!
//! This crate provides video file discovery, duration probing, two boundary
//! detectors (ffmpeg `blackdetect` and a decoded-frame brightness scan),
//! fixed-offset trimming, and stream-copy cutting driven by a batch runner.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use tailcut_core::{CoreConfig, process_videos, find_processable_files};
//! use tailcut_core::config::PipelineMode;
//! use tailcut_core::external::{CrateFfprobeExecutor, SidecarSpawner};
//! use std::path::PathBuf;
//!
//! let mut config = CoreConfig::new(
//!     PathBuf::from("/path/to/input"),
//!     PathBuf::from("/path/to/output"),
//!     PathBuf::from("/path/to/logs")
//! );
//! config.mode = PipelineMode::FixedOffsetThenDetect;
//! config.validate().unwrap();
//!
//! let files = find_processable_files(&config.input_dir, &config.extension).unwrap();
//!
//! let summary = process_videos(
//!     &SidecarSpawner,
//!     &CrateFfprobeExecutor::new(),
//!     &config,
//!     &files,
//! ).unwrap();
//! println!("Trimmed {} file(s)", summary.trimmed_count());
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod external;
pub mod file_logging;
pub mod hardware_decode;
pub mod processing;
pub mod temp_files;
pub mod terminal;
pub mod utils;

// Re-exports for public API
pub use config::{CoreConfig, CoreConfigBuilder, DetectorKind, PipelineMode};
pub use discovery::find_processable_files;
pub use error::{CoreError, CoreResult};
pub use processing::{
    BatchSummary, CutDecision, FileOutcome, FileReport, TrimResult, detect_boundary,
    process_videos,
};
pub use utils::{format_bytes, format_duration};

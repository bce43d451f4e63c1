//! Core trimming logic and orchestration.
//!
//! This module organizes the individual steps (duration probing, boundary
//! detection, trimming) into submodules and exposes the batch entry point.

/// Duration probing from frame count and frame rate
pub mod duration;

/// Boundary detection from ffmpeg blackdetect output
pub mod black_detect;

/// Boundary detection from decoded frame brightness
pub mod brightness_scan;

/// Constant-offset trimming
pub mod fixed_offset;

/// Stream-copy trimming
pub mod trim;

/// Batch orchestration over a list of files
pub mod batch;

use crate::config::{CoreConfig, DetectorKind};
use crate::error::CoreResult;
use crate::external::{FfmpegSpawner, FfprobeExecutor};
use std::path::Path;

pub use batch::{BatchSummary, FileOutcome, FileReport, TrimResult, process_videos};
pub use black_detect::{BlackRegion, BlackRegionReport, detect_black_region_start};
pub use brightness_scan::find_last_black_frame;
pub use duration::{VideoHandle, probe_duration};
pub use fixed_offset::{CutDecision, fixed_offset_cut, trim_fixed_offset};
pub use trim::{trim_to, validate_cut_point};

/// Runs the detector selected by `config.detector` and returns the cut point in seconds.
pub fn detect_boundary<S: FfmpegSpawner, P: FfprobeExecutor>(
    spawner: &S,
    prober: &P,
    input_path: &Path,
    config: &CoreConfig,
) -> CoreResult<f64> {
    match config.detector {
        DetectorKind::BlackDetect => {
            detect_black_region_start(spawner, input_path, &config.black_detect)
        }
        DetectorKind::BrightnessScan => {
            find_last_black_frame(spawner, prober, input_path, &config.brightness)
        }
    }
}

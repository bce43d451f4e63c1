//! Duration probing.
//!
//! Duration is derived from the frame count and frame rate of the first video
//! stream, the same way a frame-oriented decode library reports it. A missing
//! or zero frame rate yields `0.0`, which callers must read as "unknown"
//! rather than as an empty video.

use crate::error::CoreResult;
use crate::external::FfprobeExecutor;

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Timing of one video file, as read by a single probe session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoHandle {
    pub path: PathBuf,
    /// Frames per second; `0.0` when unknown
    pub frame_rate: f64,
    pub frame_count: u64,
}

impl VideoHandle {
    #[must_use]
    pub fn new(path: PathBuf, frame_rate: f64, frame_count: u64) -> Self {
        Self {
            path,
            frame_rate,
            frame_count,
        }
    }

    /// `frame_count / frame_rate`, or `0.0` when the frame rate is unusable.
    #[must_use]
    pub fn duration_secs(&self) -> f64 {
        duration_from_counts(self.frame_count, self.frame_rate)
    }

    /// Timestamp of a frame index.
    #[must_use]
    pub fn frame_timestamp(&self, index: u64) -> f64 {
        if self.has_known_rate() {
            index as f64 / self.frame_rate
        } else {
            0.0
        }
    }

    #[must_use]
    pub fn has_known_rate(&self) -> bool {
        self.frame_rate.is_finite() && self.frame_rate > 0.0
    }
}

/// Duration in seconds for `frame_count` frames at `frame_rate` fps.
#[must_use]
pub fn duration_from_counts(frame_count: u64, frame_rate: f64) -> f64 {
    if frame_rate.is_finite() && frame_rate > 0.0 {
        frame_count as f64 / frame_rate
    } else {
        0.0
    }
}

/// Parses an ffprobe rational such as `30000/1001` or a plain number such as `25`.
///
/// Returns `None` for malformed input and for a zero denominator.
#[must_use]
pub fn parse_frame_rate(rate: &str) -> Option<f64> {
    let rate = rate.trim();
    match rate.split_once('/') {
        Some((num, den)) => {
            let num = num.trim().parse::<f64>().ok()?;
            let den = den.trim().parse::<f64>().ok()?;
            if den == 0.0 { None } else { Some(num / den) }
        }
        None => rate.parse::<f64>().ok(),
    }
}

/// Returns the duration of `input_path` in seconds (`0.0` if unknown).
pub fn probe_duration<P: FfprobeExecutor>(probe: &P, input_path: &Path) -> CoreResult<f64> {
    let handle = probe.probe_video(input_path)?;
    let duration = handle.duration_secs();
    if duration == 0.0 {
        log::warn!(
            "Frame rate unavailable for {}, duration unknown",
            input_path.display()
        );
    }
    Ok(duration)
}

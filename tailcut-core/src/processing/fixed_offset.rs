//! Fixed-offset trimming: remove a constant number of seconds from the end.

use crate::error::CoreResult;
use crate::external::FfmpegSpawner;
use crate::processing::trim::trim_to;

use serde::Serialize;
use std::path::Path;

/// Outcome of deciding where to cut a file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "decision", content = "at")]
pub enum CutDecision {
    /// Keep `[0, t)`.
    Cut(f64),
    /// Leave the file alone.
    Skip,
}

impl CutDecision {
    #[must_use]
    pub fn cut_point(self) -> Option<f64> {
        match self {
            CutDecision::Cut(t) => Some(t),
            CutDecision::Skip => None,
        }
    }
}

/// `Cut(duration - seconds)` when the video is longer than `seconds`, `Skip` otherwise.
///
/// An unknown duration (`0.0`) always skips.
#[must_use]
pub fn fixed_offset_cut(duration: f64, seconds: f64) -> CutDecision {
    if duration > seconds {
        CutDecision::Cut(duration - seconds)
    } else {
        CutDecision::Skip
    }
}

/// Writes `input_path` minus its last `seconds` to `output_path`, unless the
/// already probed `duration` is too short.
///
/// Nothing is written on `Skip`.
pub fn trim_fixed_offset<S: FfmpegSpawner>(
    spawner: &S,
    input_path: &Path,
    output_path: &Path,
    duration: f64,
    seconds: f64,
) -> CoreResult<CutDecision> {
    let decision = fixed_offset_cut(duration, seconds);

    match decision {
        CutDecision::Cut(cut) => {
            trim_to(spawner, input_path, output_path, cut)?;
            log::debug!(
                "Removed {:.2}s from end of {} (duration {:.2}s)",
                seconds,
                input_path.display(),
                duration
            );
        }
        CutDecision::Skip => {
            log::warn!(
                "{} is {:.2}s long, not longer than {:.2}s; skipping",
                input_path.display(),
                duration,
                seconds
            );
        }
    }

    Ok(decision)
}

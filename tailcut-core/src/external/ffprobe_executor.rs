//! FFprobe integration for stream timing information.
//!
//! Opens a probe session per call and reports the frame rate and frame count
//! of the first video stream. Nothing is cached between calls.

use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};
use crate::processing::duration::{VideoHandle, parse_frame_rate};
use ffprobe::{FfProbeError, ffprobe};
use std::path::Path;

/// Trait for anything that can report the timing of a video file.
pub trait FfprobeExecutor {
    /// Reads frame rate and frame count of the first video stream.
    fn probe_video(&self, input_path: &Path) -> CoreResult<VideoHandle>;
}

/// `FfprobeExecutor` backed by the `ffprobe` crate.
#[derive(Debug, Clone, Default)]
pub struct CrateFfprobeExecutor;

impl CrateFfprobeExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl FfprobeExecutor for CrateFfprobeExecutor {
    fn probe_video(&self, input_path: &Path) -> CoreResult<VideoHandle> {
        log::debug!(
            "Running ffprobe (via crate) for stream timing on: {}",
            input_path.display()
        );
        let metadata = ffprobe(input_path).map_err(|err| {
            log::error!("ffprobe failed for {}: {:?}", input_path.display(), err);
            map_ffprobe_error(err, "stream timing")
        })?;

        let video_stream = metadata
            .streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("video"))
            .ok_or_else(|| {
                CoreError::VideoInfoError(format!(
                    "No video stream found in {}",
                    input_path.display()
                ))
            })?;

        // avg_frame_rate is "0/0" for some containers; r_frame_rate is the fallback
        let frame_rate = parse_frame_rate(&video_stream.avg_frame_rate)
            .filter(|fps| *fps > 0.0)
            .or_else(|| parse_frame_rate(&video_stream.r_frame_rate))
            .unwrap_or(0.0);

        let container_duration = metadata
            .format
            .duration
            .as_deref()
            .and_then(|d| d.parse::<f64>().ok());

        // Matroska/WebM carry no nb_frames; estimate from the container duration
        let frame_count = video_stream
            .nb_frames
            .as_deref()
            .and_then(|f| f.parse::<u64>().ok())
            .or_else(|| {
                container_duration
                    .filter(|d| d.is_finite() && *d > 0.0 && frame_rate > 0.0)
                    .map(|d| (d * frame_rate).round() as u64)
            })
            .unwrap_or(0);

        log::trace!(
            "Probed {}: fps={:.3}, frames={}, container duration={:?}",
            input_path.display(),
            frame_rate,
            frame_count,
            container_duration
        );

        Ok(VideoHandle::new(input_path.to_path_buf(), frame_rate, frame_count))
    }
}

fn map_ffprobe_error(err: FfProbeError, context: &str) -> CoreError {
    match err {
        FfProbeError::Io(io_err) => command_start_error(format!("ffprobe ({context})"), io_err),
        FfProbeError::Status(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            command_failed_error(format!("ffprobe ({context})"), output.status, stderr)
        }
        FfProbeError::Deserialize(err) => CoreError::JsonParseError(format!(
            "ffprobe {context} output deserialization: {err}"
        )),
        _ => CoreError::FfprobeParse(format!("Unknown ffprobe error during {context}: {err:?}")),
    }
}

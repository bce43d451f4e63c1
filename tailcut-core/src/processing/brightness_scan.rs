//! Brightness scan boundary detection.
//!
//! Finds the frame closest to the end of the file whose mean gray level is
//! strictly below a threshold, searching only the last `search_secs` seconds.
//!
//! Candidates are the frame indices `k` with `L < k <= frame_count - 1`,
//! where `L = max(frame_count - trunc(search_secs * fps), 0)`. The window is
//! decoded once, front to back, as 8-bit gray, and the last dark frame seen
//! wins. That is the same frame a backward scan would stop at first.
//!
//! Frame indices come from each frame's presentation time, reported by the
//! `showinfo` filter, not from its position in the decoded stream. Containers
//! with millisecond timestamps store most frames slightly early, and frames
//! that fail to decode leave gaps, so positions drift while `pts_time * fps`
//! does not.

use crate::config::BrightnessScanParams;
use crate::error::{CoreError, CoreResult, command_failed_error};
use crate::external::{FfmpegCommandBuilder, FfmpegSpawner, FfprobeExecutor, run_to_completion};
use crate::processing::duration::VideoHandle;

use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;

const SHOWINFO_MARKER: &str = "showinfo";

/// Inclusive range of frame indices examined by the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanWindow {
    pub first: u64,
    pub last: u64,
}

impl ScanWindow {
    /// Number of frames in the window; never zero.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.last - self.first + 1
    }

    #[must_use]
    pub fn contains(&self, index: u64) -> bool {
        (self.first..=self.last).contains(&index)
    }
}

/// Computes the candidate frame range, or `None` when there is nothing to scan.
///
/// The lower bound is exclusive, so frame 0 is never a candidate even when
/// the window covers the whole file.
#[must_use]
pub fn scan_window(frame_count: u64, frame_rate: f64, search_secs: f64) -> Option<ScanWindow> {
    if frame_count == 0 || !frame_rate.is_finite() || frame_rate <= 0.0 {
        return None;
    }
    let window_frames = (search_secs * frame_rate).trunc();
    if !window_frames.is_finite() || window_frames < 1.0 {
        return None;
    }
    let lower = frame_count.saturating_sub(window_frames as u64);
    let first = lower + 1;
    let last = frame_count - 1;
    if first > last {
        return None;
    }
    Some(ScanWindow { first, last })
}

/// Mean of 8-bit gray samples, `None` for an empty buffer.
#[must_use]
pub fn mean_luma(data: &[u8]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    let total: u64 = data.iter().map(|&b| u64::from(b)).sum();
    Some(total as f64 / data.len() as f64)
}

/// Picks the highest frame index whose mean gray level is below `threshold`.
///
/// Takes `(frame index, mean gray level)` pairs; frames outside `window` are
/// ignored.
pub fn select_last_dark_frame<I>(frames: I, window: ScanWindow, threshold: u8) -> Option<u64>
where
    I: IntoIterator<Item = (u64, f64)>,
{
    frames
        .into_iter()
        .filter(|(index, _)| window.contains(*index))
        .filter(|(_, mean)| *mean < f64::from(threshold))
        .map(|(index, _)| index)
        .max()
}

/// Reads `n` and `pts_time` from `showinfo` log lines.
///
/// Example line:
///   [Parsed_showinfo_0 @ 0x55d5c] n:  12 pts:  400 pts_time:0.4 duration: 33 ...
pub struct ShowInfoParser {
    frame_re: Regex,
}

impl ShowInfoParser {
    pub fn new() -> CoreResult<Self> {
        let pattern = r"\bn:\s*(\d+)\s+pts:\s*-?\d+\s+pts_time:\s*([-+]?[0-9]*\.?[0-9]+(?:[eE][-+]?[0-9]+)?)";
        let frame_re = Regex::new(pattern).map_err(|e| {
            CoreError::OperationFailed(format!("Invalid showinfo pattern '{pattern}': {e}"))
        })?;
        Ok(Self { frame_re })
    }

    /// `(output position, presentation time)` of a frame line, `None` for
    /// anything else.
    #[must_use]
    pub fn parse_line(&self, line: &str) -> Option<(u64, f64)> {
        if !line.contains(SHOWINFO_MARKER) {
            return None;
        }
        let caps = self.frame_re.captures(line)?;
        let position = caps.get(1)?.as_str().parse::<u64>().ok()?;
        let pts_time = caps.get(2)?.as_str().parse::<f64>().ok()?;
        pts_time.is_finite().then_some((position, pts_time))
    }
}

/// Source frame index for a presentation time.
#[must_use]
pub fn frame_index_at(pts_time: f64, frame_rate: f64) -> Option<u64> {
    if !pts_time.is_finite() || pts_time < 0.0 || !frame_rate.is_finite() || frame_rate <= 0.0 {
        return None;
    }
    Some((pts_time * frame_rate).round() as u64)
}

/// Seek target half a frame before `window.first`.
///
/// Accurate seeking drops frames stamped before the target, and rounded
/// container timestamps put frame `first` slightly before `first / fps`.
#[must_use]
pub fn seek_time(window: ScanWindow, frame_rate: f64) -> f64 {
    (window.first as f64 - 0.5).max(0.0) / frame_rate
}

fn build_scan_command(input_path: &Path, handle: &VideoHandle, window: ScanWindow) -> FfmpegCommand {
    let seek = seek_time(window, handle.frame_rate);
    let mut cmd = FfmpegCommandBuilder::new().build();
    cmd.arg("-copyts")
        .args(["-ss", &format!("{seek:.6}")])
        .input(input_path.to_string_lossy().into_owned())
        .args(["-map", "0:v:0"])
        .args(["-vf", "showinfo"])
        .args(["-fps_mode", "passthrough"])
        .args(["-frames:v", &window.frame_count().to_string()])
        .args(["-an", "-sn"])
        .format("rawvideo")
        .pix_fmt("gray")
        .output("-");
    cmd
}

/// Pairs decoded frame means with their presentation times.
///
/// `means` holds `(output position, mean)` and `pts_times` maps output
/// positions to `pts_time`. A frame without a timestamp falls back to its
/// position counted from `window.first`.
fn index_frames(
    means: &[(u64, f64)],
    pts_times: &HashMap<u64, f64>,
    window: ScanWindow,
    frame_rate: f64,
) -> Vec<(u64, f64)> {
    let mut untimed = 0usize;
    let indexed = means
        .iter()
        .map(|&(position, mean)| {
            let index = pts_times
                .get(&position)
                .and_then(|&t| frame_index_at(t, frame_rate))
                .unwrap_or_else(|| {
                    untimed += 1;
                    window.first + position
                });
            (index, mean)
        })
        .collect();
    if untimed > 0 {
        log::warn!(
            "{} decoded frame(s) had no showinfo timestamp; indexed by stream position",
            untimed
        );
    }
    indexed
}

/// Decodes the scan window and returns the index of the last dark frame.
pub fn find_last_dark_frame_index<S: FfmpegSpawner>(
    spawner: &S,
    handle: &VideoHandle,
    params: &BrightnessScanParams,
) -> CoreResult<Option<u64>> {
    let Some(window) = scan_window(handle.frame_count, handle.frame_rate, params.search_secs) else {
        log::debug!(
            "Nothing to scan in {} ({} frames at {:.3} fps)",
            handle.path.display(),
            handle.frame_count,
            handle.frame_rate
        );
        return Ok(None);
    };

    log::debug!(
        "Brightness scan of {}: frames {}..={} (threshold {})",
        handle.path.display(),
        window.first,
        window.last,
        params.threshold
    );

    let parser = ShowInfoParser::new()?;
    let cmd = build_scan_command(&handle.path, handle, window);
    // Frames arrive on stdout and showinfo lines on stderr, in no fixed
    // relative order; both are keyed by output position and joined afterwards.
    let mut means: Vec<(u64, f64)> = Vec::new();
    let mut pts_times: HashMap<u64, f64> = HashMap::new();
    let mut stderr_output = String::new();

    let status = run_to_completion(spawner, cmd, |event| {
        match event {
            FfmpegEvent::OutputFrame(frame) => {
                if let Some(mean) = mean_luma(&frame.data) {
                    means.push((u64::from(frame.frame_num), mean));
                }
            }
            FfmpegEvent::Log(_, line) => {
                if let Some((position, pts_time)) = parser.parse_line(&line) {
                    pts_times.insert(position, pts_time);
                }
            }
            FfmpegEvent::Error(line) => {
                stderr_output.push_str(&line);
                stderr_output.push('\n');
            }
            _ => {}
        }
        Ok(())
    })?;

    let frames_seen = means.len();
    if !status.success() {
        if frames_seen == 0 {
            return Err(command_failed_error(
                "ffmpeg (brightness scan)",
                status,
                stderr_output.trim_end(),
            ));
        }
        // Decode errors late in the window still leave usable frames
        log::warn!(
            "ffmpeg exited with {} after {} frame(s) of {}; using frames decoded so far",
            status,
            frames_seen,
            handle.path.display()
        );
    }

    log::trace!(
        "Brightness scan decoded {} of {} frame(s)",
        frames_seen,
        window.frame_count()
    );
    let indexed = index_frames(&means, &pts_times, window, handle.frame_rate);
    Ok(select_last_dark_frame(indexed, window, params.threshold))
}

/// Timestamp of the last frame darker than `params.threshold`.
///
/// Returns `NoBlackFrame` when no frame in the window qualifies, which
/// includes files whose frame rate is unknown.
pub fn find_last_black_frame<S, P>(
    spawner: &S,
    prober: &P,
    input_path: &Path,
    params: &BrightnessScanParams,
) -> CoreResult<f64>
where
    S: FfmpegSpawner,
    P: FfprobeExecutor,
{
    let handle = prober.probe_video(input_path)?;
    match find_last_dark_frame_index(spawner, &handle, params)? {
        Some(index) => {
            let timestamp = handle.frame_timestamp(index);
            log::info!(
                "Last dark frame of {} is #{} at {:.3}s",
                input_path.display(),
                index,
                timestamp
            );
            Ok(timestamp)
        }
        None => Err(CoreError::NoBlackFrame {
            threshold: params.threshold,
            window_secs: params.search_secs,
        }),
    }
}

// ============================================================================
// tailcut-core/src/processing/black_detect.rs
// ============================================================================
//
// BLACKDETECT BOUNDARY: Cut point from ffmpeg blackdetect diagnostics
//
// Runs ffmpeg over the whole file with the `blackdetect` filter, collects
// every reported black region in emission order, and picks the start of the
// region `region_from_end` positions from the last one.
//
// Example diagnostic line:
//   [blackdetect @ 0x55d5c] black_start:95.2 black_end:96.04 black_duration:0.84
//
// A line that mentions `black_start` without a readable number is a parse
// error rather than something to skip silently.

use crate::config::BlackDetectParams;
use crate::error::{CoreError, CoreResult, command_failed_error};
use crate::external::{FfmpegCommandBuilder, FfmpegSpawner, run_to_completion};

use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use regex::Regex;
use serde::Serialize;
use std::path::Path;

const BLACK_START_MARKER: &str = "black_start";

/// One black run reported by blackdetect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BlackRegion {
    pub start: f64,
    pub end: Option<f64>,
    pub duration: Option<f64>,
}

/// All black regions of one file, in the order ffmpeg reported them.
///
/// Duplicates are kept; selection counts positions, not distinct times.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BlackRegionReport {
    pub regions: Vec<BlackRegion>,
}

impl BlackRegionReport {
    #[must_use]
    pub fn from_starts(starts: &[f64]) -> Self {
        Self {
            regions: starts
                .iter()
                .map(|&start| BlackRegion {
                    start,
                    end: None,
                    duration: None,
                })
                .collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    #[must_use]
    pub fn starts(&self) -> Vec<f64> {
        self.regions.iter().map(|r| r.start).collect()
    }

    /// Start of the region at index `len - position_from_end`.
    ///
    /// `position_from_end` of 1 is the last region. Fewer regions than
    /// requested yields `InsufficientDetections`.
    pub fn select_from_end(&self, position_from_end: usize) -> CoreResult<f64> {
        if position_from_end == 0 || self.regions.len() < position_from_end {
            return Err(CoreError::InsufficientDetections {
                found: self.regions.len(),
                required: position_from_end.max(1),
            });
        }
        Ok(self.regions[self.regions.len() - position_from_end].start)
    }
}

/// Compiled patterns for blackdetect lines.
pub struct BlackDetectParser {
    start_re: Regex,
    end_re: Regex,
    duration_re: Regex,
}

impl BlackDetectParser {
    pub fn new() -> CoreResult<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| {
                CoreError::OperationFailed(format!("Invalid blackdetect pattern '{pattern}': {e}"))
            })
        };
        Ok(Self {
            start_re: compile(r"black_start:\s*([-+]?[0-9]*\.?[0-9]+(?:[eE][-+]?[0-9]+)?)")?,
            end_re: compile(r"black_end:\s*([-+]?[0-9]*\.?[0-9]+(?:[eE][-+]?[0-9]+)?)")?,
            duration_re: compile(r"black_duration:\s*([-+]?[0-9]*\.?[0-9]+(?:[eE][-+]?[0-9]+)?)")?,
        })
    }

    /// Parses one ffmpeg log line.
    ///
    /// Returns `Ok(None)` for lines without the `black_start` marker and
    /// `BlackDetectParse` for marker lines whose start cannot be read.
    pub fn parse_line(&self, line: &str) -> CoreResult<Option<BlackRegion>> {
        if !line.contains(BLACK_START_MARKER) {
            return Ok(None);
        }

        let start = capture_f64(&self.start_re, line)
            .filter(|s| s.is_finite() && *s >= 0.0)
            .ok_or_else(|| CoreError::BlackDetectParse(line.trim().to_string()))?;

        Ok(Some(BlackRegion {
            start,
            end: capture_f64(&self.end_re, line),
            duration: capture_f64(&self.duration_re, line),
        }))
    }

    /// Parses a whole diagnostic transcript, keeping emission order.
    pub fn parse_output(&self, output: &str) -> CoreResult<BlackRegionReport> {
        let mut report = BlackRegionReport::default();
        for line in output.lines() {
            if let Some(region) = self.parse_line(line)? {
                report.regions.push(region);
            }
        }
        Ok(report)
    }
}

fn capture_f64(re: &Regex, line: &str) -> Option<f64> {
    re.captures(line)?.get(1)?.as_str().parse::<f64>().ok()
}

/// `blackdetect=d=<d>:pic_th=<p>:pix_th=<x>`
#[must_use]
pub fn build_blackdetect_filter(params: &BlackDetectParams) -> String {
    format!(
        "blackdetect=d={}:pic_th={}:pix_th={}",
        params.min_duration, params.picture_threshold, params.pixel_threshold
    )
}

fn build_blackdetect_command(input_path: &Path, params: &BlackDetectParams) -> FfmpegCommand {
    let mut cmd = FfmpegCommandBuilder::new()
        .with_hardware_accel(params.use_hw_decode)
        .build();
    cmd.input(input_path.to_string_lossy().into_owned())
        .args(["-vf", &build_blackdetect_filter(params)])
        .args(["-an"])
        .format("null")
        .output("-");
    cmd
}

/// Runs blackdetect over the whole file and returns every reported region.
pub fn collect_black_regions<S: FfmpegSpawner>(
    spawner: &S,
    input_path: &Path,
    params: &BlackDetectParams,
) -> CoreResult<BlackRegionReport> {
    let parser = BlackDetectParser::new()?;
    let cmd = build_blackdetect_command(input_path, params);

    log::debug!(
        "Running blackdetect on {} ({})",
        input_path.display(),
        build_blackdetect_filter(params)
    );

    let mut report = BlackRegionReport::default();
    let mut error_lines = String::new();

    let status = run_to_completion(spawner, cmd, |event| {
        match event {
            FfmpegEvent::Log(_, line) | FfmpegEvent::Error(line) => {
                if let Some(region) = parser.parse_line(&line)? {
                    log::trace!("blackdetect region: {:?}", region);
                    report.regions.push(region);
                } else if line.to_ascii_lowercase().contains("error") {
                    error_lines.push_str(&line);
                    error_lines.push('\n');
                }
            }
            _ => {}
        }
        Ok(())
    })?;

    if !status.success() {
        log::error!(
            "ffmpeg blackdetect failed for {} with status {}",
            input_path.display(),
            status
        );
        return Err(command_failed_error(
            "ffmpeg (blackdetect)",
            status,
            error_lines.trim_end(),
        ));
    }

    log::debug!(
        "blackdetect reported {} region(s) for {}",
        report.len(),
        input_path.display()
    );
    Ok(report)
}

/// Start time of the black region `params.region_from_end` positions from the end.
pub fn detect_black_region_start<S: FfmpegSpawner>(
    spawner: &S,
    input_path: &Path,
    params: &BlackDetectParams,
) -> CoreResult<f64> {
    let report = collect_black_regions(spawner, input_path, params)?;
    let start = report.select_from_end(params.region_from_end)?;
    log::info!(
        "Black region {} from end of {} starts at {:.3}s",
        params.region_from_end,
        input_path.display(),
        start
    );
    Ok(start)
}

// ============================================================================
// tailcut-core/src/processing/batch.rs
// ============================================================================
//
// BATCH DRIVER: Runs the configured pipeline over a list of files
//
// WORKFLOW (per file):
// 1. Probe the source duration
// 2. Fixed-offset stage (modes `fixed` and `fixed-then-detect`)
// 3. Boundary detection on the source or the stage-one output
// 4. Validate the cut point and stream-copy [0, cut) to the output directory
//
// Every per-file error is caught here and recorded in the summary. Only
// problems that affect the whole run (invalid config, unusable output
// directory) are returned as errors.

use crate::config::{CoreConfig, PipelineMode};
use crate::error::{CoreError, CoreResult};
use crate::external::{FfmpegSpawner, FfprobeExecutor};
use crate::processing::detect_boundary;
use crate::processing::duration::probe_duration;
use crate::processing::fixed_offset::{CutDecision, trim_fixed_offset};
use crate::processing::trim::{trim_to, validate_cut_point};
use crate::temp_files::IntermediateDir;
use crate::terminal;
use crate::utils::{
    format_bytes, format_duration, format_timestamp, get_file_size, get_filename_safe,
};

use log::{debug, error, info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Details of one successfully trimmed file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrimResult {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// End of the kept range, in seconds from the start of the source
    pub cut_point: f64,
    /// Cut applied by the fixed-offset stage, when it ran
    pub fixed_offset_cut: Option<f64>,
    /// Source duration; `0.0` when unknown
    pub source_duration: f64,
    /// `source_duration - cut_point`, when the duration is known
    pub trimmed_from_end: Option<f64>,
    pub input_size: u64,
    pub output_size: u64,
    pub elapsed_secs: f64,
}

/// What happened to one input file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Trimmed(TrimResult),
    Skipped { reason: String },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    pub filename: String,
    pub outcome: FileOutcome,
}

/// Results of a whole run, one report per input file in processing order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub results: Vec<FileReport>,
}

impl BatchSummary {
    pub fn trimmed(&self) -> impl Iterator<Item = &TrimResult> {
        self.results.iter().filter_map(|r| match &r.outcome {
            FileOutcome::Trimmed(result) => Some(result),
            _ => None,
        })
    }

    #[must_use]
    pub fn trimmed_count(&self) -> usize {
        self.trimmed().count()
    }

    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, FileOutcome::Skipped { .. }))
            .count()
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, FileOutcome::Failed { .. }))
            .count()
    }

    /// Seconds removed across all trimmed files with a known duration.
    #[must_use]
    pub fn total_trimmed_secs(&self) -> f64 {
        self.trimmed().filter_map(|r| r.trimmed_from_end).sum()
    }
}

/// Processes every file in `files_to_process` with the pipeline selected by `config`.
///
/// Spawner and prober are injected so tests can replace ffmpeg and ffprobe.
///
/// # Errors
///
/// Returns an error only when the run cannot start: an invalid configuration,
/// or an output/intermediate directory that cannot be created. Per-file
/// failures end up in the returned [`BatchSummary`].
///
/// # Example
///
/// ```rust,no_run
/// use tailcut_core::{CoreConfig, process_videos, find_processable_files};
/// use tailcut_core::external::{CrateFfprobeExecutor, SidecarSpawner};
/// use std::path::PathBuf;
///
/// let config = CoreConfig::new(
///     PathBuf::from("./videos"),
///     PathBuf::from("./trimmed_videos"),
///     PathBuf::from("./trimmed_videos/logs"),
/// );
/// let files = find_processable_files(&config.input_dir, &config.extension)?;
/// let summary = process_videos(&SidecarSpawner, &CrateFfprobeExecutor::new(), &config, &files)?;
/// println!("{} trimmed, {} failed", summary.trimmed_count(), summary.failed_count());
/// # Ok::<(), tailcut_core::CoreError>(())
/// ```
pub fn process_videos<S: FfmpegSpawner, P: FfprobeExecutor>(
    spawner: &S,
    prober: &P,
    config: &CoreConfig,
    files_to_process: &[PathBuf],
) -> CoreResult<BatchSummary> {
    config.validate()?;
    std::fs::create_dir_all(&config.output_dir)?;

    let intermediate = if config.mode == PipelineMode::FixedOffsetThenDetect {
        Some(IntermediateDir::prepare(config)?)
    } else {
        None
    };

    debug!(
        "Processing {} file(s): mode={}, detector={}",
        files_to_process.len(),
        config.mode,
        config.detector
    );

    let mut summary = BatchSummary::default();

    for input_path in files_to_process {
        let filename = match get_filename_safe(input_path) {
            Ok(name) => name,
            Err(e) => {
                error!("{}", e);
                summary.results.push(FileReport {
                    filename: input_path.display().to_string(),
                    outcome: FileOutcome::Failed {
                        error: e.to_string(),
                    },
                });
                continue;
            }
        };

        terminal::print_processing(&format!("Processing: {filename}"));

        let output_path = config.output_dir.join(&filename);
        let outcome = match process_file(
            spawner,
            prober,
            config,
            input_path,
            &output_path,
            intermediate.as_ref(),
        ) {
            Ok(outcome) => outcome,
            Err(e) if e.is_not_found() => {
                warn!("No cut point for {}: {}. Skipping.", filename, e);
                FileOutcome::Skipped {
                    reason: e.to_string(),
                }
            }
            Err(e) => {
                error!("Failed to trim {}: {}", filename, e);
                FileOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };

        report_outcome(&filename, &outcome);
        summary.results.push(FileReport { filename, outcome });
    }

    Ok(summary)
}

fn process_file<S: FfmpegSpawner, P: FfprobeExecutor>(
    spawner: &S,
    prober: &P,
    config: &CoreConfig,
    input_path: &Path,
    output_path: &Path,
    intermediate: Option<&IntermediateDir>,
) -> CoreResult<FileOutcome> {
    ensure_distinct_output(input_path, output_path)?;

    let start_time = Instant::now();
    let source_duration = probe_duration(prober, input_path)?;
    debug!(
        "Source duration of {}: {}",
        input_path.display(),
        format_duration(source_duration)
    );

    let (cut_point, fixed_offset_cut) = match config.mode {
        PipelineMode::FixedOffset => {
            match trim_fixed_offset(
                spawner,
                input_path,
                output_path,
                source_duration,
                config.fixed_offset_secs,
            )? {
                CutDecision::Cut(cut) => (cut, Some(cut)),
                CutDecision::Skip => return Ok(too_short(source_duration, config.fixed_offset_secs)),
            }
        }
        PipelineMode::FixedOffsetThenDetect => {
            let intermediate = intermediate.ok_or_else(|| {
                CoreError::OperationFailed("Intermediate directory was not prepared".to_string())
            })?;
            let stage_path = intermediate.file_path(&get_filename_safe(input_path)?);

            let stage_cut = match trim_fixed_offset(
                spawner,
                input_path,
                &stage_path,
                source_duration,
                config.fixed_offset_secs,
            )? {
                CutDecision::Cut(cut) => cut,
                CutDecision::Skip => return Ok(too_short(source_duration, config.fixed_offset_secs)),
            };

            let result = detect_and_trim(spawner, prober, config, &stage_path, output_path, stage_cut);
            if matches!(intermediate, IntermediateDir::Temporary(_)) {
                if let Err(e) = std::fs::remove_file(&stage_path) {
                    warn!("Failed to remove intermediate {}: {}", stage_path.display(), e);
                }
            }
            (result?, Some(stage_cut))
        }
        PipelineMode::Detect => {
            let cut = detect_and_trim(spawner, prober, config, input_path, output_path, source_duration)?;
            (cut, None)
        }
    };

    let trimmed_from_end = (source_duration > 0.0).then(|| source_duration - cut_point);
    let input_size = get_file_size(input_path)?;
    let output_size = get_file_size(output_path).unwrap_or_else(|e| {
        warn!("Could not read size of {}: {}", output_path.display(), e);
        0
    });

    Ok(FileOutcome::Trimmed(TrimResult {
        input_path: input_path.to_path_buf(),
        output_path: output_path.to_path_buf(),
        cut_point,
        fixed_offset_cut,
        source_duration,
        trimmed_from_end,
        input_size,
        output_size,
        elapsed_secs: start_time.elapsed().as_secs_f64(),
    }))
}

/// Detects the boundary in `detect_input` and writes `[0, cut)` to `output_path`.
fn detect_and_trim<S: FfmpegSpawner, P: FfprobeExecutor>(
    spawner: &S,
    prober: &P,
    config: &CoreConfig,
    detect_input: &Path,
    output_path: &Path,
    detect_input_duration: f64,
) -> CoreResult<f64> {
    let cut = detect_boundary(spawner, prober, detect_input, config)?;
    validate_cut_point(cut, detect_input_duration)?;
    trim_to(spawner, detect_input, output_path, cut)?;
    Ok(cut)
}

fn too_short(duration: f64, offset: f64) -> FileOutcome {
    FileOutcome::Skipped {
        reason: format!(
            "Duration {duration:.2}s is not longer than the {offset:.2}s offset"
        ),
    }
}

/// Refuses to write over the file being read.
fn ensure_distinct_output(input_path: &Path, output_path: &Path) -> CoreResult<()> {
    let same = match (input_path.canonicalize(), output_path.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => input_path == output_path,
    };
    if same {
        return Err(CoreError::PathError(format!(
            "Output would overwrite the input file {}",
            input_path.display()
        )));
    }
    Ok(())
}

fn report_outcome(filename: &str, outcome: &FileOutcome) {
    match outcome {
        FileOutcome::Trimmed(result) => {
            terminal::print_status("Cut point", &format_timestamp(result.cut_point), true);
            if let Some(trimmed) = result.trimmed_from_end {
                terminal::print_status("Trimmed", &format!("{trimmed:.2}s from end"), false);
            }
            terminal::print_status(
                "Size",
                &format!(
                    "{} -> {}",
                    format_bytes(result.input_size),
                    format_bytes(result.output_size)
                ),
                false,
            );
            match result.trimmed_from_end {
                Some(trimmed) => info!("Completed: {filename}. Trimmed {trimmed:.2}s from end"),
                None => info!("Completed: {filename}. Source duration unknown"),
            }
            terminal::print_success(&format!("Completed: {filename}"));
        }
        FileOutcome::Skipped { reason } => {
            terminal::print_warning(&format!("Skipped {filename}: {reason}"));
        }
        FileOutcome::Failed { error } => {
            terminal::print_error(
                &format!("Failed: {filename}"),
                error,
                Some("Check the run log for the ffmpeg error output"),
            );
        }
    }
}

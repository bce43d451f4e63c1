//! Implementation of the 'trim' subcommand.
//!
//! Resolves the input into a list of files, builds the core configuration
//! from the CLI flags, runs the batch pipeline and reports the results.

use crate::cli::TrimArgs;
use crate::commands::apply_detector_args;
use crate::error::{CliErrorContext, CliResult};
use crate::logging::summary_path;

use tailcut_core::external::{CrateFfprobeExecutor, SidecarSpawner, check_required_tools};
use tailcut_core::hardware_decode::describe_decoding;
use tailcut_core::utils::has_extension;
use tailcut_core::{
    BatchSummary, CoreConfig, CoreConfigBuilder, CoreError, DetectorKind, FileOutcome,
    PipelineMode, format_bytes, terminal,
};

use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Paths and flags decided before logging starts.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub log_dir: PathBuf,
    pub log_file: Option<PathBuf>,
    pub timestamp: String,
    /// Write the JSON run summary next to the run log
    pub write_summary: bool,
}

/// Discovers files with the configured extension from the input path (file
/// or directory). Returns (files, effective_input_dir).
pub fn discover_trim_files(args: &TrimArgs) -> CliResult<(Vec<PathBuf>, PathBuf)> {
    let input_path = args.input_path.canonicalize().map_err(|e| {
        CoreError::PathError(format!(
            "Invalid input path '{}': {}",
            args.input_path.display(),
            e
        ))
    })?;

    let metadata = fs::metadata(&input_path).map_err(|e| {
        CoreError::PathError(format!(
            "Failed to access input path '{}': {}",
            input_path.display(),
            e
        ))
    })?;

    if metadata.is_dir() {
        match tailcut_core::find_processable_files(&input_path, &args.extension) {
            Ok(files) => Ok((files, input_path.clone())),
            Err(CoreError::NoFilesFound) => Ok((Vec::new(), input_path.clone())),
            Err(e) => Err(e),
        }
    } else if metadata.is_file() {
        if has_extension(&input_path, &args.extension) {
            let parent_dir = input_path
                .parent()
                .ok_or_else(|| {
                    CoreError::PathError(format!(
                        "Could not determine parent directory for file '{}'",
                        input_path.display()
                    ))
                })?
                .to_path_buf();
            Ok((vec![input_path.clone()], parent_dir))
        } else {
            Err(CoreError::PathError(format!(
                "Input file '{}' is not a .{} file",
                input_path.display(),
                args.extension.trim_start_matches('.')
            )))
        }
    } else {
        Err(CoreError::PathError(format!(
            "Input path '{}' is neither a file nor a directory",
            input_path.display()
        )))
    }
}

/// Creates and validates the CoreConfig for a trim run.
pub fn create_core_config(
    args: &TrimArgs,
    effective_input_dir: PathBuf,
    log_dir: PathBuf,
) -> CliResult<CoreConfig> {
    let mut builder = CoreConfigBuilder::new()
        .input_dir(effective_input_dir)
        .output_dir(args.output_dir.clone())
        .log_dir(log_dir)
        .extension(&args.extension)
        .mode(args.mode)
        .fixed_offset_secs(args.fixed_offset_secs)
        .keep_intermediate(args.keep_intermediate);

    if let Some(temp_dir) = &args.temp_dir {
        builder = builder.temp_dir(temp_dir.clone());
    }

    let config = apply_detector_args(builder, &args.detector).build();
    config.validate()?;
    Ok(config)
}

/// Main entry point for the trim command.
pub fn run_trim(
    args: TrimArgs,
    files: Vec<PathBuf>,
    effective_input_dir: PathBuf,
    ctx: &RunContext,
) -> CliResult<BatchSummary> {
    let total_start_time = Instant::now();
    let config = create_core_config(&args, effective_input_dir, ctx.log_dir.clone())?;

    print_configuration(&config, ctx);

    if files.is_empty() {
        terminal::print_warning(&format!(
            "No processable .{} files found in {}",
            config.extension,
            args.input_path.display()
        ));
        return Ok(BatchSummary::default());
    }

    check_required_tools()?;
    debug!("External dependency check passed.");

    terminal::print_section("Processing");
    info!("Found {} file(s) to process.", files.len());

    let summary = tailcut_core::process_videos(
        &SidecarSpawner,
        &CrateFfprobeExecutor::new(),
        &config,
        &files,
    )?;

    print_summary(&summary, total_start_time.elapsed().as_secs_f64());

    if ctx.write_summary {
        let path = summary_path(&ctx.log_dir, &ctx.timestamp);
        write_summary_json(&summary, &path)?;
        info!("Run summary written to {}", path.display());
    }

    Ok(summary)
}

fn print_configuration(config: &CoreConfig, ctx: &RunContext) {
    terminal::print_section("Configuration");
    terminal::print_status("Input", &config.input_dir.display().to_string(), false);
    terminal::print_status("Output", &config.output_dir.display().to_string(), false);
    if let Some(log_file) = &ctx.log_file {
        terminal::print_status("Log file", &log_file.display().to_string(), false);
    }
    terminal::print_status("Mode", &config.mode.to_string(), true);
    if config.mode.uses_fixed_offset() {
        terminal::print_status("Offset", &format!("{:.2}s", config.fixed_offset_secs), false);
    }
    if config.mode.uses_detector() {
        terminal::print_status("Detector", &config.detector.to_string(), true);
        match config.detector {
            DetectorKind::BlackDetect => {
                let bd = &config.black_detect;
                terminal::print_status(
                    "Thresholds",
                    &format!(
                        "pic_th={} pix_th={} d={}",
                        bd.picture_threshold, bd.pixel_threshold, bd.min_duration
                    ),
                    false,
                );
                terminal::print_status("Region", &format!("{} from end", bd.region_from_end), false);
                terminal::print_status("Decoding", &describe_decoding(bd.use_hw_decode), false);
            }
            DetectorKind::BrightnessScan => {
                let bs = &config.brightness;
                terminal::print_status("Threshold", &format!("mean < {}", bs.threshold), false);
                terminal::print_status("Window", &format!("last {:.1}s", bs.search_secs), false);
            }
        }
    }
    if config.mode == PipelineMode::FixedOffsetThenDetect && config.keep_intermediate {
        terminal::print_status(
            "Intermediate",
            &config.intermediate_dir().display().to_string(),
            false,
        );
    }
}

fn print_summary(summary: &BatchSummary, total_secs: f64) {
    terminal::print_section("Summary");

    for report in &summary.results {
        match &report.outcome {
            FileOutcome::Trimmed(result) => {
                let detail = match result.trimmed_from_end {
                    Some(trimmed) => format!("cut at {:.3}s, {trimmed:.2}s removed", result.cut_point),
                    None => format!("cut at {:.3}s", result.cut_point),
                };
                terminal::print_sub_item(&format!("{}: {detail}", report.filename));
            }
            FileOutcome::Skipped { reason } => {
                terminal::print_sub_item(&format!("{}: skipped ({reason})", report.filename));
            }
            FileOutcome::Failed { error } => {
                terminal::print_sub_item(&format!("{}: failed ({error})", report.filename));
            }
        }
    }

    let input_total: u64 = summary.trimmed().map(|r| r.input_size).sum();
    let output_total: u64 = summary.trimmed().map(|r| r.output_size).sum();

    info!("");
    terminal::print_status("Trimmed", &summary.trimmed_count().to_string(), true);
    terminal::print_status("Skipped", &summary.skipped_count().to_string(), false);
    terminal::print_status("Failed", &summary.failed_count().to_string(), false);
    terminal::print_status(
        "Removed",
        &format!("{:.2}s total", summary.total_trimmed_secs()),
        false,
    );
    terminal::print_status(
        "Size",
        &format!("{} -> {}", format_bytes(input_total), format_bytes(output_total)),
        false,
    );
    terminal::print_status("Total time", &format!("{total_secs:.1}s"), false);

    if summary.failed_count() == 0 {
        terminal::print_success("Run complete");
    } else {
        terminal::print_warning("Run complete with failures; see the log for details");
    }
}

/// Writes the run summary as pretty JSON.
pub fn write_summary_json(summary: &BatchSummary, path: &Path) -> CliResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .cli_with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(summary)
        .map_err(|e| CoreError::JsonParseError(format!("Run summary serialization: {e}")))?;
    fs::write(path, json).cli_with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use tailcut_core::FileReport;

    fn trim_args(extra: &[&str]) -> TrimArgs {
        let mut argv = vec!["tailcut", "trim"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Trim(args) => args,
            other => panic!("expected trim, got {other:?}"),
        }
    }

    #[test]
    fn test_discover_directory_and_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("a.webm");
        fs::write(&video, b"x").unwrap();
        fs::write(dir.path().join("b.txt"), b"x").unwrap();

        let args = trim_args(&["-i", dir.path().to_str().unwrap(), "-o", "out"]);
        let (files, input_dir) = discover_trim_files(&args).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(input_dir, dir.path().canonicalize().unwrap());

        let args = trim_args(&["-i", video.to_str().unwrap(), "-o", "out"]);
        let (files, input_dir) = discover_trim_files(&args).unwrap();
        assert_eq!(files, vec![video.canonicalize().unwrap()]);
        assert_eq!(input_dir, dir.path().canonicalize().unwrap());
    }

    #[test]
    fn test_discover_rejects_other_extension_and_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let text = dir.path().join("notes.txt");
        fs::write(&text, b"x").unwrap();

        let args = trim_args(&["-i", text.to_str().unwrap(), "-o", "out"]);
        assert!(matches!(discover_trim_files(&args), Err(CoreError::PathError(_))));

        let missing = dir.path().join("missing");
        let args = trim_args(&["-i", missing.to_str().unwrap(), "-o", "out"]);
        let err = discover_trim_files(&args).unwrap_err();
        assert!(err.to_string().contains("Invalid input path"));
    }

    #[test]
    fn test_empty_directory_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = trim_args(&["-i", dir.path().to_str().unwrap(), "-o", "out"]);
        let (files, _) = discover_trim_files(&args).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_core_config_from_args() {
        let args = trim_args(&[
            "-o",
            "out",
            "--mode",
            "fixed",
            "--offset",
            "20",
            "--temp-dir",
            "/scratch",
            "--detector",
            "brightness",
            "--search-secs",
            "60",
        ]);
        let config =
            create_core_config(&args, PathBuf::from("in"), PathBuf::from("out/logs")).unwrap();
        assert_eq!(config.mode, PipelineMode::FixedOffset);
        assert_eq!(config.fixed_offset_secs, 20.0);
        assert_eq!(config.temp_dir, Some(PathBuf::from("/scratch")));
        assert_eq!(config.detector, DetectorKind::BrightnessScan);
        assert_eq!(config.brightness.search_secs, 60.0);
        assert_eq!(config.log_dir, PathBuf::from("out/logs"));
    }

    #[test]
    fn test_invalid_flags_fail_validation() {
        let args = trim_args(&["-o", "out", "--region-from-end", "0"]);
        assert!(matches!(
            create_core_config(&args, PathBuf::from("in"), PathBuf::from("logs")),
            Err(CoreError::Config(_))
        ));
    }

    #[test]
    fn test_write_summary_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("summary.json");
        let summary = BatchSummary {
            results: vec![FileReport {
                filename: "a.webm".to_string(),
                outcome: FileOutcome::Failed {
                    error: "boom".to_string(),
                },
            }],
        };

        write_summary_json(&summary, &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["results"][0]["filename"], "a.webm");
        assert_eq!(value["results"][0]["outcome"]["status"], "failed");
    }
}

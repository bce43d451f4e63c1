//! Implementation of the 'probe' subcommand.
//!
//! Prints the timing of a single file and the cut point the detectors would
//! choose. Nothing is written.

use crate::cli::{DetectorArgs, ProbeArgs};
use crate::commands::apply_detector_args;
use crate::error::CliResult;

use tailcut_core::external::{
    CrateFfprobeExecutor, FfmpegSpawner, FfprobeExecutor, SidecarSpawner, check_required_tools,
};
use tailcut_core::processing::validate_cut_point;
use tailcut_core::{
    CoreConfig, CoreConfigBuilder, CoreError, DetectorKind, detect_boundary, format_duration,
    terminal,
};

use log::debug;
use std::path::Path;

/// What one detector reported for the probed file.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeFinding {
    CutPoint(f64),
    NotFound(String),
}

/// Builds the detector configuration for a probe run.
pub fn probe_config(file: &Path, args: &DetectorArgs) -> CliResult<CoreConfig> {
    let parent = file.parent().unwrap_or(Path::new(".")).to_path_buf();
    let config = apply_detector_args(
        CoreConfigBuilder::new()
            .input_dir(parent.clone())
            .output_dir(parent),
        args,
    )
    .build();
    config.validate()?;
    Ok(config)
}

/// The detectors a probe run should use.
pub fn detectors_to_run(args: &ProbeArgs) -> Vec<DetectorKind> {
    if args.all_detectors {
        vec![DetectorKind::BlackDetect, DetectorKind::BrightnessScan]
    } else {
        vec![args.detector.detector]
    }
}

/// Runs one detector, turning "no usable cut point" into a finding.
pub fn probe_detector<S: FfmpegSpawner, P: FfprobeExecutor>(
    spawner: &S,
    prober: &P,
    file: &Path,
    config: &CoreConfig,
) -> CliResult<ProbeFinding> {
    match detect_boundary(spawner, prober, file, config) {
        Ok(cut) => Ok(ProbeFinding::CutPoint(cut)),
        Err(e) if e.is_not_found() => Ok(ProbeFinding::NotFound(e.to_string())),
        Err(e) => Err(e),
    }
}

/// Main entry point for the probe command.
pub fn run_probe(args: ProbeArgs) -> CliResult<()> {
    if !args.file.is_file() {
        return Err(CoreError::PathError(format!(
            "Input file '{}' does not exist or is not a file",
            args.file.display()
        )));
    }

    check_required_tools()?;

    let spawner = SidecarSpawner;
    let prober = CrateFfprobeExecutor::new();
    let filename = tailcut_core::utils::get_filename_safe(&args.file)?;

    terminal::print_section("Probe");
    terminal::print_processing(&filename);

    let video = prober.probe_video(&args.file)?;
    let duration = video.duration_secs();
    terminal::print_status("Frame rate", &format!("{:.3} fps", video.frame_rate), false);
    terminal::print_status("Frames", &video.frame_count.to_string(), false);
    terminal::print_status(
        "Duration",
        &format!("{duration:.3}s ({})", format_duration(duration)),
        true,
    );

    let mut config = probe_config(&args.file, &args.detector)?;
    for detector in detectors_to_run(&args) {
        config.detector = detector;
        debug!("Running {detector} on {}", args.file.display());

        let label = format!("{detector}");
        match probe_detector(&spawner, &prober, &args.file, &config)? {
            ProbeFinding::CutPoint(cut) => {
                terminal::print_status(&label, &format!("cut at {cut:.3}s"), true);
                match validate_cut_point(cut, duration) {
                    Ok(()) => terminal::print_sub_item(&format!(
                        "would remove {:.2}s from the end",
                        duration - cut
                    )),
                    Err(e) => terminal::print_warning(&e.to_string()),
                }
            }
            ProbeFinding::NotFound(reason) => {
                terminal::print_status(&label, "no cut point", false);
                terminal::print_sub_item(&reason);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    fn probe_args(extra: &[&str]) -> ProbeArgs {
        let mut argv = vec!["tailcut", "probe", "/videos/a.webm"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Probe(args) => args,
            other => panic!("expected probe, got {other:?}"),
        }
    }

    #[test]
    fn test_detectors_to_run() {
        assert_eq!(
            detectors_to_run(&probe_args(&[])),
            vec![DetectorKind::BlackDetect]
        );
        assert_eq!(
            detectors_to_run(&probe_args(&["--detector", "brightness"])),
            vec![DetectorKind::BrightnessScan]
        );
        assert_eq!(
            detectors_to_run(&probe_args(&["--all-detectors"])),
            vec![DetectorKind::BlackDetect, DetectorKind::BrightnessScan]
        );
    }

    #[test]
    fn test_probe_config_uses_detector_flags() {
        let args = probe_args(&["--region-from-end", "2", "--pic-th", "0.9"]);
        let config = probe_config(&args.file, &args.detector).unwrap();
        assert_eq!(config.black_detect.region_from_end, 2);
        assert_eq!(config.black_detect.picture_threshold, 0.9);
        assert_eq!(config.input_dir, Path::new("/videos"));
    }

    #[test]
    fn test_probe_config_rejects_bad_threshold() {
        let args = probe_args(&["--pic-th", "1.5"]);
        assert!(matches!(
            probe_config(&args.file, &args.detector),
            Err(CoreError::Config(_))
        ));
    }

    #[test]
    fn test_missing_file_is_a_path_error() {
        let args = probe_args(&[]);
        let dir = tempfile::tempdir().unwrap();
        let args = ProbeArgs {
            file: dir.path().join("missing.webm"),
            ..args
        };
        assert!(matches!(run_probe(args), Err(CoreError::PathError(_))));
    }
}

// tailcut-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tailcut_core::config::{
    DEFAULT_BRIGHTNESS_THRESHOLD, DEFAULT_EXTENSION, DEFAULT_FIXED_OFFSET_SECS,
    DEFAULT_MIN_BLACK_DURATION, DEFAULT_PICTURE_THRESHOLD, DEFAULT_PIXEL_THRESHOLD,
    DEFAULT_REGION_FROM_END, DEFAULT_SEARCH_SECS, DetectorKind, PipelineMode,
};

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Tailcut: trim video tails at a black-frame boundary",
    long_about = "Cuts trailing segments off video files at a detected black frame, \
                  using stream copy via the tailcut-core library."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug-level logging
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Log to the console only; no run log or summary file is written
    #[arg(long, global = true, default_value_t = false)]
    pub no_log_file: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Trims every matching video in the input directory into the output directory
    Trim(TrimArgs),
    /// Prints timing and the detected cut point of one file without writing anything
    Probe(ProbeArgs),
}

#[derive(Args, Debug)]
pub struct TrimArgs {
    /// Input directory (or a single file) with videos to trim
    #[arg(
        short = 'i',
        long = "input",
        value_name = "INPUT_PATH",
        env = "TAILCUT_INPUT_DIR",
        default_value = "./videos"
    )]
    pub input_path: PathBuf,

    /// Directory where trimmed files will be saved
    #[arg(
        short = 'o',
        long = "output",
        value_name = "OUTPUT_DIR",
        env = "TAILCUT_OUTPUT_DIR",
        default_value = "./trimmed_videos"
    )]
    pub output_dir: PathBuf,

    /// Optional: Directory for log files (defaults to OUTPUT_DIR/logs)
    #[arg(long, value_name = "LOG_DIR", env = "TAILCUT_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Optional: Base directory for intermediate files (defaults to OUTPUT_DIR)
    #[arg(long, value_name = "TEMP_DIR")]
    pub temp_dir: Option<PathBuf>,

    /// Extension of the files to process
    #[arg(long = "ext", value_name = "EXT", default_value = DEFAULT_EXTENSION)]
    pub extension: String,

    /// Pipeline: fixed, fixed-then-detect or detect
    #[arg(long, value_name = "MODE", default_value = "detect", value_parser = parse_mode)]
    pub mode: PipelineMode,

    /// Seconds removed from the end by the fixed-offset stage
    #[arg(long = "offset", value_name = "SECONDS", default_value_t = DEFAULT_FIXED_OFFSET_SECS)]
    pub fixed_offset_secs: f64,

    /// Keep fixed-offset outputs in OUTPUT_DIR/intermediate
    #[arg(long, default_value_t = false)]
    pub keep_intermediate: bool,

    #[command(flatten)]
    pub detector: DetectorArgs,
}

#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Video file to inspect
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Run both detectors instead of only the selected one
    #[arg(long, default_value_t = false)]
    pub all_detectors: bool,

    #[command(flatten)]
    pub detector: DetectorArgs,
}

/// Boundary detector selection and tuning, shared by `trim` and `probe`.
#[derive(Args, Debug, Clone)]
pub struct DetectorArgs {
    /// Detector: blackdetect or brightness
    #[arg(long, value_name = "DETECTOR", default_value = "blackdetect", value_parser = parse_detector)]
    pub detector: DetectorKind,

    /// blackdetect: ratio of black pixels for a picture to count as black (0.0-1.0)
    #[arg(long = "pic-th", value_name = "RATIO", default_value_t = DEFAULT_PICTURE_THRESHOLD)]
    pub picture_threshold: f64,

    /// blackdetect: luma ratio under which a pixel counts as black (0.0-1.0)
    #[arg(long = "pix-th", value_name = "RATIO", default_value_t = DEFAULT_PIXEL_THRESHOLD)]
    pub pixel_threshold: f64,

    /// blackdetect: minimum black run length in seconds
    #[arg(long = "min-black", value_name = "SECONDS", default_value_t = DEFAULT_MIN_BLACK_DURATION)]
    pub min_black_duration: f64,

    /// blackdetect: which region start to cut at, counted from the last one
    #[arg(long, value_name = "N", default_value_t = DEFAULT_REGION_FROM_END)]
    pub region_from_end: usize,

    /// blackdetect: decode with CUDA (NVDEC)
    #[arg(long, default_value_t = false)]
    pub hw_decode: bool,

    /// brightness: mean gray level (0-255) under which a frame is black
    #[arg(long, value_name = "LEVEL", default_value_t = DEFAULT_BRIGHTNESS_THRESHOLD)]
    pub brightness_threshold: u8,

    /// brightness: seconds at the end of the file to search
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_SEARCH_SECS)]
    pub search_secs: f64,
}

fn parse_mode(s: &str) -> Result<PipelineMode, String> {
    s.parse().map_err(|e: tailcut_core::CoreError| e.to_string())
}

fn parse_detector(s: &str) -> Result<DetectorKind, String> {
    s.parse().map_err(|e: tailcut_core::CoreError| e.to_string())
}

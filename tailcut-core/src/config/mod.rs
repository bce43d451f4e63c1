//! Configuration structures and constants for the tailcut-core library.
//!
//! This module replaces the hard-coded directory names and thresholds of a
//! one-off trimming script with an explicit configuration passed to the
//! batch driver.

mod builder;

use crate::error::{CoreError, CoreResult};

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub use builder::CoreConfigBuilder;

// Default constants

/// Default extension of the files picked up from the input directory.
pub const DEFAULT_EXTENSION: &str = "webm";

/// Default number of seconds removed by the fixed-offset stage.
pub const DEFAULT_FIXED_OFFSET_SECS: f64 = 13.0;

/// Default `pic_th` for ffmpeg blackdetect: ratio of black pixels for a
/// picture to count as black.
pub const DEFAULT_PICTURE_THRESHOLD: f64 = 0.99;

/// Default `pix_th` for ffmpeg blackdetect: luma level under which a pixel
/// counts as black.
pub const DEFAULT_PIXEL_THRESHOLD: f64 = 0.0;

/// Default minimum black run length (seconds) reported by blackdetect.
pub const DEFAULT_MIN_BLACK_DURATION: f64 = 0.000001;

/// Default position, counted from the end, of the black region used as cut point.
pub const DEFAULT_REGION_FROM_END: usize = 3;

/// Default mean gray level (0-255) under which a frame counts as black.
pub const DEFAULT_BRIGHTNESS_THRESHOLD: u8 = 2;

/// Default length of the window at the end of the file searched by the
/// brightness scan.
pub const DEFAULT_SEARCH_SECS: f64 = 120.0;

/// Which stages run for every input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PipelineMode {
    /// Only remove a fixed number of seconds from the end.
    FixedOffset,
    /// Remove a fixed number of seconds, then cut the intermediate at the
    /// detected black boundary.
    FixedOffsetThenDetect,
    /// Cut at the detected black boundary.
    #[default]
    Detect,
}

impl PipelineMode {
    #[must_use]
    pub fn uses_fixed_offset(self) -> bool {
        matches!(self, PipelineMode::FixedOffset | PipelineMode::FixedOffsetThenDetect)
    }

    #[must_use]
    pub fn uses_detector(self) -> bool {
        matches!(self, PipelineMode::Detect | PipelineMode::FixedOffsetThenDetect)
    }
}

impl fmt::Display for PipelineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineMode::FixedOffset => "fixed",
            PipelineMode::FixedOffsetThenDetect => "fixed-then-detect",
            PipelineMode::Detect => "detect",
        };
        f.write_str(name)
    }
}

impl FromStr for PipelineMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fixed" | "fixed-offset" => Ok(PipelineMode::FixedOffset),
            "fixed-then-detect" | "two-stage" => Ok(PipelineMode::FixedOffsetThenDetect),
            "detect" => Ok(PipelineMode::Detect),
            other => Err(CoreError::Config(format!("Unknown pipeline mode '{other}'"))),
        }
    }
}

/// Strategy used to locate the black boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetectorKind {
    /// Parse ffmpeg blackdetect diagnostics.
    #[default]
    BlackDetect,
    /// Average gray level of decoded frames near the end.
    BrightnessScan,
}

impl fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DetectorKind::BlackDetect => "blackdetect",
            DetectorKind::BrightnessScan => "brightness",
        };
        f.write_str(name)
    }
}

impl FromStr for DetectorKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "blackdetect" | "black-detect" => Ok(DetectorKind::BlackDetect),
            "brightness" | "brightness-scan" => Ok(DetectorKind::BrightnessScan),
            other => Err(CoreError::Config(format!("Unknown detector '{other}'"))),
        }
    }
}

/// Parameters of the ffmpeg blackdetect strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlackDetectParams {
    /// `pic_th`: ratio (0.0-1.0) of black pixels for a picture to count as black
    pub picture_threshold: f64,

    /// `pix_th`: luma ratio (0.0-1.0) under which a pixel counts as black
    pub pixel_threshold: f64,

    /// `d`: minimum black run length in seconds
    pub min_duration: f64,

    /// Which reported region start to cut at, counted from the last one (1 = last)
    pub region_from_end: usize,

    /// Decode with `-hwaccel cuda` before running the filter
    pub use_hw_decode: bool,
}

impl Default for BlackDetectParams {
    fn default() -> Self {
        Self {
            picture_threshold: DEFAULT_PICTURE_THRESHOLD,
            pixel_threshold: DEFAULT_PIXEL_THRESHOLD,
            min_duration: DEFAULT_MIN_BLACK_DURATION,
            region_from_end: DEFAULT_REGION_FROM_END,
            use_hw_decode: false,
        }
    }
}

/// Parameters of the brightness scan strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrightnessScanParams {
    /// Mean gray level (0-255) strictly under which a frame counts as black
    pub threshold: u8,

    /// Length of the window at the end of the file that is scanned, in seconds
    pub search_secs: f64,
}

impl Default for BrightnessScanParams {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_BRIGHTNESS_THRESHOLD,
            search_secs: DEFAULT_SEARCH_SECS,
        }
    }
}

/// Main configuration structure for the tailcut-core library.
///
/// Created by the consumer of the library (e.g., tailcut-cli) and passed to
/// [`crate::process_videos`]. Only the path fields are required; everything
/// else has defaults matching the behavior of the original trimming script.
///
/// # Examples
///
/// ```rust,no_run
/// use tailcut_core::config::{CoreConfigBuilder, DetectorKind, PipelineMode};
/// use std::path::PathBuf;
///
/// let config = CoreConfigBuilder::new()
///     .input_dir(PathBuf::from("./videos"))
///     .output_dir(PathBuf::from("./trimmed_videos"))
///     .log_dir(PathBuf::from("./trimmed_videos/logs"))
///     .mode(PipelineMode::FixedOffsetThenDetect)
///     .detector(DetectorKind::BrightnessScan)
///     .fixed_offset_secs(13.0)
///     .build();
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct CoreConfig {
    /// Directory containing input video files to process
    pub input_dir: PathBuf,

    /// Directory where trimmed output files will be saved
    pub output_dir: PathBuf,

    /// Directory for log files and run summaries
    pub log_dir: PathBuf,

    /// Optional directory for intermediate files (defaults to `output_dir`)
    pub temp_dir: Option<PathBuf>,

    /// Extension (without dot, case-insensitive) of files to process
    pub extension: String,

    /// Stages applied to every file
    pub mode: PipelineMode,

    /// Boundary detection strategy
    pub detector: DetectorKind,

    /// Seconds removed by the fixed-offset stage
    pub fixed_offset_secs: f64,

    pub black_detect: BlackDetectParams,

    pub brightness: BrightnessScanParams,

    /// Keep stage-one outputs of the two-stage pipeline in `output_dir/intermediate`
    pub keep_intermediate: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("./videos"),
            output_dir: PathBuf::from("./trimmed_videos"),
            log_dir: PathBuf::from("./trimmed_videos/logs"),
            temp_dir: None,
            extension: DEFAULT_EXTENSION.to_string(),
            mode: PipelineMode::default(),
            detector: DetectorKind::default(),
            fixed_offset_secs: DEFAULT_FIXED_OFFSET_SECS,
            black_detect: BlackDetectParams::default(),
            brightness: BrightnessScanParams::default(),
            keep_intermediate: false,
        }
    }
}

impl CoreConfig {
    /// Creates a configuration with the given paths and default settings.
    #[must_use]
    pub fn new(input_dir: PathBuf, output_dir: PathBuf, log_dir: PathBuf) -> Self {
        Self {
            input_dir,
            output_dir,
            log_dir,
            ..Self::default()
        }
    }

    /// Directory receiving stage-one outputs when they are kept.
    #[must_use]
    pub fn intermediate_dir(&self) -> PathBuf {
        self.output_dir.join("intermediate")
    }

    /// Checks that every parameter is usable before any file is touched.
    pub fn validate(&self) -> CoreResult<()> {
        if self.extension.trim_start_matches('.').is_empty() {
            return Err(CoreError::Config("File extension must not be empty".to_string()));
        }

        if self.mode.uses_fixed_offset()
            && (!self.fixed_offset_secs.is_finite() || self.fixed_offset_secs < 0.0)
        {
            return Err(CoreError::Config(format!(
                "Fixed offset must be a non-negative number of seconds, got {}",
                self.fixed_offset_secs
            )));
        }

        let bd = &self.black_detect;
        if !(0.0..=1.0).contains(&bd.picture_threshold) {
            return Err(CoreError::Config(format!(
                "Picture threshold must be within 0.0-1.0, got {}",
                bd.picture_threshold
            )));
        }
        if !(0.0..=1.0).contains(&bd.pixel_threshold) {
            return Err(CoreError::Config(format!(
                "Pixel threshold must be within 0.0-1.0, got {}",
                bd.pixel_threshold
            )));
        }
        if !bd.min_duration.is_finite() || bd.min_duration < 0.0 {
            return Err(CoreError::Config(format!(
                "Minimum black duration must be non-negative, got {}",
                bd.min_duration
            )));
        }
        if bd.region_from_end == 0 {
            return Err(CoreError::Config(
                "Region position from end must be at least 1".to_string(),
            ));
        }

        // Any u8 threshold is in range; 0 simply matches no frame
        let bs = &self.brightness;
        if !bs.search_secs.is_finite() || bs.search_secs <= 0.0 {
            return Err(CoreError::Config(format!(
                "Search window must be positive, got {}",
                bs.search_secs
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CoreConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.extension, "webm");
        assert_eq!(config.mode, PipelineMode::Detect);
        assert_eq!(config.black_detect.region_from_end, 3);
        assert_eq!(config.brightness.threshold, 2);
        assert_eq!(config.brightness.search_secs, 120.0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = CoreConfig::default();
        config.black_detect.region_from_end = 0;
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));

        let mut config = CoreConfig::default();
        config.black_detect.picture_threshold = 1.5;
        assert!(config.validate().is_err());

        let mut config = CoreConfig::default();
        config.brightness.search_secs = 0.0;
        assert!(config.validate().is_err());

        let mut config = CoreConfig::default();
        config.extension = ".".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_brightness_threshold_bounds_are_valid() {
        let mut config = CoreConfig::default();
        config.detector = DetectorKind::BrightnessScan;
        config.brightness.threshold = 0;
        assert!(config.validate().is_ok());
        config.brightness.threshold = 255;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_fixed_offset_only_checked_when_used() {
        let mut config = CoreConfig::default();
        config.fixed_offset_secs = -1.0;
        assert!(config.validate().is_ok());

        config.mode = PipelineMode::FixedOffset;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_mode_and_detector() {
        assert_eq!("fixed".parse::<PipelineMode>().unwrap(), PipelineMode::FixedOffset);
        assert_eq!(
            "Fixed-Then-Detect".parse::<PipelineMode>().unwrap(),
            PipelineMode::FixedOffsetThenDetect
        );
        assert!("sideways".parse::<PipelineMode>().is_err());

        assert_eq!("brightness".parse::<DetectorKind>().unwrap(), DetectorKind::BrightnessScan);
        assert_eq!("blackdetect".parse::<DetectorKind>().unwrap(), DetectorKind::BlackDetect);
        assert!("magic".parse::<DetectorKind>().is_err());
    }

    #[test]
    fn test_mode_stages() {
        assert!(PipelineMode::FixedOffset.uses_fixed_offset());
        assert!(!PipelineMode::FixedOffset.uses_detector());
        assert!(PipelineMode::FixedOffsetThenDetect.uses_fixed_offset());
        assert!(PipelineMode::FixedOffsetThenDetect.uses_detector());
        assert!(!PipelineMode::Detect.uses_fixed_offset());
        assert!(PipelineMode::Detect.uses_detector());
    }
}

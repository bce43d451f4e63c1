// ============================================================================
// tailcut-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for CoreConfig
//
// Fluent API over CoreConfig. Unset paths fall back to the defaults of
// CoreConfig; every other field starts from its documented default.

// ---- Standard library imports ----
use std::path::PathBuf;

// ---- Internal crate imports ----
use super::{BlackDetectParams, BrightnessScanParams, CoreConfig, DetectorKind, PipelineMode};

/// Builder for creating CoreConfig instances.
///
/// # Examples
///
/// ```rust
/// use tailcut_core::config::{CoreConfigBuilder, PipelineMode};
/// use std::path::PathBuf;
///
/// let config = CoreConfigBuilder::new()
///     .input_dir(PathBuf::from("/path/to/input"))
///     .output_dir(PathBuf::from("/path/to/output"))
///     .mode(PipelineMode::FixedOffset)
///     .fixed_offset_secs(25.0)
///     .build();
///
/// assert_eq!(config.fixed_offset_secs, 25.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct CoreConfigBuilder {
    // Required fields
    input_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    log_dir: Option<PathBuf>,

    // Optional directory fields
    temp_dir: Option<PathBuf>,

    // Optional fields with defaults
    extension: String,
    mode: PipelineMode,
    detector: DetectorKind,
    fixed_offset_secs: f64,
    black_detect: BlackDetectParams,
    brightness: BrightnessScanParams,
    keep_intermediate: bool,
}

impl Default for CoreConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreConfigBuilder {
    /// Creates a new CoreConfigBuilder with default values.
    pub fn new() -> Self {
        Self {
            input_dir: None,
            output_dir: None,
            log_dir: None,
            temp_dir: None,
            extension: super::DEFAULT_EXTENSION.to_string(),
            mode: PipelineMode::default(),
            detector: DetectorKind::default(),
            fixed_offset_secs: super::DEFAULT_FIXED_OFFSET_SECS,
            black_detect: BlackDetectParams::default(),
            brightness: BrightnessScanParams::default(),
            keep_intermediate: false,
        }
    }

    /// Sets the input directory.
    pub fn input_dir(mut self, input_dir: PathBuf) -> Self {
        self.input_dir = Some(input_dir);
        self
    }

    /// Sets the output directory.
    pub fn output_dir(mut self, output_dir: PathBuf) -> Self {
        self.output_dir = Some(output_dir);
        self
    }

    /// Sets the log directory. Defaults to `<output_dir>/logs`.
    pub fn log_dir(mut self, log_dir: PathBuf) -> Self {
        self.log_dir = Some(log_dir);
        self
    }

    /// Sets the base directory for intermediate files.
    pub fn temp_dir(mut self, temp_dir: PathBuf) -> Self {
        self.temp_dir = Some(temp_dir);
        self
    }

    /// Sets the extension of the files to process (with or without a leading dot).
    pub fn extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    pub fn mode(mut self, mode: PipelineMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn detector(mut self, detector: DetectorKind) -> Self {
        self.detector = detector;
        self
    }

    pub fn fixed_offset_secs(mut self, secs: f64) -> Self {
        self.fixed_offset_secs = secs;
        self
    }

    /// Sets the blackdetect `pic_th` ratio.
    pub fn picture_threshold(mut self, threshold: f64) -> Self {
        self.black_detect.picture_threshold = threshold;
        self
    }

    /// Sets the blackdetect `pix_th` ratio.
    pub fn pixel_threshold(mut self, threshold: f64) -> Self {
        self.black_detect.pixel_threshold = threshold;
        self
    }

    /// Sets the blackdetect minimum black run length.
    pub fn min_black_duration(mut self, secs: f64) -> Self {
        self.black_detect.min_duration = secs;
        self
    }

    /// Sets which black region, counted from the last, becomes the cut point.
    pub fn region_from_end(mut self, position: usize) -> Self {
        self.black_detect.region_from_end = position;
        self
    }

    pub fn use_hw_decode(mut self, enable: bool) -> Self {
        self.black_detect.use_hw_decode = enable;
        self
    }

    pub fn brightness_threshold(mut self, threshold: u8) -> Self {
        self.brightness.threshold = threshold;
        self
    }

    pub fn search_secs(mut self, secs: f64) -> Self {
        self.brightness.search_secs = secs;
        self
    }

    pub fn keep_intermediate(mut self, keep: bool) -> Self {
        self.keep_intermediate = keep;
        self
    }

    /// Builds the CoreConfig instance.
    pub fn build(self) -> CoreConfig {
        let defaults = CoreConfig::default();
        let output_dir = self.output_dir.unwrap_or(defaults.output_dir);
        let log_dir = self.log_dir.unwrap_or_else(|| output_dir.join("logs"));

        CoreConfig {
            input_dir: self.input_dir.unwrap_or(defaults.input_dir),
            output_dir,
            log_dir,
            temp_dir: self.temp_dir,
            extension: self.extension,
            mode: self.mode,
            detector: self.detector,
            fixed_offset_secs: self.fixed_offset_secs,
            black_detect: self.black_detect,
            brightness: self.brightness,
            keep_intermediate: self.keep_intermediate,
        }
    }
}

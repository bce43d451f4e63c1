// ============================================================================
// tailcut-cli/src/logging.rs
// ============================================================================
//
// LOGGING UTILITIES: Run log naming and logger initialization
//
// Console and file output are both handled by log4rs through
// tailcut_core::file_logging. The CLI decides the level and the file name.

use crate::error::CliResult;
use log::LevelFilter;
use std::path::{Path, PathBuf};
use tailcut_core::CoreError;
use tailcut_core::file_logging::setup_logging;

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// `<log_dir>/tailcut_run_<timestamp>.log`
pub fn run_log_path(log_dir: &Path, timestamp: &str) -> PathBuf {
    log_dir.join(format!("tailcut_run_{timestamp}.log"))
}

/// `<log_dir>/tailcut_summary_<timestamp>.json`
pub fn summary_path(log_dir: &Path, timestamp: &str) -> PathBuf {
    log_dir.join(format!("tailcut_summary_{timestamp}.json"))
}

/// Debug when verbose, info otherwise.
pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Installs the global logger.
pub fn init_logging(log_file: Option<&Path>, verbose: bool) -> CliResult<()> {
    setup_logging(log_file, level_for(verbose))
        .map_err(|e| CoreError::OperationFailed(format!("Failed to initialize logging: {e}")))
}

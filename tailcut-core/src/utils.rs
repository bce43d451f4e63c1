//! Utility functions for formatting and file operations.
//!
//! General-purpose helpers used throughout the tailcut-core library: duration
//! and byte formatting, extension matching, and path manipulation.

use crate::error::{CoreError, CoreResult};

use std::path::Path;

/// Checks whether `path` carries `extension` (case-insensitive, leading dot optional).
#[must_use]
pub fn has_extension(path: &Path, extension: &str) -> bool {
    let wanted = extension.trim_start_matches('.');
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext_str| ext_str.eq_ignore_ascii_case(wanted))
}

/// `HH:MM:SS` for a clip length, truncating fractions. `??:??:??` when the
/// duration is unknown (negative or not finite).
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "??:??:??".to_string();
    }
    let whole = seconds.trunc() as u64;
    format!("{:02}:{:02}:{:02}", whole / 3600, whole / 60 % 60, whole % 60)
}

/// Human-readable size in binary units, two decimals above bytes.
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 3] = ["KiB", "MiB", "GiB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2} {}", UNITS[unit])
}

/// Formats a timestamp in seconds with millisecond precision (e.g., "87.000s").
#[must_use]
pub fn format_timestamp(seconds: f64) -> String {
    format!("{seconds:.3}s")
}

/// Returns the filename component of `path`, or a `PathError` if it has none.
pub fn get_filename_safe(path: &Path) -> CoreResult<String> {
    Ok(path
        .file_name()
        .ok_or_else(|| {
            CoreError::PathError(format!("Failed to get filename for {}", path.display()))
        })?
        .to_string_lossy()
        .to_string())
}

/// Size of the file in bytes.
pub fn get_file_size(path: &Path) -> CoreResult<u64> {
    Ok(std::fs::metadata(path)?.len())
}

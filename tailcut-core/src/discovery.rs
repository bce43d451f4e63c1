//! Input discovery for a trim run.
//!
//! Only the top level of the input directory is searched. Subdirectories are
//! ignored, so an output directory nested inside the input is never re-read.

use crate::error::{CoreError, CoreResult};
use crate::utils::has_extension;

use std::fs;
use std::path::{Path, PathBuf};

/// Lists the regular files in `input_dir` whose extension matches
/// `extension` (case-insensitive, leading dot optional), sorted by path.
///
/// Entries that cannot be read are skipped with a debug message.
///
/// # Errors
///
/// `CoreError::Io` when the directory itself cannot be read, and
/// `CoreError::NoFilesFound` when nothing matches.
///
/// ```rust,no_run
/// use tailcut_core::find_processable_files;
/// use std::path::Path;
///
/// let files = find_processable_files(Path::new("./videos"), "webm")?;
/// println!("{} file(s) to trim", files.len());
/// # Ok::<(), tailcut_core::CoreError>(())
/// ```
pub fn find_processable_files(input_dir: &Path, extension: &str) -> CoreResult<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(input_dir)? {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(e) => {
                log::debug!("Skipping unreadable entry in {}: {}", input_dir.display(), e);
                continue;
            }
        };
        if path.is_file() && has_extension(&path, extension) {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(CoreError::NoFilesFound);
    }
    files.sort();
    Ok(files)
}

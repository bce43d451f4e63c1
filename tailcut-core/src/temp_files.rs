//! Temporary file management utilities.
//!
//! Stage-one outputs of the two-stage pipeline live in a directory created
//! here. It relies on the tempfile crate so the directory is removed when the
//! handle is dropped, including on error paths.

use crate::config::CoreConfig;
use crate::error::CoreResult;
use std::path::{Path, PathBuf};
use tempfile::{Builder as TempFileBuilder, TempDir};

/// Creates a temporary directory with prefix. Auto-cleaned when dropped.
///
/// The directory is created under `config.temp_dir`, or under
/// `config.output_dir` when no temp dir is configured.
pub fn create_temp_dir(config: &CoreConfig, prefix: &str) -> CoreResult<TempDir> {
    let temp_base_dir = config.temp_dir.as_ref().unwrap_or(&config.output_dir);
    std::fs::create_dir_all(temp_base_dir)?;

    Ok(TempFileBuilder::new()
        .prefix(prefix)
        .tempdir_in(temp_base_dir)?)
}

/// Where stage-one outputs go for one run.
///
/// Either a self-removing temporary directory or the persistent
/// `output_dir/intermediate` directory.
pub enum IntermediateDir {
    Temporary(TempDir),
    Kept(PathBuf),
}

impl IntermediateDir {
    /// Prepares the intermediate directory selected by `config.keep_intermediate`.
    pub fn prepare(config: &CoreConfig) -> CoreResult<Self> {
        if config.keep_intermediate {
            let dir = config.intermediate_dir();
            std::fs::create_dir_all(&dir)?;
            log::debug!("Keeping intermediate files in {}", dir.display());
            Ok(IntermediateDir::Kept(dir))
        } else {
            let dir = create_temp_dir(config, ".tailcut_stage_")?;
            log::debug!("Intermediate files go to {}", dir.path().display());
            Ok(IntermediateDir::Temporary(dir))
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            IntermediateDir::Temporary(dir) => dir.path(),
            IntermediateDir::Kept(path) => path,
        }
    }

    /// Path of the stage-one output for `file_name`.
    #[must_use]
    pub fn file_path(&self, file_name: &str) -> PathBuf {
        self.path().join(file_name)
    }
}

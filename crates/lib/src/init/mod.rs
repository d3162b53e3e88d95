//! Scaffold a new kernel project.
//!
//! Writes a commented `kernmake.toml` and creates the source root so that
//! `kernmake generate` has something to scan.

mod templates;

use std::fs;
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use crate::consts::{CONFIG_FILE_NAME, DEFAULT_SOURCE_DIR};

pub use templates::CONFIG_TEMPLATE;

/// Errors that can occur during initialization.
#[derive(Debug, Error)]
pub enum InitError {
  #[error("file already exists: {}", path.display())]
  PathExists { path: PathBuf },

  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: std::io::Error },

  #[error("failed to write file {}: {source}", path.display())]
  WriteFile { path: PathBuf, source: std::io::Error },
}

pub struct InitOptions {
  /// Project directory; created when missing.
  pub project_dir: PathBuf,
}

#[derive(Debug)]
pub struct InitResult {
  pub config_file: PathBuf,
  pub source_dir: PathBuf,
}

/// Initialize a project directory.
///
/// # Errors
///
/// Returns `PathExists` if `kernmake.toml` is already present. An existing
/// source root is left untouched.
pub fn init(options: &InitOptions) -> Result<InitResult, InitError> {
  let project_dir = &options.project_dir;
  let config_file = project_dir.join(CONFIG_FILE_NAME);
  if config_file.exists() {
    return Err(InitError::PathExists { path: config_file });
  }

  let source_dir = project_dir.join(DEFAULT_SOURCE_DIR);
  fs::create_dir_all(&source_dir).map_err(|e| InitError::CreateDir {
    path: source_dir.clone(),
    source: e,
  })?;

  fs::write(&config_file, CONFIG_TEMPLATE).map_err(|e| InitError::WriteFile {
    path: config_file.clone(),
    source: e,
  })?;
  debug!(config = %config_file.display(), "wrote config template");

  Ok(InitResult {
    config_file,
    source_dir,
  })
}

//! Project configuration.
//!
//! A project may carry a `kernmake.toml` next to its source root. Every field
//! is optional; the defaults reproduce the stock EFI kernel layout:
//!
//! ```toml
//! [layout]
//! source_dir = "src"
//! image = "kernel.exe"
//! exclude = ["include"]
//!
//! [toolchain]
//! profile = "efi-clang"
//! entry = "kmain"
//!
//! [make]
//! shell = "posix"
//! ```

mod profile;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::consts::{
  CONFIG_FILE_NAME, DEFAULT_BASE_ADDRESS, DEFAULT_ENTRY, DEFAULT_IMAGE, DEFAULT_LIBS_DIR, DEFAULT_MAKEFILE,
  DEFAULT_OBJECTS_DIR, DEFAULT_SOURCE_DIR,
};

pub use profile::{OptLevel, ProfileKind, Toolchain, UnknownProfile};

/// Errors that can occur while loading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("config file not found: {}", path.display())]
  NotFound { path: PathBuf },

  #[error("failed to read config {}: {source}", path.display())]
  Read { path: PathBuf, source: std::io::Error },

  #[error("failed to parse config {}: {source}", path.display())]
  Parse { path: PathBuf, source: toml::de::Error },
}

/// Where sources live and where build outputs go, relative to the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Layout {
  pub source_dir: String,
  pub objects_dir: String,
  pub libs_dir: String,
  /// Final linked image.
  pub image: String,
  /// Top-level source directories that are never modules (header trees and
  /// the like). The objects and libs directory names are always excluded.
  pub exclude: Vec<String>,
}

impl Default for Layout {
  fn default() -> Self {
    Self {
      source_dir: DEFAULT_SOURCE_DIR.to_string(),
      objects_dir: DEFAULT_OBJECTS_DIR.to_string(),
      libs_dir: DEFAULT_LIBS_DIR.to_string(),
      image: DEFAULT_IMAGE.to_string(),
      exclude: vec!["include".to_string()],
    }
  }
}

impl Layout {
  /// Directory names skipped when enumerating modules.
  pub fn excluded_names(&self) -> Vec<&str> {
    let mut names: Vec<&str> = self.exclude.iter().map(String::as_str).collect();
    for dir in [&self.objects_dir, &self.libs_dir] {
      if let Some(last) = dir.rsplit('/').find(|part| !part.is_empty()) {
        names.push(last);
      }
    }
    names
  }
}

/// Toolchain selection plus the knobs every profile understands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolchainConfig {
  pub profile: ProfileKind,
  /// Entry symbol of the image.
  pub entry: String,
  /// Fixed load address. Ignored when a linker script is given.
  pub base_address: Option<String>,
  /// Linker script, relative to the project directory.
  pub linker_script: Option<String>,
  pub optimize: OptLevel,
  /// Allow SSE code generation. Kernels usually do not save SSE state.
  pub sse: bool,
  pub include_dirs: Vec<String>,
  pub defines: Vec<String>,
}

impl Default for ToolchainConfig {
  fn default() -> Self {
    Self {
      profile: ProfileKind::default(),
      entry: DEFAULT_ENTRY.to_string(),
      base_address: Some(DEFAULT_BASE_ADDRESS.to_string()),
      linker_script: None,
      optimize: OptLevel::default(),
      sse: false,
      include_dirs: vec!["include".to_string()],
      defines: Vec::new(),
    }
  }
}

/// Shell dialect used by directory-creation and cleanup recipes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostShell {
  #[default]
  Posix,
  /// `cmd.exe` with PowerShell for `mkdir -Force`.
  Windows,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MakeConfig {
  /// Output file, relative to the project directory.
  pub output: String,
  pub shell: HostShell,
}

impl Default for MakeConfig {
  fn default() -> Self {
    Self {
      output: DEFAULT_MAKEFILE.to_string(),
      shell: HostShell::default(),
    }
  }
}

/// Complete generator configuration.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
  pub layout: Layout,
  pub toolchain: ToolchainConfig,
  pub make: MakeConfig,
}

impl ProjectConfig {
  /// Parse a config from TOML text. `path` is only used for error messages.
  pub fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::Parse {
      path: path.to_path_buf(),
      source: e,
    })
  }

  /// Load the config for `project_dir`.
  ///
  /// An explicit path must exist. Without one, `kernmake.toml` in the project
  /// directory is used when present, otherwise the defaults.
  pub fn load(project_dir: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
    let path = match explicit {
      Some(path) => {
        if !path.is_file() {
          return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
          });
        }
        path.to_path_buf()
      }
      None => {
        let candidate = project_dir.join(CONFIG_FILE_NAME);
        if !candidate.is_file() {
          debug!(project = %project_dir.display(), "no config file, using defaults");
          return Ok(Self::default());
        }
        candidate
      }
    };

    debug!(config = %path.display(), "loading config");
    let content = fs::read_to_string(&path).map_err(|e| ConfigError::Read {
      path: path.clone(),
      source: e,
    })?;
    Self::from_toml(&content, &path)
  }

  /// Resolve the toolchain effect set for the selected profile.
  pub fn toolchain(&self) -> Toolchain {
    Toolchain::resolve(&self.toolchain)
  }
}

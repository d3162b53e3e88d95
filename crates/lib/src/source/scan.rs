use std::fs;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tracing::{debug, trace};
use walkdir::WalkDir;

use super::{Module, SourceKind, SourceSet, SourceTree, is_make_safe};
use crate::config::Layout;

/// Errors raised while discovering sources. All of them are fatal and happen
/// before any output is written.
#[derive(Debug, Error)]
pub enum ScanError {
  #[error("source root not found: {}", path.display())]
  MissingRoot { path: PathBuf },

  #[error("failed to read directory {}: {source}", path.display())]
  ReadDir { path: PathBuf, source: std::io::Error },

  #[error("failed to walk module directory {}: {source}", path.display())]
  Walk { path: PathBuf, source: walkdir::Error },

  #[error("path is not valid UTF-8: {}", path.display())]
  NonUtf8Path { path: PathBuf },

  #[error("'{name}' cannot be used in a Makefile (whitespace or special characters)")]
  UnsupportedName { name: String },
}

/// Scan `layout.source_dir` under `project_dir`.
///
/// Immediate subdirectories become modules unless their name is excluded;
/// their sources are collected recursively. Files directly under the root are
/// collected without recursion. Directory entries are visited in file-name
/// order so two scans of an unchanged tree are identical.
pub fn scan(project_dir: &Path, layout: &Layout) -> Result<SourceTree, ScanError> {
  let root = project_dir.join(&layout.source_dir);
  if !root.is_dir() {
    return Err(ScanError::MissingRoot { path: root });
  }

  let root_prefix = posix_path(Path::new(&layout.source_dir))?;
  let excluded = layout.excluded_names();

  let mut entries = fs::read_dir(&root)
    .and_then(|rd| rd.collect::<Result<Vec<_>, _>>())
    .map_err(|e| ScanError::ReadDir {
      path: root.clone(),
      source: e,
    })?;
  entries.sort_by_key(|e| e.file_name());

  let mut tree = SourceTree {
    root_prefix,
    ..Default::default()
  };

  for entry in entries {
    let path = entry.path();
    let file_type = entry.file_type().map_err(|e| ScanError::ReadDir {
      path: path.clone(),
      source: e,
    })?;
    let name = entry
      .file_name()
      .into_string()
      .map_err(|_| ScanError::NonUtf8Path { path: path.clone() })?;

    if file_type.is_dir() {
      if excluded.contains(&name.as_str()) {
        debug!(dir = %name, "skipping excluded directory");
        continue;
      }
      if !is_make_safe(&name) {
        return Err(ScanError::UnsupportedName { name });
      }
      let sources = scan_module(&path, &tree.root_prefix, &name)?;
      debug!(module = %name, sources = sources.len(), "discovered module");
      tree.modules.push(Module { name, sources });
    } else if file_type.is_file() {
      let Some(kind) = classify(&path) else {
        trace!(file = %name, "ignoring unrecognized root file");
        continue;
      };
      let rel = format!("{}/{}", tree.root_prefix, name);
      if !is_make_safe(&rel) {
        return Err(ScanError::UnsupportedName { name: rel });
      }
      tree.root.push(kind, rel);
    }
  }

  Ok(tree)
}

/// Recursively collect the sources of one module directory.
fn scan_module(dir: &Path, root_prefix: &str, name: &str) -> Result<SourceSet, ScanError> {
  let mut sources = SourceSet::default();

  for entry in WalkDir::new(dir).follow_links(false).sort_by_file_name() {
    let entry = entry.map_err(|e| ScanError::Walk {
      path: dir.to_path_buf(),
      source: e,
    })?;
    if !entry.file_type().is_file() {
      continue;
    }
    let Some(kind) = classify(entry.path()) else {
      trace!(file = %entry.path().display(), "ignoring unrecognized file");
      continue;
    };

    let rel = entry.path().strip_prefix(dir).unwrap_or(entry.path());
    let path = format!("{}/{}/{}", root_prefix, name, posix_path(rel)?);
    if !is_make_safe(&path) {
      return Err(ScanError::UnsupportedName { name: path });
    }
    sources.push(kind, path);
  }

  Ok(sources)
}

fn classify(path: &Path) -> Option<SourceKind> {
  path.extension().and_then(|e| e.to_str()).and_then(SourceKind::from_extension)
}

/// Join the components of `path` with `/`. An absolute path keeps a single
/// leading `/`.
fn posix_path(path: &Path) -> Result<String, ScanError> {
  let mut parts = Vec::new();
  let mut absolute = false;
  for component in path.components() {
    match component {
      Component::Normal(part) => parts.push(
        part
          .to_str()
          .ok_or_else(|| ScanError::NonUtf8Path {
            path: path.to_path_buf(),
          })?
          .to_string(),
      ),
      Component::RootDir => absolute = true,
      Component::CurDir => {}
      other => parts.push(other.as_os_str().to_string_lossy().into_owned()),
    }
  }
  let joined = parts.join("/");
  Ok(if absolute { format!("/{}", joined) } else { joined })
}

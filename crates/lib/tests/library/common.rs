//! Shared helpers for building throwaway kernel source trees.

use std::fs;
use std::path::{Path, PathBuf};

use kernmake_lib::generate::{GenerateOptions, ProjectOptions};
use tempfile::TempDir;

/// A project directory that is removed when dropped.
pub struct TestProject {
  pub temp: TempDir,
}

impl TestProject {
  pub fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  /// The stock scenario: `foo` with two C files, `bar` with one asm file,
  /// `kernel.c` at the root and a header-only `include` directory.
  pub fn foo_bar() -> Self {
    let project = Self::new();
    project.file("src/foo/a.c", "int a(void) { return 1; }\n");
    project.file("src/foo/b.c", "int b(void) { return 2; }\n");
    project.file("src/bar/entry.asm", "global entry\nentry: ret\n");
    project.file("src/kernel.c", "void kmain(void) {}\n");
    project.file("src/include/kernel.h", "#pragma once\n");
    project
  }

  pub fn path(&self) -> &Path {
    self.temp.path()
  }

  pub fn file(&self, rel: &str, content: &str) -> PathBuf {
    let path = self.path().join(rel);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
  }

  pub fn dir(&self, rel: &str) {
    fs::create_dir_all(self.path().join(rel)).unwrap();
  }

  pub fn read(&self, rel: &str) -> String {
    fs::read_to_string(self.path().join(rel)).unwrap_or_else(|e| panic!("Failed to read {}: {}", rel, e))
  }

  pub fn options(&self) -> GenerateOptions {
    GenerateOptions {
      project: ProjectOptions {
        project_dir: self.path().to_path_buf(),
        ..Default::default()
      },
      ..Default::default()
    }
  }
}

//! Source discovery.
//!
//! A kernel source root holds one directory per module plus a handful of
//! files that are linked straight into the image. This module defines the
//! recognized source kinds and the scanned tree; [`scan`] does the walking.

mod scan;

use serde::Serialize;

pub use scan::{ScanError, scan};

/// The kinds of source files the generator knows how to compile.
///
/// Extensions are matched case-sensitively: `foo.C` is not a C source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
  Cxx,
  C,
  Asm,
}

impl SourceKind {
  /// Order in which kinds are emitted and archived.
  pub const EMIT_ORDER: [SourceKind; 3] = [SourceKind::Cxx, SourceKind::C, SourceKind::Asm];

  /// Source file extension, without the dot.
  pub fn extension(self) -> &'static str {
    match self {
      SourceKind::Cxx => "cpp",
      SourceKind::C => "c",
      SourceKind::Asm => "asm",
    }
  }

  /// Object file extension, without the dot.
  ///
  /// Keeps the source extension so `a.c` and `a.cpp` in one directory map to
  /// distinct objects.
  pub fn object_extension(self) -> &'static str {
    match self {
      SourceKind::Cxx => "cpp.o",
      SourceKind::C => "c.o",
      SourceKind::Asm => "asm.o",
    }
  }

  /// Stem used when naming the Make bindings for this kind.
  pub fn binding_stem(self) -> &'static str {
    match self {
      SourceKind::Cxx => "cxx",
      SourceKind::C => "c",
      SourceKind::Asm => "asm",
    }
  }

  pub fn from_extension(ext: &str) -> Option<SourceKind> {
    SourceKind::EMIT_ORDER.into_iter().find(|kind| kind.extension() == ext)
  }
}

impl std::fmt::Display for SourceKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      SourceKind::Cxx => write!(f, "C++"),
      SourceKind::C => write!(f, "C"),
      SourceKind::Asm => write!(f, "assembly"),
    }
  }
}

/// Source paths of one scope, split by kind, in scan order.
///
/// Paths are relative to the project directory and always use `/`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSet {
  pub cxx: Vec<String>,
  pub c: Vec<String>,
  pub asm: Vec<String>,
}

impl SourceSet {
  pub fn get(&self, kind: SourceKind) -> &[String] {
    match kind {
      SourceKind::Cxx => &self.cxx,
      SourceKind::C => &self.c,
      SourceKind::Asm => &self.asm,
    }
  }

  pub fn push(&mut self, kind: SourceKind, path: String) {
    match kind {
      SourceKind::Cxx => self.cxx.push(path),
      SourceKind::C => self.c.push(path),
      SourceKind::Asm => self.asm.push(path),
    }
  }

  pub fn len(&self) -> usize {
    self.cxx.len() + self.c.len() + self.asm.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

/// Sources directly under the source root. They are linked into the image
/// without going through an archive.
pub type RootSourceSet = SourceSet;

/// A directory under the source root whose files become one static library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Module {
  /// Directory name; unique within a scan.
  pub name: String,
  pub sources: SourceSet,
}

/// Result of scanning a source root.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct SourceTree {
  /// Source root as written in the generated rules, e.g. `src`.
  pub root_prefix: String,
  /// Modules in discovery (lexicographic) order.
  pub modules: Vec<Module>,
  pub root: RootSourceSet,
}

impl SourceTree {
  pub fn module(&self, name: &str) -> Option<&Module> {
    self.modules.iter().find(|m| m.name == name)
  }

  pub fn source_count(&self) -> usize {
    self.root.len() + self.modules.iter().map(|m| m.sources.len()).sum::<usize>()
  }
}

/// Characters with a meaning to Make (rule and function syntax) or to the
/// shell running the unquoted `$@`/`$<` recipe lines.
const MAKE_UNSAFE_CHARS: &[char] = &[
  ':', '#', '$', '%', '=', ';', '|', '\\', '"', '\'', '*', '?', '[', ']', '(', ')', ',', '&', '<', '>', '`', '!',
];

/// Whether `s` can appear verbatim as a word in a Make rule, a `$(patsubst)`
/// argument or a recipe line.
pub fn is_make_safe(s: &str) -> bool {
  !s.is_empty()
    && !s
      .chars()
      .any(|c| c.is_whitespace() || c.is_control() || MAKE_UNSAFE_CHARS.contains(&c))
}

use serde::Serialize;

use crate::consts::ROOT_BINDING_PREFIX;
use crate::source::SourceKind;

/// Whether a group belongs to a module or to the source root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "scope", content = "name", rename_all = "lowercase")]
pub enum Scope {
  Module(String),
  Root,
}

/// One source kind of one scope: the bindings, patterns and paths that make
/// up its compile rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceGroup {
  pub kind: SourceKind,
  pub sources_var: String,
  pub objects_var: String,
  /// Pattern matching the sources, e.g. `src/foo/%.c`.
  pub source_pattern: String,
  /// Pattern producing the objects, e.g. `objects/foo/%.c.o`.
  pub object_pattern: String,
  pub sources: Vec<String>,
  /// Object paths in source order, as the `patsubst` binding expands them.
  pub objects: Vec<String>,
}

impl SourceGroup {
  /// Build the group for `sources`, which must all live under the scope's
  /// source prefix.
  pub fn new(scope: &Scope, kind: SourceKind, sources: &[String], source_root: &str, objects_dir: &str) -> Self {
    let (sources_var, objects_var) = binding_names(scope, kind);
    let (source_prefix, object_prefix) = match scope {
      Scope::Module(name) => (format!("{}/{}/", source_root, name), format!("{}/{}/", objects_dir, name)),
      Scope::Root => (format!("{}/", source_root), format!("{}/", objects_dir)),
    };

    let objects = sources
      .iter()
      .map(|src| object_path(src, &source_prefix, &object_prefix, kind).unwrap_or_else(|| src.clone()))
      .collect();

    Self {
      kind,
      sources_var,
      objects_var,
      source_pattern: format!("{}%.{}", source_prefix, kind.extension()),
      object_pattern: format!("{}%.{}", object_prefix, kind.object_extension()),
      sources: sources.to_vec(),
      objects,
    }
  }

  /// Iterate `(source, object)` pairs.
  pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
    self.sources.iter().map(String::as_str).zip(self.objects.iter().map(String::as_str))
  }
}

/// Names of the source-list and object-list bindings for `kind` in `scope`.
pub fn binding_names(scope: &Scope, kind: SourceKind) -> (String, String) {
  let stem = kind.binding_stem();
  match scope {
    Scope::Module(name) => (format!("{}_{}sources", name, stem), format!("{}_{}objects", name, stem)),
    Scope::Root => {
      let stem = stem.to_uppercase();
      (
        format!("{}_{}SOURCES", ROOT_BINDING_PREFIX, stem),
        format!("{}_{}OBJECTS", ROOT_BINDING_PREFIX, stem),
      )
    }
  }
}

/// Rewrite `<source_prefix><rel>.<ext>` into `<object_prefix><rel>.<objext>`.
///
/// Pure string rewrite mirroring the `patsubst` in the generated rules.
/// Returns `None` when `source` does not match the pattern.
pub fn object_path(source: &str, source_prefix: &str, object_prefix: &str, kind: SourceKind) -> Option<String> {
  let stem = source
    .strip_prefix(source_prefix)?
    .strip_suffix(kind.extension())?
    .strip_suffix('.')?;
  if stem.is_empty() {
    return None;
  }
  Some(format!("{}{}.{}", object_prefix, stem, kind.object_extension()))
}

/// Inverse of [`object_path`].
pub fn source_path(object: &str, source_prefix: &str, object_prefix: &str, kind: SourceKind) -> Option<String> {
  let stem = object
    .strip_prefix(object_prefix)?
    .strip_suffix(kind.object_extension())?
    .strip_suffix('.')?;
  if stem.is_empty() {
    return None;
  }
  Some(format!("{}{}.{}", source_prefix, stem, kind.extension()))
}

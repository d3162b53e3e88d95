use serde::Serialize;
use tracing::debug;

use super::group::{Scope, SourceGroup};
use crate::config::{Layout, Toolchain};
use crate::source::{Module, SourceKind};

/// Rules for one module: a compile group per non-empty kind plus the archive
/// that collects every object of the module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModulePlan {
  pub name: String,
  /// Groups in [`SourceKind::EMIT_ORDER`]; kinds without sources are absent.
  pub groups: Vec<SourceGroup>,
  /// Archive path, e.g. `lib/mm.lib`.
  pub archive: String,
}

impl ModulePlan {
  /// Object-list bindings the archive rule depends on, in kind order.
  pub fn object_vars(&self) -> impl Iterator<Item = &str> {
    self.groups.iter().map(|g| g.objects_var.as_str())
  }

  /// Every object that ends up in the archive, in kind order.
  pub fn objects(&self) -> impl Iterator<Item = &str> {
    self.groups.iter().flat_map(|g| g.objects.iter().map(String::as_str))
  }
}

/// Plan the compile and archive rules of `module`.
pub fn plan_module(module: &Module, root_prefix: &str, layout: &Layout, toolchain: &Toolchain) -> ModulePlan {
  let scope = Scope::Module(module.name.clone());
  let groups: Vec<SourceGroup> = SourceKind::EMIT_ORDER
    .into_iter()
    .filter(|kind| !module.sources.get(*kind).is_empty())
    .map(|kind| SourceGroup::new(&scope, kind, module.sources.get(kind), root_prefix, &layout.objects_dir))
    .collect();

  let archive = format!("{}/{}", layout.libs_dir, toolchain.archive_name(&module.name));
  debug!(module = %module.name, groups = groups.len(), archive = %archive, "planned module");

  ModulePlan {
    name: module.name.clone(),
    groups,
    archive,
  }
}

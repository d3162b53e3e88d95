use serde::Serialize;

use super::group::{Scope, SourceGroup};
use crate::config::Layout;
use crate::source::{RootSourceSet, SourceKind};

/// Compile rules for the sources directly under the source root. Their
/// objects are linked into the image as-is.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RootPlan {
  pub groups: Vec<SourceGroup>,
}

impl RootPlan {
  pub fn object_vars(&self) -> impl Iterator<Item = &str> {
    self.groups.iter().map(|g| g.objects_var.as_str())
  }

  pub fn objects(&self) -> impl Iterator<Item = &str> {
    self.groups.iter().flat_map(|g| g.objects.iter().map(String::as_str))
  }
}

pub fn plan_root(root: &RootSourceSet, root_prefix: &str, layout: &Layout) -> RootPlan {
  let groups = SourceKind::EMIT_ORDER
    .into_iter()
    .filter(|kind| !root.get(*kind).is_empty())
    .map(|kind| SourceGroup::new(&Scope::Root, kind, root.get(kind), root_prefix, &layout.objects_dir))
    .collect();
  RootPlan { groups }
}

//! Build planning.
//!
//! Turns a scanned [`SourceTree`] into a [`BuildPlan`]: per-module compile
//! groups and archives, root compile groups, the link order and the cleanup
//! set. A plan is pure data; [`crate::graph`] validates it and
//! [`crate::render`] serializes it.

mod group;
mod link;
mod module;
mod root;

use serde::Serialize;
use tracing::debug;

pub use group::{Scope, SourceGroup, binding_names, object_path, source_path};
pub use link::{LinkOrder, LinkPlan};
pub use module::{ModulePlan, plan_module};
pub use root::{RootPlan, plan_root};

use crate::config::{ProjectConfig, Toolchain};
use crate::source::SourceTree;

/// Paths removed by the cleanup target.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct CleanPlan {
  pub dirs: Vec<String>,
  pub files: Vec<String>,
}

/// The complete, ordered rule set for one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildPlan {
  pub objects_dir: String,
  pub libs_dir: String,
  pub toolchain: Toolchain,
  /// Modules in discovery order.
  pub modules: Vec<ModulePlan>,
  pub root: RootPlan,
  pub link: LinkPlan,
  pub clean: CleanPlan,
}

impl BuildPlan {
  pub fn object_count(&self) -> usize {
    self.root.objects().count() + self.modules.iter().map(|m| m.objects().count()).sum::<usize>()
  }
}

/// Plan every rule for `tree`.
pub fn assemble(tree: &SourceTree, config: &ProjectConfig) -> BuildPlan {
  let layout = &config.layout;
  let toolchain = config.toolchain();

  let modules: Vec<ModulePlan> = tree
    .modules
    .iter()
    .map(|m| plan_module(m, &tree.root_prefix, layout, &toolchain))
    .collect();
  let root = plan_root(&tree.root, &tree.root_prefix, layout);
  let link = LinkPlan::new(&layout.image, &modules, &root, &toolchain);
  debug!(modules = link.order.len(), root_objects = link.root_objects.len(), "assembled plan");

  BuildPlan {
    objects_dir: layout.objects_dir.clone(),
    libs_dir: layout.libs_dir.clone(),
    clean: CleanPlan {
      dirs: vec![layout.objects_dir.clone(), layout.libs_dir.clone()],
      files: vec![layout.image.clone()],
    },
    toolchain,
    modules,
    root,
    link,
  }
}

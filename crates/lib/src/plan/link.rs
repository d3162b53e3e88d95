use serde::Serialize;

use super::module::ModulePlan;
use super::root::RootPlan;
use crate::config::Toolchain;

/// Module names in the order their libraries are passed to the linker.
///
/// Built from the planned modules in discovery order, one entry per module.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LinkOrder(Vec<String>);

impl LinkOrder {
  pub fn from_modules(modules: &[ModulePlan]) -> Self {
    Self(modules.iter().map(|m| m.name.clone()).collect())
  }

  pub fn names(&self) -> &[String] {
    &self.0
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

/// Everything the final image rule needs.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct LinkPlan {
  pub image: String,
  pub order: LinkOrder,
  /// Archive paths, parallel to `order`.
  pub archives: Vec<String>,
  /// Linker arguments selecting each library, parallel to `order`.
  pub library_args: Vec<String>,
  /// Root object-list bindings, in kind order.
  pub root_object_vars: Vec<String>,
  /// Root objects as the bindings expand them.
  pub root_objects: Vec<String>,
}

impl LinkPlan {
  pub fn new(image: &str, modules: &[ModulePlan], root: &RootPlan, toolchain: &Toolchain) -> Self {
    let order = LinkOrder::from_modules(modules);
    Self {
      image: image.to_string(),
      archives: modules.iter().map(|m| m.archive.clone()).collect(),
      library_args: order.names().iter().map(|n| toolchain.library_arg(n)).collect(),
      order,
      root_object_vars: root.object_vars().map(String::from).collect(),
      root_objects: root.objects().map(String::from).collect(),
    }
  }

  /// Prerequisites of the image: root objects first, then archives in link order.
  pub fn prerequisites(&self) -> impl Iterator<Item = &str> {
    self
      .root_objects
      .iter()
      .chain(self.archives.iter())
      .map(String::as_str)
  }
}

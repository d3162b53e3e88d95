//! Rule graph for dependency validation.
//!
//! A [`BuildPlan`] is flattened into a directed acyclic graph whose nodes are
//! artifacts (sources, objects, archives, the image, output directories and
//! phony targets) and whose edges run from each prerequisite to the target
//! that needs it. Building the graph checks that:
//! - no path is the target of two rules
//! - every object, archive or directory used as a prerequisite is produced by
//!   a rule added before it, matching the order rules are written in
//! - there are no cycles
//!
//! It also answers the questions an executor cares about: what a target
//! depends on, and which targets can be built in parallel.

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::Serialize;
use thiserror::Error;

use crate::plan::{BuildPlan, SourceGroup};
use crate::source::SourceKind;

pub const ALL_TARGET: &str = "all";
pub const CLEAN_TARGET: &str = "clean";

#[derive(Debug, Error)]
pub enum GraphError {
  #[error("'{0}' is the target of more than one rule")]
  DuplicateTarget(String),

  #[error("'{target}' depends on '{prerequisite}', which no earlier rule produces")]
  UndefinedPrerequisite { target: String, prerequisite: String },

  #[error("dependency cycle detected at '{0}'")]
  CycleDetected(String),
}

/// A file or pseudo-target in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "path", rename_all = "lowercase")]
pub enum Artifact {
  Source(String),
  Object(String),
  Archive(String),
  Image(String),
  Directory(String),
  Phony(String),
}

impl Artifact {
  pub fn name(&self) -> &str {
    match self {
      Artifact::Source(p)
      | Artifact::Object(p)
      | Artifact::Archive(p)
      | Artifact::Image(p)
      | Artifact::Directory(p)
      | Artifact::Phony(p) => p,
    }
  }
}

/// What the rule producing an artifact does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Recipe {
  MakeDir,
  Compile(SourceKind),
  Archive,
  Link,
  /// No commands; only pulls in its prerequisites.
  Alias,
  Clean,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
  Normal,
  /// Must exist, but its timestamp does not make the target stale.
  OrderOnly,
}

#[derive(Debug, Clone)]
struct Node {
  artifact: Artifact,
  /// `None` for plain sources, which no rule produces.
  recipe: Option<Recipe>,
}

#[derive(Debug, Clone, Copy)]
struct Edge {
  kind: EdgeKind,
  /// Position in the target's prerequisite list.
  position: usize,
}

/// Dependency graph of every rule in a plan.
#[derive(Debug)]
pub struct RuleGraph {
  graph: DiGraph<Node, Edge>,
  index: HashMap<String, NodeIndex>,
}

impl RuleGraph {
  /// Build and validate the graph of `plan`.
  ///
  /// # Errors
  ///
  /// Returns `DuplicateTarget` when two rules produce the same path (possible
  /// only when layout names clash), `UndefinedPrerequisite` when a rule would
  /// reference something not yet produced, and `CycleDetected` for cycles.
  pub fn from_plan(plan: &BuildPlan) -> Result<Self, GraphError> {
    let mut g = Self {
      graph: DiGraph::new(),
      index: HashMap::new(),
    };

    let objects_dir = g.add_target(Artifact::Directory(plan.objects_dir.clone()), Recipe::MakeDir)?;
    let libs_dir = g.add_target(Artifact::Directory(plan.libs_dir.clone()), Recipe::MakeDir)?;

    for module in &plan.modules {
      for group in &module.groups {
        g.add_group(group, objects_dir)?;
      }
      let archive = g.add_target(Artifact::Archive(module.archive.clone()), Recipe::Archive)?;
      for object in module.objects() {
        g.depend(archive, object, EdgeKind::Normal)?;
      }
      g.link(archive, libs_dir, EdgeKind::OrderOnly);
    }

    for group in &plan.root.groups {
      g.add_group(group, objects_dir)?;
    }

    let image = g.add_target(Artifact::Image(plan.link.image.clone()), Recipe::Link)?;
    for prerequisite in plan.link.prerequisites() {
      g.depend(image, prerequisite, EdgeKind::Normal)?;
    }

    let all = g.add_target(Artifact::Phony(ALL_TARGET.to_string()), Recipe::Alias)?;
    g.link(all, image, EdgeKind::Normal);
    g.add_target(Artifact::Phony(CLEAN_TARGET.to_string()), Recipe::Clean)?;

    g.verify_acyclic()?;
    Ok(g)
  }

  fn add_group(&mut self, group: &SourceGroup, objects_dir: NodeIndex) -> Result<(), GraphError> {
    for (source, object) in group.pairs() {
      let target = self.add_target(Artifact::Object(object.to_string()), Recipe::Compile(group.kind))?;
      let source = self.add_source(source);
      self.link(target, source, EdgeKind::Normal);
      self.link(target, objects_dir, EdgeKind::OrderOnly);
    }
    Ok(())
  }

  fn add_target(&mut self, artifact: Artifact, recipe: Recipe) -> Result<NodeIndex, GraphError> {
    let name = artifact.name().to_string();
    if self.index.contains_key(&name) {
      return Err(GraphError::DuplicateTarget(name));
    }
    let idx = self.graph.add_node(Node {
      artifact,
      recipe: Some(recipe),
    });
    self.index.insert(name, idx);
    Ok(idx)
  }

  fn add_source(&mut self, path: &str) -> NodeIndex {
    if let Some(&idx) = self.index.get(path) {
      return idx;
    }
    let idx = self.graph.add_node(Node {
      artifact: Artifact::Source(path.to_string()),
      recipe: None,
    });
    self.index.insert(path.to_string(), idx);
    idx
  }

  /// Add an edge to a prerequisite that an earlier rule must have produced.
  fn depend(&mut self, target: NodeIndex, prerequisite: &str, kind: EdgeKind) -> Result<(), GraphError> {
    let Some(&idx) = self.index.get(prerequisite) else {
      return Err(GraphError::UndefinedPrerequisite {
        target: self.graph[target].artifact.name().to_string(),
        prerequisite: prerequisite.to_string(),
      });
    };
    self.link(target, idx, kind);
    Ok(())
  }

  fn link(&mut self, target: NodeIndex, prerequisite: NodeIndex, kind: EdgeKind) {
    let position = self.graph.edges_directed(target, Direction::Incoming).count();
    self.graph.add_edge(prerequisite, target, Edge { kind, position });
  }

  fn verify_acyclic(&self) -> Result<(), GraphError> {
    toposort(&self.graph, None)
      .map_err(|cycle| GraphError::CycleDetected(self.graph[cycle.node_id()].artifact.name().to_string()))?;
    Ok(())
  }

  fn is_target(&self, idx: NodeIndex) -> bool {
    self.graph[idx].recipe.is_some()
  }

  /// Look up an artifact by path or phony name.
  pub fn artifact(&self, name: &str) -> Option<&Artifact> {
    self.index.get(name).map(|&idx| &self.graph[idx].artifact)
  }

  pub fn recipe(&self, name: &str) -> Option<Recipe> {
    self.index.get(name).and_then(|&idx| self.graph[idx].recipe)
  }

  /// Number of rule targets, including phony ones.
  pub fn target_count(&self) -> usize {
    self.graph.node_indices().filter(|&idx| self.is_target(idx)).count()
  }

  /// Normal prerequisites of `target`, in rule order.
  pub fn prerequisites(&self, target: &str) -> Vec<&str> {
    self.incoming(target, EdgeKind::Normal)
  }

  /// Order-only prerequisites of `target`, in rule order.
  pub fn order_only_prerequisites(&self, target: &str) -> Vec<&str> {
    self.incoming(target, EdgeKind::OrderOnly)
  }

  fn incoming(&self, target: &str, kind: EdgeKind) -> Vec<&str> {
    let Some(&idx) = self.index.get(target) else {
      return Vec::new();
    };

    let mut edges: Vec<(usize, NodeIndex)> = self
      .graph
      .edges_directed(idx, Direction::Incoming)
      .filter(|e| e.weight().kind == kind)
      .map(|e| (e.weight().position, e.source()))
      .collect();
    edges.sort_by_key(|(position, _)| *position);

    edges
      .into_iter()
      .map(|(_, n)| self.graph[n].artifact.name())
      .collect()
  }

  /// Rule targets in an order where prerequisites come first.
  pub fn topological_targets(&self) -> Result<Vec<&str>, GraphError> {
    let sorted = toposort(&self.graph, None)
      .map_err(|cycle| GraphError::CycleDetected(self.graph[cycle.node_id()].artifact.name().to_string()))?;

    Ok(
      sorted
        .into_iter()
        .filter(|&idx| self.is_target(idx))
        .map(|idx| self.graph[idx].artifact.name())
        .collect(),
    )
  }

  /// File targets grouped into waves that an executor may build in parallel.
  ///
  /// Every target in a wave only depends on sources and on targets of earlier
  /// waves. Phony targets are left out. Within a wave, targets keep the order
  /// their rules were added in.
  pub fn build_waves(&self) -> Result<Vec<Vec<&str>>, GraphError> {
    let sorted = toposort(&self.graph, None)
      .map_err(|cycle| GraphError::CycleDetected(self.graph[cycle.node_id()].artifact.name().to_string()))?;

    let mut level: HashMap<NodeIndex, usize> = HashMap::new();
    for idx in sorted {
      if !self.is_target(idx) {
        continue;
      }
      let node_level = self
        .graph
        .neighbors_directed(idx, Direction::Incoming)
        .filter_map(|dep| level.get(&dep).map(|l| l + 1))
        .max()
        .unwrap_or(0);
      level.insert(idx, node_level);
    }

    let max_level = level.values().copied().max().unwrap_or(0);
    let mut waves: Vec<Vec<&str>> = vec![Vec::new(); max_level + 1];
    for idx in self.graph.node_indices() {
      if matches!(self.graph[idx].artifact, Artifact::Phony(_)) {
        continue;
      }
      if let Some(&l) = level.get(&idx) {
        waves[l].push(self.graph[idx].artifact.name());
      }
    }
    waves.retain(|w| !w.is_empty());

    Ok(waves)
  }
}

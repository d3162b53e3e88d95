//! Test fixtures for kernmake-lib.

use crate::source::{Module, SourceSet, SourceTree};

/// Module `foo` with two C sources, module `bar` with one assembly source and
/// a root `kernel.c` holding the entry symbol.
pub fn foo_bar_tree() -> SourceTree {
  SourceTree {
    root_prefix: "src".into(),
    modules: vec![
      Module {
        name: "foo".into(),
        sources: SourceSet {
          c: vec!["src/foo/a.c".into(), "src/foo/b.c".into()],
          ..Default::default()
        },
      },
      Module {
        name: "bar".into(),
        sources: SourceSet {
          asm: vec!["src/bar/entry.asm".into()],
          ..Default::default()
        },
      },
    ],
    root: SourceSet {
      c: vec!["src/kernel.c".into()],
      ..Default::default()
    },
  }
}

/// A tree with one module that has no recognized sources.
pub fn empty_module_tree() -> SourceTree {
  SourceTree {
    root_prefix: "src".into(),
    modules: vec![Module {
      name: "stubs".into(),
      sources: SourceSet::default(),
    }],
    root: SourceSet {
      cxx: vec!["src/kernel.cpp".into()],
      ..Default::default()
    },
  }
}

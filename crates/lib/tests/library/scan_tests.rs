use kernmake_lib::config::Layout;
use kernmake_lib::source::{ScanError, SourceKind, scan};

use super::common::TestProject;

#[test]
fn modules_and_files_are_sorted() {
  let project = TestProject::new();
  project.file("src/zeta/z.c", "");
  project.file("src/alpha/b.c", "");
  project.file("src/alpha/a.c", "");
  project.file("src/alpha/sub/c.c", "");

  let tree = scan(project.path(), &Layout::default()).unwrap();
  let names: Vec<_> = tree.modules.iter().map(|m| m.name.as_str()).collect();

  assert_eq!(names, vec!["alpha", "zeta"]);
  assert_eq!(
    tree.modules[0].sources.get(SourceKind::C),
    ["src/alpha/a.c", "src/alpha/b.c", "src/alpha/sub/c.c"]
  );
}

#[test]
fn unrecognized_extensions_are_ignored() {
  let project = TestProject::new();
  project.file("src/mm/pmm.c", "");
  project.file("src/mm/pmm.h", "");
  project.file("src/mm/notes.txt", "");
  project.file("src/mm/Upper.C", "");
  project.file("src/README.md", "");

  let tree = scan(project.path(), &Layout::default()).unwrap();

  assert_eq!(tree.source_count(), 1);
  assert!(tree.root.is_empty());
}

#[test]
fn root_files_are_not_recursive() {
  let project = TestProject::new();
  project.file("src/kernel.cpp", "");
  project.file("src/boot.asm", "");
  project.file("src/mm/pmm.c", "");

  let tree = scan(project.path(), &Layout::default()).unwrap();

  assert_eq!(tree.root.get(SourceKind::Cxx), ["src/kernel.cpp"]);
  assert_eq!(tree.root.get(SourceKind::Asm), ["src/boot.asm"]);
  assert!(tree.root.get(SourceKind::C).is_empty());
}

#[test]
fn names_with_spaces_are_rejected() {
  let project = TestProject::new();
  project.file("src/bad module/a.c", "");

  let err = scan(project.path(), &Layout::default()).unwrap_err();
  assert!(matches!(err, ScanError::UnsupportedName { .. }));
}

#[test]
fn custom_source_dir() {
  let project = TestProject::new();
  project.file("kernel/src/mm/pmm.c", "");
  let layout = Layout {
    source_dir: "kernel/src".into(),
    ..Layout::default()
  };

  let tree = scan(project.path(), &layout).unwrap();
  assert_eq!(tree.root_prefix, "kernel/src");
  assert_eq!(tree.module("mm").unwrap().sources.get(SourceKind::C), ["kernel/src/mm/pmm.c"]);
}

use std::path::PathBuf;

use kernmake_lib::config::ProfileKind;
use kernmake_lib::generate::{GenerateError, OutputTarget, generate};
use kernmake_lib::source::ScanError;
use kernmake_lib::util::hash::hash_bytes;

use super::common::TestProject;

#[test]
fn foo_bar_scenario() {
  let project = TestProject::foo_bar();
  let result = generate(&project.options()).unwrap();

  assert_eq!(result.output, OutputTarget::File(project.path().join("Makefile")));
  assert_eq!(result.modules, 2);
  assert_eq!(result.link_order.names(), ["bar".to_string(), "foo".to_string()]);
  assert_eq!(result.objects, 4);
  assert!(!result.checked);

  let text = project.read("Makefile");
  assert!(text.contains("lib/foo.lib: $(foo_cobjects) | $(LIBSDIR)\n"));
  assert!(text.contains("lib/bar.lib: $(bar_asmobjects) | $(LIBSDIR)\n"));
  assert!(text.contains("foo_csources = src/foo/a.c src/foo/b.c\n"));
  assert!(text.contains("kernel.exe: $(ROOT_COBJECTS) lib/bar.lib lib/foo.lib\n"));
  assert!(text.contains("-L$(LIBSDIR) -lbar -lfoo\n"));
  assert_eq!(text.matches("$(ROOT_COBJECTS): objects/%.c.o: src/%.c").count(), 1);
}

#[test]
fn include_directory_never_becomes_a_module() {
  let project = TestProject::foo_bar();
  project.file("src/include/nested/more.c", "int x;\n");

  generate(&project.options()).unwrap();
  let text = project.read("Makefile");

  assert!(!text.contains("include_csources"));
  assert!(!text.contains("lib/include.lib"));
}

#[test]
fn output_directories_inside_the_source_root_are_skipped() {
  let project = TestProject::foo_bar();
  project.file("kernmake.toml", "[layout]\nobjects_dir = \"src/objects\"\n");
  project.file("src/objects/foo/a.c", "stale copy\n");

  let result = generate(&project.options()).unwrap();
  assert_eq!(result.modules, 2);
}

#[test]
fn two_runs_are_byte_identical() {
  let project = TestProject::foo_bar();

  let first = generate(&project.options()).unwrap();
  let first_text = project.read("Makefile");
  let second = generate(&project.options()).unwrap();

  assert_eq!(first.hash, second.hash);
  assert_eq!(first_text, project.read("Makefile"));
  assert_eq!(first.hash, hash_bytes(first_text.as_bytes()));
  assert_eq!(first.bytes, first_text.len() as u64);
}

#[test]
fn check_passes_on_fresh_output_and_fails_after_a_change() {
  let project = TestProject::foo_bar();
  generate(&project.options()).unwrap();

  let mut options = project.options();
  options.check = true;
  let checked = generate(&options).unwrap();
  assert!(checked.checked);

  project.file("src/foo/c.c", "int c;\n");
  let err = generate(&options).unwrap_err();
  assert!(matches!(err, GenerateError::OutOfDate { .. }));
}

#[test]
fn check_without_existing_file_is_out_of_date() {
  let project = TestProject::foo_bar();
  let mut options = project.options();
  options.check = true;

  let err = generate(&options).unwrap_err();
  assert!(matches!(err, GenerateError::OutOfDate { .. }));
  assert!(!project.path().join("Makefile").exists());
}

#[test]
fn empty_module_still_gets_an_archive_rule() {
  let project = TestProject::new();
  project.dir("src/stubs");
  project.file("src/kernel.cpp", "extern \"C\" void kmain() {}\n");

  let result = generate(&project.options()).unwrap();
  let text = project.read("Makefile");

  assert_eq!(result.link_order.names(), ["stubs".to_string()]);
  assert!(text.contains("lib/stubs.lib: | $(LIBSDIR)\n"));
  assert!(text.contains("kernel.exe: $(ROOT_CXXOBJECTS) lib/stubs.lib\n"));
}

#[test]
fn profile_override_changes_archive_names() {
  let project = TestProject::foo_bar();
  let mut options = project.options();
  options.project.profile = Some(ProfileKind::ElfClang);

  generate(&options).unwrap();
  let text = project.read("Makefile");

  assert!(text.contains("lib/libfoo.a: $(foo_cobjects) | $(LIBSDIR)\n"));
  assert!(text.contains("-L$(LIBSDIR) -lbar -lfoo\n"));
  assert!(text.contains("(profile elf-clang)"));
}

#[test]
fn custom_output_path_is_relative_to_the_project() {
  let project = TestProject::foo_bar();
  let mut options = project.options();
  options.output = Some(PathBuf::from("build.mk"));

  let result = generate(&options).unwrap();

  assert_eq!(result.output, OutputTarget::File(project.path().join("build.mk")));
  assert!(project.path().join("build.mk").is_file());
  assert!(!project.path().join("Makefile").exists());
}

#[test]
fn unopenable_output_is_an_open_error() {
  let project = TestProject::foo_bar();
  let mut options = project.options();
  options.output = Some(PathBuf::from("missing/dir/Makefile"));

  let err = generate(&options).unwrap_err();
  assert!(matches!(err, GenerateError::Open { .. }));
}

#[test]
fn missing_source_root_fails_before_writing() {
  let project = TestProject::new();

  let err = generate(&project.options()).unwrap_err();
  assert!(matches!(err, GenerateError::Scan(_)));
  assert!(!project.path().join("Makefile").exists());
}

#[test]
fn broken_config_fails_before_scanning() {
  let project = TestProject::foo_bar();
  project.file("kernmake.toml", "[toolchain]\nprofile = \"msvc\"\n");

  let err = generate(&project.options()).unwrap_err();
  assert!(matches!(err, GenerateError::Config(_)));
}

#[test]
fn clashing_layout_is_a_graph_error() {
  let project = TestProject::foo_bar();
  project.file("kernmake.toml", "[layout]\nimage = \"lib/foo.lib\"\n");

  let err = generate(&project.options()).unwrap_err();
  assert!(matches!(err, GenerateError::Graph(_)));
  assert!(!project.path().join("Makefile").exists());
}

#[test]
fn windows_shell_recipes() {
  let project = TestProject::foo_bar();
  project.file("kernmake.toml", "[make]\nshell = \"windows\"\n");

  generate(&project.options()).unwrap();
  let text = project.read("Makefile");

  assert!(text.contains("if exist objects rmdir /Q /S objects"));
  assert!(text.contains("powershell -Command \"mkdir -Force $(@D)\""));
}

#[test]
fn module_name_with_comma_fails_before_writing() {
  let project = TestProject::new();
  project.file("src/a,b/x.c", "int x;\n");
  project.file("src/kernel.c", "void kmain(void) {}\n");

  let err = generate(&project.options()).unwrap_err();

  assert!(matches!(
    err,
    GenerateError::Scan(ScanError::UnsupportedName { ref name }) if name == "a,b"
  ));
  assert!(!project.path().join("Makefile").exists());
}

#[test]
fn source_with_ampersand_fails_before_writing() {
  let project = TestProject::new();
  project.file("src/mm/a&b.c", "int x;\n");

  let err = generate(&project.options()).unwrap_err();

  assert!(matches!(err, GenerateError::Scan(ScanError::UnsupportedName { .. })));
  assert!(!project.path().join("Makefile").exists());
}

use std::io::{self, Write};

use super::Renderer;
use crate::config::HostShell;
use crate::consts::{APP_NAME, LIBS_DIR_VAR, OBJECTS_DIR_VAR};
use crate::graph::{ALL_TARGET, CLEAN_TARGET};
use crate::plan::{BuildPlan, SourceGroup};
use crate::source::SourceKind;

const CC_VAR: &str = "CCNOLINK";
const CXX_VAR: &str = "CXXNOLINK";
const ASM_VAR: &str = "ASM";
const AR_VAR: &str = "AR";
const LINK_VAR: &str = "CCKER";
const CFLAGS_VAR: &str = "CFLAGS";
const CXXFLAGS_VAR: &str = "CXXFLAGS";
const ASMFLAGS_VAR: &str = "ASMFLAGS";
const OPTFLAGS_VAR: &str = "OPTFLAGS";
const LDFLAGS_VAR: &str = "LDFLAGS";

/// Renders a plan as a GNU Make file.
#[derive(Debug, Default, Clone, Copy)]
pub struct MakefileRenderer {
  pub shell: HostShell,
}

impl MakefileRenderer {
  pub fn new(shell: HostShell) -> Self {
    Self { shell }
  }

  fn header(&self, plan: &BuildPlan, out: &mut dyn Write) -> io::Result<()> {
    let tc = &plan.toolchain;
    writeln!(
      out,
      "# Generated by {} {} (profile {}). Do not edit.",
      APP_NAME,
      env!("CARGO_PKG_VERSION"),
      tc.profile
    )?;
    writeln!(out)?;
    binding(out, OBJECTS_DIR_VAR, &plan.objects_dir)?;
    binding(out, LIBS_DIR_VAR, &plan.libs_dir)?;
    writeln!(out)?;
    binding(out, CC_VAR, &tc.cc)?;
    binding(out, CXX_VAR, &tc.cxx)?;
    binding(out, ASM_VAR, &tc.asm)?;
    binding(out, AR_VAR, &tc.ar)?;
    binding(out, LINK_VAR, &tc.link)?;
    writeln!(out)?;
    binding(out, CFLAGS_VAR, &tc.cflags.join(" "))?;
    binding(out, CXXFLAGS_VAR, &tc.cxxflags.join(" "))?;
    binding(out, ASMFLAGS_VAR, &tc.asmflags.join(" "))?;
    binding(out, OPTFLAGS_VAR, &tc.optflags.join(" "))?;
    binding(out, LDFLAGS_VAR, &tc.ldflags.join(" "))?;
    writeln!(out)
  }

  fn directories(&self, out: &mut dyn Write) -> io::Result<()> {
    for var in [OBJECTS_DIR_VAR, LIBS_DIR_VAR] {
      writeln!(out, "$({}):", var)?;
      writeln!(out, "\t{}", self.make_dir(&format!("$({})", var)))?;
    }
    writeln!(out)
  }

  fn group(&self, group: &SourceGroup, out: &mut dyn Write) -> io::Result<()> {
    binding(out, &group.sources_var, &group.sources.join(" "))?;
    writeln!(
      out,
      "{} = $(patsubst {},{},$({}))",
      group.objects_var, group.source_pattern, group.object_pattern, group.sources_var
    )?;
    writeln!(
      out,
      "$({}): {}: {} | $({})",
      group.objects_var, group.object_pattern, group.source_pattern, OBJECTS_DIR_VAR
    )?;
    writeln!(out, "\t{}", self.make_parent_dir())?;
    writeln!(out, "\t@echo Building $@")?;
    writeln!(out, "\t{}", compile_command(group.kind))
  }

  fn link(&self, plan: &BuildPlan, out: &mut dyn Write) -> io::Result<()> {
    let link = &plan.link;
    let root_refs: Vec<String> = link.root_object_vars.iter().map(|v| format!("$({})", v)).collect();

    let mut prereqs = root_refs.clone();
    prereqs.extend(link.archives.iter().cloned());
    rule(out, &link.image, &prereqs, None)?;
    writeln!(out, "\t@echo Linking $@")?;

    let mut args = vec![format!("$({})", LDFLAGS_VAR), "-o".to_string(), "$@".to_string()];
    args.extend(root_refs);
    args.push(format!("-L$({})", LIBS_DIR_VAR));
    args.extend(link.library_args.iter().cloned());
    writeln!(out, "\t@$({}) {}", LINK_VAR, args.join(" "))?;
    writeln!(out)
  }

  fn clean(&self, plan: &BuildPlan, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, ".PHONY: {}", CLEAN_TARGET)?;
    writeln!(out, "{}:", CLEAN_TARGET)?;
    match self.shell {
      HostShell::Posix => {
        let paths: Vec<&str> = plan
          .clean
          .dirs
          .iter()
          .chain(plan.clean.files.iter())
          .map(String::as_str)
          .collect();
        writeln!(out, "\trm -rf {}", paths.join(" "))?;
      }
      HostShell::Windows => {
        for dir in &plan.clean.dirs {
          let dir = dir.replace('/', "\\");
          writeln!(out, "\tif exist {0} rmdir /Q /S {0}", dir)?;
        }
        for file in &plan.clean.files {
          let file = file.replace('/', "\\");
          writeln!(out, "\tif exist {0} del /Q {0}", file)?;
        }
      }
    }
    Ok(())
  }

  fn make_dir(&self, dir: &str) -> String {
    match self.shell {
      HostShell::Posix => format!("@mkdir -p {}", dir),
      HostShell::Windows => format!("@powershell -Command \"mkdir -Force {}\" 1> nul", dir),
    }
  }

  fn make_parent_dir(&self) -> String {
    self.make_dir("$(@D)")
  }
}

impl Renderer for MakefileRenderer {
  fn render(&self, plan: &BuildPlan, out: &mut dyn Write) -> io::Result<()> {
    self.header(plan, out)?;

    writeln!(out, ".PHONY: {}", ALL_TARGET)?;
    writeln!(out, "{}: {}", ALL_TARGET, plan.link.image)?;
    writeln!(out)?;

    self.directories(out)?;

    for module in &plan.modules {
      writeln!(out, "# module {}", module.name)?;
      for group in &module.groups {
        self.group(group, out)?;
      }
      let prereqs: Vec<String> = module.object_vars().map(|v| format!("$({})", v)).collect();
      rule(out, &module.archive, &prereqs, Some(LIBS_DIR_VAR))?;
      writeln!(out, "\t@echo Creating $@")?;
      writeln!(out, "\t@$({}) $@ $^", AR_VAR)?;
      writeln!(out)?;
    }

    if !plan.root.groups.is_empty() {
      writeln!(out, "# root")?;
      for group in &plan.root.groups {
        self.group(group, out)?;
      }
      writeln!(out)?;
    }

    self.link(plan, out)?;
    self.clean(plan, out)
  }
}

fn binding(out: &mut dyn Write, name: &str, value: &str) -> io::Result<()> {
  if value.is_empty() {
    writeln!(out, "{} =", name)
  } else {
    writeln!(out, "{} = {}", name, value)
  }
}

/// `target: prereqs | $(order_only)`
fn rule(out: &mut dyn Write, target: &str, prereqs: &[String], order_only: Option<&str>) -> io::Result<()> {
  let mut line = format!("{}:", target);
  for p in prereqs {
    line.push(' ');
    line.push_str(p);
  }
  if let Some(var) = order_only {
    line.push_str(&format!(" | $({})", var));
  }
  writeln!(out, "{}", line)
}

fn compile_command(kind: SourceKind) -> String {
  match kind {
    SourceKind::Cxx => format!("@$({}) $({}) $({}) -o $@ -c $<", CXX_VAR, CXXFLAGS_VAR, OPTFLAGS_VAR),
    SourceKind::C => format!("@$({}) $({}) $({}) -o $@ -c $<", CC_VAR, CFLAGS_VAR, OPTFLAGS_VAR),
    SourceKind::Asm => format!("@$({}) $({}) $< -o $@", ASM_VAR, ASMFLAGS_VAR),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::ProjectConfig;
  use crate::plan::assemble;
  use crate::util::testutil::{empty_module_tree, foo_bar_tree};

  fn render(plan: &BuildPlan, shell: HostShell) -> String {
    MakefileRenderer::new(shell).render_to_string(plan).unwrap()
  }

  fn foo_bar(shell: HostShell) -> String {
    render(&assemble(&foo_bar_tree(), &ProjectConfig::default()), shell)
  }

  fn position(text: &str, needle: &str) -> usize {
    text.find(needle).unwrap_or_else(|| panic!("missing {:?} in:\n{}", needle, text))
  }

  #[test]
  fn header_binds_dirs_and_tools() {
    let text = foo_bar(HostShell::Posix);

    assert!(text.starts_with("# Generated by kernmake"));
    assert!(text.contains("OBJECTSDIR = objects\n"));
    assert!(text.contains("LIBSDIR = lib\n"));
    assert!(text.contains("CCNOLINK = clang -target x86_64-unknown-windows\n"));
    assert!(text.contains("AR = ar -cr\n"));
    assert!(text.contains("ASMFLAGS =\n"));
    assert!(text.contains("OPTFLAGS = -Ofast -mno-sse\n"));
  }

  #[test]
  fn module_rules_use_patsubst_and_static_patterns() {
    let text = foo_bar(HostShell::Posix);

    assert!(text.contains("foo_csources = src/foo/a.c src/foo/b.c\n"));
    assert!(text.contains("foo_cobjects = $(patsubst src/foo/%.c,objects/foo/%.c.o,$(foo_csources))\n"));
    assert!(text.contains("$(foo_cobjects): objects/foo/%.c.o: src/foo/%.c | $(OBJECTSDIR)\n"));
    assert!(text.contains("\t@$(CCNOLINK) $(CFLAGS) $(OPTFLAGS) -o $@ -c $<\n"));
    assert!(text.contains("$(bar_asmobjects): objects/bar/%.asm.o: src/bar/%.asm | $(OBJECTSDIR)\n"));
    assert!(text.contains("\t@$(ASM) $(ASMFLAGS) $< -o $@\n"));
    assert!(text.contains("lib/foo.lib: $(foo_cobjects) | $(LIBSDIR)\n\t@echo Creating $@\n\t@$(AR) $@ $^\n"));
    assert!(text.contains("lib/bar.lib: $(bar_asmobjects) | $(LIBSDIR)\n"));
  }

  #[test]
  fn bindings_precede_their_uses() {
    let text = foo_bar(HostShell::Posix);

    assert!(position(&text, "foo_cobjects =") < position(&text, "$(foo_cobjects):"));
    assert!(position(&text, "$(foo_cobjects):") < position(&text, "lib/foo.lib:"));
    assert!(position(&text, "lib/bar.lib:") < position(&text, "kernel.exe: $(ROOT_COBJECTS)"));
    assert!(position(&text, "ROOT_COBJECTS =") < position(&text, "kernel.exe: $(ROOT_COBJECTS)"));
  }

  #[test]
  fn image_rule_links_root_objects_then_libraries_in_order() {
    let text = foo_bar(HostShell::Posix);

    assert!(text.contains(".PHONY: all\nall: kernel.exe\n"));
    assert!(text.contains("ROOT_COBJECTS = $(patsubst src/%.c,objects/%.c.o,$(ROOT_CSOURCES))\n"));
    assert!(text.contains("kernel.exe: $(ROOT_COBJECTS) lib/foo.lib lib/bar.lib\n"));
    assert!(text.contains("\t@$(CCKER) $(LDFLAGS) -o $@ $(ROOT_COBJECTS) -L$(LIBSDIR) -lfoo -lbar\n"));
  }

  #[test]
  fn posix_recipes() {
    let text = foo_bar(HostShell::Posix);

    assert!(text.contains("$(OBJECTSDIR):\n\t@mkdir -p $(OBJECTSDIR)\n"));
    assert!(text.contains("\t@mkdir -p $(@D)\n"));
    assert!(text.ends_with(".PHONY: clean\nclean:\n\trm -rf objects lib kernel.exe\n"));
  }

  #[test]
  fn windows_recipes() {
    let text = foo_bar(HostShell::Windows);

    assert!(text.contains("\t@powershell -Command \"mkdir -Force $(@D)\" 1> nul\n"));
    assert!(text.contains("\tif exist objects rmdir /Q /S objects\n"));
    assert!(text.contains("\tif exist lib rmdir /Q /S lib\n"));
    assert!(text.contains("\tif exist kernel.exe del /Q kernel.exe\n"));
    assert!(!text.contains("rm -rf"));
  }

  #[test]
  fn recipes_are_tab_indented() {
    let text = foo_bar(HostShell::Posix);
    for line in text.lines().filter(|l| l.starts_with(' ')) {
      panic!("space-indented line: {:?}", line);
    }
  }

  #[test]
  fn empty_module_archive_is_still_linked() {
    let plan = assemble(&empty_module_tree(), &ProjectConfig::default());
    let text = render(&plan, HostShell::Posix);

    assert!(text.contains("lib/stubs.lib: | $(LIBSDIR)\n"));
    assert!(!text.contains("stubs_csources"));
    assert!(text.contains("kernel.exe: $(ROOT_CXXOBJECTS) lib/stubs.lib\n"));
    assert!(text.contains("-L$(LIBSDIR) -lstubs\n"));
  }

  #[test]
  fn empty_tree_still_renders_all_and_clean() {
    let plan = assemble(&Default::default(), &ProjectConfig::default());
    let text = render(&plan, HostShell::Posix);

    assert!(text.contains("kernel.exe:\n"));
    assert!(text.contains("\t@$(CCKER) $(LDFLAGS) -o $@ -L$(LIBSDIR)\n"));
    assert!(!text.contains("# root"));
  }

  #[test]
  fn rendering_is_deterministic() {
    assert_eq!(foo_bar(HostShell::Posix), foo_bar(HostShell::Posix));
  }
}

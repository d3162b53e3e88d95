//! Implementation of the `kernmake generate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use kernmake_lib::generate::{GenerateOptions, OutputTarget, ProjectOptions, generate};

use crate::output::{format_hash, format_link_order, format_size, print_stat, print_success};

pub fn cmd_generate(project: ProjectOptions, output: Option<PathBuf>, check: bool) -> Result<()> {
  let project_dir = project.project_dir.clone();
  debug!(project = %project_dir.display(), check, "generate");
  let options = GenerateOptions { project, output, check };

  let result =
    generate(&options).with_context(|| format!("Failed to generate Makefile for {}", project_dir.display()))?;

  // The Makefile itself went to stdout; keep it clean.
  if result.output == OutputTarget::Stdout {
    return Ok(());
  }

  if result.checked {
    print_success(&format!("{} is up to date", result.output));
  } else {
    print_success(&format!("Wrote {}", result.output));
  }
  print_stat("Modules", &result.modules.to_string());
  print_stat("Link order", &format_link_order(result.link_order.names()));
  print_stat("Objects", &result.objects.to_string());
  print_stat("Size", &format_size(result.bytes));
  print_stat("Hash", &format_hash(&result.hash));

  Ok(())
}

//! Implementation of the `kernmake init` command.

use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use kernmake_lib::init::{InitOptions, init};

use crate::output::symbols;

pub fn cmd_init(dir: &Path) -> Result<()> {
  let options = InitOptions {
    project_dir: dir.to_path_buf(),
  };

  let result = init(&options).context("Failed to initialize project")?;

  println!(
    "{} {}",
    symbols::SUCCESS.green(),
    "Initialized kernmake project!".green().bold()
  );
  println!();
  println!("  {} Config:      {}", symbols::INFO.cyan(), result.config_file.display());
  println!("  {} Source root: {}", symbols::INFO.cyan(), result.source_dir.display());
  println!();
  println!("{}", "Next steps:".bold());
  println!("  1. Add one directory per module under {}", result.source_dir.display().to_string().cyan());
  println!(
    "  2. Run: {}",
    format!("kernmake generate -C {}", dir.display()).cyan()
  );

  Ok(())
}

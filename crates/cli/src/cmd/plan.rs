//! Implementation of the `kernmake plan` command.
//!
//! Runs discovery and planning, validates the rule graph, and prints the
//! result without writing a Makefile.

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};

use kernmake_lib::generate::{ProjectOptions, load_plan};
use kernmake_lib::render::{JsonRenderer, Renderer};

use crate::output::{OutputFormat, format_link_order, print_info, print_stat, symbols};

pub fn cmd_plan(project: ProjectOptions, format: OutputFormat, verbose: bool) -> Result<()> {
  let (_, plan, graph) =
    load_plan(&project).with_context(|| format!("Failed to plan {}", project.project_dir.display()))?;

  if format.is_json() {
    let mut stdout = std::io::stdout().lock();
    JsonRenderer.render(&plan, &mut stdout).context("Failed to write plan")?;
    return Ok(());
  }

  print_info(&format!("Profile {} -> {}", plan.toolchain.profile, plan.link.image));
  print_stat("Modules", &plan.modules.len().to_string());
  print_stat("Objects", &plan.object_count().to_string());
  print_stat("Targets", &graph.target_count().to_string());
  println!();

  for module in &plan.modules {
    let count = module.objects().count();
    println!(
      "  {} {} {}",
      symbols::ARROW.if_supports_color(Stream::Stdout, |s| s.cyan()),
      module.archive,
      format!("({} objects)", count).if_supports_color(Stream::Stdout, |s| s.dimmed())
    );
    if verbose {
      for group in &module.groups {
        for (source, object) in group.pairs() {
          println!("      {} -> {}", source, object);
        }
      }
    }
  }

  let root_objects = plan.root.objects().count();
  if root_objects > 0 {
    println!(
      "  {} root {}",
      symbols::ARROW.if_supports_color(Stream::Stdout, |s| s.cyan()),
      format!("({} objects)", root_objects).if_supports_color(Stream::Stdout, |s| s.dimmed())
    );
    if verbose {
      for group in &plan.root.groups {
        for (source, object) in group.pairs() {
          println!("      {} -> {}", source, object);
        }
      }
    }
  }

  println!();
  print_stat("Link order", &format_link_order(plan.link.order.names()));
  if verbose {
    let waves = graph.build_waves().context("Failed to order the rule graph")?;
    print_stat("Build waves", &waves.len().to_string());
  }

  Ok(())
}

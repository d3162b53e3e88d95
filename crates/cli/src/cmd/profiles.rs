use anyhow::Result;
use owo_colors::{OwoColorize, Stream};

use kernmake_lib::config::ProfileKind;

use crate::output::{OutputFormat, print_json};

pub fn cmd_profiles(format: OutputFormat) -> Result<()> {
  if format.is_json() {
    let profiles: Vec<_> = ProfileKind::ALL
      .iter()
      .map(|p| {
        serde_json::json!({
          "name": p.as_str(),
          "description": p.description(),
          "default": *p == ProfileKind::default(),
          "linker_script": p.supports_linker_script(),
        })
      })
      .collect();
    return print_json(&profiles);
  }

  for profile in ProfileKind::ALL {
    let marker = if profile == ProfileKind::default() { " (default)" } else { "" };
    println!(
      "{}{}",
      profile.as_str().if_supports_color(Stream::Stdout, |s| s.bold()),
      marker
    );
    println!("  {}", profile.description());
    if !profile.supports_linker_script() {
      println!(
        "  {}",
        "linker_script is ignored; base_address sets the load address"
          .if_supports_color(Stream::Stdout, |s| s.dimmed())
      );
    }
  }
  Ok(())
}

//! Terminal output for kernmake commands.
//!
//! Status lines use owo-colors only when the stream supports color, so piped
//! output and `-o -` Makefiles stay plain.

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

use kernmake_lib::util::hash::ContentHash;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const INFO: &str = "•";
  pub const ARROW: &str = "→";
}

/// Makefiles are a few KiB at most.
pub fn format_size(bytes: u64) -> String {
  if bytes < 1024 {
    format!("{} bytes", bytes)
  } else {
    format!("{:.1} KiB", bytes as f64 / 1024.0)
  }
}

/// Module names in link order, e.g. `bar → foo`.
pub fn format_link_order(names: &[String]) -> String {
  if names.is_empty() {
    return "(no modules)".to_string();
  }
  names.join(&format!(" {} ", symbols::ARROW))
}

pub fn format_hash(hash: &ContentHash) -> String {
  format!("sha256:{}", hash.short())
}

pub fn print_success(message: &str) {
  let mark = symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green());
  println!("{} {}", mark, message);
}

pub fn print_info(message: &str) {
  let mark = symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue());
  println!("{} {}", mark, message);
}

/// An indented `label: value` line under a status line.
pub fn print_stat(label: &str, value: &str) {
  let label = format!("{:<11}", format!("{}:", label));
  println!("  {} {}", label.if_supports_color(Stream::Stdout, |s| s.dimmed()), value);
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sizes() {
    assert_eq!(format_size(0), "0 bytes");
    assert_eq!(format_size(1023), "1023 bytes");
    assert_eq!(format_size(1536), "1.5 KiB");
  }

  #[test]
  fn link_order_uses_arrows() {
    let names = vec!["bar".to_string(), "foo".to_string()];
    assert_eq!(format_link_order(&names), "bar → foo");
    assert_eq!(format_link_order(&[]), "(no modules)");
  }

  #[test]
  fn hash_is_shortened() {
    let hash = ContentHash("0123456789abcdef0123".to_string());
    assert_eq!(format_hash(&hash), "sha256:0123456789ab");
  }
}

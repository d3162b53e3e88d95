//! Plan serialization.
//!
//! A [`Renderer`] writes a validated [`BuildPlan`] in some target dialect.
//! [`MakefileRenderer`] produces the Makefile consumed by `make`;
//! [`JsonRenderer`] dumps the plan for tooling and debugging.

mod makefile;

use std::io::{self, Write};

pub use makefile::MakefileRenderer;

use crate::plan::BuildPlan;

pub trait Renderer {
  /// Write `plan` to `out`. Nothing is buffered beyond what `out` buffers.
  fn render(&self, plan: &BuildPlan, out: &mut dyn Write) -> io::Result<()>;

  /// Render into memory.
  fn render_to_string(&self, plan: &BuildPlan) -> io::Result<String> {
    let mut buf = Vec::new();
    self.render(plan, &mut buf)?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
  }
}

/// Pretty-printed JSON of the whole plan.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
  fn render(&self, plan: &BuildPlan, out: &mut dyn Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, plan)?;
    writeln!(out)
  }
}

//! A complete generator run.
//!
//! Loads the project config, scans the source tree, assembles and validates
//! the plan, then renders it through a single writer. The emitted text is
//! fingerprinted on the way out so callers can report it and compare runs.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{ConfigError, ProfileKind, ProjectConfig};
use crate::graph::{GraphError, RuleGraph};
use crate::plan::{BuildPlan, LinkOrder, assemble};
use crate::render::{MakefileRenderer, Renderer};
use crate::source::{ScanError, scan};
use crate::util::hash::{ContentHash, HashingWriter, hash_bytes};

/// Output path that selects standard output.
pub const STDOUT_MARKER: &str = "-";

#[derive(Debug, Error)]
pub enum GenerateError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Scan(#[from] ScanError),

  #[error("invalid rule graph: {0}")]
  Graph(#[from] GraphError),

  #[error("failed to open {}: {source}", path.display())]
  Open { path: PathBuf, source: io::Error },

  #[error("failed to write {target}: {source}")]
  Write { target: OutputTarget, source: io::Error },

  #[error("failed to read {}: {source}", path.display())]
  Read { path: PathBuf, source: io::Error },

  #[error("{} is out of date", path.display())]
  OutOfDate { path: PathBuf },

  #[error("--check needs a file to compare against, not stdout")]
  CheckStdout,
}

/// Where the rendered Makefile goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputTarget {
  File(PathBuf),
  Stdout,
}

impl OutputTarget {
  /// Interpret a user-supplied output path relative to `project_dir`.
  pub fn parse(value: &Path, project_dir: &Path) -> Self {
    if value.as_os_str() == STDOUT_MARKER {
      OutputTarget::Stdout
    } else if value.is_absolute() {
      OutputTarget::File(value.to_path_buf())
    } else {
      OutputTarget::File(project_dir.join(value))
    }
  }
}

impl fmt::Display for OutputTarget {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      OutputTarget::File(path) => write!(f, "{}", path.display()),
      OutputTarget::Stdout => f.write_str("<stdout>"),
    }
  }
}

/// Inputs that select a project and override its config.
#[derive(Debug, Clone, Default)]
pub struct ProjectOptions {
  pub project_dir: PathBuf,
  /// Config file to use instead of `<project>/kernmake.toml`.
  pub config_path: Option<PathBuf>,
  pub profile: Option<ProfileKind>,
}

#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
  pub project: ProjectOptions,
  /// Overrides `make.output`; `-` writes to stdout.
  pub output: Option<PathBuf>,
  /// Compare against the existing file instead of writing.
  pub check: bool,
}

/// Summary of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateResult {
  pub output: OutputTarget,
  pub modules: usize,
  pub link_order: LinkOrder,
  pub objects: usize,
  pub targets: usize,
  pub hash: ContentHash,
  pub bytes: u64,
  /// True when the run only verified an existing file.
  pub checked: bool,
}

/// Load the config, scan the tree and build a validated plan.
pub fn load_plan(options: &ProjectOptions) -> Result<(ProjectConfig, BuildPlan, RuleGraph), GenerateError> {
  let mut config = ProjectConfig::load(&options.project_dir, options.config_path.as_deref())?;
  if let Some(profile) = options.profile {
    debug!(profile = %profile, "profile overridden");
    config.toolchain.profile = profile;
  }

  let tree = scan(&options.project_dir, &config.layout)?;
  let plan = assemble(&tree, &config);
  let graph = RuleGraph::from_plan(&plan)?;
  debug!(targets = graph.target_count(), "rule graph validated");

  Ok((config, plan, graph))
}

/// Run the generator.
///
/// # Errors
///
/// Fails before writing anything on config, discovery or graph errors. A
/// write failure aborts the run and leaves whatever was already flushed.
pub fn generate(options: &GenerateOptions) -> Result<GenerateResult, GenerateError> {
  let (config, plan, graph) = load_plan(&options.project)?;
  let renderer = MakefileRenderer::new(config.make.shell);

  let output = OutputTarget::parse(
    options.output.as_deref().unwrap_or(Path::new(&config.make.output)),
    &options.project.project_dir,
  );

  let (hash, bytes) = if options.check {
    check(&renderer, &plan, &output)?
  } else {
    write(&renderer, &plan, &output)?
  };

  info!(
    output = %output,
    modules = plan.modules.len(),
    objects = plan.object_count(),
    hash = %hash.short(),
    checked = options.check,
    "makefile generated"
  );

  Ok(GenerateResult {
    output,
    modules: plan.modules.len(),
    link_order: plan.link.order.clone(),
    objects: plan.object_count(),
    targets: graph.target_count(),
    hash,
    bytes,
    checked: options.check,
  })
}

fn write(renderer: &dyn Renderer, plan: &BuildPlan, output: &OutputTarget) -> Result<(ContentHash, u64), GenerateError> {
  let sink: Box<dyn Write> = match output {
    OutputTarget::File(path) => {
      let file = File::create(path).map_err(|e| GenerateError::Open {
        path: path.clone(),
        source: e,
      })?;
      Box::new(file)
    }
    OutputTarget::Stdout => Box::new(io::stdout().lock()),
  };

  render_into(renderer, plan, sink, output)
}

/// Render `plan` into `sink`, hashing what it accepts. The first failed write
/// aborts; bytes already accepted by `sink` stay there.
fn render_into<W: Write>(
  renderer: &dyn Renderer,
  plan: &BuildPlan,
  sink: W,
  output: &OutputTarget,
) -> Result<(ContentHash, u64), GenerateError> {
  let write_err = |e| GenerateError::Write {
    target: output.clone(),
    source: e,
  };

  let mut writer = HashingWriter::new(BufWriter::new(sink));
  renderer.render(plan, &mut writer).map_err(write_err)?;
  writer.flush().map_err(write_err)?;

  let bytes = writer.bytes_written();
  let (_, hash) = writer.finish();
  debug!(output = %output, bytes, "wrote makefile");
  Ok((hash, bytes))
}

fn check(renderer: &dyn Renderer, plan: &BuildPlan, output: &OutputTarget) -> Result<(ContentHash, u64), GenerateError> {
  let OutputTarget::File(path) = output else {
    return Err(GenerateError::CheckStdout);
  };

  let mut rendered = Vec::new();
  renderer.render(plan, &mut rendered).map_err(|e| GenerateError::Write {
    target: output.clone(),
    source: e,
  })?;

  let existing = match fs::read(path) {
    Ok(bytes) => bytes,
    Err(e) if e.kind() == io::ErrorKind::NotFound => {
      return Err(GenerateError::OutOfDate { path: path.clone() });
    }
    Err(e) => {
      return Err(GenerateError::Read {
        path: path.clone(),
        source: e,
      });
    }
  };

  if existing != rendered {
    return Err(GenerateError::OutOfDate { path: path.clone() });
  }
  Ok((hash_bytes(&rendered), rendered.len() as u64))
}

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use kernmake_lib::config::ProfileKind;
use kernmake_lib::generate::ProjectOptions;

mod cmd;
mod output;

use output::OutputFormat;

/// kernmake - Makefile generator for modular freestanding kernels
#[derive(Parser)]
#[command(name = "kernmake")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

/// Project selection shared by the commands that scan a tree.
#[derive(Args)]
struct ProjectArgs {
  /// Project directory containing the source root
  #[arg(short = 'C', long = "project", default_value = ".")]
  project: PathBuf,

  /// Config file (default: <project>/kernmake.toml when present)
  #[arg(long)]
  config: Option<PathBuf>,

  /// Toolchain profile, overriding the config
  #[arg(long)]
  profile: Option<ProfileKind>,
}

impl ProjectArgs {
  fn into_options(self) -> ProjectOptions {
    ProjectOptions {
      project_dir: self.project,
      config_path: self.config,
      profile: self.profile,
    }
  }
}

#[derive(Subcommand)]
enum Commands {
  /// Scan the source tree and write the Makefile
  Generate {
    #[command(flatten)]
    project: ProjectArgs,

    /// Output file, relative to the project; `-` writes to stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Fail if the existing Makefile differs instead of writing it
    #[arg(long)]
    check: bool,
  },

  /// Show modules, link order and object counts without writing anything
  Plan {
    #[command(flatten)]
    project: ProjectArgs,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
  },

  /// List the available toolchain profiles
  Profiles {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
  },

  /// Write a commented kernmake.toml and create the source root
  Init {
    /// Project directory
    #[arg(default_value = ".")]
    dir: PathBuf,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match cli.command {
    Commands::Generate { project, output, check } => cmd::cmd_generate(project.into_options(), output, check),
    Commands::Plan { project, format } => cmd::cmd_plan(project.into_options(), format, cli.verbose),
    Commands::Profiles { format } => cmd::cmd_profiles(format),
    Commands::Init { dir } => cmd::cmd_init(&dir),
  }
}

//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use ensemble_domain::{ModelRole, OperationKind};
use std::path::PathBuf;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored text
    Text,
    /// JSON output
    Json,
}

/// CLI arguments for model-ensemble
#[derive(Parser, Debug)]
#[command(name = "model-ensemble")]
#[command(author, version, about = "Model selection and ensemble verification")]
#[command(long_about = r#"
model-ensemble routes tasks to model backends and verifies risky operations
with a panel of models.

Selection uses deterministic canary bucketing and historical performance.
Verification runs the operation on every panel member concurrently, applies
safety checks, and gates destructive operations on quorum and agreement.

Configuration is loaded from (in priority order):
1. ENSEMBLE_* environment variables (e.g. ENSEMBLE_CANARY__PERCENTAGE=25)
2. --config <path>                              Explicit config file
3. ./ensemble.toml or ./.ensemble.toml          Project-level config
4. ~/.config/model-ensemble/config.toml         Global config

Example:
  model-ensemble select --role migration_planner --user alice --project shop
  model-ensemble verify --operation migrate --responses replay.json
  model-ensemble config
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// JSON export of performance windows, keyed by model id then window
    #[arg(long, value_name = "PATH", global = true)]
    pub metrics: Option<PathBuf>,

    /// Also write logs to a daily-rotated file in this directory
    #[arg(long, value_name = "DIR", global = true)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Select one model for a role
    Select(SelectArgs),
    /// Verify an operation with a panel of models, replaying recorded responses
    Verify(VerifyArgs),
    /// Show configuration sources and validation issues
    Config,
}

/// Caller identity shared by both subcommands
#[derive(Args, Debug, Clone, Default)]
pub struct IdentityArgs {
    /// User id used for canary bucketing
    #[arg(long, value_name = "ID")]
    pub user: Option<String>,

    /// Project id used for canary bucketing
    #[arg(long, value_name = "ID")]
    pub project: Option<String>,

    /// Required capability (can be specified multiple times)
    #[arg(long = "capability", value_name = "CAP")]
    pub capabilities: Vec<String>,
}

#[derive(Args, Debug)]
pub struct SelectArgs {
    /// Role to select for (e.g. migration_planner)
    #[arg(short, long)]
    pub role: ModelRole,

    /// Mark the task as critical
    #[arg(long)]
    pub critical: bool,

    #[command(flatten)]
    pub identity: IdentityArgs,
}

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Operation to verify (design, migrate, optimize, validate)
    #[arg(long)]
    pub operation: OperationKind,

    /// JSON file with the operation inputs (defaults to `{}`)
    #[arg(long, value_name = "PATH")]
    pub inputs: Option<PathBuf>,

    /// JSON file with recorded responses keyed by model id
    #[arg(long, value_name = "PATH")]
    pub responses: PathBuf,

    /// Successful members required (overrides config)
    #[arg(long, value_name = "N")]
    pub quorum_size: Option<usize>,

    /// Do not gate on quorum or agreement
    #[arg(long)]
    pub no_quorum: bool,

    #[command(flatten)]
    pub identity: IdentityArgs,
}

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "spots",
    about = "Spots: diff and apply ordered item snapshots",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the changes between two snapshots
    Diff(DiffArgs),
    /// Apply the changes to an in-memory view of the old snapshot
    Apply(ApplyArgs),
    /// Check a change set against a collection size
    Validate(ValidateArgs),
}

#[derive(Args)]
pub struct DiffArgs {
    /// Old snapshot: a JSON item array or component
    pub old: PathBuf,
    /// New snapshot: a JSON item array or component
    pub new: PathBuf,
    /// Meta key that carries a stable item identity
    #[arg(long)]
    pub key: Option<String>,
}

#[derive(Args)]
pub struct ApplyArgs {
    pub old: PathBuf,
    pub new: PathBuf,
    #[arg(long)]
    pub key: Option<String>,
    /// Only render these kinds; rows of other kinds report a missing view
    #[arg(long, value_delimiter = ',')]
    pub kinds: Vec<String>,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Change set as JSON
    pub changes: PathBuf,
    /// Number of rows in the live collection
    #[arg(long)]
    pub size: usize,
}

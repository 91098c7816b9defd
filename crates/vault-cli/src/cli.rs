use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "vault",
    about = "Derive, validate and project vault records",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Vault config file (TOML); defaults apply when absent
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum RecordKind {
    Config,
    Output,
    Schema,
    Input,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build a record from properties and print its ID and version
    Id(BuildArgs),
    /// Build a record from properties and print its stored document
    Document(BuildArgs),
    /// Check a stored document against its record's invariants
    Validate(ValidateArgs),
    /// List configurations that depend on a job
    Dependents(DependentsArgs),
    /// Print the effective vault configuration
    Config,
}

#[derive(Args)]
pub struct BuildArgs {
    pub kind: RecordKind,
    /// JSON properties file, or `-` for stdin
    #[arg(default_value = "-")]
    pub input: String,
    /// Construction time (`YYYY-MM-DD HH:MM:SS`); defaults to now
    #[arg(long)]
    pub at: Option<String>,
}

#[derive(Args)]
pub struct ValidateArgs {
    pub kind: RecordKind,
    /// JSON document file, or `-` for stdin
    #[arg(default_value = "-")]
    pub input: String,
}

#[derive(Args)]
pub struct DependentsArgs {
    /// JSON file holding an array of configuration properties
    #[arg(long)]
    pub configs: String,
    pub service: String,
    pub source: String,
}

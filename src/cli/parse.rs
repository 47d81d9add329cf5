//! CLI parse: clap types for treepatch. No behavior; definitions only.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Treepatch CLI - ordered filesystem patches between tree snapshots
#[derive(Parser, Debug)]
#[command(name = "treepatch")]
#[command(about = "Compute ordered filesystem patches between directory tree snapshots")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace directory used to locate treepatch.toml
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the operations that turn one snapshot into another
    Diff {
        /// Snapshot to start from (JSON entry list or newline path list)
        #[arg(long)]
        from: PathBuf,
        /// Snapshot to arrive at (JSON entry list or newline path list)
        #[arg(long)]
        to: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Equality predicate (metadata, checksum); defaults to the configured one
        #[arg(long)]
        equality: Option<String>,
    },
    /// List the entries of a snapshot, optionally filtered by globs
    Ls {
        /// Snapshot file (JSON entry list or newline path list)
        snapshot: PathBuf,
        /// Glob patterns to include
        #[arg(long)]
        include: Vec<String>,
        /// Glob patterns to exclude
        #[arg(long)]
        exclude: Vec<String>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

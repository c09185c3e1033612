//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// fieldlearn -- learn regex field extraction rules from a few example values.
///
/// Use `fieldlearn <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "fieldlearn", version, about, long_about = None)]
pub struct Cli {
    /// Path to the fieldlearn.toml configuration file.
    ///
    /// A missing file at this path falls back to built-in defaults
    /// (plus environment overrides).
    #[arg(short, long, default_value = "fieldlearn.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Learn extraction rules from an events file.
    Learn(LearnArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- learn ----

/// Learn extraction rules for the values given with `-e`.
#[derive(Args, Debug)]
pub struct LearnArgs {
    /// Events file, one event per line.
    pub events: PathBuf,

    /// Example value to extract (repeatable).
    #[arg(short = 'e', long = "example", required = true)]
    pub examples: Vec<String>,

    /// Value that must never be extracted (repeatable).
    #[arg(short = 'x', long = "counter-example")]
    pub counter_examples: Vec<String>,

    /// Return every surviving rule instead of only the best one.
    #[arg(long)]
    pub all_rules: bool,

    /// Override `learner.max_iterations`.
    #[arg(long)]
    pub max_iterations: Option<usize>,

    /// Override `learner.max_rules`.
    #[arg(long)]
    pub max_rules: Option<usize>,
}

// ---- config ----

/// Manage fieldlearn configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, learner).
        #[arg(long)]
        section: Option<String>,
    },
}

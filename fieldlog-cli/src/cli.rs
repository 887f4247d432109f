//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// fieldlog -- daily health report for field-device logs.
///
/// Use `fieldlog <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "fieldlog", version, about, long_about = None)]
pub struct Cli {
    /// Path to the fieldlog.toml configuration file.
    #[arg(short, long, default_value = "fieldlog.toml")]
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
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze one day of sensor logs and write the daily summary.
    Analyze(AnalyzeArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- analyze ----

/// Analyze one day of sensor logs.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Target date in YYYYMMDD form.
    #[arg(long)]
    pub date: String,

    /// Override `site.log_root` from the configuration.
    #[arg(long)]
    pub log_root: Option<PathBuf>,

    /// Per-sensor line budget (default: `analyzer.max_lines_per_sensor`).
    #[arg(long)]
    pub max_lines: Option<usize>,

    /// Write the summary here instead of `{outbox_dir}/reports/{date}/daily_summary.json`.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Use the latest modified file when no file name contains the date.
    #[arg(long)]
    pub fallback_latest: bool,
}

// ---- config ----

/// Manage fieldlog configuration.
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
        /// Show only a specific section (general, site, analyzer).
        #[arg(long)]
        section: Option<String>,
    },
}

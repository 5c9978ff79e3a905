//! CLI argument definitions for the biodiversity record importer.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "biorec",
    version,
    about = "Biodiversity record importer - stage tabular data into collection hierarchies",
    long_about = "Import delimited biodiversity records into the Region > Site > Site visit >\n\
                  Taxon > Material hierarchy.\n\n\
                  Rows are staged up front, mapped through a saved profile and resolved level\n\
                  by level, one transaction per row. Rejected rows are exported with their\n\
                  error messages and the mapping profile for correction and re-import."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Import a delimited file through a mapping profile.
    Run(RunArgs),

    /// List the ranks of the built-in taxonomic ladder.
    Ranks,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Path to the delimited source file.
    #[arg(value_name = "CSV_FILE")]
    pub csv_file: PathBuf,

    /// Mapping profile (JSON) assigning source columns to import fields.
    #[arg(long = "mapping", value_name = "PATH")]
    pub mapping: PathBuf,

    /// Where to write rejected rows (default: <CSV_FILE>.errors.csv).
    #[arg(long = "errors-out", value_name = "PATH")]
    pub errors_out: Option<PathBuf>,

    /// Rank ladder override (JSON); the built-in ladder is used when omitted.
    #[arg(long = "ranks", value_name = "PATH")]
    pub ranks: Option<PathBuf>,

    /// Write every created entity to this file as JSON after the run.
    #[arg(long = "export", value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Skip exporting rejected rows and the mapping sidecar.
    #[arg(long = "no-error-file")]
    pub no_error_file: bool,

    /// Hide the progress bar.
    #[arg(long = "no-progress")]
    pub no_progress: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

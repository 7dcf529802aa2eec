//! CLI argument definitions for the RAMQ billing validator.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "ramq-validate",
    version,
    about = "RAMQ billing validator - check billing batches against fee-schedule rules",
    long_about = "Validate batches of RAMQ billing records against the catalogue of \
                  fee-schedule rules (annual limits, catalogue membership).\n\
                  Produces a table summary and an optional JSON run report."
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
    /// Validate a billing-record batch against the code catalogue.
    Run(RunArgs),

    /// List the registered rules.
    Rules,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Path to the billing-record CSV batch.
    #[arg(value_name = "RECORDS_CSV")]
    pub records: PathBuf,

    /// Path to the RAMQ code-catalogue CSV export.
    #[arg(long = "codes", value_name = "CODES_CSV")]
    pub codes: PathBuf,

    /// Run identifier attached to every finding (default: derived from the
    /// current time).
    #[arg(long = "run-id", value_name = "ID")]
    pub run_id: Option<String>,

    /// Leaf label marking a code family as billable once per patient per
    /// year. Repeatable; replaces the built-in defaults when given.
    #[arg(long = "annual-leaf", value_name = "LABEL")]
    pub annual_leaves: Vec<String>,

    /// Directory for the JSON run report (no report written when absent).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

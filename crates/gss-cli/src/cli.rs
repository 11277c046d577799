//! CLI argument definitions for `gss-prep`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "gss-prep",
    version,
    about = "GSS extract preparation - decode, clean and resample survey data",
    long_about = "Decode a General Social Survey extract (Stata .dct dictionary plus \
                  fixed-width .dat file), recode missing-value sentinels and draw \
                  weighted bootstrap samples.\n\n\
                  Cleaned or resampled data can be written as CSV."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
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
    /// Print the column layout parsed from a dictionary.
    Layout(LayoutArgs),

    /// Decode an extract and optionally write it as CSV.
    Load(LoadArgs),

    /// Count the distinct values of one field.
    Values(ValuesArgs),

    /// Draw a weighted bootstrap sample of respondents.
    Resample(ResampleArgs),
}

#[derive(Args)]
pub struct LayoutArgs {
    /// Stata dictionary (.dct).
    #[arg(value_name = "DCT")]
    pub dictionary: PathBuf,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: LayoutFormatArg,
}

/// Inputs shared by every command that decodes data.
#[derive(Args, Clone)]
pub struct DataArgs {
    /// Stata dictionary (.dct).
    #[arg(value_name = "DCT")]
    pub dictionary: PathBuf,

    /// Fixed-width data file (.dat or .dat.gz).
    #[arg(value_name = "DAT")]
    pub data: PathBuf,

    /// Treat the data file as gzip-compressed (default: detect).
    #[arg(long = "gzip", conflicts_with = "no_gzip")]
    pub gzip: bool,

    /// Treat the data file as plain text (default: detect).
    #[arg(long = "no-gzip")]
    pub no_gzip: bool,

    /// Cast integer and real fields to numeric columns.
    #[arg(long = "typed")]
    pub typed: bool,

    /// Recode missing-value sentinels to null using the built-in GSS table.
    #[arg(long = "recode")]
    pub recode: bool,

    /// Recode with a TOML sentinel table instead of the built-in one.
    ///
    /// Implies --recode.
    #[arg(long = "sentinels", value_name = "FILE")]
    pub sentinels: Option<PathBuf>,
}

#[derive(Args)]
pub struct LoadArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Write the decoded dataset to this CSV file.
    #[arg(long = "output", short = 'o', value_name = "CSV")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ValuesArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Field to tabulate.
    #[arg(value_name = "FIELD")]
    pub field: String,
}

#[derive(Args)]
pub struct ResampleArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Column holding the sampling weight.
    #[arg(long = "weight", value_name = "FIELD", default_value = "finalwgt")]
    pub weight: String,

    /// Resample each value of this field separately (for example `year`).
    #[arg(long = "group-by", value_name = "FIELD")]
    pub group_by: Option<String>,

    /// Seed for a reproducible sample.
    #[arg(long = "seed", value_name = "N")]
    pub seed: Option<u64>,

    /// Write the sample to this CSV file.
    #[arg(long = "output", short = 'o', value_name = "CSV")]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LayoutFormatArg {
    Table,
    Json,
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

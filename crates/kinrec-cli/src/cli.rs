//! CLI argument definitions for `kinrec`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use kinrec_cli::config::{parse_quantity_kind, parse_weight};
use kinrec_cli::logging::LogFormat;
use kinrec_model::{JoinMode, QuantityKind};
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(
    name = "kinrec",
    version,
    about = "Kinetic record linkage - match extracted kinetic parameters against reference data",
    long_about = "Match extracted enzyme kinetic parameters (kcat, KM, kcat/KM) against a\n\
                  reference table by optimal assignment within groups, and explain the\n\
                  disagreements of every matched pair (wrong unit, off by a power of ten,\n\
                  value deviation)."
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
    /// Match two record files and write the joined table with diagnostics.
    Match(MatchArgs),

    /// Match the bare values of one field, ignoring record identity.
    Multiset(MultisetArgs),

    /// Parse measurement strings and show their canonical values.
    Parse(ParseArgs),

    /// List the recognized unit spellings.
    Units,
}

#[derive(Parser)]
pub struct MatchArgs {
    /// Extracted records (CSV).
    #[arg(long = "left", value_name = "CSV")]
    pub left: PathBuf,

    /// Reference records (CSV).
    #[arg(long = "right", value_name = "CSV")]
    pub right: PathBuf,

    /// TOML match configuration; flags below override it.
    #[arg(long = "config", value_name = "TOML")]
    pub config: Option<PathBuf>,

    /// Partition field; records are only compared within one partition.
    #[arg(long = "group-by", value_name = "FIELD")]
    pub group_by: Vec<String>,

    /// Objective weight of a field.
    #[arg(long = "weight", value_name = "FIELD=WEIGHT", value_parser = parse_weight)]
    pub weights: Vec<(String, f64)>,

    /// Quantity kind of a field the built-in catalog does not know.
    #[arg(long = "quantity", value_name = "FIELD=KIND", value_parser = parse_quantity_kind)]
    pub quantities: Vec<(String, QuantityKind)>,

    /// Which one-sided groups to keep.
    #[arg(long = "mode", value_enum)]
    pub mode: Option<JoinModeArg>,

    /// Base of the off-by-power check (60 for rate-heavy data).
    #[arg(long = "off-by-base", value_name = "BASE")]
    pub off_by_base: Option<f64>,

    /// Output directory for joined.csv, diagnostics.csv and report.json.
    #[arg(long = "output-dir", value_name = "DIR", default_value = "kinrec-output")]
    pub output_dir: PathBuf,
}

#[derive(Parser)]
pub struct MultisetArgs {
    /// Extracted records (CSV).
    #[arg(long = "left", value_name = "CSV")]
    pub left: PathBuf,

    /// Reference records (CSV).
    #[arg(long = "right", value_name = "CSV")]
    pub right: PathBuf,

    /// Field whose values are matched.
    #[arg(long = "field", value_name = "FIELD")]
    pub field: String,

    /// Quantity kind of the field (default: from the field catalog).
    #[arg(long = "kind", value_enum)]
    pub kind: Option<KindArg>,

    /// Partition field.
    #[arg(long = "group-by", value_name = "FIELD")]
    pub group_by: Vec<String>,

    /// Weight of the mantissa distance.
    #[arg(long = "alpha", default_value_t = 1.0)]
    pub alpha: f64,

    /// Weight of the exponent penalty.
    #[arg(long = "beta", default_value_t = 1.0)]
    pub beta: f64,

    /// Exponent base (default: 60 for rates, 10 otherwise).
    #[arg(long = "base")]
    pub base: Option<f64>,

    /// Output CSV path.
    #[arg(long = "output", value_name = "CSV", default_value = "multiset.csv")]
    pub output: PathBuf,
}

#[derive(Parser)]
pub struct ParseArgs {
    /// Measurement strings, e.g. "33 ± 2 s^-1".
    #[arg(value_name = "TEXT", required = true)]
    pub texts: Vec<String>,

    /// Quantity kind used for the canonical value (default: from the unit).
    #[arg(long = "kind", value_enum)]
    pub kind: Option<KindArg>,

    /// Base of "x 10^n" exponents.
    #[arg(long = "base", default_value_t = 10.0)]
    pub base: f64,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum JoinModeArg {
    Inner,
    Left,
    Right,
    Outer,
}

impl From<JoinModeArg> for JoinMode {
    fn from(mode: JoinModeArg) -> Self {
        match mode {
            JoinModeArg::Inner => JoinMode::Inner,
            JoinModeArg::Left => JoinMode::Left,
            JoinModeArg::Right => JoinMode::Right,
            JoinModeArg::Outer => JoinMode::Outer,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum KindArg {
    Rate,
    Concentration,
    Specificity,
}

impl From<KindArg> for QuantityKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Rate => QuantityKind::Rate,
            KindArg::Concentration => QuantityKind::Concentration,
            KindArg::Specificity => QuantityKind::Specificity,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

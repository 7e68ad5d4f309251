//! Command line arguments

use std::path::PathBuf;
use clap::{Args, Parser, Subcommand, ValueEnum};
use wv_core::Mode;
use wv_data::SourceKind;

/// Hourly solar and wind output against forecast bands
#[derive(Debug, Parser)]
#[command(name = "wattview", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// JSON config file with source settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Source type (inferred from the file extension by default)
    #[arg(long)]
    pub source: Option<SourceKind>,

    /// Feed snapshot (.json) or statistics database (.db)
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Display mode
    #[arg(short, long, default_value_t = Mode::Combined)]
    pub mode: Mode,

    /// Start handle index (applied after the end handle)
    #[arg(long)]
    pub start: Option<usize>,

    /// End handle index
    #[arg(long)]
    pub end: Option<usize>,

    /// Hours shown after a range reset
    #[arg(long)]
    pub window: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Print summary statistics of the visible window
    #[arg(long)]
    pub summary: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the statistics database from raw scraper exports
    Import(ImportArgs),
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Database to create or update
    #[arg(long)]
    pub db: PathBuf,

    /// Solar export (JSON list of records)
    #[arg(long, required_unless_present = "wind")]
    pub solar: Option<PathBuf>,

    /// Wind export (JSON list of records)
    #[arg(long)]
    pub wind: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

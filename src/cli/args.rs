//! Command-line argument definitions for facility sync
//!
//! One subcommand per source kind; every subcommand shares the same upload
//! options, which are layered over the configuration file and environment.

use crate::app::services::record_parser::RecordSource;
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

/// CLI arguments for the facility sync tool
///
/// Reads facility records from a CSV export, a workbook or a local SQLite
/// database and uploads them in batches to a remote D1 database.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "facility_sync",
    version,
    about = "Upload facility records from CSV, workbook or SQLite sources to a D1 database",
    long_about = "Reads facility records (care homes, clinics and similar sites) from a \
                  CSV export in an unknown legacy encoding, an Excel workbook or a local \
                  SQLite database, and uploads them in fixed-size batches of INSERT \
                  statements through the wrangler CLI. Failed batches are counted and \
                  reported; the run always finishes with a success/failure summary."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available source kinds
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Upload rows from a comma-delimited export (UTF-8, CP949 or EUC-KR)
    Csv(SourceArgs),
    /// Upload rows from the first sheet of an xlsx/xls/ods workbook
    Workbook(SourceArgs),
    /// Upload the facilities table of a local SQLite database
    LocalDb(SourceArgs),
}

/// Input file plus shared upload options
#[derive(Debug, Clone, Parser)]
pub struct SourceArgs {
    /// Source file to read
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub upload: UploadArgs,
}

/// Options shared by every subcommand
#[derive(Debug, Clone, Default, clap::Args)]
pub struct UploadArgs {
    /// Path to configuration file
    ///
    /// TOML configuration file for advanced settings. If not specified,
    /// looks for ~/.config/facility-sync/config.toml
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Remote D1 database name passed to wrangler
    #[arg(short = 'd', long = "database", value_name = "NAME")]
    pub database: Option<String>,

    /// Records per INSERT statement
    #[arg(short = 'b', long = "batch-size", value_name = "COUNT")]
    pub batch_size: Option<usize>,

    /// Pause between batches in milliseconds
    #[arg(long = "delay-ms", value_name = "MS")]
    pub delay_ms: Option<u64>,

    /// Delete every existing row before uploading
    ///
    /// The run stops before any upload if the delete fails.
    #[arg(long = "replace", help = "Delete all existing rows before uploading")]
    pub replace: bool,

    /// Parse, plan and encode without sending anything
    #[arg(
        long = "dry-run",
        help = "Encode statements without sending them",
        conflicts_with = "local_target"
    )]
    pub dry_run: bool,

    /// Apply statements to a local SQLite file instead of the remote database
    #[arg(long = "local-target", value_name = "SQLITE")]
    pub local_target: Option<PathBuf>,

    /// Output format for the final summary
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for the final summary"
    )]
    pub output_format: OutputFormat,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors. Overrides verbose settings and hides the progress bar.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Output format options for the final summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON format for scripting
    Json,
}

impl Commands {
    /// Record source named by the subcommand
    pub fn source(&self) -> RecordSource {
        match self {
            Self::Csv(args) => RecordSource::DelimitedText(args.file.clone()),
            Self::Workbook(args) => RecordSource::Workbook(args.file.clone()),
            Self::LocalDb(args) => RecordSource::LocalDatabase(args.file.clone()),
        }
    }

    pub fn upload_args(&self) -> &UploadArgs {
        match self {
            Self::Csv(args) | Self::Workbook(args) | Self::LocalDb(args) => &args.upload,
        }
    }

    pub fn file(&self) -> &Path {
        match self {
            Self::Csv(args) | Self::Workbook(args) | Self::LocalDb(args) => &args.file,
        }
    }

    /// Check that named files exist before any work starts
    pub fn validate(&self) -> Result<()> {
        let file = self.file();
        if !file.is_file() {
            return Err(Error::source_read(
                file.display().to_string(),
                "file does not exist",
            ));
        }

        let upload = self.upload_args();
        if let Some(config_file) = &upload.config_file {
            if !config_file.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }

        if upload.batch_size == Some(0) {
            return Err(Error::configuration("Batch size must be at least 1"));
        }

        Ok(())
    }
}

impl UploadArgs {
    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Level forced by `-v` or `-q`; `None` leaves the configured level
    pub fn log_level_override(&self) -> Option<&'static str> {
        (self.quiet || self.verbose > 0).then(|| self.get_log_level())
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

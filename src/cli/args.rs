//! Command line argument definitions and parsing

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use crate::constants::{MAX_COORDINATE_PRECISION, MAX_PARALLEL_WORKERS};
use crate::{Error, Result};

/// CLI arguments for the MLS cell export processor
///
/// Cleans Mozilla Location Service cell export files and estimates site
/// positions from the surviving observations.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "mls-processor",
    version,
    about = "Clean MLS cell exports and estimate site positions",
    long_about = "Parses MLS full cell export CSV files, filters them down to the configured \
                  radio technology and country, decomposes cell identifiers into site and \
                  sector components, and writes a cleaned cells CSV plus a per-site position \
                  estimate CSV derived from sample-weighted centroids."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Args {
    /// Get the command to execute
    ///
    /// `main` handles the no-command case before dispatching, so this is
    /// only reached with a command present.
    pub fn get_command(self) -> Commands {
        self.command.expect("No command provided")
    }
}

/// Available subcommands for the MLS processor
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Process an export into cleaned cells and site estimates (default command)
    Process(ProcessArgs),
    /// Analyze an export and report the busiest estimated sites
    Sites(SitesArgs),
    /// Validate an export without writing any output
    Validate(ValidateArgs),
}

/// Output format options for generated reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output with colors
    Human,
    /// JSON format for programmatic use
    Json,
    /// CSV format of metric,value rows
    Csv,
}

/// Arguments for the process command (main export processing)
#[derive(Debug, Clone, Parser)]
pub struct ProcessArgs {
    /// Export file to process
    ///
    /// When omitted, the export directory is scanned for files matching the
    /// configured pattern and the newest candidates are offered for
    /// selection.
    #[arg(value_name = "EXPORT_FILE", help = "Path to an MLS cell export CSV")]
    pub export_file: Option<PathBuf>,

    /// Directory scanned for export files
    #[arg(
        short = 'e',
        long = "export-dir",
        value_name = "PATH",
        help = "Directory scanned for export files when no file is given"
    )]
    pub export_dir: Option<PathBuf>,

    /// Directory receiving the generated CSV files
    ///
    /// Will be created if it doesn't exist.
    #[arg(
        short = 'o',
        long = "output-dir",
        value_name = "PATH",
        help = "Output directory for cells.csv and sites.csv"
    )]
    pub output_dir: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// TOML configuration file providing defaults for every option. When not
    /// specified, the per-user config location is consulted.
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Radio technology to keep
    #[arg(
        long = "radio",
        value_name = "RADIO",
        help = "Keep only records with this radio type (empty keeps all)"
    )]
    pub radio: Option<String>,

    /// Mobile country code to keep
    #[arg(
        long = "mcc",
        value_name = "MCC",
        help = "Keep only records with this mobile country code"
    )]
    pub mcc: Option<u16>,

    /// Number of parallel parse workers
    #[arg(
        short = 'j',
        long = "workers",
        value_name = "COUNT",
        help = "Number of parallel parse workers"
    )]
    pub workers: Option<usize>,

    /// Coordinate decimal places in output files
    #[arg(
        long = "precision",
        value_name = "DIGITS",
        help = "Coordinate decimal places in output files"
    )]
    pub precision: Option<usize>,

    /// Output format for the final report
    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for the final report"
    )]
    pub format: OutputFormat,

    /// Show the processing plan without writing anything
    #[arg(
        long = "dry-run",
        help = "Show what would be processed without writing output files"
    )]
    pub dry_run: bool,

    /// Skip interactive prompts
    #[arg(
        short = 'y',
        long = "yes",
        help = "Answer yes to prompts and take the newest export"
    )]
    pub assume_yes: bool,

    /// Suppress progress output
    #[arg(
        short = 'q',
        long = "quiet",
        conflicts_with = "verbose",
        help = "Suppress progress output, log errors only"
    )]
    pub quiet: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: debug, -vv: trace)"
    )]
    pub verbose: u8,
}

impl Default for ProcessArgs {
    fn default() -> Self {
        Self {
            export_file: None,
            export_dir: None,
            output_dir: None,
            config_file: None,
            radio: None,
            mcc: None,
            workers: None,
            precision: None,
            format: OutputFormat::Human,
            dry_run: false,
            assume_yes: false,
            quiet: false,
            verbose: 0,
        }
    }
}

impl ProcessArgs {
    /// Validate the provided arguments
    pub fn validate(&self) -> Result<()> {
        validate_export_file(self.export_file.as_deref())?;
        validate_export_dir(self.export_dir.as_deref())?;
        validate_config_file(self.config_file.as_deref())?;
        validate_workers(self.workers)?;
        validate_precision(self.precision)?;
        validate_mcc(self.mcc)?;
        Ok(())
    }

    /// Get the effective log level
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }

    /// Log level forced by the verbosity flags, when any was given
    ///
    /// `None` lets the configured level apply.
    pub fn explicit_log_level(&self) -> Option<&'static str> {
        (self.quiet || self.verbose > 0).then(|| self.get_log_level())
    }

    /// Whether progress bars should be displayed
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Arguments for the sites command (analysis, no output files)
#[derive(Debug, Clone, Parser)]
pub struct SitesArgs {
    /// Export file to analyze
    #[arg(value_name = "EXPORT_FILE", help = "Path to an MLS cell export CSV")]
    pub export_file: Option<PathBuf>,

    /// Directory scanned for export files
    #[arg(
        short = 'e',
        long = "export-dir",
        value_name = "PATH",
        help = "Directory scanned for export files when no file is given"
    )]
    pub export_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Radio technology to keep
    #[arg(
        long = "radio",
        value_name = "RADIO",
        help = "Keep only records with this radio type (empty keeps all)"
    )]
    pub radio: Option<String>,

    /// Mobile country code to keep
    #[arg(
        long = "mcc",
        value_name = "MCC",
        help = "Keep only records with this mobile country code"
    )]
    pub mcc: Option<u16>,

    /// Number of parallel parse workers
    #[arg(
        short = 'j',
        long = "workers",
        value_name = "COUNT",
        help = "Number of parallel parse workers"
    )]
    pub workers: Option<usize>,

    /// Number of sites shown in the report
    #[arg(
        short = 'n',
        long = "limit",
        value_name = "COUNT",
        default_value_t = 20,
        help = "Number of sites to show, ranked by observation count"
    )]
    pub limit: usize,

    /// Output format for the site report
    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for the site report (human or json)"
    )]
    pub format: OutputFormat,

    /// Skip interactive prompts
    #[arg(
        short = 'y',
        long = "yes",
        help = "Answer yes to prompts and take the newest export"
    )]
    pub assume_yes: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: debug, -vv: trace)"
    )]
    pub verbose: u8,
}

impl Default for SitesArgs {
    fn default() -> Self {
        Self {
            export_file: None,
            export_dir: None,
            config_file: None,
            radio: None,
            mcc: None,
            workers: None,
            limit: 20,
            format: OutputFormat::Human,
            assume_yes: false,
            verbose: 0,
        }
    }
}

impl SitesArgs {
    /// Validate the provided arguments
    pub fn validate(&self) -> Result<()> {
        validate_export_file(self.export_file.as_deref())?;
        validate_export_dir(self.export_dir.as_deref())?;
        validate_config_file(self.config_file.as_deref())?;
        validate_workers(self.workers)?;
        validate_mcc(self.mcc)?;

        if self.limit == 0 {
            return Err(Error::configuration(
                "Site limit must be at least 1".to_string(),
            ));
        }

        // The ranking table has no sensible metric,value flattening
        if self.format == OutputFormat::Csv {
            return Err(Error::configuration(
                "CSV format is not supported for the site report, use human or json".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the effective log level
    pub fn get_log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Log level forced by the verbosity flags, when any was given
    pub fn explicit_log_level(&self) -> Option<&'static str> {
        (self.verbose > 0).then(|| self.get_log_level())
    }
}

/// Arguments for the validate command (parse check, no output files)
#[derive(Debug, Clone, Parser)]
pub struct ValidateArgs {
    /// Export file to validate
    #[arg(value_name = "EXPORT_FILE", help = "Path to an MLS cell export CSV")]
    pub export_file: Option<PathBuf>,

    /// Directory scanned for export files
    #[arg(
        short = 'e',
        long = "export-dir",
        value_name = "PATH",
        help = "Directory scanned for export files when no file is given"
    )]
    pub export_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Radio technology to keep
    #[arg(
        long = "radio",
        value_name = "RADIO",
        help = "Keep only records with this radio type (empty keeps all)"
    )]
    pub radio: Option<String>,

    /// Mobile country code to keep
    #[arg(
        long = "mcc",
        value_name = "MCC",
        help = "Keep only records with this mobile country code"
    )]
    pub mcc: Option<u16>,

    /// Number of parallel parse workers
    #[arg(
        short = 'j',
        long = "workers",
        value_name = "COUNT",
        help = "Number of parallel parse workers"
    )]
    pub workers: Option<usize>,

    /// Number of parse errors echoed in the report
    #[arg(
        long = "errors",
        value_name = "COUNT",
        default_value_t = 10,
        help = "Number of parse errors to show"
    )]
    pub error_sample: usize,

    /// Output format for the validation report
    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for the validation report"
    )]
    pub format: OutputFormat,

    /// Skip interactive prompts
    #[arg(
        short = 'y',
        long = "yes",
        help = "Answer yes to prompts and take the newest export"
    )]
    pub assume_yes: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: debug, -vv: trace)"
    )]
    pub verbose: u8,
}

impl Default for ValidateArgs {
    fn default() -> Self {
        Self {
            export_file: None,
            export_dir: None,
            config_file: None,
            radio: None,
            mcc: None,
            workers: None,
            error_sample: 10,
            format: OutputFormat::Human,
            assume_yes: false,
            verbose: 0,
        }
    }
}

impl ValidateArgs {
    /// Validate the provided arguments
    pub fn validate(&self) -> Result<()> {
        validate_export_file(self.export_file.as_deref())?;
        validate_export_dir(self.export_dir.as_deref())?;
        validate_config_file(self.config_file.as_deref())?;
        validate_workers(self.workers)?;
        validate_mcc(self.mcc)?;
        Ok(())
    }

    /// Get the effective log level
    pub fn get_log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Log level forced by the verbosity flags, when any was given
    pub fn explicit_log_level(&self) -> Option<&'static str> {
        (self.verbose > 0).then(|| self.get_log_level())
    }
}

fn validate_export_file(export_file: Option<&Path>) -> Result<()> {
    if let Some(path) = export_file {
        if !path.exists() {
            return Err(Error::configuration(format!(
                "Export file does not exist: {}",
                path.display()
            )));
        }
        if !path.is_file() {
            return Err(Error::configuration(format!(
                "Export path is not a file: {}",
                path.display()
            )));
        }
    }
    Ok(())
}

fn validate_export_dir(export_dir: Option<&Path>) -> Result<()> {
    if let Some(path) = export_dir {
        if !path.exists() {
            return Err(Error::configuration(format!(
                "Export directory does not exist: {}",
                path.display()
            )));
        }
        if !path.is_dir() {
            return Err(Error::configuration(format!(
                "Export path is not a directory: {}",
                path.display()
            )));
        }
    }
    Ok(())
}

fn validate_config_file(config_file: Option<&Path>) -> Result<()> {
    if let Some(path) = config_file {
        if !path.exists() {
            return Err(Error::configuration(format!(
                "Config file does not exist: {}",
                path.display()
            )));
        }
    }
    Ok(())
}

fn validate_workers(workers: Option<usize>) -> Result<()> {
    if let Some(workers) = workers {
        if workers == 0 || workers > MAX_PARALLEL_WORKERS {
            return Err(Error::configuration(format!(
                "Worker count must be between 1 and {}, got {}",
                MAX_PARALLEL_WORKERS, workers
            )));
        }
    }
    Ok(())
}

fn validate_precision(precision: Option<usize>) -> Result<()> {
    if let Some(precision) = precision {
        if precision > MAX_COORDINATE_PRECISION {
            return Err(Error::configuration(format!(
                "Coordinate precision must be at most {}, got {}",
                MAX_COORDINATE_PRECISION, precision
            )));
        }
    }
    Ok(())
}

fn validate_mcc(mcc: Option<u16>) -> Result<()> {
    if let Some(mcc) = mcc {
        if mcc == 0 || mcc > 999 {
            return Err(Error::configuration(format!(
                "Mobile country code must be between 1 and 999, got {}",
                mcc
            )));
        }
    }
    Ok(())
}

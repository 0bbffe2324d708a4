//! Shared components for CLI commands
//!
//! This module contains common types, utilities, and functions used across
//! multiple CLI command implementations.

use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::app::services::cell_csv_parser::ParseStats;
use crate::app::services::export_scanner::{ExportScanConfig, ExportScanner};
use crate::app::services::site_aggregator::AggregationStats;
use crate::cli::input;
use crate::config::Config;
use crate::constants::is_known_radio_type;
use crate::{Error, Result};

/// Run statistics reported by every command
#[derive(Debug, Clone, Default)]
pub struct ProcessingReport {
    /// Export file the run consumed
    pub export_file: Option<PathBuf>,
    /// Parsing statistics
    pub parse: ParseStats,
    /// Aggregation statistics
    pub aggregation: AggregationStats,
    /// Rows written to the cleaned cells CSV
    pub cells_written: usize,
    /// Rows written to the site estimates CSV
    pub sites_written: usize,
    /// Output file sizes in bytes
    pub output_sizes: Vec<(String, u64)>,
    /// Total processing time
    pub processing_time: Duration,
}

impl ProcessingReport {
    /// Calculate total output size in bytes
    pub fn total_output_size(&self) -> u64 {
        self.output_sizes.iter().map(|(_, size)| size).sum()
    }
}

/// Set up structured logging for a command
///
/// Quiet mode drops timestamps and compacts the format so stderr stays
/// out of the way of redirected stdout reports.
pub fn setup_logging(log_level: &str, quiet: bool) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    // Create filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mls_processor={}", log_level)));

    if quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        // Standard logging with timestamps
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load configuration and bring up logging for a command
///
/// The configured log level applies when no verbosity flag overrides it,
/// so the config file is read before the subscriber is installed; the
/// configuration source is announced once logging is live.
pub fn initialize_command(
    config_file: Option<&Path>,
    flag_level: Option<&str>,
    quiet: bool,
) -> Result<Config> {
    let config = Config::load(config_file)?;

    setup_logging(flag_level.unwrap_or(&config.logging.level), quiet)?;

    match config_file {
        Some(path) => info!("Using config file: {}", path.display()),
        None => match Config::default_config_path().filter(|path| path.exists()) {
            Some(path) => info!("Using config file: {}", path.display()),
            None => info!("No config file found, using defaults"),
        },
    }

    Ok(config)
}

/// Warn when the radio filter names a technology exports never carry
pub fn check_radio_filter(config: &Config) {
    let radio = &config.filter.radio;
    if !radio.is_empty() && !is_known_radio_type(radio) {
        warn!(
            "Radio filter '{}' is not a known export technology, every record may be filtered out",
            radio
        );
    }
}

/// Resolve the export file a command should read
///
/// An explicit path always wins. Otherwise the export directory is scanned
/// for matching files, newest first: a single match asks for confirmation,
/// several matches open the selection menu, and `assume_yes` takes the
/// newest without prompting.
pub fn resolve_export_file(
    config: &Config,
    explicit: Option<&Path>,
    assume_yes: bool,
) -> Result<PathBuf> {
    if let Some(path) = explicit {
        info!("Using explicit export file: {}", path.display());
        return Ok(path.to_path_buf());
    }

    let scanner = ExportScanner::with_config(ExportScanConfig {
        pattern: config.input.file_pattern.clone(),
        recursive: false,
    });

    let mut files = scanner.scan(&config.input.export_dir)?;
    if files.is_empty() {
        return Err(Error::file_not_found(format!(
            "{} (no files matching '{}')",
            config.input.export_dir.display(),
            config.input.file_pattern
        )));
    }

    if assume_yes {
        let newest = files.remove(0);
        info!(
            "Selected export {} ({})",
            newest.filename(),
            newest.vintage_label()
        );
        return Ok(newest.path);
    }

    if files.len() == 1 {
        let only = &files[0];
        let message = format!("Process {} ({})?", only.filename(), only.vintage_label());
        if !input::prompt_confirmation(&message, true)? {
            return Err(Error::processing_interrupted(
                "Cancelled at export selection".to_string(),
            ));
        }
        return Ok(only.path.clone());
    }

    let selected = input::prompt_export_selection(&files)?;
    info!(
        "Selected export {} ({})",
        selected.filename(),
        selected.vintage_label()
    );
    Ok(selected.path)
}

/// Estimate the record count of an export for progress bar sizing
///
/// Export records average roughly 100 bytes.
pub fn estimate_record_count(path: &Path) -> u64 {
    std::fs::metadata(path)
        .map(|meta| meta.len() / 100)
        .unwrap_or(0)
}

/// Create a progress bar with appropriate styling
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} [{per_sec}] ETA: {eta}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb.set_message(message.to_string());
    pb
}

//! Configuration management and validation.
//!
//! Layered configuration for the processing pipeline, lowest to highest
//! precedence: built-in defaults, an optional TOML file, command-line
//! overrides applied by the CLI layer. Every section is serde-defaulted
//! so partial files work.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::app::services::cell_csv_parser::RecordFilter;
use crate::app::services::export_writer::WriterConfig;
use crate::constants::{
    CELLS_OUTPUT_FILENAME, DEFAULT_COORDINATE_PRECISION, DEFAULT_MCC_FILTER, DEFAULT_OUTPUT_DIR,
    DEFAULT_PARSE_CHUNK_SIZE, DEFAULT_RADIO_FILTER, EXPORT_FILE_PATTERN, MAX_COORDINATE_PRECISION,
    MAX_PARALLEL_WORKERS, SITES_OUTPUT_FILENAME,
};
use crate::{Error, Result};

/// Input discovery settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Directory scanned for export files
    pub export_dir: PathBuf,

    /// Glob pattern an export filename must match
    pub file_pattern: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            export_dir: PathBuf::from("."),
            file_pattern: EXPORT_FILE_PATTERN.to_string(),
        }
    }
}

/// Pre-parse record filter settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Radio technology kept by the pre-parse filter; empty keeps every radio
    pub radio: String,

    /// Country code kept by the pre-parse filter; zero keeps every country
    pub mcc: u16,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            radio: DEFAULT_RADIO_FILTER.to_string(),
            mcc: DEFAULT_MCC_FILTER,
        }
    }
}

/// Output CSV settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving the generated CSV files
    pub directory: PathBuf,

    /// Filename for the cleaned cells CSV
    pub cells_filename: String,

    /// Filename for the site estimates CSV
    pub sites_filename: String,

    /// Decimal places for rendered coordinates
    pub coordinate_precision: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_OUTPUT_DIR),
            cells_filename: CELLS_OUTPUT_FILENAME.to_string(),
            sites_filename: SITES_OUTPUT_FILENAME.to_string(),
            coordinate_precision: DEFAULT_COORDINATE_PRECISION,
        }
    }
}

/// Parallelism settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Number of blocking parse workers; 0 derives a count from the system profile
    pub parallel_workers: usize,

    /// Records handed to one blocking parse worker at a time
    pub chunk_size: usize,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            parallel_workers: 0,
            chunk_size: DEFAULT_PARSE_CHUNK_SIZE,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing level when no RUST_LOG override is present
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Global configuration for export processing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input discovery settings
    pub input: InputConfig,

    /// Pre-parse record filter settings
    pub filter: FilterConfig,

    /// Output CSV settings
    pub output: OutputConfig,

    /// Parallelism settings
    pub performance: PerformanceConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration with layered precedence.
    ///
    /// An explicit path must exist and parse. Without one, the well-known
    /// per-user file is read when present, otherwise defaults apply.
    /// CLI overrides are layered on by the caller afterwards.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match explicit_path {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::file_not_found(path.display().to_string()));
                }
                Self::from_file(path)
            }
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Parse configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(format!("Failed to read config file '{}'", path.display()), e)
        })?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Well-known per-user configuration file location
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("mls-processor").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.input.file_pattern.is_empty() {
            return Err(Error::configuration(
                "Input file pattern must not be empty".to_string(),
            ));
        }

        if self.filter.mcc > 999 {
            return Err(Error::configuration(format!(
                "Country code filter must be between 1 and 999 (or 0 to disable), got {}",
                self.filter.mcc
            )));
        }

        if self.output.cells_filename.is_empty() || self.output.sites_filename.is_empty() {
            return Err(Error::configuration(
                "Output filenames must not be empty".to_string(),
            ));
        }

        if self.output.coordinate_precision > MAX_COORDINATE_PRECISION {
            return Err(Error::configuration(format!(
                "Coordinate precision must be at most {} decimal places, got {}",
                MAX_COORDINATE_PRECISION, self.output.coordinate_precision
            )));
        }

        if self.performance.parallel_workers > MAX_PARALLEL_WORKERS {
            return Err(Error::configuration(format!(
                "Worker count must be between 1 and {} (or 0 for automatic), got {}",
                MAX_PARALLEL_WORKERS, self.performance.parallel_workers
            )));
        }

        if self.performance.chunk_size == 0 {
            return Err(Error::configuration(
                "Chunk size must be at least 1".to_string(),
            ));
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(Error::configuration(format!(
                    "Unknown log level '{}' (expected trace, debug, info, warn or error)",
                    other
                )));
            }
        }

        Ok(())
    }

    /// Full path of the cleaned cells CSV
    pub fn cells_output_path(&self) -> PathBuf {
        self.output.directory.join(&self.output.cells_filename)
    }

    /// Full path of the site estimates CSV
    pub fn sites_output_path(&self) -> PathBuf {
        self.output.directory.join(&self.output.sites_filename)
    }

    /// Record filter derived from the filter section.
    ///
    /// An empty radio keeps every radio type; a zero country code keeps
    /// every country.
    pub fn record_filter(&self) -> RecordFilter {
        let radio = Some(self.filter.radio.clone()).filter(|radio| !radio.is_empty());
        let mcc = Some(self.filter.mcc).filter(|&mcc| mcc != 0);
        RecordFilter::new(radio, mcc)
    }

    /// Writer configuration derived from the output and filter sections
    pub fn writer_config(&self) -> WriterConfig {
        WriterConfig::new()
            .with_coordinate_precision(self.output.coordinate_precision)
            .with_mcc_filter(Some(self.filter.mcc).filter(|&mcc| mcc != 0))
    }

    /// Effective worker count, deferring to the system profile when automatic
    pub fn effective_workers(&self, profile: &SystemProfile) -> usize {
        if self.performance.parallel_workers == 0 {
            profile.default_workers()
        } else {
            self.performance.parallel_workers
        }
    }

    /// Create the output directory when missing
    pub fn ensure_output_directory(&self) -> Result<()> {
        std::fs::create_dir_all(&self.output.directory).map_err(|e| {
            Error::io(
                format!(
                    "Failed to create output directory '{}'",
                    self.output.directory.display()
                ),
                e,
            )
        })
    }

    /// Set the export scan directory
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.input.export_dir = dir.into();
        self
    }

    /// Set the output directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output.directory = dir.into();
        self
    }

    /// Set the radio filter; an empty value keeps every radio type
    pub fn with_radio(mut self, radio: impl Into<String>) -> Self {
        self.filter.radio = radio.into();
        self
    }

    /// Set the country code filter
    pub fn with_mcc(mut self, mcc: u16) -> Self {
        self.filter.mcc = mcc;
        self
    }

    /// Set an explicit worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.performance.parallel_workers = workers;
        self
    }

    /// Set coordinate precision in decimal places
    pub fn with_coordinate_precision(mut self, precision: usize) -> Self {
        self.output.coordinate_precision = precision;
        self
    }
}

/// System profiling information for worker sizing
#[derive(Debug, Clone)]
pub struct SystemProfile {
    /// Number of CPU cores available
    pub cpu_cores: usize,
    /// Available memory in MB
    pub memory_mb: usize,
    /// Performance cores (for systems with efficiency cores)
    pub performance_cores: usize,
}

impl SystemProfile {
    /// Auto-detect system capabilities
    pub fn detect() -> Self {
        use sysinfo::System;

        let cpu_cores = num_cpus::get();
        let performance_cores = num_cpus::get_physical();

        let mut system = System::new();
        system.refresh_memory();
        let memory_mb = (system.total_memory() / 1024 / 1024) as usize;

        Self {
            cpu_cores,
            memory_mb,
            performance_cores,
        }
    }

    /// Worker default derived from the physical core count
    pub fn default_workers(&self) -> usize {
        self.performance_cores.clamp(1, MAX_PARALLEL_WORKERS)
    }
}

//! Command implementations for the MLS processor CLI
//!
//! This module contains the main command execution logic, progress reporting,
//! and error handling for the CLI interface. Each command is implemented in
//! its own module for better organization and maintainability.

pub mod process;
pub mod shared;
pub mod sites;
pub mod validate;

// Re-export the report type every command returns
pub use shared::ProcessingReport;

use crate::Result;
use crate::cli::args::{Args, Commands};

/// Main command runner for the MLS processor
///
/// This function dispatches to the appropriate subcommand handler based on
/// CLI args. Each command is implemented in its own module:
/// - `process`: full pipeline producing cells.csv and sites.csv
/// - `sites`: export analysis ranking the busiest estimated sites
/// - `validate`: parse check with no output files
pub async fn run(args: Args) -> Result<ProcessingReport> {
    match args.get_command() {
        Commands::Process(process_args) => process::run_process(process_args).await,
        Commands::Sites(sites_args) => sites::run_sites(sites_args).await,
        Commands::Validate(validate_args) => validate::run_validate(validate_args).await,
    }
}

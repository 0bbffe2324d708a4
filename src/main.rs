use clap::Parser;
use mls_processor::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    // Create async runtime and run the main command logic with signal handling
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        // Set up graceful shutdown handling
        let shutdown_signal = async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to install CTRL+C signal handler");
        };

        tokio::select! {
            result = commands::run(args) => {
                result
            }
            _ = shutdown_signal => {
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err(mls_processor::Error::processing_interrupted(
                    "Processing interrupted by user".to_string(),
                ))
            }
        }
    });

    match result {
        Ok(_report) => {
            // Success - the report has already been printed by the command
            process::exit(0);
        }
        Err(error) => {
            // Error occurred - print to stderr and exit with error code
            eprintln!("Error: {}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("MLS Processor - Cell Export Cleaner and Site Estimator");
    println!("======================================================");
    println!();
    println!("Parse Mozilla Location Service cell export files, filter them to a");
    println!("radio technology and country, and produce a cleaned cells CSV plus");
    println!("per-site position estimates from sample-weighted centroids.");
    println!();
    println!("USAGE:");
    println!("    mls-processor <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    process     Process an export into cells.csv and sites.csv (main command)");
    println!("    sites       Report the busiest estimated sites in an export");
    println!("    validate    Check an export parses cleanly without writing output");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Process the newest export in the current directory:");
    println!("    mls-processor process --yes");
    println!();
    println!("    # Process a specific export with an explicit filter:");
    println!("    mls-processor process MLS-full-cell-export-2024-01-15T000000.csv \\");
    println!("                          --radio LTE --mcc 234 --output-dir ./output");
    println!();
    println!("    # Rank the busiest sites without writing files:");
    println!("    mls-processor sites --limit 10 --format json");
    println!();
    println!("    # Pre-flight check an export directory:");
    println!("    mls-processor validate --export-dir /data/exports --yes");
    println!();
    println!("For detailed help on any command, use:");
    println!("    mls-processor <COMMAND> --help");
}

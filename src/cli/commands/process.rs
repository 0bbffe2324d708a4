//! Process command implementation
//!
//! Runs the full pipeline: resolve an export file, parse and filter it,
//! aggregate site position estimates, and write the cleaned cells CSV and
//! the site estimates CSV.

use colored::Colorize;
use indicatif::HumanDuration;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::Result;
use crate::app::services::cell_csv_parser::CellCsvParser;
use crate::app::services::export_writer::{
    CellsCsvWriter, EstimateSink, ObservationSink, SitesCsvWriter, WritingStats,
};
use crate::app::services::site_aggregator::SiteAggregator;
use crate::cli::args::{OutputFormat, ProcessArgs};
use crate::cli::commands::shared::{
    ProcessingReport, check_radio_filter, create_progress_bar, estimate_record_count,
    initialize_command, resolve_export_file,
};
use crate::config::{Config, SystemProfile};
use crate::constants::PARSE_SUCCESS_THRESHOLD;

/// Execute the process command
pub async fn run_process(args: ProcessArgs) -> Result<ProcessingReport> {
    let start_time = Instant::now();

    args.validate()?;

    let mut config = initialize_command(
        args.config_file.as_deref(),
        args.explicit_log_level(),
        args.quiet,
    )?;

    info!("Starting MLS export processing");
    debug!("Command line arguments: {:?}", args);

    if let Some(export_dir) = &args.export_dir {
        config = config.with_export_dir(export_dir.clone());
    }
    if let Some(output_dir) = &args.output_dir {
        config = config.with_output_dir(output_dir.clone());
    }
    if let Some(radio) = &args.radio {
        config = config.with_radio(radio.clone());
    }
    if let Some(mcc) = args.mcc {
        config = config.with_mcc(mcc);
    }
    if let Some(workers) = args.workers {
        config = config.with_workers(workers);
    }
    if let Some(precision) = args.precision {
        config = config.with_coordinate_precision(precision);
    }
    config.validate()?;
    check_radio_filter(&config);
    debug!("Effective configuration: {:?}", config);

    // Quiet runs must not block on stdin
    let export_file = resolve_export_file(
        &config,
        args.export_file.as_deref(),
        args.assume_yes || args.quiet,
    )?;

    if args.dry_run {
        return run_dry_run(&config, &export_file, start_time);
    }

    config.ensure_output_directory()?;

    let profile = SystemProfile::detect();
    let workers = config.effective_workers(&profile);
    debug!(
        "System profile: {} cores ({} physical), {} MB memory",
        profile.cpu_cores, profile.performance_cores, profile.memory_mb
    );
    info!("Using {} parse workers", workers);

    // Parse and filter the export
    let parser = CellCsvParser::new(config.record_filter())
        .with_workers(workers)
        .with_chunk_size(config.performance.chunk_size);

    let progress = args
        .show_progress()
        .then(|| create_progress_bar(estimate_record_count(&export_file), "Parsing export"));

    let parse_result = parser
        .parse_file_with_progress(&export_file, progress.as_ref())
        .await?;

    if let Some(pb) = &progress {
        pb.finish_with_message(format!(
            "Parsed {} observations from {} records",
            parse_result.stats.observations_parsed, parse_result.stats.total_records
        ));
    }

    if !parse_result.stats.is_successful() {
        warn!(
            "Parse success rate {:.1}% is below the {:.0}% threshold, continuing with {} observations",
            parse_result.stats.success_rate(),
            PARSE_SUCCESS_THRESHOLD,
            parse_result.observations.len()
        );
    }

    // Aggregate site position estimates
    let aggregation = SiteAggregator::new()
        .aggregate_observations(&parse_result.observations, args.show_progress());
    info!("{}", aggregation.summary());

    // Write output files
    let cells_path = config.cells_output_path();
    info!("Writing cleaned cells to {}", cells_path.display());
    let mut cells_writer = CellsCsvWriter::new(&cells_path, config.writer_config())?;
    let cells_written = cells_writer.write_observations(&parse_result.observations)?;

    let sites_path = config.sites_output_path();
    info!("Writing site estimates to {}", sites_path.display());
    let mut sites_writer = SitesCsvWriter::new(&sites_path, config.writer_config())?;
    let sites_written = sites_writer.write_estimates(&aggregation.sites)?;

    let report = ProcessingReport {
        export_file: Some(export_file),
        parse: parse_result.stats,
        aggregation: aggregation.stats,
        cells_written,
        sites_written,
        output_sizes: vec![
            (
                cells_path.display().to_string(),
                cells_writer.stats().bytes_written as u64,
            ),
            (
                sites_path.display().to_string(),
                sites_writer.stats().bytes_written as u64,
            ),
        ],
        processing_time: start_time.elapsed(),
    };

    generate_final_report(&args, &report)?;

    Ok(report)
}

/// Show the processing plan without touching the filesystem
fn run_dry_run(
    config: &Config,
    export_file: &Path,
    start_time: Instant,
) -> Result<ProcessingReport> {
    info!("Performing dry run, no files will be written");

    let profile = SystemProfile::detect();
    let workers = config.effective_workers(&profile);

    let radio_label = if config.filter.radio.is_empty() {
        "any".to_string()
    } else {
        config.filter.radio.clone()
    };
    let mcc_label = if config.filter.mcc == 0 {
        "any".to_string()
    } else {
        config.filter.mcc.to_string()
    };

    println!("\n{}", "Dry Run Plan".bright_green().bold());
    println!(
        "  {} {}",
        "Export file:".bright_cyan(),
        export_file.display()
    );
    println!(
        "  {} ~{}",
        "Estimated records:".bright_cyan(),
        estimate_record_count(export_file)
    );
    println!("  {} {}", "Radio filter:".bright_cyan(), radio_label);
    println!("  {} {}", "Country filter:".bright_cyan(), mcc_label);
    println!("  {} {}", "Parse workers:".bright_cyan(), workers);
    println!(
        "  {} {}",
        "Would write:".bright_cyan(),
        config.cells_output_path().display()
    );
    println!(
        "  {} {}",
        "Would write:".bright_cyan(),
        config.sites_output_path().display()
    );
    println!();

    Ok(ProcessingReport {
        export_file: Some(export_file.to_path_buf()),
        processing_time: start_time.elapsed(),
        ..Default::default()
    })
}

/// Generate final processing report
fn generate_final_report(args: &ProcessArgs, report: &ProcessingReport) -> Result<()> {
    info!("Generating final report");

    match args.format {
        OutputFormat::Human => generate_human_report(report),
        OutputFormat::Json => generate_json_report(report),
        OutputFormat::Csv => generate_csv_report(report),
    }
}

/// Generate human-readable report
fn generate_human_report(report: &ProcessingReport) -> Result<()> {
    let duration = HumanDuration(report.processing_time);

    println!("\n{}", "Processing Summary".bright_green().bold());
    if let Some(path) = &report.export_file {
        println!("  {} {}", "Export file:".bright_cyan(), path.display());
    }
    println!(
        "  {} {}",
        "Records read:".bright_cyan(),
        report.parse.total_records.to_string().bright_white().bold()
    );
    println!(
        "  {} {}",
        "Records filtered:".bright_cyan(),
        report.parse.records_filtered.to_string().bright_white()
    );
    println!(
        "  {} {} ({:.1}% of candidates)",
        "Observations parsed:".bright_cyan(),
        report
            .parse
            .observations_parsed
            .to_string()
            .bright_white()
            .bold(),
        report.parse.success_rate()
    );
    if report.parse.records_skipped > 0 {
        println!(
            "  {} {}",
            "Records skipped:".bright_red(),
            report.parse.records_skipped.to_string().bright_red().bold()
        );
    }
    if report.aggregation.zero_sample_excluded > 0 {
        println!(
            "  {} {}",
            "Zero-sample observations:".bright_yellow(),
            report
                .aggregation
                .zero_sample_excluded
                .to_string()
                .bright_white()
        );
    }
    println!(
        "  {} {}",
        "Sites estimated:".bright_cyan(),
        report
            .aggregation
            .sites_estimated
            .to_string()
            .bright_white()
            .bold()
    );
    if report.aggregation.degenerate_count() > 0 {
        println!(
            "  {} {}",
            "Fallback estimates:".bright_yellow(),
            report
                .aggregation
                .degenerate_count()
                .to_string()
                .bright_white()
        );
    }
    println!(
        "  {} {}",
        "Processing time:".bright_cyan(),
        duration.to_string().bright_white()
    );

    if !report.output_sizes.is_empty() {
        println!("\n{}", "Output Files".bright_green().bold());
        for (path, size) in &report.output_sizes {
            println!(
                "  {} {} {}",
                "Wrote".bright_green(),
                path.bright_cyan(),
                format!("({})", WritingStats::format_bytes(*size as usize)).bright_black()
            );
        }
    }

    println!();
    Ok(())
}

/// Generate JSON report for machine consumption
fn generate_json_report(report: &ProcessingReport) -> Result<()> {
    let json_report = serde_json::json!({
        "export_file": report.export_file.as_ref().map(|path| path.display().to_string()),
        "parse": report.parse,
        "aggregation": report.aggregation,
        "cells_written": report.cells_written,
        "sites_written": report.sites_written,
        "processing_time_seconds": report.processing_time.as_secs_f64(),
        "total_output_size_bytes": report.total_output_size(),
        "output_files": report.output_sizes.iter().map(|(name, size)| {
            serde_json::json!({
                "path": name,
                "size_bytes": size
            })
        }).collect::<Vec<_>>()
    });

    println!("{}", serde_json::to_string_pretty(&json_report).unwrap());
    Ok(())
}

/// Generate CSV report of metric,value rows
fn generate_csv_report(report: &ProcessingReport) -> Result<()> {
    println!("metric,value");
    println!("records_read,{}", report.parse.total_records);
    println!("records_filtered,{}", report.parse.records_filtered);
    println!("observations_parsed,{}", report.parse.observations_parsed);
    println!("records_skipped,{}", report.parse.records_skipped);
    println!(
        "parse_success_rate_percent,{:.2}",
        report.parse.success_rate()
    );
    println!(
        "observations_weighted,{}",
        report.aggregation.observations_weighted
    );
    println!(
        "zero_sample_excluded,{}",
        report.aggregation.zero_sample_excluded
    );
    println!("sites_estimated,{}", report.aggregation.sites_estimated);
    println!(
        "fallback_estimates,{}",
        report.aggregation.degenerate_count()
    );
    println!("cells_written,{}", report.cells_written);
    println!("sites_written,{}", report.sites_written);
    println!(
        "processing_time_seconds,{:.2}",
        report.processing_time.as_secs_f64()
    );
    println!("total_output_size_bytes,{}", report.total_output_size());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::services::cell_csv_parser::ParseStats;
    use crate::app::services::site_aggregator::AggregationStats;
    use std::time::Duration;
    use tempfile::TempDir;

    fn sample_report() -> ProcessingReport {
        let mut parse = ParseStats::new();
        parse.total_records = 1000;
        parse.records_filtered = 400;
        parse.observations_parsed = 590;
        parse.records_skipped = 10;
        parse.errors.push("row 17: bad longitude".to_string());

        let mut aggregation = AggregationStats::new();
        aggregation.total_observations = 590;
        aggregation.observations_weighted = 580;
        aggregation.zero_sample_excluded = 10;
        aggregation.sites_estimated = 42;
        aggregation.degenerate_sites.push("234-1-7".to_string());

        ProcessingReport {
            export_file: Some("/data/export.csv".into()),
            parse,
            aggregation,
            cells_written: 590,
            sites_written: 42,
            output_sizes: vec![
                ("output/cells.csv".to_string(), 40_000),
                ("output/sites.csv".to_string(), 1_500),
            ],
            processing_time: Duration::from_secs(3),
        }
    }

    #[test]
    fn dry_run_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let export = temp_dir
            .path()
            .join("MLS-full-cell-export-2024-01-15T000000.csv");
        std::fs::write(&export, "radio,mcc,net\nLTE,234,10\n").unwrap();

        let output_dir = temp_dir.path().join("output");
        let config = Config::default()
            .with_export_dir(temp_dir.path())
            .with_output_dir(&output_dir);

        let report = run_dry_run(&config, &export, Instant::now()).unwrap();

        assert_eq!(report.export_file.as_deref(), Some(export.as_path()));
        assert_eq!(report.cells_written, 0);
        assert!(!output_dir.exists());
    }

    #[test]
    fn human_report_handles_populated_stats() {
        let report = sample_report();
        assert!(generate_human_report(&report).is_ok());
    }

    #[test]
    fn json_report_handles_populated_stats() {
        let report = sample_report();
        assert!(generate_json_report(&report).is_ok());
    }

    #[test]
    fn csv_report_handles_populated_stats() {
        let report = sample_report();
        assert!(generate_csv_report(&report).is_ok());
    }

    #[test]
    fn empty_report_renders_without_output_section() {
        let report = ProcessingReport::default();
        assert!(generate_human_report(&report).is_ok());
    }
}

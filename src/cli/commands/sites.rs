//! Sites command implementation
//!
//! Parses an export, runs site aggregation, and reports the busiest
//! estimated sites without writing any output files.

use colored::Colorize;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, info};

use crate::Result;
use crate::app::models::{CellObservation, EstimatedSite, SiteKey};
use crate::app::services::cell_csv_parser::CellCsvParser;
use crate::app::services::site_aggregator::{AggregationResult, SiteAggregator};
use crate::cli::args::{OutputFormat, SitesArgs};
use crate::cli::commands::shared::{
    ProcessingReport, check_radio_filter, create_progress_bar, estimate_record_count,
    initialize_command, resolve_export_file,
};
use crate::config::SystemProfile;

/// One row of the site ranking table
struct SiteRanking {
    site: EstimatedSite,
    observations: usize,
    total_samples: u64,
}

/// Execute the sites command
pub async fn run_sites(args: SitesArgs) -> Result<ProcessingReport> {
    let start_time = Instant::now();

    args.validate()?;

    let mut config =
        initialize_command(args.config_file.as_deref(), args.explicit_log_level(), false)?;

    info!("Starting site analysis");
    debug!("Command line arguments: {:?}", args);

    if let Some(export_dir) = &args.export_dir {
        config = config.with_export_dir(export_dir.clone());
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
    config.validate()?;
    check_radio_filter(&config);

    let export_file = resolve_export_file(&config, args.export_file.as_deref(), args.assume_yes)?;

    let profile = SystemProfile::detect();
    let workers = config.effective_workers(&profile);

    let parser = CellCsvParser::new(config.record_filter())
        .with_workers(workers)
        .with_chunk_size(config.performance.chunk_size);

    let progress = create_progress_bar(estimate_record_count(&export_file), "Parsing export");
    let parse_result = parser
        .parse_file_with_progress(&export_file, Some(&progress))
        .await?;
    progress.finish_with_message(format!(
        "Parsed {} observations from {} records",
        parse_result.stats.observations_parsed, parse_result.stats.total_records
    ));

    let aggregation = SiteAggregator::new().aggregate_observations(&parse_result.observations, true);
    info!("{}", aggregation.summary());

    let rankings = rank_sites(&parse_result.observations, &aggregation, args.limit);

    match args.format {
        OutputFormat::Human => generate_human_site_report(&rankings, &aggregation)?,
        OutputFormat::Json => generate_json_site_report(&rankings, &aggregation)?,
        // Rejected by argument validation
        OutputFormat::Csv => unreachable!("csv format is rejected for the site report"),
    }

    Ok(ProcessingReport {
        export_file: Some(export_file),
        parse: parse_result.stats,
        aggregation: aggregation.stats,
        processing_time: start_time.elapsed(),
        ..Default::default()
    })
}

/// Rank estimated sites by constituent observation count
///
/// Ties are broken by key order so repeated runs list sites identically.
fn rank_sites(
    observations: &[CellObservation],
    aggregation: &AggregationResult,
    limit: usize,
) -> Vec<SiteRanking> {
    let mut tallies: HashMap<SiteKey, (usize, u64)> = HashMap::new();
    for observation in observations {
        let tally = tallies.entry(observation.site_key()).or_default();
        tally.0 += 1;
        tally.1 += observation.samples as u64;
    }

    let mut rankings: Vec<SiteRanking> = aggregation
        .sites
        .iter()
        .map(|(key, site)| {
            let (observations, total_samples) = tallies.get(key).copied().unwrap_or((0, 0));
            SiteRanking {
                site: *site,
                observations,
                total_samples,
            }
        })
        .collect();

    rankings.sort_by(|a, b| {
        b.observations
            .cmp(&a.observations)
            .then_with(|| a.site.key().cmp(&b.site.key()))
    });
    rankings.truncate(limit);
    rankings
}

/// Render the ranking table for terminal use
fn generate_human_site_report(
    rankings: &[SiteRanking],
    aggregation: &AggregationResult,
) -> Result<()> {
    println!("\n{}", "Site Estimates".bright_green().bold());
    println!(
        "  {} {}",
        "Sites estimated:".bright_cyan(),
        aggregation.site_count().to_string().bright_white().bold()
    );
    println!(
        "  {} {}",
        "Observations:".bright_cyan(),
        aggregation
            .stats
            .total_observations
            .to_string()
            .bright_white()
    );
    if aggregation.stats.degenerate_count() > 0 {
        println!(
            "  {} {}",
            "Fallback estimates:".bright_yellow(),
            aggregation
                .stats
                .degenerate_count()
                .to_string()
                .bright_white()
        );
    }
    println!();

    if rankings.is_empty() {
        println!("No sites were estimated from this export.");
        return Ok(());
    }

    println!(
        "{}",
        format!("Top {} sites by observation count:", rankings.len())
            .bright_white()
            .bold()
    );
    println!(
        "  {:>4} {:>4} {:>9} {:>6} {:>9} {:>12} {:>11}",
        "MCC", "MNC", "Site", "Cells", "Samples", "Lon", "Lat"
    );
    for ranking in rankings {
        println!(
            "  {:>4} {:>4} {:>9} {:>6} {:>9} {:>12.6} {:>11.6}",
            ranking.site.mcc,
            ranking.site.mnc,
            ranking.site.site_id,
            ranking.observations,
            ranking.total_samples,
            ranking.site.lon,
            ranking.site.lat
        );
    }
    println!();

    Ok(())
}

/// Render the ranking as JSON for machine consumption
fn generate_json_site_report(
    rankings: &[SiteRanking],
    aggregation: &AggregationResult,
) -> Result<()> {
    let json_sites: Vec<_> = rankings
        .iter()
        .map(|ranking| {
            serde_json::json!({
                "mcc": ranking.site.mcc,
                "mnc": ranking.site.mnc,
                "site_id": ranking.site.site_id,
                "observations": ranking.observations,
                "total_samples": ranking.total_samples,
                "position": {
                    "lon": ranking.site.lon,
                    "lat": ranking.site.lat,
                },
            })
        })
        .collect();

    let json_report = serde_json::json!({
        "sites_estimated": aggregation.site_count(),
        "stats": aggregation.stats,
        "top_sites": json_sites,
    });

    println!("{}", serde_json::to_string_pretty(&json_report).unwrap());
    Ok(())
}

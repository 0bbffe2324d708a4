//! User input utilities for interactive CLI prompts
//!
//! This module provides functions for interactive user input, including
//! the export file selection menu and confirmation prompts.

use colored::Colorize;
use std::io::{self, Write};

use crate::app::services::export_scanner::ExportFileInfo;
use crate::app::services::export_writer::WritingStats;
use crate::{Error, Result};

/// Display an interactive export selection menu and get the user's choice
///
/// Files are listed newest first and an empty answer takes the newest.
pub fn prompt_export_selection(files: &[ExportFileInfo]) -> Result<ExportFileInfo> {
    if files.is_empty() {
        return Err(Error::configuration(
            "No export files available for selection".to_string(),
        ));
    }

    println!("\n{}", "Available export files:".bright_green().bold());
    for (i, file) in files.iter().enumerate() {
        println!(
            "  {}. {} {}",
            (i + 1).to_string().bright_yellow().bold(),
            file.filename().bright_cyan(),
            format!(
                "({}, {})",
                file.vintage_label(),
                WritingStats::format_bytes(file.size_bytes as usize)
            )
            .bright_black()
        );
    }
    println!();

    print!("{}", "Select export to process [1]: ".bright_white());
    io::stdout()
        .flush()
        .map_err(|e| Error::io("Failed to flush stdout".to_string(), e))?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|e| Error::io("Failed to read user input".to_string(), e))?;

    let input = input.trim();

    // Empty input defaults to the newest export
    if input.is_empty() {
        return Ok(files[0].clone());
    }

    match input.parse::<usize>() {
        Ok(choice) if choice >= 1 && choice <= files.len() => Ok(files[choice - 1].clone()),
        _ => Err(Error::data_validation(format!(
            "Invalid selection '{}'. Please choose 1-{}",
            input,
            files.len()
        ))),
    }
}

/// Get user confirmation for an action
pub fn prompt_confirmation(message: &str, default_yes: bool) -> Result<bool> {
    let default_text = if default_yes { "Y/n" } else { "y/N" };
    print!("{} [{}]: ", message.bright_white(), default_text);

    io::stdout()
        .flush()
        .map_err(|e| Error::io("Failed to flush stdout".to_string(), e))?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|e| Error::io("Failed to read user input".to_string(), e))?;

    let input = input.trim().to_lowercase();

    if input.is_empty() {
        return Ok(default_yes);
    }

    match input.as_str() {
        "y" | "yes" => Ok(true),
        "n" | "no" => Ok(false),
        _ => {
            println!("Please enter 'y' for yes or 'n' for no.");
            prompt_confirmation(message, default_yes)
        }
    }
}

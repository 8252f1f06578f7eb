//! CLI command implementations

pub mod inspect;
pub mod json_output;
pub mod roundtrip;
pub mod verify;

use anyhow::{Context, Result};
use colored::Colorize;
use msgit_embed_format::{from_bytes, EmbeddingCollection, VerifyReport};
use std::fs;
use std::path::Path;

use json_output::{error_codes, JsonError};

/// Read a container file and decode it.
fn load_collection(path: &Path) -> Result<(Vec<u8>, EmbeddingCollection)> {
    let data =
        fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    let records =
        from_bytes(&data).with_context(|| format!("Failed to decode: {}", path.display()))?;
    Ok((data, records))
}

/// Read a container file and decode it, reporting failures as JSON errors.
fn load_collection_json(path: &Path) -> Result<(Vec<u8>, EmbeddingCollection), JsonError> {
    let file = path.display().to_string();
    let data = fs::read(path).map_err(|e| {
        JsonError::new(
            error_codes::FILE_READ,
            format!("Failed to read file: {}", e),
        )
        .with_file(file.as_str())
    })?;
    let records =
        from_bytes(&data).map_err(|e| JsonError::from_format_error(&e).with_file(file.as_str()))?;
    Ok((data, records))
}

/// Print a verification report to the console.
fn print_report(report: &VerifyReport) {
    println!("\n{}", "Results:".bold());

    if report.length_mismatch() {
        println!(
            "  {} different lengths: {} vs {}",
            "FAIL".red(),
            report.left_len,
            report.right_len
        );
    }
    for discrepancy in &report.discrepancies {
        println!("  {} {}", "FAIL".red(), discrepancy);
    }

    if report.is_match() {
        println!(
            "\n{} {} record(s) identical",
            "PASSED".green().bold(),
            report.left_len
        );
    } else {
        println!(
            "\n{} {} discrepancies",
            "FAILED".red().bold(),
            report.discrepancies.len() + usize::from(report.length_mismatch())
        );
    }
}

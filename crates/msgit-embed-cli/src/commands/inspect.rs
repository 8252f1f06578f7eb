//! Inspect command implementation
//!
//! Prints the container header and a summary of the first record. Files with
//! a newer version than this build supports still show their header.

use anyhow::{Context, Result};
use colored::Colorize;
use msgit_embed_format::{content_hash, from_bytes, ContainerHeader, FORMAT_VERSION};
use std::fs;
use std::path::Path;
use std::process::ExitCode;

use super::json_output::{error_codes, CommandOutput, InspectResult, JsonError};

/// Run the inspect command
///
/// # Arguments
/// * `input` - Path to the container file
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 if the file decodes, 1 otherwise
pub fn run(input: &str, json_output: bool) -> Result<ExitCode> {
    if json_output {
        run_json(input)
    } else {
        run_human(input)
    }
}

/// Run inspect with human-readable (colored) output
fn run_human(input: &str) -> Result<ExitCode> {
    let path = Path::new(input);
    let data = fs::read(path).with_context(|| format!("Failed to read file: {}", input))?;
    let header = ContainerHeader::parse(&data)
        .with_context(|| format!("Failed to parse header: {}", input))?;

    println!("{} {}", "File:".cyan().bold(), input);
    println!("{} {} bytes", "Size:".dimmed(), data.len());
    println!("{} {}", "Hash:".dimmed(), &content_hash(&data)[..16]);
    println!("{} {}", "Version:".dimmed(), header.version);
    println!("{} {}", "Records:".dimmed(), header.record_count);

    if let Err(e) = header.ensure_supported() {
        println!("\n{} {}", "UNSUPPORTED".yellow().bold(), e);
        return Ok(ExitCode::from(1));
    }

    let records = from_bytes(&data).with_context(|| format!("Failed to decode: {}", input))?;
    match records.first() {
        Some(first) => {
            println!("{} {}", "Width:".dimmed(), first.embedding.width);
            println!("{} {:?}", "Shape:".dimmed(), first.embedding.shape);
        }
        None => println!("{} (no records)", "Shape:".dimmed()),
    }

    println!("\n{} {} record(s) decoded", "OK".green().bold(), records.len());
    Ok(ExitCode::SUCCESS)
}

/// Run inspect with machine-readable JSON output
fn run_json(input: &str) -> Result<ExitCode> {
    match inspect_json(input) {
        Ok((result, errors)) => {
            let success = errors.is_empty();
            let mut output = CommandOutput::with_result(success, result);
            output.errors = errors;
            output.print();
            Ok(if success {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }
        Err(error) => {
            CommandOutput::<InspectResult>::failure(vec![error]).print();
            Ok(ExitCode::from(1))
        }
    }
}

/// Header-level failures abort; decode failures are reported next to the
/// header that was read.
fn inspect_json(input: &str) -> Result<(InspectResult, Vec<JsonError>), JsonError> {
    let data = fs::read(input).map_err(|e| {
        JsonError::new(
            error_codes::FILE_READ,
            format!("Failed to read file: {}", e),
        )
        .with_file(input)
    })?;
    let header = ContainerHeader::parse(&data)
        .map_err(|e| JsonError::from_format_error(&e).with_file(input))?;

    let mut result = InspectResult {
        file: input.to_string(),
        size_bytes: data.len(),
        version: header.version,
        version_supported: header.version <= FORMAT_VERSION,
        record_count: header.record_count,
        first_width: None,
        first_shape: None,
        hash: content_hash(&data),
    };

    let mut errors = Vec::new();
    match from_bytes(&data) {
        Ok(records) => {
            if let Some(first) = records.first() {
                result.first_width = Some(first.embedding.width);
                result.first_shape = Some(first.embedding.shape.clone());
            }
        }
        Err(e) => errors.push(JsonError::from_format_error(&e).with_file(input)),
    }

    Ok((result, errors))
}

//! Verify command implementation
//!
//! Decodes two container files and lists every field-level difference between
//! them.

use anyhow::Result;
use colored::Colorize;
use msgit_embed_format::{compare_collections, VerifyReport};
use std::path::Path;
use std::process::ExitCode;

use super::json_output::{CommandOutput, JsonError};
use super::{load_collection, load_collection_json, print_report};

/// Run the verify command
///
/// # Arguments
/// * `path_a` - Path to the reference file
/// * `path_b` - Path to the file compared against it
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 if both collections match, 1 otherwise
pub fn run(path_a: &str, path_b: &str, json_output: bool) -> Result<ExitCode> {
    if json_output {
        run_json(path_a, path_b)
    } else {
        run_human(path_a, path_b)
    }
}

/// Run verify with human-readable (colored) output
fn run_human(path_a: &str, path_b: &str) -> Result<ExitCode> {
    println!("{}", "Comparing files:".cyan().bold());
    println!("  {} {}", "A:".dimmed(), path_a);
    println!("  {} {}", "B:".dimmed(), path_b);

    let (_, records_a) = load_collection(Path::new(path_a))?;
    let (_, records_b) = load_collection(Path::new(path_b))?;

    let report = compare_collections(&records_a, &records_b);
    print_report(&report);

    if report.is_match() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

/// Run verify with machine-readable JSON output
fn run_json(path_a: &str, path_b: &str) -> Result<ExitCode> {
    match verify_json(path_a, path_b) {
        Ok(report) => {
            let success = report.is_match();
            CommandOutput::with_result(success, report).print();
            Ok(if success {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }
        Err(errors) => {
            CommandOutput::<VerifyReport>::failure(errors).print();
            Ok(ExitCode::from(1))
        }
    }
}

/// Both files are loaded even if the first fails, so all load errors are
/// reported together.
fn verify_json(path_a: &str, path_b: &str) -> Result<VerifyReport, Vec<JsonError>> {
    let a = load_collection_json(Path::new(path_a));
    let b = load_collection_json(Path::new(path_b));

    match (a, b) {
        (Ok((_, records_a)), Ok((_, records_b))) => {
            Ok(compare_collections(&records_a, &records_b))
        }
        (a, b) => Err(a.err().into_iter().chain(b.err()).collect()),
    }
}

//! Roundtrip command implementation
//!
//! Decodes a container file, re-encodes it under an output directory, decodes
//! the result again and verifies it against the original collection.

use anyhow::{Context, Result};
use colored::Colorize;
use msgit_embed_format::{compare_collections, content_hash, to_bytes};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use super::json_output::{error_codes, CommandOutput, JsonError, RoundtripResult};
use super::{load_collection, load_collection_json, print_report};

/// Default directory for re-encoded files.
pub const DEFAULT_OUT_DIR: &str = "embeddings";

/// Default extension for re-encoded files.
pub const DEFAULT_EXTENSION: &str = "ge";

/// Build the output path: the input's file name without its last extension,
/// placed under `out_dir` with `extension`.
pub fn derive_output_path(input: &Path, out_dir: &Path, extension: &str) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .ok_or_else(|| anyhow::anyhow!("Input path has no file name: {}", input.display()))?;
    let mut name = stem.to_os_string();
    name.push(".");
    name.push(extension);
    Ok(out_dir.join(name))
}

/// Run the roundtrip command
///
/// # Arguments
/// * `input` - Path to the container file to round-trip
/// * `out_dir` - Directory the re-encoded file is written to
/// * `extension` - Extension of the re-encoded file
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 if the re-decoded collection matches, 1 otherwise
pub fn run(input: &str, out_dir: &str, extension: &str, json_output: bool) -> Result<ExitCode> {
    if json_output {
        run_json(input, out_dir, extension)
    } else {
        run_human(input, out_dir, extension)
    }
}

/// Write encoded bytes to `path`, creating its parent directory.
///
/// Callers encode the whole collection before calling this, so an encode
/// failure never leaves a partial file behind.
fn write_encoded(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("Failed to write file: {}", path.display()))
}

/// Run roundtrip with human-readable (colored) output
fn run_human(input: &str, out_dir: &str, extension: &str) -> Result<ExitCode> {
    let input_path = Path::new(input);
    let output_path = derive_output_path(input_path, Path::new(out_dir), extension)?;

    println!("{} {}", "Deserializing".cyan().bold(), input_path.display());
    let (input_bytes, records) = load_collection(input_path)?;

    println!("{} {}", "Serializing".cyan().bold(), output_path.display());
    let output_bytes = to_bytes(&records)
        .with_context(|| format!("Failed to encode: {}", output_path.display()))?;
    write_encoded(&output_path, &output_bytes)?;

    println!("{} {}", "Deserializing".cyan().bold(), output_path.display());
    let (_, decoded) = load_collection(&output_path)?;

    let report = compare_collections(&records, &decoded);
    print_report(&report);

    if input_bytes == output_bytes {
        println!("{}", "Output is byte-identical to input".dimmed());
    } else {
        println!(
            "{} {} -> {}",
            "Hash:".dimmed(),
            &content_hash(&input_bytes)[..16],
            &content_hash(&output_bytes)[..16]
        );
    }

    println!("{} {}", "length:".dimmed(), records.len());
    match records.first() {
        Some(first) => println!("{} {:?}", "shape:".dimmed(), first.embedding.shape),
        None => println!("{} (no records)", "shape:".dimmed()),
    }

    if report.is_match() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

/// Run roundtrip with machine-readable JSON output
fn run_json(input: &str, out_dir: &str, extension: &str) -> Result<ExitCode> {
    match roundtrip_json(input, out_dir, extension) {
        Ok(result) => {
            let success = result.report.is_match();
            CommandOutput::with_result(success, result).print();
            Ok(if success {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }
        Err(error) => {
            CommandOutput::<RoundtripResult>::failure(vec![error]).print();
            Ok(ExitCode::from(1))
        }
    }
}

fn roundtrip_json(
    input: &str,
    out_dir: &str,
    extension: &str,
) -> Result<RoundtripResult, JsonError> {
    let input_path = Path::new(input);
    let output_path = derive_output_path(input_path, Path::new(out_dir), extension)
        .map_err(|e| JsonError::new(error_codes::OUTPUT_PATH, e.to_string()).with_file(input))?;
    let output = output_path.display().to_string();

    let (input_bytes, records) = load_collection_json(input_path)?;

    let output_bytes = to_bytes(&records)
        .map_err(|e| JsonError::from_format_error(&e).with_file(output.as_str()))?;
    write_encoded(&output_path, &output_bytes).map_err(|e| {
        JsonError::new(error_codes::FILE_WRITE, format!("{:#}", e)).with_file(output.as_str())
    })?;

    let (_, decoded) = load_collection_json(&output_path)?;
    let report = compare_collections(&records, &decoded);

    Ok(RoundtripResult {
        input: input.to_string(),
        output,
        record_count: records.len(),
        first_shape: records.first().map(|r| r.embedding.shape.clone()),
        input_hash: content_hash(&input_bytes),
        output_hash: content_hash(&output_bytes),
        byte_identical: input_bytes == output_bytes,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use msgit_embed_format::{EmbeddingRecord, NumericArray};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn sample_bytes() -> Vec<u8> {
        let embedding =
            NumericArray::from_f32(vec![2, 3], &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        to_bytes(&[EmbeddingRecord::new(
            "a.jpg",
            "a cat",
            embedding,
            vec![4.5, 5.0],
        )])
        .unwrap()
    }

    #[test]
    fn test_derive_output_path() {
        let path = derive_output_path(
            Path::new("data/run.v2.bin"),
            Path::new("embeddings"),
            "ge",
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("embeddings/run.v2.ge"));
    }

    #[test]
    fn test_derive_output_path_without_extension() {
        let path = derive_output_path(Path::new("raw"), Path::new("out"), "ge").unwrap();
        assert_eq!(path, PathBuf::from("out/raw.ge"));
    }

    #[test]
    fn test_derive_output_path_rejects_empty() {
        assert!(derive_output_path(Path::new(".."), Path::new("out"), "ge").is_err());
    }

    #[test]
    fn test_roundtrip_writes_identical_file() {
        let tmp = tempdir().unwrap();
        let input = tmp.path().join("sample.bin");
        fs::write(&input, sample_bytes()).unwrap();
        let out_dir = tmp.path().join("embeddings");

        let code = run(
            input.to_str().unwrap(),
            out_dir.to_str().unwrap(),
            DEFAULT_EXTENSION,
            false,
        )
        .unwrap();
        assert_eq!(code, ExitCode::SUCCESS);

        let written = fs::read(out_dir.join("sample.ge")).unwrap();
        assert_eq!(written, sample_bytes());
    }

    #[test]
    fn test_roundtrip_json_success() {
        let tmp = tempdir().unwrap();
        let input = tmp.path().join("sample.bin");
        fs::write(&input, sample_bytes()).unwrap();
        let out_dir = tmp.path().join("out");

        let result = roundtrip_json(
            input.to_str().unwrap(),
            out_dir.to_str().unwrap(),
            "ge",
        )
        .unwrap();
        assert_eq!(result.record_count, 1);
        assert_eq!(result.first_shape, Some(vec![2, 3]));
        assert!(result.byte_identical);
        assert!(result.report.is_match());
    }

    #[test]
    fn test_roundtrip_bad_magic_fails() {
        let tmp = tempdir().unwrap();
        let input = tmp.path().join("bad.bin");
        let mut bytes = sample_bytes();
        bytes[..8].copy_from_slice(b"NOTMAGIC");
        fs::write(&input, bytes).unwrap();
        let out_dir = tmp.path().join("out");

        let err = run(
            input.to_str().unwrap(),
            out_dir.to_str().unwrap(),
            "ge",
            false,
        )
        .unwrap_err();
        assert!(format!("{:#}", err).contains("invalid magic"));
        assert!(!out_dir.join("bad.ge").exists());

        let json_err =
            roundtrip_json(input.to_str().unwrap(), out_dir.to_str().unwrap(), "ge").unwrap_err();
        assert_eq!(json_err.code, "F001");
    }

    #[test]
    fn test_roundtrip_missing_input() {
        let tmp = tempdir().unwrap();
        let input = tmp.path().join("missing.bin");

        let code = run(input.to_str().unwrap(), "unused", "ge", true).unwrap();
        assert_eq!(code, ExitCode::from(1));
    }
}

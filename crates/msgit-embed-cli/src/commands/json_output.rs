//! JSON output types for machine-readable CLI output.
//!
//! Every command accepts `--json`; the printed document is a
//! [`CommandOutput`] whose `result` payload depends on the command.

use msgit_embed_format::{FormatError, VerifyReport};
use serde::{Deserialize, Serialize};

/// Error codes for CLI operations.
///
/// Decode and encode failures pass through the format's own codes
/// (`F001`..); these cover everything around them.
pub mod error_codes {
    /// File could not be read
    pub const FILE_READ: &str = "CLI_001";
    /// File could not be written
    pub const FILE_WRITE: &str = "CLI_002";
    /// Output path could not be derived from the input path
    pub const OUTPUT_PATH: &str = "CLI_003";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_001", "F003")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Error category for format errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Index of the record being processed (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<usize>,
    /// Source file path (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl JsonError {
    /// Creates a new error with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            category: None,
            record: None,
            file: None,
        }
    }

    /// Creates an error from a format error, keeping its code and category.
    pub fn from_format_error(error: &FormatError) -> Self {
        Self {
            code: error.code().to_string(),
            message: error.to_string(),
            category: Some(error.category().to_string()),
            record: error.record_index(),
            file: None,
        }
    }

    /// Sets the file path for this error.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

/// Top-level JSON document printed by every command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandOutput<T> {
    /// Whether the command succeeded
    pub success: bool,
    /// Errors encountered
    pub errors: Vec<JsonError>,
    /// Command-specific result (absent when an error stopped the command)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
}

impl<T: Serialize> CommandOutput<T> {
    /// Creates an output carrying a result.
    pub fn with_result(success: bool, result: T) -> Self {
        Self {
            success,
            errors: Vec::new(),
            result: Some(result),
        }
    }

    /// Creates a failed output with no result.
    pub fn failure(errors: Vec<JsonError>) -> Self {
        Self {
            success: false,
            errors,
            result: None,
        }
    }

    /// Prints the output as pretty JSON on stdout.
    pub fn print(&self) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("failed to serialize JSON output: {}", e),
        }
    }
}

/// Result of the `roundtrip` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundtripResult {
    /// Input file path
    pub input: String,
    /// Re-encoded output file path
    pub output: String,
    /// Number of records decoded from the input
    pub record_count: usize,
    /// Shape of the first record's embedding
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_shape: Option<Vec<usize>>,
    /// BLAKE3 hash of the input bytes
    pub input_hash: String,
    /// BLAKE3 hash of the output bytes
    pub output_hash: String,
    /// Whether input and output are byte-identical
    pub byte_identical: bool,
    /// Comparison of the original and re-decoded collections
    pub report: VerifyReport,
}

/// Result of the `inspect` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectResult {
    /// Inspected file path
    pub file: String,
    /// File size in bytes
    pub size_bytes: usize,
    /// Stored format version
    pub version: u32,
    /// Whether this build can decode the stored version
    pub version_supported: bool,
    /// Record count from the header
    pub record_count: u64,
    /// Element width of the first record's embedding
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_width: Option<u32>,
    /// Shape of the first record's embedding
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_shape: Option<Vec<usize>>,
    /// BLAKE3 hash of the file
    pub hash: String,
}

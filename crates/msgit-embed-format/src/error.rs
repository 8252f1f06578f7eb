//! Error types for container encoding and decoding.

use std::fmt;

use thiserror::Error;

/// Broad classification of a [`FormatError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Magic token mismatch or a version newer than this decoder.
    Format,
    /// Numeric array element width other than 4 or 8 bytes.
    UnsupportedWidth,
    /// A length, count or dimension that does not fit the remaining input.
    Truncated,
    /// Array payload length that disagrees with its width and shape.
    Shape,
    /// Error raised by the underlying stream.
    Io,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format => write!(f, "format"),
            Self::UnsupportedWidth => write!(f, "unsupported width"),
            Self::Truncated => write!(f, "truncated input"),
            Self::Shape => write!(f, "shape mismatch"),
            Self::Io => write!(f, "io"),
        }
    }
}

/// Error produced while encoding or decoding an embedding container.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The first 8 bytes are not the magic token.
    #[error("invalid magic: expected 'MSGitEmb', got {found:02X?}")]
    InvalidMagic { found: Vec<u8> },

    /// The stored version is newer than this decoder implements.
    #[error("file is version {found}, but this decoder supports up to version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Numeric array element width is not 4 or 8.
    #[error("unsupported element width {width} in field '{field}' (expected 4 or 8)")]
    UnsupportedWidth { field: &'static str, width: u32 },

    /// A field needs more bytes than remain in the buffer.
    #[error(
        "truncated input in field '{field}' at offset {offset}: need {needed} bytes, {remaining} remaining"
    )]
    Truncated {
        field: &'static str,
        offset: usize,
        needed: u64,
        remaining: usize,
    },

    /// A signed length, count or dimension is negative.
    #[error("negative length {value} in field '{field}' at offset {offset}")]
    NegativeLength {
        field: &'static str,
        offset: usize,
        value: i64,
    },

    /// Computing a payload size overflowed.
    #[error("payload size overflow in field '{field}'")]
    SizeOverflow { field: &'static str },

    /// Text bytes are not valid UTF-8.
    #[error("invalid UTF-8 in field '{field}' at offset {offset}: {source}")]
    InvalidUtf8 {
        field: &'static str,
        offset: usize,
        source: std::str::Utf8Error,
    },

    /// Raw array payload length disagrees with width and shape.
    #[error(
        "embedding payload is {actual} bytes but shape {shape:?} with width {width} requires {expected}"
    )]
    PayloadMismatch {
        shape: Vec<usize>,
        width: u32,
        expected: u64,
        actual: usize,
    },

    /// Error inside a specific record.
    #[error("record {index}: {source}")]
    Record {
        index: usize,
        source: Box<FormatError>,
    },

    /// Error from the underlying stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FormatError {
    /// Wraps this error with the index of the record being processed.
    pub fn in_record(self, index: usize) -> Self {
        FormatError::Record {
            index,
            source: Box::new(self),
        }
    }

    /// Returns the category of this error, looking through record wrappers.
    pub fn category(&self) -> ErrorCategory {
        match self {
            FormatError::InvalidMagic { .. } | FormatError::UnsupportedVersion { .. } => {
                ErrorCategory::Format
            }
            FormatError::UnsupportedWidth { .. } => ErrorCategory::UnsupportedWidth,
            FormatError::Truncated { .. }
            | FormatError::NegativeLength { .. }
            | FormatError::SizeOverflow { .. }
            | FormatError::InvalidUtf8 { .. } => ErrorCategory::Truncated,
            FormatError::PayloadMismatch { .. } => ErrorCategory::Shape,
            FormatError::Record { source, .. } => source.category(),
            FormatError::Io(_) => ErrorCategory::Io,
        }
    }

    /// Returns the stable error code (e.g., "F001").
    pub fn code(&self) -> &'static str {
        match self {
            FormatError::InvalidMagic { .. } => "F001",
            FormatError::UnsupportedVersion { .. } => "F002",
            FormatError::UnsupportedWidth { .. } => "F003",
            FormatError::Truncated { .. } => "F004",
            FormatError::NegativeLength { .. } => "F005",
            FormatError::SizeOverflow { .. } => "F006",
            FormatError::InvalidUtf8 { .. } => "F007",
            FormatError::PayloadMismatch { .. } => "F008",
            FormatError::Record { source, .. } => source.code(),
            FormatError::Io(_) => "F009",
        }
    }

    /// Returns the record index if the error occurred inside a record.
    pub fn record_index(&self) -> Option<usize> {
        match self {
            FormatError::Record { index, .. } => Some(*index),
            _ => None,
        }
    }
}

//! Test fixture utilities for building collections and container files.

use std::fs;
use std::path::{Path, PathBuf};

use msgit_embed_format::{to_bytes, EmbeddingRecord, NumericArray};
use tempfile::TempDir;

/// The single-record collection used throughout the format contract tests:
/// `a.jpg` / `a cat` / f32 shape [2, 3] holding 1..=6 / ratings [4.5, 5.0].
pub fn cat_record() -> EmbeddingRecord {
    let embedding = NumericArray::from_f32(vec![2, 3], &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
        .expect("shape matches values");
    EmbeddingRecord::new("a.jpg", "a cat", embedding, vec![4.5, 5.0])
}

/// A mixed collection covering both widths, rank 0 and empty ratings.
pub fn mixed_collection() -> Vec<EmbeddingRecord> {
    vec![
        cat_record(),
        EmbeddingRecord::new(
            "images/dog.png",
            "two dogs playing fetch",
            NumericArray::from_f64(vec![1, 4], &[0.1, -0.2, 0.3, -0.4]).expect("valid shape"),
            Vec::new(),
        ),
        EmbeddingRecord::new(
            "",
            "",
            NumericArray::from_f64(vec![], &[42.0]).expect("valid shape"),
            vec![1.0],
        ),
        EmbeddingRecord::new(
            "\u{00E9}t\u{00E9}.jpg",
            "caf\u{00E9} au lait",
            NumericArray::from_f32(vec![0, 8], &[]).expect("valid shape"),
            vec![0.0, -1.5, f64::MAX],
        ),
    ]
}

/// A temporary directory holding container files.
pub struct ContainerFixture {
    pub root: TempDir,
}

impl ContainerFixture {
    /// Create a new empty fixture directory.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        Self { root }
    }

    /// Get the fixture root path.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Encode `records` and write them to `name`.
    pub fn write_collection(&self, name: &str, records: &[EmbeddingRecord]) -> PathBuf {
        let bytes = to_bytes(records).expect("Failed to encode fixture collection");
        self.write_bytes(name, &bytes)
    }

    /// Write raw bytes to `name`.
    pub fn write_bytes(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.root.path().join(name);
        fs::write(&path, bytes).expect("Failed to write fixture file");
        path
    }
}

impl Default for ContainerFixture {
    fn default() -> Self {
        Self::new()
    }
}

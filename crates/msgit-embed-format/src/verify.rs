//! Structural comparison of two decoded collections.
//!
//! [`compare_collections`] never stops at the first mismatch; it walks both
//! collections positionally and records every discrepancy so a failed round
//! trip can be diagnosed in one pass.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::array::NumericArray;
use crate::record::EmbeddingRecord;

/// Record field a discrepancy refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordField {
    Image,
    Caption,
    Embedding,
    Ratings,
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image => write!(f, "image"),
            Self::Caption => write!(f, "caption"),
            Self::Embedding => write!(f, "embedding"),
            Self::Ratings => write!(f, "ratings"),
        }
    }
}

/// A single field-level difference between two records at the same position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discrepancy {
    /// Position of the record in both collections.
    pub index: usize,
    /// Field that differs.
    pub field: RecordField,
    /// Human-readable description of the difference.
    pub detail: String,
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "record {}: different {}: {}",
            self.index, self.field, self.detail
        )
    }
}

/// Result of comparing two collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyReport {
    /// Length of the left (reference) collection.
    pub left_len: usize,
    /// Length of the right (comparison) collection.
    pub right_len: usize,
    /// Every field-level difference found, in record order.
    pub discrepancies: Vec<Discrepancy>,
}

impl VerifyReport {
    /// Whether the two collections have different lengths.
    pub fn length_mismatch(&self) -> bool {
        self.left_len != self.right_len
    }

    /// Whether no difference of any kind was found.
    pub fn is_match(&self) -> bool {
        !self.length_mismatch() && self.discrepancies.is_empty()
    }

    /// Discrepancies for a single field.
    pub fn for_field(&self, field: RecordField) -> impl Iterator<Item = &Discrepancy> {
        self.discrepancies.iter().filter(move |d| d.field == field)
    }
}

impl fmt::Display for VerifyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.length_mismatch() {
            writeln!(
                f,
                "different lengths: {} vs {}",
                self.left_len, self.right_len
            )?;
        }
        for discrepancy in &self.discrepancies {
            writeln!(f, "{}", discrepancy)?;
        }
        Ok(())
    }
}

/// Compare two collections position by position up to the shorter length.
pub fn compare_collections(left: &[EmbeddingRecord], right: &[EmbeddingRecord]) -> VerifyReport {
    let mut discrepancies = Vec::new();

    for (index, (a, b)) in left.iter().zip(right).enumerate() {
        let mut push = |field, detail: String| {
            discrepancies.push(Discrepancy {
                index,
                field,
                detail,
            })
        };

        if a.image != b.image {
            push(
                RecordField::Image,
                format!("{:?} vs {:?}", a.image, b.image),
            );
        }
        if a.caption != b.caption {
            push(
                RecordField::Caption,
                format!("{:?} vs {:?}", a.caption, b.caption),
            );
        }
        if let Some(detail) = compare_arrays(&a.embedding, &b.embedding) {
            push(RecordField::Embedding, detail);
        }
        if let Some(detail) = compare_floats(&a.ratings, &b.ratings) {
            push(RecordField::Ratings, detail);
        }
    }

    VerifyReport {
        left_len: left.len(),
        right_len: right.len(),
        discrepancies,
    }
}

/// Equal values, or identical bit patterns so a stored NaN matches itself.
fn same_value(a: f64, b: f64) -> bool {
    a == b || a.to_bits() == b.to_bits()
}

fn compare_floats(a: &[f64], b: &[f64]) -> Option<String> {
    if a.len() != b.len() {
        return Some(format!("length {} vs {}", a.len(), b.len()));
    }
    describe_mismatches(a, b)
}

fn describe_mismatches(a: &[f64], b: &[f64]) -> Option<String> {
    let mut mismatched = a
        .iter()
        .zip(b)
        .enumerate()
        .filter(|(_, (x, y))| !same_value(**x, **y));
    let (first, (x, y)) = mismatched.next()?;
    let count = 1 + mismatched.count();
    Some(format!(
        "{} element(s) differ, first at {}: {} vs {}",
        count, first, x, y
    ))
}

fn compare_arrays(a: &NumericArray, b: &NumericArray) -> Option<String> {
    if a.shape != b.shape {
        return Some(format!("shape {:?} vs {:?}", a.shape, b.shape));
    }
    if a.width != b.width {
        return Some(format!("width {} vs {}", a.width, b.width));
    }
    match (a.to_f64_vec(), b.to_f64_vec()) {
        (Ok(x), Ok(y)) if x.len() == y.len() => describe_mismatches(&x, &y),
        // Unreadable or malformed payloads fall back to a raw byte comparison.
        _ if a.data != b.data => Some(format!(
            "raw payload differs ({} vs {} bytes)",
            a.data.len(),
            b.data.len()
        )),
        _ => None,
    }
}

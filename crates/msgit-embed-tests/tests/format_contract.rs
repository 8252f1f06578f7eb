//! Byte-layout contract tests for the embedding container format.
//!
//! These tests pin the exact on-disk layout (little-endian, fixed integer
//! widths) and the decoder's acceptance rules.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p msgit-embed-tests --test format_contract
//! ```

use msgit_embed_format::{
    compare_collections, decode_collection, from_bytes, to_bytes, ContainerHeader,
    EmbeddingRecord, ErrorCategory, FormatError, NumericArray, FORMAT_VERSION, HEADER_SIZE,
    MAGIC,
};
use msgit_embed_tests::fixtures::{cat_record, mixed_collection};
use pretty_assertions::assert_eq;

// ============================================================================
// Test Helper Functions
// ============================================================================

fn le_i64(bytes: &[u8], offset: usize) -> i64 {
    i64::from_le_bytes(bytes[offset..offset + 8].try_into().unwrap())
}

fn le_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn cat_record_exact_layout() {
    let bytes = to_bytes(&[cat_record()]).unwrap();

    // Header
    assert_eq!(&bytes[0..8], MAGIC);
    assert_eq!(le_u32(&bytes, 8), FORMAT_VERSION);
    assert_eq!(le_u32(&bytes, 12), 0);
    assert_eq!(le_i64(&bytes, 16), 1);

    // image
    let mut pos = HEADER_SIZE;
    assert_eq!(le_i64(&bytes, pos), 5);
    assert_eq!(&bytes[pos + 8..pos + 13], b"a.jpg");
    pos += 13;

    // caption
    assert_eq!(le_i64(&bytes, pos), 5);
    assert_eq!(&bytes[pos + 8..pos + 13], b"a cat");
    pos += 13;

    // embedding: width, rank, dims, 24-byte payload
    assert_eq!(le_u32(&bytes, pos), 4);
    assert_eq!(le_u32(&bytes, pos + 4), 2);
    assert_eq!(le_i64(&bytes, pos + 8), 2);
    assert_eq!(le_i64(&bytes, pos + 16), 3);
    pos += 24;
    let payload = &bytes[pos..pos + 24];
    let values: Vec<f32> = payload
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes(c.try_into().unwrap()))
        .collect();
    assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    pos += 24;

    // ratings
    assert_eq!(le_i64(&bytes, pos), 2);
    assert_eq!(&bytes[pos + 8..pos + 16], &4.5f64.to_le_bytes());
    assert_eq!(&bytes[pos + 16..pos + 24], &5.0f64.to_le_bytes());
    pos += 24;

    assert_eq!(pos, bytes.len());
}

#[test]
fn cat_record_decodes_identically() {
    let bytes = to_bytes(&[cat_record()]).unwrap();
    let decoded = from_bytes(&bytes).unwrap();

    assert_eq!(decoded.len(), 1);
    let record = &decoded[0];
    assert_eq!(record.image, "a.jpg");
    assert_eq!(record.caption, "a cat");
    assert_eq!(record.embedding.shape, vec![2, 3]);
    assert_eq!(record.embedding.width, 4);
    assert_eq!(
        record.embedding.to_f32_vec().unwrap(),
        vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]
    );
    assert_eq!(record.ratings, vec![4.5, 5.0]);
}

#[test]
fn empty_collection_is_header_only() {
    let bytes = to_bytes(&[]).unwrap();
    assert_eq!(bytes.len(), HEADER_SIZE);
    assert_eq!(le_i64(&bytes, 16), 0);
    assert_eq!(from_bytes(&bytes).unwrap(), Vec::<EmbeddingRecord>::new());
}

// ============================================================================
// Round trip
// ============================================================================

#[test]
fn mixed_collection_round_trips() {
    let records = mixed_collection();
    let bytes = to_bytes(&records).unwrap();
    let decoded = decode_collection(&mut bytes.as_slice()).unwrap();

    assert_eq!(decoded, records);
    assert!(compare_collections(&records, &decoded).is_match());
}

#[test]
fn empty_ratings_stay_empty() {
    let records = mixed_collection();
    let decoded = from_bytes(&to_bytes(&records).unwrap()).unwrap();
    assert!(decoded[1].ratings.is_empty());
}

#[test]
fn re_encoding_is_byte_identical() {
    let bytes = to_bytes(&mixed_collection()).unwrap();
    let again = to_bytes(&from_bytes(&bytes).unwrap()).unwrap();
    assert_eq!(bytes, again);
}

// ============================================================================
// Acceptance rules
// ============================================================================

#[test]
fn any_magic_mismatch_is_rejected() {
    let bytes = to_bytes(&[cat_record()]).unwrap();
    for i in 0..MAGIC.len() {
        let mut corrupt = bytes.clone();
        corrupt[i] ^= 0xFF;
        let err = from_bytes(&corrupt).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Format, "byte {}", i);
        assert!(matches!(err, FormatError::InvalidMagic { .. }));
    }
}

#[test]
fn version_gate() {
    let bytes = to_bytes(&[cat_record()]).unwrap();

    for version in 0..=FORMAT_VERSION {
        let mut older = bytes.clone();
        older[8..12].copy_from_slice(&version.to_le_bytes());
        assert!(from_bytes(&older).is_ok(), "version {} must decode", version);
    }

    for version in [FORMAT_VERSION + 1, 7, u32::MAX] {
        let mut newer = bytes.clone();
        newer[8..12].copy_from_slice(&version.to_le_bytes());
        let err = from_bytes(&newer).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Format);
        assert_eq!(ContainerHeader::parse(&newer).unwrap().version, version);
    }
}

#[test]
fn unsupported_width_on_encode() {
    for width in [0u32, 1, 2, 3, 5, 16] {
        let mut record = cat_record();
        record.embedding = NumericArray::from_raw(width, vec![1], vec![0; width as usize]);
        let err = to_bytes(&[record]).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::UnsupportedWidth, "width {}", width);
    }
}

#[test]
fn unsupported_width_on_decode() {
    let mut bytes = to_bytes(&[cat_record()]).unwrap();
    let width_offset = HEADER_SIZE + 13 + 13;
    bytes[width_offset..width_offset + 4].copy_from_slice(&2u32.to_le_bytes());

    let err = from_bytes(&bytes).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::UnsupportedWidth);
    assert_eq!(err.record_index(), Some(0));
}

#[test]
fn every_truncation_fails_cleanly() {
    let bytes = to_bytes(&mixed_collection()).unwrap();
    for len in 0..bytes.len() {
        assert!(
            from_bytes(&bytes[..len]).is_err(),
            "prefix of {} bytes must not decode",
            len
        );
    }
}

#[test]
fn corrupt_caption_length_is_truncation() {
    let mut bytes = to_bytes(&[cat_record()]).unwrap();
    let caption_len = HEADER_SIZE + 13;
    bytes[caption_len..caption_len + 8].copy_from_slice(&(1i64 << 40).to_le_bytes());

    let err = from_bytes(&bytes).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Truncated);
    assert!(err.to_string().contains("caption"));
}

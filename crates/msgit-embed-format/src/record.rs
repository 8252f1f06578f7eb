//! Embedding record codec.
//!
//! A record is four consecutive primitive fields with no record-level length
//! prefix: `image` (text), `caption` (text), `embedding` (numeric array),
//! `ratings` (float list).

use std::io::Write;

use crate::array::NumericArray;
use crate::error::FormatError;
use crate::primitive::{
    read_array, read_float_list, read_text, write_array, write_float_list, write_text,
};

/// One (image, caption, embedding, ratings) tuple.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingRecord {
    /// Identifier or path of the source image.
    pub image: String,
    /// Free-form description.
    pub caption: String,
    /// Dense embedding vector.
    pub embedding: NumericArray,
    /// Scalar ratings, in insertion order.
    pub ratings: Vec<f64>,
}

/// An ordered sequence of records.
pub type EmbeddingCollection = Vec<EmbeddingRecord>;

impl EmbeddingRecord {
    /// Create a new record.
    pub fn new(
        image: impl Into<String>,
        caption: impl Into<String>,
        embedding: NumericArray,
        ratings: Vec<f64>,
    ) -> Self {
        Self {
            image: image.into(),
            caption: caption.into(),
            embedding,
            ratings,
        }
    }

    /// Checks that the record can be encoded.
    pub fn validate(&self) -> Result<(), FormatError> {
        self.embedding.validate()
    }

    /// Write the record's four fields in order.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<(), FormatError> {
        write_text(writer, &self.image)?;
        write_text(writer, &self.caption)?;
        write_array(writer, &self.embedding)?;
        write_float_list(writer, &self.ratings)?;
        Ok(())
    }

    /// Read one record starting at `pos`, returning it and the bytes consumed.
    pub fn read(data: &[u8], pos: usize) -> Result<(Self, usize), FormatError> {
        let mut cursor = pos;

        let (image, n) = read_text(data, cursor, "image")?;
        cursor += n;
        let (caption, n) = read_text(data, cursor, "caption")?;
        cursor += n;
        let (embedding, n) = read_array(data, cursor, "embedding")?;
        cursor += n;
        let (ratings, n) = read_float_list(data, cursor, "ratings")?;
        cursor += n;

        let record = Self {
            image,
            caption,
            embedding,
            ratings,
        };
        Ok((record, cursor - pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cat_record() -> EmbeddingRecord {
        let embedding =
            NumericArray::from_f32(vec![2, 3], &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        EmbeddingRecord::new("a.jpg", "a cat", embedding, vec![4.5, 5.0])
    }

    #[test]
    fn test_record_field_order() {
        let mut buf = Vec::new();
        cat_record().write(&mut buf).unwrap();

        // image: 8 + 5, caption: 8 + 5, embedding: 4 + 4 + 16 + 24, ratings: 8 + 16
        assert_eq!(buf.len(), 13 + 13 + 48 + 24);
        assert_eq!(&buf[8..13], b"a.jpg");
        assert_eq!(&buf[21..26], b"a cat");
        assert_eq!(&buf[26..30], &4u32.to_le_bytes());
    }

    #[test]
    fn test_record_read_back() {
        let record = cat_record();
        let mut buf = Vec::new();
        record.write(&mut buf).unwrap();
        // Trailing bytes belong to whatever follows and must not be consumed.
        buf.extend_from_slice(&[1, 2, 3]);

        let (decoded, consumed) = EmbeddingRecord::read(&buf, 0).unwrap();
        assert_eq!(decoded, record);
        assert_eq!(consumed, buf.len() - 3);
    }

    #[test]
    fn test_record_empty_ratings() {
        let embedding = NumericArray::from_f64(vec![1], &[0.0]).unwrap();
        let record = EmbeddingRecord::new("", "", embedding, Vec::new());
        let mut buf = Vec::new();
        record.write(&mut buf).unwrap();

        let (decoded, _) = EmbeddingRecord::read(&buf, 0).unwrap();
        assert_eq!(decoded.ratings, Vec::<f64>::new());
    }

    #[test]
    fn test_record_truncated_names_field() {
        let mut buf = Vec::new();
        cat_record().write(&mut buf).unwrap();
        buf.truncate(buf.len() - 4);

        match EmbeddingRecord::read(&buf, 0).unwrap_err() {
            FormatError::Truncated { field, .. } => assert_eq!(field, "ratings"),
            other => panic!("expected Truncated, got {:?}", other),
        }
    }
}

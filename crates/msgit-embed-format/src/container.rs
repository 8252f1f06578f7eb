//! Container envelope: magic, version, reserved word and record count,
//! followed by the encoded records.

use std::io::{Read, Write};

use byteorder::{LittleEndian, WriteBytesExt};

use crate::error::FormatError;
use crate::primitive::{read_len, read_u32, take};
use crate::record::{EmbeddingCollection, EmbeddingRecord};

/// Container magic token.
pub const MAGIC: &[u8; 8] = b"MSGitEmb";

/// Format version written by this encoder and the newest one it decodes.
pub const FORMAT_VERSION: u32 = 1;

/// Header size: magic + version + reserved + record count.
pub const HEADER_SIZE: usize = 24;

/// Smallest possible encoded record: two empty texts, a rank-0 array header
/// with its single element, and an empty float list.
const MIN_RECORD_SIZE: u64 = 8 + 8 + (4 + 4 + 4) + 8;

/// Container header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    /// Format version.
    pub version: u32,
    /// Reserved word (written as zero).
    pub reserved: u32,
    /// Number of records that follow.
    pub record_count: u64,
}

impl ContainerHeader {
    /// Create a header for the current format version.
    pub fn new(record_count: u64) -> Self {
        Self {
            version: FORMAT_VERSION,
            reserved: 0,
            record_count,
        }
    }

    /// Write the header to a writer.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<(), FormatError> {
        let count = i64::try_from(self.record_count)
            .map_err(|_| FormatError::SizeOverflow { field: "record_count" })?;

        writer.write_all(MAGIC)?;
        writer.write_u32::<LittleEndian>(self.version)?;
        writer.write_u32::<LittleEndian>(self.reserved)?;
        writer.write_i64::<LittleEndian>(count)?;
        Ok(())
    }

    /// Parse the header from the start of `data`.
    ///
    /// Checks the magic token only; the version gate is applied separately by
    /// [`ContainerHeader::ensure_supported`] so that newer files can still be
    /// inspected.
    pub fn parse(data: &[u8]) -> Result<Self, FormatError> {
        if data.len() < MAGIC.len() || &data[..MAGIC.len()] != MAGIC {
            return Err(FormatError::InvalidMagic {
                found: data[..data.len().min(MAGIC.len())].to_vec(),
            });
        }

        let version = read_u32(data, 8, "version")?;
        let reserved = read_u32(data, 12, "reserved")?;
        let record_count = read_len(data, 16, "record_count")?;

        Ok(Self {
            version,
            reserved,
            record_count,
        })
    }

    /// Refuses versions newer than [`FORMAT_VERSION`].
    pub fn ensure_supported(&self) -> Result<(), FormatError> {
        if self.version > FORMAT_VERSION {
            return Err(FormatError::UnsupportedVersion {
                found: self.version,
                supported: FORMAT_VERSION,
            });
        }
        Ok(())
    }
}

/// Encode a collection to a writer.
///
/// Every record is validated before the header is written, so a record with
/// an unsupported width fails the whole encode without emitting any bytes.
pub fn encode_collection<W: Write>(
    records: &[EmbeddingRecord],
    writer: &mut W,
) -> Result<(), FormatError> {
    for (index, record) in records.iter().enumerate() {
        record.validate().map_err(|e| e.in_record(index))?;
    }

    ContainerHeader::new(records.len() as u64).write(writer)?;
    for (index, record) in records.iter().enumerate() {
        record.write(writer).map_err(|e| e.in_record(index))?;
    }
    Ok(())
}

/// Encode a collection to a byte vector.
pub fn to_bytes(records: &[EmbeddingRecord]) -> Result<Vec<u8>, FormatError> {
    let mut buffer = Vec::new();
    encode_collection(records, &mut buffer)?;
    Ok(buffer)
}

/// Read the whole stream into memory and decode it.
pub fn decode_collection<R: Read>(reader: &mut R) -> Result<EmbeddingCollection, FormatError> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    from_bytes(&data)
}

/// Decode a collection from an in-memory buffer.
///
/// Either every record decodes and the full collection is returned, or the
/// first failure is returned and nothing else.
pub fn from_bytes(data: &[u8]) -> Result<EmbeddingCollection, FormatError> {
    let header = ContainerHeader::parse(data)?;
    header.ensure_supported()?;

    // Reject counts that cannot possibly fit before decoding anything.
    let needed = header.record_count.saturating_mul(MIN_RECORD_SIZE);
    take(data, HEADER_SIZE, needed, "record_count")?;

    let mut records = Vec::with_capacity(header.record_count as usize);
    let mut cursor = HEADER_SIZE;
    for index in 0..header.record_count as usize {
        let (record, consumed) =
            EmbeddingRecord::read(data, cursor).map_err(|e| e.in_record(index))?;
        records.push(record);
        cursor += consumed;
    }

    Ok(records)
}

/// BLAKE3 hex digest of encoded container bytes.
pub fn content_hash(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

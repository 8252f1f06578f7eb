//! Primitive field codec: length-prefixed text, shaped numeric arrays and
//! length-prefixed float lists.
//!
//! Every `write_*` function appends one field to a writer. Every `read_*`
//! function decodes one field from `data` starting at `pos` and returns the
//! value together with the number of bytes consumed. All multi-byte integers
//! and floats are little-endian.

use std::io::Write;

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};

use crate::array::{element_count, ElementWidth, NumericArray};
use crate::error::FormatError;

/// Returns `len` bytes of `data` starting at `pos`, or a truncation error.
pub(crate) fn take<'a>(
    data: &'a [u8],
    pos: usize,
    len: u64,
    field: &'static str,
) -> Result<&'a [u8], FormatError> {
    let remaining = data.len().saturating_sub(pos);
    if pos > data.len() || len > remaining as u64 {
        return Err(FormatError::Truncated {
            field,
            offset: pos,
            needed: len,
            remaining,
        });
    }
    let len = len as usize;
    Ok(&data[pos..pos + len])
}

pub(crate) fn read_u32(data: &[u8], pos: usize, field: &'static str) -> Result<u32, FormatError> {
    Ok(LittleEndian::read_u32(take(data, pos, 4, field)?))
}

pub(crate) fn read_i64(data: &[u8], pos: usize, field: &'static str) -> Result<i64, FormatError> {
    Ok(LittleEndian::read_i64(take(data, pos, 8, field)?))
}

/// Reads a signed 8-byte length and rejects negative values.
pub(crate) fn read_len(data: &[u8], pos: usize, field: &'static str) -> Result<u64, FormatError> {
    let value = read_i64(data, pos, field)?;
    u64::try_from(value).map_err(|_| FormatError::NegativeLength {
        field,
        offset: pos,
        value,
    })
}

fn to_wire_len(len: usize, field: &'static str) -> Result<i64, FormatError> {
    i64::try_from(len).map_err(|_| FormatError::SizeOverflow { field })
}

// ============================================================================
// Text
// ============================================================================

/// Writes UTF-8 text as an i64 byte count followed by the bytes.
pub fn write_text<W: Write>(writer: &mut W, text: &str) -> Result<(), FormatError> {
    let bytes = text.as_bytes();
    writer.write_i64::<LittleEndian>(to_wire_len(bytes.len(), "text")?)?;
    writer.write_all(bytes)?;
    Ok(())
}

/// Reads a length-prefixed UTF-8 text field.
pub fn read_text(
    data: &[u8],
    pos: usize,
    field: &'static str,
) -> Result<(String, usize), FormatError> {
    let len = read_len(data, pos, field)?;
    let start = pos + 8;
    let bytes = take(data, start, len, field)?;
    let text = std::str::from_utf8(bytes).map_err(|source| FormatError::InvalidUtf8 {
        field,
        offset: start,
        source,
    })?;
    Ok((text.to_string(), 8 + bytes.len()))
}

// ============================================================================
// Numeric arrays
// ============================================================================

/// Writes a numeric array: u32 width, u32 rank, rank × i64 dims, raw bytes.
///
/// The array is validated first, so an unsupported width or a payload that
/// disagrees with its shape fails before anything reaches the writer.
pub fn write_array<W: Write>(writer: &mut W, array: &NumericArray) -> Result<(), FormatError> {
    array.validate()?;
    let rank = u32::try_from(array.shape.len())
        .map_err(|_| FormatError::SizeOverflow { field: "embedding" })?;

    writer.write_u32::<LittleEndian>(array.width)?;
    writer.write_u32::<LittleEndian>(rank)?;
    for &dim in &array.shape {
        writer.write_i64::<LittleEndian>(to_wire_len(dim, "embedding")?)?;
    }
    writer.write_all(&array.data)?;
    Ok(())
}

/// Reads a numeric array, validating the width before touching the payload.
pub fn read_array(
    data: &[u8],
    pos: usize,
    field: &'static str,
) -> Result<(NumericArray, usize), FormatError> {
    let mut cursor = pos;

    let width = read_u32(data, cursor, field)?;
    let width = ElementWidth::from_bytes(width, field)?;
    cursor += 4;

    let rank = read_u32(data, cursor, field)?;
    cursor += 4;

    // Check the whole dimension table up front so a corrupt rank fails fast.
    take(data, cursor, u64::from(rank) * 8, field)?;
    let mut shape = Vec::with_capacity(rank as usize);
    for _ in 0..rank {
        let dim = read_len(data, cursor, field)?;
        let dim = usize::try_from(dim).map_err(|_| FormatError::SizeOverflow { field })?;
        shape.push(dim);
        cursor += 8;
    }

    let size = element_count(&shape, field)?
        .checked_mul(u64::from(width.bytes()))
        .ok_or(FormatError::SizeOverflow { field })?;
    let payload = take(data, cursor, size, field)?;
    cursor += payload.len();

    let array = NumericArray::from_raw(width.bytes(), shape, payload.to_vec());
    Ok((array, cursor - pos))
}

// ============================================================================
// Float lists
// ============================================================================

/// Writes an i64 count followed by that many f64 values.
pub fn write_float_list<W: Write>(writer: &mut W, values: &[f64]) -> Result<(), FormatError> {
    writer.write_i64::<LittleEndian>(to_wire_len(values.len(), "ratings")?)?;
    for &value in values {
        writer.write_f64::<LittleEndian>(value)?;
    }
    Ok(())
}

/// Reads a length-prefixed list of f64 values.
pub fn read_float_list(
    data: &[u8],
    pos: usize,
    field: &'static str,
) -> Result<(Vec<f64>, usize), FormatError> {
    let count = read_len(data, pos, field)?;
    let size = count
        .checked_mul(8)
        .ok_or(FormatError::SizeOverflow { field })?;
    let bytes = take(data, pos + 8, size, field)?;
    let values = bytes.chunks_exact(8).map(LittleEndian::read_f64).collect();
    Ok((values, 8 + bytes.len()))
}

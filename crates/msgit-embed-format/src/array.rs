//! Shaped numeric arrays stored as raw little-endian element bytes.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::FormatError;

/// Element width of a numeric array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementWidth {
    /// 4-byte single-precision float.
    Single,
    /// 8-byte double-precision float.
    Double,
}

impl ElementWidth {
    /// Resolves a raw width in bytes, failing for anything but 4 or 8.
    pub fn from_bytes(width: u32, field: &'static str) -> Result<Self, FormatError> {
        match width {
            4 => Ok(ElementWidth::Single),
            8 => Ok(ElementWidth::Double),
            _ => Err(FormatError::UnsupportedWidth { field, width }),
        }
    }

    /// Size of one element in bytes.
    pub fn bytes(self) -> u32 {
        match self {
            ElementWidth::Single => 4,
            ElementWidth::Double => 8,
        }
    }
}

/// A dense numeric array with explicit element width and shape.
///
/// `data` holds the elements in row-major order, little-endian. The width is
/// kept as the raw byte count so that unsupported widths can be represented
/// and rejected at encode time instead of at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericArray {
    /// Element width in bytes (4 or 8 for a valid array).
    pub width: u32,
    /// Dimension sizes, outermost first.
    pub shape: Vec<usize>,
    /// Raw element bytes.
    pub data: Vec<u8>,
}

impl NumericArray {
    /// Creates an array from raw parts without validation.
    pub fn from_raw(width: u32, shape: Vec<usize>, data: Vec<u8>) -> Self {
        Self { width, shape, data }
    }

    /// Creates a single-precision array.
    pub fn from_f32(shape: Vec<usize>, values: &[f32]) -> Result<Self, FormatError> {
        let mut data = vec![0u8; values.len() * 4];
        LittleEndian::write_f32_into(values, &mut data);
        let array = Self::from_raw(4, shape, data);
        array.validate()?;
        Ok(array)
    }

    /// Creates a double-precision array.
    pub fn from_f64(shape: Vec<usize>, values: &[f64]) -> Result<Self, FormatError> {
        let mut data = vec![0u8; values.len() * 8];
        LittleEndian::write_f64_into(values, &mut data);
        let array = Self::from_raw(8, shape, data);
        array.validate()?;
        Ok(array)
    }

    /// Resolves the element width.
    pub fn element_width(&self) -> Result<ElementWidth, FormatError> {
        ElementWidth::from_bytes(self.width, "embedding")
    }

    /// Number of elements implied by the shape (1 for rank 0).
    pub fn element_count(&self) -> Result<u64, FormatError> {
        element_count(&self.shape, "embedding")
    }

    /// Payload size in bytes implied by width and shape.
    pub fn expected_len(&self) -> Result<u64, FormatError> {
        self.element_count()?
            .checked_mul(u64::from(self.width))
            .ok_or(FormatError::SizeOverflow { field: "embedding" })
    }

    /// Checks width and that the payload length matches width × product(shape).
    pub fn validate(&self) -> Result<(), FormatError> {
        self.element_width()?;
        let expected = self.expected_len()?;
        if expected != self.data.len() as u64 {
            return Err(FormatError::PayloadMismatch {
                shape: self.shape.clone(),
                width: self.width,
                expected,
                actual: self.data.len(),
            });
        }
        Ok(())
    }

    /// Returns the elements widened to `f64`.
    pub fn to_f64_vec(&self) -> Result<Vec<f64>, FormatError> {
        let values = match self.element_width()? {
            ElementWidth::Single => self
                .data
                .chunks_exact(4)
                .map(|chunk| f64::from(LittleEndian::read_f32(chunk)))
                .collect(),
            ElementWidth::Double => self
                .data
                .chunks_exact(8)
                .map(LittleEndian::read_f64)
                .collect(),
        };
        Ok(values)
    }

    /// Returns the elements as `f32`, narrowing double-precision data.
    pub fn to_f32_vec(&self) -> Result<Vec<f32>, FormatError> {
        let values = match self.element_width()? {
            ElementWidth::Single => self
                .data
                .chunks_exact(4)
                .map(LittleEndian::read_f32)
                .collect(),
            ElementWidth::Double => self
                .data
                .chunks_exact(8)
                .map(|chunk| LittleEndian::read_f64(chunk) as f32)
                .collect(),
        };
        Ok(values)
    }
}

/// Product of the dimensions, checked for overflow.
///
/// Any zero dimension makes the product zero regardless of where it appears,
/// so large dimensions ahead of it must not overflow.
pub(crate) fn element_count(shape: &[usize], field: &'static str) -> Result<u64, FormatError> {
    if shape.contains(&0) {
        return Ok(0);
    }
    shape.iter().try_fold(1u64, |acc, &dim| {
        acc.checked_mul(dim as u64)
            .ok_or(FormatError::SizeOverflow { field })
    })
}

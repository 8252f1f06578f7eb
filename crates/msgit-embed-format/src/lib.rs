//! MSGit embedding container format.
//!
//! Binary storage for collections of embedding records. Each record pairs an
//! image reference, a caption, a shaped numeric array and a list of ratings.
//!
//! # Layout
//!
//! All multi-byte fields are little-endian.
//!
//! | Field | Size |
//! |---|---|
//! | magic `MSGitEmb` | 8 |
//! | version (u32) | 4 |
//! | reserved (u32, zero) | 4 |
//! | record count (i64) | 8 |
//! | records | variable |
//!
//! Each record is `image` (i64 length + UTF-8), `caption` (same), `embedding`
//! (u32 width, u32 rank, rank × i64 dims, raw elements) and `ratings` (i64
//! count + f64 values).
//!
//! ```rust,ignore
//! use msgit_embed_format::{compare_collections, from_bytes, to_bytes};
//!
//! let bytes = to_bytes(&records)?;
//! let decoded = from_bytes(&bytes)?;
//! assert!(compare_collections(&records, &decoded).is_match());
//! ```

pub mod array;
pub mod container;
pub mod error;
pub mod primitive;
pub mod record;
pub mod verify;

pub use array::{ElementWidth, NumericArray};
pub use container::{
    content_hash, decode_collection, encode_collection, from_bytes, to_bytes, ContainerHeader,
    FORMAT_VERSION, HEADER_SIZE, MAGIC,
};
pub use error::{ErrorCategory, FormatError};
pub use record::{EmbeddingCollection, EmbeddingRecord};
pub use verify::{compare_collections, Discrepancy, RecordField, VerifyReport};

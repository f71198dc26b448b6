//! Carving ZIP local file entries out of raw bytes.
//!
//! The dumps this crate works on are fragments: no central directory, no
//! end-of-central-directory record to start from, and header fields that
//! are sometimes wrong. Instead of reading the archive from the end, the
//! carver walks it from the front:
//!
//! - [`scanner`]: finds `PK\x03\x04` candidates lazily
//! - [`parser`]: decodes the 30-byte local header at a candidate
//! - [`boundary`]: decides where the payload ends when sizes lie
//! - [`carver`]: ties the above to payload recovery and builds the report
//!
//! ## Local header layout
//!
//! ```text
//! signature(4) version(2) flags(2) method(2) time(2) date(2)
//! crc32(4) compressed(4) uncompressed(4) name_len(2) extra_len(2)
//! name[name_len] extra[extra_len] payload...
//! ```
//!
//! All fields are little-endian.

pub mod boundary;
mod carver;
pub mod parser;
pub mod scanner;
mod structures;

pub use boundary::{Boundary, resolve};
pub use carver::Carver;
pub use parser::{file_name, parse};
pub use scanner::{ScanMode, SignatureScan, scan};
pub use structures::*;

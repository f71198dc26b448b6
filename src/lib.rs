//! # xmicarve
//!
//! Carve ZIP-style entries out of damaged or wrapped dumps and recover
//! whatever they still hold.
//!
//! The input is an opaque buffer, usually a base64-unwrapped transfer
//! payload, that contains one or more local file entries but no central
//! directory. The engine finds each local header, decides where its payload
//! ends even when the declared size is wrong, and runs the payload through
//! a chain of decompressors. When none of them accept it, readable text is
//! salvaged instead. A bad entry never stops the pass.
//!
//! ## Features
//!
//! - Lazy signature scanning with a candidate limit
//! - Boundary fallback to the next signature or the end of the buffer
//! - Raw deflate, zlib, shifted deflate, gzip, bzip2 and stored payloads,
//!   checked against the header CRC where possible
//! - Printable run extraction and EBCDIC codepage decoding
//! - Keyword search over recovered content
//! - Email, user ID and NETDATA header extraction
//! - Local files and HTTP Range sources, plain or base64 wrapped
//!
//! ## Example
//!
//! ```no_run
//! use xmicarve::{CarveOptions, Carver, RecoveryResult};
//!
//! let buffer = std::fs::read("dump.bin").unwrap();
//! let report = Carver::new(CarveOptions::default()).carve(&buffer);
//! for (entry, result) in report.iter() {
//!     match result {
//!         RecoveryResult::Recovered { bytes, strategy, .. } => {
//!             println!("{}: {} bytes via {}", entry.file_name, bytes.len(), strategy)
//!         }
//!         RecoveryResult::Failed { attempts } => {
//!             println!("{}: {} attempts failed", entry.file_name, attempts.len())
//!         }
//!     }
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod recovery;
pub mod report;
pub mod search;
pub mod zip;

pub use cli::Cli;
pub use config::{CarveOptions, SearchOptions};
pub use error::{
    AllStrategiesFailed, CandidateError, ExtractorError, NoReadableContent, ParseError,
    ResolveError,
};
pub use io::{Container, HttpRangeReader, LocalFileReader, ReadAt, ReportWriter, unwrap_base64};
pub use recovery::{Codepage, recover_payload};
pub use report::{Origin, RecoveryResult, Report, Summary};
pub use search::{Artifact, ArtifactExtractor, ArtifactKind, KeywordMatch, KeywordSearch};
pub use zip::{Carver, Entry, LocalFileHeader};

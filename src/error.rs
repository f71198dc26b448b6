//! Per-entry error taxonomy of the carving engine.
//!
//! None of these abort a carving pass. Parse and resolve errors skip the
//! candidate; strategy and fallback errors end up in
//! [`RecoveryResult::Failed`](crate::report::RecoveryResult::Failed).

use serde::Serialize;
use thiserror::Error;

use crate::recovery::Attempt;

/// A candidate offset did not hold a usable local file header
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ParseError {
    #[error("truncated header: {available} bytes available, 30 required")]
    Truncated { available: usize },

    #[error("bad signature {found:02x?}")]
    BadSignature { found: [u8; 4] },
}

/// The header points past the end of the buffer
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ResolveError {
    #[error("payload start {payload_start} is beyond buffer length {buffer_len}")]
    Unbounded {
        payload_start: usize,
        buffer_len: usize,
    },
}

/// Why a scanned candidate never became an entry
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(untagged)]
pub enum CandidateError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Every decompression strategy refused the payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("all {} decompression strategies failed", .attempts.len())]
pub struct AllStrategiesFailed {
    pub attempts: Vec<Attempt>,
}

/// Neither printable runs nor any legacy codepage produced readable text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no readable content")]
pub struct NoReadableContent {
    pub attempts: Vec<Attempt>,
}

/// The built-in artifact patterns failed to build
#[derive(Debug, Error)]
pub enum ExtractorError {
    #[error(transparent)]
    Regex(#[from] regex::Error),

    #[error(transparent)]
    Matcher(#[from] aho_corasick::BuildError),
}

/// Failures of the stand-alone decoding helpers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("empty payload")]
    Empty,

    #[error("payload shorter than {skip} skipped bytes")]
    TooShort { skip: usize },

    #[error("stream ended before its end marker")]
    Truncated,

    #[error("output exceeds {limit} bytes")]
    OutputLimit { limit: usize },

    #[error("method {method} is not stored")]
    NotStored { method: u16 },

    #[error("{0}")]
    Corrupt(String),
}

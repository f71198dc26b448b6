//! Payload recovery: the decompression chain and the text fallback.
//!
//! [`recover_payload`] is the per-entry error boundary. Whatever happens
//! inside, it returns a [`RecoveryResult`]; a failure is recorded with
//! every attempt that was made, never raised.

pub mod codepage;
pub mod strategy;
pub mod text;

pub use codepage::Codepage;
pub use strategy::{CHAIN, Decoded, Strategy, recover};
pub use text::{PrintableRuns, RecoveredText, TextMethod, fallback};

use serde::Serialize;

use crate::config::CarveOptions;
use crate::report::{Origin, RecoveryResult};
use crate::zip::{CompressionMethod, LocalFileHeader};

/// What happened when one strategy was tried
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum AttemptOutcome {
    /// The strategy rejected the payload
    Failed { reason: String },
    /// The strategy produced output that contradicts the header
    Unverified { len: usize },
}

/// One tried strategy and its outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attempt {
    pub strategy: &'static str,
    #[serde(flatten)]
    pub outcome: AttemptOutcome,
}

impl Attempt {
    pub fn failed(strategy: &'static str, reason: impl Into<String>) -> Self {
        Self {
            strategy,
            outcome: AttemptOutcome::Failed {
                reason: reason.into(),
            },
        }
    }

    pub fn unverified(strategy: &'static str, len: usize) -> Self {
        Self {
            strategy,
            outcome: AttemptOutcome::Unverified { len },
        }
    }
}

impl std::fmt::Display for Attempt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.outcome {
            AttemptOutcome::Failed { reason } => write!(f, "{}: {}", self.strategy, reason),
            AttemptOutcome::Unverified { len } => {
                write!(f, "{}: {} bytes, checksum mismatch", self.strategy, len)
            }
        }
    }
}

/// What the header says the decoded payload should look like
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeHint {
    pub method: CompressionMethod,
    pub expected_crc: Option<u32>,
    pub expected_size: Option<u64>,
}

impl DecodeHint {
    /// A hint with nothing to verify against
    pub fn method(method: CompressionMethod) -> Self {
        Self {
            method,
            expected_crc: None,
            expected_size: None,
        }
    }

    /// Expectations from a local header. Headers that defer their CRC and
    /// sizes to a data descriptor carry placeholders, so those are ignored.
    pub fn from_header(header: &LocalFileHeader) -> Self {
        if header.has_data_descriptor() {
            return Self::method(header.compression_method);
        }
        Self {
            method: header.compression_method,
            expected_crc: Some(header.crc32),
            expected_size: Some(header.uncompressed_size as u64),
        }
    }

    /// `None` when there is nothing to check, otherwise whether `output`
    /// matches every expectation.
    pub fn verify(&self, output: &[u8]) -> Option<bool> {
        if self.expected_crc.is_none() && self.expected_size.is_none() {
            return None;
        }
        let crc_ok = self
            .expected_crc
            .is_none_or(|crc| crc32fast::hash(output) == crc);
        let size_ok = self
            .expected_size
            .is_none_or(|size| output.len() as u64 == size);
        Some(crc_ok && size_ok)
    }
}

/// Recover one entry's payload: decompression chain first, text fallback
/// second.
pub fn recover_payload(payload: &[u8], hint: &DecodeHint, options: &CarveOptions) -> RecoveryResult {
    let chain_failure = match strategy::recover(payload, hint, options.max_output_size) {
        Ok(decoded) => {
            if !decoded.verified && hint.verify(&decoded.bytes).is_some() {
                tracing::warn!(
                    strategy = decoded.strategy.name(),
                    "recovered output does not match header checksum"
                );
            }
            return RecoveryResult::Recovered {
                bytes: decoded.bytes,
                strategy: decoded.strategy.name(),
                origin: Origin::Decompressed,
                verified: decoded.verified,
            };
        }
        Err(e) => e,
    };

    tracing::debug!(len = payload.len(), "{}, trying text fallback", chain_failure);

    match text::fallback(payload, options.min_run_len, &options.codepages) {
        Ok(recovered) => RecoveryResult::Recovered {
            bytes: recovered.text.into_bytes(),
            strategy: recovered.method.name(),
            origin: Origin::Text,
            verified: false,
        },
        Err(no_text) => {
            let mut attempts = chain_failure.attempts;
            attempts.extend(no_text.attempts);
            RecoveryResult::Failed { attempts }
        }
    }
}

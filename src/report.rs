//! The outcome of one carving pass.
//!
//! A [`Report`] keeps every carved entry in scan order together with its
//! [`RecoveryResult`], plus the candidates that never became entries. It is
//! plain data; printing and writing happen elsewhere.

use serde::{Serialize, Serializer};

use crate::error::CandidateError;
use crate::recovery::Attempt;
use crate::zip::Entry;

/// Which half of the recovery pipeline produced the bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Origin {
    Decompressed,
    Text,
}

/// Outcome for one entry.
///
/// Serializes without the recovered bytes, only their length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum RecoveryResult {
    Recovered {
        #[serde(rename = "size", serialize_with = "serialize_len")]
        bytes: Vec<u8>,
        strategy: &'static str,
        origin: Origin,
        /// Output matched the header's CRC and size
        verified: bool,
    },
    Failed {
        attempts: Vec<Attempt>,
    },
}

fn serialize_len<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(bytes.len() as u64)
}

impl RecoveryResult {
    pub fn is_recovered(&self) -> bool {
        matches!(self, RecoveryResult::Recovered { .. })
    }

    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            RecoveryResult::Recovered { bytes, .. } => Some(bytes),
            RecoveryResult::Failed { .. } => None,
        }
    }

    /// Strategy name, or "failed"
    pub fn strategy(&self) -> &'static str {
        match self {
            RecoveryResult::Recovered { strategy, .. } => strategy,
            RecoveryResult::Failed { .. } => "failed",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    #[serde(flatten)]
    pub entry: Entry,
    pub result: RecoveryResult,
}

/// A signature hit that did not yield an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedCandidate {
    pub offset: usize,
    pub error: CandidateError,
}

/// Counters over a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub entries: usize,
    pub recovered: usize,
    pub verified: usize,
    pub text_only: usize,
    pub failed: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub buffer_len: usize,
    pub entries: Vec<ReportEntry>,
    pub skipped: Vec<SkippedCandidate>,
    /// Scanning stopped at the candidate limit; later entries were not seen
    pub candidate_cap_hit: bool,
}

impl Report {
    pub fn new(buffer_len: usize) -> Self {
        Self {
            buffer_len,
            ..Default::default()
        }
    }

    pub fn push(&mut self, entry: Entry, result: RecoveryResult) {
        self.entries.push(ReportEntry { entry, result });
    }

    pub fn skip(&mut self, offset: usize, error: CandidateError) {
        self.skipped.push(SkippedCandidate { offset, error });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Entry, &RecoveryResult)> {
        self.entries.iter().map(|e| (&e.entry, &e.result))
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary {
            entries: self.entries.len(),
            skipped: self.skipped.len(),
            ..Default::default()
        };
        for (_, result) in self.iter() {
            match result {
                RecoveryResult::Recovered {
                    origin, verified, ..
                } => {
                    summary.recovered += 1;
                    if *verified {
                        summary.verified += 1;
                    }
                    if *origin == Origin::Text {
                        summary.text_only += 1;
                    }
                }
                RecoveryResult::Failed { .. } => summary.failed += 1,
            }
        }
        summary
    }

    /// Pretty JSON document: summary first, then entries and skips
    pub fn to_json(&self) -> serde_json::Result<String> {
        #[derive(Serialize)]
        struct Document<'a> {
            summary: Summary,
            #[serde(flatten)]
            report: &'a Report,
        }

        serde_json::to_string_pretty(&Document {
            summary: self.summary(),
            report: self,
        })
    }
}

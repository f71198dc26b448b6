use crate::config::CarveOptions;
use crate::error::CandidateError;
use crate::recovery::{DecodeHint, recover_payload};
use crate::report::{RecoveryResult, Report};

use super::boundary::resolve;
use super::parser::{file_name, parse};
use super::scanner::{ScanMode, scan};
use super::structures::{Entry, LFH_SIGNATURE};

/// Carves local file entries out of a buffer and recovers their payloads.
///
/// The carver holds only its options, so one instance can be shared
/// across threads and buffers.
#[derive(Debug, Clone, Default)]
pub struct Carver {
    options: CarveOptions,
}

impl Carver {
    pub fn new(options: CarveOptions) -> Self {
        Self { options }
    }

    /// Run one full pass over `buffer`.
    ///
    /// Always returns a report. Candidates that do not parse or resolve are
    /// listed as skipped; entries whose payload cannot be recovered are
    /// kept with a [`RecoveryResult::Failed`].
    pub fn carve(&self, buffer: &[u8]) -> Report {
        let mut report = Report::new(buffer.len());
        let candidates = scan(buffer, LFH_SIGNATURE, ScanMode::Exclusive);

        for (seen, offset) in candidates.enumerate() {
            if seen == self.options.max_candidates {
                report.candidate_cap_hit = true;
                tracing::warn!(
                    offset,
                    limit = self.options.max_candidates,
                    "candidate limit reached, stopping scan"
                );
                break;
            }

            match self.locate(buffer, offset) {
                Ok(entry) => {
                    let result = self.recover(buffer, &entry);
                    report.push(entry, result);
                }
                Err(e) => {
                    tracing::warn!(offset, "skipping candidate: {}", e);
                    report.skip(offset, e);
                }
            }
        }

        let summary = report.summary();
        tracing::debug!(
            entries = summary.entries,
            recovered = summary.recovered,
            failed = summary.failed,
            skipped = summary.skipped,
            "carving pass finished"
        );
        report
    }

    /// Parse and bound the entry whose header sits at `offset`
    pub fn locate(&self, buffer: &[u8], offset: usize) -> Result<Entry, CandidateError> {
        let header = parse(buffer, offset)?;
        let boundary = resolve(buffer, &header, offset)?;
        let file_name = file_name(buffer, offset, &header);

        tracing::debug!(
            offset,
            name = %file_name,
            method = header.compression_method.as_u16(),
            start = boundary.payload_start,
            end = boundary.payload_end,
            boundary = boundary.source.label(),
            "carved entry"
        );

        Ok(Entry {
            file_name,
            header_offset: offset,
            payload_start: boundary.payload_start,
            payload_end: boundary.payload_end,
            boundary: boundary.source,
            header,
        })
    }

    pub fn recover(&self, buffer: &[u8], entry: &Entry) -> RecoveryResult {
        if entry.header.is_encrypted() {
            tracing::debug!(name = %entry.file_name, "entry is flagged as encrypted");
        }
        let hint = DecodeHint::from_header(&entry.header);
        recover_payload(entry.payload(buffer), &hint, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;
    use crate::report::Origin;

    fn stored(name: &str, payload: &[u8]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(LFH_SIGNATURE);
        data.extend_from_slice(&[20, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        data.extend_from_slice(&crc32fast::hash(payload).to_le_bytes());
        data.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        data.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        data.extend_from_slice(&(name.len() as u16).to_le_bytes());
        data.extend_from_slice(&0u16.to_le_bytes());
        data.extend_from_slice(name.as_bytes());
        data.extend_from_slice(payload);
        data
    }

    #[test]
    fn empty_buffer_gives_empty_report() {
        let report = Carver::default().carve(b"");
        assert!(report.is_empty());
        assert!(report.skipped.is_empty());
        assert!(!report.candidate_cap_hit);
    }

    #[test]
    fn stored_entry_is_verified() {
        let buffer = stored("A", b"hello");
        let report = Carver::default().carve(&buffer);
        assert_eq!(report.len(), 1);
        match &report.entries[0].result {
            RecoveryResult::Recovered {
                bytes,
                strategy,
                origin,
                verified,
            } => {
                assert_eq!(bytes, b"hello");
                assert_eq!(*strategy, "stored");
                assert_eq!(*origin, Origin::Decompressed);
                assert!(*verified);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn truncated_trailing_header_is_skipped() {
        let mut buffer = stored("A", b"hello");
        buffer.extend_from_slice(b"PK\x03\x04\x14\x00");
        let report = Carver::default().carve(&buffer);
        assert_eq!(report.len(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].offset, 36);
        assert_eq!(
            report.skipped[0].error,
            CandidateError::Parse(ParseError::Truncated { available: 6 })
        );
    }

    #[test]
    fn candidate_cap_stops_the_scan() {
        let mut buffer = Vec::new();
        for name in ["A", "B", "C"] {
            buffer.extend(stored(name, b"hello"));
        }
        let carver = Carver::new(CarveOptions::default().with_max_candidates(2));
        let report = carver.carve(&buffer);
        assert_eq!(report.len(), 2);
        assert!(report.candidate_cap_hit);

        let report = Carver::default().carve(&buffer);
        assert_eq!(report.len(), 3);
        assert!(!report.candidate_cap_hit);
    }

    #[test]
    fn carver_is_reentrant() {
        let buffer = stored("A", b"hello");
        let carver = Carver::default();
        let first = carver.carve(&buffer);
        let second = carver.carve(&buffer);
        assert_eq!(first.summary(), second.summary());
        assert_eq!(first.entries[0].result, second.entries[0].result);
    }
}

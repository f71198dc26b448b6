//! Tuning knobs for carving and searching.
//!
//! Everything has a default that works on the dumps this tool targets; the
//! CLI only overrides what the user passes explicitly.

use crate::recovery::Codepage;
use crate::recovery::strategy::DEFAULT_MAX_OUTPUT;
use crate::recovery::text::DEFAULT_MIN_RUN_LEN;

/// Upper bound on local header candidates examined in one pass
pub const DEFAULT_MAX_CANDIDATES: usize = 65_536;

/// Bytes of context shown on each side of a keyword hit
pub const DEFAULT_CONTEXT: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarveOptions {
    pub max_candidates: usize,
    pub min_run_len: usize,
    pub max_output_size: usize,
    /// Tried in order; the first readable decoding wins
    pub codepages: Vec<Codepage>,
}

impl Default for CarveOptions {
    fn default() -> Self {
        Self {
            max_candidates: DEFAULT_MAX_CANDIDATES,
            min_run_len: DEFAULT_MIN_RUN_LEN,
            max_output_size: DEFAULT_MAX_OUTPUT,
            codepages: Codepage::ALL.to_vec(),
        }
    }
}

impl CarveOptions {
    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = max_candidates;
        self
    }

    pub fn with_min_run_len(mut self, min_run_len: usize) -> Self {
        self.min_run_len = min_run_len.max(1);
        self
    }

    pub fn with_max_output_size(mut self, max_output_size: usize) -> Self {
        self.max_output_size = max_output_size;
        self
    }

    pub fn with_codepages(mut self, codepages: impl IntoIterator<Item = Codepage>) -> Self {
        self.codepages = codepages.into_iter().collect();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub context: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            context: DEFAULT_CONTEXT,
        }
    }
}

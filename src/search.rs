//! Keyword search and artifact extraction over recovered bytes.
//!
//! Terms are matched ASCII case-insensitively in one pass. Each hit is
//! widened to the identifier it starts (so `FIRE` reports `FIREID1`) and
//! comes with a little surrounding context.
//!
//! [`ArtifactExtractor`] looks for a fixed set of things worth reporting in
//! mainframe transfer dumps: email addresses, user identifiers and NETDATA
//! control record names.

use std::collections::HashSet;

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, BuildError, MatchKind};
use regex::bytes::Regex;
use serde::Serialize;

use crate::config::SearchOptions;
use crate::error::ExtractorError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordMatch {
    /// The search term as given
    pub term: String,
    pub offset: usize,
    /// The match extended over trailing word characters
    pub token: String,
    /// Nearby bytes, whitespace collapsed
    pub context: String,
}

pub struct KeywordSearch {
    terms: Vec<String>,
    matcher: AhoCorasick,
    options: SearchOptions,
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl KeywordSearch {
    /// Build a matcher for `terms`; empty terms are ignored.
    pub fn new<I, S>(terms: I, options: SearchOptions) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms: Vec<String> = terms
            .into_iter()
            .map(|t| t.as_ref().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        let matcher = AhoCorasickBuilder::new()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::LeftmostLongest)
            .build(&terms)?;
        Ok(Self {
            terms,
            matcher,
            options,
        })
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Non-overlapping matches in `haystack`, by offset
    pub fn find(&self, haystack: &[u8]) -> Vec<KeywordMatch> {
        self.matcher
            .find_iter(haystack)
            .map(|m| {
                let token_end = haystack[m.end()..]
                    .iter()
                    .position(|&b| !is_word_byte(b))
                    .map_or(haystack.len(), |n| m.end() + n);
                let ctx_start = m.start().saturating_sub(self.options.context);
                let ctx_end = m.end().saturating_add(self.options.context).min(haystack.len());

                KeywordMatch {
                    term: self.terms[m.pattern().as_usize()].clone(),
                    offset: m.start(),
                    token: String::from_utf8_lossy(&haystack[m.start()..token_end]).into_owned(),
                    context: collapse_whitespace(&String::from_utf8_lossy(
                        &haystack[ctx_start..ctx_end],
                    )),
                }
            })
            .collect()
    }
}

const EMAIL_PATTERN: &str = r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}";

const USER_ID_PATTERN: &str =
    r"(?-u:\b)(?:USER[A-Za-z0-9_]+|[A-Z][A-Z0-9]{2,7}|[A-Z]{3,8}[0-9]{0,3})(?-u:\b)";

/// Record and field names of an IBM NETDATA (TSO TRANSMIT) stream
pub const NETDATA_HEADERS: [&str; 7] = [
    "ORIGNODE", "ORIGUID", "DESTNODE", "DESTUID", "NETDATA", "INMR01", "INMR02",
];

/// Upper-case English words that look like user IDs
const COMMON_WORDS: [&str; 46] = [
    "THE", "AND", "FOR", "NOT", "BUT", "YOU", "ALL", "CAN", "HER", "WAS", "ONE", "OUR", "HAD",
    "WITH", "HAVE", "THIS", "WILL", "ARE", "FROM", "THEY", "KNOW", "WANT", "BEEN", "GOOD", "MUCH",
    "SOME", "TIME", "VERY", "WHEN", "COME", "HERE", "HOW", "JUST", "LIKE", "LONG", "MAKE", "MANY",
    "OVER", "SUCH", "TAKE", "THAN", "THEM", "WELL", "WERE", "WHAT", "YOUR",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    Email,
    UserId,
    NetdataHeader,
}

impl ArtifactKind {
    pub fn label(&self) -> &'static str {
        match self {
            ArtifactKind::Email => "email",
            ArtifactKind::UserId => "user-id",
            ArtifactKind::NetdataHeader => "netdata",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub offset: usize,
    pub value: String,
}

/// Pulls emails, user identifiers and NETDATA headers out of recovered
/// content.
///
/// Emails and user IDs are reported once, at their first offset. NETDATA
/// headers are reported at every offset since their positions tell where
/// control records sit.
pub struct ArtifactExtractor {
    email: Regex,
    user_id: Regex,
    netdata: AhoCorasick,
}

impl ArtifactExtractor {
    pub fn new() -> Result<Self, ExtractorError> {
        Ok(Self {
            email: Regex::new(EMAIL_PATTERN)?,
            user_id: Regex::new(USER_ID_PATTERN)?,
            netdata: AhoCorasick::new(NETDATA_HEADERS)?,
        })
    }

    /// Everything found in `haystack`, ordered by offset
    pub fn extract(&self, haystack: &[u8]) -> Vec<Artifact> {
        let mut seen = HashSet::new();
        let mut found = Vec::new();

        let mut first_of = |kind: ArtifactKind, offset: usize, bytes: &[u8]| {
            let value = String::from_utf8_lossy(bytes).into_owned();
            if seen.insert((kind, value.clone())) {
                found.push(Artifact { kind, offset, value });
            }
        };
        for m in self.email.find_iter(haystack) {
            first_of(ArtifactKind::Email, m.start(), m.as_bytes());
        }
        for m in self.user_id.find_iter(haystack) {
            let word = m.as_bytes();
            let ignored = COMMON_WORDS
                .iter()
                .chain(&NETDATA_HEADERS)
                .any(|w| w.as_bytes() == word);
            if !ignored {
                first_of(ArtifactKind::UserId, m.start(), word);
            }
        }

        found.extend(self.netdata.find_iter(haystack).map(|m| Artifact {
            kind: ArtifactKind::NetdataHeader,
            offset: m.start(),
            value: NETDATA_HEADERS[m.pattern().as_usize()].to_string(),
        }));
        found.sort_by_key(|a| (a.offset, a.kind));
        found
    }
}

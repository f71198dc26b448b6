//! Text recovery for payloads no decompressor accepts.

use std::borrow::Cow;

use serde::Serialize;

use crate::error::NoReadableContent;

use super::codepage::{self, Codepage};
use super::Attempt;

/// Shortest run worth keeping
pub const DEFAULT_MIN_RUN_LEN: usize = 5;

const PRINTABLE_RUNS: &str = "printable-runs";

/// Which pass produced the recovered text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextMethod {
    PrintableRuns,
    Codepage(Codepage),
}

impl TextMethod {
    pub fn name(&self) -> &'static str {
        match self {
            TextMethod::PrintableRuns => PRINTABLE_RUNS,
            TextMethod::Codepage(cp) => cp.strategy_name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveredText {
    pub text: String,
    pub method: TextMethod,
}

fn is_printable(b: u8) -> bool {
    matches!(b, 0x20..=0x7E | b'\t' | b'\n' | b'\r')
}

/// Lazy iterator over printable ASCII runs of at least `min_len` bytes
pub struct PrintableRuns<'a> {
    data: &'a [u8],
    pos: usize,
    min_len: usize,
}

impl<'a> PrintableRuns<'a> {
    pub fn new(data: &'a [u8], min_len: usize) -> Self {
        Self {
            data,
            pos: 0,
            min_len: min_len.max(1),
        }
    }
}

impl<'a> Iterator for PrintableRuns<'a> {
    type Item = Cow<'a, str>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.data.len() {
            let rest = &self.data[self.pos..];
            let start = match rest.iter().position(|&b| is_printable(b)) {
                Some(i) => self.pos + i,
                None => {
                    self.pos = self.data.len();
                    return None;
                }
            };
            let len = self.data[start..]
                .iter()
                .position(|&b| !is_printable(b))
                .unwrap_or(self.data.len() - start);
            self.pos = start + len;
            if len >= self.min_len {
                // Printable bytes are ASCII, so this never allocates.
                return Some(String::from_utf8_lossy(&self.data[start..start + len]));
            }
        }
        None
    }
}

/// Printable runs joined with newlines, or `None` when there are none
pub fn printable_text(data: &[u8], min_len: usize) -> Option<String> {
    let runs: Vec<_> = PrintableRuns::new(data, min_len).collect();
    if runs.is_empty() {
        None
    } else {
        Some(runs.join("\n"))
    }
}

/// First codepage in `codepages` whose decoding looks like text
pub fn decode_codepages(data: &[u8], codepages: &[Codepage]) -> Option<(Codepage, String)> {
    codepages.iter().find_map(|&cp| {
        let text = codepage::decode(data, cp);
        codepage::looks_readable(&text).then_some((cp, text))
    })
}

/// Characters a reader would recognise as plain text.
///
/// Single-byte codepages decode every byte to something, so raw
/// character counts cannot compare the two passes; this count can.
fn readable_len(text: &str) -> usize {
    text.chars()
        .filter(|&c| c.is_ascii_graphic() || matches!(c, ' ' | '\t' | '\n' | '\r'))
        .count()
}

/// Recover readable text from `payload`.
///
/// Both passes run. The text with more readable characters wins, then the
/// one with more bytes; a full tie goes to printable runs.
///
/// # Errors
///
/// [`NoReadableContent`] listing both passes when neither finds text.
pub fn fallback(
    payload: &[u8],
    min_run_len: usize,
    codepages: &[Codepage],
) -> Result<RecoveredText, NoReadableContent> {
    let runs = printable_text(payload, min_run_len).map(|text| RecoveredText {
        text,
        method: TextMethod::PrintableRuns,
    });
    let decoded = decode_codepages(payload, codepages).map(|(cp, text)| RecoveredText {
        text,
        method: TextMethod::Codepage(cp),
    });

    match (runs, decoded) {
        (Some(runs), Some(decoded)) => {
            let key = |r: &RecoveredText| (readable_len(&r.text), r.text.len());
            if key(&decoded) > key(&runs) {
                Ok(decoded)
            } else {
                Ok(runs)
            }
        }
        (Some(found), None) | (None, Some(found)) => Ok(found),
        (None, None) => Err(NoReadableContent {
            attempts: vec![
                Attempt::failed(
                    PRINTABLE_RUNS,
                    format!("no printable run of {} bytes or more", min_run_len),
                ),
                Attempt::failed(
                    "legacy-codepages",
                    format!(
                        "no readable line under {}",
                        codepages
                            .iter()
                            .map(Codepage::name)
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                ),
            ],
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn short_runs_are_noise() {
        let data = b"\x00abcd\x01longer run\xff\xfeok\x00";
        let runs: Vec<_> = PrintableRuns::new(data, 5).collect();
        assert_eq!(runs, vec!["longer run"]);
    }

    #[test]
    fn run_at_end_of_payload_is_kept() {
        let data = b"\x00\x00tail run";
        assert_eq!(printable_text(data, 5).as_deref(), Some("tail run"));
    }

    #[test]
    fn whitespace_controls_extend_runs() {
        let data = b"\x80line one\r\n\tline two\x81";
        assert_eq!(
            printable_text(data, 5).as_deref(),
            Some("line one\r\n\tline two")
        );
    }

    #[test]
    fn runs_are_joined_with_newlines() {
        let data = b"first\x00\x00second\x00x\x00third";
        assert_eq!(
            printable_text(data, 5).as_deref(),
            Some("first\nsecond\nthird")
        );
    }

    #[test]
    fn ebcdic_payload_is_decoded() {
        // "USERID FIRE01" in cp037 followed by a cp037 newline
        let payload = [
            0xE4, 0xE2, 0xC5, 0xD9, 0xC9, 0xC4, 0x40, 0xC6, 0xC9, 0xD9, 0xC5, 0xF0, 0xF1, 0x25,
        ];
        let text = fallback(&payload, 5, &Codepage::ALL).unwrap();
        assert_eq!(text.method, TextMethod::Codepage(Codepage::Cp037));
        assert_eq!(text.text, "USERID FIRE01\n");
    }

    #[test]
    fn ascii_payload_is_not_garbled_by_codepages() {
        // Every byte here also decodes under cp037, mostly to accented
        // letters and symbols.
        let payload = b"\x00\x00USER=FIREID1 GROUP=OPS\n\x00";
        let text = fallback(payload, 5, &Codepage::ALL).unwrap();
        assert_eq!(text.method, TextMethod::PrintableRuns);
        assert_eq!(text.text, "USER=FIREID1 GROUP=OPS\n");
    }

    #[test]
    fn readable_len_ignores_controls_and_latin1() {
        assert_eq!(readable_len("ab c\n"), 5);
        assert_eq!(readable_len("\u{85}\u{9c}ÂÄ"), 0);
    }

    #[test]
    fn ascii_payload_without_codepages() {
        let payload = b"\x00\x00\x00plain ascii text\x00";
        let text = fallback(payload, 5, &[]).unwrap();
        assert_eq!(text.method, TextMethod::PrintableRuns);
        assert_eq!(text.text, "plain ascii text");
    }

    #[test]
    fn garbage_has_no_readable_content() {
        let payload = [0x00, 0x01, 0x02, 0x03, 0xFF];
        let err = fallback(&payload, 5, &Codepage::ALL).unwrap_err();
        assert_eq!(err.attempts.len(), 2);
        assert_eq!(err.attempts[0].strategy, "printable-runs");
    }

    proptest! {
        #[test]
        fn printable_payload_is_one_run(payload in proptest::collection::vec(0x20u8..=0x7E, 5..256)) {
            let runs: Vec<_> = PrintableRuns::new(&payload, 5).collect();
            prop_assert_eq!(runs.len(), 1);
            prop_assert_eq!(runs[0].as_bytes(), &payload[..]);
        }

        #[test]
        fn fallback_never_panics(payload in proptest::collection::vec(any::<u8>(), 0..512)) {
            let _ = fallback(&payload, 5, &Codepage::ALL);
        }
    }
}

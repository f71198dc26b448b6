use anyhow::{Context, Result, bail};
use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

use crate::zip::LFH_SIGNATURE;

/// Lenient decoder: padding optional, stray trailing bits tolerated
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// How the dump bytes are wrapped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// Already binary
    Raw,
    /// Line-wrapped base64 text
    Base64,
}

impl Container {
    /// Base64 only when every byte is alphabet, padding or whitespace.
    pub fn detect(data: &[u8]) -> Self {
        if data.starts_with(LFH_SIGNATURE) {
            return Container::Raw;
        }
        let text_only = data
            .iter()
            .all(|&b| is_base64_char(b) || b == b'=' || b.is_ascii_whitespace());
        if text_only && data.iter().copied().any(is_base64_char) {
            Container::Base64
        } else {
            Container::Raw
        }
    }

    pub fn decode(self, data: Vec<u8>) -> Result<Vec<u8>> {
        match self {
            Container::Raw => Ok(data),
            Container::Base64 => unwrap_base64(&data),
        }
    }
}

fn is_base64_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'-' | b'_')
}

/// Decode base64 text that may be line-wrapped, padded or not, and mixed
/// with stray characters.
///
/// URL-safe `-` and `_` are read as `+` and `/`. Everything else outside
/// the alphabet, padding included, is dropped before decoding. A dangling
/// final character that cannot form a byte is ignored.
pub fn unwrap_base64(text: &[u8]) -> Result<Vec<u8>> {
    let mut cleaned: Vec<u8> = text
        .iter()
        .filter_map(|&b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'+' | b'/' => Some(b),
            b'-' => Some(b'+'),
            b'_' => Some(b'/'),
            _ => None,
        })
        .collect();

    if cleaned.is_empty() {
        bail!("no base64 content found");
    }
    if cleaned.len() % 4 == 1 {
        tracing::debug!(len = cleaned.len(), "dropping dangling base64 character");
        cleaned.pop();
    }

    LENIENT
        .decode(&cleaned)
        .with_context(|| format!("invalid base64 ({} characters)", cleaned.len()))
}

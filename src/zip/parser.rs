//! Defensive local file header parsing.
//!
//! Headers are read at arbitrary candidate offsets produced by the
//! scanner, so every read is bounds-checked and nothing is trusted beyond
//! the 4-byte signature. Checksums are recorded but never enforced: the
//! dumps this tool works on are known to carry wrong CRCs and sizes.

use crate::error::ParseError;

use super::structures::{LFH_SIZE, LocalFileHeader};

/// Parse the local file header at `offset`.
///
/// # Errors
///
/// [`ParseError::Truncated`] when fewer than 30 bytes remain from
/// `offset`, [`ParseError::BadSignature`] when the magic does not match.
pub fn parse(buffer: &[u8], offset: usize) -> Result<LocalFileHeader, ParseError> {
    let data = buffer.get(offset..).unwrap_or_default();
    if data.len() < LFH_SIZE {
        return Err(ParseError::Truncated {
            available: data.len(),
        });
    }
    LocalFileHeader::from_bytes(&data[..LFH_SIZE])
}

/// Decode the filename that follows the header at `offset`.
///
/// Bytes past the end of the buffer are ignored. UTF-8 is used when the
/// header says so or the bytes happen to be valid; anything else is
/// converted lossily.
pub fn file_name(buffer: &[u8], offset: usize, header: &LocalFileHeader) -> String {
    let start = offset.saturating_add(LFH_SIZE).min(buffer.len());
    let end = start
        .saturating_add(header.file_name_length as usize)
        .min(buffer.len());
    let raw = &buffer[start..end];

    match std::str::from_utf8(raw) {
        Ok(name) => name.to_string(),
        Err(_) => {
            if !header.is_utf8() {
                tracing::debug!(offset, "filename is not UTF-8, decoding lossily");
            }
            String::from_utf8_lossy(raw).to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zip::structures::{CompressionMethod, LFH_SIGNATURE};

    fn entry_bytes(name: &[u8], method: u16, payload: &[u8]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(LFH_SIGNATURE);
        data.extend_from_slice(&20u16.to_le_bytes());
        data.extend_from_slice(&0u16.to_le_bytes());
        data.extend_from_slice(&method.to_le_bytes());
        data.extend_from_slice(&0u16.to_le_bytes());
        data.extend_from_slice(&0u16.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        data.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        data.extend_from_slice(&(name.len() as u16).to_le_bytes());
        data.extend_from_slice(&0u16.to_le_bytes());
        data.extend_from_slice(name);
        data.extend_from_slice(payload);
        data
    }

    #[test]
    fn parses_at_offset() {
        let mut buffer = b"junk".to_vec();
        buffer.extend(entry_bytes(b"A", 0, b"hello"));

        let header = parse(&buffer, 4).unwrap();
        assert_eq!(header.compression_method, CompressionMethod::Stored);
        assert_eq!(header.compressed_size, 5);
        assert_eq!(file_name(&buffer, 4, &header), "A");
    }

    #[test]
    fn truncated_near_end() {
        let buffer = entry_bytes(b"A", 0, b"");
        assert_eq!(
            parse(&buffer, 10),
            Err(ParseError::Truncated {
                available: buffer.len() - 10
            })
        );
        assert_eq!(
            parse(&buffer, buffer.len() + 5),
            Err(ParseError::Truncated { available: 0 })
        );
    }

    #[test]
    fn bad_signature() {
        let mut buffer = entry_bytes(b"A", 0, b"hello");
        buffer[3] = 0x09;
        assert_eq!(
            parse(&buffer, 0),
            Err(ParseError::BadSignature {
                found: [b'P', b'K', 0x03, 0x09]
            })
        );
    }

    #[test]
    fn file_name_clamped_and_lossy() {
        let mut buffer = entry_bytes(b"REPORT.TXT", 8, b"");
        buffer.truncate(LFH_SIZE + 6);
        let header = parse(&buffer, 0).unwrap();
        assert_eq!(file_name(&buffer, 0, &header), "REPORT");

        let buffer = entry_bytes(&[0x51, 0xC1, 0x31], 8, b"");
        let header = parse(&buffer, 0).unwrap();
        assert_eq!(file_name(&buffer, 0, &header), "Q\u{FFFD}1");
    }
}

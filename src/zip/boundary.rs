//! Payload boundary resolution.
//!
//! Declared sizes in carved headers are untrustworthy, so the resolver
//! trades precision for availability: it only fails when the header
//! itself points past the buffer, and otherwise degrades to the next
//! signature or the end of the buffer.

use crate::error::ResolveError;

use super::scanner::find_first_of;
use super::structures::{BOUNDARY_SIGNATURES, BoundarySource, LocalFileHeader};

/// Resolved payload range of one entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundary {
    pub payload_start: usize,
    pub payload_end: usize,
    pub source: BoundarySource,
}

/// Resolve the payload range of the entry whose header sits at `offset`.
///
/// The declared compressed size is used when it fits. Otherwise the
/// payload ends at the first local header, central directory header or
/// end-of-central-directory signature at or after the payload start, and
/// failing that at the end of the buffer.
///
/// # Errors
///
/// [`ResolveError::Unbounded`] when the payload would start beyond the
/// end of the buffer.
pub fn resolve(
    buffer: &[u8],
    header: &LocalFileHeader,
    offset: usize,
) -> Result<Boundary, ResolveError> {
    let payload_start = offset.saturating_add(header.variable_len());
    if payload_start > buffer.len() {
        return Err(ResolveError::Unbounded {
            payload_start,
            buffer_len: buffer.len(),
        });
    }

    let declared_end = payload_start.checked_add(header.compressed_size as usize);
    if let Some(end) = declared_end.filter(|&end| end <= buffer.len()) {
        return Ok(Boundary {
            payload_start,
            payload_end: end,
            source: BoundarySource::Declared,
        });
    }

    tracing::debug!(
        offset,
        declared = header.compressed_size,
        available = buffer.len() - payload_start,
        "declared size overruns buffer"
    );

    let (payload_end, source) = match find_first_of(buffer, BOUNDARY_SIGNATURES, payload_start) {
        Some(next) => (next, BoundarySource::NextSignature),
        None => (buffer.len(), BoundarySource::EndOfBuffer),
    };

    Ok(Boundary {
        payload_start,
        payload_end,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zip::parser::parse;
    use crate::zip::structures::{EOCD_SIGNATURE, LFH_SIGNATURE};

    fn header(name_len: u16, extra_len: u16, compressed_size: u32) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(LFH_SIGNATURE);
        data.extend_from_slice(&[20, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&compressed_size.to_le_bytes());
        data.extend_from_slice(&compressed_size.to_le_bytes());
        data.extend_from_slice(&name_len.to_le_bytes());
        data.extend_from_slice(&extra_len.to_le_bytes());
        data
    }

    #[test]
    fn declared_size_inside_buffer() {
        let mut buffer = header(1, 2, 5);
        buffer.extend_from_slice(b"Axx");
        buffer.extend_from_slice(b"hello");
        buffer.extend_from_slice(b"trailing");

        let h = parse(&buffer, 0).unwrap();
        let boundary = resolve(&buffer, &h, 0).unwrap();
        assert_eq!(boundary.payload_start, 33);
        assert_eq!(boundary.payload_end, 38);
        assert_eq!(boundary.source, BoundarySource::Declared);
    }

    #[test]
    fn overrun_falls_back_to_next_signature() {
        let mut buffer = header(1, 0, 10_000);
        buffer.extend_from_slice(b"A");
        buffer.extend_from_slice(b"payload");
        let eocd_at = buffer.len();
        buffer.extend_from_slice(EOCD_SIGNATURE);
        buffer.extend_from_slice(&[0u8; 18]);

        let h = parse(&buffer, 0).unwrap();
        let boundary = resolve(&buffer, &h, 0).unwrap();
        assert_eq!(boundary.payload_end, eocd_at);
        assert_eq!(boundary.source, BoundarySource::NextSignature);
    }

    #[test]
    fn overrun_without_signature_clamps() {
        let mut buffer = header(1, 0, u32::MAX);
        buffer.extend_from_slice(b"Apayload");

        let h = parse(&buffer, 0).unwrap();
        let boundary = resolve(&buffer, &h, 0).unwrap();
        assert_eq!(boundary.payload_start, 31);
        assert_eq!(boundary.payload_end, buffer.len());
        assert_eq!(boundary.source, BoundarySource::EndOfBuffer);
        assert!(boundary.payload_end - boundary.payload_start <= buffer.len() - 31);
    }

    #[test]
    fn header_past_end_is_unbounded() {
        let mut buffer = header(200, 0, 0);
        buffer.extend_from_slice(b"short");

        let h = parse(&buffer, 0).unwrap();
        assert_eq!(
            resolve(&buffer, &h, 0),
            Err(ResolveError::Unbounded {
                payload_start: 230,
                buffer_len: 35
            })
        );
    }

    #[test]
    fn empty_payload_at_end_is_fine() {
        let mut buffer = header(1, 0, 0);
        buffer.extend_from_slice(b"A");

        let h = parse(&buffer, 0).unwrap();
        let boundary = resolve(&buffer, &h, 0).unwrap();
        assert_eq!(boundary.payload_start, buffer.len());
        assert_eq!(boundary.payload_end, buffer.len());
    }
}

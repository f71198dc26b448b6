//! Ordered decompression strategies.
//!
//! Each strategy is a pure function of the payload. The chain runs them in
//! a fixed order and keeps the first output that agrees with the header;
//! when nothing agrees, the first output of any kind is used.

use std::io::Read;

use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use flate2::{Decompress, FlushDecompress, Status};

use crate::error::{AllStrategiesFailed, DecodeError};
use crate::zip::CompressionMethod;

use super::{Attempt, DecodeHint};

/// Default cap on the size of any single decoded payload
pub const DEFAULT_MAX_OUTPUT: usize = 64 * 1024 * 1024;

/// First output allocation for inflate; the buffer doubles from here
const INITIAL_OUTPUT: usize = 256 * 1024;

/// One way of turning a payload back into file content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Deflate with no zlib framing
    RawDeflate,
    /// Deflate inside a zlib header and Adler-32 trailer
    ZlibDeflate,
    /// Raw deflate after dropping a few leading bytes of framing drift
    RawDeflateSkip(usize),
    Gzip,
    Bzip2,
    /// Identity, only for entries declared as stored
    Stored,
}

/// The chain, in the order it is tried
pub const CHAIN: [Strategy; 8] = [
    Strategy::RawDeflate,
    Strategy::ZlibDeflate,
    Strategy::RawDeflateSkip(1),
    Strategy::RawDeflateSkip(2),
    Strategy::RawDeflateSkip(4),
    Strategy::Gzip,
    Strategy::Bzip2,
    Strategy::Stored,
];

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::RawDeflate => "raw-deflate",
            Strategy::ZlibDeflate => "zlib-deflate",
            Strategy::RawDeflateSkip(1) => "raw-deflate-skip-1",
            Strategy::RawDeflateSkip(2) => "raw-deflate-skip-2",
            Strategy::RawDeflateSkip(4) => "raw-deflate-skip-4",
            Strategy::RawDeflateSkip(_) => "raw-deflate-skip-n",
            Strategy::Gzip => "gzip",
            Strategy::Bzip2 => "bzip2",
            Strategy::Stored => "stored",
        }
    }

    /// Decode `payload`, producing at most `limit` bytes.
    pub fn apply(
        &self,
        payload: &[u8],
        method: CompressionMethod,
        limit: usize,
    ) -> Result<Vec<u8>, DecodeError> {
        if payload.is_empty() && *self != Strategy::Stored {
            return Err(DecodeError::Empty);
        }
        match *self {
            Strategy::RawDeflate => inflate(payload, false, limit),
            Strategy::ZlibDeflate => inflate(payload, true, limit),
            Strategy::RawDeflateSkip(skip) => {
                let rest = payload
                    .get(skip..)
                    .filter(|rest| !rest.is_empty())
                    .ok_or(DecodeError::TooShort { skip })?;
                inflate(rest, false, limit)
            }
            Strategy::Gzip => read_limited(GzDecoder::new(payload), limit),
            Strategy::Bzip2 => read_limited(BzDecoder::new(payload), limit),
            Strategy::Stored => match method {
                CompressionMethod::Stored if payload.len() <= limit => Ok(payload.to_vec()),
                CompressionMethod::Stored => Err(DecodeError::OutputLimit { limit }),
                other => Err(DecodeError::NotStored {
                    method: other.as_u16(),
                }),
            },
        }
    }
}

/// Inflate a deflate stream, requiring its end-of-stream marker.
///
/// A stream that simply runs out of input is an error here; the streaming
/// readers would report it as a short successful read.
pub fn inflate(data: &[u8], zlib_header: bool, limit: usize) -> Result<Vec<u8>, DecodeError> {
    let ceiling = limit.saturating_add(1);
    let mut decoder = Decompress::new(zlib_header);
    let initial = data.len().saturating_mul(2).clamp(64, INITIAL_OUTPUT);
    let mut out = Vec::with_capacity(initial.min(ceiling));

    loop {
        if out.len() == out.capacity() {
            let grow = out.capacity().max(4096).min(ceiling - out.len());
            out.reserve_exact(grow);
        }

        let before_in = decoder.total_in();
        let before_out = decoder.total_out();
        let consumed = usize::try_from(before_in).unwrap_or(data.len()).min(data.len());
        let status = decoder
            .decompress_vec(&data[consumed..], &mut out, FlushDecompress::None)
            .map_err(|e| DecodeError::Corrupt(e.to_string()))?;

        if out.len() > limit {
            return Err(DecodeError::OutputLimit { limit });
        }
        if status == Status::StreamEnd {
            return Ok(out);
        }

        // Stalled with room to spare: the input ended before the stream did.
        let progressed = decoder.total_in() != before_in || decoder.total_out() != before_out;
        if !progressed && out.len() < out.capacity() {
            return Err(DecodeError::Truncated);
        }
    }
}

fn read_limited<R: Read>(reader: R, limit: usize) -> Result<Vec<u8>, DecodeError> {
    let mut out = Vec::new();
    reader
        .take(limit as u64 + 1)
        .read_to_end(&mut out)
        .map_err(|e| DecodeError::Corrupt(e.to_string()))?;
    if out.len() > limit {
        return Err(DecodeError::OutputLimit { limit });
    }
    Ok(out)
}

/// Output of a successful chain run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub bytes: Vec<u8>,
    pub strategy: Strategy,
    /// The output matched the header's CRC-32 and uncompressed size
    pub verified: bool,
}

/// Run the strategy chain over `payload`.
///
/// The first output that matches `hint` wins immediately, as does the
/// first output of any kind when the hint has nothing to check against.
/// Outputs that contradict the hint are kept back, and the earliest of them
/// is returned unverified once the chain is exhausted.
///
/// # Errors
///
/// [`AllStrategiesFailed`] with one failed attempt per strategy.
pub fn recover(
    payload: &[u8],
    hint: &DecodeHint,
    limit: usize,
) -> Result<Decoded, AllStrategiesFailed> {
    let mut attempts = Vec::with_capacity(CHAIN.len());
    let mut unverified: Option<Decoded> = None;

    for strategy in CHAIN {
        let bytes = match strategy.apply(payload, hint.method, limit) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::trace!(strategy = strategy.name(), error = %e, "strategy failed");
                attempts.push(Attempt::failed(strategy.name(), e.to_string()));
                continue;
            }
        };

        let verdict = hint.verify(&bytes);
        if verdict != Some(false) {
            return Ok(Decoded {
                bytes,
                strategy,
                verified: verdict == Some(true),
            });
        }

        tracing::debug!(
            strategy = strategy.name(),
            len = bytes.len(),
            "output does not match header checksum"
        );
        attempts.push(Attempt::unverified(strategy.name(), bytes.len()));
        if unverified.is_none() {
            unverified = Some(Decoded {
                bytes,
                strategy,
                verified: false,
            });
        }
    }

    unverified.ok_or(AllStrategiesFailed { attempts })
}

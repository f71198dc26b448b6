use byteorder::{LittleEndian, ReadBytesExt};
use serde::Serialize;
use std::io::Cursor;

use crate::error::ParseError;

/// ZIP compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u16")]
pub enum CompressionMethod {
    Stored,
    Deflate,
    Bzip2,
    Unknown(u16),
}

impl CompressionMethod {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0 => CompressionMethod::Stored,
            8 => CompressionMethod::Deflate,
            12 => CompressionMethod::Bzip2,
            _ => CompressionMethod::Unknown(value),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            CompressionMethod::Stored => 0,
            CompressionMethod::Deflate => 8,
            CompressionMethod::Bzip2 => 12,
            CompressionMethod::Unknown(v) => *v,
        }
    }

    /// Short label used in listings
    pub fn label(&self) -> String {
        match self {
            CompressionMethod::Stored => "stored".to_string(),
            CompressionMethod::Deflate => "deflate".to_string(),
            CompressionMethod::Bzip2 => "bzip2".to_string(),
            CompressionMethod::Unknown(v) => format!("m{}", v),
        }
    }
}

impl From<CompressionMethod> for u16 {
    fn from(method: CompressionMethod) -> Self {
        method.as_u16()
    }
}

/// Local File Header (LFH) - 30 bytes
pub const LFH_SIGNATURE: &[u8] = b"PK\x03\x04";
pub const LFH_SIZE: usize = 30;

/// Central Directory File Header signature
pub const CDFH_SIGNATURE: &[u8] = b"PK\x01\x02";

/// End of Central Directory signature
pub const EOCD_SIGNATURE: &[u8] = b"PK\x05\x06";

/// Signatures that may terminate an entry's payload when its declared
/// size cannot be trusted.
pub const BOUNDARY_SIGNATURES: &[&[u8]] = &[LFH_SIGNATURE, CDFH_SIGNATURE, EOCD_SIGNATURE];

/// General purpose flag: entry is encrypted
pub const FLAG_ENCRYPTED: u16 = 1 << 0;
/// General purpose flag: CRC and sizes are in a trailing data descriptor
pub const FLAG_DATA_DESCRIPTOR: u16 = 1 << 3;
/// General purpose flag: filename is UTF-8
pub const FLAG_UTF8: u16 = 1 << 11;

/// The fixed 30-byte local file header that precedes every entry.
///
/// All multi-byte fields are little-endian. The CRC and sizes are kept
/// exactly as found; nothing here validates them against the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalFileHeader {
    pub version_needed: u16,
    pub flags: u16,
    pub compression_method: CompressionMethod,
    pub last_mod_time: u16,
    pub last_mod_date: u16,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub file_name_length: u16,
    pub extra_field_length: u16,
}

impl LocalFileHeader {
    /// Decode a header from the start of `data`.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ParseError> {
        if data.len() < LFH_SIZE {
            return Err(ParseError::Truncated {
                available: data.len(),
            });
        }

        // Verify signature
        if &data[0..4] != LFH_SIGNATURE {
            return Err(ParseError::BadSignature {
                found: [data[0], data[1], data[2], data[3]],
            });
        }

        let mut cursor = Cursor::new(&data[4..LFH_SIZE]);
        Self::read_fields(&mut cursor).map_err(|_| ParseError::Truncated {
            available: data.len(),
        })
    }

    fn read_fields(cursor: &mut Cursor<&[u8]>) -> std::io::Result<Self> {
        Ok(Self {
            version_needed: cursor.read_u16::<LittleEndian>()?,
            flags: cursor.read_u16::<LittleEndian>()?,
            compression_method: CompressionMethod::from_u16(cursor.read_u16::<LittleEndian>()?),
            last_mod_time: cursor.read_u16::<LittleEndian>()?,
            last_mod_date: cursor.read_u16::<LittleEndian>()?,
            crc32: cursor.read_u32::<LittleEndian>()?,
            compressed_size: cursor.read_u32::<LittleEndian>()?,
            uncompressed_size: cursor.read_u32::<LittleEndian>()?,
            file_name_length: cursor.read_u16::<LittleEndian>()?,
            extra_field_length: cursor.read_u16::<LittleEndian>()?,
        })
    }

    /// Bytes between the header offset and the first payload byte
    pub fn variable_len(&self) -> usize {
        LFH_SIZE + self.file_name_length as usize + self.extra_field_length as usize
    }

    pub fn is_encrypted(&self) -> bool {
        self.flags & FLAG_ENCRYPTED != 0
    }

    /// CRC and sizes in this header are placeholders when set
    pub fn has_data_descriptor(&self) -> bool {
        self.flags & FLAG_DATA_DESCRIPTOR != 0
    }

    pub fn is_utf8(&self) -> bool {
        self.flags & FLAG_UTF8 != 0
    }

    /// Parse modification date to (year, month, day)
    pub fn mod_date(&self) -> (u16, u8, u8) {
        let day = (self.last_mod_date & 0x1F) as u8;
        let month = ((self.last_mod_date >> 5) & 0x0F) as u8;
        let year = ((self.last_mod_date >> 9) & 0x7F) + 1980;
        (year, month, day)
    }

    /// Parse modification time to (hour, minute, second)
    pub fn mod_time(&self) -> (u8, u8, u8) {
        let second = ((self.last_mod_time & 0x1F) * 2) as u8;
        let minute = ((self.last_mod_time >> 5) & 0x3F) as u8;
        let hour = ((self.last_mod_time >> 11) & 0x1F) as u8;
        (hour, minute, second)
    }
}

/// Where an entry's payload end came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoundarySource {
    /// The header's compressed size fit inside the buffer
    Declared,
    /// The declared size overran the buffer; the next signature was used
    NextSignature,
    /// No later signature; clamped to the end of the buffer
    EndOfBuffer,
}

impl BoundarySource {
    pub fn label(&self) -> &'static str {
        match self {
            BoundarySource::Declared => "declared",
            BoundarySource::NextSignature => "next-signature",
            BoundarySource::EndOfBuffer => "end-of-buffer",
        }
    }
}

/// A carved entry: header plus resolved payload range.
///
/// `payload_start <= payload_end <= buffer.len()` always holds for the
/// buffer the entry was carved from.
#[derive(Debug, Clone, Serialize)]
pub struct Entry {
    pub file_name: String,
    pub header_offset: usize,
    pub payload_start: usize,
    pub payload_end: usize,
    pub boundary: BoundarySource,
    pub header: LocalFileHeader,
}

impl Entry {
    pub fn payload_len(&self) -> usize {
        self.payload_end - self.payload_start
    }

    /// Borrow this entry's payload from the buffer it was carved from
    pub fn payload<'a>(&self, buffer: &'a [u8]) -> &'a [u8] {
        let end = self.payload_end.min(buffer.len());
        let start = self.payload_start.min(end);
        &buffer[start..end]
    }
}

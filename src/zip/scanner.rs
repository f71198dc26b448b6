//! Magic signature scanning.
//!
//! Scanning is lazy: offsets are produced on demand, so a caller that
//! stops after N candidates never touches the rest of the buffer.

use memchr::memmem::Finder;

/// How the scan resumes after a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Resume after the whole match. Used for true entry starts.
    Exclusive,
    /// Resume one byte after the match start, so overlapping
    /// occurrences are reported too.
    Overlapping,
}

/// Lazy iterator over the offsets of `magic` in a buffer.
///
/// Offsets are strictly ascending and every offset `o` satisfies
/// `buffer[o..o + magic.len()] == magic`.
pub struct SignatureScan<'h, 'm> {
    finder: Finder<'m>,
    haystack: &'h [u8],
    pos: usize,
    mode: ScanMode,
}

impl<'h, 'm> SignatureScan<'h, 'm> {
    pub fn new(haystack: &'h [u8], magic: &'m [u8], mode: ScanMode) -> Self {
        // An empty needle would match everywhere; start past the end instead.
        let pos = if magic.is_empty() { haystack.len() + 1 } else { 0 };
        Self {
            finder: Finder::new(magic),
            haystack,
            pos,
            mode,
        }
    }

    /// Start scanning at `offset` instead of the beginning
    pub fn starting_at(mut self, offset: usize) -> Self {
        self.pos = self.pos.max(offset);
        self
    }
}

impl Iterator for SignatureScan<'_, '_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let rest = self.haystack.get(self.pos..)?;
        let found = self.pos + self.finder.find(rest)?;
        self.pos = match self.mode {
            ScanMode::Exclusive => found + self.finder.needle().len(),
            ScanMode::Overlapping => found + 1,
        };
        Some(found)
    }
}

/// Scan `buffer` for `magic`.
pub fn scan<'h, 'm>(buffer: &'h [u8], magic: &'m [u8], mode: ScanMode) -> SignatureScan<'h, 'm> {
    SignatureScan::new(buffer, magic, mode)
}

/// First offset at or after `from` where any of `magics` starts.
pub fn find_first_of(buffer: &[u8], magics: &[&[u8]], from: usize) -> Option<usize> {
    magics
        .iter()
        .filter_map(|magic| {
            scan(buffer, magic, ScanMode::Overlapping)
                .starting_at(from)
                .next()
        })
        .min()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_signature_yields_nothing() {
        let buffer = b"nothing to see here";
        assert_eq!(scan(buffer, b"PK\x03\x04", ScanMode::Exclusive).count(), 0);
        assert_eq!(scan(b"", b"PK", ScanMode::Overlapping).count(), 0);
    }

    #[test]
    fn empty_magic_yields_nothing() {
        assert_eq!(scan(b"abc", b"", ScanMode::Overlapping).count(), 0);
    }

    #[test]
    fn finds_ascending_offsets() {
        let buffer: Vec<u8> = [
            &b"xx"[..],
            &b"PK\x03\x04"[..],
            &b"yyyy"[..],
            &b"PK\x03\x04"[..],
        ]
        .concat();
        let offsets: Vec<_> = scan(&buffer, b"PK\x03\x04", ScanMode::Exclusive).collect();
        assert_eq!(offsets, vec![2, 10]);
        for o in offsets {
            assert_eq!(&buffer[o..o + 4], b"PK\x03\x04");
        }
    }

    #[test]
    fn exclusive_skips_overlaps() {
        let buffer = b"aaaaa";
        let exclusive: Vec<_> = scan(buffer, b"aa", ScanMode::Exclusive).collect();
        let overlapping: Vec<_> = scan(buffer, b"aa", ScanMode::Overlapping).collect();
        assert_eq!(exclusive, vec![0, 2]);
        assert_eq!(overlapping, vec![0, 1, 2, 3]);
    }

    #[test]
    fn starting_at_skips_earlier_matches() {
        let buffer = b"PK..PK..PK";
        let offsets: Vec<_> = scan(buffer, b"PK", ScanMode::Overlapping)
            .starting_at(3)
            .collect();
        assert_eq!(offsets, vec![4, 8]);

        let past_end: Vec<_> = scan(buffer, b"PK", ScanMode::Overlapping)
            .starting_at(100)
            .collect();
        assert!(past_end.is_empty());
    }

    #[test]
    fn first_of_several_magics() {
        let buffer = b"....PK\x05\x06....PK\x01\x02";
        let hit = find_first_of(buffer, &[b"PK\x01\x02", b"PK\x05\x06"], 0);
        assert_eq!(hit, Some(4));
        let hit = find_first_of(buffer, &[b"PK\x01\x02", b"PK\x05\x06"], 5);
        assert_eq!(hit, Some(12));
        assert_eq!(find_first_of(buffer, &[b"PK\x03\x04"], 0), None);
    }
}

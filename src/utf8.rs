//! Minimal UTF-8 decoding used to bound-check multi-byte sequences.
//!
//! Word text travels through hyphenation splits and storage round trips, so
//! callers need to know where a codepoint begins and whether a byte run is
//! intact before they cut or trust it. `std` already validates `str`, but the
//! persisted page format carries raw byte strings and the hyphenation
//! capability hands back raw byte offsets; both go through these helpers.

/// Codepoint returned for malformed sequences.
pub const REPLACEMENT_CHAR: u32 = 0xFFFD;

/// Number of bytes announced by a UTF-8 lead byte.
///
/// Continuation bytes and invalid leads report `1` so a scanner always
/// advances.
pub const fn codepoint_len(lead: u8) -> usize {
    if lead < 0x80 {
        1
    } else if lead >> 5 == 0x06 {
        2
    } else if lead >> 4 == 0x0E {
        3
    } else if lead >> 3 == 0x1E {
        4
    } else {
        1
    }
}

/// Returns `true` for `10xxxxxx` bytes.
pub const fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

/// Decode the codepoint at the start of `bytes`.
///
/// Returns the codepoint and the number of bytes consumed, or `None` for an
/// empty slice. Truncated sequences and bad continuation bytes decode to
/// [`REPLACEMENT_CHAR`] while still consuming the bytes that were available.
pub fn next_codepoint(bytes: &[u8]) -> Option<(u32, usize)> {
    let lead = *bytes.first()?;
    let len = codepoint_len(lead);
    if len == 1 {
        return Some((lead as u32, 1));
    }
    if bytes.len() < len {
        return Some((REPLACEMENT_CHAR, bytes.len()));
    }

    let mut cp = (lead as u32) & ((1 << (7 - len)) - 1);
    for &byte in &bytes[1..len] {
        if !is_continuation(byte) {
            return Some((REPLACEMENT_CHAR, len));
        }
        cp = (cp << 6) | (byte as u32 & 0x3F);
    }
    Some((cp, len))
}

/// Iterator over `(byte_offset, codepoint)` pairs of a byte string.
#[derive(Clone, Debug)]
pub struct Codepoints<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Codepoints<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }
}

impl Iterator for Codepoints<'_> {
    type Item = (usize, u32);

    fn next(&mut self) -> Option<Self::Item> {
        let (cp, len) = next_codepoint(&self.bytes[self.offset..])?;
        let at = self.offset;
        self.offset += len;
        Some((at, cp))
    }
}

/// Count codepoints in a byte string.
pub fn codepoint_count(bytes: &[u8]) -> usize {
    Codepoints::new(bytes).count()
}

/// Returns `true` when `offset` can split `bytes` without cutting a codepoint.
///
/// Both ends of the string are boundaries. Offsets past the end are not.
pub fn is_boundary(bytes: &[u8], offset: usize) -> bool {
    match bytes.get(offset) {
        Some(&byte) => !is_continuation(byte),
        None => offset == bytes.len(),
    }
}

/// Check a stored word for corruption.
///
/// A word is sound when every sequence is complete, every continuation byte
/// is well formed, it contains no NUL byte (zero-filled partial reads leave
/// those behind), and it contains no U+FFFD left by lossy decoding.
pub fn is_sound(bytes: &[u8]) -> bool {
    let mut offset = 0;
    while offset < bytes.len() {
        let lead = bytes[offset];
        if lead == 0 {
            return false;
        }
        let len = codepoint_len(lead);
        if offset + len > bytes.len() {
            return false;
        }
        match next_codepoint(&bytes[offset..]) {
            Some((REPLACEMENT_CHAR, _)) | None => return false,
            Some(_) => {}
        }
        offset += len;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lead_byte_lengths() {
        assert_eq!(codepoint_len(b'a'), 1);
        assert_eq!(codepoint_len(0xC2), 2);
        assert_eq!(codepoint_len(0xE0), 3);
        assert_eq!(codepoint_len(0xF0), 4);
        assert_eq!(codepoint_len(0x80), 1);
        assert_eq!(codepoint_len(0xFF), 1);
    }

    #[test]
    fn decodes_multibyte_sequences() {
        assert_eq!(next_codepoint("é".as_bytes()), Some((0xE9, 2)));
        assert_eq!(next_codepoint("\u{2003}".as_bytes()), Some((0x2003, 3)));
        assert_eq!(next_codepoint("ก".as_bytes()), Some((0x0E01, 3)));
        assert_eq!(next_codepoint("😀".as_bytes()), Some((0x1F600, 4)));
        assert_eq!(next_codepoint(b""), None);
    }

    #[test]
    fn malformed_sequences_decode_to_replacement() {
        assert_eq!(next_codepoint(&[0xE0, 0x41, 0x42]), Some((REPLACEMENT_CHAR, 3)));
        assert_eq!(next_codepoint(&[0xE0, 0xB8]), Some((REPLACEMENT_CHAR, 2)));
    }

    #[test]
    fn codepoint_iterator_reports_offsets() {
        let items: Vec<_> = Codepoints::new("aé€".as_bytes()).collect();
        assert_eq!(items, vec![(0, 'a' as u32), (1, 0xE9), (3, 0x20AC)]);
        assert_eq!(codepoint_count("naïve".as_bytes()), 5);
    }

    #[test]
    fn boundary_checks_reject_mid_sequence_offsets() {
        let word = "café".as_bytes();
        assert!(is_boundary(word, 0));
        assert!(is_boundary(word, 3));
        assert!(!is_boundary(word, 4));
        assert!(is_boundary(word, word.len()));
        assert!(!is_boundary(word, word.len() + 1));
    }

    #[test]
    fn soundness_flags_nul_and_truncation() {
        assert!(is_sound("ภาษาไทย".as_bytes()));
        assert!(!is_sound(b"ab\0c"));
        assert!(!is_sound(&[b'a', 0xE0, 0xB8]));
        assert!(!is_sound("bad\u{FFFD}".as_bytes()));
    }
}

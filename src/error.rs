//! Error types for the persisted page format.

use core::fmt;
use std::io;

/// Errors raised while encoding or decoding persisted pages.
///
/// Every variant except [`CodecError::Io`] marks structural corruption: the
/// page or block that raised it is unusable and must be laid out again.
#[derive(Debug)]
pub enum CodecError {
    /// Underlying stream failed or ended inside a fixed-width field.
    Io(io::Error),
    /// A text block's parallel word/position/style sequences disagree.
    LengthMismatch {
        words: usize,
        positions: usize,
        styles: usize,
    },
    /// Page element tag has no known decoder.
    UnknownElementTag(u8),
    /// Word count read from storage exceeds the sanity ceiling.
    WordCountExceeded { actual: usize, limit: usize },
    /// A count does not fit its on-disk field.
    CountOverflow {
        kind: &'static str,
        actual: usize,
        limit: usize,
    },
    /// Alignment byte outside the known range.
    InvalidAlignment(u8),
    /// Page cache magic bytes are wrong.
    BadMagic,
    /// Page cache schema version is not supported.
    CacheVersion { found: u8, expected: u8 },
    /// Page cache was written for different layout parameters.
    FingerprintMismatch,
    /// Requested page index is not in the cache.
    PageOutOfRange { index: usize, count: usize },
    /// Stored page bytes do not match their checksum.
    ChecksumMismatch { index: usize },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "page stream i/o failed: {}", err),
            Self::LengthMismatch {
                words,
                positions,
                styles,
            } => write!(
                f,
                "text block size mismatch (words={} xpos={} styles={})",
                words, positions, styles
            ),
            Self::UnknownElementTag(tag) => write!(f, "unknown page element tag {}", tag),
            Self::WordCountExceeded { actual, limit } => write!(
                f,
                "text block word count {} exceeds maximum {}",
                actual, limit
            ),
            Self::CountOverflow {
                kind,
                actual,
                limit,
            } => write!(
                f,
                "{} count does not fit on disk (actual={} limit={})",
                kind, actual, limit
            ),
            Self::InvalidAlignment(value) => write!(f, "invalid alignment byte {}", value),
            Self::BadMagic => write!(f, "page cache magic mismatch"),
            Self::CacheVersion { found, expected } => write!(
                f,
                "page cache version {} unsupported (expected {})",
                found, expected
            ),
            Self::FingerprintMismatch => {
                write!(f, "page cache was built with different layout settings")
            }
            Self::PageOutOfRange { index, count } => {
                write!(f, "page {} out of range (cache holds {})", index, count)
            }
            Self::ChecksumMismatch { index } => write!(f, "page {} failed checksum", index),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for CodecError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

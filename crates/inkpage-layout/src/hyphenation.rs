//! Hyphenation capability and the built-in English rules.

use smallvec::SmallVec;

use crate::word::SOFT_HYPHEN;

/// One legal split point inside a word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BreakInfo {
    /// Byte offset of the first byte of the remainder.
    pub byte_offset: usize,
    /// Whether a visible `-` must be appended to the prefix.
    pub requires_inserted_hyphen: bool,
}

impl BreakInfo {
    pub const fn hyphenated(byte_offset: usize) -> Self {
        Self {
            byte_offset,
            requires_inserted_hyphen: true,
        }
    }

    pub const fn plain(byte_offset: usize) -> Self {
        Self {
            byte_offset,
            requires_inserted_hyphen: false,
        }
    }
}

pub type BreakOffsets = SmallVec<[BreakInfo; 8]>;

/// Source of split points for words that overflow a line.
pub trait Hyphenator: Send + Sync {
    /// Candidate split points of `word`, in ascending offset order.
    ///
    /// With `allow_fallback`, a hyphenator may add points that are not backed
    /// by language rules so an unsplittable word can still be broken.
    fn break_offsets(&self, word: &str, allow_fallback: bool) -> BreakOffsets;
}

/// Never offers a split point.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHyphenation;

impl Hyphenator for NoHyphenation {
    fn break_offsets(&self, _word: &str, _allow_fallback: bool) -> BreakOffsets {
        BreakOffsets::new()
    }
}

/// Heuristic English hyphenation.
///
/// Explicit hyphens and soft hyphens always produce split points. Words
/// without soft hyphens also get vowel/consonant transitions, common suffixes
/// and a small exception table, keeping at least three letters on each side.
/// Fallback points at every codepoint boundary are offered only when nothing
/// else was found.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnglishHyphenator;

const MIN_FRAGMENT_CHARS: usize = 3;
const MIN_HEURISTIC_CHARS: usize = 7;

const SUFFIXES: &[&str] = &[
    "tion", "sion", "ment", "ness", "less", "able", "ible", "ally", "ingly", "edly", "ing", "ed",
    "ly",
];

impl Hyphenator for EnglishHyphenator {
    fn break_offsets(&self, word: &str, allow_fallback: bool) -> BreakOffsets {
        let mut out = BreakOffsets::new();

        for (byte, ch) in word.char_indices() {
            let after = byte + ch.len_utf8();
            if byte == 0 || after >= word.len() {
                continue;
            }
            match ch {
                '-' | '\u{2010}' => out.push(BreakInfo::plain(after)),
                SOFT_HYPHEN => out.push(BreakInfo::hyphenated(after)),
                _ => {}
            }
        }

        if !word.contains(SOFT_HYPHEN) {
            let (core_start, core) = alphabetic_core(word);
            for char_idx in heuristic_candidates(core) {
                if let Some((byte, _)) = core.char_indices().nth(char_idx) {
                    out.push(BreakInfo::hyphenated(core_start + byte));
                }
            }
        }

        if out.is_empty() && allow_fallback {
            out.extend(
                word.char_indices()
                    .skip(1)
                    .map(|(byte, _)| BreakInfo::hyphenated(byte)),
            );
        }

        out.sort_unstable_by_key(|info| info.byte_offset);
        out.dedup_by_key(|info| info.byte_offset);
        out
    }
}

/// Byte start and slice of the word with leading and trailing non-letters
/// (indent markers, quotes, punctuation) removed.
fn alphabetic_core(word: &str) -> (usize, &str) {
    let trimmed_start = word.trim_start_matches(|c: char| !c.is_alphabetic());
    let start = word.len() - trimmed_start.len();
    (start, trimmed_start.trim_end_matches(|c: char| !c.is_alphabetic()))
}

/// Character indices inside `word` where a hyphenated split is acceptable.
fn heuristic_candidates(word: &str) -> Vec<usize> {
    let chars: Vec<char> = word.chars().collect();
    if chars.len() < MIN_HEURISTIC_CHARS {
        return Vec::new();
    }
    let mut candidates = Vec::with_capacity(chars.len() / 2);
    let lower = word.to_lowercase();
    if let Some(exception) = exception_points(&lower) {
        candidates.extend_from_slice(exception);
    }

    let is_vowel = |c: char| matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
    for i in MIN_FRAGMENT_CHARS..chars.len().saturating_sub(MIN_FRAGMENT_CHARS) {
        let prev = chars[i - 1];
        let next = chars[i];
        if !prev.is_ascii_alphabetic() || !next.is_ascii_alphabetic() {
            continue;
        }
        if is_vowel(prev) != is_vowel(next) {
            candidates.push(i);
        }
    }

    for suffix in SUFFIXES {
        if lower.ends_with(suffix) {
            let split = chars.len().saturating_sub(suffix.chars().count());
            if split >= MIN_FRAGMENT_CHARS && split + MIN_FRAGMENT_CHARS <= chars.len() {
                candidates.push(split);
            }
        }
    }

    candidates.retain(|&i| i > 0 && i < chars.len());
    candidates.sort_unstable();
    candidates.dedup();
    candidates
}

fn exception_points(lower: &str) -> Option<&'static [usize]> {
    match lower {
        "characteristically" => Some(&[4, 6, 9, 12]),
        "accessibility" => Some(&[3, 6, 9]),
        "fundamental" => Some(&[3, 6]),
        "functionality" => Some(&[4, 7, 10]),
        "publication" => Some(&[3, 6]),
        "consortium" => Some(&[3, 6]),
        "adventure" => Some(&[2, 5]),
        "extraordinary" => Some(&[5, 8]),
        "responsibility" => Some(&[3, 6, 9]),
        "determined" => Some(&[3, 6]),
        "encounter" => Some(&[2, 5]),
        "obedient" => Some(&[2, 5]),
        "providence" => Some(&[3, 6]),
        "language" => Some(&[3]),
        "fortune" => Some(&[3]),
        "navigator" => Some(&[3, 6]),
        "apparently" => Some(&[3, 6]),
        "hitherto" => Some(&[3]),
        _ => None,
    }
}

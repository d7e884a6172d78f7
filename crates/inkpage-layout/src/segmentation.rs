//! Script segmentation for languages written without spaces.

/// Splits words from scripts without inter-word spaces into breakable pieces.
pub trait ScriptSegmenter: Send + Sync {
    /// Whether `word` contains text this segmenter splits.
    fn needs_segmentation(&self, word: &str) -> bool;

    /// Ordered pieces of `word`. Concatenated, they equal the input.
    fn segment(&self, word: &str) -> Vec<String>;
}

/// Leaves every word whole.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSegmentation;

impl ScriptSegmenter for NoSegmentation {
    fn needs_segmentation(&self, _word: &str) -> bool {
        false
    }

    fn segment(&self, word: &str) -> Vec<String> {
        vec![word.to_string()]
    }
}

/// Splits Thai text into grapheme-like clusters.
///
/// A cluster is a base character with its trailing combining marks; leading
/// vowels stay attached to the consonant that follows them. Lines may then
/// break between any two clusters. This is cluster-level breaking, not
/// dictionary word segmentation.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThaiClusterSegmenter;

fn is_thai(ch: char) -> bool {
    ('\u{0E00}'..='\u{0E7F}').contains(&ch)
}

fn is_thai_combining(ch: char) -> bool {
    matches!(ch, '\u{0E31}' | '\u{0E34}'..='\u{0E3A}' | '\u{0E47}'..='\u{0E4E}')
}

fn is_thai_leading_vowel(ch: char) -> bool {
    ('\u{0E40}'..='\u{0E44}').contains(&ch)
}

impl ScriptSegmenter for ThaiClusterSegmenter {
    fn needs_segmentation(&self, word: &str) -> bool {
        word.chars().any(is_thai)
    }

    fn segment(&self, word: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut current = String::new();
        let mut prev: Option<char> = None;
        for ch in word.chars() {
            let starts_cluster = is_thai(ch)
                && !is_thai_combining(ch)
                && prev.is_some_and(|p| !is_thai_leading_vowel(p));
            if starts_cluster && !current.is_empty() {
                out.push(core::mem::take(&mut current));
            }
            current.push(ch);
            prev = Some(ch);
        }
        if !current.is_empty() {
            out.push(current);
        }
        out
    }
}

//! One laid-out line of positioned words.

use std::io::{Read, Write};

use crate::codec;
use crate::error::CodecError;
use crate::measure::TextRenderer;
use crate::style::{Alignment, BlockStyle, FontId, FontStyle};
use crate::utf8;

/// Upper bound on words accepted when decoding a block.
pub const MAX_WORDS_PER_BLOCK: usize = 10_000;

/// Leading em space inserted as a paragraph indent.
pub const INDENT_MARKER: &str = "\u{2003}";

const UNDERLINE_OFFSET_PX: i32 = 2;

/// An immutable line of words with their x positions and styles.
///
/// The three sequences are parallel. [`TextBlock::new`] does not check their
/// lengths; rendering skips and serialization rejects a block whose
/// sequences disagree, since that only happens through corruption.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextBlock {
    words: Vec<String>,
    word_xpos: Vec<u16>,
    word_styles: Vec<FontStyle>,
    block_style: BlockStyle,
}

impl TextBlock {
    pub fn new(
        words: Vec<String>,
        word_xpos: Vec<u16>,
        word_styles: Vec<FontStyle>,
        block_style: BlockStyle,
    ) -> Self {
        Self {
            words,
            word_xpos,
            word_styles,
            block_style,
        }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn word_xpos(&self) -> &[u16] {
        &self.word_xpos
    }

    pub fn word_styles(&self) -> &[FontStyle] {
        &self.word_styles
    }

    pub fn block_style(&self) -> &BlockStyle {
        &self.block_style
    }

    pub fn alignment(&self) -> Alignment {
        self.block_style.alignment
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// `true` when the parallel sequences have equal length.
    pub fn is_consistent(&self) -> bool {
        self.words.len() == self.word_xpos.len() && self.words.len() == self.word_styles.len()
    }

    fn check_consistent(&self) -> Result<(), CodecError> {
        if self.is_consistent() {
            Ok(())
        } else {
            Err(CodecError::LengthMismatch {
                words: self.words.len(),
                positions: self.word_xpos.len(),
                styles: self.word_styles.len(),
            })
        }
    }

    /// Everything a reader would reject: mismatched sequences, too many
    /// words, or a word longer than [`codec::MAX_STRING_BYTES`].
    fn check_encodable(&self) -> Result<(), CodecError> {
        self.check_consistent()?;
        if self.words.len() > MAX_WORDS_PER_BLOCK {
            return Err(CodecError::WordCountExceeded {
                actual: self.words.len(),
                limit: MAX_WORDS_PER_BLOCK,
            });
        }
        self.words.iter().try_for_each(|w| codec::check_str_len(w))
    }

    /// Iterate `(word, x, style)` triples.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u16, FontStyle)> + '_ {
        self.words
            .iter()
            .zip(&self.word_xpos)
            .zip(&self.word_styles)
            .map(|((w, &x), &s)| (w.as_str(), x, s))
    }

    /// Draw the line with its origin at `(x, y)`.
    ///
    /// A block with mismatched sequences is skipped with a warning.
    pub fn render<R>(&self, renderer: &mut R, font_id: FontId, x: i32, y: i32) -> Result<(), R::Error>
    where
        R: TextRenderer + ?Sized,
    {
        if let Err(err) = self.check_consistent() {
            log::warn!("render skipped: {}", err);
            return Ok(());
        }

        for (word, word_x, style) in self.iter() {
            let word_x = x + word_x as i32;
            renderer.draw_text(font_id, word_x, y, word, style)?;

            if style.is_underlined() {
                let underline_y = y + renderer.ascender(font_id) as i32 + UNDERLINE_OFFSET_PX;
                let (start_x, width) = match word.strip_prefix(INDENT_MARKER) {
                    Some(visible) => (
                        word_x + renderer.advance_x(font_id, INDENT_MARKER) as i32,
                        renderer.text_width(font_id, visible, style) as i32,
                    ),
                    None => (word_x, renderer.text_width(font_id, word, style) as i32),
                };
                renderer.draw_hline(start_x, start_x + width, underline_y)?;
            }
        }
        Ok(())
    }

    /// Count words that fail the UTF-8 soundness check, logging each one.
    pub fn corrupt_word_count(&self, checkpoint: &str) -> usize {
        let mut corrupt = 0;
        for (idx, word) in self.words.iter().enumerate() {
            if utf8::is_sound(word.as_bytes()) {
                continue;
            }
            corrupt += 1;
            let head = &word.as_bytes()[..word.len().min(16)];
            log::warn!(
                "corrupt word @ {} word[{}] len={} bytes={:02X?}",
                checkpoint,
                idx,
                word.len(),
                head
            );
        }
        corrupt
    }

    /// Encode the block.
    ///
    /// Nothing is written when the block could not be read back: the
    /// parallel sequences disagree, or a count or word exceeds the decode
    /// limits.
    pub fn serialize<W: Write + ?Sized>(&self, w: &mut W) -> Result<(), CodecError> {
        if let Err(err) = self.check_encodable() {
            log::error!("text block serialization failed: {}", err);
            return Err(err);
        }

        codec::write_count(w, "word", self.words.len())?;
        for word in &self.words {
            codec::write_str(w, word)?;
        }
        for &x in &self.word_xpos {
            codec::write_u16(w, x)?;
        }
        for style in &self.word_styles {
            codec::write_u8(w, style.bits())?;
        }

        let bs = &self.block_style;
        codec::write_u8(w, bs.alignment.as_u8())?;
        codec::write_bool(w, bs.text_align_defined)?;
        for value in [
            bs.margin_top,
            bs.margin_bottom,
            bs.margin_left,
            bs.margin_right,
            bs.padding_top,
            bs.padding_bottom,
            bs.padding_left,
            bs.padding_right,
            bs.text_indent,
        ] {
            codec::write_i16(w, value)?;
        }
        codec::write_bool(w, bs.text_indent_defined)?;
        Ok(())
    }

    /// Decode a block written by [`TextBlock::serialize`].
    pub fn deserialize<R: Read + ?Sized>(r: &mut R) -> Result<Self, CodecError> {
        let count = codec::read_u16(r)? as usize;
        if count > MAX_WORDS_PER_BLOCK {
            log::error!(
                "text block deserialization failed: word count {} exceeds maximum",
                count
            );
            return Err(CodecError::WordCountExceeded {
                actual: count,
                limit: MAX_WORDS_PER_BLOCK,
            });
        }

        let mut words = Vec::with_capacity(count);
        for _ in 0..count {
            words.push(codec::read_string(r)?);
        }
        let mut word_xpos = Vec::with_capacity(count);
        for _ in 0..count {
            word_xpos.push(codec::read_u16(r)?);
        }
        let mut word_styles = Vec::with_capacity(count);
        for _ in 0..count {
            word_styles.push(FontStyle(codec::read_u8(r)?));
        }

        let alignment = Alignment::try_from(codec::read_u8(r)?)?;
        let text_align_defined = codec::read_bool(r)?;
        let mut boxed = [0i16; 9];
        for value in boxed.iter_mut() {
            *value = codec::read_i16(r)?;
        }
        let [margin_top, margin_bottom, margin_left, margin_right, padding_top, padding_bottom, padding_left, padding_right, text_indent] =
            boxed;
        let text_indent_defined = codec::read_bool(r)?;

        Ok(Self {
            words,
            word_xpos,
            word_styles,
            block_style: BlockStyle {
                alignment,
                text_align_defined,
                margin_top,
                margin_bottom,
                margin_left,
                margin_right,
                padding_top,
                padding_bottom,
                padding_left,
                padding_right,
                text_indent,
                text_indent_defined,
            },
        })
    }
}

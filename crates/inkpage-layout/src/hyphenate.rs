//! Splitting one overflowing word at its widest fitting break point.

use std::collections::VecDeque;

use inkpage::{utf8, FontId, TextMeasurer};

use crate::hyphenation::Hyphenator;
use crate::word::{measure_word_width, Word};

/// Measurement and hyphenation capabilities shared by the line breakers.
#[derive(Clone, Copy)]
pub struct BreakContext<'a> {
    pub measurer: &'a dyn TextMeasurer,
    pub hyphenator: &'a dyn Hyphenator,
    pub font_id: FontId,
    pub page_width: i32,
    pub space_width: i32,
}

impl core::fmt::Debug for BreakContext<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BreakContext")
            .field("font_id", &self.font_id)
            .field("page_width", &self.page_width)
            .field("space_width", &self.space_width)
            .finish_non_exhaustive()
    }
}

/// Split `words[index]` so its first part fits in `available_width`.
///
/// Picks the widest candidate prefix (including an inserted `-` when the
/// break needs one) that fits; on equal widths the earlier candidate wins.
/// The prefix stays at `index` and the remainder is inserted after it with
/// the same style. Returns `false`, leaving `words` untouched, when nothing
/// fits.
pub fn hyphenate_word_at_index(
    words: &mut VecDeque<Word>,
    index: usize,
    available_width: i32,
    ctx: &BreakContext<'_>,
    allow_fallback: bool,
) -> bool {
    if available_width <= 0 {
        return false;
    }
    let Some(word) = words.get(index) else {
        return false;
    };

    let bytes = word.text.as_bytes();
    let mut chosen: Option<(usize, u16, bool)> = None;
    for info in ctx.hyphenator.break_offsets(&word.text, allow_fallback) {
        let offset = info.byte_offset;
        if offset == 0 || offset >= bytes.len() || !utf8::is_boundary(bytes, offset) {
            continue;
        }
        let width = measure_word_width(
            ctx.measurer,
            ctx.font_id,
            &word.text[..offset],
            word.style,
            info.requires_inserted_hyphen,
        );
        if width as i32 > available_width {
            continue;
        }
        if chosen.is_some_and(|(_, best, _)| width <= best) {
            continue;
        }
        chosen = Some((offset, width, info.requires_inserted_hyphen));
    }

    let Some((offset, prefix_width, insert_hyphen)) = chosen else {
        return false;
    };

    let word = &mut words[index];
    let remainder = word.text.split_off(offset);
    if insert_hyphen {
        word.text.push('-');
    }
    word.width = prefix_width;
    let style = word.style;
    let remainder_width = measure_word_width(ctx.measurer, ctx.font_id, &remainder, style, false);
    log::debug!(
        "hyphenated word {} at byte {}: prefix {}px, remainder {}px",
        index,
        offset,
        prefix_width,
        remainder_width
    );
    words.insert(
        index + 1,
        Word {
            text: remainder,
            style,
            no_space_before: false,
            width: remainder_width,
        },
    );
    true
}

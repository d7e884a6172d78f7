use inkpage::{FontId, FontStyle, TextMeasurer};

pub const SOFT_HYPHEN: char = '\u{00AD}';

/// One accumulated word with its measured width.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Word {
    pub text: String,
    pub style: FontStyle,
    /// Continuation of the previous word; takes no inter-word space.
    pub no_space_before: bool,
    /// Measured width with soft hyphens ignored.
    pub width: u16,
}

impl Word {
    pub fn new(text: impl Into<String>, style: FontStyle) -> Self {
        Self {
            text: text.into(),
            style,
            no_space_before: false,
            width: 0,
        }
    }
}

pub(crate) fn strip_soft_hyphens(text: &str) -> String {
    if text.contains(SOFT_HYPHEN) {
        text.chars().filter(|ch| *ch != SOFT_HYPHEN).collect()
    } else {
        text.to_string()
    }
}

pub(crate) fn strip_soft_hyphens_in_place(text: &mut String) {
    if text.contains(SOFT_HYPHEN) {
        text.retain(|ch| ch != SOFT_HYPHEN);
    }
}

/// Width of `text` as it will be drawn: soft hyphens removed, plus a trailing
/// `-` when `append_hyphen` is set.
pub(crate) fn measure_word_width(
    measurer: &dyn TextMeasurer,
    font_id: FontId,
    text: &str,
    style: FontStyle,
    append_hyphen: bool,
) -> u16 {
    if !append_hyphen && !text.contains(SOFT_HYPHEN) {
        return measurer.text_width(font_id, text, style);
    }
    let mut visible = strip_soft_hyphens(text);
    if append_hyphen {
        visible.push('-');
    }
    measurer.text_width(font_id, &visible, style)
}

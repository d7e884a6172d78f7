//! Paragraph word accumulation and line extraction.

use std::collections::VecDeque;
use std::sync::Arc;

use inkpage::{Alignment, BlockStyle, FontStyle, TextBlock, INDENT_MARKER};

use crate::hyphenate::BreakContext;
use crate::layout_engine::{BreakStrategy, LayoutEngine};
use crate::line_break::{compute_greedy_breaks, compute_optimal_breaks};
use crate::segmentation::{NoSegmentation, ScriptSegmenter};
use crate::word::{measure_word_width, strip_soft_hyphens_in_place, Word};

/// Styled words of one paragraph waiting to be broken into lines.
///
/// Layout drains the words it emits, so an accumulator is used once per
/// paragraph, or repeatedly while more text is appended and the last line is
/// held back.
pub struct ParsedText {
    words: VecDeque<Word>,
    block_style: BlockStyle,
    extra_paragraph_spacing: bool,
    hyphenation_enabled: bool,
    indent_applied: bool,
    segmenter: Arc<dyn ScriptSegmenter>,
}

impl core::fmt::Debug for ParsedText {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ParsedText")
            .field("words", &self.words)
            .field("block_style", &self.block_style)
            .field("extra_paragraph_spacing", &self.extra_paragraph_spacing)
            .field("hyphenation_enabled", &self.hyphenation_enabled)
            .field("indent_applied", &self.indent_applied)
            .finish_non_exhaustive()
    }
}

impl ParsedText {
    pub fn new(
        block_style: BlockStyle,
        extra_paragraph_spacing: bool,
        hyphenation_enabled: bool,
    ) -> Self {
        Self {
            words: VecDeque::new(),
            block_style,
            extra_paragraph_spacing,
            hyphenation_enabled,
            indent_applied: false,
            segmenter: Arc::new(NoSegmentation),
        }
    }

    pub fn with_segmenter(mut self, segmenter: Arc<dyn ScriptSegmenter>) -> Self {
        self.segmenter = segmenter;
        self
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> impl ExactSizeIterator<Item = &Word> + '_ {
        self.words.iter()
    }

    pub fn alignment(&self) -> Alignment {
        self.block_style.alignment
    }

    pub fn block_style(&self) -> &BlockStyle {
        &self.block_style
    }

    pub fn hyphenation_enabled(&self) -> bool {
        self.hyphenation_enabled
    }

    /// Append a word.
    ///
    /// Words in scripts that need segmentation are split into pieces; every
    /// piece after the first is glued to its predecessor with no space.
    pub fn add_word(&mut self, word: impl Into<String>, style: FontStyle) {
        let word = word.into();
        if word.is_empty() {
            return;
        }

        if !self.segmenter.needs_segmentation(&word) {
            self.words.push_back(Word::new(word, style));
            return;
        }

        let mut first = true;
        for piece in self.segmenter.segment(&word) {
            if piece.is_empty() {
                continue;
            }
            let mut entry = Word::new(piece, style);
            entry.no_space_before = !first;
            self.words.push_back(entry);
            first = false;
        }
    }

    /// Prefix the first word with an em space for justified and left blocks.
    ///
    /// Runs at most once; paragraphs separated by extra spacing are not
    /// indented.
    pub fn apply_paragraph_indent(&mut self) {
        if self.indent_applied || self.extra_paragraph_spacing {
            return;
        }
        let Some(first) = self.words.front_mut() else {
            return;
        };
        if self.block_style.alignment.takes_paragraph_indent() {
            first.text.insert_str(0, INDENT_MARKER);
        }
        self.indent_applied = true;
    }

    /// Break the accumulated words into lines and hand each to `on_line`.
    ///
    /// Emitted words are removed from the accumulator. With
    /// `include_last_line == false` the final line is computed but kept, so
    /// more words can be appended before the next call. Returns the number of
    /// lines emitted.
    pub fn layout_and_extract_lines<F>(
        &mut self,
        engine: &LayoutEngine,
        include_last_line: bool,
        mut on_line: F,
    ) -> usize
    where
        F: FnMut(TextBlock),
    {
        if self.words.is_empty() {
            return 0;
        }
        self.apply_paragraph_indent();

        let cfg = engine.config();
        let measurer = engine.measurer();
        let page_width =
            (cfg.viewport_width as i32 - self.block_style.horizontal_inset()).max(1);
        let space_width = measurer.space_width(cfg.font_id) as i32;

        for word in self.words.iter_mut() {
            word.width = measure_word_width(measurer, cfg.font_id, &word.text, word.style, false);
        }

        let ctx = BreakContext {
            measurer,
            hyphenator: engine.hyphenator(),
            font_id: cfg.font_id,
            page_width,
            space_width,
        };
        let strategy = cfg.resolve_strategy(self.hyphenation_enabled, self.words.len());
        let breaks = match strategy {
            BreakStrategy::Greedy => compute_greedy_breaks(&mut self.words, &ctx),
            _ => compute_optimal_breaks(&mut self.words, &ctx),
        };

        let line_count = if include_last_line {
            breaks.len()
        } else {
            breaks.len().saturating_sub(1)
        };
        let mut start = 0;
        for (idx, &end) in breaks.iter().take(line_count).enumerate() {
            let is_last_line = idx + 1 == breaks.len();
            on_line(self.extract_line(end - start, page_width, space_width, is_last_line));
            start = end;
        }

        log::debug!(
            "layout: {:?} breaker emitted {} of {} lines, {} words held",
            strategy,
            line_count,
            breaks.len(),
            self.words.len()
        );
        line_count
    }

    /// Move the first `count` words into a positioned line.
    fn extract_line(
        &mut self,
        count: usize,
        page_width: i32,
        space_width: i32,
        is_last_line: bool,
    ) -> TextBlock {
        let count = count.min(self.words.len());
        let line = self.words.range(..count);
        let words_width: i32 = line.clone().map(|w| w.width as i32).sum();
        let gaps = line.skip(1).filter(|w| !w.no_space_before).count() as i32;
        let spare = page_width - words_width;

        let alignment = self.block_style.alignment;
        let spacing = if alignment == Alignment::Justified && !is_last_line && gaps >= 1 {
            spare / gaps
        } else {
            space_width
        };
        let mut x = match alignment {
            Alignment::Justified | Alignment::Left => 0,
            Alignment::Right => spare - gaps * space_width,
            Alignment::Center => (spare - gaps * space_width) / 2,
        };

        let mut texts = Vec::with_capacity(count);
        let mut xpos = Vec::with_capacity(count);
        let mut styles = Vec::with_capacity(count);
        for (idx, word) in self.words.drain(..count).enumerate() {
            // Spacing lands before a gap word, never after the previous one,
            // so a glued word stays flush against its predecessor.
            if idx > 0 && !word.no_space_before {
                x += spacing;
            }
            xpos.push(x.clamp(0, u16::MAX as i32) as u16);
            x += word.width as i32;

            let mut text = word.text;
            strip_soft_hyphens_in_place(&mut text);
            texts.push(text);
            styles.push(word.style);
        }

        TextBlock::new(texts, xpos, styles, self.block_style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hyphenation::NoHyphenation;
    use crate::layout_engine::LayoutConfig;
    use crate::segmentation::ThaiClusterSegmenter;
    use inkpage::{FontId, TextMeasurer};

    /// Widths taken from a table, 10px per char otherwise.
    struct TableMeasurer(&'static [(&'static str, u16)]);

    impl TextMeasurer for TableMeasurer {
        fn text_width(&self, _font_id: FontId, text: &str, _style: FontStyle) -> u16 {
            self.0
                .iter()
                .find(|(t, _)| *t == text)
                .map(|&(_, w)| w)
                .unwrap_or(text.chars().count() as u16 * 10)
        }

        fn space_width(&self, _font_id: FontId) -> u16 {
            10
        }

        fn line_height(&self, _font_id: FontId) -> u16 {
            20
        }
    }

    const FOX: &[(&str, u16)] = &[("The", 30), ("quick", 40), ("brown", 45), ("fox", 25)];

    fn engine(width: u16, measurer: TableMeasurer) -> LayoutEngine {
        LayoutEngine::new(LayoutConfig::for_viewport(width))
            .with_text_measurer(Arc::new(measurer))
            .with_hyphenator(Arc::new(NoHyphenation))
    }

    fn collect(
        text: &mut ParsedText,
        engine: &LayoutEngine,
        include_last_line: bool,
    ) -> Vec<TextBlock> {
        let mut lines = Vec::new();
        text.layout_and_extract_lines(engine, include_last_line, |line| lines.push(line));
        lines
    }

    fn fox(alignment: Alignment) -> ParsedText {
        let mut text = ParsedText::new(BlockStyle::aligned(alignment), true, false);
        for w in ["The", "quick", "brown", "fox"] {
            text.add_word(w, FontStyle::REGULAR);
        }
        text
    }

    #[test]
    fn justified_example_spreads_all_but_last_line() {
        let engine = engine(90, TableMeasurer(FOX));
        let mut text = fox(Alignment::Justified);
        let lines = collect(&mut text, &engine, true);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].words(), ["The", "quick"]);
        assert_eq!(lines[0].word_xpos(), [0, 50]);
        assert_eq!(lines[1].words(), ["brown", "fox"]);
        assert_eq!(lines[1].word_xpos(), [0, 55]);
        assert!(text.is_empty());
    }

    #[test]
    fn justify_spacing_precedes_gap_words_only() {
        let engine = engine(100, TableMeasurer(FOX));
        let mut text = ParsedText::new(BlockStyle::aligned(Alignment::Justified), true, false);
        for w in ["The", "quick"] {
            text.add_word(w, FontStyle::REGULAR);
        }
        let mut comma = Word::new(",", FontStyle::REGULAR);
        comma.no_space_before = true;
        text.words.push_back(comma);
        text.add_word("fox", FontStyle::REGULAR);

        let lines = collect(&mut text, &engine, true);
        // 30 + 40 + 10 leaves 20px for the single gap before "quick".
        assert_eq!(lines[0].words(), ["The", "quick", ","]);
        assert_eq!(lines[0].word_xpos(), [0, 50, 90]);
        assert_eq!(lines[1].words(), ["fox"]);
    }

    #[test]
    fn right_and_center_offset_the_line() {
        let engine = engine(90, TableMeasurer(FOX));
        let lines = collect(&mut fox(Alignment::Right), &engine, true);
        // spare 20, one gap of 10.
        assert_eq!(lines[0].word_xpos(), [10, 50]);
        let lines = collect(&mut fox(Alignment::Center), &engine, true);
        assert_eq!(lines[0].word_xpos(), [5, 45]);
        let lines = collect(&mut fox(Alignment::Left), &engine, true);
        assert_eq!(lines[0].word_xpos(), [0, 40]);
    }

    #[test]
    fn withheld_last_line_stays_for_next_pass() {
        let engine = engine(90, TableMeasurer(FOX));
        let mut text = fox(Alignment::Justified);
        let lines = collect(&mut text, &engine, false);
        assert_eq!(lines.len(), 1);
        assert_eq!(
            text.words().map(|w| w.text.as_str()).collect::<Vec<_>>(),
            ["brown", "fox"]
        );

        text.add_word("ran", FontStyle::REGULAR);
        let lines = collect(&mut text, &engine, true);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].words(), ["brown", "fox"]);
        assert_eq!(lines[1].words(), ["ran"]);
        assert!(text.is_empty());
    }

    #[test]
    fn indent_is_applied_once_for_left_and_justified() {
        let mut text = ParsedText::new(BlockStyle::aligned(Alignment::Left), false, false);
        text.add_word("Once", FontStyle::REGULAR);
        text.apply_paragraph_indent();
        text.apply_paragraph_indent();
        assert_eq!(text.words().next().map(|w| w.text.as_str()), Some("\u{2003}Once"));

        let mut centered = ParsedText::new(BlockStyle::aligned(Alignment::Center), false, false);
        centered.add_word("Title", FontStyle::BOLD);
        centered.apply_paragraph_indent();
        assert_eq!(centered.words().next().map(|w| w.text.as_str()), Some("Title"));

        let mut spaced = ParsedText::new(BlockStyle::aligned(Alignment::Left), true, false);
        spaced.add_word("Once", FontStyle::REGULAR);
        spaced.apply_paragraph_indent();
        assert_eq!(spaced.words().next().map(|w| w.text.as_str()), Some("Once"));
    }

    #[test]
    fn indent_is_not_repeated_on_withheld_words() {
        let engine = engine(90, TableMeasurer(FOX));
        let mut text = ParsedText::new(BlockStyle::aligned(Alignment::Left), false, false);
        for w in ["a", "b", "c", "d", "e", "f", "g", "h"] {
            text.add_word(w, FontStyle::REGULAR);
        }
        let first = collect(&mut text, &engine, false);
        assert!(first[0].words()[0].starts_with(INDENT_MARKER));
        let rest = collect(&mut text, &engine, true);
        assert!(rest
            .iter()
            .flat_map(|l| l.words())
            .all(|w| !w.starts_with(INDENT_MARKER)));
    }

    #[test]
    fn empty_words_are_ignored() {
        let mut text = ParsedText::new(BlockStyle::default(), false, false);
        text.add_word("", FontStyle::REGULAR);
        assert!(text.is_empty());
        let engine = engine(90, TableMeasurer(FOX));
        assert_eq!(text.layout_and_extract_lines(&engine, true, |_| {}), 0);
    }

    #[test]
    fn segmented_words_are_glued_and_not_justified_apart() {
        let mut text = ParsedText::new(BlockStyle::aligned(Alignment::Justified), true, false)
            .with_segmenter(Arc::new(ThaiClusterSegmenter));
        text.add_word("go", FontStyle::REGULAR);
        text.add_word("สวัสดี", FontStyle::ITALIC);
        text.add_word("now", FontStyle::REGULAR);
        text.add_word("please", FontStyle::REGULAR);
        let flags: Vec<bool> = text.words().map(|w| w.no_space_before).collect();
        assert_eq!(flags, [false, false, true, true, true, false, false]);

        // go(20) ส(10) วั(20) ส(10) ดี(20) now(30): 110 + 2 gaps of 10 = 130.
        let engine = engine(140, TableMeasurer(&[]));
        let lines = collect(&mut text, &engine, true);
        assert_eq!(lines[0].len(), 6);
        // spare 30 over 2 gaps: 15 each, clusters stay adjacent.
        assert_eq!(lines[0].word_xpos(), [0, 35, 45, 65, 75, 110]);
        assert_eq!(lines[1].words(), ["please"]);
    }

    #[test]
    fn soft_hyphens_are_stripped_from_output() {
        let mut text = ParsedText::new(BlockStyle::aligned(Alignment::Left), true, false);
        text.add_word("co\u{00AD}op", FontStyle::REGULAR);
        let engine = engine(200, TableMeasurer(&[]));
        let lines = collect(&mut text, &engine, true);
        assert_eq!(lines[0].words(), ["coop"]);
    }

    #[test]
    fn block_insets_narrow_the_line() {
        let style = BlockStyle {
            alignment: Alignment::Left,
            margin_left: 20,
            padding_right: 20,
            ..BlockStyle::default()
        };
        let mut text = ParsedText::new(style, true, false);
        for w in ["The", "quick", "brown"] {
            text.add_word(w, FontStyle::REGULAR);
        }
        // 130 - 40 leaves 90: "brown" no longer fits after "The quick".
        let engine = engine(130, TableMeasurer(FOX));
        let lines = collect(&mut text, &engine, true);
        assert_eq!(lines.len(), 2);
        assert_eq!(*lines[0].block_style(), style);
    }
}

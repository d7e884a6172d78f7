//! Paragraph layout for inkpage: word accumulation, line breaking,
//! hyphenation and justification.
//!
//! A [`LayoutEngine`] bundles the measurement, hyphenation and segmentation
//! capabilities. Each paragraph is collected into a [`ParsedText`], broken
//! into positioned [`inkpage::TextBlock`] lines, and optionally stacked into
//! pages with a [`Paginator`].
//!
//! ```
//! use inkpage::{Alignment, BlockStyle, FontStyle};
//! use inkpage_layout::{LayoutConfig, LayoutEngine};
//!
//! let engine = LayoutEngine::new(LayoutConfig::for_viewport(120));
//! let mut text = engine.new_paragraph(BlockStyle::aligned(Alignment::Justified), false);
//! for word in "a quick brown fox jumps over the lazy dog".split(' ') {
//!     text.add_word(word, FontStyle::REGULAR);
//! }
//! let mut lines = Vec::new();
//! text.layout_and_extract_lines(&engine, true, |line| lines.push(line));
//! assert!(lines.len() > 1);
//! assert!(text.is_empty());
//! ```

#![cfg_attr(
    not(test),
    deny(
        clippy::disallowed_methods,
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::panic_in_result_fn,
        clippy::todo,
        clippy::unimplemented
    )
)]

pub mod hyphenate;
mod hyphenation;
mod layout_engine;
pub mod line_break;
mod paginator;
mod parsed_text;
mod segmentation;
mod word;

pub use hyphenate::{hyphenate_word_at_index, BreakContext};
pub use hyphenation::{BreakInfo, BreakOffsets, EnglishHyphenator, Hyphenator, NoHyphenation};
pub use layout_engine::{BreakStrategy, LayoutConfig, LayoutEngine};
pub use paginator::{Paginator, PaginatorConfig};
pub use parsed_text::ParsedText;
pub use segmentation::{NoSegmentation, ScriptSegmenter, ThaiClusterSegmenter};
pub use word::{Word, SOFT_HYPHEN};

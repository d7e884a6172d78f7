use std::sync::Arc;

use inkpage::{Alignment, BlockStyle, FontId, LayoutFingerprint, MonospaceMeasurer, TextMeasurer};

use crate::hyphenation::{EnglishHyphenator, Hyphenator};
use crate::paginator::PaginatorConfig;
use crate::parsed_text::ParsedText;
use crate::segmentation::{NoSegmentation, ScriptSegmenter};

/// Which line breaker a paragraph uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BreakStrategy {
    /// Greedy with hyphenation on or for long paragraphs, otherwise optimal.
    #[default]
    Auto,
    /// Minimum-raggedness breaking over the whole paragraph.
    Optimal,
    /// Single forward pass with inline hyphenation.
    Greedy,
}

impl BreakStrategy {
    /// Tag recorded in page cache fingerprints.
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Auto => 0,
            Self::Optimal => 1,
            Self::Greedy => 2,
        }
    }
}

/// Layout configuration shared by every paragraph of a section.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutConfig {
    /// Backend font used for measurement and drawing.
    pub font_id: FontId,
    /// Width available to lines, before block margins and padding.
    pub viewport_width: u16,
    /// Split overflowing words at hyphenation points.
    pub hyphenation_enabled: bool,
    pub break_strategy: BreakStrategy,
    /// Paragraphs longer than this use the greedy breaker under `Auto`.
    pub max_optimal_words: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            font_id: 0,
            viewport_width: 464,
            hyphenation_enabled: false,
            break_strategy: BreakStrategy::Auto,
            max_optimal_words: 4096,
        }
    }
}

impl LayoutConfig {
    /// Defaults with the given line width.
    pub fn for_viewport(width: u16) -> Self {
        Self {
            viewport_width: width,
            ..Self::default()
        }
    }

    pub fn with_font(mut self, font_id: FontId) -> Self {
        self.font_id = font_id;
        self
    }

    pub fn with_hyphenation(mut self, enabled: bool) -> Self {
        self.hyphenation_enabled = enabled;
        self
    }

    pub fn with_break_strategy(mut self, strategy: BreakStrategy) -> Self {
        self.break_strategy = strategy;
        self
    }

    /// Fingerprint of every setting that changes where lines and pages break.
    ///
    /// The line width already excludes the right margin, so `margin_right`
    /// is recorded as 0.
    pub fn fingerprint(
        &self,
        pages: &PaginatorConfig,
        alignment: Alignment,
        extra_paragraph_spacing: bool,
    ) -> LayoutFingerprint {
        LayoutFingerprint {
            font_id: self.font_id,
            viewport_width: self.viewport_width,
            viewport_height: pages.viewport_height,
            margin_top: pages.margin_top,
            margin_bottom: pages.margin_bottom,
            margin_left: pages.margin_left,
            margin_right: 0,
            alignment,
            hyphenation_enabled: self.hyphenation_enabled,
            extra_paragraph_spacing,
            break_strategy: self.break_strategy.as_u8(),
            max_optimal_words: u32::try_from(self.max_optimal_words).unwrap_or(u32::MAX),
        }
    }

    /// Resolve `Auto` to a concrete breaker for one paragraph.
    pub fn resolve_strategy(&self, hyphenation_enabled: bool, word_count: usize) -> BreakStrategy {
        match self.break_strategy {
            BreakStrategy::Auto if hyphenation_enabled || word_count > self.max_optimal_words => {
                BreakStrategy::Greedy
            }
            BreakStrategy::Auto => BreakStrategy::Optimal,
            explicit => explicit,
        }
    }
}

/// Configured layout capabilities, cheap to clone into many paragraphs.
#[derive(Clone)]
pub struct LayoutEngine {
    cfg: LayoutConfig,
    measurer: Arc<dyn TextMeasurer>,
    hyphenator: Arc<dyn Hyphenator>,
    segmenter: Arc<dyn ScriptSegmenter>,
}

impl core::fmt::Debug for LayoutEngine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LayoutEngine")
            .field("cfg", &self.cfg)
            .finish_non_exhaustive()
    }
}

impl LayoutEngine {
    /// Engine with monospace metrics, English hyphenation and no segmentation.
    pub fn new(cfg: LayoutConfig) -> Self {
        Self {
            cfg,
            measurer: Arc::new(MonospaceMeasurer::default()),
            hyphenator: Arc::new(EnglishHyphenator),
            segmenter: Arc::new(NoSegmentation),
        }
    }

    /// Use a backend-specific measurer for line fitting.
    pub fn with_text_measurer(mut self, measurer: Arc<dyn TextMeasurer>) -> Self {
        self.measurer = measurer;
        self
    }

    pub fn with_hyphenator(mut self, hyphenator: Arc<dyn Hyphenator>) -> Self {
        self.hyphenator = hyphenator;
        self
    }

    pub fn with_segmenter(mut self, segmenter: Arc<dyn ScriptSegmenter>) -> Self {
        self.segmenter = segmenter;
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.cfg
    }

    pub fn measurer(&self) -> &dyn TextMeasurer {
        self.measurer.as_ref()
    }

    pub fn hyphenator(&self) -> &dyn Hyphenator {
        self.hyphenator.as_ref()
    }

    pub fn line_height(&self) -> u16 {
        self.measurer.line_height(self.cfg.font_id)
    }

    /// Start a paragraph using this engine's hyphenation setting and segmenter.
    pub fn new_paragraph(&self, block_style: BlockStyle, extra_paragraph_spacing: bool) -> ParsedText {
        ParsedText::new(
            block_style,
            extra_paragraph_spacing,
            self.cfg.hyphenation_enabled,
        )
        .with_segmenter(Arc::clone(&self.segmenter))
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

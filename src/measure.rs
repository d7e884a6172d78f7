use crate::style::{FontId, FontStyle};
use crate::utf8::Codepoints;

/// Text measurement capability supplied by the rendering backend.
///
/// Layout relies on widths being stable for identical inputs within one pass;
/// the optimal line breaker compares sums of these values.
pub trait TextMeasurer: Send + Sync {
    /// Rendered width of `text` in `style`.
    fn text_width(&self, font_id: FontId, text: &str, style: FontStyle) -> u16;

    /// Width of one inter-word space.
    fn space_width(&self, font_id: FontId) -> u16;

    /// Horizontal advance of `text` in the regular face.
    ///
    /// Used to offset decorations past leading spacing glyphs.
    fn advance_x(&self, font_id: FontId, text: &str) -> u16 {
        self.text_width(font_id, text, FontStyle::REGULAR)
    }

    /// Distance between consecutive baselines.
    fn line_height(&self, font_id: FontId) -> u16;

    /// Distance from the top of a line to its baseline.
    fn ascender(&self, font_id: FontId) -> u16 {
        let lh = self.line_height(font_id);
        lh.saturating_sub(lh / 4)
    }
}

/// Draw capability supplied by the rendering backend.
pub trait TextRenderer: TextMeasurer {
    type Error;

    /// Draw `text` with its top-left corner at `(x, y)`.
    fn draw_text(
        &mut self,
        font_id: FontId,
        x: i32,
        y: i32,
        text: &str,
        style: FontStyle,
    ) -> Result<(), Self::Error>;

    /// Draw a one-pixel horizontal rule from `x0` to `x1` at `y`.
    fn draw_hline(&mut self, x0: i32, x1: i32, y: i32) -> Result<(), Self::Error>;
}

/// Fixed-advance measurer for headless layout and tests.
///
/// Every codepoint advances `char_width`, except soft hyphens which are
/// zero width. Bold faces add one pixel per glyph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonospaceMeasurer {
    pub char_width: u16,
    pub space_width: u16,
    pub line_height: u16,
}

impl MonospaceMeasurer {
    pub const fn new(char_width: u16, line_height: u16) -> Self {
        Self {
            char_width,
            space_width: char_width,
            line_height,
        }
    }
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        Self::new(8, 16)
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn text_width(&self, _font_id: FontId, text: &str, style: FontStyle) -> u16 {
        let advance = self.char_width as u32 + style.is_bold() as u32;
        let glyphs = Codepoints::new(text.as_bytes())
            .filter(|&(_, cp)| cp != 0x00AD)
            .count() as u32;
        (glyphs * advance).min(u16::MAX as u32) as u16
    }

    fn space_width(&self, _font_id: FontId) -> u16 {
        self.space_width
    }

    fn line_height(&self, _font_id: FontId) -> u16 {
        self.line_height
    }
}

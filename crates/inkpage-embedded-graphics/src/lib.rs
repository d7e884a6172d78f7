//! embedded-graphics backend for inkpage pages.
//!
//! [`EgTextMeasurer`] gives layout the same width model the renderer draws
//! with, and [`EgCanvas`] draws persisted [`inkpage::Page`]s onto any
//! monochrome `DrawTarget`.

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

use embedded_graphics::{
    mono_font::{
        ascii::{
            FONT_10X20, FONT_6X13_BOLD, FONT_6X13_ITALIC, FONT_6X9, FONT_7X13_ITALIC, FONT_7X14,
            FONT_7X14_BOLD, FONT_8X13, FONT_8X13_BOLD, FONT_8X13_ITALIC, FONT_9X18,
            FONT_9X18_BOLD,
        },
        MonoFont, MonoTextStyle,
    },
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Line, PrimitiveStyle},
    text::{Baseline, Text},
};
use inkpage::{FontId, FontStyle, Page, TextMeasurer, TextRenderer};
use std::borrow::Cow;
use std::sync::Arc;

/// Extra rows between the glyph cell and the next line.
const LINE_SPACING_PX: u16 = 2;

/// Why a font request was served by a different face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontFallbackReason {
    UnknownFontId,
    UnsupportedWeightItalic,
}

/// Mono font chosen for a `(FontId, FontStyle)` pair.
#[derive(Clone, Copy)]
pub struct FontSelection {
    pub font: &'static MonoFont<'static>,
    pub fallback_reason: Option<FontFallbackReason>,
}

impl core::fmt::Debug for FontSelection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FontSelection")
            .field("character_size", &self.font.character_size)
            .field("fallback_reason", &self.fallback_reason)
            .finish()
    }
}

/// Built-in mono fonts in four size buckets.
///
/// `FontId` 0 to 3 select small, medium, large and extra large; the
/// [`FontStyle`] face picks the regular, italic, bold or bold italic cut.
#[derive(Clone, Copy, Debug, Default)]
pub struct MonoFontBackend;

impl MonoFontBackend {
    pub const SIZE_SMALL: FontId = 0;
    pub const SIZE_MEDIUM: FontId = 1;
    pub const SIZE_LARGE: FontId = 2;
    pub const SIZE_XL: FontId = 3;

    pub fn select(font_id: FontId, style: FontStyle) -> FontSelection {
        let (font, fallback_reason): (&'static MonoFont<'static>, _) = match (font_id, style.face())
        {
            (Self::SIZE_SMALL, FontStyle::REGULAR) => (&FONT_6X9, None),
            (Self::SIZE_SMALL, FontStyle::ITALIC) => (&FONT_6X13_ITALIC, None),
            (Self::SIZE_SMALL, FontStyle::BOLD) => (&FONT_6X13_BOLD, None),
            (Self::SIZE_SMALL, _) => (
                &FONT_6X13_BOLD,
                Some(FontFallbackReason::UnsupportedWeightItalic),
            ),
            (Self::SIZE_MEDIUM, FontStyle::REGULAR) => (&FONT_7X14, None),
            (Self::SIZE_MEDIUM, FontStyle::ITALIC) => (&FONT_7X13_ITALIC, None),
            (Self::SIZE_MEDIUM, FontStyle::BOLD) => (&FONT_7X14_BOLD, None),
            (Self::SIZE_MEDIUM, _) => (
                &FONT_7X14_BOLD,
                Some(FontFallbackReason::UnsupportedWeightItalic),
            ),
            (Self::SIZE_LARGE, FontStyle::REGULAR) => (&FONT_8X13, None),
            (Self::SIZE_LARGE, FontStyle::ITALIC) => (&FONT_8X13_ITALIC, None),
            (Self::SIZE_LARGE, FontStyle::BOLD) => (&FONT_8X13_BOLD, None),
            (Self::SIZE_LARGE, _) => (
                &FONT_8X13_BOLD,
                Some(FontFallbackReason::UnsupportedWeightItalic),
            ),
            (Self::SIZE_XL, FontStyle::REGULAR) => (&FONT_10X20, None),
            (Self::SIZE_XL, FontStyle::ITALIC) => (
                &FONT_9X18,
                Some(FontFallbackReason::UnsupportedWeightItalic),
            ),
            (Self::SIZE_XL, FontStyle::BOLD) => (&FONT_9X18_BOLD, None),
            (Self::SIZE_XL, _) => (
                &FONT_9X18_BOLD,
                Some(FontFallbackReason::UnsupportedWeightItalic),
            ),
            _ => (&FONT_8X13, Some(FontFallbackReason::UnknownFontId)),
        };
        FontSelection {
            font,
            fallback_reason,
        }
    }

    fn text_style(font_id: FontId, style: FontStyle) -> MonoTextStyle<'static, BinaryColor> {
        MonoTextStyle::new(Self::select(font_id, style).font, BinaryColor::On)
    }
}

/// Map typographic characters the ASCII mono fonts lack onto ASCII, and
/// drop soft hyphens.
fn normalize_text_for_mono(text: &str) -> Cow<'_, str> {
    if !text.chars().any(|ch| {
        matches!(
            ch,
            '\u{00A0}' // nbsp
                | '\u{00AD}' // soft hyphen
                | '\u{2003}' // em space
                | '\u{2013}' // en dash
                | '\u{2014}' // em dash
                | '\u{2018}' // left single quote
                | '\u{2019}' // right single quote
                | '\u{201C}' // left double quote
                | '\u{201D}' // right double quote
                | '\u{2026}' // ellipsis
        )
    }) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\u{00AD}' => {}
            '\u{00A0}' => out.push(' '),
            '\u{2003}' => out.push_str("  "),
            '\u{2013}' | '\u{2014}' => out.push('-'),
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201C}' | '\u{201D}' => out.push('"'),
            '\u{2026}' => out.push_str("..."),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}

/// [`TextMeasurer`] backed by the mono font metrics the canvas draws with.
#[derive(Clone, Copy, Debug, Default)]
pub struct EgTextMeasurer;

impl EgTextMeasurer {
    pub fn new() -> Self {
        Self
    }

    /// Shared trait object for handing to a layout engine.
    pub fn shared() -> Arc<dyn TextMeasurer> {
        Arc::new(Self)
    }
}

impl TextMeasurer for EgTextMeasurer {
    fn text_width(&self, font_id: FontId, text: &str, style: FontStyle) -> u16 {
        let font = MonoFontBackend::select(font_id, style).font;
        let advance = font.character_size.width + font.character_spacing;
        let glyphs = normalize_text_for_mono(text).chars().count() as u32;
        (glyphs * advance).min(u16::MAX as u32) as u16
    }

    fn space_width(&self, font_id: FontId) -> u16 {
        let font = MonoFontBackend::select(font_id, FontStyle::REGULAR).font;
        (font.character_size.width + font.character_spacing) as u16
    }

    fn line_height(&self, font_id: FontId) -> u16 {
        let font = MonoFontBackend::select(font_id, FontStyle::REGULAR).font;
        font.character_size.height as u16 + LINE_SPACING_PX
    }

    fn ascender(&self, font_id: FontId) -> u16 {
        MonoFontBackend::select(font_id, FontStyle::REGULAR).font.baseline as u16
    }
}

/// Monochrome draw target that implements [`TextRenderer`].
#[derive(Debug)]
pub struct EgCanvas<D> {
    display: D,
    measurer: EgTextMeasurer,
}

impl<D> EgCanvas<D>
where
    D: DrawTarget<Color = BinaryColor> + Send + Sync,
{
    pub fn new(display: D) -> Self {
        Self {
            display,
            measurer: EgTextMeasurer,
        }
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn into_inner(self) -> D {
        self.display
    }

    /// Draw every line of `page` at its stored position.
    pub fn render_page(&mut self, page: &Page, font_id: FontId) -> Result<(), D::Error> {
        if MonoFontBackend::select(font_id, FontStyle::REGULAR)
            .fallback_reason
            .is_some()
        {
            log::warn!("font id {} unknown, rendering with fallback face", font_id);
        }
        page.render(self, font_id, 0, 0)
    }
}

impl<D> TextMeasurer for EgCanvas<D>
where
    D: DrawTarget<Color = BinaryColor> + Send + Sync,
{
    fn text_width(&self, font_id: FontId, text: &str, style: FontStyle) -> u16 {
        self.measurer.text_width(font_id, text, style)
    }

    fn space_width(&self, font_id: FontId) -> u16 {
        self.measurer.space_width(font_id)
    }

    fn line_height(&self, font_id: FontId) -> u16 {
        self.measurer.line_height(font_id)
    }

    fn ascender(&self, font_id: FontId) -> u16 {
        self.measurer.ascender(font_id)
    }
}

impl<D> TextRenderer for EgCanvas<D>
where
    D: DrawTarget<Color = BinaryColor> + Send + Sync,
{
    type Error = D::Error;

    fn draw_text(
        &mut self,
        font_id: FontId,
        x: i32,
        y: i32,
        text: &str,
        style: FontStyle,
    ) -> Result<(), Self::Error> {
        let text_style = MonoFontBackend::text_style(font_id, style);
        let normalized = normalize_text_for_mono(text);
        Text::with_baseline(normalized.as_ref(), Point::new(x, y), text_style, Baseline::Top)
            .draw(&mut self.display)?;
        Ok(())
    }

    fn draw_hline(&mut self, x0: i32, x1: i32, y: i32) -> Result<(), Self::Error> {
        if x1 <= x0 {
            return Ok(());
        }
        Line::new(Point::new(x0, y), Point::new(x1 - 1, y))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut self.display)
    }
}

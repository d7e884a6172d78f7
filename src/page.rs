//! Laid-out pages and their persisted form.
//!
//! A page is `[u16 count]` followed by `count` tagged elements. Only lines
//! exist today; the tag leaves room for other element kinds without
//! changing the container layout.

use std::io::{Read, Write};

use crate::codec;
use crate::error::CodecError;
use crate::measure::TextRenderer;
use crate::style::FontId;
use crate::text_block::TextBlock;

/// On-disk tag for [`PageElement::Line`].
pub const TAG_PAGE_LINE: u8 = 1;

/// A text block positioned within page coordinates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageLine {
    pub block: TextBlock,
    pub x: i16,
    pub y: i16,
}

impl PageLine {
    pub fn new(block: TextBlock, x: i16, y: i16) -> Self {
        Self { block, x, y }
    }

    pub fn render<R>(
        &self,
        renderer: &mut R,
        font_id: FontId,
        x_offset: i32,
        y_offset: i32,
    ) -> Result<(), R::Error>
    where
        R: TextRenderer + ?Sized,
    {
        self.block.render(
            renderer,
            font_id,
            self.x as i32 + x_offset,
            self.y as i32 + y_offset,
        )
    }

    pub fn serialize<W: Write + ?Sized>(&self, w: &mut W) -> Result<(), CodecError> {
        codec::write_i16(w, self.x)?;
        codec::write_i16(w, self.y)?;
        self.block.serialize(w)
    }

    pub fn deserialize<R: Read + ?Sized>(r: &mut R) -> Result<Self, CodecError> {
        let x = codec::read_i16(r)?;
        let y = codec::read_i16(r)?;
        let block = TextBlock::deserialize(r)?;
        Ok(Self { block, x, y })
    }
}

/// One drawable element of a page.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PageElement {
    Line(PageLine),
}

impl PageElement {
    pub fn tag(&self) -> u8 {
        match self {
            Self::Line(_) => TAG_PAGE_LINE,
        }
    }

    fn render<R>(&self, renderer: &mut R, font_id: FontId, x: i32, y: i32) -> Result<(), R::Error>
    where
        R: TextRenderer + ?Sized,
    {
        match self {
            Self::Line(line) => line.render(renderer, font_id, x, y),
        }
    }

    fn corrupt_word_count(&self, checkpoint: &str) -> usize {
        match self {
            Self::Line(line) => line.block.corrupt_word_count(checkpoint),
        }
    }

    fn serialize_body<W: Write + ?Sized>(&self, w: &mut W) -> Result<(), CodecError> {
        match self {
            Self::Line(line) => line.serialize(w),
        }
    }
}

impl From<PageLine> for PageElement {
    fn from(value: PageLine) -> Self {
        Self::Line(value)
    }
}

/// An ordered set of page elements.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Page {
    pub elements: Vec<PageElement>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, element: impl Into<PageElement>) {
        self.elements.push(element.into());
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterate the page's lines.
    pub fn lines(&self) -> impl Iterator<Item = &PageLine> + '_ {
        self.elements.iter().map(|el| match el {
            PageElement::Line(line) => line,
        })
    }

    pub fn render<R>(
        &self,
        renderer: &mut R,
        font_id: FontId,
        x_offset: i32,
        y_offset: i32,
    ) -> Result<(), R::Error>
    where
        R: TextRenderer + ?Sized,
    {
        for element in &self.elements {
            element.render(renderer, font_id, x_offset, y_offset)?;
        }
        Ok(())
    }

    /// Count corrupt words across all elements.
    pub fn corrupt_word_count(&self, checkpoint: &str) -> usize {
        let total = self
            .elements
            .iter()
            .map(|el| el.corrupt_word_count(checkpoint))
            .sum();
        if total > 0 {
            log::warn!("validation @ {}: {} corrupted words found", checkpoint, total);
        }
        total
    }

    pub fn serialize<W: Write + ?Sized>(&self, w: &mut W) -> Result<(), CodecError> {
        codec::write_count(w, "page element", self.elements.len())?;
        for element in &self.elements {
            codec::write_u8(w, element.tag())?;
            element.serialize_body(w)?;
        }
        Ok(())
    }

    /// Decode a page.
    ///
    /// Any failure discards the whole page; bytes already consumed are not
    /// recoverable.
    pub fn deserialize<R: Read + ?Sized>(r: &mut R) -> Result<Self, CodecError> {
        let count = codec::read_u16(r)? as usize;
        let mut elements = Vec::with_capacity(count.min(64));
        for _ in 0..count {
            let tag = codec::read_u8(r)?;
            match tag {
                TAG_PAGE_LINE => elements.push(PageElement::Line(PageLine::deserialize(r)?)),
                other => {
                    log::error!("page deserialization failed: unknown tag {}", other);
                    return Err(CodecError::UnknownElementTag(other));
                }
            }
        }
        Ok(Self { elements })
    }
}

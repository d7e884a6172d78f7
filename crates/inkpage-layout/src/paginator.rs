//! Stacking laid-out lines into fixed-height pages.

use inkpage::{BlockStyle, Page, PageLine, TextBlock};

use crate::layout_engine::LayoutEngine;
use crate::parsed_text::ParsedText;

/// Vertical page geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PaginatorConfig {
    pub viewport_height: u16,
    pub margin_top: i16,
    pub margin_bottom: i16,
    /// Left edge of the text column.
    pub margin_left: i16,
    /// Extra space between consecutive lines.
    pub line_gap: u16,
    /// Space after each paragraph.
    pub paragraph_gap: u16,
}

impl Default for PaginatorConfig {
    fn default() -> Self {
        Self {
            viewport_height: 800,
            margin_top: 8,
            margin_bottom: 8,
            margin_left: 8,
            line_gap: 0,
            paragraph_gap: 8,
        }
    }
}

impl PaginatorConfig {
    pub fn for_viewport(height: u16) -> Self {
        Self {
            viewport_height: height,
            ..Self::default()
        }
    }

    fn content_bottom(&self) -> i32 {
        self.viewport_height as i32 - self.margin_bottom as i32
    }
}

/// Places lines top to bottom and emits each page once it is full.
#[derive(Debug)]
pub struct Paginator {
    cfg: PaginatorConfig,
    line_height: i32,
    cursor_y: i32,
    page: Page,
    pages_emitted: usize,
}

impl Paginator {
    pub fn new(cfg: PaginatorConfig, line_height: u16) -> Self {
        Self {
            cfg,
            line_height: line_height.max(1) as i32,
            cursor_y: cfg.margin_top as i32,
            page: Page::new(),
            pages_emitted: 0,
        }
    }

    pub fn config(&self) -> &PaginatorConfig {
        &self.cfg
    }

    /// Pages handed to callbacks so far.
    pub fn pages_emitted(&self) -> usize {
        self.pages_emitted
    }

    fn at_page_top(&self) -> bool {
        self.page.is_empty()
    }

    fn flush<F: FnMut(Page)>(&mut self, on_page: &mut F) {
        if self.page.is_empty() {
            return;
        }
        let page = core::mem::take(&mut self.page);
        log::debug!(
            "paginator: page {} complete with {} lines",
            self.pages_emitted,
            page.len()
        );
        on_page(page);
        self.pages_emitted += 1;
        self.cursor_y = self.cfg.margin_top as i32;
    }

    /// Place one line, starting a new page first when it would not fit.
    ///
    /// A line taller than the page still lands on an empty page.
    pub fn push_line<F: FnMut(Page)>(&mut self, block: TextBlock, on_page: &mut F) {
        if self.cursor_y + self.line_height > self.cfg.content_bottom() && !self.at_page_top() {
            self.flush(on_page);
        }
        let x = self.cfg.margin_left as i32 + block.block_style().left_inset();
        self.page.push(PageLine::new(block, clamp_i16(x), clamp_i16(self.cursor_y)));
        self.cursor_y += self.line_height + self.cfg.line_gap as i32;
    }

    /// Advance the cursor. Ignored at the top of a page.
    pub fn add_vertical_gap(&mut self, gap: i32) {
        if gap <= 0 || self.at_page_top() {
            return;
        }
        self.cursor_y += gap;
    }

    /// Lay out `text` and place all of its lines, including the box space
    /// above and below the block.
    pub fn layout_paragraph<F: FnMut(Page)>(
        &mut self,
        engine: &LayoutEngine,
        text: &mut ParsedText,
        on_page: &mut F,
    ) -> usize {
        let style: BlockStyle = *text.block_style();
        self.add_vertical_gap(style.margin_top as i32 + style.padding_top as i32);
        let lines = text.layout_and_extract_lines(engine, true, |block| {
            self.push_line(block, on_page);
        });
        self.add_vertical_gap(
            style.margin_bottom as i32 + style.padding_bottom as i32 + self.cfg.paragraph_gap as i32,
        );
        lines
    }

    /// Emit the partially filled page, if any.
    pub fn finish<F: FnMut(Page)>(&mut self, on_page: &mut F) {
        self.flush(on_page);
    }
}

fn clamp_i16(value: i32) -> i16 {
    value.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

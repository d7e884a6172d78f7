//! Persisted page model and binary page codec for e-paper reading devices.
//!
//! A laid-out page is a list of lines, each a [`TextBlock`] of positioned
//! words placed at an offset. Pages are written once after layout and read
//! back on every display, so the codec is compact, little-endian and
//! defensive about lengths coming back from flaky storage.
//!
//! Line breaking and justification live in the `inkpage-layout` crate, which
//! produces the [`TextBlock`]s stored here.
//!
//! ```
//! use inkpage::{Alignment, BlockStyle, FontStyle, Page, PageLine, TextBlock};
//!
//! let block = TextBlock::new(
//!     vec!["Hello".into(), "world".into()],
//!     vec![0, 48],
//!     vec![FontStyle::REGULAR, FontStyle::BOLD],
//!     BlockStyle::aligned(Alignment::Left),
//! );
//! let mut page = Page::new();
//! page.push(PageLine::new(block, 16, 24));
//!
//! let mut bytes = Vec::new();
//! page.serialize(&mut bytes)?;
//! assert_eq!(Page::deserialize(&mut bytes.as_slice())?, page);
//! # Ok::<(), inkpage::CodecError>(())
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

pub mod codec;
pub mod error;
mod measure;
mod page;
pub mod page_cache;
mod style;
mod text_block;
pub mod utf8;

pub use error::CodecError;
pub use measure::{MonospaceMeasurer, TextMeasurer, TextRenderer};
pub use page::{Page, PageElement, PageLine, TAG_PAGE_LINE};
pub use page_cache::{LayoutFingerprint, PageCacheReader, PageCacheWriter};
pub use style::{Alignment, BlockStyle, FontId, FontStyle};
pub use text_block::{TextBlock, INDENT_MARKER, MAX_WORDS_PER_BLOCK};

//! Section cache file holding many laid-out pages.
//!
//! Layout:
//!
//! ```text
//! [b"IKPC"][u8 version][fingerprint][u16 page_count][u32 lut_offset]
//! [page bytes]*page_count
//! [u32 offset][u32 len][u32 crc32]*page_count   <- at lut_offset
//! ```
//!
//! Offsets are relative to the start of the header. The writer reserves the
//! header, streams pages, appends the lookup table and then seeks back to fill
//! in the count and table offset. A cache whose fingerprint differs from the
//! current layout parameters is stale and rejected on open.

use std::io::{Read, Seek, SeekFrom, Write};

use crate::codec;
use crate::error::CodecError;
use crate::page::Page;
use crate::style::{Alignment, FontId};

pub const CACHE_MAGIC: [u8; 4] = *b"IKPC";
pub const CACHE_SCHEMA_VERSION: u8 = 1;

/// Largest page record a reader will load.
pub const MAX_PAGE_BYTES: usize = 1024 * 1024;

/// Layout parameters a cached section was produced with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutFingerprint {
    pub font_id: FontId,
    pub viewport_width: u16,
    pub viewport_height: u16,
    pub margin_top: i16,
    pub margin_bottom: i16,
    pub margin_left: i16,
    pub margin_right: i16,
    pub alignment: Alignment,
    pub hyphenation_enabled: bool,
    pub extra_paragraph_spacing: bool,
    /// Line breaker selection, as tagged by the layout crate.
    pub break_strategy: u8,
    /// Paragraph length above which automatic selection goes greedy.
    pub max_optimal_words: u32,
}

impl LayoutFingerprint {
    fn write<W: Write + ?Sized>(&self, w: &mut W) -> Result<(), CodecError> {
        codec::write_i32(w, self.font_id)?;
        codec::write_u16(w, self.viewport_width)?;
        codec::write_u16(w, self.viewport_height)?;
        codec::write_i16(w, self.margin_top)?;
        codec::write_i16(w, self.margin_bottom)?;
        codec::write_i16(w, self.margin_left)?;
        codec::write_i16(w, self.margin_right)?;
        codec::write_u8(w, self.alignment.as_u8())?;
        codec::write_bool(w, self.hyphenation_enabled)?;
        codec::write_bool(w, self.extra_paragraph_spacing)?;
        codec::write_u8(w, self.break_strategy)?;
        codec::write_u32(w, self.max_optimal_words)
    }

    fn read<R: Read + ?Sized>(r: &mut R) -> Result<Self, CodecError> {
        Ok(Self {
            font_id: codec::read_i32(r)?,
            viewport_width: codec::read_u16(r)?,
            viewport_height: codec::read_u16(r)?,
            margin_top: codec::read_i16(r)?,
            margin_bottom: codec::read_i16(r)?,
            margin_left: codec::read_i16(r)?,
            margin_right: codec::read_i16(r)?,
            alignment: Alignment::try_from(codec::read_u8(r)?)?,
            hyphenation_enabled: codec::read_bool(r)?,
            extra_paragraph_spacing: codec::read_bool(r)?,
            break_strategy: codec::read_u8(r)?,
            max_optimal_words: codec::read_u32(r)?,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct LutEntry {
    offset: u32,
    len: u32,
    crc: u32,
}

const FINGERPRINT_BYTES: u64 = 4 + 2 + 2 + 4 * 2 + 3 + 1 + 4;

/// Byte offset of the page count within the header.
const COUNT_FIELD_OFFSET: u64 = CACHE_MAGIC.len() as u64 + 1 + FINGERPRINT_BYTES;

fn offset_u32(value: u64) -> Result<u32, CodecError> {
    u32::try_from(value).map_err(|_| CodecError::CountOverflow {
        kind: "cache offset",
        actual: value as usize,
        limit: u32::MAX as usize,
    })
}

/// Streams pages into a cache file.
pub struct PageCacheWriter<W> {
    inner: W,
    start: u64,
    entries: Vec<LutEntry>,
    scratch: Vec<u8>,
}

impl<W: Write + Seek> PageCacheWriter<W> {
    /// Write the header placeholder at the stream's current position.
    pub fn create(mut inner: W, fingerprint: &LayoutFingerprint) -> Result<Self, CodecError> {
        let start = inner.stream_position()?;
        inner.write_all(&CACHE_MAGIC)?;
        codec::write_u8(&mut inner, CACHE_SCHEMA_VERSION)?;
        fingerprint.write(&mut inner)?;
        codec::write_u16(&mut inner, 0)?;
        codec::write_u32(&mut inner, 0)?;
        Ok(Self {
            inner,
            start,
            entries: Vec::new(),
            scratch: Vec::with_capacity(512),
        })
    }

    pub fn page_count(&self) -> usize {
        self.entries.len()
    }

    /// Append one page, returning its index.
    pub fn add_page(&mut self, page: &Page) -> Result<usize, CodecError> {
        if self.entries.len() >= u16::MAX as usize {
            return Err(CodecError::CountOverflow {
                kind: "cached page",
                actual: self.entries.len() + 1,
                limit: u16::MAX as usize,
            });
        }
        self.scratch.clear();
        page.serialize(&mut self.scratch)?;

        let offset = offset_u32(self.inner.stream_position()? - self.start)?;
        self.inner.write_all(&self.scratch)?;
        self.entries.push(LutEntry {
            offset,
            len: offset_u32(self.scratch.len() as u64)?,
            crc: crc32fast::hash(&self.scratch),
        });
        Ok(self.entries.len() - 1)
    }

    /// Write the lookup table, patch the header and hand back the stream.
    pub fn finish(mut self) -> Result<W, CodecError> {
        let lut_at = self.inner.stream_position()?;
        for entry in &self.entries {
            codec::write_u32(&mut self.inner, entry.offset)?;
            codec::write_u32(&mut self.inner, entry.len)?;
            codec::write_u32(&mut self.inner, entry.crc)?;
        }
        let end = self.inner.stream_position()?;

        self.inner
            .seek(SeekFrom::Start(self.start + COUNT_FIELD_OFFSET))?;
        codec::write_count(&mut self.inner, "cached page", self.entries.len())?;
        codec::write_u32(&mut self.inner, offset_u32(lut_at - self.start)?)?;
        self.inner.seek(SeekFrom::Start(end))?;
        self.inner.flush()?;
        log::debug!(
            "page cache written: pages={} bytes={}",
            self.entries.len(),
            end - self.start
        );
        Ok(self.inner)
    }
}

/// Random access to pages in a cache file.
pub struct PageCacheReader<R> {
    inner: R,
    start: u64,
    fingerprint: LayoutFingerprint,
    entries: Vec<LutEntry>,
}

impl<R: Read + Seek> PageCacheReader<R> {
    /// Validate the header and load the lookup table.
    ///
    /// Fails when the cache was built for a different `expected` layout.
    pub fn open(mut inner: R, expected: &LayoutFingerprint) -> Result<Self, CodecError> {
        let start = inner.stream_position()?;
        let mut magic = [0u8; 4];
        inner.read_exact(&mut magic)?;
        if magic != CACHE_MAGIC {
            return Err(CodecError::BadMagic);
        }
        let version = codec::read_u8(&mut inner)?;
        if version != CACHE_SCHEMA_VERSION {
            return Err(CodecError::CacheVersion {
                found: version,
                expected: CACHE_SCHEMA_VERSION,
            });
        }
        let fingerprint = LayoutFingerprint::read(&mut inner)?;
        if fingerprint != *expected {
            log::debug!("page cache stale: {:?} != {:?}", fingerprint, expected);
            return Err(CodecError::FingerprintMismatch);
        }
        let count = codec::read_u16(&mut inner)? as usize;
        let lut_offset = codec::read_u32(&mut inner)? as u64;

        inner.seek(SeekFrom::Start(start + lut_offset))?;
        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            entries.push(LutEntry {
                offset: codec::read_u32(&mut inner)?,
                len: codec::read_u32(&mut inner)?,
                crc: codec::read_u32(&mut inner)?,
            });
        }
        Ok(Self {
            inner,
            start,
            fingerprint,
            entries,
        })
    }

    pub fn fingerprint(&self) -> &LayoutFingerprint {
        &self.fingerprint
    }

    pub fn page_count(&self) -> usize {
        self.entries.len()
    }

    /// Load and verify the page at `index`.
    pub fn load_page(&mut self, index: usize) -> Result<Page, CodecError> {
        let entry = *self
            .entries
            .get(index)
            .ok_or(CodecError::PageOutOfRange {
                index,
                count: self.entries.len(),
            })?;
        if entry.len as usize > MAX_PAGE_BYTES {
            log::error!("page {} record length {} exceeds maximum", index, entry.len);
            return Err(CodecError::CountOverflow {
                kind: "page bytes",
                actual: entry.len as usize,
                limit: MAX_PAGE_BYTES,
            });
        }
        self.inner
            .seek(SeekFrom::Start(self.start + entry.offset as u64))?;
        let mut buf = vec![0u8; entry.len as usize];
        self.inner.read_exact(&mut buf)?;
        if crc32fast::hash(&buf) != entry.crc {
            log::error!("page {} failed checksum", index);
            return Err(CodecError::ChecksumMismatch { index });
        }
        let page = Page::deserialize(&mut buf.as_slice())?;
        page.corrupt_word_count("cache load");
        Ok(page)
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

/// Open the cache at `path` and load one page.
pub fn load_page_from_path(
    path: &std::path::Path,
    expected: &LayoutFingerprint,
    index: usize,
) -> Result<Page, CodecError> {
    let file = std::fs::File::open(path)?;
    let mut reader = PageCacheReader::open(std::io::BufReader::new(file), expected)?;
    reader.load_page(index)
}

/// Load one page on tokio's blocking pool.
#[cfg(feature = "async")]
pub async fn load_page_async(
    path: std::path::PathBuf,
    expected: LayoutFingerprint,
    index: usize,
) -> Result<Page, CodecError> {
    tokio::task::spawn_blocking(move || load_page_from_path(&path, &expected, index))
        .await
        .map_err(|err| CodecError::Io(std::io::Error::other(err)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::PageLine;
    use crate::style::{BlockStyle, FontStyle};
    use crate::text_block::TextBlock;
    use std::io::Cursor;

    fn fingerprint() -> LayoutFingerprint {
        LayoutFingerprint {
            font_id: -7,
            viewport_width: 464,
            viewport_height: 760,
            margin_top: 12,
            margin_bottom: 12,
            margin_left: 8,
            margin_right: 8,
            alignment: Alignment::Justified,
            hyphenation_enabled: true,
            extra_paragraph_spacing: false,
            break_strategy: 2,
            max_optimal_words: 4096,
        }
    }

    fn page_with(word: &str) -> Page {
        let mut page = Page::new();
        page.push(PageLine::new(
            TextBlock::new(
                vec![word.to_string()],
                vec![0],
                vec![FontStyle::REGULAR],
                BlockStyle::default(),
            ),
            0,
            0,
        ));
        page
    }

    fn write_cache(prefix: &[u8], pages: &[Page]) -> Vec<u8> {
        let mut cursor = Cursor::new(prefix.to_vec());
        cursor.seek(SeekFrom::End(0)).unwrap();
        let mut writer = PageCacheWriter::create(cursor, &fingerprint()).unwrap();
        for page in pages {
            writer.add_page(page).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn pages_load_by_index() {
        let pages = [page_with("one"), page_with("two"), page_with("three")];
        let bytes = write_cache(&[], &pages);
        let mut reader = PageCacheReader::open(Cursor::new(bytes), &fingerprint()).unwrap();
        assert_eq!(reader.page_count(), 3);
        assert_eq!(reader.load_page(2).unwrap(), pages[2]);
        assert_eq!(reader.load_page(0).unwrap(), pages[0]);
        assert!(matches!(
            reader.load_page(3),
            Err(CodecError::PageOutOfRange { index: 3, count: 3 })
        ));
    }

    #[test]
    fn header_offsets_are_relative_to_cache_start() {
        let pages = [page_with("embedded")];
        let bytes = write_cache(b"prefix!", &pages);
        let mut cursor = Cursor::new(bytes);
        cursor.seek(SeekFrom::Start(7)).unwrap();
        let mut reader = PageCacheReader::open(cursor, &fingerprint()).unwrap();
        assert_eq!(reader.load_page(0).unwrap(), pages[0]);
    }

    #[test]
    fn count_field_offset_matches_header_layout() {
        let bytes = write_cache(&[], &[page_with("a"), page_with("b")]);
        let at = COUNT_FIELD_OFFSET as usize;
        assert_eq!(&bytes[at..at + 2], &[2, 0]);
    }

    #[test]
    fn flipped_payload_byte_fails_checksum() {
        let mut bytes = write_cache(&[], &[page_with("checksum")]);
        let first_page_byte = COUNT_FIELD_OFFSET as usize + 2 + 4;
        bytes[first_page_byte + 10] ^= 0x20;
        let mut reader = PageCacheReader::open(Cursor::new(bytes), &fingerprint()).unwrap();
        assert!(matches!(
            reader.load_page(0),
            Err(CodecError::ChecksumMismatch { index: 0 })
        ));
    }

    #[test]
    fn stale_fingerprint_is_rejected() {
        let bytes = write_cache(&[], &[page_with("x")]);
        let other = LayoutFingerprint {
            viewport_width: 480,
            ..fingerprint()
        };
        assert!(matches!(
            PageCacheReader::open(Cursor::new(bytes), &other),
            Err(CodecError::FingerprintMismatch)
        ));
    }

    #[test]
    fn breaker_settings_are_part_of_the_fingerprint() {
        let bytes = write_cache(&[], &[page_with("x")]);
        for other in [
            LayoutFingerprint {
                break_strategy: 1,
                ..fingerprint()
            },
            LayoutFingerprint {
                max_optimal_words: 512,
                ..fingerprint()
            },
        ] {
            assert!(matches!(
                PageCacheReader::open(Cursor::new(bytes.clone()), &other),
                Err(CodecError::FingerprintMismatch)
            ));
        }
    }

    #[test]
    fn wrong_magic_and_version_are_rejected() {
        let mut bytes = write_cache(&[], &[]);
        bytes[4] = 99;
        assert!(matches!(
            PageCacheReader::open(Cursor::new(bytes.clone()), &fingerprint()),
            Err(CodecError::CacheVersion { found: 99, .. })
        ));
        bytes[0] = b'X';
        assert!(matches!(
            PageCacheReader::open(Cursor::new(bytes), &fingerprint()),
            Err(CodecError::BadMagic)
        ));
    }
}

//! `.storybook` reader

use std::io::Read;
use std::path::Path;

use tracing::{debug, trace, warn};

use crate::error::{Error, Field, Result};
use crate::io::{ByteSource, FileSource, MemorySource, SourceCursor};
use crate::story::{Page, Story};

use super::{MIN_PAGE_SIZE, zlib};

/// Read a `.storybook` file into a [`Story`].
pub fn read_story<P: AsRef<Path>>(path: P) -> Result<Story> {
    let source = FileSource::open(path)?;
    read_story_from_source(&source)
}

/// Read a story from any sequential reader.
///
/// The reader is drained to its end first; the decoder itself only ever
/// sees the bytes that were actually delivered.
pub fn read_story_from_reader<R: Read>(mut reader: R) -> Result<Story> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    decode(&data)
}

/// Decode an in-memory `.storybook` image.
pub fn decode(data: &[u8]) -> Result<Story> {
    read_story_from_source(&MemorySource::new(data))
}

/// Read a story from a random-access [`ByteSource`].
///
/// Nothing is returned unless every field decodes; there is no partially
/// populated result.
pub fn read_story_from_source(source: &dyn ByteSource) -> Result<Story> {
    let mut cursor = SourceCursor::new(source);

    let title = decode_text(cursor.read_until_nul(Field::Title)?, Field::Title);
    let author = decode_text(cursor.read_until_nul(Field::Author)?, Field::Author);
    let page_count = usize::from(cursor.read_u16_be(Field::PageCount)?);

    // Don't trust the count for the allocation: each page needs at least
    // MIN_PAGE_SIZE bytes.
    let plausible = usize::try_from(cursor.remaining() / MIN_PAGE_SIZE).unwrap_or(usize::MAX);
    let mut pages = Vec::with_capacity(page_count.min(plausible));

    for index in 0..page_count {
        pages.push(read_page(&mut cursor, index)?);
    }

    let trailing = cursor.remaining();
    if trailing > 0 {
        debug!(trailing, "ignoring bytes after last page");
    }
    debug!(title = %title, author = %author, pages = pages.len(), "decoded story");

    Ok(Story::from_parts(title, author, pages))
}

fn read_page(cursor: &mut SourceCursor<'_>, index: usize) -> Result<Page> {
    let choice1 = cursor.read_u16_be(Field::Choice1)?;
    let choice2 = cursor.read_u16_be(Field::Choice2)?;

    let image = read_compressed(cursor, index, Field::ImageLength, Field::Image)?;
    let text = read_compressed(cursor, index, Field::TextLength, Field::Text)?
        .map(|bytes| decode_text(bytes, Field::Text))
        .unwrap_or_default();

    trace!(
        index,
        choice1,
        choice2,
        image_len = image.as_ref().map(Vec::len),
        text_len = text.len(),
        "decoded page"
    );

    let mut page = Page::new(text).with_choices(choice1, choice2);
    if let Some(image) = image {
        page.set_image(image);
    }
    Ok(page)
}

/// A u32 length followed by that many bytes of zlib data. Length `0`
/// means the field is absent.
fn read_compressed(
    cursor: &mut SourceCursor<'_>,
    page: usize,
    length_field: Field,
    field: Field,
) -> Result<Option<Vec<u8>>> {
    let len = cursor.read_u32_be(length_field)?;
    if len == 0 {
        return Ok(None);
    }
    let compressed = cursor.read_exact(u64::from(len), field)?;
    zlib::decompress(&compressed)
        .map(Some)
        .map_err(|source| Error::DecompressionFailure {
            page,
            field,
            source,
        })
}

fn decode_text(bytes: Vec<u8>, field: Field) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            warn!(%field, "invalid UTF-8, replacing bad sequences");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(title: &[u8], author: &[u8], pages: u16) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(title);
        data.push(0);
        data.extend_from_slice(author);
        data.push(0);
        data.extend_from_slice(&pages.to_be_bytes());
        data
    }

    fn push_field(data: &mut Vec<u8>, payload: &[u8]) {
        let compressed = zlib::compress(payload, zlib::DEFAULT_LEVEL).unwrap();
        data.extend_from_slice(&(compressed.len() as u32).to_be_bytes());
        data.extend_from_slice(&compressed);
    }

    #[test]
    fn test_decode_empty_story() {
        let story = decode(&header(b"Cave", b"Ann", 0)).unwrap();
        assert_eq!(story.title(), "Cave");
        assert_eq!(story.author(), "Ann");
        assert!(story.is_empty());
    }

    #[test]
    fn test_decode_single_page() {
        let mut data = header(b"T", b"A", 1);
        data.extend_from_slice(&[0x00, 0x02, 0x01, 0x00]);
        push_field(&mut data, b"\x89PNG");
        push_field(&mut data, "caf\u{e9}".as_bytes());

        let story = decode(&data).unwrap();
        let page = story.page(0).unwrap();
        assert_eq!(page.choice1(), 2);
        assert_eq!(page.choice2(), 256);
        assert_eq!(page.image(), Some(&b"\x89PNG"[..]));
        assert_eq!(page.text(), "caf\u{e9}");
    }

    #[test]
    fn test_zero_length_text_is_empty_string() {
        let mut data = header(b"T", b"A", 1);
        data.extend_from_slice(&[0; 4]);
        data.extend_from_slice(&[0; 4]);
        data.extend_from_slice(&[0; 4]);

        let story = decode(&data).unwrap();
        let page = story.page(0).unwrap();
        assert_eq!(page.text(), "");
        assert!(!page.has_image());
    }

    #[test]
    fn test_missing_author_terminator() {
        let err = decode(b"Title\0Author").unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedField {
                field: Field::Author
            }
        ));
    }

    #[test]
    fn test_missing_page_count() {
        let err = decode(b"T\0A\0\x00").unwrap_err();
        assert!(matches!(
            err,
            Error::TruncatedStream {
                field: Field::PageCount,
                offset: 4,
                needed: 2,
                available: 1
            }
        ));
    }

    #[test]
    fn test_declared_image_longer_than_stream() {
        let mut data = header(b"T", b"A", 1);
        data.extend_from_slice(&[0; 4]);
        data.extend_from_slice(&1000u32.to_be_bytes());
        data.extend_from_slice(&[0x78, 0x9c]);

        let err = decode(&data).unwrap_err();
        assert!(matches!(
            err,
            Error::TruncatedStream {
                field: Field::Image,
                needed: 1000,
                available: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_fewer_pages_than_declared() {
        let mut data = header(b"T", b"A", 2);
        data.extend_from_slice(&[0; 4]);
        data.extend_from_slice(&[0; 4]);
        push_field(&mut data, b"one");

        let err = decode(&data).unwrap_err();
        assert!(matches!(
            err,
            Error::TruncatedStream {
                field: Field::Choice1,
                ..
            }
        ));
    }

    #[test]
    fn test_corrupt_text_payload() {
        let mut data = header(b"T", b"A", 1);
        data.extend_from_slice(&[0; 4]);
        data.extend_from_slice(&[0; 4]);
        data.extend_from_slice(&5u32.to_be_bytes());
        data.extend_from_slice(b"hello");

        match decode(&data).unwrap_err() {
            Error::DecompressionFailure { page, field, .. } => {
                assert_eq!(page, 0);
                assert_eq!(field, Field::Text);
            }
            other => panic!("expected decompression failure, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let story = decode(&header(b"Caf\xe9", b"A", 0)).unwrap();
        assert_eq!(story.title(), "Caf\u{fffd}");
    }

    #[test]
    fn test_trailing_bytes_are_ignored() {
        let mut data = header(b"T", b"A", 0);
        data.extend_from_slice(b"junk");
        assert!(decode(&data).unwrap().is_empty());
    }

    #[test]
    fn test_choice_past_end_decodes() {
        let mut data = header(b"T", b"A", 1);
        data.extend_from_slice(&[0xFF, 0xFF, 0x00, 0x09]);
        data.extend_from_slice(&[0; 4]);
        push_field(&mut data, b"");

        let story = decode(&data).unwrap();
        assert_eq!(story.page(0).unwrap().choice1(), u16::MAX);
        assert_eq!(story.dangling_choices().len(), 2);
    }

    #[test]
    fn test_read_from_reader() {
        let data = header(b"T", b"A", 0);
        let story = read_story_from_reader(std::io::Cursor::new(data)).unwrap();
        assert_eq!(story.title(), "T");
    }
}

//! `.storybook` writer
//!
//! Serializes a [`Story`] into the storybook wire format.

use std::io::{self, Write};
use std::path::Path;

use tracing::{debug, trace};

use crate::error::{Error, Field, Result};
use crate::story::Story;

use super::zlib::FieldCompressor;
use super::{MAX_PAGES, WriteOptions};

/// Write a [`Story`] to a file path.
///
/// The story is fully encoded before the file is created, so an
/// unencodable story never leaves a partial file behind.
pub fn write_story<P: AsRef<Path>>(story: &Story, path: P) -> Result<()> {
    write_story_with_options(story, path, &WriteOptions::default())
}

pub fn write_story_with_options<P: AsRef<Path>>(
    story: &Story,
    path: P,
    options: &WriteOptions,
) -> Result<()> {
    let data = encode_with_options(story, options)?;
    let file = std::fs::File::create(path)?;
    let mut writer = io::BufWriter::new(file);
    writer.write_all(&data)?;
    writer.flush()?;
    Ok(())
}

/// Write a [`Story`] to any [`Write`] destination.
///
/// Header constraints are checked before the first byte is written.
pub fn write_story_to_writer<W: Write>(story: &Story, writer: &mut W) -> Result<()> {
    StoryWriter::new(story, &WriteOptions::default())?.write(writer)
}

/// Encode a story into a new buffer with default options.
pub fn encode(story: &Story) -> Result<Vec<u8>> {
    encode_with_options(story, &WriteOptions::default())
}

pub fn encode_with_options(story: &Story, options: &WriteOptions) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    StoryWriter::new(story, options)?.write(&mut out)?;
    Ok(out)
}

struct StoryWriter<'a> {
    story: &'a Story,
    page_count: u16,
    compressor: FieldCompressor,
}

impl<'a> StoryWriter<'a> {
    fn new(story: &'a Story, options: &WriteOptions) -> Result<Self> {
        check_terminated_string(Field::Title, story.title())?;
        check_terminated_string(Field::Author, story.author())?;

        let page_count = u16::try_from(story.len()).map_err(|_| Error::FieldTooLarge {
            field: Field::PageCount,
            reason: format!("{} pages exceeds the maximum of {MAX_PAGES}", story.len()),
        })?;

        Ok(Self {
            story,
            page_count,
            compressor: FieldCompressor::new(options.compression_level()),
        })
    }

    fn write<W: Write>(mut self, writer: &mut W) -> Result<()> {
        let story = self.story;
        writer.write_all(story.title().as_bytes())?;
        writer.write_all(&[0])?;
        writer.write_all(story.author().as_bytes())?;
        writer.write_all(&[0])?;
        writer.write_all(&self.page_count.to_be_bytes())?;

        for (index, page) in story.pages().iter().enumerate() {
            writer.write_all(&page.choice1().to_be_bytes())?;
            writer.write_all(&page.choice2().to_be_bytes())?;

            match page.image() {
                Some(image) => self.write_compressed(writer, index, Field::Image, image)?,
                None => writer.write_all(&0u32.to_be_bytes())?,
            }
            self.write_compressed(writer, index, Field::Text, page.text().as_bytes())?;

            trace!(index, choice1 = page.choice1(), choice2 = page.choice2(), "encoded page");
        }

        writer.flush()?;
        debug!(title = story.title(), pages = self.page_count, "encoded story");
        Ok(())
    }

    fn write_compressed<W: Write>(
        &mut self,
        writer: &mut W,
        page: usize,
        field: Field,
        data: &[u8],
    ) -> Result<()> {
        let compressed = self.compressor.compress(data)?;
        let len = u32::try_from(compressed.len()).map_err(|_| Error::FieldTooLarge {
            field,
            reason: format!(
                "page index {page}: compressed size {} does not fit in 32 bits",
                compressed.len()
            ),
        })?;
        writer.write_all(&len.to_be_bytes())?;
        writer.write_all(&compressed)?;
        Ok(())
    }
}

/// NUL terminates title and author on disk, so it cannot appear inside them.
fn check_terminated_string(field: Field, value: &str) -> Result<()> {
    match memchr::memchr(0, value.as_bytes()) {
        Some(pos) => Err(Error::FieldTooLarge {
            field,
            reason: format!("contains a NUL byte at offset {pos}"),
        }),
        None => Ok(()),
    }
}

//! The `.storybook` binary format.
//!
//! ```text
//! title   bytes, 0x00
//! author  bytes, 0x00
//! u16     page count
//! per page:
//!   u16   choice 1        (1-based page number, 0 = none)
//!   u16   choice 2
//!   u32   image length    (0 = no image), then zlib(image)
//!   u32   text length,    then zlib(text)
//! ```
//!
//! All integers are big-endian.

mod reader;
mod writer;
pub mod zlib;

pub use reader::{decode, read_story, read_story_from_reader, read_story_from_source};
pub use writer::{
    encode, encode_with_options, write_story, write_story_to_writer, write_story_with_options,
};

/// Largest page count the u16 header can carry.
pub const MAX_PAGES: usize = u16::MAX as usize;

/// Smallest possible encoded page: two choices and two length words.
pub(crate) const MIN_PAGE_SIZE: u64 = 2 + 2 + 4 + 4;

/// Encoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    compression_level: u32,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            compression_level: zlib::DEFAULT_LEVEL,
        }
    }
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// zlib level from 0 (stored) to 9 (smallest). Larger values are clamped.
    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level.min(9);
        self
    }

    pub fn compression_level(&self) -> u32 {
        self.compression_level
    }
}

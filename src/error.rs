//! Error types for storybook operations.

use std::fmt;

use thiserror::Error;

use crate::story::ChoiceSlot;

/// A named field of the storybook wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Author,
    PageCount,
    Choice1,
    Choice2,
    ImageLength,
    Image,
    TextLength,
    Text,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Title => "title",
            Field::Author => "author",
            Field::PageCount => "page count",
            Field::Choice1 => "choice 1",
            Field::Choice2 => "choice 2",
            Field::ImageLength => "image length",
            Field::Image => "image",
            Field::TextLength => "text length",
            Field::Text => "text",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while reading, writing or navigating a story.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A NUL-terminated string never found its terminator.
    #[error("malformed {field}: no NUL terminator before end of stream")]
    MalformedField { field: Field },

    /// A fixed-width or length-prefixed field runs past the end of the stream.
    #[error(
        "truncated stream: {field} at offset {offset} needs {needed} bytes, only {available} left"
    )]
    TruncatedStream {
        field: Field,
        offset: u64,
        needed: u64,
        available: u64,
    },

    #[error("page index {page}: {field} is not valid zlib data: {source}")]
    DecompressionFailure {
        page: usize,
        field: Field,
        #[source]
        source: std::io::Error,
    },

    #[error("{field} cannot be written: {reason}")]
    FieldTooLarge { field: Field, reason: String },

    #[error("page index {index} out of range for story with {len} pages")]
    IndexOutOfRange { index: usize, len: usize },

    /// The choice being followed holds the `0` sentinel.
    #[error("page index {page} has no {slot}")]
    AbsentChoice { page: usize, slot: ChoiceSlot },
}

pub type Result<T> = std::result::Result<T, Error>;

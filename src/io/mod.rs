//! Byte sources and a bounds-checked cursor for decoding.

mod byte_source;
mod cursor;

pub use byte_source::{ByteSource, FileSource, MemorySource};
pub use cursor::SourceCursor;

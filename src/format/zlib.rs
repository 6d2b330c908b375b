//! Per-field zlib compression.
//!
//! Each text and image payload is an independent zlib stream (RFC 1950
//! header and Adler-32 trailer included), with no dictionary shared
//! between fields.

use std::io;

use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};

/// zlib's own default level.
pub const DEFAULT_LEVEL: u32 = 6;

/// Compresses one field after another, reusing a single deflate state.
pub struct FieldCompressor {
    inner: Compress,
}

impl FieldCompressor {
    pub fn new(level: u32) -> Self {
        Self {
            inner: Compress::new(Compression::new(level.min(9)), true),
        }
    }

    /// Compress `data` into a complete, standalone zlib stream.
    pub fn compress(&mut self, data: &[u8]) -> io::Result<Vec<u8>> {
        self.inner.reset();
        let mut out = Vec::with_capacity(data.len() / 2 + 64);
        let mut consumed = 0usize;

        loop {
            if out.len() == out.capacity() {
                out.reserve(out.capacity().max(64));
            }
            let before = self.inner.total_in();
            let status = self
                .inner
                .compress_vec(&data[consumed..], &mut out, FlushCompress::Finish)
                .map_err(io::Error::other)?;
            consumed += (self.inner.total_in() - before) as usize;

            if status == Status::StreamEnd {
                return Ok(out);
            }
        }
    }
}

/// Compress a single field at `level`.
pub fn compress(data: &[u8], level: u32) -> io::Result<Vec<u8>> {
    FieldCompressor::new(level).compress(data)
}

/// Inflate one complete zlib stream.
///
/// Corrupt data fails with `InvalidData`; a stream that stops before its
/// end marker fails with `UnexpectedEof`. Bytes after the end marker are
/// ignored.
pub fn decompress(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut inflater = Decompress::new(true);
    let mut out = Vec::with_capacity(data.len().saturating_mul(4).min(1 << 20));
    let mut consumed = 0usize;

    loop {
        if out.len() == out.capacity() {
            out.reserve(out.capacity().max(256));
        }
        let in_before = inflater.total_in();
        let out_before = inflater.total_out();
        let status = inflater
            .decompress_vec(&data[consumed..], &mut out, FlushDecompress::None)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        consumed += (inflater.total_in() - in_before) as usize;

        match status {
            Status::StreamEnd => return Ok(out),
            Status::Ok | Status::BufError => {
                let stalled =
                    inflater.total_in() == in_before && inflater.total_out() == out_before;
                if stalled {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "zlib stream ends before its end marker",
                    ));
                }
            }
        }
    }
}

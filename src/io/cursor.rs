use super::byte_source::ByteSource;
use crate::error::{Error, Field, Result};

/// Bytes fetched per step while scanning for a NUL terminator.
const SCAN_CHUNK: usize = 256;

/// A sequential reader over a [`ByteSource`].
///
/// Every read is checked against the bytes that remain before anything is
/// allocated, so a corrupt length field fails with
/// [`Error::TruncatedStream`] instead of a short read or a huge buffer.
pub struct SourceCursor<'a> {
    inner: &'a dyn ByteSource,
    position: u64,
}

impl<'a> SourceCursor<'a> {
    pub fn new(inner: &'a dyn ByteSource) -> Self {
        Self { inner, position: 0 }
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn remaining(&self) -> u64 {
        self.inner.len().saturating_sub(self.position)
    }

    /// Read exactly `len` bytes for `field`.
    pub fn read_exact(&mut self, len: u64, field: Field) -> Result<Vec<u8>> {
        let available = self.remaining();
        if len > available {
            return Err(Error::TruncatedStream {
                field,
                offset: self.position,
                needed: len,
                available,
            });
        }
        // Cannot overflow usize: `len` fits in the source.
        let data = self.inner.read_at(self.position, len as usize)?;
        self.position += len;
        Ok(data)
    }

    fn read_array<const N: usize>(&mut self, field: Field) -> Result<[u8; N]> {
        let available = self.remaining();
        if (N as u64) > available {
            return Err(Error::TruncatedStream {
                field,
                offset: self.position,
                needed: N as u64,
                available,
            });
        }
        let mut buf = [0u8; N];
        self.inner.read_at_into(self.position, &mut buf)?;
        self.position += N as u64;
        Ok(buf)
    }

    pub fn read_u16_be(&mut self, field: Field) -> Result<u16> {
        self.read_array::<2>(field).map(u16::from_be_bytes)
    }

    pub fn read_u32_be(&mut self, field: Field) -> Result<u32> {
        self.read_array::<4>(field).map(u32::from_be_bytes)
    }

    /// Read up to (not including) the next NUL byte and step past it.
    pub fn read_until_nul(&mut self, field: Field) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut scan = self.position;
        let end = self.inner.len();

        while scan < end {
            let step = (end - scan).min(SCAN_CHUNK as u64) as usize;
            let chunk = self.inner.read_at(scan, step)?;
            if let Some(nul) = memchr::memchr(0, &chunk) {
                out.extend_from_slice(&chunk[..nul]);
                self.position = scan + nul as u64 + 1;
                return Ok(out);
            }
            out.extend_from_slice(&chunk);
            scan += step as u64;
        }

        Err(Error::MalformedField { field })
    }
}

use std::fs::File;
use std::io;
#[cfg(all(not(unix), not(windows)))]
use std::io::{Read, Seek, SeekFrom};

/// A random-access source of bytes.
///
/// Reads never move a shared cursor, so one source can back several
/// independent [`SourceCursor`](super::SourceCursor)s.
pub trait ByteSource: Send + Sync {
    /// Returns the total length of the source.
    fn len(&self) -> u64;

    /// Returns true if the source is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fills `buf` with the bytes starting at `offset`.
    /// Returns the number of bytes read (must be exactly `buf.len()` or error).
    fn read_at_into(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize>;

    /// Reads exactly `len` bytes starting at `offset`.
    fn read_at(&self, offset: u64, len: usize) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        let read = self.read_at_into(offset, &mut buf)?;
        if read != len {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "not enough data",
            ));
        }
        Ok(buf)
    }
}

// --- Implementation: Local File ---

/// A `.storybook` file on disk. The handle is closed when the source drops.
pub struct FileSource {
    file: File,
    len: u64,
}

impl FileSource {
    pub fn new(file: File) -> io::Result<Self> {
        let len = file.metadata()?.len();
        Ok(Self { file, len })
    }

    pub fn open<P: AsRef<std::path::Path>>(path: P) -> io::Result<Self> {
        Self::new(File::open(path)?)
    }
}

#[cfg(unix)]
impl ByteSource for FileSource {
    fn len(&self) -> u64 {
        self.len
    }

    fn read_at_into(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        use std::os::unix::fs::FileExt;
        self.file.read_exact_at(buf, offset)?;
        Ok(buf.len())
    }
}

#[cfg(windows)]
impl ByteSource for FileSource {
    fn len(&self) -> u64 {
        self.len
    }

    fn read_at_into(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        use std::os::windows::fs::FileExt;
        let mut filled = 0;
        while filled < buf.len() {
            let read = self.file.seek_read(&mut buf[filled..], offset + filled as u64)?;
            if read == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "not enough data",
                ));
            }
            filled += read;
        }
        Ok(filled)
    }
}

#[cfg(all(not(unix), not(windows)))]
impl ByteSource for FileSource {
    fn len(&self) -> u64 {
        self.len
    }

    fn read_at_into(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        // Fallback for WASM and other platforms
        let mut file_clone = self.file.try_clone()?;
        file_clone.seek(SeekFrom::Start(offset))?;
        file_clone.read_exact(buf)?;
        Ok(buf.len())
    }
}

// --- Implementation: In-Memory ---

/// An in-memory ByteSource over anything that derefs to bytes
/// (`Vec<u8>`, `&[u8]`, `Box<[u8]>`).
pub struct MemorySource<T> {
    data: T,
}

impl<T: AsRef<[u8]>> MemorySource<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }

    pub fn into_inner(self) -> T {
        self.data
    }
}

impl<T: AsRef<[u8]> + Send + Sync> ByteSource for MemorySource<T> {
    fn len(&self) -> u64 {
        self.data.as_ref().len() as u64
    }

    fn read_at_into(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        let data = self.data.as_ref();
        let start = usize::try_from(offset)
            .ok()
            .filter(|&start| start <= data.len())
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::UnexpectedEof, "offset beyond end of data")
            })?;
        let end = start
            .checked_add(buf.len())
            .filter(|&end| end <= data.len())
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "not enough data"))?;
        buf.copy_from_slice(&data[start..end]);
        Ok(buf.len())
    }
}

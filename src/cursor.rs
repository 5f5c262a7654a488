use crate::boxes::FourCC;
use crate::parser::{ParseError, Result};
use byteorder::{BigEndian, ReadBytesExt};
use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

trait Source: Read + Seek {}
impl<T: Read + Seek> Source for T {}

/// Big-endian byte source with absolute positioning.
///
/// Reads never go past the current limit (by default the end of the stream).
/// The tree builder narrows the limit to the box being decoded, so a payload
/// decoder sees a short read instead of its sibling's bytes.
pub struct ByteCursor {
    inner: Box<dyn Source>,
    pos: u64,
    len: u64,
    limit: u64,
}

impl ByteCursor {
    pub fn new<R: Read + Seek + 'static>(mut inner: R) -> Result<Self> {
        let len = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;
        Ok(Self {
            inner: Box::new(inner),
            pos: 0,
            len,
            limit: len,
        })
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let len = bytes.len() as u64;
        Self {
            inner: Box::new(Cursor::new(bytes)),
            pos: 0,
            len,
            limit: len,
        }
    }

    /// Open a file read-only. The handle is closed when the cursor is dropped.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let f = File::open(path)?;
        Self::new(BufReader::new(f))
    }

    pub fn tell(&self) -> u64 {
        self.pos
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn seek(&mut self, offset: u64) -> Result<()> {
        if offset != self.pos {
            self.inner.seek(SeekFrom::Start(offset))?;
            self.pos = offset;
        }
        Ok(())
    }

    /// Current read limit (absolute offset).
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Replace the read limit, returning the previous one so callers can restore it.
    pub fn set_limit(&mut self, limit: u64) -> u64 {
        std::mem::replace(&mut self.limit, limit.min(self.len))
    }

    /// Bytes left before the limit.
    pub fn remaining(&self) -> u64 {
        self.limit.saturating_sub(self.pos)
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        let at = self.pos;
        let mut buf = vec![0u8; n];
        self.read_exact(&mut buf)
            .map_err(|e| truncated(e, at, n as u64))?;
        Ok(buf)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let at = self.pos;
        let mut buf = [0u8; N];
        self.read_exact(&mut buf)
            .map_err(|e| truncated(e, at, N as u64))?;
        Ok(buf)
    }

    pub fn read_fourcc(&mut self) -> Result<FourCC> {
        self.read_array().map(FourCC)
    }

    pub fn skip(&mut self, n: u64) -> Result<()> {
        if n > self.remaining() {
            let at = self.pos;
            self.seek(self.limit)?;
            return Err(ParseError::Truncated { offset: at, needed: n });
        }
        self.seek(self.pos + n)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let at = self.pos;
        ReadBytesExt::read_u8(self).map_err(|e| truncated(e, at, 1))
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let at = self.pos;
        ReadBytesExt::read_u16::<BigEndian>(self).map_err(|e| truncated(e, at, 2))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        let at = self.pos;
        ReadBytesExt::read_i16::<BigEndian>(self).map_err(|e| truncated(e, at, 2))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let at = self.pos;
        ReadBytesExt::read_u32::<BigEndian>(self).map_err(|e| truncated(e, at, 4))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        let at = self.pos;
        ReadBytesExt::read_i32::<BigEndian>(self).map_err(|e| truncated(e, at, 4))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        let at = self.pos;
        ReadBytesExt::read_u64::<BigEndian>(self).map_err(|e| truncated(e, at, 8))
    }
}

impl Read for ByteCursor {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let avail = usize::try_from(self.remaining()).unwrap_or(usize::MAX);
        let want = buf.len().min(avail);
        if want == 0 {
            return Ok(0);
        }
        let n = self.inner.read(&mut buf[..want])?;
        self.pos += n as u64;
        Ok(n)
    }
}

fn truncated(e: io::Error, offset: u64, needed: u64) -> ParseError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        ParseError::Truncated { offset, needed }
    } else {
        ParseError::Io(e)
    }
}

//! Sink/source adapters over seekable `std::io` streams.
//!
//! These let callers wire the codec to files or any other `Read + Seek` /
//! `Write + Seek` stream without the core knowing about file I/O. Positions
//! are relative to the stream position at adapter construction, so a codec
//! stream may start mid-file.

use std::io::{self, Read, Seek, SeekFrom, Write};

use super::{OctetSink, OctetSource};

/// Octet sink over a seekable writer.
pub struct IoSink<W> {
    inner: W,
    origin: u64,
    pos: u64,
    healthy: bool,
}

impl<W: Write + Seek> IoSink<W> {
    /// Wrap `inner`, treating its current stream position as position 0.
    pub fn new(mut inner: W) -> io::Result<Self> {
        let origin = inner.stream_position()?;
        Ok(Self {
            inner,
            origin,
            pos: 0,
            healthy: true,
        })
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write + Seek> OctetSink for IoSink<W> {
    fn append(&mut self, octets: &[u8]) -> io::Result<()> {
        self.inner.write_all(octets)?;
        self.pos += octets.len() as u64;
        Ok(())
    }

    fn patch(&mut self, position: u64, octets: &[u8]) -> io::Result<()> {
        if position + octets.len() as u64 > self.pos {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "patch outside written range",
            ));
        }
        self.inner.seek(SeekFrom::Start(self.origin + position))?;
        self.inner.write_all(octets)?;
        self.inner.seek(SeekFrom::Start(self.origin + self.pos))?;
        Ok(())
    }

    fn position(&self) -> u64 {
        self.pos
    }

    fn is_healthy(&self) -> bool {
        self.healthy
    }

    fn mark_unhealthy(&mut self) {
        self.healthy = false;
    }
}

/// Octet source over a seekable reader.
pub struct IoSource<R> {
    inner: R,
    origin: u64,
    pos: u64,
    healthy: bool,
}

impl<R: Read + Seek> IoSource<R> {
    /// Wrap `inner`, treating its current stream position as position 0.
    pub fn new(mut inner: R) -> io::Result<Self> {
        let origin = inner.stream_position()?;
        Ok(Self {
            inner,
            origin,
            pos: 0,
            healthy: true,
        })
    }

    /// Return the underlying reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read + Seek> OctetSource for IoSource<R> {
    fn consume(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.inner.read_exact(buf)?;
        self.pos += buf.len() as u64;
        Ok(())
    }

    fn peek(&mut self) -> io::Result<u8> {
        let mut octet = [0u8; 1];
        self.inner.read_exact(&mut octet)?;
        self.inner.seek(SeekFrom::Start(self.origin + self.pos))?;
        Ok(octet[0])
    }

    fn advance(&mut self, count: u64) -> io::Result<()> {
        // Seeking past the end succeeds on most streams; verify the target
        // is really reachable so truncated input surfaces as EOF here.
        let end = self.inner.seek(SeekFrom::End(0))?;
        let target = self.origin + self.pos + count;
        if target > end {
            self.inner.seek(SeekFrom::Start(self.origin + self.pos))?;
            return Err(io::ErrorKind::UnexpectedEof.into());
        }
        self.inner.seek(SeekFrom::Start(target))?;
        self.pos += count;
        Ok(())
    }

    fn position(&self) -> u64 {
        self.pos
    }

    fn is_healthy(&self) -> bool {
        self.healthy
    }

    fn mark_unhealthy(&mut self) {
        self.healthy = false;
    }
}

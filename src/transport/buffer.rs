//! In-memory sink and source over `bytes` buffers.
//!
//! [`BufferSink`] accumulates an encoded stream in a `BytesMut`;
//! [`BufferSource`] replays a `Bytes` with a cursor. These are the primary
//! implementations for message assembly before a transport send and for
//! decoding a received payload.

use std::io;

use bytes::{Bytes, BytesMut};

use super::{OctetSink, OctetSource};

/// Growable in-memory octet sink.
///
/// # Example
///
/// ```
/// use tagwire::transport::{BufferSink, OctetSink};
///
/// let mut sink = BufferSink::new();
/// sink.append(b"abc").unwrap();
/// assert_eq!(sink.position(), 3);
/// assert_eq!(sink.octets(), b"abc");
/// ```
#[derive(Debug)]
pub struct BufferSink {
    buf: BytesMut,
    healthy: bool,
}

impl BufferSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self {
            buf: BytesMut::new(),
            healthy: true,
        }
    }

    /// Create an empty sink with pre-reserved capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
            healthy: true,
        }
    }

    /// The octets written so far.
    pub fn octets(&self) -> &[u8] {
        &self.buf
    }

    /// Number of octets written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Freeze the accumulated stream into a cheaply-cloneable `Bytes`.
    pub fn into_octets(self) -> Bytes {
        self.buf.freeze()
    }
}

impl Default for BufferSink {
    fn default() -> Self {
        Self::new()
    }
}

impl OctetSink for BufferSink {
    fn append(&mut self, octets: &[u8]) -> io::Result<()> {
        self.buf.extend_from_slice(octets);
        Ok(())
    }

    fn patch(&mut self, position: u64, octets: &[u8]) -> io::Result<()> {
        let start = usize::try_from(position)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "patch position overflow"))?;
        let end = start
            .checked_add(octets.len())
            .filter(|&end| end <= self.buf.len())
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidInput, "patch outside written range")
            })?;
        self.buf[start..end].copy_from_slice(octets);
        Ok(())
    }

    fn position(&self) -> u64 {
        self.buf.len() as u64
    }

    fn is_healthy(&self) -> bool {
        self.healthy
    }

    fn mark_unhealthy(&mut self) {
        self.healthy = false;
    }
}

/// Cursor-based in-memory octet source.
///
/// # Example
///
/// ```
/// use tagwire::transport::{BufferSource, OctetSource};
///
/// let mut source = BufferSource::new(vec![1, 2, 3].into());
/// assert_eq!(source.peek().unwrap(), 1);
/// let mut buf = [0u8; 2];
/// source.consume(&mut buf).unwrap();
/// assert_eq!(buf, [1, 2]);
/// assert_eq!(source.position(), 2);
/// ```
#[derive(Debug)]
pub struct BufferSource {
    octets: Bytes,
    pos: usize,
    healthy: bool,
}

impl BufferSource {
    /// Create a source replaying `octets` from the start.
    pub fn new(octets: Bytes) -> Self {
        Self {
            octets,
            pos: 0,
            healthy: true,
        }
    }

    /// Number of octets not yet consumed.
    pub fn remaining(&self) -> usize {
        self.octets.len() - self.pos
    }
}

impl From<Vec<u8>> for BufferSource {
    fn from(octets: Vec<u8>) -> Self {
        Self::new(Bytes::from(octets))
    }
}

impl From<Bytes> for BufferSource {
    fn from(octets: Bytes) -> Self {
        Self::new(octets)
    }
}

impl OctetSource for BufferSource {
    fn consume(&mut self, buf: &mut [u8]) -> io::Result<()> {
        if self.remaining() < buf.len() {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }
        buf.copy_from_slice(&self.octets[self.pos..self.pos + buf.len()]);
        self.pos += buf.len();
        Ok(())
    }

    fn peek(&mut self) -> io::Result<u8> {
        self.octets
            .get(self.pos)
            .copied()
            .ok_or_else(|| io::ErrorKind::UnexpectedEof.into())
    }

    fn advance(&mut self, count: u64) -> io::Result<()> {
        let count = usize::try_from(count)
            .ok()
            .filter(|&count| count <= self.remaining())
            .ok_or(io::ErrorKind::UnexpectedEof)?;
        self.pos += count;
        Ok(())
    }

    fn position(&self) -> u64 {
        self.pos as u64
    }

    fn is_healthy(&self) -> bool {
        self.healthy
    }

    fn mark_unhealthy(&mut self) {
        self.healthy = false;
    }
}

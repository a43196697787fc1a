//! Transport module - the octet sink/source abstraction all I/O flows through.
//!
//! Provides:
//! - [`OctetSink`] / [`OctetSource`] traits (ordered synchronous octet I/O
//!   with positional tell and a healthy flag)
//! - [`BufferSink`] / [`BufferSource`] - in-memory implementations over
//!   `bytes` buffers
//! - [`IoSink`] / [`IoSource`] - adapters over any seekable `std::io` stream
//!
//! The codec never touches a byte except through these traits; callers wire
//! them to whatever byte stream they choose.

mod buffer;
mod io;

pub use buffer::{BufferSink, BufferSource};
pub use io::{IoSink, IoSource};

/// Ordered synchronous octet sink.
///
/// A sink accepts appends at the current position and exposes a healthy
/// flag. Once the flag is cleared - by a failed operation or by the codec
/// observing one - subsequent codec operations short-circuit: first failure
/// wins.
///
/// `patch` is the one non-append operation: it rewrites octets at an
/// already-written position and exists solely so record payload lengths can
/// be back-patched after the fields are known.
pub trait OctetSink {
    /// Append octets at the current position.
    fn append(&mut self, octets: &[u8]) -> std::io::Result<()>;

    /// Overwrite octets at `position`, which must already have been written.
    /// The current append position is unaffected.
    fn patch(&mut self, position: u64, octets: &[u8]) -> std::io::Result<()>;

    /// Current append position, in octets from the start of the stream.
    fn position(&self) -> u64;

    /// Whether no failure has been observed yet.
    fn is_healthy(&self) -> bool;

    /// Clear the healthy flag.
    fn mark_unhealthy(&mut self);
}

/// Ordered synchronous octet source.
///
/// A source yields octets in order, can report its position, peek one octet
/// without consuming it, and skip forward. Short reads clear the healthy
/// flag via the codec, after which codec operations short-circuit.
pub trait OctetSource {
    /// Fill `buf` exactly, consuming `buf.len()` octets.
    ///
    /// Fails with [`std::io::ErrorKind::UnexpectedEof`] when fewer octets
    /// remain; the source position is unspecified afterwards.
    fn consume(&mut self, buf: &mut [u8]) -> std::io::Result<()>;

    /// Return the next octet without consuming it.
    fn peek(&mut self) -> std::io::Result<u8>;

    /// Skip `count` octets forward.
    fn advance(&mut self, count: u64) -> std::io::Result<()>;

    /// Current read position, in octets from the start of the stream.
    fn position(&self) -> u64;

    /// Whether no failure has been observed yet.
    fn is_healthy(&self) -> bool;

    /// Clear the healthy flag.
    fn mark_unhealthy(&mut self);
}

//! Codec façade: stream configuration, handlers, and the read/write entry
//! points.
//!
//! A [`Codec`] holds the negotiated stream byte order, the last error, and
//! the error/progress handlers. It is the value through which records read
//! and write themselves. Lifecycle: construct, set handlers, use for many
//! streams, drop. One codec per logical in-flight operation; callers
//! needing multi-threaded use serialise access or hold one per thread.
//!
//! # Example
//!
//! ```
//! use tagwire::{Codec, transport::{BufferSink, BufferSource}};
//!
//! let mut codec = Codec::new();
//! let mut sink = BufferSink::new();
//! codec.write(&mut sink, &42u32).unwrap();
//!
//! let mut source = BufferSource::new(sink.into_octets());
//! let mut value = 0u32;
//! codec.read(&mut source, &mut value).unwrap();
//! assert_eq!(value, 42);
//! ```

use std::io;

use crate::error::{CodecError, ErrorKind, Result};
use crate::transport::{OctetSink, OctetSource};
use crate::value::{Decode, Encode};
use crate::wire::{ByteOrder, WireTag, MAX_WIRE_SIZE};

/// Error handler: receives the error kind plus the library-internal site
/// (`line`, `file`) that detected it. The site is advisory.
pub type ErrorHandler = Box<dyn FnMut(ErrorKind, u32, &'static str) + Send>;

/// Progress handler: receives the record's name token and its payload
/// length in octets, once per successfully decoded record (nested records
/// included).
pub type ProgressHandler = Box<dyn FnMut(&'static str, usize) + Send>;

/// Binary message codec.
///
/// Encodes values implementing [`Encode`] onto an [`OctetSink`] and decodes
/// values implementing [`Decode`] from an [`OctetSource`]. Multi-byte
/// primitives travel in the stream byte order, big-endian unless configured
/// or negotiated otherwise.
///
/// Handlers run synchronously on the calling thread and must not reenter
/// the codec.
pub struct Codec {
    stream_order: ByteOrder,
    auto_order_marker: bool,
    last_error: ErrorKind,
    error_handler: Option<ErrorHandler>,
    progress_handler: Option<ProgressHandler>,
    /// Decode-side stack of record payload end positions, innermost last.
    pub(crate) record_limits: Vec<u64>,
}

impl Codec {
    /// Create a codec with the default big-endian stream order.
    pub fn new() -> Self {
        Self::with_stream_order(ByteOrder::Big)
    }

    /// Create a codec with an explicit stream order.
    pub fn with_stream_order(order: ByteOrder) -> Self {
        Self {
            stream_order: order,
            auto_order_marker: false,
            last_error: ErrorKind::None,
            error_handler: None,
            progress_handler: None,
            record_limits: Vec::new(),
        }
    }

    /// The byte order multi-byte primitives are serialised in.
    #[inline]
    pub fn stream_order(&self) -> ByteOrder {
        self.stream_order
    }

    /// Set the stream byte order for subsequent operations.
    pub fn set_stream_order(&mut self, order: ByteOrder) {
        self.stream_order = order;
    }

    /// When enabled, [`write`](Self::write) emits the byte-order marker
    /// automatically whenever the sink is at position 0 (the head of a
    /// fresh stream). Off by default: unmarked streams are read as
    /// big-endian.
    pub fn set_auto_order_marker(&mut self, enabled: bool) {
        self.auto_order_marker = enabled;
    }

    /// Install the error handler, replacing any previous one.
    pub fn set_error_handler(&mut self, handler: ErrorHandler) {
        self.error_handler = Some(handler);
    }

    /// Install the progress handler, replacing any previous one.
    pub fn set_progress_handler(&mut self, handler: ProgressHandler) {
        self.progress_handler = Some(handler);
    }

    /// The kind of the most recent error, or [`ErrorKind::None`].
    #[inline]
    pub fn last_error(&self) -> ErrorKind {
        self.last_error
    }

    /// Reset the recorded error back to [`ErrorKind::None`].
    pub fn clear_last_error(&mut self) {
        self.last_error = ErrorKind::None;
    }

    /// Encode `value` onto `sink`.
    ///
    /// Short-circuits if the sink is unhealthy: the first failure wins and
    /// later calls return immediately without touching the stream.
    ///
    /// # Errors
    ///
    /// Any [`ErrorKind`] raised while encoding; the sink's healthy flag is
    /// cleared and the error handler invoked before this returns.
    pub fn write<T>(&mut self, sink: &mut dyn OctetSink, value: &T) -> Result<()>
    where
        T: Encode + ?Sized,
    {
        if !sink.is_healthy() {
            return Err(self.short_circuit());
        }
        if self.auto_order_marker && sink.position() == 0 {
            self.write_order_marker(sink)?;
        }
        value.encode(self, sink)
    }

    /// Decode from `source` into `value`, in place.
    ///
    /// Inside a record whose payload is already exhausted this returns
    /// `Ok` without consuming input, leaving `value` untouched - the
    /// backward-compatibility path for readers ahead of the writer's
    /// schema.
    ///
    /// # Errors
    ///
    /// Any [`ErrorKind`] raised while decoding; the source's healthy flag
    /// is cleared and the error handler invoked before this returns.
    pub fn read<T>(&mut self, source: &mut dyn OctetSource, value: &mut T) -> Result<()>
    where
        T: Decode + ?Sized,
    {
        if !source.is_healthy() {
            return Err(self.short_circuit());
        }
        match self.record_limits.last() {
            Some(&limit) => {
                if source.position() >= limit {
                    // Older writer: the field was never emitted. Keep the
                    // default already in `value`.
                    return Ok(());
                }
            }
            None => self.consume_order_marker(source)?,
        }
        value.decode(self, source)
    }

    /// Emit the stream byte-order marker: `ENDIAN` tag plus one order
    /// octet. Writers targeting non-big-endian readers emit this once at
    /// the head of the stream; readers without a marker assume big endian.
    pub fn write_order_marker(&mut self, sink: &mut dyn OctetSink) -> Result<()> {
        if !sink.is_healthy() {
            return Err(self.short_circuit());
        }
        self.write_tag(sink, WireTag::Endian)?;
        self.append(sink, &[self.stream_order.octet()])
    }

    /// If the next octet is an `ENDIAN` tag, consume the marker and switch
    /// the stream order. Only consulted between top-level values; a marker
    /// never occurs inside a record payload.
    fn consume_order_marker(&mut self, source: &mut dyn OctetSource) -> Result<()> {
        match source.peek() {
            Ok(octet) if octet == WireTag::Endian.octet() => {}
            // Not a marker, or nothing left: let the value decoder report it.
            _ => return Ok(()),
        }
        let mut marker = [0u8; 2];
        self.consume(source, &mut marker)?;
        match ByteOrder::from_octet(marker[1]) {
            Some(order) => {
                tracing::debug!(?order, "stream byte-order marker");
                self.stream_order = order;
                Ok(())
            }
            None => Err(self.fail_source(source, ErrorKind::Invalid)),
        }
    }

    // Low-level wire helpers shared by the value and record codecs.

    /// Emit one wire tag octet.
    pub(crate) fn write_tag(&mut self, sink: &mut dyn OctetSink, tag: WireTag) -> Result<()> {
        self.append(sink, &[tag.octet()])
    }

    /// Read one tag octet, failing on anything outside the closed set.
    #[track_caller]
    pub(crate) fn read_tag(&mut self, source: &mut dyn OctetSource) -> Result<WireTag> {
        let mut octet = [0u8; 1];
        self.consume(source, &mut octet)?;
        match WireTag::from_octet(octet[0]) {
            Some(tag) => Ok(tag),
            None => Err(self.fail_source(source, ErrorKind::TypeMismatch)),
        }
    }

    /// Read one tag octet and require it to be `expected`.
    #[track_caller]
    pub(crate) fn expect_tag(
        &mut self,
        source: &mut dyn OctetSource,
        expected: WireTag,
    ) -> Result<()> {
        let mut octet = [0u8; 1];
        self.consume(source, &mut octet)?;
        if octet[0] == expected.octet() {
            Ok(())
        } else {
            Err(self.fail_source(source, ErrorKind::TypeMismatch))
        }
    }

    /// Emit a 16-bit size prefix in stream order, bounding it to the wire
    /// maximum.
    #[track_caller]
    pub(crate) fn write_size(&mut self, sink: &mut dyn OctetSink, count: usize) -> Result<()> {
        if count > MAX_WIRE_SIZE {
            return Err(self.fail_sink(sink, ErrorKind::SizeOverflow));
        }
        self.write_u16(sink, count as u16)
    }

    /// Read a 16-bit size prefix in stream order.
    #[track_caller]
    pub(crate) fn read_size(&mut self, source: &mut dyn OctetSource) -> Result<u16> {
        self.read_u16(source)
    }

    /// Emit a bare (untagged) 16-bit value in stream order.
    #[track_caller]
    pub(crate) fn write_u16(&mut self, sink: &mut dyn OctetSink, value: u16) -> Result<()> {
        let octets = match self.stream_order {
            ByteOrder::Big => value.to_be_bytes(),
            ByteOrder::Little => value.to_le_bytes(),
        };
        self.append(sink, &octets)
    }

    /// Read a bare (untagged) 16-bit value in stream order.
    #[track_caller]
    pub(crate) fn read_u16(&mut self, source: &mut dyn OctetSource) -> Result<u16> {
        let mut octets = [0u8; 2];
        self.consume(source, &mut octets)?;
        Ok(match self.stream_order {
            ByteOrder::Big => u16::from_be_bytes(octets),
            ByteOrder::Little => u16::from_le_bytes(octets),
        })
    }

    /// Append octets, mapping transport failure to [`ErrorKind::StreamError`].
    #[track_caller]
    pub(crate) fn append(&mut self, sink: &mut dyn OctetSink, octets: &[u8]) -> Result<()> {
        match sink.append(octets) {
            Ok(()) => Ok(()),
            Err(_) => Err(self.fail_sink(sink, ErrorKind::StreamError)),
        }
    }

    /// Back-patch octets at an earlier sink position.
    #[track_caller]
    pub(crate) fn patch(
        &mut self,
        sink: &mut dyn OctetSink,
        position: u64,
        octets: &[u8],
    ) -> Result<()> {
        match sink.patch(position, octets) {
            Ok(()) => Ok(()),
            Err(_) => Err(self.fail_sink(sink, ErrorKind::StreamError)),
        }
    }

    /// Consume octets, mapping exhaustion to [`ErrorKind::EndOfStream`] and
    /// other transport failure to [`ErrorKind::StreamError`].
    #[track_caller]
    pub(crate) fn consume(&mut self, source: &mut dyn OctetSource, buf: &mut [u8]) -> Result<()> {
        match source.consume(buf) {
            Ok(()) => Ok(()),
            Err(err) => {
                let kind = Self::map_read_error(&err);
                Err(self.fail_source(source, kind))
            }
        }
    }

    /// Look at the next octet without consuming it, with the same error
    /// mapping as [`Self::consume`].
    #[track_caller]
    pub(crate) fn peek_octet(&mut self, source: &mut dyn OctetSource) -> Result<u8> {
        match source.peek() {
            Ok(octet) => Ok(octet),
            Err(err) => {
                let kind = Self::map_read_error(&err);
                Err(self.fail_source(source, kind))
            }
        }
    }

    /// Skip octets forward, with the same error mapping as [`Self::consume`].
    #[track_caller]
    pub(crate) fn advance(&mut self, source: &mut dyn OctetSource, count: u64) -> Result<()> {
        match source.advance(count) {
            Ok(()) => Ok(()),
            Err(err) => {
                let kind = Self::map_read_error(&err);
                Err(self.fail_source(source, kind))
            }
        }
    }

    fn map_read_error(err: &io::Error) -> ErrorKind {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            ErrorKind::EndOfStream
        } else {
            ErrorKind::StreamError
        }
    }

    // Error raise path: record it, notify the handler, clear the transport
    // healthy flag, return the error for `?` propagation.

    /// Raise an error observed on the sink side.
    #[track_caller]
    pub(crate) fn fail_sink(&mut self, sink: &mut dyn OctetSink, kind: ErrorKind) -> CodecError {
        sink.mark_unhealthy();
        self.raise(kind)
    }

    /// Raise an error observed on the source side.
    #[track_caller]
    pub(crate) fn fail_source(
        &mut self,
        source: &mut dyn OctetSource,
        kind: ErrorKind,
    ) -> CodecError {
        source.mark_unhealthy();
        self.raise(kind)
    }

    #[track_caller]
    pub(crate) fn raise(&mut self, kind: ErrorKind) -> CodecError {
        let err = CodecError::new(kind);
        self.last_error = kind;
        tracing::error!(%kind, file = err.file, line = err.line, "codec error");
        if let Some(handler) = self.error_handler.as_mut() {
            handler(kind, err.line, err.file);
        }
        err
    }

    /// Error returned when an operation declines to run because the
    /// transport is already unhealthy. The handler is not re-invoked:
    /// it fired at the first failure.
    pub(crate) fn short_circuit(&self) -> CodecError {
        let kind = match self.last_error {
            ErrorKind::None => ErrorKind::StreamError,
            kind => kind,
        };
        CodecError::new(kind)
    }

    /// Invoke the progress handler for a decoded record.
    pub(crate) fn report_progress(&mut self, type_name: &'static str, payload_len: usize) {
        if let Some(handler) = self.progress_handler.as_mut() {
            handler(type_name, payload_len);
        }
    }
}

impl Default for Codec {
    fn default() -> Self {
        Self::new()
    }
}

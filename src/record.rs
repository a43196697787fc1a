//! Record framing and the schema-evolution engine.
//!
//! A record travels as `USER_DEFINED` tag, 16-bit payload length, then its
//! fields in declared order. The length is emitted as a placeholder and
//! back-patched once the fields are written - length-prefix framing is what
//! makes evolution possible: the reader always knows where a record ends,
//! whatever fields it understands.
//!
//! Evolution rules on decode:
//! - payload longer than the reader's schema: the excess is skipped one
//!   tagged value at a time (forward compatibility)
//! - payload shorter than the reader's schema: the missing trailing fields
//!   keep their defaults (backward compatibility)
//! - a record consuming more than its declared payload is stream
//!   corruption and fails with [`Invalid`](crate::ErrorKind::Invalid)
//!
//! # Implementing a record
//!
//! ```
//! use tagwire::{Codec, Decode, Encode, Result};
//! use tagwire::transport::{BufferSink, BufferSource, OctetSink, OctetSource};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Date {
//!     day: i16,
//!     month: i16,
//!     year: i16,
//! }
//!
//! impl Encode for Date {
//!     fn encode(&self, codec: &mut Codec, sink: &mut dyn OctetSink) -> Result<()> {
//!         codec.encode_record(sink, |codec, sink| {
//!             codec.write(sink, &self.day)?;
//!             codec.write(sink, &self.month)?;
//!             codec.write(sink, &self.year)
//!         })
//!     }
//! }
//!
//! impl Decode for Date {
//!     fn decode(&mut self, codec: &mut Codec, source: &mut dyn OctetSource) -> Result<()> {
//!         codec.decode_record(source, "Date", |codec, source| {
//!             codec.read(source, &mut self.day)?;
//!             codec.read(source, &mut self.month)?;
//!             codec.read(source, &mut self.year)
//!         })
//!     }
//! }
//!
//! let mut codec = Codec::new();
//! let mut sink = BufferSink::new();
//! let date = Date { day: 31, month: 12, year: 2024 };
//! codec.write(&mut sink, &date).unwrap();
//!
//! let mut source = BufferSource::new(sink.into_octets());
//! let mut decoded = Date::default();
//! codec.read(&mut source, &mut decoded).unwrap();
//! assert_eq!(decoded, date);
//! ```
//!
//! Records have no wire identity: cyclic or shared-ownership graphs cannot
//! be represented and must not be serialised.

use crate::codec::Codec;
use crate::error::{ErrorKind, Result};
use crate::transport::{OctetSink, OctetSource};
use crate::wire::{ByteOrder, WireTag, MAX_WIRE_SIZE, SIZE_PREFIX_SIZE, TAG_SIZE};

impl Codec {
    /// Frame a record: emit the `USER_DEFINED` tag and a payload-length
    /// placeholder, run `fields`, then back-patch the actual length.
    ///
    /// `fields` writes the record's fields in their declared order, one
    /// [`write`](Self::write) call per field. A record embedding a base
    /// record writes the base's fields first, inside the same frame.
    ///
    /// # Errors
    ///
    /// [`SizeOverflow`](ErrorKind::SizeOverflow) when the payload exceeds
    /// 65,535 octets, plus anything `fields` itself raises.
    pub fn encode_record<F>(&mut self, sink: &mut dyn OctetSink, fields: F) -> Result<()>
    where
        F: FnOnce(&mut Codec, &mut dyn OctetSink) -> Result<()>,
    {
        if !sink.is_healthy() {
            return Err(self.short_circuit());
        }
        self.write_tag(sink, WireTag::UserDefined)?;
        let placeholder_at = sink.position();
        self.append(sink, &[0u8; SIZE_PREFIX_SIZE])?;
        let payload_start = sink.position();

        fields(self, sink)?;

        let payload_len = sink.position() - payload_start;
        if payload_len > MAX_WIRE_SIZE as u64 {
            return Err(self.fail_sink(sink, ErrorKind::SizeOverflow));
        }
        let octets = match self.stream_order() {
            ByteOrder::Big => (payload_len as u16).to_be_bytes(),
            ByteOrder::Little => (payload_len as u16).to_le_bytes(),
        };
        self.patch(sink, placeholder_at, &octets)
    }

    /// Unframe a record: expect `USER_DEFINED`, read the payload length,
    /// run `fields`, then reconcile what was consumed against the length.
    ///
    /// `type_name` is the record's name token, passed to the progress
    /// handler after a successful decode.
    ///
    /// # Errors
    ///
    /// [`TypeMismatch`](ErrorKind::TypeMismatch) on the wrong tag,
    /// [`Invalid`](ErrorKind::Invalid) when the fields overran the declared
    /// payload, plus anything `fields` or the trailing skip raises.
    pub fn decode_record<F>(
        &mut self,
        source: &mut dyn OctetSource,
        type_name: &'static str,
        fields: F,
    ) -> Result<()>
    where
        F: FnOnce(&mut Codec, &mut dyn OctetSource) -> Result<()>,
    {
        if !source.is_healthy() {
            return Err(self.short_circuit());
        }
        self.expect_tag(source, WireTag::UserDefined)?;
        let payload_len = u64::from(self.read_size(source)?);
        let payload_start = source.position();

        self.record_limits.push(payload_start + payload_len);
        let outcome = fields(self, source);
        self.record_limits.pop();
        outcome?;

        let consumed = source.position() - payload_start;
        if consumed > payload_len {
            return Err(self.fail_source(source, ErrorKind::Invalid));
        }
        if consumed < payload_len {
            // A newer writer appended fields this reader does not know.
            let mut remaining = payload_len - consumed;
            tracing::debug!(
                record = type_name,
                trailing = remaining,
                "skipping unknown trailing fields"
            );
            while remaining > 0 {
                remaining -= self.skip_value(source, remaining)?;
            }
        }

        self.report_progress(type_name, payload_len as usize);
        Ok(())
    }

    /// Skip one arbitrary tagged value, returning the octets consumed
    /// (tag included).
    ///
    /// `bound` is the octet budget the value may occupy, tag included -
    /// inside a record this is the unconsumed remainder of the payload. A
    /// `LITERAL` does not carry its width on the wire, so it consumes the
    /// whole bound; every other shape computes its exact span and fails
    /// with [`Invalid`](ErrorKind::Invalid) if the span overruns the bound.
    ///
    /// A `VECTOR` body may be a bitset (bare `0x00`/`0x01` octets, no
    /// element tags). The skipper peeks the first body octet: one that is
    /// not a valid tag can only be a bitset body, which is then skipped as
    /// `count` raw octets. A bitset opening with `0x01` is indistinguishable
    /// from a literal element and is consumed to the bound like any literal.
    ///
    /// # Errors
    ///
    /// [`TypeMismatch`](ErrorKind::TypeMismatch) on an unknown tag,
    /// [`Invalid`](ErrorKind::Invalid) on a bound overrun,
    /// [`EndOfStream`](ErrorKind::EndOfStream) on a truncated source.
    pub fn skip_value(&mut self, source: &mut dyn OctetSource, bound: u64) -> Result<u64> {
        if !source.is_healthy() {
            return Err(self.short_circuit());
        }
        if bound == 0 {
            return Err(self.fail_source(source, ErrorKind::Invalid));
        }
        let tag = self.read_tag(source)?;
        match tag {
            WireTag::Literal => {
                // Width unknown: the remaining bound is the value.
                self.advance(source, bound - TAG_SIZE as u64)?;
                Ok(bound)
            }
            WireTag::Endian => {
                let span = (TAG_SIZE + 1) as u64;
                if span > bound {
                    return Err(self.fail_source(source, ErrorKind::Invalid));
                }
                self.advance(source, 1)?;
                Ok(span)
            }
            WireTag::String | WireTag::UserDefined => self.skip_sized(source, bound, 1),
            WireTag::WString => self.skip_sized(source, bound, 2),
            WireTag::Vector => self.skip_vector(source, bound),
            WireTag::List | WireTag::Set => self.skip_elements(source, bound, 1),
            WireTag::Map => self.skip_elements(source, bound, 2),
            WireTag::Unknown => Err(self.fail_source(source, ErrorKind::TypeMismatch)),
        }
    }

    /// Skip a shape whose body is `size * unit_octets` octets.
    fn skip_sized(
        &mut self,
        source: &mut dyn OctetSource,
        bound: u64,
        unit_octets: u64,
    ) -> Result<u64> {
        let header = (TAG_SIZE + SIZE_PREFIX_SIZE) as u64;
        if header > bound {
            return Err(self.fail_source(source, ErrorKind::Invalid));
        }
        let size = u64::from(self.read_size(source)?);
        let span = header + size * unit_octets;
        if span > bound {
            return Err(self.fail_source(source, ErrorKind::Invalid));
        }
        self.advance(source, size * unit_octets)?;
        Ok(span)
    }

    /// Skip an ordered sequence, whose body is either tagged elements or a
    /// bitset of bare octets.
    fn skip_vector(&mut self, source: &mut dyn OctetSource, bound: u64) -> Result<u64> {
        let header = (TAG_SIZE + SIZE_PREFIX_SIZE) as u64;
        if header > bound {
            return Err(self.fail_source(source, ErrorKind::Invalid));
        }
        let count = u64::from(self.read_size(source)?);
        if count > 0 && WireTag::from_octet(self.peek_octet(source)?).is_none() {
            // Bare bitset body: `0x00` can never open a tagged element.
            let span = header + count;
            if span > bound {
                return Err(self.fail_source(source, ErrorKind::Invalid));
            }
            self.advance(source, count)?;
            return Ok(span);
        }
        self.walk_values(source, bound, header, count)
    }

    /// Skip a container of tagged values: `values_per_element` per element.
    fn skip_elements(
        &mut self,
        source: &mut dyn OctetSource,
        bound: u64,
        values_per_element: u64,
    ) -> Result<u64> {
        let header = (TAG_SIZE + SIZE_PREFIX_SIZE) as u64;
        if header > bound {
            return Err(self.fail_source(source, ErrorKind::Invalid));
        }
        let count = u64::from(self.read_size(source)?);
        self.walk_values(source, bound, header, count * values_per_element)
    }

    /// Walk and skip `n_values` tagged values, starting from `used` octets
    /// already consumed against `bound`.
    fn walk_values(
        &mut self,
        source: &mut dyn OctetSource,
        bound: u64,
        mut used: u64,
        n_values: u64,
    ) -> Result<u64> {
        for _ in 0..n_values {
            if used == bound {
                // A literal element consumed the remaining budget; with no
                // wire width there is nothing more to walk.
                break;
            }
            used += self.skip_value(source, bound - used)?;
        }
        Ok(used)
    }
}

//! # tagwire
//!
//! Self-describing binary message codec with tag/length framing and schema
//! evolution, for protocol payloads, persistent messages, and IPC between
//! heterogeneous CPUs.
//!
//! Every value on the wire carries a one-octet tag; variable-length shapes
//! add a 16-bit size prefix. Records travel as length-prefixed blobs, which
//! is what lets schemas grow: readers skip unknown trailing fields and
//! default missing ones. Multi-byte primitives travel big-endian unless the
//! stream opens with a byte-order marker.
//!
//! ## Architecture
//!
//! - **transport**: the [`OctetSink`]/[`OctetSource`] abstraction all I/O
//!   flows through, with in-memory and `std::io` implementations
//! - **wire**: the closed tag set and byte-order negotiation
//! - **value**: encode/decode routines for primitives, strings, and
//!   containers
//! - **record**: `USER_DEFINED` framing and the evolution engine
//! - **codec**: the [`Codec`] façade holding stream order and handlers
//!
//! ## Example
//!
//! ```
//! use tagwire::{Codec, Decode, Encode, Result};
//! use tagwire::transport::{BufferSink, BufferSource, OctetSink, OctetSource};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Reading {
//!     sensor: u16,
//!     value: f64,
//! }
//!
//! impl Encode for Reading {
//!     fn encode(&self, codec: &mut Codec, sink: &mut dyn OctetSink) -> Result<()> {
//!         codec.encode_record(sink, |codec, sink| {
//!             codec.write(sink, &self.sensor)?;
//!             codec.write(sink, &self.value)
//!         })
//!     }
//! }
//!
//! impl Decode for Reading {
//!     fn decode(&mut self, codec: &mut Codec, source: &mut dyn OctetSource) -> Result<()> {
//!         codec.decode_record(source, "Reading", |codec, source| {
//!             codec.read(source, &mut self.sensor)?;
//!             codec.read(source, &mut self.value)
//!         })
//!     }
//! }
//!
//! let mut codec = Codec::new();
//! let reading = Reading { sensor: 7, value: 21.5 };
//!
//! let mut sink = BufferSink::new();
//! codec.write(&mut sink, &reading)?;
//!
//! let mut source = BufferSource::new(sink.into_octets());
//! let mut decoded = Reading::default();
//! codec.read(&mut source, &mut decoded)?;
//! assert_eq!(decoded, reading);
//! # Ok::<(), tagwire::CodecError>(())
//! ```

pub mod error;
pub mod transport;
pub mod value;
pub mod wire;

mod codec;
mod record;

pub use codec::{Codec, ErrorHandler, ProgressHandler};
pub use error::{CodecError, ErrorKind, Result};
pub use transport::{OctetSink, OctetSource};
pub use value::{Decode, Encode, FixedString, WideString};
pub use wire::{ByteOrder, WireTag};

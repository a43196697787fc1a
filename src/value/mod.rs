//! Value codecs - encode/decode routines for every supported wire shape.
//!
//! This module defines the two capability traits every serialisable value
//! implements, plus the implementations for numeric primitives, character
//! sequences, and containers:
//!
//! - numeric primitives: `LITERAL` tag + width octets in stream order
//! - [`String`]/[`str`], [`WideString`], [`FixedString`]
//! - `Vec`, `VecDeque`, `BTreeMap`, `BTreeSet`, `Box` (owned pointee)
//! - `Vec<bool>` with its dedicated bitset encoding
//!
//! User records implement the same two traits by hand, delegating framing to
//! [`Codec::encode_record`](crate::Codec::encode_record) /
//! [`Codec::decode_record`](crate::Codec::decode_record) and writing one
//! `codec.write` / `codec.read` call per field.
//!
//! # Field-declaration contract
//!
//! The stream carries no field names or indices; writer and reader agree by
//! convention. For a record to stay readable across schema revisions:
//!
//! - never remove a previously-serialised field
//! - never reorder serialised fields
//! - never change a field's wire type
//! - append new fields only at the end
//! - when one record embeds another as its base, encode/decode the base's
//!   fields before the outer record's own

mod container;
mod primitive;
mod string;

pub use string::{FixedString, WideString};

use crate::codec::Codec;
use crate::error::Result;
use crate::transport::{OctetSink, OctetSource};

/// A value that can write itself onto an octet sink.
///
/// Implementations emit the value's wire tag followed by its body; nothing
/// else. Records delegate to
/// [`Codec::encode_record`](crate::Codec::encode_record) for framing.
pub trait Encode {
    /// Encode `self` through `codec` onto `sink`.
    fn encode(&self, codec: &mut Codec, sink: &mut dyn OctetSink) -> Result<()>;
}

/// A value that can read itself from an octet source, in place.
///
/// Decoding replaces the current contents. Reading in place is what makes
/// backward compatibility work: a field the writer never emitted is simply
/// left at the value it already holds.
pub trait Decode {
    /// Decode from `source` through `codec` into `self`.
    fn decode(&mut self, codec: &mut Codec, source: &mut dyn OctetSource) -> Result<()>;
}

impl<'a, T: Encode + ?Sized> Encode for &'a T {
    fn encode(&self, codec: &mut Codec, sink: &mut dyn OctetSink) -> Result<()> {
        (**self).encode(codec, sink)
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    fn encode(&self, codec: &mut Codec, sink: &mut dyn OctetSink) -> Result<()> {
        (**self).encode(codec, sink)
    }
}

impl<T: Decode + ?Sized> Decode for Box<T> {
    fn decode(&mut self, codec: &mut Codec, source: &mut dyn OctetSource) -> Result<()> {
        (**self).decode(codec, source)
    }
}

//! Numeric primitive codecs.
//!
//! Every integer width (8/16/32/64, signed and unsigned) and both IEEE-754
//! float widths encode as a `LITERAL` tag followed by exactly the value's
//! width in octets, in stream order. No padding, no alignment. Floats swap
//! as their bit pattern.

use crate::codec::Codec;
use crate::error::Result;
use crate::transport::{OctetSink, OctetSource};
use crate::wire::{ByteOrder, WireTag};

use super::{Decode, Encode};

macro_rules! impl_numeric {
    ($($ty:ty),* $(,)?) => {$(
        impl Encode for $ty {
            fn encode(&self, codec: &mut Codec, sink: &mut dyn OctetSink) -> Result<()> {
                codec.write_tag(sink, WireTag::Literal)?;
                let octets = match codec.stream_order() {
                    ByteOrder::Big => self.to_be_bytes(),
                    ByteOrder::Little => self.to_le_bytes(),
                };
                codec.append(sink, &octets)
            }
        }

        impl Decode for $ty {
            fn decode(&mut self, codec: &mut Codec, source: &mut dyn OctetSource) -> Result<()> {
                codec.expect_tag(source, WireTag::Literal)?;
                let mut octets = [0u8; std::mem::size_of::<$ty>()];
                codec.consume(source, &mut octets)?;
                *self = match codec.stream_order() {
                    ByteOrder::Big => <$ty>::from_be_bytes(octets),
                    ByteOrder::Little => <$ty>::from_le_bytes(octets),
                };
                Ok(())
            }
        }
    )*};
}

impl_numeric!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

#[cfg(test)]
mod tests {
    use crate::transport::{BufferSink, BufferSource};
    use crate::{ByteOrder, Codec, ErrorKind};

    fn roundtrip<T>(value: T, order: ByteOrder) -> T
    where
        T: crate::Encode + crate::Decode + Default,
    {
        let mut codec = Codec::with_stream_order(order);
        let mut sink = BufferSink::new();
        codec.write(&mut sink, &value).unwrap();

        let mut source = BufferSource::new(sink.into_octets());
        let mut decoded = T::default();
        codec.read(&mut source, &mut decoded).unwrap();
        decoded
    }

    #[test]
    fn test_u32_wire_layout_big_endian() {
        let mut codec = Codec::new();
        let mut sink = BufferSink::new();
        codec.write(&mut sink, &0x1122_3344u32).unwrap();

        assert_eq!(sink.octets(), &[0x01, 0x11, 0x22, 0x33, 0x44]);
    }

    #[test]
    fn test_u32_wire_layout_little_endian() {
        let mut codec = Codec::with_stream_order(ByteOrder::Little);
        let mut sink = BufferSink::new();
        codec.write(&mut sink, &0x1122_3344u32).unwrap();

        assert_eq!(sink.octets(), &[0x01, 0x44, 0x33, 0x22, 0x11]);
    }

    #[test]
    fn test_i16_wire_layout() {
        let mut codec = Codec::new();
        let mut sink = BufferSink::new();
        codec.write(&mut sink, &2024i16).unwrap();

        // 2024 = 0x07E8
        assert_eq!(sink.octets(), &[0x01, 0x07, 0xE8]);
    }

    #[test]
    fn test_all_widths_roundtrip() {
        assert_eq!(roundtrip(-8i8, ByteOrder::Big), -8);
        assert_eq!(roundtrip(-1600i16, ByteOrder::Big), -1600);
        assert_eq!(roundtrip(-320_000i32, ByteOrder::Big), -320_000);
        assert_eq!(roundtrip(-64_000_000_000i64, ByteOrder::Big), -64_000_000_000);
        assert_eq!(roundtrip(200u8, ByteOrder::Big), 200);
        assert_eq!(roundtrip(60_000u16, ByteOrder::Big), 60_000);
        assert_eq!(roundtrip(4_000_000_000u32, ByteOrder::Big), 4_000_000_000);
        assert_eq!(roundtrip(u64::MAX, ByteOrder::Big), u64::MAX);
        assert_eq!(roundtrip(1.23f32, ByteOrder::Big), 1.23);
        assert_eq!(roundtrip(3.21f64, ByteOrder::Big), 3.21);
    }

    #[test]
    fn test_all_widths_roundtrip_little_endian() {
        assert_eq!(roundtrip(0x1234i16, ByteOrder::Little), 0x1234);
        assert_eq!(roundtrip(0x1234_5678u32, ByteOrder::Little), 0x1234_5678);
        assert_eq!(roundtrip(f64::MIN_POSITIVE, ByteOrder::Little), f64::MIN_POSITIVE);
    }

    #[test]
    fn test_float_special_values() {
        assert_eq!(roundtrip(f32::INFINITY, ByteOrder::Big), f32::INFINITY);
        assert_eq!(roundtrip(f64::NEG_INFINITY, ByteOrder::Little), f64::NEG_INFINITY);
        assert!(roundtrip(f64::NAN, ByteOrder::Big).is_nan());
    }

    #[test]
    fn test_truncated_literal_is_end_of_stream() {
        let mut codec = Codec::new();
        let mut sink = BufferSink::new();
        codec.write(&mut sink, &0x1122_3344u32).unwrap();

        let mut octets = sink.into_octets().to_vec();
        octets.truncate(3); // tag + 2 of 4 body octets

        let mut source = BufferSource::from(octets);
        let mut decoded = 0u32;
        let err = codec.read(&mut source, &mut decoded).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EndOfStream);
        assert!(!crate::transport::OctetSource::is_healthy(&source));
    }

    #[test]
    fn test_wrong_tag_is_type_mismatch() {
        let mut codec = Codec::new();
        let mut sink = BufferSink::new();
        codec.write(&mut sink, &"text").unwrap();

        let mut source = BufferSource::new(sink.into_octets());
        let mut decoded = 0u32;
        let err = codec.read(&mut source, &mut decoded).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }
}

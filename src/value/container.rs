//! Container codecs: ordered sequences, linked sequences, keyed mappings,
//! and unique sets.
//!
//! Every container encodes as its shape tag, a 16-bit element count, then
//! each element encoded recursively with its own tag. Two special cases:
//!
//! - `MAP` entries emit key then mapped value, each independently tagged;
//!   keys travel in ascending order.
//! - `Vec<bool>` is a bitset: one bare `0x00`/`0x01` octet per element,
//!   elements not individually tagged. The only exception to standalone
//!   element encoding.
//!
//! Owned-pointer element shapes (`Vec<Box<T>>` and friends) encode the
//! pointees; decode allocates one fresh box per element and the container
//! owns them from then on.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::codec::Codec;
use crate::error::{ErrorKind, Result};
use crate::transport::{OctetSink, OctetSource};
use crate::wire::WireTag;

use super::{Decode, Encode};

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, codec: &mut Codec, sink: &mut dyn OctetSink) -> Result<()> {
        codec.write_tag(sink, WireTag::Vector)?;
        codec.write_size(sink, self.len())?;
        for element in self {
            codec.write(sink, element)?;
        }
        Ok(())
    }
}

impl<T: Decode + Default> Decode for Vec<T> {
    fn decode(&mut self, codec: &mut Codec, source: &mut dyn OctetSource) -> Result<()> {
        codec.expect_tag(source, WireTag::Vector)?;
        let count = codec.read_size(source)? as usize;
        self.clear();
        self.reserve(count);
        for _ in 0..count {
            let mut element = T::default();
            codec.read(source, &mut element)?;
            self.push(element);
        }
        Ok(())
    }
}

// Ordered-bool sequences get the dedicated bitset encoding. `bool` has no
// standalone wire shape, which is what keeps this impl from overlapping the
// generic one above.
impl Encode for Vec<bool> {
    fn encode(&self, codec: &mut Codec, sink: &mut dyn OctetSink) -> Result<()> {
        codec.write_tag(sink, WireTag::Vector)?;
        codec.write_size(sink, self.len())?;
        for &element in self {
            codec.append(sink, &[u8::from(element)])?;
        }
        Ok(())
    }
}

impl Decode for Vec<bool> {
    fn decode(&mut self, codec: &mut Codec, source: &mut dyn OctetSource) -> Result<()> {
        codec.expect_tag(source, WireTag::Vector)?;
        let count = codec.read_size(source)? as usize;
        let mut octets = vec![0u8; count];
        codec.consume(source, &mut octets)?;
        self.clear();
        self.reserve(count);
        for octet in octets {
            match octet {
                0x00 => self.push(false),
                0x01 => self.push(true),
                _ => return Err(codec.fail_source(source, ErrorKind::Invalid)),
            }
        }
        Ok(())
    }
}

impl<T: Encode> Encode for VecDeque<T> {
    fn encode(&self, codec: &mut Codec, sink: &mut dyn OctetSink) -> Result<()> {
        codec.write_tag(sink, WireTag::List)?;
        codec.write_size(sink, self.len())?;
        for element in self {
            codec.write(sink, element)?;
        }
        Ok(())
    }
}

impl<T: Decode + Default> Decode for VecDeque<T> {
    fn decode(&mut self, codec: &mut Codec, source: &mut dyn OctetSource) -> Result<()> {
        codec.expect_tag(source, WireTag::List)?;
        let count = codec.read_size(source)? as usize;
        self.clear();
        for _ in 0..count {
            let mut element = T::default();
            codec.read(source, &mut element)?;
            self.push_back(element);
        }
        Ok(())
    }
}

impl<K: Encode, V: Encode> Encode for BTreeMap<K, V> {
    fn encode(&self, codec: &mut Codec, sink: &mut dyn OctetSink) -> Result<()> {
        codec.write_tag(sink, WireTag::Map)?;
        codec.write_size(sink, self.len())?;
        // BTreeMap iterates in ascending key order, the required wire order.
        for (key, value) in self {
            codec.write(sink, key)?;
            codec.write(sink, value)?;
        }
        Ok(())
    }
}

impl<K, V> Decode for BTreeMap<K, V>
where
    K: Decode + Default + Ord,
    V: Decode + Default,
{
    fn decode(&mut self, codec: &mut Codec, source: &mut dyn OctetSource) -> Result<()> {
        codec.expect_tag(source, WireTag::Map)?;
        let count = codec.read_size(source)? as usize;
        self.clear();
        for _ in 0..count {
            let mut key = K::default();
            codec.read(source, &mut key)?;
            let mut value = V::default();
            codec.read(source, &mut value)?;
            self.insert(key, value);
        }
        Ok(())
    }
}

impl<T: Encode> Encode for BTreeSet<T> {
    fn encode(&self, codec: &mut Codec, sink: &mut dyn OctetSink) -> Result<()> {
        codec.write_tag(sink, WireTag::Set)?;
        codec.write_size(sink, self.len())?;
        // Ascending element order, matching the wire contract.
        for element in self {
            codec.write(sink, element)?;
        }
        Ok(())
    }
}

impl<T: Decode + Default + Ord> Decode for BTreeSet<T> {
    fn decode(&mut self, codec: &mut Codec, source: &mut dyn OctetSource) -> Result<()> {
        codec.expect_tag(source, WireTag::Set)?;
        let count = codec.read_size(source)? as usize;
        self.clear();
        for _ in 0..count {
            let mut element = T::default();
            codec.read(source, &mut element)?;
            self.insert(element);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{BufferSink, BufferSource};
    use crate::{ByteOrder, Codec};

    fn roundtrip<T>(value: &T, order: ByteOrder) -> T
    where
        T: Encode + Decode + Default,
    {
        let mut codec = Codec::with_stream_order(order);
        let mut sink = BufferSink::new();
        codec.write(&mut sink, value).unwrap();

        let mut source = BufferSource::new(sink.into_octets());
        let mut decoded = T::default();
        codec.read(&mut source, &mut decoded).unwrap();
        decoded
    }

    #[test]
    fn test_vector_wire_layout() {
        let mut codec = Codec::new();
        let mut sink = BufferSink::new();
        codec.write(&mut sink, &vec![1u8, 2u8]).unwrap();

        // VECTOR, count 2, then two tagged u8 literals.
        assert_eq!(
            sink.octets(),
            &[0x14, 0x00, 0x02, 0x01, 0x01, 0x01, 0x02]
        );
    }

    #[test]
    fn test_vector_roundtrip() {
        let values = vec![1.23f32, 3.21f32];
        assert_eq!(roundtrip(&values, ByteOrder::Big), values);
        assert_eq!(roundtrip(&values, ByteOrder::Little), values);
    }

    #[test]
    fn test_empty_vector_is_tag_and_zero_count() {
        let mut codec = Codec::new();
        let mut sink = BufferSink::new();
        codec.write(&mut sink, &Vec::<i32>::new()).unwrap();

        assert_eq!(sink.octets(), &[0x14, 0x00, 0x00]);

        let mut source = BufferSource::new(sink.into_octets());
        let mut decoded = vec![9i32];
        codec.read(&mut source, &mut decoded).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_bool_vector_bitset_layout() {
        let mut codec = Codec::new();
        let mut sink = BufferSink::new();
        codec.write(&mut sink, &vec![false, true]).unwrap();

        assert_eq!(sink.octets(), &[0x14, 0x00, 0x02, 0x00, 0x01]);
    }

    #[test]
    fn test_bool_vector_roundtrip() {
        let values = vec![false, true, true, false, true];
        assert_eq!(roundtrip(&values, ByteOrder::Big), values);
    }

    #[test]
    fn test_bool_vector_rejects_other_octets() {
        let mut codec = Codec::new();
        let mut source = BufferSource::from(vec![0x14, 0x00, 0x01, 0x02]);
        let mut decoded: Vec<bool> = Vec::new();

        let err = codec.read(&mut source, &mut decoded).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Invalid);
    }

    #[test]
    fn test_list_wire_tag() {
        let mut codec = Codec::new();
        let mut sink = BufferSink::new();
        let list: VecDeque<i32> = [1, 2].into_iter().collect();
        codec.write(&mut sink, &list).unwrap();

        assert_eq!(sink.octets()[0], 0x16);
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let list: VecDeque<i32> = [3, 1, 2].into_iter().collect();
        let decoded = roundtrip(&list, ByteOrder::Big);
        assert_eq!(decoded, list);
    }

    #[test]
    fn test_map_wire_layout_ascending_keys() {
        let mut codec = Codec::new();
        let mut map = BTreeMap::new();
        map.insert(1u8, 20u8);
        map.insert(0u8, 10u8);

        let mut sink = BufferSink::new();
        codec.write(&mut sink, &map).unwrap();

        // MAP, count 2, then key 0 / value 10, key 1 / value 20.
        assert_eq!(
            sink.octets(),
            &[
                0x15, 0x00, 0x02, // map header
                0x01, 0x00, 0x01, 10, // first entry
                0x01, 0x01, 0x01, 20, // second entry
            ]
        );
    }

    #[test]
    fn test_map_roundtrip() {
        let mut map = BTreeMap::new();
        map.insert(0i32, String::from("zero"));
        map.insert(1i32, String::from("one"));

        assert_eq!(roundtrip(&map, ByteOrder::Big), map);
        assert_eq!(roundtrip(&map, ByteOrder::Little), map);
    }

    #[test]
    fn test_map_decode_accepts_descending_keys() {
        let mut codec = Codec::new();
        // Hand-built stream with keys out of ascending order: 1 then 0.
        let mut sink = BufferSink::new();
        codec.write_tag(&mut sink, WireTag::Map).unwrap();
        codec.write_size(&mut sink, 2).unwrap();
        codec.write(&mut sink, &1u8).unwrap();
        codec.write(&mut sink, &11u8).unwrap();
        codec.write(&mut sink, &0u8).unwrap();
        codec.write(&mut sink, &10u8).unwrap();

        let mut source = BufferSource::new(sink.into_octets());
        let mut decoded: BTreeMap<u8, u8> = BTreeMap::new();
        codec.read(&mut source, &mut decoded).unwrap();

        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[&0], 10);
        assert_eq!(decoded[&1], 11);
        // Iteration comes back ascending regardless of wire order.
        assert_eq!(decoded.keys().copied().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_set_wire_tag_and_roundtrip() {
        let set: BTreeSet<i32> = [5, 1, 3].into_iter().collect();

        let mut codec = Codec::new();
        let mut sink = BufferSink::new();
        codec.write(&mut sink, &set).unwrap();
        assert_eq!(sink.octets()[0], 0x17);

        let mut source = BufferSource::new(sink.into_octets());
        let mut decoded = BTreeSet::new();
        codec.read(&mut source, &mut decoded).unwrap();
        assert_eq!(decoded, set);
    }

    #[test]
    fn test_boxed_elements_roundtrip() {
        let values: Vec<Box<u32>> = vec![Box::new(7), Box::new(8)];
        let decoded = roundtrip(&values, ByteOrder::Big);
        assert_eq!(decoded, values);
    }

    #[test]
    fn test_boxed_element_encodes_pointee() {
        let mut codec = Codec::new();

        let mut plain_sink = BufferSink::new();
        codec.write(&mut plain_sink, &vec![7u32]).unwrap();

        let mut boxed_sink = BufferSink::new();
        codec.write(&mut boxed_sink, &vec![Box::new(7u32)]).unwrap();

        assert_eq!(plain_sink.octets(), boxed_sink.octets());
    }

    #[test]
    fn test_nested_containers() {
        let values = vec![vec![1u16, 2u16], vec![], vec![3u16]];
        assert_eq!(roundtrip(&values, ByteOrder::Big), values);
    }

    #[test]
    fn test_count_truth_on_decode() {
        let mut codec = Codec::new();
        let mut sink = BufferSink::new();
        codec.write(&mut sink, &vec![1u8, 2u8, 3u8]).unwrap();
        // Append a trailing sentinel after the container.
        codec.write(&mut sink, &0xEEu8).unwrap();

        let mut source = BufferSource::new(sink.into_octets());
        let mut decoded: Vec<u8> = Vec::new();
        codec.read(&mut source, &mut decoded).unwrap();
        assert_eq!(decoded, vec![1, 2, 3]);

        // Exactly the container was consumed; the sentinel is still there.
        let mut sentinel = 0u8;
        codec.read(&mut source, &mut sentinel).unwrap();
        assert_eq!(sentinel, 0xEE);
    }
}

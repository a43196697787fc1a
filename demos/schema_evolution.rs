//! Schema evolution - new and old readers against new and old writers.
//!
//! This demo shows both evolution paths:
//! - Forward compatibility: a V2 stream decoded by a V1 reader; the
//!   appended field is skipped
//! - Backward compatibility: a V1 stream decoded by a V2 reader; the
//!   missing field keeps its default
//!
//! Run with:
//!
//! ```sh
//! cargo run --example schema_evolution
//! ```

use tagwire::transport::{BufferSink, BufferSource, OctetSink, OctetSource};
use tagwire::{Codec, Decode, Encode, Result};

/// The record as first shipped.
#[derive(Debug, Default, PartialEq)]
struct DataV1 {
    data: i32,
}

impl Encode for DataV1 {
    fn encode(&self, codec: &mut Codec, sink: &mut dyn OctetSink) -> Result<()> {
        codec.encode_record(sink, |codec, sink| codec.write(sink, &self.data))
    }
}

impl Decode for DataV1 {
    fn decode(&mut self, codec: &mut Codec, source: &mut dyn OctetSource) -> Result<()> {
        codec.decode_record(source, "DataV1", |codec, source| {
            codec.read(source, &mut self.data)
        })
    }
}

/// The next revision: one field appended at the end.
#[derive(Debug, Default, PartialEq)]
struct DataV2 {
    data: i32,
    data_new: i32,
}

impl Encode for DataV2 {
    fn encode(&self, codec: &mut Codec, sink: &mut dyn OctetSink) -> Result<()> {
        codec.encode_record(sink, |codec, sink| {
            codec.write(sink, &self.data)?;
            codec.write(sink, &self.data_new)
        })
    }
}

impl Decode for DataV2 {
    fn decode(&mut self, codec: &mut Codec, source: &mut dyn OctetSource) -> Result<()> {
        codec.decode_record(source, "DataV2", |codec, source| {
            codec.read(source, &mut self.data)?;
            codec.read(source, &mut self.data_new)
        })
    }
}

fn main() -> Result<()> {
    let mut codec = Codec::new();

    // Newer writer, older reader.
    let mut sink = BufferSink::new();
    codec.write(
        &mut sink,
        &DataV2 {
            data: 111,
            data_new: 222,
        },
    )?;

    let mut source = BufferSource::new(sink.into_octets());
    let mut v1 = DataV1::default();
    codec.read(&mut source, &mut v1)?;
    println!("V2 stream read by V1 reader: data = {}", v1.data);

    // Older writer, newer reader.
    let mut sink = BufferSink::new();
    codec.write(&mut sink, &DataV1 { data: 111 })?;

    let mut source = BufferSource::new(sink.into_octets());
    let mut v2 = DataV2::default();
    codec.read(&mut source, &mut v2)?;
    println!(
        "V1 stream read by V2 reader: data = {}, data_new = {} (default)",
        v2.data, v2.data_new
    );

    Ok(())
}

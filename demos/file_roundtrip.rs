//! File round-trip - persisting a record through the `std::io` adapters.
//!
//! This demo shows:
//! - Writing an encoded stream to disk via `IoSink`
//! - Reading it back via `IoSource`
//!
//! Run with:
//!
//! ```sh
//! cargo run --example file_roundtrip
//! ```

use std::fs::File;
use std::io::BufReader;

use tagwire::transport::{IoSink, IoSource, OctetSink, OctetSource};
use tagwire::{Codec, Decode, Encode, FixedString, Result, WideString};

#[derive(Debug, Default, PartialEq)]
struct Snapshot {
    name: FixedString<32>,
    comment: String,
    wide_comment: WideString,
    samples: Vec<f64>,
}

impl Encode for Snapshot {
    fn encode(&self, codec: &mut Codec, sink: &mut dyn OctetSink) -> Result<()> {
        codec.encode_record(sink, |codec, sink| {
            codec.write(sink, &self.name)?;
            codec.write(sink, &self.comment)?;
            codec.write(sink, &self.wide_comment)?;
            codec.write(sink, &self.samples)
        })
    }
}

impl Decode for Snapshot {
    fn decode(&mut self, codec: &mut Codec, source: &mut dyn OctetSource) -> Result<()> {
        codec.decode_record(source, "Snapshot", |codec, source| {
            codec.read(source, &mut self.name)?;
            codec.read(source, &mut self.comment)?;
            codec.read(source, &mut self.wide_comment)?;
            codec.read(source, &mut self.samples)
        })
    }
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let mut codec = Codec::new();
    codec.set_error_handler(Box::new(|kind, line, file| {
        eprintln!("PARSE ERROR: {file}:{line} {kind}");
    }));

    let snapshot = Snapshot {
        name: "sensor-7".try_into()?,
        comment: String::from("Hello World!"),
        wide_comment: WideString::from("Hello World Wide!"),
        samples: vec![1.23, 3.21],
    };

    let path = std::env::temp_dir().join("tagwire-snapshot.bin");

    // Write the encoded stream to disk.
    let mut sink = IoSink::new(File::create(&path)?)?;
    codec.write(&mut sink, &snapshot)?;
    sink.into_inner()?;
    println!("wrote {}", path.display());

    // Read it back.
    let mut source = IoSource::new(BufReader::new(File::open(&path)?))?;
    let mut decoded = Snapshot::default();
    codec.read(&mut source, &mut decoded)?;

    assert_eq!(decoded, snapshot);
    println!("round-trip ok: {:?}", decoded.comment);

    std::fs::remove_file(&path)?;
    Ok(())
}

//! Alarm log - record round-trip with handler wiring.
//!
//! This demo shows:
//! - Implementing `Encode`/`Decode` for records by hand
//! - Composing a derived record from a base record (base fields first)
//! - Wiring error and progress handlers to the codec
//!
//! Run with:
//!
//! ```sh
//! cargo run --example alarm_log
//! ```

use tagwire::transport::{BufferSink, BufferSource, OctetSink, OctetSource};
use tagwire::{Codec, Decode, Encode, Result};

#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct Date {
    day: i16,
    month: i16,
    year: i16,
}

impl Encode for Date {
    fn encode(&self, codec: &mut Codec, sink: &mut dyn OctetSink) -> Result<()> {
        codec.encode_record(sink, |codec, sink| {
            codec.write(sink, &self.day)?;
            codec.write(sink, &self.month)?;
            codec.write(sink, &self.year)
        })
    }
}

impl Decode for Date {
    fn decode(&mut self, codec: &mut Codec, source: &mut dyn OctetSource) -> Result<()> {
        codec.decode_record(source, "Date", |codec, source| {
            codec.read(source, &mut self.day)?;
            codec.read(source, &mut self.month)?;
            codec.read(source, &mut self.year)
        })
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[repr(u16)]
enum LogKind {
    #[default]
    Alarm = 0,
    Diagnostic = 1,
}

impl Encode for LogKind {
    fn encode(&self, codec: &mut Codec, sink: &mut dyn OctetSink) -> Result<()> {
        codec.write(sink, &(*self as u16))
    }
}

impl Decode for LogKind {
    fn decode(&mut self, codec: &mut Codec, source: &mut dyn OctetSource) -> Result<()> {
        let mut raw = 0u16;
        codec.read(source, &mut raw)?;
        *self = match raw {
            0 => LogKind::Alarm,
            _ => LogKind::Diagnostic,
        };
        Ok(())
    }
}

/// Base record shared by all log entries.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct Log {
    kind: LogKind,
    date: Date,
}

impl Log {
    fn encode_fields(&self, codec: &mut Codec, sink: &mut dyn OctetSink) -> Result<()> {
        codec.write(sink, &self.kind)?;
        codec.write(sink, &self.date)
    }

    fn decode_fields(&mut self, codec: &mut Codec, source: &mut dyn OctetSource) -> Result<()> {
        codec.read(source, &mut self.kind)?;
        codec.read(source, &mut self.date)
    }
}

/// Alarm entry: the base log fields, then its own value.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct AlarmLog {
    log: Log,
    alarm_value: u32,
}

impl Encode for AlarmLog {
    fn encode(&self, codec: &mut Codec, sink: &mut dyn OctetSink) -> Result<()> {
        codec.encode_record(sink, |codec, sink| {
            self.log.encode_fields(codec, sink)?;
            codec.write(sink, &self.alarm_value)
        })
    }
}

impl Decode for AlarmLog {
    fn decode(&mut self, codec: &mut Codec, source: &mut dyn OctetSource) -> Result<()> {
        codec.decode_record(source, "AlarmLog", |codec, source| {
            self.log.decode_fields(codec, source)?;
            codec.read(source, &mut self.alarm_value)
        })
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut codec = Codec::new();
    codec.set_error_handler(Box::new(|kind, line, file| {
        eprintln!("PARSE ERROR: {file}:{line} {kind}");
    }));
    codec.set_progress_handler(Box::new(|name, size| {
        println!("decoded {name} ({size} octets)");
    }));

    let entry = AlarmLog {
        log: Log {
            kind: LogKind::Alarm,
            date: Date {
                day: 1,
                month: 1,
                year: 2001,
            },
        },
        alarm_value: 123,
    };

    let mut sink = BufferSink::new();
    codec.write(&mut sink, &entry)?;
    println!("encoded {} octets: {:02X?}", sink.len(), sink.octets());

    let mut source = BufferSource::new(sink.into_octets());
    let mut decoded = AlarmLog::default();
    codec.read(&mut source, &mut decoded)?;

    assert_eq!(decoded, entry);
    println!("round-trip ok, alarm_value = {}", decoded.alarm_value);
    Ok(())
}

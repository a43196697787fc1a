//! Character sequence codecs: narrow strings, wide strings, and
//! fixed-capacity character arrays.

use std::fmt;
use std::str;

use crate::codec::Codec;
use crate::error::{CodecError, ErrorKind, Result};
use crate::transport::{OctetSink, OctetSource};
use crate::wire::WireTag;

use super::{Decode, Encode};

// Narrow strings: `STRING` tag, 16-bit code-unit count, one octet per unit.
// Decode validates UTF-8; the wire itself carries raw octets.

impl Encode for str {
    fn encode(&self, codec: &mut Codec, sink: &mut dyn OctetSink) -> Result<()> {
        codec.write_tag(sink, WireTag::String)?;
        codec.write_size(sink, self.len())?;
        codec.append(sink, self.as_bytes())
    }
}

impl Encode for String {
    fn encode(&self, codec: &mut Codec, sink: &mut dyn OctetSink) -> Result<()> {
        self.as_str().encode(codec, sink)
    }
}

impl Decode for String {
    fn decode(&mut self, codec: &mut Codec, source: &mut dyn OctetSource) -> Result<()> {
        codec.expect_tag(source, WireTag::String)?;
        let size = codec.read_size(source)? as usize;
        let mut octets = vec![0u8; size];
        codec.consume(source, &mut octets)?;
        match String::from_utf8(octets) {
            Ok(text) => {
                *self = text;
                Ok(())
            }
            Err(_) => Err(codec.fail_source(source, ErrorKind::Invalid)),
        }
    }
}

/// Wide character string: `WSTRING` tag, 16-bit code-unit count, exactly two
/// octets per unit in stream order.
///
/// The wire fixes the wide unit at 16 bits regardless of the host. Code
/// points above `0xFFFF` have no encoding and are rejected with
/// [`Invalid`](ErrorKind::Invalid); decode likewise rejects units that are
/// not scalar values (surrogate halves).
///
/// # Example
///
/// ```
/// use tagwire::{Codec, WideString};
/// use tagwire::transport::{BufferSink, BufferSource};
///
/// let mut codec = Codec::new();
/// let mut sink = BufferSink::new();
/// codec.write(&mut sink, &WideString::from("wide")).unwrap();
///
/// let mut source = BufferSource::new(sink.into_octets());
/// let mut decoded = WideString::new();
/// codec.read(&mut source, &mut decoded).unwrap();
/// assert_eq!(decoded.as_str(), "wide");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WideString(String);

impl WideString {
    /// Create an empty wide string.
    pub fn new() -> Self {
        Self(String::new())
    }

    /// View the contents as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of 16-bit code units the encoded form will carry.
    pub fn unit_count(&self) -> usize {
        self.0.chars().count()
    }

    /// Unwrap into the inner [`String`].
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for WideString {
    fn from(text: &str) -> Self {
        Self(text.to_owned())
    }
}

impl From<String> for WideString {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl fmt::Display for WideString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Encode for WideString {
    fn encode(&self, codec: &mut Codec, sink: &mut dyn OctetSink) -> Result<()> {
        codec.write_tag(sink, WireTag::WString)?;
        codec.write_size(sink, self.unit_count())?;
        for ch in self.0.chars() {
            let unit = u32::from(ch);
            if unit > 0xFFFF {
                return Err(codec.fail_sink(sink, ErrorKind::Invalid));
            }
            codec.write_u16(sink, unit as u16)?;
        }
        Ok(())
    }
}

impl Decode for WideString {
    fn decode(&mut self, codec: &mut Codec, source: &mut dyn OctetSource) -> Result<()> {
        codec.expect_tag(source, WireTag::WString)?;
        let size = codec.read_size(source)? as usize;
        let mut text = String::with_capacity(size);
        for _ in 0..size {
            let unit = codec.read_u16(source)?;
            match char::from_u32(u32::from(unit)) {
                Some(ch) => text.push(ch),
                None => return Err(codec.fail_source(source, ErrorKind::Invalid)),
            }
        }
        self.0 = text;
        Ok(())
    }
}

/// Fixed-capacity character array, NUL-terminated, capacity `N` octets.
///
/// The in-memory shape of a C `char[N]` buffer: content octets followed by a
/// terminator, unused capacity zeroed. Encodes under the `STRING` tag with
/// size `strlen + 1` - the terminator travels on the wire. Decoding a size
/// larger than `N` fails with [`StringTooLong`](ErrorKind::StringTooLong).
///
/// # Example
///
/// ```
/// use tagwire::FixedString;
///
/// let greeting: FixedString<32> = "Hello World!".try_into().unwrap();
/// assert_eq!(greeting.as_str(), "Hello World!");
/// assert_eq!(greeting.strlen(), 12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FixedString<const N: usize> {
    buf: [u8; N],
}

impl<const N: usize> FixedString<N> {
    /// Create an empty (all-zero) buffer.
    pub fn new() -> Self {
        Self { buf: [0u8; N] }
    }

    /// Replace the contents.
    ///
    /// Fails with [`StringTooLong`](ErrorKind::StringTooLong) when `text`
    /// plus its terminator does not fit in `N` octets, and with
    /// [`Invalid`](ErrorKind::Invalid) when `text` contains an interior NUL.
    pub fn set(&mut self, text: &str) -> Result<()> {
        if text.len() + 1 > N {
            return Err(CodecError::new(ErrorKind::StringTooLong));
        }
        if text.as_bytes().contains(&0) {
            return Err(CodecError::new(ErrorKind::Invalid));
        }
        self.buf = [0u8; N];
        self.buf[..text.len()].copy_from_slice(text.as_bytes());
        Ok(())
    }

    /// Content length in octets, up to the first NUL.
    pub fn strlen(&self) -> usize {
        self.buf.iter().position(|&b| b == 0).unwrap_or(N)
    }

    /// View the contents as text.
    pub fn as_str(&self) -> &str {
        // Contents are validated UTF-8 at every entry point (set / decode).
        str::from_utf8(&self.buf[..self.strlen()]).unwrap_or_default()
    }

    /// Capacity in octets, including the terminator.
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for FixedString<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> TryFrom<&str> for FixedString<N> {
    type Error = CodecError;

    fn try_from(text: &str) -> Result<Self> {
        let mut fixed = Self::new();
        fixed.set(text)?;
        Ok(fixed)
    }
}

impl<const N: usize> fmt::Display for FixedString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<const N: usize> Encode for FixedString<N> {
    fn encode(&self, codec: &mut Codec, sink: &mut dyn OctetSink) -> Result<()> {
        let size = self.strlen() + 1;
        codec.write_tag(sink, WireTag::String)?;
        codec.write_size(sink, size)?;
        codec.append(sink, &self.buf[..size.min(N)])?;
        if size > N {
            // Full buffer with no stored terminator: emit it explicitly.
            codec.append(sink, &[0])?;
        }
        Ok(())
    }
}

impl<const N: usize> Decode for FixedString<N> {
    fn decode(&mut self, codec: &mut Codec, source: &mut dyn OctetSource) -> Result<()> {
        codec.expect_tag(source, WireTag::String)?;
        let size = codec.read_size(source)? as usize;
        if size > N {
            return Err(codec.fail_source(source, ErrorKind::StringTooLong));
        }
        let mut buf = [0u8; N];
        codec.consume(source, &mut buf[..size])?;
        let content_len = buf[..size].iter().position(|&b| b == 0).unwrap_or(size);
        if str::from_utf8(&buf[..content_len]).is_err() {
            return Err(codec.fail_source(source, ErrorKind::Invalid));
        }
        // Keep only the content; anything after the first NUL is dropped.
        buf[content_len..].fill(0);
        self.buf = buf;
        Ok(())
    }
}

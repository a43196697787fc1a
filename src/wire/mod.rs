//! Wire-level building blocks: the tag protocol and byte-order handling.
//!
//! The codec is self-describing at the value level, not the schema level:
//! every value carries its tag, no value carries a field name or index.
//! Field ordering and meaning are by convention between writer and reader.

mod endian;
mod tag;

pub use endian::ByteOrder;
pub use tag::{WireTag, MAX_WIRE_SIZE, SIZE_PREFIX_SIZE, TAG_SIZE};

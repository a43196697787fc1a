//! Stream byte-order negotiation.
//!
//! Multi-byte primitives travel in the stream's declared byte order,
//! big-endian by default. A stream may open with an [`Endian`]
//! (crate::WireTag::Endian) marker followed by one order octet; readers
//! that see the marker switch over, readers that don't assume big endian.
//!
//! Floats are swapped as their raw bit pattern, never revalidated.

/// Declared byte order of a stream.
///
/// The discriminants are the order octets following an `ENDIAN` tag.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    /// Network order; the default when no marker is present.
    #[default]
    Big = 0x01,
    /// Little-endian streams, marked explicitly by the writer.
    Little = 0x02,
}

impl ByteOrder {
    /// Byte order of the host CPU.
    pub const fn host() -> Self {
        if cfg!(target_endian = "big") {
            Self::Big
        } else {
            Self::Little
        }
    }

    /// Decode an order octet from the wire.
    pub fn from_octet(octet: u8) -> Option<Self> {
        match octet {
            0x01 => Some(Self::Big),
            0x02 => Some(Self::Little),
            _ => None,
        }
    }

    /// The octet emitted after the `ENDIAN` tag for this order.
    #[inline]
    pub fn octet(self) -> u8 {
        self as u8
    }

    /// Whether values in this order need swapping on the host CPU.
    #[inline]
    pub fn differs_from_host(self) -> bool {
        self != Self::host()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_big_endian() {
        assert_eq!(ByteOrder::default(), ByteOrder::Big);
    }

    #[test]
    fn test_order_octets() {
        assert_eq!(ByteOrder::Big.octet(), 0x01);
        assert_eq!(ByteOrder::Little.octet(), 0x02);
    }

    #[test]
    fn test_from_octet() {
        assert_eq!(ByteOrder::from_octet(0x01), Some(ByteOrder::Big));
        assert_eq!(ByteOrder::from_octet(0x02), Some(ByteOrder::Little));
        assert_eq!(ByteOrder::from_octet(0x00), None);
        assert_eq!(ByteOrder::from_octet(0x03), None);
    }

    #[test]
    fn test_host_order_matches_target() {
        #[cfg(target_endian = "little")]
        assert_eq!(ByteOrder::host(), ByteOrder::Little);
        #[cfg(target_endian = "big")]
        assert_eq!(ByteOrder::host(), ByteOrder::Big);
    }

    #[test]
    fn test_differs_from_host() {
        assert!(!ByteOrder::host().differs_from_host());
    }
}

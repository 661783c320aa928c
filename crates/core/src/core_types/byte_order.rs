//! Native byte-order detection for the `byte_order` header attribute

/// Byte order declared in the `VTKFile` root element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// Least significant byte first
    LittleEndian,
    /// Most significant byte first
    BigEndian,
}

impl ByteOrder {
    /// Byte order of the running machine.
    ///
    /// Probes the first in-memory byte of a native multi-byte integer. Appended
    /// payloads are written without swapping, so this is also the order of
    /// every binary block.
    #[must_use]
    pub fn native() -> Self {
        let probe = 1_u32.to_ne_bytes();
        if probe[0] == 0 {
            Self::BigEndian
        } else {
            Self::LittleEndian
        }
    }

    /// Value of the `byte_order` attribute
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LittleEndian => "LittleEndian",
            Self::BigEndian => "BigEndian",
        }
    }
}

//! Decoded property values and the write-type selection rule.

use crate::object::ObjectType;

/// A decoded BACnet primitive value, narrowed to the variants Flexit devices
/// actually return for the catalogued properties.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Unsigned(u64),
    Real(f32),
    String(String),
    Enumerated(u8),
    /// The device reported a property-access-error for this property; no
    /// value accompanies it.
    AccessError,
}

/// Application tag number used to encode a write's value, chosen per
/// [`WriteKind::for_object_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    UnsignedInt,
    Real,
    Enumerated,
}

impl WriteKind {
    /// `AnalogValue` writes as a 4-octet IEEE-754 float; `BinaryValue` writes
    /// as a 1-octet enumerated; everything else writes as an unsigned
    /// integer, width-adapted to the value (see [`unsigned_octets`]).
    pub fn for_object_type(object_type: ObjectType) -> Self {
        match object_type {
            ObjectType::AnalogValue => Self::Real,
            ObjectType::BinaryValue => Self::Enumerated,
            _ => Self::UnsignedInt,
        }
    }

    pub(crate) fn application_tag_number(self) -> u8 {
        match self {
            Self::UnsignedInt => 2,
            Self::Real => 4,
            Self::Enumerated => 9,
        }
    }
}

/// A value supplied by the caller for a write, before it is narrowed into the
/// wire representation chosen by [`WriteKind`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WriteValue {
    Unsigned(u32),
    Real(f32),
    Enumerated(u8),
}

/// The minimal big-endian octet sequence for `value`: 1 octet up to 0xFF, 2
/// up to 0xFFFF, 3 up to 0xFFFFFF, 4 otherwise. Mirrors how BACnet unsigned
/// integers are conventionally packed to their smallest width on the wire.
pub(crate) fn unsigned_octets(value: u32) -> Vec<u8> {
    if value <= 0xff {
        vec![value as u8]
    } else if value <= 0xffff {
        (value as u16).to_be_bytes().to_vec()
    } else if value <= 0xff_ffff {
        value.to_be_bytes()[1..].to_vec()
    } else {
        value.to_be_bytes().to_vec()
    }
}

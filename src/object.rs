//! Closed BACnet object-type and property-identifier enumerations, and the
//! packed object identifier used throughout the codec.

use crate::error::DecodeError;
use crate::tag::DecodedTag;

/// Object types this library understands on the wire. Closed set: an unknown
/// code is a [`DecodeError::UnknownObjectType`], not a catch-all variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ObjectType {
    AnalogInput = 0,
    AnalogOutput = 1,
    AnalogValue = 2,
    BinaryValue = 5,
    Device = 8,
    MultiStateValue = 19,
    PositiveIntegerValue = 48,
}

impl ObjectType {
    pub fn wire_code(self) -> u16 {
        self as u16
    }

    pub fn from_wire_code(code: u16) -> Option<Self> {
        Some(match code {
            0 => Self::AnalogInput,
            1 => Self::AnalogOutput,
            2 => Self::AnalogValue,
            5 => Self::BinaryValue,
            8 => Self::Device,
            19 => Self::MultiStateValue,
            48 => Self::PositiveIntegerValue,
            _ => return None,
        })
    }
}

/// Property identifiers this library reads or writes. Closed subset of the
/// full BACnet property-identifier space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PropertyId {
    Description = 28,
    ObjectName = 77,
    PresentValue = 85,
}

impl PropertyId {
    pub fn wire_code(self) -> u8 {
        self as u8
    }

    pub fn from_wire_code(code: u8) -> Option<Self> {
        Some(match code {
            28 => Self::Description,
            77 => Self::ObjectName,
            85 => Self::PresentValue,
            _ => return None,
        })
    }
}

/// A BACnet object identifier: an object type paired with an instance number
/// in `[0, 2^22)`. Packs to a big-endian 32-bit word: `type << 22 | instance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectIdentifier {
    pub object_type: ObjectType,
    pub instance: u32,
}

const INSTANCE_MASK: u32 = 0x3f_ffff;

impl ObjectIdentifier {
    pub fn new(object_type: ObjectType, instance: u32) -> Self {
        debug_assert!(instance <= INSTANCE_MASK, "instance id out of 22-bit range");
        Self {
            object_type,
            instance,
        }
    }

    pub fn encode(self) -> u32 {
        ((self.object_type.wire_code() as u32) << 22) | (self.instance & INSTANCE_MASK)
    }

    pub fn decode(word: u32, payload_for_error: impl FnOnce() -> Vec<u8>) -> Result<Self, DecodeError> {
        let type_code = (word >> 22) as u16;
        let instance = word & INSTANCE_MASK;
        let object_type = ObjectType::from_wire_code(type_code).ok_or_else(|| {
            DecodeError::UnknownObjectType {
                code: type_code,
                payload: crate::error::HexPayload(payload_for_error()),
            }
        })?;
        Ok(Self {
            object_type,
            instance,
        })
    }
}

/// Require that `tag` is a context tag with the given number and a primitive
/// (non-constructed) length-or-type, returning a [`DecodeError`] otherwise.
pub(crate) fn require_context_tag(
    tag: DecodedTag,
    expected_number: u8,
    payload: impl FnOnce() -> Vec<u8>,
) -> Result<(), DecodeError> {
    if !tag.is_context || tag.number != expected_number || tag.is_opening() || tag.is_closing() {
        return Err(DecodeError::UnexpectedTag {
            number: tag.number,
            class: tag.is_context as u8,
            len_or_type: tag.len_or_type,
            payload: crate::error::HexPayload(payload()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_identifier_roundtrip() {
        let id = ObjectIdentifier::new(ObjectType::MultiStateValue, 42);
        let word = id.encode();
        assert_eq!(word, 0x04c0_002a);
        let decoded = ObjectIdentifier::decode(word, Vec::new).unwrap();
        assert_eq!(decoded, id);
    }

    #[test]
    fn unknown_object_type_fails() {
        // type code 99 is not in the closed set
        let word = (99u32 << 22) | 5;
        let err = ObjectIdentifier::decode(word, || vec![1, 2, 3]);
        assert!(matches!(err, Err(DecodeError::UnknownObjectType { code: 99, .. })));
    }
}

#![doc = include_str!("../README.md")]

pub mod decoding;
pub mod device;
pub mod discovery;
pub mod encoding;
pub mod error;
pub mod frame;
pub mod object;
pub mod property;
pub mod tag;
pub mod transport;
pub mod value;

pub use device::FlexitBacnet;
pub use error::{ClientError, DecodeError, InvalidArgument, TransportError};
pub use frame::BACNET_IP_PORT;
pub use object::{ObjectIdentifier, ObjectType, PropertyId};
pub use value::PropertyValue;

#[cfg(test)]
mod tests {
    use crate::encoding::{encode_read_property_multiple_frame, encode_write_property_frame};
    use crate::property;
    use crate::value::WriteValue;

    #[test]
    fn read_and_write_frames_carry_the_correct_bvlc_header() {
        let read_frame = encode_read_property_multiple_frame(1, property::DEVICE_PROPERTIES);
        assert_eq!(&read_frame[0..2], &[0x81, 0x0a]);
        let len = u16::from_be_bytes([read_frame[2], read_frame[3]]);
        assert_eq!(len as usize, read_frame.len());

        let write_frame = encode_write_property_frame(1, &property::VENTILATION_MODE, WriteValue::Unsigned(3));
        assert_eq!(&write_frame[0..2], &[0x81, 0x0a]);
    }
}

//! Full-frame encoders: `ReadPropertyMultiple`, `WriteProperty`, and the
//! vendor-specific discovery broadcast. Each builds an APDU, then hands it to
//! [`crate::frame::build_frame`] for the outer BVLC/NPDU wrapping.

use crate::frame::{self, BVLC_BROADCAST, BVLC_UNICAST, NPDU_EXPECTS_REPLY, NPDU_NO_REPLY};
use crate::object::ObjectIdentifier;
use crate::property::PropertyDescriptor;
use crate::tag;
use crate::value::{WriteKind, WriteValue};

const PDU_TYPE_CONFIRMED_REQUEST: u8 = 0x00;
const PDU_TYPE_UNCONFIRMED_REQUEST: u8 = 0x10;

const SERVICE_READ_PROPERTY_MULTIPLE: u8 = 0x0e;
const SERVICE_WRITE_PROPERTY: u8 = 0x0f;
const SERVICE_UNCONFIRMED_PRIVATE_TRANSFER: u8 = 0x04;

/// Siemens vendor id used by the Flexit discovery extension.
pub const VENDOR_ID: u8 = 7;
/// Service number carried by a discovery request.
pub const DISCOVERY_REQUEST_SERVICE_NUMBER: u16 = 515;
/// Service number expected on a discovery response.
pub const DISCOVERY_RESPONSE_SERVICE_NUMBER: u16 = 516;

/// Opaque vendor service-parameters blob, captured verbatim from the vendor
/// mobile application's traffic and preserved byte-for-byte. The corpus this
/// crate was built against does not carry the captured bytes, so this is a
/// fixed, internally generated 100-octet stand-in with the same shape
/// (service parameters are never interpreted, only replayed).
pub const DISCOVERY_BLOB_LEN: usize = 100;
pub const DISCOVERY_BLOB: [u8; DISCOVERY_BLOB_LEN] = {
    let mut blob = [0u8; DISCOVERY_BLOB_LEN];
    let mut i = 0;
    while i < DISCOVERY_BLOB_LEN {
        blob[i] = (i as u8).wrapping_mul(31).wrapping_add(7);
        i += 1;
    }
    blob
};

fn confirmed_request_header(apdu: &mut Vec<u8>, invoke_id: u8, service_choice: u8) {
    apdu.push(PDU_TYPE_CONFIRMED_REQUEST);
    // max-segments-accepted / max-apdu-size nibbles; this codec never
    // segments, so these are fixed values the device accepts unconditionally.
    apdu.push(0x04);
    apdu.push(invoke_id);
    apdu.push(service_choice);
}

fn encode_object_identifier(apdu: &mut Vec<u8>, id: ObjectIdentifier) {
    tag::encode_context_tag(apdu, 0, 4);
    apdu.extend_from_slice(&id.encode().to_be_bytes());
}

/// Build a `ReadPropertyMultiple-Request` APDU for one or more descriptors,
/// each contributing one `ReadAccessSpecification`.
pub fn encode_read_property_multiple_apdu(invoke_id: u8, descriptors: &[PropertyDescriptor]) -> Vec<u8> {
    let mut apdu = Vec::new();
    confirmed_request_header(&mut apdu, invoke_id, SERVICE_READ_PROPERTY_MULTIPLE);

    for descriptor in descriptors {
        encode_object_identifier(&mut apdu, descriptor.object_identifier());

        tag::encode_opening_tag(&mut apdu, 1);
        for property in descriptor.read_values {
            tag::encode_context_tag(&mut apdu, 0, 1);
            apdu.push(property.wire_code());
        }
        tag::encode_closing_tag(&mut apdu, 1);
    }

    apdu
}

/// Build the BVLC/NPDU/APDU frame for a `ReadPropertyMultiple-Request`.
pub fn encode_read_property_multiple_frame(invoke_id: u8, descriptors: &[PropertyDescriptor]) -> Vec<u8> {
    let apdu = encode_read_property_multiple_apdu(invoke_id, descriptors);
    frame::build_frame(BVLC_UNICAST, NPDU_EXPECTS_REPLY, &apdu)
}

fn encode_application_tagged_value(apdu: &mut Vec<u8>, kind: WriteKind, value: WriteValue) {
    match value {
        WriteValue::Unsigned(v) => {
            let bytes = crate::value::unsigned_octets(v);
            tag::encode_application_tag(apdu, kind.application_tag_number(), bytes.len() as u8);
            apdu.extend_from_slice(&bytes);
        }
        WriteValue::Real(v) => {
            tag::encode_application_tag(apdu, kind.application_tag_number(), 4);
            apdu.extend_from_slice(&v.to_be_bytes());
        }
        WriteValue::Enumerated(v) => {
            tag::encode_application_tag(apdu, kind.application_tag_number(), 1);
            apdu.push(v);
        }
    }
}

/// Build a `WriteProperty-Request` APDU against a descriptor's `PresentValue`,
/// at the descriptor's configured priority if any.
///
/// `value`'s variant must agree with `descriptor.write_kind()`; callers
/// (the device façade) are responsible for selecting the correct variant.
pub fn encode_write_property_apdu(invoke_id: u8, descriptor: &PropertyDescriptor, value: WriteValue) -> Vec<u8> {
    let mut apdu = Vec::new();
    confirmed_request_header(&mut apdu, invoke_id, SERVICE_WRITE_PROPERTY);

    encode_object_identifier(&mut apdu, descriptor.object_identifier());

    // propertyIdentifier [1], always PresentValue for writes this library makes.
    tag::encode_context_tag(&mut apdu, 1, 1);
    apdu.push(crate::object::PropertyId::PresentValue.wire_code());

    // propertyValue [3]
    tag::encode_opening_tag(&mut apdu, 3);
    encode_application_tagged_value(&mut apdu, descriptor.write_kind(), value);
    tag::encode_closing_tag(&mut apdu, 3);

    if let Some(priority) = descriptor.priority {
        tag::encode_context_tag(&mut apdu, 4, 1);
        apdu.push(priority);
    }

    apdu
}

/// Build the BVLC/NPDU/APDU frame for a `WriteProperty-Request`.
pub fn encode_write_property_frame(invoke_id: u8, descriptor: &PropertyDescriptor, value: WriteValue) -> Vec<u8> {
    let apdu = encode_write_property_apdu(invoke_id, descriptor, value);
    frame::build_frame(BVLC_UNICAST, NPDU_EXPECTS_REPLY, &apdu)
}

/// Build the `UnconfirmedPrivateTransfer-Request` APDU used for discovery.
pub fn encode_discovery_apdu() -> Vec<u8> {
    let mut apdu = Vec::new();
    apdu.push(PDU_TYPE_UNCONFIRMED_REQUEST);
    apdu.push(SERVICE_UNCONFIRMED_PRIVATE_TRANSFER);

    tag::encode_context_tag(&mut apdu, 0, 1);
    apdu.push(VENDOR_ID);

    tag::encode_context_tag(&mut apdu, 1, 2);
    apdu.extend_from_slice(&DISCOVERY_REQUEST_SERVICE_NUMBER.to_be_bytes());

    tag::encode_opening_tag(&mut apdu, 2);
    apdu.extend_from_slice(&DISCOVERY_BLOB);
    tag::encode_closing_tag(&mut apdu, 2);

    apdu
}

/// Build the BVLC/NPDU/APDU broadcast frame used to probe for devices.
pub fn encode_discovery_frame() -> Vec<u8> {
    let apdu = encode_discovery_apdu();
    frame::build_frame(BVLC_BROADCAST, NPDU_NO_REPLY, &apdu)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property;

    #[test]
    fn read_property_multiple_matches_reference_bytes() {
        let descriptor = property::device_object(2);
        // Restrict to ObjectName to line up with the documented reference
        // frame for a single-property read.
        let descriptor = PropertyDescriptor {
            read_values: &[crate::object::PropertyId::ObjectName],
            ..descriptor
        };
        let apdu = encode_read_property_multiple_apdu(1, std::slice::from_ref(&descriptor));
        assert_eq!(
            apdu,
            vec![0x00, 0x04, 0x01, 0x0e, 0x0c, 0x02, 0x00, 0x00, 0x02, 0x1e, 0x09, 0x4d, 0x1f]
        );
    }

    #[test]
    fn write_property_header_and_object_id() {
        let apdu = encode_write_property_apdu(1, &property::VENTILATION_MODE, WriteValue::Unsigned(3));
        assert_eq!(&apdu[0..4], &[0x00, 0x04, 0x01, 0x0f]);
        assert_eq!(&apdu[4..9], &[0x0c, 0x04, 0xc0, 0x00, 0x2a]);
        // property reference [1]=PresentValue, propertyValue [3] holding a 1-octet
        // unsigned 3, then priority [4]=13, matching the documented reference frame.
        assert_eq!(
            apdu,
            vec![
                0x00, 0x04, 0x01, 0x0f, 0x0c, 0x04, 0xc0, 0x00, 0x2a, 0x19, 0x55, 0x3e, 0x21, 0x03, 0x3f, 0x49, 0x0d,
            ]
        );
    }

    #[test]
    fn write_property_unsigned_value_above_one_octet_does_not_truncate() {
        // 300 minutes does not fit in one octet; the encoder must widen to
        // two octets rather than wrap it into an unrelated value.
        let apdu = encode_write_property_apdu(1, &property::FIREPLACE_VENTILATION_RUNTIME, WriteValue::Unsigned(300));
        let pos = apdu.windows(2).position(|w| w == [0x3e, 0x22]).expect("2-octet unsigned application tag");
        assert_eq!(&apdu[pos + 2..pos + 4], &300u16.to_be_bytes());
    }

    #[test]
    fn write_property_real_value_uses_four_byte_application_tag() {
        let apdu = encode_write_property_apdu(1, &property::AIR_TEMP_SETPOINT_HOME, WriteValue::Real(21.5));
        // propertyValue opening tag (0x3e) followed by application tag 0x44 (real, len 4)
        let pos = apdu.windows(2).position(|w| w == [0x3e, 0x44]).unwrap();
        assert_eq!(&apdu[pos + 2..pos + 6], &21.5f32.to_be_bytes());
    }

    #[test]
    fn discovery_frame_has_expected_header_and_vendor_fields() {
        let frame = encode_discovery_frame();
        assert_eq!(frame[0], 0x81);
        assert_eq!(frame[1], 0x0b);
        assert_eq!(frame[6], 0x10);
        assert_eq!(frame[7], 0x04);
        assert_eq!(frame[8], 0x09); // context tag 0, length 1
        assert_eq!(frame[9], VENDOR_ID);
        assert_eq!(frame[10], 0x1a); // context tag 1, length 2
        assert_eq!(&frame[11..13], &DISCOVERY_REQUEST_SERVICE_NUMBER.to_be_bytes());
    }
}

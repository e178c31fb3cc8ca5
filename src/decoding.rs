//! Stateful cursor over a response buffer, and the three framings built on
//! top of it: `ReadPropertyMultiple` response, `WriteProperty` response, and
//! the discovery-response probe.

use crate::error::{DecodeError, HexPayload};
use crate::frame::{self, BVLC_BROADCAST, BVLC_UNICAST};
use crate::object::{require_context_tag, ObjectIdentifier, PropertyId};
use crate::tag::{self, DecodedTag};
use crate::value::PropertyValue;

const APDU_TYPE_COMPLEX_ACK: u8 = 3;
const APDU_TYPE_SIMPLE_ACK: u8 = 2;
const APDU_TYPE_UNCONFIRMED_REQUEST: u8 = 1;

const INVOKE_ID: u8 = 1;
const SERVICE_READ_PROPERTY_MULTIPLE: u8 = 0x0e;
const SERVICE_WRITE_PROPERTY: u8 = 0x0f;

/// One object's properties as decoded from a `ReadPropertyMultiple` response.
pub type ObjectProperties = Vec<(PropertyId, PropertyValue)>;
/// The full decoded state of a device: every object read, in response order.
pub type DeviceState = Vec<(ObjectIdentifier, ObjectProperties)>;

/// A cursor over one response buffer. Every failure carries the entire
/// original buffer (not just the unconsumed tail) for diagnostics.
pub struct Decoder<'a> {
    full: &'a [u8],
    data: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(full: &'a [u8], data: &'a [u8]) -> Self {
        Self { full, data, pos: 0 }
    }

    fn payload(&self) -> HexPayload {
        HexPayload(self.full.to_vec())
    }

    fn eof(&self) -> DecodeError {
        DecodeError::UnexpectedEof { payload: self.payload() }
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    pub fn read_byte(&mut self) -> Result<u8, DecodeError> {
        let b = *self.data.get(self.pos).ok_or_else(|| self.eof())?;
        self.pos += 1;
        Ok(b)
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        let end = self.pos + n;
        if end > self.data.len() {
            return Err(self.eof());
        }
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    pub fn read_tag(&mut self) -> Result<DecodedTag, DecodeError> {
        let (tag, consumed) = tag::decode_tag(&self.data[self.pos..]).ok_or_else(|| self.eof())?;
        self.pos += consumed;
        Ok(tag)
    }

    pub fn parse_object_identifier(&mut self) -> Result<ObjectIdentifier, DecodeError> {
        let tag = self.read_tag()?;
        require_context_tag(tag, 0, || self.full.to_vec())?;
        if tag.len_or_type != 4 {
            return Err(DecodeError::UnexpectedTag {
                number: tag.number,
                class: tag.is_context as u8,
                len_or_type: tag.len_or_type,
                payload: self.payload(),
            });
        }
        let word_bytes = self.read_bytes(4)?;
        let word = u32::from_be_bytes([word_bytes[0], word_bytes[1], word_bytes[2], word_bytes[3]]);
        ObjectIdentifier::decode(word, || self.full.to_vec())
    }

    fn read_application_primitive(&mut self, tag_number: u8, len: u8) -> Result<PropertyValue, DecodeError> {
        match tag_number {
            2 => {
                let bytes = self.read_bytes(len as usize)?;
                let mut value: u64 = 0;
                for b in bytes {
                    value = (value << 8) | *b as u64;
                }
                Ok(PropertyValue::Unsigned(value))
            }
            4 => {
                if len != 4 {
                    return Err(DecodeError::UnsupportedRealWidth {
                        len: len as usize,
                        payload: self.payload(),
                    });
                }
                let bytes = self.read_bytes(4)?;
                Ok(PropertyValue::Real(f32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])))
            }
            7 => {
                let bytes = self.read_bytes(len as usize)?;
                if bytes.is_empty() {
                    return Err(DecodeError::EmptyCharacterString { payload: self.payload() });
                }
                let encoding = bytes[0];
                if encoding != 0 {
                    return Err(DecodeError::UnsupportedStringEncoding {
                        encoding,
                        payload: self.payload(),
                    });
                }
                let s = std::str::from_utf8(&bytes[1..]).map_err(|source| DecodeError::InvalidUtf8 { source })?;
                Ok(PropertyValue::String(s.to_string()))
            }
            9 => {
                if len != 1 {
                    return Err(DecodeError::UnsupportedEnumeratedWidth {
                        len: len as usize,
                        payload: self.payload(),
                    });
                }
                Ok(PropertyValue::Enumerated(self.read_byte()?))
            }
            other => Err(DecodeError::UnsupportedApplicationTag {
                tag_number: other,
                payload: self.payload(),
            }),
        }
    }

    /// Read one `(opening-tag, value, closing-tag)` triple: tag number `4`
    /// carries a real value (application-tagged); tag number `5` carries a
    /// fixed 4-octet `AccessError` body. Any other opening number is invalid.
    pub fn read_value(&mut self) -> Result<PropertyValue, DecodeError> {
        let opening = self.read_tag()?;
        if !opening.is_context || !opening.is_opening() {
            return Err(DecodeError::UnexpectedTag {
                number: opening.number,
                class: opening.is_context as u8,
                len_or_type: opening.len_or_type,
                payload: self.payload(),
            });
        }

        let value = match opening.number {
            4 => {
                let app_tag = self.read_tag()?;
                self.read_application_primitive(app_tag.number, app_tag.len_or_type)?
            }
            5 => {
                self.read_bytes(4)?;
                PropertyValue::AccessError
            }
            other => {
                return Err(DecodeError::UnexpectedTag {
                    number: other,
                    class: 1,
                    len_or_type: opening.len_or_type,
                    payload: self.payload(),
                })
            }
        };

        let closing = self.read_tag()?;
        if !closing.is_context || !closing.is_closing() || closing.number != opening.number {
            return Err(DecodeError::MismatchedClosingTag {
                expected: opening.number,
                found: closing.number,
                payload: self.payload(),
            });
        }

        Ok(value)
    }

    /// Read an opening context tag `1`, then repeated `(propertyId, value)`
    /// pairs until the matching closing tag `1`.
    pub fn parse_list_of_results(&mut self) -> Result<ObjectProperties, DecodeError> {
        let opening = self.read_tag()?;
        if !opening.is_context || !opening.is_opening() {
            return Err(DecodeError::UnexpectedTag {
                number: opening.number,
                class: opening.is_context as u8,
                len_or_type: opening.len_or_type,
                payload: self.payload(),
            });
        }

        let mut results = Vec::new();
        loop {
            let tag = self.read_tag()?;
            if tag.is_context && tag.number == opening.number && tag.is_closing() {
                break;
            }

            if !tag.is_context || tag.number != 2 {
                return Err(DecodeError::UnexpectedTag {
                    number: tag.number,
                    class: tag.is_context as u8,
                    len_or_type: tag.len_or_type,
                    payload: self.payload(),
                });
            }
            let property_code = self.read_byte()?;
            let property = PropertyId::from_wire_code(property_code).ok_or_else(|| DecodeError::UnknownPropertyId {
                code: property_code,
                payload: self.payload(),
            })?;

            let value = self.read_value()?;
            results.push((property, value));
        }

        Ok(results)
    }
}

fn check_bvlc_and_service(
    data: &[u8],
    bvlc_function: u8,
    apdu_type: u8,
    service_choice: u8,
) -> Result<&[u8], DecodeError> {
    let apdu = frame::parse_frame_header(data, bvlc_function)?;

    let type_byte = *apdu.first().ok_or_else(|| DecodeError::UnexpectedEof {
        payload: HexPayload(data.to_vec()),
    })?;
    let found_type = type_byte >> 4;
    if found_type != apdu_type {
        return Err(DecodeError::BadApduType {
            found: found_type,
            expected: apdu_type,
            payload: HexPayload(data.to_vec()),
        });
    }

    let invoke_id = *apdu.get(1).ok_or_else(|| DecodeError::UnexpectedEof {
        payload: HexPayload(data.to_vec()),
    })?;
    if invoke_id != INVOKE_ID {
        return Err(DecodeError::BadInvokeId {
            found: invoke_id,
            expected: INVOKE_ID,
            payload: HexPayload(data.to_vec()),
        });
    }

    let found_service = *apdu.get(2).ok_or_else(|| DecodeError::UnexpectedEof {
        payload: HexPayload(data.to_vec()),
    })?;
    if found_service != service_choice {
        return Err(DecodeError::BadServiceChoice {
            found: found_service,
            expected: service_choice,
            payload: HexPayload(data.to_vec()),
        });
    }

    Ok(&apdu[3..])
}

/// Decode a full `ReadPropertyMultiple` response frame into a [`DeviceState`].
pub fn decode_read_property_multiple_response(data: &[u8]) -> Result<DeviceState, DecodeError> {
    let body = check_bvlc_and_service(data, BVLC_UNICAST, APDU_TYPE_COMPLEX_ACK, SERVICE_READ_PROPERTY_MULTIPLE)?;

    let mut decoder = Decoder::new(data, body);
    let mut state = Vec::new();
    while !decoder.is_empty() {
        let object_id = decoder.parse_object_identifier()?;
        let results = decoder.parse_list_of_results()?;
        state.push((object_id, results));
    }
    Ok(state)
}

/// Validate a `WriteProperty` response frame. There is no payload beyond the
/// ack header, so success carries no data.
pub fn decode_write_property_response(data: &[u8]) -> Result<(), DecodeError> {
    check_bvlc_and_service(data, BVLC_UNICAST, APDU_TYPE_SIMPLE_ACK, SERVICE_WRITE_PROPERTY)?;
    Ok(())
}

/// True if `data` is a discovery-response broadcast: BVLC type/function match,
/// APDU type is `UnconfirmedRequest`, and the first two context tags carry
/// vendor id 7 and service number 516. The payload body is otherwise ignored.
pub fn is_discovery_response(data: &[u8]) -> bool {
    let Ok(apdu) = frame::parse_frame_header(data, BVLC_BROADCAST) else {
        return false;
    };
    let mut decoder = Decoder::new(data, apdu);

    let Ok(type_byte) = decoder.read_byte() else { return false };
    if type_byte >> 4 != APDU_TYPE_UNCONFIRMED_REQUEST {
        return false;
    }
    // service choice octet, unchecked beyond being present
    if decoder.read_byte().is_err() {
        return false;
    }

    let Ok(vendor_tag) = decoder.read_tag() else { return false };
    if !vendor_tag.is_context || vendor_tag.number != 0 || vendor_tag.len_or_type != 1 {
        return false;
    }
    let Ok(vendor_id) = decoder.read_byte() else { return false };
    if vendor_id != crate::encoding::VENDOR_ID {
        return false;
    }

    let Ok(service_tag) = decoder.read_tag() else { return false };
    if !service_tag.is_context || service_tag.number != 1 || service_tag.len_or_type != 2 {
        return false;
    }
    let Ok(bytes) = decoder.read_bytes(2) else { return false };
    let service_number = u16::from_be_bytes([bytes[0], bytes[1]]);
    service_number == crate::encoding::DISCOVERY_RESPONSE_SERVICE_NUMBER
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding;
    use crate::object::ObjectType;

    fn wrap_complex_ack(apdu_body_after_header: &[u8]) -> Vec<u8> {
        let mut apdu = vec![0x30, INVOKE_ID, SERVICE_READ_PROPERTY_MULTIPLE];
        apdu.extend_from_slice(apdu_body_after_header);
        frame::build_frame(BVLC_UNICAST, crate::frame::NPDU_EXPECTS_REPLY, &apdu)
    }

    #[test]
    fn decodes_enumerated_present_value() {
        let object_id = ObjectIdentifier::new(ObjectType::MultiStateValue, 42);
        let mut body = Vec::new();
        tag::encode_context_tag(&mut body, 0, 4);
        body.extend_from_slice(&object_id.encode().to_be_bytes());
        tag::encode_opening_tag(&mut body, 1);
        tag::encode_context_tag(&mut body, 2, 1);
        body.push(PropertyId::PresentValue.wire_code());
        tag::encode_opening_tag(&mut body, 4);
        tag::encode_application_tag(&mut body, 9, 1);
        body.push(3);
        tag::encode_closing_tag(&mut body, 4);
        tag::encode_closing_tag(&mut body, 1);

        let frame = wrap_complex_ack(&body);
        let state = decode_read_property_multiple_response(&frame).unwrap();
        assert_eq!(state.len(), 1);
        assert_eq!(state[0].0, object_id);
        assert_eq!(state[0].1, vec![(PropertyId::PresentValue, PropertyValue::Enumerated(3))]);
    }

    #[test]
    fn decodes_access_error_without_desync() {
        let object_id = ObjectIdentifier::new(ObjectType::AnalogInput, 1);
        let mut body = Vec::new();
        tag::encode_context_tag(&mut body, 0, 4);
        body.extend_from_slice(&object_id.encode().to_be_bytes());
        tag::encode_opening_tag(&mut body, 1);
        tag::encode_context_tag(&mut body, 2, 1);
        body.push(PropertyId::PresentValue.wire_code());
        tag::encode_opening_tag(&mut body, 5);
        body.extend_from_slice(&[0, 0, 0, 0]);
        tag::encode_closing_tag(&mut body, 5);
        tag::encode_closing_tag(&mut body, 1);

        let frame = wrap_complex_ack(&body);
        let state = decode_read_property_multiple_response(&frame).unwrap();
        assert_eq!(state[0].1, vec![(PropertyId::PresentValue, PropertyValue::AccessError)]);
    }

    #[test]
    fn rejects_wrong_invoke_id() {
        let mut apdu = vec![0x30, 0x02, SERVICE_READ_PROPERTY_MULTIPLE];
        apdu.extend_from_slice(&[0, 0]);
        let frame = frame::build_frame(BVLC_UNICAST, crate::frame::NPDU_EXPECTS_REPLY, &apdu);
        let err = decode_read_property_multiple_response(&frame);
        assert!(matches!(err, Err(DecodeError::BadInvokeId { found: 2, .. })));
    }

    #[test]
    fn write_property_response_has_no_payload() {
        let apdu = vec![0x20, INVOKE_ID, SERVICE_WRITE_PROPERTY];
        let frame = frame::build_frame(BVLC_UNICAST, crate::frame::NPDU_EXPECTS_REPLY, &apdu);
        assert!(decode_write_property_response(&frame).is_ok());
    }

    #[test]
    fn recognizes_discovery_response() {
        let mut apdu = vec![0x10, 0x04];
        tag::encode_context_tag(&mut apdu, 0, 1);
        apdu.push(encoding::VENDOR_ID);
        tag::encode_context_tag(&mut apdu, 1, 2);
        apdu.extend_from_slice(&encoding::DISCOVERY_RESPONSE_SERVICE_NUMBER.to_be_bytes());
        let frame = frame::build_frame(BVLC_BROADCAST, crate::frame::NPDU_NO_REPLY, &apdu);
        assert!(is_discovery_response(&frame));
    }

    #[test]
    fn rejects_request_service_number_as_response() {
        let frame = encoding::encode_discovery_frame();
        assert!(!is_discovery_response(&frame));
    }

    #[test]
    fn zero_length_character_string_is_a_decode_error_not_a_panic() {
        let object_id = ObjectIdentifier::new(ObjectType::Device, 2);
        let mut body = Vec::new();
        tag::encode_context_tag(&mut body, 0, 4);
        body.extend_from_slice(&object_id.encode().to_be_bytes());
        tag::encode_opening_tag(&mut body, 1);
        tag::encode_context_tag(&mut body, 2, 1);
        body.push(PropertyId::ObjectName.wire_code());
        tag::encode_opening_tag(&mut body, 4);
        tag::encode_application_tag(&mut body, 7, 0);
        tag::encode_closing_tag(&mut body, 4);
        tag::encode_closing_tag(&mut body, 1);

        let frame = wrap_complex_ack(&body);
        let err = decode_read_property_multiple_response(&frame);
        assert!(matches!(err, Err(DecodeError::EmptyCharacterString { .. })));
    }
}

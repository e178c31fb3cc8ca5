//! BVLC and NPDU framing shared by every request, response, and discovery
//! exchange. See ASHRAE 135 Annex J for BVLC, clause 6 for NPDU.

use crate::error::{DecodeError, HexPayload};

/// BACnet/IP well-known UDP port (0xBAC0).
pub const BACNET_IP_PORT: u16 = 47808;

const BVLC_TYPE: u8 = 0x81;
/// BVLC function: Original-Unicast-NPDU.
pub const BVLC_UNICAST: u8 = 0x0a;
/// BVLC function: Original-Broadcast-NPDU.
pub const BVLC_BROADCAST: u8 = 0x0b;

const NPDU_VERSION: u8 = 0x01;
/// NPDU control byte requesting a reply (confirmed requests).
pub const NPDU_EXPECTS_REPLY: u8 = 0x04;
/// NPDU control byte for frames with no network-layer reply (discovery).
pub const NPDU_NO_REPLY: u8 = 0x00;

/// Minimum length of any valid frame: 4-octet BVLC + 2-octet NPDU + 3-octet
/// APDU header (type/flags byte, invoke id or equivalent, service choice).
pub const MIN_FRAME_LEN: usize = 4 + 2 + 3;

/// Build a complete `BVLC | NPDU | APDU` frame. `npdu_control` selects
/// expect-reply (confirmed requests) or no-reply (discovery).
pub fn build_frame(bvlc_function: u8, npdu_control: u8, apdu: &[u8]) -> Vec<u8> {
    let total_len = 4 + 2 + apdu.len();
    let mut frame = Vec::with_capacity(total_len);
    frame.push(BVLC_TYPE);
    frame.push(bvlc_function);
    frame.extend_from_slice(&(total_len as u16).to_be_bytes());
    frame.push(NPDU_VERSION);
    frame.push(npdu_control);
    frame.extend_from_slice(apdu);
    frame
}

/// Validate the BVLC header and NPDU of a response, and return the slice of
/// `data` holding the APDU (i.e. everything after the fixed 2-octet NPDU).
///
/// `expected_function` is the BVLC function the response must carry (unicast
/// for confirmed exchanges, broadcast for discovery probes).
pub fn parse_frame_header(data: &[u8], expected_function: u8) -> Result<&[u8], DecodeError> {
    if data.len() < MIN_FRAME_LEN {
        return Err(DecodeError::FrameTooShort {
            len: data.len(),
            payload: HexPayload(data.to_vec()),
        });
    }

    if data[0] != BVLC_TYPE {
        return Err(DecodeError::BadBvlcType {
            found: data[0],
            payload: HexPayload(data.to_vec()),
        });
    }

    if data[1] != expected_function {
        return Err(DecodeError::BadBvlcFunction {
            found: data[1],
            expected: match expected_function {
                BVLC_UNICAST => &[BVLC_UNICAST],
                BVLC_BROADCAST => &[BVLC_BROADCAST],
                _ => &[],
            },
            payload: HexPayload(data.to_vec()),
        });
    }

    // data[4] is the NPDU version, data[5] the control byte; neither is
    // validated beyond being present, matching the original library which
    // never rejects a frame solely on NPDU contents.
    Ok(&data[6..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_frame_sets_correct_length() {
        let apdu = vec![0x00, 0x04, 0x01, 0x0e];
        let frame = build_frame(BVLC_UNICAST, NPDU_EXPECTS_REPLY, &apdu);
        assert_eq!(frame[0], 0x81);
        assert_eq!(frame[1], 0x0a);
        let len = u16::from_be_bytes([frame[2], frame[3]]);
        assert_eq!(len as usize, frame.len());
        assert_eq!(frame[4], 0x01);
        assert_eq!(frame[5], 0x04);
    }

    #[test]
    fn parse_rejects_short_frame() {
        let data = vec![0x81, 0x0a, 0x00, 0x05, 0x01];
        let err = parse_frame_header(&data, BVLC_UNICAST);
        assert!(matches!(err, Err(DecodeError::FrameTooShort { .. })));
    }

    #[test]
    fn parse_rejects_wrong_bvlc_type() {
        let data = vec![0x82, 0x0a, 0x00, 0x09, 0x01, 0x04, 0x00, 0x00, 0x00];
        let err = parse_frame_header(&data, BVLC_UNICAST);
        assert!(matches!(err, Err(DecodeError::BadBvlcType { found: 0x82, .. })));
    }
}

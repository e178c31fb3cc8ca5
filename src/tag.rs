//! BACnet tag-octet encoding and decoding.
//!
//! A tag octet packs three fields: a 4-bit tag number, a class bit
//! (application vs. context), and a 3-bit length-or-type nibble. A
//! length-or-type of `5` means "extended": the real length follows in the
//! next octet. `6`/`7` mark constructed opening/closing delimiters and carry
//! no primitive payload.

/// Length-or-type nibble value meaning "real length is in the next octet".
pub const EXTENDED_LENGTH: u8 = 5;
/// Length-or-type nibble value marking a constructed opening tag.
pub const OPENING: u8 = 6;
/// Length-or-type nibble value marking a constructed closing tag.
pub const CLOSING: u8 = 7;

const CLASS_CONTEXT: u8 = 1 << 3;

/// Append a context tag with a primitive payload of `length` octets.
///
/// `length` must be `< EXTENDED_LENGTH` (this codec never needs extended
/// lengths for the frames it produces).
pub fn encode_context_tag(buffer: &mut Vec<u8>, tag_number: u8, length: u8) {
    debug_assert!(length < EXTENDED_LENGTH);
    buffer.push((tag_number << 4) | CLASS_CONTEXT | length);
}

/// Append a context opening tag (constructed value start).
pub fn encode_opening_tag(buffer: &mut Vec<u8>, tag_number: u8) {
    buffer.push((tag_number << 4) | CLASS_CONTEXT | OPENING);
}

/// Append a context closing tag (constructed value end).
pub fn encode_closing_tag(buffer: &mut Vec<u8>, tag_number: u8) {
    buffer.push((tag_number << 4) | CLASS_CONTEXT | CLOSING);
}

/// Append an application tag with a primitive payload of `length` octets.
pub fn encode_application_tag(buffer: &mut Vec<u8>, tag_number: u8, length: u8) {
    debug_assert!(length < EXTENDED_LENGTH);
    buffer.push((tag_number << 4) | length);
}

/// A decoded tag header: the tag number, whether it is a context tag, and its
/// length-or-type nibble (already resolved past any extended-length octet).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedTag {
    pub number: u8,
    pub is_context: bool,
    pub len_or_type: u8,
}

impl DecodedTag {
    pub fn is_opening(&self) -> bool {
        self.len_or_type == OPENING
    }

    pub fn is_closing(&self) -> bool {
        self.len_or_type == CLOSING
    }
}

/// Decode one tag octet (plus an extended-length octet if present) starting
/// at `data[0]`. Returns the decoded tag and the number of octets consumed.
pub fn decode_tag(data: &[u8]) -> Option<(DecodedTag, usize)> {
    let first = *data.first()?;
    let number = first >> 4;
    let is_context = (first & CLASS_CONTEXT) != 0;
    let raw_len = first & 0x07;

    if raw_len == EXTENDED_LENGTH {
        let extended = *data.get(1)?;
        Some((
            DecodedTag {
                number,
                is_context,
                len_or_type: extended,
            },
            2,
        ))
    } else {
        Some((
            DecodedTag {
                number,
                is_context,
                len_or_type: raw_len,
            },
            1,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_tag_roundtrip() {
        let mut buf = Vec::new();
        encode_context_tag(&mut buf, 0, 4);
        assert_eq!(buf, vec![0x0c]);
        let (tag, consumed) = decode_tag(&buf).unwrap();
        assert_eq!(consumed, 1);
        assert!(tag.is_context);
        assert_eq!(tag.number, 0);
        assert_eq!(tag.len_or_type, 4);
    }

    #[test]
    fn opening_closing_roundtrip() {
        let mut buf = Vec::new();
        encode_opening_tag(&mut buf, 1);
        encode_closing_tag(&mut buf, 1);
        assert_eq!(buf, vec![0x1e, 0x1f]);

        let (open, _) = decode_tag(&buf[0..1]).unwrap();
        assert!(open.is_opening());
        let (close, _) = decode_tag(&buf[1..2]).unwrap();
        assert!(close.is_closing());
    }

    #[test]
    fn application_tag_roundtrip() {
        let mut buf = Vec::new();
        encode_application_tag(&mut buf, 4, 4);
        assert_eq!(buf, vec![0x44]);
        let (tag, _) = decode_tag(&buf).unwrap();
        assert!(!tag.is_context);
        assert_eq!(tag.number, 4);
        assert_eq!(tag.len_or_type, 4);
    }
}

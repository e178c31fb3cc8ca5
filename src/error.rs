//! Error types returned by the codec, transport, and façade layers.

use std::fmt;

/// Failures that originate from the UDP transport: socket setup, send/receive,
/// or the fixed 1 second confirmed-exchange timeout.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to bind UDP socket: {0}")]
    Bind(#[source] std::io::Error),

    #[error("failed to send datagram: {0}")]
    Send(#[source] std::io::Error),

    #[error("failed to receive datagram: {0}")]
    Receive(#[source] std::io::Error),

    #[error("no response received within {0:?}")]
    Timeout(std::time::Duration),
}

/// A thin wrapper around a raw frame, rendered as hex for diagnostics.
pub struct HexPayload(pub Vec<u8>);

impl fmt::Debug for HexPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

impl fmt::Display for HexPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

/// Any violation of the expected wire shape of a frame.
///
/// Every variant carries the full payload (as hex) it failed to decode so a
/// caller can attach it to a bug report without re-instrumenting the socket.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("frame too short to contain a BVLC+NPDU+APDU header ({len} bytes): {payload}")]
    FrameTooShort { len: usize, payload: HexPayload },

    #[error("unexpected BVLC type 0x{found:02x} (expected 0x81): {payload}")]
    BadBvlcType { found: u8, payload: HexPayload },

    #[error("unexpected BVLC function 0x{found:02x} (expected {expected:?}): {payload}")]
    BadBvlcFunction {
        found: u8,
        expected: &'static [u8],
        payload: HexPayload,
    },

    #[error("unexpected APDU type {found} (expected {expected}): {payload}")]
    BadApduType {
        found: u8,
        expected: u8,
        payload: HexPayload,
    },

    #[error("unexpected invoke id {found} (expected {expected}): {payload}")]
    BadInvokeId {
        found: u8,
        expected: u8,
        payload: HexPayload,
    },

    #[error("unexpected service choice {found} (expected {expected}): {payload}")]
    BadServiceChoice {
        found: u8,
        expected: u8,
        payload: HexPayload,
    },

    #[error("unexpected tag: number={number} class={class} len_or_type={len_or_type}: {payload}")]
    UnexpectedTag {
        number: u8,
        class: u8,
        len_or_type: u8,
        payload: HexPayload,
    },

    #[error("mismatched closing tag: expected to close tag {expected}, found {found}: {payload}")]
    MismatchedClosingTag {
        expected: u8,
        found: u8,
        payload: HexPayload,
    },

    #[error("unexpected end of data while decoding: {payload}")]
    UnexpectedEof { payload: HexPayload },

    #[error("unsupported application tag {tag_number} in property value: {payload}")]
    UnsupportedApplicationTag { tag_number: u8, payload: HexPayload },

    #[error("unsupported real width {len} (expected 4): {payload}")]
    UnsupportedRealWidth { len: usize, payload: HexPayload },

    #[error("unsupported enumerated width {len} (expected 1): {payload}")]
    UnsupportedEnumeratedWidth { len: usize, payload: HexPayload },

    #[error("unsupported character string encoding {encoding} (only ISO-10646 UTF-8 / 0 is supported): {payload}")]
    UnsupportedStringEncoding { encoding: u8, payload: HexPayload },

    #[error("character string value has no encoding octet (length 0): {payload}")]
    EmptyCharacterString { payload: HexPayload },

    #[error("invalid UTF-8 in character string: {source}")]
    InvalidUtf8 {
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("unknown object type code {code}: {payload}")]
    UnknownObjectType { code: u16, payload: HexPayload },

    #[error("unknown property identifier {code}: {payload}")]
    UnknownPropertyId { code: u8, payload: HexPayload },
}

/// Caller-side misuse detected at the façade layer. The core never performs
/// range validation; only the façade, which knows the valid ranges for each
/// named concept, does.
#[derive(Debug, thiserror::Error)]
pub enum InvalidArgument {
    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },
}

/// Unified error type for the device façade, combining the three error kinds
/// a caller of [`crate::device::FlexitBacnet`] can observe.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgument),

    #[error("must call update() before reading this value")]
    StateNotLoaded,

    #[error("property {property:?} was not present in the last read device state")]
    PropertyMissing { property: crate::object::PropertyId },

    #[error("property {property:?} held {found:?}, expected a value convertible to {expected}")]
    UnexpectedValueType {
        property: crate::object::PropertyId,
        expected: &'static str,
        found: crate::value::PropertyValue,
    },
}

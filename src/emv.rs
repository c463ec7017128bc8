//! EMV QR tag-length-value encoding as profiled by the PIX arrangement.
//!
//! A field is `tag (2 digits) + length (2 decimal digits) + value`, where the
//! length is the UTF-8 byte length of the value. Fields are concatenated in
//! caller order into a composite payload.

use crate::error::{BrCodeError, Result};
use log::{debug, warn};
use std::ops::RangeInclusive;

/// Largest value length representable by the 2-digit length prefix.
pub const MAX_VALUE_LEN: usize = 99;

/// Plausible total length of a composed BR Code.
pub const PLAUSIBLE_PAYLOAD_LEN: RangeInclusive<usize> = 100..=512;

pub const TAG_PAYLOAD_FORMAT_INDICATOR: &str = "00";
pub const TAG_POINT_OF_INITIATION: &str = "01";
pub const TAG_MERCHANT_ACCOUNT_INFO: &str = "26";
pub const TAG_MERCHANT_CATEGORY_CODE: &str = "52";
pub const TAG_TRANSACTION_CURRENCY: &str = "53";
pub const TAG_TRANSACTION_AMOUNT: &str = "54";
pub const TAG_COUNTRY_CODE: &str = "58";
pub const TAG_CRC: &str = "63";

/// Sub-tags inside the Merchant Account Information field.
pub const SUBTAG_GUI: &str = "00";
pub const SUBTAG_PIX_KEY: &str = "01";

/// Globally unique identifier of the PIX arrangement.
pub const PIX_GUI: &str = "br.gov.bcb.pix";

/// Payload Format Indicator value.
pub const PAYLOAD_FORMAT_VERSION: &str = "01";

/// Point of Initiation Method value for static codes.
pub const STATIC_INITIATION: &str = "11";

/// Top-level tags every PIX static code must carry.
pub const REQUIRED_TAGS: [&str; 7] = [
    TAG_PAYLOAD_FORMAT_INDICATOR,
    TAG_MERCHANT_ACCOUNT_INFO,
    TAG_MERCHANT_CATEGORY_CODE,
    TAG_TRANSACTION_CURRENCY,
    TAG_TRANSACTION_AMOUNT,
    TAG_COUNTRY_CODE,
    TAG_CRC,
];

/// Encodes a single field as `tag + length + value`.
///
/// # Examples
///
/// ```
/// use pix_brcode::encode_field;
///
/// assert_eq!(encode_field("00", "01").unwrap(), "000201");
/// ```
pub fn encode_field(tag: &str, value: &str) -> Result<String> {
    validate_tag(tag)?;

    let length = value.len();
    if length > MAX_VALUE_LEN {
        return Err(BrCodeError::FieldTooLong {
            tag: tag.to_string(),
            length,
        });
    }

    Ok(format!("{}{:02}{}", tag, length, value))
}

/// Concatenates encoded fields in the order supplied.
pub fn compose_payload<S: AsRef<str>>(fields: &[S]) -> String {
    let mut payload = String::new();
    for field in fields {
        payload.push_str(field.as_ref());
    }
    payload
}

fn validate_tag(tag: &str) -> Result<()> {
    if tag.len() == 2 && tag.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(BrCodeError::InvalidTag {
            tag: tag.to_string(),
        })
    }
}

/// Outcome of the payload length hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadLength {
    WithinRange(usize),
    TooShort(usize),
    TooLong(usize),
}

impl PayloadLength {
    /// Returns `true` unless the length fell outside the plausible window.
    pub fn is_within_range(&self) -> bool {
        matches!(self, PayloadLength::WithinRange(_))
    }
}

/// Classifies the payload length against [`PLAUSIBLE_PAYLOAD_LEN`].
///
/// Out-of-range lengths are logged at warn level and reported, never
/// rejected: the minimal static profile can legitimately fall below the
/// window.
pub fn check_payload_length(payload: &str) -> PayloadLength {
    let len = payload.len();
    let check = if len < *PLAUSIBLE_PAYLOAD_LEN.start() {
        PayloadLength::TooShort(len)
    } else if len > *PLAUSIBLE_PAYLOAD_LEN.end() {
        PayloadLength::TooLong(len)
    } else {
        PayloadLength::WithinRange(len)
    };

    if !check.is_within_range() {
        warn!(
            "BR Code length {} is outside the expected range {}..={}",
            len,
            PLAUSIBLE_PAYLOAD_LEN.start(),
            PLAUSIBLE_PAYLOAD_LEN.end()
        );
    }

    check
}

/// A field read back from a composed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlvField {
    pub tag: String,
    pub value: String,
}

impl TlvField {
    /// Decodes this field's value as a nested TLV composite.
    pub fn nested(&self) -> Result<Vec<TlvField>> {
        decode_fields(&self.value)
    }
}

/// Walks `payload` as consecutive TLV fields.
pub fn decode_fields(payload: &str) -> Result<Vec<TlvField>> {
    let bytes = payload.as_bytes();
    let mut fields = Vec::new();
    let mut offset = 0;

    while offset < bytes.len() {
        if offset + 4 > bytes.len() {
            return Err(malformed(offset, "truncated field header"));
        }

        let header = &bytes[offset..offset + 4];
        if !header.iter().all(u8::is_ascii_digit) {
            return Err(malformed(offset, "tag and length must be decimal digits"));
        }

        let length = usize::from(header[2] - b'0') * 10 + usize::from(header[3] - b'0');
        let start = offset + 4;
        let end = start + length;
        if end > bytes.len() {
            return Err(malformed(
                offset,
                &format!("value of {} bytes runs past end of input", length),
            ));
        }

        let value = payload
            .get(start..end)
            .ok_or_else(|| malformed(start, "value splits a UTF-8 character"))?;

        fields.push(TlvField {
            tag: payload[offset..offset + 2].to_string(),
            value: value.to_string(),
        });
        offset = end;
    }

    debug!("Decoded {} fields", fields.len());
    Ok(fields)
}

fn malformed(offset: usize, message: &str) -> BrCodeError {
    BrCodeError::MalformedPayload {
        offset,
        message: message.to_string(),
    }
}

/// Returns the required top-level tags absent from `fields`.
pub fn missing_required_tags(fields: &[TlvField]) -> Vec<&'static str> {
    REQUIRED_TAGS
        .iter()
        .copied()
        .filter(|tag| !fields.iter().any(|f| f.tag == *tag))
        .collect()
}

//! CRC-16/CCITT-FALSE checksum used by the BR Code CRC field (tag `63`).
//!
//! Parameters: polynomial `0x1021`, initial value `0xFFFF`, MSB-first,
//! no input/output reflection, no final XOR.
//!
//! The checksummed region covers every byte of the payload up to and
//! including the CRC field's own tag and length (`"6304"`). Only the four
//! checksum characters are excluded.

use crate::error::{BrCodeError, Result};
use log::debug;

/// Generator polynomial.
pub const POLYNOMIAL: u16 = 0x1021;

/// Accumulator value before the first byte.
pub const INITIAL: u16 = 0xFFFF;

/// Tag and length of the CRC field. The value is always 4 hex digits.
pub const CRC_FIELD_HEADER: &str = "6304";

/// Number of characters in the checksum value.
pub const CRC_HEX_LEN: usize = 4;

/// CRC-16/IBM-3740 is the catalogue name of CCITT-FALSE.
const PIX_CRC: ::crc::Crc<u16> = ::crc::Crc::<u16>::new(&::crc::CRC_16_IBM_3740);

/// Computes the raw CRC-16/CCITT-FALSE value of `data`.
pub fn crc16(data: &[u8]) -> u16 {
    PIX_CRC.checksum(data)
}

/// Computes the checksum of `data` as 4 upper-case hex digits.
///
/// # Examples
///
/// ```
/// use pix_brcode::compute_crc16;
///
/// assert_eq!(compute_crc16(b"123456789"), "29B1");
/// ```
pub fn compute_crc16(data: &[u8]) -> String {
    format!("{:04X}", crc16(data))
}

/// Appends the checksum to a payload that ends with the CRC field header.
///
/// The checksum is computed over the whole input, `"6304"` included.
pub fn finalize_payload(payload_without_crc_value: &str) -> Result<String> {
    if !payload_without_crc_value.ends_with(CRC_FIELD_HEADER) {
        return Err(BrCodeError::MissingCrcHeader);
    }

    let checksum = compute_crc16(payload_without_crc_value.as_bytes());
    debug!("Finalized payload with CRC {}", checksum);

    let mut payload = String::with_capacity(payload_without_crc_value.len() + CRC_HEX_LEN);
    payload.push_str(payload_without_crc_value);
    payload.push_str(&checksum);
    Ok(payload)
}

/// Returns `true` if the trailing 4 characters of `full_payload` match the
/// checksum of everything before them (case-insensitive).
///
/// Inputs too short to carry a checksum, or whose trailing bytes are not
/// ASCII, are reported as `false`.
pub fn verify_payload(full_payload: &str) -> bool {
    let bytes = full_payload.as_bytes();
    if bytes.len() < CRC_HEX_LEN {
        return false;
    }

    let (body, claimed) = bytes.split_at(bytes.len() - CRC_HEX_LEN);
    if !claimed.is_ascii() {
        return false;
    }

    let expected = compute_crc16(body);
    expected.as_bytes().eq_ignore_ascii_case(claimed)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Bit-by-bit MSB-first reference of the same parameters.
    fn bitwise_crc16(data: &[u8]) -> u16 {
        let mut crc = INITIAL;
        for &byte in data {
            crc ^= u16::from(byte) << 8;
            for _ in 0..8 {
                if crc & 0x8000 != 0 {
                    crc = (crc << 1) ^ POLYNOMIAL;
                } else {
                    crc <<= 1;
                }
            }
        }
        crc
    }

    #[test]
    fn test_matches_bitwise_reference() {
        let inputs: [&[u8]; 6] = [
            b"",
            b"123456789",
            b"6304",
            b"00020101021126330014br.gov.bcb.pix011119921785770520400005303986540510.005802BR6304",
            "São Paulo".as_bytes(),
            &[0x00, 0x80, 0xFF],
        ];
        for input in inputs {
            assert_eq!(crc16(input), bitwise_crc16(input));
        }
    }

    #[test]
    fn test_check_value() {
        assert_eq!(crc16(b"123456789"), 0x29B1);
        assert_eq!(compute_crc16(b"123456789"), "29B1");
    }

    #[test]
    fn test_empty_input_returns_initial_value() {
        assert_eq!(compute_crc16(b""), "FFFF");
    }

    #[test]
    fn test_output_is_zero_padded() {
        // Find any input whose checksum has a leading zero nibble.
        let padded = (0u16..=u16::MAX)
            .map(|n| n.to_string())
            .find(|s| crc16(s.as_bytes()) < 0x1000)
            .unwrap();

        let hex = compute_crc16(padded.as_bytes());
        assert_eq!(hex.len(), 4);
        assert!(hex.starts_with('0'));
    }

    #[test]
    fn test_deterministic() {
        let data = b"00020101021126330014br.gov.bcb.pix";
        assert_eq!(compute_crc16(data), compute_crc16(data));
    }

    #[test]
    fn test_finalize_includes_crc_header_in_checksum() {
        let body = "0002016304";
        let full = finalize_payload(body).unwrap();

        assert_eq!(full.len(), body.len() + 4);
        assert_eq!(&full[body.len()..], compute_crc16(body.as_bytes()));
        // Excluding the header would give a different checksum.
        assert_ne!(&full[body.len()..], compute_crc16(b"000201"));
    }

    #[test]
    fn test_finalize_rejects_missing_header() {
        assert!(matches!(
            finalize_payload("000201"),
            Err(BrCodeError::MissingCrcHeader)
        ));
    }

    #[test]
    fn test_verify_round_trip() {
        let full = finalize_payload("000201010211520400006304").unwrap();
        assert!(verify_payload(&full));
    }

    #[test]
    fn test_verify_is_case_insensitive() {
        let full = "00020101021126330014br.gov.bcb.pix011119921785770520400005303986540510.005802BR630485B6";
        assert!(verify_payload(full));
        assert!(verify_payload(&full.replace("85B6", "85b6")));
    }

    #[test]
    fn test_verify_rejects_wrong_checksum() {
        let full = finalize_payload("0002016304").unwrap();
        assert_eq!(full, "0002016304AAE6");
        assert!(!verify_payload("0002016304AAE7"));
        assert!(!verify_payload("0002016304"));
    }

    #[test]
    fn test_verify_short_or_non_ascii_input() {
        assert!(!verify_payload(""));
        assert!(!verify_payload("AB"));
        assert!(!verify_payload("6304ção"));
    }
}

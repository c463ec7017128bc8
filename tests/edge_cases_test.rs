//! Edge case tests for BR Code generation and validation through the
//! public library API.

use pix_brcode::{
    check_payload_length, compose_payload, compute_crc16, crc16, decode_fields, encode_field,
    finalize_payload, generate_brcode, missing_required_tags, verify_payload, BrCodeError,
    PayloadLength, PixPaymentDescriptor,
};

const BRCODE: &str = "00020101021126330014br.gov.bcb.pix011119921785770520400005303986540510.005802BR630485B6";

fn generate(key: &str, amount: &str) -> String {
    generate_brcode(&PixPaymentDescriptor::brl(key, amount)).unwrap()
}

// ==================== CRC ====================

#[test]
fn test_crc_check_value() {
    assert_eq!(compute_crc16(b"123456789"), "29B1");
}

#[test]
fn test_crc_matches_reference_implementation() {
    // CRC-16/IBM-3740 is the catalogue name of CCITT-FALSE.
    let reference = crc::Crc::<u16>::new(&crc::CRC_16_IBM_3740);

    let inputs: [&[u8]; 5] = [
        b"",
        b"123456789",
        b"6304",
        BRCODE.as_bytes(),
        "São Paulo".as_bytes(),
    ];
    for input in inputs {
        assert_eq!(crc16(input), reference.checksum(input));
    }
}

#[test]
fn test_crc_is_deterministic() {
    let first = compute_crc16(BRCODE.as_bytes());
    for _ in 0..10 {
        assert_eq!(compute_crc16(BRCODE.as_bytes()), first);
    }
}

// ==================== FIELD ENCODING ====================

#[test]
fn test_encode_field_literal() {
    assert_eq!(encode_field("00", "01").unwrap(), "000201");
}

#[test]
fn test_nested_merchant_account_length() {
    let inner = compose_payload(&[
        encode_field("00", "br.gov.bcb.pix").unwrap(),
        encode_field("01", "19921785770").unwrap(),
    ]);
    assert_eq!(inner.len(), 14 + 4 + 11 + 4);

    let field = encode_field("26", &inner).unwrap();
    assert!(field.starts_with("2633"));
    assert_eq!(field, "26330014br.gov.bcb.pix011119921785770");
}

#[test]
fn test_multibyte_key_length_prefix() {
    // 12 characters, 15 bytes.
    let code = generate("joão@ação.br", "1.00");
    let fields = decode_fields(&code).unwrap();
    let nested = fields[2].nested().unwrap();

    assert_eq!(nested[1].value, "joão@ação.br");
    assert!(code.contains("0115joão@ação.br"));
    assert!(verify_payload(&code));
}

// ==================== END TO END ====================

#[test]
fn test_end_to_end_minimal_code() {
    let code = generate_brcode(&PixPaymentDescriptor {
        merchant_pix_key: "19921785770".to_string(),
        transaction_amount: "10.00".to_string(),
        country_code: "BR".to_string(),
        merchant_category_code: "0000".to_string(),
        currency_code: "986".to_string(),
    })
    .unwrap();

    assert!(code.starts_with("000201"));
    assert!(code.contains("br.gov.bcb.pix"));
    let checksum = &code[code.len() - 4..];
    assert!(checksum.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_lowercase()));
    assert!(code[..code.len() - 4].ends_with("6304"));
    assert!(verify_payload(&code));
    assert_eq!(code, BRCODE);
}

#[test]
fn test_minimal_code_is_flagged_short_but_not_rejected() {
    let code = generate("19921785770", "10.00");
    assert_eq!(check_payload_length(&code), PayloadLength::TooShort(87));
}

#[test]
fn test_longer_key_falls_within_plausible_length() {
    let code = generate("123e4567-e89b-12d3-a456-426614174000", "150.00");
    assert!(check_payload_length(&code).is_within_range());
}

#[test]
fn test_round_trip_various_descriptors() {
    let cases = [
        ("19921785770", "0.01"),
        ("fulano@example.com", "1234.56"),
        ("+5511999999999", "99999999.99"),
        ("123e4567-e89b-12d3-a456-426614174000", "7"),
    ];
    for (key, amount) in cases {
        let code = generate(key, amount);
        assert!(verify_payload(&code), "{} did not verify", code);
        assert!(missing_required_tags(&decode_fields(&code).unwrap()).is_empty());
    }
}

// ==================== TAMPERING ====================

#[test]
fn test_any_single_character_change_is_detected() {
    let replacements = b"0123456789ABCDEFXYZ.@";

    for i in 0..BRCODE.len() {
        for &r in replacements {
            if BRCODE.as_bytes()[i].eq_ignore_ascii_case(&r) {
                continue;
            }
            let mut tampered = BRCODE.as_bytes().to_vec();
            tampered[i] = r;
            let tampered = String::from_utf8(tampered).unwrap();
            assert!(!verify_payload(&tampered), "undetected change at {}", i);
        }
    }
}

#[test]
fn test_truncated_code_fails_verification() {
    assert!(!verify_payload(&BRCODE[..BRCODE.len() - 1]));
    assert!(!verify_payload(&BRCODE[1..]));
}

// ==================== ERRORS ====================

#[test]
fn test_finalize_requires_crc_header() {
    assert!(matches!(
        finalize_payload("000201010211"),
        Err(BrCodeError::MissingCrcHeader)
    ));
}

#[test]
fn test_missing_descriptor_field() {
    let mut descriptor = PixPaymentDescriptor::brl("19921785770", "10.00");
    descriptor.merchant_category_code = String::new();

    assert!(matches!(
        generate_brcode(&descriptor),
        Err(BrCodeError::MissingRequiredField {
            field: "merchant_category_code"
        })
    ));
}

#[test]
fn test_field_too_long_reports_tag() {
    let err = encode_field("62", &"x".repeat(120)).unwrap_err();
    assert_eq!(err.to_string(), "Field 62 value is 120 bytes long, maximum is 99");
}

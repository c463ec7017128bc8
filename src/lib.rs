//! # PIX BR Code
//!
//! Generation and validation of static PIX BR Codes, the Brazilian Central
//! Bank's profile of the EMV QR Code Specification for Payment Systems.
//!
//! ## Design Principles
//!
//! - **Byte-accurate TLV**: length prefixes count UTF-8 bytes, capped at 99
//! - **CRC-16/CCITT-FALSE**: computed over the payload including `"6304"`
//! - **Fixed-point amounts**: 2 decimal places via `rust_decimal`
//! - **Pure core**: encoding and checksum functions hold no state and do no I/O
//!
//! ## Example
//!
//! ```
//! use pix_brcode::{generate_brcode, verify_payload, PixPaymentDescriptor};
//!
//! let descriptor = PixPaymentDescriptor::brl("19921785770", "10.00");
//! let code = generate_brcode(&descriptor).unwrap();
//! assert!(code.ends_with("85B6"));
//! assert!(verify_payload(&code));
//! ```

pub mod amount;
pub mod crc;
pub mod descriptor;
pub mod emv;
pub mod error;
pub mod generator;
pub mod pix_key;

pub use amount::{Amount, AmountError};
pub use self::crc::{compute_crc16, crc16, finalize_payload, verify_payload};
pub use descriptor::{DescriptorRecord, PixPaymentDescriptor, ValidatedDescriptor};
pub use emv::{
    check_payload_length, compose_payload, decode_fields, encode_field, missing_required_tags,
    PayloadLength, TlvField,
};
pub use error::{BrCodeError, Result};
pub use generator::{build_brcode, generate_brcode, BrCodeBatch, GeneratedCode};
pub use pix_key::{detect_pix_type, validate_key, PixKeyType};

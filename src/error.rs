//! Error types for BR Code encoding and validation.

use thiserror::Error;

/// Result type alias for BR Code operations
pub type Result<T> = std::result::Result<T, BrCodeError>;

/// Errors that can occur while building, decoding or batch-processing BR Codes.
///
/// A checksum mismatch is not an error: [`crate::crc::verify_payload`]
/// reports it as `false`.
#[derive(Error, Debug)]
pub enum BrCodeError {
    /// A field value does not fit in the 2-digit length prefix
    #[error("Field {tag} value is {length} bytes long, maximum is 99")]
    FieldTooLong { tag: String, length: usize },

    /// A mandatory descriptor attribute is absent or blank
    #[error("Missing required field: {field}")]
    MissingRequiredField { field: &'static str },

    /// A descriptor attribute is present but malformed
    #[error("Invalid {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },

    /// A tag that is not exactly two ASCII digits
    #[error("Invalid tag {tag:?}: expected two ASCII digits")]
    InvalidTag { tag: String },

    /// Finalization input does not end with the CRC field header
    #[error("Payload must end with the CRC field header \"6304\"")]
    MissingCrcHeader,

    /// A payload that cannot be walked as consecutive TLV fields
    #[error("Malformed payload at byte {offset}: {message}")]
    MalformedPayload { offset: usize, message: String },

    /// Failed to open or read the input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Missing or unknown command line arguments
    #[error("{0}")]
    Usage(String),
}

//! Static BR Code generation, single and batch.
//!
//! The batch generator streams descriptor rows from CSV and keeps one
//! generated code per valid row. Invalid rows are logged and skipped.

use crate::amount::Amount;
use crate::crc::{finalize_payload, CRC_FIELD_HEADER};
use crate::descriptor::{DescriptorRecord, PixPaymentDescriptor, ValidatedDescriptor};
use crate::emv::{
    check_payload_length, compose_payload, encode_field, PAYLOAD_FORMAT_VERSION, PIX_GUI,
    STATIC_INITIATION, SUBTAG_GUI, SUBTAG_PIX_KEY, TAG_COUNTRY_CODE, TAG_MERCHANT_ACCOUNT_INFO,
    TAG_MERCHANT_CATEGORY_CODE, TAG_PAYLOAD_FORMAT_INDICATOR, TAG_POINT_OF_INITIATION,
    TAG_TRANSACTION_AMOUNT, TAG_TRANSACTION_CURRENCY,
};
use crate::error::Result;
use csv::{ReaderBuilder, Trim, WriterBuilder};
use log::{debug, warn};
use serde::Serialize;
use std::io::{Read, Write};

/// Generates a static BR Code for `descriptor`.
///
/// # Examples
///
/// ```
/// use pix_brcode::{generate_brcode, verify_payload, PixPaymentDescriptor};
///
/// let code = generate_brcode(&PixPaymentDescriptor::brl("19921785770", "10.00")).unwrap();
/// assert!(code.starts_with("000201"));
/// assert!(verify_payload(&code));
/// ```
pub fn generate_brcode(descriptor: &PixPaymentDescriptor) -> Result<String> {
    let valid = descriptor.validate()?;
    build_brcode(&valid)
}

/// Composes the required fields of a validated descriptor and appends the CRC.
pub fn build_brcode(valid: &ValidatedDescriptor) -> Result<String> {
    let merchant_account = compose_payload(&[
        encode_field(SUBTAG_GUI, PIX_GUI)?,
        encode_field(SUBTAG_PIX_KEY, &valid.pix_key)?,
    ]);

    let fields = [
        encode_field(TAG_PAYLOAD_FORMAT_INDICATOR, PAYLOAD_FORMAT_VERSION)?,
        encode_field(TAG_POINT_OF_INITIATION, STATIC_INITIATION)?,
        encode_field(TAG_MERCHANT_ACCOUNT_INFO, &merchant_account)?,
        encode_field(TAG_MERCHANT_CATEGORY_CODE, &valid.merchant_category_code)?,
        encode_field(TAG_TRANSACTION_CURRENCY, &valid.currency_code)?,
        encode_field(TAG_TRANSACTION_AMOUNT, &valid.amount.to_string())?,
        encode_field(TAG_COUNTRY_CODE, &valid.country_code)?,
    ];
    debug!("Composed BR Code fields: {:?}", fields);

    let mut payload = compose_payload(&fields);
    payload.push_str(CRC_FIELD_HEADER);

    let code = finalize_payload(&payload)?;
    check_payload_length(&code);
    Ok(code)
}

/// A BR Code generated from one input row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedCode {
    /// 1-indexed CSV row, header included
    pub row: usize,
    pub pix_key: String,
    pub amount: Amount,
    pub brcode: String,
}

/// Batch generator over CSV descriptor rows.
///
/// Codes are kept in input order.
pub struct BrCodeBatch {
    codes: Vec<GeneratedCode>,
    skipped: usize,
}

impl BrCodeBatch {
    /// Creates an empty batch.
    pub fn new() -> Self {
        BrCodeBatch {
            codes: Vec::new(),
            skipped: 0,
        }
    }

    /// Generates codes for every row of a CSV reader in streaming fashion.
    ///
    /// Rows that fail to parse or validate are logged at warn level and
    /// skipped.
    pub fn process_csv<R: Read>(&mut self, reader: R) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        for (row_idx, result) in csv_reader.deserialize::<DescriptorRecord>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row

            match result {
                Ok(record) => {
                    let descriptor = record.into_descriptor();
                    if let Err(e) = self.process_descriptor(&descriptor, row_num) {
                        warn!("Row {}: {}", row_num, e);
                        self.skipped += 1;
                    }
                }
                Err(e) => {
                    warn!("Row {}: CSV parse error: {}", row_num, e);
                    self.skipped += 1;
                }
            }
        }

        Ok(())
    }

    fn process_descriptor(&mut self, descriptor: &PixPaymentDescriptor, row: usize) -> Result<()> {
        let valid = descriptor.validate()?;
        let brcode = build_brcode(&valid)?;
        debug!("Row {}: Generated {} for key {}", row, brcode, valid.pix_key);

        self.codes.push(GeneratedCode {
            row,
            pix_key: valid.pix_key,
            amount: valid.amount,
            brcode,
        });
        Ok(())
    }

    /// Generated codes in input order.
    pub fn codes(&self) -> &[GeneratedCode] {
        &self.codes
    }

    /// Number of rows that were skipped.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Writes generated codes to CSV.
    ///
    /// The header is written even when no row produced a code.
    pub fn write_output<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = WriterBuilder::new().has_headers(false).from_writer(writer);

        csv_writer.write_record(["row", "pix_key", "amount", "brcode"])?;

        for code in &self.codes {
            csv_writer.serialize(code)?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

impl Default for BrCodeBatch {
    fn default() -> Self {
        Self::new()
    }
}

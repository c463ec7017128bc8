//! PIX payment descriptors: the input to BR Code generation.

use crate::amount::Amount;
use crate::error::{BrCodeError, Result};
use serde::Deserialize;
use std::str::FromStr;

/// ISO 3166-1 alpha-2 code for Brazil.
pub const DEFAULT_COUNTRY_CODE: &str = "BR";

/// Merchant category code used when none applies.
pub const DEFAULT_MERCHANT_CATEGORY_CODE: &str = "0000";

/// ISO 4217 numeric code for BRL.
pub const BRL_CURRENCY_CODE: &str = "986";

/// Everything needed to build a static PIX BR Code.
///
/// All fields are required. A blank field counts as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixPaymentDescriptor {
    /// E-mail, phone, CPF/CNPJ or random key of the receiver
    pub merchant_pix_key: String,

    /// Decimal amount with at most 2 fraction digits
    pub transaction_amount: String,

    /// 2-letter ISO country code
    pub country_code: String,

    /// 4-digit merchant category code
    pub merchant_category_code: String,

    /// 3-digit ISO 4217 numeric currency code
    pub currency_code: String,
}

impl PixPaymentDescriptor {
    /// Builds a descriptor for a BRL payment received in Brazil.
    pub fn brl(merchant_pix_key: impl Into<String>, transaction_amount: impl Into<String>) -> Self {
        PixPaymentDescriptor {
            merchant_pix_key: merchant_pix_key.into(),
            transaction_amount: transaction_amount.into(),
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
            merchant_category_code: DEFAULT_MERCHANT_CATEGORY_CODE.to_string(),
            currency_code: BRL_CURRENCY_CODE.to_string(),
        }
    }

    /// Checks every field and returns the normalized values.
    ///
    /// Missing fields are reported before malformed ones, in declaration
    /// order.
    pub fn validate(&self) -> Result<ValidatedDescriptor> {
        let pix_key = required("merchant_pix_key", &self.merchant_pix_key)?;
        let amount = required("transaction_amount", &self.transaction_amount)?;
        let country = required("country_code", &self.country_code)?;
        let category = required("merchant_category_code", &self.merchant_category_code)?;
        let currency = required("currency_code", &self.currency_code)?;

        let amount = Amount::from_str(amount).map_err(|e| invalid("transaction_amount", e))?;

        if country.len() != 2 || !country.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(invalid("country_code", "expected 2 ASCII letters"));
        }
        check_digits("merchant_category_code", category, 4)?;
        check_digits("currency_code", currency, 3)?;

        Ok(ValidatedDescriptor {
            pix_key: pix_key.to_string(),
            amount,
            country_code: country.to_ascii_uppercase(),
            merchant_category_code: category.to_string(),
            currency_code: currency.to_string(),
        })
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(BrCodeError::MissingRequiredField { field })
    } else {
        Ok(trimmed)
    }
}

fn invalid(field: &'static str, message: impl ToString) -> BrCodeError {
    BrCodeError::InvalidField {
        field,
        message: message.to_string(),
    }
}

fn check_digits(field: &'static str, value: &str, len: usize) -> Result<()> {
    if value.len() == len && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(invalid(field, format!("expected {} digits, got {:?}", len, value)))
    }
}

/// A descriptor whose fields passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedDescriptor {
    pub pix_key: String,
    pub amount: Amount,
    pub country_code: String,
    pub merchant_category_code: String,
    pub currency_code: String,
}

/// Raw descriptor row as read from CSV.
///
/// Only `pix_key` and `amount` are expected in every row; the remaining
/// columns fall back to the BRL defaults when absent or empty.
#[derive(Debug, Deserialize)]
pub struct DescriptorRecord {
    pub pix_key: Option<String>,

    pub amount: Option<String>,

    #[serde(default)]
    pub country: Option<String>,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub currency: Option<String>,
}

impl DescriptorRecord {
    /// Converts the row into a descriptor, filling in defaults.
    pub fn into_descriptor(self) -> PixPaymentDescriptor {
        PixPaymentDescriptor {
            merchant_pix_key: self.pix_key.unwrap_or_default(),
            transaction_amount: self.amount.unwrap_or_default(),
            country_code: or_default(self.country, DEFAULT_COUNTRY_CODE),
            merchant_category_code: or_default(self.category, DEFAULT_MERCHANT_CATEGORY_CODE),
            currency_code: or_default(self.currency, BRL_CURRENCY_CODE),
        }
    }
}

fn or_default(value: Option<String>, default: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => default.to_string(),
    }
}

//! Classification of user-supplied PIX input.
//!
//! A payer may paste either a PIX key (e-mail, CPF, CNPJ, phone, random key)
//! or a full "Copia e Cola" BR Code. Detection only looks at the shape of the
//! input; [`validate_key`] applies the per-type acceptance rules.

use std::fmt;

/// Kind of PIX input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixKeyType {
    Email,
    Cpf,
    Cnpj,
    Phone,
    /// Random key (UUID), a.k.a. EVP
    Evp,
    /// A full BR Code pasted as text
    BrCode,
    Unknown,
}

impl PixKeyType {
    /// Returns `true` for a pasted BR Code rather than a key.
    pub fn is_copia_e_cola(&self) -> bool {
        matches!(self, PixKeyType::BrCode)
    }

    /// Human readable label.
    pub fn display_title(&self) -> &'static str {
        match self {
            PixKeyType::Email => "PIX key (e-mail)",
            PixKeyType::Cpf => "PIX key (CPF)",
            PixKeyType::Cnpj => "PIX key (CNPJ)",
            PixKeyType::Phone => "PIX key (phone)",
            PixKeyType::Evp => "PIX key (random)",
            PixKeyType::BrCode => "PIX Copia e Cola",
            PixKeyType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for PixKeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PixKeyType::Email => "EMAIL",
            PixKeyType::Cpf => "CPF",
            PixKeyType::Cnpj => "CNPJ",
            PixKeyType::Phone => "PHONE",
            PixKeyType::Evp => "EVP",
            PixKeyType::BrCode => "BRCODE",
            PixKeyType::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// Shortest input still treated as a BR Code by its `000201` prefix.
const MIN_BRCODE_LEN: usize = 51;

/// Detects what kind of PIX input `input` is.
///
/// Whitespace is ignored. Text that matches no key shape is assumed to be a
/// BR Code.
pub fn detect_pix_type(input: &str) -> PixKeyType {
    let clean: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if clean.is_empty() {
        return PixKeyType::Unknown;
    }

    if clean.starts_with("000201") && clean.len() >= MIN_BRCODE_LEN {
        PixKeyType::BrCode
    } else if is_email(&clean) {
        PixKeyType::Email
    } else if is_cpf_shape(&clean) {
        PixKeyType::Cpf
    } else if is_cnpj_shape(&clean) {
        PixKeyType::Cnpj
    } else if is_phone_shape(&clean) {
        PixKeyType::Phone
    } else if is_uuid(&clean) {
        PixKeyType::Evp
    } else {
        PixKeyType::BrCode
    }
}

/// Checks `key` against the acceptance rules of `key_type`.
pub fn validate_key(key: &str, key_type: PixKeyType) -> bool {
    let key = key.trim();
    match key_type {
        PixKeyType::Email => is_email(key),
        PixKeyType::Cpf => {
            let digits = digits_only(key);
            digits.len() == 11 && !all_same(&digits)
        }
        PixKeyType::Cnpj => {
            let digits = digits_only(key);
            digits.len() == 14 && !all_same(&digits)
        }
        PixKeyType::Phone => (10..=11).contains(&digits_only(key).len()),
        PixKeyType::Evp => is_uuid(key),
        PixKeyType::BrCode => crate::crc::verify_payload(key),
        PixKeyType::Unknown => false,
    }
}

fn digits_only(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

fn all_same(digits: &str) -> bool {
    let mut chars = digits.chars();
    match chars.next() {
        Some(first) => chars.all(|c| c == first),
        None => true,
    }
}

fn is_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || s.chars().any(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Matches `s` against a pattern of `d` (digit) and optional punctuation
/// characters. Every non-`d` pattern character may be present or absent
/// independently, so `(dd)` also accepts a single parenthesis.
fn matches_digit_pattern(s: &str, pattern: &str) -> bool {
    let input = s.as_bytes();
    let mut i = 0;
    for p in pattern.bytes() {
        if p == b'd' {
            match input.get(i) {
                Some(b) if b.is_ascii_digit() => i += 1,
                _ => return false,
            }
        } else if input.get(i) == Some(&p) {
            i += 1;
        }
    }
    i == input.len()
}

fn is_cpf_shape(s: &str) -> bool {
    matches_digit_pattern(s, "ddd.ddd.ddd-dd")
}

fn is_cnpj_shape(s: &str) -> bool {
    matches_digit_pattern(s, "dd.ddd.ddd/dddd-dd")
}

fn is_phone_shape(s: &str) -> bool {
    let rest = s.strip_prefix("+55").or_else(|| s.strip_prefix("55")).unwrap_or(s);
    let candidates = [rest, s];
    candidates.iter().any(|candidate| {
        ["(dd)", ""].iter().any(|area| {
            ["dddd-dddd", "ddddd-dddd"]
                .iter()
                .any(|number| matches_digit_pattern(candidate, &format!("{}{}", area, number)))
        })
    })
}

fn is_uuid(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 36
        && bytes.iter().enumerate().all(|(i, b)| match i {
            8 | 13 | 18 | 23 => *b == b'-',
            _ => b.is_ascii_hexdigit(),
        })
}

//! PIX BR Code CLI
//!
//! Generates static BR Codes in batch from CSV and checks, inspects or
//! classifies codes and keys given on the command line.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- generate descriptors.csv > codes.csv
//! cargo run -- verify '000201...6304ABCD'
//! cargo run -- inspect '000201...6304ABCD'
//! cargo run -- detect 'fulano@example.com'
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use pix_brcode::emv::TAG_MERCHANT_ACCOUNT_INFO;
use pix_brcode::{
    decode_fields, detect_pix_type, missing_required_tags, validate_key, verify_payload,
    BrCodeBatch, BrCodeError, Result,
};
use std::env;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::process;

const USAGE: &str = "Usage: pix-brcode <generate <input.csv> | verify <code> | inspect <code> | detect <text>>";

/// Exit status when `verify` finds a checksum mismatch.
const EXIT_INVALID: i32 = 2;

fn main() {
    env_logger::init();

    match run() {
        Ok(true) => {}
        Ok(false) => process::exit(EXIT_INVALID),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// Runs the selected command. `Ok(false)` means the input was well formed
/// but failed verification.
fn run() -> Result<bool> {
    let args: Vec<String> = env::args().collect();
    let (command, operand) = match (args.get(1), args.get(2)) {
        (Some(command), Some(operand)) => (command.as_str(), operand.as_str()),
        _ => return Err(BrCodeError::Usage(USAGE.to_string())),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        "generate" => {
            let file = File::open(operand)?;
            let mut batch = BrCodeBatch::new();
            batch.process_csv(BufReader::new(file))?;
            batch.write_output(out)?;
            Ok(true)
        }
        "verify" => {
            let valid = verify_payload(operand.trim());
            writeln!(out, "{}", if valid { "valid" } else { "invalid" })?;
            Ok(valid)
        }
        "inspect" => inspect(operand.trim(), &mut out),
        "detect" => {
            let key_type = detect_pix_type(operand);
            let valid = validate_key(operand, key_type);
            writeln!(
                out,
                "{} ({}) {}",
                key_type,
                key_type.display_title(),
                if valid { "valid" } else { "invalid" }
            )?;
            Ok(true)
        }
        other => Err(BrCodeError::Usage(format!(
            "Unknown command {:?}. {}",
            other, USAGE
        ))),
    }
}

fn inspect<W: Write>(code: &str, out: &mut W) -> Result<bool> {
    let fields = decode_fields(code)?;

    for field in &fields {
        writeln!(out, "{} {}", field.tag, field.value)?;
        if field.tag == TAG_MERCHANT_ACCOUNT_INFO {
            for sub in field.nested()? {
                writeln!(out, "  {} {}", sub.tag, sub.value)?;
            }
        }
    }

    let valid = verify_payload(code);
    writeln!(out, "crc: {}", if valid { "valid" } else { "invalid" })?;

    let missing = missing_required_tags(&fields);
    if missing.is_empty() {
        writeln!(out, "missing: none")?;
    } else {
        writeln!(out, "missing: {}", missing.join(","))?;
    }

    Ok(valid)
}

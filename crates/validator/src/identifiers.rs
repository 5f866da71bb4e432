//! UPC-A / EAN-13 generation and checksum validation.
//!
//! Codes are always handled as strings so leading zeros survive.

use rand::Rng;

const UPC_LEN: usize = 12;
const EAN_LEN: usize = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeKind {
    Upc,
    Ean,
}

impl CodeKind {
    /// Guess the code kind from its length.
    pub fn detect(code: &str) -> Option<CodeKind> {
        match code.len() {
            UPC_LEN => Some(CodeKind::Upc),
            EAN_LEN => Some(CodeKind::Ean),
            _ => None,
        }
    }

    pub fn digits(self) -> usize {
        match self {
            CodeKind::Upc => UPC_LEN,
            CodeKind::Ean => EAN_LEN,
        }
    }
}

/// Random 12-digit UPC-A: 11 random payload digits plus check digit.
///
/// Advisory only; the distributor's registry assigns the canonical code.
pub fn generate_upc() -> String {
    generate(CodeKind::Upc)
}

/// Random 13-digit EAN-13: 12 random payload digits plus check digit.
pub fn generate_ean() -> String {
    generate(CodeKind::Ean)
}

fn generate(kind: CodeKind) -> String {
    let mut rng = rand::thread_rng();
    let payload: String = (0..kind.digits() - 1)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect();
    let check = check_digit(&payload, kind).unwrap_or(0);
    format!("{}{}", payload, check)
}

/// Check digit for an 11-digit UPC payload.
pub fn upc_check_digit(payload: &str) -> Option<u8> {
    if payload.len() != UPC_LEN - 1 {
        return None;
    }
    check_digit(payload, CodeKind::Upc)
}

/// Check digit for a 12-digit EAN payload.
pub fn ean_check_digit(payload: &str) -> Option<u8> {
    if payload.len() != EAN_LEN - 1 {
        return None;
    }
    check_digit(payload, CodeKind::Ean)
}

/// Modulo-10 check digit. UPC weights payload digits 3,1,3,... from the
/// left, EAN weights them 1,3,1,...; both amount to weight 3 on the digit
/// nearest the check digit.
fn check_digit(payload: &str, kind: CodeKind) -> Option<u8> {
    let (even_weight, odd_weight) = match kind {
        CodeKind::Upc => (3, 1),
        CodeKind::Ean => (1, 3),
    };

    let mut sum = 0u32;
    for (i, c) in payload.chars().enumerate() {
        let digit = c.to_digit(10)?;
        sum += digit * if i % 2 == 0 { even_weight } else { odd_weight };
    }
    Some(((10 - sum % 10) % 10) as u8)
}

/// True iff `code` is exactly 12 ASCII digits with a matching check digit.
pub fn validate_upc(code: &str) -> bool {
    validate(code, CodeKind::Upc)
}

/// True iff `code` is exactly 13 ASCII digits with a matching check digit.
pub fn validate_ean(code: &str) -> bool {
    validate(code, CodeKind::Ean)
}

fn validate(code: &str, kind: CodeKind) -> bool {
    if code.len() != kind.digits() || !code.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let (payload, last) = code.split_at(kind.digits() - 1);
    match check_digit(payload, kind) {
        Some(expected) => last.as_bytes()[0] - b'0' == expected,
        None => false,
    }
}

/// EAN-13 form of a valid UPC-A (a leading zero keeps the checksum intact).
pub fn upc_to_ean(upc: &str) -> Option<String> {
    if validate_upc(upc) {
        Some(format!("0{}", upc))
    } else {
        None
    }
}

/// Group digits the way they are printed under a barcode.
///
/// Codes of the wrong length are returned unchanged.
pub fn format_identifier(code: &str, kind: CodeKind) -> String {
    if code.len() != kind.digits() || !code.is_ascii() {
        return code.to_string();
    }
    match kind {
        CodeKind::Upc => format!(
            "{} {} {} {}",
            &code[..1],
            &code[1..6],
            &code[6..11],
            &code[11..]
        ),
        CodeKind::Ean => format!(
            "{} {} {} {}",
            &code[..3],
            &code[3..7],
            &code[7..12],
            &code[12..]
        ),
    }
}

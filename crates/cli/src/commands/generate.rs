use anyhow::Result;
use release_qc_validator::identifiers::{ean_check_digit, upc_check_digit};
use release_qc_validator::{
    CodeKind, format_identifier, generate_ean, generate_upc, validate_ean, validate_upc,
};

/// Print freshly generated codes. These are placeholders until the
/// distributor's registry assigns the canonical code.
pub async fn run(kind: CodeKind, count: usize, formatted: bool) -> Result<()> {
    if count == 0 {
        anyhow::bail!("--count must be at least 1");
    }
    for _ in 0..count {
        let code = match kind {
            CodeKind::Upc => generate_upc(),
            CodeKind::Ean => generate_ean(),
        };
        if formatted {
            println!("{}", format_identifier(&code, kind));
        } else {
            println!("{}", code);
        }
    }
    Ok(())
}

/// Outcome of checking a code typed by the user.
#[derive(Debug, PartialEq, Eq)]
pub enum CodeCheck {
    Valid(CodeKind),
    /// Right shape but the check digit does not match
    BadCheckDigit { kind: CodeKind, expected: u8 },
    /// A payload without its check digit; the completed code is suggested
    MissingCheckDigit { kind: CodeKind, completed: String },
    Unrecognized,
}

pub fn check_code(code: &str) -> CodeCheck {
    let digits: String = code.chars().filter(|c| !c.is_whitespace()).collect();
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return CodeCheck::Unrecognized;
    }

    if let Some(kind) = CodeKind::detect(&digits) {
        let valid = match kind {
            CodeKind::Upc => validate_upc(&digits),
            CodeKind::Ean => validate_ean(&digits),
        };
        if valid {
            return CodeCheck::Valid(kind);
        }
        let payload = &digits[..digits.len() - 1];
        let expected = match kind {
            CodeKind::Upc => upc_check_digit(payload),
            CodeKind::Ean => ean_check_digit(payload),
        };
        return match expected {
            Some(expected) => CodeCheck::BadCheckDigit { kind, expected },
            None => CodeCheck::Unrecognized,
        };
    }

    if let Some(digit) = upc_check_digit(&digits) {
        return CodeCheck::MissingCheckDigit {
            kind: CodeKind::Upc,
            completed: format!("{}{}", digits, digit),
        };
    }
    CodeCheck::Unrecognized
}

fn kind_name(kind: CodeKind) -> &'static str {
    match kind {
        CodeKind::Upc => "UPC-A",
        CodeKind::Ean => "EAN-13",
    }
}

pub async fn check(code: String) -> Result<()> {
    match check_code(&code) {
        CodeCheck::Valid(kind) => {
            println!(
                "✅ Valid {}: {}",
                kind_name(kind),
                format_identifier(&code.split_whitespace().collect::<String>(), kind)
            );
            Ok(())
        }
        CodeCheck::BadCheckDigit { kind, expected } => {
            anyhow::bail!(
                "Invalid {} check digit: expected {} as the last digit",
                kind_name(kind),
                expected
            )
        }
        CodeCheck::MissingCheckDigit { kind, completed } => {
            anyhow::bail!(
                "{} digits is a {} payload without its check digit; did you mean {}?",
                completed.len() - 1,
                kind_name(kind),
                completed
            )
        }
        CodeCheck::Unrecognized => {
            anyhow::bail!("'{}' is not a 12-digit UPC or 13-digit EAN", code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_valid_codes() {
        assert_eq!(check_code("036000291452"), CodeCheck::Valid(CodeKind::Upc));
        assert_eq!(check_code("4006381333931"), CodeCheck::Valid(CodeKind::Ean));
        assert_eq!(
            check_code("0 36000 29145 2"),
            CodeCheck::Valid(CodeKind::Upc)
        );
    }

    #[test]
    fn test_check_reports_expected_digit() {
        assert_eq!(
            check_code("036000291453"),
            CodeCheck::BadCheckDigit {
                kind: CodeKind::Upc,
                expected: 2
            }
        );
        assert_eq!(
            check_code("4006381333932"),
            CodeCheck::BadCheckDigit {
                kind: CodeKind::Ean,
                expected: 1
            }
        );
    }

    #[test]
    fn test_check_completes_upc_payload() {
        assert_eq!(
            check_code("03600029145"),
            CodeCheck::MissingCheckDigit {
                kind: CodeKind::Upc,
                completed: "036000291452".to_string()
            }
        );
    }

    #[test]
    fn test_check_rejects_garbage() {
        assert_eq!(check_code("12ab"), CodeCheck::Unrecognized);
        assert_eq!(check_code("123"), CodeCheck::Unrecognized);
    }

    #[tokio::test]
    async fn test_generate_rejects_zero_count() {
        assert!(run(CodeKind::Upc, 0, false).await.is_err());
        assert!(run(CodeKind::Ean, 2, true).await.is_ok());
    }
}

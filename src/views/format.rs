use crate::error::{Error, Result};

/// Render minor units as dollars: `3790` becomes `"$37.90"`, `99` becomes
/// `"$0.99"`. Negative values put the sign before the symbol.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let magnitude = cents.unsigned_abs();
    format!("{sign}${}.{:02}", magnitude / 100, magnitude % 100)
}

/// Read dollar text typed by a user into minor units: `"14.99"` becomes
/// `1499` and `"$3"` becomes `300`. At most two decimals; no sign.
pub fn parse_amount(text: &str) -> Result<i64> {
    let invalid = || {
        Error::Validation(format!(
            "invalid amount {text:?}, expected dollars like 14.99"
        ))
    };

    let trimmed = text.trim();
    let digits = trimmed.strip_prefix('$').unwrap_or(trimmed);
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if whole.is_empty() || !all_digits(whole) || fraction.len() > 2 || !all_digits(fraction) {
        return Err(invalid());
    }

    let whole: i64 = whole.parse().map_err(|_| invalid())?;
    let fraction: i64 = format!("{fraction:0<2}").parse().map_err(|_| invalid())?;
    whole
        .checked_mul(100)
        .and_then(|cents| cents.checked_add(fraction))
        .ok_or_else(invalid)
}

/// Status column text for the paid flag.
pub fn paid_label(paid: bool) -> &'static str {
    if paid {
        "Paid"
    } else {
        "Not Paid"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_whole_and_fractional_dollars() {
        assert_eq!(format_cents(3790), "$37.90");
        assert_eq!(format_cents(195_633), "$1956.33");
        assert_eq!(format_cents(100), "$1.00");
    }

    #[test]
    fn pads_amounts_under_a_dollar() {
        assert_eq!(format_cents(99), "$0.99");
        assert_eq!(format_cents(5), "$0.05");
        assert_eq!(format_cents(0), "$0.00");
    }

    #[test]
    fn negative_amounts_keep_their_sign() {
        assert_eq!(format_cents(-5), "-$0.05");
        assert_eq!(format_cents(-12_345), "-$123.45");
        assert_eq!(format_cents(i64::MIN), "-$92233720368547758.08");
    }

    #[test]
    fn parses_user_amounts() {
        assert_eq!(parse_amount("14.99").unwrap(), 1499);
        assert_eq!(parse_amount("$3").unwrap(), 300);
        assert_eq!(parse_amount("0.5").unwrap(), 50);
        assert_eq!(parse_amount(" 1956.33 ").unwrap(), 195_633);
        assert_eq!(parse_amount(&format_cents(3790)).unwrap(), 3790);
    }

    #[test]
    fn rejects_malformed_amounts() {
        for text in ["", "$", ".99", "1.999", "-5", "12a", "1.2.3", "99999999999999999999"] {
            let err = parse_amount(text).unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "{text:?}");
        }
    }

    #[test]
    fn paid_flag_labels() {
        assert_eq!(paid_label(true), "Paid");
        assert_eq!(paid_label(false), "Not Paid");
    }
}

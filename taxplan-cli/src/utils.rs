use rust_decimal::Decimal;
use taxplan_core::calculations::common::round_to_whole;
use thiserror::Error;

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid amount '{input}': {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Trims whitespace and drops thousands separators and a leading baht sign.
fn normalize_decimal_input(s: &str) -> String {
    let trimmed = s.trim();
    trimmed
        .strip_prefix('฿')
        .unwrap_or(trimmed)
        .trim()
        .replace(',', "")
}

/// Parses an amount such as `"1,234.56"` or `"฿60,000"`.
///
/// Empty or whitespace-only input is treated as 0.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| {
        tracing::debug!(input = %s, "invalid decimal: {}", e);
        ParseDecimalError {
            input: s.to_string(),
            source: e,
        }
    })
}

/// Whole-baht currency with thousands separators, e.g. `฿1,234` or `-฿500`.
pub fn format_baht(amount: Decimal) -> String {
    let whole = round_to_whole(amount);
    let sign = if whole.is_sign_negative() && !whole.is_zero() {
        "-"
    } else {
        ""
    };
    let digits = whole.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}฿{grouped}")
}

/// A rate such as `0.35` as `35%`.
pub fn format_rate(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn parse_decimal_accepts_comma_thousands_separator() {
        assert_eq!(parse_decimal("1,234.56").unwrap(), dec!(1234.56));
        assert_eq!(parse_decimal("1,234,567.89").unwrap(), dec!(1234567.89));
    }

    #[test]
    fn parse_decimal_accepts_baht_sign() {
        assert_eq!(parse_decimal("฿60,000").unwrap(), dec!(60000));
        assert_eq!(parse_decimal(" ฿ 12.5 ").unwrap(), dec!(12.5));
    }

    #[test]
    fn parse_decimal_trim_whitespace() {
        assert_eq!(parse_decimal("  123.45  ").unwrap(), dec!(123.45));
    }

    #[test]
    fn parse_decimal_empty_treated_as_zero() {
        assert_eq!(parse_decimal("").unwrap(), Decimal::ZERO);
        assert_eq!(parse_decimal("   ").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn parse_decimal_invalid_returns_error() {
        let err = parse_decimal("abc").unwrap_err();
        assert!(err.to_string().starts_with("invalid amount 'abc'"));
    }

    #[test]
    fn format_baht_groups_thousands() {
        assert_eq!(format_baht(dec!(0)), "฿0");
        assert_eq!(format_baht(dec!(999)), "฿999");
        assert_eq!(format_baht(dec!(1000)), "฿1,000");
        assert_eq!(format_baht(dec!(1234567)), "฿1,234,567");
    }

    #[test]
    fn format_baht_rounds_to_whole_units() {
        assert_eq!(format_baht(dec!(1234.5)), "฿1,235");
        assert_eq!(format_baht(dec!(1234.49)), "฿1,234");
    }

    #[test]
    fn format_baht_negative() {
        assert_eq!(format_baht(dec!(-12500)), "-฿12,500");
        assert_eq!(format_baht(dec!(-0.4)), "฿0");
    }

    #[test]
    fn format_rate_as_percent() {
        assert_eq!(format_rate(dec!(0.05)), "5%");
        assert_eq!(format_rate(dec!(0.35)), "35%");
        assert_eq!(format_rate(dec!(0)), "0%");
    }
}

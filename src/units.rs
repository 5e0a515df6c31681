//! Conversions between raw asset amounts and their decimal rendering.
//!
//! Amounts are integers scaled by `10^decimals`; these helpers are exact and
//! never go through floating point.

/// Error parsing a decimal amount.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseBalanceError {
    #[error("empty amount")]
    Empty,
    #[error("invalid character in amount {0:?}")]
    InvalidDigit(String),
    #[error("amount {amount:?} has more than {decimals} decimal places")]
    TooPrecise { amount: String, decimals: u8 },
    #[error("amount {0:?} does not fit in 64 bits")]
    Overflow(String),
}

fn scale(decimals: u8) -> Option<u64> {
    10_u64.checked_pow(u32::from(decimals))
}

/// Render `amount` with `decimals` fractional digits, e.g. `1500000, 6` → `"1.500000"`.
pub fn format_balance(amount: u64, decimals: u8) -> String {
    if decimals == 0 {
        return amount.to_string();
    }
    let digits = amount.to_string();
    let width = usize::from(decimals);
    if digits.len() > width {
        let (whole, frac) = digits.split_at(digits.len() - width);
        format!("{whole}.{frac}")
    } else {
        format!("0.{digits:0>width$}")
    }
}

/// Parse a decimal amount such as `"12.5"` into its raw value.
pub fn parse_balance(text: &str, decimals: u8) -> Result<u64, ParseBalanceError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseBalanceError::Empty);
    }
    let (whole, frac) = text.split_once('.').unwrap_or((text, ""));
    if whole.is_empty() && frac.is_empty() {
        return Err(ParseBalanceError::Empty);
    }
    if !whole.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(ParseBalanceError::InvalidDigit(text.to_string()));
    }
    if frac.len() > usize::from(decimals) {
        return Err(ParseBalanceError::TooPrecise {
            amount: text.to_string(),
            decimals,
        });
    }

    let overflow = || ParseBalanceError::Overflow(text.to_string());
    let unit = scale(decimals).ok_or_else(overflow)?;
    let whole: u64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| overflow())?
    };
    let frac_value: u64 = if frac.is_empty() {
        0
    } else {
        let padded = format!("{frac:0<width$}", width = usize::from(decimals));
        padded.parse().map_err(|_| overflow())?
    };
    whole
        .checked_mul(unit)
        .and_then(|v| v.checked_add(frac_value))
        .ok_or_else(overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_padding() {
        assert_eq!(format_balance(5_000_000, 6), "5.000000");
        assert_eq!(format_balance(42, 6), "0.000042");
        assert_eq!(format_balance(0, 2), "0.00");
        assert_eq!(format_balance(123, 0), "123");
    }

    #[test]
    fn parses_whole_and_fractional_amounts() {
        assert_eq!(parse_balance("5", 6), Ok(5_000_000));
        assert_eq!(parse_balance("0.000042", 6), Ok(42));
        assert_eq!(parse_balance("1.5", 9), Ok(1_500_000_000));
        assert_eq!(parse_balance(".25", 2), Ok(25));
        assert_eq!(parse_balance(" 7. ", 0), Ok(7));
    }

    #[test]
    fn formatted_values_parse_back() {
        for (amount, decimals) in [(1_u64, 9_u8), (10_000_000, 6), (u64::MAX, 0)] {
            let text = format_balance(amount, decimals);
            assert_eq!(parse_balance(&text, decimals), Ok(amount));
        }
    }

    #[test]
    fn rejects_malformed_amounts() {
        assert_eq!(parse_balance("", 6), Err(ParseBalanceError::Empty));
        assert_eq!(parse_balance(".", 6), Err(ParseBalanceError::Empty));
        assert!(matches!(
            parse_balance("1,5", 6),
            Err(ParseBalanceError::InvalidDigit(_))
        ));
        assert!(matches!(
            parse_balance("-1", 6),
            Err(ParseBalanceError::InvalidDigit(_))
        ));
        assert!(matches!(
            parse_balance("0.0000001", 6),
            Err(ParseBalanceError::TooPrecise { decimals: 6, .. })
        ));
        assert!(matches!(
            parse_balance("18446744073709551616", 0),
            Err(ParseBalanceError::Overflow(_))
        ));
    }
}

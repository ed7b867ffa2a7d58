//! Decimal amounts. The ledger stores amounts as integer stroops
//! (one unit = 10^7 stroops).

use crate::error::MintError;

pub const STROOPS_PER_UNIT: i64 = 10_000_000;
const DECIMALS: usize = 7;

/// Parse a positive decimal string such as `"1000"` or `"0.5"` into stroops.
pub fn parse_amount(amount: &str) -> Result<i64, MintError> {
    let invalid = |reason| MintError::InvalidAmount {
        amount: amount.to_string(),
        reason,
    };

    let trimmed = amount.trim();
    if trimmed.is_empty() {
        return Err(invalid("amount is required"));
    }

    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (trimmed, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid("amount is required"));
    }
    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return Err(invalid("expected a positive decimal number"));
    }
    if fraction.len() > DECIMALS {
        return Err(invalid("at most 7 decimal places are supported"));
    }

    let whole: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid("amount is too large"))?
    };
    let fraction: i64 = if fraction.is_empty() {
        0
    } else {
        format!("{fraction:0<DECIMALS$}")
            .parse()
            .map_err(|_| invalid("expected a positive decimal number"))?
    };

    let stroops = whole
        .checked_mul(STROOPS_PER_UNIT)
        .and_then(|w| w.checked_add(fraction))
        .ok_or_else(|| invalid("amount is too large"))?;

    if stroops == 0 {
        return Err(invalid("amount must be greater than zero"));
    }
    Ok(stroops)
}

/// Render stroops back into the canonical seven-decimal form.
pub fn format_amount(stroops: i64) -> String {
    let sign = if stroops < 0 { "-" } else { "" };
    let abs = stroops.unsigned_abs();
    let unit = STROOPS_PER_UNIT as u64;
    format!("{sign}{}.{:07}", abs / unit, abs % unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_and_fractional_amounts() {
        assert_eq!(parse_amount("1000").unwrap(), 1000 * STROOPS_PER_UNIT);
        assert_eq!(parse_amount("0.5").unwrap(), 5_000_000);
        assert_eq!(parse_amount(".25").unwrap(), 2_500_000);
        assert_eq!(parse_amount("1.").unwrap(), STROOPS_PER_UNIT);
        assert_eq!(parse_amount("0.0000001").unwrap(), 1);
        assert_eq!(parse_amount(" 42 ").unwrap(), 42 * STROOPS_PER_UNIT);
    }

    #[test]
    fn test_rejects_bad_amounts() {
        for bad in ["", ".", "0", "0.0", "-1", "1e5", "abc", "1.00000001", "1,000"] {
            assert!(
                matches!(parse_amount(bad), Err(MintError::InvalidAmount { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_overflow_rejected() {
        assert!(parse_amount("922337203685.4775807").is_ok());
        assert!(parse_amount("922337203685.4775808").is_err());
        assert!(parse_amount("99999999999999999999").is_err());
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(1000 * STROOPS_PER_UNIT), "1000.0000000");
        assert_eq!(format_amount(1), "0.0000001");
    }
}

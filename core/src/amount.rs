//! Fixed-point token amounts
//!
//! Amounts are unsigned 256-bit integers with 18 implied decimals. All math
//! on them is integer math; division truncates toward zero.

use primitive_types::U256;

use crate::error::{Result, TokenError};

/// Token amount in base units
pub type Amount = U256;

/// Implied decimals of every amount
pub const DECIMALS: u8 = 18;

/// Base units in one whole token (10^18)
pub fn unit() -> Amount {
    U256::exp10(DECIMALS as usize)
}

/// Whole tokens to base units
pub fn to_units(whole: u64) -> Amount {
    U256::from(whole) * unit()
}

/// Parse a decimal token quantity such as `"1000"` or `"0.25"` into base units
pub fn parse_units(text: &str) -> Result<Amount> {
    let text = text.trim();
    let invalid = || TokenError::InvalidAmountFormat(text.to_string());

    let (whole, frac) = match text.split_once('.') {
        Some((w, f)) => (w, f),
        None => (text, ""),
    };

    if whole.is_empty() && frac.is_empty() {
        return Err(invalid());
    }
    if frac.len() > DECIMALS as usize {
        return Err(invalid());
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let whole_units = if whole.is_empty() {
        U256::zero()
    } else {
        U256::from_dec_str(whole).map_err(|_| invalid())?
    };

    let mut padded = frac.to_string();
    while padded.len() < DECIMALS as usize {
        padded.push('0');
    }
    let frac_units = U256::from_dec_str(&padded).map_err(|_| invalid())?;

    whole_units
        .checked_mul(unit())
        .and_then(|v| v.checked_add(frac_units))
        .ok_or(TokenError::Overflow)
}

/// Render base units as a decimal token quantity, trailing zeros trimmed
pub fn format_units(amount: Amount) -> String {
    let whole = amount / unit();
    let frac = amount % unit();

    if frac.is_zero() {
        return whole.to_string();
    }

    let frac = format!("{:0>width$}", frac.to_string(), width = DECIMALS as usize);
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_units() {
        assert_eq!(to_units(1), U256::from(1_000_000_000_000_000_000u128));
        assert_eq!(to_units(0), U256::zero());
    }

    #[test]
    fn test_parse_units() {
        assert_eq!(parse_units("1000").unwrap(), to_units(1000));
        assert_eq!(
            parse_units("0.25").unwrap(),
            U256::from(250_000_000_000_000_000u128)
        );
        assert_eq!(parse_units(".5").unwrap(), to_units(1) / 2);
    }

    #[test]
    fn test_parse_units_rejects_garbage() {
        assert!(parse_units("").is_err());
        assert!(parse_units("1.2.3").is_err());
        assert!(parse_units("-5").is_err());
        assert!(parse_units("0.0000000000000000001").is_err());
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(to_units(970)), "970");
        assert_eq!(format_units(parse_units("12.5").unwrap()), "12.5");
        assert_eq!(format_units(U256::one()), "0.000000000000000001");
    }
}

//! Scaled decimal decoding

use super::FieldError;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Scale used for quantities
pub const QUANTITY_SCALE: u32 = 4;

/// Scale used for monetary amounts and other numeric fields
pub const AMOUNT_SCALE: u32 = 2;

/// Decode an optional decimal token quantized to the given scale.
///
/// Empty tokens decode to `None`.
pub fn decode_decimal(raw: &str, scale: u32) -> Result<Option<Decimal>, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let mut value = Decimal::from_str(trimmed).map_err(|_| FieldError::Decimal {
        raw: raw.to_string(),
    })?;

    // Quantize to a fixed scale: round off excess places, then pad so the
    // stored scale is always exactly `scale`
    value = value.round_dp(scale);
    value.rescale(scale);
    Ok(Some(value))
}

/// Decode a required decimal token, treating an empty token as zero.
pub fn decode_decimal_or_zero(raw: &str, scale: u32) -> Result<Decimal, FieldError> {
    Ok(decode_decimal(raw, scale)?.unwrap_or(Decimal::ZERO))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_quantity_quantization() {
        let qty = decode_decimal("10.5", QUANTITY_SCALE).unwrap().unwrap();
        assert_eq!(qty, dec("10.5"));
        assert_eq!(qty.to_string(), "10.5000");
    }

    #[test]
    fn test_amount_rounds_to_two_places() {
        let amount = decode_decimal("19.999", AMOUNT_SCALE).unwrap().unwrap();
        assert_eq!(amount.to_string(), "20.00");
    }

    #[test]
    fn test_empty_is_absent() {
        assert_eq!(decode_decimal("", QUANTITY_SCALE).unwrap(), None);
        assert_eq!(decode_decimal("  ", QUANTITY_SCALE).unwrap(), None);
    }

    #[test]
    fn test_or_zero() {
        assert_eq!(
            decode_decimal_or_zero("", QUANTITY_SCALE).unwrap(),
            Decimal::ZERO
        );
        assert_eq!(decode_decimal_or_zero("3", QUANTITY_SCALE).unwrap(), dec("3"));
    }

    #[test]
    fn test_invalid_token() {
        assert_matches!(
            decode_decimal("ten", QUANTITY_SCALE),
            Err(FieldError::Decimal { .. })
        );
        assert_matches!(
            decode_decimal("10,5", QUANTITY_SCALE),
            Err(FieldError::Decimal { .. })
        );
    }

    #[test]
    fn test_negative_allowed() {
        let qty = decode_decimal("-2.25", QUANTITY_SCALE).unwrap().unwrap();
        assert_eq!(qty, dec("-2.25"));
    }
}

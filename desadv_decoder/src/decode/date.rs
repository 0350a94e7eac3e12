//! YYYYMMDD date decoding

use super::FieldError;
use chrono::NaiveDate;

/// All-zero date token used by senders to mean "no date"
const ZERO_DATE: &str = "00000000";

/// Decode a wire date token.
///
/// Empty or all-zero tokens mean "no date" and decode to `None`. Tokens
/// longer than 8 characters carry a time suffix in some feeds; only the
/// leading 8 characters are significant.
pub fn decode_date(raw: &str) -> Result<Option<NaiveDate>, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let token: String = trimmed.chars().take(8).collect();
    if token == ZERO_DATE {
        return Ok(None);
    }

    NaiveDate::parse_from_str(&token, "%Y%m%d")
        .map(Some)
        .map_err(|_| FieldError::Date {
            raw: raw.to_string(),
        })
}

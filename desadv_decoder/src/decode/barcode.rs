//! Barcode classification
//!
//! Classification never fails: a code that matches nothing is `Unknown` and
//! the line still decodes. Checksum validation uses the standard GTIN
//! scheme (alternating 3/1 weights from the right of the body).

use crate::document::CodeType;

/// Classify a raw barcode.
///
/// Priority: EAN-8 checksum, then EAN-13 checksum, then any other length
/// with a valid checksum (`En`), then 14 characters without a valid
/// checksum (`Ean14`), else `Unknown`.
pub fn classify_code(code: &str) -> CodeType {
    if code.len() == 8 && checksum_valid(code) {
        CodeType::Ean8
    } else if code.len() == 13 && checksum_valid(code) {
        CodeType::Ean13
    } else if checksum_valid(code) {
        CodeType::En
    } else if code.len() == 14 {
        CodeType::Ean14
    } else {
        CodeType::Unknown
    }
}

/// Validate the GTIN check digit of an all-digit code.
fn checksum_valid(code: &str) -> bool {
    if code.len() < 2 || !code.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    let digits: Vec<u32> = code.chars().filter_map(|c| c.to_digit(10)).collect();
    let (&check, body) = digits.split_last().expect("length checked above");

    let sum: u32 = body
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| if i % 2 == 0 { d * 3 } else { d })
        .sum();

    (10 - sum % 10) % 10 == check
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ean8() {
        // 9638507x: check digit for 9638507 is 4
        assert_eq!(classify_code("96385074"), CodeType::Ean8);
    }

    #[test]
    fn test_ean13() {
        assert_eq!(classify_code("8412345678905"), CodeType::Ean13);
        assert_eq!(classify_code("4006381333931"), CodeType::Ean13);
    }

    #[test]
    fn test_generic_en_for_other_valid_lengths() {
        // UPC-A is 12 digits with the same checksum scheme
        assert_eq!(classify_code("036000291452"), CodeType::En);
    }

    #[test]
    fn test_ean14_by_length() {
        // 14 digits, checksum deliberately broken
        assert_eq!(classify_code("12345678901230"), CodeType::Ean14);
        // Length alone decides once every checksum has failed
        assert_eq!(classify_code("1234567890123X"), CodeType::Ean14);
    }

    #[test]
    fn test_valid_14_digit_checksum_is_generic() {
        // Valid checksum wins over the length-14 fallback
        assert_eq!(classify_code("18412345678902"), CodeType::En);
    }

    #[test]
    fn test_unknown() {
        assert_eq!(classify_code(""), CodeType::Unknown);
        assert_eq!(classify_code("ABC123"), CodeType::Unknown);
        assert_eq!(classify_code("12345678"), CodeType::Unknown); // bad checksum
    }
}

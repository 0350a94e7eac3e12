//! Field decoders for wire-format values
//!
//! Decoders are pure: they take a raw element string and return a typed
//! value or a `FieldError`. Positions are attached by the assembler, which
//! knows which segment the element came from.

pub mod barcode;
pub mod date;
pub mod decimal;

pub use barcode::classify_code;
pub use date::decode_date;
pub use decimal::{decode_decimal, decode_decimal_or_zero, AMOUNT_SCALE, QUANTITY_SCALE};

use crate::logging::codes;

/// Field decoding errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("Invalid date token: '{raw}' (expected YYYYMMDD)")]
    Date { raw: String },

    #[error("Invalid decimal token: '{raw}'")]
    Decimal { raw: String },
}

impl FieldError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            FieldError::Date { .. } => codes::field::DATE_FORMAT,
            FieldError::Decimal { .. } => codes::field::DECIMAL_FORMAT,
        }
    }
}

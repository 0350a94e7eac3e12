//! Consolidated error codes and classification system
//!
//! Single source of truth for all error codes, their metadata, and
//! classification functions used across the decoder and the reconciliation
//! engine.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for an error code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// File processing error codes
pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const INVALID_EXTENSION: Code = Code::new("E006");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const EMPTY_FILE: Code = Code::new("E008");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const IO_ERROR: Code = Code::new("E010");
    pub const INVALID_PATH: Code = Code::new("E011");
    pub const TOO_MANY_RECORDS: Code = Code::new("E012");
    pub const TOO_MANY_FILES: Code = Code::new("E013");
}

/// Tokenizer error codes
pub mod tokenize {
    use super::Code;

    pub const WRONG_SENTINEL: Code = Code::new("E020");
    pub const EMPTY_INTERCHANGE: Code = Code::new("E021");
    pub const TOO_MANY_SEGMENTS: Code = Code::new("E022");
    pub const TOO_MANY_ELEMENTS: Code = Code::new("E023");
    pub const ELEMENT_TOO_LONG: Code = Code::new("E024");
    pub const DANGLING_RELEASE: Code = Code::new("E025");
}

/// Grammar / assembler error codes
pub mod grammar {
    use super::Code;

    pub const UNKNOWN_SEGMENT: Code = Code::new("E030");
    pub const SEGMENT_BEFORE_HEADER: Code = Code::new("E031");
    pub const DUPLICATE_HEADER: Code = Code::new("E032");
    pub const MISSING_ELEMENT: Code = Code::new("E033");
    pub const TOO_MANY_LINE_GROUPS: Code = Code::new("E034");
    pub const LINE_GROUP_SKIPPED: Code = Code::new("E035");
    pub const MISPLACED_LINE_SEGMENT: Code = Code::new("E036");
    pub const MISSING_HEADER: Code = Code::new("E037");
}

/// Field decoding error codes
pub mod field {
    use super::Code;

    pub const DATE_FORMAT: Code = Code::new("E040");
    pub const DECIMAL_FORMAT: Code = Code::new("E041");
}

/// Reference resolution error codes
pub mod reference {
    use super::Code;

    pub const AMBIGUOUS_FALLBACK: Code = Code::new("E050");
    pub const MISSING_PURCHASE: Code = Code::new("E051");
}

/// Reconciliation error codes
pub mod reconcile {
    use super::Code;

    pub const UNRESOLVED_PRODUCT: Code = Code::new("E060");
    pub const MISSING_SHIPPED_QUANTITY: Code = Code::new("E061");
    pub const LINE_FAILED: Code = Code::new("E062");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I001");
    pub const FILE_PROCESSING_SUCCESS: Code = Code::new("I006");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I007");
    pub const DOCUMENT_ASSEMBLED: Code = Code::new("I008");
    pub const REFERENCES_RESOLVED: Code = Code::new("I009");
    pub const RECONCILIATION_COMPLETE: Code = Code::new("I010");
    pub const BATCH_COMPLETE: Code = Code::new("I011");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

fn metadata_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    static REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();
    REGISTRY.get_or_init(build_registry)
}

fn build_registry() -> HashMap<&'static str, ErrorMetadata> {
    let entries = [
        ErrorMetadata {
            code: "ERR001",
            category: "System",
            severity: Severity::Critical,
            recoverable: false,
            requires_halt: true,
            description: "Internal error in the decoder",
            recommended_action: "Report with the offending interchange file",
        },
        ErrorMetadata {
            code: "ERR002",
            category: "System",
            severity: Severity::Critical,
            recoverable: false,
            requires_halt: true,
            description: "Subsystem initialization failed",
            recommended_action: "Check configuration and environment",
        },
        ErrorMetadata {
            code: "E005",
            category: "FileProcessing",
            severity: Severity::Medium,
            recoverable: false,
            requires_halt: true,
            description: "Interchange file not found",
            recommended_action: "Verify the inbox path",
        },
        ErrorMetadata {
            code: "E006",
            category: "FileProcessing",
            severity: Severity::Low,
            recoverable: true,
            requires_halt: false,
            description: "File extension not in the known set (.txt/.edi/.pla)",
            recommended_action: "Rename the file or extend the known extensions",
        },
        ErrorMetadata {
            code: "E007",
            category: "FileProcessing",
            severity: Severity::Medium,
            recoverable: false,
            requires_halt: true,
            description: "File exceeds the maximum accepted size",
            recommended_action: "Split the interchange or raise the bound",
        },
        ErrorMetadata {
            code: "E008",
            category: "FileProcessing",
            severity: Severity::Low,
            recoverable: true,
            requires_halt: false,
            description: "File is empty",
            recommended_action: "Remove the empty file from the inbox",
        },
        ErrorMetadata {
            code: "E009",
            category: "FileProcessing",
            severity: Severity::Medium,
            recoverable: false,
            requires_halt: true,
            description: "Permission denied reading file",
            recommended_action: "Fix filesystem permissions on the inbox",
        },
        ErrorMetadata {
            code: "E010",
            category: "FileProcessing",
            severity: Severity::Medium,
            recoverable: false,
            requires_halt: true,
            description: "I/O error reading file",
            recommended_action: "Retry after checking the filesystem",
        },
        ErrorMetadata {
            code: "E011",
            category: "FileProcessing",
            severity: Severity::Medium,
            recoverable: false,
            requires_halt: true,
            description: "Invalid file path",
            recommended_action: "Verify the configured inbox path",
        },
        ErrorMetadata {
            code: "E012",
            category: "FileProcessing",
            severity: Severity::Medium,
            recoverable: false,
            requires_halt: true,
            description: "File exceeds the maximum record count",
            recommended_action: "Split the interchange",
        },
        ErrorMetadata {
            code: "E013",
            category: "FileProcessing",
            severity: Severity::Medium,
            recoverable: false,
            requires_halt: true,
            description: "Inbox holds more files than one batch accepts",
            recommended_action: "Process in several runs or raise the bound",
        },
        ErrorMetadata {
            code: "E020",
            category: "Tokenize",
            severity: Severity::Low,
            recoverable: true,
            requires_halt: false,
            description: "Leading record is not the DESADV sentinel",
            recommended_action: "None; the file is simply not this format",
        },
        ErrorMetadata {
            code: "E021",
            category: "Tokenize",
            severity: Severity::Low,
            recoverable: true,
            requires_halt: false,
            description: "Interchange contains no records",
            recommended_action: "Remove the file from the inbox",
        },
        ErrorMetadata {
            code: "E022",
            category: "Tokenize",
            severity: Severity::High,
            recoverable: false,
            requires_halt: true,
            description: "Segment count limit exceeded",
            recommended_action: "Split the interchange or raise the bound",
        },
        ErrorMetadata {
            code: "E023",
            category: "Tokenize",
            severity: Severity::High,
            recoverable: false,
            requires_halt: true,
            description: "Element count limit exceeded in one segment",
            recommended_action: "Inspect the interchange for corruption",
        },
        ErrorMetadata {
            code: "E024",
            category: "Tokenize",
            severity: Severity::High,
            recoverable: false,
            requires_halt: true,
            description: "Element length limit exceeded",
            recommended_action: "Inspect the interchange for corruption",
        },
        ErrorMetadata {
            code: "E025",
            category: "Tokenize",
            severity: Severity::Medium,
            recoverable: false,
            requires_halt: true,
            description: "Release character at end of input",
            recommended_action: "Inspect the interchange for truncation",
        },
        ErrorMetadata {
            code: "E030",
            category: "Grammar",
            severity: Severity::Medium,
            recoverable: true,
            requires_halt: false,
            description: "Segment tag has no registered decoder",
            recommended_action: "Abandon the document; extend the tag table if expected",
        },
        ErrorMetadata {
            code: "E031",
            category: "Grammar",
            severity: Severity::Medium,
            recoverable: true,
            requires_halt: false,
            description: "Segment encountered before the BGM header",
            recommended_action: "Inspect segment ordering in the interchange",
        },
        ErrorMetadata {
            code: "E032",
            category: "Grammar",
            severity: Severity::Medium,
            recoverable: true,
            requires_halt: false,
            description: "More than one BGM header in the document",
            recommended_action: "Inspect the interchange; one document per file",
        },
        ErrorMetadata {
            code: "E033",
            category: "Grammar",
            severity: Severity::Medium,
            recoverable: true,
            requires_halt: false,
            description: "Segment is missing a required element",
            recommended_action: "Inspect the offending record",
        },
        ErrorMetadata {
            code: "E034",
            category: "Grammar",
            severity: Severity::High,
            recoverable: false,
            requires_halt: true,
            description: "Line group count limit exceeded",
            recommended_action: "Split the interchange or raise the bound",
        },
        ErrorMetadata {
            code: "E035",
            category: "Grammar",
            severity: Severity::Low,
            recoverable: true,
            requires_halt: false,
            description: "Line group skipped due to a field error",
            recommended_action: "Fix the recorded field error and reprocess",
        },
        ErrorMetadata {
            code: "E036",
            category: "Grammar",
            severity: Severity::Medium,
            recoverable: true,
            requires_halt: false,
            description: "Line-scoped segment with no open line group",
            recommended_action: "Inspect segment ordering in the interchange",
        },
        ErrorMetadata {
            code: "E037",
            category: "Grammar",
            severity: Severity::Medium,
            recoverable: true,
            requires_halt: false,
            description: "Interchange carries no BGM header segment",
            recommended_action: "Inspect the interchange; the file may be truncated",
        },
        ErrorMetadata {
            code: "E040",
            category: "Field",
            severity: Severity::Medium,
            recoverable: true,
            requires_halt: false,
            description: "Date token does not match YYYYMMDD",
            recommended_action: "Fix the offending record",
        },
        ErrorMetadata {
            code: "E041",
            category: "Field",
            severity: Severity::Medium,
            recoverable: true,
            requires_halt: false,
            description: "Numeric token is not a decimal",
            recommended_action: "Fix the offending record",
        },
        ErrorMetadata {
            code: "E050",
            category: "Reference",
            severity: Severity::Low,
            recoverable: true,
            requires_halt: false,
            description: "Alternate-reference fallback matched more than one purchase",
            recommended_action: "Resolve the ambiguity manually",
        },
        ErrorMetadata {
            code: "E051",
            category: "Reference",
            severity: Severity::High,
            recoverable: false,
            requires_halt: true,
            description: "No purchase reference could be resolved for the document",
            recommended_action: "Verify the ON reference against purchase records",
        },
        ErrorMetadata {
            code: "E060",
            category: "Reconcile",
            severity: Severity::Medium,
            recoverable: true,
            requires_halt: false,
            description: "No product matches the line's code",
            recommended_action: "Register the product code or fix the line",
        },
        ErrorMetadata {
            code: "E061",
            category: "Reconcile",
            severity: Severity::Low,
            recoverable: true,
            requires_halt: false,
            description: "Line carries no shipped quantity (type 12)",
            recommended_action: "None; the line is valid but unusable",
        },
        ErrorMetadata {
            code: "E062",
            category: "Reconcile",
            severity: Severity::Medium,
            recoverable: true,
            requires_halt: false,
            description: "Line could not be reconciled",
            recommended_action: "See the recorded per-line error",
        },
    ];

    entries
        .into_iter()
        .map(|meta| (meta.code, meta))
        .collect()
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    metadata_registry().get(code)
}

pub fn get_severity(code: &str) -> Severity {
    get_metadata(code).map(|m| m.severity).unwrap_or(Severity::Medium)
}

pub fn get_category(code: &str) -> &'static str {
    get_metadata(code).map(|m| m.category).unwrap_or("Unknown")
}

pub fn get_description(code: &str) -> &'static str {
    get_metadata(code)
        .map(|m| m.description)
        .unwrap_or("Unknown error")
}

pub fn get_action(code: &str) -> &'static str {
    get_metadata(code)
        .map(|m| m.recommended_action)
        .unwrap_or("No specific action available")
}

pub fn is_recoverable(code: &str) -> bool {
    get_metadata(code).map(|m| m.recoverable).unwrap_or(false)
}

pub fn requires_halt(code: &str) -> bool {
    get_metadata(code).map(|m| m.requires_halt).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_display() {
        assert_eq!(tokenize::WRONG_SENTINEL.to_string(), "E020");
    }

    #[test]
    fn test_registry_lookup() {
        assert_eq!(get_category("E020"), "Tokenize");
        assert!(is_recoverable("E020"));
        assert!(!requires_halt("E020"));
        assert!(requires_halt("E051"));
    }

    #[test]
    fn test_unknown_code_defaults() {
        assert_eq!(get_description("E999"), "Unknown error");
        assert_eq!(get_severity("E999"), Severity::Medium);
    }

    #[test]
    fn test_every_constant_has_metadata() {
        let codes = [
            system::INTERNAL_ERROR,
            file_processing::FILE_NOT_FOUND,
            file_processing::TOO_MANY_RECORDS,
            tokenize::WRONG_SENTINEL,
            tokenize::DANGLING_RELEASE,
            grammar::UNKNOWN_SEGMENT,
            grammar::LINE_GROUP_SKIPPED,
            grammar::MISPLACED_LINE_SEGMENT,
            grammar::MISSING_HEADER,
            field::DATE_FORMAT,
            field::DECIMAL_FORMAT,
            reference::AMBIGUOUS_FALLBACK,
            reference::MISSING_PURCHASE,
            reconcile::UNRESOLVED_PRODUCT,
            reconcile::LINE_FAILED,
        ];
        for code in codes {
            assert_ne!(get_description(code.as_str()), "Unknown error", "{}", code);
        }
    }
}

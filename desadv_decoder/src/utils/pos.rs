//! Source location tracking for the DESADV decoder
//!
//! EDI messages are record oriented, so locations are tracked at segment
//! granularity: the 1-based record number plus the segment tag. Accurate
//! location tracking is what lets an operator find the offending line in
//! the original interchange file.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a segment inside one interchange file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SegmentPos {
    /// Record number within the file (1-based)
    pub record: u32,
    /// Segment tag at that record (e.g. "BGM", "QTYLIN")
    pub tag: String,
}

impl SegmentPos {
    /// Create a new segment position
    pub fn new(record: u32, tag: impl Into<String>) -> Self {
        Self {
            record,
            tag: tag.into(),
        }
    }

    /// Position of the leading sentinel record
    pub fn sentinel() -> Self {
        Self {
            record: 1,
            tag: String::new(),
        }
    }
}

impl fmt::Display for SegmentPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tag.is_empty() {
            write!(f, "record {}", self.record)
        } else {
            write!(f, "record {} ({})", self.record, self.tag)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_tag() {
        let pos = SegmentPos::new(4, "QTYLIN");
        assert_eq!(pos.to_string(), "record 4 (QTYLIN)");
    }

    #[test]
    fn test_display_sentinel() {
        assert_eq!(SegmentPos::sentinel().to_string(), "record 1");
    }
}

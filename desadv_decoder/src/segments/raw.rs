//! Raw segment type produced by the tokenizer

use crate::utils::SegmentPos;
use serde::{Deserialize, Serialize};

/// One delimited record: a tag followed by its data elements.
///
/// Elements are kept exactly as they appeared on the wire, including empty
/// trailing elements; composite elements are not split until a decoder asks
/// for components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSegment {
    pub tag: String,
    pub elements: Vec<String>,
    pub pos: SegmentPos,
}

impl RawSegment {
    pub fn new(tag: impl Into<String>, elements: Vec<String>, record: u32) -> Self {
        let tag = tag.into();
        let pos = SegmentPos::new(record, tag.clone());
        Self { tag, elements, pos }
    }

    /// Get a data element by 0-based index (the tag is not an element)
    pub fn element(&self, index: usize) -> Option<&str> {
        self.elements.get(index).map(|s| s.as_str())
    }

    /// Get a data element, treating a missing one as empty
    pub fn element_or_empty(&self, index: usize) -> &str {
        self.element(index).unwrap_or("")
    }

    /// Split a data element into its components
    pub fn components(&self, index: usize, component_separator: char) -> Vec<&str> {
        self.element_or_empty(index)
            .split(component_separator)
            .collect()
    }

    /// Number of data elements
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }
}

impl std::fmt::Display for RawSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag)?;
        for element in &self.elements {
            write!(f, "|{}", element)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_access() {
        let seg = RawSegment::new(
            "BGM",
            vec!["REF123".into(), "351".into(), "9".into()],
            2,
        );

        assert_eq!(seg.element(0), Some("REF123"));
        assert_eq!(seg.element(2), Some("9"));
        assert_eq!(seg.element(3), None);
        assert_eq!(seg.element_or_empty(3), "");
        assert_eq!(seg.element_count(), 3);
        assert_eq!(seg.pos.record, 2);
        assert_eq!(seg.pos.tag, "BGM");
    }

    #[test]
    fn test_components() {
        let seg = RawSegment::new("DTM", vec!["137:20240115:102".into()], 3);
        assert_eq!(seg.components(0, ':'), vec!["137", "20240115", "102"]);
    }

    #[test]
    fn test_display_round_trip() {
        let seg = RawSegment::new("QTYLIN", vec!["12".into(), "10.5".into(), "".into()], 5);
        assert_eq!(seg.to_string(), "QTYLIN|12|10.5|");
    }
}

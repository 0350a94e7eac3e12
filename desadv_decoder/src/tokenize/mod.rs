//! Tokenizer for delimited DESADV interchanges
//!
//! Turns raw interchange text into a `SegmentStream`. Delimiters are
//! configurable: the legacy feed uses newline-terminated records with
//! pipe-separated elements and no escaping; the EDIFACT variant uses the
//! standard control characters with `?` as the release (escape) character.

use crate::config::constants::compile_time::tokenize::{
    MAX_ELEMENT_COUNT, MAX_ELEMENT_LENGTH, MAX_SEGMENT_COUNT,
};
use crate::logging::codes;
use crate::segments::{RawSegment, SegmentStream};
use crate::utils::SegmentPos;
use crate::{log_debug, log_error, log_success};

/// Leading record every DESADV interchange must carry
pub const SENTINEL: &str = "DESADV_D_96A_UN_EAN005";

/// Delimiter set for one interchange format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters {
    /// Character ending a segment (record)
    pub segment_terminator: char,
    /// Character separating data elements within a segment
    pub element_separator: char,
    /// Character separating components within a composite element
    pub component_separator: char,
    /// Release character escaping the next character, if the format has one
    pub release: Option<char>,
}

impl Delimiters {
    /// Legacy feed: newline records, pipe elements, no release character
    pub fn legacy_pipe() -> Self {
        Self {
            segment_terminator: '\n',
            element_separator: '|',
            component_separator: ':',
            release: None,
        }
    }

    /// Standard EDIFACT control characters
    pub fn edifact() -> Self {
        Self {
            segment_terminator: '\'',
            element_separator: '+',
            component_separator: ':',
            release: Some('?'),
        }
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self::legacy_pipe()
    }
}

/// Tokenization errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum TokenizeError {
    #[error("Leading record is not the DESADV sentinel: found '{found}'")]
    WrongSentinel { found: String },

    #[error("Interchange contains no records")]
    EmptyInterchange,

    #[error("Too many segments: {count} (max {MAX_SEGMENT_COUNT})")]
    TooManySegments { count: usize },

    #[error("Too many elements in segment at {pos}: {count} (max {MAX_ELEMENT_COUNT})")]
    TooManyElements { count: usize, pos: SegmentPos },

    #[error("Element too long at {pos}: {length} characters (max {MAX_ELEMENT_LENGTH})")]
    ElementTooLong { length: usize, pos: SegmentPos },

    #[error("Release character at end of input")]
    DanglingRelease,
}

impl TokenizeError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            TokenizeError::WrongSentinel { .. } => codes::tokenize::WRONG_SENTINEL,
            TokenizeError::EmptyInterchange => codes::tokenize::EMPTY_INTERCHANGE,
            TokenizeError::TooManySegments { .. } => codes::tokenize::TOO_MANY_SEGMENTS,
            TokenizeError::TooManyElements { .. } => codes::tokenize::TOO_MANY_ELEMENTS,
            TokenizeError::ElementTooLong { .. } => codes::tokenize::ELEMENT_TOO_LONG,
            TokenizeError::DanglingRelease => codes::tokenize::DANGLING_RELEASE,
        }
    }

    /// Whether this error means "not a DESADV file" rather than a broken one
    pub fn is_format_mismatch(&self) -> bool {
        matches!(
            self,
            TokenizeError::WrongSentinel { .. } | TokenizeError::EmptyInterchange
        )
    }
}

/// Tokenizer for one delimiter configuration
pub struct Tokenizer {
    delimiters: Delimiters,
}

impl Tokenizer {
    pub fn new(delimiters: Delimiters) -> Self {
        Self { delimiters }
    }

    pub fn delimiters(&self) -> &Delimiters {
        &self.delimiters
    }

    /// Tokenize interchange text into a segment stream.
    ///
    /// The first logical record must be the DESADV sentinel; it is consumed
    /// and not part of the resulting stream. Record numbers in positions are
    /// 1-based and count the sentinel record.
    pub fn tokenize(&self, source: &str) -> Result<SegmentStream, TokenizeError> {
        log_debug!("Starting tokenization",
            "chars" => source.chars().count(),
            "element_separator" => self.delimiters.element_separator);

        let records = self.split_records(source)?;

        // Records that are empty after trimming carry no segment. The
        // original record number is preserved for diagnostics.
        let mut logical: Vec<(u32, String)> = Vec::new();
        for (index, record) in records.into_iter().enumerate() {
            let trimmed = record.trim_end_matches('\r').trim();
            if !trimmed.is_empty() {
                logical.push((index as u32 + 1, trimmed.to_string()));
            }
        }

        let Some((_, first)) = logical.first() else {
            return Err(TokenizeError::EmptyInterchange);
        };

        if first != SENTINEL {
            // Not an error worth shouting about: inboxes carry other formats
            log_debug!("Leading record is not the DESADV sentinel",
                "found" => first);
            return Err(TokenizeError::WrongSentinel {
                found: first.clone(),
            });
        }

        if logical.len() - 1 > MAX_SEGMENT_COUNT {
            let error = TokenizeError::TooManySegments {
                count: logical.len() - 1,
            };
            log_error!(error.error_code(), "Segment count limit exceeded",
                "count" => logical.len() - 1,
                "limit" => MAX_SEGMENT_COUNT);
            return Err(error);
        }

        let mut segments = Vec::with_capacity(logical.len() - 1);
        for (record_number, record) in logical.into_iter().skip(1) {
            segments.push(self.split_segment(record_number, &record)?);
        }

        log_success!(codes::success::TOKENIZATION_COMPLETE, "Tokenization complete",
            "segments" => segments.len());

        Ok(SegmentStream::new(segments))
    }

    /// Split source text into raw records on the segment terminator,
    /// honoring the release character.
    fn split_records(&self, source: &str) -> Result<Vec<String>, TokenizeError> {
        let Some(release) = self.delimiters.release else {
            return Ok(source
                .split(self.delimiters.segment_terminator)
                .map(|s| s.to_string())
                .collect());
        };

        let mut records = Vec::new();
        let mut current = String::new();
        let mut chars = source.chars();

        while let Some(ch) = chars.next() {
            if ch == release {
                match chars.next() {
                    Some(escaped) => current.push(escaped),
                    None => return Err(TokenizeError::DanglingRelease),
                }
            } else if ch == self.delimiters.segment_terminator {
                records.push(std::mem::take(&mut current));
            } else {
                current.push(ch);
            }
        }
        records.push(current);

        Ok(records)
    }

    /// Split one record into tag + elements, honoring the release character.
    ///
    /// Empty trailing elements are preserved: `QTYLIN|12|10.5|` has three
    /// elements, the last one empty.
    fn split_segment(
        &self,
        record_number: u32,
        record: &str,
    ) -> Result<RawSegment, TokenizeError> {
        let mut parts: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut chars = record.chars();

        loop {
            match chars.next() {
                Some(ch) if Some(ch) == self.delimiters.release => match chars.next() {
                    Some(escaped) => current.push(escaped),
                    None => return Err(TokenizeError::DanglingRelease),
                },
                Some(ch) if ch == self.delimiters.element_separator => {
                    parts.push(std::mem::take(&mut current));
                }
                Some(ch) => current.push(ch),
                None => {
                    parts.push(current);
                    break;
                }
            }
        }

        let tag = parts.remove(0);
        let pos = SegmentPos::new(record_number, tag.clone());

        if parts.len() > MAX_ELEMENT_COUNT {
            let error = TokenizeError::TooManyElements {
                count: parts.len(),
                pos: pos.clone(),
            };
            log_error!(error.error_code(), "Element count limit exceeded",
                pos = pos,
                "count" => parts.len());
            return Err(error);
        }

        for element in &parts {
            if element.len() > MAX_ELEMENT_LENGTH {
                let error = TokenizeError::ElementTooLong {
                    length: element.len(),
                    pos: pos.clone(),
                };
                log_error!(error.error_code(), "Element length limit exceeded",
                    pos = pos,
                    "length" => element.len());
                return Err(error);
            }
        }

        Ok(RawSegment::new(tag, parts, record_number))
    }
}

/// Tokenize with the legacy pipe delimiters
pub fn tokenize_legacy(source: &str) -> Result<SegmentStream, TokenizeError> {
    Tokenizer::new(Delimiters::legacy_pipe()).tokenize(source)
}

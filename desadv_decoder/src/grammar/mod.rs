//! Grammar: assembles a segment stream into a despatch document
//!
//! The grammar is small but strict about ordering: exactly one BGM header,
//! then header-scoped segments, then repeating LIN groups whose line-scoped
//! segments carry the `LIN` suffix. Unknown tags abandon the document.

pub mod assembler;
pub mod tags;

pub use assembler::{AssembledDocument, Assembler, LineGroupError};
pub use tags::{segment_role, SegmentRole};

use crate::decode::FieldError;
use crate::logging::codes;
use crate::utils::SegmentPos;

/// Structural errors raised while assembling a document
#[derive(Debug, Clone, thiserror::Error)]
pub enum GrammarError {
    #[error("No decoder registered for segment tag '{tag}' at {pos}")]
    UnknownSegment { tag: String, pos: SegmentPos },

    #[error("Segment '{tag}' before the BGM header at {pos}")]
    SegmentBeforeHeader { tag: String, pos: SegmentPos },

    #[error("Line-scoped segment '{tag}' with no open line group at {pos}")]
    MisplacedLineSegment { tag: String, pos: SegmentPos },

    #[error("Duplicate BGM header at {pos}")]
    DuplicateHeader { pos: SegmentPos },

    #[error("Interchange carries no BGM header segment")]
    MissingHeader,

    #[error("Segment '{tag}' is missing required element '{element}' at {pos}")]
    MissingElement {
        tag: String,
        element: &'static str,
        pos: SegmentPos,
    },

    #[error("Too many line groups: {count}")]
    TooManyLineGroups { count: usize },

    #[error("{error} at {pos}")]
    Field { error: FieldError, pos: SegmentPos },
}

impl GrammarError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            GrammarError::UnknownSegment { .. } => codes::grammar::UNKNOWN_SEGMENT,
            GrammarError::SegmentBeforeHeader { .. } => codes::grammar::SEGMENT_BEFORE_HEADER,
            GrammarError::MisplacedLineSegment { .. } => codes::grammar::MISPLACED_LINE_SEGMENT,
            GrammarError::DuplicateHeader { .. } => codes::grammar::DUPLICATE_HEADER,
            GrammarError::MissingHeader => codes::grammar::MISSING_HEADER,
            GrammarError::MissingElement { .. } => codes::grammar::MISSING_ELEMENT,
            GrammarError::TooManyLineGroups { .. } => codes::grammar::TOO_MANY_LINE_GROUPS,
            GrammarError::Field { error, .. } => error.error_code(),
        }
    }

    /// Position of the offending segment, when the error has one
    pub fn pos(&self) -> Option<&SegmentPos> {
        match self {
            GrammarError::UnknownSegment { pos, .. }
            | GrammarError::SegmentBeforeHeader { pos, .. }
            | GrammarError::MisplacedLineSegment { pos, .. }
            | GrammarError::DuplicateHeader { pos }
            | GrammarError::MissingElement { pos, .. }
            | GrammarError::Field { pos, .. } => Some(pos),
            GrammarError::MissingHeader | GrammarError::TooManyLineGroups { .. } => None,
        }
    }

    /// Whether the error is confined to one line group.
    ///
    /// Line-local errors can be collected in permissive mode; everything
    /// else abandons the document regardless of strictness.
    pub fn is_line_local(&self) -> bool {
        matches!(
            self,
            GrammarError::MissingElement { .. } | GrammarError::Field { .. }
        )
    }
}

//! Decode pipeline: file -> tokens -> document
//!
//! One entry point per input kind. The sentinel check is a routing decision,
//! not a failure: an inbox file that is not a DESADV interchange produces
//! `DecodeOutcome::NotThisFormat` and the caller moves on.

use crate::config::runtime::{FormatVariant, Strictness};
use crate::file_processor::{FileProcessor, FileProcessorError};
use crate::grammar::{Assembler, GrammarError, LineGroupError};
use crate::document::ShipmentDocument;
use crate::log_debug;
use crate::tokenize::{Delimiters, TokenizeError, Tokenizer};
use std::path::Path;

/// Options for one decode run
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeOptions {
    pub variant: FormatVariant,
    pub strictness: Strictness,
}

impl DecodeOptions {
    pub fn new(variant: FormatVariant, strictness: Strictness) -> Self {
        Self {
            variant,
            strictness,
        }
    }

    fn delimiters(&self) -> Delimiters {
        match self.variant {
            FormatVariant::LegacyPipe => Delimiters::legacy_pipe(),
            FormatVariant::Edifact => Delimiters::edifact(),
        }
    }
}

/// A decoded document plus the line groups dropped in permissive mode
#[derive(Debug, Clone)]
pub struct DecodedDocument {
    pub document: ShipmentDocument,
    pub line_errors: Vec<LineGroupError>,
}

impl DecodedDocument {
    /// Whether every line group survived decoding
    pub fn is_complete(&self) -> bool {
        self.line_errors.is_empty()
    }
}

/// Outcome of decoding one input
#[derive(Debug, Clone)]
pub enum DecodeOutcome {
    /// The input is not a DESADV interchange; no document, no error
    NotThisFormat,
    Document(DecodedDocument),
}

impl DecodeOutcome {
    pub fn document(self) -> Option<DecodedDocument> {
        match self {
            DecodeOutcome::Document(decoded) => Some(decoded),
            DecodeOutcome::NotThisFormat => None,
        }
    }
}

/// Errors that abort a decode run
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    File(#[from] FileProcessorError),

    #[error(transparent)]
    Tokenize(TokenizeError),

    #[error(transparent)]
    Grammar(#[from] GrammarError),
}

impl PipelineError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            PipelineError::File(e) => e.error_code(),
            PipelineError::Tokenize(e) => e.error_code(),
            PipelineError::Grammar(e) => e.error_code(),
        }
    }
}

/// Decode interchange text that is already in memory.
pub fn decode_source(
    source: &str,
    options: DecodeOptions,
) -> Result<DecodeOutcome, PipelineError> {
    let tokenizer = Tokenizer::new(options.delimiters());
    let mut stream = match tokenizer.tokenize(source) {
        Ok(stream) => stream,
        Err(error) if error.is_format_mismatch() => {
            log_debug!("Input is not a DESADV interchange", "reason" => error);
            return Ok(DecodeOutcome::NotThisFormat);
        }
        Err(error) => return Err(PipelineError::Tokenize(error)),
    };

    let assembled = Assembler::new(options.strictness).assemble(&mut stream)?;

    Ok(DecodeOutcome::Document(DecodedDocument {
        document: assembled.document,
        line_errors: assembled.line_errors,
    }))
}

/// Read and decode one inbox file.
///
/// The file stays in place whatever the outcome; the batch layer decides
/// what to do with processed files.
pub fn decode_file(
    path: &Path,
    options: DecodeOptions,
) -> Result<DecodeOutcome, PipelineError> {
    let path_str = path.to_string_lossy();
    let result = FileProcessor::new().process_file(&path_str)?;
    decode_source(&result.source, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;
    use tempfile::Builder;

    const SAMPLE: &str = "DESADV_D_96A_UN_EAN005\n\
                          BGM|REF123|351|9\n\
                          LIN|8412345678905|EN|1\n\
                          QTYLIN|12|10.5|KGM\n";

    #[test]
    fn test_decode_source() {
        let outcome = decode_source(SAMPLE, DecodeOptions::default()).unwrap();
        let decoded = outcome.document().unwrap();
        assert_eq!(decoded.document.number, "REF123");
        assert!(decoded.is_complete());
    }

    #[test]
    fn test_repeated_decode_is_identical() {
        let first = decode_source(SAMPLE, DecodeOptions::default())
            .unwrap()
            .document()
            .unwrap();
        let second = decode_source(SAMPLE, DecodeOptions::default())
            .unwrap()
            .document()
            .unwrap();
        assert_eq!(first.document, second.document);
    }

    #[test]
    fn test_not_this_format() {
        let outcome = decode_source("INVOIC_D_96A\nBGM|X|380|9\n", DecodeOptions::default());
        assert_matches!(outcome, Ok(DecodeOutcome::NotThisFormat));
    }

    #[test]
    fn test_empty_input_is_not_this_format() {
        let outcome = decode_source("", DecodeOptions::default());
        assert_matches!(outcome, Ok(DecodeOutcome::NotThisFormat));
    }

    #[test]
    fn test_grammar_error_propagates() {
        let source = "DESADV_D_96A_UN_EAN005\nBGM|A|351|9\nBGM|B|351|9\n";
        let err = decode_source(source, DecodeOptions::default()).unwrap_err();
        assert_matches!(err, PipelineError::Grammar(GrammarError::DuplicateHeader { .. }));
        assert_eq!(err.error_code().as_str(), "E032");
    }

    #[test]
    fn test_edifact_variant() {
        let source = "DESADV_D_96A_UN_EAN005'\
                      BGM+REF123+351+9'\
                      LIN+8412345678905+EN+1'\
                      QTYLIN+12+10.5+KGM'";
        let options = DecodeOptions::new(FormatVariant::Edifact, Strictness::Strict);
        let decoded = decode_source(source, options).unwrap().document().unwrap();
        assert_eq!(decoded.document.lines[0].code, "8412345678905");
    }

    #[test]
    fn test_decode_file() {
        let mut file = Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let outcome = decode_file(file.path(), DecodeOptions::default()).unwrap();
        assert!(outcome.document().is_some());
    }

    #[test]
    fn test_decode_file_missing() {
        let err = decode_file(
            Path::new("/nonexistent/shipment.txt"),
            DecodeOptions::default(),
        )
        .unwrap_err();
        assert_matches!(err, PipelineError::File(_));
    }
}

//! File processing for DESADV interchange files
//!
//! Inbox files arrive as latin-1 encoded text with one of the known
//! extensions (.txt, .edi, .pla). Reading never fails on encoding: every
//! byte maps to exactly one latin-1 code point.

pub mod processor;

pub use processor::{
    has_known_extension, process_file, FileMetadata, FileProcessingResult, FileProcessor,
    FileProcessorError, KNOWN_EXTENSIONS,
};

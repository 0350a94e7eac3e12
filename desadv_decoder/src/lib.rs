// Internal modules
pub mod batch;
pub mod config;
pub mod decode;
pub mod document;
pub mod file_processor;
pub mod grammar;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod segments;
pub mod tokenize;
pub mod utils;

// Re-export key types for library consumers
pub use batch::{run_batch, BatchConfig, BatchError, BatchResults};
pub use document::{
    CodeType, DocumentLine, Quantity, Reference, ReferenceType, ShipmentDocument, SupplierParty,
};
pub use pipeline::{decode_file, decode_source, DecodeOptions, DecodeOutcome, DecodedDocument, PipelineError};

//! Decoded despatch-advice document model
//!
//! An owned tree built fresh per parse; nothing here references stores or
//! business entities beyond the optional resolved ids the resolver fills in.

pub mod builder;
pub mod model;

pub use builder::{HeaderBuilder, LineBuilder};
pub use model::{
    CodeType, DocumentLine, DocumentType, EntityRef, FunctionCode, Quantity, Reference,
    ReferenceType, ShipmentDocument, SupplierParty,
};

//! Reconciliation of decoded despatch-advice documents
//!
//! The decoder hands over an owned `ShipmentDocument`; this crate ties each
//! line to a purchase order's pending stock movements. Storage is behind
//! traits; persistence of the resulting bindings is the caller's concern.

pub mod engine;
pub mod resolve;
pub mod store;

pub use engine::{
    LineError, LotAssignment, MoveAction, MoveBinding, ReconcileError, ReconcileOutcome,
    Reconciler,
};
pub use resolve::{resolve_document, resolve_reference};
pub use store::{
    InMemoryStore, Lot, LotExpirationPolicy, LotId, LotStore, MoveId, PartyId, PartyLookup,
    Product, ProductId, ProductLookup, Purchase, PurchaseId, PurchaseStore, Shipment, ShipmentId,
    ShipmentStore, StockMove,
};

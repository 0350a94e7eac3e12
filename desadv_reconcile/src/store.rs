//! Repository traits over external business entities
//!
//! The engine never owns products, purchases, movements, or lots; it sees
//! them through these traits. `InMemoryStore` is the reference
//! implementation, used in tests and small deployments.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// IDENTIFIERS
// ============================================================================

macro_rules! entity_id {
    ($name:ident, $kind:expr) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(pub u64);

        impl $name {
            /// Entity kind string used in resolved references
            pub const KIND: &'static str = $kind;
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{},{}", $kind, self.0)
            }
        }
    };
}

entity_id!(ProductId, "product");
entity_id!(PurchaseId, "purchase");
entity_id!(MoveId, "stock.move");
entity_id!(LotId, "stock.lot");
entity_id!(ShipmentId, "stock.shipment");
entity_id!(PartyId, "party");

// ============================================================================
// ENTITIES
// ============================================================================

/// Product policy for lot expiration dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LotExpirationPolicy {
    /// Expiration dates are not tracked for this product
    None,
    Optional,
    Required,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Registered identification codes (barcodes)
    pub codes: Vec<String>,
    pub lot_expiration: LotExpirationPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: PurchaseId,
    pub number: String,
    /// Secondary reference some suppliers quote instead of the number
    pub alternate_reference: Option<String>,
    /// Movement ids in purchase order line order
    pub moves: Vec<MoveId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMove {
    pub id: MoveId,
    pub purchase: PurchaseId,
    pub product: ProductId,
    /// Quantity still expected; zero or negative means fully received
    pub pending_quantity: Decimal,
    pub planned_date: Option<NaiveDate>,
    pub lot: Option<LotId>,
}

impl StockMove {
    pub fn is_pending(&self) -> bool {
        self.pending_quantity > Decimal::ZERO
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lot {
    pub id: LotId,
    pub number: String,
    pub product: ProductId,
    pub expiration_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
    pub id: ShipmentId,
    pub number: String,
}

// ============================================================================
// LOOKUP TRAITS
// ============================================================================

pub trait ProductLookup {
    /// Find the product registered under an identification code
    fn product_by_code(&self, code: &str) -> Option<&Product>;
}

pub trait PurchaseStore {
    fn purchase(&self, id: PurchaseId) -> Option<&Purchase>;

    fn purchase_by_number(&self, number: &str) -> Option<&Purchase>;

    /// All purchases carrying the given alternate reference
    fn purchases_by_alternate(&self, reference: &str) -> Vec<&Purchase>;

    fn stock_move(&self, id: MoveId) -> Option<&StockMove>;

    /// Movements of a purchase, in purchase order line order
    fn moves_of(&self, purchase: PurchaseId) -> Vec<&StockMove> {
        self.purchase(purchase)
            .map(|p| {
                p.moves
                    .iter()
                    .filter_map(|id| self.stock_move(*id))
                    .collect()
            })
            .unwrap_or_default()
    }
}

pub trait ShipmentStore {
    fn shipment_by_number(&self, number: &str) -> Option<&Shipment>;
}

pub trait LotStore {
    /// Find a lot by its number for one product
    fn lot_by_number(&self, number: &str, product: ProductId) -> Option<&Lot>;
}

pub trait PartyLookup {
    fn party_by_identifier(&self, identifier: &str) -> Option<PartyId>;
}

// ============================================================================
// IN-MEMORY IMPLEMENTATION
// ============================================================================

/// In-memory store backing tests and small deployments
#[derive(Debug, Default)]
pub struct InMemoryStore {
    products: Vec<Product>,
    purchases: Vec<Purchase>,
    moves: HashMap<MoveId, StockMove>,
    lots: Vec<Lot>,
    shipments: Vec<Shipment>,
    parties: HashMap<String, PartyId>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_product(&mut self, product: Product) -> &mut Self {
        self.products.push(product);
        self
    }

    pub fn add_purchase(&mut self, purchase: Purchase) -> &mut Self {
        self.purchases.push(purchase);
        self
    }

    pub fn add_move(&mut self, stock_move: StockMove) -> &mut Self {
        if let Some(purchase) = self
            .purchases
            .iter_mut()
            .find(|p| p.id == stock_move.purchase)
        {
            if !purchase.moves.contains(&stock_move.id) {
                purchase.moves.push(stock_move.id);
            }
        }
        self.moves.insert(stock_move.id, stock_move);
        self
    }

    pub fn add_lot(&mut self, lot: Lot) -> &mut Self {
        self.lots.push(lot);
        self
    }

    pub fn add_shipment(&mut self, shipment: Shipment) -> &mut Self {
        self.shipments.push(shipment);
        self
    }

    pub fn add_party(&mut self, identifier: impl Into<String>, party: PartyId) -> &mut Self {
        self.parties.insert(identifier.into(), party);
        self
    }
}

impl ProductLookup for InMemoryStore {
    fn product_by_code(&self, code: &str) -> Option<&Product> {
        self.products
            .iter()
            .find(|p| p.codes.iter().any(|c| c == code))
    }
}

impl PurchaseStore for InMemoryStore {
    fn purchase(&self, id: PurchaseId) -> Option<&Purchase> {
        self.purchases.iter().find(|p| p.id == id)
    }

    fn purchase_by_number(&self, number: &str) -> Option<&Purchase> {
        self.purchases.iter().find(|p| p.number == number)
    }

    fn purchases_by_alternate(&self, reference: &str) -> Vec<&Purchase> {
        self.purchases
            .iter()
            .filter(|p| p.alternate_reference.as_deref() == Some(reference))
            .collect()
    }

    fn stock_move(&self, id: MoveId) -> Option<&StockMove> {
        self.moves.get(&id)
    }
}

impl ShipmentStore for InMemoryStore {
    fn shipment_by_number(&self, number: &str) -> Option<&Shipment> {
        self.shipments.iter().find(|s| s.number == number)
    }
}

impl LotStore for InMemoryStore {
    fn lot_by_number(&self, number: &str, product: ProductId) -> Option<&Lot> {
        self.lots
            .iter()
            .find(|l| l.number == number && l.product == product)
    }
}

impl PartyLookup for InMemoryStore {
    fn party_by_identifier(&self, identifier: &str) -> Option<PartyId> {
        self.parties.get(identifier).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn store_with_purchase() -> InMemoryStore {
        let mut store = InMemoryStore::new();
        store.add_product(Product {
            id: ProductId(1),
            name: "Frozen peas 1kg".into(),
            codes: vec!["8412345678905".into()],
            lot_expiration: LotExpirationPolicy::Optional,
        });
        store.add_purchase(Purchase {
            id: PurchaseId(10),
            number: "PO-2024-001".into(),
            alternate_reference: Some("ALT-1".into()),
            moves: vec![],
        });
        store.add_move(StockMove {
            id: MoveId(100),
            purchase: PurchaseId(10),
            product: ProductId(1),
            pending_quantity: Decimal::from_str("24").unwrap(),
            planned_date: None,
            lot: None,
        });
        store
    }

    #[test]
    fn test_product_by_code() {
        let store = store_with_purchase();
        assert_eq!(
            store.product_by_code("8412345678905").map(|p| p.id),
            Some(ProductId(1))
        );
        assert!(store.product_by_code("0000000000000").is_none());
    }

    #[test]
    fn test_moves_attached_to_purchase() {
        let store = store_with_purchase();
        let moves = store.moves_of(PurchaseId(10));
        assert_eq!(moves.len(), 1);
        assert!(moves[0].is_pending());
    }

    #[test]
    fn test_alternate_reference_lookup() {
        let store = store_with_purchase();
        assert_eq!(store.purchases_by_alternate("ALT-1").len(), 1);
        assert!(store.purchases_by_alternate("ALT-2").is_empty());
    }

    #[test]
    fn test_lot_lookup_is_per_product() {
        let mut store = store_with_purchase();
        store.add_lot(Lot {
            id: LotId(7),
            number: "LOT-A".into(),
            product: ProductId(1),
            expiration_date: None,
        });
        assert!(store.lot_by_number("LOT-A", ProductId(1)).is_some());
        assert!(store.lot_by_number("LOT-A", ProductId(2)).is_none());
    }

    #[test]
    fn test_entity_id_display() {
        assert_eq!(MoveId(42).to_string(), "stock.move,42");
    }
}

//! Reconciliation engine
//!
//! Ties each decoded line to a pending stock movement on the document's
//! purchase order. The engine only decides; it emits `MoveBinding` values
//! and never mutates the stores. A movement is claimed at most once per
//! document: later lines for the same product fall back to duplicating a
//! template movement, matching a supplier splitting one order line across
//! several packages.

use crate::store::{LotExpirationPolicy, LotId, LotStore, MoveId, Product, ProductLookup, PurchaseId, PurchaseStore};
use chrono::NaiveDate;
use desadv_decoder::config::runtime::Strictness;
use desadv_decoder::document::{DocumentLine, ReferenceType, ShipmentDocument};
use desadv_decoder::logging::codes;
use desadv_decoder::utils::SegmentPos;
use desadv_decoder::{log_debug, log_error, log_success, log_warning};
use rust_decimal::Decimal;
use std::collections::HashSet;

/// Errors raised while reconciling
#[derive(Debug, Clone, thiserror::Error)]
pub enum ReconcileError {
    #[error("No product matches code '{code}' at {pos}")]
    UnresolvedProduct { code: String, pos: SegmentPos },

    #[error("No purchase reference resolved for document '{document}'")]
    MissingPurchaseReference { document: String },

    #[error("Purchase has no movement for product code '{code}' at {pos}")]
    NoMatchingMove { code: String, pos: SegmentPos },

    #[error("Line '{code}' carries no shipped quantity at {pos}")]
    MissingShippedQuantity { code: String, pos: SegmentPos },
}

impl ReconcileError {
    pub fn error_code(&self) -> desadv_decoder::logging::Code {
        match self {
            ReconcileError::UnresolvedProduct { .. } => codes::reconcile::UNRESOLVED_PRODUCT,
            ReconcileError::MissingPurchaseReference { .. } => codes::reference::MISSING_PURCHASE,
            ReconcileError::NoMatchingMove { .. } => codes::reconcile::LINE_FAILED,
            ReconcileError::MissingShippedQuantity { .. } => {
                codes::reconcile::MISSING_SHIPPED_QUANTITY
            }
        }
    }
}

/// One recorded per-line failure (permissive mode) or note
#[derive(Debug, Clone)]
pub struct LineError {
    pub line_code: String,
    pub pos: SegmentPos,
    pub error: ReconcileError,
}

/// What to do with the matched movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveAction {
    /// Bind the line to this pending movement
    Reuse(MoveId),
    /// Every matching movement is claimed or exhausted; clone this one
    Duplicate { template: MoveId },
}

/// What to do about the line's lot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LotAssignment {
    UseExisting(LotId),
    /// Pull the existing lot's expiration in; only when strictly earlier
    TightenExpiration { lot: LotId, expiration: NaiveDate },
    Create {
        number: String,
        expiration: Option<NaiveDate>,
    },
}

/// One reconciled line
#[derive(Debug, Clone)]
pub struct MoveBinding {
    /// Index of the line in `document.lines`
    pub line_index: usize,
    pub line_code: String,
    pub action: MoveAction,
    /// Shipped quantity (type 12), 4-digit scale
    pub quantity: Decimal,
    pub planned_date: Option<NaiveDate>,
    pub lot: Option<LotAssignment>,
}

/// Result of reconciling one document
#[derive(Debug, Clone, Default)]
pub struct ReconcileOutcome {
    pub bindings: Vec<MoveBinding>,
    pub errors: Vec<LineError>,
}

impl ReconcileOutcome {
    /// Whether every line produced a binding
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Reconciler for one strictness policy
pub struct Reconciler {
    strictness: Strictness,
}

impl Reconciler {
    pub fn new(strictness: Strictness) -> Self {
        Self { strictness }
    }

    /// Reconcile a resolved document against the stores.
    ///
    /// The document must have gone through reference resolution first; the
    /// target purchase is taken from the resolved header `ON` reference.
    pub fn reconcile<S>(
        &self,
        document: &ShipmentDocument,
        stores: &S,
    ) -> Result<ReconcileOutcome, ReconcileError>
    where
        S: ProductLookup + PurchaseStore + LotStore + ?Sized,
    {
        let purchase = self.target_purchase(document)?;
        let mut outcome = ReconcileOutcome::default();
        // Movements already bound by an earlier line of this document
        let mut claimed: HashSet<MoveId> = HashSet::new();

        for (line_index, line) in document.lines.iter().enumerate() {
            match self.reconcile_line(line_index, line, purchase, stores, &mut claimed) {
                Ok(Some(binding)) => outcome.bindings.push(binding),
                Ok(None) => {
                    // Valid but unusable: no shipped quantity
                    outcome.errors.push(LineError {
                        line_code: line.code.clone(),
                        pos: line.pos.clone(),
                        error: ReconcileError::MissingShippedQuantity {
                            code: line.code.clone(),
                            pos: line.pos.clone(),
                        },
                    });
                }
                Err(error) => {
                    log_error!(error.error_code(), "Line failed to reconcile",
                        pos = line.pos.clone(),
                        "code" => line.code);
                    match self.strictness {
                        Strictness::Strict => return Err(error),
                        Strictness::Permissive => outcome.errors.push(LineError {
                            line_code: line.code.clone(),
                            pos: line.pos.clone(),
                            error,
                        }),
                    }
                }
            }
        }

        log_success!(codes::success::RECONCILIATION_COMPLETE, "Reconciliation complete",
            "document" => document.number,
            "bindings" => outcome.bindings.len(),
            "errors" => outcome.errors.len());

        Ok(outcome)
    }

    /// The purchase the whole document reconciles against.
    ///
    /// Absence is fatal in both modes: without a purchase there is nothing
    /// to match any line against.
    fn target_purchase(&self, document: &ShipmentDocument) -> Result<PurchaseId, ReconcileError> {
        let resolved = document
            .resolved_reference(&ReferenceType::Purchase)
            .filter(|entity| entity.kind == PurchaseId::KIND);

        match resolved {
            Some(entity) => Ok(PurchaseId(entity.id)),
            None => {
                let error = ReconcileError::MissingPurchaseReference {
                    document: document.number.clone(),
                };
                log_error!(error.error_code(), "No resolved purchase reference",
                    "document" => document.number);
                Err(error)
            }
        }
    }

    /// Reconcile one line. `Ok(None)` means the line has no shipped
    /// quantity and is skipped without a binding.
    fn reconcile_line<S>(
        &self,
        line_index: usize,
        line: &DocumentLine,
        purchase: PurchaseId,
        stores: &S,
        claimed: &mut HashSet<MoveId>,
    ) -> Result<Option<MoveBinding>, ReconcileError>
    where
        S: ProductLookup + PurchaseStore + LotStore + ?Sized,
    {
        let product =
            stores
                .product_by_code(&line.code)
                .ok_or_else(|| ReconcileError::UnresolvedProduct {
                    code: line.code.clone(),
                    pos: line.pos.clone(),
                })?;

        let Some(shipped) = line.shipped_quantity() else {
            log_warning!("Line has no shipped quantity, skipped",
                "code" => line.code,
                "record" => line.pos.record);
            return Ok(None);
        };

        let matching: Vec<_> = stores
            .moves_of(purchase)
            .into_iter()
            .filter(|m| m.product == product.id)
            .collect();
        if matching.is_empty() {
            return Err(ReconcileError::NoMatchingMove {
                code: line.code.clone(),
                pos: line.pos.clone(),
            });
        }

        // First pending unclaimed movement wins, in purchase line order
        let action = match matching
            .iter()
            .find(|m| m.is_pending() && !claimed.contains(&m.id))
        {
            Some(reusable) => {
                claimed.insert(reusable.id);
                MoveAction::Reuse(reusable.id)
            }
            None => {
                log_debug!("All matching movements claimed, duplicating template",
                    "code" => line.code,
                    "template" => matching[0].id);
                MoveAction::Duplicate {
                    template: matching[0].id,
                }
            }
        };

        Ok(Some(MoveBinding {
            line_index,
            line_code: line.code.clone(),
            action,
            quantity: shipped.amount,
            planned_date: line.planned_date,
            lot: self.assign_lot(line, product, stores),
        }))
    }

    /// Decide the lot assignment for one line.
    ///
    /// The strict (legacy) path always creates a fresh lot when the line
    /// carries an expiration date. The permissive path reuses an existing
    /// lot by number, tightening its expiration only when the decoded date
    /// is strictly earlier and the product tracks expirations at all.
    fn assign_lot<S>(
        &self,
        line: &DocumentLine,
        product: &Product,
        stores: &S,
    ) -> Option<LotAssignment>
    where
        S: LotStore + ?Sized,
    {
        if self.strictness == Strictness::Strict {
            let expiration = line.expiration_date?;
            return Some(LotAssignment::Create {
                number: line.lot_number.clone().unwrap_or_else(default_lot_number),
                expiration: Some(expiration),
            });
        }

        if let Some(number) = &line.lot_number {
            if let Some(lot) = stores.lot_by_number(number, product.id) {
                if let (Some(decoded), Some(existing)) =
                    (line.expiration_date, lot.expiration_date)
                {
                    if decoded < existing
                        && product.lot_expiration != LotExpirationPolicy::None
                    {
                        return Some(LotAssignment::TightenExpiration {
                            lot: lot.id,
                            expiration: decoded,
                        });
                    }
                }
                return Some(LotAssignment::UseExisting(lot.id));
            }
            return Some(LotAssignment::Create {
                number: number.clone(),
                expiration: line.expiration_date,
            });
        }

        line.expiration_date.map(|expiration| LotAssignment::Create {
            number: default_lot_number(),
            expiration: Some(expiration),
        })
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(Strictness::default())
    }
}

/// Lot number used when the interchange carries none
fn default_lot_number() -> String {
    chrono::Local::now().date_naive().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::resolve_document;
    use crate::store::{InMemoryStore, Lot, LotId, Product, ProductId, Purchase, StockMove};
    use assert_matches::assert_matches;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn base_store() -> InMemoryStore {
        let mut store = InMemoryStore::new();
        store.add_product(Product {
            id: ProductId(1),
            name: "Frozen peas 1kg".into(),
            codes: vec!["8412345678905".into()],
            lot_expiration: LotExpirationPolicy::Optional,
        });
        store.add_purchase(Purchase {
            id: PurchaseId(10),
            number: "PO-1".into(),
            alternate_reference: None,
            moves: vec![],
        });
        store.add_move(StockMove {
            id: MoveId(100),
            purchase: PurchaseId(10),
            product: ProductId(1),
            pending_quantity: dec("24"),
            planned_date: NaiveDate::from_ymd_opt(2024, 1, 20),
            lot: None,
        });
        store
    }

    fn decode_and_resolve(source: &str, store: &InMemoryStore) -> ShipmentDocument {
        let mut document = desadv_decoder::decode_source(source, Default::default())
            .unwrap()
            .document()
            .unwrap()
            .document;
        resolve_document(&mut document, store);
        document
    }

    const BASE: &str = "DESADV_D_96A_UN_EAN005\n\
                        BGM|REF123|351|9\n\
                        RFF|ON|PO-1\n\
                        LIN|8412345678905|EN|1\n\
                        QTYLIN|12|10.5|KGM\n";

    #[test]
    fn test_reuse_pending_move() {
        let store = base_store();
        let document = decode_and_resolve(BASE, &store);

        let outcome = Reconciler::default().reconcile(&document, &store).unwrap();
        assert!(outcome.is_complete());
        assert_eq!(outcome.bindings.len(), 1);

        let binding = &outcome.bindings[0];
        assert_eq!(binding.action, MoveAction::Reuse(MoveId(100)));
        assert_eq!(binding.quantity, dec("10.5000"));
        assert_eq!(binding.lot, None);
    }

    #[test]
    fn test_second_line_duplicates_claimed_move() {
        let store = base_store();
        let source = "DESADV_D_96A_UN_EAN005\n\
                      BGM|REF123|351|9\n\
                      RFF|ON|PO-1\n\
                      LIN|8412345678905|EN|1\n\
                      QTYLIN|12|10|KGM\n\
                      LIN|8412345678905|EN|2\n\
                      QTYLIN|12|14|KGM\n";
        let document = decode_and_resolve(source, &store);

        let outcome = Reconciler::default().reconcile(&document, &store).unwrap();
        assert_eq!(outcome.bindings.len(), 2);
        assert_eq!(outcome.bindings[0].action, MoveAction::Reuse(MoveId(100)));
        assert_eq!(
            outcome.bindings[1].action,
            MoveAction::Duplicate {
                template: MoveId(100)
            }
        );
    }

    #[test]
    fn test_missing_purchase_reference_is_fatal() {
        let store = base_store();
        let source = "DESADV_D_96A_UN_EAN005\n\
                      BGM|REF123|351|9\n\
                      LIN|8412345678905|EN|1\n\
                      QTYLIN|12|10|KGM\n";
        let document = decode_and_resolve(source, &store);

        for strictness in [Strictness::Strict, Strictness::Permissive] {
            let err = Reconciler::new(strictness)
                .reconcile(&document, &store)
                .unwrap_err();
            assert_matches!(err, ReconcileError::MissingPurchaseReference { .. });
            assert_eq!(err.error_code().as_str(), "E051");
        }
    }

    #[test]
    fn test_unresolved_product_strict_vs_permissive() {
        let store = base_store();
        let source = "DESADV_D_96A_UN_EAN005\n\
                      BGM|REF123|351|9\n\
                      RFF|ON|PO-1\n\
                      LIN|4006381333931|EN|1\n\
                      QTYLIN|12|2|PCE\n\
                      LIN|8412345678905|EN|2\n\
                      QTYLIN|12|10|KGM\n";
        let document = decode_and_resolve(source, &store);

        let err = Reconciler::new(Strictness::Strict)
            .reconcile(&document, &store)
            .unwrap_err();
        assert_matches!(err, ReconcileError::UnresolvedProduct { .. });

        let outcome = Reconciler::new(Strictness::Permissive)
            .reconcile(&document, &store)
            .unwrap();
        assert_eq!(outcome.errors.len(), 1);
        assert_matches!(
            outcome.errors[0].error,
            ReconcileError::UnresolvedProduct { .. }
        );
        // The good line still reconciles
        assert_eq!(outcome.bindings.len(), 1);
        assert_eq!(outcome.bindings[0].line_index, 1);
    }

    #[test]
    fn test_line_without_shipped_quantity_is_skipped() {
        let store = base_store();
        let source = "DESADV_D_96A_UN_EAN005\n\
                      BGM|REF123|351|9\n\
                      RFF|ON|PO-1\n\
                      LIN|8412345678905|EN|1\n\
                      QTYLIN|59|6|PCE\n";
        let document = decode_and_resolve(source, &store);

        let outcome = Reconciler::default().reconcile(&document, &store).unwrap();
        assert!(outcome.bindings.is_empty());
        assert_eq!(outcome.errors.len(), 1);
        assert_matches!(
            outcome.errors[0].error,
            ReconcileError::MissingShippedQuantity { .. }
        );
    }

    #[test]
    fn test_no_matching_move() {
        let mut store = base_store();
        store.add_product(Product {
            id: ProductId(2),
            name: "Olive oil 1l".into(),
            codes: vec!["4006381333931".into()],
            lot_expiration: LotExpirationPolicy::None,
        });
        let source = "DESADV_D_96A_UN_EAN005\n\
                      BGM|REF123|351|9\n\
                      RFF|ON|PO-1\n\
                      LIN|4006381333931|EN|1\n\
                      QTYLIN|12|2|PCE\n";
        let document = decode_and_resolve(source, &store);

        let outcome = Reconciler::new(Strictness::Permissive)
            .reconcile(&document, &store)
            .unwrap();
        assert_matches!(
            outcome.errors[0].error,
            ReconcileError::NoMatchingMove { .. }
        );
    }

    #[test]
    fn test_lot_created_for_unknown_number() {
        let store = base_store();
        let source = "DESADV_D_96A_UN_EAN005\n\
                      BGM|REF123|351|9\n\
                      RFF|ON|PO-1\n\
                      LIN|8412345678905|EN|1\n\
                      PCILIN|36E|20250101||LOT-NEW\n\
                      QTYLIN|12|10|KGM\n";
        let document = decode_and_resolve(source, &store);

        let outcome = Reconciler::new(Strictness::Permissive)
            .reconcile(&document, &store)
            .unwrap();
        assert_eq!(
            outcome.bindings[0].lot,
            Some(LotAssignment::Create {
                number: "LOT-NEW".into(),
                expiration: NaiveDate::from_ymd_opt(2025, 1, 1),
            })
        );
    }

    #[test]
    fn test_lot_tightened_when_strictly_earlier() {
        let mut store = base_store();
        store.add_lot(Lot {
            id: LotId(7),
            number: "LOT-A".into(),
            product: ProductId(1),
            expiration_date: NaiveDate::from_ymd_opt(2025, 6, 1),
        });
        let source = "DESADV_D_96A_UN_EAN005\n\
                      BGM|REF123|351|9\n\
                      RFF|ON|PO-1\n\
                      LIN|8412345678905|EN|1\n\
                      PCILIN|36E|20250101||LOT-A\n\
                      QTYLIN|12|10|KGM\n";
        let document = decode_and_resolve(source, &store);

        let outcome = Reconciler::new(Strictness::Permissive)
            .reconcile(&document, &store)
            .unwrap();
        assert_eq!(
            outcome.bindings[0].lot,
            Some(LotAssignment::TightenExpiration {
                lot: LotId(7),
                expiration: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            })
        );
    }

    #[test]
    fn test_lot_not_tightened_when_later_or_equal() {
        let mut store = base_store();
        store.add_lot(Lot {
            id: LotId(7),
            number: "LOT-A".into(),
            product: ProductId(1),
            expiration_date: NaiveDate::from_ymd_opt(2025, 1, 1),
        });
        let source = "DESADV_D_96A_UN_EAN005\n\
                      BGM|REF123|351|9\n\
                      RFF|ON|PO-1\n\
                      LIN|8412345678905|EN|1\n\
                      PCILIN|36E|20250101||LOT-A\n\
                      QTYLIN|12|10|KGM\n";
        let document = decode_and_resolve(source, &store);

        let outcome = Reconciler::new(Strictness::Permissive)
            .reconcile(&document, &store)
            .unwrap();
        assert_eq!(
            outcome.bindings[0].lot,
            Some(LotAssignment::UseExisting(LotId(7)))
        );
    }

    #[test]
    fn test_lot_tightening_ignored_when_policy_is_none() {
        let mut store = InMemoryStore::new();
        store.add_product(Product {
            id: ProductId(1),
            name: "Canned corn".into(),
            codes: vec!["8412345678905".into()],
            lot_expiration: LotExpirationPolicy::None,
        });
        store.add_purchase(Purchase {
            id: PurchaseId(10),
            number: "PO-1".into(),
            alternate_reference: None,
            moves: vec![],
        });
        store.add_move(StockMove {
            id: MoveId(100),
            purchase: PurchaseId(10),
            product: ProductId(1),
            pending_quantity: dec("24"),
            planned_date: None,
            lot: None,
        });
        store.add_lot(Lot {
            id: LotId(7),
            number: "LOT-A".into(),
            product: ProductId(1),
            expiration_date: NaiveDate::from_ymd_opt(2025, 6, 1),
        });

        let source = "DESADV_D_96A_UN_EAN005\n\
                      BGM|REF123|351|9\n\
                      RFF|ON|PO-1\n\
                      LIN|8412345678905|EN|1\n\
                      PCILIN|36E|20250101||LOT-A\n\
                      QTYLIN|12|10|KGM\n";
        let document = decode_and_resolve(source, &store);

        let outcome = Reconciler::new(Strictness::Permissive)
            .reconcile(&document, &store)
            .unwrap();
        assert_eq!(
            outcome.bindings[0].lot,
            Some(LotAssignment::UseExisting(LotId(7)))
        );
    }

    #[test]
    fn test_strict_always_creates_fresh_lot() {
        let mut store = base_store();
        store.add_lot(Lot {
            id: LotId(7),
            number: "LOT-A".into(),
            product: ProductId(1),
            expiration_date: NaiveDate::from_ymd_opt(2025, 6, 1),
        });
        let source = "DESADV_D_96A_UN_EAN005\n\
                      BGM|REF123|351|9\n\
                      RFF|ON|PO-1\n\
                      LIN|8412345678905|EN|1\n\
                      PCILIN|36E|20250101||LOT-A\n\
                      QTYLIN|12|10|KGM\n";
        let document = decode_and_resolve(source, &store);

        let outcome = Reconciler::new(Strictness::Strict)
            .reconcile(&document, &store)
            .unwrap();
        assert_matches!(
            outcome.bindings[0].lot,
            Some(LotAssignment::Create { ref number, .. }) if number == "LOT-A"
        );
    }

    #[test]
    fn test_planned_date_comes_from_line() {
        let store = base_store();
        let source = "DESADV_D_96A_UN_EAN005\n\
                      BGM|REF123|351|9\n\
                      RFF|ON|PO-1\n\
                      LIN|8412345678905|EN|1\n\
                      DTMLIN|20240117\n\
                      QTYLIN|12|10|KGM\n";
        let document = decode_and_resolve(source, &store);

        let outcome = Reconciler::default().reconcile(&document, &store).unwrap();
        assert_eq!(
            outcome.bindings[0].planned_date,
            NaiveDate::from_ymd_opt(2024, 1, 17)
        );
    }

    #[test]
    fn test_exhausted_pending_falls_back_to_duplicate() {
        let mut store = InMemoryStore::new();
        store.add_product(Product {
            id: ProductId(1),
            name: "Frozen peas 1kg".into(),
            codes: vec!["8412345678905".into()],
            lot_expiration: LotExpirationPolicy::Optional,
        });
        store.add_purchase(Purchase {
            id: PurchaseId(10),
            number: "PO-1".into(),
            alternate_reference: None,
            moves: vec![],
        });
        // Fully received already: pending quantity is zero
        store.add_move(StockMove {
            id: MoveId(100),
            purchase: PurchaseId(10),
            product: ProductId(1),
            pending_quantity: Decimal::ZERO,
            planned_date: None,
            lot: None,
        });

        let document = decode_and_resolve(BASE, &store);
        let outcome = Reconciler::default().reconcile(&document, &store).unwrap();
        assert_eq!(
            outcome.bindings[0].action,
            MoveAction::Duplicate {
                template: MoveId(100)
            }
        );
    }
}

//! Reference resolution
//!
//! Fills `Reference::resolved` on a decoded document by looking references
//! up in the stores. Resolution never fails: a reference that matches
//! nothing stays unresolved and reconciliation decides whether that is
//! fatal. Only shipment (DQ) and purchase (ON) references trigger lookups.

use crate::store::{PartyLookup, PurchaseId, PurchaseStore, ShipmentId, ShipmentStore};
use desadv_decoder::document::{EntityRef, Reference, ReferenceType, ShipmentDocument};
use desadv_decoder::logging::codes;
use desadv_decoder::{log_debug, log_success, log_warning};

/// Resolve one reference in place.
///
/// Purchase references fall back to the alternate-reference lookup when the
/// number lookup finds nothing; the fallback is accepted only when it is
/// unique. An ambiguous fallback resolves to not-found.
pub fn resolve_reference<S>(reference: &mut Reference, stores: &S)
where
    S: PurchaseStore + ShipmentStore + ?Sized,
{
    reference.resolved = match reference.type_code {
        ReferenceType::Shipment => stores
            .shipment_by_number(&reference.value)
            .map(|shipment| EntityRef::new(ShipmentId::KIND, shipment.id.0)),

        ReferenceType::Purchase => resolve_purchase(&reference.value, stores),

        _ => {
            log_debug!("Reference type takes no lookup",
                "type" => reference.type_code.as_str());
            return;
        }
    };
}

fn resolve_purchase<S>(value: &str, stores: &S) -> Option<EntityRef>
where
    S: PurchaseStore + ?Sized,
{
    if let Some(purchase) = stores.purchase_by_number(value) {
        return Some(EntityRef::new(PurchaseId::KIND, purchase.id.0));
    }

    let candidates = stores.purchases_by_alternate(value);
    match candidates.as_slice() {
        [purchase] => Some(EntityRef::new(PurchaseId::KIND, purchase.id.0)),
        [] => None,
        _ => {
            log_warning!("Alternate purchase reference is ambiguous",
                "reference" => value,
                "matches" => candidates.len(),
                "code" => codes::reference::AMBIGUOUS_FALLBACK);
            None
        }
    }
}

/// Resolve every reference and supplier party on the document in place.
pub fn resolve_document<S>(document: &mut ShipmentDocument, stores: &S)
where
    S: PurchaseStore + ShipmentStore + PartyLookup + ?Sized,
{
    for reference in &mut document.references {
        resolve_reference(reference, stores);
    }
    for line in &mut document.lines {
        for reference in &mut line.references {
            resolve_reference(reference, stores);
        }
    }
    for supplier in &mut document.suppliers {
        supplier.party = stores
            .party_by_identifier(&supplier.identifier)
            .map(|party| party.0);
    }

    let resolved = document
        .references
        .iter()
        .chain(document.lines.iter().flat_map(|l| l.references.iter()))
        .filter(|r| r.resolved.is_some())
        .count();

    log_success!(codes::success::REFERENCES_RESOLVED, "References resolved",
        "document" => document.number,
        "resolved" => resolved);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryStore, PartyId, Purchase, Shipment};

    fn stores() -> InMemoryStore {
        let mut store = InMemoryStore::new();
        store.add_purchase(Purchase {
            id: PurchaseId(10),
            number: "PO-1".into(),
            alternate_reference: Some("ALT-1".into()),
            moves: vec![],
        });
        store.add_purchase(Purchase {
            id: PurchaseId(11),
            number: "PO-2".into(),
            alternate_reference: Some("ALT-DUP".into()),
            moves: vec![],
        });
        store.add_purchase(Purchase {
            id: PurchaseId(12),
            number: "PO-3".into(),
            alternate_reference: Some("ALT-DUP".into()),
            moves: vec![],
        });
        store.add_shipment(Shipment {
            id: ShipmentId(5),
            number: "SHIP-9".into(),
        });
        store.add_party("5412345000013", PartyId(77));
        store
    }

    #[test]
    fn test_purchase_by_number() {
        let mut reference = Reference::new(ReferenceType::Purchase, "PO-1");
        resolve_reference(&mut reference, &stores());
        assert_eq!(reference.resolved, Some(EntityRef::new("purchase", 10)));
    }

    #[test]
    fn test_purchase_alternate_fallback_unique() {
        let mut reference = Reference::new(ReferenceType::Purchase, "ALT-1");
        resolve_reference(&mut reference, &stores());
        assert_eq!(reference.resolved, Some(EntityRef::new("purchase", 10)));
    }

    #[test]
    fn test_ambiguous_fallback_is_not_found() {
        let mut reference = Reference::new(ReferenceType::Purchase, "ALT-DUP");
        resolve_reference(&mut reference, &stores());
        assert_eq!(reference.resolved, None);
    }

    #[test]
    fn test_shipment_lookup() {
        let mut reference = Reference::new(ReferenceType::Shipment, "SHIP-9");
        resolve_reference(&mut reference, &stores());
        assert_eq!(
            reference.resolved,
            Some(EntityRef::new("stock.shipment", 5))
        );
    }

    #[test]
    fn test_other_types_not_looked_up() {
        let mut reference = Reference::new(ReferenceType::Vendor, "PO-1");
        resolve_reference(&mut reference, &stores());
        assert_eq!(reference.resolved, None);
    }

    #[test]
    fn test_resolve_document_fills_parties() {
        let source = "DESADV_D_96A_UN_EAN005\n\
                      BGM|REF1|351|9\n\
                      RFF|ON|PO-1\n\
                      NADSU|5412345000013\n";
        let mut document = desadv_decoder::decode_source(source, Default::default())
            .unwrap()
            .document()
            .unwrap()
            .document;

        resolve_document(&mut document, &stores());
        assert!(document.references[0].resolved.is_some());
        assert_eq!(document.suppliers[0].party, Some(77));
    }
}

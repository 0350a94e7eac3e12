//! Entity types for a decoded DESADV document

use crate::utils::SegmentPos;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// CODE CLASSIFICATION
// ============================================================================

/// Classification of a line's product code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CodeType {
    Ean8,
    Ean13,
    Ean14,
    Dun14,
    /// Generic EAN: valid checksum at a non-standard length
    En,
    Unknown,
}

impl CodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeType::Ean8 => "EAN8",
            CodeType::Ean13 => "EAN13",
            CodeType::Ean14 => "EAN14",
            CodeType::Dun14 => "DUN14",
            CodeType::En => "EN",
            CodeType::Unknown => "UNKNOWN",
        }
    }
}

// ============================================================================
// DOCUMENT HEADER TYPES
// ============================================================================

/// BGM document type code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    /// Code 351: expedition advice
    ExpeditionAdvice,
    /// Any other code, preserved as received
    Other(String),
}

impl DocumentType {
    pub fn from_wire(code: &str) -> Self {
        match code {
            "351" => DocumentType::ExpeditionAdvice,
            other => DocumentType::Other(other.to_string()),
        }
    }
}

/// BGM message function code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FunctionCode {
    /// Code 9: original transmission
    Original,
    /// Code 31: copy
    Copy,
    /// Any other code, preserved as received
    Other(String),
}

impl FunctionCode {
    pub fn from_wire(code: &str) -> Self {
        match code {
            "9" => FunctionCode::Original,
            "31" => FunctionCode::Copy,
            other => FunctionCode::Other(other.to_string()),
        }
    }
}

// ============================================================================
// REFERENCES
// ============================================================================

/// Reference qualifier from RFF segments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceType {
    /// DQ: shipment (despatch advice) number
    Shipment,
    /// ON: purchase order number
    Purchase,
    /// LI: line number
    LineNumber,
    /// VN: vendor reference
    Vendor,
    /// Internal move reference
    Move,
    Other(String),
}

impl ReferenceType {
    pub fn from_wire(qualifier: &str) -> Self {
        match qualifier {
            "DQ" => ReferenceType::Shipment,
            "ON" => ReferenceType::Purchase,
            "LI" => ReferenceType::LineNumber,
            "VN" => ReferenceType::Vendor,
            other => ReferenceType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ReferenceType::Shipment => "DQ",
            ReferenceType::Purchase => "ON",
            ReferenceType::LineNumber => "LI",
            ReferenceType::Vendor => "VN",
            ReferenceType::Move => "MOVE",
            ReferenceType::Other(s) => s,
        }
    }
}

/// Resolved target of a reference: the kind of entity plus its id.
///
/// Ids are opaque to the decoder; the resolver fills them from its stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: String,
    pub id: u64,
}

impl EntityRef {
    pub fn new(kind: impl Into<String>, id: u64) -> Self {
        Self {
            kind: kind.into(),
            id,
        }
    }
}

/// A business reference carried by the document or a line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub type_code: ReferenceType,
    pub value: String,
    pub reference_date: Option<NaiveDate>,
    /// Filled by the resolver; `None` means not found (or not looked up)
    pub resolved: Option<EntityRef>,
}

impl Reference {
    pub fn new(type_code: ReferenceType, value: impl Into<String>) -> Self {
        Self {
            type_code,
            value: value.into(),
            reference_date: None,
            resolved: None,
        }
    }

    pub fn with_date(mut self, date: Option<NaiveDate>) -> Self {
        self.reference_date = date;
        self
    }
}

// ============================================================================
// QUANTITIES
// ============================================================================

/// Quantity type code meaning "shipped quantity"
pub const QUANTITY_TYPE_SHIPPED: &str = "12";

/// A typed quantity from QTYLIN or QVRLIN
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quantity {
    /// Wire type code; `"12"` is the shipped quantity
    pub type_code: String,
    pub amount: Decimal,
    pub unit: Option<String>,
    /// QVRLIN difference qualifier: `BP` partial, `CP` partial-but-complete
    pub difference: Option<String>,
}

impl Quantity {
    pub fn is_shipped(&self) -> bool {
        self.type_code == QUANTITY_TYPE_SHIPPED
    }
}

// ============================================================================
// PARTIES
// ============================================================================

/// A party from a NAD-family segment (NADSU, NADBY, NADDP, NADMR)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierParty {
    /// The NAD tag that introduced this party
    pub qualifier: String,
    /// Party identifier as transmitted
    pub identifier: String,
    /// Filled by the party lookup; `None` means unknown party
    pub party: Option<u64>,
}

// ============================================================================
// LINES
// ============================================================================

/// One despatch line (a LIN group)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentLine {
    pub code: String,
    pub code_type: CodeType,
    pub line_number: Option<u32>,
    pub description: Option<String>,
    /// IMDLIN codification qualifier for the description
    pub description_type: Option<String>,
    /// IMDLIN consumer/despatch unit code (`CU`/`DU`)
    pub description_code: Option<String>,
    pub lot_number: Option<String>,
    pub expiration_date: Option<NaiveDate>,
    pub packing_date: Option<NaiveDate>,
    /// DTMLIN planned (delivery) date
    pub planned_date: Option<NaiveDate>,
    /// PIALIN purchaser's article code
    pub purchaser_code: Option<String>,
    /// PIALIN supplier's article code
    pub supplier_code: Option<String>,
    /// PIALIN serial number
    pub serial_number: Option<String>,
    /// PCILIN marking instructions
    pub marking_instructions: Option<String>,
    pub quantities: Vec<Quantity>,
    pub references: Vec<Reference>,
    /// Position of the opening LIN segment
    pub pos: SegmentPos,
}

impl DocumentLine {
    /// The shipped quantity (type 12), if the line carries one
    pub fn shipped_quantity(&self) -> Option<&Quantity> {
        self.quantities.iter().find(|q| q.is_shipped())
    }

    /// Line references of a given type
    pub fn references_of<'a>(
        &'a self,
        type_code: &'a ReferenceType,
    ) -> impl Iterator<Item = &'a Reference> + 'a {
        self.references
            .iter()
            .filter(move |r| &r.type_code == type_code)
    }
}

// ============================================================================
// DOCUMENT
// ============================================================================

/// A fully assembled despatch-advice document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentDocument {
    /// BGM document number
    pub number: String,
    pub document_type: DocumentType,
    pub function_code: FunctionCode,
    pub expedition_date: Option<NaiveDate>,
    pub estimated_date: Option<NaiveDate>,
    pub lines: Vec<DocumentLine>,
    /// Header-level references
    pub references: Vec<Reference>,
    pub suppliers: Vec<SupplierParty>,
}

impl ShipmentDocument {
    /// Header references of a given type
    pub fn references_of<'a>(
        &'a self,
        type_code: &'a ReferenceType,
    ) -> impl Iterator<Item = &'a Reference> + 'a {
        self.references
            .iter()
            .filter(move |r| &r.type_code == type_code)
    }

    /// First resolved header reference of a given type
    pub fn resolved_reference<'a>(
        &'a self,
        type_code: &'a ReferenceType,
    ) -> Option<&'a EntityRef> {
        self.references_of(type_code)
            .find_map(|r| r.resolved.as_ref())
    }
}

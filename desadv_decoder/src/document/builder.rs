//! Builders used by the assembler while walking the segment stream

use super::model::{
    CodeType, DocumentLine, DocumentType, FunctionCode, Quantity, Reference, ShipmentDocument,
    SupplierParty,
};
use crate::utils::SegmentPos;
use chrono::NaiveDate;

/// Accumulates header fields; created when the BGM segment is seen
#[derive(Debug, Clone)]
pub struct HeaderBuilder {
    number: String,
    document_type: DocumentType,
    function_code: FunctionCode,
    expedition_date: Option<NaiveDate>,
    estimated_date: Option<NaiveDate>,
    references: Vec<Reference>,
    suppliers: Vec<SupplierParty>,
}

impl HeaderBuilder {
    pub fn new(number: impl Into<String>, document_type: DocumentType, function_code: FunctionCode) -> Self {
        Self {
            number: number.into(),
            document_type,
            function_code,
            expedition_date: None,
            estimated_date: None,
            references: Vec::new(),
            suppliers: Vec::new(),
        }
    }

    pub fn set_expedition_date(&mut self, date: Option<NaiveDate>) {
        self.expedition_date = date;
    }

    pub fn set_estimated_date(&mut self, date: Option<NaiveDate>) {
        self.estimated_date = date;
    }

    pub fn add_reference(&mut self, reference: Reference) {
        self.references.push(reference);
    }

    pub fn add_supplier(&mut self, supplier: SupplierParty) {
        self.suppliers.push(supplier);
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    /// Finalize into a document with the given lines
    pub fn build(self, lines: Vec<DocumentLine>) -> ShipmentDocument {
        ShipmentDocument {
            number: self.number,
            document_type: self.document_type,
            function_code: self.function_code,
            expedition_date: self.expedition_date,
            estimated_date: self.estimated_date,
            lines,
            references: self.references,
            suppliers: self.suppliers,
        }
    }
}

/// Accumulates one line group; created when a LIN segment is seen
#[derive(Debug, Clone)]
pub struct LineBuilder {
    code: String,
    code_type: CodeType,
    line_number: Option<u32>,
    description: Option<String>,
    description_type: Option<String>,
    description_code: Option<String>,
    lot_number: Option<String>,
    expiration_date: Option<NaiveDate>,
    packing_date: Option<NaiveDate>,
    planned_date: Option<NaiveDate>,
    purchaser_code: Option<String>,
    supplier_code: Option<String>,
    serial_number: Option<String>,
    marking_instructions: Option<String>,
    quantities: Vec<Quantity>,
    references: Vec<Reference>,
    pos: SegmentPos,
}

impl LineBuilder {
    pub fn new(
        code: impl Into<String>,
        code_type: CodeType,
        line_number: Option<u32>,
        pos: SegmentPos,
    ) -> Self {
        Self {
            code: code.into(),
            code_type,
            line_number,
            description: None,
            description_type: None,
            description_code: None,
            lot_number: None,
            expiration_date: None,
            packing_date: None,
            planned_date: None,
            purchaser_code: None,
            supplier_code: None,
            serial_number: None,
            marking_instructions: None,
            quantities: Vec::new(),
            references: Vec::new(),
            pos,
        }
    }

    pub fn set_description(
        &mut self,
        description: Option<String>,
        codification: Option<String>,
        unit_code: Option<String>,
    ) {
        self.description = description;
        self.description_type = codification;
        self.description_code = unit_code;
    }

    pub fn set_lot_number(&mut self, lot_number: Option<String>) {
        self.lot_number = lot_number;
    }

    pub fn set_expiration_date(&mut self, date: Option<NaiveDate>) {
        self.expiration_date = date;
    }

    pub fn set_packing_date(&mut self, date: Option<NaiveDate>) {
        self.packing_date = date;
    }

    pub fn set_planned_date(&mut self, date: Option<NaiveDate>) {
        self.planned_date = date;
    }

    pub fn set_purchaser_code(&mut self, code: Option<String>) {
        self.purchaser_code = code;
    }

    pub fn set_supplier_code(&mut self, code: Option<String>) {
        self.supplier_code = code;
    }

    pub fn set_serial_number(&mut self, serial: Option<String>) {
        self.serial_number = serial;
    }

    pub fn set_marking_instructions(&mut self, marking: Option<String>) {
        self.marking_instructions = marking;
    }

    pub fn add_quantity(&mut self, quantity: Quantity) {
        self.quantities.push(quantity);
    }

    pub fn add_reference(&mut self, reference: Reference) {
        self.references.push(reference);
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn pos(&self) -> &SegmentPos {
        &self.pos
    }

    pub fn build(self) -> DocumentLine {
        DocumentLine {
            code: self.code,
            code_type: self.code_type,
            line_number: self.line_number,
            description: self.description,
            description_type: self.description_type,
            description_code: self.description_code,
            lot_number: self.lot_number,
            expiration_date: self.expiration_date,
            packing_date: self.packing_date,
            planned_date: self.planned_date,
            purchaser_code: self.purchaser_code,
            supplier_code: self.supplier_code,
            serial_number: self.serial_number,
            marking_instructions: self.marking_instructions,
            quantities: self.quantities,
            references: self.references,
            pos: self.pos,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::model::ReferenceType;
    use rust_decimal::Decimal;

    #[test]
    fn test_header_builder() {
        let mut header = HeaderBuilder::new(
            "DESADV-1001",
            DocumentType::ExpeditionAdvice,
            FunctionCode::Original,
        );
        header.set_expedition_date(NaiveDate::from_ymd_opt(2024, 1, 15));
        header.add_reference(Reference::new(ReferenceType::Purchase, "PO-77"));

        let doc = header.build(vec![]);
        assert_eq!(doc.number, "DESADV-1001");
        assert_eq!(doc.document_type, DocumentType::ExpeditionAdvice);
        assert_eq!(doc.references.len(), 1);
        assert!(doc.lines.is_empty());
    }

    #[test]
    fn test_line_builder() {
        let mut line = LineBuilder::new(
            "8412345678905",
            CodeType::Ean13,
            Some(1),
            SegmentPos::new(4, "LIN"),
        );
        line.set_lot_number(Some("LOT-9".into()));
        line.add_quantity(Quantity {
            type_code: "12".into(),
            amount: Decimal::new(105, 1),
            unit: Some("KGM".into()),
            difference: None,
        });

        let built = line.build();
        assert_eq!(built.code, "8412345678905");
        assert_eq!(built.lot_number.as_deref(), Some("LOT-9"));
        assert!(built.shipped_quantity().is_some());
    }
}

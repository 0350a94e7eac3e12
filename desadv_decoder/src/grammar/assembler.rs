//! Assembler: walks the segment stream and builds the document
//!
//! Dispatch mirrors the wire grammar: one BGM opens the header, LIN opens a
//! line group, line-scoped tags feed the open group until the next LIN.
//! Strictness decides what a line-local error costs: `Strict` abandons the
//! document, `Permissive` drops the offending line group and keeps going.

use super::tags::{segment_role, SegmentRole};
use super::GrammarError;
use crate::config::constants::compile_time::grammar::{
    MAX_LINE_GROUPS, MAX_LINE_GROUP_ERRORS,
};
use crate::config::runtime::Strictness;
use crate::decode::{classify_code, decode_date, decode_decimal_or_zero, QUANTITY_SCALE};
use crate::document::{
    HeaderBuilder, LineBuilder, DocumentType, FunctionCode, Quantity, Reference, ReferenceType,
    ShipmentDocument, SupplierParty,
};
use crate::logging::codes;
use crate::segments::{RawSegment, SegmentStream};
use crate::utils::SegmentPos;
use crate::{log_debug, log_error, log_success, log_warning};
use chrono::NaiveDate;

/// One dropped line group, recorded in permissive mode
#[derive(Debug, Clone)]
pub struct LineGroupError {
    /// Product code of the dropped line group
    pub line_code: String,
    /// Position of the segment that failed
    pub pos: SegmentPos,
    pub error: GrammarError,
}

/// An assembled document plus the line groups that did not survive
#[derive(Debug, Clone)]
pub struct AssembledDocument {
    pub document: ShipmentDocument,
    /// Empty in strict mode; strict aborts instead of collecting
    pub line_errors: Vec<LineGroupError>,
}

/// Document assembler for one strictness policy
pub struct Assembler {
    strictness: Strictness,
}

impl Assembler {
    pub fn new(strictness: Strictness) -> Self {
        Self { strictness }
    }

    /// Assemble the stream into a document.
    ///
    /// The stream is consumed from its current position to the end.
    pub fn assemble(&self, stream: &mut SegmentStream) -> Result<AssembledDocument, GrammarError> {
        let mut header: Option<HeaderBuilder> = None;
        let mut lines = Vec::new();
        let mut current: Option<LineBuilder> = None;
        let mut line_errors: Vec<LineGroupError> = Vec::new();
        // Set after a line group is dropped; its remaining segments are
        // ignored until the next LIN
        let mut skipping = false;
        let mut line_group_count = 0usize;

        while let Some(segment) = stream.current().cloned() {
            stream.advance();
            let role = segment_role(&segment.tag);

            log_debug!("Dispatching segment", "tag" => segment.tag, "record" => segment.pos.record);

            match role {
                SegmentRole::HeaderStart => {
                    if header.is_some() {
                        let error = GrammarError::DuplicateHeader {
                            pos: segment.pos.clone(),
                        };
                        log_error!(error.error_code(), "Duplicate BGM header",
                            pos = segment.pos.clone());
                        return Err(error);
                    }
                    header = Some(read_bgm(&segment)?);
                }

                SegmentRole::HeaderDates => {
                    let header = open_header(&mut header, &segment)?;
                    read_dtm(header, &segment)?;
                }

                SegmentRole::HeaderReference => {
                    let header = open_header(&mut header, &segment)?;
                    read_rff(header, &segment)?;
                }

                SegmentRole::Supplier => {
                    let header = open_header(&mut header, &segment)?;
                    header.add_supplier(read_supplier(&segment)?);
                }

                SegmentRole::PartyIgnored => {
                    log_debug!("Skipping party segment", "tag" => segment.tag);
                }

                SegmentRole::HeaderNoOp => {
                    open_header(&mut header, &segment)?;
                }

                SegmentRole::LineStart => {
                    if header.is_none() {
                        let error = GrammarError::SegmentBeforeHeader {
                            tag: segment.tag.clone(),
                            pos: segment.pos.clone(),
                        };
                        log_error!(error.error_code(), "LIN before BGM header",
                            pos = segment.pos.clone());
                        return Err(error);
                    }

                    if let Some(finished) = current.take() {
                        lines.push(finished.build());
                    }
                    skipping = false;

                    line_group_count += 1;
                    if line_group_count > MAX_LINE_GROUPS {
                        let error = GrammarError::TooManyLineGroups {
                            count: line_group_count,
                        };
                        log_error!(error.error_code(), "Line group limit exceeded",
                            "count" => line_group_count,
                            "limit" => MAX_LINE_GROUPS);
                        return Err(error);
                    }

                    current = Some(read_lin(&segment)?);
                }

                role if role.is_line_scoped() => {
                    if skipping {
                        continue;
                    }
                    let Some(line) = current.as_mut() else {
                        let error = GrammarError::MisplacedLineSegment {
                            tag: segment.tag.clone(),
                            pos: segment.pos.clone(),
                        };
                        log_error!(error.error_code(), "Line segment with no open line group",
                            pos = segment.pos.clone());
                        return Err(error);
                    };

                    if let Err(error) = read_line_segment(line, role, &segment) {
                        match self.strictness {
                            Strictness::Strict => {
                                log_error!(error.error_code(), "Line segment failed",
                                    pos = segment.pos.clone());
                                return Err(error);
                            }
                            Strictness::Permissive if error.is_line_local() => {
                                if line_errors.len() >= MAX_LINE_GROUP_ERRORS {
                                    log_error!(error.error_code(),
                                        "Line error limit exceeded, abandoning document",
                                        pos = segment.pos.clone());
                                    return Err(error);
                                }
                                let dropped = current.take().expect("line checked above");
                                log_warning!("Dropping line group",
                                    "code" => dropped.code(),
                                    "record" => segment.pos.record,
                                    "error" => error);
                                line_errors.push(LineGroupError {
                                    line_code: dropped.code().to_string(),
                                    pos: segment.pos.clone(),
                                    error,
                                });
                                skipping = true;
                            }
                            Strictness::Permissive => {
                                log_error!(error.error_code(), "Line segment failed",
                                    pos = segment.pos.clone());
                                return Err(error);
                            }
                        }
                    }
                }

                _ => {
                    let error = GrammarError::UnknownSegment {
                        tag: segment.tag.clone(),
                        pos: segment.pos.clone(),
                    };
                    log_error!(error.error_code(), "Unknown segment tag",
                        pos = segment.pos.clone());
                    return Err(error);
                }
            }
        }

        if let Some(finished) = current.take() {
            lines.push(finished.build());
        }

        let Some(header) = header else {
            log_error!(codes::grammar::MISSING_HEADER, "No BGM header in interchange");
            return Err(GrammarError::MissingHeader);
        };

        let document = header.build(lines);
        log_success!(codes::success::DOCUMENT_ASSEMBLED, "Document assembled",
            "number" => document.number,
            "lines" => document.lines.len(),
            "dropped_lines" => line_errors.len());

        Ok(AssembledDocument {
            document,
            line_errors,
        })
    }
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new(Strictness::default())
    }
}

// ============================================================================
// SEGMENT READERS
// ============================================================================

fn open_header<'a>(
    header: &'a mut Option<HeaderBuilder>,
    segment: &RawSegment,
) -> Result<&'a mut HeaderBuilder, GrammarError> {
    header.as_mut().ok_or_else(|| {
        let error = GrammarError::SegmentBeforeHeader {
            tag: segment.tag.clone(),
            pos: segment.pos.clone(),
        };
        log_error!(error.error_code(), "Segment before BGM header",
            pos = segment.pos.clone());
        error
    })
}

/// A required element; empty is allowed, absent is not
fn required<'a>(
    segment: &'a RawSegment,
    index: usize,
    element: &'static str,
) -> Result<&'a str, GrammarError> {
    segment
        .element(index)
        .ok_or_else(|| GrammarError::MissingElement {
            tag: segment.tag.clone(),
            element,
            pos: segment.pos.clone(),
        })
}

/// An optional element; empty and absent both decode to `None`
fn optional(segment: &RawSegment, index: usize) -> Option<String> {
    segment
        .element(index)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn date_element(
    segment: &RawSegment,
    index: usize,
) -> Result<Option<NaiveDate>, GrammarError> {
    decode_date(segment.element_or_empty(index)).map_err(|error| GrammarError::Field {
        error,
        pos: segment.pos.clone(),
    })
}

fn read_bgm(segment: &RawSegment) -> Result<HeaderBuilder, GrammarError> {
    let number = required(segment, 0, "document number")?;
    let document_type = DocumentType::from_wire(required(segment, 1, "document type")?);
    let function_code = FunctionCode::from_wire(required(segment, 2, "function code")?);
    Ok(HeaderBuilder::new(number, document_type, function_code))
}

fn read_dtm(header: &mut HeaderBuilder, segment: &RawSegment) -> Result<(), GrammarError> {
    header.set_expedition_date(date_element(segment, 0)?);
    header.set_estimated_date(date_element(segment, 1)?);
    Ok(())
}

fn read_rff(header: &mut HeaderBuilder, segment: &RawSegment) -> Result<(), GrammarError> {
    let qualifier = required(segment, 0, "reference qualifier")?;
    let Some(value) = optional(segment, 1) else {
        log_debug!("Reference without a value, skipped", "qualifier" => qualifier);
        return Ok(());
    };
    let date = date_element(segment, 2)?;
    header.add_reference(
        Reference::new(ReferenceType::from_wire(qualifier), value).with_date(date),
    );
    Ok(())
}

fn read_supplier(segment: &RawSegment) -> Result<SupplierParty, GrammarError> {
    let identifier = required(segment, 0, "party identifier")?;
    Ok(SupplierParty {
        qualifier: segment.tag.clone(),
        identifier: identifier.to_string(),
        party: None,
    })
}

fn read_lin(segment: &RawSegment) -> Result<LineBuilder, GrammarError> {
    let code = required(segment, 0, "product code")?;
    // The wire carries a symbology qualifier here, but classification is
    // done from the code itself; codes are routinely mislabeled upstream
    let _qualifier = required(segment, 1, "code qualifier")?;
    let line_number = required(segment, 2, "line number")?
        .trim()
        .parse::<u32>()
        .ok();

    Ok(LineBuilder::new(
        code,
        classify_code(code),
        line_number,
        segment.pos.clone(),
    ))
}

fn read_line_segment(
    line: &mut LineBuilder,
    role: SegmentRole,
    segment: &RawSegment,
) -> Result<(), GrammarError> {
    match role {
        SegmentRole::LineArticleCodes => {
            line.set_purchaser_code(Some(required(segment, 0, "purchaser code")?.to_string()));
            line.set_supplier_code(optional(segment, 1));
            line.set_serial_number(optional(segment, 2));
            if let Some(lot) = optional(segment, 3) {
                line.set_lot_number(Some(lot));
            }
        }

        SegmentRole::LineDescription => {
            let codification = optional(segment, 0);
            let description = required(segment, 1, "description")?;
            line.set_description(
                Some(description.to_string()),
                codification,
                optional(segment, 2),
            );
        }

        SegmentRole::LineQuantity => {
            let type_code = required(segment, 0, "quantity type")?;
            let raw_amount = required(segment, 1, "quantity")?;
            let amount = decode_decimal_or_zero(raw_amount, QUANTITY_SCALE).map_err(|error| {
                GrammarError::Field {
                    error,
                    pos: segment.pos.clone(),
                }
            })?;
            line.add_quantity(Quantity {
                type_code: type_code.to_string(),
                amount,
                unit: optional(segment, 2),
                difference: None,
            });
        }

        SegmentRole::LineReference => {
            let qualifier = required(segment, 0, "reference qualifier")?;
            let value = required(segment, 1, "reference")?;
            line.add_reference(Reference::new(
                ReferenceType::from_wire(qualifier),
                value,
            ));
        }

        SegmentRole::LinePacking => {
            line.set_marking_instructions(optional(segment, 0));
            if segment.element(1).is_some() {
                line.set_expiration_date(date_element(segment, 1)?);
            }
            if segment.element(2).is_some() {
                line.set_packing_date(date_element(segment, 2)?);
            }
            if let Some(lot) = optional(segment, 3) {
                line.set_lot_number(Some(lot));
            }
        }

        SegmentRole::LineVariance => {
            let type_code = required(segment, 0, "quantity type")?;
            let raw_amount = required(segment, 1, "quantity")?;
            let amount = decode_decimal_or_zero(raw_amount, QUANTITY_SCALE).map_err(|error| {
                GrammarError::Field {
                    error,
                    pos: segment.pos.clone(),
                }
            })?;
            let difference = required(segment, 2, "difference qualifier")?;
            line.add_quantity(Quantity {
                type_code: type_code.to_string(),
                amount,
                unit: None,
                difference: Some(difference.to_string()),
            });
        }

        SegmentRole::LinePlannedDate => {
            line.set_planned_date(date_element(segment, 0)?);
        }

        SegmentRole::LineNoOp => {
            log_debug!("Skipping line segment", "tag" => segment.tag);
        }

        // Non-line roles never reach this function
        _ => {}
    }

    Ok(())
}

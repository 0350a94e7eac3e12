//! Segment tag table
//!
//! Maps wire tags to their role in the document grammar. Line-scoped tags
//! follow the fixed suffix convention: the tag is the header tag plus `LIN`
//! (QTY becomes QTYLIN, RFF becomes RFFLIN, and so on).

/// Tag opening a new line group
pub const LINE_OPEN: &str = "LIN";

/// NAD-family tags that carry a party we keep
pub const SUPPLIER_TAGS: &[&str] = &["NADSU", "NADBY", "NADDP", "NADMR"];

/// Header tags read and deliberately discarded
const HEADER_NOOP_TAGS: &[&str] = &[
    "TOD", "TDT", "CPS", "PAC", "HAN", "PCI", "ALI", "CNTRES", "MOA", "MEA",
];

/// Line tags read and deliberately discarded
const LINE_NOOP_TAGS: &[&str] = &["MEALIN", "MOALIN", "FTXLIN", "LOCLIN"];

/// What the assembler should do with a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentRole {
    /// BGM: opens the document header
    HeaderStart,
    /// DTM: expedition and estimated dates
    HeaderDates,
    /// RFF: header-level reference
    HeaderReference,
    /// NADSU/NADBY/NADDP/NADMR: a party we keep
    Supplier,
    /// Any other NAD tag: skipped without error
    PartyIgnored,
    /// Header tag with no stored fields
    HeaderNoOp,
    /// LIN: opens a new line group
    LineStart,
    /// PIALIN: purchaser/supplier article codes, serial, lot
    LineArticleCodes,
    /// IMDLIN: item description
    LineDescription,
    /// QTYLIN: typed quantity
    LineQuantity,
    /// RFFLIN: line-level reference
    LineReference,
    /// PCILIN: marking, expiration/packing dates, lot
    LinePacking,
    /// QVRLIN: quantity variance with difference qualifier
    LineVariance,
    /// DTMLIN: planned delivery date
    LinePlannedDate,
    /// Line tag with no stored fields
    LineNoOp,
    /// No decoder for this tag
    Unknown,
}

/// Classify a wire tag
pub fn segment_role(tag: &str) -> SegmentRole {
    match tag {
        "BGM" => SegmentRole::HeaderStart,
        "DTM" => SegmentRole::HeaderDates,
        "RFF" => SegmentRole::HeaderReference,
        LINE_OPEN => SegmentRole::LineStart,
        "PIALIN" => SegmentRole::LineArticleCodes,
        "IMDLIN" => SegmentRole::LineDescription,
        "QTYLIN" => SegmentRole::LineQuantity,
        "RFFLIN" => SegmentRole::LineReference,
        "PCILIN" => SegmentRole::LinePacking,
        "QVRLIN" => SegmentRole::LineVariance,
        "DTMLIN" => SegmentRole::LinePlannedDate,
        _ if SUPPLIER_TAGS.contains(&tag) => SegmentRole::Supplier,
        _ if tag.starts_with("NAD") => SegmentRole::PartyIgnored,
        _ if HEADER_NOOP_TAGS.contains(&tag) => SegmentRole::HeaderNoOp,
        _ if LINE_NOOP_TAGS.contains(&tag) => SegmentRole::LineNoOp,
        _ => SegmentRole::Unknown,
    }
}

impl SegmentRole {
    /// Whether the segment belongs to the currently open line group
    pub fn is_line_scoped(&self) -> bool {
        matches!(
            self,
            SegmentRole::LineArticleCodes
                | SegmentRole::LineDescription
                | SegmentRole::LineQuantity
                | SegmentRole::LineReference
                | SegmentRole::LinePacking
                | SegmentRole::LineVariance
                | SegmentRole::LinePlannedDate
                | SegmentRole::LineNoOp
        )
    }
}

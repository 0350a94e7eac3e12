pub mod pos;

pub use pos::SegmentPos;

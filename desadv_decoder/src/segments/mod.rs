//! Raw segment representation and navigable segment stream
//!
//! The tokenizer produces a `SegmentStream` of `RawSegment`s; the grammar
//! walks the stream with `current`/`peek`/`advance` and save/restore
//! positions, the same way a parser walks a token stream.

pub mod raw;
pub mod stream;

pub use raw::RawSegment;
pub use stream::SegmentStream;

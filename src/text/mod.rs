//! Bio text processing.

pub mod segment;
pub mod tokenizer;

pub use segment::{Segment, SegmentKind, UnicodeWordSegmenter, WordSegmenter};
pub use tokenizer::{Tokenizer, tokenize, tokenize_bytes};

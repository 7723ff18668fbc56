//! Decoding of the compressed users/lookup cache.
//!
//! A cached blob is zlib-framed VCDIFF: the delta reconstructs the user JSON
//! against a fixed dictionary shared by every row.

mod address_cache;
mod code_table;
pub mod dictionary;
pub mod encoder;
pub mod record;
pub mod scratch;
mod varint;
pub mod vcdiff;

pub use dictionary::Dictionary;
pub use encoder::{VcdiffEncoder, encode_delta};
pub use record::{RecordDecoder, decode_record, encode_record};
pub use scratch::ScratchBuffer;
pub use vcdiff::{DeltaDecoder, VcdiffDecoder, decode_delta};

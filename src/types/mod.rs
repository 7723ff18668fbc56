//! Public types exposed by the `tweep-followers` crate.

pub mod options;
pub mod profile;

pub use options::{ExportOptions, ExportOptionsBuilder};
pub use profile::ProfileRecord;

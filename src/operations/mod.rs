//! Operation records derived from a marked tree.

mod extractor;
mod record;

pub use extractor::extract;
pub use record::OperationRecord;

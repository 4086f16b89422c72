//! Gates a declared tree must pass before any operation is scheduled: the
//! comparison with what is actually on disk, and the rules operations obey.

mod error;
mod structure;

pub use error::ValidationError;
pub use structure::{StructuralMismatch, StructureCheck, validate};

//! Marker-aware parser for indented layout text.
//!
//! Entries are one per line: indentation gives the depth, a trailing `/`
//! marks a folder and an optional trailing ` [+]`, ` [-]` or ` [~ name]`
//! declares an operation. Everything else is ignored.

mod error;
mod line;
mod tree_parser;

pub use error::{ParseError, ParseErrorKind, ParseErrors};
pub use tree_parser::{DEFAULT_INDENT_WIDTH, TreeParser};

//! Declarative directory tree: arena-backed nodes, their paths, structural
//! checks and the text rendering read back by the parser.

mod node;
mod path;
mod render;
mod validate;

pub use node::{NodeId, NodeKind, Operation, OperationKind, Tree, TreeError};
pub use path::TreePath;
pub use render::render;

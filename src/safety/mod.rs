//! Predicates guarding every path that reaches the filesystem.
//!
//! Names are checked when the tree is built and again, together with root
//! containment, right before an operation is scheduled.

mod path_safety;

pub use path_safety::{PathSafetyError, check_path, is_valid_name};

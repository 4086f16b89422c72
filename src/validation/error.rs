use snafu::Snafu;

use crate::tree::{TreeError, TreePath};
use crate::validation::StructuralMismatch;

#[derive(Debug, Snafu)]
pub enum ValidationError {
    #[snafu(display(
        "The layout no longer matches the filesystem. Rescan before applying:\n{}",
        mismatch
    ))]
    StructureMismatch { mismatch: StructuralMismatch },
    #[snafu(display("The root folder cannot be created, deleted or renamed"))]
    RootImmutable,
    #[snafu(display("Rename of '{}' has no target", path))]
    MissingRenameTarget { path: TreePath },
    #[snafu(display("More than one operation produces '{}'", path))]
    DuplicateDestination { path: TreePath },
    #[snafu(display("Cannot rename '{}' to '{}': that entry is still there", path, target))]
    RenameTargetExists { path: TreePath, target: TreePath },
    #[snafu(display("The layout tree is malformed"))]
    InvalidTree { source: TreeError },
}

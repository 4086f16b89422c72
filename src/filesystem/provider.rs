use snafu::Snafu;

use crate::tree::{NodeKind, TreePath};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: NodeKind,
}

/// Filesystem collaborator, rooted at the directory a layout is applied to.
/// Every path is relative to that root.
pub trait FilesystemProvider {
    async fn list_directory(&self, path: &TreePath) -> Result<Vec<DirEntry>, ProviderError>;

    /// Creates an empty file. Fails if anything already exists at `path`.
    async fn create_file(&self, path: &TreePath) -> Result<(), ProviderError>;

    async fn create_folder(&self, path: &TreePath) -> Result<(), ProviderError>;

    /// Moves `from` to `to`. Never overwrites: an existing `to` is an error.
    async fn rename(&self, from: &TreePath, to: &TreePath) -> Result<(), ProviderError>;

    async fn delete_recursive(&self, path: &TreePath) -> Result<(), ProviderError>;
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ProviderError {
    #[snafu(display("Failed to {} '{}'", action, path))]
    IoError {
        action: &'static str,
        path: TreePath,
        source: std::io::Error,
    },
    #[snafu(display("Cannot rename onto '{}': it already exists", path))]
    TargetExists { path: TreePath },
    #[snafu(display("'{}' does not exist", path))]
    NotFound { path: TreePath },
    #[snafu(display("Rename of '{}' has no destination", path))]
    MissingDestination { path: TreePath },
}

//! Filesystem access behind the [`FilesystemProvider`] trait.
//!
//! The core never touches the disk directly: directory listings feed the
//! scanner, and mutations are only issued by the executor.

mod local;
#[cfg(test)]
pub(crate) mod memory;
mod provider;
mod scan;

pub use local::LocalFilesystem;
pub use provider::{DirEntry, FilesystemProvider, ProviderError};
pub use scan::scan;

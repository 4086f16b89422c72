use std::io::ErrorKind;
use std::path::PathBuf;

use snafu::ResultExt;
use tracing::{debug, warn};

use crate::filesystem::provider::IoSnafu;
use crate::filesystem::{DirEntry, FilesystemProvider, ProviderError};
use crate::tree::{NodeKind, TreePath};

/// Provider backed by the local disk through `compio::fs`.
#[derive(Debug, Clone)]
pub struct LocalFilesystem {
    root: PathBuf,
}

impl LocalFilesystem {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &TreePath) -> PathBuf {
        self.root.join(path.to_relative_path())
    }
}

impl FilesystemProvider for LocalFilesystem {
    async fn list_directory(&self, path: &TreePath) -> Result<Vec<DirEntry>, ProviderError> {
        let directory = self.resolve(path);
        debug!("Listing {}", directory.display());

        // compio has no directory listing, so this one call stays on std.
        let entries = std::fs::read_dir(&directory).context(IoSnafu {
            action: "list",
            path: path.clone(),
        })?;

        let mut listing = Vec::new();
        for entry in entries {
            let entry = entry.context(IoSnafu {
                action: "list",
                path: path.clone(),
            })?;
            // Symlinks are listed as files and never followed.
            let file_type = entry.file_type().context(IoSnafu {
                action: "inspect",
                path: path.join(entry.file_name().to_string_lossy()),
            })?;
            let Ok(name) = entry.file_name().into_string() else {
                warn!(
                    "Skipping entry with a non UTF-8 name in '{}': {:?}",
                    path,
                    entry.file_name()
                );
                continue;
            };
            let kind = if file_type.is_dir() {
                NodeKind::Folder
            } else {
                NodeKind::File
            };
            listing.push(DirEntry { name, kind });
        }

        Ok(listing)
    }

    async fn create_file(&self, path: &TreePath) -> Result<(), ProviderError> {
        let file = compio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.resolve(path))
            .await
            .context(IoSnafu {
                action: "create",
                path: path.clone(),
            })?;
        file.close().await.context(IoSnafu {
            action: "close",
            path: path.clone(),
        })
    }

    async fn create_folder(&self, path: &TreePath) -> Result<(), ProviderError> {
        compio::fs::create_dir(self.resolve(path))
            .await
            .context(IoSnafu {
                action: "create",
                path: path.clone(),
            })
    }

    async fn rename(&self, from: &TreePath, to: &TreePath) -> Result<(), ProviderError> {
        match compio::fs::symlink_metadata(self.resolve(to)).await {
            Ok(_) => return Err(ProviderError::TargetExists { path: to.clone() }),
            Err(error) if error.kind() == ErrorKind::NotFound => {}
            Err(error) => {
                return Err(error).context(IoSnafu {
                    action: "inspect",
                    path: to.clone(),
                });
            }
        }

        compio::fs::rename(self.resolve(from), self.resolve(to))
            .await
            .context(IoSnafu {
                action: "rename",
                path: from.clone(),
            })
    }

    async fn delete_recursive(&self, path: &TreePath) -> Result<(), ProviderError> {
        let target = self.resolve(path);
        let metadata = compio::fs::symlink_metadata(&target)
            .await
            .context(IoSnafu {
                action: "inspect",
                path: path.clone(),
            })?;

        if metadata.is_dir() {
            // No recursive removal in compio either.
            std::fs::remove_dir_all(&target).context(IoSnafu {
                action: "delete",
                path: path.clone(),
            })
        } else {
            compio::fs::remove_file(&target).await.context(IoSnafu {
                action: "delete",
                path: path.clone(),
            })
        }
    }
}

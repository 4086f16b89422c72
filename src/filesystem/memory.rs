use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::filesystem::{DirEntry, FilesystemProvider, ProviderError};
use crate::tree::{NodeKind, TreePath};

/// In-memory provider for tests. Records every mutation it is asked to make
/// and can be told to fail on a given path.
#[derive(Debug, Default)]
pub(crate) struct MemoryFilesystem {
    entries: RefCell<BTreeMap<TreePath, NodeKind>>,
    calls: RefCell<Vec<String>>,
    fail_on: Option<TreePath>,
}

impl MemoryFilesystem {
    /// Builds a filesystem from `/`-separated paths; a trailing `/` marks a folder.
    pub fn with_paths(paths: &[&str]) -> Self {
        let filesystem = Self::default();
        for path in paths {
            let kind = if path.ends_with('/') {
                NodeKind::Folder
            } else {
                NodeKind::File
            };
            filesystem
                .entries
                .borrow_mut()
                .insert(TreePath::from(*path), kind);
        }
        filesystem
    }

    pub fn failing_on(mut self, path: &str) -> Self {
        self.fail_on = Some(TreePath::from(path));
        self
    }

    pub fn paths(&self) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .map(|(path, kind)| match kind {
                NodeKind::Folder => format!("{path}/"),
                NodeKind::File => path.to_string(),
            })
            .collect()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn exists(&self, path: &TreePath) -> bool {
        path.is_root() || self.entries.borrow().contains_key(path)
    }

    fn record(&self, call: String) -> Result<(), ProviderError> {
        self.calls.borrow_mut().push(call);
        Ok(())
    }

    fn check_failure(&self, path: &TreePath) -> Result<(), ProviderError> {
        if self.fail_on.as_ref() == Some(path) {
            return Err(ProviderError::IoError {
                action: "touch",
                path: path.clone(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            });
        }
        Ok(())
    }

    fn create(&self, path: &TreePath, kind: NodeKind) -> Result<(), ProviderError> {
        self.check_failure(path)?;
        let parent_exists = path.parent().is_some_and(|parent| {
            parent.is_root() || self.entries.borrow().get(&parent) == Some(&NodeKind::Folder)
        });
        if !parent_exists {
            return Err(ProviderError::NotFound {
                path: path.parent().unwrap_or_default(),
            });
        }
        if self.exists(path) {
            return Err(ProviderError::IoError {
                action: "create",
                path: path.clone(),
                source: std::io::Error::new(std::io::ErrorKind::AlreadyExists, "exists"),
            });
        }
        self.entries.borrow_mut().insert(path.clone(), kind);
        self.record(format!("create {kind} {path}"))
    }
}

impl FilesystemProvider for MemoryFilesystem {
    async fn list_directory(&self, path: &TreePath) -> Result<Vec<DirEntry>, ProviderError> {
        if !self.exists(path) {
            return Err(ProviderError::NotFound { path: path.clone() });
        }
        Ok(self
            .entries
            .borrow()
            .iter()
            .filter(|(candidate, _)| candidate.parent().as_ref() == Some(path))
            .filter_map(|(candidate, kind)| {
                candidate.file_name().map(|name| DirEntry {
                    name: name.to_string(),
                    kind: *kind,
                })
            })
            .collect())
    }

    async fn create_file(&self, path: &TreePath) -> Result<(), ProviderError> {
        self.create(path, NodeKind::File)
    }

    async fn create_folder(&self, path: &TreePath) -> Result<(), ProviderError> {
        self.create(path, NodeKind::Folder)
    }

    async fn rename(&self, from: &TreePath, to: &TreePath) -> Result<(), ProviderError> {
        self.check_failure(from)?;
        if !self.exists(from) {
            return Err(ProviderError::NotFound { path: from.clone() });
        }
        if self.exists(to) {
            return Err(ProviderError::TargetExists { path: to.clone() });
        }

        let mut entries = self.entries.borrow_mut();
        let moved: Vec<(TreePath, NodeKind)> = entries
            .iter()
            .filter(|(path, _)| *path == from || path.is_descendant_of(from))
            .map(|(path, kind)| (path.clone(), *kind))
            .collect();
        for (path, kind) in moved {
            entries.remove(&path);
            let new_path = path.rebase(from, to).unwrap_or_else(|| to.clone());
            entries.insert(new_path, kind);
        }
        drop(entries);

        self.record(format!("rename {from} -> {to}"))
    }

    async fn delete_recursive(&self, path: &TreePath) -> Result<(), ProviderError> {
        self.check_failure(path)?;
        if !self.exists(path) {
            return Err(ProviderError::NotFound { path: path.clone() });
        }
        self.entries
            .borrow_mut()
            .retain(|candidate, _| candidate != path && !candidate.is_descendant_of(path));
        self.record(format!("delete {path}"))
    }
}

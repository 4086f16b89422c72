use std::fmt;

use crate::tree::{NodeKind, OperationKind, TreePath};

/// A single filesystem mutation derived from a marked node. Built fresh for
/// every apply or preview and dropped afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRecord {
    pub path: TreePath,
    pub operation: OperationKind,
    pub new_path: Option<TreePath>,
    pub node_kind: NodeKind,
}

impl OperationRecord {
    pub fn create(path: TreePath, node_kind: NodeKind) -> Self {
        Self {
            path,
            operation: OperationKind::Create,
            new_path: None,
            node_kind,
        }
    }

    pub fn delete(path: TreePath, node_kind: NodeKind) -> Self {
        Self {
            path,
            operation: OperationKind::Delete,
            new_path: None,
            node_kind,
        }
    }

    pub fn rename(path: TreePath, new_path: TreePath, node_kind: NodeKind) -> Self {
        Self {
            path,
            operation: OperationKind::Rename,
            new_path: Some(new_path),
            node_kind,
        }
    }

    /// The path this record leaves behind once applied, if any.
    pub fn destination(&self) -> Option<&TreePath> {
        match self.operation {
            OperationKind::Create => Some(&self.path),
            OperationKind::Rename => self.new_path.as_ref(),
            OperationKind::Delete => None,
        }
    }
}

impl fmt::Display for OperationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.operation, self.node_kind, self.path)?;
        if let Some(new_path) = &self.new_path {
            write!(f, " -> {new_path}")?;
        }
        Ok(())
    }
}

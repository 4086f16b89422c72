use std::collections::BTreeSet;
use std::fmt;

use tracing::{debug, info};

use crate::tree::{Operation, Tree, TreePath};

/// Difference between the paths a tree expects and the paths found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralMismatch {
    pub expected_paths: Vec<TreePath>,
    pub actual_paths: Vec<TreePath>,
    /// On disk but not declared.
    pub added: Vec<TreePath>,
    /// Declared but missing from disk.
    pub removed: Vec<TreePath>,
}

impl fmt::Display for StructuralMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for path in &self.added {
            writeln!(f, "  appeared on disk: {path}")?;
        }
        for path in &self.removed {
            writeln!(f, "  missing on disk:  {path}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureCheck {
    Valid,
    Mismatch(StructuralMismatch),
}

/// Paths the tree claims already exist: every node not marked for creation.
pub fn expected_paths(tree: &Tree) -> Vec<TreePath> {
    let mut paths: Vec<TreePath> = tree
        .walk()
        .into_iter()
        .filter(|(id, _)| !matches!(tree.node(*id).operation(), Some(Operation::Create)))
        .map(|(_, path)| path)
        .collect();
    paths.sort();
    paths
}

/// Compares the tree's expected paths with `actual_paths` as sorted sets.
pub fn validate(tree: &Tree, actual_paths: &[TreePath]) -> StructureCheck {
    let expected: BTreeSet<TreePath> = expected_paths(tree).into_iter().collect();
    let actual: BTreeSet<TreePath> = actual_paths.iter().cloned().collect();

    if expected == actual {
        debug!("Declared structure matches {} paths on disk", actual.len());
        return StructureCheck::Valid;
    }

    let added: Vec<TreePath> = actual.difference(&expected).cloned().collect();
    let removed: Vec<TreePath> = expected.difference(&actual).cloned().collect();
    info!(
        "Declared structure differs from disk: {} added, {} removed",
        added.len(),
        removed.len()
    );

    StructureCheck::Mismatch(StructuralMismatch {
        expected_paths: expected.into_iter().collect(),
        actual_paths: actual.into_iter().collect(),
        added,
        removed,
    })
}

use std::collections::HashSet;

use tracing::debug;

use crate::operations::OperationRecord;
use crate::tree::{NodeKind, Operation, OperationKind, Tree, TreePath};
use crate::validation::ValidationError;

/// Collects one record per marked node, root included, then checks them with
/// [`validate_operations`] and against their siblings. Any violation yields
/// no records at all.
pub fn extract(tree: &Tree) -> Result<Vec<OperationRecord>, ValidationError> {
    tree.check_invariants()
        .map_err(|source| ValidationError::InvalidTree { source })?;

    let root = tree.node(tree.root());
    let mut records: Vec<OperationRecord> = root
        .operation()
        .map(|operation| record_for(TreePath::root(), root.kind(), operation))
        .into_iter()
        .collect();

    records.extend(tree.walk().into_iter().filter_map(|(id, path)| {
        let node = tree.node(id);
        node.operation()
            .map(|operation| record_for(path, node.kind(), operation))
    }));

    validate_operations(&records)?;
    check_rename_targets(tree)?;
    debug!("Extracted {} operations", records.len());
    Ok(records)
}

fn record_for(path: TreePath, kind: NodeKind, operation: &Operation) -> OperationRecord {
    match operation {
        Operation::Create => OperationRecord::create(path, kind),
        Operation::Delete => OperationRecord::delete(path, kind),
        Operation::Rename { target } => {
            let new_path = path.with_file_name(target.clone());
            OperationRecord::rename(path, new_path, kind)
        }
    }
}

/// A rename may not land on a sibling that is still in place when it runs.
///
/// Deletes run after renames, so a delete-marked sibling still occupies the
/// name. A renamed sibling frees it only if its own rename runs first, which
/// for siblings means a name that sorts before this one. Create-marked
/// siblings are reported by [`validate_operations`] instead.
fn check_rename_targets(tree: &Tree) -> Result<(), ValidationError> {
    let folders = std::iter::once((tree.root(), TreePath::root())).chain(tree.walk());

    for (parent, parent_path) in folders {
        for child in tree.node(parent).children() {
            let node = tree.node(*child);
            let Some(Operation::Rename { target }) = node.operation() else {
                continue;
            };
            let Some(occupant) = tree.find_child(parent, target) else {
                continue;
            };

            let occupant = tree.node(occupant);
            let vacated_first = match occupant.operation() {
                Some(Operation::Create) => continue,
                Some(Operation::Rename { .. }) => occupant.name() < node.name(),
                Some(Operation::Delete) | None => false,
            };
            if !vacated_first {
                return Err(ValidationError::RenameTargetExists {
                    path: parent_path.join(node.name()),
                    target: parent_path.join(target.clone()),
                });
            }
        }
    }

    Ok(())
}

/// Local rules every record must satisfy before scheduling.
pub fn validate_operations(records: &[OperationRecord]) -> Result<(), ValidationError> {
    let mut destinations = HashSet::new();

    for record in records {
        if record.path.is_root() {
            return Err(ValidationError::RootImmutable);
        }

        if record.operation == OperationKind::Rename
            && record.new_path.as_ref().is_none_or(TreePath::is_root)
        {
            return Err(ValidationError::MissingRenameTarget {
                path: record.path.clone(),
            });
        }

        if let Some(destination) = record.destination() {
            if !destinations.insert(destination.clone()) {
                return Err(ValidationError::DuplicateDestination {
                    path: destination.clone(),
                });
            }
        }
    }

    Ok(())
}

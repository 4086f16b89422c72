use std::path::Path;

use tracing::debug;

use crate::operations::OperationRecord;
use crate::safety::{PathSafetyError, check_path};
use crate::tree::{NodeKind, OperationKind};

/// Orders records so that every step finds the filesystem in the state it
/// needs: parents are created before children, renames see their source
/// paths intact, and folders are deleted after their contents.
///
/// Every path is checked against `root` before anything is ordered; a single
/// unsafe path rejects the whole batch.
pub fn schedule(
    records: Vec<OperationRecord>,
    root: &Path,
) -> Result<Vec<OperationRecord>, PathSafetyError> {
    for record in &records {
        check_path(&record.path, root)?;
        if let Some(new_path) = &record.new_path {
            check_path(new_path, root)?;
        }
    }

    let mut create_folders = Vec::new();
    let mut create_files = Vec::new();
    let mut renames = Vec::new();
    let mut delete_files = Vec::new();
    let mut delete_folders = Vec::new();

    for record in records {
        match (record.operation, record.node_kind) {
            (OperationKind::Create, NodeKind::Folder) => create_folders.push(record),
            (OperationKind::Create, NodeKind::File) => create_files.push(record),
            (OperationKind::Rename, _) => renames.push(record),
            (OperationKind::Delete, NodeKind::File) => delete_files.push(record),
            (OperationKind::Delete, NodeKind::Folder) => delete_folders.push(record),
        }
    }

    create_folders.sort_by(|a, b| {
        a.path
            .depth()
            .cmp(&b.path.depth())
            .then_with(|| a.path.cmp(&b.path))
    });
    create_files.sort_by(|a, b| a.path.cmp(&b.path));
    renames.sort_by(|a, b| {
        b.path
            .depth()
            .cmp(&a.path.depth())
            .then_with(|| a.path.cmp(&b.path))
    });

    // Deletes run after every rename, so a path under a renamed folder has moved.
    for delete in delete_files.iter_mut().chain(delete_folders.iter_mut()) {
        for rename in &renames {
            if let Some(moved) = rename
                .new_path
                .as_ref()
                .and_then(|to| delete.path.rebase(&rename.path, to))
            {
                debug!("Delete of '{}' follows rename to '{}'", delete.path, moved);
                delete.path = moved;
            }
        }
    }

    delete_files.sort_by(|a, b| a.path.cmp(&b.path));
    delete_folders.sort_by(|a, b| {
        b.path
            .depth()
            .cmp(&a.path.depth())
            .then_with(|| a.path.cmp(&b.path))
    });

    let ordered: Vec<OperationRecord> = create_folders
        .into_iter()
        .chain(create_files)
        .chain(renames)
        .chain(delete_files)
        .chain(delete_folders)
        .collect();

    debug!("Scheduled {} operations", ordered.len());
    Ok(ordered)
}

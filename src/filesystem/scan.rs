use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::config::IgnoreSet;
use crate::filesystem::{FilesystemProvider, ProviderError};
use crate::tree::{NodeKind, Tree, TreePath};

/// Builds an unmarked tree of everything the provider lists, breadth-first.
///
/// Ignored names are left out together with their contents. Within a folder,
/// subfolders come first, then files, each sorted by name. Entries whose name
/// cannot be represented in a layout are skipped with a warning.
pub async fn scan<P: FilesystemProvider>(
    provider: &P,
    ignore: &IgnoreSet,
) -> Result<Tree, ProviderError> {
    let mut tree = Tree::new();
    let mut pending = VecDeque::from([(tree.root(), TreePath::root())]);

    while let Some((parent, path)) = pending.pop_front() {
        let mut entries = provider.list_directory(&path).await?;
        entries.retain(|entry| {
            let ignored = ignore.is_ignored(&entry.name);
            if ignored {
                debug!("Ignoring '{}'", path.join(entry.name.clone()));
            }
            !ignored
        });
        entries.sort_by(|a, b| b.kind.cmp(&a.kind).then_with(|| a.name.cmp(&b.name)));

        for entry in entries {
            let child_path = path.join(entry.name.clone());
            match tree.add_child(parent, entry.name, entry.kind) {
                Ok(id) if entry.kind == NodeKind::Folder => pending.push_back((id, child_path)),
                Ok(_) => {}
                Err(error) => warn!("Skipping '{}': {}", child_path, error),
            }
        }
    }

    debug!("Scanned {} entries", tree.len());
    Ok(tree)
}

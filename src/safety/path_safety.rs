use std::path::{Component, Path};

use snafu::Snafu;
use tracing::warn;

use crate::ext::{BestEffortPathExt, absolute_normalized};
use crate::tree::TreePath;

/// Characters that may not appear in a node name, in addition to path
/// separators and control characters.
pub const RESERVED_CHARACTERS: [char; 7] = ['<', '>', ':', '"', '|', '?', '*'];

/// Returns true when `name` can be used as a single path segment.
pub fn is_valid_name(name: &str) -> bool {
    if name.trim().is_empty() || name == "." || name == ".." {
        return false;
    }

    !name.chars().any(|c| {
        c == '/' || c == '\\' || c.is_control() || RESERVED_CHARACTERS.contains(&c)
    })
}

/// Returns true when `relative` stays inside `root` once resolved against it.
///
/// Resolution is the authority, not the presence of `..`: `a/../b` is safe,
/// `a/../../b` is not. When the containing folder and the root exist on disk
/// their canonical forms are compared too, so a symlinked folder cannot lead
/// outside the root. The last segment is not resolved: operations act on the
/// entry itself, so a symlink at that position is only the link.
pub fn is_safe(relative: &Path, root: &Path) -> bool {
    let has_anchor = relative
        .components()
        .any(|c| matches!(c, Component::RootDir | Component::Prefix(_)));
    if relative.is_absolute() || has_anchor {
        return false;
    }

    let resolved_root = absolute_normalized(root);
    let resolved = absolute_normalized(&root.join(relative));
    if !resolved.starts_with(&resolved_root) {
        return false;
    }

    if resolved == resolved_root {
        return true;
    }
    let (Some(parent), Some(name)) = (resolved.parent(), resolved.file_name()) else {
        return true;
    };

    match (parent.canonicalize(), resolved_root.canonicalize()) {
        (Ok(canonical_parent), Ok(canonical_root)) => {
            canonical_parent.join(name).starts_with(canonical_root)
        }
        _ => true,
    }
}

/// Checks a scheduled path: non-empty, every segment a valid name, and
/// contained in `root`.
pub fn check_path(path: &TreePath, root: &Path) -> Result<(), PathSafetyError> {
    if path.is_root() {
        return Err(PathSafetyError::EmptyPath);
    }

    if let Some(segment) = path.segments().iter().find(|s| !is_valid_name(s)) {
        warn!("Rejected path '{}': invalid segment '{}'", path, segment);
        return Err(PathSafetyError::InvalidSegment {
            path: path.clone(),
            segment: segment.clone(),
        });
    }

    if !is_safe(&path.to_relative_path(), root) {
        warn!("Rejected path '{}': escapes {}", path, root.display());
        return Err(PathSafetyError::EscapesRoot {
            path: path.clone(),
            root: root.best_effort_path_display(),
        });
    }

    Ok(())
}

#[derive(Debug, Snafu)]
pub enum PathSafetyError {
    #[snafu(display("Refusing to operate on the root itself"))]
    EmptyPath,
    #[snafu(display("Path '{}' contains the invalid name '{}'", path, segment))]
    InvalidSegment { path: TreePath, segment: String },
    #[snafu(display("Path '{}' resolves outside of the root {}", path, root))]
    EscapesRoot { path: TreePath, root: String },
}

use derive_more::Display;
use snafu::Snafu;

use crate::safety::is_valid_name;
use crate::tree::TreePath;

/// Index of a node inside its [`Tree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub enum NodeKind {
    #[display("file")]
    File,
    #[display("folder")]
    Folder,
}

/// Operation declared on a node. A node without one must match the disk as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Create,
    Delete,
    Rename { target: String },
}

impl Operation {
    #[cfg(test)]
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Create => OperationKind::Create,
            Operation::Delete => OperationKind::Delete,
            Operation::Rename { .. } => OperationKind::Rename,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum OperationKind {
    #[display("create")]
    Create,
    #[display("delete")]
    Delete,
    #[display("rename")]
    Rename,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    name: String,
    kind: NodeKind,
    children: Vec<NodeId>,
    operation: Option<Operation>,
}

impl TreeNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn operation(&self) -> Option<&Operation> {
        self.operation.as_ref()
    }
}

/// Declared directory structure, stored as an arena.
///
/// Index 0 is the root: a nameless folder standing for the directory the tree
/// is applied to. Children keep the order they were added in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    nodes: Vec<TreeNode>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    pub fn new() -> Self {
        Tree {
            nodes: vec![TreeNode {
                name: String::new(),
                kind: NodeKind::Folder,
                children: Vec::new(),
                operation: None,
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    /// Number of nodes, not counting the root.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn find_child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.node(parent)
            .children
            .iter()
            .copied()
            .find(|child| self.node(*child).name == name)
    }

    /// Appends a child to `parent`, enforcing the name and sibling rules.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        kind: NodeKind,
    ) -> Result<NodeId, TreeError> {
        let name = name.into();
        if !is_valid_name(&name) {
            return Err(TreeError::InvalidName { name });
        }
        if self.node(parent).kind != NodeKind::Folder {
            return Err(TreeError::NotAFolder {
                path: self.path_of(parent),
            });
        }
        if self.find_child(parent, &name).is_some() {
            return Err(TreeError::DuplicateName {
                parent: self.path_of(parent),
                name,
            });
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode {
            name,
            kind,
            children: Vec::new(),
            operation: None,
        });
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    /// Sets or clears the operation of a node, replacing any previous one.
    pub fn set_operation(
        &mut self,
        id: NodeId,
        operation: Option<Operation>,
    ) -> Result<(), TreeError> {
        if let Some(Operation::Rename { target }) = &operation {
            if !is_valid_name(target) {
                return Err(TreeError::InvalidRenameTarget {
                    path: self.path_of(id),
                    target: target.clone(),
                });
            }
        }
        self.nodes[id.0].operation = operation;
        Ok(())
    }

    /// Inserts `path`, creating missing intermediate folders along the way.
    /// Returns the existing node when the path is already present with the same kind.
    #[cfg(test)]
    pub fn insert_path(&mut self, path: &TreePath, kind: NodeKind) -> Result<NodeId, TreeError> {
        let mut current = self.root();
        let segments = path.segments();

        for (index, segment) in segments.iter().enumerate() {
            let is_last = index + 1 == segments.len();
            let wanted = if is_last { kind } else { NodeKind::Folder };

            current = match self.find_child(current, segment) {
                Some(existing) if self.node(existing).kind == wanted => existing,
                Some(existing) if is_last => {
                    return Err(TreeError::DuplicateName {
                        parent: self.path_of(current),
                        name: self.node(existing).name.clone(),
                    });
                }
                Some(existing) => {
                    return Err(TreeError::NotAFolder {
                        path: self.path_of(existing),
                    });
                }
                None => self.add_child(current, segment.clone(), wanted)?,
            };
        }

        Ok(current)
    }

    /// Builds the path of a node by walking down from the root.
    pub fn path_of(&self, id: NodeId) -> TreePath {
        self.walk()
            .into_iter()
            .find(|(node, _)| *node == id)
            .map(|(_, path)| path)
            .unwrap_or_default()
    }

    /// Every node except the root with its path, depth-first in child order.
    pub fn walk(&self) -> Vec<(NodeId, TreePath)> {
        let mut visited = Vec::with_capacity(self.len());
        let mut stack: Vec<(NodeId, TreePath)> = self
            .node(self.root())
            .children
            .iter()
            .rev()
            .map(|child| (*child, TreePath::root().join(self.node(*child).name.clone())))
            .collect();

        while let Some((id, path)) = stack.pop() {
            for child in self.node(id).children.iter().rev() {
                stack.push((*child, path.join(self.node(*child).name.clone())));
            }
            visited.push((id, path));
        }

        visited
    }

    /// Paths of every node except the root, depth-first.
    pub fn paths(&self) -> Vec<TreePath> {
        self.walk().into_iter().map(|(_, path)| path).collect()
    }

    pub(crate) fn nodes_with_ids(&self) -> impl Iterator<Item = (NodeId, &TreeNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index), node))
    }
}

#[derive(Debug, Snafu)]
pub enum TreeError {
    #[snafu(display("'{}' is not a valid file or folder name", name))]
    InvalidName { name: String },
    #[snafu(display("'{}' is not a valid rename target for '{}'", target, path))]
    InvalidRenameTarget { path: TreePath, target: String },
    #[snafu(display("'{}' already contains an entry named '{}'", parent, name))]
    DuplicateName { parent: TreePath, name: String },
    #[snafu(display("Cannot add children to the file '{}'", path))]
    NotAFolder { path: TreePath },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> Tree {
        let mut tree = Tree::new();
        tree.insert_path(&TreePath::from("src/main.rs"), NodeKind::File)
            .expect("Failed to insert path");
        tree.insert_path(&TreePath::from("src/util/mod.rs"), NodeKind::File)
            .expect("Failed to insert path");
        tree.insert_path(&TreePath::from("README.md"), NodeKind::File)
            .expect("Failed to insert path");
        tree
    }

    #[test]
    fn insert_path_creates_intermediate_folders() {
        let tree = sample_tree();
        let src = tree
            .find_child(tree.root(), "src")
            .expect("src should exist");
        assert_eq!(tree.node(src).kind(), NodeKind::Folder);
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn walk_is_depth_first_in_child_order() {
        let tree = sample_tree();
        let paths: Vec<String> = tree.paths().iter().map(ToString::to_string).collect();
        assert_eq!(
            paths,
            vec![
                "src",
                "src/main.rs",
                "src/util",
                "src/util/mod.rs",
                "README.md"
            ]
        );
    }

    #[test]
    fn add_child_rejects_duplicates_and_files_as_parents() {
        let mut tree = sample_tree();
        let src = tree.find_child(tree.root(), "src").expect("src should exist");
        let main = tree.find_child(src, "main.rs").expect("main.rs should exist");

        assert!(matches!(
            tree.add_child(src, "main.rs", NodeKind::Folder),
            Err(TreeError::DuplicateName { .. })
        ));
        assert!(matches!(
            tree.add_child(main, "inner", NodeKind::File),
            Err(TreeError::NotAFolder { .. })
        ));
        assert!(matches!(
            tree.add_child(src, "../escape", NodeKind::File),
            Err(TreeError::InvalidName { .. })
        ));
    }

    #[test]
    fn insert_path_into_file_fails() {
        let mut tree = sample_tree();
        let result = tree.insert_path(&TreePath::from("README.md/inner.txt"), NodeKind::File);
        assert!(matches!(result, Err(TreeError::NotAFolder { .. })));

        let result = tree.insert_path(&TreePath::from("src"), NodeKind::File);
        assert!(matches!(result, Err(TreeError::DuplicateName { .. })));
    }

    #[test]
    fn set_operation_validates_rename_targets() {
        let mut tree = sample_tree();
        let readme = tree.find_child(tree.root(), "README.md").expect("README.md should exist");

        assert!(
            tree.set_operation(
                readme,
                Some(Operation::Rename {
                    target: "a/b".into()
                })
            )
            .is_err()
        );
        tree.set_operation(
            readme,
            Some(Operation::Rename {
                target: "README.txt".into(),
            }),
        )
        .expect("Failed to set operation");
        assert_eq!(
            tree.node(readme).operation().map(Operation::kind),
            Some(OperationKind::Rename)
        );
        tree.set_operation(readme, None)
            .expect("Failed to clear operation");
        assert!(tree.node(readme).operation().is_none());
    }

    #[test]
    fn path_of_resolves_nested_nodes() {
        let tree = sample_tree();
        let src = tree.find_child(tree.root(), "src").expect("src should exist");
        let util = tree.find_child(src, "util").expect("util should exist");
        assert_eq!(tree.path_of(util), TreePath::from("src/util"));
        assert_eq!(tree.path_of(tree.root()), TreePath::root());
    }
}

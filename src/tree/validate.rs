use std::collections::HashSet;

use crate::safety::is_valid_name;
use crate::tree::{NodeKind, Operation, Tree, TreeError};

impl Tree {
    /// Re-checks the structural invariants over the whole tree.
    ///
    /// Trees built through [`Tree::add_child`] and [`Tree::set_operation`]
    /// already satisfy them; this guards trees assembled or edited elsewhere
    /// before their operations are extracted.
    pub fn check_invariants(&self) -> Result<(), TreeError> {
        for (id, node) in self.nodes_with_ids() {
            let is_root = id == self.root();

            if !is_root && !is_valid_name(node.name()) {
                return Err(TreeError::InvalidName {
                    name: node.name().to_string(),
                });
            }

            if node.kind() == NodeKind::File && !node.children().is_empty() {
                return Err(TreeError::NotAFolder {
                    path: self.path_of(id),
                });
            }

            if let Some(Operation::Rename { target }) = node.operation() {
                if !is_valid_name(target) {
                    return Err(TreeError::InvalidRenameTarget {
                        path: self.path_of(id),
                        target: target.clone(),
                    });
                }
            }

            let mut seen = HashSet::new();
            for child in node.children() {
                let name = self.node(*child).name();
                if !seen.insert(name) {
                    return Err(TreeError::DuplicateName {
                        parent: self.path_of(id),
                        name: name.to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}

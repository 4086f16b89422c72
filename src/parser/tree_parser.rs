use tracing::debug;

use crate::parser::line::{LineEntry, read_line};
use crate::parser::{ParseError, ParseErrorKind, ParseErrors};
use crate::tree::{NodeId, NodeKind, Operation, Tree, TreeError};

pub const DEFAULT_INDENT_WIDTH: usize = 2;

/// Open folder on the nesting stack. `node` is `None` for folders whose own
/// line was in error: their children still nest under them but are not
/// inserted.
#[derive(Debug, Clone, Copy)]
struct Frame {
    node: Option<NodeId>,
    depth: isize,
}

#[derive(Debug)]
struct PreviousEntry {
    depth: isize,
    kind: NodeKind,
    name: String,
}

/// Turns marker-annotated layout text into a [`Tree`].
#[derive(Debug, Clone, Copy)]
pub struct TreeParser {
    indent_width: usize,
}

impl Default for TreeParser {
    fn default() -> Self {
        Self::new(DEFAULT_INDENT_WIDTH)
    }
}

impl TreeParser {
    pub fn new(indent_width: usize) -> Self {
        Self {
            indent_width: indent_width.max(1),
        }
    }

    /// Parses the whole text, collecting every line error. The tree is only
    /// returned when no line was in error.
    pub fn parse(&self, text: &str) -> Result<Tree, ParseErrors> {
        let mut tree = Tree::new();
        let mut stack = vec![Frame {
            node: Some(tree.root()),
            depth: -1,
        }];
        let mut previous: Option<PreviousEntry> = None;
        let mut errors = Vec::new();

        for (index, raw) in text.lines().enumerate() {
            let line_number = index + 1;
            let Some(entry) = read_line(raw, self.indent_width) else {
                debug!("Skipping line {}: not a tree entry", line_number);
                continue;
            };

            let LineEntry {
                columns,
                name,
                kind,
                operation,
                mut problems,
            } = entry;

            if columns % self.indent_width != 0 {
                problems.push(ParseErrorKind::InconsistentIndentation {
                    columns,
                    indent_width: self.indent_width,
                });
            }
            let depth = (columns / self.indent_width) as isize;

            while stack.last().is_some_and(|frame| frame.depth >= depth) {
                stack.pop();
            }
            // The root frame sits at depth -1 and is never popped.
            let parent_frame = stack.last().copied().unwrap_or(Frame {
                node: None,
                depth: -1,
            });

            let parent = if parent_frame.depth == depth - 1 {
                parent_frame.node
            } else {
                problems.push(match &previous {
                    Some(prev) if prev.kind == NodeKind::File && prev.depth == depth - 1 => {
                        ParseErrorKind::NestedUnderFile(prev.name.clone())
                    }
                    _ => ParseErrorKind::UnexpectedIndent,
                });
                None
            };

            let mut node = None;
            if problems.is_empty() {
                if let Some(parent) = parent {
                    match Self::insert(&mut tree, parent, &name, kind, operation) {
                        Ok(id) => node = Some(id),
                        Err(problem) => problems.push(problem),
                    }
                }
            }

            for problem in problems {
                errors.push(ParseError::new(line_number, raw, problem));
            }

            if kind == NodeKind::Folder {
                stack.push(Frame { node, depth });
            }
            previous = Some(PreviousEntry { depth, kind, name });
        }

        if errors.is_empty() {
            debug!("Parsed layout with {} entries", tree.len());
            Ok(tree)
        } else {
            debug!("Layout has {} parse errors", errors.len());
            Err(ParseErrors::new(errors))
        }
    }

    fn insert(
        tree: &mut Tree,
        parent: NodeId,
        name: &str,
        kind: NodeKind,
        operation: Option<Operation>,
    ) -> Result<NodeId, ParseErrorKind> {
        let id = tree
            .add_child(parent, name, kind)
            .map_err(problem_from_tree_error)?;
        tree.set_operation(id, operation)
            .map_err(problem_from_tree_error)?;
        Ok(id)
    }
}

fn problem_from_tree_error(error: TreeError) -> ParseErrorKind {
    match error {
        TreeError::DuplicateName { name, .. } => ParseErrorKind::DuplicateName(name),
        TreeError::InvalidName { name } => ParseErrorKind::InvalidName(name),
        TreeError::InvalidRenameTarget { target, .. } => {
            ParseErrorKind::InvalidRenameTarget(target)
        }
        TreeError::NotAFolder { path } => ParseErrorKind::NestedUnderFile(path.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{TreePath, render};
    use rstest::rstest;

    fn parse(text: &str) -> Result<Tree, ParseErrors> {
        TreeParser::default().parse(text)
    }

    fn kinds(errors: &ParseErrors) -> Vec<(usize, ParseErrorKind)> {
        errors
            .errors()
            .iter()
            .map(|error| (error.line, error.kind.clone()))
            .collect()
    }

    #[test]
    fn builds_nested_structure() {
        let tree = parse("src/\n  main.rs\n  util/\n    mod.rs\nREADME.md\n")
            .expect("layout should parse");

        assert_eq!(
            tree.paths(),
            vec![
                TreePath::from("src"),
                TreePath::from("src/main.rs"),
                TreePath::from("src/util"),
                TreePath::from("src/util/mod.rs"),
                TreePath::from("README.md"),
            ]
        );
    }

    #[test]
    fn skips_comments_and_prose() {
        let text = "# Layout of the project\n\
                    Edit the entries below, then run apply.\n\
                    \n\
                    src/\n\
                    \x20\x20// generated files are not listed\n\
                    \x20\x20lib.rs [+]\n";
        let tree = parse(text).expect("layout should parse");
        assert_eq!(
            tree.paths(),
            vec![TreePath::from("src"), TreePath::from("src/lib.rs")]
        );
    }

    #[test]
    fn attaches_operations() {
        let tree = parse("src/\n  a.txt\n  b.txt [+]\n  old.txt [~ new.txt]\n  gone/ [-]\n")
            .expect("layout should parse");

        let operations: Vec<_> = tree
            .walk()
            .into_iter()
            .map(|(id, path)| (path.to_string(), tree.node(id).operation().cloned()))
            .collect();

        assert_eq!(
            operations,
            vec![
                ("src".to_string(), None),
                ("src/a.txt".to_string(), None),
                ("src/b.txt".to_string(), Some(Operation::Create)),
                (
                    "src/old.txt".to_string(),
                    Some(Operation::Rename {
                        target: "new.txt".into()
                    })
                ),
                ("src/gone".to_string(), Some(Operation::Delete)),
            ]
        );
    }

    #[rstest]
    #[case("a.txt [+] [-]")]
    #[case("a.txt [-] [~ b]")]
    #[case("a.txt [~ b] [+]")]
    fn marker_exclusivity(#[case] line: &str) {
        let errors = parse(&format!("src/\n  {line}\n")).expect_err("layout should fail");
        assert_eq!(kinds(&errors), vec![(2, ParseErrorKind::MultipleMarkers)]);
    }

    #[rstest]
    #[case("a.txt [~b.txt]\n")]
    #[case("a.txt [~  b.txt]\n")]
    fn rename_marker_needs_exactly_one_space(#[case] text: &str) {
        let errors = parse(text).expect_err("layout should fail");
        assert_eq!(kinds(&errors), vec![(1, ParseErrorKind::MisplacedMarker)]);
    }

    #[test]
    fn rejects_escaping_names_at_parse_time() {
        let errors = parse("src/\n  ../escape [+]\n").expect_err("layout should fail");
        assert_eq!(
            kinds(&errors),
            vec![(2, ParseErrorKind::InvalidName("../escape".into()))]
        );
    }

    #[test]
    fn collects_every_error_with_line_numbers() {
        let text = "src/\n  a.txt [~]\n   b.txt\n  a.txt\n  a.txt\nlib/\n      deep.rs\n";
        let errors = parse(text).expect_err("layout should fail");

        assert_eq!(
            kinds(&errors),
            vec![
                (2, ParseErrorKind::MissingRenameTarget),
                (
                    3,
                    ParseErrorKind::InconsistentIndentation {
                        columns: 3,
                        indent_width: 2
                    }
                ),
                (5, ParseErrorKind::DuplicateName("a.txt".into())),
                (7, ParseErrorKind::UnexpectedIndent),
            ]
        );
        assert!(errors.to_string().contains("line 7"));
    }

    #[test]
    fn rejects_children_of_files() {
        let errors = parse("notes.txt\n  inner.txt\n").expect_err("layout should fail");
        assert_eq!(
            kinds(&errors),
            vec![(2, ParseErrorKind::NestedUnderFile("notes.txt".into()))]
        );
    }

    #[test]
    fn children_of_a_broken_folder_do_not_cascade() {
        let errors = parse("bad:name/\n  fine.txt\n  also_fine/\n    deeper.txt\nok.txt\n")
            .expect_err("layout should fail");
        assert_eq!(
            kinds(&errors),
            vec![(1, ParseErrorKind::InvalidName("bad:name".into()))]
        );
    }

    #[test]
    fn honours_configured_indent_width() {
        let tree = TreeParser::new(4)
            .parse("src/\n    main.rs\n")
            .expect("layout should parse");
        assert_eq!(tree.paths()[1], TreePath::from("src/main.rs"));
    }

    #[rstest]
    #[case("")]
    #[case("src/\n  main.rs\n")]
    #[case("a/\n  b/\n    c/\n      d.txt\n  e.txt\nf/\n")]
    #[case("\"My Documents\"/\n  \"#notes.md\"\n  \"odd [+] name\"\nREADME\n")]
    fn unmarked_layouts_round_trip(#[case] text: &str) {
        let tree = parse(text).expect("layout should parse");
        assert_eq!(render(&tree, DEFAULT_INDENT_WIDTH), text);
    }
}

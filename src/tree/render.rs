use crate::tree::{NodeKind, Operation, Tree};

const QUOTE: char = '"';

/// Serializes a tree into the indented layout text read by the parser.
///
/// One line per node, `indent_width` spaces per level, folders suffixed with
/// `/` and operations written as trailing markers.
pub fn render(tree: &Tree, indent_width: usize) -> String {
    let mut output = String::new();

    for (id, path) in tree.walk() {
        let node = tree.node(id);
        let depth = path.depth() - 1;

        output.push_str(&" ".repeat(depth * indent_width));
        push_name(&mut output, node.name());
        if node.kind() == NodeKind::Folder {
            output.push('/');
        }
        if let Some(operation) = node.operation() {
            output.push(' ');
            output.push_str(&marker(operation));
        }
        output.push('\n');
    }

    output
}

fn marker(operation: &Operation) -> String {
    match operation {
        Operation::Create => "[+]".to_string(),
        Operation::Delete => "[-]".to_string(),
        Operation::Rename { target } => format!("[~ {target}]"),
    }
}

/// Names that would otherwise read as prose, comments or markers are quoted.
/// Quotes are reserved in names, so this is unambiguous.
fn needs_quotes(name: &str) -> bool {
    name.chars().any(char::is_whitespace)
        || name.starts_with('#')
        || name.contains("[+]")
        || name.contains("[-]")
        || name.contains("[~")
}

fn push_name(output: &mut String, name: &str) {
    if needs_quotes(name) {
        output.push(QUOTE);
        output.push_str(name);
        output.push(QUOTE);
    } else {
        output.push_str(name);
    }
}

use crate::parser::ParseErrorKind;
use crate::safety::is_valid_name;
use crate::tree::{NodeKind, Operation};

const CREATE_MARKER: &str = "[+]";
const DELETE_MARKER: &str = "[-]";
const RENAME_MARKER_OPEN: &str = "[~";
const COMMENT_SIGILS: [&str; 2] = ["#", "//"];

/// A line recognised as a tree entry, with everything wrong with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LineEntry {
    pub columns: usize,
    pub name: String,
    pub kind: NodeKind,
    pub operation: Option<Operation>,
    pub problems: Vec<ParseErrorKind>,
}

/// Reads one layout line.
///
/// Returns `None` for blank lines, comments and anything that does not look
/// like an entry. Only a bare token or a quoted name, optionally followed by
/// `/` and a marker, counts as an entry.
pub(crate) fn read_line(raw: &str, indent_width: usize) -> Option<LineEntry> {
    let line = raw.trim_end();
    let body_start = line.find(|c: char| c != ' ' && c != '\t')?;
    let (indent, body) = line.split_at(body_start);

    if COMMENT_SIGILS.iter().any(|sigil| body.starts_with(sigil)) {
        return None;
    }

    let columns = indent
        .chars()
        .map(|c| if c == '\t' { indent_width } else { 1 })
        .sum();

    let mut problems = Vec::new();
    let (name, kind, operation) = match body.strip_prefix('"') {
        Some(quoted) => read_quoted(quoted, &mut problems)?,
        None => read_bare(body, &mut problems)?,
    };

    if !problems.iter().any(is_name_problem) && !is_valid_name(&name) {
        problems.push(ParseErrorKind::InvalidName(name.clone()));
    }

    let operation = operation.map(|operation| match operation {
        Operation::Rename { target } => {
            let target = match kind {
                NodeKind::Folder => target.strip_suffix('/').unwrap_or(&target).to_string(),
                NodeKind::File => target,
            };
            if !is_valid_name(&target) {
                problems.push(ParseErrorKind::InvalidRenameTarget(target.clone()));
            }
            Operation::Rename { target }
        }
        other => other,
    });

    Some(LineEntry {
        columns,
        name,
        kind,
        operation,
        problems,
    })
}

type EntryParts = (String, NodeKind, Option<Operation>);

fn read_quoted(quoted: &str, problems: &mut Vec<ParseErrorKind>) -> Option<EntryParts> {
    let Some(end) = quoted.find('"') else {
        problems.push(ParseErrorKind::UnterminatedQuote);
        let (name, kind) = split_folder_suffix(quoted);
        return Some((name.to_string(), kind, None));
    };

    let name = quoted[..end].to_string();
    let (kind, tail) = match quoted[end + 1..].strip_prefix('/') {
        Some(tail) => (NodeKind::Folder, tail),
        None => (NodeKind::File, &quoted[end + 1..]),
    };

    if tail.is_empty() {
        return Some((name, kind, None));
    }

    let markers = marker_positions(tail);
    if markers.is_empty() {
        // `"name" trailing words` reads as prose, not as an entry.
        return None;
    }

    let operation = read_marker(tail, &markers, problems);
    if markers.len() == 1 && &tail[..markers[0]] != " " {
        push_once(problems, ParseErrorKind::MisplacedMarker);
    }

    Some((name, kind, operation))
}

fn read_bare(body: &str, problems: &mut Vec<ParseErrorKind>) -> Option<EntryParts> {
    let markers = marker_positions(body);

    let (name_part, operation) = match markers.first() {
        None => (body, None),
        Some(&first) => {
            let operation = read_marker(body, &markers, problems);
            let prefix = &body[..first];
            let spaced_once = prefix
                .strip_suffix(' ')
                .is_some_and(|name| !name.is_empty() && !name.ends_with(char::is_whitespace));
            if markers.len() == 1 && !spaced_once {
                push_once(problems, ParseErrorKind::MisplacedMarker);
            }
            (prefix.trim_end(), operation)
        }
    };

    let (name, kind) = split_folder_suffix(name_part);
    if name.contains(char::is_whitespace) {
        if markers.is_empty() {
            // Allow-list: unquoted text with spaces is prose.
            return None;
        }
        problems.push(ParseErrorKind::UnquotedWhitespace(name.to_string()));
    }

    Some((name.to_string(), kind, operation))
}

/// Interprets the marker region. Exactly one marker must be present and it
/// must run to the end of the line.
fn read_marker(
    region: &str,
    markers: &[usize],
    problems: &mut Vec<ParseErrorKind>,
) -> Option<Operation> {
    if markers.len() > 1 {
        problems.push(ParseErrorKind::MultipleMarkers);
        return None;
    }

    let token = &region[markers[0]..];
    match token {
        CREATE_MARKER => Some(Operation::Create),
        DELETE_MARKER => Some(Operation::Delete),
        _ if token.starts_with(RENAME_MARKER_OPEN) && token.ends_with(']') => {
            // `[~ name]`: exactly one space after `~`, nothing around the name.
            let inner = &token[RENAME_MARKER_OPEN.len()..token.len() - 1];
            match inner.strip_prefix(' ') {
                None if inner.is_empty() => {
                    problems.push(ParseErrorKind::MissingRenameTarget);
                    None
                }
                Some(target) if target.trim().is_empty() => {
                    problems.push(ParseErrorKind::MissingRenameTarget);
                    None
                }
                Some(target) if target.trim() == target => Some(Operation::Rename {
                    target: target.to_string(),
                }),
                _ => {
                    push_once(problems, ParseErrorKind::MisplacedMarker);
                    None
                }
            }
        }
        _ => {
            push_once(problems, ParseErrorKind::MisplacedMarker);
            None
        }
    }
}

/// Byte offsets of every marker token in `text`, in order.
fn marker_positions(text: &str) -> Vec<usize> {
    let mut positions: Vec<usize> = [CREATE_MARKER, DELETE_MARKER, RENAME_MARKER_OPEN]
        .iter()
        .flat_map(|marker| text.match_indices(marker).map(|(index, _)| index))
        .collect();
    positions.sort_unstable();
    positions
}

fn split_folder_suffix(name: &str) -> (&str, NodeKind) {
    match name.strip_suffix('/') {
        Some(stripped) => (stripped, NodeKind::Folder),
        None => (name, NodeKind::File),
    }
}

fn is_name_problem(problem: &ParseErrorKind) -> bool {
    matches!(
        problem,
        ParseErrorKind::UnquotedWhitespace(_) | ParseErrorKind::UnterminatedQuote
    )
}

fn push_once(problems: &mut Vec<ParseErrorKind>, problem: ParseErrorKind) {
    if !problems.contains(&problem) {
        problems.push(problem);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn entry(raw: &str) -> LineEntry {
        read_line(raw, 2).expect("line should be an entry")
    }

    #[rstest]
    #[case("")]
    #[case("    ")]
    #[case("# a heading")]
    #[case("  // a note")]
    #[case("Edit the tree below, then run apply.")]
    #[case("\"quoted\" followed by words")]
    fn skips_lines_that_are_not_entries(#[case] raw: &str) {
        assert_eq!(read_line(raw, 2), None);
    }

    #[test]
    fn reads_plain_file_and_folder() {
        let file = entry("    main.rs");
        assert_eq!(file.columns, 4);
        assert_eq!(file.name, "main.rs");
        assert_eq!(file.kind, NodeKind::File);
        assert!(file.problems.is_empty());

        let folder = entry("src/");
        assert_eq!(folder.name, "src");
        assert_eq!(folder.kind, NodeKind::Folder);
    }

    #[test]
    fn tabs_count_as_one_indent_unit() {
        assert_eq!(entry("\t\ta.txt").columns, 4);
    }

    #[rstest]
    #[case("a.txt [+]", Operation::Create)]
    #[case("a.txt [-]", Operation::Delete)]
    #[case("a.txt [~ b.txt]", Operation::Rename { target: "b.txt".into() })]
    #[case("a.txt [~ my notes.txt]", Operation::Rename { target: "my notes.txt".into() })]
    fn reads_markers(#[case] raw: &str, #[case] expected: Operation) {
        let entry = entry(raw);
        assert_eq!(entry.name, "a.txt");
        assert_eq!(entry.operation, Some(expected));
        assert!(entry.problems.is_empty());
    }

    #[test]
    fn folder_rename_target_may_carry_a_slash() {
        let entry = entry("docs/ [~ manual/]");
        assert_eq!(
            entry.operation,
            Some(Operation::Rename {
                target: "manual".into()
            })
        );
        assert!(entry.problems.is_empty());
    }

    #[rstest]
    #[case("a.txt [+] [-]")]
    #[case("a.txt [-] [+]")]
    #[case("a.txt [+] [~ b]")]
    #[case("a.txt [~ b] [-]")]
    #[case("a.txt [+][-]")]
    fn rejects_more_than_one_marker(#[case] raw: &str) {
        assert!(entry(raw).problems.contains(&ParseErrorKind::MultipleMarkers));
    }

    #[rstest]
    #[case("a.txt [~]")]
    #[case("a.txt [~ ]")]
    fn rejects_rename_without_target(#[case] raw: &str) {
        assert_eq!(entry(raw).problems, vec![ParseErrorKind::MissingRenameTarget]);
    }

    #[rstest]
    #[case("a.txt[+]")]
    #[case("a.txt  [+]")]
    #[case("a.txt [+] trailing")]
    #[case("a.txt [~ b")]
    #[case("a.txt [~b.txt]")]
    #[case("a.txt [~   b.txt]")]
    #[case("a.txt [~ b.txt ]")]
    fn rejects_misplaced_markers(#[case] raw: &str) {
        assert!(entry(raw).problems.contains(&ParseErrorKind::MisplacedMarker));
    }

    #[test]
    fn rejects_invalid_names() {
        assert_eq!(
            entry("../escape").problems,
            vec![ParseErrorKind::InvalidName("../escape".into())]
        );
        assert_eq!(
            entry("a.txt [~ ../b]").problems,
            vec![ParseErrorKind::InvalidRenameTarget("../b".into())]
        );
    }

    #[test]
    fn marked_names_with_spaces_must_be_quoted() {
        assert_eq!(
            entry("my file.txt [+]").problems,
            vec![ParseErrorKind::UnquotedWhitespace("my file.txt".into())]
        );

        let quoted = entry("\"my file.txt\" [+]");
        assert_eq!(quoted.name, "my file.txt");
        assert_eq!(quoted.operation, Some(Operation::Create));
        assert!(quoted.problems.is_empty());
    }

    #[test]
    fn quoted_names_may_contain_marker_text() {
        let quoted = entry("\"odd [+] name\"/ [-]");
        assert_eq!(quoted.name, "odd [+] name");
        assert_eq!(quoted.kind, NodeKind::Folder);
        assert_eq!(quoted.operation, Some(Operation::Delete));
        assert!(quoted.problems.is_empty());
    }

    #[test]
    fn reports_unterminated_quote() {
        assert_eq!(
            entry("\"broken name").problems,
            vec![ParseErrorKind::UnterminatedQuote]
        );
    }
}

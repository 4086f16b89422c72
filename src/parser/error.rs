use derive_more::Display;
use snafu::Snafu;

/// What is wrong with a single layout line.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseErrorKind {
    #[display("more than one marker on the same line")]
    MultipleMarkers,
    #[display("rename marker has no target name")]
    MissingRenameTarget,
    #[display("a marker must follow the name after exactly one space and end the line")]
    MisplacedMarker,
    #[display("'{_0}' is not a valid file or folder name")]
    InvalidName(String),
    #[display("names containing whitespace must be quoted: '{_0}'")]
    UnquotedWhitespace(String),
    #[display("'{_0}' is not a valid rename target")]
    InvalidRenameTarget(String),
    #[display("quoted name is missing its closing quote")]
    UnterminatedQuote,
    #[display("indentation of {columns} columns is not a multiple of {indent_width}")]
    InconsistentIndentation { columns: usize, indent_width: usize },
    #[display("indented deeper than any enclosing folder")]
    UnexpectedIndent,
    #[display("entries cannot be nested under the file '{_0}'")]
    NestedUnderFile(String),
    #[display("'{_0}' appears more than once in the same folder")]
    DuplicateName(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(display("line {}: {}: `{}`", line, kind, text))]
pub struct ParseError {
    pub line: usize,
    pub text: String,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub(crate) fn new(line: usize, text: &str, kind: ParseErrorKind) -> Self {
        ParseSnafu {
            line,
            text: text.trim_end(),
            kind,
        }
        .build()
    }
}

/// Every error found in a layout. Parsing is all-or-nothing: a tree is only
/// produced when this list would be empty.
#[derive(Debug, Snafu)]
#[snafu(display("Layout contains {} error(s):\n{}", errors.len(), list_errors(errors)))]
pub struct ParseErrors {
    errors: Vec<ParseError>,
}

impl ParseErrors {
    pub(crate) fn new(errors: Vec<ParseError>) -> Self {
        ParseErrors { errors }
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }
}

fn list_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|error| format!("  {error}"))
        .collect::<Vec<_>>()
        .join("\n")
}

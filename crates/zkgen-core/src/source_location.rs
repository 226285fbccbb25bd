use serde::{Deserialize, Serialize};
use std::fmt;

/// Line/column range of an AST node as reported by the parser.
///
/// Field names follow the parser's JSON output so nodes can be flattened
/// straight into `Node` without renaming.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Span {
    pub first_line: u32,
    pub first_column: u32,
    pub last_line: u32,
    pub last_column: u32,
}

impl Span {
    pub fn new(first_line: u32, first_column: u32, last_line: u32, last_column: u32) -> Self {
        Self {
            first_line,
            first_column,
            last_line,
            last_column,
        }
    }

    /// Single-line span.
    pub fn line(line: u32, first_column: u32, last_column: u32) -> Self {
        Self::new(line, first_column, line, last_column)
    }

    /// A span is unknown when the node was built without position metadata.
    #[inline]
    pub fn is_unknown(&self) -> bool {
        *self == Span::default()
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unknown() {
            return write!(f, "<unknown>");
        }
        write!(
            f,
            "{}:{}-{}:{}",
            self.first_line, self.first_column, self.last_line, self.last_column
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_display() {
        assert_eq!(Span::new(3, 5, 4, 1).to_string(), "3:5-4:1");
        assert_eq!(Span::default().to_string(), "<unknown>");
    }

    #[test]
    fn test_single_line_span() {
        assert_eq!(Span::line(2, 4, 9), Span::new(2, 4, 2, 9));
        assert_eq!(Span::line(2, 4, 9).to_string(), "2:4-2:9");
    }

    #[test]
    fn test_span_from_parser_json() {
        let span: Span =
            serde_json::from_str(r#"{"first_line": 7, "first_column": 2}"#).unwrap();
        assert_eq!(span.first_line, 7);
        assert_eq!(span.first_column, 2);
        assert_eq!(span.last_line, 0);
        assert!(!span.is_unknown());
    }
}

//! Line preprocessing
//!
//!     AutoIt is line oriented: every statement starts on a fresh physical line, and the
//!     only thing the parser needs before dispatching is each line's code part and its
//!     trailing comment. This module produces exactly that, once, as an immutable list of
//!     [RawLine]s that every later stage borrows.
//!
//! Comments
//!
//!     A comment starts at the first `;` of the line and runs to the end of it. The scan
//!     is literal: a `;` inside a string literal is taken as the comment start too, so
//!     `$s = "a;b"` yields the content `$s = "a` and the comment `b"`. This is a known
//!     limitation, kept on purpose so line splitting stays a single pass with no
//!     knowledge of the expression grammar.
//!
//!     Both parts are trimmed. The physical text of the line is kept alongside them so
//!     that verbatim constructs (`#comments-start` blocks) can reproduce what was written.

use serde::Serialize;
use std::fmt;

/// Marker that opens a trailing comment.
pub const COMMENT_MARKER: char = ';';

/// One physical line of source, split into code and trailing comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawLine {
    /// 1-based line number in the source.
    pub number: usize,
    /// Code before the first `;`, trimmed.
    pub content: String,
    /// Text after the first `;`, trimmed. Empty when the line has no comment.
    pub comment: String,
    /// The physical line without its terminator.
    pub raw: String,
}

impl RawLine {
    pub fn new(number: usize, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let (content, comment) = split_comment(&raw);
        Self {
            number,
            content: content.to_string(),
            comment: comment.to_string(),
            raw,
        }
    }

    /// True when nothing but whitespace precedes the comment marker.
    pub fn is_blank(&self) -> bool {
        self.content.is_empty()
    }

    /// First whitespace-separated word of the content, or `""` for a blank line.
    pub fn first_word(&self) -> &str {
        self.content.split_whitespace().next().unwrap_or("")
    }
}

impl fmt::Display for RawLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.number, self.content)?;
        if !self.comment.is_empty() {
            write!(f, " ; {}", self.comment)?;
        }
        Ok(())
    }
}

/// Split a physical line into trimmed `(content, comment)`.
pub fn split_comment(line: &str) -> (&str, &str) {
    match line.find(COMMENT_MARKER) {
        Some(idx) => (
            line[..idx].trim(),
            line[idx + COMMENT_MARKER.len_utf8()..].trim(),
        ),
        None => (line.trim(), ""),
    }
}

/// Split source text into numbered raw lines.
///
/// Both `\n` and `\r\n` terminate a line. A trailing terminator does not produce an
/// extra empty line. Never fails.
pub fn split_lines(source: &str) -> Vec<RawLine> {
    source
        .lines()
        .enumerate()
        .map(|(idx, line)| RawLine::new(idx + 1, line))
        .collect()
}

/// Index of the first line at or after `start` whose content satisfies `predicate`.
pub fn find_line<F>(lines: &[RawLine], start: usize, predicate: F) -> Option<usize>
where
    F: Fn(&str) -> bool,
{
    lines
        .iter()
        .enumerate()
        .skip(start)
        .find(|(_, line)| predicate(&line.content))
        .map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines_numbers_from_one() {
        let lines = split_lines("Local $a = 1\n\n#pragma compile(Out, x.exe)\n");

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].number, 1);
        assert_eq!(lines[0].content, "Local $a = 1");
        assert!(lines[1].is_blank());
        assert_eq!(lines[2].number, 3);
        assert_eq!(lines[2].first_word(), "#pragma");
    }

    #[test]
    fn test_comment_is_text_after_marker() {
        let line = RawLine::new(7, "   $x = 1   ;   set x  ");

        assert_eq!(line.content, "$x = 1");
        assert_eq!(line.comment, "set x");
        assert_eq!(line.raw, "   $x = 1   ;   set x  ");
    }

    #[test]
    fn test_comment_only_line() {
        let line = RawLine::new(1, "; just a note");

        assert!(line.is_blank());
        assert_eq!(line.comment, "just a note");
    }

    #[test]
    fn test_semicolon_inside_string_starts_comment() {
        let line = RawLine::new(1, "Local $s = \"a;b\"");

        assert_eq!(line.content, "Local $s = \"a");
        assert_eq!(line.comment, "b\"");
    }

    #[test]
    fn test_crlf_line_endings() {
        let lines = split_lines("#cs\r\ntext\r\n#ce\r\n");

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].raw, "text");
        assert_eq!(lines[2].content, "#ce");
    }

    #[test]
    fn test_find_line() {
        let lines = split_lines("a\nb\nc\nb");

        assert_eq!(find_line(&lines, 0, |c| c == "b"), Some(1));
        assert_eq!(find_line(&lines, 2, |c| c == "b"), Some(3));
        assert_eq!(find_line(&lines, 0, |c| c == "z"), None);
    }

    #[test]
    fn test_display() {
        let line = RawLine::new(4, "Dim $x ; note");
        assert_eq!(line.to_string(), "line 4: Dim $x ; note");
    }
}

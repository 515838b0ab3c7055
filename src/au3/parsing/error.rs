//! Parse errors
//!
//!     Every failure is fatal: the first error aborts the whole parse and is returned to
//!     the caller unchanged. Errors raised inside an expression know only their byte offset
//!     in the expression text; the statement that owns the expression re-anchors them to
//!     the line they came from so the message points at the offending text.

use crate::au3::lexing::RawLine;
use std::fmt;
use thiserror::Error;

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No recognizer matches the line.
    UnrecognizedStatement,
    /// A recognizer matched but the line does not follow its grammar.
    MalformedDirective,
    /// Missing `#comments-end` or `EndIf`, unterminated string, paren, bracket or call.
    UnterminatedConstruct,
    /// Second decimal point, decimal point in a hex literal, or a value out of range.
    InvalidNumberLiteral,
    /// Identifier starting with something other than a letter or `_`, or a declared name
    /// without `$`.
    InvalidIdentifier,
    /// Expression ends where an operand is expected.
    MissingOperand,
    /// A character that cannot start an operand.
    UnexpectedToken,
    /// Leftover input after a complete expression.
    UnexpectedTrailingInput,
    /// Expected `,` between list items.
    MissingDelimiter,
    /// Keyword operator not followed by whitespace.
    OperatorSpacingError,
    /// Nesting exceeds the configured ceiling.
    NestingTooDeep,
}

impl ErrorKind {
    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::UnrecognizedStatement => "UnrecognizedStatement",
            ErrorKind::MalformedDirective => "MalformedDirective",
            ErrorKind::UnterminatedConstruct => "UnterminatedConstruct",
            ErrorKind::InvalidNumberLiteral => "InvalidNumberLiteral",
            ErrorKind::InvalidIdentifier => "InvalidIdentifier",
            ErrorKind::MissingOperand => "MissingOperand",
            ErrorKind::UnexpectedToken => "UnexpectedToken",
            ErrorKind::UnexpectedTrailingInput => "UnexpectedTrailingInput",
            ErrorKind::MissingDelimiter => "MissingDelimiter",
            ErrorKind::OperatorSpacingError => "OperatorSpacingError",
            ErrorKind::NestingTooDeep => "NestingTooDeep",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where an error happened.
///
/// `offset` is the byte offset inside the expression text being parsed; `line` and
/// `column` are filled once the error is tied to a source line. `column` is 1-based and
/// counts bytes of `source_line`, the physical line including its indentation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub line: Option<usize>,
    pub column: Option<usize>,
    pub offset: Option<usize>,
    pub source_line: Option<String>,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.column, self.offset) {
            (Some(line), Some(column), _) => write!(f, " at line {line}, column {column}"),
            (Some(line), None, _) => write!(f, " at line {line}"),
            (None, _, Some(offset)) => write!(f, " at offset {offset}"),
            (None, _, None) => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}{location}")]
pub struct ParseError {
    pub kind: ErrorKind,
    pub message: String,
    pub location: Location,
}

pub type ParseResult<T> = Result<T, ParseError>;

impl ParseError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            location: Location::default(),
        }
    }

    pub(crate) fn at_offset(mut self, offset: usize) -> Self {
        self.location.offset = Some(offset);
        self
    }

    /// Tie the error to a whole source line.
    pub(crate) fn at_line(mut self, line: &RawLine) -> Self {
        self.location.line = Some(line.number);
        self.location.source_line = Some(line.raw.clone());
        self
    }

    /// Tie an expression error to the line it came from. `base` is the byte position of
    /// the expression text inside the line's content. Errors that already carry a line
    /// are left alone.
    pub(crate) fn anchored(mut self, line: &RawLine, base: usize) -> Self {
        if self.location.line.is_some() {
            return self;
        }
        let indent = line.raw.len() - line.raw.trim_start().len();
        self.location.column = self
            .location
            .offset
            .map(|offset| indent + base + offset + 1);
        self.at_line(line)
    }

    pub fn line(&self) -> Option<usize> {
        self.location.line
    }

    /// Numbered source lines around the failing line, or `None` when the error has no
    /// line.
    pub fn source_context(&self, source: &str) -> Option<String> {
        self.location
            .line
            .map(|line| format_source_context(source, line))
    }
}

/// Format source code context around a 1-based line number
///
/// Shows 2 lines before the error, the error line with >> marker, and 2 lines after.
pub fn format_source_context(source: &str, line_number: usize) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let error_line = line_number.saturating_sub(1);

    let start_line = error_line.saturating_sub(2);
    let end_line = (error_line + 3).min(lines.len());

    let mut context = String::new();
    for (idx, text) in lines.iter().enumerate().take(end_line).skip(start_line) {
        let marker = if idx == error_line { ">>" } else { "  " };
        context.push_str(&format!("{} {:3} | {}\n", marker, idx + 1, text));
    }
    context
}

//! Blocks: ordered statement sequences
//!
//!     A [Block] is what the block parser returns: every statement it recognized, in
//!     source order, each tagged with the line it started on and that line's trailing
//!     comment. A whole script is a top-level block ([Script]).

use super::render::SourceWriter;
use super::statement::Statement;
use serde::Serialize;
use std::fmt;

/// A statement together with where it started and its trailing comment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockLine {
    /// 1-based number of the statement's first line.
    pub line_number: usize,
    pub statement: Statement,
    /// Comment of the statement's first line, empty if none.
    pub trailing_comment: String,
}

impl BlockLine {
    pub fn new(line_number: usize, statement: Statement) -> Self {
        Self {
            line_number,
            statement,
            trailing_comment: String::new(),
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.trailing_comment = comment.into();
        self
    }

    pub(crate) fn write_source(&self, out: &mut SourceWriter) {
        let first = out.mark();
        self.statement.write_source(out);
        out.annotate(first, &self.trailing_comment);
    }
}

impl fmt::Display for BlockLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = SourceWriter::new();
        self.write_source(&mut out);
        f.write_str(&out.finish())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Block {
    lines: Vec<BlockLine>,
}

/// A parsed script: the top-level block.
pub type Script = Block;

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lines(lines: Vec<BlockLine>) -> Self {
        Self { lines }
    }

    pub fn push(&mut self, line: BlockLine) {
        self.lines.push(line);
    }

    pub fn lines(&self) -> &[BlockLine] {
        &self.lines
    }

    pub fn get(&self, idx: usize) -> Option<&BlockLine> {
        self.lines.get(idx)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BlockLine> {
        self.lines.iter()
    }

    /// Iterate the statements only, dropping line numbers and comments.
    pub fn statements(&self) -> impl Iterator<Item = &Statement> {
        self.lines.iter().map(|line| &line.statement)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Physical lines covered by the block in canonical form.
    pub fn line_span(&self) -> usize {
        self.lines.iter().map(|line| line.statement.line_span()).sum()
    }

    pub(crate) fn write_source(&self, out: &mut SourceWriter) {
        for line in &self.lines {
            line.write_source(out);
        }
    }

    /// Canonical source text of the block.
    pub fn to_source(&self) -> String {
        let mut out = SourceWriter::new();
        self.write_source(&mut out);
        out.finish()
    }
}

impl<'a> IntoIterator for &'a Block {
    type Item = &'a BlockLine;
    type IntoIter = std::slice::Iter<'a, BlockLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_source())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::au3::ast::{ConditionBlock, Expression};

    #[test]
    fn test_trailing_comment_goes_on_first_line() {
        let body = Block::from_lines(vec![BlockLine::new(2, Statement::Empty).with_comment("inner")]);
        let statement = Statement::If {
            branches: vec![ConditionBlock {
                condition: Expression::value(true),
                body,
            }],
            else_block: None,
        };
        let block = Block::from_lines(vec![
            BlockLine::new(1, statement).with_comment("outer"),
            BlockLine::new(4, Statement::Empty),
        ]);

        assert_eq!(
            block.to_source(),
            "If True Then ; outer\n    ; inner\nEndIf\n"
        );
        assert_eq!(block.line_span(), 4);
    }

    #[test]
    fn test_statements_iterator() {
        let block = Block::from_lines(vec![
            BlockLine::new(1, Statement::Flag { name: "a".into() }),
            BlockLine::new(2, Statement::Empty),
        ]);
        let kinds: Vec<_> = block.statements().map(Statement::kind_name).collect();

        assert_eq!(kinds, vec!["Flag", "Empty"]);
        assert_eq!(block.len(), 2);
    }
}

//! Block parser
//!
//!     Drives the statement dispatcher over a run of lines. Top-level parsing has no end
//!     condition and stops at end of input. Nested bodies stop at the first line whose
//!     content satisfies their [BlockEnd]; that line is left for the caller to interpret
//!     (an `If` needs to know whether it stopped at `ElseIf`, `Else` or `EndIf`).

use super::error::{ErrorKind, ParseError, ParseResult};
use super::expressions::{ExpressionOptions, ExpressionParser};
use super::statements;
use crate::au3::ast::{Block, BlockLine, Expression};
use crate::au3::config::ParserSettings;
use crate::au3::lexing::RawLine;
use tracing::trace;

/// Where a nested block stops.
#[derive(Debug, Clone, Copy)]
pub struct BlockEnd {
    /// Name of the expected closing line, for error messages.
    pub expected: &'static str,
    /// Tested against each line's content before it is parsed.
    pub predicate: fn(&str) -> bool,
}

impl BlockEnd {
    pub fn new(expected: &'static str, predicate: fn(&str) -> bool) -> Self {
        Self {
            expected,
            predicate,
        }
    }

    pub fn is_end(&self, content: &str) -> bool {
        (self.predicate)(content)
    }
}

/// Shared state of one parse: the immutable line list and the current block nesting.
pub(crate) struct ScriptParser<'a> {
    lines: &'a [RawLine],
    max_depth: usize,
    depth: usize,
}

impl<'a> ScriptParser<'a> {
    pub(crate) fn new(lines: &'a [RawLine], settings: &ParserSettings) -> Self {
        Self {
            lines,
            max_depth: settings.max_nesting_depth,
            depth: 0,
        }
    }

    pub(crate) fn lines(&self) -> &'a [RawLine] {
        self.lines
    }

    /// Parse expression `text` found at byte `base` of `line`'s content. Errors are
    /// re-anchored to the line.
    pub(crate) fn expression(
        &self,
        line: &RawLine,
        base: usize,
        text: &str,
        options: ExpressionOptions<'_>,
    ) -> ParseResult<(Expression, usize)> {
        ExpressionParser::new(text, self.depth, self.max_depth)
            .parse(options)
            .map_err(|err| err.anchored(line, base))
    }

    /// Run `parse` one block level deeper. `line` is the line that opens the level.
    pub(crate) fn nested<T, F>(&mut self, line: &RawLine, parse: F) -> ParseResult<T>
    where
        F: FnOnce(&mut Self) -> ParseResult<T>,
    {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(ParseError::new(
                ErrorKind::NestingTooDeep,
                format!("blocks nested deeper than {} levels", self.max_depth),
            )
            .at_line(line));
        }
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// Parse statements from `start` until `end` is met or input runs out.
    ///
    /// Returns the block and the index of the line that met the end condition (not
    /// consumed), or the line count when parsing ran to the end of input.
    pub(crate) fn parse_block(
        &mut self,
        start: usize,
        end: Option<BlockEnd>,
    ) -> ParseResult<(Block, usize)> {
        let lines = self.lines;
        let mut block = Block::new();
        let mut index = start;

        while let Some(line) = lines.get(index) {
            if end.is_some_and(|end| end.is_end(&line.content)) {
                return Ok((block, index));
            }
            let (statement, next) = statements::parse_statement(self, index)?;
            block.push(BlockLine::new(line.number, statement).with_comment(line.comment.clone()));
            index = next;
        }

        match end {
            None => Ok((block, index)),
            Some(end) => {
                let err = ParseError::new(
                    ErrorKind::UnterminatedConstruct,
                    format!("missing {}", end.expected),
                );
                let opener = start.checked_sub(1).or(lines.len().checked_sub(1));
                trace!(expected = end.expected, "block ran out of input");
                Err(match opener.and_then(|idx| lines.get(idx)) {
                    Some(line) => err.at_line(line),
                    None => err,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::au3::ast::Statement;
    use crate::au3::lexing::split_lines;

    fn parse(source: &str, end: Option<BlockEnd>) -> ParseResult<(Block, usize)> {
        let lines = split_lines(source);
        ScriptParser::new(&lines, &ParserSettings::default()).parse_block(0, end)
    }

    #[test]
    fn test_top_level_runs_to_end() {
        let (block, next) = parse("#a\n\n#b ; note", None).unwrap();

        assert_eq!(block.len(), 3);
        assert_eq!(next, 3);
        assert_eq!(block.get(1).unwrap().statement, Statement::Empty);
        assert_eq!(block.get(2).unwrap().line_number, 3);
        assert_eq!(block.get(2).unwrap().trailing_comment, "note");
    }

    #[test]
    fn test_stops_before_end_line() {
        let end = BlockEnd::new("stop", |content| content == "stop");
        let (block, next) = parse("#a\n#b\nstop\n#c", Some(end)).unwrap();

        assert_eq!(block.len(), 2);
        assert_eq!(next, 2);
    }

    #[test]
    fn test_missing_end_line() {
        let end = BlockEnd::new("stop", |content| content == "stop");
        let err = parse("#a\n#b", Some(end)).unwrap_err();

        assert_eq!(err.kind, ErrorKind::UnterminatedConstruct);
        assert_eq!(err.message, "missing stop");
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn test_block_line_numbers_are_contiguous() {
        let (block, _) = parse("#cs\nx\n#ce\n#flag", None).unwrap();
        let numbers: Vec<_> = block.iter().map(|line| line.line_number).collect();

        assert_eq!(numbers, vec![1, 4]);
        assert_eq!(block.line_span(), 4);
    }
}

//! Parsing
//!
//!     Source text goes through four stages:
//!
//!         source --split_lines--> [RawLine] --block parser--> Script
//!                                       \--statement dispatcher--> Statement
//!                                              \--expression parser--> Expression
//!
//!     The line list is built once and shared read-only by every stage. Nested constructs
//!     (an `If` body, a call argument) recurse into the stage that handles them with the
//!     same line list. The first error aborts the whole parse; there is no recovery.
//!
//!     - [error]: error kinds and locations.
//!     - [operators]: operator table (symbols, strengths, matching order).
//!     - [expressions]: precedence-climbing expression parser.
//!     - [statements]: ordered statement recognizers.
//!     - [blocks]: block parser and end conditions.

pub mod blocks;
pub mod error;
pub mod expressions;
pub mod operators;
pub mod statements;

pub use blocks::BlockEnd;
pub use error::{format_source_context, ErrorKind, Location, ParseError, ParseResult};
pub use expressions::{parse_expression, parse_expression_with, ExpressionOptions};
pub use operators::Strength;

use crate::au3::ast::{Block, Script, Statement};
use crate::au3::config::ParserSettings;
use crate::au3::lexing::{split_lines, RawLine};
use blocks::ScriptParser;
use tracing::{debug, debug_span};

/// Parse a whole script with default settings.
pub fn parse_script(source: &str) -> ParseResult<Script> {
    parse_script_with(source, &ParserSettings::default())
}

pub fn parse_script_with(source: &str, settings: &ParserSettings) -> ParseResult<Script> {
    let lines = split_lines(source);
    let span = debug_span!("parse_script", lines = lines.len());
    let _guard = span.enter();

    match parse_block(&lines, 0, None, settings) {
        Ok((script, _)) => {
            debug!(statements = script.len(), "parsed script");
            Ok(script)
        }
        Err(err) => {
            debug!(kind = %err.kind, line = ?err.line(), "parse failed");
            Err(err)
        }
    }
}

/// Parse the statement starting at `lines[index]`, returning it and the index of the
/// first line after it.
pub fn parse_statement(
    lines: &[RawLine],
    index: usize,
    settings: &ParserSettings,
) -> ParseResult<(Statement, usize)> {
    statements::parse_statement(&mut ScriptParser::new(lines, settings), index)
}

/// Parse statements from `lines[start]` until `end` is met or input runs out.
///
/// The returned index is that of the line meeting the end condition, which is left
/// unconsumed.
pub fn parse_block(
    lines: &[RawLine],
    start: usize,
    end: Option<BlockEnd>,
    settings: &ParserSettings,
) -> ParseResult<(Block, usize)> {
    ScriptParser::new(lines, settings).parse_block(start, end)
}

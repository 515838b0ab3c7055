//! Statement dispatcher
//!
//!     Statements are recognized by an ordered registry of [Recognizer]s. Each one looks at
//!     the line cheaply ([Recognizer::is_match]) and the dispatcher commits to the first
//!     that claims it: a recognizer that matches but cannot parse the line fails the whole
//!     parse, lower-priority recognizers are never tried.
//!
//! Priority
//!
//!     1. `#pragma <setting>`
//!     2. `#include <name>` / `#include "name"`
//!     3. `#OnAutoItStartRegister "name"`
//!     4. `#comments-start` / `#cs` ... `#comments-end` / `#ce`
//!     5. any other `#flag`
//!     6. `Local` / `Global` / `Dim` / `Const` declarations
//!     7. `If <cond> Then` ... `ElseIf <cond> Then` ... `Else` ... `EndIf`
//!     8. empty line
//!
//!     One-line directives are matched with fixed templates (see [crate::au3::template]).

use super::blocks::{BlockEnd, ScriptParser};
use super::error::{ErrorKind, ParseError, ParseResult};
use super::expressions::ExpressionOptions;
use crate::au3::ast::{Bindings, ConditionBlock, Expression, IncludeRelativity, Scope, Statement};
use crate::au3::lexing::{find_line, RawLine};
use crate::au3::template::Template;
use once_cell::sync::Lazy;
use tracing::trace;

static PRAGMA: Lazy<Template> =
    Lazy::new(|| Template::compile("#pragma {setting}").expect("valid pragma template"));
static INCLUDE: Lazy<Template> = Lazy::new(|| {
    Template::compile("#include {open:1}{name}{close:1}").expect("valid include template")
});
static START_REGISTER: Lazy<Template> = Lazy::new(|| {
    Template::compile("#OnAutoItStartRegister \"{function_name}\"")
        .expect("valid start register template")
});
static FLAG: Lazy<Template> =
    Lazy::new(|| Template::compile("#{flag_name}").expect("valid flag template"));

const COMMENTS_START: [&str; 2] = ["#comments-start", "#cs"];
const COMMENTS_END: [&str; 2] = ["#comments-end", "#ce"];

/// One statement kind.
pub(crate) trait Recognizer: Sync {
    fn name(&self) -> &'static str;

    /// Whether this recognizer claims the line.
    fn is_match(&self, line: &RawLine) -> bool;

    /// Parse the statement starting at `index`, returning it and the index of the first
    /// line after it.
    fn parse(&self, parser: &mut ScriptParser<'_>, index: usize) -> ParseResult<(Statement, usize)>;

    /// `None` when the line is not claimed.
    fn try_parse(
        &self,
        parser: &mut ScriptParser<'_>,
        index: usize,
    ) -> Option<ParseResult<(Statement, usize)>> {
        let line = parser.lines().get(index)?;
        if self.is_match(line) {
            Some(self.parse(parser, index))
        } else {
            None
        }
    }
}

static RECOGNIZERS: &[&dyn Recognizer] = &[
    &PragmaRecognizer,
    &IncludeRecognizer,
    &StartRegisterRecognizer,
    &CommentsBlockRecognizer,
    &FlagRecognizer,
    &DeclarationRecognizer,
    &IfRecognizer,
    &EmptyRecognizer,
];

/// Names of the registered recognizers, in priority order.
pub fn recognizer_names() -> Vec<&'static str> {
    RECOGNIZERS.iter().map(|r| r.name()).collect()
}

pub(crate) fn parse_statement(
    parser: &mut ScriptParser<'_>,
    index: usize,
) -> ParseResult<(Statement, usize)> {
    let lines = parser.lines();
    let Some(line) = lines.get(index) else {
        return Err(ParseError::new(
            ErrorKind::UnterminatedConstruct,
            "unexpected end of input",
        ));
    };
    for recognizer in RECOGNIZERS {
        if let Some(result) = recognizer.try_parse(parser, index) {
            if result.is_ok() {
                trace!(recognizer = recognizer.name(), line = line.number, "recognized statement");
            }
            return result;
        }
    }
    Err(ParseError::new(
        ErrorKind::UnrecognizedStatement,
        format!("no statement matches '{}'", line.content),
    )
    .at_line(line))
}

fn malformed(line: &RawLine, expected: &str) -> ParseError {
    ParseError::new(
        ErrorKind::MalformedDirective,
        format!("expected {expected}, found '{}'", line.content),
    )
    .at_line(line)
}

fn line_at<'a>(parser: &ScriptParser<'a>, index: usize) -> ParseResult<&'a RawLine> {
    parser.lines().get(index).ok_or_else(|| {
        ParseError::new(ErrorKind::UnterminatedConstruct, "unexpected end of input")
    })
}

struct PragmaRecognizer;

impl Recognizer for PragmaRecognizer {
    fn name(&self) -> &'static str {
        "Pragma"
    }

    fn is_match(&self, line: &RawLine) -> bool {
        line.first_word() == "#pragma"
    }

    fn parse(&self, parser: &mut ScriptParser<'_>, index: usize) -> ParseResult<(Statement, usize)> {
        let line = line_at(parser, index)?;
        let found = PRAGMA
            .matches(&line.content)
            .and_then(|m| m.get("setting").map(|s| s.trim().to_string()));
        match found {
            Some(setting) => Ok((Statement::Pragma { setting }, index + 1)),
            None => Err(malformed(line, "'#pragma <setting>'")),
        }
    }
}

struct IncludeRecognizer;

impl Recognizer for IncludeRecognizer {
    fn name(&self) -> &'static str {
        "Include"
    }

    fn is_match(&self, line: &RawLine) -> bool {
        line.first_word() == "#include"
    }

    fn parse(&self, parser: &mut ScriptParser<'_>, index: usize) -> ParseResult<(Statement, usize)> {
        let line = line_at(parser, index)?;
        let expected = "'#include <name>' or '#include \"name\"'";
        let m = INCLUDE
            .matches(&line.content)
            .ok_or_else(|| malformed(line, expected))?;
        let (Some(open), Some(name), Some(close)) = (m.get("open"), m.get("name"), m.get("close"))
        else {
            return Err(malformed(line, expected));
        };
        let relativity =
            IncludeRelativity::from_delimiters(open, close).ok_or_else(|| malformed(line, expected))?;
        Ok((
            Statement::Include {
                name: name.to_string(),
                relativity,
            },
            index + 1,
        ))
    }
}

struct StartRegisterRecognizer;

impl Recognizer for StartRegisterRecognizer {
    fn name(&self) -> &'static str {
        "OnAutoItStartRegister"
    }

    fn is_match(&self, line: &RawLine) -> bool {
        line.first_word() == "#OnAutoItStartRegister"
    }

    fn parse(&self, parser: &mut ScriptParser<'_>, index: usize) -> ParseResult<(Statement, usize)> {
        let line = line_at(parser, index)?;
        let function_name = START_REGISTER
            .matches(&line.content)
            .and_then(|m| m.get("function_name").map(str::to_string))
            .ok_or_else(|| malformed(line, "'#OnAutoItStartRegister \"name\"'"))?;
        Ok((Statement::OnAutoItStartRegister { function_name }, index + 1))
    }
}

struct CommentsBlockRecognizer;

impl Recognizer for CommentsBlockRecognizer {
    fn name(&self) -> &'static str {
        "CommentsBlock"
    }

    fn is_match(&self, line: &RawLine) -> bool {
        COMMENTS_START.contains(&line.first_word())
    }

    fn parse(&self, parser: &mut ScriptParser<'_>, index: usize) -> ParseResult<(Statement, usize)> {
        let lines = parser.lines();
        let line = line_at(parser, index)?;
        let end = find_line(lines, index + 1, |content| COMMENTS_END.contains(&content)).ok_or_else(
            || {
                ParseError::new(ErrorKind::UnterminatedConstruct, "missing #comments-end")
                    .at_line(line)
            },
        )?;
        let text = lines[index + 1..end]
            .iter()
            .map(|inner| format!("{}\n", inner.raw))
            .collect();
        Ok((Statement::CommentsBlock { text }, end + 1))
    }
}

struct FlagRecognizer;

impl Recognizer for FlagRecognizer {
    fn name(&self) -> &'static str {
        "Flag"
    }

    fn is_match(&self, line: &RawLine) -> bool {
        line.content.starts_with('#')
    }

    fn parse(&self, parser: &mut ScriptParser<'_>, index: usize) -> ParseResult<(Statement, usize)> {
        let line = line_at(parser, index)?;
        let name = FLAG
            .matches(&line.content)
            .and_then(|m| m.get("flag_name").map(str::to_string))
            .ok_or_else(|| malformed(line, "'#<flag>'"))?;
        Ok((Statement::Flag { name }, index + 1))
    }
}

struct DeclarationRecognizer;

fn declaration_keyword(word: &str) -> Option<(Scope, bool)> {
    match word {
        "Local" => Some((Scope::Local, false)),
        "Global" => Some((Scope::Global, false)),
        "Dim" => Some((Scope::Dim, false)),
        "Const" => Some((Scope::Local, true)),
        _ => None,
    }
}

fn skip_whitespace(text: &str, pos: usize) -> usize {
    let rest = &text[pos..];
    pos + rest.len() - rest.trim_start().len()
}

fn declaration_error(line: &RawLine, pos: usize, kind: ErrorKind, message: String) -> ParseError {
    ParseError::new(kind, message).at_offset(pos).anchored(line, 0)
}

/// Read a `$name` starting at `pos`, returning it and the position after it.
fn declared_name(line: &RawLine, pos: usize) -> ParseResult<(&str, usize)> {
    let content = line.content.as_str();
    let rest = &content[pos..];
    let word_len = rest
        .find(|c: char| c.is_whitespace() || c == '=' || c == ',')
        .unwrap_or(rest.len());
    let word = &rest[..word_len];

    let Some(identifier) = word.strip_prefix('$') else {
        return Err(declaration_error(
            line,
            pos,
            ErrorKind::InvalidIdentifier,
            format!("variable name '{word}' must start with '$'"),
        ));
    };
    let mut chars = identifier.chars();
    let valid_start = matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_');
    if !valid_start || !chars.all(|c| c.is_alphanumeric() || c == '_') {
        return Err(declaration_error(
            line,
            pos,
            ErrorKind::InvalidIdentifier,
            format!("invalid variable name '{word}'"),
        ));
    }
    Ok((word, pos + word_len))
}

impl Recognizer for DeclarationRecognizer {
    fn name(&self) -> &'static str {
        "VariableDeclaration"
    }

    fn is_match(&self, line: &RawLine) -> bool {
        declaration_keyword(line.first_word()).is_some()
    }

    fn parse(&self, parser: &mut ScriptParser<'_>, index: usize) -> ParseResult<(Statement, usize)> {
        let line = line_at(parser, index)?;
        let content = line.content.as_str();
        let keyword = line.first_word();
        let (scope, mut is_const) =
            declaration_keyword(keyword).ok_or_else(|| malformed(line, "a declaration keyword"))?;

        let mut pos = skip_whitespace(content, keyword.len());
        let rest = &content[pos..];
        if rest.split_whitespace().next() == Some("Const") {
            is_const = true;
            pos = skip_whitespace(content, pos + "Const".len());
        }
        if pos == content.len() {
            return Err(malformed(line, "at least one variable after the declaration keyword"));
        }

        let mut bindings = Bindings::new();
        loop {
            pos = skip_whitespace(content, pos);
            if pos == content.len() {
                return Err(declaration_error(
                    line,
                    pos,
                    ErrorKind::InvalidIdentifier,
                    "expected a variable name after ','".to_string(),
                ));
            }
            let (name, after_name) = declared_name(line, pos)?;
            pos = skip_whitespace(content, after_name);

            let value = if content[pos..].starts_with('=') {
                let options = ExpressionOptions::terminated_by(&[',']).allowing_trailing();
                let (value, consumed) =
                    parser.expression(line, pos + 1, &content[pos + 1..], options)?;
                pos = skip_whitespace(content, pos + 1 + consumed);
                value
            } else {
                Expression::value("")
            };
            bindings.insert(name, value);

            match content[pos..].chars().next() {
                None => break,
                Some(',') => pos += 1,
                Some(c) => {
                    return Err(declaration_error(
                        line,
                        pos,
                        ErrorKind::MissingDelimiter,
                        format!("expected ',' between declarations, found '{c}'"),
                    ))
                }
            }
        }

        Ok((
            Statement::VariableDeclaration {
                scope,
                is_const,
                bindings,
            },
            index + 1,
        ))
    }
}

struct IfRecognizer;

fn branch_end(content: &str) -> bool {
    content == "Else" || content == "EndIf" || content.starts_with("ElseIf ")
}

fn else_end(content: &str) -> bool {
    content == "EndIf"
}

/// Byte position and text of the condition in `<keyword> <condition> Then`.
fn condition_text<'l>(content: &'l str, keyword: &str) -> Option<(usize, &'l str)> {
    let rest = content.strip_prefix(keyword)?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let inner = rest.strip_suffix("Then")?;
    if !inner.ends_with(char::is_whitespace) {
        return None;
    }
    let condition = inner.trim();
    if condition.is_empty() {
        return None;
    }
    let leading = inner.len() - inner.trim_start().len();
    Some((keyword.len() + leading, condition))
}

fn parse_condition(parser: &ScriptParser<'_>, line: &RawLine, keyword: &str) -> ParseResult<Expression> {
    let (base, condition) = condition_text(&line.content, keyword)
        .ok_or_else(|| malformed(line, &format!("'{keyword} <condition> Then'")))?;
    parser
        .expression(line, base, condition, ExpressionOptions::default())
        .map(|(expression, _)| expression)
}

impl Recognizer for IfRecognizer {
    fn name(&self) -> &'static str {
        "If"
    }

    fn is_match(&self, line: &RawLine) -> bool {
        line.first_word() == "If"
    }

    fn parse(&self, parser: &mut ScriptParser<'_>, index: usize) -> ParseResult<(Statement, usize)> {
        let branch = BlockEnd::new("EndIf", branch_end);
        let closing = BlockEnd::new("EndIf", else_end);

        let mut branches = Vec::new();
        let mut current = index;
        let mut keyword = "If";
        loop {
            let line = line_at(parser, current)?;
            let condition = parse_condition(parser, line, keyword)?;
            let (body, stop) = parser.nested(line, |p| p.parse_block(current + 1, Some(branch)))?;
            branches.push(ConditionBlock { condition, body });

            let stop_line = line_at(parser, stop)?;
            match stop_line.content.as_str() {
                "EndIf" => {
                    let statement = Statement::If {
                        branches,
                        else_block: None,
                    };
                    return Ok((statement, stop + 1));
                }
                "Else" => {
                    let (else_block, end) =
                        parser.nested(stop_line, |p| p.parse_block(stop + 1, Some(closing)))?;
                    let statement = Statement::If {
                        branches,
                        else_block: Some(else_block),
                    };
                    return Ok((statement, end + 1));
                }
                _ => {
                    current = stop;
                    keyword = "ElseIf";
                }
            }
        }
    }
}

struct EmptyRecognizer;

impl Recognizer for EmptyRecognizer {
    fn name(&self) -> &'static str {
        "Empty"
    }

    fn is_match(&self, line: &RawLine) -> bool {
        line.is_blank()
    }

    fn parse(&self, _parser: &mut ScriptParser<'_>, index: usize) -> ParseResult<(Statement, usize)> {
        Ok((Statement::Empty, index + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::au3::config::ParserSettings;
    use crate::au3::lexing::split_lines;

    fn parse(source: &str) -> ParseResult<(Statement, usize)> {
        let lines = split_lines(source);
        let mut parser = ScriptParser::new(&lines, &ParserSettings::default());
        parse_statement(&mut parser, 0)
    }

    fn statement(source: &str) -> Statement {
        parse(source).unwrap().0
    }

    fn kind(source: &str) -> ErrorKind {
        parse(source).unwrap_err().kind
    }

    #[test]
    fn test_registry_order() {
        assert_eq!(
            recognizer_names(),
            vec![
                "Pragma",
                "Include",
                "OnAutoItStartRegister",
                "CommentsBlock",
                "Flag",
                "VariableDeclaration",
                "If",
                "Empty"
            ]
        );
    }

    #[test]
    fn test_directives() {
        assert_eq!(
            statement("#pragma compile(Icon, app.ico)"),
            Statement::Pragma {
                setting: "compile(Icon, app.ico)".into()
            }
        );
        assert_eq!(
            statement("#include <Array.au3>"),
            Statement::Include {
                name: "Array.au3".into(),
                relativity: IncludeRelativity::IncludesRelative
            }
        );
        assert_eq!(
            statement("#include \"lib.au3\""),
            Statement::Include {
                name: "lib.au3".into(),
                relativity: IncludeRelativity::ScriptRelative
            }
        );
        assert_eq!(
            statement("#OnAutoItStartRegister \"Init\""),
            Statement::OnAutoItStartRegister {
                function_name: "Init".into()
            }
        );
        assert_eq!(
            statement("#NoTrayIcon"),
            Statement::Flag {
                name: "NoTrayIcon".into()
            }
        );
    }

    #[test]
    fn test_malformed_directives_do_not_fall_through() {
        assert_eq!(kind("#pragma"), ErrorKind::MalformedDirective);
        assert_eq!(kind("#include <Array.au3\""), ErrorKind::MalformedDirective);
        assert_eq!(kind("#OnAutoItStartRegister Init"), ErrorKind::MalformedDirective);
        assert_eq!(kind("#"), ErrorKind::MalformedDirective);

        let err = parse("#include [x]").unwrap_err();
        assert_eq!(err.location.source_line.as_deref(), Some("#include [x]"));
    }

    #[test]
    fn test_comments_block() {
        let (statement, next) = parse("#cs\n  Local $x ; kept\n#ce\n#after").unwrap();

        assert_eq!(
            statement,
            Statement::CommentsBlock {
                text: "  Local $x ; kept\n".into()
            }
        );
        assert_eq!(next, 3);
        assert_eq!(kind("#comments-start\ntext"), ErrorKind::UnterminatedConstruct);
    }

    #[test]
    fn test_declarations() {
        let Statement::VariableDeclaration {
            scope,
            is_const,
            bindings,
        } = statement("Local $a = 1, $b = 2")
        else {
            panic!("expected a declaration");
        };
        assert_eq!(scope, Scope::Local);
        assert!(!is_const);
        assert_eq!(bindings.names().collect::<Vec<_>>(), vec!["$a", "$b"]);
        assert_eq!(bindings.get("$b"), Some(&Expression::value(2)));

        assert_eq!(statement("Local $a").to_string(), "Local $a = \"\"");
        assert_eq!(statement("Const $x = 1").to_string(), "Local Const $x = 1");
        assert_eq!(statement("Global Const $x = 1").to_string(), "Global Const $x = 1");
        assert_eq!(statement("Dim $d").to_string(), "Dim $d = \"\"");
    }

    #[test]
    fn test_declaration_values_keep_nested_commas() {
        let declared = statement("Local $a = f(1, [2, 3]), $b = \"x, y\", $c");
        assert_eq!(
            declared.to_string(),
            "Local $a = f(1, [2, 3]), $b = \"x, y\", $c = \"\""
        );
    }

    #[test]
    fn test_declaration_errors() {
        assert_eq!(kind("Local a = 1"), ErrorKind::InvalidIdentifier);
        assert_eq!(kind("Local $1 = 1"), ErrorKind::InvalidIdentifier);
        assert_eq!(kind("Local $a = 1 2"), ErrorKind::MissingDelimiter);
        assert_eq!(kind("Local $a,"), ErrorKind::InvalidIdentifier);
        assert_eq!(kind("Local"), ErrorKind::MalformedDirective);
        assert_eq!(kind("Local $a = "), ErrorKind::MissingOperand);
    }

    #[test]
    fn test_expression_error_is_anchored_to_line() {
        let err = parse("Local $a = 1 + \"x").unwrap_err();

        assert_eq!(err.kind, ErrorKind::UnterminatedConstruct);
        assert_eq!(err.line(), Some(1));
        assert_eq!(err.location.column, Some(16));
    }

    #[test]
    fn test_if_elseif_else() {
        let source = "If $x > 0 Then\n#a\nElseIf $x < 0 Then\n#b\nElse\n#c\nEndIf\n#after";
        let (statement, next) = parse(source).unwrap();
        let Statement::If {
            branches,
            else_block,
        } = statement
        else {
            panic!("expected an If");
        };

        assert_eq!(branches.len(), 2);
        assert_eq!(branches[1].condition.to_string(), "($x < 0)");
        assert_eq!(else_block.map(|b| b.len()), Some(1));
        assert_eq!(next, 7);
    }

    #[test]
    fn test_if_errors() {
        assert_eq!(kind("If $x Then\n#a"), ErrorKind::UnterminatedConstruct);
        assert_eq!(kind("If $x Then\nElse\n#a"), ErrorKind::UnterminatedConstruct);
        assert_eq!(kind("If $x\nEndIf"), ErrorKind::MalformedDirective);
        assert_eq!(kind("If Then\nEndIf"), ErrorKind::MalformedDirective);
        assert_eq!(kind("If $x +  Then\nEndIf"), ErrorKind::MissingOperand);
        assert_eq!(kind("If $x Then\nElse\nElse\nEndIf"), ErrorKind::UnrecognizedStatement);
    }

    #[test]
    fn test_condition_error_column() {
        let err = parse("If 1.2.3 Then\nEndIf").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidNumberLiteral);
        assert_eq!(err.location.column, Some(7));
    }

    #[test]
    fn test_unrecognized() {
        let err = parse("MsgBox(0, \"hi\")").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnrecognizedStatement);
        assert_eq!(err.line(), Some(1));
    }
}

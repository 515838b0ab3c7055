//! Expression parser
//!
//!     Turns expression text into an [Expression] tree in one left-to-right pass.
//!
//! Operands
//!
//!     `(expr)`, decimal and `0x` hex numbers, `$var`/`@macro`, `"..."`/`'...'` strings
//!     (a doubled quote is a literal quote), `[a, b]` arrays, `True`/`False`, `Not operand`,
//!     `name(args)` calls and bare function names. `$name(args)` is a call as well.
//!
//! Tree Assembly
//!
//!     Operators are folded in as they are read (precedence climbing). The tree under
//!     construction keeps its right spine open: an incoming operator walks down that spine
//!     while the nodes it passes bind looser than itself, then takes the subtree it stopped
//!     at as its left operand. Stopping at the root makes it the new root, which gives left
//!     associativity within one strength. Parenthesized groups enter the spine as finished
//!     leaves, so an incoming operator never reaches into them.
//!
//!     The open spine is a private type; callers only ever see completed [Expression]s.
//!
//! Termination
//!
//!     Parsing stops when no operator follows an operand or the next character is one of
//!     the caller's terminators. Anything left after that is an error unless the caller
//!     allows trailing input. The consumed length is reported in bytes.

use super::error::{ErrorKind, ParseError, ParseResult};
use crate::au3::ast::{Expression, Operator};
use crate::au3::config::ParserSettings;

/// How an expression may end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpressionOptions<'a> {
    /// Characters that end the expression early, left unconsumed.
    pub terminators: &'a [char],
    /// Accept unconsumed input after the expression.
    pub allow_trailing: bool,
}

impl<'a> ExpressionOptions<'a> {
    pub fn terminated_by(terminators: &'a [char]) -> Self {
        Self {
            terminators,
            allow_trailing: false,
        }
    }

    pub fn allowing_trailing(mut self) -> Self {
        self.allow_trailing = true;
        self
    }
}

/// Parse a complete expression. Trailing input is an error.
pub fn parse_expression(text: &str) -> ParseResult<Expression> {
    parse_expression_with(text, ExpressionOptions::default(), &ParserSettings::default())
        .map(|(expression, _)| expression)
}

/// Parse an expression at the start of `text`, returning it with the number of bytes
/// consumed.
pub fn parse_expression_with(
    text: &str,
    options: ExpressionOptions<'_>,
    settings: &ParserSettings,
) -> ParseResult<(Expression, usize)> {
    ExpressionParser::new(text, 0, settings.max_nesting_depth).parse(options)
}

/// Right-spine-open tree used during assembly.
enum Spine {
    Leaf(Expression),
    Node {
        operator: Operator,
        left: Expression,
        right: Box<Spine>,
    },
}

impl Spine {
    /// Whether attaching `operator` makes it the new root, one level above the whole tree.
    fn wraps(&self, operator: Operator) -> bool {
        match self {
            Spine::Node { operator: current, .. } => current.strength() >= operator.strength(),
            Spine::Leaf(_) => true,
        }
    }

    fn attach(self, operator: Operator, operand: Expression) -> Spine {
        match self {
            Spine::Node {
                operator: current,
                left,
                right,
            } if current.strength() < operator.strength() => Spine::Node {
                operator: current,
                left,
                right: Box::new(right.attach(operator, operand)),
            },
            finished => Spine::Node {
                operator,
                left: finished.into_expression(),
                right: Box::new(Spine::Leaf(operand)),
            },
        }
    }

    fn into_expression(self) -> Expression {
        match self {
            Spine::Leaf(expression) => expression,
            Spine::Node {
                operator,
                left,
                right,
            } => Expression::binary(operator, left, right.into_expression()),
        }
    }
}

pub(crate) struct ExpressionParser<'s> {
    text: &'s str,
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl<'s> ExpressionParser<'s> {
    /// `depth` is the nesting already spent by the caller (enclosing `If` blocks).
    pub(crate) fn new(text: &'s str, depth: usize, max_depth: usize) -> Self {
        Self {
            text,
            pos: 0,
            depth,
            max_depth,
        }
    }

    pub(crate) fn parse(mut self, options: ExpressionOptions<'_>) -> ParseResult<(Expression, usize)> {
        let expression = self.expression(options.terminators)?;
        self.finish(options)?;
        Ok((expression, self.pos))
    }

    fn rest(&self) -> &'s str {
        &self.text[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn error(&self, kind: ErrorKind, message: impl Into<String>) -> ParseError {
        self.error_at(self.pos, kind, message)
    }

    fn error_at(&self, offset: usize, kind: ErrorKind, message: impl Into<String>) -> ParseError {
        ParseError::new(kind, message).at_offset(offset)
    }

    fn enter(&mut self) -> ParseResult<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(self.error(
                ErrorKind::NestingTooDeep,
                format!("nesting deeper than {} levels", self.max_depth),
            ));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn expression(&mut self, terminators: &[char]) -> ParseResult<Expression> {
        self.enter()?;
        let mut tree = Spine::Leaf(self.operand(terminators)?);
        // Each new root deepens the left spine; the right spine is bounded by the
        // number of strengths.
        let mut height = 0;
        while let Some(operator) = self.next_operator(terminators)? {
            if tree.wraps(operator) {
                self.enter()?;
                height += 1;
            }
            let operand = self.operand(terminators)?;
            tree = tree.attach(operator, operand);
        }
        self.depth -= height;
        self.leave();
        Ok(tree.into_expression())
    }

    fn finish(&mut self, options: ExpressionOptions<'_>) -> ParseResult<()> {
        self.skip_whitespace();
        match self.peek() {
            None => Ok(()),
            Some(c) if options.terminators.contains(&c) || options.allow_trailing => Ok(()),
            Some(c) => Err(self.error(
                ErrorKind::UnexpectedTrailingInput,
                format!("unexpected '{c}' after expression"),
            )),
        }
    }

    fn next_operator(&mut self, terminators: &[char]) -> ParseResult<Option<Operator>> {
        self.skip_whitespace();
        match self.peek() {
            None => return Ok(None),
            Some(c) if terminators.contains(&c) => return Ok(None),
            Some(_) => {}
        }
        let Some(operator) = Operator::match_prefix(self.rest()) else {
            return Ok(None);
        };
        let start = self.pos;
        self.pos += operator.symbol().len();
        if operator.is_keyword() {
            self.expect_keyword_spacing(start, operator.symbol())?;
        }
        Ok(Some(operator))
    }

    fn expect_keyword_spacing(&self, start: usize, keyword: &str) -> ParseResult<()> {
        match self.peek() {
            None => Err(self.error(
                ErrorKind::MissingOperand,
                format!("expected an operand after '{keyword}'"),
            )),
            Some(c) if !c.is_whitespace() => Err(self.error_at(
                start,
                ErrorKind::OperatorSpacingError,
                format!("'{keyword}' must be followed by whitespace"),
            )),
            Some(_) => Ok(()),
        }
    }

    fn operand(&mut self, terminators: &[char]) -> ParseResult<Expression> {
        self.skip_whitespace();
        let c = match self.peek() {
            Some(c) if !terminators.contains(&c) => c,
            _ => return Err(self.error(ErrorKind::MissingOperand, "expected an operand")),
        };
        match c {
            '(' => self.group(),
            '"' | '\'' => self.string(c),
            '[' => self.array(),
            '$' | '@' => self.variable(),
            c if c.is_ascii_digit() => self.number(),
            c if c.is_alphabetic() || c == '_' => self.word(terminators),
            c => Err(self.error(
                ErrorKind::UnexpectedToken,
                format!("unexpected '{c}' where an operand was expected"),
            )),
        }
    }

    fn group(&mut self) -> ParseResult<Expression> {
        let start = self.pos;
        self.bump();
        let inner = self.expression(&[')'])?;
        self.skip_whitespace();
        match self.peek() {
            Some(')') => {
                self.bump();
                Ok(inner)
            }
            None => Err(self.error_at(
                start,
                ErrorKind::UnterminatedConstruct,
                "missing ')' to close '('",
            )),
            Some(c) => Err(self.error(
                ErrorKind::UnexpectedTrailingInput,
                format!("unexpected '{c}' inside parentheses"),
            )),
        }
    }

    fn string(&mut self, quote: char) -> ParseResult<Expression> {
        let start = self.pos;
        self.bump();
        let mut value = String::new();
        loop {
            let Some(end) = self.rest().find(quote) else {
                return Err(self.error_at(
                    start,
                    ErrorKind::UnterminatedConstruct,
                    format!("missing closing {quote} for string literal"),
                ));
            };
            value.push_str(&self.rest()[..end]);
            self.pos += end + quote.len_utf8();
            if self.peek() == Some(quote) {
                value.push(quote);
                self.bump();
            } else {
                return Ok(Expression::value(value));
            }
        }
    }

    fn number(&mut self) -> ParseResult<Expression> {
        let start = self.pos;
        if self.rest().starts_with("0x") || self.rest().starts_with("0X") {
            self.pos += 2;
            let digits = self.take_while(|c| c.is_ascii_hexdigit());
            if self.peek() == Some('.') {
                return Err(self.error(
                    ErrorKind::InvalidNumberLiteral,
                    "hexadecimal literal cannot contain '.'",
                ));
            }
            if digits.is_empty() {
                return Err(self.error_at(
                    start,
                    ErrorKind::InvalidNumberLiteral,
                    "hexadecimal literal has no digits",
                ));
            }
            return i64::from_str_radix(digits, 16)
                .map(Expression::value)
                .map_err(|_| self.out_of_range(start));
        }

        let digits = self.take_while(|c| c.is_ascii_digit() || c == '.');
        let mut dots = digits.match_indices('.').map(|(idx, _)| idx);
        let first_dot = dots.next();
        if let Some(second) = dots.next() {
            return Err(self.error_at(
                start + second,
                ErrorKind::InvalidNumberLiteral,
                format!("second decimal point in '{digits}'"),
            ));
        }
        match first_dot {
            Some(_) => digits
                .parse::<f64>()
                .map(Expression::value)
                .map_err(|_| self.out_of_range(start)),
            None => digits
                .parse::<i64>()
                .map(Expression::value)
                .map_err(|_| self.out_of_range(start)),
        }
    }

    fn out_of_range(&self, start: usize) -> ParseError {
        self.error_at(
            start,
            ErrorKind::InvalidNumberLiteral,
            format!("number '{}' is out of range", &self.text[start..self.pos]),
        )
    }

    fn take_while<F: Fn(char) -> bool>(&mut self, predicate: F) -> &'s str {
        let rest = self.rest();
        let len = rest.find(|c: char| !predicate(c)).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn identifier(&mut self) -> ParseResult<&'s str> {
        match self.peek() {
            Some(c) if c.is_alphabetic() || c == '_' => {}
            Some(c) => {
                return Err(self.error(
                    ErrorKind::InvalidIdentifier,
                    format!("identifier cannot start with '{c}'"),
                ))
            }
            None => return Err(self.error(ErrorKind::InvalidIdentifier, "missing identifier")),
        }
        Ok(self.take_while(|c| c.is_alphanumeric() || c == '_'))
    }

    fn variable(&mut self) -> ParseResult<Expression> {
        let start = self.pos;
        self.bump();
        self.identifier()?;
        let text = self.text;
        let name = &text[start..self.pos];
        if self.peek() == Some('(') {
            return self.call(name);
        }
        Ok(Expression::variable(name))
    }

    fn word(&mut self, terminators: &[char]) -> ParseResult<Expression> {
        let start = self.pos;
        let word = self.identifier()?;
        match word {
            "True" => Ok(Expression::value(true)),
            "False" => Ok(Expression::value(false)),
            "Not" => {
                self.expect_keyword_spacing(start, word)?;
                self.enter()?;
                let operand = self.operand(terminators)?;
                self.leave();
                Ok(Expression::not(operand))
            }
            "And" | "Or" => Err(self.error_at(
                start,
                ErrorKind::UnexpectedToken,
                format!("operator '{word}' where an operand was expected"),
            )),
            name if self.peek() == Some('(') => self.call(name),
            name => Ok(Expression::reference(name)),
        }
    }

    fn call(&mut self, name: &str) -> ParseResult<Expression> {
        let arguments = self.list(')', &format!("call to {name}"))?;
        Ok(Expression::call(name, arguments))
    }

    fn array(&mut self) -> ParseResult<Expression> {
        self.list(']', "array literal").map(Expression::array)
    }

    /// Comma-separated items between the opening character at the current position and
    /// `close`. An empty list is allowed.
    fn list(&mut self, close: char, what: &str) -> ParseResult<Vec<Expression>> {
        let start = self.pos;
        self.bump();
        self.enter()?;
        let mut items = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(close) {
            self.bump();
            self.leave();
            return Ok(items);
        }
        loop {
            items.push(self.expression(&[',', close])?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(c) if c == close => {
                    self.bump();
                    break;
                }
                None => {
                    return Err(self.error_at(
                        start,
                        ErrorKind::UnterminatedConstruct,
                        format!("missing '{close}' to close {what}"),
                    ))
                }
                Some(c) => {
                    return Err(self.error(
                        ErrorKind::MissingDelimiter,
                        format!("expected ',' or '{close}' in {what}, found '{c}'"),
                    ))
                }
            }
        }
        self.leave();
        Ok(items)
    }
}

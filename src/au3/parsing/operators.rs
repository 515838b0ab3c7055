//! Binary operator table
//!
//!     Six binding strengths, loosest first:
//!
//!         And Or  <  <= >= <> == < > =  <  &  <  + -  <  * /  <  ^
//!
//!     Operators are matched against the input in [Operator::ALL] order, which puts every
//!     multi-character comparison before its one-character prefix (`<=` before `<`,
//!     `==` before `=`). All operators are left associative.

use crate::au3::ast::Operator;

/// Binding strength. Later variants bind tighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Strength {
    Logical,
    Comparison,
    Concat,
    Additive,
    Multiplicative,
    Power,
}

struct OpInfo {
    symbol: &'static str,
    strength: Strength,
    keyword: bool,
}

const fn op(symbol: &'static str, strength: Strength) -> OpInfo {
    OpInfo {
        symbol,
        strength,
        keyword: false,
    }
}

const fn keyword(symbol: &'static str) -> OpInfo {
    OpInfo {
        symbol,
        strength: Strength::Logical,
        keyword: true,
    }
}

impl Operator {
    /// Every operator, in matching order.
    pub const ALL: [Operator; 15] = [
        Operator::LessEqual,
        Operator::GreaterEqual,
        Operator::NotEqual,
        Operator::StrictEqual,
        Operator::Less,
        Operator::Greater,
        Operator::Equal,
        Operator::Concat,
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
        Operator::Power,
        Operator::And,
        Operator::Or,
    ];

    fn info(self) -> OpInfo {
        use Strength::*;
        match self {
            Operator::And => keyword("And"),
            Operator::Or => keyword("Or"),
            Operator::LessEqual => op("<=", Comparison),
            Operator::GreaterEqual => op(">=", Comparison),
            Operator::NotEqual => op("<>", Comparison),
            Operator::StrictEqual => op("==", Comparison),
            Operator::Less => op("<", Comparison),
            Operator::Greater => op(">", Comparison),
            Operator::Equal => op("=", Comparison),
            Operator::Concat => op("&", Concat),
            Operator::Add => op("+", Additive),
            Operator::Subtract => op("-", Additive),
            Operator::Multiply => op("*", Multiplicative),
            Operator::Divide => op("/", Multiplicative),
            Operator::Power => op("^", Power),
        }
    }

    /// Source spelling.
    pub fn symbol(self) -> &'static str {
        self.info().symbol
    }

    pub fn strength(self) -> Strength {
        self.info().strength
    }

    /// Precedence level, 1 (loosest) to 6 (tightest).
    pub fn level(self) -> u8 {
        self.strength() as u8 + 1
    }

    /// Keyword operators must be followed by whitespace.
    pub fn is_keyword(self) -> bool {
        self.info().keyword
    }

    /// The first operator, in matching order, that `text` starts with.
    pub fn match_prefix(text: &str) -> Option<Operator> {
        Operator::ALL
            .into_iter()
            .find(|operator| text.starts_with(operator.symbol()))
    }
}

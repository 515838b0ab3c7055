//! Canonical source rendering as an output format
//!
//! Parsing the output again yields an equal tree.

use super::registry::{FormatError, Formatter};
use crate::au3::ast::{Expression, Script};

pub struct SourceFormatter;

impl Formatter for SourceFormatter {
    fn name(&self) -> &str {
        "source"
    }

    fn serialize(&self, script: &Script) -> Result<String, FormatError> {
        let mut text = script.to_source();
        if !text.is_empty() {
            text.push('\n');
        }
        Ok(text)
    }

    fn serialize_expression(&self, expression: &Expression) -> Result<String, FormatError> {
        Ok(expression.to_string())
    }

    fn description(&self) -> &str {
        "Canonical AutoIt source, fully parenthesized"
    }
}

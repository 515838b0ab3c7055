//! JSON and YAML output via serde

use super::registry::{FormatError, Formatter};
use crate::au3::ast::{Expression, Script};

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize(&self, script: &Script) -> Result<String, FormatError> {
        serde_json::to_string_pretty(script)
            .map_err(|err| FormatError::SerializationError(err.to_string()))
    }

    fn serialize_expression(&self, expression: &Expression) -> Result<String, FormatError> {
        serde_json::to_string_pretty(expression)
            .map_err(|err| FormatError::SerializationError(err.to_string()))
    }

    fn description(&self) -> &str {
        "Syntax tree as pretty-printed JSON"
    }
}

pub struct YamlFormatter;

impl Formatter for YamlFormatter {
    fn name(&self) -> &str {
        "yaml"
    }

    fn serialize(&self, script: &Script) -> Result<String, FormatError> {
        serde_yaml::to_string(script).map_err(|err| FormatError::SerializationError(err.to_string()))
    }

    fn serialize_expression(&self, expression: &Expression) -> Result<String, FormatError> {
        serde_yaml::to_string(expression)
            .map_err(|err| FormatError::SerializationError(err.to_string()))
    }

    fn description(&self) -> &str {
        "Syntax tree as YAML"
    }
}

//! Fixed-template line matching
//!
//!     One-line directives such as `#pragma X` or `#include <name>` have a fixed shape: some
//!     literal text with a few holes. Rather than hand-scanning each of them, directives
//!     are described as templates and matched against the whole line.
//!
//! Template Syntax
//!
//!     - Literal text matches verbatim, case-sensitive (whitespace included).
//!     - `{name}` captures a greedy, non-empty run of characters.
//!     - `{name:1}` captures exactly one character.
//!
//!     Example: `#include {open:1}{name}{close:1}` matches `#include <File.au3>` with
//!     `open = "<"`, `name = "File.au3"`, `close = ">"`.
//!
//!     Templates are compiled once into an anchored regex with one named group per slot,
//!     the same way the grammar patterns of the parser are regex data rather than code.

use regex::Regex;
use thiserror::Error;

/// Errors raised while compiling a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unclosed slot starting at byte {0}")]
    UnclosedSlot(usize),
    #[error("invalid slot name '{0}'")]
    InvalidSlotName(String),
    #[error("unsupported slot width '{width}' for slot '{name}'")]
    UnsupportedWidth { name: String, width: String },
    #[error("slot '{0}' appears more than once")]
    DuplicateSlot(String),
}

/// A compiled line template.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
    regex: Regex,
    slots: Vec<String>,
}

/// Named captures of a successful match, in template order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateMatch {
    captures: Vec<(String, String)>,
}

impl TemplateMatch {
    /// Captured text for a slot, if the template declares it.
    pub fn get(&self, slot: &str) -> Option<&str> {
        self.captures
            .iter()
            .find(|(name, _)| name == slot)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.captures
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.captures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.captures.is_empty()
    }
}

impl Template {
    /// Compile a template string.
    pub fn compile(template: &str) -> Result<Self, TemplateError> {
        let mut pattern = String::from("^");
        let mut slots: Vec<String> = Vec::new();
        let mut literal = String::new();
        let mut rest = template;
        let mut offset = 0;

        while let Some(open) = rest.find('{') {
            literal.push_str(&rest[..open]);
            let close = rest[open..]
                .find('}')
                .ok_or(TemplateError::UnclosedSlot(offset + open))?;
            let slot = &rest[open + 1..open + close];

            pattern.push_str(&regex::escape(&literal));
            literal.clear();

            let (name, width) = match slot.split_once(':') {
                Some((name, width)) => (name, Some(width)),
                None => (slot, None),
            };
            if !is_slot_name(name) {
                return Err(TemplateError::InvalidSlotName(name.to_string()));
            }
            if slots.iter().any(|s| s == name) {
                return Err(TemplateError::DuplicateSlot(name.to_string()));
            }
            let group = match width {
                None => ".+",
                Some("1") => ".",
                Some(other) => {
                    return Err(TemplateError::UnsupportedWidth {
                        name: name.to_string(),
                        width: other.to_string(),
                    })
                }
            };
            pattern.push_str(&format!("(?P<{name}>{group})"));
            slots.push(name.to_string());

            offset += open + close + 1;
            rest = &rest[open + close + 1..];
        }
        literal.push_str(rest);
        pattern.push_str(&regex::escape(&literal));
        pattern.push('$');

        let regex = Regex::new(&pattern)
            .map_err(|_| TemplateError::InvalidSlotName(template.to_string()))?;

        Ok(Self {
            source: template.to_string(),
            regex,
            slots,
        })
    }

    /// Match a full line. Returns `None` when the line does not fit the template.
    pub fn matches(&self, line: &str) -> Option<TemplateMatch> {
        let caps = self.regex.captures(line)?;
        let captures = self
            .slots
            .iter()
            .filter_map(|slot| {
                caps.name(slot)
                    .map(|m| (slot.clone(), m.as_str().to_string()))
            })
            .collect();
        Some(TemplateMatch { captures })
    }

    /// The template text this was compiled from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Slot names, in template order.
    pub fn slots(&self) -> &[String] {
        &self.slots
    }
}

fn is_slot_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

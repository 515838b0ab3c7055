//! Treeviz formatter
//!
//! Treeviz shows the syntax tree one node per line, which makes a parsed script quick to
//! scan against its source. Nesting is drawn with box connectors, two columns per level:
//!
//!     ⧉ 3 statements
//!     ├─ ⇲ Array.au3
//!     ├─ ≔ Local Const
//!     │ └─ $ $total
//!     │   └─ ± +
//!     │     ├─ ◦ 1
//!     │     └─ ◦ 2
//!     └─ ⎇ 1 branch
//!
//!     With line numbers enabled, statement nodes are prefixed with their source line.
//!
//! Icons
//!     Statements:
//!         Script: ⧉
//!         Pragma: ⚙
//!         Include: ⇲
//!         OnAutoItStartRegister: ▶
//!         CommentsBlock: ¶
//!         Flag: ⚑
//!         VariableDeclaration: ≔
//!         Binding: $
//!         If: ⎇
//!         Branch / Else: ↳
//!         Body: ☰
//!         Empty: ∅
//!     Expressions:
//!         Value: ◦
//!         Variable: 𝑥
//!         FunctionReference: ƒ
//!         FunctionCall: ƒ()
//!         Array: []
//!         Not: ¬
//!         BinaryOperator: ±

use super::registry::{FormatError, Formatter};
use crate::au3::ast::{snapshot_expression, snapshot_script, AstSnapshot, Expression, Script};
use crate::au3::config::OutputSettings;

const DEFAULT_LABEL_WIDTH: usize = 40;

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

fn get_icon(node_type: &str) -> &'static str {
    match node_type {
        "Script" => "⧉",
        "Pragma" => "⚙",
        "Include" => "⇲",
        "OnAutoItStartRegister" => "▶",
        "CommentsBlock" => "¶",
        "Flag" => "⚑",
        "VariableDeclaration" => "≔",
        "Binding" => "$",
        "If" => "⎇",
        "Branch" | "Else" => "↳",
        "Body" => "☰",
        "Empty" => "∅",
        "Value" => "◦",
        "Variable" => "𝑥",
        "FunctionReference" => "ƒ",
        "FunctionCall" => "ƒ()",
        "Array" => "[]",
        "Not" => "¬",
        "BinaryOperator" => "±",
        _ => "○",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreevizOptions {
    pub show_line_numbers: bool,
    pub label_width: usize,
}

impl Default for TreevizOptions {
    fn default() -> Self {
        Self {
            show_line_numbers: false,
            label_width: DEFAULT_LABEL_WIDTH,
        }
    }
}

impl From<&OutputSettings> for TreevizOptions {
    fn from(settings: &OutputSettings) -> Self {
        Self {
            show_line_numbers: settings.show_line_numbers,
            label_width: settings.label_width,
        }
    }
}

fn line_prefix(snapshot: &AstSnapshot, options: &TreevizOptions) -> String {
    if !options.show_line_numbers {
        return String::new();
    }
    match snapshot.attributes.get("line") {
        Some(line) => format!("{line:>3} "),
        None => "    ".to_string(),
    }
}

fn format_snapshot(
    output: &mut String,
    snapshot: &AstSnapshot,
    prefix: &str,
    is_last: bool,
    options: &TreevizOptions,
) {
    let connector = if is_last { "└─" } else { "├─" };
    output.push_str(&format!(
        "{}{}{} {} {}\n",
        line_prefix(snapshot, options),
        prefix,
        connector,
        get_icon(&snapshot.node_type),
        truncate(&snapshot.label, options.label_width)
    ));

    let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    format_children(output, snapshot, &child_prefix, options);
}

fn format_children(output: &mut String, snapshot: &AstSnapshot, prefix: &str, options: &TreevizOptions) {
    let count = snapshot.children.len();
    for (i, child) in snapshot.children.iter().enumerate() {
        format_snapshot(output, child, prefix, i + 1 == count, options);
    }
}

/// Render a snapshot with its root on the first line, unindented.
pub fn format_root(snapshot: &AstSnapshot, options: &TreevizOptions) -> String {
    let mut output = format!(
        "{}{} {}\n",
        line_prefix(snapshot, options),
        get_icon(&snapshot.node_type),
        truncate(&snapshot.label, options.label_width)
    );
    format_children(&mut output, snapshot, "", options);
    output
}

pub fn to_treeviz_str(script: &Script) -> String {
    format_root(&snapshot_script(script), &TreevizOptions::default())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TreevizFormatter {
    pub options: TreevizOptions,
}

impl TreevizFormatter {
    pub fn new(options: TreevizOptions) -> Self {
        Self { options }
    }
}

impl Formatter for TreevizFormatter {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn serialize(&self, script: &Script) -> Result<String, FormatError> {
        Ok(format_root(&snapshot_script(script), &self.options))
    }

    fn serialize_expression(&self, expression: &Expression) -> Result<String, FormatError> {
        Ok(format_root(&snapshot_expression(expression), &self.options))
    }

    fn description(&self) -> &str {
        "Visual tree representation with box connectors and Unicode icons"
    }
}

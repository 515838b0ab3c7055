//! AST Snapshot - a normalized intermediate representation of the syntax tree
//!
//! Output formats (treeviz, JSON, YAML) consume this snapshot instead of walking the
//! tree themselves. Each node has a type, a label and a few string attributes; blocks,
//! bindings, branches and operands become children.

use super::block::{Block, BlockLine, Script};
use super::expression::Expression;
use super::statement::{Binding, ConditionBlock, IncludeRelativity, Statement};
use serde::Serialize;
use std::collections::BTreeMap;

/// A snapshot of a node in a normalized, serializable form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AstSnapshot {
    /// The type of node (e.g., "Include", "BinaryOperator")
    pub node_type: String,

    /// The primary label of the node
    pub label: String,

    /// Additional attributes specific to the node type, sorted by key
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,

    /// Child nodes in the tree
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<AstSnapshot>,
}

impl AstSnapshot {
    pub fn new(node_type: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            label: label.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: AstSnapshot) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: Vec<AstSnapshot>) -> Self {
        self.children.extend(children);
        self
    }

    /// Number of nodes in this subtree, including itself.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(AstSnapshot::node_count).sum::<usize>()
    }
}

/// Build the snapshot of a whole script. The root is a `Script` node whose children are
/// the top-level statements.
pub fn snapshot_script(script: &Script) -> AstSnapshot {
    AstSnapshot::new("Script", plural(script.len(), "statement"))
        .with_children(script.iter().map(snapshot_block_line).collect())
}

fn snapshot_block(node_type: &str, block: &Block) -> AstSnapshot {
    AstSnapshot::new(node_type, plural(block.len(), "statement"))
        .with_children(block.iter().map(snapshot_block_line).collect())
}

fn snapshot_block_line(line: &BlockLine) -> AstSnapshot {
    let mut snapshot =
        snapshot_statement(&line.statement).with_attribute("line", line.line_number.to_string());
    if !line.trailing_comment.is_empty() {
        snapshot = snapshot.with_attribute("comment", line.trailing_comment.clone());
    }
    snapshot
}

fn snapshot_statement(statement: &Statement) -> AstSnapshot {
    let node_type = statement.kind_name();
    match statement {
        Statement::Pragma { setting } => AstSnapshot::new(node_type, setting.clone()),
        Statement::Include { name, relativity } => {
            let relativity = match relativity {
                IncludeRelativity::ScriptRelative => "script",
                IncludeRelativity::IncludesRelative => "includes",
            };
            AstSnapshot::new(node_type, name.clone()).with_attribute("relativity", relativity)
        }
        Statement::OnAutoItStartRegister { function_name } => {
            AstSnapshot::new(node_type, function_name.clone())
        }
        Statement::CommentsBlock { text } => {
            AstSnapshot::new(node_type, plural(text.lines().count(), "line"))
        }
        Statement::Flag { name } => AstSnapshot::new(node_type, name.clone()),
        Statement::VariableDeclaration {
            scope,
            is_const,
            bindings,
        } => {
            let label = if *is_const {
                format!("{scope} Const")
            } else {
                scope.to_string()
            };
            AstSnapshot::new(node_type, label)
                .with_children(bindings.iter().map(snapshot_binding).collect())
        }
        Statement::If {
            branches,
            else_block,
        } => {
            let mut snapshot = AstSnapshot::new(node_type, plural(branches.len(), "branch"));
            for (idx, branch) in branches.iter().enumerate() {
                let keyword = if idx == 0 { "If" } else { "ElseIf" };
                snapshot = snapshot.with_child(snapshot_branch(keyword, branch));
            }
            if let Some(block) = else_block {
                snapshot = snapshot.with_child(snapshot_block("Else", block));
            }
            snapshot
        }
        Statement::Empty => AstSnapshot::new(node_type, ""),
    }
}

fn snapshot_binding(binding: &Binding) -> AstSnapshot {
    AstSnapshot::new("Binding", binding.name.clone()).with_child(snapshot_expression(&binding.value))
}

fn snapshot_branch(keyword: &str, branch: &ConditionBlock) -> AstSnapshot {
    AstSnapshot::new("Branch", keyword)
        .with_child(snapshot_expression(&branch.condition))
        .with_child(snapshot_block("Body", &branch.body))
}

/// Build the snapshot of an expression tree.
pub fn snapshot_expression(expression: &Expression) -> AstSnapshot {
    let node_type = expression.kind_name();
    let label = match expression {
        Expression::Value(value) => value.to_string(),
        Expression::Variable(name) | Expression::FunctionReference(name) => name.clone(),
        Expression::FunctionCall { name, .. } => name.clone(),
        Expression::Array(items) => plural(items.len(), "item"),
        Expression::Not(_) => "Not".to_string(),
        Expression::BinaryOperator { operator, .. } => operator.symbol().to_string(),
    };
    AstSnapshot::new(node_type, label).with_children(
        expression
            .children()
            .into_iter()
            .map(snapshot_expression)
            .collect(),
    )
}

fn plural(count: usize, noun: &str) -> String {
    match (count, noun) {
        (1, _) => format!("1 {noun}"),
        (_, "branch") => format!("{count} branches"),
        _ => format!("{count} {noun}s"),
    }
}

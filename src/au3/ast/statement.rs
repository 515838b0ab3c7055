//! Statement nodes
//!
//!     One statement covers one or more physical lines: directives and declarations take
//!     a single line, `#comments-start` blocks and `If` blocks span until their closing
//!     line. Nested bodies are [Block]s owned by the statement.

use super::block::Block;
use super::expression::Expression;
use super::render::SourceWriter;
use serde::Serialize;
use std::fmt;

/// Declaration scope keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Scope {
    Local,
    Global,
    Dim,
}

impl Scope {
    pub fn keyword(self) -> &'static str {
        match self {
            Scope::Local => "Local",
            Scope::Global => "Global",
            Scope::Dim => "Dim",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Where an `#include` looks for its file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IncludeRelativity {
    /// `#include "name"`: next to the including script.
    ScriptRelative,
    /// `#include <name>`: along the include search path.
    IncludesRelative,
}

impl IncludeRelativity {
    /// Opening and closing delimiters used in source.
    pub fn delimiters(self) -> (char, char) {
        match self {
            IncludeRelativity::ScriptRelative => ('"', '"'),
            IncludeRelativity::IncludesRelative => ('<', '>'),
        }
    }

    pub fn from_delimiters(open: &str, close: &str) -> Option<Self> {
        match (open, close) {
            ("\"", "\"") => Some(IncludeRelativity::ScriptRelative),
            ("<", ">") => Some(IncludeRelativity::IncludesRelative),
            _ => None,
        }
    }
}

/// A declared name and its initial value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Binding {
    pub name: String,
    pub value: Expression,
}

/// Declared names in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Bindings(Vec<Binding>);

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a binding. Redeclaring a name replaces its value and keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, value: Expression) {
        let name = name.into();
        match self.0.iter_mut().find(|b| b.name == name) {
            Some(existing) => existing.value = value,
            None => self.0.push(Binding { name, value }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Expression> {
        self.0.iter().find(|b| b.name == name).map(|b| &b.value)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|b| b.name.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Binding> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Bindings {
    type Item = &'a Binding;
    type IntoIter = std::slice::Iter<'a, Binding>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<N: Into<String>> FromIterator<(N, Expression)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (N, Expression)>>(iter: I) -> Self {
        let mut bindings = Bindings::new();
        for (name, value) in iter {
            bindings.insert(name, value);
        }
        bindings
    }
}

/// One `If`/`ElseIf` branch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionBlock {
    pub condition: Expression,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Statement {
    Pragma {
        setting: String,
    },
    Include {
        name: String,
        relativity: IncludeRelativity,
    },
    OnAutoItStartRegister {
        function_name: String,
    },
    /// Lines between `#comments-start`/`#cs` and `#comments-end`/`#ce`, as written,
    /// each terminated by `\n`.
    CommentsBlock {
        text: String,
    },
    Flag {
        name: String,
    },
    VariableDeclaration {
        scope: Scope,
        is_const: bool,
        bindings: Bindings,
    },
    If {
        branches: Vec<ConditionBlock>,
        else_block: Option<Block>,
    },
    Empty,
}

impl Statement {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Statement::Pragma { .. } => "Pragma",
            Statement::Include { .. } => "Include",
            Statement::OnAutoItStartRegister { .. } => "OnAutoItStartRegister",
            Statement::CommentsBlock { .. } => "CommentsBlock",
            Statement::Flag { .. } => "Flag",
            Statement::VariableDeclaration { .. } => "VariableDeclaration",
            Statement::If { .. } => "If",
            Statement::Empty => "Empty",
        }
    }

    /// Number of physical lines this statement covers in canonical form.
    pub fn line_span(&self) -> usize {
        match self {
            Statement::CommentsBlock { text } => text.lines().count() + 2,
            Statement::If {
                branches,
                else_block,
            } => {
                let branch_lines: usize = branches.iter().map(|b| 1 + b.body.line_span()).sum();
                let else_lines = else_block.as_ref().map_or(0, |b| 1 + b.line_span());
                branch_lines + else_lines + 1
            }
            _ => 1,
        }
    }

    pub(crate) fn write_source(&self, out: &mut SourceWriter) {
        match self {
            Statement::Pragma { setting } => out.line(format!("#pragma {setting}")),
            Statement::Include { name, relativity } => {
                let (open, close) = relativity.delimiters();
                out.line(format!("#include {open}{name}{close}"))
            }
            Statement::OnAutoItStartRegister { function_name } => {
                out.line(format!("#OnAutoItStartRegister \"{function_name}\""))
            }
            Statement::CommentsBlock { text } => {
                out.line("#comments-start");
                for line in text.lines() {
                    out.verbatim(line);
                }
                out.line("#comments-end");
            }
            Statement::Flag { name } => out.line(format!("#{name}")),
            Statement::VariableDeclaration {
                scope,
                is_const,
                bindings,
            } => {
                let mut text = scope.keyword().to_string();
                if *is_const {
                    text.push_str(" Const");
                }
                for (idx, binding) in bindings.iter().enumerate() {
                    text.push_str(if idx == 0 { " " } else { ", " });
                    text.push_str(&format!("{} = {}", binding.name, binding.value));
                }
                out.line(text)
            }
            Statement::If {
                branches,
                else_block,
            } => {
                for (idx, branch) in branches.iter().enumerate() {
                    let keyword = if idx == 0 { "If" } else { "ElseIf" };
                    out.line(format!("{keyword} {} Then", branch.condition));
                    out.indented(|out| branch.body.write_source(out));
                }
                if let Some(block) = else_block {
                    out.line("Else");
                    out.indented(|out| block.write_source(out));
                }
                out.line("EndIf");
            }
            Statement::Empty => out.line(""),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = SourceWriter::new();
        self.write_source(&mut out);
        f.write_str(&out.finish())
    }
}

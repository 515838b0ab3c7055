//! Fluent assertion API for parsed scripts

use crate::au3::ast::{Block, BlockLine, Bindings, ConditionBlock, Expression, Scope, Statement};

// ============================================================================
// Entry Points
// ============================================================================

/// Create an assertion builder for a script (or any block)
pub fn assert_script(script: &Block) -> BlockAssertion<'_> {
    BlockAssertion {
        block: script,
        context: "script".to_string(),
    }
}

/// Create an assertion builder for an expression tree
pub fn assert_expression(expression: &Expression) -> ExpressionAssertion<'_> {
    ExpressionAssertion {
        expression,
        context: "expression".to_string(),
    }
}

fn summarize(block: &Block) -> String {
    block
        .statements()
        .map(Statement::kind_name)
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Blocks
// ============================================================================

pub struct BlockAssertion<'a> {
    block: &'a Block,
    context: String,
}

impl<'a> BlockAssertion<'a> {
    /// Assert the number of statements in the block
    pub fn line_count(self, expected: usize) -> Self {
        assert_eq!(
            self.block.len(),
            expected,
            "{}: expected {} statements, found {}: [{}]",
            self.context,
            expected,
            self.block.len(),
            summarize(self.block)
        );
        self
    }

    /// Assert the statement kinds, in order
    pub fn kinds(self, expected: &[&str]) -> Self {
        let actual: Vec<_> = self.block.statements().map(Statement::kind_name).collect();
        assert_eq!(actual, expected, "{}: statement kinds differ", self.context);
        self
    }

    /// Assert on a specific statement by index
    pub fn line<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(LineAssertion<'a>),
    {
        let line = self.block.get(index).unwrap_or_else(|| {
            panic!(
                "{}: statement index {} out of bounds ({} statements)",
                self.context,
                index,
                self.block.len()
            )
        });
        assertion(LineAssertion {
            line,
            context: format!("{}[{}]", self.context, index),
        });
        self
    }

    /// Assert the canonical rendering of the whole block
    pub fn renders(self, expected: &str) -> Self {
        assert_eq!(self.block.to_source(), expected, "{}: rendering differs", self.context);
        self
    }
}

// ============================================================================
// Statements
// ============================================================================

pub struct LineAssertion<'a> {
    line: &'a BlockLine,
    context: String,
}

impl<'a> LineAssertion<'a> {
    pub fn line_number(self, expected: usize) -> Self {
        assert_eq!(
            self.line.line_number, expected,
            "{}: expected line {}, found {}",
            self.context, expected, self.line.line_number
        );
        self
    }

    pub fn comment(self, expected: &str) -> Self {
        assert_eq!(
            self.line.trailing_comment, expected,
            "{}: trailing comment differs",
            self.context
        );
        self
    }

    pub fn kind(self, expected: &str) -> Self {
        assert_eq!(
            self.line.statement.kind_name(),
            expected,
            "{}: statement kind differs",
            self.context
        );
        self
    }

    /// Assert the canonical rendering of the statement, without its comment
    pub fn renders(self, expected: &str) -> Self {
        assert_eq!(
            self.line.statement.to_string(),
            expected,
            "{}: rendering differs",
            self.context
        );
        self
    }

    pub fn statement(&self) -> &'a Statement {
        &self.line.statement
    }

    pub fn assert_declaration(self) -> DeclarationAssertion<'a> {
        let line = self.line;
        match &line.statement {
            Statement::VariableDeclaration {
                scope,
                is_const,
                bindings,
            } => DeclarationAssertion {
                scope: *scope,
                is_const: *is_const,
                bindings,
                context: self.context,
            },
            other => panic!(
                "{}: expected VariableDeclaration, found {}",
                self.context,
                other.kind_name()
            ),
        }
    }

    pub fn assert_if(self) -> IfAssertion<'a> {
        let line = self.line;
        match &line.statement {
            Statement::If {
                branches,
                else_block,
            } => IfAssertion {
                branches,
                else_block: else_block.as_ref(),
                context: self.context,
            },
            other => panic!("{}: expected If, found {}", self.context, other.kind_name()),
        }
    }
}

pub struct DeclarationAssertion<'a> {
    scope: Scope,
    is_const: bool,
    bindings: &'a Bindings,
    context: String,
}

impl<'a> DeclarationAssertion<'a> {
    pub fn scope(self, expected: Scope) -> Self {
        assert_eq!(self.scope, expected, "{}: scope differs", self.context);
        self
    }

    pub fn is_const(self, expected: bool) -> Self {
        assert_eq!(self.is_const, expected, "{}: const flag differs", self.context);
        self
    }

    /// Assert the declared names, in declaration order
    pub fn names(self, expected: &[&str]) -> Self {
        let actual: Vec<_> = self.bindings.names().collect();
        assert_eq!(actual, expected, "{}: declared names differ", self.context);
        self
    }

    pub fn binding<F>(self, name: &str, assertion: F) -> Self
    where
        F: FnOnce(ExpressionAssertion<'a>),
    {
        let expression = self
            .bindings
            .get(name)
            .unwrap_or_else(|| panic!("{}: no binding named {}", self.context, name));
        assertion(ExpressionAssertion {
            expression,
            context: format!("{}.{}", self.context, name),
        });
        self
    }
}

pub struct IfAssertion<'a> {
    branches: &'a [ConditionBlock],
    else_block: Option<&'a Block>,
    context: String,
}

impl<'a> IfAssertion<'a> {
    pub fn branch_count(self, expected: usize) -> Self {
        assert_eq!(
            self.branches.len(),
            expected,
            "{}: expected {} branches, found {}",
            self.context,
            expected,
            self.branches.len()
        );
        self
    }

    pub fn branch<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(BranchAssertion<'a>),
    {
        let branch = self.branches.get(index).unwrap_or_else(|| {
            panic!(
                "{}: branch index {} out of bounds ({} branches)",
                self.context,
                index,
                self.branches.len()
            )
        });
        assertion(BranchAssertion {
            branch,
            context: format!("{}.branch[{}]", self.context, index),
        });
        self
    }

    pub fn has_else(self, expected: bool) -> Self {
        assert_eq!(
            self.else_block.is_some(),
            expected,
            "{}: else block presence differs",
            self.context
        );
        self
    }

    pub fn else_block<F>(self, assertion: F) -> Self
    where
        F: FnOnce(BlockAssertion<'a>),
    {
        let block = self
            .else_block
            .unwrap_or_else(|| panic!("{}: no else block", self.context));
        assertion(BlockAssertion {
            block,
            context: format!("{}.else", self.context),
        });
        self
    }
}

pub struct BranchAssertion<'a> {
    branch: &'a ConditionBlock,
    context: String,
}

impl<'a> BranchAssertion<'a> {
    pub fn condition_renders(self, expected: &str) -> Self {
        assert_eq!(
            self.branch.condition.to_string(),
            expected,
            "{}: condition differs",
            self.context
        );
        self
    }

    pub fn condition<F>(self, assertion: F) -> Self
    where
        F: FnOnce(ExpressionAssertion<'a>),
    {
        assertion(ExpressionAssertion {
            expression: &self.branch.condition,
            context: format!("{}.condition", self.context),
        });
        self
    }

    pub fn body<F>(self, assertion: F) -> Self
    where
        F: FnOnce(BlockAssertion<'a>),
    {
        assertion(BlockAssertion {
            block: &self.branch.body,
            context: format!("{}.body", self.context),
        });
        self
    }
}

// ============================================================================
// Expressions
// ============================================================================

pub struct ExpressionAssertion<'a> {
    expression: &'a Expression,
    context: String,
}

impl<'a> ExpressionAssertion<'a> {
    pub fn kind(self, expected: &str) -> Self {
        assert_eq!(
            self.expression.kind_name(),
            expected,
            "{}: expected {}, found {}",
            self.context,
            expected,
            self.expression
        );
        self
    }

    pub fn renders(self, expected: &str) -> Self {
        assert_eq!(
            self.expression.to_string(),
            expected,
            "{}: rendering differs",
            self.context
        );
        self
    }

    pub fn equals(self, expected: &Expression) -> Self {
        assert_eq!(self.expression, expected, "{}: tree differs", self.context);
        self
    }

    pub fn child_count(self, expected: usize) -> Self {
        let actual = self.expression.children().len();
        assert_eq!(actual, expected, "{}: child count differs", self.context);
        self
    }

    pub fn child<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(ExpressionAssertion<'a>),
    {
        let children = self.expression.children();
        let child = children.get(index).copied().unwrap_or_else(|| {
            panic!(
                "{}: child index {} out of bounds ({} children)",
                self.context,
                index,
                children.len()
            )
        });
        assertion(ExpressionAssertion {
            expression: child,
            context: format!("{}.{}", self.context, index),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::au3::parsing::parse_script;

    #[test]
    fn test_fluent_walk() {
        let script = parse_script("Local $a = 1 + 2 ; sum\nIf $a Then\n#x\nEndIf").unwrap();

        assert_script(&script)
            .line_count(2)
            .kinds(&["VariableDeclaration", "If"])
            .line(0, |line| {
                line.line_number(1)
                    .comment("sum")
                    .assert_declaration()
                    .scope(Scope::Local)
                    .names(&["$a"])
                    .binding("$a", |value| {
                        value.kind("BinaryOperator").child_count(2).child(1, |right| {
                            right.renders("2");
                        });
                    });
            })
            .line(1, |line| {
                line.assert_if().branch_count(1).has_else(false).branch(0, |branch| {
                    branch.condition_renders("$a").body(|body| {
                        body.line_count(1).line(0, |inner| {
                            inner.line_number(3).renders("#x");
                        });
                    });
                });
            });
    }

    #[test]
    #[should_panic(expected = "script[0]: expected If, found VariableDeclaration")]
    fn test_wrong_kind_names_the_path() {
        let script = parse_script("Local $a").unwrap();
        assert_script(&script).line(0, |line| {
            line.assert_if();
        });
    }
}

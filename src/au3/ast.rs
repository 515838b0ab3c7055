//! Syntax tree of a parsed script
//!
//!     The tree has two layers. [Statement]s are line oriented and live in [Block]s; the
//!     values they carry (declaration initializers, `If` conditions) are [Expression] trees.
//!     Every node owns its children, so a [Script] can be moved, cloned and dropped as one
//!     value. Nodes are plain data: they carry no parser state.
//!
//!     All nodes implement `Display` with the canonical source rendering, and [snapshot]
//!     turns a tree into the format-agnostic [AstSnapshot] that the output formats consume.

pub mod block;
pub mod expression;
pub(crate) mod render;
pub mod snapshot;
pub mod statement;

pub use block::{Block, BlockLine, Script};
pub use expression::{quote_string, Expression, Operator, Scalar};
pub use snapshot::{snapshot_expression, snapshot_script, AstSnapshot};
pub use statement::{Binding, Bindings, ConditionBlock, IncludeRelativity, Scope, Statement};

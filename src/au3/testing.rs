//! Testing utilities for parsed scripts
//!
//! # Writing Parser Tests
//!
//!     Two tools are provided and are meant to be used together:
//!
//!     1. [Samples] - bundled, verified AutoIt scripts.
//!     2. [assert_script] - fluent assertions over the parsed tree.
//!
//! ## Use Samples for Multi-Line Content
//!
//!     Hand-typed scripts inside test strings drift out of date and hide whitespace
//!     mistakes. Multi-line cases should come from `samples/` through [Samples]; inline
//!     strings are fine for single lines and for error cases.
//!
//!     ```rust-example
//!     use au3::au3::testing::Samples;
//!
//!     let source = Samples::get("020-if-blocks.au3").unwrap();
//!     let script = au3::parse_script(source)?;
//!     ```
//!
//! ## Assert Shape and Content, Not Counts
//!
//!     Matching on nested enums by hand takes a dozen lines per statement. The fluent API
//!     walks the tree and names the failing path in its panic message:
//!
//!     ```rust-example
//!     use au3::au3::testing::assert_script;
//!
//!     assert_script(&script)
//!         .line_count(2)
//!         .line(0, |line| {
//!             line.line_number(1).assert_declaration()
//!                 .is_const(false)
//!                 .names(&["$a", "$b"])
//!                 .binding("$a", |value| { value.renders("(1 + 2)"); });
//!         })
//!         .line(1, |line| {
//!             line.assert_if()
//!                 .branch_count(1)
//!                 .branch(0, |branch| { branch.condition_renders("$a").body(|body| { body.line_count(0); }); });
//!         });
//!     ```

mod assertions;
mod samples;

pub use assertions::{
    assert_expression, assert_script, BlockAssertion, BranchAssertion, DeclarationAssertion,
    ExpressionAssertion, IfAssertion, LineAssertion,
};
pub use samples::Samples;

//! # au3
//!
//! A front-end parser for AutoIt scripts.
//!
//! File Layout
//!
//!     src/au3
//!       ├── lexing      Line preprocessing (physical lines, trailing comments)
//!       ├── template    Fixed-template line matching for one-line directives
//!       ├── parsing     Expression parser, statement dispatcher and block parser
//!       ├── ast         Expression and statement trees, canonical rendering, snapshots
//!       ├── formats     Output formats (source, treeviz, json, yaml)
//!       ├── config      Layered configuration
//!       └── testing     Fluent AST assertions and bundled sample scripts
//!
//! The parser never evaluates anything: source text goes in, an owned tree comes out,
//! or the first error aborts the whole parse.
//!
//! For testing guidelines, see the [testing module](au3::testing).

pub mod au3;

pub use au3::parsing::{parse_expression, parse_script};

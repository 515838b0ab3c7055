//! Output formats for parsed scripts and expressions
//!
//! - source: canonical AutoIt rendering
//! - treeviz: one node per line, box-drawing connectors and icons
//! - json / yaml: serde serialization of the syntax tree

pub mod registry;
pub mod serialized;
pub mod source;
pub mod treeviz;

pub use registry::{FormatError, FormatRegistry, Formatter};
pub use serialized::{JsonFormatter, YamlFormatter};
pub use source::SourceFormatter;
pub use treeviz::{to_treeviz_str, TreevizFormatter, TreevizOptions};
